//! Deferred parent lookup for linked meshes.
//!
//! A linked mesh may name a parent that appears later in the same skin or in another skin, so
//! skin reading only records where each linked mesh lives. Resolution runs once every skin has
//! been decoded.

use crate::{Attachment, AttachmentLoader, AttachmentRef, Error, SkinData};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PendingLinkedMesh {
    /// Skin holding the linked mesh.
    pub(crate) skin: usize,
    pub(crate) slot_index: usize,
    /// Key the linked mesh is stored under.
    pub(crate) name: String,
    /// Skin holding the parent; `None` means the default skin.
    pub(crate) parent_skin: Option<String>,
    pub(crate) parent: String,
    pub(crate) inherit_deform: bool,
}

fn is_unresolved_link(attachment: &Attachment) -> bool {
    matches!(attachment, Attachment::LinkedMesh(mesh) if mesh.parent_mesh.is_none())
}

/// Copies parent geometry into every pending linked mesh and hands it to the loader for
/// configuration. A linked mesh whose parent is itself an unresolved linked mesh waits for a
/// later round; a round that resolves nothing fails on the first blocked record.
pub(crate) fn resolve_linked_meshes<L: AttachmentLoader + ?Sized>(
    skins: &mut [SkinData],
    default_skin: Option<usize>,
    pending: Vec<PendingLinkedMesh>,
    loader: &mut L,
) -> Result<(), Error> {
    let total = pending.len();
    let mut remaining = pending;

    while !remaining.is_empty() {
        let round = remaining.len();
        let mut blocked = Vec::new();

        for link in remaining {
            let parent_skin = match &link.parent_skin {
                None => default_skin.ok_or_else(|| Error::SkinNotFound {
                    name: String::new(),
                })?,
                Some(name) => skins
                    .iter()
                    .position(|s| &s.name == name)
                    .ok_or_else(|| Error::SkinNotFound { name: name.clone() })?,
            };

            let parent_attachment = skins
                .get(parent_skin)
                .and_then(|s| s.attachment(link.slot_index, &link.parent))
                .filter(|a| a.as_mesh().is_some())
                .ok_or_else(|| Error::ParentMeshNotFound {
                    name: link.parent.clone(),
                })?;
            if is_unresolved_link(parent_attachment) {
                blocked.push(link);
                continue;
            }
            let Some(parent) = parent_attachment.as_mesh().cloned() else {
                return Err(Error::ParentMeshNotFound { name: link.parent });
            };

            let parent_ref = AttachmentRef {
                skin: parent_skin,
                slot_index: link.slot_index,
                name: link.parent.clone(),
            };
            let own_ref = AttachmentRef {
                skin: link.skin,
                slot_index: link.slot_index,
                name: link.name.clone(),
            };

            let attachment = skins
                .get_mut(link.skin)
                .and_then(|s| s.attachment_mut(link.slot_index, &link.name))
                .ok_or_else(|| Error::AttachmentNotFound {
                    name: link.name.clone(),
                })?;
            let Some(mesh) = attachment.as_mesh_mut() else {
                return Err(Error::AttachmentNotFound { name: link.name });
            };
            mesh.vertex_data.deform_attachment = Some(if link.inherit_deform {
                parent_ref.clone()
            } else {
                own_ref
            });
            mesh.set_parent_mesh(&parent, parent_ref);
            mesh.update_uvs();
            log::trace!(
                "linked mesh '{}' (slot {}) -> parent '{}' in skin {}",
                link.name,
                link.slot_index,
                link.parent,
                parent_skin
            );
            loader.configure_attachment(attachment)?;
        }

        if blocked.len() == round {
            let first = blocked.swap_remove(0);
            return Err(Error::ParentMeshNotFound { name: first.parent });
        }
        remaining = blocked;
    }

    if total > 0 {
        log::debug!("resolved {total} linked mesh(es)");
    }
    Ok(())
}
