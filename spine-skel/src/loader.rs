use crate::{
    Atlas, Attachment, BoundingBoxAttachment, ClippingAttachment, Error, MeshAttachment,
    PathAttachment, PointAttachment, RegionAttachment,
};

/// Attachment record discriminator as stored in `.skel` data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AttachmentKind {
    Region,
    BoundingBox,
    Mesh,
    LinkedMesh,
    Path,
    Point,
    Clipping,
}

impl AttachmentKind {
    pub fn from_binary(kind: u8) -> Option<Self> {
        match kind {
            0 => Some(Self::Region),
            1 => Some(Self::BoundingBox),
            2 => Some(Self::Mesh),
            3 => Some(Self::LinkedMesh),
            4 => Some(Self::Path),
            5 => Some(Self::Point),
            6 => Some(Self::Clipping),
            _ => None,
        }
    }
}

/// Creates attachments for the decoder.
///
/// The decoder calls [`AttachmentLoader::create_attachment`] once per attachment record, fills in
/// every field read from the stream, then hands the attachment back through
/// [`AttachmentLoader::configure_attachment`] before storing it in its skin. Linked meshes are
/// configured only after their parent geometry has been copied in.
pub trait AttachmentLoader {
    fn create_attachment(
        &mut self,
        skin: &str,
        kind: AttachmentKind,
        name: &str,
        path: Option<&str>,
    ) -> Result<Attachment, Error>;

    fn configure_attachment(&mut self, _attachment: &mut Attachment) -> Result<(), Error> {
        Ok(())
    }
}

impl<L: AttachmentLoader + ?Sized> AttachmentLoader for &mut L {
    fn create_attachment(
        &mut self,
        skin: &str,
        kind: AttachmentKind,
        name: &str,
        path: Option<&str>,
    ) -> Result<Attachment, Error> {
        (**self).create_attachment(skin, kind, name, path)
    }

    fn configure_attachment(&mut self, attachment: &mut Attachment) -> Result<(), Error> {
        (**self).configure_attachment(attachment)
    }
}

/// Builds attachments without texture data; every region is the whole unit texture.
#[derive(Clone, Debug, Default)]
pub struct PlainAttachmentLoader;

impl AttachmentLoader for PlainAttachmentLoader {
    fn create_attachment(
        &mut self,
        _skin: &str,
        kind: AttachmentKind,
        name: &str,
        path: Option<&str>,
    ) -> Result<Attachment, Error> {
        Ok(empty_attachment(kind, name, path.unwrap_or(name)))
    }
}

fn empty_attachment(kind: AttachmentKind, name: &str, path: &str) -> Attachment {
    let name = name.to_string();
    match kind {
        AttachmentKind::Region => Attachment::Region(RegionAttachment {
            name,
            path: path.to_string(),
            ..RegionAttachment::default()
        }),
        AttachmentKind::BoundingBox => {
            Attachment::BoundingBox(BoundingBoxAttachment { name, ..Default::default() })
        }
        AttachmentKind::Mesh => Attachment::Mesh(MeshAttachment {
            name,
            path: path.to_string(),
            ..MeshAttachment::default()
        }),
        AttachmentKind::LinkedMesh => Attachment::LinkedMesh(MeshAttachment {
            name,
            path: path.to_string(),
            ..MeshAttachment::default()
        }),
        AttachmentKind::Path => Attachment::Path(PathAttachment { name, ..Default::default() }),
        AttachmentKind::Point => Attachment::Point(PointAttachment { name, ..Default::default() }),
        AttachmentKind::Clipping => {
            Attachment::Clipping(ClippingAttachment { name, ..Default::default() })
        }
    }
}

/// Resolves region and mesh texture coordinates from an [`Atlas`].
#[derive(Clone, Debug)]
pub struct AtlasAttachmentLoader<'a> {
    atlas: &'a Atlas,
}

impl<'a> AtlasAttachmentLoader<'a> {
    pub fn new(atlas: &'a Atlas) -> Self {
        Self { atlas }
    }

    pub fn atlas(&self) -> &'a Atlas {
        self.atlas
    }
}

impl AttachmentLoader for AtlasAttachmentLoader<'_> {
    fn create_attachment(
        &mut self,
        _skin: &str,
        kind: AttachmentKind,
        name: &str,
        path: Option<&str>,
    ) -> Result<Attachment, Error> {
        let path = path.unwrap_or(name);
        let mut attachment = empty_attachment(kind, name, path);
        match &mut attachment {
            Attachment::Region(region) => {
                let texture = self
                    .atlas
                    .texture_region(path)
                    .ok_or_else(|| Error::RegionNotFound {
                        path: path.to_string(),
                    })?;
                region.set_uvs(texture.u, texture.v, texture.u2, texture.v2, texture.rotate());
                region.region = texture;
            }
            Attachment::Mesh(mesh) | Attachment::LinkedMesh(mesh) => {
                mesh.region = self
                    .atlas
                    .texture_region(path)
                    .ok_or_else(|| Error::RegionNotFound {
                        path: path.to_string(),
                    })?;
            }
            _ => {}
        }
        log::trace!("atlas loader: created {kind:?} '{name}' (path '{path}')");
        Ok(attachment)
    }
}
