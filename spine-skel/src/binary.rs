//! Spine 3.8 binary skeleton (`.skel`) decoder.
//!
//! The stream is read front to back in a single pass: header, shared string table, bones,
//! slots, constraints, skins, events and animations. Linked meshes are recorded while skins are
//! read and resolved once every skin exists, since their parents may appear later in the stream.

use crate::binary_animation::TimelineReader;
use crate::input::{BinaryInput, StringTable};
use crate::linked_mesh::{PendingLinkedMesh, resolve_linked_meshes};
use crate::version::{is_native_format_version, is_unsupported_version};
use crate::{
    Animation, Attachment, AttachmentKind, AttachmentLoader, AttachmentRef, BlendMode, BoneData,
    Error, EventData, IkConstraintData, MeshVertices, PathConstraintData, PlainAttachmentLoader,
    PositionMode, RotateMode, SkeletonData, SkinData, SlotData, SpacingMode,
    TransformConstraintData, TransformMode, VertexData, VertexWeight,
};
use std::path::Path;
use std::sync::Arc;

/// Nonessential color blocks are a packed RGBA8888 int.
const NONESSENTIAL_COLOR_BYTES: usize = 4;

impl SkeletonData {
    pub fn from_skel_bytes(bytes: &[u8]) -> Result<Arc<Self>, Error> {
        Self::from_skel_bytes_with_scale(bytes, 1.0)
    }

    pub fn from_skel_bytes_with_scale(bytes: &[u8], scale: f32) -> Result<Arc<Self>, Error> {
        let mut binary = SkeletonBinary::new().with_scale(scale);
        binary.read_skeleton_data(bytes).map(Arc::new)
    }
}

/// Reusable `.skel` decoder.
///
/// The decoder owns its [`AttachmentLoader`] and keeps the message of the most recent failure
/// until the next read starts.
#[derive(Debug)]
pub struct SkeletonBinary<L = PlainAttachmentLoader> {
    scale: f32,
    error: Option<String>,
    loader: L,
    linked_meshes: Vec<PendingLinkedMesh>,
}

impl SkeletonBinary {
    /// Decoder that builds attachments with [`PlainAttachmentLoader`].
    pub fn new() -> Self {
        Self::with_loader(PlainAttachmentLoader)
    }
}

impl Default for SkeletonBinary {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: AttachmentLoader> SkeletonBinary<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            scale: 1.0,
            error: None,
            loader,
            linked_meshes: Vec::new(),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    /// Factor applied to every positional value read from the stream. Non-finite values fall
    /// back to `1.0`.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() { scale } else { 1.0 };
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Message of the last failed read, cleared when a new read starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn into_loader(self) -> L {
        self.loader
    }

    pub fn read_skeleton_data(&mut self, bytes: &[u8]) -> Result<SkeletonData, Error> {
        self.error = None;
        self.linked_meshes.clear();

        let reader = SkelReader {
            input: BinaryInput::new(bytes),
            strings: StringTable::default(),
            scale: self.scale,
            nonessential: false,
            loader: &mut self.loader,
            linked_meshes: &mut self.linked_meshes,
        };
        let result = reader.read_skeleton_data();
        self.linked_meshes.clear();
        self.record(result)
    }

    /// Reads the whole file at `path` and decodes it. An unreadable or empty file fails with
    /// [`Error::FileRead`].
    pub fn read_skeleton_data_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<SkeletonData, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).unwrap_or_else(|err| {
            log::debug!("failed to read {}: {err}", path.display());
            Vec::new()
        });
        if bytes.is_empty() {
            self.error = None;
            return self.record(Err(Error::FileRead {
                path: path.display().to_string(),
            }));
        }
        self.read_skeleton_data(&bytes)
    }

    fn record(&mut self, result: Result<SkeletonData, Error>) -> Result<SkeletonData, Error> {
        if let Err(err) = &result {
            log::debug!("skeleton decode failed: {err}");
            self.error = Some(err.to_string());
        }
        result
    }
}

/// State for one decode pass.
struct SkelReader<'a, 'l, L: ?Sized> {
    input: BinaryInput<'a>,
    strings: StringTable,
    scale: f32,
    nonessential: bool,
    loader: &'l mut L,
    linked_meshes: &'l mut Vec<PendingLinkedMesh>,
}

fn check_index(kind: &'static str, index: usize, len: usize) -> Result<usize, Error> {
    if index < len {
        Ok(index)
    } else {
        Err(Error::invalid_index(kind, index as i64, len))
    }
}

fn kind_mismatch(name: &str, expected: AttachmentKind) -> Error {
    Error::AttachmentKindMismatch {
        name: name.to_string(),
        expected,
    }
}

impl<L: AttachmentLoader + ?Sized> SkelReader<'_, '_, L> {
    fn read_skeleton_data(mut self) -> Result<SkeletonData, Error> {
        let mut data = SkeletonData::default();
        self.read_header(&mut data)?;

        self.strings = StringTable::read(&mut self.input)?;
        log::trace!(
            "string table: {} entries, offset {}",
            self.strings.len(),
            self.input.position()
        );

        data.bones = self.read_bones()?;
        data.slots = self.read_slots(data.bones.len())?;
        data.ik_constraints = self.read_ik_constraints(data.bones.len())?;
        data.transform_constraints = self.read_transform_constraints(data.bones.len())?;
        data.path_constraints = self.read_path_constraints(&data)?;
        log::debug!(
            "decoded {} bones, {} slots, {} ik / {} transform / {} path constraints",
            data.bones.len(),
            data.slots.len(),
            data.ik_constraints.len(),
            data.transform_constraints.len(),
            data.path_constraints.len()
        );

        self.read_skins(&mut data)?;
        let pending = std::mem::take(&mut *self.linked_meshes);
        resolve_linked_meshes(
            &mut data.skins,
            data.default_skin,
            pending,
            &mut *self.loader,
        )?;

        data.events = self.read_events()?;
        data.animations = self.read_animations(&data)?;
        log::debug!(
            "decoded {} skins, {} events, {} animations ({} bytes)",
            data.skins.len(),
            data.events.len(),
            data.animations.len(),
            self.input.position()
        );
        Ok(data)
    }

    fn read_header(&mut self, data: &mut SkeletonData) -> Result<(), Error> {
        data.hash = self.input.read_string()?.filter(|hash| !hash.is_empty());

        let version = self.input.read_string()?;
        if is_unsupported_version(version.as_deref()) {
            return Err(Error::UnsupportedFormatVersion {
                version: version.unwrap_or_default(),
            });
        }
        data.version = version.filter(|version| !version.is_empty());
        if let Some(version) = &data.version {
            if !is_native_format_version(version) {
                log::warn!("skeleton data version {version} decoded with the 3.8 layout");
            }
        }

        data.x = self.input.read_f32()?;
        data.y = self.input.read_f32()?;
        data.width = self.input.read_f32()?;
        data.height = self.input.read_f32()?;

        self.nonessential = self.input.read_bool()?;
        if self.nonessential {
            // fps, images path, audio path.
            self.input.read_f32()?;
            self.input.read_string()?;
            self.input.read_string()?;
        }
        Ok(())
    }

    fn read_string_ref(&mut self) -> Result<Option<String>, Error> {
        self.input.read_string_ref(&self.strings)
    }

    fn read_index(&mut self, kind: &'static str, len: usize) -> Result<usize, Error> {
        let index = self.input.read_count()?;
        check_index(kind, index, len)
    }

    fn read_index_list(&mut self, kind: &'static str, len: usize) -> Result<Vec<usize>, Error> {
        let count = self.input.read_count()?;
        let mut out = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            out.push(self.read_index(kind, len)?);
        }
        Ok(out)
    }

    /// Reads a mode varint; values outside the enum fall back to its default.
    fn read_mode<T: Default + std::fmt::Debug>(
        &mut self,
        what: &str,
        from_binary: fn(usize) -> Option<T>,
    ) -> Result<T, Error> {
        let raw = self.input.read_varint(true)?;
        match usize::try_from(raw).ok().and_then(from_binary) {
            Some(mode) => Ok(mode),
            None => {
                let fallback = T::default();
                log::warn!("unknown {what} {raw}, using {fallback:?}");
                Ok(fallback)
            }
        }
    }

    fn skip_nonessential_color(&mut self) -> Result<(), Error> {
        if self.nonessential {
            self.input.skip(NONESSENTIAL_COLOR_BYTES)?;
        }
        Ok(())
    }

    fn read_bones(&mut self) -> Result<Vec<BoneData>, Error> {
        let count = self.input.read_count()?;
        let mut bones = Vec::with_capacity(count.min(self.input.remaining()));
        for index in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let parent = if index == 0 {
                None
            } else {
                Some(self.read_index("parent bone", index)?)
            };
            let rotation = self.input.read_f32()?;
            let x = self.input.read_f32()? * self.scale;
            let y = self.input.read_f32()? * self.scale;
            let scale_x = self.input.read_f32()?;
            let scale_y = self.input.read_f32()?;
            let shear_x = self.input.read_f32()?;
            let shear_y = self.input.read_f32()?;
            let length = self.input.read_f32()? * self.scale;
            let transform_mode = self.read_mode("transform mode", TransformMode::from_binary)?;
            let skin_required = self.input.read_bool()?;
            self.skip_nonessential_color()?;

            bones.push(BoneData {
                index,
                name,
                parent,
                length,
                x,
                y,
                rotation,
                scale_x,
                scale_y,
                shear_x,
                shear_y,
                transform_mode,
                skin_required,
            });
        }
        Ok(bones)
    }

    fn read_slots(&mut self, bone_count: usize) -> Result<Vec<SlotData>, Error> {
        let count = self.input.read_count()?;
        let mut slots = Vec::with_capacity(count.min(self.input.remaining()));
        for index in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let bone = self.read_index("bone", bone_count)?;
            let color = self.input.read_color()?;

            // Dark color is stored as (a, r, g, b); all 0xFF means no two-color tint.
            let a = self.input.read_u8()?;
            let r = self.input.read_u8()?;
            let g = self.input.read_u8()?;
            let b = self.input.read_u8()?;
            let dark_color = if a == 0xff && r == 0xff && g == 0xff && b == 0xff {
                None
            } else {
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
            };

            let attachment_name = self.read_string_ref()?;
            let blend_mode = self.read_mode("blend mode", BlendMode::from_binary)?;
            slots.push(SlotData {
                index,
                name,
                bone,
                color,
                dark_color,
                attachment_name,
                blend_mode,
            });
        }
        Ok(slots)
    }

    fn read_ik_constraints(&mut self, bone_count: usize) -> Result<Vec<IkConstraintData>, Error> {
        let count = self.input.read_count()?;
        let mut out = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let order = self.input.read_varint(true)?;
            let skin_required = self.input.read_bool()?;
            let bones = self.read_index_list("bone", bone_count)?;
            let target = self.read_index("bone", bone_count)?;
            out.push(IkConstraintData {
                name,
                order,
                skin_required,
                bones,
                target,
                mix: self.input.read_f32()?,
                softness: self.input.read_f32()?,
                bend_direction: self.input.read_i8()? as i32,
                compress: self.input.read_bool()?,
                stretch: self.input.read_bool()?,
                uniform: self.input.read_bool()?,
            });
        }
        Ok(out)
    }

    fn read_transform_constraints(
        &mut self,
        bone_count: usize,
    ) -> Result<Vec<TransformConstraintData>, Error> {
        let count = self.input.read_count()?;
        let mut out = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let order = self.input.read_varint(true)?;
            let skin_required = self.input.read_bool()?;
            let bones = self.read_index_list("bone", bone_count)?;
            let target = self.read_index("bone", bone_count)?;
            out.push(TransformConstraintData {
                name,
                order,
                skin_required,
                bones,
                target,
                local: self.input.read_bool()?,
                relative: self.input.read_bool()?,
                offset_rotation: self.input.read_f32()?,
                offset_x: self.input.read_f32()? * self.scale,
                offset_y: self.input.read_f32()? * self.scale,
                offset_scale_x: self.input.read_f32()?,
                offset_scale_y: self.input.read_f32()?,
                offset_shear_y: self.input.read_f32()?,
                rotate_mix: self.input.read_f32()?,
                translate_mix: self.input.read_f32()?,
                scale_mix: self.input.read_f32()?,
                shear_mix: self.input.read_f32()?,
            });
        }
        Ok(out)
    }

    fn read_path_constraints(
        &mut self,
        data: &SkeletonData,
    ) -> Result<Vec<PathConstraintData>, Error> {
        let count = self.input.read_count()?;
        let mut out = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let order = self.input.read_varint(true)?;
            let skin_required = self.input.read_bool()?;
            let bones = self.read_index_list("bone", data.bones.len())?;
            let target = self.read_index("slot", data.slots.len())?;
            let position_mode = self.read_mode("position mode", PositionMode::from_binary)?;
            let spacing_mode = self.read_mode("spacing mode", SpacingMode::from_binary)?;
            let rotate_mode = self.read_mode("rotate mode", RotateMode::from_binary)?;
            let offset_rotation = self.input.read_f32()?;
            let mut position = self.input.read_f32()?;
            if position_mode == PositionMode::Fixed {
                position *= self.scale;
            }
            let mut spacing = self.input.read_f32()?;
            if spacing_mode.is_scaled() {
                spacing *= self.scale;
            }
            out.push(PathConstraintData {
                name,
                order,
                skin_required,
                bones,
                target,
                position_mode,
                spacing_mode,
                rotate_mode,
                offset_rotation,
                position,
                spacing,
                rotate_mix: self.input.read_f32()?,
                translate_mix: self.input.read_f32()?,
            });
        }
        Ok(out)
    }

    fn read_skins(&mut self, data: &mut SkeletonData) -> Result<(), Error> {
        if let Some(skin) = self.read_skin(true, 0, data)? {
            data.skins.push(skin);
            data.default_skin = Some(0);
        }

        let count = self.input.read_count()?;
        for _ in 0..count {
            let skin_index = data.skins.len();
            if let Some(skin) = self.read_skin(false, skin_index, data)? {
                data.skins.push(skin);
            }
        }
        log::debug!(
            "decoded {} skins ({} pending linked meshes)",
            data.skins.len(),
            self.linked_meshes.len()
        );
        Ok(())
    }

    /// Reads one skin. The default skin has no name or constraint lists and is absent when its
    /// slot count is zero.
    fn read_skin(
        &mut self,
        default_skin: bool,
        skin_index: usize,
        data: &SkeletonData,
    ) -> Result<Option<SkinData>, Error> {
        let (mut skin, slot_count) = if default_skin {
            let slot_count = self.input.read_count()?;
            if slot_count == 0 {
                return Ok(None);
            }
            (SkinData::new("default"), slot_count)
        } else {
            let mut skin = SkinData::new(self.read_string_ref()?.unwrap_or_default());
            skin.bones = self.read_index_list("bone", data.bones.len())?;
            skin.ik_constraints = self.read_index_list("ik constraint", data.ik_constraints.len())?;
            skin.transform_constraints =
                self.read_index_list("transform constraint", data.transform_constraints.len())?;
            skin.path_constraints =
                self.read_index_list("path constraint", data.path_constraints.len())?;
            (skin, self.input.read_count()?)
        };

        for _ in 0..slot_count {
            let slot_index = self.read_index("slot", data.slots.len())?;
            let attachment_count = self.input.read_count()?;
            for _ in 0..attachment_count {
                let key = self.read_string_ref()?.unwrap_or_default();
                let attachment =
                    self.read_attachment(&skin.name, skin_index, slot_index, &key, data)?;
                skin.set_attachment(slot_index, key, attachment);
            }
        }
        log::trace!(
            "skin '{}': {} attachments, offset {}",
            skin.name,
            skin.attachment_count(),
            self.input.position()
        );
        Ok(Some(skin))
    }

    fn read_attachment(
        &mut self,
        skin_name: &str,
        skin_index: usize,
        slot_index: usize,
        key: &str,
        data: &SkeletonData,
    ) -> Result<Attachment, Error> {
        let name = self.read_string_ref()?.unwrap_or_else(|| key.to_string());
        let kind_byte = self.input.read_u8()?;
        let kind = AttachmentKind::from_binary(kind_byte)
            .ok_or(Error::UnknownAttachmentType { kind: kind_byte })?;
        let own_ref = AttachmentRef {
            skin: skin_index,
            slot_index,
            name: key.to_string(),
        };
        let bone_count = data.bones.len();
        let scale = self.scale;

        let mut attachment = match kind {
            AttachmentKind::Region => {
                let path = self.read_string_ref()?.unwrap_or_else(|| name.clone());
                let mut attachment =
                    self.loader
                        .create_attachment(skin_name, kind, &name, Some(&path))?;
                let Attachment::Region(region) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                region.path = path;
                region.rotation = self.input.read_f32()?;
                region.x = self.input.read_f32()? * scale;
                region.y = self.input.read_f32()? * scale;
                region.scale_x = self.input.read_f32()?;
                region.scale_y = self.input.read_f32()?;
                region.width = self.input.read_f32()? * scale;
                region.height = self.input.read_f32()? * scale;
                region.color = self.input.read_color()?;
                region.update_offset();
                attachment
            }
            AttachmentKind::BoundingBox => {
                let vertex_count = self.input.read_count()?;
                let mut attachment = self.loader.create_attachment(skin_name, kind, &name, None)?;
                let Attachment::BoundingBox(bounds) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                bounds.vertex_data = self.read_vertex_data(vertex_count, bone_count, own_ref)?;
                self.skip_nonessential_color()?;
                attachment
            }
            AttachmentKind::Mesh => {
                let path = self.read_string_ref()?.unwrap_or_else(|| name.clone());
                let mut attachment =
                    self.loader
                        .create_attachment(skin_name, kind, &name, Some(&path))?;
                let Attachment::Mesh(mesh) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                mesh.path = path;
                mesh.color = self.input.read_color()?;
                let vertex_count = self.input.read_count()?;
                mesh.region_uvs = self
                    .input
                    .read_f32_array(vertex_count.saturating_mul(2), 1.0)?
                    .chunks_exact(2)
                    .map(|uv| [uv[0], uv[1]])
                    .collect();
                mesh.triangles = self.input.read_u16_array()?;
                mesh.vertex_data = self.read_vertex_data(vertex_count, bone_count, own_ref)?;
                mesh.update_uvs();
                mesh.hull_length = self.input.read_count()?.saturating_mul(2);
                if self.nonessential {
                    mesh.edges = self.input.read_u16_array()?;
                    mesh.width = self.input.read_f32()? * scale;
                    mesh.height = self.input.read_f32()? * scale;
                }
                attachment
            }
            AttachmentKind::LinkedMesh => {
                let path = self.read_string_ref()?.unwrap_or_else(|| name.clone());
                let mut attachment =
                    self.loader
                        .create_attachment(skin_name, kind, &name, Some(&path))?;
                let Attachment::LinkedMesh(mesh) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                mesh.path = path;
                mesh.color = self.input.read_color()?;
                let parent_skin = self.read_string_ref()?;
                let parent = self.read_string_ref()?.unwrap_or_default();
                let inherit_deform = self.input.read_bool()?;
                if self.nonessential {
                    mesh.width = self.input.read_f32()? * scale;
                    mesh.height = self.input.read_f32()? * scale;
                }
                self.linked_meshes.push(PendingLinkedMesh {
                    skin: skin_index,
                    slot_index,
                    name: own_ref.name,
                    parent_skin,
                    parent,
                    inherit_deform,
                });
                // Configured once the parent geometry has been copied in.
                return Ok(attachment);
            }
            AttachmentKind::Path => {
                let mut attachment = self.loader.create_attachment(skin_name, kind, &name, None)?;
                let Attachment::Path(path) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                path.closed = self.input.read_bool()?;
                path.constant_speed = self.input.read_bool()?;
                let vertex_count = self.input.read_count()?;
                path.vertex_data = self.read_vertex_data(vertex_count, bone_count, own_ref)?;
                path.lengths = self.input.read_f32_array(vertex_count / 3, scale)?;
                self.skip_nonessential_color()?;
                attachment
            }
            AttachmentKind::Point => {
                let mut attachment = self.loader.create_attachment(skin_name, kind, &name, None)?;
                let Attachment::Point(point) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                point.rotation = self.input.read_f32()?;
                point.x = self.input.read_f32()? * scale;
                point.y = self.input.read_f32()? * scale;
                if self.nonessential {
                    point.color = self.input.read_color()?;
                }
                attachment
            }
            AttachmentKind::Clipping => {
                let end_slot = self.read_index("slot", data.slots.len())?;
                let vertex_count = self.input.read_count()?;
                let mut attachment = self.loader.create_attachment(skin_name, kind, &name, None)?;
                let Attachment::Clipping(clip) = &mut attachment else {
                    return Err(kind_mismatch(&name, kind));
                };
                clip.vertex_data = self.read_vertex_data(vertex_count, bone_count, own_ref)?;
                self.skip_nonessential_color()?;
                clip.end_slot = Some(end_slot);
                attachment
            }
        };

        self.loader.configure_attachment(&mut attachment)?;
        Ok(attachment)
    }

    /// Reads vertex positions for `vertex_count` vertices. The attachment deforms itself until a
    /// linked mesh says otherwise.
    fn read_vertex_data(
        &mut self,
        vertex_count: usize,
        bone_count: usize,
        own_ref: AttachmentRef,
    ) -> Result<VertexData, Error> {
        let world_vertices_length = vertex_count.saturating_mul(2);
        let weighted = self.input.read_bool()?;
        let vertices = if !weighted {
            let flat = self.input.read_f32_array(world_vertices_length, self.scale)?;
            MeshVertices::Unweighted(flat.chunks_exact(2).map(|xy| [xy[0], xy[1]]).collect())
        } else {
            let mut vertices = Vec::with_capacity(vertex_count.min(self.input.remaining()));
            for _ in 0..vertex_count {
                let influences = self.input.read_count()?;
                let mut weights = Vec::with_capacity(influences.min(self.input.remaining()));
                for _ in 0..influences {
                    let bone = self.read_index("bone", bone_count)?;
                    weights.push(VertexWeight {
                        bone,
                        x: self.input.read_f32()? * self.scale,
                        y: self.input.read_f32()? * self.scale,
                        weight: self.input.read_f32()?,
                    });
                }
                vertices.push(weights);
            }
            MeshVertices::Weighted(vertices)
        };
        Ok(VertexData {
            vertices,
            world_vertices_length,
            deform_attachment: Some(own_ref),
        })
    }

    fn read_events(&mut self) -> Result<Vec<EventData>, Error> {
        let count = self.input.read_count()?;
        let mut events = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            let name = self.read_string_ref()?.unwrap_or_default();
            let int_value = self.input.read_varint(false)?;
            let float_value = self.input.read_f32()?;
            let string_value = self.input.read_string()?;
            let audio_path = self.input.read_string()?;
            let (volume, balance) = if audio_path.is_some() {
                (self.input.read_f32()?, self.input.read_f32()?)
            } else {
                (1.0, 0.0)
            };
            events.push(EventData {
                name,
                int_value,
                float_value,
                string_value,
                audio_path,
                volume,
                balance,
            });
        }
        Ok(events)
    }

    fn read_animations(&mut self, data: &SkeletonData) -> Result<Vec<Animation>, Error> {
        let count = self.input.read_count()?;
        let mut animations = Vec::with_capacity(count.min(self.input.remaining()));
        for _ in 0..count {
            let name = self.input.read_string()?.unwrap_or_default();
            let start = self.input.position();
            let animation = TimelineReader {
                input: &mut self.input,
                strings: &self.strings,
                data,
                scale: self.scale,
                animation: &name,
            }
            .read_animation()?;
            log::trace!(
                "animation '{}': {} timelines, duration {}, bytes {}..{}",
                animation.name,
                animation.timelines.len(),
                animation.duration,
                start,
                self.input.position()
            );
            animations.push(animation);
        }
        Ok(animations)
    }
}
