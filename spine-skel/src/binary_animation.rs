//! Animation timelines of a `.skel` stream.

use crate::input::{BinaryInput, StringTable};
use crate::{
    Animation, AttachmentFrame, AttachmentTimeline, ColorFrame, ColorTimeline, Curve,
    DeformFrame, DeformTimeline, DrawOrderFrame, DrawOrderTimeline, Error, Event, EventTimeline,
    FloatFrame, IkConstraintTimeline, IkFrame, PathMixFrame, PathMixTimeline, PathValueTimeline,
    PositionMode, RotateFrame, RotateTimeline, SkeletonData, Timeline,
    TransformConstraintTimeline, TransformFrame, TwoColorFrame, TwoColorTimeline, Vec2Frame,
    Vec2Timeline,
};

const SLOT_ATTACHMENT: u8 = 0;
const SLOT_COLOR: u8 = 1;
const SLOT_TWO_COLOR: u8 = 2;

const BONE_ROTATE: u8 = 0;
const BONE_TRANSLATE: u8 = 1;
const BONE_SCALE: u8 = 2;
const BONE_SHEAR: u8 = 3;

const PATH_POSITION: u8 = 0;
const PATH_SPACING: u8 = 1;
const PATH_MIX: u8 = 2;

const CURVE_LINEAR: u8 = 0;
const CURVE_STEPPED: u8 = 1;
const CURVE_BEZIER: u8 = 2;

/// Reads one animation's timelines against an already decoded skeleton.
pub(crate) struct TimelineReader<'r, 'a> {
    pub(crate) input: &'r mut BinaryInput<'a>,
    pub(crate) strings: &'r StringTable,
    pub(crate) data: &'r SkeletonData,
    pub(crate) scale: f32,
    pub(crate) animation: &'r str,
}

impl TimelineReader<'_, '_> {
    pub(crate) fn read_animation(mut self) -> Result<Animation, Error> {
        let mut timelines = Vec::new();
        self.read_slot_timelines(&mut timelines)?;
        self.read_bone_timelines(&mut timelines)?;
        self.read_ik_timelines(&mut timelines)?;
        self.read_transform_timelines(&mut timelines)?;
        self.read_path_timelines(&mut timelines)?;
        self.read_deform_timelines(&mut timelines)?;
        if let Some(timeline) = self.read_draw_order_timeline()? {
            timelines.push(timeline);
        }
        if let Some(timeline) = self.read_event_timeline()? {
            timelines.push(timeline);
        }
        Ok(Animation::new(self.animation, timelines))
    }

    fn read_index(&mut self, kind: &'static str, len: usize) -> Result<usize, Error> {
        let index = self.input.read_count()?;
        if index < len {
            Ok(index)
        } else {
            Err(Error::invalid_index(kind, index as i64, len))
        }
    }

    fn frames<T>(&self, count: usize) -> Vec<T> {
        Vec::with_capacity(count.min(self.input.remaining()))
    }

    fn read_curve(&mut self) -> Result<Curve, Error> {
        match self.input.read_u8()? {
            CURVE_STEPPED => Ok(Curve::Stepped),
            CURVE_BEZIER => Ok(Curve::Bezier {
                cx1: self.input.read_f32()?,
                cy1: self.input.read_f32()?,
                cx2: self.input.read_f32()?,
                cy2: self.input.read_f32()?,
            }),
            CURVE_LINEAR => Ok(Curve::Linear),
            other => {
                log::trace!("curve type {other} read as linear");
                Ok(Curve::Linear)
            }
        }
    }

    /// Every frame but the last is followed by its curve.
    fn curve_after(&mut self, frame: usize, frame_count: usize) -> Result<Curve, Error> {
        if frame + 1 < frame_count {
            self.read_curve()
        } else {
            Ok(Curve::Linear)
        }
    }

    fn read_slot_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let slot_count = self.input.read_count()?;
        for _ in 0..slot_count {
            let slot_index = self.read_index("slot", self.data.slots.len())?;
            let timeline_count = self.input.read_count()?;
            for _ in 0..timeline_count {
                let kind = self.input.read_u8()?;
                let frame_count = self.input.read_count()?;
                let timeline = match kind {
                    SLOT_ATTACHMENT => {
                        let mut frames = self.frames(frame_count);
                        for _ in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let name = self.input.read_string_ref(self.strings)?;
                            frames.push(AttachmentFrame { time, name });
                        }
                        Timeline::Attachment(AttachmentTimeline { slot_index, frames })
                    }
                    SLOT_COLOR => {
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let color = self.input.read_color()?;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(ColorFrame { time, color, curve });
                        }
                        Timeline::Color(ColorTimeline { slot_index, frames })
                    }
                    SLOT_TWO_COLOR => {
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let light = self.input.read_color()?;
                            // Stored as (a, r, g, b); the dark alpha is unused.
                            let [_, r, g, b] = self.input.read_color()?;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(TwoColorFrame {
                                time,
                                light,
                                dark: [r, g, b],
                                curve,
                            });
                        }
                        Timeline::TwoColor(TwoColorTimeline { slot_index, frames })
                    }
                    _ => {
                        return Err(Error::UnknownSlotTimeline {
                            slot: self.data.slots[slot_index].name.clone(),
                            kind,
                        });
                    }
                };
                timelines.push(timeline);
            }
        }
        Ok(())
    }

    fn read_bone_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let bone_count = self.input.read_count()?;
        for _ in 0..bone_count {
            let bone_index = self.read_index("bone", self.data.bones.len())?;
            let timeline_count = self.input.read_count()?;
            for _ in 0..timeline_count {
                let kind = self.input.read_u8()?;
                let frame_count = self.input.read_count()?;
                let timeline = match kind {
                    BONE_ROTATE => {
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let angle = self.input.read_f32()?;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(RotateFrame { time, angle, curve });
                        }
                        Timeline::Rotate(RotateTimeline { bone_index, frames })
                    }
                    BONE_TRANSLATE | BONE_SCALE | BONE_SHEAR => {
                        let scale = if kind == BONE_TRANSLATE { self.scale } else { 1.0 };
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let x = self.input.read_f32()? * scale;
                            let y = self.input.read_f32()? * scale;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(Vec2Frame { time, x, y, curve });
                        }
                        let timeline = Vec2Timeline { bone_index, frames };
                        match kind {
                            BONE_TRANSLATE => Timeline::Translate(timeline),
                            BONE_SCALE => Timeline::Scale(timeline),
                            _ => Timeline::Shear(timeline),
                        }
                    }
                    _ => {
                        return Err(Error::UnknownBoneTimeline {
                            bone: self.data.bones[bone_index].name.clone(),
                            kind,
                        });
                    }
                };
                timelines.push(timeline);
            }
        }
        Ok(())
    }

    fn read_ik_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let count = self.input.read_count()?;
        for _ in 0..count {
            let constraint_index = self.read_index("ik constraint", self.data.ik_constraints.len())?;
            let frame_count = self.input.read_count()?;
            let mut frames = self.frames(frame_count);
            for frame in 0..frame_count {
                let time = self.input.read_f32()?;
                let mix = self.input.read_f32()?;
                let softness = self.input.read_f32()?;
                let bend_direction = self.input.read_i8()? as i32;
                let compress = self.input.read_bool()?;
                let stretch = self.input.read_bool()?;
                let curve = self.curve_after(frame, frame_count)?;
                frames.push(IkFrame {
                    time,
                    mix,
                    softness,
                    bend_direction,
                    compress,
                    stretch,
                    curve,
                });
            }
            timelines.push(Timeline::IkConstraint(IkConstraintTimeline {
                constraint_index,
                frames,
            }));
        }
        Ok(())
    }

    fn read_transform_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let count = self.input.read_count()?;
        for _ in 0..count {
            let constraint_index = self.read_index(
                "transform constraint",
                self.data.transform_constraints.len(),
            )?;
            let frame_count = self.input.read_count()?;
            let mut frames = self.frames(frame_count);
            for frame in 0..frame_count {
                let time = self.input.read_f32()?;
                let rotate_mix = self.input.read_f32()?;
                let translate_mix = self.input.read_f32()?;
                let scale_mix = self.input.read_f32()?;
                let shear_mix = self.input.read_f32()?;
                let curve = self.curve_after(frame, frame_count)?;
                frames.push(TransformFrame {
                    time,
                    rotate_mix,
                    translate_mix,
                    scale_mix,
                    shear_mix,
                    curve,
                });
            }
            timelines.push(Timeline::TransformConstraint(TransformConstraintTimeline {
                constraint_index,
                frames,
            }));
        }
        Ok(())
    }

    fn read_path_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let count = self.input.read_count()?;
        for _ in 0..count {
            let constraint_index =
                self.read_index("path constraint", self.data.path_constraints.len())?;
            let data = self.data;
            let constraint = &data.path_constraints[constraint_index];
            let timeline_count = self.input.read_count()?;
            for _ in 0..timeline_count {
                let kind = self.input.read_u8()?;
                let frame_count = self.input.read_count()?;
                let timeline = match kind {
                    PATH_POSITION | PATH_SPACING => {
                        let scaled = if kind == PATH_POSITION {
                            constraint.position_mode == PositionMode::Fixed
                        } else {
                            constraint.spacing_mode.is_scaled()
                        };
                        let scale = if scaled { self.scale } else { 1.0 };
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let value = self.input.read_f32()? * scale;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(FloatFrame { time, value, curve });
                        }
                        let timeline = PathValueTimeline {
                            constraint_index,
                            frames,
                        };
                        if kind == PATH_POSITION {
                            Timeline::PathPosition(timeline)
                        } else {
                            Timeline::PathSpacing(timeline)
                        }
                    }
                    PATH_MIX => {
                        let mut frames = self.frames(frame_count);
                        for frame in 0..frame_count {
                            let time = self.input.read_f32()?;
                            let rotate_mix = self.input.read_f32()?;
                            let translate_mix = self.input.read_f32()?;
                            let curve = self.curve_after(frame, frame_count)?;
                            frames.push(PathMixFrame {
                                time,
                                rotate_mix,
                                translate_mix,
                                curve,
                            });
                        }
                        Timeline::PathMix(PathMixTimeline {
                            constraint_index,
                            frames,
                        })
                    }
                    _ => {
                        return Err(Error::UnknownPathTimeline {
                            constraint: constraint.name.clone(),
                            kind,
                        });
                    }
                };
                timelines.push(timeline);
            }
        }
        Ok(())
    }

    /// Deform keys store only the changed range `[start, start + end)`. Unweighted attachments
    /// get their setup positions added back over the whole buffer; weighted ones keep offsets.
    fn read_deform_timelines(&mut self, timelines: &mut Vec<Timeline>) -> Result<(), Error> {
        let skin_count = self.input.read_count()?;
        for _ in 0..skin_count {
            let skin_index = self.read_index("skin", self.data.skins.len())?;
            let data = self.data;
            let skin = &data.skins[skin_index];
            let slot_count = self.input.read_count()?;
            for _ in 0..slot_count {
                let slot_index = self.read_index("slot", self.data.slots.len())?;
                let attachment_count = self.input.read_count()?;
                for _ in 0..attachment_count {
                    let name = self
                        .input
                        .read_string_ref(self.strings)?
                        .unwrap_or_default();
                    let vertex_data = skin
                        .attachment(slot_index, &name)
                        .and_then(|attachment| attachment.vertex_data())
                        .ok_or_else(|| Error::AttachmentNotFound { name: name.clone() })?;
                    let deform_length = vertex_data.deform_length();
                    let setup = vertex_data.setup_deform();

                    let frame_count = self.input.read_count()?;
                    let mut frames = self.frames(frame_count);
                    for frame in 0..frame_count {
                        let time = self.input.read_f32()?;
                        let end = self.input.read_count()?;
                        let vertices = if end == 0 {
                            setup.clone().unwrap_or_else(|| vec![0.0; deform_length])
                        } else {
                            let start = self.input.read_count()?;
                            let stop = start.saturating_add(end);
                            if stop > deform_length {
                                return Err(Error::invalid_index(
                                    "deform vertex",
                                    stop as i64,
                                    deform_length,
                                ));
                            }
                            let mut vertices = vec![0.0; deform_length];
                            for value in &mut vertices[start..stop] {
                                *value = self.input.read_f32()? * self.scale;
                            }
                            if let Some(setup) = &setup {
                                for (value, base) in vertices.iter_mut().zip(setup) {
                                    *value += base;
                                }
                            }
                            vertices
                        };
                        let curve = self.curve_after(frame, frame_count)?;
                        frames.push(DeformFrame {
                            time,
                            vertices,
                            curve,
                        });
                    }
                    timelines.push(Timeline::Deform(DeformTimeline {
                        skin: skin_index,
                        slot_index,
                        attachment: name,
                        frames,
                    }));
                }
            }
        }
        Ok(())
    }

    fn draw_order_error(&self, message: String) -> Error {
        Error::InvalidDrawOrder {
            animation: self.animation.to_string(),
            message,
        }
    }

    fn read_draw_order_timeline(&mut self) -> Result<Option<Timeline>, Error> {
        let frame_count = self.input.read_count()?;
        if frame_count == 0 {
            return Ok(None);
        }
        let slot_count = self.data.slots.len();
        let mut frames = self.frames(frame_count);
        for _ in 0..frame_count {
            let time = self.input.read_f32()?;
            let offset_count = self.input.read_count()?;
            if offset_count > slot_count {
                return Err(self.draw_order_error(format!(
                    "{offset_count} offsets for {slot_count} slots"
                )));
            }

            let mut draw_order: Vec<Option<usize>> = vec![None; slot_count];
            let mut unchanged = Vec::with_capacity(slot_count - offset_count);
            let mut original_index = 0usize;
            for _ in 0..offset_count {
                let slot_index = self.input.read_count()?;
                if slot_index < original_index || slot_index >= slot_count {
                    return Err(self.draw_order_error(format!(
                        "slot {slot_index} out of order or range"
                    )));
                }
                unchanged.extend(original_index..slot_index);
                original_index = slot_index;

                // Offsets may be negative even though they are not zig-zag encoded.
                let offset = self.input.read_varint(true)?;
                let target = original_index as i64 + offset as i64;
                let position = usize::try_from(target)
                    .ok()
                    .filter(|&position| position < slot_count)
                    .ok_or_else(|| {
                        self.draw_order_error(format!(
                            "slot {original_index} moved to {target}"
                        ))
                    })?;
                if draw_order[position].is_some() {
                    return Err(self.draw_order_error(format!(
                        "position {position} assigned twice"
                    )));
                }
                draw_order[position] = Some(original_index);
                original_index += 1;
            }
            unchanged.extend(original_index..slot_count);

            for entry in draw_order.iter_mut().rev() {
                if entry.is_none() {
                    *entry = unchanged.pop();
                }
            }
            let draw_order = draw_order
                .into_iter()
                .collect::<Option<Vec<usize>>>()
                .ok_or_else(|| self.draw_order_error("incomplete permutation".to_string()))?;
            frames.push(DrawOrderFrame { time, draw_order });
        }
        Ok(Some(Timeline::DrawOrder(DrawOrderTimeline { frames })))
    }

    fn read_event_timeline(&mut self) -> Result<Option<Timeline>, Error> {
        let count = self.input.read_count()?;
        if count == 0 {
            return Ok(None);
        }
        let mut events = self.frames(count);
        for _ in 0..count {
            let time = self.input.read_f32()?;
            let skeleton = self.data;
            let data = self.read_index("event", skeleton.events.len())?;
            let definition = &skeleton.events[data];
            let int_value = self.input.read_varint(false)?;
            let float_value = self.input.read_f32()?;
            let string_value = if self.input.read_bool()? {
                self.input.read_string()?
            } else {
                definition.string_value.clone()
            };
            let (volume, balance) = if definition.audio_path.is_some() {
                (self.input.read_f32()?, self.input.read_f32()?)
            } else {
                (definition.volume, definition.balance)
            };
            events.push(Event {
                time,
                data,
                int_value,
                float_value,
                string_value,
                volume,
                balance,
            });
        }
        Ok(Some(Timeline::Event(EventTimeline { events })))
    }
}
