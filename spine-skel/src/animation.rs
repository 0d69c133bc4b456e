use crate::Event;

/// Interpolation from a keyframe to the one after it. The last frame of a timeline is always
/// `Linear`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Curve {
    #[default]
    Linear,
    Stepped,
    Bezier {
        cx1: f32,
        cy1: f32,
        cx2: f32,
        cy2: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttachmentFrame {
    pub time: f32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorFrame {
    pub time: f32,
    pub color: [f32; 4],
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TwoColorFrame {
    pub time: f32,
    pub light: [f32; 4],
    pub dark: [f32; 3],
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RotateFrame {
    pub time: f32,
    pub angle: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Vec2Frame {
    pub time: f32,
    pub x: f32,
    pub y: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IkFrame {
    pub time: f32,
    pub mix: f32,
    pub softness: f32,
    pub bend_direction: i32,
    pub compress: bool,
    pub stretch: bool,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformFrame {
    pub time: f32,
    pub rotate_mix: f32,
    pub translate_mix: f32,
    pub scale_mix: f32,
    pub shear_mix: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatFrame {
    pub time: f32,
    pub value: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathMixFrame {
    pub time: f32,
    pub rotate_mix: f32,
    pub translate_mix: f32,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeformFrame {
    pub time: f32,
    /// Full deform buffer. Unweighted attachments store absolute positions, weighted ones offsets.
    pub vertices: Vec<f32>,
    pub curve: Curve,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DrawOrderFrame {
    pub time: f32,
    /// `draw_order[i]` is the setup index of the slot drawn at position `i`.
    pub draw_order: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttachmentTimeline {
    pub slot_index: usize,
    pub frames: Vec<AttachmentFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorTimeline {
    pub slot_index: usize,
    pub frames: Vec<ColorFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TwoColorTimeline {
    pub slot_index: usize,
    pub frames: Vec<TwoColorFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RotateTimeline {
    pub bone_index: usize,
    pub frames: Vec<RotateFrame>,
}

/// Shared shape of translate, scale and shear timelines.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Vec2Timeline {
    pub bone_index: usize,
    pub frames: Vec<Vec2Frame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IkConstraintTimeline {
    pub constraint_index: usize,
    pub frames: Vec<IkFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformConstraintTimeline {
    pub constraint_index: usize,
    pub frames: Vec<TransformFrame>,
}

/// Path constraint position or spacing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathValueTimeline {
    pub constraint_index: usize,
    pub frames: Vec<FloatFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathMixTimeline {
    pub constraint_index: usize,
    pub frames: Vec<PathMixFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeformTimeline {
    pub skin: usize,
    pub slot_index: usize,
    pub attachment: String,
    pub frames: Vec<DeformFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DrawOrderTimeline {
    pub frames: Vec<DrawOrderFrame>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EventTimeline {
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Timeline {
    Attachment(AttachmentTimeline),
    Color(ColorTimeline),
    TwoColor(TwoColorTimeline),
    Rotate(RotateTimeline),
    Translate(Vec2Timeline),
    Scale(Vec2Timeline),
    Shear(Vec2Timeline),
    IkConstraint(IkConstraintTimeline),
    TransformConstraint(TransformConstraintTimeline),
    PathPosition(PathValueTimeline),
    PathSpacing(PathValueTimeline),
    PathMix(PathMixTimeline),
    Deform(DeformTimeline),
    DrawOrder(DrawOrderTimeline),
    Event(EventTimeline),
}

impl Timeline {
    pub fn frame_count(&self) -> usize {
        match self {
            Timeline::Attachment(t) => t.frames.len(),
            Timeline::Color(t) => t.frames.len(),
            Timeline::TwoColor(t) => t.frames.len(),
            Timeline::Rotate(t) => t.frames.len(),
            Timeline::Translate(t) | Timeline::Scale(t) | Timeline::Shear(t) => t.frames.len(),
            Timeline::IkConstraint(t) => t.frames.len(),
            Timeline::TransformConstraint(t) => t.frames.len(),
            Timeline::PathPosition(t) | Timeline::PathSpacing(t) => t.frames.len(),
            Timeline::PathMix(t) => t.frames.len(),
            Timeline::Deform(t) => t.frames.len(),
            Timeline::DrawOrder(t) => t.frames.len(),
            Timeline::Event(t) => t.events.len(),
        }
    }

    /// Time of the final keyframe, or `None` for an empty timeline.
    pub fn last_time(&self) -> Option<f32> {
        match self {
            Timeline::Attachment(t) => t.frames.last().map(|f| f.time),
            Timeline::Color(t) => t.frames.last().map(|f| f.time),
            Timeline::TwoColor(t) => t.frames.last().map(|f| f.time),
            Timeline::Rotate(t) => t.frames.last().map(|f| f.time),
            Timeline::Translate(t) | Timeline::Scale(t) | Timeline::Shear(t) => {
                t.frames.last().map(|f| f.time)
            }
            Timeline::IkConstraint(t) => t.frames.last().map(|f| f.time),
            Timeline::TransformConstraint(t) => t.frames.last().map(|f| f.time),
            Timeline::PathPosition(t) | Timeline::PathSpacing(t) => {
                t.frames.last().map(|f| f.time)
            }
            Timeline::PathMix(t) => t.frames.last().map(|f| f.time),
            Timeline::Deform(t) => t.frames.last().map(|f| f.time),
            Timeline::DrawOrder(t) => t.frames.last().map(|f| f.time),
            Timeline::Event(t) => t.events.last().map(|e| e.time),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Animation {
    pub name: String,
    pub duration: f32,
    pub timelines: Vec<Timeline>,
}

impl Animation {
    /// Builds an animation whose duration is the latest keyframe across `timelines`.
    pub fn new(name: impl Into<String>, timelines: Vec<Timeline>) -> Self {
        let duration = timelines
            .iter()
            .filter_map(Timeline::last_time)
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            timelines,
        }
    }
}
