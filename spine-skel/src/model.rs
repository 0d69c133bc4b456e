use crate::{Animation, Attachment};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoneData {
    pub index: usize,
    pub name: String,
    pub parent: Option<usize>,
    pub length: f32,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub shear_x: f32,
    pub shear_y: f32,
    pub transform_mode: TransformMode,
    pub skin_required: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TransformMode {
    #[default]
    Normal,
    OnlyTranslation,
    NoRotationOrReflection,
    NoScale,
    NoScaleOrReflection,
}

impl TransformMode {
    pub(crate) fn from_binary(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::OnlyTranslation),
            2 => Some(Self::NoRotationOrReflection),
            3 => Some(Self::NoScale),
            4 => Some(Self::NoScaleOrReflection),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotData {
    pub index: usize,
    pub name: String,
    pub bone: usize,
    pub color: [f32; 4],
    /// Two-color tint. Absent when the stream carries the all-white marker; alpha is always 1.
    pub dark_color: Option<[f32; 4]>,
    pub attachment_name: Option<String>,
    pub blend_mode: BlendMode,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
}

impl BlendMode {
    pub(crate) fn from_binary(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Additive),
            2 => Some(Self::Multiply),
            3 => Some(Self::Screen),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IkConstraintData {
    pub name: String,
    pub order: i32,
    pub skin_required: bool,
    pub bones: Vec<usize>,
    pub target: usize,
    pub mix: f32,
    pub softness: f32,
    pub bend_direction: i32,
    pub compress: bool,
    pub stretch: bool,
    pub uniform: bool,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformConstraintData {
    pub name: String,
    pub order: i32,
    pub skin_required: bool,
    pub bones: Vec<usize>,
    pub target: usize,
    pub local: bool,
    pub relative: bool,
    pub offset_rotation: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_scale_x: f32,
    pub offset_scale_y: f32,
    pub offset_shear_y: f32,
    pub rotate_mix: f32,
    pub translate_mix: f32,
    pub scale_mix: f32,
    pub shear_mix: f32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PositionMode {
    Fixed,
    #[default]
    Percent,
}

impl PositionMode {
    pub(crate) fn from_binary(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Fixed),
            1 => Some(Self::Percent),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SpacingMode {
    #[default]
    Length,
    Fixed,
    Percent,
}

impl SpacingMode {
    pub(crate) fn from_binary(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Length),
            1 => Some(Self::Fixed),
            2 => Some(Self::Percent),
            _ => None,
        }
    }

    /// Length and fixed spacing are distances and follow the skeleton scale.
    pub fn is_scaled(self) -> bool {
        matches!(self, Self::Length | Self::Fixed)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RotateMode {
    #[default]
    Tangent,
    Chain,
    ChainScale,
}

impl RotateMode {
    pub(crate) fn from_binary(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Tangent),
            1 => Some(Self::Chain),
            2 => Some(Self::ChainScale),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathConstraintData {
    pub name: String,
    pub order: i32,
    pub skin_required: bool,
    pub bones: Vec<usize>,
    /// Slot holding the path attachment.
    pub target: usize,
    pub position_mode: PositionMode,
    pub spacing_mode: SpacingMode,
    pub rotate_mode: RotateMode,
    pub offset_rotation: f32,
    pub position: f32,
    pub spacing: f32,
    pub rotate_mix: f32,
    pub translate_mix: f32,
}

/// A named set of attachments, keyed per slot by attachment name.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkinData {
    pub name: String,
    pub bones: Vec<usize>,
    pub ik_constraints: Vec<usize>,
    pub transform_constraints: Vec<usize>,
    pub path_constraints: Vec<usize>,
    pub attachments: BTreeMap<usize, BTreeMap<String, Attachment>>,
}

impl SkinData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attachment(&self, slot_index: usize, attachment_name: &str) -> Option<&Attachment> {
        self.attachments
            .get(&slot_index)
            .and_then(|slot_map| slot_map.get(attachment_name))
    }

    pub fn attachment_mut(
        &mut self,
        slot_index: usize,
        attachment_name: &str,
    ) -> Option<&mut Attachment> {
        self.attachments
            .get_mut(&slot_index)
            .and_then(|slot_map| slot_map.get_mut(attachment_name))
    }

    /// Stores `attachment` under `(slot_index, name)`, returning any attachment it replaced.
    pub fn set_attachment(
        &mut self,
        slot_index: usize,
        name: impl Into<String>,
        attachment: Attachment,
    ) -> Option<Attachment> {
        self.attachments
            .entry(slot_index)
            .or_default()
            .insert(name.into(), attachment)
    }

    pub fn attachments_for_slot(
        &self,
        slot_index: usize,
    ) -> impl Iterator<Item = (&str, &Attachment)> + '_ {
        self.attachments
            .get(&slot_index)
            .into_iter()
            .flat_map(|slot_map| slot_map.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.values().map(BTreeMap::len).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EventData {
    pub name: String,
    pub int_value: i32,
    pub float_value: f32,
    pub string_value: Option<String>,
    pub audio_path: Option<String>,
    pub volume: f32,
    pub balance: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    pub time: f32,
    /// Index into [`SkeletonData::events`].
    pub data: usize,
    pub int_value: i32,
    pub float_value: f32,
    pub string_value: Option<String>,
    pub volume: f32,
    pub balance: f32,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkeletonData {
    pub hash: Option<String>,
    pub version: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bones: Vec<BoneData>,
    pub slots: Vec<SlotData>,
    /// All skins. When present the default skin is stored first.
    pub skins: Vec<SkinData>,
    pub default_skin: Option<usize>,
    pub events: Vec<EventData>,
    pub animations: Vec<Animation>,
    pub ik_constraints: Vec<IkConstraintData>,
    pub transform_constraints: Vec<TransformConstraintData>,
    pub path_constraints: Vec<PathConstraintData>,
}

impl SkeletonData {
    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn find_bone(&self, name: &str) -> Option<&BoneData> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn find_slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn find_slot(&self, name: &str) -> Option<&SlotData> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn find_skin_index(&self, name: &str) -> Option<usize> {
        self.skins.iter().position(|s| s.name == name)
    }

    pub fn find_skin(&self, name: &str) -> Option<&SkinData> {
        self.skins.iter().find(|s| s.name == name)
    }

    pub fn default_skin(&self) -> Option<&SkinData> {
        self.default_skin.and_then(|i| self.skins.get(i))
    }

    pub fn find_event(&self, name: &str) -> Option<&EventData> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn find_animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn find_ik_constraint(&self, name: &str) -> Option<&IkConstraintData> {
        self.ik_constraints.iter().find(|c| c.name == name)
    }

    pub fn find_transform_constraint(&self, name: &str) -> Option<&TransformConstraintData> {
        self.transform_constraints.iter().find(|c| c.name == name)
    }

    pub fn find_path_constraint(&self, name: &str) -> Option<&PathConstraintData> {
        self.path_constraints.iter().find(|c| c.name == name)
    }
}
