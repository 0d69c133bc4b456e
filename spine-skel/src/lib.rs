//! Pure Rust decoder for Spine 3.8 binary skeleton data (`.skel`, unofficial).
//!
//! Decoding produces an owned [`SkeletonData`] tree: bones, slots, constraints, skins with
//! their attachments, events and animations. Attachments are created through an
//! [`AttachmentLoader`], so texture lookup (for example via [`AtlasAttachmentLoader`]) stays
//! outside the decoder. Posing, playback and rendering are out of scope.

#![forbid(unsafe_code)]

mod animation;
mod atlas;
mod attachment;
mod binary_animation;
mod error;
mod input;
mod linked_mesh;
mod loader;
mod model;
mod version;

pub mod binary;

pub use animation::*;
pub use atlas::*;
pub use attachment::*;
pub use binary::SkeletonBinary;
pub use error::*;
pub use loader::*;
pub use model::*;
pub use version::*;

#[cfg(test)]
mod test_writer;

#[cfg(test)]
mod binary_tests;
