//! Known skeleton export versions.

/// Binary layout major version this crate decodes.
pub const SKELETON_FORMAT_MAJOR: u32 = 3;

/// Binary layout minor version this crate decodes.
pub const SKELETON_FORMAT_MINOR: u32 = 8;

/// Export version whose binary layout differs from the one this crate reads.
/// Data carrying exactly this version string is rejected before anything else is decoded.
pub const UNSUPPORTED_SKELETON_VERSION: &str = "3.8.75";

pub(crate) fn is_unsupported_version(version: Option<&str>) -> bool {
    version == Some(UNSUPPORTED_SKELETON_VERSION)
}

/// Returns `true` when `version` names a `major.minor` release matching the decoded layout.
pub fn is_native_format_version(version: &str) -> bool {
    let mut parts = version.split('.');
    let major = parts.next().and_then(|p| p.parse::<u32>().ok());
    let minor = parts.next().and_then(|p| p.parse::<u32>().ok());
    major == Some(SKELETON_FORMAT_MAJOR) && minor == Some(SKELETON_FORMAT_MINOR)
}
