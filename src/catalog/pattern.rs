//! Filename pattern matching for KVM qcow2 images.
//!
//! The catalog lists many artifact types per target (ISOs, boot images,
//! signature files). Only names of the exact shape
//! `rhel-{major}.{minor}-{arch}-kvm.qcow2` are sync candidates.

/// Extract the minor version from a KVM qcow2 image filename, if the name
/// matches the given major version and architecture exactly.
///
/// The minor version is one or more ASCII digits. Trailing garbage after
/// `.qcow2` (e.g. a detached `.asc` signature) does not match.
pub fn kvm_image_minor(filename: &str, rhel_major: u32, architecture: &str) -> Option<u32> {
    let rest = filename.strip_prefix("rhel-")?;
    let (major_str, rest) = rest.split_once('.')?;
    if major_str.parse::<u32>().ok()? != rhel_major {
        return None;
    }
    let (minor_str, rest) = rest.split_once('-')?;
    if minor_str.is_empty() || !minor_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let minor = minor_str.parse().ok()?;
    let rest = rest.strip_prefix(architecture)?;
    if rest != "-kvm.qcow2" {
        return None;
    }
    Some(minor)
}
