//! The naming convention that encodes a mod folder's enabled state.
//!
//! A mod folder is disabled by prefixing its final path segment with
//! [`DISABLED_PREFIX`] and re-enabled by stripping that prefix. Parent
//! segments are never touched, so marking and unmarking are lossless
//! inverses on the final segment and the rest of the path can be trusted
//! verbatim in both forms.

use camino::{Utf8Path, Utf8PathBuf};

/// Prefix on the final path segment of a disabled mod folder.
pub const DISABLED_PREFIX: &str = "DISABLED_";

/// Returns `true` if the final segment of `path` carries the disabled marker.
pub fn is_disabled(path: impl AsRef<Utf8Path>) -> bool {
    match path.as_ref().file_name() {
        Some(name) => name.starts_with(DISABLED_PREFIX),
        None => false,
    }
}

/// Returns the disabled form of `path`.
///
/// A path that is already marked (or has no final segment) is returned
/// unchanged.
pub fn to_disabled(path: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    let path = path.as_ref();
    match path.file_name() {
        Some(name) if !name.starts_with(DISABLED_PREFIX) => {
            replace_file_name(path, &format!("{}{}", DISABLED_PREFIX, name))
        }
        _ => path.to_path_buf(),
    }
}

/// Returns the enabled (clean) form of `path`.
///
/// Stripping is a no-op when the final segment is not marked, so this is
/// safe to call on paths of unknown state.
pub fn to_enabled(path: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    let path = path.as_ref();
    match path.file_name().and_then(|n| n.strip_prefix(DISABLED_PREFIX)) {
        Some(clean) => replace_file_name(path, clean),
        None => path.to_path_buf(),
    }
}

/// Returns `path` rewritten into the form matching `enabled`.
pub fn with_state(path: impl AsRef<Utf8Path>, enabled: bool) -> Utf8PathBuf {
    if enabled {
        to_enabled(path)
    } else {
        to_disabled(path)
    }
}

fn replace_file_name(path: &Utf8Path, name: &str) -> Utf8PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.join(name),
        _ => Utf8PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_only_the_final_segment() {
        assert_eq!(to_disabled("Hats/RedHat"), "Hats/DISABLED_RedHat");
        assert_eq!(to_enabled("Hats/DISABLED_RedHat"), "Hats/RedHat");
    }

    #[test]
    fn mark_then_unmark_is_identity() {
        for path in ["RedHat", "Hats/RedHat", "a/b/c/Deep Mod"] {
            assert_eq!(to_enabled(to_disabled(path)), Utf8PathBuf::from(path));
            assert_eq!(to_disabled(to_enabled(to_disabled(path))), to_disabled(path));
        }
    }

    #[test]
    fn marking_is_idempotent() {
        let marked = to_disabled("Hats/RedHat");
        assert_eq!(to_disabled(&marked), marked);
        let clean = to_enabled("Hats/RedHat");
        assert_eq!(clean, "Hats/RedHat");
    }

    #[test]
    fn detects_state_from_final_segment_only() {
        assert!(is_disabled("Hats/DISABLED_RedHat"));
        assert!(!is_disabled("Hats/RedHat"));
        // A marked parent does not make the asset disabled.
        assert!(!is_disabled("DISABLED_Hats/RedHat"));
    }

    #[test]
    fn top_level_paths_have_no_parent_to_preserve() {
        assert_eq!(to_disabled("RedHat"), "DISABLED_RedHat");
        assert_eq!(to_enabled("DISABLED_RedHat"), "RedHat");
    }

    #[test]
    fn with_state_selects_the_requested_form() {
        assert_eq!(with_state("Hats/RedHat", false), "Hats/DISABLED_RedHat");
        assert_eq!(with_state("Hats/DISABLED_RedHat", true), "Hats/RedHat");
        assert_eq!(with_state("Hats/RedHat", true), "Hats/RedHat");
    }
}
