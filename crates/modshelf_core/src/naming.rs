//! Folder-name sanitation and display-title cleanup.

use regex::Regex;

/// Turns a display name into a directory-safe folder name.
///
/// Spaces and dots become underscores; quotes and path separators are
/// removed entirely.
pub fn sanitize_folder_name(name: &str) -> String {
    name.trim()
        .replace([' ', '.'], "_")
        .replace(['\'', '"', '/', '\\'], "")
}

/// Strips version suffixes and disabled-state noise from a mod title.
///
/// `"RedHat_v1.2"` and `"DISABLED_RedHat"` both clean to `"RedHat"`. When
/// cleanup would leave an empty string the trimmed input is returned
/// instead, so a caller always gets something displayable back.
pub fn clean_title(raw: &str) -> String {
    let noise = Regex::new(r"(?i)(_v\d+(\.\d+)*|_DISABLED|DISABLED_|\(disabled\)|^DISABLED_)")
        .unwrap();
    let cleaned = noise.replace_all(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        raw.trim().to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_separators_and_drops_quotes() {
        assert_eq!(sanitize_folder_name("Red Hat v1.2"), "Red_Hat_v1_2");
        assert_eq!(sanitize_folder_name("  O'Mod \"X\"  "), "OMod_X");
        assert_eq!(sanitize_folder_name("a/b\\c"), "abc");
    }

    #[test]
    fn clean_title_strips_version_and_state_noise() {
        assert_eq!(clean_title("RedHat_v1.2"), "RedHat");
        assert_eq!(clean_title("DISABLED_RedHat"), "RedHat");
        assert_eq!(clean_title("RedHat (disabled)"), "RedHat");
        assert_eq!(clean_title("RedHat_v2"), "RedHat");
    }

    #[test]
    fn clean_title_keeps_case_and_inner_words() {
        assert_eq!(clean_title("Crimson Witch Outfit"), "Crimson Witch Outfit");
    }

    #[test]
    fn clean_title_falls_back_to_input_when_everything_is_noise() {
        assert_eq!(clean_title("DISABLED_"), "DISABLED_");
    }
}
