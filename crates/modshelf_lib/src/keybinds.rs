//! Best-effort harvesting of keybinds from a mod's INI files.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use modshelf_core::marker;

use crate::error::{Error, Result};
use crate::library::ModLibrary;

/// One keybind row harvested from a mod's INI files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IniKeybind {
    /// Section title, e.g. `KeySwapOutfit`.
    pub title: String,
    /// Bound key value, e.g. `VK_F5`.
    pub key: String,
}

impl ModLibrary {
    /// Scan an asset's top-level INI files for keybind sections.
    ///
    /// Mod INI files list their rebindable keys in `[Key...]` sections
    /// after a `; Constants` comment line. The first INI file that
    /// yields any keybinds wins; a missing folder yields an empty list.
    pub fn asset_keybinds(&self, asset_id: &str) -> Result<Vec<IniKeybind>> {
        let asset = {
            let index = self.index_lock();
            index
                .asset_by_id(asset_id)
                .cloned()
                .ok_or_else(|| Error::not_found("asset", asset_id))?
        };

        let clean_abs = self.root().join(asset.clean_folder());
        let marked_abs = self.root().join(marker::to_disabled(asset.clean_folder()));
        let folder = if clean_abs.is_dir() {
            clean_abs
        } else if marked_abs.is_dir() {
            marked_abs
        } else {
            warn!(
                "mod folder for '{}' not found, no keybinds to scan",
                asset.name
            );
            return Ok(Vec::new());
        };

        let mut ini_paths: Vec<PathBuf> = WalkDir::new(folder.as_std_path())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("ini"))
                    .unwrap_or(false)
            })
            .map(|entry| entry.path().to_path_buf())
            .collect();
        ini_paths.sort();

        for path in ini_paths {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("skipping unreadable INI {}: {}", path.display(), err);
                    continue;
                }
            };
            let keybinds = parse_keybinds(&content);
            if !keybinds.is_empty() {
                return Ok(keybinds);
            }
        }
        Ok(Vec::new())
    }
}

/// Collect `[Key*]` section bindings that appear after a `; Constants`
/// marker comment.
fn parse_keybinds(content: &str) -> Vec<IniKeybind> {
    let mut keybinds = Vec::new();
    let mut current_section: Option<String> = None;
    let mut past_constants = false;

    for line in content.lines() {
        let line = line.trim();
        if !past_constants {
            if line.starts_with(';') && line[1..].trim_start().to_lowercase().contains("constants")
            {
                past_constants = true;
            }
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let section = line[1..line.len() - 1].trim();
            current_section = if section.to_lowercase().starts_with("key") {
                Some(section.to_string())
            } else {
                None
            };
        } else if let Some(section) = &current_section {
            if line.to_lowercase().starts_with("key") && line.contains('=') {
                if let Some(value) = line.splitn(2, '=').nth(1) {
                    let value = value.trim();
                    if !value.is_empty() {
                        keybinds.push(IniKeybind {
                            title: section.clone(),
                            key: value.to_string(),
                        });
                    }
                }
            }
        }
    }
    keybinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::LibraryFixture;

    const SWAP_INI: &str = "\
[TextureOverride]
hash = abc123

; Constants -------------------

[KeySwapOutfit]
key = VK_F5
condition = $active == 1

[KeyToggleGlow]
key = no_alt ctrl shift q

[Present]
post $active = 0
";

    #[test]
    fn parses_key_sections_after_the_constants_marker() {
        let keybinds = parse_keybinds(SWAP_INI);
        assert_eq!(
            keybinds,
            vec![
                IniKeybind {
                    title: "KeySwapOutfit".to_string(),
                    key: "VK_F5".to_string(),
                },
                IniKeybind {
                    title: "KeyToggleGlow".to_string(),
                    key: "no_alt ctrl shift q".to_string(),
                },
            ]
        );
    }

    #[test]
    fn sections_before_the_marker_are_ignored() {
        let content = "[KeyEarly]\nkey = VK_F1\n";
        assert!(parse_keybinds(content).is_empty());
    }

    #[test]
    fn non_key_sections_and_empty_values_are_ignored() {
        let content = "; constants\n[Resource]\nkey = VK_F2\n[KeyBlank]\nkey =\n";
        assert!(parse_keybinds(content).is_empty());
    }

    #[test]
    fn first_ini_with_keybinds_wins_and_disabled_folders_are_found() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", false);
        let lib = fx.open();

        let folder = fx.root.join(&asset.folder_name);
        // `mod.ini` from the fixture has no keybinds; this one does.
        std::fs::write(folder.join("swap.ini").as_std_path(), SWAP_INI).unwrap();

        let keybinds = lib.asset_keybinds("a1").unwrap();
        assert_eq!(keybinds.len(), 2);
        assert_eq!(keybinds[0].title, "KeySwapOutfit");
    }

    #[test]
    fn missing_folder_yields_an_empty_list() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&asset.folder_name).as_std_path()).unwrap();

        assert!(lib.asset_keybinds("a1").unwrap().is_empty());
    }
}
