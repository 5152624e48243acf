//! The on-disk library index: a single pretty-printed JSON document at
//! the root of the mods folder.

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use modshelf_core::layout;

use crate::error::Result;
use crate::types::{Asset, Entity, Preset};

/// Everything the library knows, persisted as `library.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryIndex {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

impl LibraryIndex {
    pub fn entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn asset_by_id(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub(crate) fn asset_by_id_mut(&mut self, id: &str) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    pub fn preset_by_id(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub(crate) fn preset_by_id_mut(&mut self, id: &str) -> Option<&mut Preset> {
        self.presets.iter_mut().find(|p| p.id == id)
    }
}

/// Load the index from `root`, treating a missing file as an empty library.
pub(crate) fn load_index(root: &Utf8Path) -> Result<LibraryIndex> {
    let path = layout::index_path(root);
    if !path.exists() {
        return Ok(LibraryIndex::default());
    }

    Ok(serde_json::from_str(&fs::read_to_string(
        path.as_std_path(),
    )?)?)
}

pub(crate) fn save_index(root: &Utf8Path, index: &LibraryIndex) -> Result<()> {
    let path = layout::index_path(root);
    let contents = serde_json::to_string_pretty(index)?;
    fs::write(path.as_std_path(), contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_index_loads_as_empty_library() {
        let (_dir, root) = utf8_tempdir();

        let index = load_index(&root).unwrap();
        assert!(index.entities.is_empty());
        assert!(index.assets.is_empty());
        assert!(index.presets.is_empty());
    }

    #[test]
    fn save_then_load_preserves_contents() {
        let (_dir, root) = utf8_tempdir();

        let mut index = LibraryIndex::default();
        index.entities.push(Entity {
            id: "e1".to_string(),
            name: "Raiden".to_string(),
            slug: "raiden".to_string(),
            category: "characters".to_string(),
            details: None,
        });
        save_index(&root, &index).unwrap();

        let loaded = load_index(&root).unwrap();
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entity_by_id("e1").unwrap().slug, "raiden");
    }

    #[test]
    fn corrupt_index_is_an_error() {
        let (_dir, root) = utf8_tempdir();
        std::fs::write(layout::index_path(&root).as_std_path(), "{not json").unwrap();

        assert!(load_index(&root).is_err());
    }
}
