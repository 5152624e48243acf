//! Shared fixtures for library tests.

use camino::Utf8PathBuf;
use chrono::Utc;

use modshelf_core::{layout, marker, naming};

use crate::index::{save_index, LibraryIndex};
use crate::library::ModLibrary;
use crate::types::{Asset, Entity, Preset};

/// An in-memory index plus a tempdir with matching mod folders.
pub(crate) struct LibraryFixture {
    _dir: tempfile::TempDir,
    pub root: Utf8PathBuf,
    pub index: LibraryIndex,
}

impl LibraryFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Self {
            _dir: dir,
            root,
            index: LibraryIndex::default(),
        }
    }

    pub fn add_entity(&mut self, id: &str, name: &str, category: &str) -> Entity {
        let entity = Entity {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug::slugify(name),
            category: category.to_string(),
            details: None,
        };
        self.index.entities.push(entity.clone());
        entity
    }

    /// Register an asset and create its folder on disk, in the naming
    /// form that matches `enabled`.
    pub fn add_asset(&mut self, id: &str, entity: &Entity, name: &str, enabled: bool) -> Asset {
        let folder = naming::sanitize_folder_name(name);
        let clean_rel = layout::asset_rel_dir(&entity.category, &entity.slug, &folder);
        let rel = marker::with_state(&clean_rel, enabled);

        let abs = self.root.join(&rel);
        std::fs::create_dir_all(abs.as_std_path()).unwrap();
        std::fs::write(abs.join("mod.ini").as_std_path(), "[Mod]\n").unwrap();

        let asset = Asset {
            id: id.to_string(),
            entity_id: entity.id.clone(),
            name: name.to_string(),
            description: None,
            author: None,
            tags: None,
            image: None,
            details: None,
            folder_name: rel,
            is_enabled: enabled,
            installed_at: Utc::now(),
        };
        self.index.assets.push(asset.clone());
        asset
    }

    pub fn add_preset(&mut self, id: &str, name: &str, asset_ids: &[&str]) -> Preset {
        let preset = Preset {
            id: id.to_string(),
            name: name.to_string(),
            asset_ids: asset_ids.iter().map(|id| id.to_string()).collect(),
            is_favorite: false,
            created_at: Utc::now(),
        };
        self.index.presets.push(preset.clone());
        preset
    }

    /// Persist the index and open a library handle over the fixture.
    pub fn open(&self) -> ModLibrary {
        save_index(&self.root, &self.index).unwrap();
        ModLibrary::open(self.root.clone()).unwrap()
    }
}
