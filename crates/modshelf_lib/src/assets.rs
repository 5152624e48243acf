//! Asset removal, metadata editing, and entity management.

use std::fs;

use camino::Utf8PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use modshelf_core::{layout, marker};

use crate::error::{Error, Result};
use crate::launch;
use crate::library::ModLibrary;
use crate::types::{Asset, AssetPatch, Entity, EntityWithCounts};

impl ModLibrary {
    /// Remove an asset's folder and index entry, pruning its id from
    /// every preset. A folder already gone from disk is a warning, not
    /// an error; the entry is removed either way.
    pub fn delete_asset(&self, asset_id: &str) -> Result<()> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let asset = index
            .asset_by_id(asset_id)
            .cloned()
            .ok_or_else(|| Error::not_found("asset", asset_id))?;

        let clean_abs = self.root().join(asset.clean_folder());
        let marked_abs = self.root().join(marker::to_disabled(asset.clean_folder()));
        if clean_abs.is_dir() {
            fs::remove_dir_all(clean_abs.as_std_path())?;
        } else if marked_abs.is_dir() {
            fs::remove_dir_all(marked_abs.as_std_path())?;
        } else {
            warn!(
                "folder for mod '{}' not found on disk, removing index entry only",
                asset.name
            );
        }

        index.assets.retain(|a| a.id != asset_id);
        for preset in index.presets.iter_mut() {
            preset.asset_ids.retain(|id| id != asset_id);
        }
        self.persist(&index)?;

        info!("deleted mod '{}' ({})", asset.name, asset_id);
        Ok(())
    }

    /// Edit an asset's display metadata and optionally move it under
    /// another entity.
    ///
    /// A move renames the folder on disk first, preserving its current
    /// enabled/disabled naming form; a failed rename leaves the metadata
    /// untouched.
    pub fn update_asset_info(&self, asset_id: &str, patch: AssetPatch) -> Result<Asset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let current = index
            .asset_by_id(asset_id)
            .cloned()
            .ok_or_else(|| Error::not_found("asset", asset_id))?;

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(Error::validation("Mod name cannot be empty."));
            }
        }

        let mut moved: Option<(Utf8PathBuf, bool)> = None;
        if let Some(entity_id) = &patch.new_entity_id {
            if *entity_id != current.entity_id {
                let entity = index
                    .entity_by_id(entity_id)
                    .cloned()
                    .ok_or_else(|| Error::not_found("entity", entity_id.clone()))?;

                let probe = self.probe_asset_on_disk(&index, asset_id)?;
                let leaf = probe
                    .clean_rel
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        Error::Validation(format!(
                            "mod folder name '{}' is empty",
                            current.folder_name
                        ))
                    })?;
                let target_clean = layout::asset_rel_dir(&entity.category, &entity.slug, &leaf);
                let target_rel = marker::with_state(&target_clean, probe.currently_enabled);

                let source_rel = marker::with_state(&probe.clean_rel, probe.currently_enabled);
                let source_abs = self.root().join(&source_rel);
                let target_abs = self.root().join(&target_rel);
                if target_abs.exists() {
                    return Err(Error::Validation(format!(
                        "Target folder '{}' already exists.",
                        target_rel
                    )));
                }
                if let Some(parent) = target_abs.parent() {
                    fs::create_dir_all(parent.as_std_path())?;
                }
                fs::rename(source_abs.as_std_path(), target_abs.as_std_path())?;
                info!("moved mod folder '{}' -> '{}'", source_rel, target_rel);
                moved = Some((target_rel, probe.currently_enabled));
            }
        }

        let asset = index
            .asset_by_id_mut(asset_id)
            .ok_or_else(|| Error::not_found("asset", asset_id))?;
        if let Some(name) = patch.name {
            asset.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            asset.description = Some(description);
        }
        if let Some(author) = patch.author {
            asset.author = Some(author);
        }
        if let Some(tags) = patch.tags {
            asset.tags = Some(tags);
        }
        if let Some(details) = patch.details {
            asset.details = Some(details);
        }
        if let Some((folder_name, is_enabled)) = moved {
            asset.folder_name = folder_name;
            asset.is_enabled = is_enabled;
        }
        if let Some(entity_id) = patch.new_entity_id {
            asset.entity_id = entity_id;
        }

        let updated = asset.clone();
        self.persist(&index)?;
        Ok(updated)
    }

    /// Reveal the asset's folder in the platform file browser, probing
    /// both on-disk forms so a stale index entry still resolves.
    pub fn open_asset_folder(&self, asset_id: &str) -> Result<()> {
        let path = {
            let index = self.index_lock();
            let probe = self.probe_asset_on_disk(&index, asset_id)?;
            let rel = if probe.currently_enabled {
                probe.clean_rel
            } else {
                probe.marked_rel
            };
            self.root().join(rel)
        };
        launch::reveal_in_file_browser(&path)
    }

    /// Assets belonging to one entity, in index order.
    pub fn assets_for_entity(&self, entity_id: &str) -> Result<Vec<Asset>> {
        let index = self.index_lock();
        if index.entity_by_id(entity_id).is_none() {
            return Err(Error::not_found("entity", entity_id));
        }
        Ok(index
            .assets
            .iter()
            .filter(|a| a.entity_id == entity_id)
            .cloned()
            .collect())
    }

    /// Entities (optionally filtered by category), each with total and
    /// enabled mod counts.
    pub fn entities_with_counts(&self, category: Option<&str>) -> Vec<EntityWithCounts> {
        let index = self.index_lock();
        index
            .entities
            .iter()
            .filter(|entity| {
                category
                    .map(|c| entity.category.eq_ignore_ascii_case(c))
                    .unwrap_or(true)
            })
            .map(|entity| {
                let mods: Vec<_> = index
                    .assets
                    .iter()
                    .filter(|a| a.entity_id == entity.id)
                    .collect();
                EntityWithCounts {
                    entity: entity.clone(),
                    total_mods: mods.len(),
                    enabled_mods: mods.iter().filter(|a| a.is_enabled).count(),
                }
            })
            .collect()
    }

    /// Distinct categories present in the library, sorted.
    pub fn categories(&self) -> Vec<String> {
        let index = self.index_lock();
        let mut categories: Vec<String> =
            index.entities.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Create a new entity under `category`.
    pub fn create_entity(&self, name: &str, category: &str) -> Result<Entity> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Entity name cannot be empty."));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::validation("Category cannot be empty."));
        }

        let slug = slug::slugify(name);
        if index
            .entities
            .iter()
            .any(|e| e.category.eq_ignore_ascii_case(category) && e.slug == slug)
        {
            return Err(Error::Validation(format!(
                "Entity '{}' already exists in category '{}'.",
                name, category
            )));
        }

        let entity = Entity {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug,
            category: category.to_string(),
            details: None,
        };
        index.entities.push(entity.clone());
        self.persist(&index)?;

        info!(
            "created entity '{}' in category '{}'",
            entity.name, entity.category
        );
        Ok(entity)
    }
}
