//! Importing mod archives into the library.
//!
//! An import consumes an [`ArchiveAnalysis`], extracts the chosen payload
//! into a freshly created mod folder, stages a preview image, and only
//! then registers the asset in the index. Any failure after partial
//! extraction removes the destination folder again, so no half-imported
//! mod is ever left behind.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use modshelf_archive::{extract_payload_with, ArchiveAnalysis, RootChoice, PREVIEW_CANDIDATES};
use modshelf_core::{layout, marker, naming};

use crate::error::{Error, Result};
use crate::events::{EventScope, LibraryEvent};
use crate::library::ModLibrary;
use crate::preset::add_membership;
use crate::types::Asset;

/// File name preview images are staged under inside a mod folder.
pub const PREVIEW_FILE_NAME: &str = "preview.png";

/// Where the preview image of an imported mod comes from.
#[derive(Debug, Clone, Default)]
pub enum PreviewSource {
    /// No explicit preview: fall back to an image the archive shipped.
    #[default]
    None,
    /// Raw image bytes.
    Bytes(Vec<u8>),
    /// Copy an image file from disk.
    File(Utf8PathBuf),
}

/// Everything needed to finalize an archive import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Which part of the archive becomes the mod folder.
    pub root: RootChoice,
    /// Owning entity id.
    pub entity_id: String,
    /// Display name; also the basis of the folder name.
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub preview: PreviewSource,
    /// Presets the new asset joins after registration.
    pub add_to_presets: Vec<String>,
}

fn entry_in_root(path: &str, root: &RootChoice) -> bool {
    match root {
        RootChoice::All => true,
        RootChoice::Under(prefix) => {
            let prefix = prefix.trim_end_matches('/');
            path.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some()
        }
    }
}

impl ModLibrary {
    /// Extract an analyzed archive into the library and register the
    /// resulting asset, enabled, under the requested entity.
    ///
    /// Publishes `import` scope events with one `progress` per extracted
    /// file. Duplicate folders are refused before any extraction work.
    pub fn import_archive(
        &self,
        analysis: &ArchiveAnalysis,
        request: &ImportRequest,
    ) -> Result<Asset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Mod name cannot be empty."));
        }
        let entity = index
            .entity_by_id(&request.entity_id)
            .cloned()
            .ok_or_else(|| Error::not_found("entity", request.entity_id.clone()))?;

        let folder = naming::sanitize_folder_name(name);
        if folder.is_empty() {
            return Err(Error::Validation(format!(
                "Mod name '{}' does not produce a usable folder name.",
                name
            )));
        }
        let rel_dir = layout::asset_rel_dir(&entity.category, &entity.slug, &folder);

        if let Some(existing) = index.assets.iter().find(|a| a.clean_folder() == rel_dir) {
            return Err(Error::Validation(format!(
                "A mod already uses folder '{}' ({}).",
                rel_dir, existing.name
            )));
        }
        let dest = self.root().join(&rel_dir);
        let disabled_dest = self.root().join(marker::to_disabled(&rel_dir));
        if dest.exists() || disabled_dest.exists() {
            return Err(Error::Validation(format!(
                "Target folder '{}' already exists.",
                rel_dir
            )));
        }

        fs::create_dir_all(dest.as_std_path())?;

        let total = analysis
            .entries
            .iter()
            .filter(|e| !e.is_dir && entry_in_root(&e.path, &request.root))
            .count();
        self.bus().publish(LibraryEvent::start(EventScope::Import, total));

        let mut processed = 0usize;
        let extract_result =
            extract_payload_with(&analysis.archive_path, &request.root, &dest, |path| {
                processed += 1;
                self.bus().publish(LibraryEvent::progress(
                    EventScope::Import,
                    processed,
                    total,
                    format!("Extracting: {} ({}/{})", path, processed, total),
                ));
            });
        let extracted = match extract_result {
            Ok(extracted) => extracted,
            Err(err) => {
                let _ = fs::remove_dir_all(dest.as_std_path());
                self.bus()
                    .publish(LibraryEvent::error(EventScope::Import, err.to_string()));
                return Err(err.into());
            }
        };
        if extracted == 0 {
            let _ = fs::remove_dir_all(dest.as_std_path());
            let message = "Archive produced no files for the chosen root.";
            self.bus()
                .publish(LibraryEvent::error(EventScope::Import, message));
            return Err(Error::validation(message));
        }

        // A missing or unreadable preview never fails the import.
        let image = match stage_preview(&dest, &request.preview) {
            Ok(image) => image,
            Err(err) => {
                warn!("failed to stage preview image: {}", err);
                None
            }
        };

        let asset = Asset {
            id: Uuid::new_v4().to_string(),
            entity_id: entity.id.clone(),
            name: name.to_string(),
            description: request.description.clone(),
            author: request.author.clone(),
            tags: request.tags.clone(),
            image,
            details: None,
            folder_name: rel_dir.clone(),
            is_enabled: true,
            installed_at: Utc::now(),
        };
        index.assets.push(asset.clone());
        add_membership(&mut index, &asset.id, &request.add_to_presets);

        if let Err(err) = self.persist(&index) {
            // Roll the registration back so the index file and disk agree.
            index.assets.retain(|a| a.id != asset.id);
            for preset in index.presets.iter_mut() {
                preset.asset_ids.retain(|id| id != &asset.id);
            }
            let _ = fs::remove_dir_all(dest.as_std_path());
            self.bus()
                .publish(LibraryEvent::error(EventScope::Import, err.to_string()));
            return Err(err);
        }

        self.bus().publish(LibraryEvent::complete(
            EventScope::Import,
            format!("Imported '{}' ({} files).", asset.name, extracted),
        ));
        info!("imported mod '{}' into {}", asset.name, rel_dir);
        Ok(asset)
    }
}

/// Put the preview image in place and return the file name the asset
/// should record, if any.
fn stage_preview(dest: &Utf8Path, source: &PreviewSource) -> Result<Option<String>> {
    match source {
        PreviewSource::Bytes(bytes) => {
            fs::write(dest.join(PREVIEW_FILE_NAME).as_std_path(), bytes)?;
            Ok(Some(PREVIEW_FILE_NAME.to_string()))
        }
        PreviewSource::File(path) => {
            fs::copy(
                path.as_std_path(),
                dest.join(PREVIEW_FILE_NAME).as_std_path(),
            )?;
            Ok(Some(PREVIEW_FILE_NAME.to_string()))
        }
        PreviewSource::None => {
            let mut names = Vec::new();
            for entry in fs::read_dir(dest.as_std_path())?.flatten() {
                if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            for candidate in PREVIEW_CANDIDATES {
                if let Some(name) = names.iter().find(|n| n.eq_ignore_ascii_case(candidate)) {
                    return Ok(Some(name.clone()));
                }
            }
            Ok(None)
        }
    }
}
