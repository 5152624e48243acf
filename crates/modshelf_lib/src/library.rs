//! The [`ModLibrary`] handle: an opened mods folder plus its index.

use std::fs::{self, File};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use modshelf_core::layout;

use crate::error::{Error, Result};
use crate::events::{EventBus, EventSubscription};
use crate::index::{self, LibraryIndex};
use crate::types::{Asset, Entity, Preset};

/// An opened mod library.
///
/// All state lives under a single root folder: the mod directories, the
/// `library.json` index, and a `library.lock` file that serializes
/// mutating operations across processes. The handle itself is cheap to
/// share behind an `Arc`; reads take a short internal lock, mutating
/// operations additionally hold the cross-process file lock for their
/// whole duration.
#[derive(Debug)]
pub struct ModLibrary {
    root: Utf8PathBuf,
    index: Mutex<LibraryIndex>,
    bus: EventBus,
    op_gate: Mutex<()>,
    lock_path: Utf8PathBuf,
}

/// Held for the duration of one mutating operation.
///
/// Dropping the guard releases both the in-process gate and the
/// cross-process file lock.
pub(crate) struct OpGuard<'a> {
    _gate: MutexGuard<'a, ()>,
    lock_file: File,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.lock_file);
    }
}

impl ModLibrary {
    /// Open the library rooted at `root`, loading its index.
    ///
    /// The folder must already exist; a missing index file is treated as
    /// an empty library.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::Validation(format!(
                "mods folder does not exist: {}",
                root
            )));
        }

        let index = index::load_index(&root)?;
        debug!(
            "opened library at {} ({} entities, {} mods, {} presets)",
            root,
            index.entities.len(),
            index.assets.len(),
            index.presets.len()
        );

        let lock_path = layout::lock_path(&root);
        Ok(Self {
            root,
            index: Mutex::new(index),
            bus: EventBus::default(),
            op_gate: Mutex::new(()),
            lock_path,
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Subscribe to progress events from bulk operations.
    pub fn subscribe(&self) -> EventSubscription {
        self.bus.subscribe()
    }

    pub(crate) fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Acquire both mutation locks, failing fast when another operation
    /// (in this process or another) is underway.
    pub(crate) fn begin_mutation(&self) -> Result<OpGuard<'_>> {
        let gate = match self.op_gate.try_lock() {
            Ok(gate) => gate,
            Err(TryLockError::WouldBlock) => return Err(Error::OperationInProgress),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let lock_file = File::create(self.lock_path.as_std_path())?;
        if let Err(err) = fs2::FileExt::try_lock_exclusive(&lock_file) {
            if err.kind() == fs2::lock_contended_error().kind() {
                return Err(Error::OperationInProgress);
            }
            return Err(err.into());
        }

        Ok(OpGuard {
            _gate: gate,
            lock_file,
        })
    }

    pub(crate) fn index_lock(&self) -> MutexGuard<'_, LibraryIndex> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn persist(&self, index: &LibraryIndex) -> Result<()> {
        index::save_index(&self.root, index)
    }

    /// All entities, in index order.
    pub fn entities(&self) -> Vec<Entity> {
        self.index_lock().entities.clone()
    }

    /// All assets, in index order.
    pub fn assets(&self) -> Vec<Asset> {
        self.index_lock().assets.clone()
    }

    /// All presets, in index order.
    pub fn presets(&self) -> Vec<Preset> {
        self.index_lock().presets.clone()
    }

    pub fn asset(&self, asset_id: &str) -> Result<Asset> {
        self.index_lock()
            .asset_by_id(asset_id)
            .cloned()
            .ok_or_else(|| Error::not_found("asset", asset_id))
    }

    pub fn entity(&self, entity_id: &str) -> Result<Entity> {
        self.index_lock()
            .entity_by_id(entity_id)
            .cloned()
            .ok_or_else(|| Error::not_found("entity", entity_id))
    }

    pub fn preset(&self, preset_id: &str) -> Result<Preset> {
        self.index_lock()
            .preset_by_id(preset_id)
            .cloned()
            .ok_or_else(|| Error::not_found("preset", preset_id))
    }

    /// Resolve a user-supplied reference to an asset: an exact id first,
    /// then a unique case-insensitive name match.
    pub fn resolve_asset(&self, reference: &str) -> Result<Asset> {
        let index = self.index_lock();
        if let Some(asset) = index.asset_by_id(reference) {
            return Ok(asset.clone());
        }

        let mut matches = index
            .assets
            .iter()
            .filter(|a| a.name.eq_ignore_ascii_case(reference));
        match (matches.next(), matches.next()) {
            (Some(asset), None) => Ok(asset.clone()),
            (Some(_), Some(_)) => Err(Error::Validation(format!(
                "mod name '{}' is ambiguous, use its id instead",
                reference
            ))),
            _ => Err(Error::not_found("asset", reference)),
        }
    }

    /// Resolve a user-supplied reference to an entity: id, then unique
    /// slug, then unique case-insensitive name.
    pub fn resolve_entity(&self, reference: &str) -> Result<Entity> {
        let index = self.index_lock();
        if let Some(entity) = index.entity_by_id(reference) {
            return Ok(entity.clone());
        }

        let keys: [fn(&Entity) -> &str; 2] = [|e| e.slug.as_str(), |e| e.name.as_str()];
        for key in keys {
            let mut matches = index
                .entities
                .iter()
                .filter(|e| key(e).eq_ignore_ascii_case(reference));
            match (matches.next(), matches.next()) {
                (Some(entity), None) => return Ok(entity.clone()),
                (Some(_), Some(_)) => {
                    return Err(Error::Validation(format!(
                        "entity '{}' is ambiguous, use its id instead",
                        reference
                    )))
                }
                _ => {}
            }
        }
        Err(Error::not_found("entity", reference))
    }

    /// Resolve a user-supplied reference to a preset: an exact id first,
    /// then a unique case-insensitive name match.
    pub fn resolve_preset(&self, reference: &str) -> Result<Preset> {
        let index = self.index_lock();
        if let Some(preset) = index.preset_by_id(reference) {
            return Ok(preset.clone());
        }

        let mut matches = index
            .presets
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(reference));
        match (matches.next(), matches.next()) {
            (Some(preset), None) => Ok(preset.clone()),
            (Some(_), Some(_)) => Err(Error::Validation(format!(
                "preset name '{}' is ambiguous, use its id instead",
                reference
            ))),
            _ => Err(Error::not_found("preset", reference)),
        }
    }

    /// Absolute on-disk path of an asset's folder, in its literal form.
    pub fn asset_abs_path(&self, asset_id: &str) -> Result<Utf8PathBuf> {
        let asset = self.asset(asset_id)?;
        Ok(self.root.join(&asset.folder_name))
    }
}

/// Create the library folder if needed and open it.
///
/// Unlike [`ModLibrary::open`], this is forgiving about a missing root;
/// it exists for first-run setup.
pub fn create_or_open(root: impl Into<Utf8PathBuf>) -> Result<ModLibrary> {
    let root = root.into();
    if !root.exists() {
        fs::create_dir_all(root.as_std_path()).map_err(|err| {
            Error::Io(io::Error::new(
                err.kind(),
                format!("cannot create mods folder {}: {}", root, err),
            ))
        })?;
    }
    ModLibrary::open(root)
}
