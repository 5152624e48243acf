//! Enabling and disabling mods by renaming their folders.
//!
//! A mod is enabled when its folder carries its clean name and disabled
//! when the folder name starts with the `DISABLED_` marker. The current
//! state is always derived from what is on disk, so an index that lags a
//! manual rename heals on the next toggle.

use std::fs;
use std::io;

use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

use modshelf_core::marker;

use crate::error::{Error, Result};
use crate::events::{EventScope, LibraryEvent};
use crate::index::LibraryIndex;
use crate::library::ModLibrary;

/// What one state change actually did on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    /// The folder was renamed into the form matching the new state.
    Changed(bool),
    /// The folder already had the desired form; nothing was done.
    AlreadyInState,
}

/// Disk-derived facts about one asset's folder.
pub(crate) struct DiskProbe {
    pub asset_name: String,
    pub clean_rel: Utf8PathBuf,
    pub marked_rel: Utf8PathBuf,
    pub currently_enabled: bool,
}

/// Outcome of one item of a bulk toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The folder was renamed; the asset now has the given enabled state.
    Toggled { enabled: bool },
    /// Already in the desired state; nothing was done.
    Skipped,
    /// The toggle failed; the index entry was left untouched.
    Failed { message: String },
}

/// Per-item record of a bulk toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub asset_id: String,
    pub outcome: ItemOutcome,
}

/// Aggregate shape of a bulk toggle outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    AllSucceeded,
    PartialFailure,
    /// Every attempted item failed (skips are not attempts).
    TotalFailure,
}

/// Everything a bulk toggle did, item by item.
#[derive(Debug, Clone)]
pub struct BulkToggleReport {
    pub items: Vec<ItemResult>,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BulkToggleReport {
    fn from_items(items: Vec<ItemResult>) -> Self {
        let success = items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Toggled { .. }))
            .count();
        let failed = items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Failed { .. }))
            .count();
        let skipped = items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Skipped))
            .count();
        Self {
            items,
            success,
            failed,
            skipped,
        }
    }

    pub fn outcome(&self) -> BulkOutcome {
        if self.failed == 0 {
            BulkOutcome::AllSucceeded
        } else if self.success == 0 {
            BulkOutcome::TotalFailure
        } else {
            BulkOutcome::PartialFailure
        }
    }

    pub fn summary(&self) -> String {
        match self.outcome() {
            BulkOutcome::AllSucceeded => {
                format!("{} succeeded, {} skipped.", self.success, self.skipped)
            }
            _ => format!(
                "{} succeeded, {} failed, {} skipped.",
                self.success, self.failed, self.skipped
            ),
        }
    }
}

impl ModLibrary {
    /// Read an asset's folder state from disk, probing the enabled form
    /// first, then the disabled form.
    pub(crate) fn probe_asset_on_disk(
        &self,
        index: &LibraryIndex,
        asset_id: &str,
    ) -> Result<DiskProbe> {
        let asset = index
            .asset_by_id(asset_id)
            .ok_or_else(|| Error::not_found("asset", asset_id))?;
        let clean_rel = asset.clean_folder();
        let marked_rel = marker::to_disabled(&clean_rel);

        let currently_enabled = if self.root().join(&clean_rel).is_dir() {
            true
        } else if self.root().join(&marked_rel).is_dir() {
            false
        } else {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "mod folder for '{}' not found on disk (checked {} and {})",
                    asset.name, clean_rel, marked_rel
                ),
            )));
        };

        Ok(DiskProbe {
            asset_name: asset.name.clone(),
            clean_rel,
            marked_rel,
            currently_enabled,
        })
    }

    /// Bring one asset's folder into `desired` state and mirror the
    /// result in the index entry. The entry's `folder_name` and
    /// `is_enabled` are only rewritten after the rename succeeded, and
    /// always together.
    pub(crate) fn apply_desired_state(
        &self,
        index: &mut LibraryIndex,
        asset_id: &str,
        desired: bool,
    ) -> Result<Applied> {
        let probe = self.probe_asset_on_disk(index, asset_id)?;
        if probe.currently_enabled == desired {
            return Ok(Applied::AlreadyInState);
        }

        let (source_rel, target_rel) = if desired {
            (probe.marked_rel, probe.clean_rel)
        } else {
            (probe.clean_rel, probe.marked_rel)
        };
        let source = self.root().join(&source_rel);
        let target = self.root().join(&target_rel);
        fs::rename(source.as_std_path(), target.as_std_path()).map_err(|err| {
            Error::Io(io::Error::new(
                err.kind(),
                format!("failed to rename '{}' to '{}': {}", source, target, err),
            ))
        })?;
        debug!("renamed '{}' -> '{}'", source_rel, target_rel);

        if let Some(asset) = index.asset_by_id_mut(asset_id) {
            asset.folder_name = target_rel;
            asset.is_enabled = desired;
        }
        Ok(Applied::Changed(desired))
    }

    /// Flip one asset between enabled and disabled, returning the new
    /// state. No progress events are emitted for a single toggle.
    pub fn toggle_asset(&self, asset_id: &str) -> Result<bool> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let probe = self.probe_asset_on_disk(&index, asset_id)?;
        let desired = !probe.currently_enabled;
        self.apply_desired_state(&mut index, asset_id, desired)?;
        self.persist(&index)?;

        info!("toggled mod '{}' to enabled={}", probe.asset_name, desired);
        Ok(desired)
    }

    /// Set one asset to an explicit state, returning what was done.
    pub fn set_asset_enabled(&self, asset_id: &str, enabled: bool) -> Result<bool> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let applied = self.apply_desired_state(&mut index, asset_id, enabled)?;
        if applied == Applied::AlreadyInState {
            return Ok(enabled);
        }
        self.persist(&index)?;

        info!("set mod '{}' to enabled={}", asset_id, enabled);
        Ok(enabled)
    }

    /// Bring every listed asset into `desired` state.
    ///
    /// Items are processed in order and failures never abort the run;
    /// each item ends up as one [`ItemResult`]. The operation publishes
    /// `toggle` scope events: `start`, one `progress` per item (emitted
    /// before the item is processed), then `complete`, or `error` when
    /// every attempted item failed. The index is saved once at the end.
    pub fn bulk_toggle(&self, asset_ids: &[String], desired: bool) -> Result<BulkToggleReport> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let total = asset_ids.len();
        self.bus().publish(LibraryEvent::start(EventScope::Toggle, total));

        let items: Vec<ItemResult> = asset_ids
            .iter()
            .enumerate()
            .map(|(position, asset_id)| {
                let display = index
                    .asset_by_id(asset_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| asset_id.clone());
                self.bus().publish(LibraryEvent::progress(
                    EventScope::Toggle,
                    position + 1,
                    total,
                    format!("Processing: {} ({}/{})", display, position + 1, total),
                ));

                let outcome = match self.apply_desired_state(&mut index, asset_id, desired) {
                    Ok(Applied::Changed(enabled)) => ItemOutcome::Toggled { enabled },
                    Ok(Applied::AlreadyInState) => ItemOutcome::Skipped,
                    Err(err) => {
                        warn!("bulk toggle failed for '{}': {}", asset_id, err);
                        ItemOutcome::Failed {
                            message: err.to_string(),
                        }
                    }
                };
                ItemResult {
                    asset_id: asset_id.clone(),
                    outcome,
                }
            })
            .collect();

        let report = BulkToggleReport::from_items(items);
        if let Err(err) = self.persist(&index) {
            self.bus().publish(LibraryEvent::error(
                EventScope::Toggle,
                format!("Failed to save library index: {}", err),
            ));
            return Err(err);
        }

        match report.outcome() {
            BulkOutcome::TotalFailure => self
                .bus()
                .publish(LibraryEvent::error(EventScope::Toggle, report.summary())),
            _ => self
                .bus()
                .publish(LibraryEvent::complete(EventScope::Toggle, report.summary())),
        }
        info!(
            "bulk toggle finished: {} succeeded, {} failed, {} skipped",
            report.success, report.failed, report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProgressPhase;
    use crate::test_util::LibraryFixture;

    #[test]
    fn toggle_renames_folder_and_updates_index_both_ways() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        let lib = fx.open();

        let clean = fx.root.join(&asset.folder_name);
        let marked = fx.root.join(marker::to_disabled(&asset.folder_name));

        assert!(!lib.toggle_asset("a1").unwrap());
        assert!(!clean.is_dir());
        assert!(marked.is_dir());
        let entry = lib.asset("a1").unwrap();
        assert!(!entry.is_enabled);
        assert_eq!(entry.folder_name, marker::to_disabled(&asset.folder_name));

        assert!(lib.toggle_asset("a1").unwrap());
        assert!(clean.is_dir());
        assert!(!marked.is_dir());
        let entry = lib.asset("a1").unwrap();
        assert!(entry.is_enabled);
        assert_eq!(entry.folder_name, asset.folder_name);
    }

    #[test]
    fn toggle_derives_state_from_disk_when_index_is_stale() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        // Index claims the mod is disabled, but the folder on disk still
        // has its clean name.
        let stale = fx.index.asset_by_id_mut("a1").unwrap();
        stale.is_enabled = false;
        stale.folder_name = marker::to_disabled(&asset.folder_name);
        let lib = fx.open();

        assert!(!lib.toggle_asset("a1").unwrap());
        let entry = lib.asset("a1").unwrap();
        assert!(!entry.is_enabled);
        assert!(fx
            .root
            .join(marker::to_disabled(&asset.folder_name))
            .is_dir());
    }

    #[test]
    fn toggle_with_missing_folder_fails_and_leaves_index_alone() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&asset.folder_name).as_std_path()).unwrap();

        let err = lib.toggle_asset("a1").unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {err:?}");
        let entry = lib.asset("a1").unwrap();
        assert!(entry.is_enabled);
        assert_eq!(entry.folder_name, asset.folder_name);
    }

    #[test]
    fn bulk_toggle_reports_per_item_outcomes() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Already On", true);
        fx.add_asset("a2", &entity, "Currently Off", false);
        let gone = fx.add_asset("a3", &entity, "Gone", false);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&gone.folder_name).as_std_path()).unwrap();

        let events = lib.subscribe();
        let ids: Vec<String> = ["a1", "a2", "a3"].iter().map(|s| s.to_string()).collect();
        let report = lib.bulk_toggle(&ids, true).unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.outcome(), BulkOutcome::PartialFailure);
        assert_eq!(report.items[0].outcome, ItemOutcome::Skipped);
        assert_eq!(report.items[1].outcome, ItemOutcome::Toggled { enabled: true });
        assert!(matches!(report.items[2].outcome, ItemOutcome::Failed { .. }));

        // One success means the terminal event is still `complete`; the
        // failure shows up in the summary instead.
        let seen = events.drain();
        assert_eq!(seen.first().unwrap().name(), "toggle://apply_start");
        let progress: Vec<_> = seen
            .iter()
            .filter(|e| matches!(e.phase, ProgressPhase::Progress { .. }))
            .collect();
        assert_eq!(progress.len(), 3);
        match &seen.last().unwrap().phase {
            ProgressPhase::Complete { summary } => {
                assert_eq!(summary, "1 succeeded, 1 failed, 1 skipped.")
            }
            other => panic!("expected complete, got {other:?}"),
        }

        assert!(lib.asset("a2").unwrap().is_enabled);
    }

    #[test]
    fn bulk_toggle_with_only_failures_ends_in_error_event() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let a = fx.add_asset("a1", &entity, "First", false);
        let b = fx.add_asset("a2", &entity, "Second", false);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&a.folder_name).as_std_path()).unwrap();
        std::fs::remove_dir_all(fx.root.join(&b.folder_name).as_std_path()).unwrap();

        let events = lib.subscribe();
        let ids: Vec<String> = ["a1", "a2"].iter().map(|s| s.to_string()).collect();
        let report = lib.bulk_toggle(&ids, true).unwrap();

        assert_eq!(report.outcome(), BulkOutcome::TotalFailure);
        let seen = events.drain();
        assert_eq!(seen.last().unwrap().name(), "toggle://apply_error");
    }

    #[test]
    fn unknown_id_in_bulk_is_a_per_item_failure() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Known", false);
        let lib = fx.open();

        let ids: Vec<String> = ["a1", "nope"].iter().map(|s| s.to_string()).collect();
        let report = lib.bulk_toggle(&ids, true).unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 1);
        assert!(matches!(
            report.items[1].outcome,
            ItemOutcome::Failed { .. }
        ));
    }

    #[test]
    fn concurrent_mutations_are_rejected() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Red Hat", true);
        let lib = fx.open();

        let guard = lib.begin_mutation().unwrap();
        let err = lib.toggle_asset("a1").unwrap_err();
        assert!(matches!(err, Error::OperationInProgress));
        drop(guard);

        // A second handle on the same root is held off by the file lock.
        let other = fx.open();
        let _guard = lib.begin_mutation().unwrap();
        let err = other.toggle_asset("a1").unwrap_err();
        assert!(matches!(err, Error::OperationInProgress));
    }
}
