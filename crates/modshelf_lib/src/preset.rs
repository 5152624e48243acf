//! Preset lifecycle and application.
//!
//! Applying a preset reconciles the whole library against the preset's
//! member set: members get enabled, everything else gets disabled. The
//! plan is diffed against the index, disables run before enables, and
//! per-item failures never abort the run.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::events::{EventScope, LibraryEvent};
use crate::index::LibraryIndex;
use crate::library::ModLibrary;
use crate::toggle::Applied;
use crate::types::Preset;

/// Outcome of one preset application.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Assets whose folders were renamed.
    pub changed: usize,
    /// Planned assets that turned out to already be in their target state.
    pub unchanged: usize,
    /// Human-readable failure messages, one per failed asset.
    pub failures: Vec<String>,
}

impl ModLibrary {
    /// Snapshot the currently enabled set as a new preset.
    pub fn create_preset(&self, name: &str) -> Result<Preset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Preset name cannot be empty."));
        }
        if index
            .presets
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::Validation(format!(
                "Preset name '{}' already exists.",
                name
            )));
        }

        let preset = Preset {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            asset_ids: index
                .assets
                .iter()
                .filter(|a| a.is_enabled)
                .map(|a| a.id.clone())
                .collect(),
            is_favorite: false,
            created_at: Utc::now(),
        };
        index.presets.push(preset.clone());
        self.persist(&index)?;

        info!(
            "created preset '{}' with {} member(s)",
            preset.name,
            preset.asset_ids.len()
        );
        Ok(preset)
    }

    /// Replace a preset's members with the currently enabled set.
    pub fn overwrite_preset(&self, preset_id: &str) -> Result<Preset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let snapshot: Vec<String> = index
            .assets
            .iter()
            .filter(|a| a.is_enabled)
            .map(|a| a.id.clone())
            .collect();
        let preset = index
            .preset_by_id_mut(preset_id)
            .ok_or_else(|| Error::not_found("preset", preset_id))?;
        preset.asset_ids = snapshot;
        let updated = preset.clone();
        self.persist(&index)?;

        info!(
            "overwrote preset '{}' ({} member(s))",
            updated.name,
            updated.asset_ids.len()
        );
        Ok(updated)
    }

    pub fn rename_preset(&self, preset_id: &str, new_name: &str) -> Result<Preset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::validation("Preset name cannot be empty."));
        }
        if index
            .presets
            .iter()
            .any(|p| p.id != preset_id && p.name.eq_ignore_ascii_case(new_name))
        {
            return Err(Error::Validation(format!(
                "Preset name '{}' already exists.",
                new_name
            )));
        }

        let preset = index
            .preset_by_id_mut(preset_id)
            .ok_or_else(|| Error::not_found("preset", preset_id))?;
        preset.name = new_name.to_string();
        let updated = preset.clone();
        self.persist(&index)?;
        Ok(updated)
    }

    pub fn delete_preset(&self, preset_id: &str) -> Result<()> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        if index.preset_by_id(preset_id).is_none() {
            return Err(Error::not_found("preset", preset_id));
        }
        index.presets.retain(|p| p.id != preset_id);
        self.persist(&index)?;

        info!("deleted preset {}", preset_id);
        Ok(())
    }

    pub fn set_preset_favorite(&self, preset_id: &str, is_favorite: bool) -> Result<Preset> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let preset = index
            .preset_by_id_mut(preset_id)
            .ok_or_else(|| Error::not_found("preset", preset_id))?;
        preset.is_favorite = is_favorite;
        let updated = preset.clone();
        self.persist(&index)?;
        Ok(updated)
    }

    /// Add an asset to each listed preset (unknown presets are skipped
    /// with a warning, membership is deduplicated).
    pub fn add_asset_to_presets(&self, asset_id: &str, preset_ids: &[String]) -> Result<()> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        if index.asset_by_id(asset_id).is_none() {
            return Err(Error::not_found("asset", asset_id));
        }
        add_membership(&mut index, asset_id, preset_ids);
        self.persist(&index)?;
        Ok(())
    }

    /// Make the library's enabled set exactly the preset's member set.
    ///
    /// The plan is diffed against the index: members that are disabled
    /// get enabled, non-members that are enabled get disabled, and the
    /// disable pass runs first. Stale member ids (no longer in the
    /// index) are dropped with a warning. Publishes `preset` scope
    /// events; any per-item failure turns the terminal event into
    /// `error`, but the remaining items are still processed.
    pub fn apply_preset(&self, preset_id: &str) -> Result<ApplyReport> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let preset = index
            .preset_by_id(preset_id)
            .ok_or_else(|| Error::not_found("preset", preset_id))?;
        let preset_name = preset.name.clone();

        let mut target_ids: HashSet<String> = HashSet::new();
        for member in &preset.asset_ids {
            if index.asset_by_id(member).is_some() {
                target_ids.insert(member.clone());
            } else {
                warn!(
                    "preset '{}' references unknown mod id '{}', skipping",
                    preset_name, member
                );
            }
        }

        // Disable pass first, then enable, both in index order.
        let mut plan: Vec<(String, String, bool)> = Vec::new();
        for asset in &index.assets {
            if asset.is_enabled && !target_ids.contains(&asset.id) {
                plan.push((asset.id.clone(), asset.name.clone(), false));
            }
        }
        for asset in &index.assets {
            if !asset.is_enabled && target_ids.contains(&asset.id) {
                plan.push((asset.id.clone(), asset.name.clone(), true));
            }
        }

        let total = plan.len();
        self.bus().publish(LibraryEvent::start(EventScope::Preset, total));
        info!(
            "applying preset '{}': {} state change(s) planned",
            preset_name, total
        );

        let mut report = ApplyReport::default();
        for (position, (asset_id, display_name, desired)) in plan.into_iter().enumerate() {
            self.bus().publish(LibraryEvent::progress(
                EventScope::Preset,
                position + 1,
                total,
                format!("Processing: {} ({}/{})", display_name, position + 1, total),
            ));

            match self.apply_desired_state(&mut index, &asset_id, desired) {
                Ok(Applied::Changed(_)) => report.changed += 1,
                Ok(Applied::AlreadyInState) => report.unchanged += 1,
                Err(err) => {
                    warn!("preset apply failed for '{}': {}", display_name, err);
                    report.failures.push(err.to_string());
                }
            }
        }

        if let Err(err) = self.persist(&index) {
            self.bus().publish(LibraryEvent::error(
                EventScope::Preset,
                format!("Failed to save library index: {}", err),
            ));
            return Err(err);
        }

        if report.failures.is_empty() {
            self.bus().publish(LibraryEvent::complete(
                EventScope::Preset,
                format!("Successfully applied preset ({} mods processed).", total),
            ));
        } else {
            self.bus().publish(LibraryEvent::error(
                EventScope::Preset,
                format!(
                    "Preset application completed with {} error(s).",
                    report.failures.len()
                ),
            ));
        }
        Ok(report)
    }
}

pub(crate) fn add_membership(index: &mut LibraryIndex, asset_id: &str, preset_ids: &[String]) {
    for preset_id in preset_ids {
        match index.preset_by_id_mut(preset_id) {
            Some(preset) => {
                if !preset.asset_ids.iter().any(|id| id == asset_id) {
                    preset.asset_ids.push(asset_id.to_string());
                }
            }
            None => warn!("cannot add mod to unknown preset '{}'", preset_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProgressPhase;
    use crate::test_util::LibraryFixture;

    #[test]
    fn create_preset_snapshots_enabled_mods_and_rejects_duplicates() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "On", true);
        fx.add_asset("a2", &entity, "Off", false);
        let lib = fx.open();

        let preset = lib.create_preset("  Everyday  ").unwrap();
        assert_eq!(preset.name, "Everyday");
        assert_eq!(preset.asset_ids, vec!["a1".to_string()]);

        let err = lib.create_preset("everyday").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = lib.create_preset("   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn apply_enables_members_and_disables_everything_else() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Wanted", false);
        fx.add_asset("a2", &entity, "Unwanted", true);
        fx.add_asset("a3", &entity, "Untouched Off", false);
        fx.add_preset("p1", "Minimal", &["a1"]);
        let lib = fx.open();

        let events = lib.subscribe();
        let report = lib.apply_preset("p1").unwrap();

        assert_eq!(report.changed, 2);
        assert_eq!(report.unchanged, 0);
        assert!(report.failures.is_empty());
        assert!(lib.asset("a1").unwrap().is_enabled);
        assert!(!lib.asset("a2").unwrap().is_enabled);
        assert!(!lib.asset("a3").unwrap().is_enabled);

        let seen = events.drain();
        assert_eq!(seen.first().unwrap().name(), "preset://apply_start");
        // The disable of a2 must come before the enable of a1.
        let messages: Vec<_> = seen
            .iter()
            .filter_map(|e| match &e.phase {
                ProgressPhase::Progress { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            messages,
            vec!["Processing: Unwanted (1/2)", "Processing: Wanted (2/2)"]
        );
        match &seen.last().unwrap().phase {
            ProgressPhase::Complete { summary } => {
                assert_eq!(summary, "Successfully applied preset (2 mods processed).")
            }
            other => panic!("expected complete, got {other:?}"),
        }
    }

    #[test]
    fn apply_skips_stale_member_ids_with_a_warning() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Wanted", false);
        fx.add_preset("p1", "Minimal", &["a1", "deleted-long-ago"]);
        let lib = fx.open();

        let report = lib.apply_preset("p1").unwrap();
        assert_eq!(report.changed, 1);
        assert!(report.failures.is_empty());
        // The stale id stays in the preset; applying never edits members.
        assert_eq!(lib.preset("p1").unwrap().asset_ids.len(), 2);
    }

    #[test]
    fn apply_keeps_going_after_a_failure_and_ends_in_error_event() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let broken = fx.add_asset("a1", &entity, "Broken", true);
        fx.add_asset("a2", &entity, "Wanted", false);
        fx.add_preset("p1", "Minimal", &["a2"]);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&broken.folder_name).as_std_path()).unwrap();

        let events = lib.subscribe();
        let report = lib.apply_preset("p1").unwrap();

        assert_eq!(report.changed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(lib.asset("a2").unwrap().is_enabled);

        let seen = events.drain();
        match &seen.last().unwrap().phase {
            ProgressPhase::Error { message } => {
                assert_eq!(message, "Preset application completed with 1 error(s).")
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn overwrite_replaces_members_with_current_enabled_set() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "On", true);
        fx.add_asset("a2", &entity, "Also On", true);
        fx.add_preset("p1", "Old", &["a1"]);
        let lib = fx.open();

        let updated = lib.overwrite_preset("p1").unwrap();
        assert_eq!(updated.asset_ids, vec!["a1".to_string(), "a2".to_string()]);
    }

    #[test]
    fn rename_validates_like_create() {
        let mut fx = LibraryFixture::new();
        fx.add_preset("p1", "First", &[]);
        fx.add_preset("p2", "Second", &[]);
        let lib = fx.open();

        let err = lib.rename_preset("p2", "FIRST").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // Renaming to its own name (case changed) is allowed.
        let renamed = lib.rename_preset("p2", "second").unwrap();
        assert_eq!(renamed.name, "second");
    }

    #[test]
    fn membership_helpers_deduplicate_and_skip_unknown_presets() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Red Hat", true);
        fx.add_preset("p1", "Minimal", &["a1"]);
        let lib = fx.open();

        lib.add_asset_to_presets("a1", &["p1".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(lib.preset("p1").unwrap().asset_ids, vec!["a1".to_string()]);
    }
}
