//! Reconciling the index with what is actually on disk.

use tracing::{debug, info, warn};

use modshelf_core::marker;

use crate::error::Result;
use crate::library::ModLibrary;

/// What a disk consistency pass found.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Ids of assets whose index entry was rewritten from disk truth.
    pub repaired: Vec<String>,
    /// Ids of assets whose folder exists in neither naming form.
    pub missing: Vec<String>,
}

impl ModLibrary {
    /// Rewrite stale index entries from the on-disk naming form.
    ///
    /// Manual renames or a crash between a folder rename and the index
    /// save leave `folder_name`/`is_enabled` out of date; this pass
    /// restores them from disk. Assets whose folder is gone in both
    /// forms are reported but their entries are kept.
    pub fn refresh_from_disk(&self) -> Result<RefreshReport> {
        let _op = self.begin_mutation()?;
        let mut index = self.index_lock();

        let mut report = RefreshReport::default();
        for asset in index.assets.iter_mut() {
            let clean_rel = marker::to_enabled(&asset.folder_name);
            let marked_rel = marker::to_disabled(&clean_rel);

            let disk_enabled = if self.root().join(&clean_rel).is_dir() {
                Some(true)
            } else if self.root().join(&marked_rel).is_dir() {
                Some(false)
            } else {
                None
            };

            match disk_enabled {
                Some(enabled) => {
                    let expected = marker::with_state(&clean_rel, enabled);
                    if asset.folder_name != expected || asset.is_enabled != enabled {
                        debug!("repairing index entry for '{}' from disk", asset.name);
                        asset.folder_name = expected;
                        asset.is_enabled = enabled;
                        report.repaired.push(asset.id.clone());
                    }
                }
                None => {
                    warn!(
                        "mod folder missing on disk in both forms: {}",
                        asset.folder_name
                    );
                    report.missing.push(asset.id.clone());
                }
            }
        }

        if !report.repaired.is_empty() {
            self.persist(&index)?;
        }
        info!(
            "refresh: {} repaired, {} missing",
            report.repaired.len(),
            report.missing.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::LibraryFixture;

    #[test]
    fn refresh_repairs_entries_after_manual_renames() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        fx.add_asset("a2", &entity, "Untouched", false);
        let lib = fx.open();

        // Disable the folder behind the library's back.
        let clean = fx.root.join(&asset.folder_name);
        let marked = fx.root.join(marker::to_disabled(&asset.folder_name));
        std::fs::rename(clean.as_std_path(), marked.as_std_path()).unwrap();

        let report = lib.refresh_from_disk().unwrap();
        assert_eq!(report.repaired, vec!["a1".to_string()]);
        assert!(report.missing.is_empty());

        let entry = lib.asset("a1").unwrap();
        assert!(!entry.is_enabled);
        assert_eq!(entry.folder_name, marker::to_disabled(&asset.folder_name));
        assert!(lib.asset("a2").unwrap().folder_name.as_str().contains("DISABLED_"));
    }

    #[test]
    fn refresh_reports_missing_folders_without_dropping_entries() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        let asset = fx.add_asset("a1", &entity, "Red Hat", true);
        let lib = fx.open();
        std::fs::remove_dir_all(fx.root.join(&asset.folder_name).as_std_path()).unwrap();

        let report = lib.refresh_from_disk().unwrap();
        assert!(report.repaired.is_empty());
        assert_eq!(report.missing, vec!["a1".to_string()]);
        assert!(lib.asset("a1").is_ok());
    }

    #[test]
    fn refresh_on_a_consistent_library_changes_nothing() {
        let mut fx = LibraryFixture::new();
        let entity = fx.add_entity("e1", "Raiden", "characters");
        fx.add_asset("a1", &entity, "Red Hat", true);
        fx.add_asset("a2", &entity, "Blue Hat", false);
        let lib = fx.open();

        let report = lib.refresh_from_disk().unwrap();
        assert!(report.repaired.is_empty());
        assert!(report.missing.is_empty());
    }
}
