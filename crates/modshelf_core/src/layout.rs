//! On-disk layout of a mod library.
//!
//! A library root contains one directory per category, one directory per
//! entity below that, and one directory per mod asset below the entity:
//! `<root>/<category>/<entity_slug>/<AssetFolder>`. Beside those live the
//! JSON index and the lock file used to serialize cross-process mutation.

use camino::{Utf8Path, Utf8PathBuf};

/// File name of the library index, stored in the library root.
pub const INDEX_FILE_NAME: &str = "library.json";

/// File name of the cross-process lock, stored in the library root.
pub const LOCK_FILE_NAME: &str = "library.lock";

/// Path of the library index inside `root`.
pub fn index_path(root: &Utf8Path) -> Utf8PathBuf {
    root.join(INDEX_FILE_NAME)
}

/// Path of the library lock file inside `root`.
pub fn lock_path(root: &Utf8Path) -> Utf8PathBuf {
    root.join(LOCK_FILE_NAME)
}

/// Relative directory of an asset folder below the library root.
pub fn asset_rel_dir(category: &str, entity_slug: &str, folder: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(category).join(entity_slug).join(folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_lock_live_in_the_root() {
        let root = Utf8Path::new("/mods");
        assert_eq!(index_path(root), "/mods/library.json");
        assert_eq!(lock_path(root), "/mods/library.lock");
    }

    #[test]
    fn asset_dir_nests_category_entity_folder() {
        assert_eq!(
            asset_rel_dir("characters", "red-hat", "Red_Hat"),
            "characters/red-hat/Red_Hat"
        );
    }
}
