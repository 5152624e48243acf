use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use modshelf_core::marker;

/// A moddable target (character, weapon, UI surface) that mods group under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique identifier (UUID)
    pub id: String,
    /// User-friendly name
    pub name: String,
    /// Filesystem-safe short form of the name, used in folder paths
    pub slug: String,
    /// Grouping key, e.g. `characters` or `ui`
    pub category: String,
    /// Free-form extra metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An installed mod tracked by the library index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique identifier (UUID)
    pub id: String,
    /// Owning [`Entity`] id
    pub entity_id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Comma-separated tag list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Preview image file name inside the mod folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-form extra metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Folder path relative to the library root, in its literal on-disk
    /// form: when the mod is disabled this carries the `DISABLED_` marker.
    /// Always updated together with `is_enabled`.
    pub folder_name: Utf8PathBuf,
    pub is_enabled: bool,
    /// Installation timestamp
    pub installed_at: DateTime<Utc>,
}

impl Asset {
    /// The folder path with the disabled marker stripped, regardless of
    /// the asset's current state.
    pub fn clean_folder(&self) -> Utf8PathBuf {
        marker::to_enabled(&self.folder_name)
    }
}

/// A named set of mods that can be applied to the library in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Unique identifier (UUID)
    pub id: String,
    /// User-friendly name
    pub name: String,
    /// Member [`Asset`] ids; applying the preset enables exactly these
    pub asset_ids: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An entity together with its mod counts, for list views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityWithCounts {
    pub entity: Entity,
    pub total_mods: usize,
    pub enabled_mods: usize,
}

/// A partial update to an asset's display metadata.
///
/// `None` fields are left untouched; `new_entity_id` additionally moves
/// the mod folder under the new entity's directory.
#[derive(Debug, Clone, Default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub details: Option<serde_json::Value>,
    pub new_entity_id: Option<String>,
}
