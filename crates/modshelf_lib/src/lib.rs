//! Mod library management for modshelf.
//!
//! A library is a folder of mod directories plus a `library.json` index
//! describing entities (the things mods apply to), assets (installed
//! mods) and presets (named enabled-sets). Mods are enabled and disabled
//! by renaming their folder with a `DISABLED_` prefix; the index mirrors
//! the literal on-disk folder name at all times.
//!
//! All mutating operations serialize through an in-process gate plus a
//! cross-process `library.lock` file, and bulk operations report
//! progress through [`ModLibrary::subscribe`].

pub mod error;
pub mod events;

mod assets;
mod import;
mod index;
mod keybinds;
mod launch;
mod library;
mod preset;
mod refresh;
#[cfg(test)]
mod test_util;
mod toggle;
mod types;

pub use error::{Error, Result};
pub use events::{EventScope, EventSubscription, LibraryEvent, ProgressPhase};
pub use import::{ImportRequest, PreviewSource, PREVIEW_FILE_NAME};
pub use keybinds::IniKeybind;
pub use launch::{launch_tool, launch_tool_elevated};
pub use library::{create_or_open, ModLibrary};
pub use preset::ApplyReport;
pub use refresh::RefreshReport;
pub use toggle::{BulkOutcome, BulkToggleReport, ItemOutcome, ItemResult};
pub use types::{Asset, AssetPatch, Entity, EntityWithCounts, Preset};
