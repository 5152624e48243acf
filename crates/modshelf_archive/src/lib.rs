//! Archive inspection and extraction for modshelf mod imports.
//!
//! [`analyze`] opens a compressed archive (`.zip` / `.7z`), lists its
//! entries without extracting anything, suggests the directory most likely
//! to be the mod's root, and harvests advisory metadata hints from any INI
//! files it finds. [`extract_payload`] then writes either the whole archive
//! or a chosen subtree to a destination directory.
//!
//! `.rar` is a recognized mod-archive extension but has no maintained pure
//! Rust reader, so it is reported as [`ArchiveError::UnsupportedFormat`]
//! rather than silently misread.

pub mod error;

mod analyze;
mod extract;

pub use analyze::{analyze, ArchiveAnalysis, ArchiveEntry, MetadataHints, PREVIEW_CANDIDATES};
pub use error::ArchiveError;
pub use extract::{extract_payload, extract_payload_with, RootChoice};
