use std::io;

use thiserror::Error;

/// Errors that can occur while inspecting or extracting a mod archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("7z error: {0}")]
    SevenZ(#[from] sevenz_rust::Error),

    #[error("unsupported archive format: {0:?}")]
    UnsupportedFormat(String),
}
