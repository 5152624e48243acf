use std::fs;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use sevenz_rust::{Password, SevenZReader};
use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// Which part of an archive to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootChoice {
    /// Extract every entry, preserving archive-relative paths.
    All,
    /// Extract only entries under the given directory, stripping that
    /// prefix from the written paths.
    Under(String),
}

/// Extract the chosen payload of `archive_path` into `dest`.
///
/// Returns the number of files written. Directories are created as needed;
/// entries that escape `dest` (absolute paths, `..` traversal) are skipped.
pub fn extract_payload(
    archive_path: &Utf8Path,
    root: &RootChoice,
    dest: &Utf8Path,
) -> Result<usize, ArchiveError> {
    extract_payload_with(archive_path, root, dest, |_| {})
}

/// Like [`extract_payload`], invoking `on_file` with the destination-relative
/// path of every file after it is written.
pub fn extract_payload_with(
    archive_path: &Utf8Path,
    root: &RootChoice,
    dest: &Utf8Path,
    mut on_file: impl FnMut(&Utf8Path),
) -> Result<usize, ArchiveError> {
    let extension = archive_path
        .extension()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let count = match extension.as_str() {
        "zip" => extract_zip(archive_path, root, dest, &mut on_file)?,
        "7z" => extract_sevenz(archive_path, root, dest, &mut on_file)?,
        other => return Err(ArchiveError::UnsupportedFormat(other.to_string())),
    };
    debug!("extracted {} files from {} into {}", count, archive_path, dest);
    Ok(count)
}

fn extract_zip(
    archive_path: &Utf8Path,
    root: &RootChoice,
    dest: &Utf8Path,
    on_file: &mut impl FnMut(&Utf8Path),
) -> Result<usize, ArchiveError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut extracted = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let path = match entry.enclosed_name() {
            Some(p) => p.to_string_lossy().replace('\\', "/"),
            None => continue,
        };
        let relative = match entry_destination(&path, root) {
            Some(relative) => relative,
            None => continue,
        };

        let out_path = dest.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = fs::File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
        extracted += 1;
        on_file(&relative);
    }

    Ok(extracted)
}

fn extract_sevenz(
    archive_path: &Utf8Path,
    root: &RootChoice,
    dest: &Utf8Path,
    on_file: &mut impl FnMut(&Utf8Path),
) -> Result<usize, ArchiveError> {
    let mut archive = SevenZReader::open(archive_path.as_std_path(), Password::empty())?;

    let mut extracted = 0usize;
    archive.for_each_entries(|entry, reader| {
        let path = entry.name().replace('\\', "/");
        let relative = match entry_destination(&path, root) {
            Some(relative) => relative,
            None => return Ok(true),
        };

        let out_path = dest.join(&relative);
        if entry.is_directory() {
            fs::create_dir_all(&out_path)?;
            return Ok(true);
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = fs::File::create(&out_path)?;
        io::copy(reader, &mut out_file)?;
        extracted += 1;
        on_file(&relative);
        Ok(true)
    })?;

    Ok(extracted)
}

/// Destination-relative path of an archive entry, or `None` when the entry
/// is outside the chosen root or would escape the destination.
fn entry_destination(path: &str, root: &RootChoice) -> Option<Utf8PathBuf> {
    let relative = match root {
        RootChoice::All => path,
        RootChoice::Under(root) => {
            let prefix = format!("{}/", root.trim_end_matches('/'));
            path.strip_prefix(&prefix)?
        }
    };
    safe_relative(relative)
}

fn safe_relative(path: &str) -> Option<Utf8PathBuf> {
    let mut out = Utf8PathBuf::new();
    for component in Utf8Path::new(path).components() {
        match component {
            Utf8Component::Normal(part) => out.push(part),
            Utf8Component::CurDir => {}
            // Absolute prefixes and parent traversal escape the destination.
            _ => return None,
        }
    }
    if out.as_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn mod_zip(dir: &std::path::Path) -> Utf8PathBuf {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        zip.start_file("ModRoot/config.ini", options).unwrap();
        zip.write_all(b"[Mod]\nName = X\n").unwrap();
        zip.start_file("ModRoot/textures/red.dds", options).unwrap();
        zip.write_all(b"dds").unwrap();
        zip.start_file("README.txt", options).unwrap();
        zip.write_all(b"readme").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let path = dir.join("mod.zip");
        fs::write(&path, bytes).unwrap();
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn extracting_under_a_root_strips_the_prefix() {
        let dir = tempdir().unwrap();
        let archive = mod_zip(dir.path());
        let dest = Utf8PathBuf::from_path_buf(dir.path().join("out")).unwrap();

        let count = extract_payload(
            &archive,
            &RootChoice::Under("ModRoot".to_string()),
            &dest,
        )
        .unwrap();

        assert_eq!(count, 2);
        assert!(dest.join("config.ini").is_file());
        assert!(dest.join("textures/red.dds").is_file());
        // Entries outside the root are not extracted.
        assert!(!dest.join("README.txt").exists());
    }

    #[test]
    fn extracting_all_preserves_archive_paths() {
        let dir = tempdir().unwrap();
        let archive = mod_zip(dir.path());
        let dest = Utf8PathBuf::from_path_buf(dir.path().join("out")).unwrap();

        let mut seen = Vec::new();
        let count = extract_payload_with(&archive, &RootChoice::All, &dest, |path| {
            seen.push(path.to_path_buf());
        })
        .unwrap();

        assert_eq!(count, 3);
        assert!(dest.join("ModRoot/config.ini").is_file());
        assert!(dest.join("README.txt").is_file());
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn traversal_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        zip.start_file("../evil.txt", options).unwrap();
        zip.write_all(b"evil").unwrap();
        zip.start_file("ok.txt", options).unwrap();
        zip.write_all(b"ok").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let path = dir.path().join("sneaky.zip");
        fs::write(&path, bytes).unwrap();
        let archive = Utf8PathBuf::from_path_buf(path).unwrap();

        let dest = Utf8PathBuf::from_path_buf(dir.path().join("out")).unwrap();
        let count = extract_payload(&archive, &RootChoice::All, &dest).unwrap();

        assert_eq!(count, 1);
        assert!(dest.join("ok.txt").is_file());
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mod.tar.gz");
        fs::write(&path, b"gz").unwrap();
        let archive = Utf8PathBuf::from_path_buf(path).unwrap();
        let dest = Utf8PathBuf::from_path_buf(dir.path().join("out")).unwrap();

        let result = extract_payload(&archive, &RootChoice::All, &dest);
        assert!(matches!(result, Err(ArchiveError::UnsupportedFormat(_))));
    }
}
