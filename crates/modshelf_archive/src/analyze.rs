use std::fs;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use ini::Ini;
use sevenz_rust::{Password, SevenZReader};
use serde::Serialize;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// File names that are treated as an in-archive preview image when found
/// directly under the suggested mod root.
pub const PREVIEW_CANDIDATES: [&str; 6] = [
    "preview.png",
    "icon.png",
    "thumbnail.png",
    "preview.jpg",
    "icon.jpg",
    "thumbnail.jpg",
];

/// One entry of an inspected archive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Entry path with forward slashes, as stored in the archive.
    pub path: String,
    pub is_dir: bool,
    /// Set on directory entries that directly contain an INI marker file.
    pub is_likely_mod_root: bool,
}

/// Advisory metadata harvested from INI contents and the archive name.
///
/// Every field is best-effort; the import flow lets the user override all
/// of them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataHints {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Raw target/entity/character string, exactly as written in the INI.
    pub target: Option<String>,
    /// Raw type/category string, exactly as written in the INI.
    pub category: Option<String>,
}

/// Result of inspecting an archive without extracting it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveAnalysis {
    pub archive_path: Utf8PathBuf,
    /// All entries, sorted by path.
    pub entries: Vec<ArchiveEntry>,
    /// Shallowest directory containing an INI marker file, if any.
    pub suggested_root: Option<String>,
    pub hints: MetadataHints,
    /// Archive path of a preview image directly under the suggested root.
    pub preview_entry: Option<String>,
}

/// Inspect `archive_path` and produce an [`ArchiveAnalysis`].
///
/// The archive is never extracted; INI entry contents are read in-memory
/// during the listing pass. An archive without any INI marker file yields
/// an analysis with no suggested root, which is not an error.
pub fn analyze(archive_path: &Utf8Path) -> Result<ArchiveAnalysis, ArchiveError> {
    if !archive_path.is_file() {
        return Err(ArchiveError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("archive file not found: {}", archive_path),
        )));
    }

    let extension = archive_path
        .extension()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut entries = Vec::new();
    let mut ini_contents: Vec<(String, String)> = Vec::new();
    match extension.as_str() {
        "zip" => read_zip_entries(archive_path, &mut entries, &mut ini_contents)?,
        "7z" => read_sevenz_entries(archive_path, &mut entries, &mut ini_contents)?,
        other => return Err(ArchiveError::UnsupportedFormat(other.to_string())),
    }
    debug!(
        "listed {} entries ({} INI files) in {}",
        entries.len(),
        ini_contents.len(),
        archive_path
    );

    entries.sort_unstable_by(|a, b| a.path.cmp(&b.path));

    // Non-empty parent directories of INI files are root candidates; the
    // shallowest one (fewest segments, then lexicographic) wins.
    let mut root_candidates: Vec<String> = Vec::new();
    for (path, _) in &ini_contents {
        if let Some(parent) = Utf8Path::new(path).parent() {
            let parent = parent.as_str();
            if !parent.is_empty() && !root_candidates.iter().any(|c| c == parent) {
                root_candidates.push(parent.to_string());
            }
        }
    }
    for entry in entries.iter_mut() {
        if !entry.is_dir {
            continue;
        }
        let trimmed = entry.path.trim_end_matches('/');
        if root_candidates.iter().any(|c| c == trimmed) {
            entry.is_likely_mod_root = true;
        }
    }
    root_candidates.sort_by(|a, b| {
        let depth = |p: &str| p.split('/').count();
        depth(a).cmp(&depth(b)).then_with(|| a.cmp(b))
    });
    let suggested_root = root_candidates.first().cloned();

    let preview_entry = suggested_root.as_ref().and_then(|root| {
        let prefix = format!("{}/", root);
        PREVIEW_CANDIDATES.iter().find_map(|candidate| {
            let wanted = format!("{}{}", prefix, candidate);
            entries
                .iter()
                .find(|e| !e.is_dir && e.path.eq_ignore_ascii_case(&wanted))
                .map(|e| e.path.clone())
        })
    });

    // Hints come from the first INI directly inside the suggested root, or
    // from a top-level INI when there is no root to suggest.
    let hint_source = match &suggested_root {
        Some(root) => {
            let prefix = format!("{}/", root);
            ini_contents.iter().find(|(path, _)| {
                path.strip_prefix(&prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
        }
        None => ini_contents.iter().find(|(path, _)| !path.contains('/')),
    };

    let mut hints = MetadataHints::default();
    if let Some((path, content)) = hint_source {
        debug!("harvesting hints from {}", path);
        harvest_ini_hints(content, &mut hints);
    }
    if hints.name.is_none() {
        if let Some(stem) = archive_path.file_stem() {
            let cleaned = modshelf_core::naming::clean_title(stem);
            if !cleaned.is_empty() {
                hints.name = Some(cleaned);
            }
        }
    }

    Ok(ArchiveAnalysis {
        archive_path: archive_path.to_path_buf(),
        entries,
        suggested_root,
        hints,
        preview_entry,
    })
}

fn read_zip_entries(
    archive_path: &Utf8Path,
    entries: &mut Vec<ArchiveEntry>,
    ini_contents: &mut Vec<(String, String)>,
) -> Result<(), ArchiveError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let path = match entry.enclosed_name() {
            Some(p) => p.to_string_lossy().replace('\\', "/"),
            None => continue,
        };
        let is_dir = entry.is_dir();

        if !is_dir && path.to_lowercase().ends_with(".ini") {
            let mut content = String::new();
            if entry.read_to_string(&mut content).is_ok() {
                ini_contents.push((path.clone(), content));
            }
        }
        entries.push(ArchiveEntry {
            path,
            is_dir,
            is_likely_mod_root: false,
        });
    }

    Ok(())
}

fn read_sevenz_entries(
    archive_path: &Utf8Path,
    entries: &mut Vec<ArchiveEntry>,
    ini_contents: &mut Vec<(String, String)>,
) -> Result<(), ArchiveError> {
    let mut archive = SevenZReader::open(archive_path.as_std_path(), Password::empty())?;

    archive.for_each_entries(|entry, reader| {
        let path = entry.name().replace('\\', "/");
        let is_dir = entry.is_directory();

        if !is_dir && path.to_lowercase().ends_with(".ini") {
            let mut content = Vec::new();
            reader.read_to_end(&mut content)?;
            ini_contents.push((path.clone(), String::from_utf8_lossy(&content).into_owned()));
        }
        entries.push(ArchiveEntry {
            path,
            is_dir,
            is_likely_mod_root: false,
        });
        Ok(true)
    })?;

    Ok(())
}

fn harvest_ini_hints(content: &str, hints: &mut MetadataHints) {
    let ini = match Ini::load_from_str(content) {
        Ok(ini) => ini,
        Err(err) => {
            debug!("skipping malformed INI hint source: {}", err);
            return;
        }
    };

    for section_name in ["Mod", "Settings", "Info", "General"] {
        let section = match ini.section(Some(section_name)) {
            Some(section) => section,
            None => continue,
        };

        if let Some(name) = section.get("Name").or_else(|| section.get("ModName")) {
            let cleaned = modshelf_core::naming::clean_title(name);
            if !cleaned.is_empty() {
                hints.name = Some(cleaned);
            }
        }
        if let Some(author) = section.get("Author") {
            hints.author = Some(author.trim().to_string());
        }
        if let Some(description) = section.get("Description") {
            hints.description = Some(description.trim().to_string());
        }
        if let Some(target) = section
            .get("Target")
            .or_else(|| section.get("Entity"))
            .or_else(|| section.get("Character"))
        {
            hints.target = Some(target.trim().to_string());
        }
        if let Some(category) = section.get("Type").or_else(|| section.get("Category")) {
            hints.category = Some(category.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(dir: &std::path::Path, name: &str, build: impl FnOnce(&mut ZipWriter<Cursor<Vec<u8>>>)) -> Utf8PathBuf {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        build(&mut zip);
        let bytes = zip.finish().unwrap().into_inner();

        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn suggests_the_directory_holding_the_marker_ini() {
        let dir = tempdir().unwrap();
        let options = SimpleFileOptions::default();
        let path = write_zip(dir.path(), "mod.zip", |zip| {
            zip.add_directory("ModRoot", options).unwrap();
            zip.start_file("ModRoot/config.ini", options).unwrap();
            zip.write_all(b"[Mod]\nName = Red Hat_v1.2\nAuthor = someone\n")
                .unwrap();
            zip.start_file("ModRoot/data.bin", options).unwrap();
            zip.write_all(b"payload").unwrap();
        });

        let analysis = analyze(&path).unwrap();
        assert_eq!(analysis.suggested_root.as_deref(), Some("ModRoot"));
        assert_eq!(analysis.hints.name.as_deref(), Some("Red Hat"));
        assert_eq!(analysis.hints.author.as_deref(), Some("someone"));

        let root_entry = analysis
            .entries
            .iter()
            .find(|e| e.is_dir && e.path.trim_end_matches('/') == "ModRoot")
            .unwrap();
        assert!(root_entry.is_likely_mod_root);
    }

    #[test]
    fn picks_the_shallowest_root_when_several_inis_exist() {
        let dir = tempdir().unwrap();
        let options = SimpleFileOptions::default();
        let path = write_zip(dir.path(), "nested.zip", |zip| {
            zip.start_file("outer/inner/deep.ini", options).unwrap();
            zip.write_all(b"[Mod]\nName = Deep\n").unwrap();
            zip.start_file("outer/top.ini", options).unwrap();
            zip.write_all(b"[Mod]\nName = Top\n").unwrap();
        });

        let analysis = analyze(&path).unwrap();
        assert_eq!(analysis.suggested_root.as_deref(), Some("outer"));
        assert_eq!(analysis.hints.name.as_deref(), Some("Top"));
    }

    #[test]
    fn no_marker_file_means_no_suggestion_and_a_stem_fallback_name() {
        let dir = tempdir().unwrap();
        let options = SimpleFileOptions::default();
        let path = write_zip(dir.path(), "RedHat_v2.zip", |zip| {
            zip.start_file("textures/red.dds", options).unwrap();
            zip.write_all(b"dds").unwrap();
        });

        let analysis = analyze(&path).unwrap();
        assert!(analysis.suggested_root.is_none());
        assert!(analysis.preview_entry.is_none());
        assert_eq!(analysis.hints.name.as_deref(), Some("RedHat"));
    }

    #[test]
    fn finds_a_preview_image_directly_under_the_root() {
        let dir = tempdir().unwrap();
        let options = SimpleFileOptions::default();
        let path = write_zip(dir.path(), "mod.zip", |zip| {
            zip.start_file("ModRoot/config.ini", options).unwrap();
            zip.write_all(b"[Mod]\nName = X\n").unwrap();
            zip.start_file("ModRoot/Preview.PNG", options).unwrap();
            zip.write_all(b"png").unwrap();
        });

        let analysis = analyze(&path).unwrap();
        assert_eq!(analysis.preview_entry.as_deref(), Some("ModRoot/Preview.PNG"));
    }

    #[test]
    fn top_level_ini_yields_hints_but_no_root() {
        let dir = tempdir().unwrap();
        let options = SimpleFileOptions::default();
        let path = write_zip(dir.path(), "flat.zip", |zip| {
            zip.start_file("merged.ini", options).unwrap();
            zip.write_all(b"[Settings]\nName = Flat Mod\nTarget = RedHat\n")
                .unwrap();
        });

        let analysis = analyze(&path).unwrap();
        assert!(analysis.suggested_root.is_none());
        assert_eq!(analysis.hints.name.as_deref(), Some("Flat Mod"));
        assert_eq!(analysis.hints.target.as_deref(), Some("RedHat"));
    }

    #[test]
    fn rar_archives_are_reported_as_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mod.rar");
        fs::write(&path, b"Rar!").unwrap();
        let path = Utf8PathBuf::from_path_buf(path).unwrap();

        let result = analyze(&path);
        assert!(matches!(result, Err(ArchiveError::UnsupportedFormat(ext)) if ext == "rar"));
    }

    #[test]
    fn missing_archive_is_an_io_error() {
        let result = analyze(Utf8Path::new("/nonexistent/mod.zip"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }
}
