use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use inquire::{Select, Text};
use miette::{IntoDiagnostic, Result};
use modshelf_archive::{ArchiveAnalysis, RootChoice};
use modshelf_lib::{Entity, ImportRequest, ModLibrary, PreviewSource};

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{lib_err, print_ansi_boxed_lines, run_with_progress, state_label};

pub struct ImportModArgs {
    pub patterns: Vec<String>,
    pub root: Option<String>,
    pub extract_all: bool,
    pub entity: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub preview: Option<String>,
    pub presets: Vec<String>,
    pub yes: bool,
}

/// Import every archive matching the given paths or glob patterns.
pub fn import_mods(library: &ModLibrary, args: ImportModArgs) -> Result<()> {
    let archives = expand_patterns(&args.patterns)?;
    let multiple = archives.len() > 1;
    if multiple && args.name.is_some() {
        return Err(miette::miette!(
            "--name can only be used when importing a single archive"
        ));
    }

    let preset_ids = resolve_presets(library, &args.presets)?;

    for archive in &archives {
        import_one(library, archive, &args, &preset_ids)?;
        if multiple {
            println!();
        }
    }
    Ok(())
}

fn import_one(
    library: &ModLibrary,
    archive: &Utf8Path,
    args: &ImportModArgs,
    preset_ids: &[String],
) -> Result<()> {
    println_pad!(
        "{} {}",
        "📦 Importing archive:".bright_blue().bold(),
        archive.as_str().bright_cyan().bold()
    );

    let analysis = modshelf_archive::analyze(archive).map_err(CliError::from)?;

    let root = choose_root(&analysis, args)?;
    let entity = choose_entity(library, &analysis, args)?;
    let name = choose_name(&analysis, args)?;

    let request = ImportRequest {
        root,
        entity_id: entity.id.clone(),
        name,
        description: args
            .description
            .clone()
            .or_else(|| analysis.hints.description.clone()),
        author: args.author.clone().or_else(|| analysis.hints.author.clone()),
        tags: args.tags.clone(),
        preview: match &args.preview {
            Some(path) => PreviewSource::File(Utf8PathBuf::from(path)),
            None => PreviewSource::None,
        },
        add_to_presets: preset_ids.to_vec(),
    };

    let asset = run_with_progress(library, || library.import_archive(&analysis, &request))
        .map_err(lib_err)?;

    print_ansi_boxed_lines(&[
        format!(
            "{} {}",
            "Imported:".bright_green(),
            asset.name.bright_white().bold()
        ),
        format!("{} {}", "Entity:".bright_green(), entity.name),
        format!("{} {}", "Folder:".bright_green(), asset.folder_name),
        format!("{} {}", "State:".bright_green(), state_label(asset.is_enabled)),
    ]);
    Ok(())
}

/// Expand paths and glob patterns into a deduplicated archive list.
fn expand_patterns(patterns: &[String]) -> Result<Vec<Utf8PathBuf>> {
    let mut archives = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        let entries = glob::glob(pattern)
            .map_err(|err| miette::miette!("Invalid pattern '{}': {}", pattern, err))?;
        for entry in entries {
            let path = entry.into_diagnostic()?;
            if path.is_file() {
                let path = Utf8PathBuf::from_path_buf(path)
                    .map_err(|p| miette::miette!("Path is not valid UTF-8: {}", p.display()))?;
                archives.push(path);
                matched = true;
            }
        }
        if !matched {
            return Err(miette::miette!(
                "No archive found for '{}'\n\nMake sure the path is correct and the file exists.",
                pattern
            ));
        }
    }
    archives.sort();
    archives.dedup();
    Ok(archives)
}

fn choose_root(analysis: &ArchiveAnalysis, args: &ImportModArgs) -> Result<RootChoice> {
    if args.extract_all {
        return Ok(RootChoice::All);
    }
    if let Some(root) = &args.root {
        return Ok(RootChoice::Under(root.trim_end_matches('/').to_string()));
    }

    let candidates: Vec<String> = analysis
        .entries
        .iter()
        .filter(|e| e.is_likely_mod_root)
        .map(|e| e.path.trim_end_matches('/').to_string())
        .collect();

    if args.yes || candidates.is_empty() {
        // Non-interactive: trust the analysis.
        return Ok(match &analysis.suggested_root {
            Some(root) => RootChoice::Under(root.clone()),
            None => RootChoice::All,
        });
    }
    if candidates.len() == 1 {
        return Ok(RootChoice::Under(candidates.into_iter().next().unwrap()));
    }

    const WHOLE_ARCHIVE: &str = "<whole archive>";
    let mut options = candidates;
    options.push(WHOLE_ARCHIVE.to_string());
    let starting = analysis
        .suggested_root
        .as_ref()
        .and_then(|root| options.iter().position(|o| o == root))
        .unwrap_or(0);

    let chosen = Select::new("Which folder is the mod root?", options)
        .with_starting_cursor(starting)
        .prompt()
        .into_diagnostic()?;
    Ok(if chosen == WHOLE_ARCHIVE {
        RootChoice::All
    } else {
        RootChoice::Under(chosen)
    })
}

fn choose_entity(
    library: &ModLibrary,
    analysis: &ArchiveAnalysis,
    args: &ImportModArgs,
) -> Result<Entity> {
    if let Some(reference) = &args.entity {
        return library.resolve_entity(reference).map_err(lib_err);
    }
    if args.yes {
        return Err(miette::miette!(
            "--entity is required when importing with --yes"
        ));
    }

    let entities = library.entities();
    if entities.is_empty() {
        return Err(CliError::Validation(
            "The library has no entities yet; create one with `modshelf new-entity`".to_string(),
        )
        .into());
    }

    let labels: Vec<String> = entities
        .iter()
        .map(|e| format!("{} ({})", e.name, e.category))
        .collect();
    // Preselect the entity the archive's INI hints point at, if any.
    let starting = analysis
        .hints
        .target
        .as_ref()
        .and_then(|target| {
            entities
                .iter()
                .position(|e| e.name.eq_ignore_ascii_case(target))
        })
        .unwrap_or(0);

    let chosen = Select::new("Which entity does this mod belong to?", labels.clone())
        .with_starting_cursor(starting)
        .prompt()
        .into_diagnostic()?;
    let position = labels.iter().position(|l| *l == chosen).unwrap_or(0);
    Ok(entities[position].clone())
}

fn choose_name(analysis: &ArchiveAnalysis, args: &ImportModArgs) -> Result<String> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }

    let suggestion = analysis.hints.name.clone().unwrap_or_default();
    if args.yes {
        if suggestion.is_empty() {
            return Err(miette::miette!(
                "Cannot infer a mod name from the archive; pass --name"
            ));
        }
        return Ok(suggestion);
    }

    Text::new("Mod name:")
        .with_initial_value(&suggestion)
        .prompt()
        .into_diagnostic()
}

fn resolve_presets(library: &ModLibrary, references: &[String]) -> Result<Vec<String>> {
    references
        .iter()
        .map(|reference| {
            library
                .resolve_preset(reference)
                .map(|preset| preset.id)
                .map_err(lib_err)
        })
        .collect()
}
