use clap::Subcommand;
use colored::Colorize;
use inquire::Confirm;
use miette::{IntoDiagnostic, Result};
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::{lib_err, run_with_progress};

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// Snapshot the currently enabled mods as a new preset
    Create { name: String },
    /// List all presets
    List,
    /// Enable exactly a preset's mods, disabling everything else
    Apply { reference: String },
    /// Replace a preset's members with the currently enabled mods
    Overwrite { reference: String },
    Rename {
        reference: String,
        new_name: String,
    },
    Delete {
        reference: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Mark or unmark a preset as favorite
    Favorite {
        reference: String,
        #[arg(long)]
        unset: bool,
    },
}

pub fn run_preset_command(library: &ModLibrary, command: PresetCommands) -> Result<()> {
    match command {
        PresetCommands::Create { name } => create_preset(library, &name),
        PresetCommands::List => list_presets(library),
        PresetCommands::Apply { reference } => apply_preset(library, &reference),
        PresetCommands::Overwrite { reference } => overwrite_preset(library, &reference),
        PresetCommands::Rename {
            reference,
            new_name,
        } => rename_preset(library, &reference, &new_name),
        PresetCommands::Delete { reference, yes } => delete_preset(library, &reference, yes),
        PresetCommands::Favorite { reference, unset } => {
            set_favorite(library, &reference, !unset)
        }
    }
}

fn create_preset(library: &ModLibrary, name: &str) -> Result<()> {
    let preset = library.create_preset(name).map_err(lib_err)?;
    println_pad!(
        "{} {} ({} mod(s))",
        "💾 Created preset".bright_green().bold(),
        preset.name.bright_white().bold(),
        preset.asset_ids.len()
    );
    Ok(())
}

fn list_presets(library: &ModLibrary) -> Result<()> {
    let mut presets = library.presets();
    if presets.is_empty() {
        println_pad!(
            "{}",
            "No presets yet; create one with `modshelf preset create`".bright_yellow()
        );
        return Ok(());
    }
    presets.sort_by(|a, b| a.name.cmp(&b.name));

    for preset in presets {
        let star = if preset.is_favorite {
            "★".bright_yellow()
        } else {
            "☆".bright_black()
        };
        println_pad!(
            "{} {} ({} mod(s))  {}",
            star,
            preset.name.bright_white().bold(),
            preset.asset_ids.len(),
            preset.id.bright_black()
        );
    }
    Ok(())
}

fn apply_preset(library: &ModLibrary, reference: &str) -> Result<()> {
    let preset = library.resolve_preset(reference).map_err(lib_err)?;
    println_pad!(
        "{} {}",
        "🎛️ Applying preset:".bright_blue().bold(),
        preset.name.bright_cyan().bold()
    );

    let report =
        run_with_progress(library, || library.apply_preset(&preset.id)).map_err(lib_err)?;

    for failure in &report.failures {
        println_pad!("{} {}", "❌".bright_red(), failure);
    }
    if !report.failures.is_empty() {
        return Err(miette::miette!(
            "Preset application completed with {} error(s).",
            report.failures.len()
        ));
    }
    Ok(())
}

fn overwrite_preset(library: &ModLibrary, reference: &str) -> Result<()> {
    let preset = library.resolve_preset(reference).map_err(lib_err)?;
    let updated = library.overwrite_preset(&preset.id).map_err(lib_err)?;
    println_pad!(
        "{} {} ({} mod(s))",
        "💾 Overwrote preset".bright_green().bold(),
        updated.name.bright_white().bold(),
        updated.asset_ids.len()
    );
    Ok(())
}

fn rename_preset(library: &ModLibrary, reference: &str, new_name: &str) -> Result<()> {
    let preset = library.resolve_preset(reference).map_err(lib_err)?;
    let updated = library.rename_preset(&preset.id, new_name).map_err(lib_err)?;
    println_pad!(
        "{} {} -> {}",
        "✏️ Renamed preset".bright_green().bold(),
        preset.name,
        updated.name.bright_white().bold()
    );
    Ok(())
}

fn delete_preset(library: &ModLibrary, reference: &str, yes: bool) -> Result<()> {
    let preset = library.resolve_preset(reference).map_err(lib_err)?;

    if !yes {
        let confirmed = Confirm::new(&format!("Delete preset '{}'?", preset.name))
            .with_default(false)
            .prompt()
            .into_diagnostic()?;
        if !confirmed {
            println_pad!("{}", "Aborted.".bright_yellow());
            return Ok(());
        }
    }

    library.delete_preset(&preset.id).map_err(lib_err)?;
    println_pad!(
        "{} {}",
        "🗑️ Deleted preset".bright_green().bold(),
        preset.name.bright_white().bold()
    );
    Ok(())
}

fn set_favorite(library: &ModLibrary, reference: &str, is_favorite: bool) -> Result<()> {
    let preset = library.resolve_preset(reference).map_err(lib_err)?;
    let updated = library
        .set_preset_favorite(&preset.id, is_favorite)
        .map_err(lib_err)?;
    let star = if updated.is_favorite { "★" } else { "☆" };
    println_pad!(
        "{} {} {}",
        star.bright_yellow(),
        updated.name.bright_white().bold(),
        if updated.is_favorite {
            "is now a favorite"
        } else {
            "is no longer a favorite"
        }
    );
    Ok(())
}
