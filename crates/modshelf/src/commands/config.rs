use camino::Utf8Path;
use clap::Subcommand;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use crate::println_pad;
use crate::utils::config::{load_config, save_config};
use crate::utils::lib_err;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set the mod library root (the folder is created if missing)
    SetRoot { path: String },
    /// Set the external tool launched by `modshelf launch`
    SetTool { path: String },
}

pub fn run_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show_config(),
        ConfigCommands::SetRoot { path } => set_mods_root(path),
        ConfigCommands::SetTool { path } => set_tool_path(path),
    }
}

fn show_config() -> Result<()> {
    let config = load_config();
    let unset = || "not set".bright_black().to_string();

    println_pad!(
        "{} {}",
        "Mods folder:".bright_yellow(),
        config
            .mods_root
            .as_deref()
            .map(|p| p.bright_white().bold().to_string())
            .unwrap_or_else(unset)
    );
    println_pad!(
        "{} {}",
        "Tool:".bright_yellow(),
        config
            .tool_path
            .as_deref()
            .map(|p| p.bright_white().bold().to_string())
            .unwrap_or_else(unset)
    );
    Ok(())
}

fn set_mods_root(path: String) -> Result<()> {
    // Creating and opening validates the folder before it is saved.
    let library = modshelf_lib::create_or_open(path.as_str()).map_err(lib_err)?;

    let mut config = load_config();
    config.mods_root = Some(library.root().to_string());
    save_config(&config).into_diagnostic()?;

    println_pad!(
        "{} {}",
        "✅ Mods folder set to".bright_green().bold(),
        library.root().as_str().bright_white().bold()
    );
    Ok(())
}

fn set_tool_path(path: String) -> Result<()> {
    if !Utf8Path::new(&path).is_file() {
        println_pad!(
            "{} {}",
            "⚠️ Warning:".bright_yellow().bold(),
            "that path does not exist yet".bright_yellow()
        );
    }

    let mut config = load_config();
    config.tool_path = Some(path.clone());
    save_config(&config).into_diagnostic()?;

    println_pad!(
        "{} {}",
        "✅ Tool set to".bright_green().bold(),
        path.bright_white().bold()
    );
    Ok(())
}
