use colored::Colorize;
use inquire::Confirm;
use miette::{IntoDiagnostic, Result};
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::lib_err;

pub struct RemoveModArgs {
    pub reference: String,
    pub yes: bool,
}

/// Delete a mod's folder and its index entry.
pub fn remove_mod(library: &ModLibrary, args: RemoveModArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;

    if !args.yes {
        let confirmed = Confirm::new(&format!(
            "Delete '{}' and its folder {}?",
            asset.name, asset.folder_name
        ))
        .with_default(false)
        .prompt()
        .into_diagnostic()?;
        if !confirmed {
            println_pad!("{}", "Aborted.".bright_yellow());
            return Ok(());
        }
    }

    library.delete_asset(&asset.id).map_err(lib_err)?;
    println_pad!(
        "{} {}",
        "🗑️ Removed".bright_green().bold(),
        asset.name.bright_white().bold()
    );
    Ok(())
}
