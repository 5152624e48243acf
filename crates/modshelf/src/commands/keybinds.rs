use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::lib_err;

pub struct ShowKeybindsArgs {
    pub reference: String,
}

/// Print the keybinds a mod's INI files declare.
pub fn show_keybinds(library: &ModLibrary, args: ShowKeybindsArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;
    let keybinds = library.asset_keybinds(&asset.id).map_err(lib_err)?;

    println_pad!(
        "{} {}",
        "⌨️ Keybinds for".bright_blue().bold(),
        asset.name.bright_cyan().bold()
    );
    if keybinds.is_empty() {
        println_pad!("{}", "No keybinds found.".bright_black());
        return Ok(());
    }

    for keybind in keybinds {
        println_pad!(
            "{}  {}",
            keybind.title.bright_white().bold(),
            keybind.key.bright_cyan()
        );
    }
    Ok(())
}
