use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::lib_err;

pub struct OpenFolderArgs {
    pub reference: String,
}

/// Reveal a mod's folder in the system file browser.
pub fn open_folder(library: &ModLibrary, args: OpenFolderArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;
    library.open_asset_folder(&asset.id).map_err(lib_err)?;

    println_pad!(
        "{} {}",
        "📂 Opened folder for".bright_green().bold(),
        asset.name.bright_white().bold()
    );
    Ok(())
}
