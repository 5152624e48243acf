use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::lib_err;

pub struct NewEntityArgs {
    pub name: String,
    pub category: String,
}

/// Create a new entity for mods to group under.
pub fn new_entity(library: &ModLibrary, args: NewEntityArgs) -> Result<()> {
    let entity = library
        .create_entity(&args.name, &args.category)
        .map_err(lib_err)?;

    println_pad!(
        "{} {} ({}) {}",
        "✨ Created entity".bright_green().bold(),
        entity.name.bright_white().bold(),
        entity.category,
        entity.id.bright_black()
    );
    Ok(())
}
