use colored::Colorize;
use miette::Result;
use modshelf_lib::{AssetPatch, ModLibrary};

use crate::println_pad;
use crate::utils::lib_err;

pub struct EditModArgs {
    pub reference: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub entity: Option<String>,
}

/// Edit a mod's metadata, optionally moving it under another entity.
pub fn edit_mod(library: &ModLibrary, args: EditModArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;

    let new_entity_id = match &args.entity {
        Some(reference) => Some(library.resolve_entity(reference).map_err(lib_err)?.id),
        None => None,
    };

    let patch = AssetPatch {
        name: args.name,
        description: args.description,
        author: args.author,
        tags: args.tags,
        details: None,
        new_entity_id,
    };
    if patch.name.is_none()
        && patch.description.is_none()
        && patch.author.is_none()
        && patch.tags.is_none()
        && patch.new_entity_id.is_none()
    {
        return Err(miette::miette!(
            "Nothing to change; pass at least one of --name, --description, --author, --tags or --entity"
        ));
    }

    let updated = library.update_asset_info(&asset.id, patch).map_err(lib_err)?;
    println_pad!(
        "{} {} ({})",
        "✏️ Updated".bright_green().bold(),
        updated.name.bright_white().bold(),
        updated.folder_name
    );
    Ok(())
}
