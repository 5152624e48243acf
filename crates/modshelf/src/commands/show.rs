use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::{lib_err, print_ansi_boxed_lines, state_label};

pub struct ShowModArgs {
    pub reference: String,
}

/// Show one mod in detail.
pub fn show_mod(library: &ModLibrary, args: ShowModArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;
    let entity = library.entity(&asset.entity_id).map_err(lib_err)?;

    let mut lines = vec![
        format!(
            "{} {}",
            "Mod:".bright_yellow(),
            asset.name.bright_white().bold()
        ),
        format!("{} {}", "Id:".bright_yellow(), asset.id.bright_black()),
        format!(
            "{} {} ({})",
            "Entity:".bright_yellow(),
            entity.name,
            entity.category
        ),
        format!(
            "{} {}",
            "State:".bright_yellow(),
            state_label(asset.is_enabled)
        ),
        format!("{} {}", "Folder:".bright_yellow(), asset.folder_name),
        format!(
            "{} {}",
            "Installed:".bright_yellow(),
            asset.installed_at.format("%Y-%m-%d %H:%M")
        ),
    ];
    if let Some(author) = &asset.author {
        lines.push(format!("{} {}", "Author:".bright_yellow(), author));
    }
    if let Some(tags) = &asset.tags {
        lines.push(format!("{} {}", "Tags:".bright_yellow(), tags));
    }
    if let Some(image) = &asset.image {
        lines.push(format!("{} {}", "Preview:".bright_yellow(), image));
    }
    print_ansi_boxed_lines(&lines);

    if let Some(description) = &asset.description {
        println_pad!("{}", description);
    }
    if let Some(details) = &asset.details {
        if let Ok(pretty) = serde_json::to_string_pretty(details) {
            println_pad!("{}", pretty.bright_black());
        }
    }

    println_pad!(
        "{} {}",
        "Full path:".bright_yellow(),
        library
            .asset_abs_path(&asset.id)
            .map_err(lib_err)?
            .as_str()
            .bright_white()
    );
    Ok(())
}
