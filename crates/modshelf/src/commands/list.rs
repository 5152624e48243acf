use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::{lib_err, state_label};

pub struct ListEntitiesArgs {
    pub category: Option<String>,
}

/// List entities with their mod counts, grouped by category.
pub fn list_entities(library: &ModLibrary, args: ListEntitiesArgs) -> Result<()> {
    let mut rows = library.entities_with_counts(args.category.as_deref());
    if rows.is_empty() {
        match &args.category {
            Some(category) => {
                println_pad!(
                    "{} {}",
                    "No entities in category".bright_yellow(),
                    category.bright_white().bold()
                );
            }
            None => {
                println_pad!(
                    "{}",
                    "The library is empty; add an entity with `modshelf new-entity`"
                        .bright_yellow()
                );
            }
        }
        return Ok(());
    }

    rows.sort_by(|a, b| {
        (a.entity.category.as_str(), a.entity.name.as_str())
            .cmp(&(b.entity.category.as_str(), b.entity.name.as_str()))
    });

    let mut current_category = String::new();
    for row in rows {
        if row.entity.category != current_category {
            current_category = row.entity.category.clone();
            println_pad!("{}", current_category.bright_yellow().bold());
        }
        println_pad!(
            "  {}  {} mod(s), {} enabled  {}",
            row.entity.name.bright_white().bold(),
            row.total_mods,
            row.enabled_mods.to_string().bright_green(),
            row.entity.id.bright_black()
        );
    }
    Ok(())
}

pub struct ListModsArgs {
    pub entity: String,
}

/// List the mods installed for one entity.
pub fn list_mods(library: &ModLibrary, args: ListModsArgs) -> Result<()> {
    let entity = library.resolve_entity(&args.entity).map_err(lib_err)?;
    let assets = library.assets_for_entity(&entity.id).map_err(lib_err)?;

    println_pad!(
        "{} {} ({})",
        "🗂️ Mods for".bright_blue().bold(),
        entity.name.bright_cyan().bold(),
        entity.category
    );
    if assets.is_empty() {
        println_pad!("{}", "No mods installed yet.".bright_black());
        return Ok(());
    }

    for asset in assets {
        let bullet = if asset.is_enabled {
            "●".bright_green()
        } else {
            "○".bright_black()
        };
        let author = asset
            .author
            .as_deref()
            .map(|a| format!(" by {}", a))
            .unwrap_or_default();
        println_pad!(
            "{} {} [{}]{}  {}",
            bullet,
            asset.name.bright_white().bold(),
            state_label(asset.is_enabled),
            author,
            asset.id.bright_black()
        );
    }
    Ok(())
}
