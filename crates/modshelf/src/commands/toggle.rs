use colored::Colorize;
use miette::Result;
use modshelf_lib::{BulkOutcome, ItemOutcome, ModLibrary};

use crate::println_pad;
use crate::utils::{lib_err, run_with_progress, state_label};

pub struct ToggleModArgs {
    pub reference: String,
}

/// Flip a single mod between enabled and disabled.
pub fn toggle_mod(library: &ModLibrary, args: ToggleModArgs) -> Result<()> {
    let asset = library.resolve_asset(&args.reference).map_err(lib_err)?;
    let enabled = library.toggle_asset(&asset.id).map_err(lib_err)?;

    println_pad!(
        "{} {} is now {}",
        "🔁".bright_blue(),
        asset.name.bright_white().bold(),
        state_label(enabled)
    );
    Ok(())
}

pub struct SetEnabledArgs {
    pub references: Vec<String>,
}

pub fn enable_mods(library: &ModLibrary, args: SetEnabledArgs) -> Result<()> {
    set_mods_enabled(library, args, true)
}

pub fn disable_mods(library: &ModLibrary, args: SetEnabledArgs) -> Result<()> {
    set_mods_enabled(library, args, false)
}

/// Bring every referenced mod into the requested state.
fn set_mods_enabled(library: &ModLibrary, args: SetEnabledArgs, desired: bool) -> Result<()> {
    let mut ids = Vec::new();
    for reference in &args.references {
        ids.push(library.resolve_asset(reference).map_err(lib_err)?.id);
    }

    if let [id] = ids.as_slice() {
        library.set_asset_enabled(id, desired).map_err(lib_err)?;
        println_pad!(
            "{} {} is now {}",
            "🔁".bright_blue(),
            args.references[0].bright_white().bold(),
            state_label(desired)
        );
        return Ok(());
    }

    let report = run_with_progress(library, || library.bulk_toggle(&ids, desired))
        .map_err(lib_err)?;

    for item in &report.items {
        if let ItemOutcome::Failed { message } = &item.outcome {
            println_pad!(
                "{} {}: {}",
                "❌".bright_red(),
                item.asset_id.bright_white(),
                message
            );
        }
    }
    if report.outcome() == BulkOutcome::TotalFailure {
        return Err(miette::miette!("{}", report.summary()));
    }
    Ok(())
}
