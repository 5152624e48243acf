use colored::Colorize;
use miette::Result;
use modshelf_lib::ModLibrary;

use crate::println_pad;
use crate::utils::lib_err;

/// Reconcile the index with the folders actually on disk.
pub fn refresh_library(library: &ModLibrary) -> Result<()> {
    println_pad!("{}", "🔄 Refreshing library from disk...".bright_blue().bold());
    let report = library.refresh_from_disk().map_err(lib_err)?;

    if report.repaired.is_empty() && report.missing.is_empty() {
        println_pad!("{}", "✅ Everything is consistent.".bright_green().bold());
        return Ok(());
    }

    for id in &report.repaired {
        let name = library
            .asset(id)
            .map(|a| a.name)
            .unwrap_or_else(|_| id.clone());
        println_pad!("{} {}", "🔧 Repaired:".bright_yellow(), name.bright_white());
    }
    for id in &report.missing {
        let name = library
            .asset(id)
            .map(|a| a.name)
            .unwrap_or_else(|_| id.clone());
        println_pad!(
            "{} {} (folder missing on disk)",
            "⚠️ Missing:".bright_red(),
            name.bright_white()
        );
    }
    println_pad!(
        "{} {} repaired, {} missing",
        "Done:".bright_green().bold(),
        report.repaired.len(),
        report.missing.len()
    );
    Ok(())
}
