use camino::Utf8Path;
use colored::Colorize;
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::print_ansi_boxed_lines;

pub struct InspectArchiveArgs {
    pub file_path: String,
}

/// Analyze an archive and print what an import would see, without
/// touching the library.
pub fn inspect_archive(args: InspectArchiveArgs) -> Result<()> {
    let file_path = Utf8Path::new(&args.file_path);
    if !file_path.exists() {
        return Err(miette::miette!(
            "File not found: {}\n\nMake sure the path is correct and the file exists.",
            file_path
        ));
    }

    println_pad!(
        "{} {}",
        "🔍 Inspecting archive:".bright_blue().bold(),
        args.file_path.bright_cyan().bold()
    );

    let analysis = modshelf_archive::analyze(file_path).map_err(CliError::from)?;

    let files = analysis.entries.iter().filter(|e| !e.is_dir).count();
    let mut lines = vec![format!(
        "{} {} file(s), {} entries",
        "Contents:".bright_yellow(),
        files.to_string().bright_white().bold(),
        analysis.entries.len()
    )];

    match &analysis.suggested_root {
        Some(root) => lines.push(format!(
            "{} {}",
            "Suggested root:".bright_yellow(),
            root.bright_cyan().bold()
        )),
        None => lines.push(format!(
            "{} {}",
            "Suggested root:".bright_yellow(),
            "none (would extract everything)".bright_black()
        )),
    }

    let hints = &analysis.hints;
    if let Some(name) = &hints.name {
        lines.push(format!("{} {}", "Name:".bright_yellow(), name.bright_white()));
        lines.push(format!(
            "{} {}",
            "Folder name:".bright_yellow(),
            modshelf_core::naming::sanitize_folder_name(name).bright_cyan()
        ));
    }
    if let Some(author) = &hints.author {
        lines.push(format!("{} {}", "Author:".bright_yellow(), author));
    }
    if let Some(target) = &hints.target {
        lines.push(format!("{} {}", "Target:".bright_yellow(), target));
    }
    if let Some(category) = &hints.category {
        lines.push(format!("{} {}", "Category:".bright_yellow(), category));
    }
    if let Some(description) = &hints.description {
        lines.push(format!("{} {}", "Description:".bright_yellow(), description));
    }
    if let Some(preview) = &analysis.preview_entry {
        lines.push(format!("{} {}", "Preview image:".bright_yellow(), preview));
    }
    print_ansi_boxed_lines(&lines);

    let roots: Vec<&str> = analysis
        .entries
        .iter()
        .filter(|e| e.is_likely_mod_root)
        .map(|e| e.path.as_str())
        .collect();
    if roots.len() > 1 {
        println_pad!(
            "{}",
            "Multiple mod roots detected; pick one with --root on import:".bright_yellow()
        );
        for root in roots {
            println_pad!("  {}", root.bright_cyan());
        }
    }

    Ok(())
}
