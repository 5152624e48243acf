use std::time::Duration;

use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use modshelf_lib::{LibraryEvent, ModLibrary, ProgressPhase};
use regex::Regex;

use crate::errors::CliError;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Convert a library error into a rendered diagnostic.
pub fn lib_err(err: modshelf_lib::Error) -> miette::Report {
    CliError::from(err).into()
}

/// Open the library at the overridden or configured root.
pub fn open_library(root_override: Option<&str>) -> Result<ModLibrary> {
    let root = match root_override {
        Some(root) => Utf8PathBuf::from(root),
        None => config::load_config()
            .mods_root
            .map(Utf8PathBuf::from)
            .ok_or(CliError::ModsRootNotConfigured)?,
    };
    tracing::debug!("using library root {}", root);
    ModLibrary::open(root).map_err(lib_err)
}

/// Print one progress event from a bulk operation.
pub fn render_event(event: &LibraryEvent) {
    match &event.phase {
        ProgressPhase::Start { total } => {
            println_pad!(
                "{} {} item(s)",
                "⏳ Processing".bright_blue().bold(),
                total.to_string().bright_white().bold()
            );
        }
        ProgressPhase::Progress { message, .. } => {
            println_pad!("{}", message.bright_white());
        }
        ProgressPhase::Complete { summary } => {
            println_pad!("{} {}", "✅".bright_green(), summary.bright_green().bold());
        }
        ProgressPhase::Error { message } => {
            println_pad!("{} {}", "❌".bright_red(), message.bright_red().bold());
        }
    }
}

/// Run a blocking library operation on a worker thread while streaming
/// its progress events to the terminal.
pub fn run_with_progress<T, F>(library: &ModLibrary, op: F) -> modshelf_lib::Result<T>
where
    F: FnOnce() -> modshelf_lib::Result<T> + Send,
    T: Send,
{
    let subscription = library.subscribe();
    std::thread::scope(|scope| {
        let handle = scope.spawn(op);
        loop {
            for event in subscription.drain() {
                render_event(&event);
            }
            if handle.is_finished() {
                break;
            }
            if let Some(event) = subscription.recv_timeout(Duration::from_millis(100)) {
                render_event(&event);
            }
        }
        for event in subscription.drain() {
            render_event(&event);
        }
        handle.join().expect("library operation thread panicked")
    })
}

/// Prints the provided lines inside an ASCII box
pub fn print_ansi_boxed_lines(lines: &[String]) {
    let ansi = Regex::new("\x1b\\[[0-9;]*m").unwrap();
    let visible_len = |s: &str| ansi.replace_all(s, "").chars().count();

    let width = lines
        .iter()
        .map(|s| visible_len(s.as_str()))
        .max()
        .unwrap_or(0);

    let border = "-".repeat(width + 4);
    println_pad!("{}", border);
    for line in lines {
        let pad = width - visible_len(line.as_str());
        println_pad!("| {}{} |", line, " ".repeat(pad));
    }
    println_pad!("{}", border);
}

/// `enabled`/`disabled` with the usual colors.
pub fn state_label(enabled: bool) -> colored::ColoredString {
    if enabled {
        "enabled".bright_green()
    } else {
        "disabled".bright_black()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels_read_as_states() {
        colored::control::set_override(false);
        assert_eq!(state_label(true).to_string(), "enabled");
        assert_eq!(state_label(false).to_string(), "disabled");
        colored::control::unset_override();
    }
}
