use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use modshelf_lib::Error as LibError;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config;

pub struct LaunchToolArgs {
    pub elevated: bool,
}

/// Launch the configured external tool, retrying through an elevation
/// prompt when the executable demands it.
pub fn launch_tool(args: LaunchToolArgs) -> Result<()> {
    let path = config::load_config()
        .tool_path
        .map(Utf8PathBuf::from)
        .ok_or(CliError::ToolNotConfigured)?;

    println_pad!(
        "{} {}",
        "🚀 Launching:".bright_blue().bold(),
        path.as_str().bright_cyan().bold()
    );

    if args.elevated {
        modshelf_lib::launch_tool_elevated(&path).map_err(CliError::from)?;
    } else {
        match modshelf_lib::launch_tool(&path) {
            Ok(()) => {}
            Err(LibError::ElevationRequired { .. }) => {
                println_pad!(
                    "{}",
                    "🔐 The tool needs administrator rights, asking for elevation..."
                        .bright_yellow()
                );
                modshelf_lib::launch_tool_elevated(&path).map_err(CliError::from)?;
            }
            Err(err) => return Err(CliError::from(err).into()),
        }
    }

    println_pad!("{}", "✅ Tool launched.".bright_green().bold());
    Ok(())
}
