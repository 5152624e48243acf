use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    disable_mods, edit_mod, enable_mods, import_mods, inspect_archive, launch_tool, list_entities,
    list_mods, new_entity, open_folder, refresh_library, remove_mod, run_config_command,
    run_preset_command, show_keybinds, show_mod, toggle_mod, ConfigCommands, EditModArgs,
    ImportModArgs, InspectArchiveArgs, LaunchToolArgs, ListEntitiesArgs, ListModsArgs,
    NewEntityArgs, OpenFolderArgs, PresetCommands, RemoveModArgs, SetEnabledArgs, ShowKeybindsArgs,
    ShowModArgs, ToggleModArgs,
};
use miette::Result;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Mod library root (overrides the configured mods folder)
    #[arg(long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect a mod archive without importing it
    Inspect {
        /// Path to the .zip or .7z archive
        file_path: String,
    },
    /// Import mod archives into the library
    Import {
        /// Archive paths or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Archive folder to extract as the mod (skips the prompt)
        #[arg(long)]
        root: Option<String>,

        /// Extract the whole archive instead of a single folder
        #[arg(long)]
        extract_all: bool,

        /// Entity the mod belongs to (id, slug or name)
        #[arg(short, long)]
        entity: Option<String>,

        /// Display name for the mod (single archive only)
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Image file to stage as the mod's preview
        #[arg(long)]
        preview: Option<String>,

        /// Preset(s) the imported mod should join
        #[arg(long = "preset")]
        presets: Vec<String>,

        /// Answer prompts with the analyzer's suggestions
        #[arg(short, long)]
        yes: bool,
    },
    /// List entities with their mod counts
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the mods installed for one entity
    Mods {
        /// Entity id, slug or name
        entity: String,
    },
    /// Show one mod in detail
    Show {
        /// Mod id or name
        reference: String,
    },
    /// Open a mod's folder in the system file browser
    Open {
        /// Mod id or name
        reference: String,
    },
    /// Flip one mod between enabled and disabled
    Toggle {
        /// Mod id or name
        reference: String,
    },
    /// Enable mods
    Enable {
        /// Mod ids or names
        #[arg(required = true)]
        references: Vec<String>,
    },
    /// Disable mods
    Disable {
        /// Mod ids or names
        #[arg(required = true)]
        references: Vec<String>,
    },
    /// Delete a mod's folder and index entry
    Remove {
        /// Mod id or name
        reference: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Edit a mod's metadata or move it to another entity
    Edit {
        /// Mod id or name
        reference: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        tags: Option<String>,

        /// Move the mod under another entity (id, slug or name)
        #[arg(long)]
        entity: Option<String>,
    },
    /// Create a new entity for mods to group under
    NewEntity {
        name: String,

        #[arg(short, long)]
        category: String,
    },
    /// Print the keybinds a mod's INI files declare
    Keybinds {
        /// Mod id or name
        reference: String,
    },
    /// Reconcile the index with the folders on disk
    Refresh,
    /// Launch the configured external tool
    Launch {
        /// Ask for elevation straight away
        #[arg(long)]
        elevated: bool,
    },
    /// Manage presets
    #[command(subcommand)]
    Preset(PresetCommands),
    /// Show or change the modshelf configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "modshelf=warn,modshelf_lib=warn,modshelf_archive=warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = parse_args();
    let root = args.root.as_deref();

    match args.command {
        Commands::Inspect { file_path } => inspect_archive(InspectArchiveArgs { file_path }),
        Commands::Import {
            patterns,
            root: archive_root,
            extract_all,
            entity,
            name,
            author,
            description,
            tags,
            preview,
            presets,
            yes,
        } => import_mods(
            &utils::open_library(root)?,
            ImportModArgs {
                patterns,
                root: archive_root,
                extract_all,
                entity,
                name,
                description,
                author,
                tags,
                preview,
                presets,
                yes,
            },
        ),
        Commands::List { category } => {
            list_entities(&utils::open_library(root)?, ListEntitiesArgs { category })
        }
        Commands::Mods { entity } => {
            list_mods(&utils::open_library(root)?, ListModsArgs { entity })
        }
        Commands::Show { reference } => {
            show_mod(&utils::open_library(root)?, ShowModArgs { reference })
        }
        Commands::Open { reference } => {
            open_folder(&utils::open_library(root)?, OpenFolderArgs { reference })
        }
        Commands::Toggle { reference } => {
            toggle_mod(&utils::open_library(root)?, ToggleModArgs { reference })
        }
        Commands::Enable { references } => {
            enable_mods(&utils::open_library(root)?, SetEnabledArgs { references })
        }
        Commands::Disable { references } => {
            disable_mods(&utils::open_library(root)?, SetEnabledArgs { references })
        }
        Commands::Remove { reference, yes } => {
            remove_mod(&utils::open_library(root)?, RemoveModArgs { reference, yes })
        }
        Commands::Edit {
            reference,
            name,
            description,
            author,
            tags,
            entity,
        } => edit_mod(
            &utils::open_library(root)?,
            EditModArgs {
                reference,
                name,
                description,
                author,
                tags,
                entity,
            },
        ),
        Commands::NewEntity { name, category } => {
            new_entity(&utils::open_library(root)?, NewEntityArgs { name, category })
        }
        Commands::Keybinds { reference } => {
            show_keybinds(&utils::open_library(root)?, ShowKeybindsArgs { reference })
        }
        Commands::Refresh => refresh_library(&utils::open_library(root)?),
        Commands::Launch { elevated } => launch_tool(LaunchToolArgs { elevated }),
        Commands::Preset(command) => run_preset_command(&utils::open_library(root)?, command),
        Commands::Config(command) => run_config_command(command),
    }
}
