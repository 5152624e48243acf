mod config;
mod edit;
mod entity;
mod import;
mod inspect;
mod keybinds;
mod launch;
mod list;
mod open;
mod preset;
mod refresh;
mod remove;
mod show;
mod toggle;

pub use config::{run_config_command, ConfigCommands};
pub use edit::{edit_mod, EditModArgs};
pub use entity::{new_entity, NewEntityArgs};
pub use import::{import_mods, ImportModArgs};
pub use inspect::{inspect_archive, InspectArchiveArgs};
pub use keybinds::{show_keybinds, ShowKeybindsArgs};
pub use launch::{launch_tool, LaunchToolArgs};
pub use list::{list_entities, list_mods, ListEntitiesArgs, ListModsArgs};
pub use open::{open_folder, OpenFolderArgs};
pub use preset::{run_preset_command, PresetCommands};
pub use refresh::refresh_library;
pub use remove::{remove_mod, RemoveModArgs};
pub use show::{show_mod, ShowModArgs};
pub use toggle::{disable_mods, enable_mods, toggle_mod, SetEnabledArgs, ToggleModArgs};
