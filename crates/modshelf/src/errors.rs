use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No mods folder configured")]
    #[diagnostic(
        code(config::no_mods_root),
        help("Run `modshelf config set-root <PATH>` once, or pass --root for this invocation")
    )]
    ModsRootNotConfigured,

    #[error("No tool executable configured")]
    #[diagnostic(
        code(config::no_tool),
        help("Run `modshelf config set-tool <PATH>` to point modshelf at your loader")
    )]
    ToolNotConfigured,

    #[error("{0}")]
    #[diagnostic(code(library::validation))]
    Validation(String),

    #[error("{kind} not found: {id}")]
    #[diagnostic(
        code(library::not_found),
        help("Use `modshelf list` and `modshelf mods <ENTITY>` to see what is installed")
    )]
    NotFound { kind: &'static str, id: String },

    #[error("Another library operation is already in progress")]
    #[diagnostic(
        code(library::busy),
        help("Wait for the other modshelf instance to finish and try again")
    )]
    Busy,

    #[error("The tool requires elevated privileges: {path}")]
    #[diagnostic(
        code(launch::elevation_required),
        help("Re-run with `modshelf launch --elevated`")
    )]
    ElevationRequired { path: String },

    #[error("Cancelled by user")]
    #[diagnostic(code(launch::cancelled))]
    Cancelled,

    #[error("Archive error: {source}")]
    #[diagnostic(code(archive::failed))]
    Archive {
        #[from]
        source: modshelf_archive::ArchiveError,
    },

    #[error("Library index error: {source}")]
    #[diagnostic(
        code(index::failed),
        help("The library.json file may be corrupt; fix or remove it and run `modshelf refresh`")
    )]
    Index { source: serde_json::Error },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl From<modshelf_lib::Error> for CliError {
    fn from(err: modshelf_lib::Error) -> Self {
        match err {
            modshelf_lib::Error::Io(source) => CliError::IoError { source },
            modshelf_lib::Error::Archive(source) => CliError::Archive { source },
            modshelf_lib::Error::Index(source) => CliError::Index { source },
            modshelf_lib::Error::Validation(message) => CliError::Validation(message),
            modshelf_lib::Error::NotFound { kind, id } => CliError::NotFound { kind, id },
            modshelf_lib::Error::OperationInProgress => CliError::Busy,
            modshelf_lib::Error::ElevationRequired { path } => CliError::ElevationRequired { path },
            modshelf_lib::Error::Cancelled => CliError::Cancelled,
        }
    }
}
