use std::path::PathBuf;

use thiserror::Error;

/// Failures the user can act on. Anything else reaching the top level is
/// treated as an internal error and shown with its full chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GgptError {
    #[error("not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error("no content to request")]
    NoContent,

    #[error("diff is {length} characters long, the maximum is {max}")]
    DiffTooLong { length: usize, max: usize },

    #[error("no OpenAI API key configured for `{command}`")]
    MissingCredential { command: String },

    #[error("the OpenAI API rejected the API key")]
    InvalidCredential,

    #[error("command '{name}' is not implemented")]
    UnsupportedCommand { name: String },

    #[error("--hash and --staged are mutually exclusive")]
    ConflictingDiffSources,
}
