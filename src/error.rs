use std::path::PathBuf;

use thiserror::Error;

/// User-visible outcomes of trying to start a show.
///
/// None of these are fatal; the caller reports them and keeps whatever was
/// on screen before.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShowError {
    /// The request did not carry a directory this application understands.
    #[error("intent not recognized: {0}")]
    UnrecognizedIntent(String),

    /// Enumeration finished without finding a single image.
    #[error("no images found in {0}")]
    EmptyDirectory(String),

    /// Storage access has not been granted yet; nothing was enumerated.
    #[error("storage access required to read {0}")]
    PermissionRequired(String),

    /// A preference could not be used as given.
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
}

/// Configuration problems detected while loading or reading preferences.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for preference slide-duration; must be a positive integer")]
    SlideDuration { value: String },

    #[error("tree-root {} is not a directory", .0.display())]
    TreeRoot(PathBuf),
}
