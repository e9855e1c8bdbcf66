use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid container name {name:?}: {reason}")]
    InvalidContainerName { name: String, reason: String },

    #[error("invalid object identity {0:?}: expected <container>/<name>")]
    InvalidIdentity(String),

    #[error("both source_file and contents are set for {0}")]
    AmbiguousSource(String),
}
