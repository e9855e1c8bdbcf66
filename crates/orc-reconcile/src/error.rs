use std::fmt;

use orc_store::StoreError;
use orc_types::{ObjectIdentity, TypeError};

use crate::content::ContentError;

/// The write operation an error happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Creation,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation => write!(f, "creation"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Flat classification of a [`ReconcileError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDeclaration,
    ContentUnavailable,
    RemoteWriteFailed,
    RemoteCloseFailed,
    RemoteReadFailed,
    RemoteDeleteFailed,
}

/// Errors from reconciling one declaration.
///
/// Every variant names the object it concerns; write failures also name the
/// action ("creation" or "update"). None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The declaration is missing a required field or is otherwise unusable.
    /// `action` is set when a create or update rejected it.
    #[error("object resource{}: {id}: invalid declaration: {source}", action_label(.action))]
    InvalidDeclaration {
        action: Option<Action>,
        id: String,
        #[source]
        source: TypeError,
    },

    /// The content source could not be read. No remote call was made.
    #[error("object resource {action}: {id}: {source}")]
    ContentUnavailable {
        action: Action,
        id: ObjectIdentity,
        #[source]
        source: ContentError,
    },

    /// The write stream could not be opened or a write to it failed.
    #[error("object resource {action}: error writing object {id}: {source}")]
    RemoteWriteFailed {
        action: Action,
        id: ObjectIdentity,
        #[source]
        source: StoreError,
    },

    /// Every write succeeded but closing the stream did not; the object is
    /// not committed.
    #[error("object resource {action}: error closing write stream for {id}: {source}")]
    RemoteCloseFailed {
        action: Action,
        id: ObjectIdentity,
        #[source]
        source: StoreError,
    },

    /// The object could not be fetched: absent, unreachable, or undecodable.
    #[error("object resource read: {id}: {source}")]
    RemoteReadFailed {
        id: ObjectIdentity,
        #[source]
        source: StoreError,
    },

    /// The store refused or failed the delete.
    #[error("object resource delete: {id}: {source}")]
    RemoteDeleteFailed {
        id: ObjectIdentity,
        #[source]
        source: StoreError,
    },
}

impl ReconcileError {
    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDeclaration { .. } => ErrorKind::InvalidDeclaration,
            Self::ContentUnavailable { .. } => ErrorKind::ContentUnavailable,
            Self::RemoteWriteFailed { .. } => ErrorKind::RemoteWriteFailed,
            Self::RemoteCloseFailed { .. } => ErrorKind::RemoteCloseFailed,
            Self::RemoteReadFailed { .. } => ErrorKind::RemoteReadFailed,
            Self::RemoteDeleteFailed { .. } => ErrorKind::RemoteDeleteFailed,
        }
    }

    /// The write action, for creation and update failures.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::InvalidDeclaration { action, .. } => *action,
            Self::ContentUnavailable { action, .. }
            | Self::RemoteWriteFailed { action, .. }
            | Self::RemoteCloseFailed { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// The `container/name` the error concerns.
    pub fn id(&self) -> &str {
        match self {
            Self::InvalidDeclaration { id, .. } => id,
            Self::ContentUnavailable { id, .. }
            | Self::RemoteWriteFailed { id, .. }
            | Self::RemoteCloseFailed { id, .. }
            | Self::RemoteReadFailed { id, .. }
            | Self::RemoteDeleteFailed { id, .. } => id.as_str(),
        }
    }

    /// The underlying store error, if the failure came from the client.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::RemoteWriteFailed { source, .. }
            | Self::RemoteCloseFailed { source, .. }
            | Self::RemoteReadFailed { source, .. }
            | Self::RemoteDeleteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn action_label(action: &Option<Action>) -> String {
    action.map(|a| format!(" {a}")).unwrap_or_default()
}

/// Result alias for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
