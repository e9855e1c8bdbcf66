/// Errors from object client operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object does not exist in its container.
    #[error("object not found: {container}/{name}")]
    ObjectNotFound { container: String, name: String },

    /// The container does not exist.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// The object exists and the write did not ask to replace it.
    #[error("object already exists: {container}/{name}")]
    AlreadyExists { container: String, name: String },

    /// The bytes written do not hash to the declared etag.
    #[error("etag mismatch: expected {expected}, computed {computed}")]
    EtagMismatch { expected: String, computed: String },

    /// The object's content is not valid UTF-8.
    #[error("object {container}/{name} is not valid UTF-8")]
    InvalidUtf8 { container: String, name: String },

    /// The object name cannot be stored by this backend.
    #[error("invalid object name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The backend could not be reached or refused the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if the error means the object is absent, as opposed to
    /// the backend failing to answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. } | Self::ContainerNotFound(_))
    }

    pub(crate) fn not_found(container: &str, name: &str) -> Self {
        Self::ObjectNotFound {
            container: container.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn already_exists(container: &str, name: &str) -> Self {
        Self::AlreadyExists {
            container: container.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(StoreError::not_found("c", "n").is_not_found());
        assert!(StoreError::ContainerNotFound("c".into()).is_not_found());
        assert!(!StoreError::Transport("connection reset".into()).is_not_found());
        assert!(!StoreError::already_exists("c", "n").is_not_found());
    }

    #[test]
    fn display_names_the_object() {
        let err = StoreError::not_found("bucket1", "a.txt");
        assert_eq!(err.to_string(), "object not found: bucket1/a.txt");
    }
}
