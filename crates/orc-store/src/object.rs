use std::collections::BTreeMap;

/// Options for opening a write stream, mirroring the object-create call of
/// Swift-style APIs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Overwrite an existing object instead of failing.
    pub replace_if_exists: bool,
    /// Content type recorded with the object.
    pub content_type: Option<String>,
    /// Expected etag of the complete payload, checked on close.
    pub etag: Option<String>,
    /// User metadata recorded with the object.
    pub metadata: BTreeMap<String, String>,
}

impl CreateOptions {
    /// Replace mode with no content type, etag, or metadata.
    pub fn replace() -> Self {
        Self {
            replace_if_exists: true,
            ..Self::default()
        }
    }

    /// Set the expected etag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// An object as held by the in-memory client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub etag: String,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl StoredObject {
    /// Build a stored object from committed bytes and the options they were
    /// written with.
    pub fn new(data: Vec<u8>, options: &CreateOptions) -> Self {
        let etag = content_etag(&data);
        Self {
            data,
            etag,
            content_type: options.content_type.clone(),
            metadata: options.metadata.clone(),
        }
    }

    /// The size of `data` in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Etag of a payload: hex-encoded BLAKE3 hash.
pub fn content_etag(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

pub(crate) fn check_etag(expected: Option<&str>, computed: &str) -> crate::StoreResult<()> {
    match expected {
        Some(expected) if !expected.eq_ignore_ascii_case(computed) => {
            Err(crate::StoreError::EtagMismatch {
                expected: expected.to_string(),
                computed: computed.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_has_no_extras() {
        let opts = CreateOptions::replace();
        assert!(opts.replace_if_exists);
        assert!(opts.content_type.is_none());
        assert!(opts.etag.is_none());
        assert!(opts.metadata.is_empty());
    }

    #[test]
    fn etag_is_stable_hex() {
        let a = content_etag(b"hello world");
        assert_eq!(a, content_etag(b"hello world"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_etag(b"hello world!"));
    }

    #[test]
    fn etag_check() {
        let tag = content_etag(b"x");
        assert!(check_etag(None, &tag).is_ok());
        assert!(check_etag(Some(&tag.to_uppercase()), &tag).is_ok());
        assert!(matches!(
            check_etag(Some("deadbeef"), &tag),
            Err(crate::StoreError::EtagMismatch { .. })
        ));
    }

    #[test]
    fn stored_object_records_options() {
        let opts = CreateOptions::replace().with_content_type("text/plain");
        let obj = StoredObject::new(b"abc".to_vec(), &opts);
        assert_eq!(obj.size(), 3);
        assert_eq!(obj.content_type.as_deref(), Some("text/plain"));
        assert_eq!(obj.etag, content_etag(b"abc"));
    }
}
