use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Separator between container and object name in a persisted identity.
pub const SEPARATOR: char = '/';

/// Composite identifier of a remote object: `"<container>/<name>"`.
///
/// An `ObjectIdentity` is a pure function of `(container, name)`; the same
/// pair always yields the same identity. It is the key a resource is
/// persisted under once creation succeeds, and it addresses reads and
/// deletes afterwards.
///
/// Container names never contain [`SEPARATOR`], object names may. A
/// persisted identity is therefore split at its *first* separator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectIdentity {
    id: String,
    split: usize,
}

impl ObjectIdentity {
    /// Derive the identity of `name` inside `container`.
    pub fn derive(container: &str, name: &str) -> Self {
        let mut id = String::with_capacity(container.len() + 1 + name.len());
        id.push_str(container);
        id.push(SEPARATOR);
        id.push_str(name);
        Self {
            id,
            split: container.len(),
        }
    }

    /// Parse a persisted identity string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        match s.split_once(SEPARATOR) {
            Some((container, name)) if !container.is_empty() && !name.is_empty() => {
                Ok(Self::derive(container, name))
            }
            _ => Err(TypeError::InvalidIdentity(s.to_string())),
        }
    }

    /// The full `container/name` string.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// The enclosing container.
    pub fn container(&self) -> &str {
        &self.id[..self.split]
    }

    /// The object's leaf name.
    pub fn name(&self) -> &str {
        &self.id[self.split + SEPARATOR.len_utf8()..]
    }
}

impl fmt::Debug for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectIdentity({})", self.id)
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl TryFrom<String> for ObjectIdentity {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectIdentity> for String {
    fn from(id: ObjectIdentity) -> Self {
        id.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derive_joins_with_slash() {
        let id = ObjectIdentity::derive("bucket1", "a.txt");
        assert_eq!(id.as_str(), "bucket1/a.txt");
        assert_eq!(id.to_string(), "bucket1/a.txt");
        assert_eq!(id.container(), "bucket1");
        assert_eq!(id.name(), "a.txt");
    }

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(
            ObjectIdentity::derive("c", "n"),
            ObjectIdentity::derive("c", "n")
        );
    }

    #[test]
    fn nested_object_names_keep_their_slashes() {
        let id = ObjectIdentity::derive("logs", "2024/01/app.log");
        assert_eq!(id.as_str(), "logs/2024/01/app.log");
        assert_eq!(id.container(), "logs");
        assert_eq!(id.name(), "2024/01/app.log");

        let parsed = ObjectIdentity::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "no-separator", "/name", "container/"] {
            assert_eq!(
                ObjectIdentity::parse(bad),
                Err(TypeError::InvalidIdentity(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let id = ObjectIdentity::derive("bucket1", "a.txt");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bucket1/a.txt\"");
        let back: ObjectIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectIdentity>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn identity_is_container_slash_name(
            container in "[a-zA-Z0-9._-]{0,24}",
            name in "[a-zA-Z0-9._/-]{0,48}",
        ) {
            let id = ObjectIdentity::derive(&container, &name);
            prop_assert_eq!(id.to_string(), format!("{}/{}", container, name));
            prop_assert_eq!(id.container(), container.as_str());
            prop_assert_eq!(id.name(), name.as_str());
        }

        #[test]
        fn parse_recovers_derived_parts(
            container in "[a-z0-9-]{1,24}",
            name in "[a-z0-9./-]{1,48}",
        ) {
            let id = ObjectIdentity::derive(&container, &name);
            let parsed = ObjectIdentity::parse(id.as_str()).unwrap();
            prop_assert_eq!(parsed.container(), container.as_str());
            prop_assert_eq!(parsed.name(), name.as_str());
        }
    }
}
