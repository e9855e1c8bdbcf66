use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::{ObjectIdentity, SEPARATOR};

/// How to treat a declaration that sets both `source_file` and `contents`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousSourcePolicy {
    /// `source_file` is checked first and wins; `contents` is ignored.
    #[default]
    PreferFile,
    /// Declaring both is a validation error.
    Reject,
}

/// Desired state for a single remote object.
///
/// Field names match the declaration storage schema: `name`,
/// `container_name`, `source_file`, `contents`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDeclaration {
    /// Leaf identifier of the object.
    pub name: String,
    /// Enclosing container.
    pub container_name: String,
    /// Filesystem path to the content bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
    /// Literal content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

/// The one content source a declaration resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource<'a> {
    File(&'a Path),
    Inline(&'a str),
    Empty,
}

impl ContentSource<'_> {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Inline(_) => "inline",
            Self::Empty => "empty",
        }
    }
}

impl ObjectDeclaration {
    /// A declaration with no content source.
    pub fn new(container_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container_name: container_name.into(),
            source_file: None,
            contents: None,
        }
    }

    /// Set the source file path.
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// Set literal contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// The identity this declaration addresses.
    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity::derive(&self.container_name, &self.name)
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.is_empty() {
            return Err(TypeError::MissingField("name"));
        }
        if self.container_name.is_empty() {
            return Err(TypeError::MissingField("container_name"));
        }
        if self.container_name.contains(SEPARATOR) {
            return Err(TypeError::InvalidContainerName {
                name: self.container_name.clone(),
                reason: format!("must not contain {SEPARATOR:?}"),
            });
        }
        Ok(())
    }

    fn declared_file(&self) -> Option<&Path> {
        self.source_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    fn declared_contents(&self) -> Option<&str> {
        self.contents.as_deref().filter(|c| !c.is_empty())
    }

    /// Returns `true` if both content sources are set (and non-empty).
    pub fn has_ambiguous_source(&self) -> bool {
        self.declared_file().is_some() && self.declared_contents().is_some()
    }

    /// Select the content source: `source_file`, then `contents`, then empty.
    ///
    /// Empty strings count as unset.
    pub fn content_source(
        &self,
        policy: AmbiguousSourcePolicy,
    ) -> Result<ContentSource<'_>, TypeError> {
        if policy == AmbiguousSourcePolicy::Reject && self.has_ambiguous_source() {
            return Err(TypeError::AmbiguousSource(self.identity().to_string()));
        }
        if let Some(path) = self.declared_file() {
            Ok(ContentSource::File(path))
        } else if let Some(contents) = self.declared_contents() {
            Ok(ContentSource::Inline(contents))
        } else {
            Ok(ContentSource::Empty)
        }
    }
}
