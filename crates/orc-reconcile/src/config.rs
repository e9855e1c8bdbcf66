use orc_types::AmbiguousSourcePolicy;
use serde::{Deserialize, Serialize};

/// Reconciler settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// What to do when a declaration sets both `source_file` and `contents`.
    pub ambiguous_source: AmbiguousSourcePolicy,
    /// Send the etag of the resolved payload with every write so the store
    /// rejects a stream that does not match it.
    pub verify_etag: bool,
}
