//! Foundation types for object reconciliation.
//!
//! Every other `orc` crate depends on `orc-types`. Nothing here performs I/O;
//! the types describe *what* should exist in a remote object store and *how*
//! it is addressed.
//!
//! # Key Types
//!
//! - [`ObjectDeclaration`] — Desired-state record for one object
//! - [`ContentSource`] — The single content source selected from a declaration
//! - [`ObjectIdentity`] — Composite `container/name` identifier
//! - [`AmbiguousSourcePolicy`] — What to do when both content sources are set

pub mod declaration;
pub mod error;
pub mod identity;

pub use declaration::{AmbiguousSourcePolicy, ContentSource, ObjectDeclaration};
pub use error::TypeError;
pub use identity::ObjectIdentity;
