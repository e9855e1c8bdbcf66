//! Object reconciliation core.
//!
//! Converges a remote object store towards an [`ObjectDeclaration`]: an
//! object named `name` with some content must exist in `container_name`.
//! The caller (a plan engine) decides *which* operation to run; this crate
//! runs it against an [`ObjectClient`] and reports success or a classified
//! [`ReconcileError`].
//!
//! # Operations
//!
//! | Operation | Returns | Failure |
//! |-----------|---------|---------|
//! | [`ObjectReconciler::create`] | [`ObjectIdentity`] | content / write / close |
//! | [`ObjectReconciler::update`] | `()` | content / write / close |
//! | [`ObjectReconciler::read`] | contents as `String` | read |
//! | [`ObjectReconciler::exists`] | `bool` | never fails |
//! | [`ObjectReconciler::probe`] | `bool` | non-absence read failures |
//! | [`ObjectReconciler::delete`] | `()` | delete |
//!
//! # Rules
//!
//! 1. Content is resolved in full before any remote call; a missing source
//!    file means no write stream is ever opened.
//! 2. Writes always open in replace mode, so repeating a create converges.
//! 3. A write is committed only when the stream closes cleanly; a close
//!    failure is reported, never swallowed.
//! 4. Nothing is retried or cached; every read goes to the store.

pub mod config;
pub mod content;
pub mod error;
pub mod reconciler;
pub mod resource;

pub use config::ReconcilerConfig;
pub use content::{resolve, ContentError};
pub use error::{Action, ErrorKind, ReconcileError, ReconcileResult};
pub use reconciler::ObjectReconciler;
pub use resource::ObjectResource;

pub use orc_store::ObjectClient;
pub use orc_types::{AmbiguousSourcePolicy, ObjectDeclaration, ObjectIdentity};
