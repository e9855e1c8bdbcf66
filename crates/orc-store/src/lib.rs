//! Object-store client boundary for the reconciliation core.
//!
//! The reconciler never speaks a storage protocol itself. It talks to an
//! [`ObjectClient`], which exposes three calls modelled on a Swift-style
//! object API:
//!
//! - [`ObjectClient::create_object`] -- open a write stream ([`ObjectWriter`])
//! - [`ObjectClient::get_string`] -- fetch an object's full content as text
//! - [`ObjectClient::delete_object`] -- remove an object
//!
//! # Clients
//!
//! - [`InMemoryObjectClient`] -- `HashMap`-based client for tests and embedding,
//!   with call counters and one-shot fault injection
//! - [`LocalObjectClient`] -- directory-backed client, one directory per
//!   container, atomic commit on close
//!
//! # Write Discipline
//!
//! 1. Nothing is visible until [`ObjectWriter::close`] returns `Ok`.
//! 2. A writer dropped without `close` commits nothing.
//! 3. `replace_if_exists = false` fails with [`StoreError::AlreadyExists`].
//! 4. A declared `etag` that does not match the written bytes fails the close.

pub mod error;
pub mod local;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use local::LocalObjectClient;
pub use memory::{ClientStats, Fault, InMemoryObjectClient};
pub use object::{content_etag, CreateOptions, StoredObject};
pub use traits::{ObjectClient, ObjectWriter};
