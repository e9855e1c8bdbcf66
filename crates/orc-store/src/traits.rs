use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::object::CreateOptions;

/// A write stream for one object, opened by [`ObjectClient::create_object`].
///
/// All implementations must satisfy these invariants:
/// - Bytes passed to `write` are not visible to readers until `close`
///   returns `Ok`.
/// - A failed `close` means the object was not committed, regardless of how
///   many writes succeeded before it.
/// - Dropping a writer without calling `close` discards the written bytes.
pub trait ObjectWriter {
    /// Append `data` to the stream.
    fn write(&mut self, data: &[u8]) -> StoreResult<()>;

    /// Commit the stream. Consumes the writer.
    fn close(self: Box<Self>) -> StoreResult<()>;
}

/// Client for a remote object store.
///
/// The connection behind a client is opaque to callers and may be shared;
/// implementations must be safe to call from several threads. No call is
/// retried by the client's callers.
pub trait ObjectClient: Send + Sync {
    /// Open a write stream for `container/name`.
    fn create_object(
        &self,
        container: &str,
        name: &str,
        options: &CreateOptions,
    ) -> StoreResult<Box<dyn ObjectWriter + '_>>;

    /// Fetch the full content of `container/name`.
    fn get(&self, container: &str, name: &str) -> StoreResult<Vec<u8>>;

    /// Fetch the full content of `container/name` as a string.
    ///
    /// Default implementation decodes [`get`](Self::get) as UTF-8.
    fn get_string(&self, container: &str, name: &str) -> StoreResult<String> {
        let data = self.get(container, name)?;
        String::from_utf8(data).map_err(|_| StoreError::InvalidUtf8 {
            container: container.to_string(),
            name: name.to_string(),
        })
    }

    /// Delete `container/name`.
    ///
    /// An absent object is reported as [`StoreError::ObjectNotFound`].
    fn delete_object(&self, container: &str, name: &str) -> StoreResult<()>;
}

impl<T: ObjectClient + ?Sized> ObjectClient for &T {
    fn create_object(
        &self,
        container: &str,
        name: &str,
        options: &CreateOptions,
    ) -> StoreResult<Box<dyn ObjectWriter + '_>> {
        (**self).create_object(container, name, options)
    }

    fn get(&self, container: &str, name: &str) -> StoreResult<Vec<u8>> {
        (**self).get(container, name)
    }

    fn get_string(&self, container: &str, name: &str) -> StoreResult<String> {
        (**self).get_string(container, name)
    }

    fn delete_object(&self, container: &str, name: &str) -> StoreResult<()> {
        (**self).delete_object(container, name)
    }
}

impl<T: ObjectClient + ?Sized> ObjectClient for Arc<T> {
    fn create_object(
        &self,
        container: &str,
        name: &str,
        options: &CreateOptions,
    ) -> StoreResult<Box<dyn ObjectWriter + '_>> {
        (**self).create_object(container, name, options)
    }

    fn get(&self, container: &str, name: &str) -> StoreResult<Vec<u8>> {
        (**self).get(container, name)
    }

    fn get_string(&self, container: &str, name: &str) -> StoreResult<String> {
        (**self).get_string(container, name)
    }

    fn delete_object(&self, container: &str, name: &str) -> StoreResult<()> {
        (**self).delete_object(container, name)
    }
}
