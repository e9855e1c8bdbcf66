use orc_store::{content_etag, CreateOptions, ObjectClient, StoreError};
use orc_types::{ObjectDeclaration, ObjectIdentity};
use tracing::{debug, info, warn};

use crate::config::ReconcilerConfig;
use crate::content::resolve;
use crate::error::{Action, ReconcileError, ReconcileResult};

/// Runs create/read/update/delete/exists for object declarations against a
/// single [`ObjectClient`].
///
/// The reconciler holds no state between calls. Every operation is one
/// round trip to the client, so declarations with distinct identities can be
/// reconciled concurrently through a shared reconciler. Operations on the
/// same identity race at the store.
pub struct ObjectReconciler<C> {
    client: C,
    config: ReconcilerConfig,
}

impl<C: ObjectClient> ObjectReconciler<C> {
    /// Create a reconciler with the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, ReconcilerConfig::default())
    }

    /// Create a reconciler with an explicit configuration.
    pub fn with_config(client: C, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The active configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Write the declared object and return its identity.
    ///
    /// The identity is only returned once the write stream has closed
    /// cleanly. On failure the remote object may be partially written;
    /// calling `create` again replaces it.
    pub fn create(&self, decl: &ObjectDeclaration) -> ReconcileResult<ObjectIdentity> {
        let id = self.write(Action::Creation, decl)?;
        info!(id = %id, "object created");
        Ok(id)
    }

    /// Rewrite the declared object's content. Same protocol as
    /// [`create`](Self::create); no identity is produced.
    pub fn update(&self, decl: &ObjectDeclaration) -> ReconcileResult<()> {
        let id = self.write(Action::Update, decl)?;
        info!(id = %id, "object updated");
        Ok(())
    }

    /// Fetch the object's current content.
    ///
    /// Absence and transport failures are reported alike as
    /// [`ReconcileError::RemoteReadFailed`].
    pub fn read(&self, decl: &ObjectDeclaration) -> ReconcileResult<String> {
        let id = checked_identity(decl, None)?;
        match self.client.get_string(&decl.container_name, &decl.name) {
            Ok(contents) => {
                debug!(id = %id, bytes = contents.len(), "object read");
                Ok(contents)
            }
            Err(source) => {
                debug!(id = %id, error = %source, "object read failed");
                Err(ReconcileError::RemoteReadFailed { id, source })
            }
        }
    }

    /// Returns `true` iff [`read`](Self::read) succeeds.
    ///
    /// Any read failure, including a transient one, reads as absence. Use
    /// [`probe`](Self::probe) to tell the two apart.
    pub fn exists(&self, decl: &ObjectDeclaration) -> bool {
        self.read(decl).is_ok()
    }

    /// Like [`exists`](Self::exists), but only a store "not found" counts as
    /// absence; any other read failure is returned.
    pub fn probe(&self, decl: &ObjectDeclaration) -> ReconcileResult<bool> {
        match self.read(decl) {
            Ok(_) => Ok(true),
            Err(ReconcileError::RemoteReadFailed { source, .. }) if source.is_not_found() => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the object. Absence is not checked first; the client's error
    /// is reported as is.
    pub fn delete(&self, decl: &ObjectDeclaration) -> ReconcileResult<()> {
        let id = checked_identity(decl, None)?;
        if let Err(source) = self.client.delete_object(&decl.container_name, &decl.name) {
            warn!(id = %id, error = %source, "object delete failed");
            return Err(ReconcileError::RemoteDeleteFailed { id, source });
        }
        info!(id = %id, "object deleted");
        Ok(())
    }

    /// Resolve content, then open, fill, and close a replace-mode stream.
    fn write(&self, action: Action, decl: &ObjectDeclaration) -> ReconcileResult<ObjectIdentity> {
        let id = checked_identity(decl, Some(action))?;

        if decl.has_ambiguous_source() {
            warn!(id = %id, "both source_file and contents are set");
        }
        let source = decl
            .content_source(self.config.ambiguous_source)
            .map_err(|source| ReconcileError::InvalidDeclaration {
                action: Some(action),
                id: id.to_string(),
                source,
            })?;
        let data = resolve(&source).map_err(|source| {
            warn!(id = %id, %action, error = %source, "content unavailable");
            ReconcileError::ContentUnavailable {
                action,
                id: id.clone(),
                source,
            }
        })?;

        let mut options = CreateOptions::replace();
        if self.config.verify_etag {
            options.etag = Some(content_etag(&data));
        }

        let write_failed = |source: StoreError| {
            warn!(id = %id, %action, error = %source, "object write failed");
            ReconcileError::RemoteWriteFailed {
                action,
                id: id.clone(),
                source,
            }
        };
        let mut stream = self
            .client
            .create_object(&decl.container_name, &decl.name, &options)
            .map_err(write_failed)?;
        stream.write(&data).map_err(write_failed)?;

        stream.close().map_err(|source| {
            warn!(id = %id, %action, error = %source, "closing write stream failed");
            ReconcileError::RemoteCloseFailed {
                action,
                id: id.clone(),
                source,
            }
        })?;

        debug!(id = %id, %action, bytes = data.len(), "write stream closed");
        Ok(id)
    }
}

impl<C> std::fmt::Debug for ObjectReconciler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectReconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn checked_identity(
    decl: &ObjectDeclaration,
    action: Option<Action>,
) -> ReconcileResult<ObjectIdentity> {
    let id = decl.identity();
    decl.validate()
        .map_err(|source| ReconcileError::InvalidDeclaration {
            action,
            id: id.to_string(),
            source,
        })?;
    Ok(id)
}
