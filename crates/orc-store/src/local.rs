use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::object::{check_etag, CreateOptions};
use crate::traits::{ObjectClient, ObjectWriter};

/// Directory-backed object client.
///
/// Layout on disk:
/// ```text
/// <root>/<container>/<name>
/// ```
///
/// Each container is a directory under `root` and must exist before objects
/// are written into it. Object names may contain `/`, which become nested
/// directories. Writes stream into a temporary file inside the container
/// directory and are renamed into place on close, so readers never observe a
/// partially written object.
///
/// Content type and metadata are not persisted by this backend.
#[derive(Clone, Debug)]
pub struct LocalObjectClient {
    root: PathBuf,
}

impl LocalObjectClient {
    /// Open a client rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a container directory. Existing containers are left untouched.
    pub fn create_container(&self, container: &str) -> StoreResult<()> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(dir)?;
        Ok(())
    }

    fn container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        validate_component(container)?;
        Ok(self.root.join(container))
    }

    fn existing_container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        let dir = self.container_dir(container)?;
        if !dir.is_dir() {
            return Err(StoreError::ContainerNotFound(container.to_string()));
        }
        Ok(dir)
    }

    fn object_path(&self, container: &str, name: &str) -> StoreResult<(PathBuf, PathBuf)> {
        let dir = self.existing_container_dir(container)?;
        validate_object_name(name)?;
        let path = dir.join(name);
        Ok((dir, path))
    }
}

/// Reject names that would escape the container directory or alias another
/// name once the OS normalizes the path.
fn validate_object_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if name.starts_with('/') || Path::new(name).has_root() {
        return Err(invalid(name, "must be relative"));
    }
    for segment in name.split('/') {
        match segment {
            "" => return Err(invalid(name, "must not contain empty segments")),
            "." | ".." => {
                return Err(invalid(name, "must not contain '.' or '..' segments"));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_component(container: &str) -> StoreResult<()> {
    if container.is_empty() || container == "." || container == ".." || container.contains('/') {
        return Err(invalid(container, "not a valid container name"));
    }
    Ok(())
}

fn invalid(name: &str, reason: &str) -> StoreError {
    StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// A missing file and a missing parent directory both mean the object is
/// absent. `NotADirectory` shows up when a parent segment is itself an object.
fn map_not_found(err: io::Error, container: &str, name: &str) -> StoreError {
    if matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    ) {
        StoreError::not_found(container, name)
    } else {
        StoreError::Io(err)
    }
}

impl ObjectClient for LocalObjectClient {
    fn create_object(
        &self,
        container: &str,
        name: &str,
        options: &CreateOptions,
    ) -> StoreResult<Box<dyn ObjectWriter + '_>> {
        let (dir, path) = self.object_path(container, name)?;
        if !options.replace_if_exists && path.exists() {
            return Err(StoreError::already_exists(container, name));
        }
        let tmp = NamedTempFile::new_in(&dir)?;
        debug!(path = %path.display(), tmp = %tmp.path().display(), "opened local write stream");
        Ok(Box::new(LocalWriter {
            container: container.to_string(),
            name: name.to_string(),
            path,
            replace: options.replace_if_exists,
            etag: options.etag.clone(),
            hasher: blake3::Hasher::new(),
            file: BufWriter::new(tmp),
        }))
    }

    fn get(&self, container: &str, name: &str) -> StoreResult<Vec<u8>> {
        let (_, path) = self.object_path(container, name)?;
        if path.is_dir() {
            return Err(StoreError::not_found(container, name));
        }
        fs::read(&path).map_err(|e| map_not_found(e, container, name))
    }

    fn delete_object(&self, container: &str, name: &str) -> StoreResult<()> {
        let (_, path) = self.object_path(container, name)?;
        if path.is_dir() {
            return Err(StoreError::not_found(container, name));
        }
        fs::remove_file(&path).map_err(|e| map_not_found(e, container, name))?;
        debug!(path = %path.display(), "deleted local object");
        Ok(())
    }
}

/// Streams into a temp file next to the target and renames it on close.
struct LocalWriter {
    container: String,
    name: String,
    path: PathBuf,
    replace: bool,
    etag: Option<String>,
    hasher: blake3::Hasher,
    file: BufWriter<NamedTempFile>,
}

impl ObjectWriter for LocalWriter {
    fn write(&mut self, data: &[u8]) -> StoreResult<()> {
        self.file.write_all(data)?;
        self.hasher.update(data);
        Ok(())
    }

    fn close(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        let tmp = this.file.into_inner().map_err(|e| e.into_error())?;
        tmp.as_file().sync_all()?;

        let computed = hex::encode(this.hasher.finalize().as_bytes());
        check_etag(this.etag.as_deref(), &computed)?;

        if let Some(parent) = this.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let persisted = if this.replace {
            tmp.persist(&this.path)
        } else {
            tmp.persist_noclobber(&this.path)
        };
        match persisted {
            Ok(_) => {
                debug!(path = %this.path.display(), "committed local object");
                Ok(())
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::already_exists(&this.container, &this.name))
            }
            Err(e) => {
                warn!(path = %this.path.display(), error = %e.error, "failed to persist object");
                Err(StoreError::Io(e.error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::content_etag;

    fn setup() -> (tempfile::TempDir, LocalObjectClient) {
        let dir = tempfile::tempdir().unwrap();
        let client = LocalObjectClient::open(dir.path().join("store")).unwrap();
        client.create_container("bucket").unwrap();
        (dir, client)
    }

    fn put(client: &LocalObjectClient, name: &str, data: &[u8]) -> StoreResult<()> {
        let mut w = client.create_object("bucket", name, &CreateOptions::replace())?;
        w.write(data)?;
        w.close()
    }

    #[test]
    fn write_then_read() {
        let (_dir, client) = setup();
        put(&client, "a.txt", b"hello world").unwrap();
        assert_eq!(client.get_string("bucket", "a.txt").unwrap(), "hello world");
        assert!(client.root().join("bucket/a.txt").is_file());
    }

    #[test]
    fn large_payload_round_trips() {
        let (_dir, client) = setup();
        let data: Vec<u8> = (0..(1 << 20)).map(|i| (i % 251) as u8).collect();
        put(&client, "big.bin", &data).unwrap();
        assert_eq!(client.get("bucket", "big.bin").unwrap(), data);
    }

    #[test]
    fn nested_names_create_directories() {
        let (_dir, client) = setup();
        put(&client, "2024/01/app.log", b"line").unwrap();
        assert_eq!(client.get("bucket", "2024/01/app.log").unwrap(), b"line");
        assert!(client.get("bucket", "2024").unwrap_err().is_not_found());
    }

    #[test]
    fn dropped_writer_leaves_no_object() {
        let (_dir, client) = setup();
        let mut w = client
            .create_object("bucket", "abandoned", &CreateOptions::replace())
            .unwrap();
        w.write(b"partial").unwrap();
        drop(w);
        assert!(client.get("bucket", "abandoned").unwrap_err().is_not_found());
        let leftovers = fs::read_dir(client.root().join("bucket")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn replace_and_noclobber() {
        let (_dir, client) = setup();
        put(&client, "obj", b"v1").unwrap();
        put(&client, "obj", b"v2").unwrap();
        assert_eq!(client.get("bucket", "obj").unwrap(), b"v2");

        let err = client
            .create_object("bucket", "obj", &CreateOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn etag_mismatch_commits_nothing() {
        let (_dir, client) = setup();
        let opts = CreateOptions::replace().with_etag(content_etag(b"other"));
        let mut w = client.create_object("bucket", "obj", &opts).unwrap();
        w.write(b"data").unwrap();
        assert!(matches!(w.close(), Err(StoreError::EtagMismatch { .. })));
        assert!(client.get("bucket", "obj").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_semantics() {
        let (_dir, client) = setup();
        put(&client, "obj", b"x").unwrap();
        client.delete_object("bucket", "obj").unwrap();
        assert!(client.delete_object("bucket", "obj").unwrap_err().is_not_found());
    }

    #[test]
    fn missing_container_is_not_found() {
        let (_dir, client) = setup();
        let err = client.get("absent", "obj").unwrap_err();
        assert!(matches!(err, StoreError::ContainerNotFound(_)));
        assert!(client
            .create_object("absent", "obj", &CreateOptions::replace())
            .is_err());
    }

    #[test]
    fn rejects_escaping_names() {
        let (_dir, client) = setup();
        for bad in ["../escape", "/abs", "./x", "a/../b", "dir/"] {
            let err = client.get("bucket", bad).unwrap_err();
            assert!(
                matches!(err, StoreError::InvalidName { .. }),
                "{bad:?} should be rejected"
            );
        }
        assert!(client.create_container("..").is_err());
    }

    #[test]
    fn rejects_names_that_alias_other_paths() {
        let (_dir, client) = setup();
        put(&client, "a/b", b"first").unwrap();
        put(&client, "x/y", b"second").unwrap();
        for bad in ["a//b", "x/./y", "a/b/", "//a"] {
            let err = put(&client, bad, b"clobber").unwrap_err();
            assert!(
                matches!(err, StoreError::InvalidName { .. }),
                "{bad:?} should be rejected"
            );
            assert!(matches!(
                client.delete_object("bucket", bad),
                Err(StoreError::InvalidName { .. })
            ));
        }
        assert_eq!(client.get("bucket", "a/b").unwrap(), b"first");
        assert_eq!(client.get("bucket", "x/y").unwrap(), b"second");
    }

    #[test]
    fn child_of_an_object_is_not_found() {
        let (_dir, client) = setup();
        put(&client, "a.txt", b"hello").unwrap();
        assert!(client.get("bucket", "a.txt/b").unwrap_err().is_not_found());
        assert!(client
            .delete_object("bucket", "a.txt/b")
            .unwrap_err()
            .is_not_found());
        assert_eq!(client.get("bucket", "a.txt").unwrap(), b"hello");
    }
}
