use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{check_etag, CreateOptions, StoredObject};
use crate::traits::{ObjectClient, ObjectWriter};

/// A client call that can be made to fail once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fault {
    /// `create_object` fails before a writer is returned.
    Create,
    /// The next `ObjectWriter::write` fails.
    Write,
    /// The next `ObjectWriter::close` fails; nothing is committed.
    Close,
    /// The next `get` / `get_string` fails.
    Read,
    /// The next `delete_object` fails.
    Delete,
}

/// Number of calls made against an [`InMemoryObjectClient`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub creates: usize,
    pub writes: usize,
    pub closes: usize,
    pub reads: usize,
    pub deletes: usize,
}

type Containers = HashMap<String, BTreeMap<String, StoredObject>>;

/// In-memory, HashMap-based object client.
///
/// Intended for tests and embedding. Containers must be created before
/// objects are written into them. Every call is counted, and any call can be
/// made to fail exactly once with [`inject`](Self::inject), which reports a
/// [`StoreError::Transport`].
pub struct InMemoryObjectClient {
    containers: RwLock<Containers>,
    faults: Mutex<HashSet<Fault>>,
    creates: AtomicUsize,
    writes: AtomicUsize,
    closes: AtomicUsize,
    reads: AtomicUsize,
    deletes: AtomicUsize,
}

impl InMemoryObjectClient {
    /// Create a client with no containers.
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            faults: Mutex::new(HashSet::new()),
            creates: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    /// Create a client with the given containers already present.
    pub fn with_containers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for name in names {
            client.create_container(name);
        }
        client
    }

    /// Create a container. Existing containers are left untouched.
    pub fn create_container(&self, name: impl Into<String>) {
        self.containers
            .write()
            .expect("lock poisoned")
            .entry(name.into())
            .or_default();
    }

    /// Arrange for the next call of the given kind to fail.
    pub fn inject(&self, fault: Fault) {
        self.faults.lock().expect("lock poisoned").insert(fault);
    }

    /// Snapshot of an object, including its etag and metadata.
    pub fn object(&self, container: &str, name: &str) -> Option<StoredObject> {
        let map = self.containers.read().expect("lock poisoned");
        map.get(container).and_then(|c| c.get(name)).cloned()
    }

    /// Number of objects across all containers.
    pub fn len(&self) -> usize {
        self.containers
            .read()
            .expect("lock poisoned")
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns `true` if no container holds any object.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls made so far.
    pub fn stats(&self) -> ClientStats {
        ClientStats {
            creates: self.creates.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }

    fn take_fault(&self, fault: Fault) -> StoreResult<()> {
        if self.faults.lock().expect("lock poisoned").remove(&fault) {
            return Err(StoreError::Transport(format!("injected {fault:?} fault")));
        }
        Ok(())
    }

    fn check_target(
        &self,
        map: &Containers,
        container: &str,
        name: &str,
        replace: bool,
    ) -> StoreResult<()> {
        let objects = map
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        if !replace && objects.contains_key(name) {
            return Err(StoreError::already_exists(container, name));
        }
        Ok(())
    }
}

impl Default for InMemoryObjectClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectClient for InMemoryObjectClient {
    fn create_object(
        &self,
        container: &str,
        name: &str,
        options: &CreateOptions,
    ) -> StoreResult<Box<dyn ObjectWriter + '_>> {
        self.creates.fetch_add(1, Ordering::Relaxed);
        self.take_fault(Fault::Create)?;
        {
            let map = self.containers.read().expect("lock poisoned");
            self.check_target(&map, container, name, options.replace_if_exists)?;
        }
        debug!(container, name, "opened in-memory write stream");
        Ok(Box::new(MemoryWriter {
            client: self,
            container: container.to_string(),
            name: name.to_string(),
            options: options.clone(),
            buf: Vec::new(),
        }))
    }

    fn get(&self, container: &str, name: &str) -> StoreResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.take_fault(Fault::Read)?;
        let map = self.containers.read().expect("lock poisoned");
        let objects = map
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        objects
            .get(name)
            .map(|obj| obj.data.clone())
            .ok_or_else(|| StoreError::not_found(container, name))
    }

    fn delete_object(&self, container: &str, name: &str) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.take_fault(Fault::Delete)?;
        let mut map = self.containers.write().expect("lock poisoned");
        let objects = map
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(container, name))
    }
}

impl std::fmt::Debug for InMemoryObjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectClient")
            .field("object_count", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Buffers writes and commits them into the client on close.
struct MemoryWriter<'a> {
    client: &'a InMemoryObjectClient,
    container: String,
    name: String,
    options: CreateOptions,
    buf: Vec<u8>,
}

impl ObjectWriter for MemoryWriter<'_> {
    fn write(&mut self, data: &[u8]) -> StoreResult<()> {
        self.client.writes.fetch_add(1, Ordering::Relaxed);
        self.client.take_fault(Fault::Write)?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn close(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        this.client.closes.fetch_add(1, Ordering::Relaxed);
        this.client.take_fault(Fault::Close)?;

        let object = StoredObject::new(this.buf, &this.options);
        check_etag(this.options.etag.as_deref(), &object.etag)?;

        let mut map = this.client.containers.write().expect("lock poisoned");
        // The container may have been replaced or the object created since open.
        this.client.check_target(
            &map,
            &this.container,
            &this.name,
            this.options.replace_if_exists,
        )?;
        let size = object.size();
        map.entry(this.container.clone())
            .or_default()
            .insert(this.name.clone(), object);
        debug!(container = %this.container, name = %this.name, size, "committed object");
        Ok(())
    }
}
