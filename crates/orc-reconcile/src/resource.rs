use orc_store::ObjectClient;
use orc_types::{ObjectDeclaration, ObjectIdentity};
use serde::{Deserialize, Serialize};

use crate::error::ReconcileResult;
use crate::reconciler::ObjectReconciler;

/// The persisted record of one object resource.
///
/// `id` is set only by a successful [`create`](Self::create) and never
/// rewritten afterwards; `observed_contents` holds whatever the last
/// [`read`](Self::read) observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectResource {
    #[serde(flatten)]
    pub declaration: ObjectDeclaration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_contents: Option<String>,
}

impl ObjectResource {
    /// A record that has not been created yet.
    pub fn new(declaration: ObjectDeclaration) -> Self {
        Self {
            declaration,
            id: None,
            observed_contents: None,
        }
    }

    /// Returns `true` once the resource has an identity.
    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    /// Create the object and record its identity.
    ///
    /// A record that already has an identity keeps it.
    pub fn create<C: ObjectClient>(
        &mut self,
        reconciler: &ObjectReconciler<C>,
    ) -> ReconcileResult<&ObjectIdentity> {
        let id = reconciler.create(&self.declaration)?;
        Ok(&*self.id.get_or_insert(id))
    }

    /// Rewrite the object's content. The identity is untouched.
    pub fn update<C: ObjectClient>(
        &mut self,
        reconciler: &ObjectReconciler<C>,
    ) -> ReconcileResult<()> {
        reconciler.update(&self.declaration)
    }

    /// Re-fetch the object and record what was observed.
    pub fn read<C: ObjectClient>(
        &mut self,
        reconciler: &ObjectReconciler<C>,
    ) -> ReconcileResult<&str> {
        let contents = reconciler.read(&self.declaration)?;
        Ok(self.observed_contents.insert(contents).as_str())
    }

    /// See [`ObjectReconciler::exists`].
    pub fn exists<C: ObjectClient>(&self, reconciler: &ObjectReconciler<C>) -> bool {
        reconciler.exists(&self.declaration)
    }

    /// Delete the object and clear the record's identity and observations.
    pub fn delete<C: ObjectClient>(
        &mut self,
        reconciler: &ObjectReconciler<C>,
    ) -> ReconcileResult<()> {
        reconciler.delete(&self.declaration)?;
        self.id = None;
        self.observed_contents = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use orc_store::{Fault, InMemoryObjectClient};

    use super::*;

    fn setup() -> (ObjectReconciler<InMemoryObjectClient>, ObjectResource) {
        let reconciler = ObjectReconciler::new(InMemoryObjectClient::with_containers(["bucket1"]));
        let resource = ObjectResource::new(
            ObjectDeclaration::new("bucket1", "a.txt").with_contents("hello world"),
        );
        (reconciler, resource)
    }

    #[test]
    fn identity_is_recorded_only_on_successful_create() {
        let (r, mut res) = setup();
        r.client().inject(Fault::Close);
        assert!(res.create(&r).is_err());
        assert!(!res.is_created());

        let id = res.create(&r).unwrap().clone();
        assert_eq!(id.as_str(), "bucket1/a.txt");
        assert_eq!(res.id, Some(id));
    }

    #[test]
    fn recorded_identity_survives_a_later_create() {
        let (r, mut res) = setup();
        res.create(&r).unwrap();

        res.declaration.name = "b.txt".into();
        let id = res.create(&r).unwrap().clone();
        assert_eq!(id.as_str(), "bucket1/a.txt");
        assert_eq!(res.id.as_ref().map(|id| id.as_str()), Some("bucket1/a.txt"));
        assert!(r.client().object("bucket1", "b.txt").is_some());
    }

    #[test]
    fn update_never_assigns_identity() {
        let (r, mut res) = setup();
        res.update(&r).unwrap();
        assert!(res.id.is_none());
        assert!(res.exists(&r));
    }

    #[test]
    fn read_records_observed_contents() {
        let (r, mut res) = setup();
        res.create(&r).unwrap();
        assert_eq!(res.read(&r).unwrap(), "hello world");
        assert_eq!(res.observed_contents.as_deref(), Some("hello world"));
    }

    #[test]
    fn failed_read_keeps_previous_observation() {
        let (r, mut res) = setup();
        res.create(&r).unwrap();
        res.read(&r).unwrap();
        r.client().inject(Fault::Read);
        assert!(res.read(&r).is_err());
        assert_eq!(res.observed_contents.as_deref(), Some("hello world"));
    }

    #[test]
    fn delete_clears_record() {
        let (r, mut res) = setup();
        res.create(&r).unwrap();
        res.read(&r).unwrap();
        res.delete(&r).unwrap();
        assert!(!res.is_created());
        assert!(res.observed_contents.is_none());
        assert!(!res.exists(&r));
    }

    #[test]
    fn persisted_record_shape() {
        let (r, mut res) = setup();
        res.create(&r).unwrap();
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["id"], "bucket1/a.txt");
        assert_eq!(json["container_name"], "bucket1");
        assert_eq!(json["contents"], "hello world");

        let back: ObjectResource = serde_json::from_value(json).unwrap();
        assert_eq!(back, res);
    }
}
