mod assignments;
mod grades;
mod groups;
mod session;
mod students;
mod submissions;
mod teachers;

pub use assignments::AssignmentStore;
pub use grades::GradeStore;
pub use groups::GroupStore;
pub use session::SessionStore;
pub use students::StudentStore;
pub use submissions::SubmissionStore;
pub use teachers::TeacherStore;

use crate::storage::Storage;
use anyhow::anyhow;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Wall-clock timestamp in the persisted format: UTC ISO-8601 with
/// millisecond precision and a trailing Z.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One persisted collection and its in-memory mirror. The mirror is
/// authoritative: mutations land in memory first, then the whole collection
/// is written back. A failed write keeps the mirror, marks the collection
/// dirty and surfaces the error; `flush` retries dirty collections.
pub(crate) struct Collection<T> {
    key: &'static str,
    pub(crate) records: Vec<T>,
    dirty: bool,
}

impl<T: Serialize + DeserializeOwned + Clone> Collection<T> {
    pub(crate) fn new(key: &'static str) -> Self {
        Collection {
            key,
            records: Vec::new(),
            dirty: false,
        }
    }

    /// Reads the collection from storage. A missing key installs the seed
    /// (when there is one); an unreadable or malformed payload leaves the
    /// mirror empty and the stored blob untouched.
    pub(crate) fn load(&mut self, storage: &Storage, seed: Option<Vec<T>>) {
        match storage.get_json::<Vec<T>>(self.key) {
            Ok(Some(records)) => {
                self.records = records;
            }
            Ok(None) => {
                if let Some(seed) = seed {
                    self.records = seed;
                    // Seeding is best-effort; a failed write is already
                    // logged and stays dirty for flush to retry.
                    let _ = self.persist(storage);
                }
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to load collection, starting empty");
            }
        }
    }

    pub(crate) fn persist(&mut self, storage: &Storage) -> anyhow::Result<()> {
        match storage.set_json(self.key, &self.records) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::error!(key = self.key, error = %e, "collection write failed, in-memory state kept");
                Err(e)
            }
        }
    }

    pub(crate) fn flush(&mut self, storage: &Storage) -> anyhow::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist(storage)
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Owns the storage handle and every entity store. Built once per workspace:
/// `open` is the init hook (loads and seeds all collections), `flush` the
/// teardown hook (re-persists anything a failed write left dirty).
pub struct Registry {
    pub storage: Storage,
    pub students: StudentStore,
    pub teachers: TeacherStore,
    pub groups: GroupStore,
    pub assignments: AssignmentStore,
    pub submissions: SubmissionStore,
    pub grades: GradeStore,
    pub session: SessionStore,
}

impl Registry {
    pub fn open(storage: Storage) -> Registry {
        let mut registry = Registry {
            storage,
            students: StudentStore::new(),
            teachers: TeacherStore::new(),
            groups: GroupStore::new(),
            assignments: AssignmentStore::new(),
            submissions: SubmissionStore::new(),
            grades: GradeStore::new(),
            session: SessionStore::new(),
        };
        registry.students.load(&registry.storage);
        registry.teachers.load(&registry.storage);
        registry.groups.load(&registry.storage);
        registry.assignments.load(&registry.storage);
        registry.submissions.load(&registry.storage);
        registry.grades.load(&registry.storage);
        registry.session.load(&registry.storage);
        registry
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        let mut failed: Vec<&'static str> = Vec::new();
        if self.students.flush(&self.storage).is_err() {
            failed.push(StudentStore::STORAGE_KEY);
        }
        if self.teachers.flush(&self.storage).is_err() {
            failed.push(TeacherStore::STORAGE_KEY);
        }
        if self.groups.flush(&self.storage).is_err() {
            failed.push(GroupStore::STORAGE_KEY);
        }
        if self.assignments.flush(&self.storage).is_err() {
            failed.push(AssignmentStore::STORAGE_KEY);
        }
        if self.submissions.flush(&self.storage).is_err() {
            failed.push(SubmissionStore::STORAGE_KEY);
        }
        if self.grades.flush(&self.storage).is_err() {
            failed.push(GradeStore::STORAGE_KEY);
        }
        if self.session.flush(&self.storage).is_err() {
            failed.push(SessionStore::STORAGE_KEY);
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("flush failed for: {}", failed.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_installs_seed_when_key_absent() {
        let storage = Storage::open_in_memory().expect("open");
        let mut coll: Collection<serde_json::Value> = Collection::new("@students_data");
        coll.load(&storage, Some(vec![json!({ "id": "1" })]));
        assert_eq!(coll.records.len(), 1);

        // The seed was persisted, not just mirrored.
        let stored: Option<Vec<serde_json::Value>> =
            storage.get_json("@students_data").expect("get");
        assert_eq!(stored.map(|v| v.len()), Some(1));
    }

    #[test]
    fn load_prefers_stored_data_over_seed() {
        let storage = Storage::open_in_memory().expect("open");
        storage
            .set_json("@students_data", &json!([{ "id": "kept" }]))
            .expect("set");
        let mut coll: Collection<serde_json::Value> = Collection::new("@students_data");
        coll.load(&storage, Some(vec![json!({ "id": "seed" })]));
        assert_eq!(coll.records[0]["id"], "kept");
    }

    #[test]
    fn load_of_malformed_payload_starts_empty_and_keeps_blob() {
        let storage = Storage::open_in_memory().expect("open");
        storage
            .set_json("@groups", &json!("definitely not an array of groups"))
            .expect("set");
        let mut coll: Collection<crate::model::Group> = Collection::new("@groups");
        coll.load(&storage, None);
        assert!(coll.records.is_empty());

        // The malformed blob stays in place for inspection.
        let raw: Option<serde_json::Value> = storage.get_json("@groups").expect("get");
        assert!(raw.is_some());
    }

    #[test]
    fn flush_is_a_no_op_when_clean() {
        let storage = Storage::open_in_memory().expect("open");
        let mut coll: Collection<serde_json::Value> = Collection::new("grades");
        coll.load(&storage, None);
        assert!(!coll.is_dirty());
        coll.flush(&storage).expect("flush");
        let stored: Option<serde_json::Value> = storage.get_json("grades").expect("get");
        assert!(stored.is_none(), "clean flush must not write");
    }
}
