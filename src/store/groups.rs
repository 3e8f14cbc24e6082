use super::{new_id, Collection};
use crate::model::{Group, GroupFields};
use crate::storage::Storage;

/// Groups start empty; there is no seed collection.
pub struct GroupStore {
    coll: Collection<Group>,
}

impl GroupStore {
    pub const STORAGE_KEY: &'static str = "@groups";

    pub fn new() -> Self {
        GroupStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, None);
    }

    pub fn list(&self) -> &[Group] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.coll.records.iter().find(|g| g.id == id)
    }

    pub fn add(&mut self, storage: &Storage, fields: GroupFields) -> anyhow::Result<Group> {
        let group = Group {
            id: new_id(),
            name: fields.name,
            teacher_id: fields.teacher_id,
            student_ids: fields.student_ids,
        };
        self.coll.records.push(group.clone());
        self.coll.persist(storage)?;
        Ok(group)
    }

    /// Full replace-by-id, id preserved; absent id is a silent no-op.
    /// Membership edits go through here as a whole-record replace, so
    /// studentIds duplicates are never filtered.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        fields: GroupFields,
    ) -> anyhow::Result<Option<Group>> {
        let Some(existing) = self.coll.records.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        *existing = Group {
            id: existing.id.clone(),
            name: fields.name,
            teacher_id: fields.teacher_id,
            student_ids: fields.student_ids,
        };
        let updated = existing.clone();
        self.coll.persist(storage)?;
        Ok(Some(updated))
    }

    /// Deleting a group never cascades: member students keep their groupId
    /// and assignments keep pointing at the removed id.
    pub fn delete(&mut self, storage: &Storage, id: &str) -> anyhow::Result<bool> {
        let before = self.coll.records.len();
        self.coll.records.retain(|g| g.id != id);
        if self.coll.records.len() == before {
            return Ok(false);
        }
        self.coll.persist(storage)?;
        Ok(true)
    }

    pub(crate) fn flush(&mut self, storage: &Storage) -> anyhow::Result<()> {
        self.coll.flush(storage)
    }
}
