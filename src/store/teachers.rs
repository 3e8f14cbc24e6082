use super::{new_id, Collection};
use crate::model::{Role, Teacher, TeacherFields};
use crate::storage::Storage;

pub struct TeacherStore {
    coll: Collection<Teacher>,
}

impl TeacherStore {
    pub const STORAGE_KEY: &'static str = "@teachers_data";

    pub fn new() -> Self {
        TeacherStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, Some(seed_teachers()));
    }

    pub fn list(&self) -> &[Teacher] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Teacher> {
        self.coll.records.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, storage: &Storage, fields: TeacherFields) -> anyhow::Result<Teacher> {
        let teacher = Teacher {
            id: new_id(),
            name: fields.name,
            family_name: fields.family_name,
            subject: fields.subject,
            group: fields.group,
            role: fields.role,
        };
        self.coll.records.push(teacher.clone());
        self.coll.persist(storage)?;
        Ok(teacher)
    }

    /// Full replace-by-id, id preserved; absent id is a silent no-op.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        fields: TeacherFields,
    ) -> anyhow::Result<Option<Teacher>> {
        let Some(existing) = self.coll.records.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        *existing = Teacher {
            id: existing.id.clone(),
            name: fields.name,
            family_name: fields.family_name,
            subject: fields.subject,
            group: fields.group,
            role: fields.role,
        };
        let updated = existing.clone();
        self.coll.persist(storage)?;
        Ok(Some(updated))
    }

    pub fn delete(&mut self, storage: &Storage, id: &str) -> anyhow::Result<bool> {
        let before = self.coll.records.len();
        self.coll.records.retain(|t| t.id != id);
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

fn seed_teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "1".to_string(),
            name: "Sarah".to_string(),
            family_name: "Wilson".to_string(),
            subject: "Mathematics".to_string(),
            group: "Group A".to_string(),
            role: Role::Teacher,
        },
        Teacher {
            id: "2".to_string(),
            name: "David".to_string(),
            family_name: "Brown".to_string(),
            subject: "Physics".to_string(),
            group: "Group B".to_string(),
            role: Role::Teacher,
        },
        Teacher {
            id: "3".to_string(),
            name: "Emily".to_string(),
            family_name: "Davis".to_string(),
            subject: "English".to_string(),
            group: "Group C".to_string(),
            role: Role::Teacher,
        },
    ]
}
