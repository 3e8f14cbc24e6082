use super::{new_id, Collection};
use crate::model::{Role, Student, StudentFields};
use crate::storage::Storage;

pub struct StudentStore {
    coll: Collection<Student>,
}

impl StudentStore {
    pub const STORAGE_KEY: &'static str = "@students_data";

    pub fn new() -> Self {
        StudentStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, Some(seed_students()));
    }

    pub fn list(&self) -> &[Student] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.coll.records.iter().find(|s| s.id == id)
    }

    pub fn add(&mut self, storage: &Storage, fields: StudentFields) -> anyhow::Result<Student> {
        let student = Student {
            id: new_id(),
            name: fields.name,
            family_name: fields.family_name,
            email: fields.email,
            group: fields.group,
            group_id: fields.group_id,
            role: fields.role,
        };
        self.coll.records.push(student.clone());
        self.coll.persist(storage)?;
        Ok(student)
    }

    /// Full replace-by-id with the id preserved. An absent id is a silent
    /// no-op and yields `None`.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        fields: StudentFields,
    ) -> anyhow::Result<Option<Student>> {
        let Some(existing) = self.coll.records.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        *existing = Student {
            id: existing.id.clone(),
            name: fields.name,
            family_name: fields.family_name,
            email: fields.email,
            group: fields.group,
            group_id: fields.group_id,
            role: fields.role,
        };
        let updated = existing.clone();
        self.coll.persist(storage)?;
        Ok(Some(updated))
    }

    pub fn delete(&mut self, storage: &Storage, id: &str) -> anyhow::Result<bool> {
        let before = self.coll.records.len();
        self.coll.records.retain(|s| s.id != id);
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

// First-run defaults. Seed records keep their historical fixed ids; only
// records created at runtime get generated ids.
fn seed_students() -> Vec<Student> {
    vec![
        Student {
            id: "1".to_string(),
            name: "John".to_string(),
            family_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            group: "Group A".to_string(),
            group_id: String::new(),
            role: Role::Student,
        },
        Student {
            id: "2".to_string(),
            name: "Jane".to_string(),
            family_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            group: "Group B".to_string(),
            group_id: String::new(),
            role: Role::Teacher,
        },
        Student {
            id: "3".to_string(),
            name: "Mike".to_string(),
            family_name: "Johnson".to_string(),
            email: "mike.johnson@example.com".to_string(),
            group: "Group C".to_string(),
            group_id: String::new(),
            role: Role::Admin,
        },
    ]
}
