use super::{new_id, now_iso, Collection};
use crate::model::{Assignment, AssignmentFields, AssignmentStatus};
use crate::storage::Storage;
use chrono::{Duration, SecondsFormat, Utc};

pub struct AssignmentStore {
    coll: Collection<Assignment>,
}

impl AssignmentStore {
    pub const STORAGE_KEY: &'static str = "@assignments";

    pub fn new() -> Self {
        AssignmentStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, Some(seed_assignments()));
    }

    pub fn list(&self) -> &[Assignment] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Assignment> {
        self.coll.records.iter().find(|a| a.id == id)
    }

    pub fn by_group(&self, group_id: &str) -> Vec<&Assignment> {
        self.coll
            .records
            .iter()
            .filter(|a| a.group_id == group_id)
            .collect()
    }

    pub fn add(
        &mut self,
        storage: &Storage,
        fields: AssignmentFields,
    ) -> anyhow::Result<Assignment> {
        let assignment = Assignment {
            id: new_id(),
            title: fields.title,
            description: fields.description,
            group_id: fields.group_id,
            due_date: fields.due_date,
            file_url: fields.file_url,
            file_name: fields.file_name,
            created_at: now_iso(),
            created_by: fields.created_by,
            status: fields.status,
        };
        self.coll.records.push(assignment.clone());
        self.coll.persist(storage)?;
        Ok(assignment)
    }

    /// Full replace-by-id with id and createdAt preserved; absent id is a
    /// silent no-op.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        fields: AssignmentFields,
    ) -> anyhow::Result<Option<Assignment>> {
        let Some(existing) = self.coll.records.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        *existing = Assignment {
            id: existing.id.clone(),
            title: fields.title,
            description: fields.description,
            group_id: fields.group_id,
            due_date: fields.due_date,
            file_url: fields.file_url,
            file_name: fields.file_name,
            created_at: existing.created_at.clone(),
            created_by: fields.created_by,
            status: fields.status,
        };
        let updated = existing.clone();
        self.coll.persist(storage)?;
        Ok(Some(updated))
    }

    pub fn delete(&mut self, storage: &Storage, id: &str) -> anyhow::Result<bool> {
        let before = self.coll.records.len();
        self.coll.records.retain(|a| a.id != id);
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

fn due_in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn seed_assignments() -> Vec<Assignment> {
    vec![
        Assignment {
            id: "1".to_string(),
            title: "Mathematics Assignment 1".to_string(),
            description: "Complete exercises 1-10 from Chapter 3".to_string(),
            group_id: "1".to_string(),
            due_date: due_in_days(7),
            file_url: String::new(),
            file_name: "math_assignment1.pdf".to_string(),
            created_at: now_iso(),
            created_by: "1".to_string(),
            status: AssignmentStatus::Active,
        },
        Assignment {
            id: "2".to_string(),
            title: "Physics Lab Report".to_string(),
            description: "Write a lab report for the pendulum experiment".to_string(),
            group_id: "2".to_string(),
            due_date: due_in_days(5),
            file_url: String::new(),
            file_name: "physics_lab_report.pdf".to_string(),
            created_at: now_iso(),
            created_by: "2".to_string(),
            status: AssignmentStatus::Active,
        },
        Assignment {
            id: "3".to_string(),
            title: "English Essay".to_string(),
            description: "Write a 1000-word essay on Shakespeare's Hamlet".to_string(),
            group_id: "3".to_string(),
            due_date: due_in_days(10),
            file_url: String::new(),
            file_name: "english_essay.pdf".to_string(),
            created_at: now_iso(),
            created_by: "3".to_string(),
            status: AssignmentStatus::Active,
        },
    ]
}
