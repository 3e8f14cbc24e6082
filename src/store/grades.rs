use super::{new_id, now_iso, Collection};
use crate::model::{Grade, GradeFields, GradePatch};
use crate::storage::Storage;

/// Grades start empty. The store never range-checks the grade value; the
/// calling screen owns that validation.
pub struct GradeStore {
    coll: Collection<Grade>,
}

impl GradeStore {
    pub const STORAGE_KEY: &'static str = "grades";

    pub fn new() -> Self {
        GradeStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, None);
    }

    pub fn list(&self) -> &[Grade] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Grade> {
        self.coll.records.iter().find(|g| g.id == id)
    }

    pub fn by_assignment(&self, assignment_id: &str) -> Vec<&Grade> {
        self.coll
            .records
            .iter()
            .filter(|g| g.assignment_id == assignment_id)
            .collect()
    }

    pub fn by_student(&self, student_id: &str) -> Vec<&Grade> {
        self.coll
            .records
            .iter()
            .filter(|g| g.student_id == student_id)
            .collect()
    }

    pub fn find_for_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Option<&Grade> {
        self.coll
            .records
            .iter()
            .find(|g| g.assignment_id == assignment_id && g.student_id == student_id)
    }

    pub fn add(&mut self, storage: &Storage, fields: GradeFields) -> anyhow::Result<Grade> {
        let grade = Grade {
            id: new_id(),
            assignment_id: fields.assignment_id,
            student_id: fields.student_id,
            grade: fields.grade,
            feedback: fields.feedback,
            submitted_at: fields.submitted_at,
            graded_at: now_iso(),
        };
        self.coll.records.push(grade.clone());
        self.coll.persist(storage)?;
        Ok(grade)
    }

    /// Shallow patch; gradedAt is refreshed on every update, whatever the
    /// patch contains. Absent id is a silent no-op.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        patch: GradePatch,
    ) -> anyhow::Result<Option<Grade>> {
        let Some(existing) = self.coll.records.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.assignment_id {
            existing.assignment_id = v;
        }
        if let Some(v) = patch.student_id {
            existing.student_id = v;
        }
        if let Some(v) = patch.grade {
            existing.grade = v;
        }
        if let Some(v) = patch.feedback {
            existing.feedback = Some(v);
        }
        if let Some(v) = patch.submitted_at {
            existing.submitted_at = v;
        }
        existing.graded_at = now_iso();
        let updated = existing.clone();
        self.coll.persist(storage)?;
        Ok(Some(updated))
    }

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
