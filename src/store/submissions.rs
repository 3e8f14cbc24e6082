use super::{new_id, now_iso, Collection};
use crate::model::{Submission, SubmissionFields, SubmissionPatch, SubmissionStatus};
use crate::storage::Storage;

/// Submissions start empty. Uniqueness of (assignmentId, studentId) is NOT
/// enforced at write time; pair lookups take the first match in insertion
/// order.
pub struct SubmissionStore {
    coll: Collection<Submission>,
}

impl SubmissionStore {
    pub const STORAGE_KEY: &'static str = "@submissions";

    pub fn new() -> Self {
        SubmissionStore {
            coll: Collection::new(Self::STORAGE_KEY),
        }
    }

    pub fn load(&mut self, storage: &Storage) {
        self.coll.load(storage, None);
    }

    pub fn list(&self) -> &[Submission] {
        &self.coll.records
    }

    pub fn get(&self, id: &str) -> Option<&Submission> {
        self.coll.records.iter().find(|s| s.id == id)
    }

    pub fn by_assignment(&self, assignment_id: &str) -> Vec<&Submission> {
        self.coll
            .records
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect()
    }

    pub fn by_student(&self, student_id: &str) -> Vec<&Submission> {
        self.coll
            .records
            .iter()
            .filter(|s| s.student_id == student_id)
            .collect()
    }

    pub fn find_for_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Option<&Submission> {
        self.coll
            .records
            .iter()
            .find(|s| s.assignment_id == assignment_id && s.student_id == student_id)
    }

    /// New submissions come in as `pending` with submittedAt stamped here.
    pub fn add(
        &mut self,
        storage: &Storage,
        fields: SubmissionFields,
    ) -> anyhow::Result<Submission> {
        let submission = Submission {
            id: new_id(),
            assignment_id: fields.assignment_id,
            student_id: fields.student_id,
            file_url: fields.file_url,
            file_name: fields.file_name,
            submitted_at: now_iso(),
            status: SubmissionStatus::Pending,
            feedback: fields.feedback,
            grade: fields.grade,
        };
        self.coll.records.push(submission.clone());
        self.coll.persist(storage)?;
        Ok(submission)
    }

    /// Shallow patch: only supplied fields change. Absent id is a silent
    /// no-op.
    pub fn update(
        &mut self,
        storage: &Storage,
        id: &str,
        patch: SubmissionPatch,
    ) -> anyhow::Result<Option<Submission>> {
        let Some(existing) = self.coll.records.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.assignment_id {
            existing.assignment_id = v;
        }
        if let Some(v) = patch.student_id {
            existing.student_id = v;
        }
        if let Some(v) = patch.file_url {
            existing.file_url = v;
        }
        if let Some(v) = patch.file_name {
            existing.file_name = v;
        }
        if let Some(v) = patch.submitted_at {
            existing.submitted_at = v;
        }
        if let Some(v) = patch.status {
            existing.status = v;
        }
        if let Some(v) = patch.feedback {
            existing.feedback = Some(v);
        }
        if let Some(v) = patch.grade {
            existing.grade = Some(v);
        }
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
