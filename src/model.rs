use serde::{Deserialize, Serialize};

/// Account role shared by students, teachers and the session user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        AssignmentStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub family_name: String,
    pub email: String,
    /// Display name of the student's group; groupId is the actual reference.
    pub group: String,
    // Older payloads (including the seed records) predate groupId.
    #[serde(default)]
    pub group_id: String,
    pub role: Role,
}

/// Student fields minus the store-synthesized id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub name: String,
    pub family_name: String,
    pub email: String,
    pub group: String,
    #[serde(default)]
    pub group_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub family_name: String,
    pub subject: String,
    pub group: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFields {
    pub name: String,
    pub family_name: String,
    pub subject: String,
    pub group: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    /// Member ids, insertion-ordered. Duplicates are legal; membership is a
    /// soft reference either way.
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFields {
    pub name: String,
    pub teacher_id: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub group_id: String,
    pub due_date: String,
    pub file_url: String,
    pub file_name: String,
    /// Stamped once at creation; update preserves it.
    pub created_at: String,
    pub created_by: String,
    pub status: AssignmentStatus,
}

/// Assignment fields minus id and createdAt, both store-owned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFields {
    pub title: String,
    pub description: String,
    pub group_id: String,
    pub due_date: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_name: String,
    pub created_by: String,
    #[serde(default)]
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub file_url: String,
    pub file_name: String,
    pub submitted_at: String,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
}

/// Submission fields minus id, submittedAt and status, all store-owned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFields {
    pub assignment_id: String,
    pub student_id: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Shallow patch: only supplied fields change; the id never does.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(default)]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    /// 0-100. Range checks belong to the calling screen, not the store.
    pub grade: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub submitted_at: String,
    /// Refreshed on every mutation.
    pub graded_at: String,
}

/// Grade fields minus id and gradedAt, both store-owned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeFields {
    pub assignment_id: String,
    pub student_id: String,
    pub grade: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePatch {
    #[serde(default)]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub family_name: String,
    pub email: String,
    pub role: Role,
}
