//! Capability derivation: a static role-to-capability table over the current
//! session user. Stateless; consumers recompute on every read.

use crate::model::{Role, User};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub is_admin: bool,
    pub is_teacher: bool,
    pub is_student: bool,
    pub can_access_students: bool,
    pub can_access_teachers: bool,
    pub can_access_groups: bool,
    pub can_access_assignments: bool,
    pub can_create_assignment: bool,
    pub can_edit_assignment: bool,
    pub can_delete_assignment: bool,
    pub can_grade_assignment: bool,
}

pub fn capabilities_for(user: Option<&User>) -> Capabilities {
    let is_admin = matches!(user, Some(u) if u.role == Role::Admin);
    let is_teacher = matches!(user, Some(u) if u.role == Role::Teacher);
    let is_student = matches!(user, Some(u) if u.role == Role::Student);
    let staff = is_admin || is_teacher;

    Capabilities {
        is_admin,
        is_teacher,
        is_student,
        can_access_students: staff,
        can_access_teachers: is_admin,
        can_access_groups: staff,
        // Assignment reads are open to everyone, signed in or not.
        can_access_assignments: true,
        can_create_assignment: staff,
        can_edit_assignment: staff,
        can_delete_assignment: staff,
        can_grade_assignment: staff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "1".to_string(),
            name: "John".to_string(),
            family_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn student_gets_read_only_assignment_access() {
        let u = user(Role::Student);
        let caps = capabilities_for(Some(&u));
        assert!(caps.is_student);
        assert!(caps.can_access_assignments);
        assert!(!caps.can_access_teachers);
        assert!(!caps.can_grade_assignment);
        assert!(!caps.can_create_assignment);
    }

    #[test]
    fn teacher_and_admin_share_staff_capabilities() {
        let t = user(Role::Teacher);
        let a = user(Role::Admin);
        let teacher_caps = capabilities_for(Some(&t));
        let admin_caps = capabilities_for(Some(&a));

        for caps in [teacher_caps, admin_caps] {
            assert!(caps.can_access_students);
            assert!(caps.can_access_groups);
            assert!(caps.can_create_assignment);
            assert!(caps.can_grade_assignment);
        }
        // Only admins may list teachers.
        assert!(!teacher_caps.can_access_teachers);
        assert!(admin_caps.can_access_teachers);
    }

    #[test]
    fn signed_out_user_still_sees_assignments() {
        let caps = capabilities_for(None);
        assert!(caps.can_access_assignments);
        assert!(!caps.can_access_students);
        assert!(!caps.is_admin && !caps.is_teacher && !caps.is_student);
    }
}
