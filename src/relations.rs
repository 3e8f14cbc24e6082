//! Read-time joins over the in-memory collections. Everything here is pure:
//! references are resolved by id at each call, nothing is cached and nothing
//! is mutated. Dangling ids are legal (references are soft), so absence is
//! an ordinary result, never an error.

use crate::model::{Assignment, Group, Student, Teacher};

pub fn teacher_for_group<'a>(group: &Group, teachers: &'a [Teacher]) -> Option<&'a Teacher> {
    teachers.iter().find(|t| t.id == group.teacher_id)
}

/// Member students of a group, in student-collection order (not studentIds
/// order). A student listed twice in studentIds still appears once.
pub fn students_in_group<'a>(group: &Group, students: &'a [Student]) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|s| group.student_ids.iter().any(|id| *id == s.id))
        .collect()
}

pub fn group_for_assignment<'a>(assignment: &Assignment, groups: &'a [Group]) -> Option<&'a Group> {
    groups.iter().find(|g| g.id == assignment.group_id)
}
