pub mod assignments;
pub mod auth;
pub mod backup_exchange;
pub mod core;
pub mod grades;
pub mod groups;
pub mod roles;
pub mod students;
pub mod submissions;
pub mod teachers;
