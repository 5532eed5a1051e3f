//! sea-orm entities for the courses service.

pub mod courses;
pub mod enrollments;
pub mod user_roles;
pub mod users;
