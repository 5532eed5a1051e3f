//! Caller-centric authorization checks shared by the use cases.

use learnhub_domain::id::UserId;
use learnhub_domain::role::{Role, RoleSet};

use crate::domain::types::Course;
use crate::error::CoursesServiceError;

/// The authenticated principal behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: UserId,
    pub roles: RoleSet,
}

impl Caller {
    pub fn new(user_id: UserId, roles: RoleSet) -> Self {
        Self { user_id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    pub fn is_self(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Admins manage every course; instructors manage the courses they teach.
    pub fn can_manage_course(&self, course: &Course) -> bool {
        self.is_admin() || (self.has_role(Role::Instructor) && course.is_taught_by(&self.user_id))
    }

    pub fn require_admin(&self) -> Result<(), CoursesServiceError> {
        self.require(self.is_admin())
    }

    pub fn require_any_role(&self, roles: &[Role]) -> Result<(), CoursesServiceError> {
        self.require(roles.iter().any(|role| self.has_role(*role)))
    }

    pub fn require_course_manager(&self, course: &Course) -> Result<(), CoursesServiceError> {
        self.require(self.can_manage_course(course))
    }

    pub fn require(&self, allowed: bool) -> Result<(), CoursesServiceError> {
        if allowed {
            Ok(())
        } else {
            Err(CoursesServiceError::Forbidden)
        }
    }
}
