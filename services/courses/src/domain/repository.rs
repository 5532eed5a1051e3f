#![allow(async_fn_in_trait)]

use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};

use crate::domain::types::{
    Course, CourseChanges, CourseWithInstructor, Enrollment, NewCourse, User,
};
use crate::error::CoursesServiceError;

/// Repository for user profiles and their role memberships.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CoursesServiceError>;

    /// Insert the user and its roles together.
    /// A duplicate id or email yields `UserAlreadyExists`.
    async fn create(&self, user: &User) -> Result<(), CoursesServiceError>;
}

/// Repository for catalog courses.
pub trait CourseRepository: Send + Sync {
    /// All courses ordered by id. `search` matches title or description
    /// as a case-sensitive substring.
    async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError>;

    async fn list_by_instructor(
        &self,
        instructor_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError>;

    /// Up to `limit` courses ordered by id, skipping `exclude`.
    async fn list_excluding(
        &self,
        exclude: &[CourseId],
        limit: u64,
    ) -> Result<Vec<Course>, CoursesServiceError>;

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursesServiceError>;

    async fn find_with_instructor(
        &self,
        id: CourseId,
    ) -> Result<Option<CourseWithInstructor>, CoursesServiceError>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Course>, CoursesServiceError>;

    /// Insert a course at version 1 and return it with its assigned id.
    async fn create(&self, course: &NewCourse) -> Result<Course, CoursesServiceError>;

    /// Apply `changes` only if the stored version equals `expected_version`,
    /// bumping the version. Returns `None` when no row matched.
    async fn update_if_version(
        &self,
        id: CourseId,
        expected_version: i32,
        changes: &CourseChanges,
    ) -> Result<Option<Course>, CoursesServiceError>;

    /// Delete the course and all of its enrollments atomically.
    /// Returns `true` if the course existed.
    async fn delete_with_enrollments(&self, id: CourseId) -> Result<bool, CoursesServiceError>;
}

/// Repository for enrollments.
pub trait EnrollmentRepository: Send + Sync {
    async fn find(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>, CoursesServiceError>;

    async fn list_all(&self) -> Result<Vec<Enrollment>, CoursesServiceError>;

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError>;

    async fn list_by_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError>;

    /// Courses the student is enrolled in, ordered by course id.
    async fn list_courses_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError>;

    /// Insert an enrollment. The storage key constraint is authoritative:
    /// a duplicate yields `AlreadyEnrolled`.
    async fn create(&self, enrollment: &Enrollment) -> Result<(), CoursesServiceError>;

    /// Moves the enrollment from `from` to `to`. Returns `false` when the row
    /// is gone or no longer holds `from`.
    async fn update_status(
        &self,
        key: &EnrollmentKey,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<bool, CoursesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, key: &EnrollmentKey) -> Result<bool, CoursesServiceError>;
}
