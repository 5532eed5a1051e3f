use std::collections::HashSet;

use chrono::Utc;

use learnhub_domain::id::{CourseId, EnrollmentKey};
use learnhub_domain::role::Role;

use crate::domain::authz::Caller;
use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::domain::types::{Course, CourseChanges, CourseListing, NewCourse, validate_title};
use crate::error::CoursesServiceError;

// ── ListCourses ──────────────────────────────────────────────────────────────

pub struct ListCoursesUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> ListCoursesUseCase<C, E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        search: Option<&str>,
    ) -> Result<Vec<CourseListing>, CoursesServiceError> {
        let search = search.filter(|term| !term.is_empty());
        let courses = self.courses.list(search).await?;

        if !caller.has_role(Role::Student) {
            return Ok(courses
                .into_iter()
                .map(|course| CourseListing {
                    course,
                    is_enrolled: None,
                })
                .collect());
        }

        let enrolled: HashSet<CourseId> = self
            .enrollments
            .list_by_student(&caller.user_id)
            .await?
            .into_iter()
            .map(|enrollment| enrollment.key.course_id)
            .collect();
        Ok(courses
            .into_iter()
            .map(|course| {
                let is_enrolled = enrolled.contains(&course.course.id);
                CourseListing {
                    course,
                    is_enrolled: Some(is_enrolled),
                }
            })
            .collect())
    }
}

// ── GetCourse ────────────────────────────────────────────────────────────────

pub struct GetCourseUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> GetCourseUseCase<C, E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: CourseId,
    ) -> Result<CourseListing, CoursesServiceError> {
        let course = self
            .courses
            .find_with_instructor(id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;

        let is_enrolled = if caller.has_role(Role::Student) {
            let key = EnrollmentKey::new(caller.user_id.clone(), id);
            Some(self.enrollments.find(&key).await?.is_some())
        } else {
            None
        };
        Ok(CourseListing {
            course,
            is_enrolled,
        })
    }
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

pub struct CreateCourseInput {
    pub title: String,
    pub description: Option<String>,
}

pub struct CreateCourseUseCase<U: UserRepository, C: CourseRepository> {
    pub users: U,
    pub courses: C,
}

impl<U: UserRepository, C: CourseRepository> CreateCourseUseCase<U, C> {
    /// The caller becomes the course's instructor.
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateCourseInput,
    ) -> Result<Course, CoursesServiceError> {
        caller.require_any_role(&[Role::Admin, Role::Instructor])?;
        if !validate_title(&input.title) {
            return Err(CoursesServiceError::InvalidTitle);
        }
        self.users
            .find_by_id(&caller.user_id)
            .await?
            .ok_or(CoursesServiceError::UserNotFound)?;

        let course = self
            .courses
            .create(&NewCourse {
                title: input.title,
                description: input.description,
                instructor_id: Some(caller.user_id.clone()),
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(course_id = %course.id, instructor_id = %caller.user_id, "course created");
        Ok(course)
    }
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

pub struct UpdateCourseInput {
    /// Id echoed in the request body, if any. Must match the path id.
    pub body_id: Option<CourseId>,
    pub title: String,
    pub description: Option<String>,
    /// Version the client last read. Falls back to the current stored version.
    pub version: Option<i32>,
}

pub struct UpdateCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> UpdateCourseUseCase<C> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: CourseId,
        input: UpdateCourseInput,
    ) -> Result<Course, CoursesServiceError> {
        if input.body_id.is_some_and(|body_id| body_id != id) {
            return Err(CoursesServiceError::IdMismatch);
        }
        if !validate_title(&input.title) {
            return Err(CoursesServiceError::InvalidTitle);
        }
        let current = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;
        caller.require_course_manager(&current)?;

        let expected_version = input.version.unwrap_or(current.version);
        let changes = CourseChanges {
            title: input.title,
            description: input.description,
            updated_at: Utc::now(),
        };
        if let Some(updated) = self
            .courses
            .update_if_version(id, expected_version, &changes)
            .await?
        {
            return Ok(updated);
        }

        // Nothing matched: either the course is gone or its version moved on.
        match self.courses.find_by_id(id).await? {
            None => Err(CoursesServiceError::CourseNotFound),
            Some(latest) => {
                tracing::warn!(
                    course_id = %id,
                    expected_version,
                    current_version = latest.version,
                    "course update lost a concurrent race"
                );
                Err(CoursesServiceError::ConcurrencyConflict)
            }
        }
    }
}

// ── DeleteCourse ─────────────────────────────────────────────────────────────

pub struct DeleteCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> DeleteCourseUseCase<C> {
    pub async fn execute(&self, caller: &Caller, id: CourseId) -> Result<(), CoursesServiceError> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;
        caller.require_course_manager(&course)?;

        if !self.courses.delete_with_enrollments(id).await? {
            return Err(CoursesServiceError::CourseNotFound);
        }
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }
}
