use chrono::Utc;

use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};
use learnhub_domain::role::Role;

use crate::domain::authz::Caller;
use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::domain::types::{CourseWithInstructor, Enrollment, EnrollmentDetail};
use crate::error::CoursesServiceError;

// ── Enroll ───────────────────────────────────────────────────────────────────

pub struct EnrollUseCase<U: UserRepository, C: CourseRepository, E: EnrollmentRepository> {
    pub users: U,
    pub courses: C,
    pub enrollments: E,
}

impl<U, C, E> EnrollUseCase<U, C, E>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Students enroll themselves; admins may enroll any student.
    pub async fn execute(
        &self,
        caller: &Caller,
        key: EnrollmentKey,
    ) -> Result<Enrollment, CoursesServiceError> {
        let for_self = caller.is_self(&key.student_id) && caller.has_role(Role::Student);
        caller.require(for_self || caller.is_admin())?;

        let student = self.users.find_by_id(&key.student_id).await?;
        if !student.is_some_and(|student| student.has_role(Role::Student)) {
            return Err(CoursesServiceError::StudentNotFound);
        }
        self.courses
            .find_by_id(key.course_id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;
        if self.enrollments.find(&key).await?.is_some() {
            return Err(CoursesServiceError::AlreadyEnrolled);
        }

        let enrollment = Enrollment {
            key,
            enrollment_date: Utc::now(),
            status: EnrollmentStatus::Enrolled,
        };
        // A concurrent enroll can still slip past the check above; the insert
        // reports it as AlreadyEnrolled.
        self.enrollments.create(&enrollment).await?;
        tracing::info!(enrollment = %enrollment.key, "student enrolled");
        Ok(enrollment)
    }
}

// ── GetEnrollment ────────────────────────────────────────────────────────────

pub struct GetEnrollmentUseCase<U: UserRepository, C: CourseRepository, E: EnrollmentRepository>
{
    pub users: U,
    pub courses: C,
    pub enrollments: E,
}

impl<U, C, E> GetEnrollmentUseCase<U, C, E>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        key: EnrollmentKey,
    ) -> Result<EnrollmentDetail, CoursesServiceError> {
        let course = self
            .courses
            .find_with_instructor(key.course_id)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        caller.require(
            caller.is_self(&key.student_id) || caller.can_manage_course(&course.course),
        )?;

        let enrollment = self
            .enrollments
            .find(&key)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        let student = self
            .users
            .find_by_id(&key.student_id)
            .await?
            .map(|user| user.summary());
        Ok(EnrollmentDetail {
            enrollment,
            course,
            student,
        })
    }
}

// ── ListEnrollments ──────────────────────────────────────────────────────────

pub struct ListEnrollmentsUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> ListEnrollmentsUseCase<E> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Enrollment>, CoursesServiceError> {
        caller.require_admin()?;
        self.enrollments.list_all().await
    }
}

// ── ListStudentEnrollments ───────────────────────────────────────────────────

pub struct ListStudentEnrollmentsUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> ListStudentEnrollmentsUseCase<E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        caller.require(caller.is_admin() || caller.is_self(student_id))?;
        self.enrollments.list_by_student(student_id).await
    }
}

// ── ListCourseEnrollments ────────────────────────────────────────────────────

pub struct ListCourseEnrollmentsUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> ListCourseEnrollmentsUseCase<C, E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        if !caller.is_admin() {
            let course = self
                .courses
                .find_by_id(course_id)
                .await?
                .ok_or(CoursesServiceError::CourseNotFound)?;
            caller.require_course_manager(&course)?;
        }
        self.enrollments.list_by_course(course_id).await
    }
}

// ── UpdateEnrollmentStatus ───────────────────────────────────────────────────

pub struct UpdateEnrollmentStatusInput {
    /// Ids echoed in the request body, if any. Each must match the path.
    pub body_student_id: Option<UserId>,
    pub body_course_id: Option<CourseId>,
    pub status: EnrollmentStatus,
}

pub struct UpdateEnrollmentStatusUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> UpdateEnrollmentStatusUseCase<C, E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        key: EnrollmentKey,
        input: UpdateEnrollmentStatusInput,
    ) -> Result<(), CoursesServiceError> {
        let student_mismatch = input
            .body_student_id
            .is_some_and(|student_id| student_id != key.student_id);
        let course_mismatch = input
            .body_course_id
            .is_some_and(|course_id| course_id != key.course_id);
        if student_mismatch || course_mismatch {
            return Err(CoursesServiceError::IdMismatch);
        }

        let course = self
            .courses
            .find_by_id(key.course_id)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        caller.require_course_manager(&course)?;

        let current = self
            .enrollments
            .find(&key)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        if current.status == input.status {
            return Ok(());
        }
        if !current.status.can_transition_to(input.status) {
            return Err(CoursesServiceError::InvalidTransition {
                from: current.status,
                to: input.status,
            });
        }

        if !self
            .enrollments
            .update_status(&key, current.status, input.status)
            .await?
        {
            // Another writer moved the row after it was read.
            return match self.enrollments.find(&key).await? {
                None => Err(CoursesServiceError::EnrollmentNotFound),
                Some(latest) if latest.status == input.status => Ok(()),
                Some(latest) => {
                    tracing::warn!(
                        enrollment = %key,
                        expected = %current.status,
                        found = %latest.status,
                        "enrollment status changed concurrently"
                    );
                    Err(CoursesServiceError::InvalidTransition {
                        from: latest.status,
                        to: input.status,
                    })
                }
            };
        }
        tracing::info!(
            enrollment = %key,
            from = %current.status,
            to = %input.status,
            "enrollment status changed"
        );
        Ok(())
    }
}

// ── Unenroll ─────────────────────────────────────────────────────────────────

pub struct UnenrollUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> UnenrollUseCase<C, E> {
    pub async fn execute(
        &self,
        caller: &Caller,
        key: EnrollmentKey,
    ) -> Result<(), CoursesServiceError> {
        let course = self
            .courses
            .find_by_id(key.course_id)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        caller.require(caller.is_self(&key.student_id) || caller.can_manage_course(&course))?;

        if !self.enrollments.delete(&key).await? {
            return Err(CoursesServiceError::EnrollmentNotFound);
        }
        tracing::info!(enrollment = %key, "student unenrolled");
        Ok(())
    }
}

// ── MyEnrollments ────────────────────────────────────────────────────────────

pub struct MyEnrollmentsUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> MyEnrollmentsUseCase<E> {
    pub async fn execute(
        &self,
        caller: &Caller,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        self.enrollments
            .list_courses_for_student(&caller.user_id)
            .await
    }
}
