use std::sync::{Arc, Mutex};

use chrono::Utc;

use learnhub_courses::domain::authz::Caller;
use learnhub_courses::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use learnhub_courses::domain::types::{
    Course, CourseChanges, CourseWithInstructor, Enrollment, NewCourse, User,
};
use learnhub_courses::error::CoursesServiceError;
use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};
use learnhub_domain::role::Role;

// ── InMemoryStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct StoreState {
    pub users: Vec<User>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    next_course_id: i32,
}

/// Shared backing store implementing every repository trait, so cross-table
/// behaviour (course deletion, enrolled-course joins) stays consistent.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub state: Arc<Mutex<StoreState>>,
    /// Makes `EnrollmentRepository::find` always miss, as if a concurrent
    /// insert landed between the pre-check and the write.
    pub hide_enrollments_on_find: bool,
    /// Status another writer commits just before `update_status` runs.
    pub concurrent_status_write: Option<EnrollmentStatus>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: &str, roles: &[Role]) -> User {
        let user = test_user(id, roles);
        self.state.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_course(&self, title: &str, description: Option<&str>, instructor: &str) -> Course {
        let mut state = self.state.lock().unwrap();
        state.next_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: CourseId(state.next_course_id),
            title: title.to_owned(),
            description: description.map(str::to_owned),
            instructor_id: Some(UserId::from(instructor)),
            created_at: now,
            updated_at: now,
            version: 1,
        };
        state.courses.push(course.clone());
        course
    }

    pub fn add_enrollment(&self, student: &str, course_id: CourseId, status: EnrollmentStatus) {
        self.state.lock().unwrap().enrollments.push(Enrollment {
            key: EnrollmentKey::new(student, course_id),
            enrollment_date: Utc::now(),
            status,
        });
    }

    /// Simulate another writer bumping the course version.
    pub fn bump_version(&self, id: CourseId) {
        let mut state = self.state.lock().unwrap();
        if let Some(course) = state.courses.iter_mut().find(|c| c.id == id) {
            course.version += 1;
        }
    }

    pub fn course(&self, id: CourseId) -> Option<Course> {
        self.state
            .lock()
            .unwrap()
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn enrollment(&self, key: &EnrollmentKey) -> Option<Enrollment> {
        self.state
            .lock()
            .unwrap()
            .enrollments
            .iter()
            .find(|e| &e.key == key)
            .cloned()
    }

    pub fn enrollment_count(&self) -> usize {
        self.state.lock().unwrap().enrollments.len()
    }

    fn with_instructor(state: &StoreState, course: &Course) -> CourseWithInstructor {
        let instructor = course.instructor_id.as_ref().and_then(|id| {
            state
                .users
                .iter()
                .find(|u| &u.id == id)
                .map(User::summary)
        });
        CourseWithInstructor {
            course: course.clone(),
            instructor,
        }
    }
}

impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CoursesServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| &u.id == id)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email)
        {
            return Err(CoursesServiceError::UserAlreadyExists);
        }
        state.users.push(user.clone());
        Ok(())
    }
}

impl CourseRepository for InMemoryStore {
    async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let state = self.state.lock().unwrap();
        let mut courses: Vec<CourseWithInstructor> = state
            .courses
            .iter()
            .filter(|c| match search {
                Some(term) => {
                    c.title.contains(term)
                        || c.description.as_deref().is_some_and(|d| d.contains(term))
                }
                None => true,
            })
            .map(|c| Self::with_instructor(&state, c))
            .collect();
        courses.sort_by_key(|entry| entry.course.id);
        Ok(courses)
    }

    async fn list_by_instructor(
        &self,
        instructor_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .courses
            .iter()
            .filter(|c| c.is_taught_by(instructor_id))
            .map(|c| Self::with_instructor(&state, c))
            .collect())
    }

    async fn list_excluding(
        &self,
        exclude: &[CourseId],
        limit: u64,
    ) -> Result<Vec<Course>, CoursesServiceError> {
        let state = self.state.lock().unwrap();
        let mut courses: Vec<Course> = state
            .courses
            .iter()
            .filter(|c| !exclude.contains(&c.id))
            .cloned()
            .collect();
        courses.sort_by_key(|c| c.id);
        courses.truncate(limit as usize);
        Ok(courses)
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursesServiceError> {
        Ok(self.course(id))
    }

    async fn find_with_instructor(
        &self,
        id: CourseId,
    ) -> Result<Option<CourseWithInstructor>, CoursesServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .courses
            .iter()
            .find(|c| c.id == id)
            .map(|c| Self::with_instructor(&state, c)))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Course>, CoursesServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .courses
            .iter()
            .find(|c| c.title == title)
            .cloned())
    }

    async fn create(&self, course: &NewCourse) -> Result<Course, CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        state.next_course_id += 1;
        let created = Course {
            id: CourseId(state.next_course_id),
            title: course.title.clone(),
            description: course.description.clone(),
            instructor_id: course.instructor_id.clone(),
            created_at: course.created_at,
            updated_at: course.created_at,
            version: 1,
        };
        state.courses.push(created.clone());
        Ok(created)
    }

    async fn update_if_version(
        &self,
        id: CourseId,
        expected_version: i32,
        changes: &CourseChanges,
    ) -> Result<Option<Course>, CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        let Some(course) = state
            .courses
            .iter_mut()
            .find(|c| c.id == id && c.version == expected_version)
        else {
            return Ok(None);
        };
        course.title = changes.title.clone();
        course.description = changes.description.clone();
        course.updated_at = changes.updated_at;
        course.version += 1;
        Ok(Some(course.clone()))
    }

    async fn delete_with_enrollments(&self, id: CourseId) -> Result<bool, CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        let before = state.courses.len();
        state.courses.retain(|c| c.id != id);
        if state.courses.len() == before {
            return Ok(false);
        }
        state.enrollments.retain(|e| e.key.course_id != id);
        Ok(true)
    }
}

impl EnrollmentRepository for InMemoryStore {
    async fn find(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>, CoursesServiceError> {
        if self.hide_enrollments_on_find {
            return Ok(None);
        }
        Ok(self.enrollment(key))
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, CoursesServiceError> {
        Ok(self.state.lock().unwrap().enrollments.clone())
    }

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .enrollments
            .iter()
            .filter(|e| &e.key.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_by_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .enrollments
            .iter()
            .filter(|e| e.key.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_courses_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let state = self.state.lock().unwrap();
        let mut courses: Vec<CourseWithInstructor> = state
            .courses
            .iter()
            .filter(|c| {
                state
                    .enrollments
                    .iter()
                    .any(|e| &e.key.student_id == student_id && e.key.course_id == c.id)
            })
            .map(|c| Self::with_instructor(&state, c))
            .collect();
        courses.sort_by_key(|entry| entry.course.id);
        Ok(courses)
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        if state.enrollments.iter().any(|e| e.key == enrollment.key) {
            return Err(CoursesServiceError::AlreadyEnrolled);
        }
        state.enrollments.push(enrollment.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        key: &EnrollmentKey,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<bool, CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        let Some(enrollment) = state.enrollments.iter_mut().find(|e| &e.key == key) else {
            return Ok(false);
        };
        if let Some(concurrent) = self.concurrent_status_write {
            enrollment.status = concurrent;
        }
        if enrollment.status != from {
            return Ok(false);
        }
        enrollment.status = to;
        Ok(true)
    }

    async fn delete(&self, key: &EnrollmentKey) -> Result<bool, CoursesServiceError> {
        let mut state = self.state.lock().unwrap();
        let before = state.enrollments.len();
        state.enrollments.retain(|e| &e.key != key);
        Ok(state.enrollments.len() < before)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: &str, roles: &[Role]) -> User {
    let now = Utc::now();
    User {
        id: UserId::from(id),
        first_name: id.to_owned(),
        last_name: "Tester".to_owned(),
        email: format!("{id}@learnhub.test"),
        roles: roles.iter().copied().collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn caller(id: &str, roles: &[Role]) -> Caller {
    Caller::new(UserId::from(id), roles.iter().copied().collect())
}

pub fn admin() -> Caller {
    caller("admin-1", &[Role::Admin])
}
