use chrono::{DateTime, Utc};

use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};
use learnhub_domain::role::{Role, RoleSet};

/// Shown on dashboard cards when a course has no usable title.
pub const TITLE_FALLBACK: &str = "Untitled Course";

/// Shown on dashboard cards when a course has no description.
pub const DESCRIPTION_FALLBACK: &str = "No description available";

/// Number of not-yet-enrolled courses suggested on the student dashboard.
pub const RECOMMENDATION_LIMIT: u64 = 2;

/// A registered user with the roles granted by the identity provider.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            full_name: self.full_name(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_owned()
}

/// Name fields embedded in course and enrollment responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub full_name: String,
}

/// A catalog entry.
///
/// `version` starts at 1 and is bumped by every successful update.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl Course {
    pub fn is_taught_by(&self, user_id: &UserId) -> bool {
        self.instructor_id.as_ref() == Some(user_id)
    }

    pub fn title_or_fallback(&self) -> &str {
        if self.title.trim().is_empty() {
            TITLE_FALLBACK
        } else {
            &self.title
        }
    }

    pub fn description_or_fallback(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => DESCRIPTION_FALLBACK,
        }
    }
}

/// A course joined with its instructor, if the instructor still exists.
#[derive(Debug, Clone)]
pub struct CourseWithInstructor {
    pub course: Course,
    pub instructor: Option<UserSummary>,
}

/// One row of the catalog listing.
///
/// `is_enrolled` is only computed for callers holding the student role.
#[derive(Debug, Clone)]
pub struct CourseListing {
    pub course: CourseWithInstructor,
    pub is_enrolled: Option<bool>,
}

/// Fields of a course about to be inserted.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Mutable course fields applied by an update.
#[derive(Debug, Clone)]
pub struct CourseChanges {
    pub title: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A student's membership in a course.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub key: EnrollmentKey,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

/// An enrollment joined with its course and student.
#[derive(Debug, Clone)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub course: CourseWithInstructor,
    pub student: Option<UserSummary>,
}

/// Which dashboard variant a caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardRole {
    Student,
    Instructor,
    Admin,
}

impl DashboardRole {
    /// Student wins over instructor, instructor over admin.
    pub fn for_roles(roles: &RoleSet) -> Option<Self> {
        if roles.contains(Role::Student) {
            Some(Self::Student)
        } else if roles.contains(Role::Instructor) {
            Some(Self::Instructor)
        } else if roles.contains(Role::Admin) {
            Some(Self::Admin)
        } else {
            None
        }
    }
}

/// Compact course entry shown on the student dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    pub id: CourseId,
    pub title: String,
    pub description: String,
}

impl From<&Course> for CourseCard {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title_or_fallback().to_owned(),
            description: course.description_or_fallback().to_owned(),
        }
    }
}

/// Role-specific dashboard content.
#[derive(Debug, Clone)]
pub enum Dashboard {
    Student {
        enrolled: Vec<CourseCard>,
        recommended: Vec<CourseCard>,
    },
    Instructor {
        courses: Vec<CourseWithInstructor>,
    },
    Admin {
        courses: Vec<CourseWithInstructor>,
    },
}

/// A title is valid when it has at least one non-whitespace character.
pub fn validate_title(title: &str) -> bool {
    !title.trim().is_empty()
}
