use learnhub_domain::id::CourseId;

use crate::domain::authz::Caller;
use crate::domain::repository::{CourseRepository, EnrollmentRepository};
use crate::domain::types::{CourseCard, Dashboard, DashboardRole, RECOMMENDATION_LIMIT};
use crate::error::CoursesServiceError;

pub struct GetDashboardUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> GetDashboardUseCase<C, E> {
    pub async fn execute(&self, caller: &Caller) -> Result<Dashboard, CoursesServiceError> {
        let role = DashboardRole::for_roles(&caller.roles).ok_or(CoursesServiceError::Forbidden)?;
        match role {
            DashboardRole::Student => {
                let enrolled = self
                    .enrollments
                    .list_courses_for_student(&caller.user_id)
                    .await?;
                let enrolled_ids: Vec<CourseId> =
                    enrolled.iter().map(|entry| entry.course.id).collect();
                let recommended = self
                    .courses
                    .list_excluding(&enrolled_ids, RECOMMENDATION_LIMIT)
                    .await?;
                Ok(Dashboard::Student {
                    enrolled: enrolled
                        .iter()
                        .map(|entry| CourseCard::from(&entry.course))
                        .collect(),
                    recommended: recommended.iter().map(CourseCard::from).collect(),
                })
            }
            DashboardRole::Instructor => Ok(Dashboard::Instructor {
                courses: self.courses.list_by_instructor(&caller.user_id).await?,
            }),
            DashboardRole::Admin => Ok(Dashboard::Admin {
                courses: self.courses.list(None).await?,
            }),
        }
    }
}
