use axum::{Json, extract::State};
use serde::Serialize;

use learnhub_auth_types::identity::IdentityHeaders;

use crate::domain::authz::Caller;
use crate::domain::types::{CourseCard, Dashboard};
use crate::error::CoursesServiceError;
use crate::handlers::course::CourseResponse;
use crate::state::AppState;
use crate::usecase::dashboard::GetDashboardUseCase;

#[derive(Serialize)]
pub struct CourseCardResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
}

impl From<CourseCard> for CourseCardResponse {
    fn from(card: CourseCard) -> Self {
        Self {
            id: card.id.0,
            title: card.title,
            description: card.description,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Student {
        enrolled_courses: Vec<CourseCardResponse>,
        recommended_courses: Vec<CourseCardResponse>,
    },
    Instructor {
        courses: Vec<CourseResponse>,
    },
    Admin {
        courses: Vec<CourseResponse>,
    },
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        match dashboard {
            Dashboard::Student {
                enrolled,
                recommended,
            } => Self::Student {
                enrolled_courses: enrolled.into_iter().map(Into::into).collect(),
                recommended_courses: recommended.into_iter().map(Into::into).collect(),
            },
            Dashboard::Instructor { courses } => Self::Instructor {
                courses: courses.into_iter().map(Into::into).collect(),
            },
            Dashboard::Admin { courses } => Self::Admin {
                courses: courses.into_iter().map(Into::into).collect(),
            },
        }
    }
}

// ── GET /dashboard ───────────────────────────────────────────────────────────

pub async fn get_dashboard(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, CoursesServiceError> {
    let usecase = GetDashboardUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let dashboard = usecase.execute(&Caller::from(identity)).await?;
    Ok(Json(dashboard.into()))
}
