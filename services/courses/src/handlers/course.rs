use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::id::{CourseId, EnrollmentKey};

use crate::domain::authz::Caller;
use crate::domain::types::{Course, CourseListing, CourseWithInstructor, UserSummary};
use crate::error::CoursesServiceError;
use crate::handlers::enrollment::EnrollmentResponse;
use crate::state::AppState;
use crate::usecase::course::{
    CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase, GetCourseUseCase,
    ListCoursesUseCase, UpdateCourseInput, UpdateCourseUseCase,
};
use crate::usecase::enrollment::EnrollUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub full_name: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.0,
            full_name: summary.full_name,
        }
    }
}

#[derive(Serialize)]
pub struct CourseResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: Option<String>,
    pub instructor: Option<UserSummaryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
    pub version: i32,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseResponse {
    fn build(course: Course, instructor: Option<UserSummary>, is_enrolled: Option<bool>) -> Self {
        Self {
            id: course.id.0,
            title: course.title,
            description: course.description,
            instructor_id: course.instructor_id.map(|id| id.0),
            instructor: instructor.map(UserSummaryResponse::from),
            is_enrolled,
            version: course.version,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self::build(course, None, None)
    }
}

impl From<CourseWithInstructor> for CourseResponse {
    fn from(entry: CourseWithInstructor) -> Self {
        Self::build(entry.course, entry.instructor, None)
    }
}

impl From<CourseListing> for CourseResponse {
    fn from(listing: CourseListing) -> Self {
        Self::build(
            listing.course.course,
            listing.course.instructor,
            listing.is_enrolled,
        )
    }
}

// ── GET /courses ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListCoursesQuery {
    pub search: Option<String>,
}

pub async fn list_courses(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<Vec<CourseResponse>>, CoursesServiceError> {
    let usecase = ListCoursesUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let courses = usecase
        .execute(&Caller::from(identity), query.search.as_deref())
        .await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

// ── GET /courses/{id} ────────────────────────────────────────────────────────

pub async fn get_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CourseResponse>, CoursesServiceError> {
    let usecase = GetCourseUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let course = usecase
        .execute(&Caller::from(identity), CourseId(id))
        .await?;
    Ok(Json(course.into()))
}

// ── POST /courses ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

pub async fn create_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), CoursesServiceError> {
    let usecase = CreateCourseUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(
            &Caller::from(identity),
            CreateCourseInput {
                title: body.title,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

// ── PUT /courses/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub id: Option<i32>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub version: Option<i32>,
}

pub async fn update_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, CoursesServiceError> {
    let usecase = UpdateCourseUseCase {
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(
            &Caller::from(identity),
            CourseId(id),
            UpdateCourseInput {
                body_id: body.id.map(CourseId),
                title: body.title,
                description: body.description,
                version: body.version,
            },
        )
        .await?;
    Ok(Json(course.into()))
}

// ── DELETE /courses/{id} ─────────────────────────────────────────────────────

pub async fn delete_course(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, CoursesServiceError> {
    let usecase = DeleteCourseUseCase {
        courses: state.course_repo(),
    };
    usecase
        .execute(&Caller::from(identity), CourseId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /courses/{id}/enroll ────────────────────────────────────────────────

pub async fn enroll_self(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), CoursesServiceError> {
    let usecase = EnrollUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let caller = Caller::from(identity);
    let key = EnrollmentKey::new(caller.user_id.clone(), id);
    let enrollment = usecase.execute(&caller, key).await?;
    Ok((StatusCode::CREATED, Json(enrollment.into())))
}
