use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};

use crate::domain::authz::Caller;
use crate::domain::types::{Enrollment, EnrollmentDetail};
use crate::error::CoursesServiceError;
use crate::handlers::course::{CourseResponse, UserSummaryResponse};
use crate::state::AppState;
use crate::usecase::enrollment::{
    EnrollUseCase, GetEnrollmentUseCase, ListCourseEnrollmentsUseCase,
    ListEnrollmentsUseCase, ListStudentEnrollmentsUseCase, MyEnrollmentsUseCase,
    UnenrollUseCase, UpdateEnrollmentStatusInput, UpdateEnrollmentStatusUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EnrollmentResponse {
    pub student_id: String,
    pub course_id: i32,
    pub status: EnrollmentStatus,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub enrollment_date: chrono::DateTime<chrono::Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            student_id: enrollment.key.student_id.0,
            course_id: enrollment.key.course_id.0,
            status: enrollment.status,
            enrollment_date: enrollment.enrollment_date,
        }
    }
}

#[derive(Serialize)]
pub struct EnrollmentDetailResponse {
    #[serde(flatten)]
    pub enrollment: EnrollmentResponse,
    pub course: CourseResponse,
    pub student: Option<UserSummaryResponse>,
}

impl From<EnrollmentDetail> for EnrollmentDetailResponse {
    fn from(detail: EnrollmentDetail) -> Self {
        Self {
            enrollment: detail.enrollment.into(),
            course: detail.course.into(),
            student: detail.student.map(UserSummaryResponse::from),
        }
    }
}

fn enrollment_list(enrollments: Vec<Enrollment>) -> Json<Vec<EnrollmentResponse>> {
    Json(enrollments.into_iter().map(EnrollmentResponse::from).collect())
}

// ── GET /enrollments ─────────────────────────────────────────────────────────

pub async fn list_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, CoursesServiceError> {
    let usecase = ListEnrollmentsUseCase {
        enrollments: state.enrollment_repo(),
    };
    let enrollments = usecase.execute(&Caller::from(identity)).await?;
    Ok(enrollment_list(enrollments))
}

// ── POST /enrollments ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: String,
    pub course_id: i32,
}

pub async fn create_enrollment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), CoursesServiceError> {
    let student_id = body
        .student_id
        .parse::<UserId>()
        .map_err(|_| CoursesServiceError::InvalidUserId)?;
    let usecase = EnrollUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let enrollment = usecase
        .execute(
            &Caller::from(identity),
            EnrollmentKey::new(student_id, body.course_id),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

// ── GET /enrollments/@me ─────────────────────────────────────────────────────

pub async fn my_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, CoursesServiceError> {
    let usecase = MyEnrollmentsUseCase {
        enrollments: state.enrollment_repo(),
    };
    let courses = usecase.execute(&Caller::from(identity)).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

// ── GET /enrollments/students/{student_id} ───────────────────────────────────

pub async fn list_student_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<EnrollmentResponse>>, CoursesServiceError> {
    let usecase = ListStudentEnrollmentsUseCase {
        enrollments: state.enrollment_repo(),
    };
    let enrollments = usecase
        .execute(&Caller::from(identity), &UserId(student_id))
        .await?;
    Ok(enrollment_list(enrollments))
}

// ── GET /enrollments/courses/{course_id} ─────────────────────────────────────

pub async fn list_course_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<EnrollmentResponse>>, CoursesServiceError> {
    let usecase = ListCourseEnrollmentsUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let enrollments = usecase
        .execute(&Caller::from(identity), CourseId(course_id))
        .await?;
    Ok(enrollment_list(enrollments))
}

// ── GET /enrollments/students/{student_id}/courses/{course_id} ───────────────

pub async fn get_enrollment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, i32)>,
) -> Result<Json<EnrollmentDetailResponse>, CoursesServiceError> {
    let usecase = GetEnrollmentUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let detail = usecase
        .execute(
            &Caller::from(identity),
            EnrollmentKey::new(student_id, course_id),
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── PUT /enrollments/students/{student_id}/courses/{course_id} ───────────────

#[derive(Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub student_id: Option<String>,
    pub course_id: Option<i32>,
    pub status: EnrollmentStatus,
}

pub async fn update_enrollment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, i32)>,
    Json(body): Json<UpdateEnrollmentRequest>,
) -> Result<StatusCode, CoursesServiceError> {
    let usecase = UpdateEnrollmentStatusUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    usecase
        .execute(
            &Caller::from(identity),
            EnrollmentKey::new(student_id, course_id),
            UpdateEnrollmentStatusInput {
                body_student_id: body.student_id.map(UserId),
                body_course_id: body.course_id.map(CourseId),
                status: body.status,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /enrollments/students/{student_id}/courses/{course_id} ────────────

pub async fn delete_enrollment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, i32)>,
) -> Result<StatusCode, CoursesServiceError> {
    let usecase = UnenrollUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    usecase
        .execute(
            &Caller::from(identity),
            EnrollmentKey::new(student_id, course_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
