use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use learnhub_core::health::healthz;
use learnhub_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    course::{create_course, delete_course, enroll_self, get_course, list_courses, update_course},
    dashboard::get_dashboard,
    enrollment::{
        create_enrollment, delete_enrollment, get_enrollment, list_course_enrollments,
        list_enrollments, list_student_enrollments, my_enrollments, update_enrollment,
    },
    health::readyz,
    user::{get_me, register_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(register_user))
        .route("/users/@me", get(get_me))
        // Courses
        .route("/courses", get(list_courses))
        .route("/courses", post(create_course))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}", put(update_course))
        .route("/courses/{id}", delete(delete_course))
        .route("/courses/{id}/enroll", post(enroll_self))
        // Enrollments
        .route("/enrollments", get(list_enrollments))
        .route("/enrollments", post(create_enrollment))
        .route("/enrollments/@me", get(my_enrollments))
        .route(
            "/enrollments/students/{student_id}",
            get(list_student_enrollments),
        )
        .route(
            "/enrollments/courses/{course_id}",
            get(list_course_enrollments),
        )
        .route(
            "/enrollments/students/{student_id}/courses/{course_id}",
            get(get_enrollment),
        )
        .route(
            "/enrollments/students/{student_id}/courses/{course_id}",
            put(update_enrollment),
        )
        .route(
            "/enrollments/students/{student_id}/courses/{course_id}",
            delete(delete_enrollment),
        )
        // Dashboard
        .route("/dashboard", get(get_dashboard))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
