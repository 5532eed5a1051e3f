use learnhub_courses::domain::types::{DESCRIPTION_FALLBACK, Dashboard};
use learnhub_courses::error::CoursesServiceError;
use learnhub_courses::usecase::dashboard::GetDashboardUseCase;
use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::role::Role;

use crate::helpers::{InMemoryStore, caller};

fn dashboard_usecase(store: &InMemoryStore) -> GetDashboardUseCase<InMemoryStore, InMemoryStore> {
    GetDashboardUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    }
}

#[tokio::test]
async fn should_show_enrolled_and_two_recommended_courses_to_student() {
    let store = InMemoryStore::new();
    let first = store.add_course("Rust", Some("ownership"), "inst-1");
    let second = store.add_course("Go", None, "inst-1");
    let third = store.add_course("Zig", Some("comptime"), "inst-2");
    store.add_course("Haskell", None, "inst-2");
    store.add_enrollment("stu-1", first.id, EnrollmentStatus::Enrolled);

    let dashboard = dashboard_usecase(&store)
        .execute(&caller("stu-1", &[Role::Student]))
        .await
        .unwrap();

    let Dashboard::Student {
        enrolled,
        recommended,
    } = dashboard
    else {
        panic!("expected student dashboard");
    };
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].id, first.id);
    assert_eq!(enrolled[0].description, "ownership");

    let recommended_ids: Vec<_> = recommended.iter().map(|c| c.id).collect();
    assert_eq!(recommended_ids, [second.id, third.id]);
    assert_eq!(recommended[0].description, DESCRIPTION_FALLBACK);
}

#[tokio::test]
async fn should_prefer_student_view_when_caller_holds_every_role() {
    let store = InMemoryStore::new();
    store.add_course("Rust", None, "multi");

    let dashboard = dashboard_usecase(&store)
        .execute(&caller("multi", &[Role::Admin, Role::Instructor, Role::Student]))
        .await
        .unwrap();
    assert!(matches!(dashboard, Dashboard::Student { .. }));
}

#[tokio::test]
async fn should_show_only_owned_courses_to_instructor() {
    let store = InMemoryStore::new();
    store.add_course("Rust", None, "inst-1");
    store.add_course("Go", None, "inst-2");

    let dashboard = dashboard_usecase(&store)
        .execute(&caller("inst-1", &[Role::Instructor, Role::Admin]))
        .await
        .unwrap();
    let Dashboard::Instructor { courses } = dashboard else {
        panic!("expected instructor dashboard");
    };
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course.title, "Rust");
}

#[tokio::test]
async fn should_show_every_course_to_admin() {
    let store = InMemoryStore::new();
    store.add_course("Rust", None, "inst-1");
    store.add_course("Go", None, "inst-2");

    let dashboard = dashboard_usecase(&store)
        .execute(&caller("admin-1", &[Role::Admin]))
        .await
        .unwrap();
    let Dashboard::Admin { courses } = dashboard else {
        panic!("expected admin dashboard");
    };
    assert_eq!(courses.len(), 2);
}

#[tokio::test]
async fn should_forbid_dashboard_without_roles() {
    let store = InMemoryStore::new();
    let result = dashboard_usecase(&store).execute(&caller("nobody", &[])).await;
    assert!(matches!(result, Err(CoursesServiceError::Forbidden)));
}
