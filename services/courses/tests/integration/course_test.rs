use learnhub_courses::error::CoursesServiceError;
use learnhub_courses::usecase::course::{
    CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase, GetCourseUseCase,
    ListCoursesUseCase, UpdateCourseInput, UpdateCourseUseCase,
};
use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey};
use learnhub_domain::role::Role;

use crate::helpers::{InMemoryStore, admin, caller};

fn update_input(title: &str, version: Option<i32>) -> UpdateCourseInput {
    UpdateCourseInput {
        body_id: None,
        title: title.to_owned(),
        description: Some("updated".to_owned()),
        version,
    }
}

// ── ListCourses ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_courses_in_id_order_with_instructor() {
    let store = InMemoryStore::new();
    store.add_user("inst-1", &[Role::Instructor]);
    store.add_course("Rust Basics", Some("ownership"), "inst-1");
    store.add_course("Async Rust", None, "inst-1");

    let usecase = ListCoursesUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let courses = usecase.execute(&admin(), None).await.unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].course.course.title, "Rust Basics");
    assert_eq!(courses[1].course.course.title, "Async Rust");
    let instructor = courses[0].course.instructor.as_ref().unwrap();
    assert_eq!(instructor.full_name, "inst-1 Tester");
    assert!(courses.iter().all(|c| c.is_enrolled.is_none()));
}

#[tokio::test]
async fn should_filter_courses_by_title_or_description_case_sensitively() {
    let store = InMemoryStore::new();
    store.add_course("Rust Basics", Some("ownership"), "inst-1");
    store.add_course("Cooking", Some("Rust-free pans"), "inst-1");
    store.add_course("Gardening", None, "inst-1");

    let usecase = ListCoursesUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let matched = usecase.execute(&admin(), Some("Rust")).await.unwrap();
    let titles: Vec<&str> = matched
        .iter()
        .map(|c| c.course.course.title.as_str())
        .collect();
    assert_eq!(titles, ["Rust Basics", "Cooking"]);

    let lower = usecase.execute(&admin(), Some("rust")).await.unwrap();
    assert!(lower.is_empty());
}

#[tokio::test]
async fn should_match_whitespace_search_term_verbatim() {
    let store = InMemoryStore::new();
    store.add_course("Rust Basics", None, "inst-1");
    store.add_course("Gardening", None, "inst-1");

    let usecase = ListCoursesUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let spaced = usecase.execute(&admin(), Some(" ")).await.unwrap();
    let titles: Vec<&str> = spaced
        .iter()
        .map(|c| c.course.course.title.as_str())
        .collect();
    assert_eq!(titles, ["Rust Basics"]);

    let leading = usecase.execute(&admin(), Some(" Rust")).await.unwrap();
    assert!(leading.is_empty());
}

#[tokio::test]
async fn should_treat_empty_search_as_no_filter() {
    let store = InMemoryStore::new();
    store.add_course("Rust Basics", None, "inst-1");

    let usecase = ListCoursesUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let courses = usecase.execute(&admin(), Some("")).await.unwrap();
    assert_eq!(courses.len(), 1);
}

#[tokio::test]
async fn should_flag_enrolled_courses_for_students() {
    let store = InMemoryStore::new();
    let rust = store.add_course("Rust Basics", None, "inst-1");
    store.add_course("Async Rust", None, "inst-1");
    store.add_enrollment("stu-1", rust.id, EnrollmentStatus::Enrolled);

    let usecase = ListCoursesUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let courses = usecase
        .execute(&caller("stu-1", &[Role::Student]), None)
        .await
        .unwrap();
    assert_eq!(courses[0].is_enrolled, Some(true));
    assert_eq!(courses[1].is_enrolled, Some(false));
}

// ── GetCourse ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_course_not_found_for_unknown_id() {
    let store = InMemoryStore::new();
    let usecase = GetCourseUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let result = usecase.execute(&admin(), CourseId(99)).await;
    assert!(matches!(result, Err(CoursesServiceError::CourseNotFound)));
}

#[tokio::test]
async fn should_report_enrollment_flag_on_single_course_for_student() {
    let store = InMemoryStore::new();
    let rust = store.add_course("Rust Basics", None, "inst-1");
    store.add_enrollment("stu-1", rust.id, EnrollmentStatus::Enrolled);

    let usecase = GetCourseUseCase {
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let listing = usecase
        .execute(&caller("stu-1", &[Role::Student]), rust.id)
        .await
        .unwrap();
    assert_eq!(listing.is_enrolled, Some(true));

    let listing = usecase
        .execute(&caller("stu-2", &[Role::Student]), rust.id)
        .await
        .unwrap();
    assert_eq!(listing.is_enrolled, Some(false));
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_course_owned_by_instructor_at_version_one() {
    let store = InMemoryStore::new();
    store.add_user("inst-1", &[Role::Instructor]);

    let usecase = CreateCourseUseCase {
        users: store.clone(),
        courses: store.clone(),
    };
    let course = usecase
        .execute(
            &caller("inst-1", &[Role::Instructor]),
            CreateCourseInput {
                title: "Rust Basics".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(course.version, 1);
    assert_eq!(course.created_at, course.updated_at);
    assert!(course.is_taught_by(&"inst-1".into()));
    assert!(store.course(course.id).is_some());
}

#[tokio::test]
async fn should_forbid_students_from_creating_courses() {
    let store = InMemoryStore::new();
    store.add_user("stu-1", &[Role::Student]);

    let usecase = CreateCourseUseCase {
        users: store.clone(),
        courses: store.clone(),
    };
    let result = usecase
        .execute(
            &caller("stu-1", &[Role::Student]),
            CreateCourseInput {
                title: "Sneaky".into(),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CoursesServiceError::Forbidden)));
}

#[tokio::test]
async fn should_reject_blank_title_on_create() {
    let store = InMemoryStore::new();
    store.add_user("inst-1", &[Role::Instructor]);

    let usecase = CreateCourseUseCase {
        users: store.clone(),
        courses: store.clone(),
    };
    let result = usecase
        .execute(
            &caller("inst-1", &[Role::Instructor]),
            CreateCourseInput {
                title: "  ".into(),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CoursesServiceError::InvalidTitle)));
}

#[tokio::test]
async fn should_require_registered_caller_to_create_course() {
    let store = InMemoryStore::new();
    let usecase = CreateCourseUseCase {
        users: store.clone(),
        courses: store.clone(),
    };
    let result = usecase
        .execute(
            &caller("ghost", &[Role::Instructor]),
            CreateCourseInput {
                title: "Rust".into(),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CoursesServiceError::UserNotFound)));
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_course_and_bump_version() {
    let store = InMemoryStore::new();
    let course = store.add_course("Rust", None, "inst-1");

    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let updated = usecase
        .execute(
            &caller("inst-1", &[Role::Instructor]),
            course.id,
            update_input("Rust 2024", Some(1)),
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Rust 2024");
    assert_eq!(updated.version, 2);
    assert_eq!(updated.created_at, course.created_at);
}

#[tokio::test]
async fn should_fall_back_to_current_version_when_body_has_none() {
    let store = InMemoryStore::new();
    let course = store.add_course("Rust", None, "inst-1");
    store.bump_version(course.id);

    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let updated = usecase
        .execute(&admin(), course.id, update_input("Rust 2024", None))
        .await
        .unwrap();
    assert_eq!(updated.version, 3);
}

#[tokio::test]
async fn should_reject_stale_version_without_overwriting() {
    let store = InMemoryStore::new();
    let course = store.add_course("Rust", None, "inst-1");
    store.bump_version(course.id);

    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let result = usecase
        .execute(&admin(), course.id, update_input("Lost write", Some(1)))
        .await;

    assert!(matches!(result, Err(CoursesServiceError::ConcurrencyConflict)));
    let stored = store.course(course.id).unwrap();
    assert_eq!(stored.title, "Rust");
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn should_forbid_update_by_other_instructor() {
    let store = InMemoryStore::new();
    let course = store.add_course("Rust", None, "inst-1");

    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let result = usecase
        .execute(
            &caller("inst-2", &[Role::Instructor]),
            course.id,
            update_input("Hijacked", None),
        )
        .await;
    assert!(matches!(result, Err(CoursesServiceError::Forbidden)));
    assert_eq!(store.course(course.id).unwrap().title, "Rust");
}

#[tokio::test]
async fn should_reject_body_id_that_differs_from_path() {
    let store = InMemoryStore::new();
    let course = store.add_course("Rust", None, "inst-1");

    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let mut input = update_input("Rust", None);
    input.body_id = Some(CourseId(course.id.0 + 1));
    let result = usecase.execute(&admin(), course.id, input).await;
    assert!(matches!(result, Err(CoursesServiceError::IdMismatch)));
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_course() {
    let store = InMemoryStore::new();
    let usecase = UpdateCourseUseCase {
        courses: store.clone(),
    };
    let result = usecase
        .execute(&admin(), CourseId(7), update_input("Rust", None))
        .await;
    assert!(matches!(result, Err(CoursesServiceError::CourseNotFound)));
}

// ── DeleteCourse ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_course_together_with_its_enrollments() {
    let store = InMemoryStore::new();
    let rust = store.add_course("Rust", None, "inst-1");
    let go = store.add_course("Go", None, "inst-1");
    store.add_enrollment("stu-1", rust.id, EnrollmentStatus::Enrolled);
    store.add_enrollment("stu-1", go.id, EnrollmentStatus::Enrolled);

    let usecase = DeleteCourseUseCase {
        courses: store.clone(),
    };
    usecase
        .execute(&caller("inst-1", &[Role::Instructor]), rust.id)
        .await
        .unwrap();

    assert!(store.course(rust.id).is_none());
    assert!(store.enrollment(&EnrollmentKey::new("stu-1", rust.id)).is_none());
    assert!(store.enrollment(&EnrollmentKey::new("stu-1", go.id)).is_some());
}

#[tokio::test]
async fn should_forbid_delete_by_student() {
    let store = InMemoryStore::new();
    let rust = store.add_course("Rust", None, "inst-1");

    let usecase = DeleteCourseUseCase {
        courses: store.clone(),
    };
    let result = usecase
        .execute(&caller("stu-1", &[Role::Student]), rust.id)
        .await;
    assert!(matches!(result, Err(CoursesServiceError::Forbidden)));
    assert!(store.course(rust.id).is_some());
}
