//! Idempotent example data inserted at startup when `SEED_EXAMPLE_DATA` is set.

use chrono::Utc;

use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{EnrollmentKey, UserId};
use learnhub_domain::role::Role;

use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::domain::types::{Enrollment, NewCourse};
use crate::error::CoursesServiceError;
use crate::usecase::user::{RegisterUserInput, RegisterUserUseCase};

struct SeedUser {
    id: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: Role,
}

struct SeedCourse {
    title: &'static str,
    description: &'static str,
    instructor_id: &'static str,
}

const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        id: "admin",
        email: "admin@learnhub.com",
        first_name: "Admin",
        last_name: "User",
        role: Role::Admin,
    },
    SeedUser {
        id: "david.wilson",
        email: "david.wilson@learnhub.com",
        first_name: "David",
        last_name: "Wilson",
        role: Role::Instructor,
    },
    SeedUser {
        id: "sarah.zhang",
        email: "sarah.zhang@learnhub.com",
        first_name: "Sarah",
        last_name: "Zhang",
        role: Role::Instructor,
    },
    SeedUser {
        id: "michael.brown",
        email: "michael.brown@learnhub.com",
        first_name: "Michael",
        last_name: "Brown",
        role: Role::Instructor,
    },
    SeedUser {
        id: "emily.patel",
        email: "emily.patel@learnhub.com",
        first_name: "Emily",
        last_name: "Patel",
        role: Role::Instructor,
    },
    SeedUser {
        id: "student.one",
        email: "student.one@learnhub.com",
        first_name: "John",
        last_name: "Smith",
        role: Role::Student,
    },
    SeedUser {
        id: "student.two",
        email: "student.two@learnhub.com",
        first_name: "Emma",
        last_name: "Johnson",
        role: Role::Student,
    },
    SeedUser {
        id: "student.three",
        email: "student.three@learnhub.com",
        first_name: "Lucas",
        last_name: "Garcia",
        role: Role::Student,
    },
];

/// Enrolled in every seeded course.
const DEMO_STUDENT_ID: &str = "student.one";

const SEED_COURSES: &[SeedCourse] = &[
    SeedCourse {
        title: "Programming Fundamentals with C#",
        description: "Master the basics of C# programming with hands-on projects and real-world applications. Perfect for beginners!",
        instructor_id: "david.wilson",
    },
    SeedCourse {
        title: "Object-Oriented Programming Mastery",
        description: "Deep dive into OOP concepts with practical examples in C# and Java. Learn inheritance, polymorphism, and encapsulation.",
        instructor_id: "david.wilson",
    },
    SeedCourse {
        title: "Full-Stack Web Development Bootcamp",
        description: "Comprehensive course covering HTML5, CSS3, JavaScript, and modern web frameworks. Build responsive and dynamic websites.",
        instructor_id: "sarah.zhang",
    },
    SeedCourse {
        title: "Advanced React & Redux",
        description: "Master React.js, Redux, and modern state management. Create sophisticated single-page applications.",
        instructor_id: "sarah.zhang",
    },
    SeedCourse {
        title: "Data Science Essentials",
        description: "Introduction to data analysis, visualization, and statistical methods using Python and R. Learn from real-world datasets.",
        instructor_id: "michael.brown",
    },
    SeedCourse {
        title: "Machine Learning Fundamentals",
        description: "Explore ML algorithms, neural networks, and practical applications using TensorFlow and scikit-learn.",
        instructor_id: "michael.brown",
    },
    SeedCourse {
        title: "Cloud Computing with AWS",
        description: "Learn AWS services, cloud architecture, and best practices for scalable cloud solutions.",
        instructor_id: "emily.patel",
    },
    SeedCourse {
        title: "DevOps Engineering Professional",
        description: "Master CI/CD pipelines, containerization with Docker, and Kubernetes orchestration.",
        instructor_id: "emily.patel",
    },
    SeedCourse {
        title: "Mobile App Development with Flutter",
        description: "Create cross-platform mobile applications using Flutter and Dart. Build beautiful, native apps for iOS and Android.",
        instructor_id: "sarah.zhang",
    },
    SeedCourse {
        title: "Cybersecurity Fundamentals",
        description: "Learn essential cybersecurity concepts, threat detection, and security best practices for modern applications.",
        instructor_id: "emily.patel",
    },
    SeedCourse {
        title: "Artificial Intelligence Ethics",
        description: "Explore the ethical implications of AI, responsible AI development, and current challenges in the field.",
        instructor_id: "michael.brown",
    },
    SeedCourse {
        title: "Software Architecture Patterns",
        description: "Study modern software architecture patterns, microservices, and system design principles.",
        instructor_id: "david.wilson",
    },
];

/// Counts of rows inserted by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub courses: usize,
    pub enrollments: usize,
}

pub struct SeedExampleDataUseCase<U, C, E>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub courses: C,
    pub enrollments: E,
}

impl<U, C, E> SeedExampleDataUseCase<U, C, E>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Existing users (by id), courses (by title) and enrollments are left alone.
    pub async fn execute(self) -> Result<SeedReport, CoursesServiceError> {
        let mut report = SeedReport::default();

        let register = RegisterUserUseCase { repo: self.users };
        for seed in SEED_USERS {
            let id = UserId::from(seed.id);
            if register.repo.find_by_id(&id).await?.is_some() {
                continue;
            }
            let input = RegisterUserInput {
                id,
                first_name: seed.first_name.to_owned(),
                last_name: seed.last_name.to_owned(),
                email: seed.email.to_owned(),
                roles: [seed.role].into_iter().collect(),
            };
            match register.register(input).await {
                Ok(_) => report.users += 1,
                Err(CoursesServiceError::UserAlreadyExists) => {
                    tracing::warn!(email = seed.email, "seed user email taken by another id");
                }
                Err(e) => return Err(e),
            }
        }

        let student = UserId::from(DEMO_STUDENT_ID);
        let enroll_demo_student = register
            .repo
            .find_by_id(&student)
            .await?
            .is_some_and(|user| user.has_role(Role::Student));
        if !enroll_demo_student {
            tracing::warn!(student_id = %student, "demo student missing, skipping enrollments");
        }

        for seed in SEED_COURSES {
            let course = match self.courses.find_by_title(seed.title).await? {
                Some(course) => course,
                None => {
                    let instructor = UserId::from(seed.instructor_id);
                    let instructor_known = register.repo.find_by_id(&instructor).await?.is_some();
                    if !instructor_known {
                        tracing::warn!(
                            title = seed.title,
                            instructor_id = %instructor,
                            "seed instructor missing, course left unassigned"
                        );
                    }
                    let instructor_id = instructor_known.then_some(instructor);
                    let course = self
                        .courses
                        .create(&NewCourse {
                            title: seed.title.to_owned(),
                            description: Some(seed.description.to_owned()),
                            instructor_id,
                            created_at: Utc::now(),
                        })
                        .await?;
                    report.courses += 1;
                    course
                }
            };
            if !enroll_demo_student {
                continue;
            }

            let key = EnrollmentKey::new(student.clone(), course.id);
            if self.enrollments.find(&key).await?.is_some() {
                continue;
            }
            match self
                .enrollments
                .create(&Enrollment {
                    key,
                    enrollment_date: Utc::now(),
                    status: EnrollmentStatus::Enrolled,
                })
                .await
            {
                Ok(()) => report.enrollments += 1,
                Err(CoursesServiceError::AlreadyEnrolled) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            users = report.users,
            courses = report.courses,
            enrollments = report.enrollments,
            "example data seeded"
        );
        Ok(report)
    }
}
