use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, LikeExpr},
};

use learnhub_courses_schema::{courses, enrollments, user_roles, users};
use learnhub_domain::enrollment::EnrollmentStatus;
use learnhub_domain::id::{CourseId, EnrollmentKey, UserId};
use learnhub_domain::role::{Role, RoleSet};

use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::domain::types::{
    Course, CourseChanges, CourseWithInstructor, Enrollment, NewCourse, User, UserSummary,
    full_name,
};
use crate::error::CoursesServiceError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CoursesServiceError> {
        let Some(model) = users::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await
            .context("find user by id")?
        else {
            return Ok(None);
        };
        let role_rows = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(id.as_str()))
            .all(&self.db)
            .await
            .context("list user roles")?;
        Ok(Some(user_from_model(model, roles_from_rows(role_rows))))
    }

    async fn create(&self, user: &User) -> Result<(), CoursesServiceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let user = user.clone();
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id.0.clone()),
                        first_name: Set(user.first_name),
                        last_name: Set(user.last_name),
                        email: Set(user.email),
                        created_at: Set(user.created_at),
                        updated_at: Set(user.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    for role in user.roles.iter() {
                        user_roles::Entity::insert(user_roles::ActiveModel {
                            user_id: Set(user.id.0.clone()),
                            role: Set(role.as_str().to_owned()),
                        })
                        .exec_without_returning(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(CoursesServiceError::UserAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }
}

fn roles_from_rows(rows: Vec<user_roles::Model>) -> RoleSet {
    rows.into_iter()
        .filter_map(|row| match row.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(user_id = %row.user_id, error = %e, "skipping stored role");
                None
            }
        })
        .collect()
}

fn user_from_model(model: users::Model, roles: RoleSet) -> User {
    User {
        id: UserId(model.id),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        roles,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let mut query = courses::Entity::find();
        if let Some(term) = search.filter(|term| !term.is_empty()) {
            let pattern = contains_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::col((courses::Entity, courses::Column::Title)).like(pattern.clone()),
                    )
                    .add(
                        Expr::col((courses::Entity, courses::Column::Description)).like(pattern),
                    ),
            );
        }
        let rows = query
            .find_also_related(users::Entity)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .context("list courses")?;
        Ok(rows.into_iter().map(course_with_instructor).collect())
    }

    async fn list_by_instructor(
        &self,
        instructor_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let rows = courses::Entity::find()
            .filter(courses::Column::InstructorId.eq(instructor_id.as_str()))
            .find_also_related(users::Entity)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .context("list courses by instructor")?;
        Ok(rows.into_iter().map(course_with_instructor).collect())
    }

    async fn list_excluding(
        &self,
        exclude: &[CourseId],
        limit: u64,
    ) -> Result<Vec<Course>, CoursesServiceError> {
        let mut query = courses::Entity::find();
        if !exclude.is_empty() {
            query = query.filter(courses::Column::Id.is_not_in(exclude.iter().map(|id| id.0)));
        }
        let models = query
            .order_by_asc(courses::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list courses excluding ids")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CoursesServiceError> {
        let model = courses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn find_with_instructor(
        &self,
        id: CourseId,
    ) -> Result<Option<CourseWithInstructor>, CoursesServiceError> {
        let row = courses::Entity::find_by_id(id.0)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find course with instructor")?;
        Ok(row.map(course_with_instructor))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Course>, CoursesServiceError> {
        let model = courses::Entity::find()
            .filter(courses::Column::Title.eq(title))
            .order_by_asc(courses::Column::Id)
            .one(&self.db)
            .await
            .context("find course by title")?;
        Ok(model.map(course_from_model))
    }

    async fn create(&self, course: &NewCourse) -> Result<Course, CoursesServiceError> {
        let model = courses::ActiveModel {
            title: Set(course.title.clone()),
            description: Set(course.description.clone()),
            instructor_id: Set(course.instructor_id.as_ref().map(|id| id.0.clone())),
            created_at: Set(course.created_at),
            updated_at: Set(course.created_at),
            version: Set(1),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create course")?;
        Ok(course_from_model(model))
    }

    async fn update_if_version(
        &self,
        id: CourseId,
        expected_version: i32,
        changes: &CourseChanges,
    ) -> Result<Option<Course>, CoursesServiceError> {
        let result = courses::Entity::update_many()
            .col_expr(courses::Column::Title, Expr::value(changes.title.clone()))
            .col_expr(
                courses::Column::Description,
                Expr::value(changes.description.clone()),
            )
            .col_expr(courses::Column::UpdatedAt, Expr::value(changes.updated_at))
            .col_expr(
                courses::Column::Version,
                Expr::col(courses::Column::Version).add(1),
            )
            .filter(courses::Column::Id.eq(id.0))
            .filter(courses::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .context("update course")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete_with_enrollments(&self, id: CourseId) -> Result<bool, CoursesServiceError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    enrollments::Entity::delete_many()
                        .filter(enrollments::Column::CourseId.eq(id.0))
                        .exec(txn)
                        .await?;
                    let result = courses::Entity::delete_many()
                        .filter(courses::Column::Id.eq(id.0))
                        .exec(txn)
                        .await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete course with enrollments")?;
        Ok(deleted)
    }
}

/// `LIKE` pattern matching `term` as a literal substring.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: CourseId(model.id),
        title: model.title,
        description: model.description,
        instructor_id: model.instructor_id.map(UserId),
        created_at: model.created_at,
        updated_at: model.updated_at,
        version: model.version,
    }
}

fn course_with_instructor(
    (course, instructor): (courses::Model, Option<users::Model>),
) -> CourseWithInstructor {
    CourseWithInstructor {
        course: course_from_model(course),
        instructor: instructor.map(|user| UserSummary {
            full_name: full_name(&user.first_name, &user.last_name),
            id: UserId(user.id),
        }),
    }
}

// ── Enrollment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn find(&self, key: &EnrollmentKey) -> Result<Option<Enrollment>, CoursesServiceError> {
        let model = enrollments::Entity::find_by_id((key.student_id.0.clone(), key.course_id.0))
            .one(&self.db)
            .await
            .context("find enrollment")?;
        Ok(model.map(enrollment_from_model))
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, CoursesServiceError> {
        let models = enrollments::Entity::find()
            .order_by_asc(enrollments::Column::CourseId)
            .order_by_asc(enrollments::Column::StudentId)
            .all(&self.db)
            .await
            .context("list enrollments")?;
        Ok(models.into_iter().map(enrollment_from_model).collect())
    }

    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id.as_str()))
            .order_by_asc(enrollments::Column::CourseId)
            .all(&self.db)
            .await
            .context("list enrollments by student")?;
        Ok(models.into_iter().map(enrollment_from_model).collect())
    }

    async fn list_by_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id.0))
            .order_by_asc(enrollments::Column::StudentId)
            .all(&self.db)
            .await
            .context("list enrollments by course")?;
        Ok(models.into_iter().map(enrollment_from_model).collect())
    }

    async fn list_courses_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<CourseWithInstructor>, CoursesServiceError> {
        let course_ids: Vec<i32> = enrollments::Entity::find()
            .select_only()
            .column(enrollments::Column::CourseId)
            .filter(enrollments::Column::StudentId.eq(student_id.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list enrolled course ids")?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .find_also_related(users::Entity)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .context("list enrolled courses")?;
        Ok(rows.into_iter().map(course_with_instructor).collect())
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), CoursesServiceError> {
        let result = enrollments::Entity::insert(enrollments::ActiveModel {
            student_id: Set(enrollment.key.student_id.0.clone()),
            course_id: Set(enrollment.key.course_id.0),
            enrollment_date: Set(enrollment.enrollment_date),
            status: Set(status_to_model(enrollment.status)),
        })
        .exec_without_returning(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CoursesServiceError::AlreadyEnrolled),
            // Users are never deleted here, so a dangling key means the course vanished.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                Err(CoursesServiceError::CourseNotFound)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create enrollment").into()),
        }
    }

    async fn update_status(
        &self,
        key: &EnrollmentKey,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<bool, CoursesServiceError> {
        let result = enrollments::Entity::update_many()
            .set(enrollments::ActiveModel {
                status: Set(status_to_model(to)),
                ..Default::default()
            })
            .filter(enrollments::Column::StudentId.eq(key.student_id.as_str()))
            .filter(enrollments::Column::CourseId.eq(key.course_id.0))
            .filter(enrollments::Column::Status.eq(status_to_model(from)))
            .exec(&self.db)
            .await
            .context("update enrollment status")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, key: &EnrollmentKey) -> Result<bool, CoursesServiceError> {
        let result = enrollments::Entity::delete_many()
            .filter(enrollments::Column::StudentId.eq(key.student_id.as_str()))
            .filter(enrollments::Column::CourseId.eq(key.course_id.0))
            .exec(&self.db)
            .await
            .context("delete enrollment")?;
        Ok(result.rows_affected > 0)
    }
}

fn status_to_model(status: EnrollmentStatus) -> enrollments::Status {
    match status {
        EnrollmentStatus::Enrolled => enrollments::Status::Enrolled,
        EnrollmentStatus::Completed => enrollments::Status::Completed,
        EnrollmentStatus::Dropped => enrollments::Status::Dropped,
    }
}

fn status_from_model(status: enrollments::Status) -> EnrollmentStatus {
    match status {
        enrollments::Status::Enrolled => EnrollmentStatus::Enrolled,
        enrollments::Status::Completed => EnrollmentStatus::Completed,
        enrollments::Status::Dropped => EnrollmentStatus::Dropped,
    }
}

fn enrollment_from_model(model: enrollments::Model) -> Enrollment {
    Enrollment {
        key: EnrollmentKey::new(model.student_id, model.course_id),
        enrollment_date: model.enrollment_date,
        status: status_from_model(model.status),
    }
}
