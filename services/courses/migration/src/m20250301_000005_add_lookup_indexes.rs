use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Courses::Table)
                    .col(Courses::InstructorId)
                    .name("idx_courses_instructor_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .name("idx_enrollments_course_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_enrollments_course_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_courses_instructor_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    InstructorId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    CourseId,
}
