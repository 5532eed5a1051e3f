use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use learnhub_core::config::Config;
use learnhub_core::tracing::init_tracing;
use learnhub_courses::config::CoursesConfig;
use learnhub_courses::router::build_router;
use learnhub_courses::state::AppState;
use learnhub_courses::usecase::seed::SeedExampleDataUseCase;
use learnhub_courses_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("courses");

    let config = CoursesConfig::from_env().context("load courses configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None).await.context("run migrations")?;
    }

    let state = AppState { db };

    if config.seed_example_data {
        SeedExampleDataUseCase {
            users: state.user_repo(),
            courses: state.course_repo(),
            enrollments: state.enrollment_repo(),
        }
        .execute()
        .await
        .context("seed example data")?;
    }

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.courses_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("courses service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
