use serde::Deserialize;

use learnhub_core::config::Config;

/// Courses service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct CoursesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `COURSES_PORT`.
    #[serde(default = "default_port")]
    pub courses_port: u16,
    /// Insert the example users and courses at startup. Env var: `SEED_EXAMPLE_DATA`.
    #[serde(default)]
    pub seed_example_data: bool,
    /// Apply pending migrations at startup (default true). Env var: `RUN_MIGRATIONS`.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_port() -> u16 {
    3114
}

fn default_run_migrations() -> bool {
    true
}

impl Config for CoursesConfig {}
