pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod seed;
pub mod user;
