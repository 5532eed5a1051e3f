//! Domain types shared across LearnHub crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod enrollment;
pub mod id;
pub mod role;
