//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (or joined view)
//! - A `Deserialize`-free create DTO used by the repository
//! - An update DTO (all `Option` fields) for patches

pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;
