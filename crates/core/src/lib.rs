//! Domain rules for the YaMDb review platform.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates call into it for role checks, input validation, confirmation-code
//! handling, and page arithmetic.

pub mod confirmation;
pub mod error;
pub mod paging;
pub mod permissions;
pub mod roles;
pub mod types;
pub mod validation;
