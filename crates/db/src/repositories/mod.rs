//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod review_repo;
pub mod taxonomy_repo;
pub mod title_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use review_repo::ReviewRepo;
pub use taxonomy_repo::TaxonomyRepo;
pub use title_repo::TitleRepo;
pub use user_repo::UserRepo;
