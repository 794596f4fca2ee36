//! Permission predicates.
//!
//! Three rules cover every endpoint:
//!
//! - reads are open to everyone, including anonymous callers;
//! - writes on authored content (reviews, comments) need the author, a
//!   moderator, an admin, or a superuser;
//! - writes on the catalogue (titles, categories, genres) and user management
//!   need an admin or a superuser.
//!
//! The HTTP layer decides which rule applies; this module only answers the
//! question for a given caller.

use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    pub is_superuser: bool,
}

impl Actor {
    /// Admin role or the superuser flag.
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role == Role::Admin
    }

    /// Moderators and everyone with admin rights.
    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.role == Role::Moderator
    }
}

/// Whether `actor` may edit or delete content written by `author_id`.
pub fn can_modify_authored(actor: &Actor, author_id: DbId) -> bool {
    actor.is_staff() || actor.user_id == author_id
}

/// Whether `actor` may write to the title/category/genre catalogue or manage
/// other users.
pub fn can_manage_catalogue(actor: &Actor) -> bool {
    actor.is_admin()
}
