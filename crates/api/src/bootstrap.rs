//! Startup tasks that seed the database.

use yamdb_db::repositories::UserRepo;
use yamdb_db::DbPool;

use crate::config::AdminBootstrap;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Superuser email {email} already belongs to user {owner}")]
    EmailTaken { email: String, owner: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create or promote the configured superuser.
///
/// The account has no confirmation code; the operator requests one through
/// `/auth/signup` with the same username and email, so the stored email is
/// overwritten with the configured one.
pub async fn ensure_superuser(pool: &DbPool, admin: &AdminBootstrap) -> Result<(), BootstrapError> {
    if let Some(owner) = UserRepo::find_by_email(pool, &admin.email).await? {
        if owner.username != admin.username {
            return Err(BootstrapError::EmailTaken {
                email: admin.email.clone(),
                owner: owner.username,
            });
        }
    }

    let user = UserRepo::ensure_superuser(pool, &admin.username, &admin.email)
        .await
        .map_err(|err| {
            let email_clash = matches!(
                &err,
                sqlx::Error::Database(db_err) if db_err.constraint() == Some("uq_users_email")
            );
            if email_clash {
                BootstrapError::EmailTaken {
                    email: admin.email.clone(),
                    owner: "another user".to_string(),
                }
            } else {
                BootstrapError::Database(err)
            }
        })?;
    tracing::info!(user_id = user.id, username = %user.username, "Superuser ensured");
    Ok(())
}
