use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::user::User;

/// Insert a user; the password is stored as a SHA-256 hex digest
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
    password: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, name, password)
         VALUES ($1, $2, $3, $4)
         RETURNING id, email, name, password",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(password_digest(password))
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Check if a user exists by id
pub async fn find_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, password
         FROM users
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Unsalted SHA-256 hex digest of `password`.
///
/// Deterministic by construction; not a password hash suitable for verifying
/// logins. Nothing in this service reads it back.
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}
