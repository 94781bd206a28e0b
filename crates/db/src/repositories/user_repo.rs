//! Repository for the `users` table.

use gharpayy_core::roles::{ProfileKind, Role};
use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, phone_number, role, profile_image_url, is_verified, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert the user record for credential `id`, returning the created row.
    pub async fn create(pool: &PgPool, id: DbId, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, name, phone_number, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.phone_number)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Insert the tenant or owner profile row for a user.
    ///
    /// Does nothing for roles without a profile. Returns `true` if a row was
    /// written.
    pub async fn create_profile(pool: &PgPool, id: DbId, role: Role) -> Result<bool, sqlx::Error> {
        let sql = match role.profile_kind() {
            Some(ProfileKind::Tenant) => "INSERT INTO tenants (user_id) VALUES ($1)",
            Some(ProfileKind::Owner) => "INSERT INTO owners (user_id) VALUES ($1)",
            None => return Ok(false),
        };
        sqlx::query(sql).bind(id).execute(pool).await?;
        Ok(true)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List users, newest first, optionally restricted to one role.
    pub async fn list(pool: &PgPool, role: Option<Role>) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR role = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role.map(Role::as_str))
            .fetch_all(pool)
            .await
    }

    /// Replace the editable profile fields. Returns `None` if the user does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET name = $2, phone_number = $3, profile_image_url = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone_number)
            .bind(&input.profile_image_url)
            .fetch_optional(pool)
            .await
    }
}
