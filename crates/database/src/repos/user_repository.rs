//! Repository for the user directory.

use crate::entities::{CreateUserRequest, User};
use crate::timestamp_now;
use crate::types::{DatabaseError, DatabaseResult};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

const USER_COLUMNS: &str = "id, public_id, display_name, email, interests, created_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let public_id = request.public_id.clone().unwrap_or_else(cuid2::cuid);
        let now = timestamp_now();
        let interests = serde_json::to_string(&request.interests)?;

        let result = sqlx::query(
            "INSERT INTO users (public_id, display_name, email, interests, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.display_name)
        .bind(&request.email)
        .bind(&interests)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(user_id = id, public_id = %public_id, "created user");

        Ok(User {
            id,
            public_id,
            display_name: request.display_name.clone(),
            email: request.email.clone(),
            interests: request.interests.clone(),
            created_at: now,
        })
    }

    /// Find a user by public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by email address
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// The whole directory, in registration order
    pub async fn list_all(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_user).collect()
    }

    /// Replace a user's interest tags
    pub async fn update_interests(&self, public_id: &str, interests: &[String]) -> DatabaseResult<User> {
        let encoded = serde_json::to_string(interests)?;
        let result = sqlx::query("UPDATE users SET interests = ? WHERE public_id = ?")
            .bind(&encoded)
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {public_id}")));
        }

        self.find_by_public_id(public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {public_id}")))
    }

    /// Count registered users
    pub async fn count(&self) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn map_user(row: &SqliteRow) -> DatabaseResult<User> {
    let interests: String = row.try_get("interests")?;

    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        display_name: row.try_get("display_name")?,
        email: row.try_get("email")?,
        interests: serde_json::from_str(&interests)?,
        created_at: row.try_get("created_at")?,
    })
}
