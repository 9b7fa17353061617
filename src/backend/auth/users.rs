/**
 * User Model and Database Operations
 *
 * This module handles account rows and their queries. `User` carries the
 * password hash and never leaves the backend; handlers convert it to a
 * `UserProfile` before responding.
 */
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::backend::messaging::db::delete_all_for;
use crate::shared::{Gender, UserProfile};

const USER_COLUMNS: &str =
    "id, fullname, username, password_hash, bio, gender, profile_pic, is_disabled, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: String,
    /// Display name, title-cased
    pub fullname: String,
    /// Login name, lower-cased and unique
    pub username: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub bio: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub profile_pic: String,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection without the password hash
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            fullname: self.fullname.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            gender: self.gender,
            profile_pic: self.profile_pic.clone(),
            is_disabled: self.is_disabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields supplied at signup
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub username: String,
    pub password_hash: String,
    pub gender: Gender,
    pub profile_pic: String,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.profile_pic.is_none() && self.bio.is_none() && self.gender.is_none()
    }
}

/// Create a new user
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, fullname, username, password_hash, bio, gender, profile_pic, is_disabled, created_at, updated_at)
        VALUES (?, ?, ?, ?, '', ?, ?, 0, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&id)
    .bind(&new_user.fullname)
    .bind(&new_user.username)
    .bind(&new_user.password_hash)
    .bind(new_user.gender.as_str())
    .bind(&new_user.profile_pic)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get user by username (exact match; callers lower-case first)
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Every enabled user except `user_id`, for the chat sidebar
pub async fn list_active_users_except(pool: &SqlitePool, user_id: &str) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id != ? AND is_disabled = 0 ORDER BY fullname, username"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Apply a partial profile update
///
/// Returns `None` if the user does not exist.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    update: &ProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET profile_pic = COALESCE(?, profile_pic),
            bio = COALESCE(?, bio),
            gender = COALESCE(?, gender),
            updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(update.profile_pic.as_deref())
    .bind(update.bio.as_deref())
    .bind(update.gender.map(|g| g.as_str()))
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Set or clear the disabled flag
pub async fn set_disabled(pool: &SqlitePool, user_id: &str, disabled: bool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET is_disabled = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(disabled)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Delete a user and every message they sent or received
///
/// Both deletes commit together. Returns the number of messages removed.
pub async fn delete_user_and_messages(pool: &SqlitePool, user_id: &str) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed_messages = delete_all_for(&mut *tx, user_id).await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(removed_messages)
}
