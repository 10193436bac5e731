//! Users and their psychological profiles

use alchemy_common::db::{UserProfileRow, UserRow};
use alchemy_common::time::now_rfc3339;
use alchemy_common::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::decode_json;

/// Profile as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub archetype: Option<String>,
    pub trait_scores: Map<String, Value>,
    pub jungian_type: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = alchemy_common::Error;

    fn try_from(row: UserProfileRow) -> Result<Self> {
        Ok(Self {
            user_id: row.user_id,
            archetype: row.archetype,
            trait_scores: decode_json("user_profiles.trait_scores", &row.trait_scores)?,
            jungian_type: row.jungian_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields to change on a profile; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub archetype: Option<String>,
    pub trait_scores: Option<Map<String, Value>>,
    pub jungian_type: Option<String>,
}

pub async fn create_user(pool: &SqlitePool, email: &str, name: &str) -> Result<UserRow> {
    let now = now_rfc3339();
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, email, name, created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, name, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_users(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, name, created_at, updated_at FROM users ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfileRow>(
        r#"
        SELECT id, user_id, archetype, trait_scores, jungian_type, created_at, updated_at
        FROM user_profiles WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(UserProfile::try_from).transpose()
}

/// Create or merge a profile
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: i64,
    update: ProfileUpdate,
) -> Result<UserProfile> {
    let trait_scores = update
        .trait_scores
        .map(|scores| serde_json::to_string(&scores))
        .transpose()?;
    let now = now_rfc3339();

    let row = sqlx::query_as::<_, UserProfileRow>(
        r#"
        INSERT INTO user_profiles
            (user_id, archetype, trait_scores, jungian_type, created_at, updated_at)
        VALUES (?, ?, COALESCE(?, '{}'), ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            archetype = COALESCE(excluded.archetype, user_profiles.archetype),
            trait_scores = CASE WHEN ? IS NULL
                THEN user_profiles.trait_scores
                ELSE excluded.trait_scores
            END,
            jungian_type = COALESCE(excluded.jungian_type, user_profiles.jungian_type),
            updated_at = excluded.updated_at
        RETURNING id, user_id, archetype, trait_scores, jungian_type, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&update.archetype)
    .bind(&trait_scores)
    .bind(&update.jungian_type)
    .bind(&now)
    .bind(&now)
    .bind(&trait_scores)
    .fetch_one(pool)
    .await?;

    UserProfile::try_from(row)
}
