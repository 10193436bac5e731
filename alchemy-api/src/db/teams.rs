//! Teams and memberships

use alchemy_common::db::{TeamRow, UserProfileRow};
use alchemy_common::time::now_rfc3339;
use alchemy_common::Result;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::users::UserProfile;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeamMember {
    #[serde(rename = "id")]
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub joined_at: String,
}

/// Team with its members, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct TeamWithMembers {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub members: Vec<TeamMember>,
}

impl TeamWithMembers {
    fn new(row: TeamRow, members: Vec<TeamMember>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            members,
        }
    }
}

/// A member together with whatever profile they have
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub user_id: i64,
    pub name: String,
    pub profile: Option<UserProfile>,
}

pub async fn create_team(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<TeamWithMembers> {
    let now = now_rfc3339();
    let row = sqlx::query_as::<_, TeamRow>(
        r#"
        INSERT INTO teams (name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(TeamWithMembers::new(row, Vec::new()))
}

pub async fn team_exists(pool: &SqlitePool, team_id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM teams WHERE id = ?")
        .bind(team_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn get_team(pool: &SqlitePool, team_id: i64) -> Result<Option<TeamWithMembers>> {
    let row = sqlx::query_as::<_, TeamRow>(
        "SELECT id, name, description, created_at, updated_at FROM teams WHERE id = ?",
    )
    .bind(team_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let members = members(pool, row.id).await?;
            Ok(Some(TeamWithMembers::new(row, members)))
        }
        None => Ok(None),
    }
}

pub async fn list_teams(
    pool: &SqlitePool,
    offset: i64,
    limit: i64,
) -> Result<Vec<TeamWithMembers>> {
    let rows = sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM teams
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut teams = Vec::with_capacity(rows.len());
    for row in rows {
        let members = members(pool, row.id).await?;
        teams.push(TeamWithMembers::new(row, members));
    }
    Ok(teams)
}

pub async fn members(pool: &SqlitePool, team_id: i64) -> Result<Vec<TeamMember>> {
    let rows = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT u.id AS user_id, u.email, u.name, m.joined_at
        FROM team_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.team_id = ?
        ORDER BY m.joined_at, u.id
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Add a member; `false` when the user already belongs to the team
pub async fn add_member(pool: &SqlitePool, team_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO team_members (team_id, user_id, joined_at) VALUES (?, ?, ?)",
    )
    .bind(team_id)
    .bind(user_id)
    .bind(now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Remove a member; `false` when the user was not a member
pub async fn remove_member(pool: &SqlitePool, team_id: i64, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND user_id = ?")
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

#[derive(FromRow)]
struct MemberProfileRow {
    user_id: i64,
    name: String,
    profile_id: Option<i64>,
    archetype: Option<String>,
    trait_scores: Option<String>,
    jungian_type: Option<String>,
    profile_created_at: Option<String>,
    profile_updated_at: Option<String>,
}

/// Every member of a team with their profile (if any)
pub async fn member_profiles(pool: &SqlitePool, team_id: i64) -> Result<Vec<MemberProfile>> {
    let rows = sqlx::query_as::<_, MemberProfileRow>(
        r#"
        SELECT u.id AS user_id, u.name,
               p.id AS profile_id, p.archetype, p.trait_scores, p.jungian_type,
               p.created_at AS profile_created_at, p.updated_at AS profile_updated_at
        FROM team_members m
        JOIN users u ON u.id = m.user_id
        LEFT JOIN user_profiles p ON p.user_id = u.id
        WHERE m.team_id = ?
        ORDER BY m.joined_at, u.id
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let profile = match row.profile_id {
                Some(id) => Some(UserProfile::try_from(UserProfileRow {
                    id,
                    user_id: row.user_id,
                    archetype: row.archetype,
                    trait_scores: row.trait_scores.unwrap_or_else(|| "{}".to_string()),
                    jungian_type: row.jungian_type,
                    created_at: row.profile_created_at.unwrap_or_default(),
                    updated_at: row.profile_updated_at.unwrap_or_default(),
                })?),
                None => None,
            };
            Ok(MemberProfile {
                user_id: row.user_id,
                name: row.name,
                profile,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::{create_user, upsert_profile, ProfileUpdate};
    use alchemy_common::db::init_memory_database;

    #[tokio::test]
    async fn test_membership_lifecycle() {
        let pool = init_memory_database().await.unwrap();
        let team = create_team(&pool, "Core", Some("Platform team")).await.unwrap();
        let user = create_user(&pool, "grace@example.com", "Grace").await.unwrap();

        assert!(add_member(&pool, team.id, user.id).await.unwrap());
        assert!(!add_member(&pool, team.id, user.id).await.unwrap());

        let loaded = get_team(&pool, team.id).await.unwrap().unwrap();
        assert_eq!(loaded.members.len(), 1);
        assert_eq!(loaded.members[0].email, "grace@example.com");

        assert!(remove_member(&pool, team.id, user.id).await.unwrap());
        assert!(!remove_member(&pool, team.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_member_profiles_include_missing() {
        let pool = init_memory_database().await.unwrap();
        let team = create_team(&pool, "Core", None).await.unwrap();
        let a = create_user(&pool, "a@example.com", "A").await.unwrap();
        let b = create_user(&pool, "b@example.com", "B").await.unwrap();
        add_member(&pool, team.id, a.id).await.unwrap();
        add_member(&pool, team.id, b.id).await.unwrap();
        upsert_profile(
            &pool,
            a.id,
            ProfileUpdate {
                jungian_type: Some("INTJ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let profiles = member_profiles(&pool, team.id).await.unwrap();
        assert_eq!(profiles.len(), 2);
        let with_profile = profiles.iter().find(|m| m.user_id == a.id).unwrap();
        assert_eq!(
            with_profile.profile.as_ref().unwrap().jungian_type.as_deref(),
            Some("INTJ")
        );
        assert!(profiles.iter().find(|m| m.user_id == b.id).unwrap().profile.is_none());
    }
}
