//! Database initialization
//!
//! Opens (creating when needed) the SQLite database and makes sure every
//! table exists. Safe to call on every start.

use crate::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;
use tracing::info;

/// Schema version written to `schema_version` by this build
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Where a `DATABASE_URL` points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Private in-memory database (single connection)
    Memory,
    /// Database file on disk
    File(PathBuf),
}

/// Interpret a database URL
///
/// Accepts `sqlite://relative.db`, `sqlite:///absolute/path.db`,
/// `sqlite:path.db`, `sqlite::memory:` and a bare file path.
///
/// # Examples
/// ```
/// use alchemy_common::db::{parse_database_url, DatabaseLocation};
/// use std::path::PathBuf;
///
/// assert_eq!(parse_database_url("sqlite::memory:").unwrap(), DatabaseLocation::Memory);
/// assert_eq!(
///     parse_database_url("sqlite://team_alchemy.db").unwrap(),
///     DatabaseLocation::File(PathBuf::from("team_alchemy.db"))
/// );
/// assert!(parse_database_url("postgres://db/app").is_err());
/// ```
pub fn parse_database_url(url: &str) -> Result<DatabaseLocation> {
    let url = url.trim();
    let rest = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if url.contains("://") {
        return Err(Error::Config(format!(
            "Unsupported database backend in '{}' (only sqlite is supported)",
            url
        )));
    } else {
        url
    };

    // Query parameters (e.g. ?mode=rwc) are applied by init_database
    let path = rest.split('?').next().unwrap_or_default();

    match path {
        "" => Err(Error::Config(format!("Database URL '{}' has no path", url))),
        ":memory:" => Ok(DatabaseLocation::Memory),
        // sqlite:///./x.db keeps the SQLAlchemy style relative form working
        p if p.starts_with("/./") => Ok(DatabaseLocation::File(PathBuf::from(&p[1..]))),
        p => Ok(DatabaseLocation::File(PathBuf::from(p))),
    }
}

/// Open the database named by a URL and create the schema
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    match parse_database_url(database_url)? {
        DatabaseLocation::Memory => init_memory_database().await,
        DatabaseLocation::File(path) => init_database(&path).await,
    }
}

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &std::path::Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets readers proceed while a request writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database used by tests and `sqlite::memory:` URLs
///
/// Each SQLite memory connection is its own database, so the pool holds
/// exactly one connection that never expires.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// Create every table (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    create_schema_version_table(pool).await?;
    create_users_table(pool).await?;
    create_user_profiles_table(pool).await?;
    create_teams_table(pool).await?;
    create_team_members_table(pool).await?;
    create_team_analyses_table(pool).await?;
    create_assessments_table(pool).await?;
    create_questions_table(pool).await?;
    create_responses_table(pool).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Highest schema version recorded in the database
pub async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            archetype TEXT,
            trait_scores TEXT NOT NULL DEFAULT '{}',
            jungian_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_teams_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 255),
            description TEXT CHECK (description IS NULL OR length(description) <= 1000),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_team_members_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            joined_at TEXT NOT NULL,
            PRIMARY KEY (team_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_team_analyses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_analyses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            analysis_type TEXT NOT NULL,
            results TEXT NOT NULL,
            score REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_team_analyses_team ON team_analyses(team_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_assessments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            version TEXT NOT NULL DEFAULT '1.0.0',
            status TEXT NOT NULL DEFAULT 'draft'
                CHECK (status IN ('draft', 'in_progress', 'completed', 'analyzed')),
            results TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_questions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assessment_id INTEGER NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            question_type TEXT NOT NULL,
            options TEXT,
            category TEXT NOT NULL,
            weight REAL NOT NULL DEFAULT 1.0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_assessment ON questions(assessment_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assessment_id INTEGER NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            answer TEXT NOT NULL,
            confidence REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_responses_assessment ON responses(assessment_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative_sqlalchemy_form() {
        assert_eq!(
            parse_database_url("sqlite:///./team_alchemy.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("./team_alchemy.db"))
        );
    }

    #[test]
    fn test_parse_absolute_path() {
        assert_eq!(
            parse_database_url("sqlite:///var/lib/alchemy.db?mode=rwc").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/alchemy.db"))
        );
    }

    #[test]
    fn test_parse_rejects_empty_path() {
        assert!(parse_database_url("sqlite://").is_err());
    }

    #[tokio::test]
    async fn test_memory_database_has_schema() {
        let pool = init_memory_database().await.unwrap();
        assert_eq!(schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        for expected in [
            "assessments",
            "questions",
            "responses",
            "team_analyses",
            "team_members",
            "teams",
            "user_profiles",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
