//! Command-line interface for the `team-alchemy` binary
//!
//! `serve` runs the HTTP server (see `main.rs`); the other commands open
//! the database, do one piece of work and print the result.

use alchemy_common::api::{issue_token, unix_now};
use alchemy_common::config::{ConfigOverrides, Settings};
use alchemy_common::db::{connect, schema_version};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

use crate::analysis;
use crate::api::buildinfo::BuildInfo;

/// Command-line arguments for team-alchemy
#[derive(Parser, Debug)]
#[command(name = "team-alchemy")]
#[command(about = "Team personality and dynamics assessment service")]
#[command(version)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "TEAM_ALCHEMY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL (sqlite://path.db or sqlite::memory:)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Host to bind
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Log level (debug, info, warning, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Deployment environment (development, staging, production)
    #[arg(long, global = true)]
    pub environment: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create or open the database and its schema
    Init,
    /// Calculate and store results for an assessment
    Assess { assessment_id: i64 },
    /// Analyse a stored team and persist the analysis
    AnalyzeTeam { team_id: i64 },
    /// Recommendations and an action plan for a stored team
    Recommend {
        team_id: i64,
        /// Maximum recommendations (capped by configuration)
        #[arg(long)]
        max: Option<usize>,
    },
    /// Issue a bearer token
    Token {
        #[arg(long)]
        user_id: i64,
    },
    /// Print version and build information
    Version,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            environment: self.environment.clone(),
            api_host: self.host.clone(),
            api_port: self.port,
            database_url: self.database_url.clone(),
            log_level: self.log_level.clone(),
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// One-line version banner
pub fn version_line(app_name: &str) -> String {
    let build = BuildInfo::current(app_name);
    format!(
        "{} version {} ({}, built {} {})",
        build.name, build.version, build.git_hash, build.build_timestamp, build.build_profile
    )
}

async fn open(settings: &Settings) -> Result<SqlitePool> {
    connect(&settings.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database_url))
}

/// Run a non-serve command, returning what should be printed
pub async fn run(command: Command, settings: &Settings) -> Result<String> {
    match command {
        Command::Serve => anyhow::bail!("serve is handled by the binary"),
        Command::Version => Ok(version_line(&settings.app_name)),
        Command::Token { user_id } => Ok(issue_token(
            &settings.secret_key,
            user_id,
            unix_now(),
            settings.access_token_expire_minutes,
        )),
        Command::Init => {
            let pool = open(settings).await?;
            let version = schema_version(&pool).await?;
            pool.close().await;
            Ok(format!(
                "Database initialized at {} (schema version {})",
                settings.database_url, version
            ))
        }
        Command::Assess { assessment_id } => {
            let pool = open(settings).await?;
            let results = analysis::calculate_assessment(&pool, assessment_id).await?;
            pool.close().await;
            Ok(serde_json::to_string_pretty(&results)?)
        }
        Command::AnalyzeTeam { team_id } => {
            let pool = open(settings).await?;
            let run = analysis::analyze_stored_team(&pool, team_id).await?;
            pool.close().await;
            info!(team_id, analysis_id = run.analysis_id, "Team analysis stored");
            Ok(format!(
                "Team {}: {} members, team score {:.1}, diversity {:.1} (analysis {})",
                team_id,
                run.analysis.team_size,
                run.analysis.team_score.team_score(),
                run.analysis.team_dynamics.diversity_score,
                run.analysis_id
            ))
        }
        Command::Recommend { team_id, max } => {
            let max = max
                .unwrap_or(settings.max_recommendations)
                .min(settings.max_recommendations);
            let pool = open(settings).await?;
            let report = analysis::team_recommendations(&pool, team_id, max).await?;
            pool.close().await;
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_common::api::verify_token;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["team-alchemy", "--port", "9000"]);
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.overrides().api_port, Some(9000));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "team-alchemy",
            "recommend",
            "3",
            "--max",
            "4",
            "--database-url",
            "sqlite::memory:",
        ]);
        assert_eq!(
            cli.command(),
            Command::Recommend {
                team_id: 3,
                max: Some(4)
            }
        );
        assert_eq!(cli.overrides().database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[tokio::test]
    async fn test_token_command_issues_valid_token() {
        let settings = Settings::default();
        let token = run(Command::Token { user_id: 7 }, &settings).await.unwrap();
        let claims = verify_token(&settings.secret_key, &token, unix_now()).unwrap();
        assert_eq!(claims.user_id, 7);
    }

    #[tokio::test]
    async fn test_init_reports_schema_version() {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            ..Settings::default()
        };
        let output = run(Command::Init, &settings).await.unwrap();
        assert!(output.contains("schema version 1"));
    }

    #[tokio::test]
    async fn test_init_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("team_alchemy.db");
        let settings = Settings {
            database_url: format!("sqlite://{}", db_path.display()),
            ..Settings::default()
        };

        let output = run(Command::Init, &settings).await.unwrap();
        assert!(output.contains("schema version 1"));
        assert!(db_path.exists());

        // Re-running against the existing file keeps the schema
        let again = run(Command::Init, &settings).await.unwrap();
        assert!(again.contains("schema version 1"));
    }

    #[tokio::test]
    async fn test_assess_missing_assessment_fails() {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            ..Settings::default()
        };
        let err = run(Command::Assess { assessment_id: 99 }, &settings)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Assessment with id 99 not found"));
    }
}
