//! Integration tests for configuration loading from the real environment
//!
//! These mutate process environment variables, so every test is serialized.

use alchemy_common::config::{ConfigOverrides, Environment, Settings};
use serial_test::serial;
use std::io::Write;

const KEYS: &[&str] = &[
    "ENVIRONMENT",
    "DATABASE_URL",
    "SECRET_KEY",
    "CORS_ORIGINS",
    "REDIS_URL",
    "API_PORT",
    "PORT",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "REQUIRE_AUTH",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_environment_variables_are_read() {
    clear_env();
    std::env::set_var("DATABASE_URL", "sqlite://env.db");
    std::env::set_var("REDIS_URL", "redis://cache:6379/1");
    std::env::set_var("ENVIRONMENT", "staging");
    std::env::set_var("CORS_ORIGINS", "http://localhost:3000");

    let file = write_config("");
    let settings = Settings::load(ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(settings.database_url, "sqlite://env.db");
    assert_eq!(settings.redis_url, "redis://cache:6379/1");
    assert_eq!(settings.environment, Environment::Staging);
    assert_eq!(settings.cors_origins, vec!["http://localhost:3000"]);
    clear_env();
}

#[test]
#[serial]
fn test_toml_file_used_when_env_absent() {
    clear_env();
    let file = write_config(
        r#"
        environment = "test"
        database_url = "sqlite://toml.db"

        [api]
        port = 8123
        cors_origins = ["http://app.test"]

        [security]
        require_auth = true

        [features]
        max_recommendations = 3
        "#,
    );

    let settings = Settings::load(ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(settings.environment, Environment::Test);
    assert_eq!(settings.database_url, "sqlite://toml.db");
    assert_eq!(settings.api_port, 8123);
    assert_eq!(settings.cors_origins, vec!["http://app.test"]);
    assert!(settings.require_auth);
    assert_eq!(settings.max_recommendations, 3);
}

#[test]
#[serial]
fn test_production_without_secret_fails_to_load() {
    clear_env();
    std::env::set_var("ENVIRONMENT", "production");

    let file = write_config("");
    let result = Settings::load(ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    });
    assert!(result.is_err());

    std::env::set_var("SECRET_KEY", "a-real-secret");
    let result = Settings::load(ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    });
    assert!(result.is_ok());
    clear_env();
}

#[test]
#[serial]
fn test_missing_explicit_config_file_is_error() {
    clear_env();
    let result = Settings::load(ConfigOverrides {
        config_path: Some("/nonexistent/team-alchemy.toml".into()),
        ..Default::default()
    });
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_toml_is_error() {
    clear_env();
    let file = write_config("[api\nport = ");
    let result = Settings::load(ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    });
    assert!(result.is_err());
}
