//! Configuration resolution tests
//!
//! Uses serial_test: tests touching CORPUS_NORM_CONFIG, CORPUS_NORM_DATABASE
//! or XDG_CONFIG_HOME are marked #[serial] so they never race.

use corpus_common::config::{CONFIG_ENV_VAR, DATABASE_ENV_VAR};
use corpus_common::{ConfigSource, Error, TableNames, TomlConfig};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

fn clear_env() {
    env::remove_var(CONFIG_ENV_VAR);
    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
fn test_full_config_parses() {
    let config = TomlConfig::from_toml_str(
        r#"
        database_path = "/srv/corpora/corpora.db"

        [tables]
        csj_results = "Results"
        csj_dataset = "Dataset"
        csj_dialogues = "Talks"
        cwpc_original = "Export"
        cwpc_reformatted = "Utterances"
        cwpc_dataset = "Demographics"
        occupations = "Occupations"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/srv/corpora/corpora.db")));
    assert_eq!(config.tables.csj_dialogues, "Talks");
    assert_eq!(config.tables.cwpc_reformatted, "Utterances");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert!(config.database_path.is_none());
    assert_eq!(config.tables, TableNames::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_config_is_rejected() {
    let result = TomlConfig::from_toml_str("[tables\noccupations = ");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = TomlConfig::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
#[serial]
fn test_cli_path_wins_over_env() {
    clear_env();
    let cli_dir = TempDir::new().unwrap();
    let env_dir = TempDir::new().unwrap();
    let cli_path = write_config(&cli_dir, "[logging]\nlevel = \"trace\"\n");
    let env_path = write_config(&env_dir, "[logging]\nlevel = \"warn\"\n");

    env::set_var(CONFIG_ENV_VAR, &env_path);
    let config = TomlConfig::resolve(Some(&cli_path)).unwrap();
    clear_env();

    assert_eq!(config.logging.level, "trace");
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[tables]\ncwpc_dataset = \"Demographics\"\n");

    env::set_var(CONFIG_ENV_VAR, &path);
    let config = TomlConfig::resolve(None).unwrap();
    clear_env();

    assert_eq!(config.tables.cwpc_dataset, "Demographics");
}

#[test]
#[serial]
fn test_explicit_missing_config_falls_back_to_defaults() {
    clear_env();
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/corpus-norm/config.toml");
    let result = TomlConfig::resolve(None);
    clear_env();

    assert_eq!(result.unwrap().tables, TableNames::default());
}

#[test]
#[serial]
fn test_malformed_config_file_is_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "database_path = [");

    assert!(matches!(TomlConfig::resolve(Some(&path)), Err(Error::Config(_))));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_no_config_anywhere_falls_back_to_defaults() {
    clear_env();
    let empty_home = TempDir::new().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", empty_home.path());

    let result = TomlConfig::resolve(None);

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    let config = result.unwrap();
    assert_eq!(config.tables, TableNames::default());
}

#[test]
#[serial]
fn test_database_path_priority() {
    clear_env();
    let config = TomlConfig::from_toml_str("database_path = \"/from/toml.db\"").unwrap();

    // CLI beats everything
    env::set_var(DATABASE_ENV_VAR, "/from/env.db");
    assert_eq!(
        config.database_path(Some(Path::new("/from/cli.db"))),
        PathBuf::from("/from/cli.db")
    );

    // Env beats TOML
    assert_eq!(config.database_path(None), PathBuf::from("/from/env.db"));

    // TOML beats platform default
    env::remove_var(DATABASE_ENV_VAR);
    assert_eq!(config.database_path(None), PathBuf::from("/from/toml.db"));
}

#[test]
#[serial]
fn test_database_path_platform_default() {
    clear_env();
    let path = TomlConfig::default().database_path(None);

    assert!(path.ends_with("corpora.db"));
    assert!(path.to_string_lossy().contains("corpus"));
}

#[test]
#[serial]
fn test_locate_reports_missing_explicit_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent.toml");

    let source = ConfigSource::locate(Some(&absent));
    assert_eq!(source, ConfigSource::Missing(absent));

    // Locating does not load; loading a missing source yields defaults
    let config = TomlConfig::from_source(&source).unwrap();
    assert_eq!(config.tables, TableNames::default());
}

#[test]
#[serial]
fn test_locate_finds_env_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"warn\"\n");

    env::set_var(CONFIG_ENV_VAR, &path);
    let source = ConfigSource::locate(None);
    clear_env();

    assert_eq!(source, ConfigSource::File(path));
    assert_eq!(TomlConfig::from_source(&source).unwrap().logging.level, "warn");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_locate_without_any_file_is_defaults() {
    clear_env();
    let empty_home = TempDir::new().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", empty_home.path());

    let source = ConfigSource::locate(None);

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(source, ConfigSource::Defaults);
}
