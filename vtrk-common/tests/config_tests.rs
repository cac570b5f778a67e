//! Unit tests for configuration and root folder resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests
//! that manipulate VTRK_ROOT_FOLDER or VTRK_DISCOGS_TOKEN are marked with
//! #[serial] so they run sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use vtrk_common::config::{
    default_root_folder, resolve_discogs_token, resolve_root_folder, RootFolderInitializer,
    TomlConfig, DISCOGS_TOKEN_ENV, ROOT_FOLDER_ENV,
};

#[test]
fn default_root_folder_is_nonempty() {
    let default = default_root_folder();
    assert!(!default.as_os_str().is_empty());

    let path_str = default.to_string_lossy();
    assert!(path_str.contains("vtrk"), "default should live under a vtrk directory");
}

#[test]
#[serial]
fn resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(resolved, default_root_folder());
}

#[test]
#[serial]
fn resolver_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/vtrk-test-env");

    let resolved = resolve_root_folder(Some("/tmp/vtrk-test-cli"), &TomlConfig::default());
    assert_eq!(resolved, PathBuf::from("/tmp/vtrk-test-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/vtrk-test-env");

    let toml_config = TomlConfig {
        root_folder: Some("/tmp/vtrk-test-toml".to_string()),
        ..TomlConfig::default()
    };
    let resolved = resolve_root_folder(None, &toml_config);
    assert_eq!(resolved, PathBuf::from("/tmp/vtrk-test-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn resolver_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml_config = TomlConfig {
        root_folder: Some("/tmp/vtrk-test-toml".to_string()),
        ..TomlConfig::default()
    };
    let resolved = resolve_root_folder(None, &toml_config);
    assert_eq!(resolved, PathBuf::from("/tmp/vtrk-test-toml"));
}

#[test]
fn initializer_creates_directory_and_database_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("nested").join("vtrk-root");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().expect("create root");

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("vinyltrack.db"));
}

#[test]
#[serial]
fn discogs_token_env_beats_toml() {
    env::set_var(DISCOGS_TOKEN_ENV, "env-token");

    let toml_config = TomlConfig {
        discogs_token: Some("toml-token".to_string()),
        ..TomlConfig::default()
    };
    assert_eq!(resolve_discogs_token(&toml_config), Some("env-token".to_string()));

    env::remove_var(DISCOGS_TOKEN_ENV);
}

#[test]
#[serial]
fn discogs_token_absent_when_unconfigured() {
    env::remove_var(DISCOGS_TOKEN_ENV);

    assert_eq!(resolve_discogs_token(&TomlConfig::default()), None);
}

#[test]
#[serial]
fn discogs_token_blank_env_is_ignored() {
    env::set_var(DISCOGS_TOKEN_ENV, "   ");

    let toml_config = TomlConfig {
        discogs_token: Some("toml-token".to_string()),
        ..TomlConfig::default()
    };
    assert_eq!(resolve_discogs_token(&toml_config), Some("toml-token".to_string()));

    env::remove_var(DISCOGS_TOKEN_ENV);
}

#[test]
fn toml_config_parses_all_sections() {
    let content = r#"
        root_folder = "/srv/vinyl"
        discogs_token = "abc123"

        [logging]
        level = "debug"
    "#;

    let config: TomlConfig = toml::from_str(content).expect("parse");
    assert_eq!(config.root_folder.as_deref(), Some("/srv/vinyl"));
    assert_eq!(config.discogs_token.as_deref(), Some("abc123"));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_none());
}

#[test]
fn toml_config_defaults_apply_to_empty_file() {
    let config: TomlConfig = toml::from_str("").expect("parse");
    assert!(config.root_folder.is_none());
    assert!(config.discogs_token.is_none());
    assert_eq!(config.logging.level, "info");
}
