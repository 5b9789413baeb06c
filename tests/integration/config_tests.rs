use clap::Parser;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use promptdupe::cli::{Cli, Commands};
use promptdupe::config::{unknown_keys, Config, ConfigError};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all PROMPTDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("PROMPTDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.max_items, 1000);
    assert!(!config.allow_large_datasets);
    assert_eq!(config.timeout_ms, 10_000);
    assert_eq!(config.yield_interval_ms, 50);
    assert_eq!(config.title_threshold, 0.8);
    assert_eq!(config.content_threshold, 0.9);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(temp_dir.path().join("nonexistent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_explicit_config_missing_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("typo.toml");

    match Config::try_load(Some(&missing)) {
        Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    let message = ConfigError::NotFound(missing.clone()).to_string();
    assert!(message.contains("typo.toml"));
    assert!(message.ends_with("not found"));

    // Falls back to defaults, still honouring the environment
    std::env::set_var("PROMPTDUPE_MAX_ITEMS", "7");
    let config = Config::load(Some(&missing));
    assert_eq!(config.max_items, 7);
    assert_eq!(config.timeout_ms, 10_000);

    clear_env();
}

#[test]
fn test_explicit_config_present_is_loaded() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "yield_interval_ms = 5\n").unwrap();

    let config = Config::try_load(Some(&config_path)).unwrap();
    assert_eq!(config.yield_interval_ms, 5);
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        r#"
max_items = 5000
allow_large_datasets = true
timeout_ms = 30000
yield_interval_ms = 10
title_threshold = 0.75
content_threshold = 0.95
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path);

    assert_eq!(config.max_items, 5000);
    assert!(config.allow_large_datasets);
    assert_eq!(config.timeout_ms, 30_000);
    assert_eq!(config.yield_interval_ms, 10);
    assert_eq!(config.title_threshold, 0.75);
    assert_eq!(config.content_threshold, 0.95);
}

#[test]
fn test_config_load_from_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("PROMPTDUPE_MAX_ITEMS", "42");
    std::env::set_var("PROMPTDUPE_CONTENT_THRESHOLD", "0.85");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("PROMPTDUPE_"))
        .extract()
        .unwrap();

    assert_eq!(config.max_items, 42);
    assert_eq!(config.content_threshold, 0.85);

    clear_env();
}

#[test]
fn test_config_hierarchy_defaults_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // 1. Config file overrides defaults
    fs::write(&config_path, "max_items = 200\ntimeout_ms = 500\n").unwrap();

    // 2. Environment variables override config file
    std::env::set_var("PROMPTDUPE_TIMEOUT_MS", "750");

    let mut config = Config::load_from_path(&config_path);
    assert_eq!(config.max_items, 200);
    assert_eq!(config.timeout_ms, 750);

    // 3. CLI flags override everything, unset flags leave values alone
    let cli = Cli::try_parse_from([
        "promptdupe",
        "scan",
        "prompts.json",
        "--max-items",
        "300",
    ])
    .unwrap();
    if let Commands::Scan(args) = &cli.command {
        config.merge_scan_args(args);
    }
    assert_eq!(config.max_items, 300);
    assert_eq!(config.timeout_ms, 750);

    let options = config.to_scan_options();
    assert_eq!(options.max_items, 300);
    assert_eq!(options.timeout_ms, 750);

    clear_env();
}

#[test]
fn test_cli_allow_large_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "allow_large_datasets = false").unwrap();

    let mut config = Config::load_from_path(&config_path);
    let cli =
        Cli::try_parse_from(["promptdupe", "scan", "p.csv", "--allow-large"]).unwrap();
    if let Commands::Scan(args) = &cli.command {
        config.merge_scan_args(args);
    }
    assert!(config.allow_large_datasets);
}

#[test]
fn test_config_unknown_key_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // 'timout_ms' is a typo for 'timeout_ms'
    fs::write(&config_path, "timout_ms = 5\n").unwrap();

    let config = Config::load_from_path(&config_path);
    assert_eq!(config.timeout_ms, 10_000);

    let unknown = unknown_keys("timout_ms = 5\n").unwrap();
    assert_eq!(unknown[0].suggestion, Some("timeout_ms"));
}

#[test]
fn test_config_invalid_type_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "max_items = \"lots\"\n").unwrap();

    assert!(matches!(
        Config::try_load_from_path(&config_path),
        Err(ConfigError::Extract(_))
    ));
    assert_eq!(Config::load_from_path(&config_path), Config::default());
}

#[test]
fn test_config_invalid_toml_errors() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "invalid = toml").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_config_save_toml() {
    let mut config = Config::default();
    config.max_items = 64;
    config.content_threshold = 0.92;

    let content = toml::to_string_pretty(&config).unwrap();
    assert!(content.contains("max_items = 64"));
    assert!(content.contains("content_threshold = 0.92"));

    let parsed: Config = toml::from_str(&content).unwrap();
    assert_eq!(parsed, config);
}
