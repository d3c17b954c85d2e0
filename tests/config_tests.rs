//! Configuration file loading.

use std::fs;

use bigdeck::error::{ConfigError, Error};
use bigdeck::infrastructure::config::settings::Config;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn loads_pricing_section_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[pricing]
positive_ttl_ms = 3600000
fallback_multiplier = 1.25
max_fallback_prints = 4

[catalog]
base_url = "https://api.scryfall.com"
retry_max_attempts = 3
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.pricing.positive_ttl_ms, 3_600_000);
    assert_eq!(config.pricing.multiplier(), Some(dec!(1.25)));
    assert_eq!(config.pricing.max_fallback_prints, 4);
    assert_eq!(config.catalog.retry_max_attempts, 3);
    assert_eq!(config.pricing.negative_ttl_ms, 300_000, "unset fields keep defaults");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.pricing.max_cache_entries, 10_000);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn missing_file_is_an_error_for_strict_load() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn rejects_negative_ttl_longer_than_positive() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[pricing]\npositive_ttl_ms = 1000\nnegative_ttl_ms = 5000\n",
    );

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "negative_ttl_ms",
            ..
        })) => {}
        Err(err) => panic!("Expected negative_ttl_ms error, got {err}"),
        Ok(_) => panic!("Expected config to be rejected"),
    }
}

#[test]
fn rejects_unknown_log_format() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nformat = \"xml\"\n");
    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}
