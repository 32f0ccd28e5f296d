mod common;

use std::fs;
use std::path::PathBuf;

use account_master::config::{Config, ConfigError};
use common::setup_test_env;

#[test]
fn missing_file_yields_defaults() {
    let (_, manager) = setup_test_env();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.page_size().get(), 15);
    assert_eq!(config.currency_settings().symbol(), "₹");
}

#[test]
fn saved_settings_reload() {
    let (_, manager) = setup_test_env();
    let mut config = Config::default();
    config.set_value("currency", "usd").unwrap();
    config.set_value("items_per_page", "20").unwrap();
    config.set_value("export_dir", "/tmp/reports").unwrap();
    config.set_value("ui_color_enabled", "off").unwrap();
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.page_size().get(), 20);
    assert_eq!(loaded.resolve_export_dir(), PathBuf::from("/tmp/reports"));
    assert!(!loaded.ui_color_enabled);
}

#[test]
fn invalid_values_leave_config_untouched() {
    let mut config = Config::default();
    assert!(matches!(
        config.set_value("items_per_page", "0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(config.set_value("backup_retention", "many").is_err());
    assert!(config.set_value("theme", "dark").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn page_size_has_an_upper_bound() {
    let (_, manager) = setup_test_env();
    let mut config = Config::default();
    assert!(matches!(
        config.set_value("items_per_page", "9223372036854775807"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(config.set_value("items_per_page", "501").is_err());
    assert_eq!(config, Config::default());

    config.items_per_page = 100_000;
    assert!(manager.save(&config).is_err());
    assert!(!manager.path().exists());
}

#[test]
fn partial_file_fills_in_defaults() {
    let (_, manager) = setup_test_env();
    fs::write(manager.path(), r#"{ "currency": "EUR" }"#).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config.currency, "EUR");
    assert_eq!(config.locale, "en-IN");
    assert_eq!(config.backup_retention, 5);
}

#[test]
fn malformed_file_reports_an_error() {
    let (_, manager) = setup_test_env();
    fs::write(manager.path(), "not json").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}
