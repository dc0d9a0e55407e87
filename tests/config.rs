use sqsdeck::config::Config;
use sqsdeck::constants::REFRESH_INTERVAL_ENV;
use sqsdeck::ui::{Connection, Settings};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.ui.refresh_interval(), Duration::from_secs(5));
    assert_eq!(config.ui.message_fetch_count, 10);
    assert_eq!(config.aws.region, "us-east-1");
    assert_eq!(config.aws.profile, "default");
    assert_eq!(config.aws.endpoint_url, None);
    assert_eq!(config.aws.request_timeout(), Duration::from_secs(10));
    assert!(config.audit.enabled);
    assert!(!config.logging.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    config.ui.refresh_interval_seconds = 0;
    assert!(config.validate().is_err());
    config.ui.refresh_interval_seconds = 5;

    config.ui.message_fetch_count = 11;
    assert!(config.validate().is_err());
    config.ui.message_fetch_count = 10;

    config.aws.endpoint_url = Some("localhost:4566".to_string());
    assert!(config.validate().is_err());
    config.aws.endpoint_url = Some("http://localhost:4566".to_string());
    assert!(config.validate().is_ok());

    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_partial_config_deserialization() {
    let partial_toml = r#"
[ui]
refresh_interval_seconds = 15

[aws]
endpoint_url = "http://localhost:4566"
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();
    assert_eq!(config.ui.refresh_interval_seconds, 15);
    assert_eq!(config.aws.endpoint_url.as_deref(), Some("http://localhost:4566"));

    // Unspecified values keep their defaults
    assert_eq!(config.ui.toast_seconds, 3);
    assert_eq!(config.aws.region, "us-east-1");
    assert!(config.audit.enabled);
}

#[test]
fn test_refresh_interval_override() {
    let mut config = Config::default();
    config.apply_overrides(env(&[(REFRESH_INTERVAL_ENV, "30")]));
    assert_eq!(config.ui.refresh_interval(), Duration::from_secs(30));
}

#[test]
fn test_invalid_refresh_interval_is_ignored() {
    for raw in ["0", "-3", "soon", ""] {
        let mut config = Config::default();
        config.apply_overrides(env(&[(REFRESH_INTERVAL_ENV, raw)]));
        assert_eq!(config.ui.refresh_interval_seconds, 5, "override {raw:?}");
    }
}

#[test]
fn test_region_and_endpoint_overrides() {
    let mut config = Config::default();
    config.apply_overrides(env(&[
        ("AWS_DEFAULT_REGION", "eu-west-1"),
        ("AWS_ENDPOINT_URL", "http://localhost:9324"),
    ]));
    assert_eq!(config.aws.region, "eu-west-1");
    assert_eq!(config.aws.endpoint_url.as_deref(), Some("http://localhost:9324"));

    // AWS_REGION wins over AWS_DEFAULT_REGION
    config.apply_overrides(env(&[("AWS_REGION", "ap-south-1"), ("AWS_DEFAULT_REGION", "eu-west-1")]));
    assert_eq!(config.aws.region, "ap-south-1");
}

#[test]
fn test_profile_override() {
    let mut config = Config::default();
    config.apply_overrides(env(&[("AWS_PROFILE", "staging")]));
    assert_eq!(config.aws.profile, "staging");

    config.apply_overrides(env(&[("AWS_PROFILE", "")]));
    assert_eq!(config.aws.profile, "staging");

    let connection = Connection::from(&config.aws);
    assert_eq!(connection.profile, "staging");
    assert_eq!(connection.region, "us-east-1");
}

#[test]
fn test_generate_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("sqsdeck.toml");

    Config::generate_default_config(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# sqsdeck Configuration File"));
    assert!(content.contains("refresh_interval_seconds = 5"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_load_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sqsdeck.toml");
    std::fs::write(&path, "[aws]\nrequest_timeout_seconds = 0\n").unwrap();
    assert!(Config::load_from_file(&path).is_err());

    std::fs::write(&path, "[ui\n").unwrap();
    assert!(Config::load_from_file(&path).is_err());

    assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_settings_follow_ui_config() {
    let mut config = Config::default();
    config.ui.refresh_interval_seconds = 12;
    config.ui.toast_seconds = 1;
    config.ui.message_fetch_count = 4;

    let settings = Settings::from(&config.ui);
    assert_eq!(settings.refresh_interval, Duration::from_secs(12));
    assert_eq!(settings.toast_duration, Duration::from_secs(1));
    assert_eq!(settings.message_fetch_count, 4);
}
