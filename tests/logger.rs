use sqsdeck::config::LoggingConfig;
use sqsdeck::logger::Logger;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_logging_disabled() {
    let logger = Logger::from_config(&LoggingConfig::default()).unwrap();
    assert!(!logger.is_enabled());
    assert_eq!(logger.file(), None);
}

// The global logger can only be installed once per process, so every
// assertion about an installed logger lives in this one test.
#[test]
fn test_logging_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("sqsdeck.log");
    let config = LoggingConfig {
        enabled: true,
        level: "debug".to_string(),
        file: Some(path.clone()),
    };

    let logger = Logger::from_config(&config).unwrap();
    assert!(logger.is_enabled());
    assert_eq!(logger.file(), Some(&path));

    log::debug!("listing queues");
    log::trace!("below the configured level");
    log::logger().flush();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Logger initialized with level: debug"));
    assert!(content.contains("DEBUG"));
    assert!(content.contains("listing queues"));
    assert!(!content.contains("below the configured level"));
}

#[test]
fn test_level_filter_parsing() {
    let level = |name: &str| {
        LoggingConfig {
            level: name.to_string(),
            ..Default::default()
        }
        .level_filter()
    };
    assert_eq!(level("trace"), log::LevelFilter::Trace);
    assert_eq!(level("DEBUG"), log::LevelFilter::Debug);
    assert_eq!(level("warn"), log::LevelFilter::Warn);
    assert_eq!(level("error"), log::LevelFilter::Error);
    assert_eq!(level("info"), log::LevelFilter::Info);
}

#[test]
fn test_default_log_file_path() {
    if let Ok(path) = Logger::get_log_file_path() {
        assert!(path.ends_with(PathBuf::from("sqsdeck").join("sqsdeck.log")));
    }
}
