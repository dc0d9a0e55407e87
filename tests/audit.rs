use sqsdeck::audit::{current_user, AuditEntry, AuditLog};
use std::thread;
use tempfile::TempDir;

fn read_entries(log: &AuditLog) -> Vec<AuditEntry> {
    let path = log.path().expect("enabled audit log");
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_append_creates_directory_and_file() {
    let dir = TempDir::new().unwrap();
    let log = AuditLog::new(dir.path().join(".sqsdeck").join("audit.log"));

    log.append_deletion("orders", "m-1").unwrap();
    log.append_deletion("orders", "m-2").unwrap();

    let entries = read_entries(&log);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].queue, "orders");
    assert_eq!(entries[0].message_id, "m-1");
    assert_eq!(entries[1].message_id, "m-2");
    assert_eq!(entries[0].user, current_user());
    assert!(chrono::DateTime::parse_from_rfc3339(&entries[0].timestamp).is_ok());
}

#[test]
fn test_entries_use_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let log = AuditLog::new(dir.path().join("audit.log"));
    log.append_deletion("orders", "m-1").unwrap();

    let line = std::fs::read_to_string(log.path().unwrap()).unwrap();
    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(value["queue"], "orders");
    assert_eq!(value["messageId"], "m-1");
    assert!(value["timestamp"].is_string());
    assert!(value["user"].is_string());
}

#[test]
fn test_existing_entries_are_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log");
    AuditLog::new(&path).append_deletion("a", "1").unwrap();
    AuditLog::new(&path).append_deletion("b", "2").unwrap();

    let entries = read_entries(&AuditLog::new(&path));
    let ids: Vec<&str> = entries.iter().map(|e| e.message_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let dir = TempDir::new().unwrap();
    let log = AuditLog::new(dir.path().join("audit.log"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let log = log.clone();
            thread::spawn(move || {
                for j in 0..10 {
                    log.append_deletion("orders", &format!("m-{i}-{j}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(read_entries(&log).len(), 80);
}

#[test]
fn test_disabled_log_discards() {
    let log = AuditLog::disabled();
    assert!(log.path().is_none());
    assert!(log.append_deletion("orders", "m-1").is_ok());
}

#[test]
fn test_unwritable_location_is_an_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let log = AuditLog::new(blocker.join("audit.log"));
    assert!(log.append_deletion("orders", "m-1").is_err());
}
