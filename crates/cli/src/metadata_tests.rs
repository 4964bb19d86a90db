#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

const SAMPLE: &str = r#"[
  {
    "id": 607454,
    "guid": "uBlock0@raymondhill.net",
    "slug": "ublock-origin",
    "average_daily_users": 6500000,
    "path": "ublock-origin"
  },
  {
    "id": 12345,
    "guid": "{11111111-2222-3333-4444-555555555555}",
    "average_daily_users": 42
  }
]"#;

fn sample() -> AmoMetadata {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amo.json");
    std::fs::write(&path, SAMPLE).unwrap();
    AmoMetadata::load(&path).unwrap()
}

#[test]
fn lookup_by_id_guid_and_slug_hit_the_same_record() {
    let metadata = sample();
    let by_id = metadata.lookup("607454").unwrap();
    let by_guid = metadata.lookup("uBlock0@raymondhill.net").unwrap();
    let by_slug = metadata.lookup("ublock-origin").unwrap();
    assert!(Arc::ptr_eq(&by_id, &by_guid));
    assert!(Arc::ptr_eq(&by_id, &by_slug));
    assert_eq!(by_id.average_daily_users, 6_500_000);
}

#[test]
fn slugless_record_resolves_by_guid() {
    let metadata = sample();
    let record = metadata
        .lookup("{11111111-2222-3333-4444-555555555555}")
        .unwrap();
    assert_eq!(record.id, 12345);
    assert!(record.path.is_none());
}

#[test]
fn unknown_key_misses() {
    assert!(sample().lookup("no-such-addon").is_none());
}

#[test]
fn missing_file_error_carries_remediation() {
    let err = AmoMetadata::load(Path::new("/nonexistent/amo.json")).unwrap_err();
    let text = err.to_string();
    assert!(matches!(err, Error::Metadata { .. }));
    assert!(text.contains("curl"));
    assert!(text.contains(METADATA_ENV));
}

#[test]
fn malformed_dump_is_a_metadata_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amo.json");
    std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
    assert!(matches!(
        AmoMetadata::load(&path).unwrap_err(),
        Error::Metadata { .. }
    ));
}
