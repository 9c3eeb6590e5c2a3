use std::fs;

use screen_rotation::document::{ScreenSpec, load_schedule_document, normalize};
use screen_rotation::{ScheduleError, ScreenCatalog, load_scheduler};
use tempfile::tempdir;

#[test]
fn json_documents_keep_key_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("screens_config.json");
    fs::write(
        &path,
        r#"{
  "screens": {
    "travel": 2,
    "date": {"frequency": 1, "alt": {"screen": ["inside", "bears stand1"], "frequency": 3}},
    "NFL Scoreboard": "4"
  }
}
"#,
    )
    .unwrap();

    let scheduler = load_scheduler(&path, &ScreenCatalog::builtin()).unwrap();
    let order: Vec<&str> = scheduler.entries().iter().map(|e| e.screen_id()).collect();
    assert_eq!(order, ["travel", "date", "NFL Scoreboard"]);
    let alt = scheduler.entries()[1].alternate().expect("alternate attached");
    assert_eq!(alt.screen_ids(), ["inside", "bears stand1"]);
    assert_eq!(alt.frequency().get(), 3);
}

#[test]
fn yaml_documents_with_groups_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("screens.yaml");
    fs::write(
        &path,
        r#"
groups:
  - name: Morning
    screens:
      date: 1
      weather1: 2
  - name: Sports
    screens:
      cubs live:
        frequency: 3
        alt:
          screen: cubs next
          frequency: 2
"#,
    )
    .unwrap();

    let document = load_schedule_document(&path).unwrap();
    let slots = normalize(&document);
    let groups: Vec<Option<&str>> = slots.iter().map(|s| s.group.as_deref()).collect();
    assert_eq!(groups, [Some("Morning"), Some("Morning"), Some("Sports")]);
    assert!(matches!(slots[2].spec, ScreenSpec::Detailed { alt: Some(_), .. }));

    let scheduler = load_scheduler(&path, &ScreenCatalog::builtin()).unwrap();
    assert_eq!(scheduler.node_count(), 3);
    assert!(scheduler.requested_ids().contains("cubs next"));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempdir().unwrap();
    let err = load_scheduler(dir.path().join("absent.json"), &ScreenCatalog::builtin())
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Io(_)));
}

#[test]
fn broken_json_reports_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"screens": {"date": 1,}"#).unwrap();
    let err = load_scheduler(&path, &ScreenCatalog::builtin()).unwrap_err();
    assert!(matches!(err, ScheduleError::Json(_)));
}

#[test]
fn custom_catalog_controls_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("screens.yml");
    fs::write(&path, "screens:\n  kitchen timer: 1\n").unwrap();

    let err = load_scheduler(&path, &ScreenCatalog::builtin()).unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownScreen(_)));

    let catalog = ScreenCatalog::builtin().with_extra(["kitchen timer"]);
    let scheduler = load_scheduler(&path, &catalog).unwrap();
    assert_eq!(scheduler.node_count(), 1);
}
