use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use screen_rotation::config::Configuration;
use screen_rotation::tasks::driver::DriverOptions;
use tempfile::tempdir;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
schedule-path: "/etc/frame/screens.json"
dwell: 12s
idle-retry: 1m
watch-schedule: false
skip-screens: [date, time]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.schedule_path, PathBuf::from("/etc/frame/screens.json"));
    assert_eq!(cfg.dwell, Duration::from_secs(12));
    assert_eq!(cfg.idle_retry, Duration::from_secs(60));
    assert!(!cfg.watch_schedule);
    assert_eq!(cfg.skip_screens, ["date", "time"]);
}

#[test]
fn defaults_apply_to_empty_document() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.schedule_path, PathBuf::from("screens_config.json"));
    assert_eq!(cfg.dwell, Duration::from_secs(5));
    assert!(cfg.watch_schedule);
    assert!(cfg.extra_screen_ids.is_empty());
    assert!(cfg.validated().is_ok());
}

#[test]
fn relative_schedule_path_resolves_against_config_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "schedule-path: schedules/main.yaml\n").unwrap();
    let cfg = Configuration::load(&path).unwrap();
    assert_eq!(cfg.schedule_path, dir.path().join("schedules/main.yaml"));
}

#[test]
fn zero_durations_are_rejected() {
    let cfg: Configuration = serde_yaml::from_str("dwell: 0s").unwrap();
    assert!(cfg.validated().is_err());
    let cfg: Configuration = serde_yaml::from_str("idle-retry: 0s").unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn unknown_skip_screens_are_rejected() {
    let cfg: Configuration = serde_yaml::from_str("skip-screens: [nowhere]").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn extra_screen_ids_extend_catalog() {
    let cfg: Configuration = serde_yaml::from_str(
        r#"
extra-screen-ids: ["kitchen timer"]
skip-screens: ["kitchen timer"]
"#,
    )
    .unwrap();
    let cfg = cfg.validated().unwrap();
    assert!(cfg.catalog().is_known_id("kitchen timer"));
    assert!(cfg.catalog().is_known_id("date"));
}

#[test]
fn driver_options_follow_configuration() {
    let cfg: Configuration = serde_yaml::from_str("dwell: 3s\nskip-screens: [date]").unwrap();
    let options = DriverOptions::from(&cfg);
    assert_eq!(options.dwell, Duration::from_secs(3));
    assert!(options.skip_screens.contains("date"));
}
