use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::catalog::ScreenCatalog;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Schedule document (JSON or YAML). Relative paths resolve against the config file.
    pub schedule_path: PathBuf,
    /// How long a presented screen stays up before the next poll.
    #[serde(with = "humantime_serde")]
    pub dwell: Duration,
    /// Back-off when no screen is available or no schedule is loaded.
    #[serde(with = "humantime_serde")]
    pub idle_retry: Duration,
    /// Rebuild the scheduler whenever the schedule file changes.
    pub watch_schedule: bool,
    /// Screens a manual skip always steps past, in addition to the one just shown.
    pub skip_screens: Vec<String>,
    /// Ids accepted on top of the builtin screen catalog.
    pub extra_screen_ids: Vec<String>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)?;
        let mut cfg: Self = serde_yaml::from_str(&s)?;
        if cfg.schedule_path.is_relative() {
            if let Some(dir) = path.parent() {
                cfg.schedule_path = dir.join(&cfg.schedule_path);
            }
        }
        Ok(cfg)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.schedule_path.as_os_str().is_empty(),
            "schedule-path must not be empty"
        );
        ensure!(!self.dwell.is_zero(), "dwell must be greater than zero");
        ensure!(
            !self.idle_retry.is_zero(),
            "idle-retry must be greater than zero"
        );
        for id in &self.extra_screen_ids {
            ensure!(
                !id.trim().is_empty(),
                "extra-screen-ids must not contain blank ids"
            );
        }
        let catalog = self.catalog();
        for id in &self.skip_screens {
            ensure!(
                catalog.is_known_id(id),
                "skip-screens references unknown screen id '{}'",
                id
            );
        }
        Ok(self)
    }

    /// Builtin catalog extended with `extra-screen-ids`.
    pub fn catalog(&self) -> ScreenCatalog {
        ScreenCatalog::builtin().with_extra(self.extra_screen_ids.iter().cloned())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
            .validated()
            .context("invalid configuration values")
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            schedule_path: PathBuf::from("screens_config.json"),
            dwell: Duration::from_secs(5),
            idle_retry: Duration::from_secs(5),
            watch_schedule: true,
            skip_screens: Vec::new(),
            extra_screen_ids: Vec::new(),
        }
    }
}
