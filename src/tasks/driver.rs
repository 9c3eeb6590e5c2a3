use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::builder::load_scheduler;
use crate::catalog::ScreenCatalog;
use crate::config::Configuration;
use crate::error::ScheduleError;
use crate::events::{DriverCommand, DriverEvent};
use crate::feeds::required_feeds;
use crate::registry::RegistrySource;
use crate::schedule::ScreenScheduler;

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub dwell: Duration,
    pub idle_retry: Duration,
    pub skip_screens: BTreeSet<String>,
}

impl From<&Configuration> for DriverOptions {
    fn from(cfg: &Configuration) -> Self {
        Self {
            dwell: cfg.dwell,
            idle_retry: cfg.idle_retry,
            skip_screens: cfg.skip_screens.iter().cloned().collect(),
        }
    }
}

/// Owns the scheduler and paces the rotation.
///
/// Rules:
/// - Build the scheduler from `schedule_path` at startup; without one, idle and retry.
/// - Each cycle takes a fresh registry snapshot and polls once; a hit is presented for
///   `dwell`, a miss backs off for `idle-retry`.
/// - `Reload` rebuilds in place of the current scheduler; a failed rebuild keeps the old one.
/// - `Skip` ends the current dwell early and the next pick steps past the last shown screen
///   and the configured skip screens.
pub async fn run<S>(
    schedule_path: PathBuf,
    catalog: ScreenCatalog,
    mut source: S,
    options: DriverOptions,
    mut commands: Receiver<DriverCommand>,
    events: Sender<DriverEvent>,
    cancel: CancellationToken,
) -> Result<()>
where
    S: RegistrySource,
{
    let mut state = DriverState::default();
    if let Some(loaded) = state.reload(&schedule_path, &catalog) {
        if !emit(&events, loaded).await {
            return Ok(());
        }
    }
    let mut commands_open = true;

    'rotation: loop {
        let (event, wait) = state.next_cycle(&mut source, &options);
        if !emit(&events, event).await {
            break;
        }

        let deadline = Instant::now() + wait;
        loop {
            select! {
                _ = cancel.cancelled() => break 'rotation,
                _ = sleep_until(deadline) => break,
                cmd = commands.recv(), if commands_open => match cmd {
                    Some(DriverCommand::Skip) => {
                        info!("skip requested");
                        state.skip_pending = true;
                        break;
                    }
                    Some(DriverCommand::Reload) => {
                        if let Some(loaded) = state.reload(&schedule_path, &catalog) {
                            if !emit(&events, loaded).await {
                                break 'rotation;
                            }
                        }
                    }
                    None => {
                        debug!("command channel closed");
                        commands_open = false;
                    }
                },
            }
        }
    }

    Ok(())
}

#[derive(Default)]
struct DriverState {
    scheduler: Option<ScreenScheduler>,
    last_shown: Option<String>,
    skip_pending: bool,
}

impl DriverState {
    /// Polls once and reports what happened plus how long to wait before the next cycle.
    fn next_cycle<S: RegistrySource>(
        &mut self,
        source: &mut S,
        options: &DriverOptions,
    ) -> (DriverEvent, Duration) {
        let skip = std::mem::take(&mut self.skip_pending);
        let Some(scheduler) = self.scheduler.as_mut() else {
            warn!(
                retry_secs = options.idle_retry.as_secs_f64(),
                "no schedule available; sleeping"
            );
            return (DriverEvent::Idle, options.idle_retry);
        };

        let picked = {
            let registry = source.snapshot(scheduler.requested_ids());
            let definition = if skip {
                let mut avoided = options.skip_screens.clone();
                avoided.extend(self.last_shown.iter().cloned());
                scheduler.poll_skipping(&registry, &avoided)
            } else {
                scheduler.poll(&registry)
            };
            definition.map(|definition| definition.id.clone())
        };

        match picked {
            Some(id) => {
                info!(screen = %id, "presenting screen");
                self.last_shown = Some(id.clone());
                (DriverEvent::Presented(id), options.dwell)
            }
            None => {
                info!(
                    retry_secs = options.idle_retry.as_secs_f64(),
                    "no eligible screens available; sleeping"
                );
                (DriverEvent::Idle, options.idle_retry)
            }
        }
    }

    /// Rebuilds the scheduler. Returns the load event on success.
    fn reload(&mut self, path: &Path, catalog: &ScreenCatalog) -> Option<DriverEvent> {
        let scheduler = match load_scheduler(path, catalog) {
            Ok(scheduler) => scheduler,
            Err(ScheduleError::Io(err)) => {
                warn!(path = %path.display(), "could not load schedule configuration: {err}");
                return None;
            }
            Err(err) => {
                error!(path = %path.display(), "invalid schedule configuration: {err}");
                return None;
            }
        };

        let nodes = scheduler.node_count();
        let feeds = required_feeds(scheduler.requested_ids().iter().map(String::as_str));
        info!(nodes, ?feeds, "loaded schedule configuration");
        self.scheduler = Some(scheduler);
        self.last_shown = None;
        self.skip_pending = false;
        Some(DriverEvent::ScheduleLoaded { nodes, feeds })
    }
}

async fn emit(events: &Sender<DriverEvent>, event: DriverEvent) -> bool {
    if events.send(event).await.is_err() {
        warn!("driver event channel closed");
        return false;
    }
    true
}
