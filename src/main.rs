//! Binary entrypoint for the screen rotation driver.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use screen_rotation::config::Configuration;
use screen_rotation::events::{DriverCommand, DriverEvent};
use screen_rotation::feeds::required_feeds;
use screen_rotation::registry::{RegistrySource, StaticRegistry};
use screen_rotation::tasks::driver::{self, DriverOptions};
use screen_rotation::{ScreenCatalog, load_scheduler, watch};

#[derive(Debug, Parser)]
#[command(
    name = "screen-rotation",
    version,
    about = "frequency-based screen rotation"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Use this schedule document instead of the configured schedule-path
    #[arg(long = "schedule", value_name = "FILE")]
    schedule: Option<PathBuf>,
    /// Override how long each screen stays up (e.g. "10s")
    #[arg(long = "dwell", value_name = "DURATION", value_parser = humantime::parse_duration)]
    dwell: Option<Duration>,
    /// Print the rotation order for this many polls without starting the driver
    #[arg(long = "dry-run", value_name = "POLLS")]
    dry_run: Option<usize>,
    /// Treat a screen as unavailable (repeatable)
    #[arg(long = "unavailable", value_name = "ID")]
    unavailable: Vec<String>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    // RUST_LOG wins; otherwise map -v to a level
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        schedule,
        dwell,
        dry_run,
        unavailable,
        verbose,
    } = Args::parse();
    init_tracing(verbose);

    let mut cfg = Configuration::load(&config)?;
    if let Some(path) = schedule {
        cfg.schedule_path = path;
    }
    if let Some(dwell) = dwell {
        cfg.dwell = dwell;
    }
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    let catalog = cfg.catalog();
    let source = StaticRegistry::new(unavailable);

    if let Some(polls) = dry_run {
        return run_dry_run(&cfg.schedule_path, &catalog, source, polls);
    }

    let (command_tx, command_rx) = mpsc::channel::<DriverCommand>(16); // Signals/watcher -> Driver
    let (event_tx, mut event_rx) = mpsc::channel::<DriverEvent>(64); // Driver -> main
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    #[cfg(unix)]
    {
        let cancel = cancel.clone();
        let control = command_tx.clone();
        tokio::spawn(async move {
            match signal(SignalKind::user_defined1()) {
                Ok(mut sigusr1) => loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        received = sigusr1.recv() => {
                            if received.is_none() {
                                break;
                            }
                            tracing::info!("SIGUSR1 received; skipping current screen");
                            if let Err(err) = control.send(DriverCommand::Skip).await {
                                tracing::warn!("failed to forward skip request: {err}");
                                break;
                            }
                        }
                    }
                },
                Err(err) => tracing::warn!("failed to register SIGUSR1 handler: {err}"),
            }
        });
    }

    // Held for the lifetime of the driver; dropping it stops the watch.
    let _watcher = if cfg.watch_schedule {
        match watch::start_watcher(&cfg.schedule_path, command_tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!("schedule watcher unavailable; reloads disabled: {err}");
                None
            }
        }
    } else {
        None
    };

    let mut tasks = JoinSet::new();
    tasks.spawn({
        let schedule_path = cfg.schedule_path.clone();
        let options = DriverOptions::from(&cfg);
        let cancel = cancel.clone();
        async move {
            driver::run(
                schedule_path,
                catalog,
                source,
                options,
                command_rx,
                event_tx,
                cancel,
            )
            .await
            .context("driver task failed")
        }
    });
    drop(command_tx);

    while let Some(event) = event_rx.recv().await {
        match event {
            DriverEvent::ScheduleLoaded { nodes, feeds } => {
                tracing::debug!(nodes, ?feeds, "schedule ready")
            }
            DriverEvent::Presented(id) => tracing::debug!(screen = %id, "screen on display"),
            DriverEvent::Idle => tracing::debug!("display idle"),
        }
    }
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

fn run_dry_run(
    schedule_path: &Path,
    catalog: &ScreenCatalog,
    mut source: StaticRegistry,
    polls: usize,
) -> Result<()> {
    let mut scheduler = load_scheduler(schedule_path, catalog).with_context(|| {
        format!(
            "failed to build schedule from {}",
            schedule_path.display()
        )
    })?;
    let registry = source.snapshot(scheduler.requested_ids());
    let feeds = required_feeds(scheduler.requested_ids().iter().map(String::as_str));

    println!(
        "# schedule dry run\n# schedule: {}\n# nodes: {}\n# polls: {}\n",
        schedule_path.display(),
        scheduler.node_count(),
        polls
    );

    println!("# entries (frequency / alternates):");
    for entry in scheduler.entries() {
        match entry.alternate() {
            Some(alt) => println!(
                "  {:>3} x {}  (every {} plays: {})",
                entry.frequency(),
                entry.screen_id(),
                alt.frequency(),
                alt.screen_ids().join(", ")
            ),
            None => println!("  {:>3} x {}", entry.frequency(), entry.screen_id()),
        }
    }

    let mut unavailable: Vec<&str> = registry
        .values()
        .filter(|definition| !definition.available)
        .map(|definition| definition.id.as_str())
        .collect();
    unavailable.sort_unstable();
    if !unavailable.is_empty() {
        println!("# unavailable: {}", unavailable.join(", "));
    }
    println!(
        "# required feeds: {}",
        feeds.into_iter().collect::<Vec<_>>().join(", ")
    );

    println!("\n# planned order:");
    for idx in 0..polls {
        match scheduler.poll(&registry) {
            Some(definition) => println!("  {:>4}: {}", idx + 1, definition.id),
            None => println!("  {:>4}: (none available)", idx + 1),
        }
    }

    Ok(())
}
