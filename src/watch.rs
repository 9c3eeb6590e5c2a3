use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use notify::{
    Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Result as NotifyResult, Watcher,
    event::{CreateKind, ModifyKind, RenameMode},
};
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use crate::events::DriverCommand;

/// Watches the directory holding `schedule_path` and requests a reload whenever the file is
/// written, created, or renamed into place. Keep the returned watcher alive.
pub fn start_watcher(
    schedule_path: &Path,
    tx: Sender<DriverCommand>,
) -> NotifyResult<RecommendedWatcher> {
    let dir = match schedule_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = schedule_path.file_name().map(OsString::from);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => handle_event(event, file_name.as_deref(), &tx),
        Err(e) => warn!("schedule watch error: {e}"),
    })?;
    watcher.configure(Config::default())?;
    // Editors often replace the file, so watch the parent rather than the file itself.
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

fn handle_event(event: Event, file_name: Option<&OsStr>, tx: &Sender<DriverCommand>) {
    let relevant = matches!(
        event.kind,
        EventKind::Create(CreateKind::File | CreateKind::Any)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both))
    );
    if !relevant {
        return;
    }
    let touches_schedule = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == file_name);
    if !touches_schedule {
        return;
    }
    debug!(kind = ?event.kind, "schedule file changed");
    // Dropped when the driver is backlogged; the next write triggers again.
    let _ = tx.try_send(DriverCommand::Reload);
}
