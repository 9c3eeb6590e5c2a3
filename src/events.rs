use std::collections::BTreeSet;

/// Requests delivered to the driver from outside (signals, file watcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// Cut the current dwell short and step past the screen just shown.
    Skip,
    /// Rebuild the scheduler from the schedule file.
    Reload,
}

/// Emitted by the driver as the rotation progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    ScheduleLoaded {
        nodes: usize,
        feeds: BTreeSet<&'static str>,
    },
    /// A screen was selected and handed to the display.
    Presented(String),
    /// Nothing was available (or no schedule is loaded); the driver is backing off.
    Idle,
}
