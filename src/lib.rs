pub mod builder;
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod feeds;
pub mod registry;
pub mod schedule;
pub mod watch;
pub mod tasks {
    pub mod driver;
}

pub use builder::{build_scheduler, load_scheduler};
pub use catalog::ScreenCatalog;
pub use error::ScheduleError;
pub use registry::{ScreenDefinition, ScreenRegistry};
pub use schedule::{AlternateSchedule, ScheduleEntry, ScreenScheduler};
