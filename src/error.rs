use thiserror::Error;

/// Validation failures raised while turning a schedule document into a scheduler.
///
/// Every variant is fatal for the build; there is no partial success.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Top-level document is not a mapping, or has neither `screens` nor `groups`.
    #[error("malformed schedule document: {0}")]
    MalformedDocument(String),

    /// A main slot names a screen the catalog does not know.
    #[error("unknown screen id '{0}'")]
    UnknownScreen(String),

    /// An alternate list names a screen the catalog does not know.
    #[error("unknown alternate screen id '{alternate}' for '{screen}'")]
    UnknownAlternate { screen: String, alternate: String },

    #[error("frequency for '{screen}' {reason}")]
    InvalidFrequency { screen: String, reason: &'static str },

    #[error("alternate frequency for '{screen}' {reason}")]
    InvalidAlternateFrequency { screen: String, reason: &'static str },

    /// `alt` is not a mapping, or its `screen` field has the wrong shape.
    #[error("alternate configuration for '{screen}' {reason}")]
    MalformedAlternate { screen: String, reason: String },

    /// Every slot was disabled, or the document contained no screens at all.
    #[error("configuration must contain at least one enabled screen")]
    NoEnabledScreens,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
