//! Maps the screens a schedule can show onto the cached data feeds they read from.

use std::collections::BTreeSet;

/// Feed key paired with the screens that consume it. Scoreboard-style screens fetch their own
/// data and have no entry here.
pub const FEED_DEPENDENCIES: &[(&str, &[&str])] = &[
    (
        "weather",
        &["weather1", "weather2", "weather hourly", "weather radar"],
    ),
    ("bears", &["bears stand1", "bears stand2"]),
    (
        "hawks",
        &[
            "hawks stand1",
            "hawks stand2",
            "hawks last",
            "hawks live",
            "hawks next",
            "hawks next home",
        ],
    ),
    (
        "bulls",
        &[
            "bulls stand1",
            "bulls stand2",
            "bulls last",
            "bulls live",
            "bulls next",
            "bulls next home",
        ],
    ),
    (
        "cubs",
        &[
            "cubs stand1",
            "cubs stand2",
            "cubs last",
            "cubs result",
            "cubs live",
            "cubs next",
            "cubs next home",
        ],
    ),
    (
        "sox",
        &[
            "sox stand1",
            "sox stand2",
            "sox last",
            "sox live",
            "sox next",
            "sox next home",
        ],
    ),
];

/// Feeds that must stay warm for the given requested screen ids.
///
/// An empty request (no schedule loaded) keeps every feed warm.
pub fn required_feeds<'a, I>(requested: I) -> BTreeSet<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let requested: BTreeSet<&str> = requested.into_iter().collect();
    if requested.is_empty() {
        return FEED_DEPENDENCIES.iter().map(|(feed, _)| *feed).collect();
    }

    FEED_DEPENDENCIES
        .iter()
        .filter(|(_, screens)| screens.iter().any(|id| requested.contains(id)))
        .map(|(feed, _)| *feed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_keeps_all_feeds() {
        let feeds = required_feeds(std::iter::empty());
        assert_eq!(feeds.len(), FEED_DEPENDENCIES.len());
    }

    #[test]
    fn only_dependent_feeds_are_selected() {
        let feeds = required_feeds(["date", "weather1", "cubs live"]);
        assert_eq!(feeds, BTreeSet::from(["cubs", "weather"]));
    }

    #[test]
    fn screens_without_feeds_need_nothing() {
        let feeds = required_feeds(["date", "NFL Scoreboard"]);
        assert!(feeds.is_empty());
    }
}
