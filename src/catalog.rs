use std::collections::HashSet;

/// Every screen identifier the renderer knows how to draw.
pub const SCREEN_IDS: &[&str] = &[
    "date",
    "time",
    "nixie",
    "weather logo",
    "weather1",
    "weather2",
    "weather hourly",
    "weather radar",
    "inside",
    "inside sensors",
    "verano logo",
    "vrnof",
    "travel",
    "bears logo",
    "bears stand1",
    "bears stand2",
    "bears next",
    "nfl logo",
    "NFL Scoreboard",
    "NFL Scoreboard v2",
    "NFL Overview NFC",
    "NFL Overview AFC",
    "NFL Standings NFC",
    "NFL Standings AFC",
    "nba logo",
    "NBA Scoreboard",
    "NBA Scoreboard v2",
    "bulls logo",
    "bulls stand1",
    "bulls stand2",
    "bulls last",
    "bulls live",
    "bulls next",
    "bulls next home",
    "hawks logo",
    "hawks stand1",
    "hawks stand2",
    "hawks last",
    "hawks live",
    "hawks next",
    "hawks next home",
    "nhl logo",
    "NHL Scoreboard",
    "NHL Scoreboard v2",
    "NHL Div Standings West Overview",
    "NHL Div Standings Overview East",
    "NHL Div Standings West",
    "NHL Div Standings East",
    "NHL WestPlayoff Standings Overview vertical",
    "NHL EastPlayoff Standings Overview vertical",
    "NHL WestPlayoff Standings Overview horizontal",
    "NHL EastPlayoff Standings Overview horizontal",
    "NHL WestPlayoff Standings",
    "NHL EastPlayoff Standings",
    "cubs logo",
    "cubs stand1",
    "cubs stand2",
    "cubs last",
    "cubs result",
    "cubs live",
    "cubs next",
    "cubs next home",
    "sox logo",
    "sox stand1",
    "sox stand2",
    "sox last",
    "sox live",
    "sox next",
    "sox next home",
    "mlb logo",
    "MLB Scoreboard",
    "MLB Scoreboard v2",
    "MLB Scoreboard v3",
    "NL Overview",
    "NL East",
    "NL Central",
    "NL West",
    "NL Wild Card",
    "AL Overview",
    "AL East",
    "AL Central",
    "AL West",
    "AL Wild Card",
];

/// Static membership set used to reject unknown ids while building a schedule.
#[derive(Debug, Clone)]
pub struct ScreenCatalog {
    ids: HashSet<String>,
}

impl ScreenCatalog {
    pub fn builtin() -> Self {
        Self::from_ids(SCREEN_IDS.iter().copied())
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds ids on top of the current set (used for `extra-screen-ids`).
    pub fn with_extra<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn is_known_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl Default for ScreenCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_no_duplicates() {
        let catalog = ScreenCatalog::builtin();
        assert_eq!(catalog.len(), SCREEN_IDS.len());
    }

    #[test]
    fn membership_is_case_sensitive() {
        let catalog = ScreenCatalog::builtin();
        assert!(catalog.is_known_id("NFL Scoreboard"));
        assert!(!catalog.is_known_id("nfl scoreboard"));
        assert!(!catalog.is_known_id(""));
    }

    #[test]
    fn extra_ids_extend_builtin_set() {
        let catalog = ScreenCatalog::builtin().with_extra(["kitchen timer"]);
        assert!(catalog.is_known_id("kitchen timer"));
        assert!(catalog.is_known_id("date"));
    }
}
