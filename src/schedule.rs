use std::collections::BTreeSet;
use std::num::NonZeroU32;

use tracing::{debug, trace};

use crate::registry::{ScreenDefinition, ScreenRegistry};

/// Secondary rotation that periodically stands in for an entry's own screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateSchedule {
    screen_ids: Vec<String>,
    frequency: NonZeroU32,
    current_index: usize,
}

impl AlternateSchedule {
    /// Returns `None` when `screen_ids` is empty.
    pub fn new(screen_ids: Vec<String>, frequency: NonZeroU32) -> Option<Self> {
        if screen_ids.is_empty() {
            return None;
        }
        Some(Self {
            screen_ids,
            frequency,
            current_index: 0,
        })
    }

    pub fn screen_ids(&self) -> &[String] {
        &self.screen_ids
    }

    pub fn frequency(&self) -> NonZeroU32 {
        self.frequency
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    fn is_due(&self, play_count: u64) -> bool {
        play_count % u64::from(self.frequency.get()) == 0
    }

    /// Hands out the id under the cursor and moves the cursor on.
    fn advance(&mut self) -> &str {
        let index = self.current_index;
        self.current_index = (index + 1) % self.screen_ids.len();
        &self.screen_ids[index]
    }
}

/// One enabled playlist slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    screen_id: String,
    frequency: NonZeroU32,
    cooldown: u32,
    play_count: u64,
    alternate: Option<AlternateSchedule>,
}

impl ScheduleEntry {
    pub fn new(screen_id: impl Into<String>, frequency: NonZeroU32) -> Self {
        Self {
            screen_id: screen_id.into(),
            frequency,
            cooldown: 0,
            play_count: 0,
            alternate: None,
        }
    }

    pub fn with_alternate(mut self, alternate: AlternateSchedule) -> Self {
        self.alternate = Some(alternate);
        self
    }

    pub fn screen_id(&self) -> &str {
        &self.screen_id
    }

    pub fn frequency(&self) -> NonZeroU32 {
        self.frequency
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    pub fn alternate(&self) -> Option<&AlternateSchedule> {
        self.alternate.as_ref()
    }

    /// Evaluates this entry as a candidate. On success the play is committed and the
    /// cooldown re-armed; on failure only the alternate cursor may have moved.
    fn try_fire<'r, R, G>(&mut self, registry: &'r G) -> Option<&'r ScreenDefinition<R>>
    where
        G: ScreenRegistry<R> + ?Sized,
    {
        let next_play_count = self.play_count + 1;

        let mut selected = None;
        if let Some(alternate) = self.alternate.as_mut() {
            if alternate.is_due(next_play_count) {
                let alternate_id = alternate.advance();
                selected = registry.available(alternate_id);
                if selected.is_none() {
                    trace!(
                        screen = %self.screen_id,
                        alternate = %alternate_id,
                        "alternate unavailable; falling back to own screen"
                    );
                }
            }
        }

        let definition = selected.or_else(|| registry.available(&self.screen_id))?;
        self.play_count = next_play_count;
        self.cooldown = self.frequency.get();
        Some(definition)
    }

    fn reset(&mut self) {
        self.cooldown = 0;
        self.play_count = 0;
        if let Some(alternate) = self.alternate.as_mut() {
            alternate.current_index = 0;
        }
    }
}

/// Frequency-driven rotation over a fixed list of entries.
///
/// Rules:
/// - Each poll scans at most `entries.len()` slots, starting at the persisted cursor.
/// - A visited entry in cooldown ticks down once; it becomes a candidate when it hits zero.
/// - A candidate fires if its due alternate or its own screen is available, re-arming its
///   cooldown to its frequency.
/// - Unavailable candidates are passed over without counting a play.
#[derive(Debug, Clone)]
pub struct ScreenScheduler {
    entries: Vec<ScheduleEntry>,
    cursor: usize,
    requested: BTreeSet<String>,
}

impl ScreenScheduler {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        let mut requested = BTreeSet::new();
        for entry in &entries {
            requested.insert(entry.screen_id.clone());
            if let Some(alternate) = &entry.alternate {
                requested.extend(alternate.screen_ids.iter().cloned());
            }
        }
        Self {
            entries,
            cursor: 0,
            requested,
        }
    }

    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    /// Every id this schedule could ever hand out, alternates included.
    pub fn requested_ids(&self) -> &BTreeSet<String> {
        &self.requested
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Picks the next screen to present, or `None` when nothing is currently available.
    pub fn poll<'r, R, G>(&mut self, registry: &'r G) -> Option<&'r ScreenDefinition<R>>
    where
        G: ScreenRegistry<R> + ?Sized,
    {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }

        for _ in 0..len {
            let index = self.cursor;
            self.cursor = (index + 1) % len;
            let entry = &mut self.entries[index];

            if entry.cooldown > 0 {
                entry.cooldown -= 1;
                if entry.cooldown > 0 {
                    continue;
                }
            }

            if let Some(definition) = entry.try_fire(registry) {
                return Some(definition);
            }
        }

        None
    }

    /// Polls like [`poll`](Self::poll) but keeps going while the result is in `avoided`,
    /// giving up after `node_count` attempts and returning the last pick.
    pub fn poll_skipping<'r, R, G>(
        &mut self,
        registry: &'r G,
        avoided: &BTreeSet<String>,
    ) -> Option<&'r ScreenDefinition<R>>
    where
        G: ScreenRegistry<R> + ?Sized,
    {
        let mut selected = self.poll(registry)?;
        let mut attempts = self.entries.len();
        while avoided.contains(&selected.id) && attempts > 1 {
            debug!(screen = %selected.id, "manual skip dropping screen from queue");
            selected = self.poll(registry)?;
            attempts -= 1;
        }
        if avoided.contains(&selected.id) {
            debug!(screen = %selected.id, "manual skip found no alternative");
        }
        Some(selected)
    }

    /// Restores every runtime counter to its freshly built value.
    pub fn reset(&mut self) {
        self.cursor = 0;
        for entry in &mut self.entries {
            entry.reset();
        }
    }
}
