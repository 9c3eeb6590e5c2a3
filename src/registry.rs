use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

/// A drawable unit as seen by the scheduler: an id, an opaque renderable handle, and
/// whether it currently has displayable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenDefinition<R> {
    pub id: String,
    pub renderable: R,
    pub available: bool,
}

impl<R> ScreenDefinition<R> {
    pub fn new(id: impl Into<String>, renderable: R, available: bool) -> Self {
        Self {
            id: id.into(),
            renderable,
            available,
        }
    }
}

/// Read-only snapshot of screen definitions handed to each poll.
pub trait ScreenRegistry<R> {
    fn lookup(&self, id: &str) -> Option<&ScreenDefinition<R>>;

    /// Returns the definition only if it exists and is marked available.
    fn available(&self, id: &str) -> Option<&ScreenDefinition<R>> {
        self.lookup(id).filter(|definition| definition.available)
    }
}

impl<R, S: BuildHasher> ScreenRegistry<R> for HashMap<String, ScreenDefinition<R>, S> {
    fn lookup(&self, id: &str) -> Option<&ScreenDefinition<R>> {
        self.get(id)
    }
}

impl<R> ScreenRegistry<R> for BTreeMap<String, ScreenDefinition<R>> {
    fn lookup(&self, id: &str) -> Option<&ScreenDefinition<R>> {
        self.get(id)
    }
}

/// Produces a fresh registry snapshot for each polling cycle.
pub trait RegistrySource: Send {
    type Handle;

    /// `requested` is the set of ids the active schedule can select.
    fn snapshot(
        &mut self,
        requested: &BTreeSet<String>,
    ) -> HashMap<String, ScreenDefinition<Self::Handle>>;
}

/// Registry source with fixed availability: every requested screen is available unless it
/// was listed as unavailable up front.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    unavailable: BTreeSet<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(unavailable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unavailable: unavailable.into_iter().map(Into::into).collect(),
        }
    }
}

impl RegistrySource for StaticRegistry {
    type Handle = ();

    fn snapshot(&mut self, requested: &BTreeSet<String>) -> HashMap<String, ScreenDefinition<()>> {
        requested
            .iter()
            .map(|id| {
                let available = !self.unavailable.contains(id);
                (id.clone(), ScreenDefinition::new(id.clone(), (), available))
            })
            .collect()
    }
}
