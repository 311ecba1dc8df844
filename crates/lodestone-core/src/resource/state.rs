use std::fmt;

/// Lifecycle state of a loadable resource.
///
/// Legal transitions: `Unloaded → Loading → Loaded`,
/// `Loaded → Unloading → Unloaded`, `Loading → Cancelling → Unloaded`,
/// and `Cancelling → Loading` when a load is re-requested before the
/// cancellation settles. [`Lifecycle`](super::lifecycle::Lifecycle) is the
/// only place that performs transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing resident; the initial state.
    #[default]
    Unloaded,
    /// A load is in flight.
    Loading,
    /// Fully resident.
    Loaded,
    /// An unload is in flight.
    Unloading,
    /// An in-flight load is being rolled back.
    Cancelling,
}

impl LoadState {
    /// True while a load, unload or cancellation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LoadState::Loading | LoadState::Unloading | LoadState::Cancelling
        )
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Unloading => "unloading",
            LoadState::Cancelling => "cancelling",
        };
        write!(f, "{}", name)
    }
}
