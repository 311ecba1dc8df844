/// Notifications fired by a resource when a lifecycle transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    /// The resource finished loading.
    Loaded,
    /// The resource finished unloading.
    Unloaded,
    /// An in-flight load was cancelled and rolled back to unloaded.
    LoadCancelled,
}

impl ResourceEvent {
    /// Dotted event name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceEvent::Loaded => "resource.loaded",
            ResourceEvent::Unloaded => "resource.unloaded",
            ResourceEvent::LoadCancelled => "resource.load_cancelled",
        }
    }
}

/// Handle returned by [`ObserverSet::subscribe`], used to unsubscribe.
pub type SubscriberId = u64;

type ObserverFn = Box<dyn FnMut(&str, ResourceEvent) + Send>;

/// Per-resource subscriber list.
///
/// Observers are invoked in subscription order. Delivery is at most once per
/// transition: [`emit`](Self::emit) is only called from the transition
/// methods of [`Lifecycle`](super::lifecycle::Lifecycle), each of which fires
/// exactly one event when it succeeds.
#[derive(Default)]
pub struct ObserverSet {
    next_id: SubscriberId,
    entries: Vec<(SubscriberId, ObserverFn)>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Register an observer; the callback receives the resource name and the
    /// event that completed.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: FnMut(&str, ResourceEvent) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns false if the id is
    /// unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    pub fn emit(&mut self, resource_name: &str, event: ResourceEvent) {
        log::debug!("{}: {}", resource_name, event.name());
        for (_, observer) in &mut self.entries {
            observer(resource_name, event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observer_count", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
