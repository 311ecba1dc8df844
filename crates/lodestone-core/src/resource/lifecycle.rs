use crate::resource::observer::{ObserverSet, ResourceEvent, SubscriberId};
use crate::resource::state::LoadState;

/// Transition core shared by every loadable resource.
///
/// `Lifecycle` owns the state, the progress value and the observer list, and
/// is the single authority on which transitions are legal. Each `begin_*` /
/// `finish_*` method either performs one legal step and returns true, or
/// refuses and returns false, so a state can never be skipped, and completion
/// events fire exactly once per transition.
#[derive(Debug)]
pub struct Lifecycle {
    name: String,
    state: LoadState,
    progress: f32,
    observers: ObserverSet,
}

impl Lifecycle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LoadState::Unloaded,
            progress: 0.0,
            observers: ObserverSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Update the progress value, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// `Unloaded → Loading`.
    pub fn begin_load(&mut self) -> bool {
        if self.state != LoadState::Unloaded {
            return false;
        }
        self.state = LoadState::Loading;
        self.progress = 0.0;
        true
    }

    /// `Loading → Loaded`; sets progress to 1 and fires [`ResourceEvent::Loaded`].
    pub fn finish_load(&mut self) -> bool {
        if self.state != LoadState::Loading {
            return false;
        }
        self.state = LoadState::Loaded;
        self.progress = 1.0;
        self.observers.emit(&self.name, ResourceEvent::Loaded);
        true
    }

    /// `Loaded → Unloading`.
    pub fn begin_unload(&mut self) -> bool {
        if self.state != LoadState::Loaded {
            return false;
        }
        self.state = LoadState::Unloading;
        true
    }

    /// `Unloading → Unloaded`; fires [`ResourceEvent::Unloaded`].
    pub fn finish_unload(&mut self) -> bool {
        if self.state != LoadState::Unloading {
            return false;
        }
        self.state = LoadState::Unloaded;
        self.progress = 0.0;
        self.observers.emit(&self.name, ResourceEvent::Unloaded);
        true
    }

    /// `Loading → Cancelling`.
    pub fn begin_cancel(&mut self) -> bool {
        if self.state != LoadState::Loading {
            return false;
        }
        self.state = LoadState::Cancelling;
        true
    }

    /// `Cancelling → Unloaded`; fires [`ResourceEvent::LoadCancelled`].
    pub fn finish_cancel(&mut self) -> bool {
        if self.state != LoadState::Cancelling {
            return false;
        }
        self.state = LoadState::Unloaded;
        self.progress = 0.0;
        self.observers.emit(&self.name, ResourceEvent::LoadCancelled);
        true
    }

    /// `Cancelling → Loading`: a load was re-requested before the
    /// cancellation settled; the operation resumes in place.
    pub fn resume(&mut self) -> bool {
        if self.state != LoadState::Cancelling {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Forcibly return to `Unloaded` from any busy state after a load-time
    /// failure. Fires no completion event; the caller logs the diagnostic.
    pub fn fail(&mut self) -> bool {
        if !self.state.is_busy() {
            return false;
        }
        log::debug!("{}: failed while {}", self.name, self.state);
        self.state = LoadState::Unloaded;
        self.progress = 0.0;
        true
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: FnMut(&str, ResourceEvent) + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }
}
