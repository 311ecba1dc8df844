use crate::resource::error::ResourceError;
use crate::resource::lifecycle::Lifecycle;
use crate::resource::observer::{ResourceEvent, SubscriberId};
use crate::resource::state::LoadState;

/// Core trait every loadable unit implements.
///
/// A resource is driven either synchronously ([`load`](Resource::load)) or
/// cooperatively: [`start_load`](Resource::start_load) begins the operation
/// and the host's frame loop (or a test driver) calls
/// [`tick`](Resource::tick) until the resource stops reporting busy. There
/// is no separate cancel entry point: calling
/// [`unload`](Resource::unload) while the resource is `Loading` transitions
/// it to `Cancelling`, and subsequent ticks drive the rollback.
pub trait Resource: Send {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn name(&self) -> &str {
        self.lifecycle().name()
    }

    fn load_state(&self) -> LoadState {
        self.lifecycle().state()
    }

    /// Progress of the current operation in `[0, 1]`.
    fn load_progress(&self) -> f32 {
        self.lifecycle().progress()
    }

    fn is_busy(&self) -> bool {
        self.lifecycle().is_busy()
    }

    /// Gate re-evaluated on every query; loading is refused while false.
    fn can_load(&mut self) -> bool {
        true
    }

    /// Synchronous load. A no-op when [`can_load`](Resource::can_load) is
    /// false or the resource is not `Unloaded`.
    fn load(&mut self) -> Result<(), ResourceError>;

    /// Begin an asynchronous load. While the resource is `Cancelling` this
    /// resumes the interrupted load in place instead of restarting.
    fn start_load(&mut self);

    /// Drive one bounded increment of in-flight work. Called once per host
    /// tick; a no-op when the resource is not busy.
    fn tick(&mut self);

    /// Unload from `Loaded`, or cancel when called while `Loading`.
    /// Idempotent: calling on an `Unloaded` resource does nothing and fires
    /// no notification.
    fn unload(&mut self);

    fn subscribe(&mut self, observer: Box<dyn FnMut(&str, ResourceEvent) + Send>) -> SubscriberId {
        self.lifecycle_mut().subscribe(observer)
    }

    fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.lifecycle_mut().unsubscribe(id)
    }
}
