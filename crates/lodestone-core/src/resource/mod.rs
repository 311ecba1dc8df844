//! # Lodestone Resource Lifecycle
//!
//! The base lifecycle abstraction every loadable unit builds on: a small
//! state machine (`Unloaded → Loading → Loaded`, with unloading and
//! cancellation paths), a clamped progress value, and a per-resource
//! observer list with at-most-once delivery per transition.
//!
//! Asynchronous loading is cooperative: an operation is started with
//! [`Resource::start_load`] and driven by repeated [`Resource::tick`] calls
//! from the host's frame loop. Requesting [`Resource::unload`] mid-load
//! cancels in flight; requesting a load again while the cancellation is
//! still settling resumes in place.

pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod state;
pub mod traits;

pub use error::ResourceError;
pub use lifecycle::Lifecycle;
pub use observer::{ObserverSet, ResourceEvent, SubscriberId};
pub use state::LoadState;
pub use traits::Resource;

// Test module declaration
#[cfg(test)]
mod tests;
