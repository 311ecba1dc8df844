//! # Lodestone Instance Registry
//!
//! A capability-based object registry scoped to one loaded unit. Host code
//! asks for "all live instances exposing capability `C`" without naming
//! concrete types; the registry resolves the query over the explicit
//! [`TypeCatalog`] lists each loaded code module registered, constructing
//! and caching at most one instance per concrete type, and special-casing
//! scene-resident types whose instances already live in the host's scene
//! graph.

pub mod catalog;
pub mod error;
pub mod listener;
pub mod registry;
pub mod scene;

pub use catalog::{
    CastFn, ConstructArgs, ConstructFn, InstanceKind, ModInstance, TypeCatalog, TypeEntry,
    UnitHandle,
};
pub use error::InstanceError;
pub use listener::LifecycleListener;
pub use registry::InstanceRegistry;
pub use scene::{EmptySceneGraph, SceneGraph};

// Test module declaration
#[cfg(test)]
mod tests;
