//! # Lodestone Core
//!
//! Runtime lifecycle management for dynamically-discovered "mod" packages:
//! units of content (compiled code, scene data, asset data) that a host
//! application loads, unloads, reloads and queries for validity at runtime,
//! independent of its own build.
//!
//! The heart of the crate is a hierarchical, cancellable, cooperative
//! state machine ([`resource`]) composed by [`unit::ContentUnit`], which
//! aggregates heterogeneous sub-resources into one logical unit, tracks
//! validity under dynamic conditions (missing files, incompatible
//! binaries, unmet dependencies, identifier collisions) via [`resolver`],
//! and exposes a capability-based object registry ([`instance`]) so host
//! code can observe a mod's running instances without knowing their
//! concrete types ahead of time. [`manager::ModManager`] ties it together
//! over a discovery root.

pub mod config;
pub mod error;
pub mod instance;
pub mod manager;
pub mod resolver;
pub mod resource;
pub mod unit;

// Re-export key public types for easier use by hosts and loaded code
pub use config::{HostHooks, ModSettings};
pub use error::{Error, Result};
pub use instance::{
    ConstructArgs, InstanceKind, InstanceRegistry, LifecycleListener, SceneGraph, TypeCatalog,
    TypeEntry, UnitHandle,
};
pub use manager::ModManager;
pub use resource::{LoadState, Resource, ResourceEvent};
pub use unit::{ContentKinds, ContentUnit, ModDescriptor, PeerStates, Platform, PlatformSet};
