//! # Lodestone Content Units
//!
//! A content unit ("mod") is one logical loadable package: a code resource,
//! an asset bundle, a scene bundle and its per-scene children, aggregated
//! behind a single lifecycle. This module owns the unit aggregation itself
//! ([`ContentUnit`]), the descriptor format ([`ModDescriptor`]), the code
//! sub-resource with its `libloading` entry point, and the collaborator
//! contracts for the opaque asset/scene bundles whose byte-level loading
//! lives outside the core.

pub mod bundle;
pub mod code;
pub mod content;
pub mod descriptor;
pub mod error;

pub use bundle::{Asset, BundleResource, ResourceProvider};
pub use code::{CodeLoader, CodeResource, DylibCodeLoader, LoadedModule, REGISTRATION_SYMBOL};
pub use content::{ContentUnit, PeerStates, UnitLayout};
pub use descriptor::{ContentKinds, ModDescriptor, Platform, PlatformSet};
pub use error::{CodeError, UnitError};

// Test module declaration
#[cfg(test)]
pub(crate) mod tests;
