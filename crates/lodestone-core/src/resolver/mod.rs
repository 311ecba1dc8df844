//! # Lodestone Dependency & Conflict Resolution
//!
//! Pure resolution passes over the known-unit set. Both passes operate on
//! [`ResolutionView`] snapshots rather than the units themselves so that the
//! manager can re-run them for the *full* set after any change: adding,
//! removing or toggling one unit can flip satisfaction and conflict status
//! for every other unit, so incremental updates are deliberately not
//! offered. The manager applies the results back onto each unit through its
//! explicit update calls; no unit ever mutates another.

pub mod conflict;
pub mod dependency;

pub use conflict::detect_conflicts;
pub use dependency::{DependencyReport, resolve_dependencies};

/// Snapshot of the unit fields the resolution passes read.
#[derive(Debug, Clone)]
pub struct ResolutionView {
    pub id: String,
    pub enabled: bool,
    pub valid: bool,
    /// Declared dependency ids.
    pub dependencies: Vec<String>,
    /// File names (not paths) of the unit's code binaries.
    pub code_files: Vec<String>,
    /// Names of the unit's scenes.
    pub scene_names: Vec<String>,
}

// Test module declaration
#[cfg(test)]
mod tests;
