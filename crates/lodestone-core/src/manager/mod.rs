//! # Lodestone Mod Manager
//!
//! The orchestrator around the core: it owns the process-wide known-unit
//! set and the id index, rebuilds them from a discovery root, and re-runs
//! the full dependency/conflict resolution pass whenever the set changes.
//! Cross-unit effects flow exclusively through the resolution pass's update
//! calls and through the peer-state snapshots the manager hands each unit's
//! gate. No unit ever touches another unit's fields.

pub mod discovery;
pub mod error;

pub use error::ManagerError;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ModSettings;
use crate::resolver::{self, ResolutionView};
use crate::resource::LoadState;
use crate::unit::descriptor::ModDescriptor;
use crate::unit::content::{ContentUnit, PeerStates, UnitLayout};

/// Owns every known [`ContentUnit`] and drives discovery, resolution and
/// lifecycle entry points.
pub struct ModManager {
    settings: Arc<ModSettings>,
    root: Option<PathBuf>,
    units: HashMap<String, ContentUnit>,
}

impl ModManager {
    pub fn new(settings: ModSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            root: None,
            units: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &Arc<ModSettings> {
        &self.settings
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Rescan the discovery root: every existing unit is destroyed, the
    /// directory is walked again and the resolution pass runs over the
    /// rebuilt set. Returns the number of discovered units.
    pub async fn scan(&mut self, root: impl Into<PathBuf>) -> Result<usize, ManagerError> {
        let root = root.into();
        let discovered = discovery::scan_units(&root, &self.settings).await?;

        self.units.clear();
        for (descriptor, layout) in discovered {
            self.insert(ContentUnit::new(
                descriptor,
                layout,
                Arc::clone(&self.settings),
            ));
        }
        self.root = Some(root);
        self.refresh();
        Ok(self.units.len())
    }

    /// Register a unit built outside discovery and re-resolve.
    pub fn add_unit(&mut self, descriptor: ModDescriptor, layout: UnitLayout) {
        self.insert(ContentUnit::new(
            descriptor,
            layout,
            Arc::clone(&self.settings),
        ));
        self.refresh();
    }

    /// Remove a unit from the known set and re-resolve.
    pub fn remove_unit(&mut self, id: &str) -> Option<ContentUnit> {
        let removed = self.units.remove(id);
        if removed.is_some() {
            self.refresh();
        }
        removed
    }

    pub fn unit(&self, id: &str) -> Option<&ContentUnit> {
        self.units.get(id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut ContentUnit> {
        self.units.get_mut(id)
    }

    pub fn units(&self) -> impl Iterator<Item = &ContentUnit> {
        self.units.values()
    }

    /// Known unit ids, sorted.
    pub fn unit_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.units.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Re-run dependency resolution and conflict detection for the full
    /// set. Non-incremental on purpose: one changed unit can flip the
    /// status of every other.
    pub fn refresh(&mut self) {
        let views: Vec<ResolutionView> = self.units.values().map(resolution_view).collect();
        let index: HashMap<&str, &ResolutionView> =
            views.iter().map(|view| (view.id.as_str(), view)).collect();

        let reports: Vec<_> = views
            .iter()
            .map(|view| {
                (
                    view.id.clone(),
                    resolver::resolve_dependencies(view, &index),
                )
            })
            .collect();
        drop(index);
        let mut conflicts = resolver::detect_conflicts(&views);

        for (id, report) in reports {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.update_dependencies(report);
                if let Some(conflicting) = conflicts.remove(&id) {
                    unit.update_conflicts(conflicting);
                }
            }
        }
    }

    /// Evaluate a unit's load gate against a fresh peer-state snapshot.
    pub fn can_load(&mut self, id: &str) -> bool {
        let peers = self.peer_states(id);
        match self.units.get_mut(id) {
            Some(unit) => unit.can_load(&peers),
            None => false,
        }
    }

    /// Synchronously load a unit. A refused gate is a silent no-op.
    pub fn load(&mut self, id: &str) {
        let peers = self.peer_states(id);
        if let Some(unit) = self.units.get_mut(id) {
            unit.load(&peers);
        }
    }

    /// Begin (or resume) an asynchronous load for a unit.
    pub fn start_load(&mut self, id: &str) {
        let peers = self.peer_states(id);
        if let Some(unit) = self.units.get_mut(id) {
            unit.start_load(&peers);
        }
    }

    /// Drive every busy unit one increment. Call once per host frame.
    pub fn tick(&mut self) {
        for unit in self.units.values_mut() {
            if unit.is_busy() {
                unit.tick();
            }
        }
    }

    /// Unload (or cancel) a unit.
    pub fn unload(&mut self, id: &str) {
        if let Some(unit) = self.units.get_mut(id) {
            unit.unload();
        }
    }

    /// Toggle a unit, write its descriptor back and re-resolve; toggling
    /// can change dependency satisfaction for every other unit.
    pub async fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), ManagerError> {
        let unit = self
            .units
            .get_mut(id)
            .ok_or_else(|| ManagerError::UnknownUnit(id.to_string()))?;
        unit.set_enabled(enabled);
        unit.save_descriptor().await?;
        log::info!("unit '{}' {}", id, if enabled { "enabled" } else { "disabled" });
        self.refresh();
        Ok(())
    }

    fn insert(&mut self, unit: ContentUnit) {
        let id = unit.id().to_string();
        if self.units.contains_key(&id) {
            log::warn!("duplicate unit id '{}', keeping the first", id);
            return;
        }
        self.units.insert(id, unit);
    }

    /// Snapshot the load states the unit's conflict gate needs.
    fn peer_states(&self, id: &str) -> PeerStates {
        let mut peers = PeerStates::new();
        if let Some(unit) = self.units.get(id) {
            for other_id in unit.conflicting_units() {
                let state = self
                    .units
                    .get(other_id)
                    .map(|other| other.load_state())
                    .unwrap_or(LoadState::Unloaded);
                peers.insert(other_id.clone(), state);
            }
        }
        peers
    }
}

impl std::fmt::Debug for ModManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModManager")
            .field("root", &self.root)
            .field("unit_count", &self.units.len())
            .finish_non_exhaustive()
    }
}

fn resolution_view(unit: &ContentUnit) -> ResolutionView {
    ResolutionView {
        id: unit.id().to_string(),
        enabled: unit.descriptor().enabled,
        valid: unit.is_valid(),
        dependencies: unit.descriptor().dependencies.clone(),
        code_files: unit.code_file_names(),
        scene_names: unit.scene_names().to_vec(),
    }
}
