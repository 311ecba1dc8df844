use std::any::Any;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ModSettings;
use crate::instance::{ConstructArgs, InstanceRegistry, LifecycleListener, UnitHandle};
use crate::resolver::DependencyReport;
use crate::resource::{Lifecycle, LoadState, Resource, ResourceEvent, SubscriberId};
use crate::unit::bundle::{Asset, BundleResource};
use crate::unit::code::CodeResource;
use crate::unit::descriptor::{ContentKinds, ModDescriptor};

/// On-disk locations of a unit's parts, produced by discovery.
#[derive(Debug, Clone)]
pub struct UnitLayout {
    /// The unit's directory.
    pub root: PathBuf,
    /// The descriptor file inside `root`.
    pub descriptor_path: PathBuf,
    /// Code binaries found by the configured filter, in directory order.
    pub code_files: Vec<PathBuf>,
    /// Expected `<id>.assets` bundle path.
    pub asset_bundle: PathBuf,
    /// Expected `<id>.scenes` bundle path.
    pub scene_bundle: PathBuf,
}

/// Load states of other known units, captured just before a gate check.
///
/// The conflict side of `can_load` depends on whether conflicting units are
/// currently loaded, dynamic state the unit cannot observe on its own
/// since no unit may reach into another. The manager snapshots what the
/// gate needs into this map.
#[derive(Debug, Clone, Default)]
pub struct PeerStates(HashMap<String, LoadState>);

impl PeerStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit_id: impl Into<String>, state: LoadState) {
        self.0.insert(unit_id.into(), state);
    }

    /// Unknown units read as `Unloaded`.
    pub fn state_of(&self, unit_id: &str) -> LoadState {
        self.0.get(unit_id).copied().unwrap_or(LoadState::Unloaded)
    }
}

/// A "mod": one logical loadable unit aggregating a code resource, an asset
/// bundle, a scene bundle and that bundle's per-scene children.
///
/// The unit owns its sub-resources exclusively and composes their
/// lifecycles: code loads eagerly and synchronously (instance discovery
/// needs the complete type universe), bundles and scenes load concurrently
/// on the cooperative scheduler, and composite progress is the mean over
/// the sub-resources that can currently load. Validity is sticky: once a
/// static check fails the unit stays invalid until it is rebuilt by a
/// rescan, and `is_valid == false` forces `can_load == false`
/// unconditionally.
///
/// Failures inside sub-resources never escape this boundary: they are
/// converted to invalid/unloaded state plus a logged diagnostic.
pub struct ContentUnit {
    lifecycle: Lifecycle,
    descriptor: ModDescriptor,
    layout: UnitLayout,
    settings: Arc<ModSettings>,

    code: CodeResource,
    asset_bundle: Option<Box<dyn BundleResource>>,
    scene_bundle: Option<Box<dyn BundleResource>>,
    scenes: Vec<Box<dyn Resource>>,
    scene_names: Vec<String>,

    valid: bool,
    invalid_reason: Option<String>,
    conflicting: HashSet<String>,
    dependencies: DependencyReport,
    instances: InstanceRegistry,
    /// Which sub-resources (in `for_each_sub` order) the current load
    /// attempt actually started; the aggregate completes when all of them
    /// report `Loaded`.
    started_subs: Vec<bool>,
}

impl ContentUnit {
    pub fn new(descriptor: ModDescriptor, layout: UnitLayout, settings: Arc<ModSettings>) -> Self {
        let code = CodeResource::new(
            &descriptor.id,
            layout.code_files.clone(),
            Arc::clone(&settings.code_loader),
        );

        let asset_bundle = descriptor
            .content
            .contains(ContentKinds::ASSETS)
            .then(|| settings.provider.asset_bundle(&descriptor.id, &layout.asset_bundle));

        let (scene_bundle, scene_names, scenes) =
            if descriptor.content.contains(ContentKinds::SCENES) {
                let bundle = settings
                    .provider
                    .scene_bundle(&descriptor.id, &layout.scene_bundle);
                let names = settings.provider.scene_names(&layout.scene_bundle);
                let scenes = names
                    .iter()
                    .map(|name| settings.provider.scene(name, &layout.scene_bundle))
                    .collect();
                (Some(bundle), names, scenes)
            } else {
                (None, Vec::new(), Vec::new())
            };

        Self {
            lifecycle: Lifecycle::new(descriptor.id.clone()),
            descriptor,
            layout,
            settings,
            code,
            asset_bundle,
            scene_bundle,
            scenes,
            scene_names,
            valid: true,
            invalid_reason: None,
            conflicting: HashSet::new(),
            dependencies: DependencyReport::default(),
            instances: InstanceRegistry::new(),
            started_subs: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ModDescriptor {
        &self.descriptor
    }

    pub fn layout(&self) -> &UnitLayout {
        &self.layout
    }

    pub fn load_state(&self) -> LoadState {
        self.lifecycle.state()
    }

    pub fn load_progress(&self) -> f32 {
        self.lifecycle.progress()
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.is_busy()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }

    /// Ids of other units this unit collides with, per the last conflict
    /// pass.
    pub fn conflicting_units(&self) -> &HashSet<String> {
        &self.conflicting
    }

    /// Result of the last dependency pass.
    pub fn dependency_report(&self) -> &DependencyReport {
        &self.dependencies
    }

    pub fn scene_names(&self) -> &[String] {
        &self.scene_names
    }

    /// File names of the unit's code binaries, used for conflict checks.
    pub fn code_file_names(&self) -> Vec<String> {
        self.code.file_names()
    }

    pub fn handle(&self) -> UnitHandle {
        UnitHandle {
            id: self.descriptor.id.clone(),
            name: self.descriptor.name.clone(),
            version: self.descriptor.version.clone(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.descriptor.enabled = enabled;
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: FnMut(&str, ResourceEvent) + Send + 'static,
    {
        self.lifecycle.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.lifecycle.unsubscribe(id)
    }

    /// Permanently mark the unit invalid. Reported once; an invalid unit
    /// can never load again without being rebuilt by a rescan.
    pub fn invalidate(&mut self, reason: impl Into<String>) {
        if !self.valid {
            return;
        }
        let reason = reason.into();
        log::warn!("unit '{}' is invalid: {}", self.descriptor.id, reason);
        self.valid = false;
        self.invalid_reason = Some(reason);
        if self.lifecycle.state() != LoadState::Unloaded {
            self.unload();
        }
    }

    /// Apply the outcome of a dependency pass, logging each diagnostic.
    pub fn update_dependencies(&mut self, report: DependencyReport) {
        for missing in &report.missing {
            log::warn!(
                "unit '{}': required dependency '{}' was not found",
                self.descriptor.id,
                missing
            );
        }
        for disabled in &report.found_disabled {
            log::warn!(
                "unit '{}': dependency '{}' is present but disabled",
                self.descriptor.id,
                disabled
            );
        }
        self.dependencies = report;
    }

    /// Apply the outcome of a conflict pass.
    pub fn update_conflicts(&mut self, conflicting: HashSet<String>) {
        self.conflicting = conflicting;
    }

    /// The load gate, re-evaluated on every query: static file/platform
    /// checks, then dependency satisfaction, then the conflict check
    /// against the peers snapshot. `is_valid == false` forces false.
    pub fn can_load(&mut self, peers: &PeerStates) -> bool {
        self.run_static_checks();
        self.valid && self.dependencies.satisfied() && !self.conflicting_unit_loaded(peers)
    }

    /// True iff any conflicting unit is currently anything but `Unloaded`.
    pub fn conflicting_unit_loaded(&self, peers: &PeerStates) -> bool {
        self.conflicting
            .iter()
            .any(|id| peers.state_of(id) != LoadState::Unloaded)
    }

    fn run_static_checks(&mut self) {
        if !self.valid {
            return;
        }
        if !self.descriptor.platforms.supports(self.settings.platform) {
            self.invalidate(format!(
                "platform '{}' is not supported",
                self.settings.platform
            ));
            return;
        }
        match self.descriptor.host_requirement() {
            Ok(requirement) => {
                if !requirement.matches(&self.settings.host_version) {
                    self.invalidate(format!(
                        "requires host '{}', running '{}'",
                        self.descriptor.host_version, self.settings.host_version
                    ));
                    return;
                }
            }
            Err(err) => {
                self.invalidate(format!(
                    "unparsable host version '{}': {}",
                    self.descriptor.host_version, err
                ));
                return;
            }
        }
        if self.descriptor.content.contains(ContentKinds::CODE) {
            if self.layout.code_files.is_empty() {
                self.invalidate("declares code but no code files were found");
                return;
            }
            if let Some(missing) = self.layout.code_files.iter().find(|p| !p.exists()) {
                self.invalidate(format!("code file missing: {}", missing.display()));
                return;
            }
        }
        if self.descriptor.content.contains(ContentKinds::ASSETS)
            && !self.layout.asset_bundle.exists()
        {
            self.invalidate(format!(
                "asset bundle missing: {}",
                self.layout.asset_bundle.display()
            ));
            return;
        }
        if self.descriptor.content.contains(ContentKinds::SCENES)
            && !self.layout.scene_bundle.exists()
        {
            self.invalidate(format!(
                "scene bundle missing: {}",
                self.layout.scene_bundle.display()
            ));
        }
    }

    /// Synchronous load. Fails silently (no-op, state unchanged) when the
    /// gate refuses.
    pub fn load(&mut self, peers: &PeerStates) {
        if !self.can_load(peers) || !self.lifecycle.begin_load() {
            return;
        }
        match self.load_sub_resources_sync() {
            Ok(()) => self.complete_load(),
            Err(message) => self.absorb_failure(message),
        }
    }

    /// Begin an asynchronous load, or resume one that is mid-cancel.
    /// Progress then advances on every [`tick`](Self::tick).
    pub fn start_load(&mut self, peers: &PeerStates) {
        match self.lifecycle.state() {
            LoadState::Unloaded => {
                if !self.can_load(peers) || !self.lifecycle.begin_load() {
                    return;
                }
                // Code first, eagerly: everything downstream needs the
                // loaded type universe.
                if self.code.can_load() {
                    self.code.start_load();
                    if self.code.load_state() != LoadState::Loaded {
                        self.absorb_failure("code failed to load".to_string());
                        return;
                    }
                }
                self.for_each_content_sub(|sub| {
                    if sub.can_load() {
                        sub.start_load();
                    }
                });
                self.record_started_subs();
                self.refresh_progress();
            }
            LoadState::Cancelling => {
                // Resume in place rather than restarting; sub-resources
                // still mid-cancel pick their loads back up.
                self.lifecycle.resume();
                self.code.start_load();
                self.for_each_content_sub(|sub| {
                    if sub.can_load() {
                        sub.start_load();
                    }
                });
                self.record_started_subs();
            }
            _ => {}
        }
    }

    /// A sub-resource counts as started when issuing the loads left it in
    /// any state but `Unloaded`; a started-and-failed one is told apart
    /// from a never-started one by these flags, not by state.
    fn record_started_subs(&mut self) {
        let mut started = Vec::new();
        self.for_each_sub(|sub| started.push(sub.load_state() != LoadState::Unloaded));
        self.started_subs = started;
    }

    /// Drive one increment of in-flight work. Called once per host tick.
    pub fn tick(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loading => {
                self.for_each_sub(|sub| {
                    if sub.is_busy() {
                        sub.tick();
                    }
                });
                self.refresh_progress();
                if let Some(message) = self.failed_sub_resource() {
                    self.absorb_failure(message);
                    return;
                }
                if self.all_included_loaded() {
                    self.complete_load();
                }
            }
            LoadState::Cancelling => {
                self.for_each_sub(|sub| {
                    if sub.is_busy() {
                        sub.tick();
                    }
                });
                if !self.any_sub_busy() {
                    self.release_content();
                    self.lifecycle.finish_cancel();
                }
            }
            LoadState::Unloading => {
                self.for_each_sub(|sub| {
                    if sub.is_busy() {
                        sub.tick();
                    }
                });
                if !self.any_sub_busy() {
                    self.lifecycle.finish_unload();
                }
            }
            _ => {}
        }
    }

    /// Unload from `Loaded`, or cancel when called while `Loading`.
    /// Idempotent from `Unloaded`.
    pub fn unload(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loaded => {
                self.lifecycle.begin_unload();
                self.notify_unloading();
                self.release_content();
                self.settings.hooks.sweep_unused_resources();
                if !self.any_sub_busy() {
                    self.lifecycle.finish_unload();
                }
            }
            LoadState::Loading => {
                self.lifecycle.begin_cancel();
                self.for_each_sub(|sub| sub.unload());
            }
            _ => {}
        }
    }

    /// Resolve all live instances exposing capability `C`. Empty unless the
    /// unit is `Loaded`.
    pub fn instances_of<C: ?Sized + 'static>(&mut self) -> Vec<Arc<C>> {
        if self.lifecycle.state() != LoadState::Loaded {
            return Vec::new();
        }
        let args = ConstructArgs {
            unit: UnitHandle {
                id: self.descriptor.id.clone(),
                name: self.descriptor.name.clone(),
                version: self.descriptor.version.clone(),
            },
        };
        let catalogs = self.code.catalogs();
        self.instances
            .instances_of::<C>(&catalogs, &args, self.settings.scene_graph.as_ref())
    }

    /// Look up a loaded asset by name. `None` unless the asset bundle is
    /// `Loaded`.
    pub fn asset(&self, name: &str) -> Option<Arc<dyn Asset>> {
        let bundle = self.loaded_asset_bundle()?;
        bundle.asset(name)
    }

    /// Typed asset lookup.
    pub fn asset_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.asset(name)
            .and_then(|asset| asset.as_any_arc().downcast::<T>().ok())
    }

    /// Every loaded asset downcastable to `T`.
    pub fn assets_of<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        let Some(bundle) = self.loaded_asset_bundle() else {
            return Vec::new();
        };
        bundle
            .asset_names()
            .iter()
            .filter_map(|name| bundle.asset(name))
            .filter_map(|asset| asset.as_any_arc().downcast::<T>().ok())
            .collect()
    }

    /// Components of type `T` inside the unit's prefabs (asset bundle
    /// content only).
    pub fn components_in_prefabs<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        Self::downcast_components(self.loaded_asset_bundle())
    }

    /// Components of type `T` inside the unit's scenes (scene bundle
    /// content only).
    pub fn components_in_scenes<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        Self::downcast_components(self.loaded_scene_bundle())
    }

    /// Write the descriptor back to its file.
    pub async fn save_descriptor(&self) -> Result<(), crate::unit::error::UnitError> {
        self.descriptor.save(&self.layout.descriptor_path).await
    }

    fn downcast_components<T: Any + Send + Sync>(
        bundle: Option<&dyn BundleResource>,
    ) -> Vec<Arc<T>> {
        let Some(bundle) = bundle else {
            return Vec::new();
        };
        bundle
            .components()
            .into_iter()
            .filter_map(|asset| asset.as_any_arc().downcast::<T>().ok())
            .collect()
    }

    fn loaded_asset_bundle(&self) -> Option<&dyn BundleResource> {
        self.asset_bundle
            .as_deref()
            .filter(|bundle| bundle.load_state() == LoadState::Loaded)
    }

    fn loaded_scene_bundle(&self) -> Option<&dyn BundleResource> {
        self.scene_bundle
            .as_deref()
            .filter(|bundle| bundle.load_state() == LoadState::Loaded)
    }

    fn load_sub_resources_sync(&mut self) -> Result<(), String> {
        let mut failure = None;
        if self.code.can_load() {
            if let Err(err) = self.code.load() {
                return Err(err.to_string());
            }
        }
        self.for_each_content_sub(|sub| {
            if failure.is_none() && sub.can_load() {
                if let Err(err) = sub.load() {
                    failure = Some(err.to_string());
                }
            }
        });
        match failure {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }

    fn complete_load(&mut self) {
        self.lifecycle.finish_load();
        let handle = self.handle();
        for listener in self.instances_of::<dyn LifecycleListener>() {
            listener.on_loaded(&handle);
        }
    }

    /// Ordered unload notification: every already-registered instance that
    /// exposes the listener capability hears about the impending unload
    /// before anything is released.
    fn notify_unloading(&mut self) {
        let catalogs = self.code.catalogs();
        for listener in self.instances.cached_as::<dyn LifecycleListener>(&catalogs) {
            listener.on_unloaded();
        }
    }

    /// Release order: scenes, then the instance cache and code handles,
    /// then the bundles.
    fn release_content(&mut self) {
        for scene in &mut self.scenes {
            scene.unload();
        }
        self.instances.clear();
        self.code.unload();
        if let Some(bundle) = self.asset_bundle.as_mut() {
            bundle.unload();
        }
        if let Some(bundle) = self.scene_bundle.as_mut() {
            bundle.unload();
        }
    }

    fn absorb_failure(&mut self, message: String) {
        log::error!("unit '{}' failed to load: {}", self.descriptor.id, message);
        self.for_each_sub(|sub| sub.unload());
        // Bounded drain for sub-resources that roll back cooperatively.
        let mut remaining = 64;
        while self.any_sub_busy() && remaining > 0 {
            self.for_each_sub(|sub| {
                if sub.is_busy() {
                    sub.tick();
                }
            });
            remaining -= 1;
        }
        self.release_content();
        self.lifecycle.fail();
        self.invalidate(message);
    }

    /// Composite progress: the mean over sub-resources whose gate is open
    /// at this poll; sub-resources that cannot load are excluded entirely
    /// rather than scored as zero.
    fn refresh_progress(&mut self) {
        let mut total = 0.0f32;
        let mut included = 0u32;
        self.for_each_sub(|sub| {
            if sub.can_load() {
                total += sub.load_progress();
                included += 1;
            }
        });
        if included > 0 {
            self.lifecycle.set_progress(total / included as f32);
        } else {
            self.lifecycle.set_progress(0.0);
        }
    }

    fn all_included_loaded(&mut self) -> bool {
        let started = std::mem::take(&mut self.started_subs);
        let mut index = 0usize;
        let mut all_loaded = true;
        self.for_each_sub(|sub| {
            if started.get(index).copied().unwrap_or(false)
                && sub.load_state() != LoadState::Loaded
            {
                all_loaded = false;
            }
            index += 1;
        });
        self.started_subs = started;
        all_loaded
    }

    fn any_sub_busy(&mut self) -> bool {
        let mut busy = false;
        self.for_each_sub(|sub| {
            if sub.is_busy() {
                busy = true;
            }
        });
        busy
    }

    /// A started sub-resource that fell back to `Unloaded` mid-load failed.
    fn failed_sub_resource(&mut self) -> Option<String> {
        let started = std::mem::take(&mut self.started_subs);
        let mut index = 0usize;
        let mut failed = None;
        self.for_each_sub(|sub| {
            if failed.is_none()
                && started.get(index).copied().unwrap_or(false)
                && !sub.is_busy()
                && sub.load_state() == LoadState::Unloaded
            {
                failed = Some(format!("sub-resource '{}' failed to load", sub.name()));
            }
            index += 1;
        });
        self.started_subs = started;
        failed
    }

    fn for_each_sub(&mut self, mut f: impl FnMut(&mut dyn Resource)) {
        f(&mut self.code);
        self.for_each_content_sub(f);
    }

    fn for_each_content_sub(&mut self, mut f: impl FnMut(&mut dyn Resource)) {
        if let Some(bundle) = self.asset_bundle.as_mut() {
            f(&mut **bundle);
        }
        if let Some(bundle) = self.scene_bundle.as_mut() {
            f(&mut **bundle);
        }
        for scene in &mut self.scenes {
            f(&mut **scene);
        }
    }
}

impl std::fmt::Debug for ContentUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentUnit")
            .field("id", &self.descriptor.id)
            .field("state", &self.lifecycle.state())
            .field("valid", &self.valid)
            .field("conflicting", &self.conflicting)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
