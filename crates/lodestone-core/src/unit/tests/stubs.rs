// crates/lodestone-core/src/unit/tests/stubs.rs
//! Shared test doubles: cooperative stub bundles, a code loader that feeds
//! catalogs without touching dylibs, and fixture helpers for building units.
#![cfg(test)]

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use semver::Version;

use crate::config::ModSettings;
use crate::instance::catalog::ModInstance;
use crate::instance::{InstanceKind, LifecycleListener, TypeCatalog, TypeEntry, UnitHandle};
use crate::resource::{Lifecycle, LoadState, Resource, ResourceError};
use crate::unit::bundle::{Asset, BundleResource, ResourceProvider};
use crate::unit::code::{CodeLoader, LoadedModule};
use crate::unit::descriptor::{ContentKinds, ModDescriptor};
use crate::unit::error::CodeError;
use crate::unit::content::UnitLayout;

pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn record(journal: &Journal, entry: impl Into<String>) {
    journal.lock().unwrap().push(entry.into());
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Assets and bundles
// ---------------------------------------------------------------------------

pub(crate) struct StubAsset {
    name: String,
}

impl StubAsset {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl Asset for StubAsset {
    fn asset_name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A cooperative bundle that loads over a configurable number of ticks,
/// can be told to fail mid-load, and journals its transitions so tests can
/// assert sequencing.
pub(crate) struct StubBundle {
    lifecycle: Lifecycle,
    label: String,
    journal: Journal,
    ticks_to_load: u32,
    remaining: u32,
    fail_at_tick: Option<u32>,
    ticks_done: u32,
    loadable: bool,
    assets: Vec<Arc<dyn Asset>>,
    components: Vec<Arc<dyn Asset>>,
}

impl StubBundle {
    pub(crate) fn new(label: &str, ticks_to_load: u32, journal: Journal) -> Self {
        Self {
            lifecycle: Lifecycle::new(label),
            label: label.to_string(),
            journal,
            ticks_to_load,
            remaining: 0,
            fail_at_tick: None,
            ticks_done: 0,
            loadable: true,
            assets: Vec::new(),
            components: Vec::new(),
        }
    }

    pub(crate) fn failing_at(mut self, tick: u32) -> Self {
        self.fail_at_tick = Some(tick);
        self
    }

    pub(crate) fn unloadable(mut self) -> Self {
        self.loadable = false;
        self
    }

    pub(crate) fn with_asset(mut self, name: &str) -> Self {
        self.assets.push(StubAsset::new(name));
        self
    }

    pub(crate) fn with_component(mut self, name: &str) -> Self {
        self.components.push(StubAsset::new(name));
        self
    }
}

impl Resource for StubBundle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn can_load(&mut self) -> bool {
        self.loadable
    }

    fn load(&mut self) -> Result<(), ResourceError> {
        if !self.loadable || !self.lifecycle.begin_load() {
            return Ok(());
        }
        if self.fail_at_tick.is_some() {
            self.lifecycle.fail();
            record(&self.journal, format!("failed:{}", self.label));
            return Err(ResourceError::LoadFailed {
                resource: self.label.clone(),
                message: "stub failure".to_string(),
            });
        }
        record(&self.journal, format!("loaded:{}", self.label));
        self.lifecycle.finish_load();
        Ok(())
    }

    fn start_load(&mut self) {
        match self.lifecycle.state() {
            LoadState::Unloaded => {
                if self.loadable && self.lifecycle.begin_load() {
                    self.remaining = self.ticks_to_load;
                    self.ticks_done = 0;
                }
            }
            LoadState::Cancelling => {
                // Keep `remaining` as-is: partial progress survives resume.
                self.lifecycle.resume();
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loading => {
                self.ticks_done += 1;
                if let Some(fail_at) = self.fail_at_tick {
                    if self.ticks_done >= fail_at {
                        record(&self.journal, format!("failed:{}", self.label));
                        self.lifecycle.fail();
                        return;
                    }
                }
                if self.remaining > 0 {
                    self.remaining -= 1;
                }
                if self.ticks_to_load > 0 {
                    self.lifecycle
                        .set_progress(1.0 - self.remaining as f32 / self.ticks_to_load as f32);
                }
                if self.remaining == 0 {
                    record(&self.journal, format!("loaded:{}", self.label));
                    self.lifecycle.finish_load();
                }
            }
            LoadState::Cancelling => {
                record(&self.journal, format!("cancelled:{}", self.label));
                self.lifecycle.finish_cancel();
            }
            LoadState::Unloading => {
                record(&self.journal, format!("unloaded:{}", self.label));
                self.lifecycle.finish_unload();
            }
            _ => {}
        }
    }

    fn unload(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loaded => {
                self.lifecycle.begin_unload();
                record(&self.journal, format!("unloaded:{}", self.label));
                self.lifecycle.finish_unload();
            }
            LoadState::Loading => {
                self.lifecycle.begin_cancel();
            }
            _ => {}
        }
    }
}

impl BundleResource for StubBundle {
    fn asset(&self, name: &str) -> Option<Arc<dyn Asset>> {
        if self.lifecycle.state() != LoadState::Loaded {
            return None;
        }
        self.assets
            .iter()
            .find(|asset| asset.asset_name() == name)
            .cloned()
    }

    fn asset_names(&self) -> Vec<String> {
        if self.lifecycle.state() != LoadState::Loaded {
            return Vec::new();
        }
        self.assets
            .iter()
            .map(|asset| asset.asset_name().to_string())
            .collect()
    }

    fn components(&self) -> Vec<Arc<dyn Asset>> {
        if self.lifecycle.state() != LoadState::Loaded {
            return Vec::new();
        }
        self.components.clone()
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct StubProvider {
    pub ticks: u32,
    pub scene_names: Vec<String>,
    pub asset_names: Vec<String>,
    pub component_names: Vec<String>,
    pub fail_asset_bundle: bool,
    pub asset_bundle_unloadable: bool,
    pub journal: Journal,
}

impl StubProvider {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            ticks: 2,
            scene_names: Vec::new(),
            asset_names: Vec::new(),
            component_names: Vec::new(),
            fail_asset_bundle: false,
            asset_bundle_unloadable: false,
            journal,
        }
    }
}

impl ResourceProvider for StubProvider {
    fn asset_bundle(&self, unit_id: &str, _path: &Path) -> Box<dyn BundleResource> {
        let mut bundle = StubBundle::new(
            &format!("{}.assets", unit_id),
            self.ticks,
            Arc::clone(&self.journal),
        );
        for name in &self.asset_names {
            bundle = bundle.with_asset(name);
        }
        for name in &self.component_names {
            bundle = bundle.with_component(name);
        }
        if self.fail_asset_bundle {
            bundle = bundle.failing_at(1);
        }
        if self.asset_bundle_unloadable {
            bundle = bundle.unloadable();
        }
        Box::new(bundle)
    }

    fn scene_bundle(&self, unit_id: &str, _path: &Path) -> Box<dyn BundleResource> {
        let mut bundle = StubBundle::new(
            &format!("{}.scenes", unit_id),
            self.ticks,
            Arc::clone(&self.journal),
        );
        for name in &self.component_names {
            bundle = bundle.with_component(name);
        }
        Box::new(bundle)
    }

    fn scene_names(&self, _path: &Path) -> Vec<String> {
        self.scene_names.clone()
    }

    fn scene(&self, scene_name: &str, _bundle_path: &Path) -> Box<dyn Resource> {
        Box::new(StubBundle::new(
            &format!("scene:{}", scene_name),
            self.ticks,
            Arc::clone(&self.journal),
        ))
    }
}

// ---------------------------------------------------------------------------
// Code loader and test capability types
// ---------------------------------------------------------------------------

pub(crate) struct StubCodeLoader {
    factory: Arc<dyn Fn() -> TypeCatalog + Send + Sync>,
    reject: bool,
}

impl StubCodeLoader {
    pub(crate) fn new<F>(factory: F) -> Arc<Self>
    where
        F: Fn() -> TypeCatalog + Send + Sync + 'static,
    {
        Arc::new(Self {
            factory: Arc::new(factory),
            reject: false,
        })
    }

    pub(crate) fn empty() -> Arc<Self> {
        Self::new(TypeCatalog::new)
    }

    pub(crate) fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            factory: Arc::new(TypeCatalog::new),
            reject: true,
        })
    }
}

impl CodeLoader for StubCodeLoader {
    fn verify(&self, path: &Path) -> Result<(), CodeError> {
        if self.reject {
            return Err(CodeError::Rejected {
                path: path.to_path_buf(),
                reason: "stub verifier rejection".to_string(),
            });
        }
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LoadedModule, CodeError> {
        Ok(LoadedModule::new(
            path.to_path_buf(),
            (self.factory)(),
            None,
        ))
    }
}

/// Test capability used by registry and unit tests.
pub(crate) trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

pub(crate) struct Widget {
    pub journal: Journal,
}

impl Greeter for Widget {
    fn greet(&self) -> String {
        "widget".to_string()
    }
}

impl LifecycleListener for Widget {
    fn on_loaded(&self, handle: &UnitHandle) {
        record(&self.journal, format!("on_loaded:Widget:{}", handle.id));
    }

    fn on_unloaded(&self) {
        record(&self.journal, "on_unloaded:Widget");
    }
}

/// Scene-resident test type; instances come from the scene graph.
pub(crate) struct SceneProp {
    pub label: String,
}

impl Greeter for SceneProp {
    fn greet(&self) -> String {
        format!("prop:{}", self.label)
    }
}

/// A catalog registering `Widget` (constructed) and `SceneProp`
/// (scene-resident), both exposing `Greeter`; `Widget` also exposes the
/// lifecycle listener capability.
pub(crate) fn widget_catalog(journal: Journal) -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register(
        TypeEntry::of::<Widget>("Widget", InstanceKind::Constructed)
            .with_constructor(move |_args| {
                Ok(Arc::new(Widget {
                    journal: Arc::clone(&journal),
                }) as Arc<dyn ModInstance>)
            })
            .exposing::<dyn Greeter>(|instance| {
                let widget = instance.as_any_arc().downcast::<Widget>().ok();
                Box::new(widget.map(|w| w as Arc<dyn Greeter>))
            })
            .exposing::<dyn LifecycleListener>(|instance| {
                let widget = instance.as_any_arc().downcast::<Widget>().ok();
                Box::new(widget.map(|w| w as Arc<dyn LifecycleListener>))
            }),
    );
    catalog.register(
        TypeEntry::of::<SceneProp>("SceneProp", InstanceKind::SceneResident).exposing::<dyn Greeter>(
            |instance| {
                let prop = instance.as_any_arc().downcast::<SceneProp>().ok();
                Box::new(prop.map(|p| p as Arc<dyn Greeter>))
            },
        ),
    );
    catalog
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub(crate) fn descriptor(id: &str, content: ContentKinds) -> ModDescriptor {
    let mut descriptor = ModDescriptor::new(id, id, "1.0.0", "1.0.0");
    descriptor.content = content;
    descriptor
}

/// Create the unit's directory and placeholder files for whatever content
/// kinds the descriptor declares, so static checks pass.
pub(crate) fn layout_for(dir: &Path, descriptor: &ModDescriptor) -> UnitLayout {
    let root = dir.join(descriptor.path_id());
    std::fs::create_dir_all(&root).unwrap();
    let path_id = descriptor.path_id();

    let mut code_files: Vec<PathBuf> = Vec::new();
    if descriptor.content.contains(ContentKinds::CODE) {
        let code_path = root.join(format!("{}.so", path_id));
        std::fs::write(&code_path, b"").unwrap();
        code_files.push(code_path);
    }
    let asset_bundle = root.join(format!("{}.assets", path_id));
    if descriptor.content.contains(ContentKinds::ASSETS) {
        std::fs::write(&asset_bundle, b"").unwrap();
    }
    let scene_bundle = root.join(format!("{}.scenes", path_id));
    if descriptor.content.contains(ContentKinds::SCENES) {
        std::fs::write(&scene_bundle, b"").unwrap();
    }

    UnitLayout {
        descriptor_path: root.join("mod.json"),
        root,
        code_files,
        asset_bundle,
        scene_bundle,
    }
}

pub(crate) fn settings_with(
    provider: StubProvider,
    code_loader: Arc<dyn CodeLoader>,
) -> Arc<ModSettings> {
    let mut settings = ModSettings::new(Version::new(1, 0, 0), Arc::new(provider));
    settings.code_loader = code_loader;
    Arc::new(settings)
}
