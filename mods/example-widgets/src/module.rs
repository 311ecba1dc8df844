//! Example loadable code module.
//!
//! Exports the `lodestone_types` registration entry point and registers two
//! types: a constructed `TurretController` exposing the lifecycle-listener
//! capability, and a scene-resident `Billboard` that the host discovers
//! from its scene graph rather than constructing.

use std::sync::Arc;

use lodestone_core::instance::catalog::ModInstance;
use lodestone_core::instance::{InstanceKind, LifecycleListener, TypeCatalog, TypeEntry, UnitHandle};

/// A controller constructed once per load cycle.
pub struct TurretController {
    owner: String,
}

impl LifecycleListener for TurretController {
    fn on_loaded(&self, handle: &UnitHandle) {
        log::info!(
            "TurretController for '{}' ready (unit {} v{})",
            self.owner,
            handle.name,
            handle.version
        );
    }

    fn on_unloaded(&self) {
        log::info!("TurretController for '{}' shutting down", self.owner);
    }
}

/// Lives in the scene; never constructed by the registry.
pub struct Billboard {
    pub text: String,
}

impl LifecycleListener for Billboard {
    fn on_loaded(&self, _handle: &UnitHandle) {
        log::info!("Billboard '{}' active", self.text);
    }

    fn on_unloaded(&self) {}
}

fn build_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.register(
        TypeEntry::of::<TurretController>("TurretController", InstanceKind::Constructed)
            .with_constructor(|args| {
                Ok(Arc::new(TurretController {
                    owner: args.unit.id.clone(),
                }) as Arc<dyn ModInstance>)
            })
            .exposing::<dyn LifecycleListener>(|instance| {
                let turret = instance.as_any_arc().downcast::<TurretController>().ok();
                Box::new(turret.map(|t| t as Arc<dyn LifecycleListener>))
            }),
    );
    catalog.register(
        TypeEntry::of::<Billboard>("Billboard", InstanceKind::SceneResident)
            .exposing::<dyn LifecycleListener>(|instance| {
                let billboard = instance.as_any_arc().downcast::<Billboard>().ok();
                Box::new(billboard.map(|b| b as Arc<dyn LifecycleListener>))
            }),
    );
    catalog
}

/// Registration entry point called by the host's code loader. Ownership of
/// the catalog transfers to the caller.
#[no_mangle]
pub extern "C-unwind" fn lodestone_types() -> *mut TypeCatalog {
    Box::into_raw(Box::new(build_catalog()))
}
