use std::any::TypeId;
use std::sync::Arc;

use crate::instance::catalog::{
    ConstructArgs, InstanceKind, ModInstance, TypeCatalog, TypeEntry,
};
use crate::instance::error::InstanceError;
use crate::instance::scene::SceneGraph;

/// Capability-based object cache scoped to one loaded unit.
///
/// Holds at most one live instance per concrete constructed type, in
/// construction order. Scene-resident instances pass through on every query
/// without entering the cache. The registry itself knows nothing about the
/// concrete types ahead of time; everything flows through the
/// [`TypeCatalog`] entries the unit's code modules registered at load time.
#[derive(Default)]
pub struct InstanceRegistry {
    cache: Vec<(TypeId, Arc<dyn ModInstance>)>,
}

impl std::fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("cache_len", &self.cache.len())
            .finish()
    }
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self { cache: Vec::new() }
    }

    /// Resolve all live instances exposing capability `C` across the given
    /// catalogs.
    ///
    /// Repeated queries within one load cycle return reference-identical
    /// instances for constructed types. Construction failures skip the
    /// single offending type: a missing constructor is a warning, anything
    /// else is logged as an error, and the query still returns the rest.
    pub fn instances_of<C: ?Sized + 'static>(
        &mut self,
        catalogs: &[&TypeCatalog],
        args: &ConstructArgs,
        scene: &dyn SceneGraph,
    ) -> Vec<Arc<C>> {
        let capability = TypeId::of::<C>();
        let mut result = Vec::new();

        for catalog in catalogs {
            for entry in catalog.entries() {
                let Some(cast) = entry.cast_for(capability) else {
                    continue;
                };

                if entry.kind() == InstanceKind::SceneResident {
                    for instance in scene.active_instances(entry.type_name()) {
                        push_cast::<C>(&mut result, cast, instance, entry);
                    }
                    continue;
                }

                let instance = match self.cached(entry.type_id()) {
                    Some(instance) => instance,
                    None => match self.construct(entry, args) {
                        Some(instance) => instance,
                        None => continue,
                    },
                };
                push_cast::<C>(&mut result, cast, instance, entry);
            }
        }

        result
    }

    /// Cached constructed instances, in construction order.
    pub fn cached_instances(&self) -> impl Iterator<Item = &Arc<dyn ModInstance>> {
        self.cache.iter().map(|(_, instance)| instance)
    }

    /// The cached instances that expose capability `C`, in construction
    /// order. Unlike [`instances_of`](Self::instances_of) this never
    /// constructs or discovers anything; it is the view used to notify
    /// already-registered instances.
    pub fn cached_as<C: ?Sized + 'static>(&self, catalogs: &[&TypeCatalog]) -> Vec<Arc<C>> {
        let capability = TypeId::of::<C>();
        let mut result = Vec::new();
        for (type_id, instance) in &self.cache {
            let entry = catalogs
                .iter()
                .flat_map(|catalog| catalog.entries())
                .find(|entry| entry.type_id() == *type_id);
            if let Some(entry) = entry {
                if let Some(cast) = entry.cast_for(capability) {
                    push_cast::<C>(&mut result, cast, Arc::clone(instance), entry);
                }
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached instance, ending the load cycle's identity
    /// guarantee.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn cached(&self, type_id: TypeId) -> Option<Arc<dyn ModInstance>> {
        self.cache
            .iter()
            .find(|(id, _)| *id == type_id)
            .map(|(_, instance)| Arc::clone(instance))
    }

    fn construct(
        &mut self,
        entry: &TypeEntry,
        args: &ConstructArgs,
    ) -> Option<Arc<dyn ModInstance>> {
        let Some(construct) = entry.constructor() else {
            log::warn!(
                "type '{}' has no matching constructor, skipping",
                entry.type_name()
            );
            return None;
        };
        match construct(args) {
            Ok(instance) => {
                self.cache.push((entry.type_id(), Arc::clone(&instance)));
                Some(instance)
            }
            Err(InstanceError::NoConstructor { type_name }) => {
                log::warn!("no matching constructor for type '{}', skipping", type_name);
                None
            }
            Err(err) => {
                log::error!("failed to construct '{}': {}", entry.type_name(), err);
                None
            }
        }
    }
}

fn push_cast<C: ?Sized + 'static>(
    result: &mut Vec<Arc<C>>,
    cast: crate::instance::catalog::CastFn,
    instance: Arc<dyn ModInstance>,
    entry: &TypeEntry,
) {
    match cast(instance).downcast::<Option<Arc<C>>>() {
        Ok(boxed) => {
            if let Some(capability) = *boxed {
                result.push(capability);
            } else {
                log::error!(
                    "capability cast for type '{}' did not match its instance",
                    entry.type_name()
                );
            }
        }
        Err(_) => {
            log::error!(
                "capability cast for type '{}' returned an unexpected payload",
                entry.type_name()
            );
        }
    }
}
