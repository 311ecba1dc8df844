use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::instance::error::InstanceError;

/// Object trait for every runtime instance a mod's code can produce.
///
/// Blanket-implemented for all `Any + Send + Sync` types, so mod code does
/// not implement it by hand; it exists to let the registry move instances
/// around as `Arc<dyn ModInstance>` and downcast them behind capability
/// casts.
pub trait ModInstance: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> ModInstance for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// How instances of a registered type come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// Constructed once by the registry and cached for the load cycle.
    Constructed,
    /// Instances already live in the host's scene graph; the registry
    /// discovers them on every query and never caches them.
    SceneResident,
}

/// Identity of a loaded unit, handed to constructors and lifecycle
/// listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitHandle {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// Arguments made available to instance constructors.
#[derive(Debug, Clone)]
pub struct ConstructArgs {
    /// The unit the instance is being constructed for.
    pub unit: UnitHandle,
}

pub type ConstructFn =
    Arc<dyn Fn(&ConstructArgs) -> Result<Arc<dyn ModInstance>, InstanceError> + Send + Sync>;

/// Converts a type-erased instance into `Option<Arc<dyn C>>` (boxed) for one
/// capability `C`. Registered per (type, capability) pair.
pub type CastFn = fn(Arc<dyn ModInstance>) -> Box<dyn Any>;

/// One concrete type a code module exposes to the registry.
pub struct TypeEntry {
    type_id: TypeId,
    type_name: &'static str,
    kind: InstanceKind,
    construct: Option<ConstructFn>,
    casts: HashMap<TypeId, CastFn>,
}

impl TypeEntry {
    /// Register concrete type `T`. `type_name` must match the name the host
    /// scene graph knows scene-resident instances by.
    pub fn of<T: Any>(type_name: &'static str, kind: InstanceKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            kind,
            construct: None,
            casts: HashMap::new(),
        }
    }

    /// Declare the constructor used for [`InstanceKind::Constructed`] types.
    pub fn with_constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn(&ConstructArgs) -> Result<Arc<dyn ModInstance>, InstanceError> + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(construct));
        self
    }

    /// Declare that this type is queryable as capability `C`.
    ///
    /// The cast function downcasts the type-erased instance back to the
    /// concrete type and re-erases it as `Arc<dyn C>`, boxed as
    /// `Option<Arc<dyn C>>`:
    ///
    /// ```ignore
    /// TypeEntry::of::<Turret>("Turret", InstanceKind::Constructed)
    ///     .with_constructor(|args| Ok(Arc::new(Turret::new(args))))
    ///     .exposing::<dyn LifecycleListener>(|inst| {
    ///         let turret = inst.as_any_arc().downcast::<Turret>().ok();
    ///         Box::new(turret.map(|t| t as Arc<dyn LifecycleListener>))
    ///     })
    /// ```
    pub fn exposing<C: ?Sized + 'static>(mut self, cast: CastFn) -> Self {
        self.casts.insert(TypeId::of::<C>(), cast);
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> InstanceKind {
        self.kind
    }

    pub fn constructor(&self) -> Option<ConstructFn> {
        self.construct.clone()
    }

    /// The cast for capability `C`, if this type exposes it.
    pub fn cast_for(&self, capability: TypeId) -> Option<CastFn> {
        self.casts.get(&capability).copied()
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("has_constructor", &self.construct.is_some())
            .field("capability_count", &self.casts.len())
            .finish()
    }
}

/// Everything one loaded code module exposes: the explicit capability
/// provider list registered at load time.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    entries: Vec<TypeEntry>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, entry: TypeEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
