use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use crate::resource::Resource;

/// A piece of loaded content exposed by an asset or scene bundle.
///
/// The bytes behind an asset are the bundle collaborator's business; the
/// core only moves assets around as trait objects and downcasts on behalf
/// of the host query surface.
pub trait Asset: Any + Send + Sync {
    fn asset_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Contract for the opaque asset/scene bundle sub-resources.
///
/// Bundles are full [`Resource`]s (the unit drives their lifecycle through
/// that contract) plus a read surface that is only meaningful while the
/// bundle is `Loaded`.
pub trait BundleResource: Resource {
    /// Look up a top-level asset by name. Empty while not `Loaded`.
    fn asset(&self, name: &str) -> Option<Arc<dyn Asset>>;

    /// Names of every top-level asset. Empty while not `Loaded`.
    fn asset_names(&self) -> Vec<String>;

    /// Nested objects (components inside prefabs or scenes). Empty while
    /// not `Loaded`.
    fn components(&self) -> Vec<Arc<dyn Asset>> {
        Vec::new()
    }
}

/// Constructs the opaque sub-resources for a unit.
///
/// Byte-level loading lives entirely behind this seam; the core only relies
/// on the returned objects honouring the [`Resource`] contract.
pub trait ResourceProvider: Send + Sync {
    /// The asset bundle for `<id>.assets`.
    fn asset_bundle(&self, unit_id: &str, path: &Path) -> Box<dyn BundleResource>;

    /// The scene bundle for `<id>.scenes`.
    fn scene_bundle(&self, unit_id: &str, path: &Path) -> Box<dyn BundleResource>;

    /// Peek the scene names contained in a scenes bundle without loading
    /// it. Used for conflict detection and to create the per-scene
    /// children.
    fn scene_names(&self, path: &Path) -> Vec<String>;

    /// A loadable resource for one named scene inside the bundle.
    fn scene(&self, scene_name: &str, bundle_path: &Path) -> Box<dyn Resource>;
}
