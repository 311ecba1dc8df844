use std::sync::Arc;

use crate::instance::catalog::ModInstance;

/// Collaborator contract onto the host's live scene graph.
///
/// Scene-resident types are never constructed or cached by the registry:
/// their count and identity are owned by the scene, so the registry
/// re-discovers them through this trait on every query.
pub trait SceneGraph: Send + Sync {
    /// All currently-active instances of the named concrete type.
    fn active_instances(&self, type_name: &str) -> Vec<Arc<dyn ModInstance>>;
}

/// Scene graph with no objects; the default for hosts without scenes.
#[derive(Debug, Default)]
pub struct EmptySceneGraph;

impl SceneGraph for EmptySceneGraph {
    fn active_instances(&self, _type_name: &str) -> Vec<Arc<dyn ModInstance>> {
        Vec::new()
    }
}
