use std::fmt;
use std::path::Path;
use std::sync::Arc;

use semver::Version;

use crate::instance::{EmptySceneGraph, SceneGraph};
use crate::unit::bundle::ResourceProvider;
use crate::unit::code::{CodeLoader, DylibCodeLoader};
use crate::unit::descriptor::Platform;

/// Host-side callbacks the core invokes at lifecycle boundaries.
pub trait HostHooks: Send + Sync {
    /// Requested after a unit releases its content so the host can sweep
    /// unused resource memory.
    fn sweep_unused_resources(&self) {}
}

/// Hooks that do nothing; the default.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl HostHooks for NoopHooks {}

/// Configuration for the mod system, passed explicitly to constructors.
///
/// There is deliberately no ambient global holding these; whoever builds a
/// [`ModManager`](crate::manager::ModManager) owns the settings and shares
/// them with the units it creates.
#[derive(Clone)]
pub struct ModSettings {
    /// Platform this host is running on; gates units whose platform bitset
    /// does not include it.
    pub platform: Platform,

    /// Version of the running host, checked against each descriptor's
    /// host-version requirement.
    pub host_version: Version,

    /// File name of the per-unit descriptor.
    pub descriptor_name: String,

    /// Extensions identifying code binaries inside the platform
    /// subdirectory.
    pub code_extensions: Vec<String>,

    /// Constructs the opaque asset/scene sub-resources.
    pub provider: Arc<dyn ResourceProvider>,

    /// Loads code binaries into type catalogs.
    pub code_loader: Arc<dyn CodeLoader>,

    /// The host's live scene graph, queried for scene-resident instances.
    pub scene_graph: Arc<dyn SceneGraph>,

    /// Host callbacks.
    pub hooks: Arc<dyn HostHooks>,
}

impl ModSettings {
    pub fn new(host_version: Version, provider: Arc<dyn ResourceProvider>) -> Self {
        Self {
            platform: Platform::current(),
            host_version,
            descriptor_name: "mod.json".to_string(),
            code_extensions: vec!["so".to_string(), "dll".to_string(), "dylib".to_string()],
            provider,
            code_loader: Arc::new(DylibCodeLoader),
            scene_graph: Arc::new(EmptySceneGraph),
            hooks: Arc::new(NoopHooks),
        }
    }

    /// The code-file filter used by discovery.
    pub fn is_code_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.code_extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

impl fmt::Debug for ModSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModSettings")
            .field("platform", &self.platform)
            .field("host_version", &self.host_version)
            .field("descriptor_name", &self.descriptor_name)
            .field("code_extensions", &self.code_extensions)
            .finish_non_exhaustive()
    }
}
