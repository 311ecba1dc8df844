use std::path::{Path, PathBuf};
use std::sync::Arc;

use lodestone_core::unit::bundle::{Asset, BundleResource, ResourceProvider};
use lodestone_core::resource::{Lifecycle, LoadState, Resource, ResourceError};

/// A bundle backed by a plain file on disk.
///
/// The CLI host has no real asset pipeline: a bundle "loads" by statting
/// the file, and exposes no assets. Enough to drive units end to end and
/// watch their lifecycle.
pub struct FileBundle {
    lifecycle: Lifecycle,
    path: PathBuf,
}

impl FileBundle {
    fn new(label: String, path: PathBuf) -> Self {
        Self {
            lifecycle: Lifecycle::new(label),
            path,
        }
    }
}

impl Resource for FileBundle {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn can_load(&mut self) -> bool {
        self.path.is_file()
    }

    fn load(&mut self) -> Result<(), ResourceError> {
        if !self.can_load() || !self.lifecycle.begin_load() {
            return Ok(());
        }
        match std::fs::metadata(&self.path) {
            Ok(metadata) => {
                log::debug!(
                    "{}: {} bytes resident",
                    self.lifecycle.name(),
                    metadata.len()
                );
                self.lifecycle.finish_load();
                Ok(())
            }
            Err(e) => {
                self.lifecycle.fail();
                Err(ResourceError::LoadFailed {
                    resource: self.lifecycle.name().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn start_load(&mut self) {
        match self.lifecycle.state() {
            LoadState::Unloaded => {
                if self.can_load() {
                    self.lifecycle.begin_load();
                }
            }
            LoadState::Cancelling => {
                self.lifecycle.resume();
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loading => match std::fs::metadata(&self.path) {
                Ok(_) => {
                    self.lifecycle.finish_load();
                }
                Err(_) => {
                    self.lifecycle.fail();
                }
            },
            LoadState::Cancelling => {
                self.lifecycle.finish_cancel();
            }
            LoadState::Unloading => {
                self.lifecycle.finish_unload();
            }
            _ => {}
        }
    }

    fn unload(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loaded => {
                self.lifecycle.begin_unload();
                self.lifecycle.finish_unload();
            }
            LoadState::Loading => {
                self.lifecycle.begin_cancel();
            }
            _ => {}
        }
    }
}

impl BundleResource for FileBundle {
    fn asset(&self, _name: &str) -> Option<Arc<dyn Asset>> {
        None
    }

    fn asset_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Provider handing out [`FileBundle`]s. Scene names are not recoverable
/// from an opaque blob without the host's pipeline, so bundles report none.
#[derive(Debug, Default)]
pub struct DiskProvider;

impl ResourceProvider for DiskProvider {
    fn asset_bundle(&self, unit_id: &str, path: &Path) -> Box<dyn BundleResource> {
        Box::new(FileBundle::new(
            format!("{}.assets", unit_id),
            path.to_path_buf(),
        ))
    }

    fn scene_bundle(&self, unit_id: &str, path: &Path) -> Box<dyn BundleResource> {
        Box::new(FileBundle::new(
            format!("{}.scenes", unit_id),
            path.to_path_buf(),
        ))
    }

    fn scene_names(&self, _path: &Path) -> Vec<String> {
        Vec::new()
    }

    fn scene(&self, scene_name: &str, bundle_path: &Path) -> Box<dyn Resource> {
        Box::new(FileBundle::new(
            format!("scene:{}", scene_name),
            bundle_path.to_path_buf(),
        ))
    }
}
