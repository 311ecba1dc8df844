use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};

use crate::instance::TypeCatalog;
use crate::resource::{Lifecycle, LoadState, Resource, ResourceError};
use crate::unit::error::CodeError;

/// One loaded code binary: its type catalog plus the library handle that
/// keeps the code resident.
pub struct LoadedModule {
    path: PathBuf,
    catalog: TypeCatalog,
    // Dropped last; the catalog's function pointers live inside it.
    _library: Option<Library>,
}

impl LoadedModule {
    pub fn new(path: PathBuf, catalog: TypeCatalog, library: Option<Library>) -> Self {
        Self {
            path,
            catalog,
            _library: library,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("path", &self.path)
            .field("type_count", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

/// Loads one code binary into a [`LoadedModule`].
///
/// [`verify`](CodeLoader::verify) is the hook for the host's external
/// binary-compatibility check; a rejection is a static invalidity for the
/// owning unit.
pub trait CodeLoader: Send + Sync {
    fn verify(&self, _path: &Path) -> Result<(), CodeError> {
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LoadedModule, CodeError>;
}

/// Registration entry point every loadable binary exports.
pub const REGISTRATION_SYMBOL: &[u8] = b"lodestone_types\0";

type RegistrationFn = unsafe extern "C-unwind" fn() -> *mut TypeCatalog;

/// Default loader: opens the binary with `libloading` and calls its
/// `lodestone_types` registration symbol, catching panics at the boundary.
#[derive(Debug, Default)]
pub struct DylibCodeLoader;

impl CodeLoader for DylibCodeLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule, CodeError> {
        let library = unsafe { Library::new(path) }.map_err(|e| CodeError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let registration: Symbol<RegistrationFn> =
            unsafe { library.get(REGISTRATION_SYMBOL) }.map_err(|e| CodeError::MissingSymbol {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let registration: RegistrationFn = *registration;

        let catalog_ptr = panic::catch_unwind(|| unsafe { registration() }).map_err(|payload| {
            let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic reason".to_string()
            };
            CodeError::Panicked {
                path: path.to_path_buf(),
                message,
            }
        })?;

        if catalog_ptr.is_null() {
            return Err(CodeError::NullCatalog {
                path: path.to_path_buf(),
            });
        }
        let catalog = *unsafe { Box::from_raw(catalog_ptr) };

        Ok(LoadedModule::new(
            path.to_path_buf(),
            catalog,
            Some(library),
        ))
    }
}

/// The code sub-resource: an ordered list of binaries loaded eagerly and
/// synchronously, so the unit's type universe is complete before anything
/// downstream (instance discovery, scene loading) runs.
pub struct CodeResource {
    lifecycle: Lifecycle,
    paths: Vec<PathBuf>,
    loader: Arc<dyn CodeLoader>,
    modules: Vec<LoadedModule>,
}

impl CodeResource {
    pub fn new(unit_id: &str, paths: Vec<PathBuf>, loader: Arc<dyn CodeLoader>) -> Self {
        Self {
            lifecycle: Lifecycle::new(format!("{}.code", unit_id)),
            paths,
            loader,
            modules: Vec::new(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// File names of the declared binaries, used for conflict detection.
    pub fn file_names(&self) -> Vec<String> {
        self.paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    /// Catalogs of every loaded module, in load order.
    pub fn catalogs(&self) -> Vec<&TypeCatalog> {
        self.modules.iter().map(|m| m.catalog()).collect()
    }

    fn load_all(&mut self) -> Result<(), CodeError> {
        for path in &self.paths {
            if !path.exists() {
                return Err(CodeError::Missing { path: path.clone() });
            }
            self.loader.verify(path)?;
            let module = self.loader.load(path)?;
            log::debug!(
                "{}: loaded {} ({} types)",
                self.lifecycle.name(),
                path.display(),
                module.catalog().len()
            );
            self.modules.push(module);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CodeResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeResource")
            .field("lifecycle", &self.lifecycle)
            .field("paths", &self.paths)
            .field("loaded_modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

impl Resource for CodeResource {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn can_load(&mut self) -> bool {
        self.paths.iter().all(|p| p.exists())
    }

    fn load(&mut self) -> Result<(), ResourceError> {
        if !self.can_load() || !self.lifecycle.begin_load() {
            return Ok(());
        }
        match self.load_all() {
            Ok(()) => {
                self.lifecycle.finish_load();
                Ok(())
            }
            Err(err) => {
                self.modules.clear();
                self.lifecycle.fail();
                Err(ResourceError::LoadFailed {
                    resource: self.lifecycle.name().to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    // Code always loads eagerly; the asynchronous entry points fall through
    // to the synchronous path so the type universe is complete up front.
    fn start_load(&mut self) {
        if self.lifecycle.state() == LoadState::Cancelling {
            self.lifecycle.resume();
            return;
        }
        if let Err(err) = self.load() {
            log::error!("{}", err);
        }
    }

    fn tick(&mut self) {
        // Loads complete inside start_load; only a pending cancel needs
        // driving here.
        if self.lifecycle.state() == LoadState::Cancelling {
            self.modules.clear();
            self.lifecycle.finish_cancel();
        }
    }

    fn unload(&mut self) {
        match self.lifecycle.state() {
            LoadState::Loaded => {
                self.lifecycle.begin_unload();
                self.modules.clear();
                self.lifecycle.finish_unload();
            }
            LoadState::Loading => {
                self.lifecycle.begin_cancel();
            }
            _ => {}
        }
    }
}
