use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::ModSettings;
use crate::manager::error::ManagerError;
use crate::unit::descriptor::ModDescriptor;
use crate::unit::content::UnitLayout;

/// Scan a discovery root for unit directories.
///
/// Layout contract: one directory per unit containing the descriptor file,
/// a subdirectory named after the host platform holding the code binaries
/// (matched by the configured filter), and the `<id>.assets` /
/// `<id>.scenes` bundle files. A directory without a descriptor is skipped
/// silently; a directory whose descriptor fails to parse is skipped with a
/// logged diagnostic; one broken unit never aborts the scan.
pub async fn scan_units(
    root: &Path,
    settings: &ModSettings,
) -> Result<Vec<(ModDescriptor, UnitLayout)>, ManagerError> {
    let mut discovered = Vec::new();

    let mut entries = fs::read_dir(root).await.map_err(|source| ManagerError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    while let Some(entry) = entries.next_entry().await.map_err(|source| ManagerError::Io {
        path: root.to_path_buf(),
        source,
    })? {
        let unit_dir = entry.path();
        let metadata = match fs::metadata(&unit_dir).await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("failed to stat {}: {}", unit_dir.display(), e);
                continue;
            }
        };
        if !metadata.is_dir() {
            continue;
        }

        let descriptor_path = unit_dir.join(&settings.descriptor_name);
        match fs::try_exists(&descriptor_path).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                log::warn!(
                    "failed to check for descriptor {}: {}",
                    descriptor_path.display(),
                    e
                );
                continue;
            }
        }

        let descriptor = match ModDescriptor::load(&descriptor_path).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                log::warn!("skipping {}: {}", unit_dir.display(), e);
                continue;
            }
        };

        let code_files = collect_code_files(&unit_dir, settings).await;
        let path_id = descriptor.path_id();
        let layout = UnitLayout {
            asset_bundle: unit_dir.join(format!("{}.assets", path_id)),
            scene_bundle: unit_dir.join(format!("{}.scenes", path_id)),
            root: unit_dir,
            descriptor_path,
            code_files,
        };
        discovered.push((descriptor, layout));
    }

    Ok(discovered)
}

/// Code binaries live in the platform subdirectory and are matched by the
/// configured filter. Sorted for a stable load order.
async fn collect_code_files(unit_dir: &Path, settings: &ModSettings) -> Vec<PathBuf> {
    let platform_dir = unit_dir.join(settings.platform.dir_name());
    let mut files = Vec::new();

    let mut entries = match fs::read_dir(&platform_dir).await {
        Ok(entries) => entries,
        Err(_) => return files, // No platform directory: no code.
    };
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if settings.is_code_file(&path) {
                    files.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("failed to read {}: {}", platform_dir.display(), e);
                break;
            }
        }
    }
    files.sort();
    files
}
