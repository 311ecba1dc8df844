use std::path::PathBuf;

use crate::unit::error::UnitError;

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("failed to read mod root '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error(transparent)]
    Unit(#[from] UnitError),
}
