//! # Lodestone Core Errors
//!
//! The crate-level error type wrapping each subsystem's typed errors.
//! Nothing in the core is fatal to the host process: lifecycle failures are
//! absorbed at the unit boundary (invalid/unloaded state plus a logged
//! diagnostic), so this type mostly surfaces I/O and format problems from
//! the edges: discovery, descriptor parsing, code loading.

use crate::instance::InstanceError;
use crate::manager::ManagerError;
use crate::resource::ResourceError;
use crate::unit::error::{CodeError, UnitError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("code error: {0}")]
    Code(#[from] CodeError),

    #[error("instance error: {0}")]
    Instance(#[from] InstanceError),

    #[error("manager error: {0}")]
    Manager(#[from] ManagerError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
