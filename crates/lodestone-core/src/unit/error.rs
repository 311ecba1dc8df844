use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("failed to read descriptor '{path}': {source}")]
    DescriptorIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse descriptor '{path}': {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unit '{unit_id}' is invalid: {reason}")]
    Invalid { unit_id: String, reason: String },

    #[error(transparent)]
    Code(#[from] CodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("code file not found: {path}")]
    Missing { path: PathBuf },

    #[error("rejected by the binary verifier: {path}: {reason}")]
    Rejected { path: PathBuf, reason: String },

    #[error("failed to open '{path}': {message}")]
    Open { path: PathBuf, message: String },

    #[error("'{path}' does not export the registration symbol: {message}")]
    MissingSymbol { path: PathBuf, message: String },

    #[error("registration panicked in '{path}': {message}")]
    Panicked { path: PathBuf, message: String },

    #[error("registration in '{path}' returned a null catalog")]
    NullCatalog { path: PathBuf },
}
