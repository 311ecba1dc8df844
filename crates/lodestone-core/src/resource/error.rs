use crate::resource::state::LoadState;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource '{resource}' cannot {operation} while {state}")]
    WrongState {
        resource: String,
        state: LoadState,
        operation: &'static str,
    },

    #[error("resource '{resource}' failed to load: {message}")]
    LoadFailed { resource: String, message: String },
}
