#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    /// A constructed-kind type was registered without a constructor, or the
    /// declared constructor does not accept the supplied arguments.
    #[error("no matching constructor for type '{type_name}'")]
    NoConstructor { type_name: &'static str },

    #[error("constructing '{type_name}' failed: {message}")]
    ConstructFailed {
        type_name: &'static str,
        message: String,
    },
}
