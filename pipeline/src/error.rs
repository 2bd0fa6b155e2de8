use thiserror::Error;

/// A pipeline was requested with an extension nobody registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown extension `{name}`")]
pub struct UnknownExtensionError {
    /// The identifier as the caller spelled it.
    pub name: String,
}

impl UnknownExtensionError {
    pub fn new(name: impl Into<String>) -> Self {
        UnknownExtensionError { name: name.into() }
    }
}
