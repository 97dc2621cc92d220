use thiserror::Error;

/// Failure resolving a code unit by name.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("code unit '{name}' is not registered")]
    Unresolved { name: String },
}

impl UnitError {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::Unresolved { name: name.into() }
    }
}
