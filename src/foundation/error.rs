/// Convenience result type used across scrollytell.
pub type ScrollyResult<T> = Result<T, ScrollyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Scroll ticks never produce errors: geometry and parameter edge cases degrade to a reduced
/// render mode instead. Errors only surface at the boundary (binding, configuration, IO).
#[derive(thiserror::Error, Debug)]
pub enum ScrollyError {
    /// Invalid user-provided parameters or scenario data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while binding or disposing a scroll-bound section.
    #[error("binding error: {0}")]
    Binding(String),

    /// Errors while resolving section geometry against the host layout.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollyError {
    /// Build a [`ScrollyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollyError::Binding`] value.
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`ScrollyError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`ScrollyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
