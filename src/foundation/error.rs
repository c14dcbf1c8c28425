/// Convenience result type used across the harness.
pub type ConformResult<T> = Result<T, ConformError>;

/// Top-level error taxonomy.
///
/// Per-case mismatches are not errors: they are reported as
/// [`Outcome::Mismatch`](crate::Outcome::Mismatch) and never abort a run.
#[derive(thiserror::Error, Debug)]
pub enum ConformError {
    /// Invalid test-table or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A program, buffer or the graphics subsystem could not be acquired.
    #[error("resource error: {0}")]
    Resource(String),

    /// A frame-state transition was requested out of order.
    #[error("sync error: {0}")]
    Sync(String),

    /// The pipeline collaborator rejected a command.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Framebuffer access outside the readback layout.
    #[error("readback error: {0}")]
    Readback(String),

    /// Errors while parsing configuration files.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConformError {
    /// Build a [`ConformError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ConformError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ConformError::Sync`] value.
    pub fn sync(msg: impl Into<String>) -> Self {
        Self::Sync(msg.into())
    }

    /// Build a [`ConformError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Build a [`ConformError::Readback`] value.
    pub fn readback(msg: impl Into<String>) -> Self {
        Self::Readback(msg.into())
    }

    /// Build a [`ConformError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `true` for errors that must stop a run before any case executes.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, Self::Resource(_) | Self::Validation(_) | Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
