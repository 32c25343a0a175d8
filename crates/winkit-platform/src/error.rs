//! Common error types for winkit-platform.

use thiserror::Error;
use winkit_core::{CoreError, LayoutError, WindowHandle};

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The handle did not reference a live window when the entity was built.
    #[error("invalid window handle: {0}")]
    InvalidHandle(WindowHandle),
    /// The window was closed after the entity was built.
    #[error("window no longer exists: {0}")]
    StaleHandle(WindowHandle),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to attach {child} to {parent}")]
    ReparentFailed {
        child: WindowHandle,
        parent: WindowHandle,
    },
    /// The OS refused to move or resize the window.
    #[error("geometry update rejected for {0}")]
    GeometryRejected(WindowHandle),
    #[error("no visible window for process {0}")]
    NoProcessWindow(u32),
    #[error("no window titled like {0:?}")]
    NoTitledWindow(String),
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for PlatformError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(msg) => PlatformError::InvalidArgument(msg),
            other => PlatformError::Core(other),
        }
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
