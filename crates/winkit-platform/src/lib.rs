//! winkit-platform: native window boundary for winkit.
//!
//! This crate provides:
//! - The `WindowSystem` trait over the OS window manager, with a Win32
//!   backend, an empty fallback for other targets and an in-memory desktop
//! - The `Window` entity (validated handle, live geometry, enablement,
//!   visibility, reparenting)
//! - Window discovery by owning process or title
//! - Layout application across worker threads
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `system` - OS boundary and its backends
//! - `window` - Window entity
//! - `enumerate` - Window discovery
//! - `arrange` - Layout application

mod arrange;
mod enumerate;
mod error;
mod system;
mod window;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export backends
#[cfg(windows)]
pub use system::Win32System;
#[cfg(not(windows))]
pub use system::UnsupportedSystem;
pub use system::{NativeSystem, VirtualDesktop, WindowSystem};

// Re-export window entity
pub use window::{attach_child, handle_from_raw, NativeHandleSource, Window};

// Re-export discovery
pub use enumerate::{find_by_title, first_by_process, list_by_process};

// Re-export layout application
pub use arrange::{arrange, resolve, AppliedPlacement, ArrangeReport, FailedPlacement};
