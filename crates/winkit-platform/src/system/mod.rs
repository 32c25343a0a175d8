//! OS window manager boundary.
//!
//! `WindowSystem` is the only place that talks to the native windowing API.
//! Everything above it (the `Window` entity, enumeration, layouts) is written
//! against the trait.
//!
//! Implementations:
//! - Windows: Win32 API (`windows.rs`)
//! - Other targets: no native windows (`unsupported.rs`)
//! - Any target: in-memory desktop (`virtual_desktop.rs`)

use winkit_core::{Geometry, ScreenRect, WindowHandle};

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod unsupported;

mod virtual_desktop;

#[cfg(test)]
mod flaky;

#[cfg(windows)]
pub use windows::Win32System;

#[cfg(not(windows))]
pub use unsupported::UnsupportedSystem;

pub use virtual_desktop::VirtualDesktop;

#[cfg(test)]
pub(crate) use flaky::FlakyDesktop;

/// Native backend for the current target.
#[cfg(windows)]
pub type NativeSystem = Win32System;

/// Native backend for the current target.
#[cfg(not(windows))]
pub type NativeSystem = UnsupportedSystem;

/// Native window manager operations.
///
/// Calls are synchronous. Queries return `None`/`false` when the handle does
/// not reference a live window; mutations return `false` when the OS rejects
/// them.
pub trait WindowSystem: Send + Sync {
    /// All top-level windows, in OS enumeration order.
    fn top_level_windows(&self) -> Vec<WindowHandle>;

    /// Whether `handle` references a live window.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// Bounding rectangle in screen coordinates.
    fn window_rect(&self, handle: WindowHandle) -> Option<ScreenRect>;

    /// Move and resize in a single call.
    fn set_window_geometry(&self, handle: WindowHandle, geometry: Geometry) -> bool;

    fn is_enabled(&self, handle: WindowHandle) -> bool;

    fn set_enabled(&self, handle: WindowHandle, enabled: bool);

    fn is_visible(&self, handle: WindowHandle) -> bool;

    /// Show or hide the window.
    fn set_visible(&self, handle: WindowHandle, visible: bool);

    /// Window title / display text.
    fn window_text(&self, handle: WindowHandle) -> Option<String>;

    /// Make `parent` the owner of `child`. `WindowHandle::NULL` detaches.
    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool;

    /// Id of the process that created the window.
    fn process_id(&self, handle: WindowHandle) -> Option<u32>;
}
