//! Fallback for targets without a native backend.
//!
//! Reports an empty desktop: no handle is ever live, so every `Window`
//! construction fails with `InvalidHandle`.

use super::WindowSystem;
use winkit_core::{Geometry, ScreenRect, WindowHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSystem;

impl UnsupportedSystem {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for UnsupportedSystem {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        Vec::new()
    }

    fn is_window(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn window_rect(&self, _handle: WindowHandle) -> Option<ScreenRect> {
        None
    }

    fn set_window_geometry(&self, _handle: WindowHandle, _geometry: Geometry) -> bool {
        false
    }

    fn is_enabled(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn set_enabled(&self, _handle: WindowHandle, _enabled: bool) {}

    fn is_visible(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn set_visible(&self, _handle: WindowHandle, _visible: bool) {}

    fn window_text(&self, _handle: WindowHandle) -> Option<String> {
        None
    }

    fn set_parent(&self, _child: WindowHandle, _parent: WindowHandle) -> bool {
        false
    }

    fn process_id(&self, _handle: WindowHandle) -> Option<u32> {
        None
    }
}
