//! `VirtualDesktop` wrapper that misbehaves on chosen handles.

use super::{VirtualDesktop, WindowSystem};
use winkit_core::{Geometry, ScreenRect, WindowHandle};

/// Delegates to a `VirtualDesktop`, except for the handles listed here.
#[derive(Debug, Default)]
pub(crate) struct FlakyDesktop {
    pub(crate) desk: VirtualDesktop,
    /// Pass `is_window`, then report no rectangle (destroyed in between).
    pub(crate) vanishing: Vec<WindowHandle>,
    /// Pass `is_window`, then report no owning process.
    pub(crate) pidless: Vec<WindowHandle>,
    /// Live, but every geometry write is refused.
    pub(crate) frozen: Vec<WindowHandle>,
}

impl WindowSystem for FlakyDesktop {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        self.desk.top_level_windows()
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.desk.is_window(handle)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<ScreenRect> {
        if self.vanishing.contains(&handle) {
            return None;
        }
        self.desk.window_rect(handle)
    }

    fn set_window_geometry(&self, handle: WindowHandle, geometry: Geometry) -> bool {
        !self.frozen.contains(&handle) && self.desk.set_window_geometry(handle, geometry)
    }

    fn is_enabled(&self, handle: WindowHandle) -> bool {
        self.desk.is_enabled(handle)
    }

    fn set_enabled(&self, handle: WindowHandle, enabled: bool) {
        self.desk.set_enabled(handle, enabled)
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        self.desk.is_visible(handle)
    }

    fn set_visible(&self, handle: WindowHandle, visible: bool) {
        self.desk.set_visible(handle, visible)
    }

    fn window_text(&self, handle: WindowHandle) -> Option<String> {
        self.desk.window_text(handle)
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        self.desk.set_parent(child, parent)
    }

    fn process_id(&self, handle: WindowHandle) -> Option<u32> {
        if self.pidless.contains(&handle) {
            return None;
        }
        self.desk.process_id(handle)
    }
}
