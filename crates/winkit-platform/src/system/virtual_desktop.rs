//! In-memory window manager.
//!
//! Behaves like a small native desktop: windows have handles, owning
//! processes, rectangles, enablement, visibility and parents. Useful for
//! headless runs and for exercising code written against `WindowSystem`.

use super::WindowSystem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use winkit_core::{Geometry, ScreenRect, WindowHandle};

const FIRST_HANDLE: usize = 0x1_0000;

#[derive(Debug, Clone)]
struct VirtualWindow {
    handle: WindowHandle,
    pid: u32,
    title: String,
    rect: ScreenRect,
    enabled: bool,
    visible: bool,
    parent: Option<WindowHandle>,
    geometry_writes: usize,
}

#[derive(Debug)]
struct DesktopState {
    /// Z-order, topmost first.
    windows: Vec<VirtualWindow>,
    next_handle: usize,
    refuse_reparent: bool,
}

/// Simulated desktop.
#[derive(Debug)]
pub struct VirtualDesktop {
    state: Mutex<DesktopState>,
}

impl Default for VirtualDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDesktop {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DesktopState {
                windows: Vec::new(),
                next_handle: FIRST_HANDLE,
                refuse_reparent: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DesktopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a visible, enabled top-level window owned by `pid`.
    pub fn spawn(&self, pid: u32, title: &str, rect: ScreenRect) -> WindowHandle {
        let mut state = self.lock();
        let handle = WindowHandle(state.next_handle);
        state.next_handle += 1;
        state.windows.push(VirtualWindow {
            handle,
            pid,
            title: title.to_string(),
            rect,
            enabled: true,
            visible: true,
            parent: None,
            geometry_writes: 0,
        });
        debug!(%handle, pid, title, "spawned virtual window");
        handle
    }

    /// Create a hidden top-level window owned by `pid`.
    pub fn spawn_hidden(&self, pid: u32, title: &str, rect: ScreenRect) -> WindowHandle {
        let handle = self.spawn(pid, title, rect);
        self.set_visible(handle, false);
        handle
    }

    /// Destroy a window and, like a native desktop, all of its descendants.
    pub fn close(&self, handle: WindowHandle) -> bool {
        let mut state = self.lock();
        if !state.windows.iter().any(|w| w.handle == handle) {
            return false;
        }

        let mut doomed = vec![handle];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            let children: Vec<_> = state
                .windows
                .iter()
                .filter(|w| w.parent == Some(current) && !doomed.contains(&w.handle))
                .map(|w| w.handle)
                .collect();
            doomed.extend(children);
            i += 1;
        }
        state.windows.retain(|w| !doomed.contains(&w.handle));
        debug!(%handle, closed = doomed.len(), "closed virtual window");
        true
    }

    /// Move a window without going through `WindowSystem`, as a user drag would.
    pub fn move_externally(&self, handle: WindowHandle, rect: ScreenRect) -> bool {
        self.with_window(handle, |w| w.rect = rect).is_some()
    }

    /// Current parent, or `None` for top-level (or unknown) windows.
    pub fn parent_of(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.with_window(handle, |w| w.parent).flatten()
    }

    /// Number of successful geometry writes the window has received.
    pub fn geometry_writes(&self, handle: WindowHandle) -> usize {
        self.with_window(handle, |w| w.geometry_writes).unwrap_or(0)
    }

    /// Make every subsequent `set_parent` call fail.
    pub fn refuse_reparenting(&self, refuse: bool) {
        self.lock().refuse_reparent = refuse;
    }

    fn with_window<R>(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut VirtualWindow) -> R,
    ) -> Option<R> {
        let mut state = self.lock();
        state.windows.iter_mut().find(|w| w.handle == handle).map(f)
    }
}

impl WindowSystem for VirtualDesktop {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        self.lock()
            .windows
            .iter()
            .filter(|w| w.parent.is_none())
            .map(|w| w.handle)
            .collect()
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.with_window(handle, |_| ()).is_some()
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<ScreenRect> {
        self.with_window(handle, |w| w.rect)
    }

    fn set_window_geometry(&self, handle: WindowHandle, geometry: Geometry) -> bool {
        self.with_window(handle, |w| {
            w.rect = geometry.to_rect();
            w.geometry_writes += 1;
        })
        .is_some()
    }

    fn is_enabled(&self, handle: WindowHandle) -> bool {
        self.with_window(handle, |w| w.enabled).unwrap_or(false)
    }

    fn set_enabled(&self, handle: WindowHandle, enabled: bool) {
        self.with_window(handle, |w| w.enabled = enabled);
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        self.with_window(handle, |w| w.visible).unwrap_or(false)
    }

    fn set_visible(&self, handle: WindowHandle, visible: bool) {
        self.with_window(handle, |w| w.visible = visible);
    }

    fn window_text(&self, handle: WindowHandle) -> Option<String> {
        self.with_window(handle, |w| w.title.clone())
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        let mut state = self.lock();
        if state.refuse_reparent {
            return false;
        }
        if !parent.is_null() && !state.windows.iter().any(|w| w.handle == parent) {
            return false;
        }
        match state.windows.iter_mut().find(|w| w.handle == child) {
            Some(w) => {
                w.parent = (!parent.is_null()).then_some(parent);
                true
            }
            None => false,
        }
    }

    fn process_id(&self, handle: WindowHandle) -> Option<u32> {
        self.with_window(handle, |w| w.pid)
    }
}
