//! Window entity: a validated native handle with live geometry.
//!
//! Reads re-query the OS before returning. Writes push the whole
//! `{x, y, width, height}` tuple in a single call, so an observer never sees
//! a rectangle with the new position and the old size (or the reverse).
//!
//! A `Window` is `Send` but not `Sync`: hand distinct entities to distinct
//! threads instead of sharing one.

use crate::system::{NativeSystem, WindowSystem};
use crate::{PlatformError, PlatformResult};
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use winkit_core::{
    parse_coordinate, parse_dimension, parse_flag, Geometry, Position, Size, WindowHandle,
};

/// Anything that can hand out a native window handle (GUI toolkit widgets).
pub trait NativeHandleSource {
    /// The native handle, or `None` if the object has no window (yet).
    fn native_handle(&self) -> Option<WindowHandle>;
}

impl NativeHandleSource for WindowHandle {
    fn native_handle(&self) -> Option<WindowHandle> {
        Some(*self)
    }
}

/// Extract the native handle from a `raw-window-handle` value.
///
/// Win32, Xlib and Xcb windows carry an integer-sized identifier; every other
/// kind yields `None`.
pub fn handle_from_raw(raw: RawWindowHandle) -> Option<WindowHandle> {
    let handle = match raw {
        RawWindowHandle::Win32(h) => h.hwnd as usize,
        RawWindowHandle::Xlib(h) => h.window as usize,
        RawWindowHandle::Xcb(h) => h.window as usize,
        _ => return None,
    };
    Some(WindowHandle(handle)).filter(|h| !h.is_null())
}

/// A live native window.
pub struct Window<S: WindowSystem = NativeSystem> {
    system: Arc<S>,
    handle: WindowHandle,
    pid: u32,
    geometry: Cell<Geometry>,
    enabled: bool,
}

impl<S: WindowSystem> Window<S> {
    /// Wrap `handle`, failing with `InvalidHandle` unless it is a live window.
    pub fn new(system: Arc<S>, handle: WindowHandle) -> PlatformResult<Self> {
        if !system.is_window(handle) {
            return Err(PlatformError::InvalidHandle(handle));
        }

        // Any of these failing means the window vanished after the check.
        let rect = system
            .window_rect(handle)
            .ok_or(PlatformError::InvalidHandle(handle))?;
        let pid = system
            .process_id(handle)
            .ok_or(PlatformError::InvalidHandle(handle))?;
        let enabled = system.is_enabled(handle);
        let geometry = Geometry::from_rect(rect);

        debug!(%handle, pid, %geometry, enabled, "window bound");

        Ok(Self {
            system,
            handle,
            pid,
            geometry: Cell::new(geometry),
            enabled,
        })
    }

    /// Build from a toolkit object's native handle accessor.
    pub fn from_native(system: Arc<S>, source: &impl NativeHandleSource) -> PlatformResult<Self> {
        let handle = source
            .native_handle()
            .ok_or(PlatformError::InvalidHandle(WindowHandle::NULL))?;
        Self::new(system, handle)
    }

    /// Build from a toolkit object implementing `raw-window-handle`.
    pub fn from_raw_window_handle(
        system: Arc<S>,
        source: &impl HasRawWindowHandle,
    ) -> PlatformResult<Self> {
        let handle = handle_from_raw(source.raw_window_handle())
            .ok_or(PlatformError::InvalidHandle(WindowHandle::NULL))?;
        Self::new(system, handle)
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    /// Owning process id, captured at construction.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    fn ensure_live(&self) -> PlatformResult<()> {
        if self.system.is_window(self.handle) {
            Ok(())
        } else {
            Err(PlatformError::StaleHandle(self.handle))
        }
    }

    // === Geometry ===

    /// Last geometry seen or written, without asking the OS.
    pub fn cached_geometry(&self) -> Geometry {
        self.geometry.get()
    }

    /// Live geometry. Refreshes the cache.
    pub fn geometry(&self) -> PlatformResult<Geometry> {
        self.ensure_live()?;
        let rect = self
            .system
            .window_rect(self.handle)
            .ok_or(PlatformError::StaleHandle(self.handle))?;
        let geometry = Geometry::from_rect(rect);
        if geometry != self.geometry.get() {
            debug!(
                handle = %self.handle,
                old = %self.geometry.get(),
                new = %geometry,
                "geometry changed outside"
            );
        }
        self.geometry.set(geometry);
        Ok(geometry)
    }

    pub fn position(&self) -> PlatformResult<Position> {
        Ok(self.geometry()?.position())
    }

    pub fn size(&self) -> PlatformResult<Size> {
        Ok(self.geometry()?.size())
    }

    pub fn x(&self) -> PlatformResult<i32> {
        Ok(self.geometry()?.x)
    }

    pub fn y(&self) -> PlatformResult<i32> {
        Ok(self.geometry()?.y)
    }

    pub fn width(&self) -> PlatformResult<i32> {
        Ok(self.geometry()?.width)
    }

    pub fn height(&self) -> PlatformResult<i32> {
        Ok(self.geometry()?.height)
    }

    /// Validate, then push a full geometry tuple in one OS call.
    fn push(&mut self, geometry: Geometry) -> PlatformResult<()> {
        let geometry = geometry.validate()?;
        if !self.system.set_window_geometry(self.handle, geometry) {
            self.ensure_live()?;
            return Err(PlatformError::GeometryRejected(self.handle));
        }
        self.geometry.set(geometry);
        debug!(handle = %self.handle, %geometry, "geometry written");
        Ok(())
    }

    /// Replace the whole rectangle.
    pub fn set_geometry(&mut self, geometry: Geometry) -> PlatformResult<()> {
        let geometry = geometry.validate()?;
        self.ensure_live()?;
        self.push(geometry)
    }

    /// Move, keeping the live size.
    pub fn set_position(&mut self, position: Position) -> PlatformResult<()> {
        let current = self.geometry()?;
        self.push(current.with_position(position))
    }

    /// Resize, keeping the live position.
    pub fn set_size(&mut self, size: Size) -> PlatformResult<()> {
        size.validate()?;
        let current = self.geometry()?;
        self.push(current.with_size(size))
    }

    pub fn set_x(&mut self, x: i32) -> PlatformResult<()> {
        let current = self.geometry()?;
        self.push(Geometry { x, ..current })
    }

    pub fn set_y(&mut self, y: i32) -> PlatformResult<()> {
        let current = self.geometry()?;
        self.push(Geometry { y, ..current })
    }

    pub fn set_width(&mut self, width: i32) -> PlatformResult<()> {
        let current = self.geometry()?;
        self.push(Geometry { width, ..current })
    }

    pub fn set_height(&mut self, height: i32) -> PlatformResult<()> {
        let current = self.geometry()?;
        self.push(Geometry { height, ..current })
    }

    /// Apply a textual value to a named field.
    ///
    /// Fields: `x`, `y`, `width`, `height`, `position` (`"x,y"`), `size`
    /// (`"WxH"`), `enabled` and `visible` (`on`/`off`). Malformed values fail
    /// with `InvalidArgument` before anything is sent to the OS.
    pub fn apply_str(&mut self, field: &str, value: &str) -> PlatformResult<()> {
        match field.trim().to_lowercase().as_str() {
            "x" => self.set_x(parse_coordinate(value)?),
            "y" => self.set_y(parse_coordinate(value)?),
            "width" => self.set_width(parse_dimension(value)?),
            "height" => self.set_height(parse_dimension(value)?),
            "position" | "pos" => self.set_position(value.parse()?),
            "size" => self.set_size(value.parse()?),
            "enabled" => self.set_enabled(parse_flag(value)?),
            "visible" => {
                if parse_flag(value)? {
                    self.show()
                } else {
                    self.hide()
                }
            }
            other => Err(PlatformError::InvalidArgument(format!(
                "unknown window field {other:?}"
            ))),
        }
    }

    // === Enablement & visibility ===

    /// Last enablement written (or seen at construction).
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> PlatformResult<()> {
        self.ensure_live()?;
        self.system.set_enabled(self.handle, enabled);
        self.enabled = enabled;
        debug!(handle = %self.handle, enabled, "enablement written");
        Ok(())
    }

    pub fn show(&self) -> PlatformResult<()> {
        self.ensure_live()?;
        self.system.set_visible(self.handle, true);
        Ok(())
    }

    pub fn hide(&self) -> PlatformResult<()> {
        self.ensure_live()?;
        self.system.set_visible(self.handle, false);
        Ok(())
    }

    pub fn is_visible(&self) -> PlatformResult<bool> {
        self.ensure_live()?;
        Ok(self.system.is_visible(self.handle))
    }

    pub fn title(&self) -> PlatformResult<String> {
        self.ensure_live()?;
        self.system
            .window_text(self.handle)
            .ok_or(PlatformError::StaleHandle(self.handle))
    }

    // === Parenting ===

    /// Embed `child` into this window.
    ///
    /// Cycles are not detected; attaching a window to one of its own
    /// descendants is up to the OS.
    pub fn attach_child(&self, child: &Window<S>) -> PlatformResult<()> {
        let failed = PlatformError::ReparentFailed {
            child: child.handle,
            parent: self.handle,
        };
        if child.handle == self.handle {
            return Err(failed);
        }
        self.ensure_live()?;
        child.ensure_live()?;

        if !self.system.set_parent(child.handle, self.handle) {
            return Err(failed);
        }
        debug!(parent = %self.handle, child = %child.handle, "child attached");
        Ok(())
    }

    /// Make this a top-level window again.
    pub fn detach(&self) -> PlatformResult<()> {
        self.ensure_live()?;
        if !self.system.set_parent(self.handle, WindowHandle::NULL) {
            return Err(PlatformError::ReparentFailed {
                child: self.handle,
                parent: WindowHandle::NULL,
            });
        }
        debug!(handle = %self.handle, "window detached");
        Ok(())
    }
}

/// Embed `child` into `parent`.
pub fn attach_child<S: WindowSystem>(parent: &Window<S>, child: &Window<S>) -> PlatformResult<()> {
    parent.attach_child(child)
}

impl<S: WindowSystem> fmt::Display for Window<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.system.window_text(self.handle).unwrap_or_default();
        write!(f, "{} {}", self.handle, title)
    }
}

impl<S: WindowSystem> fmt::Debug for Window<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("pid", &self.pid)
            .field("geometry", &self.geometry.get())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{FlakyDesktop, VirtualDesktop};
    use raw_window_handle::{Win32WindowHandle, XcbWindowHandle};
    use winkit_core::ScreenRect;

    fn desktop() -> Arc<VirtualDesktop> {
        Arc::new(VirtualDesktop::new())
    }

    #[test]
    fn test_construction_matches_os_rect() {
        let desk = desktop();
        let h = desk.spawn(42, "emu", ScreenRect::new(100, 100, 400, 300));

        let win = Window::new(desk.clone(), h).unwrap();
        assert_eq!(win.handle(), h);
        assert_eq!(win.pid(), 42);
        assert_eq!(win.x().unwrap(), 100);
        assert_eq!(win.y().unwrap(), 100);
        assert_eq!(win.width().unwrap(), 300);
        assert_eq!(win.height().unwrap(), 200);
        assert!(win.enabled());
    }

    #[test]
    fn test_invalid_handle_fails_construction() {
        let desk = desktop();
        let err = Window::new(desk.clone(), WindowHandle(999)).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidHandle(WindowHandle(999))));

        let err = Window::new(desk, WindowHandle::NULL).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidHandle(_)));
    }

    #[test]
    fn test_window_vanishing_mid_construction() {
        let desk = VirtualDesktop::new();
        let rectless = desk.spawn(1, "closing", ScreenRect::new(0, 0, 10, 10));
        let pidless = desk.spawn(1, "orphan", ScreenRect::new(0, 0, 10, 10));
        let flaky = Arc::new(FlakyDesktop {
            desk,
            vanishing: vec![rectless],
            pidless: vec![pidless],
            ..FlakyDesktop::default()
        });

        let err = Window::new(flaky.clone(), rectless).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidHandle(h) if h == rectless));
        let err = Window::new(flaky, pidless).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidHandle(h) if h == pidless));
    }

    #[test]
    fn test_refused_write_keeps_cache() {
        let desk = VirtualDesktop::new();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 100, 100));
        let flaky = Arc::new(FlakyDesktop {
            desk,
            frozen: vec![h],
            ..FlakyDesktop::default()
        });
        let mut win = Window::new(flaky.clone(), h).unwrap();

        let err = win.set_width(300).unwrap_err();
        assert!(matches!(err, PlatformError::GeometryRejected(r) if r == h));
        assert_eq!(win.cached_geometry(), Geometry::new(0, 0, 100, 100));
        assert_eq!(flaky.desk.geometry_writes(h), 0);

        flaky.desk.close(h);
        assert!(matches!(
            win.set_geometry(Geometry::new(0, 0, 5, 5)),
            Err(PlatformError::StaleHandle(_))
        ));
    }

    #[test]
    fn test_far_edge_overflow_rejected() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 300, 200));
        let mut win = Window::new(desk.clone(), h).unwrap();

        assert!(matches!(win.set_x(i32::MAX), Err(PlatformError::InvalidArgument(_))));
        assert!(matches!(
            win.set_position(Position::new(0, i32::MAX - 10)),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert!(matches!(
            win.set_geometry(Geometry::new(i32::MAX, 0, 1, 1)),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert_eq!(desk.geometry_writes(h), 0);

        // The desktop lock is still usable afterwards.
        win.set_x(i32::MAX - 300).unwrap();
        assert_eq!(desk.window_rect(h), Some(ScreenRect::new(i32::MAX - 300, 0, i32::MAX, 200)));
    }

    #[test]
    fn test_construction_on_extreme_rect() {
        let desk = desktop();
        let h = desk.spawn(1, "wide", ScreenRect::new(i32::MIN, 0, i32::MAX, 10));

        let win = Window::new(desk, h).unwrap();
        assert_eq!(win.cached_geometry(), Geometry::new(i32::MIN, 0, i32::MAX, 10));
    }

    #[test]
    fn test_set_width_pushes_full_rect() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(100, 100, 400, 300));
        let mut win = Window::new(desk.clone(), h).unwrap();

        win.set_width(350).unwrap();
        assert_eq!(win.width().unwrap(), 350);
        assert_eq!(desk.window_rect(h), Some(ScreenRect::new(100, 100, 450, 300)));
        assert_eq!(desk.geometry_writes(h), 1);
    }

    #[test]
    fn test_set_position_round_trip_keeps_size() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(10, 20, 210, 170));
        let mut win = Window::new(desk.clone(), h).unwrap();

        win.set_position(Position::new(-50, 75)).unwrap();
        assert_eq!(win.position().unwrap(), Position::new(-50, 75));
        assert_eq!(win.size().unwrap(), Size::new(200, 150));
        assert_eq!(desk.geometry_writes(h), 1);
    }

    #[test]
    fn test_set_size_keeps_position() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(5, 6, 15, 16));
        let mut win = Window::new(desk.clone(), h).unwrap();

        win.set_size(Size::new(200, 150)).unwrap();
        assert_eq!(win.geometry().unwrap(), Geometry::new(5, 6, 200, 150));
    }

    #[test]
    fn test_reads_reconcile_with_external_moves() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 100, 100));
        let mut win = Window::new(desk.clone(), h).unwrap();

        desk.move_externally(h, ScreenRect::new(50, 60, 150, 160));
        assert_eq!(win.cached_geometry(), Geometry::new(0, 0, 100, 100));
        assert_eq!(win.position().unwrap(), Position::new(50, 60));
        assert_eq!(win.cached_geometry(), Geometry::new(50, 60, 100, 100));

        // Writes start from the live rect, not the stale cache.
        desk.move_externally(h, ScreenRect::new(70, 80, 170, 180));
        win.set_height(40).unwrap();
        assert_eq!(desk.window_rect(h), Some(ScreenRect::new(70, 80, 170, 120)));
    }

    #[test]
    fn test_invalid_text_leaves_state_untouched() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(100, 100, 400, 300));
        let mut win = Window::new(desk.clone(), h).unwrap();

        let err = win.apply_str("width", "abc").unwrap_err();
        assert!(matches!(err, PlatformError::InvalidArgument(_)));
        assert_eq!(win.width().unwrap(), 300);
        assert_eq!(desk.geometry_writes(h), 0);

        assert!(matches!(
            win.apply_str("position", "1;2"),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert!(matches!(
            win.apply_str("enabled", "sometimes"),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert!(matches!(
            win.apply_str("colour", "red"),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert!(win.enabled());
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 10, 10));
        let mut win = Window::new(desk.clone(), h).unwrap();

        assert!(matches!(win.set_width(-1), Err(PlatformError::InvalidArgument(_))));
        assert!(matches!(
            win.set_size(Size::new(10, -10)),
            Err(PlatformError::InvalidArgument(_))
        ));
        assert_eq!(desk.geometry_writes(h), 0);
        assert_eq!(win.size().unwrap(), Size::new(10, 10));
    }

    #[test]
    fn test_apply_str_fields() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 10, 10));
        let mut win = Window::new(desk.clone(), h).unwrap();

        win.apply_str("position", "3,4").unwrap();
        win.apply_str("size", "30x40").unwrap();
        win.apply_str("x", "5").unwrap();
        win.apply_str("enabled", "off").unwrap();
        win.apply_str("visible", "off").unwrap();

        assert_eq!(win.geometry().unwrap(), Geometry::new(5, 4, 30, 40));
        assert!(!win.enabled());
        assert!(!desk.is_enabled(h));
        assert!(!win.is_visible().unwrap());
    }

    #[test]
    fn test_enablement_and_visibility() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::default());
        let mut win = Window::new(desk.clone(), h).unwrap();

        win.set_enabled(false).unwrap();
        assert!(!win.enabled());
        assert!(!desk.is_enabled(h));

        win.hide().unwrap();
        assert!(!win.is_visible().unwrap());
        win.show().unwrap();
        assert!(win.is_visible().unwrap());
        // Visibility is not cached state.
        assert!(!win.enabled());
    }

    #[test]
    fn test_stale_handle_after_close() {
        let desk = desktop();
        let h = desk.spawn(1, "emu", ScreenRect::new(0, 0, 10, 10));
        let mut win = Window::new(desk.clone(), h).unwrap();

        desk.close(h);
        assert!(matches!(win.width(), Err(PlatformError::StaleHandle(_))));
        assert!(matches!(win.set_x(1), Err(PlatformError::StaleHandle(_))));
        assert!(matches!(win.set_enabled(false), Err(PlatformError::StaleHandle(_))));
        assert!(matches!(win.hide(), Err(PlatformError::StaleHandle(_))));
        assert!(matches!(win.title(), Err(PlatformError::StaleHandle(_))));
        assert!(win.enabled());
        assert_eq!(win.cached_geometry(), Geometry::new(0, 0, 10, 10));
    }

    #[test]
    fn test_attach_child() {
        let desk = desktop();
        let main = Window::new(desk.clone(), desk.spawn(1, "main", ScreenRect::default())).unwrap();
        let emu = Window::new(desk.clone(), desk.spawn(2, "emu", ScreenRect::default())).unwrap();

        attach_child(&main, &emu).unwrap();
        assert_eq!(desk.parent_of(emu.handle()), Some(main.handle()));

        emu.detach().unwrap();
        assert_eq!(desk.parent_of(emu.handle()), None);
    }

    #[test]
    fn test_attach_failures() {
        let desk = desktop();
        let main = Window::new(desk.clone(), desk.spawn(1, "main", ScreenRect::default())).unwrap();
        let emu = Window::new(desk.clone(), desk.spawn(2, "emu", ScreenRect::default())).unwrap();

        assert!(matches!(
            main.attach_child(&main),
            Err(PlatformError::ReparentFailed { .. })
        ));

        desk.refuse_reparenting(true);
        let err = main.attach_child(&emu).unwrap_err();
        match err {
            PlatformError::ReparentFailed { child, parent } => {
                assert_eq!(child, emu.handle());
                assert_eq!(parent, main.handle());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(desk.parent_of(emu.handle()), None);
    }

    #[test]
    fn test_display_includes_title() {
        let desk = desktop();
        let h = desk.spawn(1, "LDPlayer", ScreenRect::default());
        let win = Window::new(desk, h).unwrap();
        assert_eq!(win.to_string(), format!("{h} LDPlayer"));
    }

    struct Widget(Option<WindowHandle>);

    impl NativeHandleSource for Widget {
        fn native_handle(&self) -> Option<WindowHandle> {
            self.0
        }
    }

    #[test]
    fn test_from_native_source() {
        let desk = desktop();
        let h = desk.spawn(1, "main", ScreenRect::default());

        let win = Window::from_native(desk.clone(), &Widget(Some(h))).unwrap();
        assert_eq!(win.handle(), h);

        let err = Window::from_native(desk, &Widget(None)).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidHandle(WindowHandle::NULL)));
    }

    struct RawWidget(RawWindowHandle);

    unsafe impl HasRawWindowHandle for RawWidget {
        fn raw_window_handle(&self) -> RawWindowHandle {
            self.0
        }
    }

    #[test]
    fn test_from_raw_window_handle() {
        let desk = desktop();
        let h = desk.spawn(1, "main", ScreenRect::default());

        let mut win32 = Win32WindowHandle::empty();
        win32.hwnd = h.raw() as *mut std::ffi::c_void;
        let widget = RawWidget(RawWindowHandle::Win32(win32));
        let win = Window::from_raw_window_handle(desk.clone(), &widget).unwrap();
        assert_eq!(win.handle(), h);

        let empty = RawWidget(RawWindowHandle::Win32(Win32WindowHandle::empty()));
        assert!(matches!(
            Window::from_raw_window_handle(desk, &empty),
            Err(PlatformError::InvalidHandle(WindowHandle::NULL))
        ));
    }

    #[test]
    fn test_handle_from_raw_kinds() {
        let mut xcb = XcbWindowHandle::empty();
        xcb.window = 77;
        assert_eq!(handle_from_raw(RawWindowHandle::Xcb(xcb)), Some(WindowHandle(77)));
        assert_eq!(
            handle_from_raw(RawWindowHandle::Web(raw_window_handle::WebWindowHandle::empty())),
            None
        );
    }

    #[test]
    fn test_window_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Window<VirtualDesktop>>();
    }
}
