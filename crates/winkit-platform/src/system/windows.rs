//! Windows implementation of the window system using Win32.

use super::WindowSystem;
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::ptr;
use tracing::debug;
use windows_sys::Win32::Foundation::{GetLastError, SetLastError, BOOL, HWND, LPARAM, RECT, TRUE};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{EnableWindow, IsWindowEnabled};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    IsWindow, IsWindowVisible, SetParent, SetWindowPos, ShowWindow, SWP_NOACTIVATE,
    SWP_NOZORDER, SW_HIDE, SW_SHOW,
};
use winkit_core::{Geometry, ScreenRect, WindowHandle};

/// Win32 window manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32System;

impl Win32System {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    handle.raw() as HWND
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam as *mut Vec<WindowHandle>);
    handles.push(WindowHandle(hwnd as usize));
    TRUE
}

impl WindowSystem for Win32System {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        let mut handles: Vec<WindowHandle> = Vec::new();

        unsafe {
            EnumWindows(
                Some(enum_window_callback),
                &mut handles as *mut Vec<WindowHandle> as LPARAM,
            );
        }

        handles
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        unsafe { IsWindow(hwnd(handle)) != 0 }
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<ScreenRect> {
        unsafe {
            let mut rect: RECT = std::mem::zeroed();

            if GetWindowRect(hwnd(handle), &mut rect) == 0 {
                return None;
            }

            Some(ScreenRect {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            })
        }
    }

    fn set_window_geometry(&self, handle: WindowHandle, geometry: Geometry) -> bool {
        let ok = unsafe {
            SetWindowPos(
                hwnd(handle),
                ptr::null_mut(),
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        debug!(%handle, %geometry, ok, "SetWindowPos");
        ok != 0
    }

    fn is_enabled(&self, handle: WindowHandle) -> bool {
        unsafe { IsWindowEnabled(hwnd(handle)) != 0 }
    }

    fn set_enabled(&self, handle: WindowHandle, enabled: bool) {
        // Return value is the previous disabled state, not success.
        unsafe {
            EnableWindow(hwnd(handle), enabled as BOOL);
        }
    }

    fn is_visible(&self, handle: WindowHandle) -> bool {
        unsafe { IsWindowVisible(hwnd(handle)) != 0 }
    }

    fn set_visible(&self, handle: WindowHandle, visible: bool) {
        let cmd = if visible { SW_SHOW } else { SW_HIDE };
        // Return value is the previous visibility, not success.
        unsafe {
            ShowWindow(hwnd(handle), cmd);
        }
    }

    fn window_text(&self, handle: WindowHandle) -> Option<String> {
        unsafe {
            let hwnd = hwnd(handle);

            let len = GetWindowTextLengthW(hwnd);
            if len == 0 {
                return if IsWindow(hwnd) != 0 { Some(String::new()) } else { None };
            }

            let mut buf: Vec<u16> = vec![0; (len + 1) as usize];
            let copied = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
            buf.truncate(copied.max(0) as usize);
            Some(OsString::from_wide(&buf).to_string_lossy().into_owned())
        }
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        unsafe {
            // A null return is also how SetParent reports "previous parent was
            // the desktop", so failure is told apart through the last error.
            SetLastError(0);
            let previous = SetParent(hwnd(child), hwnd(parent));
            let ok = !previous.is_null() || GetLastError() == 0;
            debug!(%child, %parent, ok, "SetParent");
            ok
        }
    }

    fn process_id(&self, handle: WindowHandle) -> Option<u32> {
        let mut pid: u32 = 0;
        let thread = unsafe { GetWindowThreadProcessId(hwnd(handle), &mut pid) };
        if thread == 0 {
            return None;
        }
        Some(pid)
    }
}
