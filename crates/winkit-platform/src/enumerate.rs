//! Finding windows: by owning process or by title.

use crate::system::WindowSystem;
use crate::window::Window;
use crate::{PlatformError, PlatformResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// All top-level windows owned by `pid`, optionally only the visible ones.
///
/// Order follows OS enumeration order. Windows that disappear between
/// enumeration and construction are left out.
pub fn list_by_process<S: WindowSystem>(
    system: &Arc<S>,
    pid: u32,
    visible_only: bool,
) -> Vec<Window<S>> {
    let windows: Vec<Window<S>> = system
        .top_level_windows()
        .into_iter()
        .filter(|&h| system.process_id(h) == Some(pid))
        .filter(|&h| !visible_only || system.is_visible(h))
        .filter_map(|h| match Window::new(Arc::clone(system), h) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!(handle = %h, error = %e, "window vanished during enumeration");
                None
            }
        })
        .collect();

    debug!(pid, visible_only, count = windows.len(), "listed process windows");
    windows
}

/// First visible window of `pid`.
pub fn first_by_process<S: WindowSystem>(system: &Arc<S>, pid: u32) -> PlatformResult<Window<S>> {
    list_by_process(system, pid, true)
        .into_iter()
        .next()
        .ok_or(PlatformError::NoProcessWindow(pid))
}

/// Top-level windows whose title contains `needle` (case-insensitive).
pub fn find_by_title<S: WindowSystem>(system: &Arc<S>, needle: &str) -> Vec<Window<S>> {
    let needle = needle.to_lowercase();
    system
        .top_level_windows()
        .into_iter()
        .filter(|&h| {
            system
                .window_text(h)
                .map(|t| t.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .filter_map(|h| Window::new(Arc::clone(system), h).ok())
        .collect()
}
