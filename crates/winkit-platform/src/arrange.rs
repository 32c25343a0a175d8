//! Apply a `Layout`: place windows and embed them into a parent.
//!
//! Placements are handed to worker threads through a `SequenceDispenser`, so
//! every placement is applied exactly once and each worker builds its own
//! `Window` entities.

use crate::enumerate::{find_by_title, first_by_process};
use crate::system::WindowSystem;
use crate::window::Window;
use crate::{PlatformError, PlatformResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use winkit_core::{run_workers, Layout, Placement, SequenceDispenser, WindowHandle, WindowSelector};

/// A placement that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPlacement {
    pub index: usize,
    pub handle: WindowHandle,
}

/// A placement that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPlacement {
    pub index: usize,
    pub error: String,
}

/// Outcome of [`arrange`], sorted by placement index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrangeReport {
    pub parent: Option<WindowHandle>,
    pub applied: Vec<AppliedPlacement>,
    pub failed: Vec<FailedPlacement>,
}

impl ArrangeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Find the window a selector points at.
pub fn resolve<S: WindowSystem>(
    system: &Arc<S>,
    selector: &WindowSelector,
) -> PlatformResult<Window<S>> {
    match selector {
        WindowSelector::Handle(handle) => Window::new(Arc::clone(system), *handle),
        WindowSelector::Pid(pid) => first_by_process(system, *pid),
        WindowSelector::Title(title) => find_by_title(system, title)
            .into_iter()
            .next()
            .ok_or_else(|| PlatformError::NoTitledWindow(title.clone())),
    }
}

/// Apply every placement of `layout`.
///
/// Fails only if the layout parent cannot be found; individual placement
/// failures are collected in the report.
pub fn arrange<S: WindowSystem>(system: &Arc<S>, layout: &Layout) -> PlatformResult<ArrangeReport> {
    let parent = match &layout.parent {
        Some(selector) => Some(resolve(system, selector)?.handle()),
        None => None,
    };

    info!(
        layout = %layout.name,
        placements = layout.placements.len(),
        workers = layout.workers,
        ?parent,
        "applying layout"
    );

    let dispenser = SequenceDispenser::new(layout.placements.iter().enumerate());
    let mut outcomes = run_workers(&dispenser, layout.workers, |_, (index, placement)| {
        (*index, apply_placement(system, parent, placement))
    });
    outcomes.sort_by_key(|(index, _)| *index);

    let mut report = ArrangeReport {
        parent,
        ..ArrangeReport::default()
    };
    for (index, outcome) in outcomes {
        match outcome {
            Ok(handle) => report.applied.push(AppliedPlacement { index, handle }),
            Err(e) => {
                warn!(index, error = %e, "placement failed");
                report.failed.push(FailedPlacement {
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        applied = report.applied.len(),
        failed = report.failed.len(),
        "layout applied"
    );
    Ok(report)
}

fn apply_placement<S: WindowSystem>(
    system: &Arc<S>,
    parent: Option<WindowHandle>,
    placement: &Placement,
) -> PlatformResult<WindowHandle> {
    let mut window = resolve(system, &placement.target)?;

    if placement.position.is_some() || placement.size.is_some() {
        let mut next = window.geometry()?;
        if let Some(position) = placement.position {
            next = next.with_position(position);
        }
        if let Some(size) = placement.size {
            next = next.with_size(size);
        }
        window.set_geometry(next)?;
    }

    if let Some(enabled) = placement.enabled {
        window.set_enabled(enabled)?;
    }

    match placement.visible {
        Some(true) => window.show()?,
        Some(false) => window.hide()?,
        None => {}
    }

    if let (true, Some(parent)) = (placement.attach, parent) {
        let parent = Window::new(Arc::clone(system), parent)?;
        parent.attach_child(&window)?;
    }

    Ok(window.handle())
}
