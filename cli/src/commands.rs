//! Subcommand handlers.

use crate::{Command, LayoutCommand};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use winkit_core::{
    delete_layout, list_layouts, load_layout, load_layout_file, parse_flag, save_layout, Geometry,
    Layout, WindowHandle,
};
use winkit_platform::{arrange, list_by_process, NativeSystem, Window, WindowSystem};

/// One line of `list` / `info` output.
#[derive(Debug, Serialize)]
struct WindowSummary {
    handle: WindowHandle,
    pid: u32,
    title: String,
    geometry: Geometry,
    enabled: bool,
    visible: bool,
}

impl WindowSummary {
    fn of<S: WindowSystem>(window: &Window<S>) -> Result<Self> {
        Ok(Self {
            handle: window.handle(),
            pid: window.pid(),
            title: window.title()?,
            geometry: window.geometry()?,
            enabled: window.enabled(),
            visible: window.is_visible()?,
        })
    }

    fn print(&self) {
        println!(
            "{:>12}  {:>7}  {:<22}  {:<3}  {:<7}  {}",
            self.handle.to_string(),
            self.pid,
            self.geometry.to_string(),
            if self.enabled { "on" } else { "off" },
            if self.visible { "visible" } else { "hidden" },
            self.title
        );
    }
}

pub fn run(command: Command) -> Result<()> {
    let system = Arc::new(NativeSystem::default());
    run_with(&system, command)
}

fn open<S: WindowSystem>(system: &Arc<S>, handle: WindowHandle) -> Result<Window<S>> {
    Window::new(Arc::clone(system), handle).with_context(|| format!("opening window {handle}"))
}

pub(crate) fn run_with<S: WindowSystem>(system: &Arc<S>, command: Command) -> Result<()> {
    match command {
        Command::List { pid, all, json } => {
            let summaries = list_by_process(system, pid, !all)
                .iter()
                .map(WindowSummary::of)
                .collect::<Result<Vec<_>>>()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                summaries.iter().for_each(WindowSummary::print);
            }
        }
        Command::Info { handle } => {
            let window = open(system, handle)?;
            println!("{}", serde_json::to_string_pretty(&WindowSummary::of(&window)?)?);
        }
        Command::Move { handle, position } => {
            open(system, handle)?.set_position(position)?;
            info!(%handle, %position, "moved");
        }
        Command::Resize { handle, size } => {
            open(system, handle)?.set_size(size)?;
            info!(%handle, %size, "resized");
        }
        Command::Set { handle, field, value } => {
            open(system, handle)?.apply_str(&field, &value)?;
            info!(%handle, %field, %value, "updated");
        }
        Command::Enable { handle, state } => {
            let enabled = parse_flag(&state)?;
            open(system, handle)?.set_enabled(enabled)?;
            info!(%handle, enabled, "enablement changed");
        }
        Command::Show { handle } => open(system, handle)?.show()?,
        Command::Hide { handle } => open(system, handle)?.hide()?,
        Command::Embed { parent, child } => {
            let parent_window = open(system, parent)?;
            let child_window = open(system, child)?;
            parent_window.attach_child(&child_window)?;
            info!(%parent, %child, "embedded");
        }
        Command::Detach { handle } => open(system, handle)?.detach()?,
        Command::Layout(cmd) => run_layout(system, cmd)?,
    }
    Ok(())
}

fn load_named_or_file(layout: &str) -> Result<Layout> {
    let path = Path::new(layout);
    if path.is_file() {
        return load_layout_file(path).with_context(|| format!("reading {}", path.display()));
    }
    load_layout(layout).with_context(|| format!("loading layout {layout:?}"))
}

fn run_layout<S: WindowSystem>(system: &Arc<S>, cmd: LayoutCommand) -> Result<()> {
    match cmd {
        LayoutCommand::Apply { layout, json } => {
            let layout = load_named_or_file(&layout)?;
            let report = arrange(system, &layout)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for applied in &report.applied {
                    println!("placed    #{} {}", applied.index, applied.handle);
                }
                for failed in &report.failed {
                    println!("failed    #{} {}", failed.index, failed.error);
                }
            }
            if !report.is_complete() {
                anyhow::bail!(
                    "{} of {} placements failed",
                    report.failed.len(),
                    layout.placements.len()
                );
            }
        }
        LayoutCommand::List => {
            for name in list_layouts()? {
                println!("{name}");
            }
        }
        LayoutCommand::Show { name } => {
            let layout = load_layout(&name)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        LayoutCommand::Import { path } => {
            let layout = load_layout_file(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let saved = save_layout(&layout)?;
            println!("{}", saved.display());
        }
        LayoutCommand::Delete { name } => delete_layout(&name)?,
    }
    Ok(())
}
