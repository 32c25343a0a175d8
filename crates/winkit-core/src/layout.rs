//! Layout files: which windows go where, and under which parent.
//!
//! Layouts are YAML documents stored in the per-user data directory.

use crate::{Position, Size, WindowHandle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Layout not found: {0}")]
    NotFound(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// A named arrangement of windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    /// Window every placement is embedded into.
    #[serde(default)]
    pub parent: Option<WindowSelector>,
    #[serde(default)]
    pub placements: Vec<Placement>,
    /// Worker threads used to apply the placements.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

/// How to find a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSelector {
    /// A known native handle.
    Handle(WindowHandle),
    /// First visible window of a process.
    Pid(u32),
    /// First window whose title contains the text (case-insensitive).
    Title(String),
}

/// Target state for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub target: WindowSelector,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    /// Embed into the layout parent, if there is one.
    #[serde(default = "default_attach")]
    pub attach: bool,
}

fn default_attach() -> bool {
    true
}

impl Placement {
    pub fn new(target: WindowSelector) -> Self {
        Self {
            target,
            position: None,
            size: None,
            enabled: None,
            visible: None,
            attach: true,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            parent: None,
            placements: Vec::new(),
            workers: default_workers(),
        }
    }
}

/// Get the app data directory for winkit.
pub fn get_app_data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("winkit")
}

/// Get the layouts directory.
pub fn get_layouts_dir() -> PathBuf {
    get_app_data_dir().join("layouts")
}

/// Ensure the layouts directory exists.
pub fn ensure_layouts_dir() -> LayoutResult<PathBuf> {
    let dir = get_layouts_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}

fn ensure_dir(dir: &Path) -> LayoutResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(?dir, "Created layouts directory");
    }
    Ok(())
}

/// Parse a layout from YAML text.
pub fn parse_layout(yaml: &str) -> LayoutResult<Layout> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a layout from an explicit file path.
pub fn load_layout_file(path: impl AsRef<Path>) -> LayoutResult<Layout> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)?;
    let layout = parse_layout(&yaml)?;
    debug!(?path, "Loaded layout file");
    Ok(layout)
}

/// Save a layout to the layouts directory.
pub fn save_layout(layout: &Layout) -> LayoutResult<PathBuf> {
    save_layout_in(&get_layouts_dir(), layout)
}

/// Save a layout to `dir`.
pub fn save_layout_in(dir: &Path, layout: &Layout) -> LayoutResult<PathBuf> {
    ensure_dir(dir)?;
    let path = layout_path(dir, &layout.name);

    let yaml = serde_yaml::to_string(layout)?;
    fs::write(&path, yaml)?;

    info!(?path, "Saved layout");
    Ok(path)
}

/// Load a layout by name from the layouts directory.
pub fn load_layout(name: &str) -> LayoutResult<Layout> {
    load_layout_in(&get_layouts_dir(), name)
}

/// Load a layout by name from `dir`.
pub fn load_layout_in(dir: &Path, name: &str) -> LayoutResult<Layout> {
    let path = layout_path(dir, name);
    if !path.exists() {
        return Err(LayoutError::NotFound(name.to_string()));
    }
    load_layout_file(&path)
}

/// Delete a layout from the layouts directory.
pub fn delete_layout(name: &str) -> LayoutResult<()> {
    delete_layout_in(&get_layouts_dir(), name)
}

/// Delete a layout from `dir`.
pub fn delete_layout_in(dir: &Path, name: &str) -> LayoutResult<()> {
    let path = layout_path(dir, name);
    if !path.exists() {
        return Err(LayoutError::NotFound(name.to_string()));
    }

    fs::remove_file(&path)?;
    info!(?path, "Deleted layout");
    Ok(())
}

/// List all saved layouts.
pub fn list_layouts() -> LayoutResult<Vec<String>> {
    list_layouts_in(&get_layouts_dir())
}

/// List the layouts saved in `dir`.
pub fn list_layouts_in(dir: &Path) -> LayoutResult<Vec<String>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut layouts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "yaml").unwrap_or(false) {
            if let Some(name) = path.file_stem() {
                layouts.push(name.to_string_lossy().to_string());
            }
        }
    }

    layouts.sort();
    Ok(layouts)
}

fn layout_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.yaml", sanitize_filename(name)))
}

/// Sanitize a layout name to be a valid filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
