//! winkit-core: window handle domain + sequence dispensing.
//!
//! Design goal: keep this crate platform-agnostic.
//! Talking to the OS window manager lives in `winkit-platform`.

mod dispenser;
mod error;
mod geometry;
mod layout;
mod workers;

pub use dispenser::{Drain, SequenceDispenser};
pub use error::{CoreError, CoreResult};
pub use geometry::{
    parse_coordinate, parse_dimension, parse_flag, Geometry, Position, ScreenRect, Size,
    WindowHandle,
};
pub use layout::{
    delete_layout, delete_layout_in, ensure_layouts_dir, get_app_data_dir, get_layouts_dir,
    list_layouts, list_layouts_in, load_layout, load_layout_file, load_layout_in, parse_layout,
    save_layout, save_layout_in, Layout, LayoutError, LayoutResult, Placement, WindowSelector,
};
pub use workers::run_workers;
