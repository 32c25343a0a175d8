//! Window handles and screen geometry.
//!
//! All coordinates are screen coordinates in the units the OS reports them.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque native window identifier (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub usize);

impl WindowHandle {
    /// The null handle. Never refers to a live window.
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn raw(self) -> usize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for WindowHandle {
    type Err = CoreError;

    /// Accepts decimal (`1234`) or hex (`0x4d2`).
    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => usize::from_str_radix(hex, 16),
            None => s.parse::<usize>(),
        };
        parsed.map(WindowHandle).map_err(|_| {
            CoreError::InvalidArgument(format!("window handle must be an integer, got {s:?}"))
        })
    }
}

/// Window position (top-left corner).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl FromStr for Position {
    type Err = CoreError;

    /// Parses `"x,y"`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let (x, y) = split_pair(s, &[',']).ok_or_else(|| {
            CoreError::InvalidArgument(format!("position must be \"x,y\", got {s:?}"))
        })?;
        Ok(Self {
            x: parse_coordinate(x)?,
            y: parse_coordinate(y)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Window size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Reject negative dimensions.
    pub fn validate(self) -> CoreResult<Self> {
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        Ok(self)
    }
}

impl FromStr for Size {
    type Err = CoreError;

    /// Parses `"WxH"` or `"W,H"`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let (w, h) = split_pair(s, &['x', 'X', ','])
            .ok_or_else(|| CoreError::InvalidArgument(format!("size must be \"WxH\", got {s:?}")))?;
        Ok(Self {
            width: parse_dimension(w)?,
            height: parse_dimension(h)?,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Bounding rectangle as reported by the OS (`left, top, right, bottom`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
}

/// Window geometry: position and size as one tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangles wider than `i32::MAX` clamp to `i32::MAX`.
    pub fn from_rect(rect: ScreenRect) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.right.saturating_sub(rect.left),
            height: rect.bottom.saturating_sub(rect.top),
        }
    }

    /// Far edges clamp to `i32::MAX`; [`validate`](Self::validate) rejects such geometries.
    pub fn to_rect(self) -> ScreenRect {
        ScreenRect {
            left: self.x,
            top: self.y,
            right: self.x.saturating_add(self.width),
            bottom: self.y.saturating_add(self.height),
        }
    }

    pub fn position(self) -> Position {
        Position { x: self.x, y: self.y }
    }

    pub fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    pub fn with_position(self, pos: Position) -> Self {
        Self { x: pos.x, y: pos.y, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { width: size.width, height: size.height, ..self }
    }

    /// Reject negative dimensions and far edges outside the `i32` range.
    pub fn validate(self) -> CoreResult<Self> {
        self.size().validate()?;
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(CoreError::InvalidArgument(format!(
                "geometry {self} extends past the coordinate range"
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Parse a screen coordinate. Any `i32`, negative values included.
pub fn parse_coordinate(s: &str) -> CoreResult<i32> {
    s.trim().parse::<i32>().map_err(|_| {
        CoreError::InvalidArgument(format!("coordinate must be an integer, got {s:?}"))
    })
}

/// Parse a width or height. Must be a non-negative integer.
pub fn parse_dimension(s: &str) -> CoreResult<i32> {
    let value = s.trim().parse::<i32>().map_err(|_| {
        CoreError::InvalidArgument(format!("dimension must be an integer, got {s:?}"))
    })?;
    check_dimension("dimension", value)?;
    Ok(value)
}

/// Parse an on/off flag.
pub fn parse_flag(s: &str) -> CoreResult<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(CoreError::InvalidArgument(format!("expected a boolean, got {s:?}"))),
    }
}

pub(crate) fn check_dimension(name: &str, value: i32) -> CoreResult<()> {
    if value < 0 {
        return Err(CoreError::InvalidArgument(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn split_pair<'a>(s: &'a str, separators: &[char]) -> Option<(&'a str, &'a str)> {
    let s = s.trim().trim_start_matches('(').trim_end_matches(')');
    let (a, b) = s.split_once(|c| separators.contains(&c))?;
    Some((a.trim(), b.trim()))
}
