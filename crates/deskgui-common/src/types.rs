use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of a view in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

impl ViewSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clamp each dimension into `[min, max]`. Either bound may be absent.
    pub fn clamp(self, min: Option<ViewSize>, max: Option<ViewSize>) -> Self {
        let mut size = self;
        if let Some(max) = max {
            size.width = size.width.min(max.width);
            size.height = size.height.min(max.height);
        }
        if let Some(min) = min {
            size.width = size.width.max(min.width);
            size.height = size.height.max(min.height);
        }
        size
    }
}

impl fmt::Display for ViewSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle boundaries of a view: left, top, right, bottom edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl ViewRect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn size(&self) -> ViewSize {
        ViewSize::new(self.width(), self.height())
    }

    /// Same rectangle moved so its top-left corner sits at `(left, top)`.
    /// Edges that would pass `u32::MAX` are clamped to it.
    pub fn moved_to(&self, left: u32, top: u32) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(self.width()),
            top.saturating_add(self.height()),
        )
    }
}

/// Default placement of a freshly created window.
pub const DEFAULT_WINDOW_RECT: ViewRect = ViewRect::new(0, 0, 600, 600);

/// Opaque RGB color used for window backgrounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
