//! Integer layout units and rectangles.

/// Layout units per device pixel.
pub const SCALE: i32 = 1024;

/// Round a layout-unit value to the nearest whole pixel.
#[inline]
pub fn units_round(v: i32) -> i32 {
    (v + (SCALE >> 1)) & !(SCALE - 1)
}

/// Round a layout-unit value down to a whole pixel.
#[inline]
pub fn units_floor(v: i32) -> i32 {
    v & !(SCALE - 1)
}

/// Round a layout-unit value up to a whole pixel.
#[inline]
pub fn units_ceil(v: i32) -> i32 {
    (v + (SCALE - 1)) & !(SCALE - 1)
}

/// Convert pixels to layout units.
#[inline]
pub fn units_from_px(px: f32) -> i32 {
    (px * SCALE as f32).round() as i32
}

/// Convert layout units to pixels.
#[inline]
pub fn units_to_px(units: i32) -> f32 {
    units as f32 / SCALE as f32
}

/// Whether `v` is a whole number of pixels.
#[inline]
pub fn is_whole_pixel(v: i32) -> bool {
    v & (SCALE - 1) == 0
}

/// Axis-aligned rectangle in layout units.
///
/// For logical extents the origin sits on the baseline, so `y` is usually
/// negative (above the baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bounding box of both rectangles, regardless of area.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Ink union: empty rectangles contribute nothing.
    pub fn union_ink(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            self.union(other)
        }
    }

    pub fn offset(mut self, dx: i32, dy: i32) -> Rect {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Closed containment test: points on any edge count as inside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x <= x && x <= self.right() && self.y <= y && y <= self.bottom()
    }
}
