use serde::{Deserialize, Serialize};

/// A bounding rectangle as reported by the viewer, in CSS pixels.
///
/// Both page and annotation rectangles must come from the same coordinate
/// space (viewport or document); only their difference is used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Integer crop rectangle relative to the owning page's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale the rectangle by a device pixel ratio.
    pub fn scaled(&self, factor: f64) -> Self {
        if (factor - 1.0).abs() < f64::EPSILON {
            return *self;
        }
        Self {
            x: (self.x as f64 * factor).round() as i64,
            y: (self.y as f64 * factor).round() as i64,
            width: round_extent(self.width as f64 * factor),
            height: round_extent(self.height as f64 * factor),
        }
    }

    /// Intersect with a `width` x `height` surface anchored at the origin.
    ///
    /// Returns the in-bounds part as `(x, y, width, height)`, which may be
    /// empty when the crop lies entirely outside the surface.
    pub fn clamp_to(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let x0 = self.x.clamp(0, width as i64);
        let y0 = self.y.clamp(0, height as i64);
        let x1 = (self.x + self.width as i64).clamp(0, width as i64);
        let y1 = (self.y + self.height as i64).clamp(0, height as i64);
        (
            x0 as u32,
            y0 as u32,
            (x1 - x0).max(0) as u32,
            (y1 - y0).max(0) as u32,
        )
    }
}

/// Convert an annotation rectangle into page-relative pixel coordinates.
pub fn resolve(annotation: &Rect, page: &Rect) -> CropRect {
    CropRect {
        x: (annotation.left - page.left).round() as i64,
        y: (annotation.top - page.top).round() as i64,
        width: round_extent(annotation.width),
        height: round_extent(annotation.height),
    }
}

// Negative or NaN extents collapse to zero
fn round_extent(value: f64) -> u32 {
    let rounded = value.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}
