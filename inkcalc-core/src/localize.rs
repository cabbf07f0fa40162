//! # Content localizer
//!
//! Finds where on the surface the user actually drew, so results can be placed next to it.
//! This is a full scan of the buffer, so call it once per submission and never per frame.

use crate::buffer::PixelBuffer;

/// Bounds of all content cells, inclusive.
///
/// An empty buffer yields a *degenerate* box with `min > max` (min starts at the buffer extent,
/// max at zero). Check [`BoundingBox::is_empty`] rather than trusting the bounds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}
impl BoundingBox {
    /// True if no content was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
    /// Geometric center, or `None` for the degenerate "no content" box.
    #[must_use]
    pub fn center(&self) -> Option<(f32, f32)> {
        (!self.is_empty()).then(|| self.raw_center())
    }
    /// Midpoint of the bounds, degenerate or not.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn raw_center(&self) -> (f32, f32) {
        (
            (self.min_x as f32 + self.max_x as f32) / 2.0,
            (self.min_y as f32 + self.max_y as f32) / 2.0,
        )
    }
}

/// Scan every cell for content (alpha > 0).
#[must_use]
pub fn bounding_box(buffer: &PixelBuffer) -> BoundingBox {
    let mut bbox = BoundingBox {
        min_x: buffer.width(),
        min_y: buffer.height(),
        max_x: 0,
        max_y: 0,
    };
    let mut found = false;
    for (x, y, px) in buffer.raw().enumerate_pixels() {
        if px.0[3] > 0 {
            found = true;
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
    }
    // A zero-size buffer doesn't produce min > max from the initial values alone.
    if !found {
        bbox.min_x = bbox.min_x.max(1);
        bbox.min_y = bbox.min_y.max(1);
    }
    bbox
}
