//! # Pixel buffer
//!
//! The raster the user draws on. Each cell is RGBA8, but the alpha channel does double duty:
//! it is the *content flag* of the cell. Background fills write the background color with alpha 0,
//! so `alpha > 0` iff something was drawn (or composited) there since the last fill.
//! Anything leaving the surface is flattened over the opaque background first, see [`PixelBuffer::flattened`].

use crate::color::Color;
use crate::util::Rect;

/// Largest number of cells a buffer may hold, 512MiB of RGBA8.
pub const MAX_CELLS: u64 = 1 << 27;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{width}x{height} exceeds the maximum surface size")]
pub struct TooLarge {
    pub width: u32,
    pub height: u32,
}

/// Check that a `width × height` buffer can be allocated.
///
/// # Errors
/// [`TooLarge`] if it would exceed [`MAX_CELLS`].
pub fn check_size(width: u32, height: u32) -> Result<(), TooLarge> {
    if u64::from(width) * u64::from(height) <= MAX_CELLS {
        Ok(())
    } else {
        Err(TooLarge { width, height })
    }
}

pub struct PixelBuffer {
    image: image::RgbaImage,
    background: Color,
}
impl PixelBuffer {
    /// A buffer of the given size, filled with `background`.
    ///
    /// # Errors
    /// See [`check_size`].
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, TooLarge> {
        check_size(width, height)?;
        let mut this = Self {
            image: image::RgbaImage::new(width, height),
            background,
        };
        this.fill_background();
        Ok(this)
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }
    /// Whether the buffer has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
    /// The untouched value of every cell: background rgb, zero alpha.
    fn blank(&self) -> image::Rgba<u8> {
        self.background.with_alpha(0).into()
    }
    /// Overwrite every cell with the background, clearing all content.
    pub fn fill_background(&mut self) {
        let blank = self.blank();
        for px in self.image.pixels_mut() {
            *px = blank;
        }
    }
    /// Drop the contents and reallocate at a new size, filled with background.
    ///
    /// # Errors
    /// See [`check_size`]. The buffer is left as it was.
    pub fn reallocate(&mut self, width: u32, height: u32) -> Result<(), TooLarge> {
        check_size(width, height)?;
        self.image = image::RgbaImage::new(width, height);
        self.fill_background();
        Ok(())
    }
    /// Paint one cell with opaque `color`, marking it as content.
    /// Out-of-bounds coordinates are ignored.
    pub fn paint(&mut self, x: i64, y: i64, color: Color) {
        if let Some(px) = self.cell_mut(x, y) {
            *px = color.with_alpha(255).into();
        }
    }
    /// Return one cell to the untouched background state.
    /// Out-of-bounds coordinates are ignored.
    pub fn erase(&mut self, x: i64, y: i64) {
        let blank = self.blank();
        if let Some(px) = self.cell_mut(x, y) {
            *px = blank;
        }
    }
    fn cell_mut(&mut self, x: i64, y: i64) -> Option<&mut image::Rgba<u8>> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.image.get_pixel_mut(x, y))
    }
    /// Read a cell. `None` if out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|px| (*px).into())
    }
    /// True if the cell carries drawn content.
    #[must_use]
    pub fn is_content(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|px| px.0[3] > 0)
    }
    /// Number of content cells. Linear in the buffer size.
    #[must_use]
    pub fn content_count(&self) -> usize {
        self.image.pixels().filter(|px| px.0[3] > 0).count()
    }
    /// The raw image, alpha channel being the content flag.
    #[must_use]
    pub fn raw(&self) -> &image::RgbaImage {
        &self.image
    }
    pub(crate) fn raw_mut(&mut self) -> &mut image::RgbaImage {
        &mut self.image
    }
    /// The full rect of the buffer, or `None` if it has no area.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(Rect {
                min: [0, 0],
                max: [self.width() - 1, self.height() - 1],
            })
        }
    }
    /// A fully-opaque copy, as it would be presented on screen.
    ///
    /// Content cells already hold opaque color; untouched cells become opaque background.
    #[must_use]
    pub fn flattened(&self) -> image::RgbaImage {
        let mut out = self.image.clone();
        for px in out.pixels_mut() {
            px.0[3] = 255;
        }
        out
    }
}
