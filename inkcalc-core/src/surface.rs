//! # Surface lifecycle
//!
//! Owns the [`PixelBuffer`] and every operation that replaces its contents wholesale:
//! initialize, resize, reset, loading an external raster. Also the way out: PNG encoding.
//!
//! Resizing discards all existing strokes. Content is not preserved or rescaled across a resize.

use crate::buffer::{PixelBuffer, TooLarge};
use crate::color::Color;

#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("image has no area")]
    EmptyImage,
    #[error("surface has no area")]
    EmptySurface,
    #[error(transparent)]
    TooLarge(#[from] TooLarge),
}

/// Where a loaded image lands on the surface.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Placement {
    /// Uniform scale applied to the image.
    pub scale: f32,
    /// Top-left corner of the scaled image, in surface cells.
    pub x: u32,
    pub y: u32,
    /// Size of the scaled image, in surface cells.
    pub width: u32,
    pub height: u32,
}

/// Fit an `image_w × image_h` image inside a `buffer_w × buffer_h` surface, preserving aspect ratio,
/// centered. `None` if either has zero area.
#[must_use]
pub fn fit_placement(buffer_w: u32, buffer_h: u32, image_w: u32, image_h: u32) -> Option<Placement> {
    if buffer_w == 0 || buffer_h == 0 || image_w == 0 || image_h == 0 {
        return None;
    }
    // f64 for exact integer ratios up to any reasonable surface size.
    let scale =
        (f64::from(buffer_w) / f64::from(image_w)).min(f64::from(buffer_h) / f64::from(image_h));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = |v: u32, limit: u32| ((f64::from(v) * scale).round() as u32).clamp(1, limit);
    let width = scaled(image_w, buffer_w);
    let height = scaled(image_h, buffer_h);
    #[allow(clippy::cast_possible_truncation)]
    Some(Placement {
        scale: scale as f32,
        x: (buffer_w - width) / 2,
        y: (buffer_h - height) / 2,
        width,
        height,
    })
}

pub struct Surface {
    buffer: PixelBuffer,
}
impl Surface {
    /// Initialize at the viewport size, filled with `background`.
    ///
    /// # Errors
    /// [`SurfaceError::TooLarge`] if the size can't be allocated.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, SurfaceError> {
        let buffer = PixelBuffer::new(width, height, background)?;
        log::debug!("surface initialized at {width}x{height}");
        Ok(Self { buffer })
    }
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
    #[must_use]
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.buffer.width(), self.buffer.height())
    }
    /// Re-initialize at a new viewport size. Always refills, even if the size is unchanged.
    ///
    /// # Errors
    /// [`SurfaceError::TooLarge`] if the size can't be allocated. The surface is left unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let (old_w, old_h) = self.size();
        self.buffer.reallocate(width, height)?;
        log::debug!("surface resized {old_w}x{old_h} -> {width}x{height}, strokes discarded");
        Ok(())
    }
    /// Clear all content without resizing.
    pub fn reset(&mut self) {
        self.buffer.fill_background();
    }
    /// Decode an external raster and replace the surface contents with it, letterboxed and centered.
    ///
    /// # Errors
    /// On any error the surface is left unchanged.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Placement, SurfaceError> {
        let decoded = image::load_from_memory(bytes).map_err(SurfaceError::Decode)?;
        if self.buffer.is_empty() {
            return Err(SurfaceError::EmptySurface);
        }
        let placement = fit_placement(
            self.buffer.width(),
            self.buffer.height(),
            decoded.width(),
            decoded.height(),
        )
        .ok_or(SurfaceError::EmptyImage)?;

        let source = decoded.to_rgba8();
        let scaled = if (placement.width, placement.height) == source.dimensions() {
            source
        } else {
            image::imageops::resize(
                &source,
                placement.width,
                placement.height,
                image::imageops::FilterType::Triangle,
            )
        };

        self.buffer.fill_background();
        let background = self.buffer.background().rgb_array();
        let target = self.buffer.raw_mut();
        for (x, y, px) in scaled.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            // Source-over onto the opaque background.
            let over = |src: u8, dst: u8| -> u8 {
                let a = u16::from(a);
                // Max 255 * 255 / 255
                #[allow(clippy::cast_possible_truncation)]
                let v = ((u16::from(src) * a + u16::from(dst) * (255 - a) + 127) / 255) as u8;
                v
            };
            target.put_pixel(
                placement.x + x,
                placement.y + y,
                image::Rgba([
                    over(r, background[0]),
                    over(g, background[1]),
                    over(b, background[2]),
                    255,
                ]),
            );
        }
        log::debug!("loaded image at {placement:?}");
        Ok(placement)
    }
    /// Encode the surface, as presented, to PNG.
    ///
    /// # Errors
    /// Encoder failure, or an empty surface.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        if self.buffer.is_empty() {
            return Err(SurfaceError::EmptySurface);
        }
        let mut out = std::io::Cursor::new(Vec::new());
        self.buffer
            .flattened()
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(SurfaceError::Encode)?;
        Ok(out.into_inner())
    }
    /// The surface as a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    /// See [`Self::encode_png`].
    pub fn to_data_url(&self) -> Result<String, SurfaceError> {
        use base64::Engine;
        let png = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}
