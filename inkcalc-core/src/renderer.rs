//! # Stroke renderer
//!
//! Turns a begin/extend/end sequence of pointer samples into round-capped line segments on a
//! [`PixelBuffer`]. Every extend commits immediately, there is no batching.

use crate::brush::{BrushSettings, DrawMode};
use crate::buffer::PixelBuffer;
use crate::input::{PointerKinds, PointerSample};
use crate::util::{FinitePoint, Rect};

/// Radius below which a segment could miss every cell center.
const MIN_RADIUS: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// An in-progress stroke. Lives from pointer-down to pointer-up.
#[derive(Clone, Debug)]
pub struct StrokeSession {
    last: FinitePoint,
    brush: BrushSettings,
}
impl StrokeSession {
    #[must_use]
    pub fn last_point(&self) -> [f32; 2] {
        self.last.get()
    }
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.brush.mode()
    }
}

pub struct StrokeRenderer {
    accepted: PointerKinds,
    session: Option<StrokeSession>,
}
impl StrokeRenderer {
    #[must_use]
    pub fn new(accepted: PointerKinds) -> Self {
        Self {
            accepted,
            session: None,
        }
    }
    #[must_use]
    pub fn accepted(&self) -> PointerKinds {
        self.accepted
    }
    pub fn set_accepted(&mut self, accepted: PointerKinds) {
        self.accepted = accepted;
    }
    #[must_use]
    pub fn session(&self) -> Option<&StrokeSession> {
        self.session.as_ref()
    }
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.session.is_some()
    }
    /// Start a new path at `sample`. Nothing is drawn yet.
    ///
    /// Returns false if the sample was ignored (unaccepted pointer kind or non-finite position),
    /// in which case any previous session is left as-is.
    pub fn begin_stroke(&mut self, sample: &PointerSample, brush: &BrushSettings) -> bool {
        if !sample.is_accepted_by(self.accepted) {
            log::trace!("ignoring stroke start from {:?}", sample.source);
            return false;
        }
        let Some(last) = sample.point() else {
            return false;
        };
        self.session = Some(StrokeSession {
            last,
            brush: *brush,
        });
        true
    }
    /// Draw a segment from the previous point to `sample`, returning the cells it touched.
    ///
    /// `None` if there is no stroke in progress, the sample was ignored, or the segment lies
    /// entirely outside the buffer.
    pub fn extend_stroke(
        &mut self,
        sample: &PointerSample,
        buffer: &mut PixelBuffer,
    ) -> Option<Rect> {
        let session = self.session.as_mut()?;
        if !sample.is_accepted_by(self.accepted) {
            return None;
        }
        let next = sample.point()?;
        let from = std::mem::replace(&mut session.last, next);

        let width = session.brush.stroke_width(sample);
        let brush = &session.brush;
        let paint = |buffer: &mut PixelBuffer, x: i64, y: i64| match brush.mode() {
            DrawMode::Draw => buffer.paint(x, y, brush.stroke_color()),
            DrawMode::Erase => buffer.erase(x, y),
        };
        stroke_segment(buffer, from.get(), next.get(), width, paint)
    }
    /// Finish the current stroke. Further extends are ignored until the next begin.
    pub fn end_stroke(&mut self) {
        self.session = None;
    }
}
impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new(PointerKinds::default())
    }
}

/// Squared distance from `p` to the segment `a..b`.
fn distance_sq_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if len_sq > 0.0 {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0)
    } else {
        // Degenerate segment, a dot.
        0.0
    };
    let d = [ap[0] - ab[0] * t, ap[1] - ab[1] * t];
    d[0] * d[0] + d[1] * d[1]
}

/// Rasterize a capsule of the given `width` around `a..b`, calling `paint` for every covered cell.
/// Cell `(x, y)` is sampled at its integer coordinate. Round caps and joins fall out of the capsule shape.
fn stroke_segment(
    buffer: &mut PixelBuffer,
    a: [f32; 2],
    b: [f32; 2],
    width: f32,
    mut paint: impl FnMut(&mut PixelBuffer, i64, i64),
) -> Option<Rect> {
    let bounds = buffer.bounds()?;
    let radius = (width / 2.0).max(MIN_RADIUS);
    let radius_sq = radius * radius;

    // Candidate cells, clipped to the buffer.
    #[allow(clippy::cast_possible_truncation)]
    let to_cell = |v: f32| v as i64;
    let min_x = to_cell((a[0].min(b[0]) - radius).floor()).max(0);
    let min_y = to_cell((a[1].min(b[1]) - radius).floor()).max(0);
    let max_x = to_cell((a[0].max(b[0]) + radius).ceil()).min(i64::from(bounds.max[0]));
    let max_y = to_cell((a[1].max(b[1]) + radius).ceil()).min(i64::from(bounds.max[1]));
    if min_x > max_x || min_y > max_y {
        return None;
    }

    let mut dirty: Option<Rect> = None;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            #[allow(clippy::cast_precision_loss)]
            let p = [x as f32, y as f32];
            if distance_sq_to_segment(p, a, b) <= radius_sq {
                paint(buffer, x, y);
                // In range by construction: clamped to [0, bounds.max]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let cell = Rect {
                    min: [x as u32, y as u32],
                    max: [x as u32, y as u32],
                };
                dirty = Some(dirty.map_or(cell, |d| d.union(cell)));
            }
        }
    }
    dirty
}

#[cfg(test)]
mod test {
    use super::StrokeRenderer;
    use crate::brush::BrushSettings;
    use crate::buffer::PixelBuffer;
    use crate::color::Color;
    use crate::input::{InputSource, PointerKinds, PointerSample};

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(64, 48, Color::BLACK).unwrap()
    }
    fn pen(x: f32, y: f32, pressure: f32) -> PointerSample {
        PointerSample::new((x, y), InputSource::pen(pressure))
    }
    fn touched(buffer: &PixelBuffer) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if buffer.is_content(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }
    #[test]
    fn begin_commits_nothing() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        assert!(renderer.begin_stroke(&pen(10.0, 10.0, 1.0), &BrushSettings::default()));
        assert_eq!(buffer.content_count(), 0);
        renderer.extend_stroke(&pen(20.0, 10.0, 1.0), &mut buffer);
        assert!(buffer.content_count() > 0);
        assert!(buffer.is_content(15, 10));
    }
    #[test]
    fn draw_is_monotonic() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        renderer.begin_stroke(&pen(5.0, 5.0, 1.0), &BrushSettings::default());
        let path = [
            (10.0, 8.0, 0.2),
            (18.0, 20.0, 1.0),
            (12.0, 30.0, 0.6),
            (6.0, 6.0, 0.05),
            (40.0, 40.0, 0.9),
        ];
        let mut previous = touched(&buffer);
        for (x, y, p) in path {
            renderer.extend_stroke(&pen(x, y, p), &mut buffer);
            let now = touched(&buffer);
            assert!(previous.iter().all(|cell| now.contains(cell)));
            previous = now;
        }
    }
    #[test]
    fn end_stops_extends() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        renderer.begin_stroke(&pen(5.0, 5.0, 1.0), &BrushSettings::default());
        renderer.end_stroke();
        assert!(renderer
            .extend_stroke(&pen(30.0, 30.0, 1.0), &mut buffer)
            .is_none());
        assert_eq!(buffer.content_count(), 0);
    }
    #[test]
    fn pressure_width() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        // Full pressure: 4 wide, radius 2.
        renderer.begin_stroke(&pen(10.0, 20.0, 1.0), &BrushSettings::default());
        let dirty = renderer
            .extend_stroke(&pen(30.0, 20.0, 1.0), &mut buffer)
            .unwrap();
        assert_eq!(dirty.min, [8, 18]);
        assert_eq!(dirty.max, [32, 22]);
    }
    #[test]
    fn coarse_uses_line_width() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        let at = |x, y| PointerSample::new((x, y), InputSource::Coarse);
        renderer.begin_stroke(&at(20.0, 20.0), &BrushSettings::default());
        // Width 3, radius 1.5: one cell either side.
        let dirty = renderer.extend_stroke(&at(20.0, 20.0), &mut buffer).unwrap();
        assert_eq!(dirty.min, [19, 19]);
        assert_eq!(dirty.max, [21, 21]);
    }
    #[test]
    fn touch_is_ignored_by_default() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        let touch = |x, y| PointerSample::new((x, y), InputSource::touch());
        assert!(!renderer.begin_stroke(&touch(10.0, 10.0), &BrushSettings::default()));
        assert!(renderer.extend_stroke(&touch(20.0, 20.0), &mut buffer).is_none());
        assert_eq!(buffer.content_count(), 0);

        renderer.set_accepted(PointerKinds::all());
        assert!(renderer.begin_stroke(&touch(10.0, 10.0), &BrushSettings::default()));
        assert!(renderer.extend_stroke(&touch(20.0, 20.0), &mut buffer).is_some());
    }
    #[test]
    fn eraser_clears_within_width() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        let mut brush = BrushSettings::default();
        renderer.begin_stroke(&pen(10.0, 24.0, 1.0), &brush);
        renderer.extend_stroke(&pen(50.0, 24.0, 1.0), &mut buffer);
        renderer.end_stroke();
        assert!(buffer.is_content(30, 24));

        brush.toggle_eraser();
        renderer.begin_stroke(&pen(30.0, 24.0, 1.0), &brush);
        renderer.extend_stroke(&pen(30.0, 24.0, 1.0), &mut buffer);
        renderer.end_stroke();
        // Radius 10 around (30, 24) is clear, untouched background again.
        for x in 21..=39 {
            assert!(!buffer.is_content(x, 24), "cell {x} still has content");
            assert_eq!(buffer.get(x, 24), Some(Color::BLACK.with_alpha(0)));
        }
        // Outside the erased width, the line survives.
        assert!(buffer.is_content(15, 24));
        assert!(buffer.is_content(45, 24));
    }
    #[test]
    fn clipped_outside() {
        let mut buffer = buffer();
        let mut renderer = StrokeRenderer::default();
        renderer.begin_stroke(&pen(-100.0, -100.0, 1.0), &BrushSettings::default());
        assert!(renderer
            .extend_stroke(&pen(-50.0, -80.0, 1.0), &mut buffer)
            .is_none());
        // Partially inside is clipped, not rejected.
        let dirty = renderer
            .extend_stroke(&pen(2.0, 2.0, 1.0), &mut buffer)
            .unwrap();
        assert_eq!(dirty.min, [0, 0]);
    }
}
