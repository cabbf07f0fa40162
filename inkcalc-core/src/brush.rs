//! # Brush
//!
//! The active drawing mode and the width/color policy derived from it.

use crate::color::Color;
use crate::input::{InputSource, PointerSample};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Draw,
    Erase,
}

/// Widths in surface units.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BrushWidths {
    /// Width of coarse (plain mouse) strokes while drawing.
    pub line: f32,
    /// Width of every eraser stroke.
    pub erase: f32,
    /// Pressure-aware strokes are `pressure * pressure_scale` wide.
    pub pressure_scale: f32,
}
impl Default for BrushWidths {
    fn default() -> Self {
        Self {
            line: 3.0,
            erase: 20.0,
            pressure_scale: 4.0,
        }
    }
}

/// Current brush state: mode, color, and the configured line width.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BrushSettings {
    mode: DrawMode,
    color: Color,
    background: Color,
    /// The width shown to the coarse path. Swapped to the erase width while erasing.
    line_width: f32,
    widths: BrushWidths,
}
impl BrushSettings {
    #[must_use]
    pub fn new(color: Color, background: Color, widths: BrushWidths) -> Self {
        Self {
            mode: DrawMode::Draw,
            color,
            background,
            line_width: widths.line,
            widths,
        }
    }
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.mode == DrawMode::Erase
    }
    /// The palette color, regardless of mode.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }
    #[must_use]
    pub fn widths(&self) -> BrushWidths {
        self.widths
    }
    /// Flip between draw and erase. Entering erase swaps the line width to the erase width,
    /// leaving restores the draw width.
    pub fn toggle_eraser(&mut self) {
        self.mode = match self.mode {
            DrawMode::Draw => DrawMode::Erase,
            DrawMode::Erase => DrawMode::Draw,
        };
        self.line_width = match self.mode {
            DrawMode::Draw => self.widths.line,
            DrawMode::Erase => self.widths.erase,
        };
    }
    /// Pick a palette color. Always returns to draw mode at the default width.
    pub fn select_color(&mut self, color: Color) {
        self.color = color;
        self.mode = DrawMode::Draw;
        self.line_width = self.widths.line;
    }
    /// Color a stroke in the current mode paints with.
    #[must_use]
    pub fn stroke_color(&self) -> Color {
        match self.mode {
            DrawMode::Draw => self.color,
            DrawMode::Erase => self.background,
        }
    }
    /// Width of a segment ending at `sample`.
    #[must_use]
    pub fn stroke_width(&self, sample: &PointerSample) -> f32 {
        match (self.mode, sample.source) {
            (DrawMode::Erase, _) => self.widths.erase,
            (DrawMode::Draw, source @ InputSource::Pointer { .. }) => {
                source.pressure() * self.widths.pressure_scale
            }
            (DrawMode::Draw, InputSource::Coarse) => self.line_width,
        }
    }
}
impl Default for BrushSettings {
    fn default() -> Self {
        Self::new(Color::WHITE, Color::BLACK, BrushWidths::default())
    }
}

#[cfg(test)]
mod test {
    use super::{BrushSettings, DrawMode};
    use crate::color::Color;
    use crate::input::{InputSource, PointerSample};

    fn at(source: InputSource) -> PointerSample {
        PointerSample::new((0.0, 0.0), source)
    }
    #[test]
    fn width_policy() {
        let brush = BrushSettings::default();
        assert!((brush.stroke_width(&at(InputSource::pen(0.5))) - 2.0).abs() < 1e-6);
        // Mouse on the pointer path has no pressure, counts as 1.
        assert!((brush.stroke_width(&at(InputSource::mouse())) - 4.0).abs() < 1e-6);
        assert!((brush.stroke_width(&at(InputSource::Coarse)) - 3.0).abs() < 1e-6);
    }
    #[test]
    fn eraser_ignores_pressure() {
        let mut brush = BrushSettings::default();
        brush.toggle_eraser();
        assert_eq!(brush.mode(), DrawMode::Erase);
        assert_eq!(brush.stroke_color(), Color::BLACK);
        for source in [InputSource::pen(0.1), InputSource::mouse(), InputSource::Coarse] {
            assert!((brush.stroke_width(&at(source)) - 20.0).abs() < 1e-6);
        }
        assert!((brush.line_width() - 20.0).abs() < 1e-6);
        brush.toggle_eraser();
        assert_eq!(brush.mode(), DrawMode::Draw);
        assert!((brush.line_width() - 3.0).abs() < 1e-6);
        assert_eq!(brush.stroke_color(), Color::WHITE);
    }
    #[test]
    fn select_color_leaves_eraser() {
        let mut brush = BrushSettings::default();
        brush.toggle_eraser();
        let red = Color::rgb(255, 0, 0);
        brush.select_color(red);
        assert!(!brush.is_eraser());
        assert_eq!(brush.stroke_color(), red);
        assert!((brush.line_width() - 3.0).abs() < 1e-6);
    }
}
