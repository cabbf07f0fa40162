use inkcalc_core::dispatch::Typesetter;
use inkcalc_core::overlay::Overlay;

/// Headless stand-in for a math renderer: reports what would be on screen.
#[derive(Default)]
pub struct LogTypesetter {
    /// Overlays already reported.
    shown: usize,
}
impl Typesetter for LogTypesetter {
    fn typeset(&mut self, overlays: &[Overlay]) {
        if overlays.len() < self.shown {
            log::info!("overlays cleared");
            self.shown = 0;
        }
        for overlay in &overlays[self.shown..] {
            let (x, y) = overlay.position;
            log::info!("overlay at ({x:.1}, {y:.1}): {}", overlay.markup);
        }
        self.shown = overlays.len();
    }
}
