use crate::brush::BrushWidths;
use crate::color::Color;
use crate::input::PointerKinds;
use crate::overlay::Millis;

/// What to do when a submission is started while another is still in flight.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::EnumString, strum::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SubmissionPolicy {
    /// Let both run. Responses are applied in whatever order they arrive.
    #[default]
    Concurrent,
    /// Refuse new submissions until the outstanding one resolves.
    SingleSlot,
}

/// Everything needed to stand up a [`crate::dispatch::Dispatcher`].
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Initial palette color.
    pub color: Color,
    pub widths: BrushWidths,
    pub accepted: PointerKinds,
    /// Stagger between consecutive overlay reveals.
    pub reveal_delay: Millis,
    pub policy: SubmissionPolicy,
    pub voice_supported: bool,
}
impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            background: Color::BLACK,
            color: Color::WHITE,
            widths: BrushWidths::default(),
            accepted: PointerKinds::default(),
            reveal_delay: 1000,
            policy: SubmissionPolicy::default(),
            voice_supported: true,
        }
    }
}
