//! # Actions
//!
//! High-level intents, independent of where they came from (a button, a spoken command, a replayed script).
//! Spoken commands are matched against [`VOICE_VOCABULARY`].

use crate::color::Color;

#[derive(Clone, PartialEq, Eq, Debug, strum::AsRefStr)]
pub enum Action {
    /// Send the surface off for recognition.
    Submit,
    /// Clear surface, variables and overlays.
    Reset,
    ToggleEraser,
    /// Emit the surface as a PNG.
    Save,
    SelectColor(Color),
    /// Replace the surface with an encoded raster.
    LoadImage(Vec<u8>),
    Resize { width: u32, height: u32 },
    ToggleVoice,
}

/// Spoken keywords, in match priority order. Matching is a case-insensitive substring search,
/// and only the first hit counts.
pub static VOICE_VOCABULARY: &[(&str, Action)] = &[
    ("calculate", Action::Submit),
    ("reset", Action::Reset),
    ("eraser", Action::ToggleEraser),
    ("save", Action::Save),
];

/// Map a finalized utterance to at most one action.
#[must_use]
pub fn match_utterance(utterance: &str) -> Option<Action> {
    let lower = utterance.to_lowercase();
    VOICE_VOCABULARY
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, action)| action.clone())
}

#[cfg(test)]
mod test {
    use super::{match_utterance, Action};
    #[test]
    fn substring_match() {
        assert_eq!(
            match_utterance("please calculate this now"),
            Some(Action::Submit)
        );
        assert_eq!(match_utterance("RESET everything"), Some(Action::Reset));
        assert_eq!(match_utterance("erasers!"), Some(Action::ToggleEraser));
        assert_eq!(match_utterance("save it"), Some(Action::Save));
        assert_eq!(match_utterance("hello there"), None);
        assert_eq!(match_utterance(""), None);
    }
    #[test]
    fn first_keyword_wins() {
        // Vocabulary order, not textual position in the utterance.
        assert_eq!(
            match_utterance("save then reset then calculate"),
            Some(Action::Submit)
        );
        assert_eq!(match_utterance("eraser and reset"), Some(Action::Reset));
    }
}
