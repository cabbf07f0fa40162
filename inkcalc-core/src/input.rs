//! # Pointer input
//!
//! Samples as delivered by the host's event loop, already translated into surface coordinates.
//! There are two ways samples arrive, mirroring the two event paths of a browser-like host:
//! the pressure-aware pointer path, which knows what kind of device produced the event, and the
//! coarse mouse path, which knows nothing but a position.

use crate::util::FinitePoint;

/// The device class reported by the pointer path.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PointerKind {
    Pen,
    Mouse,
    Touch,
}

bitflags::bitflags! {
    /// Set of pointer kinds the renderer will draw for.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct PointerKinds : u8 {
        const PEN   = 0b0000_0001;
        const MOUSE = 0b0000_0010;
        const TOUCH = 0b0000_0100;
    }
}
impl PointerKinds {
    #[must_use]
    pub fn accepts(self, kind: PointerKind) -> bool {
        self.contains(kind.into())
    }
}
impl Default for PointerKinds {
    /// Pen and mouse. Touch must be opted into.
    fn default() -> Self {
        Self::PEN | Self::MOUSE
    }
}
impl From<PointerKind> for PointerKinds {
    fn from(value: PointerKind) -> Self {
        match value {
            PointerKind::Pen => Self::PEN,
            PointerKind::Mouse => Self::MOUSE,
            PointerKind::Touch => Self::TOUCH,
        }
    }
}
impl FromIterator<PointerKind> for PointerKinds {
    fn from_iter<T: IntoIterator<Item = PointerKind>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, kind| acc | kind.into())
    }
}

/// Which event path a sample came from.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum InputSource {
    /// Pressure-aware pointer event. `pressure` is `None` when the device doesn't report it.
    Pointer {
        kind: PointerKind,
        pressure: Option<f32>,
    },
    /// Plain mouse event with no device information.
    Coarse,
}
impl InputSource {
    #[must_use]
    pub fn pen(pressure: f32) -> Self {
        Self::Pointer {
            kind: PointerKind::Pen,
            pressure: Some(pressure),
        }
    }
    #[must_use]
    pub fn mouse() -> Self {
        Self::Pointer {
            kind: PointerKind::Mouse,
            pressure: None,
        }
    }
    #[must_use]
    pub fn touch() -> Self {
        Self::Pointer {
            kind: PointerKind::Touch,
            pressure: None,
        }
    }
    /// Effective pressure, normalized to `[0, 1]`.
    /// Missing, zero, or NaN pressure reads as full pressure.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        match self {
            Self::Pointer {
                pressure: Some(p), ..
            } if *p > 0.0 => p.min(1.0),
            _ => 1.0,
        }
    }
}

/// A single position sample in surface coordinates.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerSample {
    pub pos: (f32, f32),
    pub source: InputSource,
}
impl PointerSample {
    #[must_use]
    pub fn new(pos: (f32, f32), source: InputSource) -> Self {
        Self { pos, source }
    }
    /// The position, if finite.
    #[must_use]
    pub fn point(&self) -> Option<FinitePoint> {
        self.pos.try_into().ok()
    }
    /// Whether a renderer configured with `accepted` should act on this sample.
    /// Coarse samples are always accepted.
    #[must_use]
    pub fn is_accepted_by(&self, accepted: PointerKinds) -> bool {
        match self.source {
            InputSource::Pointer { kind, .. } => accepted.accepts(kind),
            InputSource::Coarse => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{InputSource, PointerKind, PointerKinds, PointerSample};
    #[test]
    fn default_accepts_pen_and_mouse() {
        let accepted = PointerKinds::default();
        assert!(accepted.accepts(PointerKind::Pen));
        assert!(accepted.accepts(PointerKind::Mouse));
        assert!(!accepted.accepts(PointerKind::Touch));
        let touch = PointerSample::new((1.0, 1.0), InputSource::touch());
        assert!(!touch.is_accepted_by(accepted));
        assert!(touch.is_accepted_by(accepted | PointerKinds::TOUCH));
        let coarse = PointerSample::new((1.0, 1.0), InputSource::Coarse);
        assert!(coarse.is_accepted_by(PointerKinds::empty()));
    }
    #[test]
    fn parse_kinds() {
        let kinds: Result<PointerKinds, _> = ["pen", "Touch"]
            .into_iter()
            .map(str::parse::<PointerKind>)
            .collect();
        assert_eq!(kinds.unwrap(), PointerKinds::PEN | PointerKinds::TOUCH);
        assert!("stylus".parse::<PointerKind>().is_err());
        assert_eq!(PointerKind::Mouse.to_string(), "mouse");
    }
    #[test]
    fn pressure_defaults() {
        assert!((InputSource::pen(0.5).pressure() - 0.5).abs() < f32::EPSILON);
        // Zero reads as "unavailable"
        assert!((InputSource::pen(0.0).pressure() - 1.0).abs() < f32::EPSILON);
        assert!((InputSource::pen(f32::NAN).pressure() - 1.0).abs() < f32::EPSILON);
        assert!((InputSource::pen(3.0).pressure() - 1.0).abs() < f32::EPSILON);
        assert!((InputSource::mouse().pressure() - 1.0).abs() < f32::EPSILON);
        assert!((InputSource::Coarse.pressure() - 1.0).abs() < f32::EPSILON);
    }
    #[test]
    fn non_finite_positions() {
        let sample = PointerSample::new((f32::INFINITY, 1.0), InputSource::Coarse);
        assert!(sample.point().is_none());
    }
}
