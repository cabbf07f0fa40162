/// A straight (non-premultiplied) sRGB color with 8 bits per channel.
///
/// Alpha here is the alpha of the *paint*, not the content flag of the surface. See
/// [`crate::buffer::PixelBuffer`] for how the surface uses the alpha channel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct Color([u8; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
    #[must_use]
    pub const fn as_array(&self) -> [u8; 4] {
        self.0
    }
    #[must_use]
    pub const fn rgb_array(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.0[3]
    }
    /// The same color with a different alpha.
    #[must_use = "returns a new color without modifying `self`"]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self([self.0[0], self.0[1], self.0[2], alpha])
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
impl From<Color> for image::Rgba<u8> {
    fn from(value: Color) -> Self {
        image::Rgba(value.0)
    }
}
impl From<image::Rgba<u8>> for Color {
    fn from(value: image::Rgba<u8>) -> Self {
        Self(value.0)
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("hex color must have 3, 6, or 8 digits")]
    HexLength,
    #[error("invalid hex digit")]
    HexDigit,
    #[error("`rgb(...)` needs three components in 0..=255")]
    Functional,
    #[error("unknown color name")]
    UnknownName,
}

/// Parse from `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or a handful of names.
/// Case-insensitive, surrounding whitespace is ignored.
impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args);
        }
        match lower.as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::rgb(255, 0, 0)),
            "green" => Ok(Self::rgb(0, 128, 0)),
            "blue" => Ok(Self::rgb(0, 0, 255)),
            "transparent" => Ok(Self::TRANSPARENT),
            _ => Err(ColorParseError::UnknownName),
        }
    }
}
fn parse_hex(hex: &str) -> Result<Color, ColorParseError> {
    let digit = |c: u8| -> Result<u8, ColorParseError> {
        (c as char)
            .to_digit(16)
            // Always < 16
            .map(|d| d as u8)
            .ok_or(ColorParseError::HexDigit)
    };
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = digit(bytes[0])?;
            let g = digit(bytes[1])?;
            let b = digit(bytes[2])?;
            // #abc == #aabbcc
            Ok(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let mut channels = [255u8; 4];
            for (channel, pair) in channels.iter_mut().zip(bytes.chunks_exact(2)) {
                *channel = digit(pair[0])? << 4 | digit(pair[1])?;
            }
            Ok(Color(channels))
        }
        _ => Err(ColorParseError::HexLength),
    }
}
fn parse_functional(args: &str) -> Result<Color, ColorParseError> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<u8>().map_err(|_| ColorParseError::Functional);
    match parts.as_slice() {
        [r, g, b] => Ok(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            // CSS alpha is a float in [0, 1]
            let a: f32 = a.parse().map_err(|_| ColorParseError::Functional)?;
            if !(0.0..=1.0).contains(&a) {
                return Err(ColorParseError::Functional);
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let a = (a * 255.0).round() as u8;
            Ok(Color::rgba(channel(r)?, channel(g)?, channel(b)?, a))
        }
        _ => Err(ColorParseError::Functional),
    }
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};
    #[test]
    fn parse_forms() {
        assert_eq!("#ffffff".parse(), Ok(Color::WHITE));
        assert_eq!("#000".parse(), Ok(Color::BLACK));
        assert_eq!("#ee3333".parse(), Ok(Color::rgb(0xee, 0x33, 0x33)));
        assert_eq!("rgb(255, 255, 255)".parse(), Ok(Color::WHITE));
        assert_eq!("  RGB(1,2,3) ".parse(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!("black".parse(), Ok(Color::BLACK));
        assert_eq!(
            "rgba(10, 20, 30, 0)".parse(),
            Ok(Color::rgba(10, 20, 30, 0))
        );
    }
    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Color>(), Err(ColorParseError::Empty));
        assert_eq!("#12345".parse::<Color>(), Err(ColorParseError::HexLength));
        assert_eq!("#gggggg".parse::<Color>(), Err(ColorParseError::HexDigit));
        assert_eq!(
            "rgb(256, 0, 0)".parse::<Color>(),
            Err(ColorParseError::Functional)
        );
        assert_eq!("mauve".parse::<Color>(), Err(ColorParseError::UnknownName));
    }
    #[test]
    fn display_round_trips_hex() {
        let c = Color::rgb(0x12, 0xab, 0x0f);
        assert_eq!(c.to_string(), "#12ab0f");
        assert_eq!(c.to_string().parse(), Ok(c));
    }
}
