use inkcalc_core::brush::BrushWidths;
use inkcalc_core::buffer::check_size;
use inkcalc_core::config::{CanvasConfig, SubmissionPolicy};
use inkcalc_core::input::{PointerKind, PointerKinds};
use inkcalc_core::Color;

const DOCUMENTATION: &str = r##"# Inkcalc settings. You may edit this file, but be aware that formatting and comments will not
# be preserved.

# Colors are written as "#rrggbb", "#rrggbbaa", "rgb(r, g, b)", or a plain name like "white".
# `accepted_pointers` is any of "pen", "mouse", "touch". Other pointers never draw.
# `submission_policy` is "concurrent" (several recognitions may be in flight) or "single-slot".
# `request_timeout_secs` is optional. Without it, recognition requests wait indefinitely.

"##;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the recognition service. `/calculate` is appended.
    pub api_url: String,
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Initial drawing color.
    pub color: String,
    /// Palette selectable by index.
    pub swatches: Vec<String>,
    pub line_width: f32,
    pub erase_width: f32,
    pub pressure_scale: f32,
    pub accepted_pointers: Vec<String>,
    pub reveal_delay_ms: u64,
    pub submission_policy: String,
    pub voice_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}
impl Default for Settings {
    fn default() -> Self {
        let config = CanvasConfig::default();
        Self {
            api_url: "http://localhost:8900".to_owned(),
            width: config.width,
            height: config.height,
            background: "black".to_owned(),
            color: "white".to_owned(),
            swatches: [
                "#ffffff", "#ee3333", "#e64980", "#be4bdb", "#893200", "#228be6", "#3333ee",
                "#40c057", "#00aa00", "#fab005", "#fd7e14",
            ]
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
            line_width: config.widths.line,
            erase_width: config.widths.erase,
            pressure_scale: config.widths.pressure_scale,
            accepted_pointers: vec!["pen".to_owned(), "mouse".to_owned()],
            reveal_delay_ms: config.reveal_delay,
            submission_policy: config.policy.to_string(),
            voice_supported: config.voice_supported,
            request_timeout_secs: None,
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";

    /// Path of the settings file in the user's preferences, if there is such a place.
    #[must_use]
    pub fn default_path() -> Option<std::path::PathBuf> {
        let mut dir = preferences_dir()?;
        dir.push(Self::FILENAME);
        Some(dir)
    }
    /// Load from `path`, falling back to defaults on any failure.
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings: Self = toml::from_str(&string)?;
            Ok(settings)
        };
        match settings {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Settings at {path:?} weren't available, defaulting: {e:#}");
                Self::default()
            }
        }
    }
    /// Write to `path`, with a documentation header.
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            // Explicity do *not* create recursively. Any real errors will be emitted by file access below.
            let _ = std::fs::DirBuilder::new().create(parent);
        }
        let mut string = toml::ser::to_string_pretty(self)?;
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(path, string)?;
        Ok(())
    }
    /// Swatch `index` of the palette, if it exists and parses.
    #[must_use]
    pub fn swatch(&self, index: usize) -> Option<Color> {
        let swatch = self.swatches.get(index)?;
        match swatch.parse() {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("swatch {index} ({swatch:?}) is invalid: {e}");
                None
            }
        }
    }
    /// Interpret into core configuration. Unparsable fields are warned about and defaulted individually.
    #[must_use]
    pub fn canvas_config(&self) -> CanvasConfig {
        let defaults = CanvasConfig::default();
        let color_or = |field: &str, value: &str, default: Color| match value.parse() {
            Ok(color) => color,
            Err(e) => {
                log::warn!("settings: {field} = {value:?} is invalid ({e}), using {default}");
                default
            }
        };
        let accepted = self
            .accepted_pointers
            .iter()
            .filter_map(|kind| match kind.parse::<PointerKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    log::warn!("settings: unknown pointer kind {kind:?} ignored");
                    None
                }
            })
            .collect::<PointerKinds>();
        if accepted.is_empty() {
            log::warn!("settings: no pointer kinds accepted, nothing will draw");
        }
        let policy = self
            .submission_policy
            .parse::<SubmissionPolicy>()
            .unwrap_or_else(|_| {
                log::warn!(
                    "settings: unknown submission policy {:?}, using {}",
                    self.submission_policy,
                    defaults.policy
                );
                defaults.policy
            });
        let width_or = |value: f32, default: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("settings: width {value} is invalid, using {default}");
                default
            }
        };

        let (width, height) = match check_size(self.width, self.height) {
            Ok(()) => (self.width, self.height),
            Err(e) => {
                log::warn!(
                    "settings: {e}, using {}x{}",
                    defaults.width,
                    defaults.height
                );
                (defaults.width, defaults.height)
            }
        };

        CanvasConfig {
            width,
            height,
            background: color_or("background", &self.background, defaults.background),
            color: color_or("color", &self.color, defaults.color),
            widths: BrushWidths {
                line: width_or(self.line_width, defaults.widths.line),
                erase: width_or(self.erase_width, defaults.widths.erase),
                pressure_scale: width_or(self.pressure_scale, defaults.widths.pressure_scale),
            },
            accepted,
            reveal_delay: self.reveal_delay_ms,
            policy,
            voice_supported: self.voice_supported,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Settings;
    use inkcalc_core::config::{CanvasConfig, SubmissionPolicy};
    use inkcalc_core::input::PointerKinds;
    use inkcalc_core::Color;

    #[test]
    fn defaults_match_core() {
        assert_eq!(Settings::default().canvas_config(), CanvasConfig::default());
    }
    #[test]
    fn partial_file() {
        let settings: Settings = toml::from_str(
            r##"
            api_url = "http://example.invalid"
            accepted_pointers = ["pen", "TOUCH", "trackball"]
            submission_policy = "single-slot"
            background = "#102030"
            "##,
        )
        .unwrap();
        assert_eq!(settings.api_url, "http://example.invalid");
        assert_eq!(settings.width, Settings::default().width);
        let config = settings.canvas_config();
        assert_eq!(config.accepted, PointerKinds::PEN | PointerKinds::TOUCH);
        assert_eq!(config.policy, SubmissionPolicy::SingleSlot);
        assert_eq!(config.background, Color::rgb(0x10, 0x20, 0x30));
    }
    #[test]
    fn bad_values_default() {
        let settings = Settings {
            color: "not a color".to_owned(),
            submission_policy: "whenever".to_owned(),
            line_width: -1.0,
            ..Settings::default()
        };
        let config = settings.canvas_config();
        let defaults = CanvasConfig::default();
        assert_eq!(config.color, defaults.color);
        assert_eq!(config.policy, defaults.policy);
        assert_eq!(config.widths.line, defaults.widths.line);
    }
    #[test]
    fn oversize_canvas_defaults() {
        let defaults = CanvasConfig::default();
        let config = Settings {
            width: u32::MAX,
            height: u32::MAX,
            ..Settings::default()
        }
        .canvas_config();
        assert_eq!((config.width, config.height), (defaults.width, defaults.height));
        let config = Settings {
            width: 640,
            height: 480,
            ..Settings::default()
        }
        .canvas_config();
        assert_eq!((config.width, config.height), (640, 480));
    }
    #[test]
    fn swatches() {
        let settings = Settings {
            swatches: vec!["#ff0000".to_owned(), "bogus".to_owned()],
            ..Settings::default()
        };
        assert_eq!(settings.swatch(0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(settings.swatch(1), None);
        assert_eq!(settings.swatch(2), None);
    }
    #[test]
    fn serializes_with_header() {
        let dir = std::env::temp_dir().join(format!("inkcalc-settings-{}", std::process::id()));
        let _ = std::fs::create_dir(&dir);
        let path = dir.join("settings.toml");
        let settings = Settings {
            request_timeout_secs: Some(5),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Inkcalc settings."));
        assert_eq!(Settings::load_or_default(&path), settings);
        let _ = std::fs::remove_dir_all(&dir);
    }
    #[test]
    fn missing_file_defaults() {
        let path = std::path::Path::new("/definitely/not/here/settings.toml");
        assert_eq!(Settings::load_or_default(path), Settings::default());
    }
}
