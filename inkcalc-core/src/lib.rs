//! Headless core of a freehand math canvas: stroke capture onto a raster surface, locating the drawn
//! content, and dispatching user intents to a remote recognizer whose results come back as overlays.

pub mod actions;
pub mod brush;
pub mod buffer;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod localize;
pub mod overlay;
pub mod recognize;
pub mod renderer;
pub mod surface;
pub mod symbols;
pub mod util;
pub mod voice;

pub use color::Color;
pub use config::CanvasConfig;
pub use dispatch::Dispatcher;
