//! Framebuffer driver for ST7565 / ST7567 page-addressed monochrome LCDs.
//!
//! See [`st7565`] for how the driver is meant to be used.

pub mod st7565;

pub use crate::st7565::bitmap::Bitmap;
pub use crate::st7565::driver::{Config, St7565};
pub use crate::st7565::error::{DisplayError, Error, InvalidParameter};
pub use crate::st7565::font::{Font, Glyph, GlyphData, GlyphTable, TextLayout};
pub use crate::st7565::graphics::{DisplayRotation, Framebuffer, PackingFormat};
pub use crate::st7565::interface::{HardwareLink, SpiInterface};
pub use crate::st7565::{BUFFER_SIZE, HEIGHT, PAGES, WIDTH};
