//! Graphics support for the ST7565
//!
//! The framebuffer always holds `WIDTH * HEIGHT / 8` bytes. The rotation only
//! decides how a logical `(x, y)` is packed into those bytes:
//!
//! - 0° and 180°: vertical pages, `byte = x + (y / 8) * width`, bit `y % 8`
//!   (LSB is the top pixel of the page). This is the controller's own layout.
//! - 90° and 270°: horizontal rows, `byte = y * (width / 8) + x / 8`,
//!   bit `7 - x % 8` (MSB is the leftmost pixel). Reordered before transfer,
//!   see [`to_page_layout`].

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::st7565::{BUFFER_SIZE, HEIGHT, PAGES, WIDTH};

/// Display rotation, only 90° increments supported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// How pixels are packed into framebuffer bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackingFormat {
    /// Column-major pages, one bit per row, LSB on top
    VerticalLsb,
    /// Row-major, one bit per column, MSB on the left
    HorizontalMsb,
}

impl DisplayRotation {
    /// Whether this is a quarter turn, which swaps width and height
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, DisplayRotation::Rotate90 | DisplayRotation::Rotate270)
    }

    /// Width and height as seen by the drawing API
    pub fn logical_size(self) -> (u32, u32) {
        if self.is_quarter_turn() {
            (HEIGHT, WIDTH)
        } else {
            (WIDTH, HEIGHT)
        }
    }

    /// Buffer packing used for this rotation
    pub fn packing(self) -> PackingFormat {
        if self.is_quarter_turn() {
            PackingFormat::HorizontalMsb
        } else {
            PackingFormat::VerticalLsb
        }
    }

    /// Whether the common (row) scan direction is reversed
    pub fn horizontal_reverse(self) -> bool {
        matches!(
            self,
            DisplayRotation::Rotate180 | DisplayRotation::Rotate270
        )
    }

    /// Whether the segment (column) driver direction is reversed
    pub fn vertical_reverse(self) -> bool {
        matches!(self, DisplayRotation::Rotate0 | DisplayRotation::Rotate270)
    }

    /// Column address offset sent with every page, given the panel's column shift
    pub fn column_offset(self, shift: u8) -> u8 {
        match self {
            DisplayRotation::Rotate90 | DisplayRotation::Rotate180 => shift,
            DisplayRotation::Rotate0 | DisplayRotation::Rotate270 => 0,
        }
    }
}

/// Reorder a row-major (quarter turn) buffer into the controller's page layout.
///
/// Physical column `col` of page `page` lives at `src[col * PAGES + page]`.
/// For 0° and 180° the buffer is already in page layout and must not be passed here.
pub fn to_page_layout(src: &[u8; BUFFER_SIZE], dst: &mut [u8; BUFFER_SIZE]) {
    let width = WIDTH as usize;
    let rowsize = PAGES as usize;
    for col in 0..width {
        for page in 0..rowsize {
            dst[col + page * width] = src[col * rowsize + page];
        }
    }
}

/// Inverse of [`to_page_layout`]
pub fn from_page_layout(src: &[u8; BUFFER_SIZE], dst: &mut [u8; BUFFER_SIZE]) {
    let width = WIDTH as usize;
    let rowsize = PAGES as usize;
    for col in 0..width {
        for page in 0..rowsize {
            dst[col * rowsize + page] = src[col + page * width];
        }
    }
}

/// Packed monochrome framebuffer
///
/// Coordinates outside the logical size are ignored by every write and read
/// as `Off`, so drawing code never has to clip.
#[derive(Clone)]
pub struct Framebuffer {
    buffer: [u8; BUFFER_SIZE],
    rotation: DisplayRotation,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Create a cleared framebuffer for the given rotation
    pub fn new(rotation: DisplayRotation) -> Self {
        let (width, height) = rotation.logical_size();
        Framebuffer {
            buffer: [0u8; BUFFER_SIZE],
            rotation,
            width,
            height,
        }
    }

    /// Rotation this buffer was created with
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Logical width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// get internal buffer, packed for the current rotation
    pub fn buffer(&self) -> &[u8; BUFFER_SIZE] {
        &self.buffer
    }

    /// Byte index and bit mask of a logical pixel, `None` when out of range
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        let located = match self.rotation.packing() {
            PackingFormat::VerticalLsb => ((x + (y / 8) * self.width) as usize, 1 << (y % 8)),
            PackingFormat::HorizontalMsb => {
                ((y * (self.width / 8) + x / 8) as usize, 0x80 >> (x % 8))
            }
        };
        Some(located)
    }

    /// Set a single pixel, ignored when out of range
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if let Some((index, mask)) = self.locate(x, y) {
            match color {
                BinaryColor::On => self.buffer[index] |= mask,
                BinaryColor::Off => self.buffer[index] &= !mask,
            }
        }
    }

    /// Read a single pixel, `Off` when out of range
    pub fn get_pixel(&self, x: i32, y: i32) -> BinaryColor {
        match self.locate(x, y) {
            Some((index, mask)) if self.buffer[index] & mask != 0 => BinaryColor::On,
            _ => BinaryColor::Off,
        }
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: BinaryColor) {
        let byte = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.fill(byte);
    }

    /// Frame in the controller's page layout, reordered for quarter turns
    pub fn page_frame(&self) -> [u8; BUFFER_SIZE] {
        if self.rotation.is_quarter_turn() {
            let mut frame = [0u8; BUFFER_SIZE];
            to_page_layout(&self.buffer, &mut frame);
            frame
        } else {
            self.buffer
        }
    }

    /// Replace the contents with a frame in the controller's page layout
    pub fn load_page_frame(&mut self, frame: &[u8; BUFFER_SIZE]) {
        if self.rotation.is_quarter_turn() {
            from_page_layout(frame, &mut self.buffer);
        } else {
            self.buffer.copy_from_slice(frame);
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new(DisplayRotation::default())
    }
}

/// For use with embedded_graphics
impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// For use with embedded_graphics
impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
