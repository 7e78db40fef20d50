//! ST7565 Display Driver Implementation
//!
//! This module contains the main driver for the ST7565 LCD controller. It owns
//! the framebuffer, forwards drawing calls to it, and talks to the panel only
//! on explicit calls.
//!
//! ## Architecture
//!
//! ### Initialization Functions
//! - `new()` - Validate the configuration, reset and initialize the panel
//! - `init()` - The power-up command sequence, also usable after `reset()`
//!
//! ### Display Update Functions
//! - `present()` - Write the whole framebuffer, page by page
//!
//! ### Display Control Functions
//! - `set_contrast()` - Electronic volume, 1..=63
//! - `set_inverted()`, `show_all_pixels()`, `set_display_on()`
//! - `set_horizontal_reverse()`, `set_vertical_reverse()` - scan directions, normally set from the rotation
//!
//! ### Drawing Functions
//! - `pixel()`, `line()`, `rect()`, `ellipse()`, `fill()`, `clear_buffer()`
//! - `draw_bitmap()`, `load_bmp()`, `load_page_frame()`
//! - `text()` with a font set through `set_font()`
//! - everything from `embedded_graphics` through the `DrawTarget` impl
//!
//! ## Critical Implementation Details
//!
//! ### Page Writes
//!
//! The controller RAM is 8 pages of 8 rows. Each page is addressed with start
//! line, page and column (high and low nibble) commands, then `WIDTH` data
//! bytes follow. All 8 pages go out inside one chip select frame.
//!
//! ### Column Shift
//!
//! Panels mounted at 90° or 180° see the glass offset by a few columns, so the
//! column address of every page starts at the configured shift there.

use std::io::{Read, Seek};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;

use crate::st7565::bitmap::Bitmap;
use crate::st7565::error::{DisplayError, Error, InvalidParameter};
use crate::st7565::font::{render_text, Font, TextLayout};
use crate::st7565::graphics::{DisplayRotation, Framebuffer};
use crate::st7565::interface::HardwareLink;
use crate::st7565::{bmp, cmd::Cmd, flag::Flag, BUFFER_SIZE, WIDTH};

/// Time the reset line is held low
const RESET_LOW_MS: u32 = 1;
/// Time the controller needs after reset is released
const RESET_SETTLE_MS: u32 = 30;

/// Construction time settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Rotation, fixed for the lifetime of the driver
    pub rotation: DisplayRotation,
    /// Column shift of the panel glass, used on 90° and 180°
    pub shift: u8,
    /// Initial contrast, 1..=63
    pub contrast: u8,
}

impl Config {
    /// Default configuration: no rotation, shift of 4 columns, contrast 0x20
    pub fn new() -> Self {
        Config {
            rotation: DisplayRotation::Rotate0,
            shift: Flag::COLUMN_SHIFT_DEFAULT,
            contrast: Flag::CONTRAST_DEFAULT,
        }
    }

    /// Set the rotation
    pub fn rotation(mut self, rotation: DisplayRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the column shift
    pub fn shift(mut self, shift: u8) -> Self {
        self.shift = shift;
        self
    }

    /// Set the initial contrast
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.contrast = contrast;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

fn check_contrast(value: u8) -> Result<u8, Error> {
    if (Flag::CONTRAST_MIN..=Flag::CONTRAST_MAX).contains(&value) {
        Ok(value)
    } else {
        log::error!("Incorrect contrast value {}", value);
        Err(InvalidParameter::Contrast(value).into())
    }
}

/// ST7565 LCD Driver
///
/// Main driver struct that owns the hardware link and the framebuffer.
///
/// ## Type Parameters
///
/// - `LINK` - Command/data link to the controller, usually [`crate::st7565::interface::SpiInterface`]
/// - `DELAY` - Delay provider for the reset timing
///
/// Drawing does read-modify-write on shared bytes, so a multi-threaded host
/// must put the whole driver behind one lock.
pub struct St7565<LINK, DELAY> {
    link: LINK,
    delay: DELAY,
    framebuffer: Framebuffer,
    shift: u8,
    contrast: u8,
    font: Option<Box<dyn Font>>,
    text_wrap: bool,
}

impl<LINK, DELAY> St7565<LINK, DELAY>
where
    LINK: HardwareLink,
    DELAY: DelayNs,
{
    /// Create and initialize the display driver
    ///
    /// An out of range contrast is rejected before anything is sent.
    pub fn new(link: LINK, delay: DELAY, config: Config) -> Result<Self, Error> {
        let contrast = check_contrast(config.contrast)?;
        let mut st7565 = St7565 {
            link,
            delay,
            framebuffer: Framebuffer::new(config.rotation),
            shift: config.shift,
            contrast,
            font: None,
            text_wrap: false,
        };
        st7565.init()?;
        Ok(st7565)
    }

    /// Reset the controller and run the power-up sequence for the configured rotation
    pub fn init(&mut self) -> Result<(), Error> {
        let rotation = self.framebuffer.rotation();
        log::info!("Initializing ST7565, rotation {:?}", rotation);

        self.reset()?;

        self.link.send_command(Cmd::DISPLAY_OFF)?;
        // LCD drive voltage 1/9 bias
        self.link.send_command(Cmd::SET_BIAS_9)?;
        self.link.send_command(Cmd::SET_ADC_REVERSE)?;
        self.link.send_command(Cmd::SET_COL_NORMAL)?;
        // V0 regulator resistor ratio
        self.link
            .send_command(Cmd::SET_RESISTOR_RATIO + Flag::RESISTOR_RATIO)?;
        self.link.send_command(Cmd::SET_VOLUME)?;
        self.link.send_command(self.contrast)?;
        self.link.send_command(Cmd::SET_POWER + Flag::POWER_MODE)?;

        self.set_horizontal_reverse(rotation.horizontal_reverse())?;
        self.set_vertical_reverse(rotation.vertical_reverse())?;

        self.link.send_command(Cmd::DISPLAY_ON)?;

        log::info!(
            "ST7565 initialized, column offset {}",
            rotation.column_offset(self.shift)
        );
        Ok(())
    }

    /// Hardware reset followed by a software reset command
    ///
    /// Blocks for the reset timing; leaves the controller in its power-on state.
    pub fn reset(&mut self) -> Result<(), Error> {
        log::info!("Resetting display");
        self.link.set_reset_line(false)?;
        self.delay.delay_ms(RESET_LOW_MS);
        self.link.set_reset_line(true)?;
        self.delay.delay_ms(RESET_SETTLE_MS);

        self.link.send_command(Cmd::DISPLAY_RESET)?;
        Ok(())
    }

    /// Set the contrast (electronic volume), 1..=63
    pub fn set_contrast(&mut self, value: u8) -> Result<(), Error> {
        let value = check_contrast(value)?;
        self.link.send_command(Cmd::SET_VOLUME)?;
        self.link.send_command(value)?;
        self.contrast = value;
        Ok(())
    }

    /// Show lit pixels as clear and the other way around
    pub fn set_inverted(&mut self, on: bool) -> Result<(), Error> {
        let command = if on {
            Cmd::SET_DISPLAY_REVERSE
        } else {
            Cmd::SET_DISPLAY_NORMAL
        };
        self.link.send_command(command)?;
        Ok(())
    }

    /// Reverse the common (row) scan direction, takes effect immediately
    pub fn set_horizontal_reverse(&mut self, on: bool) -> Result<(), Error> {
        let command = if on {
            Cmd::SET_COL_REVERSE
        } else {
            Cmd::SET_COL_NORMAL
        };
        self.link.send_command(command)?;
        Ok(())
    }

    /// Reverse the segment (column) driver direction, applies to the next `present`
    pub fn set_vertical_reverse(&mut self, on: bool) -> Result<(), Error> {
        let command = if on {
            Cmd::SET_ADC_REVERSE
        } else {
            Cmd::SET_ADC_NORMAL
        };
        self.link.send_command(command)?;
        Ok(())
    }

    /// Light every pixel regardless of RAM contents
    pub fn show_all_pixels(&mut self, on: bool) -> Result<(), Error> {
        let command = if on {
            Cmd::SET_ALLPX_ON
        } else {
            Cmd::SET_ALLPX_NORMAL
        };
        self.link.send_command(command)?;
        Ok(())
    }

    /// Switch the display on or off, RAM contents are kept
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error> {
        let command = if on { Cmd::DISPLAY_ON } else { Cmd::DISPLAY_OFF };
        self.link.send_command(command)?;
        Ok(())
    }

    /// Write the whole framebuffer to the display
    ///
    /// Quarter turn buffers are reordered into page layout first. The 8 page
    /// writes share one chip select frame; chip select is released even when
    /// a write fails.
    pub fn present(&mut self) -> Result<(), Error> {
        let rotation = self.framebuffer.rotation();
        let offset = rotation.column_offset(self.shift);
        log::debug!("Presenting frame, rotation {:?}, column offset {}", rotation, offset);

        let frame = self.framebuffer.page_frame();

        self.link.select()?;
        let written = self.write_pages(&frame, offset);
        let released = self.link.deselect();
        written?;
        released?;
        Ok(())
    }

    fn write_pages(&mut self, frame: &[u8; BUFFER_SIZE], offset: u8) -> Result<(), DisplayError> {
        for (page, data) in frame.chunks_exact(WIDTH as usize).enumerate() {
            log::trace!("Writing page {}", page);
            self.link.send_commands(&[
                Cmd::SET_START_LINE,
                Cmd::SET_PAGE + page as u8,
                Cmd::COLUMN_HI | (offset >> 4),
                Cmd::COLUMN_LOW | (offset & Flag::COLUMN_NIBBLE_MASK),
            ])?;
            self.link.send_data(data)?;
        }
        Ok(())
    }

    /// Load a BMP image from `reader` onto the framebuffer at `(x, y)`
    ///
    /// Only uncompressed 1 bit BMPs are accepted. The image is fully decoded
    /// before anything is drawn, so a failure leaves the framebuffer unchanged.
    pub fn load_bmp<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        x: i32,
        y: i32,
        color: BinaryColor,
    ) -> Result<(), Error> {
        let bitmap = bmp::decode(reader, color)?;
        self.framebuffer.blit(&bitmap, x, y, color);
        Ok(())
    }
}

impl<LINK, DELAY> St7565<LINK, DELAY> {
    /// The framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// The framebuffer, for drawing directly
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Rotation the driver was created with
    pub fn rotation(&self) -> DisplayRotation {
        self.framebuffer.rotation()
    }

    /// Current contrast
    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// The hardware link
    pub fn link(&self) -> &LINK {
        &self.link
    }

    /// The hardware link, for sending commands the driver does not cover
    pub fn link_mut(&mut self) -> &mut LINK {
        &mut self.link
    }

    /// Give back the link and delay
    pub fn release(self) -> (LINK, DELAY) {
        (self.link, self.delay)
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: BinaryColor) {
        self.framebuffer.fill(color);
    }

    /// Clear the framebuffer
    pub fn clear_buffer(&mut self) {
        self.framebuffer.fill(BinaryColor::Off);
    }

    /// Set one pixel, out of range coordinates are ignored
    pub fn pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        self.framebuffer.set_pixel(x, y, color);
    }

    /// Line between two points, both included
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: BinaryColor) {
        self.framebuffer.line(x1, y1, x2, y2, color);
    }

    /// Rectangle outline or filled rectangle
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: BinaryColor, fill: bool) {
        self.framebuffer.rect(x, y, w, h, color, fill);
    }

    /// Ellipse outline or filled ellipse
    pub fn ellipse(&mut self, cx: i32, cy: i32, xr: i32, yr: i32, color: BinaryColor, fill: bool) {
        self.framebuffer.ellipse(cx, cy, xr, yr, color, fill);
    }

    /// Paint the set bits of `bitmap` at `(x, y)`
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32, color: BinaryColor) {
        self.framebuffer.blit(bitmap, x, y, color);
    }

    /// Replace the framebuffer with a frame already in the controller's page layout
    pub fn load_page_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        let frame: &[u8; BUFFER_SIZE] = frame.try_into().map_err(|_| {
            log::error!("Page frame of {} bytes, expected {}", frame.len(), BUFFER_SIZE);
            InvalidParameter::FrameSize {
                expected: BUFFER_SIZE,
                actual: frame.len(),
            }
        })?;
        self.framebuffer.load_page_frame(frame);
        Ok(())
    }

    /// Font used by [`St7565::text`]
    pub fn set_font<F: Font + 'static>(&mut self, font: F) {
        self.font = Some(Box::new(font));
    }

    /// Forget the font, `text` fails until a new one is set
    pub fn clear_font(&mut self) {
        self.font = None;
    }

    /// Wrap text at the right edge back to its start column
    pub fn set_text_wrap(&mut self, on: bool) {
        self.text_wrap = on;
    }

    /// Draw `text` with the configured font, top-left of the first glyph at `(x, y)`
    ///
    /// Fails with [`Error::NoFont`] without drawing when no font is set.
    pub fn text(&mut self, text: &str, x: i32, y: i32, color: BinaryColor) -> Result<(), Error> {
        let layout = TextLayout {
            x,
            y,
            wrap: self.text_wrap,
        };
        render_text(&mut self.framebuffer, self.font.as_deref(), text, layout, color)?;
        Ok(())
    }
}

/// For use with embedded_graphics
impl<LINK, DELAY> DrawTarget for St7565<LINK, DELAY> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.fill(color);
        Ok(())
    }
}

/// For use with embedded_graphics
impl<LINK, DELAY> OriginDimensions for St7565<LINK, DELAY> {
    fn size(&self) -> Size {
        self.framebuffer.size()
    }
}
