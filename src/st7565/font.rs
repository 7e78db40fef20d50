//! Bitmap fonts and text rendering

use embedded_graphics::pixelcolor::BinaryColor;

use crate::st7565::bitmap::Bitmap;
use crate::st7565::error::Error;
use crate::st7565::graphics::Framebuffer;

/// A character and its packed bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// The character this glyph draws
    pub character: char,
    /// Glyph pixels, `height` is the line height of the font
    pub bitmap: Bitmap<'a>,
}

/// Lookup from character to glyph
pub trait Font {
    /// Line height in pixels
    fn height(&self) -> u32;

    /// Glyph for `c`, `None` when the font has no such character
    fn glyph(&self, c: char) -> Option<Glyph<'_>>;
}

/// One entry of a [`GlyphTable`]
#[derive(Debug, Clone, Copy)]
pub struct GlyphData {
    /// Character drawn by this entry
    pub character: char,
    /// Advance and bitmap width in pixels
    pub width: u32,
    /// Packed rows, `ceil(width / 8)` bytes each
    pub data: &'static [u8],
}

/// Static font as produced by font converters: every glyph shares one height
#[derive(Debug, Clone, Copy)]
pub struct GlyphTable {
    height: u32,
    glyphs: &'static [GlyphData],
}

impl GlyphTable {
    /// Table of glyphs of the given height
    pub const fn new(height: u32, glyphs: &'static [GlyphData]) -> Self {
        GlyphTable { height, glyphs }
    }
}

impl Font for GlyphTable {
    fn height(&self) -> u32 {
        self.height
    }

    fn glyph(&self, c: char) -> Option<Glyph<'_>> {
        let entry = self.glyphs.iter().find(|g| g.character == c)?;
        match Bitmap::new(entry.data, entry.width, self.height) {
            Ok(bitmap) => Some(Glyph {
                character: c,
                bitmap,
            }),
            Err(e) => {
                log::warn!("Glyph {:?} is malformed: {}", c, e);
                None
            }
        }
    }
}

/// Where text rendering starts and how it wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    /// Start column, also the column wrapped lines return to
    pub x: i32,
    /// Top of the first line
    pub y: i32,
    /// Wrap onto the next line instead of running off the right edge
    pub wrap: bool,
}

impl Framebuffer {
    /// Render `text` with `font`, returning the cursor after the last glyph
    ///
    /// A space advances by twice its glyph width. With wrapping on, a glyph
    /// that would cross the right edge moves to the start column one glyph
    /// height further down. Characters missing from the font are skipped.
    pub fn draw_text(
        &mut self,
        font: &dyn Font,
        text: &str,
        layout: TextLayout,
        color: BinaryColor,
    ) -> (i32, i32) {
        let (mut x, mut y) = (layout.x, layout.y);
        let screen_width = self.width() as i32;

        for c in text.chars() {
            let Some(glyph) = font.glyph(c) else {
                log::debug!("No glyph for {:?}, skipping", c);
                continue;
            };
            let glyph_width = glyph.bitmap.width() as i32;
            let glyph_height = glyph.bitmap.height() as i32;

            if c == ' ' {
                x += glyph_width;
            }

            if layout.wrap && x + glyph_width > screen_width {
                x = layout.x;
                y += glyph_height;
            }

            self.blit(&glyph.bitmap, x, y, color);
            x += glyph_width;
        }
        (x, y)
    }
}

/// Text rendering that needs a configured font
pub(crate) fn render_text(
    framebuffer: &mut Framebuffer,
    font: Option<&dyn Font>,
    text: &str,
    layout: TextLayout,
    color: BinaryColor,
) -> Result<(i32, i32), Error> {
    let Some(font) = font else {
        log::error!("Font not set, cannot draw {:?}", text);
        return Err(Error::NoFont);
    };
    Ok(framebuffer.draw_text(font, text, layout, color))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::st7565::graphics::DisplayRotation;

    // 8x8 glyphs: a full block, a hollow box and an empty space
    pub(crate) static TEST_GLYPHS: [GlyphData; 3] = [
        GlyphData {
            character: 'A',
            width: 8,
            data: &[0xFF; 8],
        },
        GlyphData {
            character: 'B',
            width: 8,
            data: &[0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF],
        },
        GlyphData {
            character: ' ',
            width: 8,
            data: &[0x00; 8],
        },
    ];

    pub(crate) static TEST_FONT: GlyphTable = GlyphTable::new(8, &TEST_GLYPHS);

    fn layout(x: i32, y: i32, wrap: bool) -> TextLayout {
        TextLayout { x, y, wrap }
    }

    #[test]
    fn test_glyph_lookup() {
        let glyph = TEST_FONT.glyph('B').unwrap();
        assert_eq!(glyph.character, 'B');
        assert_eq!(glyph.bitmap.width(), 8);
        assert_eq!(glyph.bitmap.height(), 8);
        assert!(TEST_FONT.glyph('z').is_none());
    }

    #[test]
    fn test_text_advances_by_glyph_width() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate0);
        let end = fb.draw_text(&TEST_FONT, "AB", layout(3, 2, false), BinaryColor::On);
        assert_eq!(end, (19, 2));
        assert_eq!(fb.get_pixel(3, 2), BinaryColor::On);
        assert_eq!(fb.get_pixel(10, 9), BinaryColor::On);
        // inside the hollow B
        assert_eq!(fb.get_pixel(14, 5), BinaryColor::Off);
        assert_eq!(fb.get_pixel(11, 2), BinaryColor::On);
    }

    #[test]
    fn test_space_advances_twice() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate0);
        let end = fb.draw_text(&TEST_FONT, "A A", layout(0, 0, false), BinaryColor::On);
        assert_eq!(end, (32, 0));
        assert_eq!(fb.get_pixel(8, 0), BinaryColor::Off);
        assert_eq!(fb.get_pixel(23, 0), BinaryColor::Off);
        assert_eq!(fb.get_pixel(24, 0), BinaryColor::On);
    }

    #[test]
    fn test_wrap_returns_to_start_column() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate90);
        // 64 pixels wide: seven glyphs fit after x = 4, the eighth wraps
        let end = fb.draw_text(&TEST_FONT, "AAAAAAAA", layout(4, 0, true), BinaryColor::On);
        assert_eq!(end, (12, 8));
        assert_eq!(fb.get_pixel(4, 8), BinaryColor::On);
        assert_eq!(fb.get_pixel(59, 0), BinaryColor::On);
        assert_eq!(fb.get_pixel(60, 0), BinaryColor::Off);
        assert_eq!(fb.get_pixel(60, 8), BinaryColor::Off);
    }

    #[test]
    fn test_without_wrap_text_runs_off_the_edge() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate90);
        let end = fb.draw_text(&TEST_FONT, "AAAAAAAAAA", layout(0, 0, false), BinaryColor::On);
        assert_eq!(end, (80, 0));
        assert_eq!(fb.get_pixel(0, 8), BinaryColor::Off);
    }

    #[test]
    fn test_missing_characters_are_skipped() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate0);
        let end = fb.draw_text(&TEST_FONT, "AzA", layout(0, 0, false), BinaryColor::On);
        assert_eq!(end, (16, 0));
    }

    #[test]
    fn test_render_without_font_fails_and_draws_nothing() {
        let mut fb = Framebuffer::new(DisplayRotation::Rotate0);
        let result = render_text(&mut fb, None, "A", layout(0, 0, false), BinaryColor::On);
        assert!(matches!(result, Err(Error::NoFont)));
        assert!(fb.buffer().iter().all(|&b| b == 0));
    }
}
