//! Packed monochrome bitmaps and blitting them onto the framebuffer

use std::borrow::Cow;

use embedded_graphics::pixelcolor::BinaryColor;

use crate::st7565::error::{Error, InvalidParameter};
use crate::st7565::graphics::Framebuffer;

/// Immutable packed bitmap
///
/// Each row is stored MSB first, one bit per pixel, and starts on a byte
/// boundary. With a width that is a multiple of 8 the rows are tightly
/// packed; otherwise the trailing bits of each row are padding and never drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: Cow<'a, [u8]>,
    width: u32,
    height: u32,
}

impl<'a> Bitmap<'a> {
    /// Wrap packed data, which must hold at least `stride * height` bytes
    pub fn new(data: impl Into<Cow<'a, [u8]>>, width: u32, height: u32) -> Result<Self, Error> {
        let data = data.into();
        // saturates, so a size that cannot be addressed is always too short
        let expected = usize::try_from(height)
            .ok()
            .and_then(|height| Self::stride_for(width).checked_mul(height))
            .unwrap_or(usize::MAX);
        if data.len() < expected {
            return Err(InvalidParameter::BitmapData {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Bitmap {
            data,
            width,
            height,
        })
    }

    pub(crate) fn stride_for(width: u32) -> usize {
        width.div_ceil(8) as usize
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    /// Packed data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Packed bytes of one row
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    /// Whether the pixel at `(x, y)` is set
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width {
            return false;
        }
        self.row(y)
            .is_some_and(|row| row[(x / 8) as usize] & (0x80 >> (x % 8)) != 0)
    }
}

impl Framebuffer {
    /// Paint the set bits of `bitmap` with `color`, its top-left corner at `(x, y)`
    ///
    /// Clear bits leave the framebuffer untouched. Parts falling outside the
    /// logical area are dropped by `set_pixel`.
    pub fn blit(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32, color: BinaryColor) {
        let stride = bitmap.stride();
        if stride == 0 {
            return;
        }
        let width = bitmap.width() as usize;
        let rows = bitmap.data().chunks_exact(stride).take(bitmap.height() as usize);
        for (row_index, row) in rows.enumerate() {
            let py = y.saturating_add(row_index as i32);
            if py < 0 || py >= self.height() as i32 {
                continue;
            }
            for (byte_index, &byte) in row.iter().enumerate() {
                if byte == 0 {
                    continue;
                }
                let column = byte_index * 8;
                for bit in 0..8usize {
                    if column + bit >= width {
                        break;
                    }
                    if byte & (0x80 >> bit) != 0 {
                        self.set_pixel(x.saturating_add((column + bit) as i32), py, color);
                    }
                }
            }
        }
    }
}
