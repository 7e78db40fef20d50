//! Uncompressed 1 bit per pixel BMP decoding
//!
//! BMP rows are stored bottom-up and padded to 4 bytes. The decoder flips them
//! into top-down packed rows in one pass while reading. These monochrome assets
//! store the background as 1, so decoding for `BinaryColor::On` inverts every
//! byte to get foreground-is-1 again; decoding for `Off` copies the bits as is.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use embedded_graphics::pixelcolor::BinaryColor;

use crate::st7565::bitmap::Bitmap;
use crate::st7565::error::{Error, InvalidParameter};

/// BMP file magic
const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// Largest width or height accepted from a header
const MAX_DIMENSION: u32 = u16::MAX as u32;

/// The header fields the decoder needs, already validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Offset of the pixel data from the start of the file
    pub pixel_offset: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Rows stored top row first (negative height in the file)
    pub top_down: bool,
}

impl BmpHeader {
    /// Read and validate the file and info headers.
    ///
    /// Checks, failing on the first mismatch: signature, planes, bit depth,
    /// compression, then the dimensions. Either side above 65535 pixels is
    /// rejected as a dimension error.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let mut signature = [0u8; 2];
        reader.read_exact(&mut signature)?;
        if signature != BMP_SIGNATURE {
            log::error!("Not a BMP file, signature {:02X?}", signature);
            return Err(InvalidParameter::BmpSignature(signature).into());
        }

        let _file_size = reader.read_u32::<LittleEndian>()?;
        let _reserved = reader.read_u32::<LittleEndian>()?;
        let pixel_offset = reader.read_u32::<LittleEndian>()?;
        let _info_header_size = reader.read_u32::<LittleEndian>()?;
        let width = reader.read_i32::<LittleEndian>()?;
        let height = reader.read_i32::<LittleEndian>()?;
        let planes = reader.read_u16::<LittleEndian>()?;
        let bit_depth = reader.read_u16::<LittleEndian>()?;
        let compression = reader.read_u32::<LittleEndian>()?;

        let rejected = if planes != 1 {
            Some(InvalidParameter::BmpPlanes(planes))
        } else if bit_depth != 1 {
            Some(InvalidParameter::BmpBitDepth(bit_depth))
        } else if compression != 0 {
            Some(InvalidParameter::BmpCompression(compression))
        } else if width <= 0
            || width.unsigned_abs() > MAX_DIMENSION
            || height == 0
            || height.unsigned_abs() > MAX_DIMENSION
        {
            Some(InvalidParameter::BmpDimensions { width, height })
        } else {
            None
        };
        if let Some(rejected) = rejected {
            log::error!(
                "Unsupported planes, depth, compress: {} {} {} ({})",
                planes,
                bit_depth,
                compression,
                rejected
            );
            return Err(rejected.into());
        }

        Ok(BmpHeader {
            pixel_offset,
            width: width as u32,
            height: height.unsigned_abs(),
            top_down: height < 0,
        })
    }

    /// Bytes per stored row, padded to a multiple of 4
    pub fn row_size(&self) -> usize {
        self.width.div_ceil(32) as usize * 4
    }

    /// Bytes of pixel data the header promises
    pub fn data_size(&self) -> u64 {
        self.row_size() as u64 * u64::from(self.height)
    }
}

/// Decode the BMP starting at the reader's current position into a top-down bitmap.
///
/// The pixel data offset is taken relative to where the stream was positioned.
/// Nothing is returned unless the header is valid and all pixel rows were read.
pub fn decode<R: Read + Seek>(reader: &mut R, color: BinaryColor) -> Result<Bitmap<'static>, Error> {
    let start = reader.stream_position()?;
    let header = BmpHeader::read(reader)?;
    log::debug!(
        "BMP {}x{}, {} bytes per row, pixels at {}{}",
        header.width,
        header.height,
        header.row_size(),
        header.pixel_offset,
        if header.top_down { ", top-down" } else { "" }
    );

    let data_start = start + u64::from(header.pixel_offset);
    let data_end = data_start + header.data_size();
    let stream_end = reader.seek(SeekFrom::End(0))?;
    if stream_end < data_end {
        log::error!(
            "BMP needs pixel data up to byte {}, stream ends at {}",
            data_end - start,
            stream_end.saturating_sub(start)
        );
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    reader.seek(SeekFrom::Start(data_start))?;

    let invert = color == BinaryColor::On;
    let height = header.height as usize;
    let stride = Bitmap::stride_for(header.width);
    let mut pixels = vec![0u8; stride * height];
    let mut row = vec![0u8; header.row_size()];

    for source_row in 0..height {
        reader.read_exact(&mut row)?;
        let dest_row = if header.top_down {
            source_row
        } else {
            height - 1 - source_row
        };
        let dest = &mut pixels[dest_row * stride..(dest_row + 1) * stride];
        for (dst, &src) in dest.iter_mut().zip(&row[..stride]) {
            *dst = if invert { !src } else { src };
        }
    }

    Bitmap::new(pixels, header.width, header.height)
}
