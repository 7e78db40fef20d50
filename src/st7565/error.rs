//! Error types for the driver

pub use display_interface::DisplayError;

/// Errors returned by the driver
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller supplied value was rejected before anything was changed
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] InvalidParameter),
    /// Text was drawn without a font being configured
    #[error("no font configured")]
    NoFont,
    /// The hardware link failed, nothing is retried
    #[error("display interface error: {0:?}")]
    Interface(DisplayError),
    /// Reading or seeking the image stream failed
    #[error("image stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DisplayError> for Error {
    fn from(err: DisplayError) -> Self {
        Error::Interface(err)
    }
}

/// The offending field of a rejected parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidParameter {
    /// Contrast outside `1..=63`
    #[error("contrast {0} is outside 1..=63")]
    Contrast(u8),
    /// BMP file does not start with `BM`
    #[error("BMP signature {0:02X?} is not \"BM\"")]
    BmpSignature([u8; 2]),
    /// BMP plane count other than 1
    #[error("unsupported BMP plane count {0}")]
    BmpPlanes(u16),
    /// BMP bit depth other than 1
    #[error("unsupported BMP bit depth {0}")]
    BmpBitDepth(u16),
    /// Compressed BMP
    #[error("unsupported BMP compression method {0}")]
    BmpCompression(u32),
    /// Zero or negative width, or zero height
    #[error("unsupported BMP dimensions {width}x{height}")]
    BmpDimensions {
        /// Width as stored in the header
        width: i32,
        /// Height as stored in the header
        height: i32,
    },
    /// Bitmap data shorter than its dimensions require
    #[error("bitmap needs {expected} bytes but got {actual}")]
    BitmapData {
        /// Bytes required by width and height
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Raw page frame of the wrong length
    #[error("frame needs {expected} bytes but got {actual}")]
    FrameSize {
        /// Bytes in a full frame
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
}
