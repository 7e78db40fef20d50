//! ST7565 / ST7567 LCD Driver
//!
//! Used in the common 128×64 monochrome graphic LCD modules wired over SPI
//! (chip select, data/command, reset).
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for page-addressed
//! LCD controllers instead of e-paper.
//!
//!
//! ### Usage
//! This driver does not hide that you're working with one in-memory buffer. To
//! display something you:
//!
//! 1. create the driver with [`driver::St7565::new`], which resets and initializes the panel
//! 1. draw onto it, either with the built-in primitives, bitmaps, BMP images and fonts,
//!    or with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics)
//! 1. push the buffer to the panel with [`driver::St7565::present`]
//!
//! Nothing is sent to the panel until `present` is called.
//!
#![deny(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]

pub mod bitmap;
pub mod bmp;
pub mod driver;
pub mod error;
pub mod font;
pub mod graphics;
pub mod interface;
pub mod primitives;

pub(crate) mod cmd;
pub(crate) mod flag;

/// Physical display width, pixels horizontally (controller columns in use)
pub const WIDTH: u32 = 128;

/// Physical display height, pixels vertically
pub const HEIGHT: u32 = 64;

/// Number of 8 pixel tall pages the controller RAM is split into
pub const PAGES: u32 = HEIGHT / 8;

/// Size of the framebuffer in bytes, the same for every rotation
pub const BUFFER_SIZE: usize = (WIDTH * HEIGHT / 8) as usize;
