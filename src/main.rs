//! Host preview of the ST7565 driver.
//!
//! Runs the driver against a link that records the page writes instead of
//! talking to a panel, then prints the captured frame as text.
//!
//! `st7565-preview [image.bmp]`
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::Context;

// https://docs.rs/embedded-graphics/0.8.1/embedded_graphics/mono_font/index.html#modules
use embedded_graphics::mono_font::{iso_8859_15::FONT_5X8, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::{prelude::*, text::Text};
use embedded_hal::delay::DelayNs;

use st7565::{Config, DisplayError, DisplayRotation, HardwareLink, St7565, BUFFER_SIZE, WIDTH};

/// Blocking delay on the host
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Keeps what a panel would have in its display RAM
struct PreviewLink {
    ram: [u8; BUFFER_SIZE],
    page: usize,
    column: usize,
    commands: usize,
}

impl PreviewLink {
    fn new() -> Self {
        PreviewLink {
            ram: [0; BUFFER_SIZE],
            page: 0,
            column: 0,
            commands: 0,
        }
    }

    /// Rows of `#` and `.` in panel orientation
    fn render(&self) -> String {
        let width = WIDTH as usize;
        let mut out = String::with_capacity(BUFFER_SIZE * 8 + 64);
        for row in 0..BUFFER_SIZE * 8 / width {
            for col in 0..width {
                let byte = self.ram[col + (row / 8) * width];
                out.push(if byte & (1 << (row % 8)) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl HardwareLink for PreviewLink {
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.commands += 1;
        match command {
            0xB0..=0xB7 => self.page = usize::from(command & 0x07),
            0x10..=0x1F => self.column = (self.column & 0x0F) | usize::from(command & 0x0F) << 4,
            0x00..=0x0F => self.column = (self.column & 0xF0) | usize::from(command),
            _ => {}
        }
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        let width = WIDTH as usize;
        for &byte in data {
            // the panel drops writes past its last column
            if self.column < width {
                self.ram[self.page * width + self.column] = byte;
            }
            self.column += 1;
        }
        Ok(())
    }

    fn set_reset_line(&mut self, _high: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn select(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut display = St7565::new(
        PreviewLink::new(),
        StdDelay,
        Config::new().rotation(DisplayRotation::Rotate0),
    )?;

    log::info!("Drawing demo scene");
    display.pixel(0, 63, BinaryColor::On);
    display.ellipse(16, 20, 16, 16, BinaryColor::On, true);
    display.ellipse(42, 46, 16, 16, BinaryColor::On, false);
    display.rect(60, 4, 30, 30, BinaryColor::On, true);
    display.rect(94, 32, 30, 30, BinaryColor::On, false);
    for y in 0..16 {
        display.line(0, 0, 128, y * 4, BinaryColor::On);
    }

    let label_style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    Text::new("ST7565", Point::new(64, 62), label_style).draw(&mut display)?;

    if let Some(path) = std::env::args().nth(1) {
        log::info!("Loading {}", path);
        let file = File::open(&path).with_context(|| format!("opening {path}"))?;
        display
            .load_bmp(&mut BufReader::new(file), 0, 0, BinaryColor::On)
            .with_context(|| format!("loading {path}"))?;
    }

    display.present()?;

    let (link, _) = display.release();
    log::info!("Frame written with {} commands", link.commands);
    print!("{}", link.render());
    Ok(())
}
