use std::io::Cursor;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal::delay::DelayNs;

use st7565::{
    Config, DisplayError, DisplayRotation, Error, HardwareLink, InvalidParameter, St7565,
    BUFFER_SIZE, PAGES, WIDTH,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Wire {
    Command(u8),
    Data(Vec<u8>),
    Reset(bool),
    Select,
    Deselect,
}

/// Records everything the driver sends
#[derive(Default)]
struct RecordingLink {
    wire: Vec<Wire>,
}

impl HardwareLink for RecordingLink {
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.wire.push(Wire::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.wire.push(Wire::Data(data.to_vec()));
        Ok(())
    }

    fn set_reset_line(&mut self, high: bool) -> Result<(), DisplayError> {
        self.wire.push(Wire::Reset(high));
        Ok(())
    }

    fn select(&mut self) -> Result<(), DisplayError> {
        self.wire.push(Wire::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        self.wire.push(Wire::Deselect);
        Ok(())
    }
}

struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn display(rotation: DisplayRotation) -> St7565<RecordingLink, NoopDelay> {
    let mut display = St7565::new(
        RecordingLink::default(),
        NoopDelay,
        Config::new().rotation(rotation),
    )
    .unwrap();
    display.link_mut().wire.clear();
    display
}

/// The wire traffic of one `present` of `frame` with the given column offset
fn expected_present(frame: &[u8], offset: u8) -> Vec<Wire> {
    let mut wire = vec![Wire::Select];
    for (page, data) in frame.chunks(WIDTH as usize).enumerate() {
        wire.push(Wire::Command(0x40));
        wire.push(Wire::Command(0xB0 + page as u8));
        wire.push(Wire::Command(0x10 | (offset >> 4)));
        wire.push(Wire::Command(offset & 0x0F));
        wire.push(Wire::Data(data.to_vec()));
    }
    wire.push(Wire::Deselect);
    wire
}

/// Page data of a recorded `present`, concatenated
fn presented_pages(wire: &[Wire]) -> Vec<u8> {
    wire.iter()
        .filter_map(|w| match w {
            Wire::Data(d) => Some(d.as_slice()),
            _ => None,
        })
        .flatten()
        .copied()
        .collect()
}

/// 1 bpp bottom-up BMP with rows padded to 4 bytes
fn bmp(file_rows: &[u8], width: i32, height: i32, bit_depth: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(62 + file_rows.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&62u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bit_depth.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0]);
    out.extend_from_slice(file_rows);
    out
}

#[test]
fn test_present_unrotated_sends_buffer_as_is() {
    let mut display = display(DisplayRotation::Rotate0);
    display.rect(60, 4, 30, 30, BinaryColor::On, true);
    display.present().unwrap();

    let buffer = *display.framebuffer().buffer();
    // rect starts at column 60, rows 4..34
    assert_eq!(buffer[60], 0xF0);
    assert_eq!(buffer[60 + 128], 0xFF);
    assert_eq!(buffer[89 + 4 * 128], 0x03);
    assert_eq!(buffer[59], 0x00);

    assert_eq!(display.link().wire, expected_present(&buffer, 0));
}

#[test]
fn test_present_quarter_turn_uses_column_shift() {
    let mut display = display(DisplayRotation::Rotate90);
    display.present().unwrap();
    assert_eq!(display.link().wire, expected_present(&[0u8; BUFFER_SIZE], 4));
    let pages = display
        .link()
        .wire
        .iter()
        .filter(|w| matches!(w, Wire::Data(_)))
        .count();
    assert_eq!(pages, PAGES as usize);
}

#[test]
fn test_present_quarter_turn_transposes_into_pages() {
    let mut display = display(DisplayRotation::Rotate90);
    display.pixel(0, 0, BinaryColor::On);
    display.pixel(63, 127, BinaryColor::On);
    display.pixel(9, 3, BinaryColor::On);
    display.present().unwrap();

    let pages = presented_pages(&display.link().wire);
    let mut expected = [0u8; BUFFER_SIZE];
    // logical (x, y) lands on page x / 8, column y, bit 7 - x % 8
    expected[0] = 0x80;
    expected[127 + 7 * 128] = 0x01;
    expected[3 + 128] = 0x40;
    assert_eq!(pages, expected.to_vec());
}

#[test]
fn test_present_half_turn_keeps_layout_and_shifts() {
    let mut display = display(DisplayRotation::Rotate180);
    display.pixel(2, 9, BinaryColor::On);
    display.present().unwrap();
    let buffer = *display.framebuffer().buffer();
    assert_eq!(buffer[2 + 128], 0x02);
    assert_eq!(display.link().wire, expected_present(&buffer, 4));
}

#[test]
fn test_text_without_font_leaves_buffer_untouched() {
    let mut display = display(DisplayRotation::Rotate0);
    display.rect(0, 0, 10, 10, BinaryColor::On, false);
    let before = *display.framebuffer().buffer();
    let result = display.text("hello", 0, 0, BinaryColor::On);
    assert!(matches!(result, Err(Error::NoFont)));
    assert_eq!(display.framebuffer().buffer(), &before);
    assert!(display.link().wire.is_empty());
}

#[test]
fn test_invalid_contrast_sends_nothing() {
    let mut display = display(DisplayRotation::Rotate0);
    let result = display.set_contrast(64);
    assert!(matches!(
        result,
        Err(Error::InvalidParameter(InvalidParameter::Contrast(64)))
    ));
    assert!(display.link().wire.is_empty());
    assert_eq!(display.contrast(), 0x20);
}

#[test]
fn test_load_bmp_draws_foreground() {
    let mut display = display(DisplayRotation::Rotate0);
    // foreground rows top to bottom: 0xF0, 0x0F; stored bottom-up, background as 1
    let file = bmp(&[0xF0, 0, 0, 0, 0x0F, 0, 0, 0], 8, 2, 1);
    display
        .load_bmp(&mut Cursor::new(file), 10, 20, BinaryColor::On)
        .unwrap();

    let fb = display.framebuffer();
    for x in 10..14 {
        assert_eq!(fb.get_pixel(x, 20), BinaryColor::On);
        assert_eq!(fb.get_pixel(x, 21), BinaryColor::Off);
    }
    for x in 14..18 {
        assert_eq!(fb.get_pixel(x, 20), BinaryColor::Off);
        assert_eq!(fb.get_pixel(x, 21), BinaryColor::On);
    }
}

#[test]
fn test_load_bmp_rejects_unsupported_depth_without_drawing() {
    let mut display = display(DisplayRotation::Rotate0);
    display.fill(BinaryColor::On);
    let before = *display.framebuffer().buffer();
    let file = bmp(&[0u8; 16], 8, 2, 8);
    let result = display.load_bmp(&mut Cursor::new(file), 0, 0, BinaryColor::On);
    assert!(matches!(
        result,
        Err(Error::InvalidParameter(InvalidParameter::BmpBitDepth(8)))
    ));
    assert_eq!(display.framebuffer().buffer(), &before);
}

#[test]
fn test_embedded_graphics_draws_into_the_buffer() {
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    let mut display = display(DisplayRotation::Rotate270);
    assert_eq!(display.size(), Size::new(64, 128));
    Rectangle::new(Point::new(0, 120), Size::new(8, 8))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut display)
        .unwrap();
    assert_eq!(display.framebuffer().get_pixel(7, 127), BinaryColor::On);
    assert_eq!(display.framebuffer().get_pixel(8, 127), BinaryColor::Off);
}
