/// ST7565 command opcodes.
///
/// Commands that carry a parameter in their low bits (page, column nibbles,
/// resistor ratio, power mode) are the base value, OR the parameter in.
pub struct Cmd;
impl Cmd {
    // Display
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const SET_DISPLAY_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_REVERSE: u8 = 0xA7;
    pub const SET_ALLPX_ON: u8 = 0xA5;
    pub const SET_ALLPX_NORMAL: u8 = 0xA4;

    // Addressing
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_PAGE: u8 = 0xB0;
    pub const COLUMN_HI: u8 = 0x10;
    pub const COLUMN_LOW: u8 = 0x00;

    // Scan direction
    pub const SET_ADC_NORMAL: u8 = 0xA1;
    pub const SET_ADC_REVERSE: u8 = 0xA0;
    pub const SET_COL_NORMAL: u8 = 0xC8;
    pub const SET_COL_REVERSE: u8 = 0xC0;

    // Power
    pub const SET_BIAS_9: u8 = 0xA2;
    pub const DISPLAY_RESET: u8 = 0xE2;
    pub const SET_POWER: u8 = 0x28;
    pub const SET_RESISTOR_RATIO: u8 = 0x20;
    pub const SET_VOLUME: u8 = 0x81;
}

/*
Datasheet names for the ones above:
0xAE/0xAF - Display OFF/ON
0x40 - Display Start Line Set (low 6 bits)
0xB0 - Page Address Set (low 4 bits)
0x10 - Column Address Set, upper nibble
0x00 - Column Address Set, lower nibble
0xA0/0xA1 - ADC Select (segment driver direction)
0xC0/0xC8 - Common Output Mode Select
0xA6/0xA7 - Display Normal/Reverse
0xA4/0xA5 - Display All Points OFF/ON
0xA2/0xA3 - LCD Bias Set 1/9, 1/7
0xE2 - Reset
0x28 - Power Controller Set (low 3 bits)
0x20 - V0 Voltage Regulator Internal Resistor Ratio Set (low 3 bits)
0x81 - Electronic Volume Mode Set, followed by the volume byte
*/
