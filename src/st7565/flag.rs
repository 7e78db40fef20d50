/// Parameter values used together with the ST7565 commands.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Resistor ratio (low 3 bits of SET_RESISTOR_RATIO)
    pub const RESISTOR_RATIO: u8 = 5;

    // Power control (low 3 bits of SET_POWER): booster, regulator, follower all on
    pub const POWER_MODE: u8 = 7;

    // Electronic volume (byte following SET_VOLUME)
    pub const CONTRAST_DEFAULT: u8 = 0x20;
    pub const CONTRAST_MIN: u8 = 0x01;
    pub const CONTRAST_MAX: u8 = 0x3F;

    // Columns the panel glass is offset by on 90 and 180 degree mounts
    pub const COLUMN_SHIFT_DEFAULT: u8 = 4;

    // Column address nibbles
    pub const COLUMN_NIBBLE_MASK: u8 = 0x0F;
}
