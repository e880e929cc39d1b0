// Global theme colours and layout constants
// Colours are written as 0xRRGGBB and packed to RGB565 at compile time via fmt()

/// Compile-time 24-bit RGB → RGB565 packing (truncating, no dithering)
const fn fmt(rgb: u32) -> u16 {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    rgb565(r, g, b)
}

/// Pack 8-bit channels to RGB565: red in bits 11-15, green 5-10, blue 0-4
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

pub const BACKGROUND: u16 = fmt(0x00_00_00);
pub const TEXT_COLOUR: u16 = fmt(0xFF_FF_FF);
pub const ARTIST_COLOUR: u16 = fmt(0xC6_C3_C6); // 0xC618
pub const PLAY_COLOUR: u16 = fmt(0x00_FF_00);
pub const PAUSE_COLOUR: u16 = fmt(0xFF_FF_00);
pub const ART_PLACEHOLDER: u16 = fmt(0x39_3C_39); // 0x39E7

// Album art box
pub const ART_BOX: i32 = 200;
pub const ART_MARGIN_LEFT: i32 = 10;
pub const ART_TEXT_GAP: i32 = 20;

// Title & artist lines
pub const TITLE_SCALE: i32 = 2;
pub const TITLE_VISIBLE_CHARS: usize = 14;
pub const TITLE_ARTIST_PADDING: i32 = 4;
pub const ARTIST_STATUS_PADDING: i32 = 30;

// Status block
pub const ICON_SIZE: i32 = 28;

pub const WAITING_TEXT: &str = "Waiting for data...";
pub const WAITING_MARGIN_LEFT: i32 = 10;
