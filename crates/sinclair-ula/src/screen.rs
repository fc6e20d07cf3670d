//! Screen memory layout.
//!
//! Bitmap offset for pixel row `y`: `000Y7 Y6Y2 Y1Y0 Y5Y4Y3 00000`.
//! Attribute offset: `$1800 + (y / 8) * 32`.
//! Both are relative to the start of the screen page.

use crate::timing::DISPLAY_HEIGHT;

/// Bitmap bytes per pixel row.
pub const SCREEN_COLUMNS: u16 = 32;

/// Offset of the first bitmap byte of each pixel row.
pub static BITMAP_LINE_OFFSETS: [u16; DISPLAY_HEIGHT as usize] = build_bitmap_offsets();

/// Offset of the first attribute byte covering each pixel row.
pub static ATTRIBUTE_LINE_OFFSETS: [u16; DISPLAY_HEIGHT as usize] = build_attribute_offsets();

const fn build_bitmap_offsets() -> [u16; DISPLAY_HEIGHT as usize] {
    let mut table = [0u16; DISPLAY_HEIGHT as usize];
    let mut y = 0;
    while y < DISPLAY_HEIGHT as usize {
        let row = y as u16;
        table[y] = ((row & 0xC0) << 5) | ((row & 0x07) << 8) | ((row & 0x38) << 2);
        y += 1;
    }
    table
}

const fn build_attribute_offsets() -> [u16; DISPLAY_HEIGHT as usize] {
    let mut table = [0u16; DISPLAY_HEIGHT as usize];
    let mut y = 0;
    while y < DISPLAY_HEIGHT as usize {
        table[y] = 0x1800 + (y as u16 / 8) * SCREEN_COLUMNS;
        y += 1;
    }
    table
}
