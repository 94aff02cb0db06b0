pub const PIXEL_WIDTH: u32 = 800;
pub const PIXEL_HEIGHT: u32 = 480;

/// Packed bytes per row for an image `width` pixels wide; an odd last pixel still takes a byte.
pub const fn byte_width(width: u32) -> usize {
    width.div_ceil(2) as usize
}

pub const DISPLAY_BYTES_TOTAL: usize = byte_width(PIXEL_WIDTH) * PIXEL_HEIGHT as usize;
