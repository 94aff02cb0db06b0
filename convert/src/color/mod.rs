pub mod display_color;
pub mod e_paper_color_map;

use crate::color::display_color::DisplayColor;
use crate::display_constants::byte_width;
use image::{Rgb, RgbImage};

/// Packs rows two pixels per byte, the first as the upper 4 bits. An odd last pixel is paired with white.
pub fn rgb_to_display_4bit(rgb: &RgbImage) -> Vec<u8> {
    let mut packed = Vec::with_capacity(byte_width(rgb.width()) * rgb.height() as usize);
    for row in rgb.rows() {
        let row: Vec<DisplayColor> = row.map(DisplayColor::from).collect();
        packed.extend(row.chunks(2).map(|pixels| {
            let low = pixels.get(1).copied().unwrap_or(DisplayColor::White);
            (pixels[0] as u8) << 4 | low as u8
        }));
    }
    packed
}

/// Inverse of [`rgb_to_display_4bit`]. Returns `None` if `buffer` isn't exactly one frame of `width` x `height`.
pub fn display_4bit_to_rgb(buffer: &[u8], width: u32, height: u32) -> Option<RgbImage> {
    let stride = byte_width(width);
    if buffer.len() != stride * height as usize {
        return None;
    }
    let nibble_color = |nibble: u8| -> Rgb<u8> {
        DisplayColor::from_code(nibble)
            .unwrap_or(DisplayColor::White)
            .into()
    };
    Some(RgbImage::from_fn(width, height, |x, y| {
        let byte = buffer[y as usize * stride + x as usize / 2];
        if x % 2 == 0 {
            nibble_color(byte >> 4)
        } else {
            nibble_color(byte & 0x0F)
        }
    }))
}
