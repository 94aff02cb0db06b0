pub mod color;
pub mod display_constants;

use crate::color::{display_4bit_to_rgb, e_paper_color_map::EPaperColorMap, rgb_to_display_4bit};
use crate::display_constants::{byte_width, PIXEL_HEIGHT, PIXEL_WIDTH};
use image::imageops::{dither, FilterType};
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, RgbImage};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use crate::color::display_color::DisplayColor;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Buffer size mismatch. Expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

/// Opens `file` honoring its EXIF orientation.
pub fn open_image(file: &Path) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::open(file)?.with_guessed_format()?.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    info!("Opened image {}", file.display());
    Ok(img)
}

/// Fits `img` to the panel and dithers it to the six panel colors.
///
/// Portrait images are turned to landscape first so they fill the panel instead of being cropped to a strip.
pub fn fit_and_dither(img: DynamicImage) -> RgbImage {
    let img = if img.height() > img.width() {
        info!("Rotated portrait image");
        img.rotate90()
    } else {
        img
    };
    let img = img.resize_to_fill(PIXEL_WIDTH, PIXEL_HEIGHT, FilterType::Lanczos3);
    info!("Resized");
    let mut img = img.into_rgb8();

    let epd_map = EPaperColorMap::new();
    dither(&mut img, &epd_map);
    info!("Dithered");
    img
}

/// Full frame for the panel, ready for `display`.
pub fn image_to_buffer(img: DynamicImage) -> Vec<u8> {
    let img = fit_and_dither(img);
    let epd_image = rgb_to_display_4bit(&img);
    info!("Image packed to 4bit format");
    epd_image
}

/// Renders a packed frame back to RGB, e.g. to preview what the panel shows.
pub fn buffer_to_rgb(buffer: &[u8]) -> Result<RgbImage, ConvertError> {
    display_4bit_to_rgb(buffer, PIXEL_WIDTH, PIXEL_HEIGHT).ok_or(ConvertError::BufferSize {
        expected: byte_width(PIXEL_WIDTH) * PIXEL_HEIGHT as usize,
        actual: buffer.len(),
    })
}

pub fn convert(
    file: &Path,
    out_file: &Path,
    dithered_file: Option<&Path>,
) -> Result<(), ConvertError> {
    let img = fit_and_dither(open_image(file)?);
    if let Some(dither_path) = dithered_file {
        img.save(dither_path)?;
        info!("Saved dithered image");
    }

    let epd_image = rgb_to_display_4bit(&img);
    info!("Image packed to 4bit format");

    let mut file = File::create(out_file)?;
    file.write_all(&epd_image)?;
    info!("Image written. Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_constants::DISPLAY_BYTES_TOTAL;
    use image::Rgb;

    #[test]
    fn solid_image_becomes_solid_frame() {
        let img = RgbImage::from_pixel(40, 24, Rgb([191, 0, 0]));
        let buffer = image_to_buffer(DynamicImage::ImageRgb8(img));
        assert_eq!(buffer.len(), DISPLAY_BYTES_TOTAL);
        assert!(buffer.iter().all(|b| *b == 0x33));
    }

    #[test]
    fn portrait_images_fill_landscape_panel() {
        let img = RgbImage::from_pixel(24, 40, Rgb([255, 255, 255]));
        let out = fit_and_dither(DynamicImage::ImageRgb8(img));
        assert_eq!(out.dimensions(), (PIXEL_WIDTH, PIXEL_HEIGHT));
    }

    #[test]
    fn preview_rejects_short_buffer() {
        let err = buffer_to_rgb(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::BufferSize {
                expected: DISPLAY_BYTES_TOTAL,
                actual: 10
            }
        ));
    }

    #[test]
    fn convert_writes_frame_and_dithered_copy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.bin");
        let dithered = dir.path().join("dithered.png");
        RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]))
            .save(&input)
            .unwrap();

        convert(&input, &output, Some(dithered.as_path())).unwrap();

        let frame = std::fs::read(&output).unwrap();
        assert_eq!(frame.len(), DISPLAY_BYTES_TOTAL);
        assert!(frame.iter().all(|b| *b == 0x00));
        assert!(dithered.exists());
    }
}
