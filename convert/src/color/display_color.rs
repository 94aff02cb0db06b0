use image::Rgb;
use palette::{FromColor, LinSrgb, Oklab, Srgb};

/// Panel colors and the codes the 7.3" (E) controller takes. 4 is unused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplayColor {
    Black = 0x00,
    White = 0x01,
    Yellow = 0x02,
    Red = 0x03,
    Blue = 0x05,
    Green = 0x06,
}

impl DisplayColor {
    pub const ALL: [DisplayColor; 6] = [
        DisplayColor::Black,
        DisplayColor::White,
        DisplayColor::Yellow,
        DisplayColor::Red,
        DisplayColor::Blue,
        DisplayColor::Green,
    ];

    pub fn from_code(code: u8) -> Option<DisplayColor> {
        DisplayColor::ALL.into_iter().find(|c| *c as u8 == code)
    }

    /// What the pigment actually looks like, not the nominal sRGB primary.
    fn rgb(self) -> [u8; 3] {
        match self {
            DisplayColor::Black => [0, 0, 0],
            DisplayColor::White => [255, 255, 255],
            DisplayColor::Yellow => [255, 243, 56],
            DisplayColor::Red => [191, 0, 0],
            DisplayColor::Blue => [100, 64, 255],
            DisplayColor::Green => [67, 138, 28],
        }
    }
}

pub fn rgb_to_oklab(color: Rgb<u8>) -> Oklab {
    let [r, g, b] = color.0;
    let linear: LinSrgb<f32> = Srgb::new(r, g, b).into_format::<f32>().into_linear();
    Oklab::from_color(linear)
}

impl From<DisplayColor> for Rgb<u8> {
    fn from(value: DisplayColor) -> Self {
        Rgb::from(value.rgb())
    }
}

impl From<DisplayColor> for Oklab {
    fn from(value: DisplayColor) -> Self {
        rgb_to_oklab(value.into())
    }
}

impl From<&Rgb<u8>> for DisplayColor {
    /// Exact palette match; anything else is treated as paper white.
    fn from(value: &Rgb<u8>) -> Self {
        DisplayColor::ALL
            .into_iter()
            .find(|c| c.rgb() == value.0)
            .unwrap_or(DisplayColor::White)
    }
}

impl From<DisplayColor> for u8 {
    fn from(value: DisplayColor) -> Self {
        value as u8
    }
}
