use crate::e_paper_display_driver::waveshare::{
    EPD_7IN3E_BLACK, EPD_7IN3E_BLUE, EPD_7IN3E_GREEN, EPD_7IN3E_RED, EPD_7IN3E_WHITE,
    EPD_7IN3E_YELLOW,
};
use std::fmt::{Display, Formatter};

/// The six colors the panel can show, with the codes the vendor driver expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = EPD_7IN3E_BLACK,
    White = EPD_7IN3E_WHITE,
    Yellow = EPD_7IN3E_YELLOW,
    Red = EPD_7IN3E_RED,
    Blue = EPD_7IN3E_BLUE,
    Green = EPD_7IN3E_GREEN,
}

impl Color {
    /// Palette in the order the `Colors` mapping lists it.
    pub const ALL: [Color; 6] = [
        Color::Black,
        Color::White,
        Color::Yellow,
        Color::Red,
        Color::Blue,
        Color::Green,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "BLACK",
            Color::White => "WHITE",
            Color::Yellow => "YELLOW",
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
        }
    }

    pub fn from_code(code: u8) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Both nibbles set to this color.
    pub fn packed(self) -> u8 {
        self.code() << 4 | self.code()
    }
}

impl From<Color> for u8 {
    fn from(value: Color) -> Self {
        value.code()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The static `Colors` mapping, name to code.
pub fn color_constants() -> [(&'static str, u8); 6] {
    Color::ALL.map(|c| (c.name(), c.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_vendor_header() {
        assert_eq!(
            color_constants(),
            [
                ("BLACK", 0),
                ("WHITE", 1),
                ("YELLOW", 2),
                ("RED", 3),
                ("BLUE", 5),
                ("GREEN", 6),
            ]
        );
    }

    #[test]
    fn code_four_is_not_a_panel_color() {
        assert_eq!(Color::from_code(4), None);
        assert_eq!(Color::from_code(6), Some(Color::Green));
    }

    #[test]
    fn codes_agree_with_image_converter() {
        let converter: Vec<u8> = eink_convert::DisplayColor::ALL
            .iter()
            .map(|c| u8::from(*c))
            .collect();
        let panel: Vec<u8> = Color::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(panel, converter);
    }

    #[test]
    fn packed_fills_both_nibbles() {
        assert_eq!(Color::White.packed(), 0x11);
        assert_eq!(Color::Green.packed(), 0x66);
    }
}
