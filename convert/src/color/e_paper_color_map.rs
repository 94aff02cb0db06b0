use crate::color::display_color::{rgb_to_oklab, DisplayColor};
use image::imageops::ColorMap;
use image::Rgb;
use palette::color_difference::HyAb;
use palette::Oklab;

/// Nearest panel color by HyAB distance in Oklab. Indices are the panel color codes.
pub struct EPaperColorMap {
    colormap: Vec<(DisplayColor, Oklab)>,
}

impl Default for EPaperColorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl EPaperColorMap {
    pub fn new() -> Self {
        Self {
            colormap: DisplayColor::ALL.into_iter().map(|c| (c, c.into())).collect(),
        }
    }

    pub fn nearest(&self, color: &Rgb<u8>) -> DisplayColor {
        let oklab_color = rgb_to_oklab(*color);
        self.colormap
            .iter()
            .min_by(|(_, a), (_, b)| {
                a.hybrid_distance(oklab_color)
                    .total_cmp(&b.hybrid_distance(oklab_color))
            })
            .map(|(c, _)| *c)
            .unwrap_or(DisplayColor::White)
    }
}

impl ColorMap for EPaperColorMap {
    type Color = Rgb<u8>; // dither requires this to be u8

    fn index_of(&self, color: &Self::Color) -> usize {
        self.nearest(color) as usize
    }

    fn lookup(&self, index: usize) -> Option<Self::Color> {
        u8::try_from(index)
            .ok()
            .and_then(DisplayColor::from_code)
            .map(Rgb::from)
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Self::Color) {
        *color = self.nearest(color).into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_colors_map_to_themselves() {
        let map = EPaperColorMap::new();
        for c in DisplayColor::ALL {
            assert_eq!(map.nearest(&c.into()), c);
        }
    }

    #[test]
    fn near_colors_snap() {
        let map = EPaperColorMap::new();
        assert_eq!(map.nearest(&Rgb([250, 250, 250])), DisplayColor::White);
        assert_eq!(map.nearest(&Rgb([10, 10, 10])), DisplayColor::Black);
        assert_eq!(map.nearest(&Rgb([200, 10, 10])), DisplayColor::Red);
    }

    #[test]
    fn index_is_panel_code() {
        let map = EPaperColorMap::new();
        let blue: Rgb<u8> = DisplayColor::Blue.into();
        assert_eq!(map.index_of(&blue), 5);
        assert_eq!(map.lookup(6), Some(DisplayColor::Green.into()));
        assert_eq!(map.lookup(4), None);
    }
}
