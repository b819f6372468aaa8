//! Age-band colouring of live cells.
//!
//! White for newborns, red from age 10, yellow from 20, green from 40.
//! The fade value becomes the alpha channel.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AgeBand {
    New,
    Young,
    Mature,
    Ancient,
}

impl AgeBand {
    #[must_use]
    pub fn of(age: u32) -> Self {
        match age {
            0..=9 => Self::New,
            10..=19 => Self::Young,
            20..=39 => Self::Mature,
            _ => Self::Ancient,
        }
    }

    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::New => [255, 255, 255],
            Self::Young => [255, 0, 0],
            Self::Mature => [255, 255, 0],
            Self::Ancient => [0, 255, 0],
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// `0xRRGGBBAA`, alpha quantised to a byte.
    #[must_use]
    pub fn packed(self) -> u32 {
        let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u32;
        (u32::from(self.r) << 24) | (u32::from(self.g) << 16) | (u32::from(self.b) << 8) | alpha
    }

    /// CSS `rgba()` form for a 2D canvas fill style.
    #[must_use]
    pub fn css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[must_use]
pub fn age_color(age: u32, fade: f32) -> Rgba {
    let [r, g, b] = AgeBand::of(age).rgb();
    Rgba { r, g, b, a: fade }
}
