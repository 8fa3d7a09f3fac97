//! Star tables and palettes for the built-in burst shapes.
//!
//! A shape is a list of [`StarPoint`] offsets around the burst centre. When a
//! shaped shell pops, every point becomes one star launched with a power
//! proportional to its distance from the centre, so the burst draws the shape
//! while it expands.
//!
//! Heart outline (`+` marks the centre):
//!
//! ```text
//!  5 . . . . . . * * * . .
//!  4 . . . . . * . . . * .
//!  3 . . . . * . . . . . *
//!  2 . . . . . . . . . . *
//!  1 . . . . . . . . . . *
//!  0 . . . . + . . . . *
//! -1 . . . . . . . . * .
//! -2 . . . . . . . * .
//! -3 . . . . . . * .
//! -4 . . . . . * .
//! -5 . . . . * .
//!            0 1 2 3 4 5 6
//! ```

use serde::{Deserialize, Serialize};

use crate::particle::Color;

/// Per-point color of a shape table entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StarColor {
    /// Use the color the effect picked from its palette
    #[default]
    Palette,
    /// Leave this cell dark: no star is spawned
    Blank,
    Fixed(Color),
}

/// One cell of a burst shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub x: f64,
    pub y: f64,
    pub color: StarColor,
}

impl StarPoint {
    pub const fn new(x: f64, y: f64, color: StarColor) -> Self {
        Self { x, y, color }
    }

    /// Offset distance from the burst centre.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Offset angle, counter-clockwise from +X.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Shape table entry as written in `curtain.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarPointDef {
    pub x: f64,
    pub y: f64,
    /// Fixed `[r, g, b, a]`; omitted means palette color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 4]>,
    /// Keep the cell dark
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blank: bool,
}

impl From<&StarPointDef> for StarPoint {
    fn from(def: &StarPointDef) -> Self {
        let color = match (def.blank, def.color) {
            (true, _) => StarColor::Blank,
            (false, Some(rgba)) => StarColor::Fixed(Color::from_rgba(rgba)),
            (false, None) => StarColor::Palette,
        };
        StarPoint::new(def.x, def.y, color)
    }
}

/// Star colors for the classic ring burst.
pub const FIREWORK_PALETTE: [Color; 5] = [
    Color::opaque(255.0, 32.0, 32.0),
    Color::opaque(255.0, 32.0, 32.0),
    Color::opaque(255.0, 32.0, 32.0),
    Color::opaque(255.0, 100.0, 32.0),
    Color::opaque(255.0, 100.0, 255.0),
];

/// Reds fading to pink, plus white.
pub const HEART_PALETTE: [Color; 5] = [
    Color::opaque(255.0, 0.0, 0.0),
    Color::opaque(255.0, 64.0, 64.0),
    Color::opaque(255.0, 128.0, 128.0),
    Color::opaque(255.0, 192.0, 192.0),
    Color::WHITE,
];

/// Reds fading to pink.
pub const SPRITE_PALETTE: [Color; 4] = [
    Color::opaque(255.0, 0.0, 0.0),
    Color::opaque(255.0, 64.0, 64.0),
    Color::opaque(255.0, 128.0, 128.0),
    Color::opaque(255.0, 192.0, 192.0),
];

const HEART_OFFSETS: [(i8, i8); 28] = [
    (0, 3),
    (1, 4),
    (2, 5),
    (3, 5),
    (4, 5),
    (5, 4),
    (6, 3),
    (6, 2),
    (6, 1),
    (5, 0),
    (4, -1),
    (3, -2),
    (2, -3),
    (1, -4),
    (0, -5),
    (-1, 4),
    (-2, 5),
    (-3, 5),
    (-4, 5),
    (-5, 4),
    (-6, 3),
    (-6, 2),
    (-6, 1),
    (-5, 0),
    (-4, -1),
    (-3, -2),
    (-2, -3),
    (-1, -4),
];

/// Heart outline, every point in the palette color.
pub fn heart() -> Vec<StarPoint> {
    HEART_OFFSETS
        .iter()
        .map(|&(x, y)| StarPoint::new(x as f64, y as f64, StarColor::Palette))
        .collect()
}

// Rocket bitmap cell kinds.
const BODY: u8 = b'x';
const BAND: u8 = b'z';
const TIP: u8 = b'k';
const DARK: u8 = b'.';

const ROCKET_CELLS: [(i8, i8, u8); 64] = [
    (0, 16, TIP),
    (0, 14, TIP),
    (-1, 12, BODY),
    (0, 12, TIP),
    (1, 12, BODY),
    (-2, 11, BODY),
    (0, 11, BODY),
    (2, 11, BODY),
    (-3, 10, BODY),
    (3, 10, BODY),
    (-3, 9, BODY),
    (3, 9, BODY),
    (-2, 8, BODY),
    (-1, 8, BAND),
    (0, 8, BAND),
    (1, 8, BAND),
    (2, 8, BODY),
    (-2, 7, BODY),
    (2, 7, BODY),
    (-2, 6, BODY),
    (0, 6, DARK),
    (2, 6, BODY),
    (-2, 5, BODY),
    (1, 5, DARK),
    (2, 5, BODY),
    (-2, 4, BODY),
    (2, 4, BODY),
    (-2, 3, BODY),
    (-1, 3, DARK),
    (2, 3, BODY),
    (-2, 2, BODY),
    (0, 2, DARK),
    (2, 2, BODY),
    (-2, 1, BODY),
    (0, 1, DARK),
    (2, 1, BODY),
    (-2, 0, BODY),
    (0, 0, DARK),
    (2, 0, BODY),
    (-2, -1, BODY),
    (-1, -1, DARK),
    (2, -1, BODY),
    (-3, -2, BODY),
    (3, -2, BODY),
    (-4, -3, BODY),
    (1, -3, DARK),
    (4, -3, BODY),
    (-4, -4, BODY),
    (-3, -4, DARK),
    (2, -4, DARK),
    (4, -4, BODY),
    (-4, -5, BODY),
    (-2, -5, DARK),
    (1, -5, DARK),
    (4, -5, BODY),
    (-4, -6, BODY),
    (0, -6, BODY),
    (4, -6, BODY),
    (-3, -7, BODY),
    (-2, -7, BODY),
    (-1, -7, BODY),
    (1, -7, BODY),
    (2, -7, BODY),
    (3, -7, BODY),
];

/// Pixel-art rocket with a white nose cone and a tan band.
pub fn rocket() -> Vec<StarPoint> {
    ROCKET_CELLS
        .iter()
        .map(|&(x, y, cell)| {
            let color = match cell {
                BODY => StarColor::Fixed(Color::opaque(200.0, 180.0, 100.0)),
                BAND => StarColor::Fixed(Color::opaque(200.0, 150.0, 100.0)),
                TIP => StarColor::Fixed(Color::WHITE),
                _ => StarColor::Blank,
            };
            StarPoint::new(x as f64, y as f64, color)
        })
        .collect()
}
