//! Engine for "Color the Snake": snakes collect colored food to fill in and
//! extend their bodies, and shed their colors again when they crash.

pub mod config;
pub mod food;
pub mod game;
pub mod playfield;
pub mod snake;
pub mod surface;
pub mod term;

use rand::seq::SliceRandom;
use rand::Rng;

/// Playfield coordinates, origin at the window center.
pub type Point = (f32, f32);
pub type Rgb = (u8, u8, u8);

/// Edge length of one body segment, also the distance covered per move.
pub const SEGMENT_SIZE: f32 = 20.0;

/// Draw color of segments that have not been colored yet.
pub const WHITE: Rgb = (255, 255, 255);
/// Flash color used by collision warnings.
pub const YELLOW: Rgb = (255, 255, 0);

pub const PALETTE: [Rgb; 19] = [
    (255, 87, 51),
    (51, 255, 87),
    (51, 87, 255),
    (255, 51, 161),
    (51, 255, 161),
    (255, 134, 51),
    (51, 255, 209),
    (161, 51, 255),
    (255, 209, 51),
    (51, 161, 255),
    (166, 7, 107),
    (41, 136, 98),
    (255, 102, 0),
    (56, 91, 180),
    (217, 22, 86),
    (13, 146, 244),
    (255, 136, 91),
    (110, 194, 7),
    (184, 0, 31),
];

pub fn random_color<R: Rng>(rng: &mut R) -> Rgb {
    *PALETTE.choose(rng).expect("palette is not empty")
}
