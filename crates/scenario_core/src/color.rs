//! Vehicle colors and the rejection sampler for background traffic.
//!
//! Priority and disruption vehicles are painted in reserved colors (red and
//! orange). Background colors are drawn uniformly and redrawn when they land in
//! either reserved band, so scheduled vehicles stay visually distinguishable.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound on redraws before the sampler falls back to a clamped color.
///
/// With the default red cap of 200 the reserved bands are unreachable and the
/// first draw is always accepted. With a cap above 240 the rejection
/// probability per draw is below 1%, so the ceiling is never hit in practice.
pub const MAX_COLOR_ATTEMPTS: usize = 1_000;

/// Red channel threshold above which both reserved bands start.
const RESERVED_RED_MIN: u8 = 240;

/// An RGB color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const PRIORITY_RED: Color = Color::new(255, 0, 0);
    pub const DISRUPTION_ORANGE: Color = Color::new(255, 128, 0);
    pub const ORDINARY_YELLOW: Color = Color::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Red band reserved for priority vehicles: r > 240, g < 50, b < 50.
    pub fn in_reserved_red(&self) -> bool {
        self.r > RESERVED_RED_MIN && self.g < 50 && self.b < 50
    }

    /// Orange band reserved for disruption vehicles: r > 240, 100 < g < 150, b < 50.
    pub fn in_reserved_orange(&self) -> bool {
        self.r > RESERVED_RED_MIN && self.g > 100 && self.g < 150 && self.b < 50
    }

    pub fn is_reserved(&self) -> bool {
        self.in_reserved_red() || self.in_reserved_orange()
    }
}

/// Rendered as `r,g,b`, the form the simulator expects in `color` attributes.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Sampling policy for background vehicle colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPolicy {
    /// Inclusive upper bound of the red channel.
    pub red_cap: u8,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self { red_cap: 200 }
    }
}

impl ColorPolicy {
    pub fn with_red_cap(red_cap: u8) -> Self {
        Self { red_cap }
    }

    /// Draw a color outside both reserved bands.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        for _ in 0..MAX_COLOR_ATTEMPTS {
            let color = self.draw(rng);
            if !color.is_reserved() {
                return color;
            }
        }

        let mut color = self.draw(rng);
        color.r = color.r.min(RESERVED_RED_MIN);
        warn!(
            attempts = MAX_COLOR_ATTEMPTS,
            %color,
            "color rejection sampling hit its retry ceiling; clamping red channel"
        );
        color
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        Color {
            r: rng.gen_range(0..=self.red_cap),
            g: rng.gen_range(0..=u8::MAX),
            b: rng.gen_range(0..=u8::MAX),
        }
    }
}
