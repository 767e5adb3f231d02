//! Finds where palette colors occur in an RGBA image.
//!
//! The search walks a coarse spiral out from the image center, so the first
//! positions reported for a color are the ones nearest the middle. Angular
//! resolution drops and the radius step grows as the spiral widens; large
//! images are sampled, not scanned.

use crate::color::Rgb8;
use crate::error::ColorError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const OPAQUE_ALPHA: u8 = 128;

/// A borrowed RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> ImageView<'a> {
    /// Fails with [`ColorError::InvalidImage`] unless `data` holds exactly
    /// `width * height` RGBA pixels.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self, ColorError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ColorError::InvalidImage(format!(
                "{width}x{height} RGBA image needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Every pixel as `(rgb, alpha)`, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (Rgb8, u8)> + 'a {
        self.data
            .chunks_exact(4)
            .map(|px| (Rgb8::new(px[0], px[1], px[2]), px[3]))
    }

    /// `(rgb, alpha)` at `(x, y)`; the caller keeps coordinates in bounds.
    fn pixel(&self, x: usize, y: usize) -> (Rgb8, u8) {
        let i = (y * self.width as usize + x) * 4;
        let px = &self.data[i..i + 4];
        (Rgb8::new(px[0], px[1], px[2]), px[3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorOptions {
    pub max_positions_per_color: usize,
    /// Squared RGB distance (0-255 scale) below which a pixel matches.
    pub distance_threshold_sq: u32,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            max_positions_per_color: 30,
            distance_threshold_sq: 900,
        }
    }
}

/// A match, normalized to the image: `x` and `y` in [0, 1), `distance` as
/// the fraction of the center-to-corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    /// Set on the placeholder center position of a color that was not found.
    pub is_default: bool,
}

impl Position {
    const CENTER: Position = Position {
        x: 0.5,
        y: 0.5,
        distance: 0.0,
        is_default: true,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorLocations {
    pub color: Rgb8,
    pub positions: Vec<Position>,
}

fn distance_sq(a: Rgb8, b: Rgb8) -> u32 {
    let d = |x: u8, y: u8| {
        let d = x.abs_diff(y) as u32;
        d * d
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}

fn angle_step(radius: usize) -> f64 {
    match radius {
        0 => 2.0 * PI,
        1..=19 => PI / 8.0,
        20..=49 => PI / 6.0,
        50..=99 => PI / 4.0,
        _ => PI / 3.0,
    }
}

/// Rounds half up, so spiral samples left of center land where they should.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Locates each target color in `image`.
///
/// Returns one entry per distinct target, in the order given. A pixel counts
/// toward the first target it matches that still has room; a target with no
/// match gets a single [`Position`] at the center with `is_default` set.
/// Pixels with alpha below 128 are skipped.
pub fn locate_colors(
    image: &ImageView<'_>,
    targets: &[Rgb8],
    options: &LocatorOptions,
) -> Result<Vec<ColorLocations>, ColorError> {
    if targets.is_empty() {
        return Err(ColorError::InvalidImage(
            "no target colors to locate".to_string(),
        ));
    }

    let mut found: Vec<ColorLocations> = Vec::with_capacity(targets.len());
    for &color in targets {
        if found.iter().all(|l| l.color != color) {
            found.push(ColorLocations {
                color,
                positions: Vec::new(),
            });
        }
    }

    let width = image.width as usize;
    let height = image.height as usize;
    let center_x = width / 2;
    let center_y = height / 2;
    let max_radius = ((center_x * center_x + center_y * center_y) as f64).sqrt();
    let base_step = (width.min(height) / 200).max(1);
    let limit = options.max_positions_per_color;

    let mut searching = found.len();
    let mut radius = 0usize;
    'spiral: while radius as f64 <= max_radius && searching > 0 {
        let step = angle_step(radius);
        let mut angle = 0.0_f64;
        while angle < 2.0 * PI {
            let (x, y) = if radius == 0 {
                (center_x as f64, center_y as f64)
            } else {
                (
                    round_half_up(center_x as f64 + radius as f64 * angle.cos()),
                    round_half_up(center_y as f64 + radius as f64 * angle.sin()),
                )
            };
            angle += step;

            if x < 0.0 || y < 0.0 || x >= width as f64 || y >= height as f64 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            let (rgb, alpha) = image.pixel(x, y);
            if alpha < OPAQUE_ALPHA {
                continue;
            }

            let matched = found.iter_mut().find(|l| {
                l.positions.len() < limit && distance_sq(rgb, l.color) < options.distance_threshold_sq
            });
            if let Some(locations) = matched {
                locations.positions.push(Position {
                    x: x as f64 / width as f64,
                    y: y as f64 / height as f64,
                    distance: if max_radius > 0.0 {
                        radius as f64 / max_radius
                    } else {
                        0.0
                    },
                    is_default: false,
                });
                if locations.positions.len() == limit {
                    searching -= 1;
                    if searching == 0 {
                        break 'spiral;
                    }
                }
            }
        }

        radius += if radius == 0 {
            base_step
        } else {
            let mut increment = base_step;
            if radius > 100 {
                increment += base_step;
            }
            if radius > 200 {
                increment += base_step * 2;
            }
            increment
        };
    }

    for locations in &mut found {
        if locations.positions.is_empty() {
            locations.positions.push(Position::CENTER);
        }
    }
    Ok(found)
}
