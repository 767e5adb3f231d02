//! K-means palette extraction over image pixels.
//!
//! Pixels are pre-filtered by HSL saturation and lightness, then clustered in
//! 8-bit RGB under a weighted distance that counts green twice as heavily as
//! red and shifts weight between red and blue with the mean red level. Every
//! random choice draws from a seeded [`Xorshift64`], so a request always
//! produces the same palette.

use crate::cie::srgb_to_lch;
use crate::color::Rgb8;
use crate::error::ColorError;
use crate::hsx::srgb_to_hsl;
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Upper bound on assign/update rounds.
pub const MAX_ROUNDS: usize = 15;

/// Clustering stops once no centroid moves this far in a round.
pub const CONVERGENCE_DISTANCE: f64 = 0.2;

/// Seed used when a request does not name one.
pub const DEFAULT_SEED: u64 = 42;

const SEED_ATTEMPTS_PER_CLUSTER: usize = 32;

/// Minimum HSL saturation and lightness, as fractions in [0, 1].
///
/// A pixel is kept only if both its saturation and its lightness lie
/// strictly above the thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub saturation: f64,
    #[serde(default)]
    pub lightness: f64,
}

impl FilterOptions {
    pub fn keeps(&self, pixel: Rgb8) -> bool {
        let hsl = srgb_to_hsl(pixel.to_srgb());
        hsl.s > self.saturation && hsl.l > self.lightness
    }
}

/// One extracted color and the share of filtered pixels it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub color: Rgb8,
    /// Percentage in [0, 100].
    pub percentage: f64,
}

/// Extraction request as exchanged with the extraction worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub pixels: Vec<Rgb8>,
    pub k: usize,
    #[serde(default)]
    pub filter_options: FilterOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ExtractRequest {
    pub fn new(pixels: Vec<Rgb8>, k: usize) -> Self {
        Self {
            pixels,
            k,
            filter_options: FilterOptions::default(),
            seed: None,
        }
    }

    pub fn run(&self) -> Result<ExtractResponse, ColorError> {
        extract_palette(
            &self.pixels,
            self.k,
            self.filter_options,
            self.seed.unwrap_or(DEFAULT_SEED),
        )
        .map(ExtractResponse::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// `"#rrggbb"`.
    pub color: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub clusters: Vec<ClusterSummary>,
}

impl From<Vec<Swatch>> for ExtractResponse {
    fn from(swatches: Vec<Swatch>) -> Self {
        Self {
            clusters: swatches
                .into_iter()
                .map(|s| ClusterSummary {
                    color: s.color.to_hex(),
                    percentage: s.percentage,
                })
                .collect(),
        }
    }
}

type Rgb = [f64; 3];

fn to_rgb(p: Rgb8) -> Rgb {
    [p.r as f64, p.g as f64, p.b as f64]
}

/// Weighted RGB distance on the 0-255 scale.
///
/// `sqrt(2 dR^2 + 4 dG^2 + 3 dB^2 + rmean (dR^2 - dB^2) / 256)`, where
/// `rmean` is the mean of the two red channels.
pub fn weighted_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    let red_mean = (a[0] + b[0]) / 2.0;
    (2.0 * dr * dr + 4.0 * dg * dg + 3.0 * db * db + red_mean * (dr * dr - db * db) / 256.0).sqrt()
}

/// Index of the closest centroid. Ties go to the lower index.
fn nearest(pixel: &Rgb, centroids: &[Rgb]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = weighted_distance(*pixel, *c);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

/// Picks `k` distinct colors from the population as starting centroids.
///
/// Random draws are tried first; if they keep hitting duplicates the rest
/// are taken from `distinct` in first-seen order.
fn initial_centroids(
    population: &[Rgb8],
    distinct: &[Rgb8],
    k: usize,
    rng: &mut Xorshift64,
) -> Vec<Rgb> {
    let mut chosen: Vec<Rgb8> = Vec::with_capacity(k);
    let mut seen: HashSet<Rgb8> = HashSet::with_capacity(k);

    for _ in 0..k * SEED_ATTEMPTS_PER_CLUSTER {
        if chosen.len() == k {
            break;
        }
        let Some(i) = rng.index(population.len()) else {
            break;
        };
        if seen.insert(population[i]) {
            chosen.push(population[i]);
        }
    }
    for color in distinct {
        if chosen.len() == k {
            break;
        }
        if seen.insert(*color) {
            chosen.push(*color);
        }
    }
    chosen.into_iter().map(to_rgb).collect()
}

/// Clusters `pixels` into at most `k` colors.
///
/// Returns swatches sorted by descending percentage; clusters that end up
/// with no members are left out. `k` larger than the number of distinct
/// filtered colors is reduced to that number.
///
/// # Errors
///
/// [`ColorError::InvalidClusterCount`] for `k == 0`, and
/// [`ColorError::EmptyPixelSet`] when no pixel passes `filter`.
pub fn extract_palette(
    pixels: &[Rgb8],
    k: usize,
    filter: FilterOptions,
    seed: u64,
) -> Result<Vec<Swatch>, ColorError> {
    if k == 0 {
        return Err(ColorError::InvalidClusterCount(k));
    }

    let population: Vec<Rgb8> = pixels.iter().copied().filter(|p| filter.keeps(*p)).collect();
    if population.is_empty() {
        return Err(ColorError::EmptyPixelSet);
    }

    let mut seen = HashSet::new();
    let distinct: Vec<Rgb8> = population.iter().copied().filter(|p| seen.insert(*p)).collect();
    let k = k.min(distinct.len());
    debug!(
        pixels = pixels.len(),
        kept = population.len(),
        distinct = distinct.len(),
        k,
        "clustering"
    );

    let mut rng = Xorshift64::new(seed);
    let mut centroids = initial_centroids(&population, &distinct, k, &mut rng);
    let points: Vec<Rgb> = population.iter().copied().map(to_rgb).collect();
    let mut counts = vec![0usize; k];

    for round in 0..MAX_ROUNDS {
        let mut sums = vec![[0.0_f64; 3]; k];
        counts.iter_mut().for_each(|c| *c = 0);
        for point in &points {
            let i = nearest(point, &centroids);
            counts[i] += 1;
            for (sum, ch) in sums[i].iter_mut().zip(point) {
                *sum += ch;
            }
        }

        let mut max_shift = 0.0_f64;
        for (i, centroid) in centroids.iter_mut().enumerate() {
            let updated = if counts[i] > 0 {
                sums[i].map(|s| s / counts[i] as f64)
            } else {
                // Empty cluster: restart it from a random member of the population.
                let pick = rng.index(points.len()).unwrap_or(0);
                points[pick]
            };
            max_shift = max_shift.max(weighted_distance(*centroid, updated));
            *centroid = updated;
        }
        trace!(round, max_shift, "k-means round");

        if max_shift < CONVERGENCE_DISTANCE {
            debug!(round, "k-means converged");
            break;
        }
    }

    let total = points.len() as f64;
    let mut swatches: Vec<Swatch> = centroids
        .iter()
        .zip(&counts)
        .filter(|&(_, &count)| count > 0)
        .map(|(c, &count)| Swatch {
            color: Rgb8::new(round_channel(c[0]), round_channel(c[1]), round_channel(c[2])),
            percentage: count as f64 / total * 100.0,
        })
        .collect();
    swatches.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    Ok(swatches)
}

fn round_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Reorders swatches from darkest to lightest by CIE lightness.
pub fn sort_by_lightness(swatches: &mut [Swatch]) {
    swatches.sort_by(|a, b| {
        let la = srgb_to_lch(a.color.to_srgb()).l;
        let lb = srgb_to_lch(b.color.to_srgb()).l;
        la.total_cmp(&lb)
    });
}
