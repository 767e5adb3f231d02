//! sRGB gamut boundary search and cusp estimation in Oklab.
//!
//! Both operations work on one hue slice of the gamut at a time. Hues are in
//! radians. The boundary is found by bisection over chroma, and the cusp by a
//! coarse sweep over lightness; neither is an exact solver. A 50-step sweep
//! quantizes the cusp lightness to multiples of 0.02, and every caller is
//! expected to live with that.

use crate::color::{oklab_to_linear_srgb, LinearRgb, OkLab};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Upper end of the chroma bisection interval. sRGB never exceeds ~0.33.
pub const MAX_SEARCH_CHROMA: f64 = 0.5;

/// Chroma (and cusp lightness) below this is treated as zero.
pub const ACHROMATIC_THRESHOLD: f64 = 1e-5;

const BISECTION_STEPS: usize = 15;
const CHANNEL_TOLERANCE: f64 = 1e-4;
const LIGHTNESS_SLACK: f64 = 0.001;
const CUSP_LIGHTNESS_STEPS: usize = 50;

/// The widest point of one hue's gamut slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cusp {
    /// Oklab lightness at which chroma peaks.
    pub l: f64,
    /// The peak chroma.
    pub c: f64,
}

fn within_unit_cube(rgb: LinearRgb) -> bool {
    let ok = |ch: f64| (-CHANNEL_TOLERANCE..=1.0 + CHANNEL_TOLERANCE).contains(&ch);
    ok(rgb.r) && ok(rgb.g) && ok(rgb.b)
}

/// Largest chroma at `(lightness, hue_rad)` that stays inside the sRGB cube.
///
/// Lightness outside `[-0.001, 1.001]` (or NaN) has no chroma range and
/// returns 0. Runs a fixed 15 bisection steps over `[0, 0.5]`, which leaves
/// the answer within about 1.5e-5 of the true boundary.
pub fn max_chroma_in_gamut(hue_rad: f64, lightness: f64) -> f64 {
    if !(-LIGHTNESS_SLACK..=1.0 + LIGHTNESS_SLACK).contains(&lightness) {
        return 0.0;
    }
    let (sin_h, cos_h) = hue_rad.sin_cos();

    let mut low = 0.0_f64;
    let mut high = MAX_SEARCH_CHROMA;
    let mut best = 0.0_f64;
    for _ in 0..BISECTION_STEPS {
        let mid = (low + high) / 2.0;
        if mid < ACHROMATIC_THRESHOLD {
            // Too close to the neutral axis to tell apart; count it as inside.
            best = best.max(mid);
            low = mid;
            continue;
        }
        let rgb = oklab_to_linear_srgb(OkLab {
            l: lightness,
            a: mid * cos_h,
            b: mid * sin_h,
        });
        if within_unit_cube(rgb) {
            best = mid;
            low = mid;
        } else {
            high = mid;
        }
    }
    best
}

/// Finds the cusp of `hue_rad` by sampling lightness at 0, 0.02, ..., 1.
///
/// A hue whose best chroma stays under 1e-5 is treated as achromatic and
/// reports `l = 0.5`.
pub fn estimate_cusp(hue_rad: f64) -> Cusp {
    let mut cusp = Cusp { l: 0.5, c: 0.0 };
    for step in 0..=CUSP_LIGHTNESS_STEPS {
        let l = step as f64 / CUSP_LIGHTNESS_STEPS as f64;
        let c = max_chroma_in_gamut(hue_rad, l);
        if c > cusp.c {
            cusp = Cusp { l, c };
        }
    }
    if cusp.c < ACHROMATIC_THRESHOLD {
        cusp.l = 0.5;
    }
    cusp
}

/// Anything that can answer "where is the cusp for this hue".
///
/// The codecs take a `CuspSource` so a caller converting many colors can
/// swap in a [`CuspCache`]. Every implementation must return what
/// [`estimate_cusp`] returns.
pub trait CuspSource {
    fn cusp(&self, hue_rad: f64) -> Cusp;
}

/// Recomputes the cusp on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCusp;

impl CuspSource for DirectCusp {
    fn cusp(&self, hue_rad: f64) -> Cusp {
        estimate_cusp(hue_rad)
    }
}

/// Memoizes [`estimate_cusp`] per exact hue value.
///
/// Keys are the hue's bit pattern, so a hit returns exactly what a fresh
/// estimate would. When `capacity` entries are stored the cache is emptied
/// before the next insert. Safe to share between threads.
#[derive(Debug)]
pub struct CuspCache {
    entries: Mutex<HashMap<u64, Cusp>>,
    capacity: usize,
}

impl CuspCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for CuspCache {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl CuspSource for CuspCache {
    fn cusp(&self, hue_rad: f64) -> Cusp {
        let key = hue_rad.to_bits();
        if let Some(hit) = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *hit;
        }

        // Computed without holding the lock; a concurrent miss on the same
        // hue computes the same value.
        let cusp = estimate_cusp(hue_rad);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key, cusp);
        cusp
    }
}
