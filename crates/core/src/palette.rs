//! Color scale over a list of stops, sampled by interpolation.
//!
//! Stops are evenly spaced along `t` and each neighboring pair is mixed in a
//! chosen interpolation space. Hue spaces take the shortest arc around the
//! wheel, and an achromatic stop borrows its neighbor's hue so that a gray
//! endpoint does not drag the gradient through an arbitrary hue.

use crate::cie::{lab_to_srgb, lch_to_srgb, srgb_to_lab, srgb_to_lch, CieLab, CieLch};
use crate::color::{
    linear_to_srgb, oklab_to_srgb, oklch_to_srgb, srgb_to_linear, srgb_to_oklab, srgb_to_oklch,
    wrap_degrees, LinearRgb, OkLab, OkLch, Srgb,
};
use crate::error::ColorError;
use crate::hsx::{hsl_to_srgb, hsv_to_srgb, srgb_to_hsl, srgb_to_hsv, Hsl, Hsv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chroma under which an OkLch or CIE LCh stop counts as having no hue.
const OKLCH_ACHROMATIC: f64 = 1e-4;
const LCH_ACHROMATIC: f64 = 1e-2;

/// Space in which neighboring stops are mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationSpace {
    /// Gamma-encoded sRGB channels.
    #[default]
    Rgb,
    /// Linear-light sRGB channels.
    Lrgb,
    /// CIE L*a*b*.
    Lab,
    Oklab,
    Oklch,
    /// CIE LCh(ab).
    Hcl,
    Hsl,
    Hsv,
}

impl InterpolationSpace {
    pub const ALL: [InterpolationSpace; 8] = [
        InterpolationSpace::Rgb,
        InterpolationSpace::Lrgb,
        InterpolationSpace::Lab,
        InterpolationSpace::Oklab,
        InterpolationSpace::Oklch,
        InterpolationSpace::Hcl,
        InterpolationSpace::Hsl,
        InterpolationSpace::Hsv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterpolationSpace::Rgb => "rgb",
            InterpolationSpace::Lrgb => "lrgb",
            InterpolationSpace::Lab => "lab",
            InterpolationSpace::Oklab => "oklab",
            InterpolationSpace::Oklch => "oklch",
            InterpolationSpace::Hcl => "hcl",
            InterpolationSpace::Hsl => "hsl",
            InterpolationSpace::Hsv => "hsv",
        }
    }
}

impl fmt::Display for InterpolationSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationSpace {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterpolationSpace::ALL
            .into_iter()
            .find(|space| space.as_str() == s)
            .ok_or_else(|| ColorError::InvalidPalette(format!("unknown interpolation space: {s}")))
    }
}

/// An ordered list of color stops sampled as a continuous scale.
///
/// `sample(0.0)` returns the first stop and `sample(1.0)` the last, unless
/// padding trims the ends of the range.
#[derive(Debug, Clone)]
pub struct Palette {
    stops: Vec<Srgb>,
    space: InterpolationSpace,
    padding: (f64, f64),
}

impl Palette {
    /// Creates a scale over `stops`, mixed in sRGB with no padding.
    ///
    /// Requires at least one stop.
    pub fn new(stops: Vec<Srgb>) -> Result<Self, ColorError> {
        if stops.is_empty() {
            return Err(ColorError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self {
            stops,
            space: InterpolationSpace::default(),
            padding: (0.0, 0.0),
        })
    }

    /// Creates a scale by parsing hex color strings.
    ///
    /// Each string can be "#rrggbb" or "rrggbb" (case insensitive).
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self, ColorError> {
        let stops = hexes
            .iter()
            .map(|h| Srgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stops)
    }

    pub fn with_space(mut self, space: InterpolationSpace) -> Self {
        self.space = space;
        self
    }

    /// Trims `padding` off both ends of the sampled range.
    pub fn with_padding(self, padding: f64) -> Self {
        self.with_padding_each(padding, padding)
    }

    /// Trims `start` off the low end and `end` off the high end.
    pub fn with_padding_each(mut self, start: f64, end: f64) -> Self {
        self.padding = (start, end);
        self
    }

    pub fn space(&self) -> InterpolationSpace {
        self.space
    }

    pub fn stops(&self) -> &[Srgb] {
        &self.stops
    }

    /// Returns the number of stops in this palette.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns true if this palette has no stops. (Always false for valid palettes.)
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Samples the scale at `t` in [0, 1].
    ///
    /// `t` is clamped (NaN reads as 0), then mapped through the padding. The
    /// result is clamped to the sRGB cube.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (pad_start, pad_end) = self.padding;
        let t = (pad_start + t * (1.0 - pad_start - pad_end)).clamp(0.0, 1.0);
        let n = self.stops.len();

        if n == 1 {
            return self.stops[0].clamped();
        }

        // Map t to segment index and local interpolation factor
        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;

        mix(self.space, self.stops[idx], self.stops[idx + 1], frac).clamped()
    }

    /// `count` evenly spaced samples from the start of the scale to its end.
    pub fn colors(&self, count: usize) -> Vec<Srgb> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..count)
                .map(|i| self.sample(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }

    /// [`Palette::colors`] formatted as `"#rrggbb"` strings.
    pub fn hex_colors(&self, count: usize) -> Vec<String> {
        self.colors(count).into_iter().map(Srgb::to_hex).collect()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Interpolates hue using shortest-arc logic, handling wraparound at 360.
fn interpolate_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let delta = match h1 - h0 {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    wrap_degrees(h0 + t * delta)
}

/// Hue mix where a stop without chroma takes on the other stop's hue.
fn interpolate_polar_hue(h0: f64, gray0: bool, h1: f64, gray1: bool, t: f64) -> f64 {
    match (gray0, gray1) {
        (true, false) => h1,
        (false, true) => h0,
        _ => interpolate_hue(h0, h1, t),
    }
}

fn mix(space: InterpolationSpace, a: Srgb, b: Srgb, t: f64) -> Srgb {
    match space {
        InterpolationSpace::Rgb => Srgb {
            r: lerp(a.r, b.r, t),
            g: lerp(a.g, b.g, t),
            b: lerp(a.b, b.b, t),
        },
        InterpolationSpace::Lrgb => {
            let (a, b) = (srgb_to_linear(a), srgb_to_linear(b));
            linear_to_srgb(LinearRgb {
                r: lerp(a.r, b.r, t),
                g: lerp(a.g, b.g, t),
                b: lerp(a.b, b.b, t),
            })
        }
        InterpolationSpace::Lab => {
            let (a, b) = (srgb_to_lab(a), srgb_to_lab(b));
            lab_to_srgb(CieLab {
                l: lerp(a.l, b.l, t),
                a: lerp(a.a, b.a, t),
                b: lerp(a.b, b.b, t),
            })
        }
        InterpolationSpace::Oklab => {
            let (a, b) = (srgb_to_oklab(a), srgb_to_oklab(b));
            oklab_to_srgb(OkLab {
                l: lerp(a.l, b.l, t),
                a: lerp(a.a, b.a, t),
                b: lerp(a.b, b.b, t),
            })
        }
        InterpolationSpace::Oklch => {
            let (a, b) = (srgb_to_oklch(a), srgb_to_oklch(b));
            oklch_to_srgb(OkLch {
                l: lerp(a.l, b.l, t),
                c: lerp(a.c, b.c, t),
                h: interpolate_polar_hue(
                    a.h,
                    a.c < OKLCH_ACHROMATIC,
                    b.h,
                    b.c < OKLCH_ACHROMATIC,
                    t,
                ),
            })
        }
        InterpolationSpace::Hcl => {
            let (a, b) = (srgb_to_lch(a), srgb_to_lch(b));
            lch_to_srgb(CieLch {
                l: lerp(a.l, b.l, t),
                c: lerp(a.c, b.c, t),
                h: interpolate_polar_hue(a.h, a.c < LCH_ACHROMATIC, b.h, b.c < LCH_ACHROMATIC, t),
            })
        }
        InterpolationSpace::Hsl => {
            let (a, b) = (srgb_to_hsl(a), srgb_to_hsl(b));
            hsl_to_srgb(Hsl {
                h: interpolate_polar_hue(a.h, a.s == 0.0, b.h, b.s == 0.0, t),
                s: lerp(a.s, b.s, t),
                l: lerp(a.l, b.l, t),
            })
        }
        InterpolationSpace::Hsv => {
            let (a, b) = (srgb_to_hsv(a), srgb_to_hsv(b));
            hsv_to_srgb(Hsv {
                h: interpolate_polar_hue(a.h, a.s == 0.0, b.h, b.s == 0.0, t),
                s: lerp(a.s, b.s, t),
                v: lerp(a.v, b.v, t),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-5;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_srgb_eq(actual: Srgb, expected: Srgb) {
        assert!(
            approx_eq(actual.r, expected.r)
                && approx_eq(actual.g, expected.g)
                && approx_eq(actual.b, expected.b),
            "{actual:?} vs {expected:?}"
        );
    }

    fn in_unit_cube(c: Srgb) -> bool {
        [c.r, c.g, c.b].iter().all(|ch| (0.0..=1.0).contains(ch))
    }

    // -- Construction tests --

    #[test]
    fn new_with_empty_vec_returns_error() {
        let err = Palette::new(vec![]).unwrap_err();
        assert!(matches!(err, ColorError::InvalidPalette(_)), "{err}");
    }

    #[test]
    fn from_hex_with_valid_colors_succeeds() {
        let palette = Palette::from_hex(&["#ff0000", "#00ff00", "#0000ff"]).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.space(), InterpolationSpace::Rgb);
    }

    #[test]
    fn from_hex_accepts_owned_strings() {
        let hexes = vec!["#ff0000".to_string(), "00ff00".to_string()];
        assert_eq!(Palette::from_hex(&hexes).unwrap().len(), 2);
    }

    #[test]
    fn from_hex_with_empty_slice_returns_error() {
        let empty: [&str; 0] = [];
        assert!(Palette::from_hex(&empty).is_err());
    }

    #[test]
    fn from_hex_with_invalid_hex_returns_error() {
        let err = Palette::from_hex(&["#ff0000", "#zzzzzz"]).unwrap_err();
        assert!(matches!(err, ColorError::InvalidColor(_)), "{err}");
    }

    #[test]
    fn unknown_space_name_is_rejected() {
        let err = "spectral".parse::<InterpolationSpace>().unwrap_err();
        assert!(matches!(err, ColorError::InvalidPalette(_)), "{err}");
        for space in InterpolationSpace::ALL {
            assert_eq!(space.to_string().parse::<InterpolationSpace>().unwrap(), space);
        }
    }

    // -- Sampling tests --

    #[test]
    fn endpoints_return_first_and_last_stop_in_every_space() {
        for space in InterpolationSpace::ALL {
            let palette = Palette::from_hex(&["#ff0000", "#00ff00", "#0000ff"])
                .unwrap()
                .with_space(space);
            assert_eq!(palette.sample(0.0).to_hex(), "#ff0000", "{space}");
            assert_eq!(palette.sample(1.0).to_hex(), "#0000ff", "{space}");
            assert_eq!(palette.sample(0.5).to_hex(), "#00ff00", "{space}");
        }
    }

    #[test]
    fn single_color_palette_returns_that_color_for_any_t() {
        let color = Srgb::new(0.2, 0.4, 0.6);
        let palette = Palette::new(vec![color]).unwrap();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_srgb_eq(palette.sample(t), color);
        }
    }

    #[test]
    fn sample_clamps_t_outside_unit_range() {
        let palette = Palette::from_hex(&["#ff0000", "#0000ff"]).unwrap();
        assert_srgb_eq(palette.sample(-0.5), palette.sample(0.0));
        assert_srgb_eq(palette.sample(1.5), palette.sample(1.0));
    }

    #[test]
    fn rgb_midpoint_of_black_and_white_is_half_gray() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        assert_srgb_eq(palette.sample(0.5), Srgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn linear_midpoint_is_brighter_than_gamma_midpoint() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"])
            .unwrap()
            .with_space(InterpolationSpace::Lrgb);
        let mid = palette.sample(0.5);
        assert!((mid.r - 0.735).abs() < 1e-3, "{mid:?}");
    }

    #[test]
    fn gray_endpoint_borrows_hue_in_hsl() {
        let palette = Palette::from_hex(&["#ffffff", "#ff0000"])
            .unwrap()
            .with_space(InterpolationSpace::Hsl);
        let mid = srgb_to_hsl(palette.sample(0.5));
        assert!(approx_eq(mid.h, 0.0), "hue {}", mid.h);
        assert!(approx_eq(mid.s, 0.5), "sat {}", mid.s);
    }

    #[test]
    fn gray_endpoint_borrows_hue_in_oklch() {
        let blue = Srgb::from_hex("#0000ff").unwrap();
        let palette = Palette::new(vec![Srgb::new(0.5, 0.5, 0.5), blue])
            .unwrap()
            .with_space(InterpolationSpace::Oklch);
        let mid = srgb_to_oklch(palette.sample(0.5));
        let blue_hue = srgb_to_oklch(blue).h;
        assert!((mid.h - blue_hue).abs() < 0.5, "{} vs {}", mid.h, blue_hue);
    }

    #[test]
    fn padding_trims_both_ends() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"])
            .unwrap()
            .with_padding(0.25);
        assert_srgb_eq(palette.sample(0.0), Srgb::new(0.25, 0.25, 0.25));
        assert_srgb_eq(palette.sample(1.0), Srgb::new(0.75, 0.75, 0.75));
    }

    #[test]
    fn asymmetric_padding() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"])
            .unwrap()
            .with_padding_each(0.0, 0.5);
        assert_srgb_eq(palette.sample(0.0), Srgb::new(0.0, 0.0, 0.0));
        assert_srgb_eq(palette.sample(1.0), Srgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn colors_spans_the_whole_scale() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let hexes = palette.hex_colors(5);
        assert_eq!(hexes, ["#000000", "#404040", "#808080", "#bfbfbf", "#ffffff"]);
        assert!(palette.colors(0).is_empty());
        assert_eq!(palette.hex_colors(1), ["#000000"]);
    }

    // -- Hue wraparound tests --

    #[test]
    fn hue_wraparound_350_to_10_goes_through_zero() {
        // The short way from 350 to 10 passes 0, not 180.
        let h = interpolate_hue(350.0, 10.0, 0.5);
        assert!(approx_eq(h, 0.0), "midpoint hue should be 0, got {h}");
    }

    #[test]
    fn hue_wraparound_10_to_350_goes_through_zero() {
        let h = interpolate_hue(10.0, 350.0, 0.5);
        assert!(approx_eq(h, 0.0), "midpoint hue should be 0, got {h}");
    }

    #[test]
    fn hue_interpolation_no_wraparound() {
        assert!(approx_eq(interpolate_hue(90.0, 180.0, 0.5), 135.0));
    }

    #[test]
    fn sample_nan_returns_first_stop() {
        let palette = Palette::from_hex(&["#ff0000", "#0000ff"]).unwrap();
        assert_eq!(palette.sample(f64::NAN).to_hex(), "#ff0000");
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sample_always_produces_valid_srgb(
                t in -0.5_f64..=1.5,
                space_index in 0usize..8,
            ) {
                let palette = Palette::from_hex(&[
                    "#ff0000", "#00ff00", "#0000ff", "#ffff00",
                ])
                .unwrap()
                .with_space(InterpolationSpace::ALL[space_index]);
                let srgb = palette.sample(t);
                prop_assert!(in_unit_cube(srgb), "{:?} at t={}", srgb, t);
            }

            #[test]
            fn hue_interpolation_stays_in_range(
                h0 in 0.0_f64..360.0,
                h1 in 0.0_f64..360.0,
                t in 0.0_f64..=1.0,
            ) {
                let h = interpolate_hue(h0, h1, t);
                prop_assert!(
                    (0.0..360.0).contains(&h),
                    "hue {} out of [0, 360) for h0={h0}, h1={h1}, t={t}", h
                );
            }
        }
    }
}
