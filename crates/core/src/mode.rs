//! Named color-space modes and the `(angle, val1, val2) -> hex` dispatcher.
//!
//! Every mode takes a hue angle in degrees plus two further coordinates on a
//! 0-100 scale, except `hcl` and `lch` which take raw CIE chroma and
//! lightness. Each mode rescales its arguments the way the generator that
//! feeds it expects before handing off to the matching codec.

use crate::cie::{hpluv_to_srgb, hsluv_to_srgb, lch_to_srgb, CieLch};
use crate::color::{oklab_to_srgb, oklch_to_srgb, OkLch, Srgb};
use crate::error::ColorError;
use crate::hsx::{hcg_to_srgb, hsl_to_srgb, hsv_to_srgb, Hcg, Hsl, Hsv};
use crate::okhsl::{okhsl_to_oklab, Okhsl};
use crate::okhsv::{okhsv_to_oklab, Okhsv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color spaces `coords_to_hex` can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Hsluv,
    Hpluv,
    Hcl,
    Lch,
    Oklch,
    Okhsv,
    Okhsl,
    Hsl,
    Hsv,
    Hcg,
}

impl ColorMode {
    pub const ALL: [ColorMode; 10] = [
        ColorMode::Hsluv,
        ColorMode::Hpluv,
        ColorMode::Hcl,
        ColorMode::Lch,
        ColorMode::Oklch,
        ColorMode::Okhsv,
        ColorMode::Okhsl,
        ColorMode::Hsl,
        ColorMode::Hsv,
        ColorMode::Hcg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Hsluv => "hsluv",
            ColorMode::Hpluv => "hpluv",
            ColorMode::Hcl => "hcl",
            ColorMode::Lch => "lch",
            ColorMode::Oklch => "oklch",
            ColorMode::Okhsv => "okhsv",
            ColorMode::Okhsl => "okhsl",
            ColorMode::Hsl => "hsl",
            ColorMode::Hsv => "hsv",
            ColorMode::Hcg => "hcg",
        }
    }

    /// Converts mode coordinates to sRGB. The result may lie outside [0, 1].
    pub fn to_srgb(self, angle: f64, val1: f64, val2: f64) -> Srgb {
        match self {
            ColorMode::Hsluv => hsluv_to_srgb(angle, val1, val2),
            ColorMode::Hpluv => hpluv_to_srgb(angle, val1, val2),
            ColorMode::Hcl => lch_to_srgb(CieLch {
                l: val2,
                c: val1,
                h: angle,
            }),
            // Same space as hcl; the generator hands its arguments over as
            // (l = val2, c = val1, h = angle) here too.
            ColorMode::Lch => lch_to_srgb(CieLch {
                l: val2,
                c: val1,
                h: angle,
            }),
            ColorMode::Oklch => oklch_to_srgb(OkLch {
                l: val2 / 100.0 * 0.999,
                c: val1 / 100.0 * 0.322,
                h: angle,
            }),
            ColorMode::Okhsv => {
                let s = (val1 / 100.0).min(1.0);
                let v = ((val2 / 100.0).powf(0.9) * 1.1 + 0.15).min(1.0);
                oklab_to_srgb(okhsv_to_oklab(Okhsv::new(angle, s, v)))
            }
            ColorMode::Okhsl => oklab_to_srgb(okhsl_to_oklab(Okhsl::new(
                angle,
                val1 / 100.0,
                val2 / 100.0,
            ))),
            ColorMode::Hsl => hsl_to_srgb(Hsl {
                h: angle,
                s: val1 / 100.0,
                l: val2 / 100.0,
            }),
            ColorMode::Hsv => hsv_to_srgb(Hsv {
                h: angle,
                s: val1 / 100.0,
                v: val2 / 100.0,
            }),
            ColorMode::Hcg => hcg_to_srgb(Hcg {
                h: angle,
                c: val1 / 100.0,
                g: val2 / 100.0,
            }),
        }
    }

    pub fn to_hex(self, angle: f64, val1: f64, val2: f64) -> String {
        self.to_srgb(angle, val1, val2).to_hex()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ColorError::UnknownMode(s.to_string()))
    }
}

/// Converts `(angle, val1, val2)` in the named mode to a `"#rrggbb"` string.
///
/// An unrecognized mode is logged and returned as
/// [`ColorError::UnknownMode`]; no fallback color is produced.
pub fn coords_to_hex(angle: f64, val1: f64, val2: f64, mode: &str) -> Result<String, ColorError> {
    let mode = mode.parse::<ColorMode>().inspect_err(|_| {
        tracing::warn!(mode, "unknown color mode in coords_to_hex");
    })?;
    Ok(mode.to_hex(angle, val1, val2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_is_an_error() {
        let err = coords_to_hex(0.0, 50.0, 50.0, "cmyk").unwrap_err();
        assert!(matches!(err, ColorError::UnknownMode(ref m) if m == "cmyk"), "{err}");
    }

    #[test]
    fn mode_names_are_case_sensitive() {
        assert!("HSL".parse::<ColorMode>().is_err());
        assert!("".parse::<ColorMode>().is_err());
    }

    #[test]
    fn every_mode_round_trips_through_its_name() {
        for mode in ColorMode::ALL {
            assert_eq!(mode.to_string().parse::<ColorMode>().unwrap(), mode);
        }
    }

    #[test]
    fn every_mode_produces_a_hex_string() {
        for mode in ColorMode::ALL {
            let hex = coords_to_hex(200.0, 60.0, 55.0, mode.as_str()).unwrap();
            assert_eq!(hex.len(), 7, "{mode}: {hex}");
            assert!(hex.starts_with('#'), "{mode}: {hex}");
        }
    }

    #[test]
    fn srgb_cylinders_hit_primaries() {
        assert_eq!(coords_to_hex(0.0, 100.0, 50.0, "hsl").unwrap(), "#ff0000");
        assert_eq!(coords_to_hex(120.0, 100.0, 100.0, "hsv").unwrap(), "#00ff00");
        assert_eq!(coords_to_hex(240.0, 100.0, 0.0, "hcg").unwrap(), "#0000ff");
    }

    #[test]
    fn lch_full_lightness_is_white() {
        assert_eq!(coords_to_hex(0.0, 0.0, 100.0, "lch").unwrap(), "#ffffff");
        assert_eq!(coords_to_hex(0.0, 0.0, 100.0, "hcl").unwrap(), "#ffffff");
    }

    #[test]
    fn oklch_scales_lightness_just_below_white() {
        // L = 0.999 renders as #fefefe or #ffffff depending on rounding.
        let hex = coords_to_hex(0.0, 0.0, 100.0, "oklch").unwrap();
        assert!(hex == "#ffffff" || hex == "#fefefe", "{hex}");
        assert_eq!(coords_to_hex(0.0, 0.0, 0.0, "oklch").unwrap(), "#000000");
    }

    #[test]
    fn okhsl_extremes_are_white_and_black() {
        assert_eq!(coords_to_hex(123.0, 80.0, 100.0, "okhsl").unwrap(), "#ffffff");
        assert_eq!(coords_to_hex(123.0, 80.0, 0.0, "okhsl").unwrap(), "#000000");
    }

    #[test]
    fn okhsv_value_is_lifted_and_capped() {
        // v = min(1.0 * 1.1 + 0.15, 1) = 1 at zero saturation is white.
        assert_eq!(coords_to_hex(10.0, 0.0, 100.0, "okhsv").unwrap(), "#ffffff");
        // v never drops below 0.15, so the darkest okhsv color is not black.
        assert_ne!(coords_to_hex(10.0, 0.0, 0.0, "okhsv").unwrap(), "#000000");
    }

    #[test]
    fn hsluv_reference_red() {
        let hex = coords_to_hex(12.177050630061776, 100.0, 53.23711559542933, "hsluv").unwrap();
        assert_eq!(hex, "#ff0000");
    }

    #[test]
    fn hpluv_mid_gray_at_zero_saturation() {
        let hex = coords_to_hex(0.0, 0.0, 53.585, "hpluv").unwrap();
        assert_eq!(hex, "#808080");
    }
}
