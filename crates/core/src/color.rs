//! Color types and the transforms between them.
//!
//! Provides `Srgb`, `LinearRgb`, `OkLab`, `OkLch`, and the 8-bit `Rgb8`, plus
//! pure conversion functions. All math is `f64`.
//!
//! Two Oklab inverses live here on purpose. [`oklab_to_linear`] is the exact
//! algebraic inverse of [`linear_to_oklab`] and is what colors are rendered
//! with. [`oklab_to_linear_srgb`] goes through an explicit LMS -> XYZ -> sRGB
//! chain and is what every gamut test in [`crate::gamut`] is measured against.

use crate::error::ColorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gamma-encoded sRGB color with components in [0, 1].
///
/// Serializes as a `"#rrggbb"` hex string (8-bit quantized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear-light RGB (gamma-decoded). Unbounded: out-of-gamut values are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Oklab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Cylindrical Oklab. `h` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// Display sRGB with 8-bit channels, as found in image buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Naive (device-independent) CMYK, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Srgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `ColorError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, ColorError> {
        Rgb8::from_hex(hex).map(Rgb8::to_srgb)
    }

    /// Formats as `"#rrggbb"`, clamping to [0, 1] and rounding to 8 bits.
    pub fn to_hex(self) -> String {
        self.to_rgb8().to_hex()
    }

    /// Quantizes to 8-bit channels with clamping and rounding.
    pub fn to_rgb8(self) -> Rgb8 {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb8 {
            r: q(self.r),
            g: q(self.g),
            b: q(self.b),
        }
    }

    /// Clamps every channel into [0, 1].
    pub fn clamped(self) -> Srgb {
        Srgb {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Converts to CMYK. Pure black maps to `k = 1` with zero inks.
    pub fn to_cmyk(self) -> Cmyk {
        let c = self.clamped();
        let k = 1.0 - c.r.max(c.g).max(c.b);
        let black_factor = if 1.0 - k == 0.0 { 1.0 } else { 1.0 - k };
        Cmyk {
            c: (1.0 - c.r - k) / black_factor,
            m: (1.0 - c.g - k) / black_factor,
            y: (1.0 - c.b - k) / black_factor,
            k,
        }
    }

    /// WCAG relative luminance (Rec. 709 weights over linear light).
    pub fn relative_luminance(self) -> f64 {
        let lin = srgb_to_linear(self.clamped());
        0.2126 * lin.r + 0.7152 * lin.g + 0.0722 * lin.b
    }
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Rgb8, ColorError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| ColorError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Rgb8 {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_srgb(self) -> Srgb {
        Srgb {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// WCAG contrast ratio between two colors, always >= 1.
pub fn contrast_ratio(a: Srgb, b: Srgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Lists every ordered pair `(i, j)`, `i != j`, whose contrast meets `threshold`.
///
/// With `threshold = 4.5` this is the WCAG AA check for normal text.
pub fn readable_pairs(colors: &[Srgb], threshold: f64) -> Vec<(usize, usize)> {
    colors
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| {
            colors
                .iter()
                .enumerate()
                .filter(move |&(j, &b)| i != j && contrast_ratio(a, b) >= threshold)
                .map(move |(j, _)| (i, j))
        })
        .collect()
}

fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts sRGB to linear RGB by applying inverse sRGB gamma.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear RGB to sRGB by applying sRGB gamma. Does not clamp.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

/// Converts linear RGB to Oklab.
pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l_ = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m_ = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s_ = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let l_c = l_.cbrt();
    let m_c = m_.cbrt();
    let s_c = s_.cbrt();

    OkLab {
        l: 0.2104542553 * l_c + 0.7936177850 * m_c - 0.0040720468 * s_c,
        a: 1.9779984951 * l_c - 2.4285922050 * m_c + 0.4505937099 * s_c,
        b: 0.0259040371 * l_c + 0.7827717662 * m_c - 0.8086757660 * s_c,
    }
}

/// Exact inverse of [`linear_to_oklab`]; used for rendering.
pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// Weights of `a` in the primed cone responses l', m', s'.
const OKLAB_A_TO_LMS: [f64; 3] = [0.3963377774, -0.1055613458, -0.0894841775];
/// Weights of `b` in the primed cone responses l', m', s'.
const OKLAB_B_TO_LMS: [f64; 3] = [0.2158037573, -0.0638541728, -1.2914855480];

/// Cone responses (LMS) to CIE XYZ.
const LMS_TO_XYZ: [[f64; 3]; 3] = [
    [1.22701385, -0.55779998, 0.28125615],
    [-0.04058017, 1.11225686, -0.07167669],
    [-0.07638128, -0.42148198, 1.58616322],
];

/// CIE XYZ (D65) to linear sRGB.
const XYZ_TO_LINEAR_SRGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Oklab to linear sRGB through LMS and XYZ. Never fails; the result is
/// unbounded and lies outside [0, 1] for out-of-gamut input.
pub fn oklab_to_linear_srgb(c: OkLab) -> LinearRgb {
    let primed: [f64; 3] =
        std::array::from_fn(|i| c.l + OKLAB_A_TO_LMS[i] * c.a + OKLAB_B_TO_LMS[i] * c.b);
    let cones = primed.map(|p| p * p * p);
    let xyz = mul3(&LMS_TO_XYZ, cones);
    let [r, g, b] = mul3(&XYZ_TO_LINEAR_SRGB, xyz);
    LinearRgb { r, g, b }
}

/// Wraps a hue in degrees into [0, 360).
///
/// `rem_euclid` alone can round a tiny negative input up to exactly 360.
pub fn wrap_degrees(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Converts Oklab to OkLch. Chroma below 1e-10 reports hue 0 instead of an
/// indeterminate `atan2(0, 0)`.
pub fn oklab_to_oklch(c: OkLab) -> OkLch {
    let ch = (c.a * c.a + c.b * c.b).sqrt();
    let h = if ch < 1e-10 {
        0.0
    } else {
        wrap_degrees(c.b.atan2(c.a).to_degrees())
    };
    OkLch { l: c.l, c: ch, h }
}

pub fn oklch_to_oklab(c: OkLch) -> OkLab {
    let h_rad = c.h.to_radians();
    OkLab {
        l: c.l,
        a: c.c * h_rad.cos(),
        b: c.c * h_rad.sin(),
    }
}

pub fn srgb_to_oklab(c: Srgb) -> OkLab {
    linear_to_oklab(srgb_to_linear(c))
}

/// Renders Oklab to sRGB, clamped to [0, 1].
pub fn oklab_to_srgb(c: OkLab) -> Srgb {
    linear_to_srgb(oklab_to_linear(c)).clamped()
}

pub fn srgb_to_oklch(c: Srgb) -> OkLch {
    oklab_to_oklch(srgb_to_oklab(c))
}

/// Renders OkLch to sRGB, clamped to [0, 1].
pub fn oklch_to_srgb(c: OkLch) -> Srgb {
    oklab_to_srgb(oklch_to_oklab(c))
}
