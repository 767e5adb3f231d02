//! CIE Lab/LCh(ab) and the HSLuv/HPLuv family.
//!
//! Lab uses a D65 white point of (0.95047, 1, 1.08883) with an 8-bit-era sRGB
//! transfer threshold of 0.00304, matching the values web color libraries ship.
//! HSLuv follows the reference implementation: saturation is measured against
//! the distance to the sRGB gamut's bounding lines in CIE Luv.

use crate::color::{wrap_degrees, Srgb};

const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

const LAB_T0: f64 = 0.137931034;
const LAB_T1: f64 = 0.206896552;
const LAB_T2: f64 = 0.12841855;
const LAB_T3: f64 = 0.008856452;

/// CIE L*a*b*, L in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Cylindrical CIE Lab. `h` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

fn lab_to_xyz_channel(t: f64) -> f64 {
    if t > LAB_T1 {
        t * t * t
    } else {
        LAB_T2 * (t - LAB_T0)
    }
}

fn xyz_to_lab_channel(t: f64) -> f64 {
    if t > LAB_T3 {
        t.cbrt()
    } else {
        t / LAB_T2 + LAB_T0
    }
}

fn encode_channel(c: f64) -> f64 {
    if c <= 0.00304 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn decode_channel(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Lab to gamma-encoded sRGB. Not clamped.
pub fn lab_to_srgb(c: CieLab) -> Srgb {
    let fy = (c.l + 16.0) / 116.0;
    let fx = fy + c.a / 500.0;
    let fz = fy - c.b / 200.0;

    let x = WHITE_X * lab_to_xyz_channel(fx);
    let y = WHITE_Y * lab_to_xyz_channel(fy);
    let z = WHITE_Z * lab_to_xyz_channel(fz);

    Srgb {
        r: encode_channel(3.2404542 * x - 1.5371385 * y - 0.4985314 * z),
        g: encode_channel(-0.9692660 * x + 1.8760108 * y + 0.0415560 * z),
        b: encode_channel(0.0556434 * x - 0.2040259 * y + 1.0572252 * z),
    }
}

pub fn srgb_to_lab(c: Srgb) -> CieLab {
    let r = decode_channel(c.r);
    let g = decode_channel(c.g);
    let b = decode_channel(c.b);

    let x = xyz_to_lab_channel((0.4124564 * r + 0.3575761 * g + 0.1804375 * b) / WHITE_X);
    let y = xyz_to_lab_channel((0.2126729 * r + 0.7151522 * g + 0.0721750 * b) / WHITE_Y);
    let z = xyz_to_lab_channel((0.0193339 * r + 0.1191920 * g + 0.9503041 * b) / WHITE_Z);

    CieLab {
        l: (116.0 * y - 16.0).max(0.0),
        a: 500.0 * (x - y),
        b: 200.0 * (y - z),
    }
}

/// Chroma below 1e-4 reports hue 0.
pub fn lab_to_lch(c: CieLab) -> CieLch {
    let chroma = (c.a * c.a + c.b * c.b).sqrt();
    let h = if chroma < 1e-4 {
        0.0
    } else {
        wrap_degrees(c.b.atan2(c.a).to_degrees())
    };
    CieLch { l: c.l, c: chroma, h }
}

pub fn lch_to_lab(c: CieLch) -> CieLab {
    let (sin_h, cos_h) = c.h.to_radians().sin_cos();
    CieLab {
        l: c.l,
        a: c.c * cos_h,
        b: c.c * sin_h,
    }
}

pub fn lch_to_srgb(c: CieLch) -> Srgb {
    lab_to_srgb(lch_to_lab(c))
}

pub fn srgb_to_lch(c: Srgb) -> CieLch {
    lab_to_lch(srgb_to_lab(c))
}

// -- HSLuv --

const LUV_M: [[f64; 3]; 3] = [
    [3.240969941904521, -1.537383177570093, -0.498610760293],
    [-0.96924363628087, 1.87596750150772, 0.041555057407175],
    [0.055630079696993, -0.20397695888897, 1.056971514242878],
];
const REF_U: f64 = 0.19783000664283;
const REF_V: f64 = 0.46831999493879;
const KAPPA: f64 = 903.2962962;
const EPSILON: f64 = 0.0088564516;

/// A line `y = slope * x + intercept` in the (u, v) chroma plane.
#[derive(Debug, Clone, Copy)]
struct Line {
    slope: f64,
    intercept: f64,
}

/// The six lines bounding the sRGB gamut's slice at Luv lightness `l`.
fn gamut_bounds(l: f64) -> [Line; 6] {
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    std::array::from_fn(|i| {
        let [m1, m2, m3] = LUV_M[i / 2];
        let t = (i % 2) as f64;
        let top1 = (284_517.0 * m1 - 94_839.0 * m3) * sub2;
        let top2 = (838_422.0 * m3 + 769_860.0 * m2 + 731_718.0 * m1) * l * sub2
            - 769_860.0 * t * l;
        let bottom = (632_260.0 * m3 - 126_452.0 * m2) * sub2 + 126_452.0 * t;
        Line {
            slope: top1 / bottom,
            intercept: top2 / bottom,
        }
    })
}

fn max_chroma_for_lh(l: f64, h: f64) -> f64 {
    let (sin_h, cos_h) = h.to_radians().sin_cos();
    gamut_bounds(l)
        .iter()
        .map(|line| line.intercept / (sin_h - line.slope * cos_h))
        .filter(|len| *len >= 0.0)
        .fold(f64::INFINITY, f64::min)
}

fn max_safe_chroma_for_l(l: f64) -> f64 {
    gamut_bounds(l)
        .iter()
        .map(|line| line.intercept.abs() / (line.slope * line.slope + 1.0).sqrt())
        .fold(f64::INFINITY, f64::min)
}

fn l_to_y(l: f64) -> f64 {
    if l <= 8.0 {
        l / KAPPA
    } else {
        ((l + 16.0) / 116.0).powi(3)
    }
}

fn from_linear(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Luv LCh (l, c, h in degrees) to gamma-encoded sRGB.
fn luv_lch_to_srgb(l: f64, c: f64, h: f64) -> Srgb {
    if l == 0.0 {
        return Srgb::new(0.0, 0.0, 0.0);
    }
    let (sin_h, cos_h) = h.to_radians().sin_cos();
    let u = c * cos_h;
    let v = c * sin_h;

    let var_u = u / (13.0 * l) + REF_U;
    let var_v = v / (13.0 * l) + REF_V;
    let y = l_to_y(l);
    let x = -(9.0 * y * var_u) / ((var_u - 4.0) * var_v - var_u * var_v);
    let z = (9.0 * y - 15.0 * var_v * y - var_v * x) / (3.0 * var_v);

    let channel = |row: [f64; 3]| from_linear(row[0] * x + row[1] * y + row[2] * z);
    Srgb {
        r: channel(LUV_M[0]),
        g: channel(LUV_M[1]),
        b: channel(LUV_M[2]),
    }
}

fn hsl_family_to_srgb(h: f64, s: f64, l: f64, max_chroma: impl Fn(f64) -> f64) -> Srgb {
    if l > 99.999_999_9 {
        return Srgb::new(1.0, 1.0, 1.0);
    }
    if l < 1e-8 {
        return Srgb::new(0.0, 0.0, 0.0);
    }
    let c = max_chroma(l) / 100.0 * s;
    luv_lch_to_srgb(l, c, h)
}

/// HSLuv (h in degrees, s and l in [0, 100]) to sRGB. Not clamped.
pub fn hsluv_to_srgb(h: f64, s: f64, l: f64) -> Srgb {
    hsl_family_to_srgb(h, s, l, |l| max_chroma_for_lh(l, h))
}

/// HPLuv (h in degrees, s and l in [0, 100]) to sRGB. Not clamped.
///
/// Saturation is relative to the largest chroma every hue can reach at this
/// lightness, so s = 100 is usually a pastel.
pub fn hpluv_to_srgb(h: f64, s: f64, l: f64) -> Srgb {
    hsl_family_to_srgb(h, s, l, max_safe_chroma_for_l)
}
