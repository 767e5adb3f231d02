//! The device-dependent sRGB cylinders: HSL, HSV and HCG.
//!
//! Hue is in degrees; every other component is in [0, 1]. These are
//! rearrangements of gamma-encoded sRGB and know nothing about perception.

use crate::color::{wrap_degrees, Srgb};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Hue/chroma/grayness: `c` is the distance from gray, `g` the gray level
/// the color would fall to at zero chroma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hcg {
    pub h: f64,
    pub c: f64,
    pub g: f64,
}

/// Splits a hue into its 60° sector and the position within it.
fn sector(h: f64) -> (u8, f64) {
    let scaled = wrap_degrees(h) / 60.0;
    let index = scaled.floor();
    ((index as u8).min(5), scaled - index)
}

/// Hue in degrees of an sRGB color with the given channel extremes.
fn rgb_hue(c: Srgb, max: f64, min: f64) -> f64 {
    let delta = max - min;
    if delta == 0.0 {
        return 0.0;
    }
    let h = if c.r == max {
        (c.g - c.b) / delta
    } else if c.g == max {
        2.0 + (c.b - c.r) / delta
    } else {
        4.0 + (c.r - c.g) / delta
    };
    wrap_degrees(h * 60.0)
}

pub fn hsl_to_srgb(c: Hsl) -> Srgb {
    if c.s == 0.0 {
        return Srgb::new(c.l, c.l, c.l);
    }
    let t2 = if c.l < 0.5 {
        c.l * (1.0 + c.s)
    } else {
        c.l + c.s - c.l * c.s
    };
    let t1 = 2.0 * c.l - t2;
    let h = wrap_degrees(c.h) / 360.0;

    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        if 6.0 * t < 1.0 {
            t1 + (t2 - t1) * 6.0 * t
        } else if 2.0 * t < 1.0 {
            t2
        } else if 3.0 * t < 2.0 {
            t1 + (t2 - t1) * (2.0 / 3.0 - t) * 6.0
        } else {
            t1
        }
    };
    Srgb {
        r: channel(h + 1.0 / 3.0),
        g: channel(h),
        b: channel(h - 1.0 / 3.0),
    }
}

pub fn srgb_to_hsl(c: Srgb) -> Hsl {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }
    let s = if l < 0.5 {
        (max - min) / (max + min)
    } else {
        (max - min) / (2.0 - max - min)
    };
    Hsl {
        h: rgb_hue(c, max, min),
        s,
        l,
    }
}

pub fn hsv_to_srgb(c: Hsv) -> Srgb {
    if c.s == 0.0 {
        return Srgb::new(c.v, c.v, c.v);
    }
    let (i, f) = sector(c.h);
    let p = c.v * (1.0 - c.s);
    let q = c.v * (1.0 - c.s * f);
    let t = c.v * (1.0 - c.s * (1.0 - f));
    let (r, g, b) = match i {
        0 => (c.v, t, p),
        1 => (q, c.v, p),
        2 => (p, c.v, t),
        3 => (p, q, c.v),
        4 => (t, p, c.v),
        _ => (c.v, p, q),
    };
    Srgb::new(r, g, b)
}

pub fn srgb_to_hsv(c: Srgb) -> Hsv {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let s = if max == 0.0 { 0.0 } else { (max - min) / max };
    Hsv {
        h: rgb_hue(c, max, min),
        s,
        v: max,
    }
}

pub fn hcg_to_srgb(c: Hcg) -> Srgb {
    if c.c == 0.0 {
        return Srgb::new(c.g, c.g, c.g);
    }
    let (i, f) = sector(c.h);
    let p = c.g * (1.0 - c.c);
    let q = p + c.c * (1.0 - f);
    let t = p + c.c * f;
    let v = p + c.c;
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Srgb::new(r, g, b)
}
