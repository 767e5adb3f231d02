//! Okhsl <-> Oklab.
//!
//! Lightness goes through the `toe` remap rather than being Oklab L directly.
//! Saturation is a piecewise rational blend between three anchor chromas for
//! the given lightness and hue:
//!
//! - `c_0`: a hue-independent shape used near the neutral axis,
//! - `c_mid`: a smoothed estimate of where the gamut slice bends, reached at s = 0.8,
//! - `c_max`: the actual gamut boundary, reached at s = 1.
//!
//! l = 0 and l = 1 return black and white directly; the blend is numerically
//! unstable at the ends.

use crate::color::{wrap_degrees, OkLab};
use crate::gamut::{max_chroma_in_gamut, CuspSource, DirectCusp, ACHROMATIC_THRESHOLD};
use serde::{Deserialize, Serialize};

const TOE_K1: f64 = 0.206;
const TOE_K2: f64 = 0.03;
const TOE_K3: f64 = (1.0 + TOE_K1) / (1.0 + TOE_K2);

/// Saturation at which the blend hands over from `c_0`/`c_mid` to `c_mid`/`c_max`.
const MID_SATURATION: f64 = 0.8;
const MID_SATURATION_INV: f64 = 1.0 / MID_SATURATION;

/// Guards against dividing by a vanishing anchor.
const SHAPE_EPSILON: f64 = 1e-7;

const WHITE_LIGHTNESS: f64 = 0.99999;
const BLACK_LIGHTNESS: f64 = 0.00001;

/// Hue in degrees, saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Okhsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Okhsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

/// The three chroma anchors for one lightness and hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaAnchors {
    pub c_0: f64,
    pub c_mid: f64,
    pub c_max: f64,
}

/// Maps Oklab L to the perceptual lightness used as Okhsl's `l`.
pub fn toe(x: f64) -> f64 {
    let base = TOE_K3 * x - TOE_K1;
    0.5 * (base + (base * base + 4.0 * TOE_K2 * TOE_K3 * x).sqrt())
}

/// Inverse of [`toe`].
pub fn toe_inv(x: f64) -> f64 {
    (x * x + TOE_K1 * x) / (TOE_K3 * (x + TOE_K2))
}

/// Polynomial fit of the cusp's (S, T) slopes over the unit hue vector.
fn st_mid(a_: f64, b_: f64) -> (f64, f64) {
    let s = 0.11516993
        + 1.0
            / (7.44778970
                + 4.15901240 * b_
                + a_ * (-2.19557347
                    + 1.75198401 * b_
                    + a_ * (-2.13704948
                        - 10.02301043 * b_
                        + a_ * (-4.24894561 + 5.38770819 * b_ + 4.69891013 * a_))));
    let t = 0.11239642
        + 1.0
            / (1.61320320 - 0.68124379 * b_
                + a_ * (0.40370612
                    + 0.90148123 * b_
                    + a_ * (-0.27087943
                        + 0.61223990 * b_
                        + a_ * (0.00299215 - 0.45399568 * b_ - 0.14661872 * a_))));
    (s, t)
}

/// Computes the anchor chromas at Oklab lightness `l` for the unit hue
/// vector `(a_, b_)` whose angle is `hue_rad`.
pub fn chroma_anchors<S: CuspSource + ?Sized>(
    cusps: &S,
    l: f64,
    a_: f64,
    b_: f64,
    hue_rad: f64,
) -> ChromaAnchors {
    let cusp = cusps.cusp(hue_rad);
    let c_max = max_chroma_in_gamut(hue_rad, l);

    let s_cusp = if cusp.l > SHAPE_EPSILON {
        cusp.c / cusp.l
    } else {
        0.0
    };
    let t_cusp = if 1.0 - cusp.l > SHAPE_EPSILON {
        cusp.c / (1.0 - cusp.l)
    } else {
        0.0
    };

    // Scale the smooth estimate by how far the real boundary sits from the
    // straight-edged triangle through the cusp.
    let triangle = (l * s_cusp).min((1.0 - l) * t_cusp);
    let k = if triangle > SHAPE_EPSILON {
        c_max / triangle
    } else {
        0.0
    };

    let (s_mid, t_mid) = st_mid(a_, b_);
    let c_a = l * s_mid;
    let c_b = (1.0 - l) * t_mid;
    let c_mid = if c_a < SHAPE_EPSILON || c_b < SHAPE_EPSILON {
        0.0
    } else {
        0.9 * k * (1.0 / (c_a.powi(-4) + c_b.powi(-4))).powf(0.25)
    };

    let c_a0 = l * 0.4;
    let c_b0 = (1.0 - l) * 0.8;
    let c_0 = if c_a0 < SHAPE_EPSILON || c_b0 < SHAPE_EPSILON {
        0.0
    } else {
        (1.0 / (1.0 / (c_a0 * c_a0) + 1.0 / (c_b0 * c_b0))).sqrt()
    };

    ChromaAnchors { c_0, c_mid, c_max }
}

/// Coefficients of the upper (s >= 0.8) branch.
fn upper_branch(anchors: &ChromaAnchors) -> (f64, f64) {
    let k1 = if anchors.c_0 > SHAPE_EPSILON {
        (1.0 - MID_SATURATION) * anchors.c_mid * anchors.c_mid * MID_SATURATION_INV
            * MID_SATURATION_INV
            / anchors.c_0
    } else {
        0.0
    };
    let delta = anchors.c_max - anchors.c_mid;
    let k2 = if delta.abs() > SHAPE_EPSILON {
        1.0 - k1 / delta
    } else {
        1.0
    };
    (k1, k2)
}

/// Coefficients of the lower (s < 0.8) branch.
fn lower_branch(anchors: &ChromaAnchors) -> (f64, f64) {
    let k1 = MID_SATURATION * anchors.c_0;
    let k2 = if anchors.c_mid > SHAPE_EPSILON {
        1.0 - k1 / anchors.c_mid
    } else {
        1.0
    };
    (k1, k2)
}

pub fn okhsl_to_oklab(c: Okhsl) -> OkLab {
    okhsl_to_oklab_with(&DirectCusp, c)
}

pub fn oklab_to_okhsl(c: OkLab) -> Okhsl {
    oklab_to_okhsl_with(&DirectCusp, c)
}

/// [`okhsl_to_oklab`] with a caller-supplied cusp source.
pub fn okhsl_to_oklab_with<S: CuspSource + ?Sized>(cusps: &S, c: Okhsl) -> OkLab {
    if c.l >= WHITE_LIGHTNESS {
        return OkLab { l: 1.0, a: 0.0, b: 0.0 };
    }
    if c.l <= BLACK_LIGHTNESS {
        return OkLab { l: 0.0, a: 0.0, b: 0.0 };
    }

    let l = toe_inv(c.l);
    let hue = (c.h % 360.0).to_radians();
    let (b_, a_) = hue.sin_cos();
    let anchors = chroma_anchors(cusps, l, a_, b_, hue);

    let chroma = if c.s < MID_SATURATION {
        let t = MID_SATURATION_INV * c.s;
        let (k1, k2) = lower_branch(&anchors);
        if k1 > SHAPE_EPSILON && 1.0 - k2 * t > SHAPE_EPSILON {
            t * k1 / (1.0 - k2 * t)
        } else {
            0.0
        }
    } else {
        let t = (c.s - MID_SATURATION) / (1.0 - MID_SATURATION);
        let (k1, k2) = upper_branch(&anchors);
        let k0 = anchors.c_mid;
        if k1 > SHAPE_EPSILON && 1.0 - k2 * t > SHAPE_EPSILON {
            k0 + t * k1 / (1.0 - k2 * t)
        } else {
            k0
        }
    }
    .max(0.0);

    OkLab {
        l,
        a: chroma * a_,
        b: chroma * b_,
    }
}

/// [`oklab_to_okhsl`] with a caller-supplied cusp source.
pub fn oklab_to_okhsl_with<S: CuspSource + ?Sized>(cusps: &S, c: OkLab) -> Okhsl {
    let l = toe(c.l);
    if l >= WHITE_LIGHTNESS {
        return Okhsl::new(0.0, 0.0, 1.0);
    }
    if l <= BLACK_LIGHTNESS {
        return Okhsl::new(0.0, 0.0, 0.0);
    }

    let chroma = (c.a * c.a + c.b * c.b).sqrt();
    if chroma < ACHROMATIC_THRESHOLD {
        return Okhsl::new(0.0, 0.0, l);
    }

    let hue = c.b.atan2(c.a);
    let (b_, a_) = hue.sin_cos();
    let anchors = chroma_anchors(cusps, c.l, a_, b_, hue);

    let s = if chroma < anchors.c_mid {
        let (k1, k2) = lower_branch(&anchors);
        let t = if k1 > SHAPE_EPSILON || k2 * chroma > SHAPE_EPSILON {
            chroma / (k1 + k2 * chroma)
        } else {
            0.0
        };
        t * MID_SATURATION
    } else {
        let (k1, k2) = upper_branch(&anchors);
        let excess = chroma - anchors.c_mid;
        let t = if k1 > SHAPE_EPSILON || k2 * excess > SHAPE_EPSILON {
            excess / (k1 + k2 * excess)
        } else {
            0.0
        };
        MID_SATURATION + (1.0 - MID_SATURATION) * t
    };

    Okhsl {
        h: wrap_degrees(hue.to_degrees()),
        s: s.clamp(0.0, 1.0),
        l,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamut::CuspCache;

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    fn chroma(lab: OkLab) -> f64 {
        (lab.a * lab.a + lab.b * lab.b).sqrt()
    }

    #[test]
    fn lightness_one_is_exactly_white() {
        for h in [0.0, 90.0, 271.5] {
            for s in [0.0, 0.5, 1.0] {
                assert_eq!(
                    okhsl_to_oklab(Okhsl::new(h, s, 1.0)),
                    OkLab { l: 1.0, a: 0.0, b: 0.0 }
                );
            }
        }
    }

    #[test]
    fn lightness_zero_is_exactly_black() {
        for h in [0.0, 90.0, 271.5] {
            for s in [0.0, 0.5, 1.0] {
                assert_eq!(
                    okhsl_to_oklab(Okhsl::new(h, s, 0.0)),
                    OkLab { l: 0.0, a: 0.0, b: 0.0 }
                );
            }
        }
    }

    #[test]
    fn toe_fixes_the_endpoints_and_inverts() {
        assert!(toe(0.0).abs() < 1e-12);
        assert!((toe(1.0) - 1.0).abs() < 1e-12);
        for x in [0.05, 0.2, 0.5, 0.77, 0.95] {
            assert!((toe(toe_inv(x)) - x).abs() < 1e-12, "x = {x}");
        }
    }

    #[test]
    fn toe_darkens_mid_tones() {
        // Oklab L of 0.5 reads as darker than half in Okhsl lightness.
        assert!(toe(0.5) < 0.5);
    }

    #[test]
    fn zero_saturation_stays_neutral() {
        let lab = okhsl_to_oklab(Okhsl::new(200.0, 0.0, 0.6));
        assert_eq!(chroma(lab), 0.0);
        assert!((lab.l - toe_inv(0.6)).abs() < 1e-12);
    }

    #[test]
    fn white_and_neutral_oklab_read_back() {
        assert_eq!(
            oklab_to_okhsl(OkLab { l: 1.0, a: 0.0, b: 0.0 }),
            Okhsl::new(0.0, 0.0, 1.0)
        );
        assert_eq!(
            oklab_to_okhsl(OkLab { l: 0.0, a: 0.0, b: 0.0 }),
            Okhsl::new(0.0, 0.0, 0.0)
        );
        let gray = oklab_to_okhsl(OkLab { l: 0.5, a: 0.0, b: 0.0 });
        assert_eq!((gray.h, gray.s), (0.0, 0.0));
        assert!((gray.l - toe(0.5)).abs() < 1e-12);
    }

    #[test]
    fn anchors_are_ordered_at_mid_lightness() {
        for hue_deg in [30.0_f64, 140.0, 250.0] {
            let hue = hue_deg.to_radians();
            let anchors = chroma_anchors(&DirectCusp, toe_inv(0.5), hue.cos(), hue.sin(), hue);
            assert!(anchors.c_0 > 0.0, "{hue_deg}: {anchors:?}");
            assert!(anchors.c_mid > 0.0, "{hue_deg}: {anchors:?}");
            assert!(anchors.c_mid < anchors.c_max, "{hue_deg}: {anchors:?}");
        }
    }

    #[test]
    fn full_saturation_reaches_gamut_boundary() {
        for hue_deg in [30.0_f64, 250.0] {
            let lab = okhsl_to_oklab(Okhsl::new(hue_deg, 1.0, 0.5));
            let boundary = max_chroma_in_gamut(hue_deg.to_radians(), lab.l);
            assert!(
                (chroma(lab) - boundary).abs() < 1e-9,
                "{hue_deg}: {} vs {boundary}",
                chroma(lab)
            );
        }
    }

    #[test]
    fn mid_saturation_reaches_c_mid() {
        let hue = 30.0_f64.to_radians();
        let l = toe_inv(0.5);
        let anchors = chroma_anchors(&DirectCusp, l, hue.cos(), hue.sin(), hue);
        let lab = okhsl_to_oklab(Okhsl::new(30.0, MID_SATURATION, 0.5));
        assert!((chroma(lab) - anchors.c_mid).abs() < 1e-12);
    }

    #[test]
    fn cached_and_direct_paths_agree() {
        let cache = CuspCache::default();
        for h in (0..360).step_by(45) {
            let hsl = Okhsl::new(h as f64, 0.9, 0.4);
            let direct = okhsl_to_oklab(hsl);
            assert_eq!(direct, okhsl_to_oklab_with(&cache, hsl));
            assert_eq!(direct, okhsl_to_oklab_with(&cache, hsl));
            assert_eq!(oklab_to_okhsl(direct), oklab_to_okhsl_with(&cache, direct));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip(
                h in 0.0_f64..360.0,
                s in 0.05_f64..=0.95,
                l in 0.1_f64..=0.9,
            ) {
                let back = oklab_to_okhsl(okhsl_to_oklab(Okhsl::new(h, s, l)));
                prop_assert!((back.l - l).abs() < 1e-9, "l: {} vs {}", back.l, l);
                prop_assert!((back.s - s).abs() < 1e-3, "s: {} vs {}", back.s, s);
                prop_assert!(hue_distance(back.h, h) < 1e-6, "h: {} vs {}", back.h, h);
            }

            #[test]
            fn saturation_never_decreases_chroma(
                h in 0.0_f64..360.0,
                s in 0.0_f64..=0.9,
                ds in 0.0_f64..=0.1,
                l in 0.05_f64..=0.95,
            ) {
                let lower = chroma(okhsl_to_oklab(Okhsl::new(h, s, l)));
                let upper = chroma(okhsl_to_oklab(Okhsl::new(h, s + ds, l)));
                prop_assert!(upper + 1e-12 >= lower, "{} < {}", upper, lower);
            }
        }
    }
}
