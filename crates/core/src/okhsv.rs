//! Okhsv <-> Oklab.
//!
//! Value scales lightness from black up to the hue's cusp, and saturation
//! scales chroma from the neutral axis out to the gamut boundary at that
//! lightness. Because the cusp comes from a 50-step sweep, a round trip is
//! only exact to the sweep's resolution.

use crate::color::{wrap_degrees, OkLab};
use crate::gamut::{max_chroma_in_gamut, CuspSource, DirectCusp, ACHROMATIC_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Hue in degrees, saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Okhsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Okhsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }
}

pub fn okhsv_to_oklab(c: Okhsv) -> OkLab {
    okhsv_to_oklab_with(&DirectCusp, c)
}

pub fn oklab_to_okhsv(c: OkLab) -> Okhsv {
    oklab_to_okhsv_with(&DirectCusp, c)
}

/// [`okhsv_to_oklab`] with a caller-supplied cusp source.
pub fn okhsv_to_oklab_with<S: CuspSource + ?Sized>(cusps: &S, c: Okhsv) -> OkLab {
    if c.s < ACHROMATIC_THRESHOLD {
        return OkLab {
            l: c.v.clamp(0.0, 1.0),
            a: 0.0,
            b: 0.0,
        };
    }

    let hue = (c.h % 360.0).to_radians();
    let cusp = cusps.cusp(hue);
    let l = (c.v * cusp.l).clamp(0.0, 1.0);
    let chroma = c.s * max_chroma_in_gamut(hue, l);
    OkLab {
        l,
        a: chroma * hue.cos(),
        b: chroma * hue.sin(),
    }
}

/// [`oklab_to_okhsv`] with a caller-supplied cusp source.
pub fn oklab_to_okhsv_with<S: CuspSource + ?Sized>(cusps: &S, c: OkLab) -> Okhsv {
    let chroma = (c.a * c.a + c.b * c.b).sqrt();
    if chroma < ACHROMATIC_THRESHOLD {
        // Hue carries no information on the neutral axis.
        return Okhsv {
            h: 0.0,
            s: 0.0,
            v: c.l.clamp(0.0, 1.0),
        };
    }

    let hue = c.b.atan2(c.a);
    let l = c.l.clamp(0.0, 1.0);
    let cusp = cusps.cusp(hue);

    let v = if cusp.l < ACHROMATIC_THRESHOLD {
        if l > ACHROMATIC_THRESHOLD {
            1.0
        } else {
            0.0
        }
    } else {
        l / cusp.l
    };

    let c_max = max_chroma_in_gamut(hue, l);
    let s = if c_max < ACHROMATIC_THRESHOLD {
        0.0
    } else {
        chroma / c_max
    };

    Okhsv {
        h: wrap_degrees(hue.to_degrees()),
        s: s.clamp(0.0, 1.0),
        v: v.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamut::{estimate_cusp, CuspCache};

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn black_maps_to_origin() {
        let lab = okhsv_to_oklab(Okhsv::new(0.0, 0.0, 0.0));
        assert_eq!(lab, OkLab { l: 0.0, a: 0.0, b: 0.0 });
    }

    #[test]
    fn zero_saturation_is_gray_for_any_hue() {
        for h in [0.0, 45.0, 180.0, 359.0] {
            for v in [0.0, 0.25, 0.5, 1.0] {
                let lab = okhsv_to_oklab(Okhsv::new(h, 0.0, v));
                assert_eq!(lab, OkLab { l: v, a: 0.0, b: 0.0 }, "h {h}, v {v}");
            }
        }
    }

    #[test]
    fn zero_saturation_clamps_value() {
        assert_eq!(okhsv_to_oklab(Okhsv::new(10.0, 0.0, 1.7)).l, 1.0);
        assert_eq!(okhsv_to_oklab(Okhsv::new(10.0, 0.0, -0.2)).l, 0.0);
    }

    #[test]
    fn neutral_oklab_maps_to_zero_hue_and_saturation() {
        for l in [0.0, 0.3, 0.8, 1.0] {
            let hsv = oklab_to_okhsv(OkLab { l, a: 0.0, b: 0.0 });
            assert_eq!(hsv, Okhsv::new(0.0, 0.0, l));
        }
    }

    #[test]
    fn full_saturation_and_value_sits_at_the_cusp() {
        let lab = okhsv_to_oklab(Okhsv::new(0.0, 1.0, 1.0));
        let cusp = estimate_cusp(0.0);
        assert!((lab.l - cusp.l).abs() < 1e-12, "L {} vs cusp {}", lab.l, cusp.l);
        let chroma = (lab.a * lab.a + lab.b * lab.b).sqrt();
        assert!((chroma - cusp.c).abs() < 1e-12);
        assert!(lab.a > 0.0, "hue 0 points along +a");
    }

    #[test]
    fn oversaturated_input_reads_back_clamped() {
        let lab = okhsv_to_oklab(Okhsv::new(120.0, 1.5, 0.8));
        let hsv = oklab_to_okhsv(lab);
        assert_eq!(hsv.s, 1.0);
    }

    #[test]
    fn negative_hue_wraps() {
        let hsv = oklab_to_okhsv(okhsv_to_oklab(Okhsv::new(-90.0, 0.7, 0.7)));
        assert!(hue_distance(hsv.h, 270.0) < 1e-6, "hue {}", hsv.h);
    }

    #[test]
    fn cached_and_direct_paths_agree() {
        let cache = CuspCache::default();
        for h in (0..360).step_by(20) {
            let hsv = Okhsv::new(h as f64, 0.6, 0.9);
            let direct = okhsv_to_oklab(hsv);
            let cold = okhsv_to_oklab_with(&cache, hsv);
            let warm = okhsv_to_oklab_with(&cache, hsv);
            assert_eq!(direct, cold);
            assert_eq!(direct, warm);
            assert_eq!(oklab_to_okhsv(direct), oklab_to_okhsv_with(&cache, direct));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip_within_cusp_resolution(
                h in 0.0_f64..360.0,
                s in 0.01_f64..=1.0,
                v in 0.1_f64..=1.0,
            ) {
                let back = oklab_to_okhsv(okhsv_to_oklab(Okhsv::new(h, s, v)));
                prop_assert!((back.s - s).abs() < 0.02, "s: {} vs {}", back.s, s);
                prop_assert!((back.v - v).abs() < 0.02, "v: {} vs {}", back.v, v);
                prop_assert!(hue_distance(back.h, h) < 0.5, "h: {} vs {}", back.h, h);
            }

            #[test]
            fn lightness_never_decreases_with_value(
                h in 0.0_f64..360.0,
                s in 0.0_f64..=1.0,
                v in 0.0_f64..=1.0,
                dv in 0.0_f64..=0.5,
            ) {
                let lower = okhsv_to_oklab(Okhsv::new(h, s, v));
                let upper = okhsv_to_oklab(Okhsv::new(h, s, v + dv));
                prop_assert!(upper.l >= lower.l, "{} < {}", upper.l, lower.l);
            }

            #[test]
            fn output_is_always_in_range(
                l in 0.0_f64..=1.0,
                a in -0.4_f64..=0.4,
                b in -0.4_f64..=0.4,
            ) {
                let hsv = oklab_to_okhsv(OkLab { l, a, b });
                prop_assert!((0.0..360.0).contains(&hsv.h));
                prop_assert!((0.0..=1.0).contains(&hsv.s));
                prop_assert!((0.0..=1.0).contains(&hsv.v));
            }
        }
    }
}
