//! A color value carrying alpha, constructed from and read back as Okhsv/Okhsl.
//!
//! The color is stored in Oklab. Alpha rides along untouched; none of the
//! conversion math reads it.

use crate::color::{oklab_to_srgb, srgb_to_oklab, OkLab, Srgb};
use crate::error::ColorError;
use crate::okhsl::{okhsl_to_oklab, oklab_to_okhsl, Okhsl};
use crate::okhsv::{okhsv_to_oklab, oklab_to_okhsv, Okhsv};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    lab: OkLab,
    alpha: f64,
}

/// Validates a `[x, y, z]` or `[x, y, z, alpha]` component slice.
fn split_components(components: &[f64], names: &str) -> Result<([f64; 3], f64), ColorError> {
    let (coords, alpha) = match components {
        [x, y, z] => ([*x, *y, *z], 1.0),
        [x, y, z, alpha] => ([*x, *y, *z], *alpha),
        _ => {
            return Err(ColorError::InvalidComponents(format!(
                "expected [{names}] or [{names}, alpha], got {} values",
                components.len()
            )))
        }
    };
    if let Some(bad) = components.iter().find(|v| !v.is_finite()) {
        return Err(ColorError::InvalidComponents(format!(
            "component {bad} is not a finite number"
        )));
    }
    Ok((coords, alpha))
}

impl Color {
    /// An opaque color at the given Oklab coordinates.
    pub fn from_oklab(lab: OkLab) -> Self {
        Self {
            lab,
            alpha: 1.0,
        }
    }

    pub fn from_srgb(c: Srgb) -> Self {
        Self::from_oklab(srgb_to_oklab(c))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        Srgb::from_hex(hex).map(Self::from_srgb)
    }

    /// Opaque color from Okhsv (hue in degrees, s and v in [0, 1]).
    pub fn from_okhsv(h: f64, s: f64, v: f64) -> Self {
        Self::from_oklab(okhsv_to_oklab(Okhsv::new(h, s, v)))
    }

    /// Opaque color from Okhsl (hue in degrees, s and l in [0, 1]).
    pub fn from_okhsl(h: f64, s: f64, l: f64) -> Self {
        Self::from_oklab(okhsl_to_oklab(Okhsl::new(h, s, l)))
    }

    /// Builds a color from `[h, s, v]` or `[h, s, v, alpha]`.
    ///
    /// Any other length, or a non-finite component, is
    /// [`ColorError::InvalidComponents`].
    pub fn try_from_okhsv(components: &[f64]) -> Result<Self, ColorError> {
        let ([h, s, v], alpha) = split_components(components, "h, s, v")?;
        Ok(Self::from_okhsv(h, s, v).with_alpha(alpha))
    }

    /// Builds a color from `[h, s, l]` or `[h, s, l, alpha]`.
    pub fn try_from_okhsl(components: &[f64]) -> Result<Self, ColorError> {
        let ([h, s, l], alpha) = split_components(components, "h, s, l")?;
        Ok(Self::from_okhsl(h, s, l).with_alpha(alpha))
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn oklab(&self) -> OkLab {
        self.lab
    }

    /// Gamma-encoded sRGB, clamped to the unit cube.
    pub fn srgb(&self) -> Srgb {
        oklab_to_srgb(self.oklab())
    }

    pub fn hex(&self) -> String {
        self.srgb().to_hex()
    }

    /// `[h, s, v, alpha]`.
    pub fn okhsv(&self) -> [f64; 4] {
        let hsv = oklab_to_okhsv(self.oklab());
        [hsv.h, hsv.s, hsv.v, self.alpha]
    }

    /// `[h, s, l, alpha]`.
    pub fn okhsl(&self) -> [f64; 4] {
        let hsl = oklab_to_okhsl(self.oklab());
        [hsl.h, hsl.s, hsl.l, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_carried_through_untouched() {
        let color = Color::try_from_okhsv(&[200.0, 0.5, 0.8, 0.3]).unwrap();
        assert_eq!(color.alpha(), 0.3);
        assert_eq!(color.okhsv()[3], 0.3);
        assert_eq!(color.okhsl()[3], 0.3);
        assert_eq!(color.oklab(), Color::from_okhsv(200.0, 0.5, 0.8).oklab());
    }

    #[test]
    fn three_components_default_to_opaque() {
        assert_eq!(Color::try_from_okhsl(&[10.0, 0.2, 0.5]).unwrap().alpha(), 1.0);
    }

    #[test]
    fn wrong_component_count_is_rejected() {
        for bad in [&[][..], &[1.0][..], &[1.0, 2.0][..], &[1.0, 2.0, 3.0, 4.0, 5.0][..]] {
            let err = Color::try_from_okhsv(bad).unwrap_err();
            assert!(matches!(err, ColorError::InvalidComponents(_)), "{err}");
            let err = Color::try_from_okhsl(bad).unwrap_err();
            assert!(matches!(err, ColorError::InvalidComponents(_)), "{err}");
        }
    }

    #[test]
    fn non_finite_component_is_rejected() {
        let err = Color::try_from_okhsv(&[f64::NAN, 0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ColorError::InvalidComponents(_)));
        let err = Color::try_from_okhsl(&[0.0, 0.5, 0.5, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, ColorError::InvalidComponents(_)));
    }

    #[test]
    fn okhsl_white_is_white_hex() {
        assert_eq!(Color::from_okhsl(42.0, 0.7, 1.0).hex(), "#ffffff");
        assert_eq!(Color::from_okhsl(42.0, 0.7, 0.0).hex(), "#000000");
    }

    #[test]
    fn hex_round_trips() {
        for hex in ["#ff0000", "#336699", "#000000", "#ffffff"] {
            assert_eq!(Color::from_hex(hex).unwrap().hex(), hex);
        }
    }

    #[test]
    fn okhsv_reads_back_from_constructor() {
        let [h, s, v, a] = Color::from_okhsv(150.0, 0.6, 0.7).okhsv();
        assert!((h - 150.0).abs() < 0.5, "h {h}");
        assert!((s - 0.6).abs() < 0.02, "s {s}");
        assert!((v - 0.7).abs() < 0.02, "v {v}");
        assert_eq!(a, 1.0);
    }

    #[test]
    fn gray_reads_back_achromatic() {
        let [h, s, _, _] = Color::from_hex("#808080").unwrap().okhsv();
        assert_eq!((h, s), (0.0, 0.0));
    }

    #[test]
    fn serializes_with_alpha() {
        let color = Color::from_okhsv(0.0, 0.0, 0.5).with_alpha(0.25);
        let json = serde_json::to_string(&color).unwrap();
        assert!(json.contains("\"alpha\":0.25"), "{json}");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
