#![deny(unsafe_code)]
//! Core color math for huekit.
//!
//! Provides the color types (`Srgb`, `OkLab`, `OkLch`, `Rgb8`), the sRGB gamut
//! search and cusp estimator in Oklab, the `Okhsv` and `Okhsl` codecs, the
//! named `ColorMode`s behind `coords_to_hex`, the alpha-carrying `Color`,
//! `Palette` scales, contrast helpers, k-means palette extraction, the color
//! locator, and the `Xorshift64` PRNG.

pub mod cie;
pub mod color;
pub mod error;
pub mod extract;
pub mod gamut;
pub mod hsx;
pub mod locate;
pub mod mode;
pub mod okhsl;
pub mod okhsv;
pub mod palette;
pub mod prng;
pub mod rgba;

pub use color::{contrast_ratio, readable_pairs, Cmyk, LinearRgb, OkLab, OkLch, Rgb8, Srgb};
pub use error::ColorError;
pub use extract::{
    extract_palette, ClusterSummary, ExtractRequest, ExtractResponse, FilterOptions, Swatch,
};
pub use gamut::{estimate_cusp, max_chroma_in_gamut, Cusp, CuspCache, CuspSource, DirectCusp};
pub use locate::{locate_colors, ColorLocations, ImageView, LocatorOptions, Position};
pub use mode::{coords_to_hex, ColorMode};
pub use okhsl::{okhsl_to_oklab, oklab_to_okhsl, Okhsl};
pub use okhsv::{okhsv_to_oklab, oklab_to_okhsv, Okhsv};
pub use palette::{InterpolationSpace, Palette};
pub use prng::Xorshift64;
pub use rgba::Color;
