#![deny(unsafe_code)]
//! CLI binary for huekit.
//!
//! Subcommands:
//! - `hex <mode> <angle> <val1> <val2>`: cylindrical coordinates to hex
//! - `modes`: list color modes and interpolation spaces
//! - `inspect <hex>`: show a color in every supported space
//! - `scale <hex>...`: interpolate a palette scale
//! - `extract <image>`: k-means palette of an image
//! - `extract-json [file]`: run an extraction request given as JSON
//! - `locate <image> <hex>...`: find where colors occur in an image

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use huekit_core::extract::{sort_by_lightness, Swatch};
use huekit_core::{
    coords_to_hex, locate_colors, oklab_to_okhsl, oklab_to_okhsv, ColorMode, ExtractRequest,
    ExtractResponse, FilterOptions, InterpolationSpace, LocatorOptions, Palette, Rgb8, Srgb,
};
use huekit_extract::{load_image, request_for_image, ExtractionWorker};
use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "huekit", about = "Perceptual color conversion and palette extraction")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    /// Largest cluster first.
    Population,
    /// Darkest first (CIE L*).
    Lightness,
}

#[derive(Subcommand)]
enum Command {
    /// Convert cylindrical coordinates in a named mode to a hex color.
    #[command(allow_negative_numbers = true)]
    Hex {
        /// Color mode (see `huekit modes`).
        mode: String,
        /// Hue angle in degrees.
        angle: f64,
        /// First value, usually saturation or chroma.
        val1: f64,
        /// Second value, usually lightness or value.
        val2: f64,
    },
    /// List color modes and palette interpolation spaces.
    Modes,
    /// Show a hex color in Oklab, Okhsv, Okhsl and CMYK.
    Inspect {
        /// Color as "#rrggbb".
        hex: String,
    },
    /// Interpolate evenly spaced colors between stops.
    Scale {
        /// Stop colors as "#rrggbb".
        #[arg(required = true)]
        colors: Vec<String>,

        /// Number of output colors.
        #[arg(short, long, default_value_t = 5)]
        amount: usize,

        /// Interpolation space (rgb, lrgb, lab, oklab, oklch, hcl, hsl, hsv).
        #[arg(short, long, default_value = "rgb")]
        space: String,

        /// Fraction trimmed from each end of the scale.
        #[arg(short, long, default_value_t = 0.0)]
        padding: f64,
    },
    /// Extract a palette from an image file.
    Extract {
        /// PNG or JPEG file.
        image: PathBuf,

        /// Number of clusters.
        #[arg(short, long, default_value_t = 5)]
        k: usize,

        /// Drop pixels whose HSL saturation is not above this fraction.
        #[arg(long, default_value_t = 0.0)]
        min_saturation: f64,

        /// Drop pixels whose HSL lightness is not above this fraction.
        #[arg(long, default_value_t = 0.0)]
        min_lightness: f64,

        /// PRNG seed for centroid selection.
        #[arg(long)]
        seed: Option<u64>,

        /// Output order.
        #[arg(long, value_enum, default_value_t = SortOrder::Population)]
        sort: SortOrder,
    },
    /// Run an extraction request read as JSON from a file or stdin.
    ExtractJson {
        /// Request file; stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Find where colors occur in an image, searching out from the center.
    Locate {
        /// PNG or JPEG file.
        image: PathBuf,

        /// Colors as "#rrggbb".
        #[arg(required = true)]
        colors: Vec<String>,

        /// Positions reported per color.
        #[arg(long, default_value_t = 30)]
        max_positions: usize,
    },
}

fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn read_request(file: Option<&Path>) -> Result<ExtractRequest, CliError> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    serde_json::from_str(&text).map_err(|e| CliError::Input(format!("invalid request JSON: {e}")))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn lightness_order(response: ExtractResponse) -> Result<ExtractResponse, CliError> {
    let mut swatches = response
        .clusters
        .iter()
        .map(|c| {
            Ok(Swatch {
                color: Rgb8::from_hex(&c.color)?,
                percentage: c.percentage,
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    sort_by_lightness(&mut swatches);
    Ok(ExtractResponse::from(swatches))
}

fn print_clusters(response: &ExtractResponse, json: bool) -> Result<(), CliError> {
    if json {
        print_json(response)
    } else {
        for cluster in &response.clusters {
            println!("{}  {:6.2}%", cluster.color, cluster.percentage);
        }
        Ok(())
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Hex {
            mode,
            angle,
            val1,
            val2,
        } => {
            let hex = coords_to_hex(angle, val1, val2, &mode)?;
            if cli.json {
                print_json(&serde_json::json!({ "mode": mode, "hex": hex }))?;
            } else {
                println!("{hex}");
            }
        }
        Command::Modes => {
            let modes: Vec<&str> = ColorMode::ALL.iter().map(|m| m.as_str()).collect();
            let spaces: Vec<&str> = InterpolationSpace::ALL.iter().map(|s| s.as_str()).collect();
            if cli.json {
                print_json(&serde_json::json!({ "modes": modes, "spaces": spaces }))?;
            } else {
                println!("Modes:");
                for name in &modes {
                    println!("  {name}");
                }
                println!("Interpolation spaces:");
                println!("  {}", spaces.join(", "));
            }
        }
        Command::Inspect { hex } => {
            let color = Srgb::from_hex(&hex)?;
            let lab = huekit_core::color::srgb_to_oklab(color);
            let okhsv = oklab_to_okhsv(lab);
            let okhsl = oklab_to_okhsl(lab);
            let cmyk = color.to_cmyk();
            let luminance = color.relative_luminance();
            if cli.json {
                print_json(&serde_json::json!({
                    "hex": color,
                    "oklab": lab,
                    "okhsv": okhsv,
                    "okhsl": okhsl,
                    "cmyk": cmyk,
                    "luminance": luminance,
                }))?;
            } else {
                println!("hex        {}", color.to_hex());
                println!("oklab      L {:.4}  a {:.4}  b {:.4}", lab.l, lab.a, lab.b);
                println!(
                    "okhsv      h {:.2}  s {:.4}  v {:.4}",
                    okhsv.h, okhsv.s, okhsv.v
                );
                println!(
                    "okhsl      h {:.2}  s {:.4}  l {:.4}",
                    okhsl.h, okhsl.s, okhsl.l
                );
                println!(
                    "cmyk       c {:.3}  m {:.3}  y {:.3}  k {:.3}",
                    cmyk.c, cmyk.m, cmyk.y, cmyk.k
                );
                println!("luminance  {luminance:.4}");
            }
        }
        Command::Scale {
            colors,
            amount,
            space,
            padding,
        } => {
            let space: InterpolationSpace = space
                .parse()
                .map_err(|e: huekit_core::ColorError| CliError::Input(e.to_string()))?;
            if !(0.0..0.5).contains(&padding) {
                return Err(CliError::Input(format!(
                    "--padding must be in [0, 0.5), got {padding}"
                )));
            }
            let palette = Palette::from_hex(&colors)?
                .with_space(space)
                .with_padding(padding);
            let hexes = palette.hex_colors(amount);
            if cli.json {
                print_json(&serde_json::json!({
                    "space": space.as_str(),
                    "padding": padding,
                    "colors": hexes,
                }))?;
            } else {
                for hex in &hexes {
                    println!("{hex}");
                }
            }
        }
        Command::Extract {
            image,
            k,
            min_saturation,
            min_lightness,
            seed,
            sort,
        } => {
            let loaded = load_image(&image)?;
            tracing::debug!(
                width = loaded.width,
                height = loaded.height,
                "downscaled image"
            );
            let filter = FilterOptions {
                saturation: min_saturation,
                lightness: min_lightness,
            };
            let request = request_for_image(&loaded.view()?, k, filter, seed);
            let worker = ExtractionWorker::new();
            let mut response = block_on(worker.extract(request))??;
            if let SortOrder::Lightness = sort {
                response = lightness_order(response)?;
            }
            print_clusters(&response, cli.json)?;
        }
        Command::ExtractJson { file } => {
            let request = read_request(file.as_deref())?;
            let worker = ExtractionWorker::new();
            let response = block_on(worker.extract(request))??;
            print_json(&response)?;
        }
        Command::Locate {
            image,
            colors,
            max_positions,
        } => {
            let targets = colors
                .iter()
                .map(|hex| Rgb8::from_hex(hex))
                .collect::<Result<Vec<_>, _>>()?;
            let loaded = load_image(&image)?;
            let options = LocatorOptions {
                max_positions_per_color: max_positions,
                ..LocatorOptions::default()
            };
            let found = locate_colors(&loaded.view()?, &targets, &options)?;
            if cli.json {
                print_json(&found)?;
            } else {
                for locations in &found {
                    let shown: Vec<String> = locations
                        .positions
                        .iter()
                        .map(|p| format!("({:.3}, {:.3})", p.x, p.y))
                        .collect();
                    let note = if locations.positions.iter().any(|p| p.is_default) {
                        "  not found"
                    } else {
                        ""
                    };
                    println!("{}{note}  {}", locations.color.to_hex(), shown.join(" "));
                }
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huekit=warn,huekit_core=warn,huekit_extract=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
