//! Convert a height raster (GeoTIFF, band 1) into an STL point cloud or mesh.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dem_convert::{convert_file, raster_stats, ConvertOptions};
use terrain_types::{AxisBound, StlEncoding};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dem2stl")]
#[command(about = "Convert a height raster into an STL point cloud or surface", long_about = None)]
struct Cli {
    /// Input raster (TIFF / GeoTIFF)
    path: PathBuf,

    /// Output STL path (default: Output.stl next to the input)
    #[arg(short = 'o', long)]
    destination: Option<PathBuf>,

    /// Write two triangles per grid cell instead of one point per sample
    #[arg(short = 'f', long)]
    render_faces: bool,

    /// Write ASCII STL instead of binary
    #[arg(short = 't', long)]
    text: bool,

    /// Scale applied to x, y and z (default: 0.1)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Lower column bound: fraction in [0, 1), index >= 1, or -1 for unset
    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,

    /// Upper column bound, same forms as --x-min
    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,

    /// Lower row bound, same forms as --x-min
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    /// Upper row bound, same forms as --x-min
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Keep every Nth row and column (default: 1)
    #[arg(long)]
    stride: Option<usize>,

    /// Print raster size and elevation range as JSON and exit
    #[arg(long)]
    stats: bool,

    /// JSON options file; flags given here override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// More log output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Apply command-line flags on top of `options`.
    fn apply(&self, mut options: ConvertOptions) -> ConvertOptions {
        if let Some(destination) = &self.destination {
            options.destination = Some(destination.clone());
        }
        if self.render_faces {
            options.render_faces = true;
        }
        if self.text {
            options.encoding = StlEncoding::Ascii;
        }
        if let Some(scale) = self.scale {
            options.scale = scale;
        }
        if let Some(stride) = self.stride {
            options.stride = stride;
        }

        let bounds = [
            (self.x_min, &mut options.x.min),
            (self.x_max, &mut options.x.max),
            (self.y_min, &mut options.y.min),
            (self.y_max, &mut options.y.max),
        ];
        for (raw, bound) in bounds {
            if let Some(raw) = raw {
                *bound = AxisBound::from_raw(raw);
            }
        }
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(cli.log_level().into()))
        .with_writer(std::io::stderr)
        .init();

    if cli.stats {
        let stats = raster_stats(&cli.path)
            .with_context(|| format!("Failed to read {}", cli.path.display()))?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let base = match &cli.options {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    let options = cli.apply(base);

    let report = convert_file(&cli.path, &options)
        .with_context(|| format!("Failed to convert {}", cli.path.display()))?;
    if report.is_empty() {
        eprintln!(
            "warning: window {} with stride {} selects no samples; wrote an empty STL",
            report.window, report.stride
        );
    }
    println!(
        "{} ({} records)",
        report.destination.display(),
        report.triangles
    );
    Ok(())
}
