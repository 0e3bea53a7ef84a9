//! Offline texture seam calibration
//!
//! Finds the column where an equirectangular texture wraps around and prints
//! the `texture_lon_offset_deg` that would move it to the image edge.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

use earthrise::assets::{SeamEstimate, Texture};
use earthrise::foundation::logging::{self, LevelFilter};

/// Fold an angle in degrees into (-180, 180]
fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Offset to configure when `current` is already applied to the texture
fn combine_offsets(current_deg: f64, suggested_deg: f64) -> f64 {
    wrap_degrees(current_deg + suggested_deg)
}

fn report(texture: &Texture, seam: &SeamEstimate) {
    println!("Texture: {}x{}", texture.width(), texture.height());
    println!(
        "Best seam column: {} (longitude {:.3} deg before offset)",
        seam.best_column,
        texture.column_longitude_deg(seam.best_column)
    );
    println!("Column score: {}", seam.score);
    println!("Suggested texture_lon_offset_deg: {:.3}", seam.suggested_offset_deg);
}

fn main() -> Result<()> {
    let matches = Command::new("seam_calibrator")
        .about("Estimates the longitude seam of an equirectangular Earth texture")
        .arg(
            Arg::new("texture")
                .value_name("TEXTURE")
                .help("Texture image to analyse")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("current")
                .long("current")
                .value_name("DEGREES")
                .help("Offset currently configured")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("0"),
        )
        .arg(
            Arg::new("apply")
                .long("apply")
                .help("Also print the suggested offset combined with --current")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    logging::init(LevelFilter::Warn);

    let path = matches
        .get_one::<PathBuf>("texture")
        .context("Texture path is required")?;
    let current = matches.get_one::<f64>("current").copied().unwrap_or(0.0);

    // Seam search runs on the raw image; the offset only affects sampling.
    let texture = Texture::load(path, 0.0).with_context(|| format!("Failed to load texture {}", path.display()))?;
    let seam = texture.estimate_seam_offset();
    log::debug!("Seam estimate: {:?}", seam);

    report(&texture, &seam);
    if matches.get_flag("apply") {
        println!(
            "Combined with current {:.3}: texture_lon_offset_deg = {:.3}",
            current,
            combine_offsets(current, seam.suggested_offset_deg)
        );
    }
    Ok(())
}
