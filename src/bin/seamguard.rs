// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use log::{error, info};
use seamguard::{
    calculate_energy, energy_to_image, load_pixel_buffer, protect_text_regions, CarveError,
    Orientation, ProtectionMask, SeamCarver, Settings, TextRegion,
};
use std::fs;
use std::path::Path;
use std::process;

fn parse_dimension(matches: &ArgMatches, name: &str, default: u32) -> Result<u32, String> {
    match matches.value_of(name) {
        None => Ok(default),
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| format!("--{} must be a positive integer, got '{}'", name, v)),
    }
}

fn load_regions(path: &Path) -> Result<Vec<TextRegion>, CarveError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

// Combine the painted mask and the OCR mask, if there are both.
fn union(a: Option<ProtectionMask>, b: Option<ProtectionMask>) -> Option<ProtectionMask> {
    match (a, b) {
        (Some(mut a), Some(b)) => {
            for y in 0..b.height() {
                for x in 0..b.width() {
                    if b.is_protected(x, y) {
                        a.protect(x, y);
                    }
                }
            }
            Some(a)
        }
        (a, b) => a.or(b),
    }
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let settings = match matches.value_of("config") {
        Some(path) => Settings::load(Path::new(path)).map_err(|e| e.to_string())?,
        None => Settings::default(),
    };

    let input = matches.value_of("input").unwrap_or_default();
    let image = load_pixel_buffer(Path::new(input)).map_err(|e| e.to_string())?;
    let (width, height) = image.dimensions();
    let target_width = parse_dimension(matches, "width", width)?;
    let target_height = parse_dimension(matches, "height", height)?;

    let painted = match matches.value_of("mask") {
        Some(path) => {
            let surface = load_pixel_buffer(Path::new(path)).map_err(|e| e.to_string())?;
            ProtectionMask::from_drawing_surface_for(&surface, width, height)
                .map_err(|e| e.to_string())?
        }
        None => None,
    };
    let detected = match matches.value_of("regions") {
        Some(path) => {
            let regions = load_regions(Path::new(path)).map_err(|e| e.to_string())?;
            protect_text_regions(width, height, &regions, &settings.regions)
        }
        None => None,
    };
    let mask = union(painted, detected);
    if let Some(m) = &mask {
        info!("protecting {} pixels", m.protected_count());
    }

    if let Some(path) = matches.value_of("energy-map") {
        let energy = calculate_energy(
            &image,
            Orientation::Vertical,
            mask.as_ref(),
            settings.carve.protection_energy,
        );
        energy_to_image(&energy)
            .save(path)
            .map_err(|e| CarveError::Encode(e).to_string())?;
    }

    let mut last = None;
    let report = |p: u8| {
        if last != Some(p) {
            info!("{}%", p);
            last = Some(p);
        }
    };
    let carved = SeamCarver::new(&image)
        .with_mask(mask.as_ref())
        .with_config(settings.carve)
        .carve(target_width, target_height, report)
        .map_err(|e| e.to_string())?;

    let output = matches.value_of("output").unwrap_or_default();
    carved
        .save(output)
        .map_err(|e| CarveError::Encode(e).to_string())?;
    info!("wrote {}x{} image to {}", target_width, target_height, output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("seamguard")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image resizing with protected regions")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(true)
                .help("Where to write the carved image"),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .help("Target width (defaults to the input's)"),
        )
        .arg(
            Arg::with_name("height")
                .short("H")
                .long("height")
                .takes_value(true)
                .help("Target height (defaults to the input's)"),
        )
        .arg(
            Arg::with_name("mask")
                .long("mask")
                .takes_value(true)
                .help("A drawing the size of the input; every non-transparent pixel is protected"),
        )
        .arg(
            Arg::with_name("regions")
                .long("regions")
                .takes_value(true)
                .help("JSON list of OCR text regions to protect"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .help("JSON settings file"),
        )
        .arg(
            Arg::with_name("energy-map")
                .long("energy-map")
                .takes_value(true)
                .help("Also write the vertical energy field as a greyscale image"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        process::exit(1);
    }
}
