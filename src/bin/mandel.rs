extern crate clap;
extern crate env_logger;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::png::PNGEncoder;
use image::ColorType;
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use mandelbrot::{
    render, Color, ColorPalette, GradientStop, Grid, LinearPalette, MultiColorGradient,
    PixelBuffer,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

/// Accepts `rrggbb` or `rrggbbaa` hex, with or without a leading `#`.
fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(channel(0)?, channel(1)?, channel(2)?)),
        8 => Some(Color::rgba(channel(0)?, channel(1)?, channel(2)?, channel(3)?)),
        _ => None,
    }
}

/// Accepts `percent,color` with the percent inside [0, 1].
fn parse_stop(s: &str) -> Option<GradientStop> {
    let index = s.find(',')?;
    let percent = f64::from_str(&s[..index]).ok()?;
    let color = parse_color(&s[index + 1..])?;
    if percent >= 0.0 && percent <= 1.0 {
        Some(GradientStop::new(percent, color))
    } else {
        None
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_color(s: &str, err: &str) -> Result<(), String> {
    match parse_color(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_stop(s: &str, err: &str) -> Result<(), String> {
    match parse_stop(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_pitch(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(p) if p > 0.0 && p.is_finite() => Ok(()),
        Ok(_) => Err("Pixel pitch must be a positive number".to_string()),
        Err(_) => Err("Could not parse pixel pitch".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const PITCH: &str = "pitch";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const PALETTE: &str = "palette";
const LOW_COLOR: &str = "low-color";
const HIGH_COLOR: &str = "high-color";
const MIN_COLOR: &str = "min-color";
const MAX_COLOR: &str = "max-color";
const IN_SET_COLOR: &str = "in-set-color";
const STOP: &str = "stop";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1000x750")
                .validator(|s| {
                    validate_pair::<usize>(&s, 'x', "Could not parse output image size")
                })
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(PITCH)
                .required(false)
                .long(PITCH)
                .short("p")
                .takes_value(true)
                .default_value("0.003")
                .validator(|s| validate_pitch(&s))
                .help("Complex-plane distance between adjacent samples"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("10000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        250,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 250 and 200000",
                    )
                })
                .help("Iteration budget for each sample"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .takes_value(true)
                .possible_values(&["linear", "gradient"])
                .default_value("linear")
                .help("Coloring strategy for escaped samples"),
        )
        .arg(
            Arg::with_name(LOW_COLOR)
                .required(false)
                .long(LOW_COLOR)
                .takes_value(true)
                .default_value("00ff00")
                .validator(|s| validate_color(&s, "Could not parse low color"))
                .help("Low end of the linear ramp"),
        )
        .arg(
            Arg::with_name(HIGH_COLOR)
                .required(false)
                .long(HIGH_COLOR)
                .takes_value(true)
                .default_value("ff0000")
                .validator(|s| validate_color(&s, "Could not parse high color"))
                .help("High end of the linear ramp"),
        )
        .arg(
            Arg::with_name(MIN_COLOR)
                .required(false)
                .long(MIN_COLOR)
                .takes_value(true)
                .default_value("ff0000")
                .validator(|s| validate_color(&s, "Could not parse minimum gradient color"))
                .help("Color bound below the gradient's stops"),
        )
        .arg(
            Arg::with_name(MAX_COLOR)
                .required(false)
                .long(MAX_COLOR)
                .takes_value(true)
                .default_value("0000ff")
                .validator(|s| validate_color(&s, "Could not parse maximum gradient color"))
                .help("Color bound above the gradient's stops"),
        )
        .arg(
            Arg::with_name(STOP)
                .required(false)
                .long(STOP)
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| {
                    validate_stop(&s, "Could not parse gradient stop; expected percent,color")
                })
                .help("Extra gradient stop as percent,color (repeatable)"),
        )
        .arg(
            Arg::with_name(IN_SET_COLOR)
                .required(false)
                .long(IN_SET_COLOR)
                .takes_value(true)
                .default_value("000000")
                .validator(|s| validate_color(&s, "Could not parse in-set color"))
                .help("Color for samples inside the set"),
        )
        .get_matches()
}

fn palette_for(matches: &ArgMatches, grid: &Grid) -> Box<dyn ColorPalette> {
    let color_arg =
        |name: &str| parse_color(matches.value_of(name).unwrap()).expect("Error parsing color");
    let in_set = color_arg(IN_SET_COLOR);

    match matches.value_of(PALETTE).unwrap() {
        "gradient" => {
            let stops: Vec<GradientStop> = matches
                .values_of(STOP)
                .map(|values| {
                    values
                        .map(|s| parse_stop(s).expect("Error parsing gradient stop"))
                        .collect()
                })
                .unwrap_or_else(Vec::new);
            Box::new(MultiColorGradient::new(
                grid,
                stops,
                color_arg(MIN_COLOR),
                color_arg(MAX_COLOR),
                in_set,
            ))
        }
        _ => Box::new(LinearPalette::new(
            grid,
            color_arg(LOW_COLOR),
            color_arg(HIGH_COLOR),
            in_set,
        )),
    }
}

fn write_image(outfile: &str, buffer: &PixelBuffer) -> Result<(), std::io::Error> {
    let output = File::create(Path::new(outfile))?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(
        buffer.as_bytes(),
        buffer.width() as u32,
        buffer.height() as u32,
        ColorType::RGBA(8),
    )?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    let (width, height) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing view center");
    let pitch = f64::from_str(matches.value_of(PITCH).unwrap()).expect("Error parsing pixel pitch");
    let limit = u32::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Error parsing iteration count");

    let mut grid = match Grid::with_limit(center, width, height, pitch, limit) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("mandel: {}", e);
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    match matches.value_of(THREADS) {
        Some(threads) => {
            let threads = usize::from_str(threads).expect("Error parsing thread count");
            grid.iterate_all_with_threads(threads);
        }
        None => grid.iterate_all(),
    }
    info!(
        "iterated {} samples in {:?}",
        grid.points().len(),
        started.elapsed()
    );

    let palette = palette_for(&matches, &grid);
    let started = Instant::now();
    let buffer = render(&grid, palette.as_ref());
    info!(
        "rendered {}x{} pixels in {:?}",
        buffer.width(),
        buffer.height(),
        started.elapsed()
    );

    let outfile = matches.value_of(OUTPUT).unwrap();
    if let Err(e) = write_image(outfile, &buffer) {
        eprintln!("mandel: {}", e);
        std::process::exit(1);
    }
    println!(
        "wrote {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        outfile
    );
}
