use clap::{App, Arg, ArgMatches};
use env_logger::Env;
use log::info;
use num::Complex;
use std::str::FromStr;

use mandeltiles::params::{parse_pair, parse_tile_path, validate_pair, validate_range};
use mandeltiles::png::write_image;
use mandeltiles::{ComplexRect, Renderer};

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const TILE: &str = "tile";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .about("Render a window or tile of the Mandelbrot set to a PNG file")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .default_value("-2.5,-1.5")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .default_value("1.5,1.5")
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(TILE)
                .required(false)
                .long(TILE)
                .takes_value(true)
                .validator(|s| {
                    parse_tile_path(&s)
                        .map(|_| ())
                        .map_err(|e| e.message().to_string())
                })
                .help("Render the slippy-map tile z/x/y instead of a window; the image is square"),
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
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("35")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Number of iterations per point"),
        )
        .get_matches()
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let matches = args();
    let image_size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let threads = match matches.value_of(THREADS) {
        Some(threads) => usize::from_str(threads).expect("Could not parse thread count."),
        None => num_cpus::get(),
    };
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");

    let renderer = match matches.value_of(TILE) {
        Some(tile) => {
            let tile = parse_tile_path(tile).expect("Error parsing tile");
            let size = image_size.0.max(image_size.1);
            Renderer::for_tile(tile, size, iterations)
        }
        None => {
            let leftlower = parse_complex(matches.value_of(LEFTLOWER).unwrap())
                .expect("Error parsing left lower point");
            let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap())
                .expect("Error parsing right upper point");
            let rect = ComplexRect::new(leftlower.re, leftlower.im, rightupper.re, rightupper.im);
            Renderer::new(image_size.0, image_size.1, rect, iterations)
        }
    };

    let result = renderer
        .and_then(|renderer| renderer.render(threads))
        .and_then(|buffer| {
            let outfile = matches.value_of(OUTPUT).unwrap();
            write_image(outfile, &buffer)?;
            info!("Wrote {}x{} to {}", buffer.width(), buffer.height(), outfile);
            Ok(())
        });

    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
