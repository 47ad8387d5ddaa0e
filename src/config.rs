//! Server configuration, read from the command line (and `PORT` from
//! the environment).

use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;
use std::str::FromStr;

use crate::params::validate_range;
use crate::renderer::DEFAULT_ITERATIONS;

const PORT: &str = "port";
const STATIC_DIR: &str = "static-dir";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const TILE_SIZE: &str = "tile-size";
const MAX_PIXELS: &str = "max-pixels";

/// Edge length of a tile, in pixels.
pub const DEFAULT_TILE_SIZE: usize = 256;

/// Largest viewport, in pixels, a single request may ask for.
pub const DEFAULT_MAX_PIXELS: usize = 4 * 1024 * 1024;

/// Everything the server needs to know at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// TCP port to listen on, on all interfaces.
    pub port: u16,
    /// Directory holding `index.html` and the other static assets.
    pub static_dir: PathBuf,
    /// Orbit length for every render.
    pub iterations: usize,
    /// Worker threads per render.
    pub threads: usize,
    /// Edge length of tiles.
    pub tile_size: usize,
    /// Cap on `width * height` for viewport requests.
    pub max_pixels: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 80,
            static_dir: PathBuf::from("static"),
            iterations: DEFAULT_ITERATIONS,
            threads: num_cpus::get(),
            tile_size: DEFAULT_TILE_SIZE,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// The command-line definition of the server.
pub fn server_app<'a, 'b>() -> App<'a, 'b> {
    App::new("mandeltiles")
        .version("0.1.0")
        .about("Mandelbrot slippy-map tile server")
        .arg(
            Arg::with_name(PORT)
                .required(false)
                .long(PORT)
                .short("p")
                .env("PORT")
                .takes_value(true)
                .default_value("80")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        u16::max_value(),
                        "Could not parse port",
                        "Port must be between 1 and 65535",
                    )
                })
                .help("Port to listen on"),
        )
        .arg(
            Arg::with_name(STATIC_DIR)
                .required(false)
                .long(STATIC_DIR)
                .short("d")
                .takes_value(true)
                .default_value("static")
                .help("Directory of static assets"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("35")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000",
                    )
                })
                .help("Number of iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1024,
                        "Could not parse thread count",
                        "Thread count must be between 1 and 1024",
                    )
                })
                .help("Number of worker threads per render (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(TILE_SIZE)
                .required(false)
                .long(TILE_SIZE)
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        4096,
                        "Could not parse tile size",
                        "Tile size must be between 1 and 4096",
                    )
                })
                .help("Edge length of tiles in pixels"),
        )
        .arg(
            Arg::with_name(MAX_PIXELS)
                .required(false)
                .long(MAX_PIXELS)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse pixel limit",
                        "Pixel limit must be positive",
                    )
                })
                .help("Largest viewport a request may ask for, in pixels"),
        )
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(s) => T::from_str(s)
            .map(Some)
            .map_err(|_| format!("Could not parse {}", name)),
    }
}

impl ServerConfig {
    /// Build a configuration from parsed arguments, falling back to
    /// the defaults for anything not given.
    pub fn from_matches(matches: &ArgMatches) -> Result<ServerConfig, String> {
        let defaults = ServerConfig::default();
        Ok(ServerConfig {
            port: value(matches, PORT)?.unwrap_or(defaults.port),
            static_dir: matches
                .value_of(STATIC_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            iterations: value(matches, ITERATIONS)?.unwrap_or(defaults.iterations),
            threads: value(matches, THREADS)?.unwrap_or(defaults.threads),
            tile_size: value(matches, TILE_SIZE)?.unwrap_or(defaults.tile_size),
            max_pixels: value(matches, MAX_PIXELS)?.unwrap_or(defaults.max_pixels),
        })
    }

    /// Parse the process's own command line.
    pub fn from_args() -> Result<ServerConfig, String> {
        ServerConfig::from_matches(&server_app().get_matches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ServerConfig, String> {
        let matches = server_app()
            .get_matches_from_safe(args)
            .map_err(|e| e.message)?;
        ServerConfig::from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let config = parse(&["mandeltiles"]).unwrap();
        assert_eq!(config.iterations, 35);
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.max_pixels, DEFAULT_MAX_PIXELS);
        assert!(config.threads >= 1);
    }

    #[test]
    fn overrides() {
        let config = parse(&[
            "mandeltiles",
            "--port",
            "8080",
            "--iterations",
            "100",
            "--threads",
            "3",
            "--tile-size",
            "512",
            "--static-dir",
            "/srv/www",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.iterations, 100);
        assert_eq!(config.threads, 3);
        assert_eq!(config.tile_size, 512);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse(&["mandeltiles", "--iterations", "0"]).is_err());
        assert!(parse(&["mandeltiles", "--threads", "many"]).is_err());
        assert!(parse(&["mandeltiles", "--port", "70000"]).is_err());
    }
}
