#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot tile renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit `z <- z * z + c`, started at zero, stays
//! bounded.  This crate paints it as PNG images, either for an
//! arbitrary window on the plane or for a slippy-map tile, the way
//! web maps address their imagery: zoom level 0 is a single tile
//! covering `[-2, 2] x [-2, 2]`, and every level below splits each
//! tile into four.
//!
//! The pieces, leaf first:
//!
//! * `planes` turns tiles into windows, and pixels into points.
//! * `renderer` follows each pixel's orbit and colours it, sharing the
//!   rows out among a fixed pool of worker threads.
//! * `png` hands the finished pixels to the `image` codec.
//! * `server` puts the above behind HTTP.

pub mod colour;
pub mod config;
pub mod errors;
pub mod params;
pub mod planes;
pub mod png;
pub mod renderer;
pub mod server;

pub use crate::errors::{RenderError, ServeError};
pub use crate::planes::{pixel_to_sample, tile_to_rect, ComplexRect, PlaneMapper, TileAddress};
pub use crate::renderer::{render, PixelBuffer, Renderer, DEFAULT_ITERATIONS};
