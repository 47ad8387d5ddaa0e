// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! Every pixel is mapped to a point `c` on the complex plane, and the
//! orbit `z <- z * z + c` is followed from zero for a fixed number of
//! steps.  There is no early bail-out: the orbit always runs the full
//! budget, and is only judged at the end.  An orbit whose final
//! magnitude is above 2, or has overflowed to infinity or NaN, has
//! escaped and is painted with the background.  Everything else is
//! painted on a hue gradient by how far its final magnitude is from
//! zero.
//!
//! Rows are shared out between a fixed number of worker threads.
//! Each worker takes the next unclaimed row from a common queue,
//! renders it into its own slice of the buffer, and comes back for
//! more until the queue runs dry.

use image::RgbaImage;
use log::debug;
use num::Complex;
use std::slice::ChunksMut;
use std::sync::Mutex;

use crate::colour::{hsl_to_rgba, Rgba, BACKGROUND, LIGHTNESS, SATURATION};
use crate::errors::RenderError;
use crate::planes::{ComplexRect, Pixel, PlaneMapper, TileAddress};

/// Iteration budget the palette was tuned against.
pub const DEFAULT_ITERATIONS: usize = 35;

/// Bytes per RGBA pixel.
const CHANNELS: usize = 4;

/// Follow the orbit of `c` for exactly `limit` steps and return where
/// it ends up.  Escaping orbits overflow to infinity or NaN; that is
/// expected and left to `classify`.
#[inline]
pub fn iterate(c: Complex<f64>, limit: usize) -> Complex<f64> {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for _ in 0..limit {
        z = z * z + c;
    }
    z
}

/// Colour for the final value of an orbit.  NaN compares false with
/// everything, so finiteness is checked before the magnitude.
#[inline]
pub fn classify(z: Complex<f64>) -> Rgba {
    let magnitude = z.norm();
    if !magnitude.is_finite() || magnitude > 2.0 {
        return BACKGROUND;
    }
    let hue = 1.0 - (magnitude / 2.0).min(1.0);
    hsl_to_rgba(hue * 360.0, SATURATION, LIGHTNESS)
}

/// The colour of a single point on the complex plane.
#[inline]
pub fn colour_at(c: Complex<f64>, limit: usize) -> Rgba {
    classify(iterate(c, limit))
}

/// A finished render: `width * height` RGBA pixels, row-major, row 0
/// holding the rectangle's `ymin` edge.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            image: RgbaImage::new(width as u32, height as u32),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// The raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }

    /// The colour at a pixel.  Panics if the pixel is outside the
    /// buffer.
    pub fn pixel(&self, px: usize, py: usize) -> Rgba {
        assert!(px < self.width() && py < self.height());
        let offset = (py * self.width() + px) * CHANNELS;
        let raw = self.as_bytes();
        [raw[offset], raw[offset + 1], raw[offset + 2], raw[offset + 3]]
    }

    /// Hand the pixels over as an `image` raster.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn rows_mut(&mut self) -> ChunksMut<u8> {
        let stride = self.width() * CHANNELS;
        self.image.chunks_mut(stride)
    }
}

/// Binds a window on the complex plane to a pixel grid and an
/// iteration budget.  Once built it is immutable and can be shared
/// freely between threads.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    plane: PlaneMapper,
    limit: usize,
}

impl Renderer {
    /// Requires the width and height of the image, the window on the
    /// complex plane, and the number of iterations to follow each
    /// orbit for.  Fails if the window is degenerate or not finite, or
    /// if the image has no area.
    pub fn new(
        width: usize,
        height: usize,
        rect: ComplexRect,
        limit: usize,
    ) -> Result<Self, RenderError> {
        if width > u32::max_value() as usize || height > u32::max_value() as usize {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let plane = PlaneMapper::new(width, height, rect)?;
        Ok(Renderer { plane, limit })
    }

    /// A square renderer for a slippy-map tile.
    pub fn for_tile(tile: TileAddress, size: usize, limit: usize) -> Result<Self, RenderError> {
        Renderer::new(size, size, tile.to_rect(), limit)
    }

    /// The plane mapping this renderer samples through.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    fn render_row(&self, row: usize, pixels: &mut [u8]) {
        for (column, pixel) in pixels.chunks_mut(CHANNELS).enumerate() {
            let c = self.plane.pixel_to_point(&Pixel(column, row));
            pixel.copy_from_slice(&colour_at(c, self.limit));
        }
    }

    /// Render every row on the calling thread.
    pub fn render_single(&self) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(self.plane.width(), self.plane.height());
        for (row, pixels) in buffer.rows_mut().enumerate() {
            self.render_row(row, pixels);
        }
        buffer
    }

    /// Render with a pool of at most `threads` workers.  Returns only
    /// once every row has been written.
    pub fn render(&self, threads: usize) -> Result<PixelBuffer, RenderError> {
        let rect = &self.plane.complex_plane;
        debug!(
            "xmin: {}, ymin: {}, xmax: {}, ymax: {}, width: {}, height: {}, iterations: {}",
            rect.xmin,
            rect.ymin,
            rect.xmax,
            rect.ymax,
            self.plane.width(),
            self.plane.height(),
            self.limit
        );

        let workers = threads.max(1).min(self.plane.height());
        let mut buffer = PixelBuffer::new(self.plane.width(), self.plane.height());
        {
            let rows = Mutex::new(buffer.rows_mut().enumerate());
            let rows = &rows;
            crossbeam::scope(|spawner| {
                for _ in 0..workers {
                    spawner.spawn(move |_| loop {
                        let next = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        match next {
                            Some((row, pixels)) => self.render_row(row, pixels),
                            None => break,
                        }
                    });
                }
            })
            .map_err(|_| RenderError::WorkerPanicked)?;
        }
        Ok(buffer)
    }
}

/// Render `rect` into a `width` by `height` buffer, following each
/// orbit for `limit` steps, on at most `threads` workers.
pub fn render(
    rect: ComplexRect,
    width: usize,
    height: usize,
    limit: usize,
    threads: usize,
) -> Result<PixelBuffer, RenderError> {
    Renderer::new(width, height, rect, limit)?.render(threads)
}
