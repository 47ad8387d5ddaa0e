//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane.  Also home to the slippy-map
//! addressing that turns a zoom/x/y tile into such a rectangle.
//!
//! Tiles use math orientation: the imaginary axis grows with the tile
//! row, exactly as the real axis grows with the tile column, and row 0
//! of every rendered image holds the rectangle's `ymin`.
use crate::errors::RenderError;
use num::Complex;

/// The edge of the square window on the complex plane that the tile
/// at zoom 0 covers: `[-EXTENT, EXTENT]` on both axes.
pub const EXTENT: f64 = 2.0;

/// A window on the complex plane, real axis along x and imaginary
/// axis along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexRect {
    /// Left bound on the real axis.
    pub xmin: f64,
    /// Lower bound on the imaginary axis.
    pub ymin: f64,
    /// Right bound on the real axis.
    pub xmax: f64,
    /// Upper bound on the imaginary axis.
    pub ymax: f64,
}

impl ComplexRect {
    /// Build a rectangle.  No checking is done here; see `validate`.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> ComplexRect {
        ComplexRect {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Fails unless every bound is finite and the rectangle has a
    /// positive extent on both axes.
    pub fn validate(&self) -> Result<(), RenderError> {
        let finite = self.xmin.is_finite()
            && self.ymin.is_finite()
            && self.xmax.is_finite()
            && self.ymax.is_finite();
        if !finite || self.xmax <= self.xmin || self.ymax <= self.ymin {
            return Err(RenderError::InvalidRectangle {
                xmin: self.xmin,
                ymin: self.ymin,
                xmax: self.xmax,
                ymax: self.ymax,
            });
        }
        Ok(())
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// A slippy-map tile.  Callers are expected to have checked that
/// `x` and `y` are below `2^zoom`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Quadtree depth; zoom 0 is a single tile.
    pub zoom: u32,
    /// Column, counted from the left.
    pub x: u32,
    /// Row, counted from `ymin`.
    pub y: u32,
}

impl TileAddress {
    /// Constructor.
    pub fn new(zoom: u32, x: u32, y: u32) -> TileAddress {
        TileAddress { zoom, x, y }
    }

    /// Number of tiles along each side at this tile's zoom.
    pub fn tiles_per_side(&self) -> u64 {
        1u64 << self.zoom
    }

    /// The window on the complex plane this tile covers.
    pub fn to_rect(&self) -> ComplexRect {
        tile_to_rect(*self)
    }
}

/// Convert a slippy-map tile into its window of `[-2, 2] x [-2, 2]`.
/// Each tile spans `1/2^zoom` of the full window on both axes.
/// Neighbouring tiles compute their shared edge from the same
/// expression, so the edges agree to the bit.
pub fn tile_to_rect(tile: TileAddress) -> ComplexRect {
    let n = tile.tiles_per_side() as f64;
    let span = 2.0 * EXTENT;
    let edge = |i: u64| (i as f64) / n * span - EXTENT;
    let (x, y) = (u64::from(tile.x), u64::from(tile.y));
    ComplexRect {
        xmin: edge(x),
        ymin: edge(y),
        xmax: edge(x + 1),
        ymax: edge(y + 1),
    }
}

/// Linear interpolation from a pixel index to the complex sample it
/// represents.  Pixel 0 samples the rectangle's minimum edge; the
/// maximum edge belongs to the next tile over.
#[inline]
pub fn pixel_to_sample(
    px: usize,
    py: usize,
    rect: &ComplexRect,
    width: usize,
    height: usize,
) -> Complex<f64> {
    Complex::new(
        rect.xmin + (px as f64) / (width as f64) * rect.width(),
        rect.ymin + (py as f64) / (height as f64) * rect.height(),
    )
}

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the column, row of a pixel in an integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps points from one to the other.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// The window on the complex cartesian plane.
    pub complex_plane: ComplexRect,
}

impl PlaneMapper {
    /// Constructor.  Rejects rectangles that are degenerate or not
    /// finite, and pixel grids with no area.
    pub fn new(width: usize, height: usize, rect: ComplexRect) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        rect.validate()?;
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: rect,
        })
    }

    /// Width of the integral plane in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Never true for a mapper built by `new`; present for symmetry
    /// with `len`.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number it samples.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        pixel_to_sample(
            pixel.0,
            pixel.1,
            &self.complex_plane,
            self.integral_plane.0,
            self.integral_plane.1,
        )
    }

    /// Given a complex number, find the pixel whose sample lies at or
    /// just before it on both axes.  Points outside the window have no
    /// pixel.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let rect = &self.complex_plane;
        let left = (point.re - rect.xmin) / rect.width() * (self.integral_plane.0 as f64);
        let top = (point.im - rect.ymin) / rect.height() * (self.integral_plane.1 as f64);
        if !(left >= 0.0 && top >= 0.0) {
            return None;
        }
        let pixel = Pixel(left.floor() as usize, top.floor() as usize);
        if pixel.0 >= self.integral_plane.0 || pixel.1 >= self.integral_plane.1 {
            return None;
        }
        Some(pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> ComplexRect {
        ComplexRect::new(xmin, ymin, xmax, ymax)
    }

    #[test]
    fn literal_tiles_use_math_orientation() {
        assert_eq!(tile_to_rect(TileAddress::new(0, 0, 0)), rect(-2.0, -2.0, 2.0, 2.0));
        assert_eq!(tile_to_rect(TileAddress::new(1, 0, 0)), rect(-2.0, -2.0, 0.0, 0.0));
        assert_eq!(tile_to_rect(TileAddress::new(1, 1, 1)), rect(0.0, 0.0, 2.0, 2.0));
        assert_eq!(tile_to_rect(TileAddress::new(2, 1, 1)), rect(-1.0, -1.0, 0.0, 0.0));
    }

    #[test]
    fn tile_rows_move_up_the_imaginary_axis() {
        let top = TileAddress::new(1, 0, 0).to_rect();
        let bottom = TileAddress::new(1, 0, 1).to_rect();
        assert!(bottom.ymin > top.ymin);
        assert_eq!(top.ymax, bottom.ymin);
    }

    #[test]
    fn tiles_partition_the_full_window() {
        for zoom in 0..8 {
            let n = 1u32 << zoom;
            for y in 0..n {
                for x in 0..n {
                    let r = TileAddress::new(zoom, x, y).to_rect();
                    assert!(r.validate().is_ok());
                    if x == 0 {
                        assert_eq!(r.xmin, -EXTENT);
                    } else {
                        assert_eq!(r.xmin, TileAddress::new(zoom, x - 1, y).to_rect().xmax);
                    }
                    if y == 0 {
                        assert_eq!(r.ymin, -EXTENT);
                    } else {
                        assert_eq!(r.ymin, TileAddress::new(zoom, x, y - 1).to_rect().ymax);
                    }
                    if x == n - 1 {
                        assert_eq!(r.xmax, EXTENT);
                    }
                    if y == n - 1 {
                        assert_eq!(r.ymax, EXTENT);
                    }
                }
            }
        }
    }

    #[test]
    fn deepest_supported_zoom_stays_ordered() {
        let last = (1u32 << 24) - 1;
        let r = TileAddress::new(24, last, last).to_rect();
        assert!(r.validate().is_ok());
        assert_eq!(r.xmax, EXTENT);
        assert_eq!(r.ymax, EXTENT);
    }

    #[test]
    fn pixel_to_sample_interpolates_linearly() {
        let r = rect(-2.0, -2.0, 2.0, 2.0);
        assert_eq!(pixel_to_sample(0, 0, &r, 4, 4), Complex::new(-2.0, -2.0));
        assert_eq!(pixel_to_sample(2, 2, &r, 4, 4), Complex::new(0.0, 0.0));
        assert_eq!(pixel_to_sample(3, 1, &r, 4, 4), Complex::new(1.0, -1.0));
        assert_eq!(pixel_to_sample(128, 128, &r, 256, 256), Complex::new(0.0, 0.0));
    }

    #[test]
    fn pixel_to_sample_on_non_square_grids() {
        let r = rect(0.0, 0.0, 8.0, 6.0);
        assert_eq!(pixel_to_sample(400, 300, &r, 800, 600), Complex::new(4.0, 3.0));
        assert_eq!(pixel_to_sample(0, 0, &r, 1, 1), Complex::new(0.0, 0.0));
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        assert!(PlaneMapper::new(4, 4, rect(1.0, -1.0, -1.0, 1.0)).is_err());
        assert!(PlaneMapper::new(4, 4, rect(-1.0, 1.0, 1.0, -1.0)).is_err());
        assert!(PlaneMapper::new(4, 4, rect(-1.0, -1.0, -1.0, 1.0)).is_err());
        assert!(PlaneMapper::new(4, 4, rect(std::f64::NAN, -1.0, 1.0, 1.0)).is_err());
        assert!(PlaneMapper::new(4, 4, rect(-1.0, -1.0, std::f64::INFINITY, 1.0)).is_err());
    }

    #[test]
    fn planemapper_fails_on_empty_grid() {
        match PlaneMapper::new(0, 4, rect(-1.0, -1.0, 1.0, 1.0)) {
            Err(RenderError::InvalidDimensions { width: 0, height: 4 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(PlaneMapper::new(4, 0, rect(-1.0, -1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 3, rect(-1.0, -1.0, 1.0, 1.0)).unwrap();
        assert_eq!(pm.len(), 12);
        assert!(!pm.is_empty());
    }

    #[test]
    fn point_to_pixel_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, rect(-2.0, -2.0, 2.0, 2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.9, -0.5)), Some(Pixel(3, 1)));
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 2.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.5, 0.0)), None);
    }

    #[test]
    fn point_to_pixel_inverts_pixel_to_point() {
        let pm = PlaneMapper::new(256, 256, rect(-2.0, -2.0, 0.0, 0.0)).unwrap();
        let point = pm.pixel_to_point(&Pixel(192, 224));
        assert_eq!(point, Complex::new(-0.5, -0.25));
        assert_eq!(pm.point_to_pixel(&point), Some(Pixel(192, 224)));
    }
}
