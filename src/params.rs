//! Parsing of user-supplied numbers: the `WxH` and `re,im` pairs of
//! the command line, and the zoom/x/y triples of tile requests.  The
//! renderer trusts what comes out of here.

use std::str::FromStr;

use crate::planes::TileAddress;

/// The deepest zoom served.  Past this the tiles are narrower than
/// double precision can usefully resolve.
pub const MAX_ZOOM: i64 = 24;

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
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

/// Validator form of `parse_pair`, for clap.
pub fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

/// Validator for a number within an inclusive range, for clap.
pub fn validate_range<T: FromStr + PartialOrd>(
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

/// Why a tile address was refused.  The messages are what clients see.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileParamError {
    /// Zoom is not an integer.
    InvalidZoom,
    /// Zoom is outside `0..=MAX_ZOOM`.
    ZoomOutOfRange,
    /// Column is not an integer.
    InvalidX,
    /// Column is outside the zoom level.
    XOutOfRange,
    /// Row is not an integer.
    InvalidY,
    /// Row is outside the zoom level.
    YOutOfRange,
    /// Not three slash-separated parts.
    MalformedPath,
}

impl TileParamError {
    /// Client-facing description.
    pub fn message(self) -> &'static str {
        match self {
            TileParamError::InvalidZoom => "Invalid z parameter",
            TileParamError::ZoomOutOfRange => "z parameter must be between 0 and 24",
            TileParamError::InvalidX => "Invalid x parameter",
            TileParamError::XOutOfRange => "x parameter must be within range for zoom level",
            TileParamError::InvalidY => "Invalid y parameter",
            TileParamError::YOutOfRange => "y parameter must be within range for zoom level",
            TileParamError::MalformedPath => "Tile must be given as z/x/y",
        }
    }
}

/// Check a zoom/x/y triple, in that order, and build the tile.
pub fn parse_tile(z: &str, x: &str, y: &str) -> Result<TileAddress, TileParamError> {
    let zoom = i64::from_str(z).map_err(|_| TileParamError::InvalidZoom)?;
    if zoom < 0 || zoom > MAX_ZOOM {
        return Err(TileParamError::ZoomOutOfRange);
    }
    let max_coord = 1i64 << zoom;

    let x = i64::from_str(x).map_err(|_| TileParamError::InvalidX)?;
    if x < 0 || x >= max_coord {
        return Err(TileParamError::XOutOfRange);
    }
    let y = i64::from_str(y).map_err(|_| TileParamError::InvalidY)?;
    if y < 0 || y >= max_coord {
        return Err(TileParamError::YOutOfRange);
    }
    Ok(TileAddress::new(zoom as u32, x as u32, y as u32))
}

/// Parse a `z/x/y` path, as used on the command line.
pub fn parse_tile_path(s: &str) -> Result<TileAddress, TileParamError> {
    let mut parts = s.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(z), Some(x), Some(y), None) => parse_tile(z, x, y),
        _ => Err(TileParamError::MalformedPath),
    }
}
