// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failures the renderer and the server can report.  Escaping to
//! infinity is not among them: an orbit that overflows is simply a
//! point outside the set.

use failure::Fail;
use std::io;

/// Everything that can go wrong between a requested window and a
/// finished PNG.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The rectangle has a non-finite bound, or its maximum is not
    /// strictly greater than its minimum on some axis.
    #[fail(
        display = "Invalid rectangle: ({}, {}) to ({}, {})",
        xmin, ymin, xmax, ymax
    )]
    InvalidRectangle {
        /// Left bound on the real axis.
        xmin: f64,
        /// Lower bound on the imaginary axis.
        ymin: f64,
        /// Right bound on the real axis.
        xmax: f64,
        /// Upper bound on the imaginary axis.
        ymax: f64,
    },

    /// The pixel grid has no area.
    #[fail(display = "Invalid dimensions: {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// A render worker panicked before finishing its rows.
    #[fail(display = "A render worker panicked")]
    WorkerPanicked,

    /// The PNG codec could not write the image.
    #[fail(display = "Could not encode image: {}", _0)]
    Encode(#[cause] io::Error),
}

impl RenderError {
    /// True when the failure was caused by the caller's arguments
    /// rather than by the renderer itself.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            RenderError::InvalidRectangle { .. } | RenderError::InvalidDimensions { .. } => true,
            _ => false,
        }
    }
}

/// Failures of the HTTP shell.
#[derive(Debug, Fail)]
pub enum ServeError {
    /// The listening socket could not be opened.
    #[fail(display = "Could not bind to {}: {}", _0, _1)]
    Bind(String, #[cause] io::Error),

    /// The server stopped with an I/O error.
    #[fail(display = "Server failure: {}", _0)]
    Serve(#[cause] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_are_flagged() {
        let rect = RenderError::InvalidRectangle {
            xmin: 1.0,
            ymin: 0.0,
            xmax: 0.0,
            ymax: 1.0,
        };
        assert!(rect.is_invalid_argument());
        assert!(RenderError::InvalidDimensions {
            width: 0,
            height: 4
        }
        .is_invalid_argument());
        assert!(!RenderError::WorkerPanicked.is_invalid_argument());
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = RenderError::InvalidDimensions {
            width: 0,
            height: 600,
        };
        assert_eq!(format!("{}", err), "Invalid dimensions: 0x600");
    }
}
