//! Colour handling: the HSL to RGB conversion the renderer paints
//! with, and the two ends of the palette.

/// An 8-bit-per-channel colour, in RGBA order.
pub type Rgba = [u8; 4];

/// Points that escape are painted with this.
pub const BACKGROUND: Rgba = [255, 255, 255, 255];

/// Saturation of every in-set colour.
pub const SATURATION: f64 = 0.5;

/// Lightness of every in-set colour.
pub const LIGHTNESS: f64 = 0.5;

/// Convert a hue in degrees, and a saturation and lightness in
/// `[0, 1]`, to an opaque RGBA colour.  Hues wrap, so 360 is red
/// again.
///
/// Uses the algorithm from CSS Color Module Level 3.
pub fn hsl_to_rgba(hue: f64, saturation: f64, lightness: f64) -> Rgba {
    let h = (hue / 360.0).rem_euclid(1.0);
    let (r, g, b) = if saturation == 0.0 {
        (lightness, lightness, lightness)
    } else {
        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };
    [quantise(r), quantise(g), quantise(b), 255]
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[inline]
fn quantise(channel: f64) -> u8 {
    (channel.max(0.0).min(1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsl_to_rgba(0.0, 1.0, 0.5), [255, 0, 0, 255]);
        assert_eq!(hsl_to_rgba(120.0, 1.0, 0.5), [0, 255, 0, 255]);
        assert_eq!(hsl_to_rgba(240.0, 1.0, 0.5), [0, 0, 255, 255]);
    }

    #[test]
    fn greys_ignore_hue() {
        assert_eq!(hsl_to_rgba(75.0, 0.0, 0.0), [0, 0, 0, 255]);
        assert_eq!(hsl_to_rgba(200.0, 0.0, 1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn hue_wraps_at_full_turn() {
        assert_eq!(hsl_to_rgba(360.0, SATURATION, LIGHTNESS), hsl_to_rgba(0.0, SATURATION, LIGHTNESS));
    }

    #[test]
    fn palette_extremes() {
        // 0.75 * 255 = 191.25, 0.25 * 255 = 63.75
        assert_eq!(hsl_to_rgba(0.0, SATURATION, LIGHTNESS), [191, 64, 64, 255]);
        assert_eq!(hsl_to_rgba(180.0, SATURATION, LIGHTNESS), [64, 191, 191, 255]);
    }

    #[test]
    fn palette_never_reaches_background() {
        for step in 0..=360 {
            assert_ne!(hsl_to_rgba(f64::from(step), SATURATION, LIGHTNESS), BACKGROUND);
        }
    }
}
