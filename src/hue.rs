//! HSV hue extraction.

use crate::grid::Pixel;

/// Hue of `pixel` in whole degrees, `0..360`.
///
/// Achromatic pixels (`R == G == B`) have hue 0. The result is rounded to the
/// nearest degree so equal-looking colors compare equal when sorting; a value
/// that rounds up to 360 wraps to 0. Alpha is ignored.
pub fn hue_of(pixel: &Pixel) -> u16 {
    let [r, g, b, _] = pixel.0.map(f64::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0;
    }

    let chroma = max - min;
    let sector = if max == r {
        (g - b) / chroma
    } else if max == g {
        2.0 + (b - r) / chroma
    } else {
        4.0 + (r - g) / chroma
    };

    let mut hue = sector * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }
    (hue.round() as u16) % 360
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gray, hue_pixel};
    use image::Rgba;

    #[test]
    fn achromatic_pixels_have_zero_hue() {
        for v in [0, 1, 32768, 65535] {
            assert_eq!(hue_of(&gray(v)), 0);
        }
    }

    #[test]
    fn primaries_and_secondaries() {
        let m = u16::MAX;
        assert_eq!(hue_of(&Rgba([m, 0, 0, m])), 0);
        assert_eq!(hue_of(&Rgba([m, m, 0, m])), 60);
        assert_eq!(hue_of(&Rgba([0, m, 0, m])), 120);
        assert_eq!(hue_of(&Rgba([0, m, m, m])), 180);
        assert_eq!(hue_of(&Rgba([0, 0, m, m])), 240);
        assert_eq!(hue_of(&Rgba([m, 0, m, m])), 300);
    }

    #[test]
    fn negative_red_sector_wraps_positive() {
        // Red dominant with blue above green lands just below 360.
        assert_eq!(hue_of(&hue_pixel(350.0)), 350);
    }

    #[test]
    fn near_360_rounds_to_zero() {
        // (g - b) / chroma = -1/65535 → about 359.9991°.
        let p = Rgba([65535, 0, 1, 65535]);
        assert_eq!(hue_of(&p), 0);
    }

    #[test]
    fn test_helper_pixels_round_trip_to_their_hue() {
        for deg in [10, 50, 90, 200, 300, 350] {
            assert_eq!(hue_of(&hue_pixel(deg as f64)), deg);
        }
    }

    #[test]
    fn hue_always_in_range() {
        let steps = [0u16, 1, 255, 4096, 30000, 65534, 65535];
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    assert!(hue_of(&Rgba([r, g, b, 65535])) < 360);
                }
            }
        }
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(
            hue_of(&Rgba([100, 4000, 200, 0])),
            hue_of(&Rgba([100, 4000, 200, 65535]))
        );
    }
}
