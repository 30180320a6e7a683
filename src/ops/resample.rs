// ============================================================================
// RESAMPLING: scale a bitmap by one scalar magnification ratio
// ============================================================================

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use rayon::prelude::*;

use crate::error::ConfigError;

pub const MIN_RATIO: f64 = 0.1;
pub const MAX_RATIO: f64 = 10.0;
pub const DEFAULT_RATIO: f64 = 2.0;

/// Magnification factor in `[MIN_RATIO, MAX_RATIO]`, kept at one decimal.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ZoomRatio(f64);

impl ZoomRatio {
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() || value < MIN_RATIO - 1e-9 || value > MAX_RATIO + 1e-9 {
            return Err(ConfigError::RatioOutOfRange(value));
        }
        Ok(Self::clamped(value))
    }

    /// Coerce any input into range. Non-finite values fall back to the default.
    pub fn clamped(value: f64) -> Self {
        let value = if value.is_finite() { value } else { DEFAULT_RATIO };
        let tenths = (value.clamp(MIN_RATIO, MAX_RATIO) * 10.0).round() / 10.0;
        Self(tenths.clamp(MIN_RATIO, MAX_RATIO))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Output dimensions for a `width x height` source. Both axes use the
    /// same ratio, so aspect ratio is preserved up to rounding.
    pub fn target_size(self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.0).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

impl Default for ZoomRatio {
    fn default() -> Self {
        Self(DEFAULT_RATIO)
    }
}

impl fmt::Display for ZoomRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}

/// Interpolation policy for [`scale`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    /// Bilinear when enlarging, area averaging when shrinking.
    #[default]
    Smooth,
}

impl Interpolation {
    pub fn label(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Smooth => "smooth",
        }
    }

    pub fn all() -> &'static [Interpolation] {
        &[Interpolation::Nearest, Interpolation::Smooth]
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interpolation::all()
            .iter()
            .copied()
            .find(|i| i.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown interpolation '{}' (expected nearest or smooth)", s))
    }
}

/// One source tap for an output coordinate.
type Taps = Vec<(u32, f32)>;

/// Scale `src` by `ratio`. Deterministic for a given input, ratio and policy.
pub fn scale(src: &RgbaImage, ratio: ZoomRatio, interp: Interpolation) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return RgbaImage::new(0, 0);
    }
    let (dw, dh) = ratio.target_size(sw, sh);

    let (col_taps, row_taps) = match interp {
        Interpolation::Nearest => (nearest_taps(sw, dw), nearest_taps(sh, dh)),
        Interpolation::Smooth if ratio.get() < 1.0 => (area_taps(sw, dw), area_taps(sh, dh)),
        Interpolation::Smooth => (bilinear_taps(sw, dw), bilinear_taps(sh, dh)),
    };

    let row_bytes = dw as usize * 4;
    let mut out = vec![0u8; row_bytes * dh as usize];
    out.par_chunks_mut(row_bytes)
        .zip(row_taps.par_iter())
        .for_each(|(row, y_taps)| {
            for (dx, x_taps) in col_taps.iter().enumerate() {
                let mut acc = [0.0f32; 4];
                for &(sy, wy) in y_taps {
                    for &(sx, wx) in x_taps {
                        let p = src.get_pixel(sx, sy);
                        let w = wx * wy;
                        for c in 0..4 {
                            acc[c] += p[c] as f32 * w;
                        }
                    }
                }
                for c in 0..4 {
                    row[dx * 4 + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    RgbaImage::from_raw(dw, dh, out).unwrap_or_else(|| RgbaImage::new(dw, dh))
}

fn nearest_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f64 + 0.5) * scale) as u32;
            vec![(s.min(src_len - 1), 1.0)]
        })
        .collect()
}

/// Two taps per output coordinate, sampling at pixel centers and clamping
/// at the edges.
fn bilinear_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    let last = (src_len - 1) as f64;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * scale - 0.5).clamp(0.0, last);
            let s0 = pos.floor();
            let t = (pos - s0) as f32;
            let s0 = s0 as u32;
            let s1 = (s0 + 1).min(src_len - 1);
            if t == 0.0 || s0 == s1 {
                vec![(s0, 1.0)]
            } else {
                vec![(s0, 1.0 - t), (s1, t)]
            }
        })
        .collect()
}

/// Box filter: each output coordinate averages the source span it covers,
/// weighting partially covered pixels by their overlap.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let span = end - start;
            let mut taps = Vec::new();
            let mut s = start.floor() as u32;
            while (s as f64) < end && s < src_len {
                let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                if overlap > 0.0 {
                    taps.push((s, (overlap / span) as f32));
                }
                s += 1;
            }
            if taps.is_empty() {
                taps.push(((start as u32).min(src_len - 1), 1.0));
            }
            taps
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn ratio(v: f64) -> ZoomRatio {
        ZoomRatio::new(v).unwrap()
    }

    #[test]
    fn ratio_is_validated_and_rounded() {
        assert_eq!(ratio(2.04).get(), 2.0);
        assert_eq!(ratio(0.1).get(), 0.1);
        assert_eq!(ratio(10.0).get(), 10.0);
        assert!(ZoomRatio::new(0.05).is_err());
        assert!(ZoomRatio::new(10.5).is_err());
        assert!(ZoomRatio::new(f64::NAN).is_err());
        assert_eq!(ZoomRatio::clamped(42.0).get(), 10.0);
        assert_eq!(ZoomRatio::clamped(f64::INFINITY).get(), DEFAULT_RATIO);
        assert_eq!(ratio(1.5).to_string(), "1.5x");
    }

    #[test]
    fn region_doubles_to_expected_size() {
        let src = RgbaImage::new(100, 50);
        let out = scale(&src, ratio(2.0), Interpolation::Smooth);
        assert_eq!(out.dimensions(), (200, 100));
    }

    #[test]
    fn target_size_never_collapses_to_zero() {
        assert_eq!(ratio(0.1).target_size(3, 3), (1, 1));
        let out = scale(&RgbaImage::new(3, 2), ratio(0.1), Interpolation::Smooth);
        assert_eq!(out.dimensions(), (1, 1));
    }

    #[test]
    fn aspect_ratio_is_preserved_within_rounding() {
        for (w, h) in [(123u32, 77u32), (400, 300), (17, 96), (1, 50)] {
            for tenths in 1..=100 {
                let r = ratio(tenths as f64 / 10.0);
                let (nw, nh) = r.target_size(w, h);
                if nw == 1 || nh == 1 {
                    continue;
                }
                let cross = (nw as f64 * h as f64 - nh as f64 * w as f64).abs();
                assert!(cross <= (w + h) as f64 / 2.0, "{w}x{h} at {r} -> {nw}x{nh}");
            }
        }
    }

    #[test]
    fn identity_ratio_copies_pixels() {
        let src = RgbaImage::from_fn(9, 5, |x, y| Rgba([x as u8 * 20, y as u8 * 40, 3, 200]));
        for interp in Interpolation::all() {
            assert_eq!(scale(&src, ratio(1.0), *interp), src);
        }
    }

    #[test]
    fn uniform_color_stays_uniform() {
        let color = Rgba([12, 200, 99, 255]);
        let src = RgbaImage::from_pixel(13, 7, color);
        for r in [0.3, 0.7, 1.9, 3.3] {
            for interp in Interpolation::all() {
                let out = scale(&src, ratio(r), *interp);
                assert!(out.pixels().all(|p| *p == color), "ratio {r} {interp:?}");
            }
        }
    }

    #[test]
    fn shrinking_averages_source_blocks() {
        let src = RgbaImage::from_fn(4, 4, |x, y| {
            if (x < 2) == (y < 2) { Rgba([0, 0, 0, 255]) } else { Rgba([200, 100, 50, 255]) }
        });
        let mut src = src;
        src.put_pixel(0, 0, Rgba([40, 40, 40, 255]));
        let out = scale(&src, ratio(0.5), Interpolation::Smooth);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 10, 10, 255]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([200, 100, 50, 255]));
        assert_eq!(*out.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn enlarging_interpolates_between_neighbours() {
        let src = RgbaImage::from_fn(2, 1, |x, _| if x == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) });
        let out = scale(&src, ratio(2.0), Interpolation::Smooth);
        assert_eq!(out.dimensions(), (4, 2));
        for y in 0..2 {
            let reds: Vec<u8> = (0..4).map(|x| out.get_pixel(x, y)[0]).collect();
            assert_eq!(reds, vec![0, 64, 191, 255], "row {y}");
        }

        let nearest = scale(&src, ratio(2.0), Interpolation::Nearest);
        assert_eq!(nearest.dimensions(), (4, 2));
        for y in 0..2 {
            let reds: Vec<u8> = (0..4).map(|x| nearest.get_pixel(x, y)[0]).collect();
            assert_eq!(reds, vec![0, 0, 255, 255], "row {y}");
        }
    }

    #[test]
    fn scaling_is_deterministic() {
        let src = RgbaImage::from_fn(37, 23, |x, y| Rgba([(x * 7) as u8, (y * 11) as u8, (x ^ y) as u8, 255]));
        let a = scale(&src, ratio(2.7), Interpolation::Smooth);
        let b = scale(&src, ratio(2.7), Interpolation::Smooth);
        assert_eq!(a, b);
    }

    #[test]
    fn parses_interpolation_names() {
        assert_eq!("Nearest".parse::<Interpolation>(), Ok(Interpolation::Nearest));
        assert_eq!(" smooth ".parse::<Interpolation>(), Ok(Interpolation::Smooth));
        assert!("lanczos".parse::<Interpolation>().is_err());
    }
}
