// ============================================================================
// STROKE RASTERIZATION: round-capped line segments on an RGBA buffer
// ============================================================================

use image::{Rgba, RgbaImage};

use super::geometry::Point;

/// Squared distance from `(px, py)` to the segment `a`–`b`.
#[inline]
fn segment_distance_sq(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.0 + t * dx;
    let cy = a.1 + t * dy;
    (px - cx) * (px - cx) + (py - cy) * (py - cy)
}

/// Draw a solid segment from `from` to `to` with round caps.
///
/// Pixels are sampled at their centres. Odd widths centre the pen on the
/// point's pixel, even widths on its top-left corner, so the stroke is
/// exactly `width` pixels across. A pixel is painted when its centre lies
/// strictly closer than `width / 2` to the segment. Pixels are overwritten
/// (no blending, no anti-aliasing) and anything outside the buffer is
/// clipped. Returns `true` if any pixel changed.
pub fn draw_segment(target: &mut RgbaImage, from: Point, to: Point, color: Rgba<u8>, width: u32) -> bool {
    let (w, h) = target.dimensions();
    if w == 0 || h == 0 || width == 0 {
        return false;
    }
    let radius = width as f64 / 2.0;
    let radius_sq = radius * radius;
    let offset = if width % 2 == 1 { 0.5 } else { 0.0 };
    let a = (from.x as f64 + offset, from.y as f64 + offset);
    let b = (to.x as f64 + offset, to.y as f64 + offset);

    let min_x = (a.0.min(b.0) - radius).floor().max(0.0) as i64;
    let min_y = (a.1.min(b.1) - radius).floor().max(0.0) as i64;
    let max_x = ((a.0.max(b.0) + radius).ceil() as i64).min(w as i64 - 1);
    let max_y = ((a.1.max(b.1) + radius).ceil() as i64).min(h as i64 - 1);
    if min_x > max_x || min_y > max_y {
        return false;
    }

    let mut changed = false;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if segment_distance_sq(x as f64 + 0.5, y as f64 + 0.5, a, b) < radius_sq {
                let px = target.get_pixel_mut(x as u32, y as u32);
                if *px != color {
                    *px = color;
                    changed = true;
                }
            }
        }
    }
    changed
}
