// ============================================================================
// REGION EXTRACTION: clamp a bitmap-space rectangle and copy it out
// ============================================================================

use image::RgbaImage;

use super::geometry::{Rect, Size};

/// Clamp `rect` to `[0, width) x [0, height)`.
///
/// Returns `None` when nothing of the rectangle remains inside the bitmap.
pub fn clamp_rect(rect: Rect, bitmap: Size) -> Option<Rect> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(bitmap.width.min(i32::MAX as u32) as i32);
    let y1 = rect.bottom().min(bitmap.height.min(i32::MAX as u32) as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
}

/// Copy the clamped window of `rect` into a newly allocated bitmap.
pub fn extract(bitmap: &RgbaImage, rect: Rect) -> Option<RgbaImage> {
    let r = clamp_rect(rect, Size::of(bitmap))?;
    let (x, y, w, h) = (r.x as usize, r.y as usize, r.width as usize, r.height as usize);

    let stride = bitmap.width() as usize * 4;
    let src = bitmap.as_raw();
    let mut out = Vec::with_capacity(w * h * 4);
    for row in y..y + h {
        let start = row * stride + x * 4;
        out.extend_from_slice(&src[start..start + w * 4]);
    }
    RgbaImage::from_raw(w as u32, h as u32, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Every pixel encodes its own coordinates so copies can be checked.
    fn coordinate_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    #[test]
    fn extracts_requested_window() {
        let src = coordinate_image(200, 200);
        let out = extract(&src, Rect::new(10, 10, 100, 50)).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 10, 7, 255]));
        assert_eq!(*out.get_pixel(99, 49), Rgba([109, 59, 7, 255]));
    }

    #[test]
    fn clamps_to_bitmap_bounds() {
        let src = coordinate_image(50, 40);
        let out = extract(&src, Rect::new(-10, 30, 100, 100)).unwrap();
        assert_eq!(out.dimensions(), (50, 10));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 30, 7, 255]));
        assert_eq!(clamp_rect(Rect::new(-10, 30, 100, 100), Size::new(50, 40)), Some(Rect::new(0, 30, 50, 10)));
    }

    #[test]
    fn never_exceeds_source_bounds() {
        let src = coordinate_image(31, 17);
        let size = Size::of(&src);
        for x in (-40..40).step_by(7) {
            for y in (-30..30).step_by(5) {
                for (w, h) in [(1, 1), (13, 29), (60, 5), (100, 100)] {
                    if let Some(r) = clamp_rect(Rect::new(x, y, w, h), size) {
                        assert!(r.x >= 0 && r.y >= 0);
                        assert!(r.right() <= 31 && r.bottom() <= 17);
                        let out = extract(&src, Rect::new(x, y, w, h)).unwrap();
                        assert_eq!(out.dimensions(), (r.width as u32, r.height as u32));
                    }
                }
            }
        }
    }

    #[test]
    fn outside_rectangle_is_a_no_op() {
        let src = coordinate_image(20, 20);
        assert!(extract(&src, Rect::new(25, 0, 10, 10)).is_none());
        assert!(extract(&src, Rect::new(-15, -15, 15, 40)).is_none());
        assert!(extract(&src, Rect::new(5, 5, 0, 10)).is_none());
    }

    #[test]
    fn copy_does_not_alias_source() {
        let mut src = coordinate_image(8, 8);
        let out = extract(&src, Rect::new(0, 0, 4, 4)).unwrap();
        src.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 7, 255]));
    }
}
