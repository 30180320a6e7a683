// ============================================================================
// COORDINATE MAPPING: widget surface space <-> full-resolution bitmap space
// ============================================================================

use image::RgbaImage;

use super::geometry::{Point, Rect, Size};

/// Scale a single widget-space coordinate into bitmap space, truncating
/// toward zero. The product is formed before the division so that integer
/// corners land exactly on the bitmap edge.
fn scale_axis(value: i32, widget: u32, bitmap: u32) -> i32 {
    (value as f64 * bitmap as f64 / widget as f64) as i32
}

/// Map a widget-space point to bitmap-space pixel indices.
///
/// X and Y use independent factors (`bitmap / widget`), so a surface that
/// stretches the bitmap non-uniformly still maps correctly. Returns `None`
/// when the widget has a zero dimension.
pub fn to_bitmap_space(point: Point, widget: Size, bitmap: Size) -> Option<Point> {
    if widget.is_empty() {
        return None;
    }
    Some(Point::new(
        scale_axis(point.x, widget.width, bitmap.width),
        scale_axis(point.y, widget.height, bitmap.height),
    ))
}

/// Map a widget-space rectangle into bitmap space.
///
/// The origin and the far edge are mapped separately, so the result may
/// extend beyond the bitmap; clamping is the extractor's job.
pub fn rect_to_bitmap_space(rect: Rect, widget: Size, bitmap: Size) -> Option<Rect> {
    let origin = to_bitmap_space(rect.top_left(), widget, bitmap)?;
    let far = to_bitmap_space(Point::new(rect.right(), rect.bottom()), widget, bitmap)?;
    Some(Rect::from_corners(origin, far))
}

/// Pixel under a widget-space point, if it falls inside the bitmap.
pub fn pixel_at(point: Point, widget: Size, bitmap: &RgbaImage) -> Option<(u32, u32)> {
    if point.x < 0 || point.y < 0 {
        return None;
    }
    let size = Size::of(bitmap);
    let p = to_bitmap_space(point, widget, size)?;
    let (x, y) = (p.x as u32, p.y as u32);
    (x < size.width && y < size.height).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_corners() {
        let cases = [
            (Size::new(300, 200), Size::new(1920, 1080)),
            (Size::new(3, 7), Size::new(10, 10)),
            (Size::new(640, 480), Size::new(17, 13)),
            (Size::new(1, 1), Size::new(4096, 3)),
        ];
        for (widget, bitmap) in cases {
            assert_eq!(to_bitmap_space(Point::ORIGIN, widget, bitmap), Some(Point::ORIGIN));
            let far = Point::new(widget.width as i32, widget.height as i32);
            assert_eq!(
                to_bitmap_space(far, widget, bitmap),
                Some(Point::new(bitmap.width as i32, bitmap.height as i32)),
                "widget {widget:?} bitmap {bitmap:?}"
            );
        }
    }

    #[test]
    fn zero_sized_widget_has_no_mapping() {
        let bitmap = Size::new(100, 100);
        assert_eq!(to_bitmap_space(Point::new(5, 5), Size::new(0, 50), bitmap), None);
        assert_eq!(to_bitmap_space(Point::new(5, 5), Size::new(50, 0), bitmap), None);
        assert_eq!(rect_to_bitmap_space(Rect::new(0, 0, 4, 4), Size::new(0, 0), bitmap), None);
    }

    #[test]
    fn axes_scale_independently_and_truncate() {
        // Widget is half as wide and a third as tall as the bitmap.
        let widget = Size::new(100, 100);
        let bitmap = Size::new(200, 300);
        assert_eq!(to_bitmap_space(Point::new(33, 33), widget, bitmap), Some(Point::new(66, 99)));

        // 0.75 scale: 5 * 0.75 = 3.75 truncates to 3.
        let shrink = to_bitmap_space(Point::new(5, 5), Size::new(4, 4), Size::new(3, 3));
        assert_eq!(shrink, Some(Point::new(3, 3)));
    }

    #[test]
    fn rect_mapping_keeps_far_edge() {
        let r = rect_to_bitmap_space(Rect::new(10, 20, 50, 40), Size::new(100, 100), Size::new(400, 200));
        assert_eq!(r, Some(Rect::new(40, 40, 200, 80)));
    }

    #[test]
    fn pixel_at_rejects_points_past_the_edge() {
        let bitmap = RgbaImage::new(20, 10);
        let widget = Size::new(40, 20);
        assert_eq!(pixel_at(Point::new(39, 19), widget, &bitmap), Some((19, 9)));
        assert_eq!(pixel_at(Point::new(40, 5), widget, &bitmap), None);
        assert_eq!(pixel_at(Point::new(-1, 5), widget, &bitmap), None);
    }
}
