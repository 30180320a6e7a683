//! End-to-end: select a region in a viewer, magnify it, draw on the result,
//! save it and read it back.

use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use zoomfe::canvas::{AnnotationCanvas, Pen};
use zoomfe::io::load_image;
use zoomfe::ops::geometry::{Point, Rect, Size};
use zoomfe::ops::resample::{Interpolation, ZoomRatio};
use zoomfe::ops::selection::PointerButton;
use zoomfe::viewer::{ImageViewer, PendingZoom};

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 128, 255]))
}

fn select(viewer: &mut ImageViewer, from: Point, to: Point, widget: Size) -> Option<PendingZoom> {
    viewer.set_selection_mode(true);
    viewer.pointer_pressed(from, PointerButton::Primary);
    viewer.pointer_moved(Point::new((from.x + to.x) / 2, (from.y + to.y) / 2), widget);
    viewer.pointer_moved(to, widget);
    viewer.pointer_released(to, PointerButton::Primary, widget)
}

#[test]
fn select_zoom_annotate_save_reload() {
    let widget = Size::new(200, 200);
    let mut viewer = ImageViewer::with_bitmap(gradient(200, 200), 10);

    let pending = select(&mut viewer, Point::new(10, 10), Point::new(110, 60), widget).unwrap();
    assert_eq!(pending.region, Rect::new(10, 10, 100, 50));
    assert!(!viewer.selection_mode());

    let zoomed = viewer
        .zoom_region(&pending, ZoomRatio::new(2.0).unwrap(), Interpolation::Smooth)
        .unwrap();
    assert_eq!(zoomed.dimensions(), (200, 100));

    let pen = Pen::new(Rgba([0, 0, 255, 255]), 3);
    let mut canvas = AnnotationCanvas::new(zoomed, pen);
    canvas.set_drawing_mode(true);
    assert!(canvas.begin_stroke(Point::new(20, 50)));
    assert!(canvas.extend_stroke(Point::new(60, 50)));
    assert!(canvas.extend_stroke(Point::new(60, 80)));
    assert!(canvas.end_stroke());
    assert!(!canvas.end_stroke());
    assert_eq!(*canvas.buffer().get_pixel(40, 50), Rgba([0, 0, 255, 255]));
    assert_eq!(*canvas.buffer().get_pixel(60, 70), Rgba([0, 0, 255, 255]));

    // The source viewer is untouched by annotation.
    assert_eq!(*viewer.bitmap().unwrap().get_pixel(30, 35), Rgba([30, 35, 128, 255]));

    let dir = tempdir().unwrap();
    let path = dir.path().join("annotated.png");
    canvas.save(&path).unwrap();
    let reloaded = load_image(&path).unwrap();
    assert_eq!(&reloaded, canvas.buffer());
}

#[test]
fn tiny_drag_never_reaches_the_ratio_prompt() {
    let mut viewer = ImageViewer::with_bitmap(gradient(200, 200), 10);
    let widget = Size::new(200, 200);
    assert_eq!(select(&mut viewer, Point::new(5, 5), Point::new(8, 8), widget), None);
    assert!(!viewer.selection_mode());
    assert!(!viewer.is_selecting());
}

#[test]
fn scaled_display_selects_in_bitmap_space() {
    // 400x300 bitmap drawn at half size.
    let widget = Size::new(200, 150);
    let mut viewer = ImageViewer::with_bitmap(gradient(400, 300), 10);

    let pending = select(&mut viewer, Point::new(150, 100), Point::new(190, 140), widget).unwrap();
    assert_eq!(pending.region, Rect::new(300, 200, 80, 80));

    let zoomed = viewer
        .zoom_region(&pending, ZoomRatio::new(0.5).unwrap(), Interpolation::Nearest)
        .unwrap();
    assert_eq!(zoomed.dimensions(), (40, 40));
}
