// ============================================================================
// GEOMETRY: integer points, sizes and normalized rectangles
// ============================================================================

/// A position in some pixel space. May lie outside the widget or bitmap it
/// refers to (drags are allowed to leave the widget).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a widget surface or bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle. Width and height are never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Build a rectangle, normalizing negative extents by moving the origin.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        let (x, width) = if width < 0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0 { (y + height, -height) } else { (y, height) };
        Self { x, y, width, height }
    }

    /// Rectangle spanned by two opposite corners, in any drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
