// ============================================================================
// ANNOTATION CANVAS: owned zoomed buffer + freehand stroke state machine
// ============================================================================

use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::error::ImageIoError;
use crate::io::{self, SaveFormat};
use crate::ops::geometry::{Point, Size};
use crate::ops::stroke::draw_segment;

pub const MIN_PEN_WIDTH: u32 = 1;
pub const MAX_PEN_WIDTH: u32 = 50;
pub const DEFAULT_PEN_WIDTH: u32 = 3;
pub const DEFAULT_PEN_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Pen attributes applied to segments drawn after they are set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pen {
    pub color: Rgba<u8>,
    pub width: u32,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: DEFAULT_PEN_COLOR,
            width: DEFAULT_PEN_WIDTH,
        }
    }
}

impl Pen {
    pub fn new(color: Rgba<u8>, width: u32) -> Self {
        Self {
            color,
            width: width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
        }
    }
}

/// Transient per-stroke state. `last_point` is only meaningful while drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeState {
    pub drawing: bool,
    pub last_point: Option<Point>,
}

/// A single mutable bitmap that freehand strokes are composited into.
///
/// Strokes are written straight into the buffer, so what is saved is exactly
/// what is shown.
pub struct AnnotationCanvas {
    buffer: RgbaImage,
    pen: Pen,
    stroke: StrokeState,
    drawing_mode: bool,
    /// Bumped on every pixel change so the UI knows when to re-upload.
    revision: u64,
}

impl AnnotationCanvas {
    pub fn new(buffer: RgbaImage, pen: Pen) -> Self {
        Self {
            buffer,
            pen,
            stroke: StrokeState::default(),
            drawing_mode: false,
            revision: 0,
        }
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn size(&self) -> Size {
        Size::of(&self.buffer)
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.drawing
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Turning drawing mode off mid-stroke ends the stroke without a final
    /// segment.
    pub fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
        if !enabled {
            self.stroke = StrokeState::default();
        }
    }

    pub fn set_pen_color(&mut self, color: Rgba<u8>) {
        self.pen.color = color;
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.pen.width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.buffer.width() && (p.y as u32) < self.buffer.height()
    }

    /// Start a stroke at `point`. Requires drawing mode and a point on the buffer.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if !self.drawing_mode || !self.contains(point) {
            return false;
        }
        self.stroke = StrokeState {
            drawing: true,
            last_point: Some(point),
        };
        true
    }

    /// Draw a segment from the last point to `point` and advance the last point.
    /// Moves that leave the buffer are skipped.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        if !self.stroke.drawing || !self.contains(point) {
            return false;
        }
        let Some(last) = self.stroke.last_point else {
            return false;
        };
        if draw_segment(&mut self.buffer, last, point, self.pen.color, self.pen.width) {
            self.revision += 1;
        }
        self.stroke.last_point = Some(point);
        true
    }

    /// Finish the current stroke. Returns `false` if no stroke was active.
    pub fn end_stroke(&mut self) -> bool {
        if !self.stroke.drawing {
            return false;
        }
        self.stroke = StrokeState::default();
        true
    }

    /// Encode the buffer to `path`, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<SaveFormat, ImageIoError> {
        let format = io::save_image(&self.buffer, path)?;
        log::info!(
            "Saved {}x{} annotation to {} ({:?})",
            self.buffer.width(),
            self.buffer.height(),
            path.display(),
            format
        );
        Ok(format)
    }
}
