// ============================================================================
// IMAGE VIEWER: per-window source bitmap, selection gesture and readouts
// ============================================================================
//
// Toolkit independent: the UI layer forwards press / move / release events in
// widget-local coordinates together with the size the bitmap is drawn at.

use std::fmt;

use image::{Rgba, RgbaImage};

use crate::ops::extract::{clamp_rect, extract};
use crate::ops::geometry::{Point, Rect, Size};
use crate::ops::mapping::{pixel_at, rect_to_bitmap_space};
use crate::ops::resample::{Interpolation, ZoomRatio, scale};
use crate::ops::selection::{PointerButton, RegionSelector};

/// How long pointer-event messages stay in the status bar.
pub const POINTER_MESSAGE_SECS: f64 = 1.0;
/// How long mode-change messages stay in the status bar.
pub const MODE_MESSAGE_SECS: f64 = 3.0;

/// Transient status-bar text.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub duration_secs: f64,
}

impl StatusMessage {
    fn new(text: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            text: text.into(),
            duration_secs,
        }
    }
}

/// Bitmap coordinates and intensity of the pixel under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelReadout {
    pub x: u32,
    pub y: u32,
    pub gray: u8,
}

impl fmt::Display for PixelReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) = {}", self.x, self.y, self.gray)
    }
}

/// Integer luminance approximation `(11r + 16g + 5b) / 32`.
pub fn gray_value(p: Rgba<u8>) -> u8 {
    ((p[0] as u32 * 11 + p[1] as u32 * 16 + p[2] as u32 * 5) / 32) as u8
}

/// An accepted selection, already mapped to bitmap space and clamped,
/// waiting for the user to pick a magnification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingZoom {
    pub region: Rect,
}

fn position_text(point: Point) -> String {
    format!("({}, {})", point.x, point.y)
}

pub struct ImageViewer {
    bitmap: Option<RgbaImage>,
    selector: RegionSelector,
    readout: Option<PixelReadout>,
    status: Option<StatusMessage>,
}

impl ImageViewer {
    pub fn new(min_selection: i32) -> Self {
        Self {
            bitmap: None,
            selector: RegionSelector::new(min_selection),
            readout: None,
            status: None,
        }
    }

    pub fn with_bitmap(bitmap: RgbaImage, min_selection: i32) -> Self {
        let mut viewer = Self::new(min_selection);
        viewer.load(bitmap);
        viewer
    }

    /// Replace the displayed bitmap. Any gesture in progress is dropped.
    pub fn load(&mut self, bitmap: RgbaImage) {
        self.bitmap = Some(bitmap);
        self.selector.set_enabled(false);
        self.readout = None;
    }

    pub fn bitmap(&self) -> Option<&RgbaImage> {
        self.bitmap.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn bitmap_size(&self) -> Option<Size> {
        self.bitmap.as_ref().map(Size::of)
    }

    pub fn selection_mode(&self) -> bool {
        self.selector.is_enabled()
    }

    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selector.set_enabled(enabled);
        let text = if enabled {
            "Region zoom: drag to select an area"
        } else {
            "Region zoom cancelled"
        };
        self.status = Some(StatusMessage::new(text, MODE_MESSAGE_SECS));
    }

    pub fn is_selecting(&self) -> bool {
        self.selector.is_dragging()
    }

    /// Live rubber-band rectangle in widget space.
    pub fn selection_feedback(&self) -> Option<Rect> {
        self.selector.feedback()
    }

    pub fn readout(&self) -> Option<PixelReadout> {
        self.readout
    }

    /// Hand the latest status message to the UI, clearing it here.
    pub fn take_status(&mut self) -> Option<StatusMessage> {
        self.status.take()
    }

    pub fn pointer_pressed(&mut self, point: Point, button: PointerButton) {
        if self.selector.press(point, button) {
            return;
        }
        self.status = Some(StatusMessage::new(
            format!("{}: {}", button.label(), position_text(point)),
            POINTER_MESSAGE_SECS,
        ));
    }

    /// Hover and drag movement. The readout follows the cursor whenever it is
    /// over the image, with or without a gesture.
    pub fn pointer_moved(&mut self, point: Point, widget: Size) {
        if let Some(bitmap) = &self.bitmap
            && let Some((x, y)) = pixel_at(point, widget, bitmap)
        {
            self.readout = Some(PixelReadout {
                x,
                y,
                gray: gray_value(*bitmap.get_pixel(x, y)),
            });
        }
        self.selector.move_to(point);
    }

    /// End of a press. In selection mode a primary release always leaves the
    /// mode; a large enough selection that overlaps the bitmap becomes a
    /// [`PendingZoom`].
    pub fn pointer_released(&mut self, point: Point, button: PointerButton, widget: Size) -> Option<PendingZoom> {
        if !(self.selector.is_enabled() && button == PointerButton::Primary) {
            self.status = Some(StatusMessage::new(
                format!("Released: {}", position_text(point)),
                POINTER_MESSAGE_SECS,
            ));
            return None;
        }

        let selected = self.selector.release(point, button);
        self.set_selection_mode(false);

        let bitmap_size = self.bitmap_size()?;
        let rect = rect_to_bitmap_space(selected?, widget, bitmap_size)?;
        let region = clamp_rect(rect, bitmap_size)?;
        Some(PendingZoom { region })
    }

    pub fn double_clicked(&mut self, point: Point) {
        self.status = Some(StatusMessage::new(
            format!("Double click: {}", position_text(point)),
            POINTER_MESSAGE_SECS,
        ));
    }

    /// Crop the pending region and scale it. The result shares nothing with
    /// this viewer's bitmap.
    pub fn zoom_region(&self, pending: &PendingZoom, ratio: ZoomRatio, interp: Interpolation) -> Option<RgbaImage> {
        let region = extract(self.bitmap.as_ref()?, pending.region)?;
        Some(scale(&region, ratio, interp))
    }
}
