use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use image::RgbaImage;
use uuid::Uuid;

use crate::components::pointer::{self, PointerEvent};
use crate::components::{paint_texture, upload_texture};
use crate::ops::geometry::Size;
use crate::viewer::{ImageViewer, PendingZoom};

/// Size of the blank area shown before any image is loaded.
const PLACEHOLDER_SIZE: egui::Vec2 = egui::vec2(300.0, 200.0);

/// What a viewer asks the application to do on its behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerAction {
    Duplicate,
    Zoom(PendingZoom),
}

/// Single viewer: one source bitmap plus its gesture and status state.
pub struct ViewerWindow {
    pub id: Uuid,
    /// Display name (file name, or "Untitled").
    pub name: String,
    /// `None` for viewers that were not opened from a file.
    pub path: Option<PathBuf>,
    pub open: bool,
    pub viewer: ImageViewer,
    /// `ctx` time of the last press inside this viewer; the most recent one
    /// is the active viewer.
    pub last_used: f64,
    /// Set while an application-wide prompt is open; the viewer then takes
    /// no toolbar clicks or pointer input.
    pub locked: bool,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    /// Status text and the `ctx` time at which it expires.
    status: Option<(String, f64)>,
}

impl ViewerWindow {
    pub fn empty(min_selection: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Untitled".to_string(),
            path: None,
            open: true,
            viewer: ImageViewer::new(min_selection),
            last_used: 0.0,
            locked: false,
            texture: None,
            texture_dirty: false,
            status: None,
        }
    }

    pub fn from_file(path: PathBuf, bitmap: RgbaImage, min_selection: i32) -> Self {
        let mut window = Self::empty(min_selection);
        window.set_image(path, bitmap);
        window
    }

    /// A new viewer over an independent copy of this viewer's bitmap.
    pub fn duplicate(&self, min_selection: i32) -> Self {
        let mut window = Self::empty(min_selection);
        window.name = format!("{} (copy)", self.name);
        window.path = self.path.clone();
        if let Some(bitmap) = self.viewer.bitmap() {
            window.viewer.load(bitmap.clone());
            window.texture_dirty = true;
        }
        window
    }

    pub fn set_image(&mut self, path: PathBuf, bitmap: RgbaImage) {
        self.name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        self.path = Some(path);
        self.viewer.load(bitmap);
        self.texture_dirty = true;
    }

    pub fn toggle_selection_mode(&mut self) {
        let enabled = !self.viewer.selection_mode();
        self.viewer.set_selection_mode(enabled);
    }

    /// Current status text, or `None` once it has expired.
    pub fn status_text(&self, now: f64) -> Option<&str> {
        match &self.status {
            Some((text, expires)) if now < *expires => Some(text.as_str()),
            _ => None,
        }
    }

    /// Status text plus hover readout, for a status bar.
    pub fn status_line(&self, now: f64) -> String {
        let readout = self.viewer.readout().map(|r| r.to_string());
        match (self.status_text(now), readout) {
            (Some(text), Some(readout)) => format!("{}    {}", text, readout),
            (Some(text), None) => text.to_string(),
            (None, Some(readout)) => readout,
            (None, None) => String::new(),
        }
    }

    fn pull_status(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.viewer.take_status() {
            let now = ctx.input(|i| i.time);
            self.status = Some((message.text, now + message.duration_secs));
            ctx.request_repaint_after(Duration::from_secs_f64(message.duration_secs));
        }
    }

    // ========================================================================
    // UI
    // ========================================================================

    /// Whether toolbar commands apply right now.
    pub fn accepts_commands(&self) -> bool {
        self.viewer.has_image() && !self.locked
    }

    /// Pointer events for this frame, or none while locked.
    fn pointer_events(&self, ui: &egui::Ui, rect: egui::Rect, hovered: bool) -> Vec<PointerEvent> {
        if self.locked {
            return Vec::new();
        }
        pointer::collect(ui, rect, hovered, self.viewer.is_selecting())
    }

    pub fn toolbar(&mut self, ui: &mut egui::Ui) -> Option<ViewerAction> {
        let mut action = None;
        let enabled = self.accepts_commands();
        let selecting = self.viewer.selection_mode();
        if ui
            .add_enabled(enabled, egui::SelectableLabel::new(selecting, "Region Zoom"))
            .on_hover_text("Drag a rectangle to magnify it (Ctrl+Z)")
            .clicked()
        {
            self.last_used = ui.input(|i| i.time);
            self.toggle_selection_mode();
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Duplicate"))
            .on_hover_text("Open this image in a new viewer")
            .clicked()
        {
            action = Some(ViewerAction::Duplicate);
        }
        self.pull_status(ui.ctx());
        action
    }

    /// The image, fitted into the available space, plus pointer handling.
    pub fn image_area(&mut self, ui: &mut egui::Ui) -> Option<ViewerAction> {
        if self.texture_dirty
            && let Some(bitmap) = self.viewer.bitmap()
        {
            let name = format!("viewer_{}", self.id);
            upload_texture(ui.ctx(), &name, &mut self.texture, bitmap, egui::TextureOptions::LINEAR);
            self.texture_dirty = false;
        }

        let display = match self.viewer.bitmap_size() {
            Some(size) => fit_size(size, ui.available_size()),
            None => PLACEHOLDER_SIZE,
        };
        let (rect, response) = ui.allocate_exact_size(display, egui::Sense::click_and_drag());
        let widget = Size::new(rect.width() as u32, rect.height() as u32);

        match (&self.texture, self.viewer.has_image()) {
            (Some(texture), true) => paint_texture(ui.painter(), texture, rect),
            _ => {
                ui.painter().rect_filled(rect, 0.0, egui::Color32::WHITE);
            }
        }
        if self.viewer.selection_mode() && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        let mut action = None;
        for event in self.pointer_events(ui, rect, response.hovered()) {
            match event {
                PointerEvent::Pressed(p, button) => {
                    self.last_used = ui.input(|i| i.time);
                    self.viewer.pointer_pressed(p, button);
                }
                PointerEvent::Moved(p) => self.viewer.pointer_moved(p, widget),
                PointerEvent::Released(p, button) => {
                    if let Some(pending) = self.viewer.pointer_released(p, button, widget) {
                        action = Some(ViewerAction::Zoom(pending));
                    }
                }
                PointerEvent::DoubleClicked(p) => self.viewer.double_clicked(p),
            }
        }

        if let Some(band) = self.viewer.selection_feedback() {
            let min = rect.min + egui::vec2(band.x as f32, band.y as f32);
            let band_rect = egui::Rect::from_min_size(min, egui::vec2(band.width as f32, band.height as f32));
            ui.painter()
                .rect_stroke(band_rect, 0.0, egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 120, 215)));
        }

        self.pull_status(ui.ctx());
        action
    }

    /// Secondary viewers live in their own floating window.
    pub fn show_window(&mut self, ctx: &egui::Context) -> Option<ViewerAction> {
        let mut action = None;
        let mut open = self.open;
        let now = ctx.input(|i| i.time);

        egui::Window::new(self.name.as_str())
            .id(egui::Id::new(self.id))
            .open(&mut open)
            .default_size([640.0, 480.0])
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| action = self.toolbar(ui));
                ui.separator();
                egui::TopBottomPanel::bottom(egui::Id::new(("viewer_status", self.id)))
                    .show_inside(ui, |ui| ui.label(self.status_line(now)));
                egui::CentralPanel::default().show_inside(ui, |ui| {
                    if let Some(a) = self.image_area(ui) {
                        action = Some(a);
                    }
                });
            });

        if !open {
            self.viewer.set_selection_mode(false);
        }
        self.open = open;
        action
    }
}

/// Largest size with the bitmap's aspect ratio that fits `available`,
/// never enlarging past 1:1.
fn fit_size(bitmap: Size, available: egui::Vec2) -> egui::Vec2 {
    let (w, h) = (bitmap.width.max(1) as f32, bitmap.height.max(1) as f32);
    let scale = (available.x / w).min(available.y / h).min(1.0);
    egui::vec2((w * scale).floor().max(1.0), (h * scale).floor().max(1.0))
}
