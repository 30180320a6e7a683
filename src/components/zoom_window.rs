// ============================================================================
// ZOOM WINDOW: floating window around one AnnotationCanvas
// ============================================================================

use eframe::egui;
use uuid::Uuid;

use super::dialogs::ColorDialog;
use super::pointer::{self, PointerEvent};
use super::{paint_texture, upload_texture};
use crate::canvas::{AnnotationCanvas, MAX_PEN_WIDTH, MIN_PEN_WIDTH};
use crate::ops::selection::PointerButton;

/// Requests the window cannot fulfil on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomWindowAction {
    SaveAs,
}

pub struct ZoomWindow {
    pub id: Uuid,
    pub title: String,
    pub open: bool,
    canvas: AnnotationCanvas,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
    color_dialog: ColorDialog,
}

impl ZoomWindow {
    pub fn new(title: String, canvas: AnnotationCanvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            open: true,
            canvas,
            texture: None,
            uploaded_revision: None,
            color_dialog: ColorDialog::default(),
        }
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    /// Default file name offered by the save dialog.
    pub fn suggested_file_name(&self) -> String {
        let size = self.canvas.size();
        format!("zoom_{}x{}.png", size.width, size.height)
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<ZoomWindowAction> {
        let mut action = None;
        let mut open = self.open;

        egui::Window::new(self.title.as_str())
            .id(egui::Id::new(self.id))
            .open(&mut open)
            .default_size([800.0, 600.0])
            .resizable(true)
            .show(ctx, |ui| {
                action = self.toolbar(ui);
                ui.separator();
                egui::ScrollArea::both()
                    .drag_to_scroll(false)
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.image_area(ui));
            });

        if !open {
            // Closing mid-stroke must not leave a dangling stroke behind.
            self.canvas.set_drawing_mode(false);
        }
        self.open = open;

        if let Some(color) = self.color_dialog.show(ctx, egui::Id::new(("pen_color", self.id))) {
            self.canvas.set_pen_color(color);
        }
        action
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) -> Option<ZoomWindowAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            if ui.button("Save As…").on_hover_text("Save the annotated image").clicked() {
                action = Some(ZoomWindowAction::SaveAs);
            }
            ui.separator();

            let mut drawing = self.canvas.drawing_mode();
            if ui
                .toggle_value(&mut drawing, "Draw Mode")
                .on_hover_text("Enable freehand drawing")
                .changed()
            {
                self.canvas.set_drawing_mode(drawing);
            }

            let pen = self.canvas.pen();
            let [r, g, b, _] = pen.color.0;
            let swatch = egui::RichText::new("■").color(egui::Color32::from_rgb(r, g, b));
            if ui.button(swatch).on_hover_text("Choose pen color").clicked() {
                self.color_dialog.open_with(pen.color);
            }

            let mut width = pen.width;
            if ui
                .add(
                    egui::DragValue::new(&mut width)
                        .clamp_range(MIN_PEN_WIDTH..=MAX_PEN_WIDTH)
                        .prefix("Pen width: "),
                )
                .changed()
            {
                self.canvas.set_pen_width(width);
            }
        });
        action
    }

    fn image_area(&mut self, ui: &mut egui::Ui) {
        if self.uploaded_revision != Some(self.canvas.revision()) {
            let name = format!("zoom_{}", self.id);
            upload_texture(
                ui.ctx(),
                &name,
                &mut self.texture,
                self.canvas.buffer(),
                egui::TextureOptions::NEAREST,
            );
            self.uploaded_revision = Some(self.canvas.revision());
        }

        let size = self.canvas.size();
        let display = egui::vec2(size.width as f32, size.height as f32);
        let (rect, response) = ui.allocate_exact_size(display, egui::Sense::click_and_drag());
        if let Some(texture) = &self.texture {
            paint_texture(ui.painter(), texture, rect);
        }
        if self.canvas.drawing_mode() && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        for event in pointer::collect(ui, rect, response.hovered(), self.canvas.is_drawing()) {
            match event {
                PointerEvent::Pressed(p, PointerButton::Primary) => {
                    self.canvas.begin_stroke(p);
                }
                PointerEvent::Moved(p) => {
                    self.canvas.extend_stroke(p);
                }
                PointerEvent::Released(_, PointerButton::Primary) => {
                    self.canvas.end_stroke();
                }
                _ => {}
            }
        }

        if self.uploaded_revision != Some(self.canvas.revision()) {
            ui.ctx().request_repaint();
        }
    }
}
