use eframe::egui;
use image::Rgba;
use uuid::Uuid;

use crate::ops::resample::{MAX_RATIO, MIN_RATIO, ZoomRatio};
use crate::viewer::PendingZoom;

fn dialog_keys(ctx: &egui::Context) -> (bool, bool) {
    let enter = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
    let esc = ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));
    (enter, esc)
}

fn ok_cancel_row(ui: &mut egui::Ui) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.horizontal(|ui| {
        ok = ui.button("OK").clicked();
        cancel = ui.button("Cancel").clicked();
    });
    (ok, cancel)
}

// ============================================================================
// MAGNIFICATION PROMPT
// ============================================================================

/// Asks for a zoom ratio for one accepted selection.
pub struct RatioDialog {
    pub open: bool,
    ratio: f64,
    target: Option<(Uuid, PendingZoom)>,
}

/// A confirmed magnification request.
pub struct RatioChoice {
    pub viewer: Uuid,
    pub pending: PendingZoom,
    pub ratio: ZoomRatio,
}

impl RatioDialog {
    pub fn new(default: ZoomRatio) -> Self {
        Self {
            open: false,
            ratio: default.get(),
            target: None,
        }
    }

    /// Open the prompt for `pending` from `viewer`. The previous ratio is
    /// kept as the starting value. Returns `false`, leaving the open prompt
    /// untouched, if a request is already waiting for an answer.
    pub fn request(&mut self, viewer: Uuid, pending: PendingZoom) -> bool {
        if self.open {
            log::debug!("Zoom request for {:?} ignored: prompt already open", pending.region);
            return false;
        }
        self.target = Some((viewer, pending));
        self.open = true;
        true
    }

    /// Show the dialog. Returns the choice on OK; Cancel or Esc drop the request.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<RatioChoice> {
        if !self.open {
            return None;
        }
        let (mut confirm, mut cancel) = dialog_keys(ctx);

        egui::Window::new("Magnification")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter magnification ratio:");
                ui.add(
                    egui::DragValue::new(&mut self.ratio)
                        .speed(0.1)
                        .clamp_range(MIN_RATIO..=MAX_RATIO)
                        .fixed_decimals(1)
                        .suffix("x"),
                );
                ui.add_space(6.0);
                let (ok, no) = ok_cancel_row(ui);
                confirm |= ok;
                cancel |= no;
            });

        if cancel {
            self.open = false;
            self.target = None;
            return None;
        }
        if confirm {
            self.open = false;
            let ratio = ZoomRatio::clamped(self.ratio);
            self.ratio = ratio.get();
            let (viewer, pending) = self.target.take()?;
            return Some(RatioChoice { viewer, pending, ratio });
        }
        None
    }
}

// ============================================================================
// PEN COLOR PROMPT
// ============================================================================

/// Modal color picker. Cancelling keeps whatever color the caller had.
pub struct ColorDialog {
    pub open: bool,
    color: egui::Color32,
}

impl Default for ColorDialog {
    fn default() -> Self {
        Self {
            open: false,
            color: egui::Color32::RED,
        }
    }
}

impl ColorDialog {
    pub fn open_with(&mut self, current: Rgba<u8>) {
        let [r, g, b, _] = current.0;
        self.color = egui::Color32::from_rgb(r, g, b);
        self.open = true;
    }

    /// `id` keeps dialogs of different zoom windows apart.
    pub fn show(&mut self, ctx: &egui::Context, id: egui::Id) -> Option<Rgba<u8>> {
        if !self.open {
            return None;
        }
        let (mut confirm, mut cancel) = dialog_keys(ctx);

        egui::Window::new("Pen Color")
            .id(id)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::color_picker::color_picker_color32(ui, &mut self.color, egui::color_picker::Alpha::Opaque);
                ui.add_space(6.0);
                let (ok, no) = ok_cancel_row(ui);
                confirm |= ok;
                cancel |= no;
            });

        if cancel {
            self.open = false;
            return None;
        }
        if confirm {
            self.open = false;
            let [r, g, b, _] = self.color.to_array();
            return Some(Rgba([r, g, b, 255]));
        }
        None
    }
}

// ============================================================================
// MESSAGE BOX
// ============================================================================

#[derive(Default)]
pub struct MessageDialog {
    pub open: bool,
    title: String,
    body: String,
    is_error: bool,
}

impl MessageDialog {
    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.set(title.into(), body.into(), false);
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.set(title.into(), body.into(), true);
    }

    fn set(&mut self, title: String, body: String, is_error: bool) {
        self.title = title;
        self.body = body;
        self.is_error = is_error;
        self.open = true;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }
        let (enter, esc) = dialog_keys(ctx);
        let mut close = enter || esc;

        egui::Window::new(self.title.as_str())
            .id(egui::Id::new("message_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if self.is_error {
                    ui.colored_label(ui.visuals().error_fg_color, self.body.as_str());
                } else {
                    ui.label(self.body.as_str());
                }
                ui.add_space(6.0);
                close |= ui.button("OK").clicked();
            });

        if close {
            self.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::geometry::Rect;

    #[test]
    fn open_prompt_keeps_its_request() {
        let mut dialog = RatioDialog::new(ZoomRatio::default());
        let first = (Uuid::new_v4(), PendingZoom { region: Rect::new(0, 0, 20, 20) });
        assert!(dialog.request(first.0, first.1));
        assert!(!dialog.request(Uuid::new_v4(), PendingZoom { region: Rect::new(5, 5, 40, 40) }));
        assert!(dialog.open);
        assert_eq!(dialog.target, Some(first));
    }

    #[test]
    fn ratio_starts_from_the_configured_default() {
        let dialog = RatioDialog::new(ZoomRatio::new(3.5).unwrap());
        assert_eq!(dialog.ratio, 3.5);
        assert!(!dialog.open);
    }
}
