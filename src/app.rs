use std::path::{Path, PathBuf};

use eframe::egui;
use uuid::Uuid;

use crate::canvas::AnnotationCanvas;
use crate::components::dialogs::{MessageDialog, RatioChoice, RatioDialog};
use crate::components::zoom_window::{ZoomWindow, ZoomWindowAction};
use crate::config::Settings;
use crate::io::{FileHandler, load_image};
use crate::project::{ViewerAction, ViewerWindow};

const SHORTCUT_OPEN: egui::KeyboardShortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
const SHORTCUT_QUIT: egui::KeyboardShortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
const SHORTCUT_REGION_ZOOM: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);

pub struct ZoomFEApp {
    settings: Settings,
    file_handler: FileHandler,
    /// Viewer hosted in the main window's central panel.
    primary: ViewerWindow,
    /// Further viewers, each in its own floating window.
    viewers: Vec<ViewerWindow>,
    zoom_windows: Vec<ZoomWindow>,
    ratio_dialog: RatioDialog,
    message: MessageDialog,
}

impl ZoomFEApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings, files: Vec<PathBuf>) -> Self {
        let mut app = Self::with_settings(settings);
        for path in files {
            app.open_path(&path);
        }
        app
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            primary: ViewerWindow::empty(settings.min_selection),
            ratio_dialog: RatioDialog::new(settings.default_ratio),
            file_handler: FileHandler::new(),
            viewers: Vec::new(),
            zoom_windows: Vec::new(),
            message: MessageDialog::default(),
            settings,
        }
    }

    // ========================================================================
    // VIEWERS
    // ========================================================================

    fn viewer_mut(&mut self, id: Uuid) -> Option<&mut ViewerWindow> {
        if self.primary.id == id {
            return Some(&mut self.primary);
        }
        self.viewers.iter_mut().find(|v| v.id == id)
    }

    fn viewer(&self, id: Uuid) -> Option<&ViewerWindow> {
        std::iter::once(&self.primary).chain(self.viewers.iter()).find(|v| v.id == id)
    }

    /// The viewer pressed most recently; the primary one until another is used.
    fn active_viewer_id(&self) -> Uuid {
        self.viewers
            .iter()
            .filter(|v| v.open)
            .fold(&self.primary, |best, v| if v.last_used > best.last_used { v } else { best })
            .id
    }

    fn handle_open_file(&mut self) {
        if let Some(path) = self.file_handler.pick_open_path() {
            self.open_path(&path);
        }
    }

    /// Load `path` into the primary viewer, or into a new viewer window once
    /// the primary one already shows an image.
    fn open_path(&mut self, path: &Path) {
        match load_image(path) {
            Ok(bitmap) => {
                log::info!(
                    "Opened {} ({}x{})",
                    path.display(),
                    bitmap.width(),
                    bitmap.height()
                );
                if self.primary.viewer.has_image() {
                    self.viewers.push(ViewerWindow::from_file(
                        path.to_path_buf(),
                        bitmap,
                        self.settings.min_selection,
                    ));
                } else {
                    self.primary.set_image(path.to_path_buf(), bitmap);
                }
            }
            Err(e) => {
                log::error!("Open failed: {}", e);
                self.message.error("Open Failed", e.to_string());
            }
        }
    }

    fn duplicate_viewer(&mut self, id: Uuid) {
        let min_selection = self.settings.min_selection;
        let Some(copy) = self.viewer(id).filter(|v| v.viewer.has_image()).map(|v| v.duplicate(min_selection)) else {
            return;
        };
        log::info!("Duplicated viewer {}", copy.name);
        self.viewers.push(copy);
    }

    fn handle_viewer_action(&mut self, id: Uuid, action: ViewerAction) {
        match action {
            ViewerAction::Duplicate => self.duplicate_viewer(id),
            ViewerAction::Zoom(pending) => {
                self.ratio_dialog.request(id, pending);
            }
        }
    }

    // ========================================================================
    // ZOOM WINDOWS
    // ========================================================================

    fn open_zoom_window(&mut self, choice: RatioChoice) {
        let interpolation = self.settings.interpolation;
        let pen = self.settings.pen;
        let Some(source) = self.viewer(choice.viewer) else {
            return;
        };
        let Some(zoomed) = source.viewer.zoom_region(&choice.pending, choice.ratio, interpolation) else {
            return;
        };
        let region = choice.pending.region;
        log::info!(
            "Zoom window: region ({}, {}) {}x{} at {} -> {}x{}",
            region.x,
            region.y,
            region.width,
            region.height,
            choice.ratio,
            zoomed.width(),
            zoomed.height()
        );
        let title = format!("{} @ {}", source.name, choice.ratio);
        self.zoom_windows.push(ZoomWindow::new(title, AnnotationCanvas::new(zoomed, pen)));
    }

    fn save_zoom_window(&mut self, index: usize) {
        let Some(window) = self.zoom_windows.get(index) else {
            return;
        };
        let Some(path) = self.file_handler.pick_save_path(&window.suggested_file_name()) else {
            return;
        };
        match window.canvas().save(&path) {
            Ok(format) => {
                self.message.info("Save Image", format!("Saved {} as {}.", path.display(), format.label()));
            }
            Err(e) => {
                log::error!("Save failed: {}", e);
                self.message.error("Save Failed", e.to_string());
            }
        }
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// True while a prompt owns the input.
    fn modal_open(&self) -> bool {
        self.ratio_dialog.open || self.message.open
    }

    /// Lock or unlock every viewer to match the prompt state.
    fn sync_modal_lock(&mut self) {
        let locked = self.modal_open();
        self.primary.locked = locked;
        for viewer in &mut self.viewers {
            viewer.locked = locked;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Shortcuts stay with the open prompt.
        if self.modal_open() {
            return;
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_OPEN)) {
            self.handle_open_file();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_REGION_ZOOM)) {
            let id = self.active_viewer_id();
            if let Some(v) = self.viewer_mut(id)
                && v.viewer.has_image()
            {
                v.toggle_selection_mode();
            }
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SHORTCUT_QUIT)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let open = egui::Button::new("Open…").shortcut_text(ctx.format_shortcut(&SHORTCUT_OPEN));
                    if ui.add_enabled(!self.modal_open(), open).clicked() {
                        ui.close_menu();
                        self.handle_open_file();
                    }
                    let active = self.active_viewer_id();
                    let can_duplicate = self.viewer(active).is_some_and(|v| v.accepts_commands());
                    if ui.add_enabled(can_duplicate, egui::Button::new("Duplicate Viewer")).clicked() {
                        ui.close_menu();
                        self.duplicate_viewer(active);
                    }
                    ui.separator();
                    let quit = egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&SHORTCUT_QUIT));
                    if ui.add(quit).clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Tools", |ui| {
                    let active = self.active_viewer_id();
                    let Some(viewer) = self.viewer_mut(active) else {
                        return;
                    };
                    let mut selecting = viewer.viewer.selection_mode();
                    let toggle = ui.add_enabled(
                        viewer.accepts_commands(),
                        egui::Checkbox::new(&mut selecting, "Region Zoom"),
                    );
                    if toggle.clicked() {
                        ui.close_menu();
                        viewer.viewer.set_selection_mode(selecting);
                    }
                    ui.label(ctx.format_shortcut(&SHORTCUT_REGION_ZOOM));
                });
            });
        });
    }
}

impl eframe::App for ZoomFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_modal_lock();
        self.handle_shortcuts(ctx);
        self.menu_bar(ctx);

        let now = ctx.input(|i| i.time);
        let mut primary_action = None;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let open = ui.add_enabled(!self.primary.locked, egui::Button::new("Open"));
                if open.on_hover_text("Open an image (Ctrl+O)").clicked() {
                    self.handle_open_file();
                }
                ui.separator();
                primary_action = self.primary.toolbar(ui);
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.primary.status_line(now));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().drag_to_scroll(false).show(ui, |ui| {
                if let Some(action) = self.primary.image_area(ui) {
                    primary_action = Some(action);
                }
            });
        });

        if let Some(action) = primary_action {
            self.handle_viewer_action(self.primary.id, action);
        }

        let actions: Vec<(Uuid, ViewerAction)> = self
            .viewers
            .iter_mut()
            .filter_map(|v| v.show_window(ctx).map(|a| (v.id, a)))
            .collect();
        for (id, action) in actions {
            self.handle_viewer_action(id, action);
        }
        self.viewers.retain(|v| v.open);

        let mut save_requests = Vec::new();
        for (index, window) in self.zoom_windows.iter_mut().enumerate() {
            if window.show(ctx) == Some(ZoomWindowAction::SaveAs) {
                save_requests.push(index);
            }
        }
        for index in save_requests {
            self.save_zoom_window(index);
        }
        self.zoom_windows.retain(|w| w.open);

        if let Some(choice) = self.ratio_dialog.show(ctx) {
            self.open_zoom_window(choice);
        }
        self.message.show(ctx);
    }
}
