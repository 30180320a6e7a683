pub mod dialogs;
pub mod pointer;
pub mod zoom_window;

use eframe::egui;
use image::RgbaImage;

/// Upload `image` into `slot`, reusing the existing texture when there is one.
pub fn upload_texture(
    ctx: &egui::Context,
    name: &str,
    slot: &mut Option<egui::TextureHandle>,
    image: &RgbaImage,
    options: egui::TextureOptions,
) {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    );
    match slot {
        Some(handle) => handle.set(color_image, options),
        None => *slot = Some(ctx.load_texture(name, color_image, options)),
    }
}

/// Paint a full texture into `rect`.
pub fn paint_texture(painter: &egui::Painter, texture: &egui::TextureHandle, rect: egui::Rect) {
    painter.image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}
