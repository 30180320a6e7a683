// GUI-subsystem binary in release builds: Windows allocates no console window.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use eframe::egui;

use zoomfe::app::ZoomFEApp;
use zoomfe::cli::CliArgs;
use zoomfe::config::Settings;
use zoomfe::logger;

fn main() -> Result<(), eframe::Error> {
    let args = CliArgs::parse();
    let settings = match Settings::from_args(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ZoomFE: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize session log (overwrites previous session log)
    logger::init(settings.log_level);
    log::info!("Starting ZoomFE {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = logger::log_path() {
        log::info!("Session log: {}", path.display());
    }
    log::debug!("Settings: {:?}", settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_title("ZoomFE"),
        ..Default::default()
    };

    let files = args.files;
    eframe::run_native(
        "ZoomFE",
        options,
        Box::new(move |cc| Box::new(ZoomFEApp::new(cc, settings, files))),
    )
}
