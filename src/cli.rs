// ============================================================================
// ZoomFE command line: startup files and configuration overrides
// ============================================================================
//
// Usage examples:
//   zoomfe photo.png
//   zoomfe scan.bmp --ratio 4.0 --pen-color "#00ff00" --pen-width 5
//   zoomfe --interpolation nearest --log-level debug
//
// Every flag only seeds the interactive session; nothing is processed
// without the GUI.

use std::path::PathBuf;

use clap::Parser;

/// Image viewer with region zoom and freehand annotation.
#[derive(Parser, Debug)]
#[command(name = "zoomfe", version, about = "Image viewer with region zoom and freehand annotation")]
pub struct CliArgs {
    /// Image files to open at startup. The first goes into the main window,
    /// each further file opens its own viewer.
    #[arg(value_name = "IMAGE")]
    pub files: Vec<PathBuf>,

    /// Initial value of the magnification prompt (0.1–10.0).
    #[arg(short, long, value_name = "RATIO")]
    pub ratio: Option<f64>,

    /// Default pen color for annotation windows, as #rrggbb.
    #[arg(long, value_name = "#RRGGBB")]
    pub pen_color: Option<String>,

    /// Default pen width for annotation windows (1–50).
    #[arg(long, value_name = "PX")]
    pub pen_width: Option<u32>,

    /// Drags no larger than this many pixels in either direction are ignored.
    #[arg(long, value_name = "PX")]
    pub min_selection: Option<i32>,

    /// Resampling policy: smooth or nearest.
    #[arg(long, value_name = "MODE")]
    pub interpolation: Option<String>,

    /// Log level written to the session log: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}
