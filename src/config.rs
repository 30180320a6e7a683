//! Runtime settings, built from defaults plus command-line overrides.
//!
//! Settings live for one session only; nothing is written back to disk.

use image::Rgba;
use log::LevelFilter;

use crate::canvas::{DEFAULT_PEN_COLOR, DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH, MIN_PEN_WIDTH, Pen};
use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::ops::resample::{Interpolation, ZoomRatio};
use crate::ops::selection::DEFAULT_MIN_SELECTION;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub min_selection: i32,
    pub default_ratio: ZoomRatio,
    pub pen: Pen,
    pub interpolation: Interpolation,
    pub log_level: LevelFilter,
    /// Initial inner size of the main window.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_selection: DEFAULT_MIN_SELECTION,
            default_ratio: ZoomRatio::default(),
            pen: Pen::new(DEFAULT_PEN_COLOR, DEFAULT_PEN_WIDTH),
            interpolation: Interpolation::default(),
            log_level: LevelFilter::Info,
            window_size: [1024.0, 768.0],
        }
    }
}

impl Settings {
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut settings = Settings {
            log_level: args.log_level,
            ..Settings::default()
        };

        if let Some(ratio) = args.ratio {
            settings.default_ratio = ZoomRatio::new(ratio)?;
        }
        if let Some(width) = args.pen_width {
            if !(MIN_PEN_WIDTH..=MAX_PEN_WIDTH).contains(&width) {
                return Err(ConfigError::PenWidthOutOfRange(width));
            }
            settings.pen.width = width;
        }
        if let Some(color) = &args.pen_color {
            settings.pen.color = parse_hex_color(color)?;
        }
        if let Some(min) = args.min_selection {
            if min < 1 {
                return Err(ConfigError::InvalidMinSelection(min));
            }
            settings.min_selection = min;
        }
        if let Some(name) = &args.interpolation {
            settings.interpolation = name.parse().map_err(ConfigError::InvalidInterpolation)?;
        }
        Ok(settings)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into an opaque color.
pub fn parse_hex_color(text: &str) -> Result<Rgba<u8>, ConfigError> {
    let invalid = || ConfigError::InvalidColor(text.to_string());
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Result<Settings, ConfigError> {
        let args = CliArgs::try_parse_from(std::iter::once("zoomfe").chain(argv.iter().copied())).unwrap();
        Settings::from_args(&args)
    }

    #[test]
    fn defaults_without_flags() {
        let s = parse(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.default_ratio.get(), 2.0);
        assert_eq!(s.pen, Pen::new(Rgba([255, 0, 0, 255]), 3));
        assert_eq!(s.min_selection, 10);
    }

    #[test]
    fn flags_override_defaults() {
        let s = parse(&[
            "in.png",
            "--ratio", "3.5",
            "--pen-color", "#00FF80",
            "--pen-width", "7",
            "--min-selection", "4",
            "--interpolation", "nearest",
            "--log-level", "debug",
        ])
        .unwrap();
        assert_eq!(s.default_ratio.get(), 3.5);
        assert_eq!(s.pen.color, Rgba([0, 255, 128, 255]));
        assert_eq!(s.pen.width, 7);
        assert_eq!(s.min_selection, 4);
        assert_eq!(s.interpolation, Interpolation::Nearest);
        assert_eq!(s.log_level, LevelFilter::Debug);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(parse(&["--ratio", "12"]), Err(ConfigError::RatioOutOfRange(12.0)));
        assert_eq!(parse(&["--pen-width", "51"]), Err(ConfigError::PenWidthOutOfRange(51)));
        assert_eq!(parse(&["--min-selection", "0"]), Err(ConfigError::InvalidMinSelection(0)));
        assert!(matches!(parse(&["--interpolation", "cubic"]), Err(ConfigError::InvalidInterpolation(_))));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#102030"), Ok(Rgba([16, 32, 48, 255])));
        assert_eq!(parse_hex_color("ffffff"), Ok(Rgba([255, 255, 255, 255])));
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#12345g").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }
}
