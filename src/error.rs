//! Error types shared by the image I/O layer and configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::canvas::{MAX_PEN_WIDTH, MIN_PEN_WIDTH};
use crate::ops::resample::{MAX_RATIO, MIN_RATIO};

/// Failures reading or writing image files.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("unsupported image format '{0}' (expected png, jpg or bmp)")]
    UnsupportedFormat(String),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid startup configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("zoom ratio {0} is outside {min}..={max}", min = MIN_RATIO, max = MAX_RATIO)]
    RatioOutOfRange(f64),

    #[error("pen width {0} is outside {min}..={max}", min = MIN_PEN_WIDTH, max = MAX_PEN_WIDTH)]
    PenWidthOutOfRange(u32),

    #[error("invalid color '{0}' (expected #rrggbb)")]
    InvalidColor(String),

    #[error("minimum selection size must be at least 1 pixel, got {0}")]
    InvalidMinSelection(i32),

    #[error("{0}")]
    InvalidInterpolation(String),
}
