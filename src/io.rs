use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use rfd::FileDialog;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ImageIoError;

/// Extensions accepted by the open dialog.
pub const OPEN_EXTENSIONS: &[&str] = &["bmp", "png", "jpg", "jpeg"];

/// JPEG quality used for every save.
pub const JPEG_QUALITY: u8 = 90;

/// Output encodings, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl SaveFormat {
    pub fn all() -> &'static [SaveFormat] {
        &[SaveFormat::Png, SaveFormat::Jpeg, SaveFormat::Bmp]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaveFormat::Png => "PNG Files",
            SaveFormat::Jpeg => "JPEG Files",
            SaveFormat::Bmp => "BMP Files",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SaveFormat::Png => &["png"],
            SaveFormat::Jpeg => &["jpg", "jpeg"],
            SaveFormat::Bmp => &["bmp"],
        }
    }

    /// Format implied by the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<SaveFormat, ImageIoError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        SaveFormat::all()
            .iter()
            .copied()
            .find(|f| f.extensions().contains(&ext.as_str()))
            .ok_or(ImageIoError::UnsupportedFormat(ext))
    }
}

/// Decode an image file into RGBA8, whatever its stored pixel format.
pub fn load_image(path: &Path) -> Result<RgbaImage, ImageIoError> {
    let img = image::open(path).map_err(|source| ImageIoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Encode `image` in the format implied by `path` and write it out.
///
/// The format is resolved before the file is created, so an unsupported
/// extension leaves the file system untouched.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<SaveFormat, ImageIoError> {
    let format = SaveFormat::from_path(path)?;
    let write_err = |source: std::io::Error| ImageIoError::Write {
        path: path.to_path_buf(),
        source,
    };
    let encode_err = |source: image::ImageError| match source {
        image::ImageError::IoError(source) => ImageIoError::Write {
            path: path.to_path_buf(),
            source,
        },
        source => ImageIoError::Encode {
            path: path.to_path_buf(),
            source,
        },
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    match format {
        SaveFormat::Png => {
            let encoder = PngEncoder::new(&mut writer);
            #[allow(deprecated)]
            encoder
                .encode(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ColorType::Rgba8,
                )
                .map_err(encode_err)?;
        }
        SaveFormat::Jpeg => {
            // JPEG doesn't support alpha, convert to RGB
            let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder
                .encode(
                    rgb_image.as_raw(),
                    rgb_image.width(),
                    rgb_image.height(),
                    image::ColorType::Rgb8,
                )
                .map_err(encode_err)?;
        }
        SaveFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut writer);
            encoder
                .encode(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ColorType::Rgba8,
                )
                .map_err(encode_err)?;
        }
    }

    writer.flush().map_err(write_err)?;
    Ok(format)
}

// ============================================================================
// FILE HANDLER
// ============================================================================

/// Native open/save pickers. Remembers the directory of the last file so
/// consecutive dialogs start in the same place.
#[derive(Debug, Default)]
pub struct FileHandler {
    pub last_dir: Option<PathBuf>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn dialog(&self) -> FileDialog {
        let dialog = FileDialog::new();
        match &self.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember(&mut self, path: &Path) {
        self.last_dir = path.parent().map(Path::to_path_buf);
    }

    /// Show the open dialog, restricted to common raster formats.
    pub fn pick_open_path(&mut self) -> Option<PathBuf> {
        let path = self
            .dialog()
            .set_title("Open Image")
            .add_filter("Images", OPEN_EXTENSIONS)
            .add_filter("BMP", &["bmp"])
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .pick_file()?;
        self.remember(&path);
        Some(path)
    }

    /// Show the save dialog with one filter per supported output format.
    pub fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        let mut dialog = self.dialog().set_title("Save Image As").set_file_name(suggested_name);
        for format in SaveFormat::all() {
            dialog = dialog.add_filter(format.label(), format.extensions());
        }
        let path = dialog.save_file()?;
        self.remember(&path);
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(16, 9, |x, y| Rgba([(x * 15) as u8, (y * 28) as u8, 128, 255]))
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SaveFormat::from_path(Path::new("a/b.PNG")).unwrap(), SaveFormat::Png);
        assert_eq!(SaveFormat::from_path(Path::new("x.jpeg")).unwrap(), SaveFormat::Jpeg);
        assert_eq!(SaveFormat::from_path(Path::new("x.jpg")).unwrap(), SaveFormat::Jpeg);
        assert_eq!(SaveFormat::from_path(Path::new("x.bmp")).unwrap(), SaveFormat::Bmp);
        assert!(matches!(
            SaveFormat::from_path(Path::new("x.xyz")),
            Err(ImageIoError::UnsupportedFormat(ext)) if ext == "xyz"
        ));
        assert!(SaveFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn png_and_bmp_round_trip_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let img = sample();
        for name in ["out.png", "out.bmp"] {
            let path = dir.path().join(name);
            save_image(&img, &path).unwrap();
            assert_eq!(load_image(&path).unwrap(), img, "{name}");
        }
    }

    #[test]
    fn jpeg_round_trip_is_close() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::from_pixel(16, 16, Rgba([90, 160, 30, 255]));
        let path = dir.path().join("out.jpg");
        assert_eq!(save_image(&img, &path).unwrap(), SaveFormat::Jpeg);
        let back = load_image(&path).unwrap();
        assert_eq!(back.dimensions(), img.dimensions());
        for (a, b) in img.pixels().zip(back.pixels()) {
            for c in 0..3 {
                assert!((a[c] as i32 - b[c] as i32).abs() <= 8, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        assert!(matches!(save_image(&sample(), &path), Err(ImageIoError::UnsupportedFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(save_image(&sample(), &path), Err(ImageIoError::Write { .. })));
    }

    #[test]
    fn decode_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_image(&path), Err(ImageIoError::Decode { .. })));
    }
}
