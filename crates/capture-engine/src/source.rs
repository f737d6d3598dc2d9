use std::path::{Path, PathBuf};

use shotframe_common::error::{ShotframeError, ShotframeResult};
use shotframe_editor_model::SourceImage;

/// Anything that can hand the editor a decoded image.
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// Load and decode the image.
    async fn fetch(&self) -> ShotframeResult<SourceImage>;

    /// Short human-readable description for logs and CLI output.
    fn describe(&self) -> String;
}

/// Decode encoded image bytes (PNG, JPEG, WebP, GIF, BMP) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> ShotframeResult<SourceImage> {
    if bytes.is_empty() {
        return Err(ShotframeError::decode("no image data"));
    }
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ShotframeError::decode(format!("unsupported or corrupt image: {e}")))?;
    let rgba = decoded.to_rgba8();
    tracing::debug!(
        width = rgba.width(),
        height = rgba.height(),
        bytes = bytes.len(),
        "Decoded image"
    );
    Ok(SourceImage::new(rgba))
}

/// An image file on local disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ImageSource for FileSource {
    async fn fetch(&self) -> ShotframeResult<SourceImage> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShotframeError::FileNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        decode_image(&bytes)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shotframe-source-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(7, 3)).unwrap();
        assert_eq!((image.width(), image.height()), (7, 3));
        assert_eq!(image.pixels().get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(ShotframeError::Decode { .. })
        ));
        assert!(matches!(
            decode_image(&[]),
            Err(ShotframeError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_image() {
        let path = temp_path("ok.png");
        std::fs::write(&path, png_bytes(4, 5)).unwrap();

        let image = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!((image.width(), image.height()), (4, 5));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let path = temp_path("missing.png");
        let err = FileSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, ShotframeError::FileNotFound { path: p } if p == path));
    }

    #[tokio::test]
    async fn test_file_source_corrupt_file() {
        let path = temp_path("corrupt.png");
        std::fs::write(&path, b"\x89PNG but not really").unwrap();

        let err = FileSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, ShotframeError::Decode { .. }));

        let _ = std::fs::remove_file(path);
    }
}
