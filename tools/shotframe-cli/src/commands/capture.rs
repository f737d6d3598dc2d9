//! Save a remote page capture as PNG.

use std::path::PathBuf;

use shotframe_capture_engine::{is_remote, ImageSource, RemoteCapture};
use shotframe_common::config::AppConfig;
use shotframe_render_engine::export::encode_image_png;

pub async fn run(url: String, output: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<()> {
    if !is_remote(&url) {
        return Err(anyhow::anyhow!("Not an http(s) URL: {url}"));
    }

    let capture = RemoteCapture::new(config.capture.clone(), url.as_str());
    println!("Requesting {}", capture.describe());

    let image = match capture.fetch().await {
        Ok(image) => image,
        Err(e) if e.is_retryable() => {
            return Err(anyhow::anyhow!("{e}. The capture service may be busy; try again."));
        }
        Err(e) => return Err(e.into()),
    };
    println!("  Captured: {}x{}", image.width(), image.height());

    let bytes = encode_image_png(image.pixels())?;
    let path = super::write_png(&bytes, output, config)?;
    println!("Saved {}", path.display());
    Ok(())
}
