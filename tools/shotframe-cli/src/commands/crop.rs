//! Crop a region of an image.

use std::path::PathBuf;

use shotframe_common::config::AppConfig;
use shotframe_editor_model::{Rect, Size};
use shotframe_render_engine::compute_crop;
use shotframe_render_engine::export::encode_image_png;

pub async fn run(
    image: String,
    (x, y, width, height): (f64, f64, f64, f64),
    (display_width, display_height): (Option<f64>, Option<f64>),
    output: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let source = super::load_image(&image, config).await?;
    let displayed = Size::new(
        display_width.unwrap_or(source.width() as f64),
        display_height.unwrap_or(source.height() as f64),
    );
    let selection = Rect::new(x, y, width, height);

    let cropped = compute_crop(source.pixels(), displayed, selection).ok_or_else(|| {
        anyhow::anyhow!("Selection {width}x{height} at ({x}, {y}) is empty or outside the image")
    })?;
    println!(
        "  Cropped: {}x{} -> {}x{}",
        source.width(),
        source.height(),
        cropped.width(),
        cropped.height()
    );

    let bytes = encode_image_png(&cropped)?;
    let path = super::write_png(&bytes, output, config)?;
    println!("Saved {}", path.display());
    Ok(())
}
