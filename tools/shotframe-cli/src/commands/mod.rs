pub mod capture;
pub mod compose;
pub mod config;
pub mod crop;
pub mod info;

use std::path::{Path, PathBuf};

use shotframe_capture_engine::open_source;
use shotframe_common::config::AppConfig;
use shotframe_editor_model::SourceImage;
use shotframe_render_engine::export::write_export;

/// Load an image argument through the matching source.
pub async fn load_image(input: &str, config: &AppConfig) -> anyhow::Result<SourceImage> {
    let source = open_source(input, &config.capture);
    println!("Loading {}", source.describe());
    source
        .fetch()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load {input}: {e}"))
}

/// Write PNG bytes to `output`, or to a timestamped file in the exports
/// directory when no output was given.
pub fn write_png(bytes: &[u8], output: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    let path = match output {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", path.display()))?;
            write_export(bytes, dir, Some(name))?
        }
        None => write_export(bytes, &config.exports_dir, None)?,
    };
    Ok(path)
}
