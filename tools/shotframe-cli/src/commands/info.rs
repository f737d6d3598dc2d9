//! Show image and framed dimensions.

use shotframe_common::config::AppConfig;
use shotframe_editor_model::EditorState;

pub async fn run(image: String, padding: Option<u32>, config: &AppConfig) -> anyhow::Result<()> {
    let source = super::load_image(&image, config).await?;
    println!("  Size: {}x{}", source.width(), source.height());

    let state = EditorState {
        image: Some(source),
        padding: padding.unwrap_or(config.editor.padding),
        ..EditorState::default()
    };
    println!("  Padding: {}", state.padding);
    match state.output_size() {
        Some((w, h)) => println!("  Framed: {w}x{h}"),
        None => println!("  Framed: dimensions overflow"),
    }
    Ok(())
}
