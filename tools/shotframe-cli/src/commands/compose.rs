//! Frame an image and export the result.

use std::path::PathBuf;

use shotframe_common::config::AppConfig;
use shotframe_editor_model::{reduce, Action, Background, EditorState, Filter};
use shotframe_render_engine::{EditorSession, ExportOptions};

#[derive(clap::Args, Debug)]
pub struct ComposeArgs {
    /// Image file or http(s) page to capture
    pub image: String,

    /// Output file (defaults to a timestamped name in the exports directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start from a saved editor state (JSON) instead of the configured defaults
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Space around the image, in pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Inner border thickness, in pixels
    #[arg(long)]
    pub inset: Option<u32>,

    /// Drop shadow size, in pixels
    #[arg(long)]
    pub shadow: Option<u32>,

    /// Corner radius, in pixels
    #[arg(long)]
    pub radius: Option<u32>,

    /// Rotation in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub rotate: Option<f32>,

    /// Background: "none", a color, or "linear-gradient(...)"
    #[arg(long)]
    pub background: Option<String>,

    /// Filter: none|grayscale|sepia|blur|invert|brightness|contrast
    #[arg(long)]
    pub filter: Option<String>,

    /// Percentage for brightness and contrast
    #[arg(long)]
    pub amount: Option<u32>,

    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Pixel density multiplier
    #[arg(long, default_value = "1.0")]
    pub density: f32,
}

impl ComposeArgs {
    /// Edits requested on the command line, in application order.
    pub fn actions(&self) -> anyhow::Result<Vec<Action>> {
        let mut actions = Vec::new();
        if let Some(background) = &self.background {
            let background: Background = background
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid --background: {e}"))?;
            actions.push(Action::SetBackground(background));
        }
        if let Some(padding) = self.padding {
            actions.push(Action::SetPadding(padding));
        }
        if let Some(inset) = self.inset {
            actions.push(Action::SetInset(inset));
        }
        if let Some(shadow) = self.shadow {
            actions.push(Action::SetShadow(shadow));
        }
        if let Some(radius) = self.radius {
            actions.push(Action::SetCornerRadius(radius));
        }
        if let Some(rotate) = self.rotate {
            actions.push(Action::SetRotate(rotate));
        }
        match (&self.filter, self.amount) {
            (Some(name), amount) => {
                let filter = Filter::from_name(name, amount).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown filter: {name}. Use: none, grayscale, sepia, blur, invert, brightness, contrast"
                    )
                })?;
                actions.push(Action::SetFilter(filter));
            }
            (None, Some(_)) => {
                return Err(anyhow::anyhow!("--amount requires --filter"));
            }
            (None, None) => {}
        }
        Ok(actions)
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            width: self.width,
            height: self.height,
            pixel_ratio: self.density,
        }
    }
}

pub async fn run(args: ComposeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let actions = args.actions()?;

    let initial = match &args.state {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read state {}: {e}", path.display()))?;
            EditorState::from_json(&json)?
        }
        None => EditorState::from_defaults(&config.editor)?,
    };

    let image = super::load_image(&args.image, config).await?;
    println!("  Source: {}x{}", image.width(), image.height());

    // Annotations in a saved state stay attached to the new image.
    let mut state = EditorState {
        image: Some(image),
        ..initial
    };
    for action in actions {
        tracing::debug!(?action, "Applying edit");
        state = reduce(&state, action);
    }

    let mut session = EditorSession::new(state);
    session.recomposite()?;

    let options = args.export_options();
    let bytes = session
        .export(&options)?
        .ok_or_else(|| anyhow::anyhow!("Nothing to export"))?;

    if let Some(surface) = session.surface() {
        println!("  Framed: {}x{}", surface.width(), surface.height());
        let (w, h) = options.target_size(surface.width(), surface.height())?;
        println!("  Exported: {w}x{h}");
    }

    let path = super::write_png(&bytes, args.output, config)?;
    println!("Saved {}", path.display());
    Ok(())
}
