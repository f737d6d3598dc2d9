//! Shotframe CLI: frame screenshots and export them as PNG.
//!
//! Usage:
//!   shotframe compose <IMAGE>    Frame an image or page capture and export it
//!   shotframe capture <URL>      Save a remote page capture as PNG
//!   shotframe crop <IMAGE>       Crop a region of an image
//!   shotframe info <IMAGE>       Show image and framed dimensions
//!   shotframe config             Show or write the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shotframe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "shotframe",
    about = "Beautify screenshots: backgrounds, padding, shadows, filters, and annotations",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frame an image (file or http(s) page) and export it as PNG
    Compose(commands::compose::ComposeArgs),

    /// Capture a web page through the remote capture service
    Capture {
        /// Page URL
        url: String,

        /// Output file (defaults to a timestamped name in the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crop a region of an image
    Crop {
        /// Image file or http(s) page
        image: String,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        #[arg(long = "w")]
        width: f64,

        #[arg(long = "h")]
        height: f64,

        /// Width the selection was made against (defaults to the image width)
        #[arg(long)]
        display_width: Option<f64>,

        /// Height the selection was made against (defaults to the image height)
        #[arg(long)]
        display_height: Option<f64>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show image dimensions and the framed output size
    Info {
        /// Image file or http(s) page
        image: String,

        /// Padding to compute the framed size with (defaults to the configured padding)
        #[arg(long)]
        padding: Option<u32>,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    shotframe_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Compose(args) => commands::compose::run(args, &config).await,
        Commands::Capture { url, output } => commands::capture::run(url, output, &config).await,
        Commands::Crop {
            image,
            x,
            y,
            width,
            height,
            display_width,
            display_height,
            output,
        } => {
            commands::crop::run(
                image,
                (x, y, width, height),
                (display_width, display_height),
                output,
                &config,
            )
            .await
        }
        Commands::Info { image, padding } => commands::info::run(image, padding, &config).await,
        Commands::Config { write } => commands::config::run(write, &config),
    }
}
