//! Shotframe Capture Engine
//!
//! Produces [`SourceImage`]s for the editor. A source is either a local
//! image file or a page screenshot requested from a remote capture service.
//!
//! ```text
//!   "shot.png" ──► FileSource ─────┐
//!                                  ├──► decode_image ──► SourceImage
//!   "https://…" ──► RemoteCapture ─┘
//! ```

pub mod remote;
pub mod source;

pub use remote::RemoteCapture;
pub use source::*;

use shotframe_common::config::CaptureConfig;

/// Pick a source for a command-line argument: `http(s)` URLs go through
/// remote capture, anything else is treated as a file path.
pub fn open_source(input: &str, capture: &CaptureConfig) -> Box<dyn ImageSource> {
    if is_remote(input) {
        Box::new(RemoteCapture::new(capture.clone(), input))
    } else {
        Box::new(FileSource::new(input))
    }
}

/// Whether `input` names a web page rather than a local file.
pub fn is_remote(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
