// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed

    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Failed to start landmark detector `{command}`: {source}")]
    DetectorSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Landmark detector I/O error: {0}")]
    DetectorIo(#[from] std::io::Error),

    #[error("Landmark detector protocol error: {0}")]
    DetectorProtocol(String),

    #[error("Header image {path:?}: {source}")]
    HeaderAsset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Expected {expected} header images in {dir:?}, found {found}")]
    HeaderCount { dir: PathBuf, expected: usize, found: usize },

    #[error("Frame size mismatch: expected {expected:?}, got {actual:?}")]
    FrameSize { expected: (usize, usize), actual: (usize, usize) },
}
