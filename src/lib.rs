//! Paint over a live camera feed with hand gestures.
//!
//! Raise the index finger to draw; raise index and middle to pick a color,
//! the eraser, or clear from the toolbar along the top of the frame.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod draw;
pub mod error;
pub mod fingers;
pub mod gesture;
pub mod landmarks;
pub mod toolbar;
pub mod types;

pub use canvas::{Compositor, Segment};
pub use config::PainterConfig;
pub use error::Error;
pub use gesture::{ApplicationState, FrameReport, GestureMode, Tool};
pub use landmarks::LandmarkSet;
pub use types::{FrameBuffer, Point, Rgb};
