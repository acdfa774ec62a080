//! Launch-time settings.
//!
//! Every tunable lives in [`PainterConfig`]; the command line can override a
//! few of them. Nothing here changes while the program runs.

use std::path::PathBuf;

use clap::Parser;

use crate::types::Rgb;

/// Height of the header image drawn over the top of every frame.
pub const HEADER_HEIGHT: usize = 86;

/// Fingertips above this row (y < 78) are over the toolbar.
pub const TOOLBAR_BAND_Y: i32 = 78;

/// Stroke thickness range accepted from the command line.
pub const MIN_THICKNESS: u32 = 1;
pub const MAX_THICKNESS: u32 = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct PainterConfig {
    pub camera_index: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Only one hand is ever tracked.
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub brush_thickness: u32,
    pub eraser_thickness: u32,
    /// Radius of the disc drawn under the fingertip.
    pub cursor_radius: i32,
    /// Paint canvas pixels brighter than this replace the live frame.
    pub mask_threshold: u8,
    pub header_height: usize,
    pub toolbar_band_y: i32,
    /// Color active before anything is picked from the toolbar.
    pub initial_color: Rgb,
    /// Dots and bones of the detected hand over the live frame.
    pub draw_landmarks: bool,
    pub header_dir: Option<PathBuf>,
    /// Command line of the external landmark detector; `None` drives the hand with the mouse.
    pub detector_command: Option<String>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            frame_width: 640,
            frame_height: 480,
            max_hands: 1,
            min_detection_confidence: 0.85,
            min_tracking_confidence: 0.5,
            brush_thickness: 12,
            eraser_thickness: 50,
            cursor_radius: 15,
            mask_threshold: 50,
            header_height: HEADER_HEIGHT,
            toolbar_band_y: TOOLBAR_BAND_Y,
            initial_color: Rgb::new(254, 254, 254),
            draw_landmarks: true,
            header_dir: None,
            detector_command: None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gesture-painter")]
#[command(version, about = "Paint over your webcam feed with hand gestures")]
pub struct Cli {
    /// Camera device index
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Directory holding the seven toolbar header images (sorted by file name)
    #[arg(long, value_name = "DIR")]
    pub header_dir: Option<PathBuf>,

    /// Landmark detector command; reads frames on stdin, writes JSON lines.
    /// Without it, hold the left mouse button to draw and the right one to select.
    #[arg(long, value_name = "CMD")]
    pub detector: Option<String>,

    /// Minimum hand detection confidence (0..1)
    #[arg(long)]
    pub min_detection_confidence: Option<f32>,

    /// Brush stroke thickness in pixels
    #[arg(long)]
    pub brush_thickness: Option<u32>,

    /// Eraser stroke thickness in pixels
    #[arg(long)]
    pub eraser_thickness: Option<u32>,

    /// Hide the hand landmark overlay
    #[arg(long)]
    pub no_landmarks: bool,
}

impl Cli {
    /// Overlay the flags on the defaults.
    pub fn into_config(self) -> PainterConfig {
        let mut cfg = PainterConfig {
            camera_index: self.camera,
            frame_width: self.width,
            frame_height: self.height,
            header_dir: self.header_dir,
            detector_command: self.detector,
            draw_landmarks: !self.no_landmarks,
            ..PainterConfig::default()
        };
        if let Some(c) = self.min_detection_confidence {
            cfg.min_detection_confidence = c.clamp(0.0, 1.0);
        }
        if let Some(t) = self.brush_thickness {
            cfg.brush_thickness = t.clamp(MIN_THICKNESS, MAX_THICKNESS);
        }
        if let Some(t) = self.eraser_thickness {
            cfg.eraser_thickness = t.clamp(MIN_THICKNESS, MAX_THICKNESS);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cfg = Cli::parse_from(["gesture-painter"]).into_config();
        assert_eq!(cfg, PainterConfig::default());
    }

    #[test]
    fn flags_override_and_clamp() {
        let cfg = Cli::parse_from([
            "gesture-painter",
            "--camera",
            "2",
            "--detector",
            "python3 hand_detect.py",
            "--min-detection-confidence",
            "1.5",
            "--brush-thickness",
            "0",
            "--eraser-thickness",
            "200000",
            "--no-landmarks",
        ])
        .into_config();
        assert_eq!(cfg.camera_index, 2);
        assert_eq!(cfg.detector_command.as_deref(), Some("python3 hand_detect.py"));
        assert_eq!(cfg.min_detection_confidence, 1.0);
        assert_eq!(cfg.brush_thickness, 1);
        assert_eq!(cfg.eraser_thickness, MAX_THICKNESS);
        assert!(!cfg.draw_landmarks);
    }
}
