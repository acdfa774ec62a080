//! Where hand landmarks come from.
//!
//! The hand landmark model itself runs outside this program. [`SubprocessDetector`]
//! talks to it over a pipe; [`MouseHand`] fakes a hand from the mouse so the
//! painter also works without one.
//!
//! Detector protocol: the child prints `READY` once loaded. For each frame we
//! write width, height and channel count as little-endian `u32`s followed by
//! the raw RGB bytes, and the child answers with one JSON line:
//!
//! ```json
//! {"hands":[{"score":0.97,"landmarks":[{"x":0.51,"y":0.42}, ...]}],"error":null}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::PainterConfig;
use crate::error::Error;
use crate::landmarks::{LandmarkSet, LANDMARK_COUNT};
use crate::types::{FrameBuffer, Point, Rgb};

/// Something that finds at most one hand in a frame.
pub trait LandmarkProvider {
    /// Landmarks in frame pixel coordinates, or `None` when no hand is visible.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<LandmarkSet>, Error>;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one response line and keep the first hand that clears `min_score`.
fn parse_response(
    line: &str,
    min_score: f32,
    width: usize,
    height: usize,
) -> Result<Option<LandmarkSet>, Error> {
    let result: DetectionResult = serde_json::from_str(line)
        .map_err(|e| Error::DetectorProtocol(format!("bad JSON ({e}): {}", line.trim())))?;

    if let Some(error) = result.error {
        warn!("Landmark detector reported: {error}");
        return Ok(None);
    }

    for hand in result.hands {
        if hand.score < min_score {
            continue;
        }
        if hand.landmarks.len() != LANDMARK_COUNT {
            warn!("Expected {LANDMARK_COUNT} landmarks, got {}", hand.landmarks.len());
            continue;
        }
        let normalized: Vec<(f32, f32)> = hand.landmarks.iter().map(|lm| (lm.x, lm.y)).collect();
        return Ok(LandmarkSet::from_normalized(&normalized, width, height));
    }
    Ok(None)
}

/// Landmark model running in a child process.
pub struct SubprocessDetector {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
    rgb: Vec<u8>, // reused per frame
}

impl SubprocessDetector {
    /// Start `command` (split on whitespace) and wait for it to report ready.
    ///
    /// The model settings are handed to the child as environment variables.
    pub fn spawn(command: &str, config: &PainterConfig) -> Result<Self, Error> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| Error::DetectorProtocol("empty detector command".into()))?;

        info!("Starting landmark detector: {command}");
        let mut process = Command::new(program)
            .args(parts)
            .env("PAINTER_MAX_HANDS", config.max_hands.to_string())
            .env("PAINTER_MIN_DETECTION_CONFIDENCE", config.min_detection_confidence.to_string())
            .env("PAINTER_MIN_TRACKING_CONFIDENCE", config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::DetectorSpawn { command: command.to_string(), source })?;

        let stdin = process.stdin.take().ok_or_else(|| Error::DetectorProtocol("no stdin pipe".into()))?;
        let stdout = process.stdout.take().ok_or_else(|| Error::DetectorProtocol("no stdout pipe".into()))?;
        let mut stdout = BufReader::new(stdout);

        // No `Self` exists yet, so Drop won't reap the child on failure.
        if let Err(e) = read_ready(&mut stdout) {
            let _ = process.kill();
            let _ = process.wait();
            return Err(e);
        }
        info!("Landmark detector ready");

        Ok(Self { process, stdin, stdout, min_score: config.min_detection_confidence, rgb: Vec::new() })
    }
}

/// Consume the detector's first line, which must be `READY`.
fn read_ready(stdout: &mut impl BufRead) -> Result<(), Error> {
    let mut ready = String::new();
    stdout.read_line(&mut ready)?;
    if ready.trim() != "READY" {
        return Err(Error::DetectorProtocol(format!("expected READY, got {:?}", ready.trim())));
    }
    Ok(())
}

impl LandmarkProvider for SubprocessDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<LandmarkSet>, Error> {
        self.rgb.clear();
        self.rgb.reserve(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            let c = Rgb::unpack(px);
            self.rgb.extend_from_slice(&[c.r, c.g, c.b]);
        }

        self.stdin.write_all(&(frame.width as u32).to_le_bytes())?;
        self.stdin.write_all(&(frame.height as u32).to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&self.rgb)?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(Error::DetectorProtocol("detector closed its output".into()));
        }
        let hand = parse_response(&line, self.min_score, frame.width, frame.height)?;
        if let Some(h) = &hand {
            debug!("Hand at index tip {:?}", h.index_tip());
        }
        Ok(hand)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Stand-in hand driven by the mouse.
///
/// Left button held: index finger only (draws). Right button held: index and
/// middle (selects). No button: no hand.
#[derive(Default)]
pub struct MouseHand {
    pos: Option<Point>,
    left: bool,
    right: bool,
}

impl MouseHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's mouse state.
    pub fn set_input(&mut self, pos: Option<(usize, usize)>, left: bool, right: bool) {
        self.pos = pos.map(|(x, y)| Point::new(x as i32, y as i32));
        self.left = left;
        self.right = right;
    }
}

impl LandmarkProvider for MouseHand {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Option<LandmarkSet>, Error> {
        let Some(pos) = self.pos else { return Ok(None) };
        let pose = if self.right {
            [false, true, true, false, false]
        } else if self.left {
            [false, true, false, false, false]
        } else {
            return Ok(None);
        };
        Ok(Some(LandmarkSet::posed(pos, pose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingers::classify;

    fn response(score: f32, n: usize) -> String {
        let pts: Vec<String> = (0..n).map(|i| format!(r#"{{"x":{},"y":0.5}}"#, i as f32 / 40.0)).collect();
        format!(r#"{{"hands":[{{"score":{score},"landmarks":[{}]}}]}}"#, pts.join(","))
    }

    #[test]
    fn parses_and_scales_first_confident_hand() {
        let hand = parse_response(&response(0.9, 21), 0.85, 640, 480).unwrap().unwrap();
        // x = 8 / 40 * 640
        assert_eq!(hand.index_tip(), Point::new(128, 240));
    }

    #[test]
    fn skips_low_confidence_and_short_hands() {
        assert!(parse_response(&response(0.5, 21), 0.85, 640, 480).unwrap().is_none());
        assert!(parse_response(&response(0.99, 20), 0.85, 640, 480).unwrap().is_none());
    }

    #[test]
    fn empty_and_error_responses_mean_no_hand() {
        assert!(parse_response(r#"{"hands":[]}"#, 0.5, 640, 480).unwrap().is_none());
        let line = r#"{"hands":[],"error":"model not loaded"}"#;
        assert!(parse_response(line, 0.5, 640, 480).unwrap().is_none());
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        let err = parse_response("not json", 0.5, 640, 480).unwrap_err();
        assert!(matches!(err, Error::DetectorProtocol(_)));
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let err = SubprocessDetector::spawn("./definitely-not-a-detector-binary", &PainterConfig::default()).err().unwrap();
        assert!(matches!(err, Error::DetectorSpawn { .. }));
    }

    #[test]
    fn ready_line_is_required() {
        assert!(read_ready(&mut "READY\n".as_bytes()).is_ok());
        let err = read_ready(&mut "loading model\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DetectorProtocol(_)));
        let err = read_ready(&mut "".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DetectorProtocol(_)));
    }

    #[test]
    fn unreadable_ready_line_is_an_io_error() {
        // Not valid UTF-8.
        let err = read_ready(&mut &[0xff, 0xfe, b'\n'][..]).unwrap_err();
        assert!(matches!(err, Error::DetectorIo(_)));
    }

    #[cfg(unix)]
    #[test]
    fn child_that_never_says_ready_is_rejected() {
        let err = SubprocessDetector::spawn("echo nope", &PainterConfig::default()).err().unwrap();
        assert!(matches!(err, Error::DetectorProtocol(ref m) if m.contains("nope")));
    }

    #[test]
    fn mouse_buttons_pick_the_pose() {
        let frame = FrameBuffer::new(4, 4);
        let mut m = MouseHand::new();
        assert!(m.detect(&frame).unwrap().is_none());

        m.set_input(Some((100, 50)), true, false);
        let hand = m.detect(&frame).unwrap().unwrap();
        assert_eq!(hand.index_tip(), Point::new(100, 50));
        let f = classify(&hand);
        assert!(f.index() && !f.middle());

        m.set_input(Some((100, 50)), true, true);
        let f = classify(&m.detect(&frame).unwrap().unwrap());
        assert!(f.index() && f.middle());

        m.set_input(Some((100, 50)), false, false);
        assert!(m.detect(&frame).unwrap().is_none());
    }
}
