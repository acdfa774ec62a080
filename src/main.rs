// What you SEE:
// • Live camera, mirrored, with the toolbar header across the top.
// • Index finger up: paint. Index + middle up: hover the toolbar to pick a
//   color, the eraser, or clear.
// • Dots and bones over the tracked hand (--no-landmarks hides them).
// • Without --detector, hold the left mouse button to paint and the right one
//   to select.
// • ESC quits.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use gesture_painter::camera::CameraCapture;
use gesture_painter::config::Cli;
use gesture_painter::detector::{LandmarkProvider, MouseHand, SubprocessDetector};
use gesture_painter::draw::{blit_top, draw_hand, Drawer};
use gesture_painter::gesture::ApplicationState;
use gesture_painter::toolbar::{HeaderSet, Toolbar};

/// Where this session's hand comes from.
enum Hands {
    Detector(SubprocessDetector),
    Mouse(MouseHand),
}

impl Hands {
    fn provider(&mut self) -> &mut dyn LandmarkProvider {
        match self {
            Hands::Detector(d) => d as &mut dyn LandmarkProvider,
            Hands::Mouse(m) => m,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Cli::parse().into_config();

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(config.camera_index, config.frame_width, config.frame_height)
        .context("Opening camera")?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);
    let mut drawer = Drawer::new("Gesture Painter", w, h)?;

    /* --- Toolbar and its header images --- */
    let toolbar = Toolbar::default();
    let headers = match &config.header_dir {
        Some(dir) => HeaderSet::load_dir(dir, w, config.header_height)
            .with_context(|| format!("Loading header images from {}", dir.display()))?,
        None => {
            info!("No --header-dir given, drawing the built-in toolbar");
            HeaderSet::builtin(&toolbar, w, config.header_height)
        }
    };

    /* --- Hand source --- */
    let mut hands = match &config.detector_command {
        Some(cmd) => Hands::Detector(SubprocessDetector::spawn(cmd, &config)?),
        None => {
            info!("No --detector given: left mouse draws, right mouse selects");
            Hands::Mouse(MouseHand::new())
        }
    };

    let mut state = ApplicationState::new(&config, toolbar, w, h);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Live frame. A dead camera ends the session.
        let mut frame = cam.next_frame().context("Camera stopped delivering frames")?;

        // 2) Find the hand.
        if let Hands::Mouse(m) = &mut hands {
            m.set_input(drawer.mouse_pos(), drawer.left_mouse_down(), drawer.right_mouse_down());
        }
        let hand = hands.provider().detect(&frame)?;
        if let (true, Some(h)) = (config.draw_landmarks, hand.as_ref()) {
            draw_hand(&mut frame, h);
        }

        // 3) Gestures: tool picks and stroke segments (drawn onto `frame` too).
        let report = state.step(&mut frame, hand.as_ref());
        state.draw_cursor(&mut frame, report.mode);

        // 4) Paint layer over the live image, then the header on top.
        state.compose_into(&mut frame)?;
        blit_top(&mut frame, headers.get(state.header()));

        // 5) Show it (this also polls the keyboard for ESC).
        drawer.present(&frame)?;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Exiting");
    Ok(())
}
