//! Turns one frame of hand landmarks into tool changes and stroke segments.
//!
//! The mode is worked out from scratch every frame from which fingers are up:
//!
//! | index | middle | mode      |
//! |-------|--------|-----------|
//! | up    | up     | Selecting |
//! | up    | down   | Drawing   |
//! | other |        | Idle      |
//!
//! Only the active tool, the header shown, and the stroke anchor carry over
//! between frames. Any frame that is not Drawing drops the anchor, so the
//! next Drawing frame starts a new stroke instead of joining the old one.

use log::debug;

use crate::canvas::{Compositor, Segment};
use crate::config::{PainterConfig, MAX_THICKNESS, MIN_THICKNESS};
use crate::error::Error;
use crate::fingers::classify;
use crate::landmarks::LandmarkSet;
use crate::toolbar::{Toolbar, ToolbarAction, HEADER_NONE};
use crate::types::{FrameBuffer, Point, Rgb};

/// What the fingertip paints with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Color(Rgb),
    /// Paints black, which the compositor treats as "nothing painted".
    Eraser,
}

impl Tool {
    pub fn paint_color(self) -> Rgb {
        match self {
            Tool::Color(c) => c,
            Tool::Eraser => Rgb::BLACK,
        }
    }
}

/// Mode chosen for one frame, with the index fingertip where there is one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Selecting { at: Point },
    Drawing { at: Point },
}

impl GestureMode {
    pub fn fingertip(self) -> Option<Point> {
        match self {
            GestureMode::Idle => None,
            GestureMode::Selecting { at } | GestureMode::Drawing { at } => Some(at),
        }
    }
}

/// Everything `step` did this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub mode: GestureMode,
    /// Segment committed to the canvas, if any.
    pub segment: Option<Segment>,
    /// Toolbar entry that fired, if any.
    pub action: Option<ToolbarAction>,
}

impl FrameReport {
    fn idle() -> Self {
        Self { mode: GestureMode::Idle, segment: None, action: None }
    }
}

/// State owned by the frame loop and threaded through every frame.
pub struct ApplicationState {
    tool: Tool,
    header: usize,
    anchor: Option<Point>,
    compositor: Compositor,
    toolbar: Toolbar,
    brush_thickness: u32,
    eraser_thickness: u32,
    toolbar_band_y: i32,
    cursor_radius: i32,
}

impl ApplicationState {
    /// Fresh session for `width` x `height` frames: blank canvas, no selection.
    pub fn new(config: &PainterConfig, toolbar: Toolbar, width: usize, height: usize) -> Self {
        Self {
            tool: Tool::Color(config.initial_color),
            header: HEADER_NONE,
            anchor: None,
            compositor: Compositor::new(width, height, config.mask_threshold),
            toolbar,
            brush_thickness: config.brush_thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            eraser_thickness: config.eraser_thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            toolbar_band_y: config.toolbar_band_y,
            cursor_radius: config.cursor_radius,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Index of the header image to show.
    pub fn header(&self) -> usize {
        self.header
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Run one frame. `frame` is the live image; stroke segments are drawn on
    /// it as well as on the canvas.
    pub fn step(&mut self, frame: &mut FrameBuffer, hand: Option<&LandmarkSet>) -> FrameReport {
        let Some(hand) = hand else {
            self.anchor = None;
            return FrameReport::idle();
        };

        let fingers = classify(hand);
        let at = hand.index_tip();

        if fingers.index() && fingers.middle() {
            self.anchor = None;
            let action = if at.y < self.toolbar_band_y { self.select(at.x) } else { None };
            FrameReport { mode: GestureMode::Selecting { at }, segment: None, action }
        } else if fingers.index() {
            let segment = self.stroke_to(frame, at);
            FrameReport { mode: GestureMode::Drawing { at }, segment, action: None }
        } else {
            self.anchor = None;
            FrameReport::idle()
        }
    }

    /// Apply whatever toolbar entry sits at `x`.
    fn select(&mut self, x: i32) -> Option<ToolbarAction> {
        let entry = *self.toolbar.resolve(x)?;
        self.header = entry.header;
        match entry.action {
            ToolbarAction::Color(c) => self.tool = Tool::Color(c),
            ToolbarAction::Eraser => self.tool = Tool::Eraser,
            ToolbarAction::Clear => self.compositor.clear(),
        }
        debug!("Toolbar hit at x={x}: {:?}", entry.action);
        Some(entry.action)
    }

    /// Extend the current stroke to `at`. The first point of a stroke only
    /// sets the anchor.
    fn stroke_to(&mut self, frame: &mut FrameBuffer, at: Point) -> Option<Segment> {
        let from = self.anchor.replace(at)?;
        let thickness = match self.tool {
            Tool::Eraser => self.eraser_thickness,
            Tool::Color(_) => self.brush_thickness,
        };
        let seg = Segment { from, to: at, color: self.tool.paint_color(), thickness };
        self.compositor.draw_segment(frame, &seg);
        Some(seg)
    }

    /// Disc under the fingertip in the active color.
    pub fn draw_cursor(&self, frame: &mut FrameBuffer, mode: GestureMode) {
        if let Some(at) = mode.fingertip() {
            crate::draw::fill_circle(frame, at, self.cursor_radius, self.tool.paint_color());
        }
    }

    /// Put the paint canvas over `frame`.
    pub fn compose_into(&self, frame: &mut FrameBuffer) -> Result<(), Error> {
        self.compositor.compose_into(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::{GREEN, RED};

    const W: usize = 640;
    const H: usize = 480;

    const DRAW: [bool; 5] = [false, true, false, false, false];
    const SELECT: [bool; 5] = [false, true, true, false, false];

    fn state() -> ApplicationState {
        ApplicationState::new(&PainterConfig::default(), Toolbar::default(), W, H)
    }

    fn run(st: &mut ApplicationState, fingers: [bool; 5], x: i32, y: i32) -> FrameReport {
        let mut frame = FrameBuffer::new(W, H);
        st.step(&mut frame, Some(&LandmarkSet::posed(Point::new(x, y), fingers)))
    }

    #[test]
    fn no_hand_is_idle_and_drops_anchor() {
        let mut st = state();
        run(&mut st, DRAW, 100, 200);
        assert!(st.anchor().is_some());

        let mut frame = FrameBuffer::new(W, H);
        let r = st.step(&mut frame, None);
        assert_eq!(r, FrameReport::idle());
        assert_eq!(st.anchor(), None);
    }

    #[test]
    fn index_and_middle_up_selects_whatever_the_rest_do() {
        for rest in 0u8..8 {
            let f = [rest & 1 != 0, true, true, rest & 2 != 0, rest & 4 != 0];
            let mut st = state();
            let r = run(&mut st, f, 300, 300);
            assert_eq!(r.mode, GestureMode::Selecting { at: Point::new(300, 300) });
        }
    }

    #[test]
    fn other_combinations_are_idle() {
        let mut st = state();
        for f in [[false; 5], [false, false, true, false, false], [true, false, false, true, true]] {
            run(&mut st, DRAW, 100, 200);
            let r = run(&mut st, f, 120, 200);
            assert_eq!(r.mode, GestureMode::Idle);
            assert_eq!(r.segment, None);
            assert_eq!(st.anchor(), None);
        }
        assert!(st.compositor().is_blank());
    }

    #[test]
    fn first_drawing_frame_only_seeds_the_anchor() {
        let mut st = state();
        let r = run(&mut st, DRAW, 100, 200);
        assert_eq!(r.mode, GestureMode::Drawing { at: Point::new(100, 200) });
        assert_eq!(r.segment, None);
        assert!(st.compositor().is_blank());
        assert_eq!(st.anchor(), Some(Point::new(100, 200)));

        let r = run(&mut st, DRAW, 130, 200);
        let seg = r.segment.expect("second frame draws");
        assert_eq!((seg.from, seg.to), (Point::new(100, 200), Point::new(130, 200)));
        assert_eq!(seg.thickness, 12);
        assert!(!st.compositor().is_blank());
    }

    #[test]
    fn stroke_to_a_far_off_frame_fingertip() {
        let mut st = state();
        run(&mut st, DRAW, 100, 200);

        // Detector output far outside [0, 1], same hand shape.
        let posed = LandmarkSet::posed(Point::new(300, 200), DRAW);
        let norm: Vec<(f32, f32)> =
            posed.iter().map(|lm| (lm.pos.x as f32 / W as f32 - 1.0e7, lm.pos.y as f32 / H as f32)).collect();
        let wild = LandmarkSet::from_normalized(&norm, W, H).unwrap();

        let mut frame = FrameBuffer::new(W, H);
        let r = st.step(&mut frame, Some(&wild));
        let seg = r.segment.expect("stroke continues");
        assert_eq!(seg.from, Point::new(100, 200));
        assert_eq!(seg.to.x, -(W as i32));
        assert!((seg.to.y - 200).abs() <= 1);
        assert_eq!(frame.get(0, 200), seg.color.pack());
    }

    #[test]
    fn oversized_thickness_is_capped() {
        let cfg = PainterConfig { brush_thickness: 200_000, eraser_thickness: 0, ..PainterConfig::default() };
        let mut st = ApplicationState::new(&cfg, Toolbar::default(), W, H);
        run(&mut st, DRAW, 100, 200);
        let seg = run(&mut st, DRAW, 110, 200).segment.unwrap();
        assert_eq!(seg.thickness, MAX_THICKNESS);

        run(&mut st, SELECT, 550, 40);
        run(&mut st, DRAW, 100, 200);
        let seg = run(&mut st, DRAW, 110, 200).segment.unwrap();
        assert_eq!(seg.thickness, MIN_THICKNESS);
    }

    #[test]
    fn anchor_at_origin_is_a_real_point() {
        let mut st = state();
        run(&mut st, DRAW, 0, 0);
        let r = run(&mut st, DRAW, 10, 0);
        assert_eq!(r.segment.map(|s| s.from), Some(Point::new(0, 0)));
    }

    #[test]
    fn selecting_breaks_the_stroke() {
        let mut st = state();
        run(&mut st, DRAW, 100, 200);
        run(&mut st, SELECT, 110, 200);
        assert_eq!(st.anchor(), None);
        let r = run(&mut st, DRAW, 120, 200);
        assert_eq!(r.segment, None);
    }

    #[test]
    fn toolbar_only_reacts_inside_the_band() {
        let mut st = state();
        let r = run(&mut st, SELECT, 190, 100);
        assert_eq!(r.action, None);
        assert_eq!(st.tool(), Tool::Color(Rgb::new(254, 254, 254)));
        assert_eq!(st.header(), HEADER_NONE);

        let r = run(&mut st, SELECT, 190, 40);
        assert_eq!(r.action, Some(ToolbarAction::Color(RED)));
        assert_eq!(st.tool(), Tool::Color(RED));
        assert_eq!(st.header(), 2);

        // Gap between entries changes nothing.
        let r = run(&mut st, SELECT, 420, 40);
        assert_eq!(r.action, None);
        assert_eq!(st.tool(), Tool::Color(RED));
        assert_eq!(st.header(), 2);
    }

    #[test]
    fn eraser_uses_black_and_wide_stroke() {
        let mut st = state();
        run(&mut st, SELECT, 550, 40);
        assert_eq!(st.tool(), Tool::Eraser);
        assert_eq!(st.header(), 6);

        run(&mut st, DRAW, 100, 200);
        let seg = run(&mut st, DRAW, 140, 200).segment.unwrap();
        assert_eq!(seg.color, Rgb::BLACK);
        assert_eq!(seg.thickness, 50);
    }

    #[test]
    fn clear_wipes_canvas_but_keeps_tool() {
        let mut st = state();
        run(&mut st, SELECT, 270, 40);
        run(&mut st, DRAW, 100, 200);
        run(&mut st, DRAW, 200, 250);
        assert!(!st.compositor().is_blank());

        let r = run(&mut st, SELECT, 480, 40);
        assert_eq!(r.action, Some(ToolbarAction::Clear));
        assert!(st.compositor().is_blank());
        assert_eq!(st.tool(), Tool::Color(GREEN));
        assert_eq!(st.header(), 5);
    }

    #[test]
    fn cursor_uses_the_active_color() {
        let mut st = state();
        run(&mut st, SELECT, 190, 40);
        let mut frame = FrameBuffer::new(W, H);
        st.draw_cursor(&mut frame, GestureMode::Selecting { at: Point::new(300, 300) });
        assert_eq!(frame.get(300, 300), RED.pack());
        assert_eq!(frame.get(315, 300), RED.pack());
        assert_eq!(frame.get(316, 300), 0);

        let mut frame = FrameBuffer::new(W, H);
        st.draw_cursor(&mut frame, GestureMode::Idle);
        assert!(frame.pixels.iter().all(|&p| p == 0));
    }
}
