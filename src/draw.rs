// Window + software drawing utilities.
// The window shows the composited frame; the raster helpers paint strokes,
// the fingertip cursor and the toolbar header straight into a FrameBuffer.

use crate::error::Error;
use crate::landmarks::{LandmarkSet, HAND_CONNECTIONS};
use crate::types::{FrameBuffer, Point, Rgb};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

const HAND_DOT_COLOR: Rgb = Rgb::new(255, 0, 0);
const HAND_LINK_COLOR: Rgb = Rgb::new(0, 255, 0);

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen. This also pumps the
    /// window's input events, so key and mouse state refresh here.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(usize, usize)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn right_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Right)
    }
}

/* ---------- Software drawing: pixels, lines, discs, blits ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Fill a solid disc of `radius` centred at `c`. Radius 0 is a single pixel.
pub fn fill_circle(fb: &mut FrameBuffer, c: Point, radius: i32, color: Rgb) {
    draw_thick_line(fb, c, c, radius.max(0) as u32 * 2, color);
}

/// Draw a line of the given thickness from `a` to `b` with round caps.
///
/// Fills every pixel within `thickness / 2` of the segment. Only the part of
/// the segment's bounding box that lies on the frame is scanned, so endpoints
/// far off-frame cost nothing extra.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, thickness: u32, color: Rgb) {
    let packed = color.pack();
    let r = (thickness / 2) as i64;
    let (ax, ay, bx, by) = (a.x as i64, a.y as i64, b.x as i64, b.y as i64);

    // Bounding box of the capsule, clipped to the frame.
    let x0 = (ax.min(bx) - r).max(0);
    let x1 = (ax.max(bx) + r).min(fb.width as i64 - 1);
    let y0 = (ay.min(by) - r).max(0);
    let y1 = (ay.max(by) + r).min(fb.height as i64 - 1);
    if x0 > x1 || y0 > y1 {
        return;
    }

    let (dx, dy) = ((bx - ax) as f64, (by - ay) as f64);
    let len2 = dx * dx + dy * dy;
    let r2 = (r * r) as f64;
    for y in y0..=y1 {
        let row = y as usize * fb.width;
        for x in x0..=x1 {
            let (px, py) = ((x - ax) as f64, (y - ay) as f64);
            // Closest point on the segment, as a fraction along it.
            let t = if len2 > 0.0 { ((px * dx + py * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
            let (ex, ey) = (px - t * dx, py - t * dy);
            if ex * ex + ey * ey <= r2 {
                fb.pixels[row + x as usize] = packed;
            }
        }
    }
}

/// Dots on every landmark and lines along the finger bones.
pub fn draw_hand(fb: &mut FrameBuffer, hand: &LandmarkSet) {
    for &(from, to) in HAND_CONNECTIONS.iter() {
        draw_thick_line(fb, hand.point(from), hand.point(to), 2, HAND_LINK_COLOR);
    }
    for lm in hand.iter() {
        fill_circle(fb, lm.pos, 4, HAND_DOT_COLOR);
    }
}

/// Fill the axis-aligned rectangle [x0, x1) x [y0, y1), clipped to the frame.
pub fn fill_rect(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let packed = color.pack();
    let x0 = x0.clamp(0, fb.width as i32) as usize;
    let x1 = x1.clamp(0, fb.width as i32) as usize;
    let y0 = y0.clamp(0, fb.height as i32) as usize;
    let y1 = y1.clamp(0, fb.height as i32) as usize;
    if x0 >= x1 {
        return;
    }
    for y in y0..y1 {
        let row = y * fb.width;
        fb.pixels[row + x0..row + x1].fill(packed);
    }
}

/// Copy `src` over the top-left corner of `dst`, clipped to both buffers.
pub fn blit_top(dst: &mut FrameBuffer, src: &FrameBuffer) {
    let w = src.width.min(dst.width);
    let h = src.height.min(dst.height);
    for y in 0..h {
        let d = y * dst.width;
        let s = y * src.width;
        dst.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
    }
}
