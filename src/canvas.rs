// Persistent paint layer and the mask blend that puts it over the live camera.
//
// The canvas starts black. Black means "nothing painted here": compose() only
// replaces live pixels where the canvas is brighter than the mask threshold.
// Erasing is painting black again.

use crate::draw::draw_thick_line;
use crate::error::Error;
use crate::types::{luminance, FrameBuffer, Point, Rgb};

/// One straight piece of a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
    pub thickness: u32,
}

pub struct Compositor {
    canvas: FrameBuffer,
    threshold: u8,
}

impl Compositor {
    /// Blank canvas the size of the video frame.
    pub fn new(width: usize, height: usize, threshold: u8) -> Self {
        Self { canvas: FrameBuffer::new(width, height), threshold }
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    /// True while every canvas pixel is black.
    pub fn is_blank(&self) -> bool {
        self.canvas.pixels.iter().all(|&p| p == 0)
    }

    /// Draw the segment on the live frame (so it shows this frame) and on the
    /// canvas (so it stays).
    pub fn draw_segment(&mut self, frame: &mut FrameBuffer, seg: &Segment) {
        draw_thick_line(frame, seg.from, seg.to, seg.thickness, seg.color);
        draw_thick_line(&mut self.canvas, seg.from, seg.to, seg.thickness, seg.color);
    }

    /// Zero the whole canvas.
    pub fn clear(&mut self) {
        self.canvas.pixels.fill(0);
    }

    /// Overlay the canvas onto `frame` in place.
    ///
    /// Per pixel: if the canvas luminance is above the threshold the live pixel
    /// is dropped, then the canvas pixel is OR-ed in. Dark paint at or under the
    /// threshold does not mask the live pixel and only ORs its bits into it.
    pub fn compose_into(&self, frame: &mut FrameBuffer) -> Result<(), Error> {
        if !frame.same_size(&self.canvas) {
            return Err(Error::FrameSize {
                expected: (self.canvas.width, self.canvas.height),
                actual: (frame.width, frame.height),
            });
        }
        for (out, &paint) in frame.pixels.iter_mut().zip(&self.canvas.pixels) {
            if paint == 0 { continue; } // fast path: nothing painted
            let keep = if luminance(paint) > self.threshold { 0 } else { 0x00FF_FFFF };
            *out = (*out & keep) | paint;
        }
        Ok(())
    }

    /// Same as [`compose_into`](Self::compose_into) but leaves `live` untouched.
    pub fn compose(&self, live: &FrameBuffer) -> Result<FrameBuffer, Error> {
        let mut out = live.clone();
        self.compose_into(&mut out)?;
        Ok(out)
    }
}
