//! The toolbar across the top of the frame: which horizontal span picks what,
//! and the header images that show the current pick.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use log::{debug, info};

use crate::draw::fill_rect;
use crate::error::Error;
use crate::types::{FrameBuffer, Rgb};

/// Header images, in order: no selection, white, red, green, sky blue, clear, eraser.
pub const HEADER_COUNT: usize = 7;
pub const HEADER_NONE: usize = 0;

pub const WHITE: Rgb = Rgb::WHITE;
pub const RED: Rgb = Rgb::new(255, 87, 87);
pub const GREEN: Rgb = Rgb::new(38, 217, 119);
pub const SKY_BLUE: Rgb = Rgb::new(29, 202, 200);

/// What happens when the fingertip lands on a toolbar entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Switch to drawing in this color.
    Color(Rgb),
    /// Switch to the eraser.
    Eraser,
    /// Wipe the paint canvas. The active tool stays as it is.
    Clear,
}

/// One horizontal span of the toolbar. Both bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolbarEntry {
    pub x_min: i32,
    pub x_max: i32,
    /// Header image shown after this entry is hit.
    pub header: usize,
    pub action: ToolbarAction,
}

impl ToolbarEntry {
    pub fn contains(&self, x: i32) -> bool {
        self.x_min < x && x < self.x_max
    }
}

#[derive(Clone, Debug)]
pub struct Toolbar {
    entries: Vec<ToolbarEntry>,
}

impl Default for Toolbar {
    /// Layout matching the stock 640 px header art.
    fn default() -> Self {
        use ToolbarAction::*;
        let e = |x_min, x_max, header, action| ToolbarEntry { x_min, x_max, header, action };
        Self::new(vec![
            e(70, 150, 1, Color(WHITE)),
            e(160, 225, 2, Color(RED)),
            e(235, 305, 3, Color(GREEN)),
            e(315, 375, 4, Color(SKY_BLUE)),
            e(463, 500, 5, Clear),
            e(535, 580, 6, Eraser),
        ])
    }
}

impl Toolbar {
    pub fn new(entries: Vec<ToolbarEntry>) -> Self {
        debug_assert!(
            entries.iter().all(|e| e.header < HEADER_COUNT),
            "toolbar entry points past the header images"
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[ToolbarEntry] {
        &self.entries
    }

    /// Entry under horizontal position `x`, if any. Gaps resolve to `None`.
    pub fn resolve(&self, x: i32) -> Option<&ToolbarEntry> {
        self.entries.iter().find(|e| e.contains(x))
    }
}

/// Pre-rendered header strips, one per toolbar state.
pub struct HeaderSet {
    images: Vec<FrameBuffer>,
}

impl HeaderSet {
    /// Load the header images from `dir`, sorted by file name.
    ///
    /// Exactly [`HEADER_COUNT`] images are expected. Images that are not
    /// `width` x `height` are resized to fit.
    pub fn load_dir(dir: &Path, width: usize, height: usize) -> Result<Self, Error> {
        let entries = fs::read_dir(dir).map_err(|e| Error::HeaderAsset {
            path: dir.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image_file(p))
            .collect();
        paths.sort();

        if paths.len() != HEADER_COUNT {
            return Err(Error::HeaderCount {
                dir: dir.to_path_buf(),
                expected: HEADER_COUNT,
                found: paths.len(),
            });
        }

        let mut images = Vec::with_capacity(HEADER_COUNT);
        for path in &paths {
            let img = image::open(path)
                .map_err(|source| Error::HeaderAsset { path: path.clone(), source })?
                .to_rgb8();
            let img = if img.dimensions() != (width as u32, height as u32) {
                debug!(
                    "Resizing header {:?} from {:?} to {}x{}",
                    path,
                    img.dimensions(),
                    width,
                    height
                );
                imageops::resize(&img, width as u32, height as u32, FilterType::Triangle)
            } else {
                img
            };
            let pixels = img.pixels().map(|p| Rgb::new(p[0], p[1], p[2]).pack()).collect();
            images.push(FrameBuffer { width, height, pixels });
        }

        info!("Loaded {} header images from {:?}", images.len(), dir);
        Ok(Self { images })
    }

    /// Draw the headers without any image files: a dark strip with one swatch
    /// per toolbar entry, and a bar under the entry each header stands for.
    pub fn builtin(toolbar: &Toolbar, width: usize, height: usize) -> Self {
        let background = Rgb::new(40, 40, 40);
        let highlight = Rgb::new(255, 204, 51);
        let h = height as i32;

        let images = (0..HEADER_COUNT)
            .map(|index| {
                let mut fb = FrameBuffer::filled(width, height, background);
                for entry in toolbar.entries() {
                    let (x0, x1) = (entry.x_min + 1, entry.x_max);
                    match entry.action {
                        ToolbarAction::Color(c) => fill_rect(&mut fb, x0, 12, x1, h - 20, c),
                        ToolbarAction::Eraser => {
                            fill_rect(&mut fb, x0, 12, x1, h - 20, Rgb::new(230, 230, 230));
                            fill_rect(&mut fb, x0 + 6, 18, x1 - 6, h - 26, Rgb::BLACK);
                        }
                        ToolbarAction::Clear => {
                            fill_rect(&mut fb, x0, 12, x1, h - 20, Rgb::new(128, 128, 128));
                            fill_rect(&mut fb, x0, (h - 8) / 2 - 2, x1, (h - 8) / 2 + 2, background);
                        }
                    }
                    if entry.header == index {
                        fill_rect(&mut fb, x0, h - 14, x1, h - 8, highlight);
                    }
                }
                fb
            })
            .collect();

        Self { images }
    }

    /// Header for state `index`; out-of-range falls back to "no selection".
    pub fn get(&self, index: usize) -> &FrameBuffer {
        self.images.get(index).unwrap_or(&self.images[HEADER_NONE])
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "bmp"))
        .unwrap_or(false)
}
