//! Hand landmarks in frame pixel coordinates.
//!
//! The detector reports 21 points per hand, normalized to [0, 1]. They are
//! scaled to pixels once, here, so everything downstream works in frame space.

use crate::types::Point;

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Hand landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod ids {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Fingertip ids in finger order: thumb, index, middle, ring, pinky.
pub const TIP_IDS: [usize; 5] = [
    ids::THUMB_TIP,
    ids::INDEX_FINGER_TIP,
    ids::MIDDLE_FINGER_TIP,
    ids::RING_FINGER_TIP,
    ids::PINKY_TIP,
];

/// Bones drawn by the landmark overlay, as (from, to) id pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (ids::WRIST, ids::THUMB_CMC),
    (ids::THUMB_CMC, ids::THUMB_MCP),
    (ids::THUMB_MCP, ids::THUMB_IP),
    (ids::THUMB_IP, ids::THUMB_TIP),
    (ids::WRIST, ids::INDEX_FINGER_MCP),
    (ids::INDEX_FINGER_MCP, ids::INDEX_FINGER_PIP),
    (ids::INDEX_FINGER_PIP, ids::INDEX_FINGER_DIP),
    (ids::INDEX_FINGER_DIP, ids::INDEX_FINGER_TIP),
    (ids::INDEX_FINGER_MCP, ids::MIDDLE_FINGER_MCP),
    (ids::MIDDLE_FINGER_MCP, ids::MIDDLE_FINGER_PIP),
    (ids::MIDDLE_FINGER_PIP, ids::MIDDLE_FINGER_DIP),
    (ids::MIDDLE_FINGER_DIP, ids::MIDDLE_FINGER_TIP),
    (ids::MIDDLE_FINGER_MCP, ids::RING_FINGER_MCP),
    (ids::RING_FINGER_MCP, ids::RING_FINGER_PIP),
    (ids::RING_FINGER_PIP, ids::RING_FINGER_DIP),
    (ids::RING_FINGER_DIP, ids::RING_FINGER_TIP),
    (ids::RING_FINGER_MCP, ids::PINKY_MCP),
    (ids::WRIST, ids::PINKY_MCP),
    (ids::PINKY_MCP, ids::PINKY_PIP),
    (ids::PINKY_PIP, ids::PINKY_DIP),
    (ids::PINKY_DIP, ids::PINKY_TIP),
];

/// One tracked point: its id and where it sits on the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landmark {
    pub id: usize,
    pub pos: Point,
}

/// All 21 landmarks of one hand, indexed by id.
///
/// A set always holds every point; "no hand" is `Option::None` at the call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Scale normalized detector output to a `width` x `height` frame.
    ///
    /// Returns `None` unless exactly 21 points are given. Coordinates are
    /// truncated toward zero. Points may sit off-frame but are held within
    /// one frame size of it; NaN maps to 0.
    pub fn from_normalized(normalized: &[(f32, f32)], width: usize, height: usize) -> Option<Self> {
        if normalized.len() != LANDMARK_COUNT {
            return None;
        }
        let mut points = [Point::default(); LANDMARK_COUNT];
        for (p, &(nx, ny)) in points.iter_mut().zip(normalized) {
            *p = Point::new(scale(nx, width), scale(ny, height));
        }
        Some(Self { points })
    }

    /// A schematic hand with its index fingertip at `index_tip` and each finger
    /// (thumb, index, middle, ring, pinky) raised or curled as asked.
    ///
    /// Raised fingers have the tip above the PIP joint; curled ones below it.
    /// The thumb sticks out to the left when raised. Used to drive the painter
    /// from the mouse and to script gestures.
    pub fn posed(index_tip: Point, fingers: [bool; 5]) -> Self {
        let t = index_tip;
        let mut points = [Point::default(); LANDMARK_COUNT];

        points[ids::WRIST] = Point::new(t.x + 30, t.y + 160);
        points[ids::THUMB_CMC] = Point::new(t.x, t.y + 130);
        points[ids::THUMB_MCP] = Point::new(t.x - 25, t.y + 100);
        let ip = Point::new(t.x - 40, t.y + 70);
        points[ids::THUMB_IP] = ip;
        points[ids::THUMB_TIP] = Point::new(if fingers[0] { ip.x - 20 } else { ip.x + 20 }, ip.y);

        for finger in 1..5 {
            let tip = TIP_IDS[finger];
            let x = t.x + 20 * (finger as i32 - 1);
            let (pip_y, dip_y) = if fingers[finger] { (t.y + 40, t.y + 20) } else { (t.y - 20, t.y - 10) };
            points[tip - 3] = Point::new(x, t.y + 70); // MCP
            points[tip - 2] = Point::new(x, pip_y);
            points[tip - 1] = Point::new(x, dip_y);
            points[tip] = Point::new(x, t.y);
        }

        Self { points }
    }

    #[inline]
    pub fn point(&self, id: usize) -> Point {
        self.points[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + '_ {
        self.points.iter().enumerate().map(|(id, &pos)| Landmark { id, pos })
    }

    pub fn index_tip(&self) -> Point {
        self.points[ids::INDEX_FINGER_TIP]
    }

    pub fn middle_tip(&self) -> Point {
        self.points[ids::MIDDLE_FINGER_TIP]
    }
}

fn scale(n: f32, extent: usize) -> i32 {
    (n.clamp(-1.0, 2.0) * extent as f32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_truncates() {
        let mut norm = vec![(0.0, 0.0); LANDMARK_COUNT];
        norm[ids::INDEX_FINGER_TIP] = (0.5, 0.25);
        norm[ids::PINKY_TIP] = (0.999, 0.999);
        let set = LandmarkSet::from_normalized(&norm, 640, 480).unwrap();
        assert_eq!(set.index_tip(), Point::new(320, 120));
        assert_eq!(set.point(ids::PINKY_TIP), Point::new(639, 479));
    }

    #[test]
    fn wild_coordinates_stay_near_the_frame() {
        let mut norm = vec![(0.5, 0.5); LANDMARK_COUNT];
        norm[ids::INDEX_FINGER_TIP] = (-1.0e7, 3.0e9);
        norm[ids::MIDDLE_FINGER_TIP] = (f32::NAN, f32::INFINITY);
        norm[ids::PINKY_TIP] = (1.2, -0.1);
        let set = LandmarkSet::from_normalized(&norm, 640, 480).unwrap();
        assert_eq!(set.index_tip(), Point::new(-640, 960));
        assert_eq!(set.middle_tip(), Point::new(0, 960));
        assert_eq!(set.point(ids::PINKY_TIP), Point::new(768, -48));
    }

    #[test]
    fn connections_cover_every_landmark() {
        let mut seen = [false; LANDMARK_COUNT];
        for &(a, b) in HAND_CONNECTIONS.iter() {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn rejects_wrong_point_count() {
        let norm = vec![(0.1, 0.1); 20];
        assert!(LandmarkSet::from_normalized(&norm, 640, 480).is_none());
    }

    #[test]
    fn iter_yields_ids_in_order() {
        let set = LandmarkSet::new([Point::new(1, 2); LANDMARK_COUNT]);
        let ids: Vec<usize> = set.iter().map(|lm| lm.id).collect();
        assert_eq!(ids, (0..LANDMARK_COUNT).collect::<Vec<_>>());
    }
}
