//! Finger up/down classification from one frame of landmarks.

use crate::landmarks::{LandmarkSet, TIP_IDS};

/// Up/down per finger, in order thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub fn thumb(self) -> bool {
        self.0[0]
    }
    pub fn index(self) -> bool {
        self.0[1]
    }
    pub fn middle(self) -> bool {
        self.0[2]
    }
    pub fn ring(self) -> bool {
        self.0[3]
    }
    pub fn pinky(self) -> bool {
        self.0[4]
    }
}

/// Which fingers are raised.
///
/// Thumb: tip x left of the joint just below it (id 3). This only holds for a
/// right hand seen through a mirrored, front-facing camera; other orientations
/// will misreport the thumb.
///
/// Other fingers: tip y above (smaller than) the PIP joint two ids below it.
pub fn classify(hand: &LandmarkSet) -> FingerStates {
    let mut up = [false; 5];

    let thumb = TIP_IDS[0];
    up[0] = hand.point(thumb).x < hand.point(thumb - 1).x;

    for finger in 1..5 {
        let tip = TIP_IDS[finger];
        up[finger] = hand.point(tip).y < hand.point(tip - 2).y;
    }

    FingerStates(up)
}
