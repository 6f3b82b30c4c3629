//! Integer pixel geometry shared by sights, ROIs and crops.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel units. The origin may be negative when a
/// template is larger than the frame it is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w × h` centred on a `frame_w × frame_h` frame.
    ///
    /// The top-left corner is `frame/2 - size/2` truncated toward zero, so odd
    /// sizes round the same way for the reference and the candidate frame.
    pub fn centered(frame_w: usize, frame_h: usize, w: u32, h: u32) -> Self {
        let x = (frame_w as f64 / 2.0 - w as f64 / 2.0) as i32;
        let y = (frame_h as f64 / 2.0 - h as f64 / 2.0) as i32;
        Self::new(x, y, w as i32, h as i32)
    }

    pub fn top_left(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point2 {
        Point2::new(self.x + self.w, self.y + self.h)
    }

    pub fn from_corners(top_left: Point2, bottom_right: Point2) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }

    /// Intersect with `[0, width) × [0, height)`; returns `(x0, y0, x1, y1)`
    /// or `None` when nothing remains.
    pub fn clamp_to(&self, width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.w as i64).min(width as i64);
        let y1 = (self.y as i64 + self.h as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}
