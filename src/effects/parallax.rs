use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::config::{
    BOTTOM_BLOB_COLOR, BOTTOM_BLOB_RADIUS, BOTTOM_BLOB_SECS, BOTTOM_BLOB_TRAVEL, TOP_BLOB_COLOR,
    TOP_BLOB_RADIUS, TOP_BLOB_SECS, TOP_BLOB_TRAVEL,
};
use crate::effects::tween::{secs, Ease, Tween};

/// Two blurred gradient blobs drifting against the pointer at different rates
#[derive(Debug)]
pub struct Parallax {
    top: Tween<[f32; 2]>,
    bottom: Tween<[f32; 2]>,
}

impl Parallax {
    pub fn new(now: Instant) -> Self {
        Self {
            top: Tween::settled([0.0, 0.0], now),
            bottom: Tween::settled([0.0, 0.0], now),
        }
    }

    /// Retarget both blobs for a pointer at (x, y) in a viewport of the given size
    pub fn on_pointer_move(&mut self, x: f32, y: f32, viewport: (f32, f32), now: Instant) {
        let [nx, ny] = normalized(x, y, viewport);
        self.top.retarget(
            [nx * TOP_BLOB_TRAVEL[0], ny * TOP_BLOB_TRAVEL[1]],
            now,
            Duration::ZERO,
            secs(TOP_BLOB_SECS),
            Ease::Power2Out,
        );
        self.bottom.retarget(
            [nx * BOTTOM_BLOB_TRAVEL[0], ny * BOTTOM_BLOB_TRAVEL[1]],
            now,
            Duration::ZERO,
            secs(BOTTOM_BLOB_SECS),
            Ease::Power2Out,
        );
    }

    pub fn offsets(&self, now: Instant) -> ([f32; 2], [f32; 2]) {
        (self.top.value(now), self.bottom.value(now))
    }

    pub fn draw(&self, canvas: &mut impl Canvas, viewport: (f32, f32), now: Instant) {
        let (width, height) = viewport;
        let (top, bottom) = self.offsets(now);

        // top blob hangs from the top edge, centred horizontally
        canvas.fill_glow(
            [width / 2.0 + top[0], TOP_BLOB_RADIUS + top[1]],
            TOP_BLOB_RADIUS,
            TOP_BLOB_COLOR,
        );
        // bottom blob sits in the bottom-right corner
        canvas.fill_glow(
            [width - BOTTOM_BLOB_RADIUS + bottom[0], height - BOTTOM_BLOB_RADIUS + bottom[1]],
            BOTTOM_BLOB_RADIUS,
            BOTTOM_BLOB_COLOR,
        );
    }
}

/// Map a viewport position to [-1, 1] on both axes
fn normalized(x: f32, y: f32, (width, height): (f32, f32)) -> [f32; 2] {
    if width <= 0.0 || height <= 0.0 {
        return [0.0, 0.0];
    }
    [(x / width - 0.5) * 2.0, (y / height - 0.5) * 2.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_corners() {
        assert_eq!(normalized(0.0, 0.0, (800.0, 600.0)), [-1.0, -1.0]);
        assert_eq!(normalized(400.0, 300.0, (800.0, 600.0)), [0.0, 0.0]);
        assert_eq!(normalized(800.0, 600.0, (800.0, 600.0)), [1.0, 1.0]);
        assert_eq!(normalized(10.0, 10.0, (0.0, 600.0)), [0.0, 0.0]);
    }

    #[test]
    fn test_blobs_move_in_opposite_directions() {
        let now = Instant::now();
        let mut parallax = Parallax::new(now);
        parallax.on_pointer_move(800.0, 600.0, (800.0, 600.0), now);

        let (top, bottom) = parallax.offsets(now + secs(3.0));
        assert_eq!(top, [50.0, 30.0]);
        assert_eq!(bottom, [-40.0, -25.0]);
    }

    #[test]
    fn test_bottom_blob_is_slower() {
        let now = Instant::now();
        let mut parallax = Parallax::new(now);
        parallax.on_pointer_move(0.0, 300.0, (800.0, 600.0), now);

        let (top, bottom) = parallax.offsets(now + secs(1.0));
        let top_progress = top[0] / -TOP_BLOB_TRAVEL[0];
        let bottom_progress = bottom[0] / -BOTTOM_BLOB_TRAVEL[0];
        assert!(top_progress > bottom_progress);
    }
}
