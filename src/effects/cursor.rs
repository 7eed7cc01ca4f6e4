use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::config::{
    CURSOR_DOT_COLOR, CURSOR_DOT_HOVER_COLOR, CURSOR_DOT_HOVER_SCALE, CURSOR_DOT_RADIUS,
    CURSOR_GLOW_COLOR, CURSOR_GLOW_RADIUS, CURSOR_HOVER_SECS, TRAIL_LENGTH, TRAIL_SECS,
    TRAIL_STAGGER_SECS,
};
use crate::effects::tween::{secs, Ease, Tween};

/// Custom pointer: a dot pinned to the pointer plus a trail of discs that
/// chase it, each one a little later and smaller than the last.
///
/// `hover` eases from 0 to 1 while the pointer is over an interactive
/// region; it shrinks the dot and lightens its colour.
#[derive(Debug)]
pub struct CursorTrail {
    dot: Option<[f32; 2]>,
    trail: [Tween<[f32; 2]>; TRAIL_LENGTH],
    hover: Tween<f32>,
    hovering: bool,
}

impl CursorTrail {
    pub fn new(now: Instant) -> Self {
        Self {
            dot: None,
            trail: [Tween::settled([0.0, 0.0], now); TRAIL_LENGTH],
            hover: Tween::settled(0.0, now),
            hovering: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.dot.is_some()
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32, now: Instant) {
        if self.dot.is_none() {
            // first sighting, start the trail under the pointer
            for segment in &mut self.trail {
                segment.snap([x, y], now);
            }
        }
        self.dot = Some([x, y]);

        for (i, segment) in self.trail.iter_mut().enumerate() {
            segment.retarget(
                [x, y],
                now,
                secs(i as f32 * TRAIL_STAGGER_SECS),
                secs(TRAIL_SECS),
                Ease::Power2Out,
            );
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.dot = None;
    }

    pub fn set_hovering(&mut self, hovering: bool, now: Instant) {
        if hovering == self.hovering {
            return;
        }
        self.hovering = hovering;
        let target = if hovering { 1.0 } else { 0.0 };
        self.hover
            .retarget(target, now, Duration::ZERO, secs(CURSOR_HOVER_SECS), Ease::Linear);
    }

    pub fn draw(&self, canvas: &mut impl Canvas, now: Instant) {
        let Some(dot) = self.dot else {
            return;
        };

        for (i, segment) in self.trail.iter().enumerate() {
            let diameter = 12.0 - i as f32 * 2.0;
            let alpha = 0.3 - i as f32 * 0.05;
            canvas.fill_disc(segment.value(now), diameter / 2.0, CURSOR_DOT_COLOR.with_alpha(alpha));
        }

        let hover = self.hover.value(now);
        let scale = 1.0 + (CURSOR_DOT_HOVER_SCALE - 1.0) * hover;
        canvas.fill_glow(dot, (CURSOR_DOT_RADIUS + CURSOR_GLOW_RADIUS) * scale, CURSOR_GLOW_COLOR);
        canvas.fill_disc(
            dot,
            CURSOR_DOT_RADIUS * scale,
            CURSOR_DOT_COLOR.mix(CURSOR_DOT_HOVER_COLOR, hover),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{DrawCall, RecordingCanvas};

    #[test]
    fn test_hidden_until_pointer_moves() {
        let now = Instant::now();
        let cursor = CursorTrail::new(now);
        let mut canvas = RecordingCanvas::default();
        cursor.draw(&mut canvas, now);
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn test_dot_follows_instantly_trail_lags() {
        let now = Instant::now();
        let mut cursor = CursorTrail::new(now);
        cursor.on_pointer_move(0.0, 0.0, now);
        cursor.on_pointer_move(100.0, 0.0, now);

        let soon = now + secs(0.1);
        let lead = cursor.trail[0].value(soon);
        let tail = cursor.trail[TRAIL_LENGTH - 1].value(soon);
        assert!(lead[0] > 0.0 && lead[0] < 100.0);
        // last segment is still waiting out its stagger
        assert!(tail[0] < lead[0]);

        let settled = now + secs(TRAIL_SECS + TRAIL_STAGGER_SECS * TRAIL_LENGTH as f32);
        for i in 0..TRAIL_LENGTH {
            assert_eq!(cursor.trail[i].value(settled), [100.0, 0.0]);
        }

        let mut canvas = RecordingCanvas::default();
        cursor.draw(&mut canvas, soon);
        match canvas.calls.last() {
            Some(DrawCall::Disc { center, .. }) => assert_eq!(*center, [100.0, 0.0]),
            other => panic!("expected dot last, got {:?}", other),
        }
    }

    #[test]
    fn test_hover_shrinks_dot() {
        let now = Instant::now();
        let mut cursor = CursorTrail::new(now);
        cursor.on_pointer_move(10.0, 10.0, now);
        cursor.set_hovering(true, now);

        let mut canvas = RecordingCanvas::default();
        cursor.draw(&mut canvas, now + secs(1.0));
        match canvas.calls.last() {
            Some(DrawCall::Disc { radius, color, .. }) => {
                assert!((radius - CURSOR_DOT_RADIUS * CURSOR_DOT_HOVER_SCALE).abs() < 1e-5);
                let expected = CURSOR_DOT_HOVER_COLOR.to_array();
                for (got, want) in color.to_array().iter().zip(expected) {
                    assert!((got - want).abs() < 1e-5);
                }
            }
            other => panic!("expected dot last, got {:?}", other),
        }
    }

    #[test]
    fn test_leave_hides_cursor() {
        let now = Instant::now();
        let mut cursor = CursorTrail::new(now);
        cursor.on_pointer_move(10.0, 10.0, now);
        assert!(cursor.is_visible());
        cursor.on_pointer_leave();
        assert!(!cursor.is_visible());
    }
}
