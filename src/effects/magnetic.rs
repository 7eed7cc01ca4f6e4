use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::config::{
    MAGNETIC_BUTTON_COLOR, MAGNETIC_BUTTON_RADIUS, MAGNETIC_FOLLOW_SECS, MAGNETIC_RELEASE_SECS,
};
use crate::effects::interactive::{Interaction, InteractiveRegistry, Rect, RegionId};
use crate::effects::tween::{secs, Ease, Tween};

const RELEASE_EASE: Ease = Ease::ElasticOut {
    amplitude: 1.0,
    period: 0.5,
};

/// Round button that leans towards the pointer while hovered
#[derive(Debug)]
pub struct MagneticButton {
    region: RegionId,
    offset: Tween<[f32; 2]>,
    hovered: bool,
}

impl MagneticButton {
    pub fn new(registry: &mut InteractiveRegistry, center: [f32; 2], strength: f32, now: Instant) -> Self {
        let region = registry.register(
            Rect::around(center, MAGNETIC_BUTTON_RADIUS),
            Interaction::Magnetic { strength },
        );
        Self {
            region,
            offset: Tween::settled([0.0, 0.0], now),
            hovered: false,
        }
    }

    pub fn move_to(&mut self, registry: &mut InteractiveRegistry, center: [f32; 2]) {
        registry.set_bounds(self.region, Rect::around(center, MAGNETIC_BUTTON_RADIUS));
    }

    pub fn on_pointer_move(&mut self, registry: &InteractiveRegistry, x: f32, y: f32, now: Instant) {
        let (Some(bounds), Some(Interaction::Magnetic { strength })) =
            (registry.bounds(self.region), registry.interaction(self.region))
        else {
            return;
        };

        if registry.hit_test(x, y) == Some(self.region) {
            let [cx, cy] = bounds.center();
            let pull = [(x - cx) * strength, (y - cy) * strength];
            self.offset
                .retarget(pull, now, Duration::ZERO, secs(MAGNETIC_FOLLOW_SECS), Ease::Power2Out);
            self.hovered = true;
        } else if self.hovered {
            self.release(now);
        }
    }

    /// Pointer left the button (or the window)
    pub fn release(&mut self, now: Instant) {
        self.offset
            .retarget([0.0, 0.0], now, Duration::ZERO, secs(MAGNETIC_RELEASE_SECS), RELEASE_EASE);
        self.hovered = false;
    }

    pub fn offset(&self, now: Instant) -> [f32; 2] {
        self.offset.value(now)
    }

    pub fn draw(&self, registry: &InteractiveRegistry, canvas: &mut impl Canvas, now: Instant) {
        let Some(bounds) = registry.bounds(self.region) else {
            return;
        };
        let [cx, cy] = bounds.center();
        let [ox, oy] = self.offset(now);
        canvas.fill_disc([cx + ox, cy + oy], MAGNETIC_BUTTON_RADIUS, MAGNETIC_BUTTON_COLOR);
    }

    /// Detach from the registry
    pub fn unregister(self, registry: &mut InteractiveRegistry) {
        registry.unregister(self.region);
    }
}
