use std::time::{Duration, Instant};

use rand::Rng;

use crate::canvas::Canvas;
use crate::config::{
    BACKGROUND_COLOR, LOADER_BAR_COLOR, LOADER_BAR_SECS, LOADER_BAR_SIZE, LOADER_FADE_SECS,
    LOADER_HOLD_MS, LOADER_LIFT, LOADER_LOGO_COLOR, LOADER_LOGO_SIZE, LOADER_MAX_STEP,
    LOADER_TICK_MS, LOADER_TRACK_COLOR,
};
use crate::effects::tween::{secs, Ease, Tween};

const LOGO_GAP: f32 = 32.0;

/// Start-up overlay with a progress bar that fills in random steps and then
/// lifts away.
#[derive(Debug)]
pub struct PageLoader<R: Rng> {
    rng: R,
    progress: f32,
    bar: Tween<f32>,
    next_tick: Instant,
    /// When the overlay starts fading, once progress reached 100
    fade_start: Option<Instant>,
}

impl<R: Rng> PageLoader<R> {
    pub fn new(rng: R, now: Instant) -> Self {
        Self {
            rng,
            progress: 0.0,
            bar: Tween::settled(0.0, now),
            next_tick: now + Duration::from_millis(LOADER_TICK_MS),
            fade_start: None,
        }
    }

    /// Run every progress tick that is due by `now`
    pub fn update(&mut self, now: Instant) {
        while self.fade_start.is_none() && self.next_tick <= now {
            let tick = self.next_tick;
            self.progress += self.rng.gen_range(0.0..LOADER_MAX_STEP);
            if self.progress >= 100.0 {
                self.progress = 100.0;
                self.fade_start = Some(tick + Duration::from_millis(LOADER_HOLD_MS));
                log::debug!("Loader complete");
            }
            self.bar
                .retarget(self.progress, tick, Duration::ZERO, secs(LOADER_BAR_SECS), Ease::Power2Out);
            self.next_tick = tick + Duration::from_millis(LOADER_TICK_MS);
        }
    }

    /// Overlay opacity: 1 while loading, then fading to 0
    pub fn opacity(&self, now: Instant) -> f32 {
        1.0 - self.exit_progress(now)
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.exit_progress(now) >= 1.0
    }

    fn exit_progress(&self, now: Instant) -> f32 {
        match self.fade_start {
            Some(start) if now > start => {
                let t = (now - start).as_secs_f32() / LOADER_FADE_SECS;
                Ease::Power3Out.apply(t)
            }
            _ => 0.0,
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas, viewport: (f32, f32), now: Instant) {
        let exit = self.exit_progress(now);
        if exit >= 1.0 {
            return;
        }
        let alpha = self.opacity(now);
        let lift = -LOADER_LIFT * exit;
        let (width, height) = viewport;

        canvas.fill_rect([0.0, lift], [width, height], 0.0, BACKGROUND_COLOR.with_alpha(alpha));

        let [bar_w, bar_h] = LOADER_BAR_SIZE;
        let center_x = width / 2.0;
        let bar_y = height / 2.0 + lift;

        canvas.fill_rect(
            [center_x - LOADER_LOGO_SIZE / 2.0, bar_y - LOGO_GAP - LOADER_LOGO_SIZE],
            [LOADER_LOGO_SIZE, LOADER_LOGO_SIZE],
            16.0,
            LOADER_LOGO_COLOR.with_alpha(alpha),
        );

        let origin = [center_x - bar_w / 2.0, bar_y];
        let track = LOADER_TRACK_COLOR.with_alpha(LOADER_TRACK_COLOR.a * alpha);
        canvas.fill_rect(origin, [bar_w, bar_h], bar_h / 2.0, track);
        let filled = bar_w * (self.bar.value(now).min(100.0) / 100.0);
        if filled > 0.0 {
            canvas.fill_rect(origin, [filled, bar_h], bar_h / 2.0, LOADER_BAR_COLOR.with_alpha(alpha));
        }
    }
}
