use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Easing curves, mapping progress in [0, 1] to eased progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Cubic ease-out
    Power2Out,
    /// Quartic ease-out
    Power3Out,
    /// Overshooting spring-like settle
    ElasticOut { amplitude: f32, period: f32 },
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::ElasticOut { amplitude, period } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let amplitude = amplitude.max(1.0);
                let phase = period / TAU * (1.0 / amplitude).asin();
                amplitude * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
            }
        }
    }
}

/// Values a tween can interpolate
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for [f32; 2] {
    fn lerp(self, to: Self, t: f32) -> Self {
        [self[0].lerp(to[0], t), self[1].lerp(to[1], t)]
    }
}

/// Time-based interpolation between two values.
///
/// Retargeting starts the new tween from wherever the old one currently is,
/// so the most recent target always wins without a jump.
#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    ease: Ease,
}

impl<T: Lerp> Tween<T> {
    /// A tween that is already settled on `value`
    pub fn settled(value: T, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
            ease: Ease::Linear,
        }
    }

    pub fn value(&self, now: Instant) -> T {
        if now < self.start {
            return self.from;
        }
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (now - self.start).as_secs_f32() / self.duration.as_secs_f32();
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.ease.apply(t))
    }

    /// Head for `to`, starting after `delay`
    pub fn retarget(&mut self, to: T, now: Instant, delay: Duration, duration: Duration, ease: Ease) {
        self.from = self.value(now);
        self.to = to;
        self.start = now + delay;
        self.duration = duration;
        self.ease = ease;
    }

    /// Jump straight to `value`
    pub fn snap(&mut self, value: T, now: Instant) {
        *self = Self::settled(value, now);
    }
}

#[cfg(test)]
impl<T: Lerp> Tween<T> {
    pub fn target(&self) -> T {
        self.to
    }
}

pub fn secs(s: f32) -> Duration {
    Duration::from_secs_f32(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASES: [Ease; 4] = [
        Ease::Linear,
        Ease::Power2Out,
        Ease::Power3Out,
        Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        },
    ];

    #[test]
    fn test_eases_hit_endpoints() {
        for ease in EASES {
            assert_eq!(ease.apply(0.0), 0.0, "{:?}", ease);
            assert_eq!(ease.apply(1.0), 1.0, "{:?}", ease);
        }
    }

    #[test]
    fn test_power_out_front_loaded() {
        assert!((Ease::Power2Out.apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Ease::Power3Out.apply(0.5) - 0.9375).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots() {
        let ease = Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        };
        let max = (1..100).map(|i| ease.apply(i as f32 / 100.0)).fold(0.0, f32::max);
        assert!(max > 1.0);
    }

    #[test]
    fn test_tween_waits_for_delay() {
        let now = Instant::now();
        let mut tween = Tween::settled([0.0, 0.0], now);
        tween.retarget([10.0, 20.0], now, secs(0.1), secs(0.4), Ease::Linear);

        assert_eq!(tween.value(now + secs(0.05)), [0.0, 0.0]);
        let mid = tween.value(now + secs(0.3));
        assert!((mid[0] - 5.0).abs() < 1e-3);
        assert!((mid[1] - 10.0).abs() < 1e-3);
        assert_eq!(tween.value(now + secs(0.5)), [10.0, 20.0]);
    }

    #[test]
    fn test_retarget_continues_from_current_value() {
        let now = Instant::now();
        let mut tween = Tween::settled(0.0f32, now);
        tween.retarget(100.0, now, Duration::ZERO, secs(1.0), Ease::Linear);

        let later = now + secs(0.5);
        tween.retarget(0.0, later, Duration::ZERO, secs(1.0), Ease::Linear);
        assert!((tween.value(later) - 50.0).abs() < 1e-2);
        assert_eq!(tween.target(), 0.0);
    }
}
