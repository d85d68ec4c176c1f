// src/tween.rs
use bevy::math::Vec3;
use std::time::Duration;

pub type Easing = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_out_sine(t: f32) -> f32 {
    -((std::f32::consts::PI * t).cos() - 1.0) / 2.0
}

pub trait Lerp: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<T> {
    pub value: T,
    /// Raw time fraction in [0, 1], before easing.
    pub fraction: f32,
    pub finished: bool,
}

/// A single interpolation from `from` to `to`, sampled once per frame.
///
/// The sample at fraction 1 is handed out exactly once; after that the tween
/// is spent and `advance` yields nothing.
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    spent: bool,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self { from, to, duration, elapsed: Duration::ZERO, easing, spent: false }
    }

    pub fn linear(from: T, to: T, duration: Duration) -> Self {
        Self::new(from, to, duration, linear)
    }

    pub fn advance(&mut self, delta: Duration) -> Option<Sample<T>> {
        if self.spent {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        let fraction = self.fraction();
        let finished = fraction >= 1.0;
        self.spent = finished;
        Some(Sample {
            value: self.from.lerp_to(self.to, (self.easing)(fraction)),
            fraction,
            finished,
        })
    }

    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}
