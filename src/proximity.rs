// src/proximity.rs
use bevy::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProximityGate {
    consumed: bool,
}

impl ProximityGate {
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Returns `true` only the first time.
    fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }
}

/// Checks, on a fixed cadence, whether the player has walked up to the
/// landmark. Fires once per session.
#[derive(Debug, Clone)]
pub struct ProximityTrigger {
    poll: Timer,
    threshold: f32,
    gate: ProximityGate,
}

impl ProximityTrigger {
    pub fn new(interval: Duration, threshold: f32) -> Self {
        Self { poll: Timer::new(interval, TimerMode::Repeating), threshold, gate: ProximityGate::default() }
    }

    pub fn gate(&self) -> ProximityGate {
        self.gate
    }

    /// A missing player or landmark skips the check; it is tried again on the
    /// next poll.
    pub fn poll(&mut self, delta: Duration, player: Option<Vec3>, landmark: Option<Vec3>) -> bool {
        self.poll.tick(delta);
        if self.poll.times_finished_this_tick() == 0 || self.gate.is_consumed() {
            return false;
        }
        let (Some(player), Some(landmark)) = (player, landmark) else {
            return false;
        };
        player.distance(landmark) < self.threshold && self.gate.consume()
    }
}
