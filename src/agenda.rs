// src/agenda.rs
use bevy::prelude::*;
use std::time::Duration;

/// Narrative beats that happen after a coarse wall-clock delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    AskSecondRiddle,
    Blackout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled {
    handle: CueHandle,
    timer: Timer,
    cue: Cue,
}

#[derive(Debug, Clone, Default)]
pub struct Agenda {
    next_handle: u64,
    pending: Vec<Scheduled>,
}

impl Agenda {
    pub fn schedule(&mut self, delay: Duration, cue: Cue) -> CueHandle {
        let handle = CueHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled { handle, timer: Timer::new(delay, TimerMode::Once), cue });
        handle
    }

    /// Returns `false` if the cue already fired or was never scheduled.
    pub fn cancel(&mut self, handle: CueHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: CueHandle) -> bool {
        self.pending.iter().any(|scheduled| scheduled.handle == handle)
    }

    /// Cues that came due this frame, in the order they were scheduled.
    pub fn tick(&mut self, delta: Duration) -> Vec<Cue> {
        let mut due = Vec::new();
        self.pending.retain_mut(|scheduled| {
            scheduled.timer.tick(delta);
            if scheduled.timer.finished() {
                due.push(scheduled.cue);
                false
            } else {
                true
            }
        });
        due
    }
}
