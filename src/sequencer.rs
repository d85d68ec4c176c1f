// src/sequencer.rs
//! Multi-step choreography built from tweens. A `Routine` runs its steps
//! strictly one after another; the encounter never gives one entity two
//! routines at once.

use bevy::prelude::*;
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

use crate::{
    config::AttackTuning,
    error::EncounterError,
    stage::{Pose, Presenter, Stage},
    tween::{ease_in_out_sine, ease_out_cubic, Tween},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

/// Jitters the camera around where it stood when the shake began, then puts
/// it back exactly there.
#[derive(Debug, Clone)]
pub struct CameraShake {
    damper: Tween<f32>,
    magnitude: f32,
    anchor: Option<Vec3>,
}

impl CameraShake {
    pub fn new(duration: Duration, magnitude: f32) -> Self {
        Self { damper: Tween::linear(1.0, 0.0, duration), magnitude, anchor: None }
    }

    /// `Ok(true)` once the camera is back at its anchor.
    pub fn advance<S, R>(&mut self, delta: Duration, stage: &mut S, rng: &mut R) -> Result<bool, EncounterError>
    where
        S: Stage + ?Sized,
        R: Rng + ?Sized,
    {
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => {
                let anchor = stage.camera_position().ok_or(EncounterError::MissingCollaborator("camera"))?;
                self.anchor = Some(anchor);
                anchor
            }
        };
        let Some(sample) = self.damper.advance(delta) else {
            return Ok(true);
        };
        if sample.finished {
            stage.set_camera_position(anchor);
            return Ok(true);
        }
        let reach = self.magnitude * sample.value;
        let offset = Vec3::new(
            rng.gen_range(-1.0f32..=1.0) * reach,
            rng.gen_range(-1.0f32..=1.0) * reach * 0.6,
            rng.gen_range(-1.0f32..=1.0) * reach * 0.6,
        );
        stage.set_camera_position(anchor + offset);
        Ok(false)
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    /// Grows and turns the freshly spawned antagonist.
    Wake { entity: Entity, clock: Tween<f32> },
    /// Placeholder for a full lunge; its path depends on where the camera
    /// is once the lunge actually starts.
    Lunge { entity: Entity, origin: Vec3 },
    Move { entity: Entity, path: Tween<Vec3> },
    Impact,
    Shake(CameraShake),
    Place { entity: Entity, position: Vec3 },
    Pause(Timer),
}

enum StepOutcome {
    Pending,
    Done,
    Expand(Vec<Step>),
}

#[derive(Debug, Clone)]
pub struct Routine {
    steps: VecDeque<Step>,
    tuning: AttackTuning,
}

impl Routine {
    pub fn new(tuning: &AttackTuning) -> Self {
        Self { steps: VecDeque::new(), tuning: tuning.clone() }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    pub fn awaken(entity: Entity, tuning: &AttackTuning) -> Self {
        Self::new(tuning).then(Step::Wake { entity, clock: Tween::linear(0.0, 1.0, tuning.wake_duration) })
    }

    /// Strike, shake, retreat and settle back on `origin`.
    pub fn lunge(entity: Entity, origin: Vec3, tuning: &AttackTuning) -> Self {
        Self::new(tuning).then(Step::Lunge { entity, origin })
    }

    pub fn pause(duration: Duration, tuning: &AttackTuning) -> Self {
        Self::new(tuning).then(Step::Pause(Timer::new(duration, TimerMode::Once)))
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs as many steps as this frame allows. A step that finishes hands
    /// over to the next one immediately, with no time left on the clock.
    pub fn advance<S, R>(&mut self, delta: Duration, stage: &mut S, rng: &mut R) -> Progress
    where
        S: Stage + Presenter + ?Sized,
        R: Rng + ?Sized,
    {
        let mut budget = delta;
        while let Some(mut step) = self.steps.pop_front() {
            match self.run(&mut step, budget, stage, rng) {
                Ok(StepOutcome::Done) => budget = Duration::ZERO,
                Ok(StepOutcome::Expand(expanded)) => {
                    for step in expanded.into_iter().rev() {
                        self.steps.push_front(step);
                    }
                }
                Ok(StepOutcome::Pending) => {
                    self.steps.push_front(step);
                    return Progress::Running;
                }
                Err(err) => {
                    debug!("routine waiting: {err}");
                    self.steps.push_front(step);
                    return Progress::Running;
                }
            }
        }
        Progress::Finished
    }

    fn run<S, R>(
        &self,
        step: &mut Step,
        delta: Duration,
        stage: &mut S,
        rng: &mut R,
    ) -> Result<StepOutcome, EncounterError>
    where
        S: Stage + Presenter + ?Sized,
        R: Rng + ?Sized,
    {
        match step {
            Step::Wake { entity, clock } => {
                let Some(sample) = clock.advance(delta) else { return Ok(StepOutcome::Done) };
                let (small, large) = self.tuning.wake_scale;
                let pose = Pose::scaled(Vec3::splat(small + (large - small) * sample.value))
                    .with_rotation(Quat::from_rotation_y(self.tuning.wake_spin * ease_in_out_sine(sample.value)));
                // The entity may only materialize next frame; losing a sample is fine.
                let _ = stage.set_pose(*entity, pose);
                Ok(if sample.finished { StepOutcome::Done } else { StepOutcome::Pending })
            }
            Step::Lunge { entity, origin } => {
                let camera = stage.camera_position().ok_or(EncounterError::MissingCollaborator("camera"))?;
                let strike = origin.lerp(Vec3::new(camera.x, origin.y, camera.z), self.tuning.lunge_reach);
                let tuning = &self.tuning;
                let strike_path = Tween::new(*origin, strike, tuning.lunge_duration, ease_out_cubic);
                Ok(StepOutcome::Expand(vec![
                    Step::Move { entity: *entity, path: strike_path },
                    Step::Impact,
                    Step::Shake(CameraShake::new(tuning.shake_duration, tuning.shake_magnitude)),
                    Step::Move { entity: *entity, path: Tween::linear(strike, *origin, tuning.retreat_duration) },
                    Step::Place { entity: *entity, position: *origin },
                ]))
            }
            Step::Move { entity, path } => {
                let Some(sample) = path.advance(delta) else { return Ok(StepOutcome::Done) };
                let _ = stage.set_pose(*entity, Pose::at(sample.value));
                Ok(if sample.finished { StepOutcome::Done } else { StepOutcome::Pending })
            }
            Step::Impact => {
                stage.show_impact();
                Ok(StepOutcome::Done)
            }
            Step::Shake(shake) => {
                Ok(if shake.advance(delta, stage, rng)? { StepOutcome::Done } else { StepOutcome::Pending })
            }
            Step::Place { entity, position } => {
                let _ = stage.set_pose(*entity, Pose::at(*position));
                Ok(StepOutcome::Done)
            }
            Step::Pause(timer) => {
                timer.tick(delta);
                Ok(if timer.finished() { StepOutcome::Done } else { StepOutcome::Pending })
            }
        }
    }
}
