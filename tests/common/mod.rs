// Shared test doubles for the encounter engine.
#![allow(dead_code)]

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use secret_room::{
    config::THRONE_POSITION,
    encounter::{EncounterSession, EncounterState},
    error::EncounterError,
    riddle::Riddle,
    stage::{Pose, Presenter, Prop, Stage, Tone},
};
use std::collections::HashMap;
use std::time::Duration;

/// Stands in for the Bevy scene and the overlay layer, remembering every call.
#[derive(Default)]
pub struct RecordingStage {
    next_id: u32,
    pub camera: Option<Vec3>,
    pub landmark: Option<Vec3>,
    pub door: Option<Entity>,
    pub transforms: HashMap<Entity, Transform>,
    pub opacity: HashMap<Entity, f32>,
    pub spawned: Vec<(Prop, Entity, Vec3)>,
    pub despawned: Vec<Entity>,
    pub backdrop: Option<Vec3>,
    pub altar_light: Option<f32>,
    pub prompts: Vec<String>,
    pub dismissals: usize,
    pub banners: Vec<(String, Tone)>,
    pub impacts: usize,
    pub blackouts: Vec<String>,
    pub clears: usize,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera well away from the throne, throne and door already loaded.
    pub fn furnished() -> Self {
        let mut stage = Self::new();
        stage.camera = Some(Vec3::new(8.0, 6.0, 12.0));
        stage.landmark = Some(THRONE_POSITION);
        let door = stage.fresh_entity();
        stage.transforms.insert(door, Transform::from_xyz(0.0, -3.0, 40.0));
        stage.door = Some(door);
        stage
    }

    pub fn fresh_entity(&mut self) -> Entity {
        self.next_id += 1;
        Entity::from_raw(self.next_id)
    }

    pub fn step_near_throne(&mut self) {
        self.camera = Some(THRONE_POSITION + Vec3::new(3.0, 0.0, 0.0));
    }

    pub fn spawned_of(&self, prop: Prop) -> Vec<Entity> {
        self.spawned.iter().filter(|(kind, _, _)| *kind == prop).map(|(_, entity, _)| *entity).collect()
    }

    pub fn last_prompt(&self) -> Option<&str> {
        self.prompts.last().map(String::as_str)
    }

    pub fn translation_of(&self, entity: Entity) -> Option<Vec3> {
        self.transforms.get(&entity).map(|transform| transform.translation)
    }
}

impl Stage for RecordingStage {
    fn spawn(&mut self, prop: Prop, position: Vec3) -> Entity {
        let entity = self.fresh_entity();
        self.transforms.insert(entity, Transform::from_translation(position));
        self.spawned.push((prop, entity, position));
        entity
    }

    fn despawn(&mut self, entity: Entity) {
        self.transforms.remove(&entity);
        self.despawned.push(entity);
    }

    fn set_pose(&mut self, entity: Entity, pose: Pose) -> Result<(), EncounterError> {
        let transform = self.transforms.get_mut(&entity).ok_or(EncounterError::MissingCollaborator("prop"))?;
        pose.apply(transform);
        Ok(())
    }

    fn set_opacity(&mut self, entity: Entity, alpha: f32) {
        self.opacity.insert(entity, alpha);
    }

    fn camera_position(&self) -> Option<Vec3> {
        self.camera
    }

    fn set_camera_position(&mut self, position: Vec3) {
        if self.camera.is_some() {
            self.camera = Some(position);
        }
    }

    fn landmark_position(&self) -> Option<Vec3> {
        self.landmark
    }

    fn door(&self) -> Option<Entity> {
        self.door
    }

    fn set_backdrop(&mut self, color: Vec3) {
        self.backdrop = Some(color);
    }

    fn set_altar_light(&mut self, intensity: f32) {
        self.altar_light = Some(intensity);
    }
}

impl Presenter for RecordingStage {
    fn present_prompt(&mut self, question: &str) {
        self.prompts.push(question.to_string());
    }

    fn dismiss_prompt(&mut self) {
        self.dismissals += 1;
    }

    fn show_banner(&mut self, text: &str, tone: Tone) {
        self.banners.push((text.to_string(), tone));
    }

    fn show_impact(&mut self) {
        self.impacts += 1;
    }

    fn show_blackout(&mut self, message: &str) {
        self.blackouts.push(message.to_string());
    }

    fn clear_overlays(&mut self) {
        self.clears += 1;
    }
}

/// Frame deltas between 5 and 45 ms, reproducible per seed.
pub struct JitteredClock {
    rng: StdRng,
}

impl JitteredClock {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn next_delta(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(5..=45))
    }
}

/// Ticks until `done` holds or the frame limit runs out. Returns the frames used.
pub fn run_until(
    session: &mut EncounterSession,
    stage: &mut RecordingStage,
    clock: &mut JitteredClock,
    max_frames: usize,
    done: impl Fn(&EncounterSession) -> bool,
) -> Option<usize> {
    for frame in 0..max_frames {
        if done(session) {
            return Some(frame);
        }
        session.tick(clock.next_delta(), stage);
    }
    done(session).then_some(max_frames)
}

/// Walks up to the throne and waits for the first riddle.
pub fn approach_throne(session: &mut EncounterSession, stage: &mut RecordingStage) {
    stage.step_near_throne();
    let interval = session.config().proximity_interval;
    session.tick(interval, stage);
    assert_eq!(session.state(), EncounterState::Riddle1Pending);
    assert_eq!(session.open_riddle(), Some(Riddle::First));
}
