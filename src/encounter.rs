// src/encounter.rs
//! The narrative state machine. `EncounterSession` owns every piece of
//! mutable encounter state and is advanced once per frame; the Bevy systems
//! at the bottom of the file only feed it time, answers and dev keys.

use bevy::{app::AppExit, prelude::*};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::time::Duration;

use crate::{
    agenda::{Agenda, Cue},
    config::{DoorTuning, EncounterConfig, PortalTuning},
    error::EncounterError,
    prompt::{AnswerSubmitted, PromptGateway, PromptSet},
    proximity::{ProximityGate, ProximityTrigger},
    riddle::Riddle,
    sequencer::{Progress, Routine},
    stage::{Pose, Presenter, Prop, SceneStage, Stage, Tone},
};

pub const SUCCESS_BANNER: &str = "Correct \u{2014} the door opens.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncounterState {
    #[default]
    Idle,
    Riddle1Pending,
    AttackActive,
    Riddle2Pending,
    DoorOpening,
    PortalActive,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approach,
    Answer,
    StartAttack,
    OpenDoor,
    ActivatePortal,
    AskSecondRiddle,
    Blackout,
}

/// Out-of-band shortcuts for testing the script by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevCommand {
    OpenDoor,
    StartAttack,
}

impl DevCommand {
    pub fn key(self) -> KeyCode {
        match self {
            DevCommand::OpenDoor => KeyCode::KeyO,
            DevCommand::StartAttack => KeyCode::KeyP,
        }
    }

    /// Commands whose key went down this frame.
    pub fn just_pressed(keys: &ButtonInput<KeyCode>) -> Vec<DevCommand> {
        [DevCommand::OpenDoor, DevCommand::StartAttack]
            .into_iter()
            .filter(|command| keys.just_pressed(command.key()))
            .collect()
    }

    fn action(self) -> Action {
        match self {
            DevCommand::OpenDoor => Action::OpenDoor,
            DevCommand::StartAttack => Action::StartAttack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Escaped,
    Doomed,
}

/// How far the door has swung, in [0, 1]. Never goes backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoorProgress {
    value: f32,
    begun: bool,
}

impl DoorProgress {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn has_begun(&self) -> bool {
        self.begun
    }

    pub fn is_open(&self) -> bool {
        self.value >= 1.0
    }

    /// Returns `false` if the door was already opening.
    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.begun, true)
    }

    pub fn advance(&mut self, step: f32) -> f32 {
        if self.begun {
            self.value = (self.value + step.max(0.0)).min(1.0);
        }
        self.value
    }

    pub fn swing_angle(&self, tuning: &DoorTuning) -> f32 {
        self.value * tuning.swing
    }

    pub fn lateral_offset(&self, tuning: &DoorTuning) -> f32 {
        (self.value * tuning.swing).sin() * tuning.slide
    }
}

/// The doom ramps. Every field only ever moves towards its cap.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalRun {
    pub active: bool,
    pub scale: f32,
    pub opacity: f32,
    pub light: f32,
    pub backdrop: Vec3,
    pub ring: Option<Entity>,
}

impl Default for PortalRun {
    fn default() -> Self {
        Self { active: false, scale: 0.0, opacity: 0.0, light: 0.0, backdrop: Vec3::ZERO, ring: None }
    }
}

impl PortalRun {
    /// Returns `false` if the portal was already burning.
    pub fn ignite(&mut self, ring: Entity, tuning: &PortalTuning) -> bool {
        if self.active {
            return false;
        }
        *self = Self {
            active: true,
            scale: tuning.initial_scale,
            opacity: 0.0,
            light: tuning.light_from,
            backdrop: tuning.backdrop_from,
            ring: Some(ring),
        };
        true
    }

    pub fn advance(&mut self, tuning: &PortalTuning) {
        if !self.active {
            return;
        }
        self.scale = (self.scale + tuning.scale_step).min(tuning.scale_cap);
        self.opacity = (self.opacity + tuning.opacity_step).min(1.0);
        self.light = (self.light + tuning.light_step).min(tuning.light_cap);
        self.backdrop = self.backdrop.lerp(tuning.backdrop_to, tuning.backdrop_blend);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Waking,
    Lunging,
    /// Idling on its origin between lunges, slowly turning.
    Lingering,
}

#[derive(Debug, Clone)]
pub struct AttackSequenceRun {
    pub remaining_lunges: u32,
    pub antagonist: Entity,
    pub origin: Vec3,
    phase: AttackPhase,
    yaw: f32,
    routine: Routine,
}

impl AttackSequenceRun {
    pub fn phase(&self) -> AttackPhase {
        self.phase
    }
}

#[derive(Resource)]
pub struct EncounterSession {
    config: EncounterConfig,
    state: EncounterState,
    outcome: Option<Outcome>,
    proximity: ProximityTrigger,
    prompt: PromptGateway,
    attack: Option<AttackSequenceRun>,
    door: DoorProgress,
    portal: PortalRun,
    agenda: Agenda,
    rng: StdRng,
}

impl FromWorld for EncounterSession {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource_or_insert_with(EncounterConfig::default).clone();
        Self::new(config)
    }
}

impl EncounterSession {
    pub fn new(config: EncounterConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as `new`, but spawn points and camera shake are reproducible.
    pub fn with_seed(config: EncounterConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EncounterConfig, rng: StdRng) -> Self {
        Self {
            proximity: ProximityTrigger::new(config.proximity_interval, config.proximity_threshold),
            config,
            state: EncounterState::Idle,
            outcome: None,
            prompt: PromptGateway::default(),
            attack: None,
            door: DoorProgress::default(),
            portal: PortalRun::default(),
            agenda: Agenda::default(),
            rng,
        }
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn gate(&self) -> ProximityGate {
        self.proximity.gate()
    }

    pub fn attack(&self) -> Option<&AttackSequenceRun> {
        self.attack.as_ref()
    }

    pub fn door(&self) -> DoorProgress {
        self.door
    }

    pub fn portal(&self) -> &PortalRun {
        &self.portal
    }

    pub fn open_riddle(&self) -> Option<Riddle> {
        self.prompt.current()
    }

    pub fn prompt_open(&self) -> bool {
        self.prompt.is_open()
    }

    /// Movement is frozen while the player is answering, being attacked or
    /// being dragged into the portal.
    pub fn controls_locked(&self) -> bool {
        self.prompt.is_open() || self.state == EncounterState::AttackActive || self.portal.active
    }

    fn refuse(&self, action: Action) -> EncounterError {
        EncounterError::InvalidTransition { from: self.state, action }
    }

    fn ask<S: Presenter + ?Sized>(&mut self, riddle: Riddle, stage: &mut S) {
        if self.prompt.open(riddle) {
            stage.present_prompt(riddle.definition().prompt);
        } else {
            debug!("prompt for {riddle:?} dropped, another is already open");
        }
    }

    fn close_prompt<S: Presenter + ?Sized>(&mut self, stage: &mut S) {
        if self.prompt.close() {
            stage.dismiss_prompt();
        }
    }

    /// One frame of the encounter.
    pub fn tick<S: Stage + Presenter + ?Sized>(&mut self, delta: Duration, stage: &mut S) {
        for cue in self.agenda.tick(delta) {
            if let Err(err) = self.on_cue(cue, stage) {
                debug!("cue {cue:?} ignored: {err}");
            }
        }

        if self.proximity.poll(delta, stage.camera_position(), stage.landmark_position()) {
            if let Err(err) = self.begin_first_riddle(stage) {
                debug!("proximity fired but {err}");
            }
        }

        self.advance_attack(delta, stage);
        self.advance_door(stage);
        self.advance_portal(stage);
    }

    fn begin_first_riddle<S: Presenter + ?Sized>(&mut self, stage: &mut S) -> Result<(), EncounterError> {
        if self.state != EncounterState::Idle {
            return Err(self.refuse(Action::Approach));
        }
        info!("the throne stirs; first riddle");
        self.state = EncounterState::Riddle1Pending;
        self.ask(Riddle::First, stage);
        Ok(())
    }

    /// Applies a submitted answer to whichever riddle is open.
    pub fn submit_answer<S>(&mut self, raw: &str, stage: &mut S) -> Result<(), EncounterError>
    where
        S: Stage + Presenter + ?Sized,
    {
        let Some(reply) = self.prompt.resolve(raw) else {
            return Err(self.refuse(Action::Answer));
        };
        stage.dismiss_prompt();

        if reply.riddle.definition().accepts(&reply.answer) {
            info!("{:?} answered correctly", reply.riddle);
            stage.show_banner(SUCCESS_BANNER, Tone::Success);
            return self.open_door(stage);
        }

        info!("{:?} answered wrong: {:?}", reply.riddle, reply.answer);
        match reply.riddle {
            Riddle::First => self.start_attack(stage),
            Riddle::Second => self.activate_portal(stage),
        }
    }

    pub fn start_attack<S: Stage + Presenter + ?Sized>(&mut self, stage: &mut S) -> Result<(), EncounterError> {
        let allowed = matches!(self.state, EncounterState::Idle | EncounterState::Riddle1Pending);
        if !allowed || self.attack.is_some() {
            return Err(self.refuse(Action::StartAttack));
        }
        self.close_prompt(stage);

        let tuning = &self.config.attack;
        let anchor = self.config.summoning_points.choose(&mut self.rng).copied().unwrap_or(Vec3::ZERO);
        let origin = anchor + Vec3::Y * tuning.antagonist_lift;
        let antagonist = stage.spawn(Prop::Antagonist, origin);

        self.attack = Some(AttackSequenceRun {
            remaining_lunges: tuning.lunge_count,
            antagonist,
            origin,
            phase: AttackPhase::Waking,
            yaw: tuning.wake_spin,
            routine: Routine::awaken(antagonist, tuning),
        });
        self.state = EncounterState::AttackActive;
        info!("antagonist awakens at {origin}");
        Ok(())
    }

    pub fn open_door<S: Presenter + ?Sized>(&mut self, stage: &mut S) -> Result<(), EncounterError> {
        let allowed = matches!(
            self.state,
            EncounterState::Idle | EncounterState::Riddle1Pending | EncounterState::Riddle2Pending
        );
        if !allowed || self.door.has_begun() {
            return Err(self.refuse(Action::OpenDoor));
        }
        self.close_prompt(stage);
        self.door.begin();
        self.state = EncounterState::DoorOpening;
        info!("the door begins to open");
        Ok(())
    }

    pub fn activate_portal<S: Stage + Presenter + ?Sized>(&mut self, stage: &mut S) -> Result<(), EncounterError> {
        if self.portal.active || self.state != EncounterState::Riddle2Pending {
            return Err(self.refuse(Action::ActivatePortal));
        }
        self.close_prompt(stage);

        let tuning = &self.config.portal;
        let ring = stage.spawn(Prop::PortalRing, tuning.center);
        self.portal.ignite(ring, tuning);
        stage.show_banner(tuning.omen, Tone::Dread);
        self.agenda.schedule(tuning.blackout_delay, Cue::Blackout);
        self.state = EncounterState::PortalActive;
        info!("the portal opens beneath the altar");
        Ok(())
    }

    fn on_cue<S: Stage + Presenter + ?Sized>(&mut self, cue: Cue, stage: &mut S) -> Result<(), EncounterError> {
        match cue {
            Cue::AskSecondRiddle => {
                if self.state != EncounterState::AttackActive || self.attack.is_some() {
                    return Err(self.refuse(Action::AskSecondRiddle));
                }
                self.state = EncounterState::Riddle2Pending;
                info!("second riddle");
                self.ask(Riddle::Second, stage);
            }
            Cue::Blackout => {
                if self.state != EncounterState::PortalActive {
                    return Err(self.refuse(Action::Blackout));
                }
                stage.show_blackout(self.config.portal.blackout_message);
                self.state = EncounterState::Resolved;
                self.outcome = Some(Outcome::Doomed);
                info!("the abyss takes the player");
            }
        }
        Ok(())
    }

    fn advance_attack<S: Stage + Presenter + ?Sized>(&mut self, delta: Duration, stage: &mut S) {
        let tuning = &self.config.attack;
        if let Some(run) = self.attack.as_mut().filter(|run| run.phase == AttackPhase::Lingering) {
            run.yaw += tuning.idle_spin;
            stage.set_pose(run.antagonist, Pose::default().with_rotation(Quat::from_rotation_y(run.yaw))).ok();
        }

        let mut delta = delta;
        loop {
            let Some(run) = self.attack.as_mut() else { return };
            if run.routine.advance(delta, stage, &mut self.rng) == Progress::Running {
                return;
            }
            delta = Duration::ZERO;

            match run.phase {
                AttackPhase::Waking => {
                    run.phase = AttackPhase::Lunging;
                    run.routine = Routine::lunge(run.antagonist, run.origin, tuning);
                }
                AttackPhase::Lunging => {
                    run.remaining_lunges = run.remaining_lunges.saturating_sub(1);
                    debug!("lunge done, {} left", run.remaining_lunges);
                    run.phase = AttackPhase::Lingering;
                    run.routine = Routine::pause(tuning.lunge_pause, tuning);
                }
                AttackPhase::Lingering if run.remaining_lunges > 0 => {
                    run.phase = AttackPhase::Lunging;
                    run.routine = Routine::lunge(run.antagonist, run.origin, tuning);
                }
                AttackPhase::Lingering => {
                    let antagonist = run.antagonist;
                    self.attack = None;
                    stage.despawn(antagonist);
                    self.agenda.schedule(self.config.riddle_two_delay, Cue::AskSecondRiddle);
                    info!("the antagonist sinks back into the floor");
                    return;
                }
            }
        }
    }

    fn advance_door<S: Stage + ?Sized>(&mut self, stage: &mut S) {
        if self.state != EncounterState::DoorOpening {
            return;
        }
        let Some(door) = stage.door() else {
            return;
        };
        let tuning = &self.config.door;
        self.door.advance(tuning.step_per_frame);
        let pose = Pose::at(tuning.origin + Vec3::X * self.door.lateral_offset(tuning))
            .with_rotation(Quat::from_rotation_y(self.door.swing_angle(tuning)));
        if let Err(err) = stage.set_pose(door, pose) {
            debug!("door pose skipped: {err}");
        }
        if self.door.is_open() {
            self.state = EncounterState::Resolved;
            self.outcome = Some(Outcome::Escaped);
            info!("the door stands open");
        }
    }

    fn advance_portal<S: Stage + ?Sized>(&mut self, stage: &mut S) {
        if !self.portal.active {
            return;
        }
        let tuning = &self.config.portal;
        if let Some(camera) = stage.camera_position() {
            stage.set_camera_position(camera.lerp(tuning.pull_target, tuning.pull_rate));
        }
        self.portal.advance(tuning);
        stage.set_backdrop(self.portal.backdrop);
        stage.set_altar_light(self.portal.light);
        if let Some(ring) = self.portal.ring {
            stage.set_pose(ring, Pose::scaled(Vec3::splat(self.portal.scale))).ok();
            stage.set_opacity(ring, self.portal.opacity);
        }
    }

    /// Dev shortcuts are refused while a prompt is open, so typing an answer
    /// never doubles as a command.
    pub fn dev_command<S>(&mut self, command: DevCommand, stage: &mut S) -> Result<(), EncounterError>
    where
        S: Stage + Presenter + ?Sized,
    {
        if self.prompt.is_open() {
            return Err(self.refuse(command.action()));
        }
        match command {
            DevCommand::OpenDoor => self.open_door(stage),
            DevCommand::StartAttack => self.start_attack(stage),
        }
    }

    /// Closes the prompt, clears transient overlays and drops pending cues.
    pub fn teardown<S: Presenter + ?Sized>(&mut self, stage: &mut S) {
        self.prompt.close();
        stage.clear_overlays();
        self.agenda.cancel_all();
    }
}

/// The system that advances the session. Anything else touching the camera
/// or the altar light runs after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncounterSet;

pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EncounterConfig>()
            .init_resource::<EncounterSession>()
            .add_systems(Update, drive_encounter.in_set(EncounterSet).after(PromptSet))
            .add_systems(Last, teardown_on_exit);
    }
}

fn drive_encounter(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut answers: EventReader<AnswerSubmitted>,
    mut session: ResMut<EncounterSession>,
    mut stage: SceneStage,
) {
    for AnswerSubmitted(answer) in answers.read() {
        if let Err(err) = session.submit_answer(answer, &mut stage) {
            debug!("answer ignored: {err}");
        }
    }

    for command in DevCommand::just_pressed(&keys) {
        if let Err(err) = session.dev_command(command, &mut stage) {
            debug!("dev {command:?} ignored: {err}");
        }
    }

    session.tick(time.delta(), &mut stage);
}

fn teardown_on_exit(
    mut exits: EventReader<AppExit>,
    mut session: ResMut<EncounterSession>,
    mut stage: SceneStage,
) {
    if exits.read().next().is_some() {
        session.teardown(&mut stage);
    }
}
