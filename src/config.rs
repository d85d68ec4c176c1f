// src/config.rs
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

pub const CAMERA_START: Vec3 = Vec3::new(8.0, 6.0, 12.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, -2.0, -10.0);

pub const ALTAR_CENTER: Vec3 = Vec3::new(0.0, -2.99, -10.0);
pub const PENTAGRAM_RADIUS: f32 = 4.0;
pub const THRONE_POSITION: Vec3 = Vec3::new(0.0, -0.5, -40.0);
pub const DOOR_POSITION: Vec3 = Vec3::new(0.0, -3.0, 40.0);

const PROXIMITY_INTERVAL_MS: u64 = 600;
const PROXIMITY_THRESHOLD: f32 = 6.0;
const RIDDLE_TWO_DELAY_MS: u64 = 450;
const BLACKOUT_DELAY_MS: u64 = 7500;

/// The five points of the pentagram drawn around the altar, starting at the
/// top and walking clockwise.
pub fn summoning_circle(center: Vec3, radius: f32) -> [Vec3; 5] {
    let mut points = [Vec3::ZERO; 5];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = i as f32 * TAU / 5.0 - PI / 2.0;
        *point = Vec3::new(center.x + angle.cos() * radius, center.y, center.z + angle.sin() * radius);
    }
    points
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackTuning {
    pub lunge_count: u32,
    /// How far along the line from its origin to the camera a lunge travels
    /// before stopping short.
    pub lunge_reach: f32,
    pub lunge_duration: Duration,
    pub retreat_duration: Duration,
    pub lunge_pause: Duration,
    pub wake_duration: Duration,
    pub wake_scale: (f32, f32),
    pub wake_spin: f32,
    /// Yaw added every frame while the antagonist lingers between lunges.
    pub idle_spin: f32,
    pub shake_duration: Duration,
    pub shake_magnitude: f32,
    pub antagonist_lift: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            lunge_count: 5,
            lunge_reach: 0.7,
            lunge_duration: Duration::from_millis(240),
            retreat_duration: Duration::from_millis(240),
            lunge_pause: Duration::from_millis(280),
            wake_duration: Duration::from_millis(400),
            wake_scale: (0.8, 1.2),
            wake_spin: 0.72,
            idle_spin: 0.01,
            shake_duration: Duration::from_millis(360),
            shake_magnitude: 0.6,
            antagonist_lift: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorTuning {
    pub origin: Vec3,
    pub step_per_frame: f32,
    pub swing: f32,
    pub slide: f32,
}

impl Default for DoorTuning {
    fn default() -> Self {
        Self { origin: DOOR_POSITION, step_per_frame: 0.02, swing: PI * 0.6, slide: 6.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalTuning {
    pub center: Vec3,
    pub pull_target: Vec3,
    pub pull_rate: f32,
    pub initial_scale: f32,
    pub scale_step: f32,
    pub scale_cap: f32,
    pub opacity_step: f32,
    pub backdrop_from: Vec3,
    pub backdrop_to: Vec3,
    pub backdrop_blend: f32,
    pub light_from: f32,
    pub light_step: f32,
    pub light_cap: f32,
    pub blackout_delay: Duration,
    pub omen: &'static str,
    pub blackout_message: &'static str,
}

impl Default for PortalTuning {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, -2.98, -10.01),
            pull_target: Vec3::new(0.0, -1.5, -10.0),
            pull_rate: 0.02,
            initial_scale: 0.01,
            scale_step: 0.02,
            scale_cap: 2.5,
            opacity_step: 0.02,
            backdrop_from: Vec3::ZERO,
            backdrop_to: Vec3::new(34.0 / 255.0, 0.0, 0.0),
            backdrop_blend: 0.01,
            light_from: 2.0,
            light_step: 0.2,
            light_cap: 12.0,
            blackout_delay: Duration::from_millis(BLACKOUT_DELAY_MS),
            omen: "Wrong. The pentagram ignites...",
            blackout_message: "You have been dragged into the abyss...",
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EncounterConfig {
    pub proximity_interval: Duration,
    pub proximity_threshold: f32,
    pub riddle_two_delay: Duration,
    pub summoning_points: [Vec3; 5],
    pub attack: AttackTuning,
    pub door: DoorTuning,
    pub portal: PortalTuning,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            proximity_interval: Duration::from_millis(PROXIMITY_INTERVAL_MS),
            proximity_threshold: PROXIMITY_THRESHOLD,
            riddle_two_delay: Duration::from_millis(RIDDLE_TWO_DELAY_MS),
            summoning_points: summoning_circle(ALTAR_CENTER, PENTAGRAM_RADIUS),
            attack: AttackTuning::default(),
            door: DoorTuning::default(),
            portal: PortalTuning::default(),
        }
    }
}
