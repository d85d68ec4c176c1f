mod common;

use bevy::prelude::*;
use common::RecordingStage;
use rand::{rngs::StdRng, SeedableRng};
use secret_room::config::AttackTuning;
use secret_room::error::EncounterError;
use secret_room::sequencer::{CameraShake, Progress, Routine};
use secret_room::stage::{Prop, Stage};
use std::time::Duration;

#[test]
fn test_camera_shake_restores_exact_position_for_any_seed() {
    let anchor = Vec3::new(8.0, 6.0, 12.0);
    for seed in 0..32u64 {
        let mut stage = RecordingStage::new();
        stage.camera = Some(anchor);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shake = CameraShake::new(Duration::from_millis(360), 0.6);

        let mut frames = 0;
        loop {
            frames += 1;
            assert!(frames < 1000, "shake never settled for seed {seed}");
            let delta = Duration::from_millis(7 + seed % 20);
            let done = shake.advance(delta, &mut stage, &mut rng).expect("camera present");
            let offset = stage.camera.expect("camera present") - anchor;
            assert!(offset.x.abs() <= 0.6 + 1e-5);
            assert!(offset.y.abs() <= 0.36 + 1e-5);
            assert!(offset.z.abs() <= 0.36 + 1e-5);
            if done {
                break;
            }
        }
        assert_eq!(stage.camera, Some(anchor), "seed {seed} left the camera displaced");
    }
}

#[test]
fn test_camera_shake_waits_for_a_camera() {
    let mut stage = RecordingStage::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut shake = CameraShake::new(Duration::from_millis(360), 0.6);
    assert_eq!(
        shake.advance(Duration::from_millis(16), &mut stage, &mut rng),
        Err(EncounterError::MissingCollaborator("camera"))
    );
}

#[test]
fn test_lunge_strikes_once_and_returns_to_origin() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::furnished();
    let origin = Vec3::new(0.0, -1.89, -14.0);
    let antagonist = stage.spawn(Prop::Antagonist, origin);
    let mut rng = StdRng::seed_from_u64(9);
    let mut routine = Routine::lunge(antagonist, origin, &tuning);

    assert_eq!(routine.advance(Duration::from_millis(120), &mut stage, &mut rng), Progress::Running);
    let midway = stage.translation_of(antagonist).expect("antagonist alive");
    let camera = stage.camera.expect("camera present");
    let toward_camera = Vec3::new(camera.x, origin.y, camera.z) - origin;
    assert!((midway - origin).dot(toward_camera) > 0.0, "lunge heads for the player");
    assert!((midway.y - origin.y).abs() < 1e-5, "lunge stays level");
    assert_eq!(stage.impacts, 0);

    let mut frames = 0;
    while routine.advance(Duration::from_millis(16), &mut stage, &mut rng) == Progress::Running {
        frames += 1;
        assert!(frames < 500);
    }
    assert_eq!(stage.impacts, 1);
    assert_eq!(stage.translation_of(antagonist), Some(origin));
    assert_eq!(stage.camera, Some(camera));
    assert!(routine.is_finished());
}

#[test]
fn test_lunge_eases_out_toward_the_strike() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::new();
    stage.camera = Some(Vec3::new(10.0, 0.0, 0.0));
    let antagonist = stage.spawn(Prop::Antagonist, Vec3::ZERO);
    let mut rng = StdRng::seed_from_u64(4);
    let mut routine = Routine::lunge(antagonist, Vec3::ZERO, &tuning);

    routine.advance(tuning.lunge_duration / 2, &mut stage, &mut rng);
    let halfway = stage.translation_of(antagonist).expect("antagonist alive");
    let strike_x = 10.0 * tuning.lunge_reach;
    assert!(halfway.x > strike_x / 2.0, "covers most of the ground early: {halfway}");
    assert!(halfway.x < strike_x);
}

#[test]
fn test_pause_holds_for_its_duration() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut routine = Routine::pause(Duration::from_millis(280), &tuning);

    assert_eq!(routine.advance(Duration::from_millis(200), &mut stage, &mut rng), Progress::Running);
    assert_eq!(routine.advance(Duration::from_millis(80), &mut stage, &mut rng), Progress::Finished);
}

#[test]
fn test_lunge_stops_short_of_the_camera() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::new();
    stage.camera = Some(Vec3::new(10.0, 5.0, 0.0));
    let origin = Vec3::ZERO;
    let antagonist = stage.spawn(Prop::Antagonist, origin);
    let mut rng = StdRng::seed_from_u64(3);
    let mut routine = Routine::lunge(antagonist, origin, &tuning);

    // Lands exactly on the end of the forward move, right before the impact.
    routine.advance(tuning.lunge_duration, &mut stage, &mut rng);
    let strike = stage.translation_of(antagonist).expect("antagonist alive");
    assert!((strike - Vec3::new(10.0 * tuning.lunge_reach, 0.0, 0.0)).length() < 1e-4);
    assert_eq!(stage.impacts, 1);
}

#[test]
fn test_lunge_waits_while_camera_is_missing() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::new();
    let antagonist = stage.spawn(Prop::Antagonist, Vec3::ZERO);
    let mut rng = StdRng::seed_from_u64(5);
    let mut routine = Routine::lunge(antagonist, Vec3::ZERO, &tuning);

    for _ in 0..10 {
        assert_eq!(routine.advance(Duration::from_millis(50), &mut stage, &mut rng), Progress::Running);
    }
    assert_eq!(routine.remaining_steps(), 1);
    assert_eq!(stage.impacts, 0);

    stage.camera = Some(Vec3::new(0.0, 0.0, 10.0));
    routine.advance(Duration::from_millis(16), &mut stage, &mut rng);
    assert!(routine.remaining_steps() > 1, "lunge expanded once the camera appeared");
}

#[test]
fn test_awaken_grows_the_antagonist() {
    let tuning = AttackTuning::default();
    let mut stage = RecordingStage::new();
    let antagonist = stage.spawn(Prop::Antagonist, Vec3::ZERO);
    let mut rng = StdRng::seed_from_u64(2);
    let mut routine = Routine::awaken(antagonist, &tuning);

    routine.advance(Duration::from_millis(1), &mut stage, &mut rng);
    let early = stage.transforms[&antagonist].scale.x;
    while routine.advance(Duration::from_millis(33), &mut stage, &mut rng) == Progress::Running {}
    let late = stage.transforms[&antagonist].scale.x;

    assert!(early < late);
    assert!((late - tuning.wake_scale.1).abs() < 1e-5);
}
