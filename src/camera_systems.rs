use bevy::prelude::*;

use crate::config::{CAMERA_LOOK_AT, CAMERA_START};
use crate::encounter::{EncounterSession, EncounterSet};
use crate::room::walkable_bounds;

const FLY_SPEED: f32 = 8.0; // units per second

#[derive(Component)]
pub struct MainCamera; // Marker component for the player's eye

pub struct CameraSystemsPlugin;

impl Plugin for CameraSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_main_camera)
            .add_systems(Update, fly_camera_system.after(EncounterSet));
    }
}

fn spawn_main_camera(mut commands: Commands) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(CAMERA_START).looking_at(CAMERA_LOOK_AT, Vec3::Y),
            ..default()
        },
        MainCamera,
        Name::new("MainCamera"),
    ));
}

fn fly_camera_system(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<EncounterSession>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if session.controls_locked() {
        return;
    }
    let Ok(mut camera_transform) = camera_query.get_single_mut() else { return };

    let mut direction = Vec3::ZERO;
    // Walk along the ground plane, whatever the camera pitch.
    let forward = Vec3::new(camera_transform.forward().x, 0.0, camera_transform.forward().z).normalize_or_zero();
    let right = Vec3::new(camera_transform.right().x, 0.0, camera_transform.right().z).normalize_or_zero();
    let bindings = [
        (KeyCode::KeyW, forward),
        (KeyCode::KeyS, -forward),
        (KeyCode::KeyD, right),
        (KeyCode::KeyA, -right),
        (KeyCode::KeyE, Vec3::Y),
        (KeyCode::KeyQ, Vec3::NEG_Y),
    ];
    for (key, heading) in bindings {
        if keys.pressed(key) {
            direction += heading;
        }
    }

    if direction == Vec3::ZERO {
        return;
    }
    let (min, max) = walkable_bounds();
    let next = camera_transform.translation + direction.normalize() * FLY_SPEED * time.delta_seconds();
    camera_transform.translation = next.clamp(min, max);
}
