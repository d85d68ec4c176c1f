use bevy::prelude::*;

#[derive(Component)]
pub struct Lifetime {
    pub timer: Timer,
}

/// The throne the player is lured towards.
#[derive(Component)]
pub struct Landmark;

#[derive(Component)]
pub struct Door;

#[derive(Component)]
pub struct Antagonist;

#[derive(Component)]
pub struct PortalRing;

/// The red point light above the altar. The portal takes it over once open.
#[derive(Component)]
pub struct AltarLight;

#[derive(Component)]
pub struct Flicker {
    pub base: f32,
    pub amplitude: f32,
    pub frequency: f32,
}
