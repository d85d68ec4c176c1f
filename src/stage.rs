// src/stage.rs
//! The narrow surface the encounter engine drives. `Stage` is the scene,
//! `Presenter` is the overlay layer. `SceneStage` implements both on top of
//! the Bevy world; tests implement them with plain recorders.

use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    camera_systems::MainCamera,
    components::{AltarLight, Antagonist, Door, Landmark, PortalRing},
    effects::{spawn_banner, spawn_blackout, spawn_impact_splash, Banner, ImpactOverlay},
    error::EncounterError,
    prompt::{spawn_prompt_modal, PromptModal},
    room::LUMENS_PER_INTENSITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    Antagonist,
    PortalRing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Dread,
}

/// A partial transform update; `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl Pose {
    pub fn at(translation: Vec3) -> Self {
        Self { translation: Some(translation), ..default() }
    }

    pub fn scaled(scale: Vec3) -> Self {
        Self { scale: Some(scale), ..default() }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn apply(&self, transform: &mut Transform) {
        if let Some(translation) = self.translation {
            transform.translation = translation;
        }
        if let Some(rotation) = self.rotation {
            transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            transform.scale = scale;
        }
    }
}

pub trait Stage {
    fn spawn(&mut self, prop: Prop, position: Vec3) -> Entity;
    fn despawn(&mut self, entity: Entity);
    fn set_pose(&mut self, entity: Entity, pose: Pose) -> Result<(), EncounterError>;
    fn set_opacity(&mut self, entity: Entity, alpha: f32);
    fn camera_position(&self) -> Option<Vec3>;
    fn set_camera_position(&mut self, position: Vec3);
    fn landmark_position(&self) -> Option<Vec3>;
    fn door(&self) -> Option<Entity>;
    fn set_backdrop(&mut self, color: Vec3);
    fn set_altar_light(&mut self, intensity: f32);
}

/// Fire-and-forget overlays. Nothing here reports back.
pub trait Presenter {
    fn present_prompt(&mut self, question: &str);
    fn dismiss_prompt(&mut self);
    fn show_banner(&mut self, text: &str, tone: Tone);
    fn show_impact(&mut self);
    fn show_blackout(&mut self, message: &str);
    /// Removes the prompt, banners and the impact splash.
    fn clear_overlays(&mut self);
}

#[derive(SystemParam)]
pub struct SceneStage<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    clear_color: ResMut<'w, ClearColor>,
    camera: Query<'w, 's, &'static mut Transform, With<MainCamera>>,
    props: Query<'w, 's, &'static mut Transform, Without<MainCamera>>,
    prop_materials: Query<'w, 's, &'static Handle<StandardMaterial>>,
    landmarks: Query<'w, 's, Entity, With<Landmark>>,
    doors: Query<'w, 's, Entity, With<Door>>,
    altar_lights: Query<'w, 's, &'static mut PointLight, With<AltarLight>>,
    prompts: Query<'w, 's, Entity, With<PromptModal>>,
    overlays: Query<'w, 's, Entity, Or<(With<Banner>, With<ImpactOverlay>)>>,
    impacts: Query<'w, 's, Entity, With<ImpactOverlay>>,
    sounds: EventWriter<'w, PlaySoundEvent>,
}

impl Stage for SceneStage<'_, '_> {
    fn spawn(&mut self, prop: Prop, position: Vec3) -> Entity {
        match prop {
            Prop::Antagonist => {
                self.sounds.send(PlaySoundEvent(SoundEffect::Awakening));
                self.commands
                    .spawn((
                        PbrBundle {
                            mesh: self.meshes.add(Cuboid::new(0.8, 2.2, 0.8)),
                            material: self.materials.add(StandardMaterial {
                                base_color: Color::rgb_u8(0x33, 0x00, 0x00),
                                emissive: Color::rgb_u8(0x22, 0x00, 0x00),
                                perceptual_roughness: 0.8,
                                ..default()
                            }),
                            transform: Transform::from_translation(position),
                            ..default()
                        },
                        Antagonist,
                        Name::new("Antagonist (Throne Guardian)"),
                    ))
                    .id()
            }
            Prop::PortalRing => {
                self.sounds.send(PlaySoundEvent(SoundEffect::PortalRoar));
                self.commands
                    .spawn((
                        PbrBundle {
                            mesh: self.meshes.add(Circle::new(crate::config::PENTAGRAM_RADIUS * 1.2)),
                            material: self.materials.add(StandardMaterial {
                                base_color: Color::rgba_u8(0x44, 0x00, 0x00, 0),
                                alpha_mode: AlphaMode::Blend,
                                unlit: true,
                                double_sided: true,
                                cull_mode: None,
                                ..default()
                            }),
                            transform: Transform::from_translation(position)
                                .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
                            ..default()
                        },
                        PortalRing,
                        Name::new("PortalRing"),
                    ))
                    .id()
            }
        }
    }

    fn despawn(&mut self, entity: Entity) {
        if let Some(entity_commands) = self.commands.get_entity(entity) {
            entity_commands.despawn_recursive();
        }
    }

    fn set_pose(&mut self, entity: Entity, pose: Pose) -> Result<(), EncounterError> {
        let mut transform = self.props.get_mut(entity).map_err(|_| EncounterError::MissingCollaborator("prop"))?;
        pose.apply(&mut transform);
        Ok(())
    }

    fn set_opacity(&mut self, entity: Entity, alpha: f32) {
        let Ok(handle) = self.prop_materials.get(entity) else { return };
        if let Some(material) = self.materials.get_mut(handle) {
            material.base_color.set_a(alpha.clamp(0.0, 1.0));
        }
    }

    fn camera_position(&self) -> Option<Vec3> {
        self.camera.get_single().ok().map(|transform| transform.translation)
    }

    fn set_camera_position(&mut self, position: Vec3) {
        if let Ok(mut transform) = self.camera.get_single_mut() {
            transform.translation = position;
        }
    }

    fn landmark_position(&self) -> Option<Vec3> {
        let landmark = self.landmarks.get_single().ok()?;
        self.props.get(landmark).ok().map(|transform| transform.translation)
    }

    fn door(&self) -> Option<Entity> {
        self.doors.get_single().ok()
    }

    fn set_backdrop(&mut self, color: Vec3) {
        self.clear_color.0 = Color::rgb(color.x, color.y, color.z);
    }

    fn set_altar_light(&mut self, intensity: f32) {
        for mut light in self.altar_lights.iter_mut() {
            light.intensity = intensity * LUMENS_PER_INTENSITY;
        }
    }
}

impl Presenter for SceneStage<'_, '_> {
    fn present_prompt(&mut self, question: &str) {
        spawn_prompt_modal(&mut self.commands, question);
    }

    fn dismiss_prompt(&mut self) {
        for entity in self.prompts.iter() {
            self.commands.entity(entity).despawn_recursive();
        }
    }

    fn show_banner(&mut self, text: &str, tone: Tone) {
        if tone == Tone::Success {
            self.sounds.send(PlaySoundEvent(SoundEffect::Correct));
        }
        spawn_banner(&mut self.commands, text, tone);
    }

    fn show_impact(&mut self) {
        // One splash at a time; a fresh hit replaces the fading one.
        for entity in self.impacts.iter() {
            self.commands.entity(entity).despawn_recursive();
        }
        self.sounds.send(PlaySoundEvent(SoundEffect::Impact));
        spawn_impact_splash(&mut self.commands);
    }

    fn show_blackout(&mut self, message: &str) {
        self.sounds.send(PlaySoundEvent(SoundEffect::Abyss));
        spawn_blackout(&mut self.commands, message);
    }

    fn clear_overlays(&mut self) {
        for entity in self.prompts.iter().chain(self.overlays.iter()) {
            self.commands.entity(entity).despawn_recursive();
        }
    }
}
