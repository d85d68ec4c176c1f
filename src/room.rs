// src/room.rs
//! The static dungeon: walls, lights, the altar with its pentagram and
//! candles, and the two props the encounter needs, the throne and the door.

use bevy::{asset::LoadState, prelude::*};
use std::f32::consts::TAU;

use crate::{
    components::{AltarLight, Door, Flicker, Landmark},
    config::{EncounterConfig, ALTAR_CENTER, DOOR_POSITION, PENTAGRAM_RADIUS, THRONE_POSITION},
    encounter::{EncounterSession, EncounterSet},
};

/// Scene light units per unit of narrative light intensity.
pub const LUMENS_PER_INTENSITY: f32 = 100_000.0;

const ROOM_WIDTH: f32 = 60.0;
const ROOM_HEIGHT: f32 = 20.0;
const ROOM_DEPTH: f32 = 100.0;
const WALL_CENTER_Y: f32 = 4.0;
const FLOOR_Y: f32 = -3.0;
const CEILING_Y: f32 = 14.0;
const SLAB: f32 = 0.2;
const STAR_ORDER: [usize; 6] = [0, 2, 4, 1, 3, 0];
const RING_SEGMENTS: usize = 48;
const THRONE_SCALE: f32 = 3.5;
const DOOR_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropKind {
    Throne,
    Door,
}

/// A glTF prop that has not finished loading yet. It only becomes visible to
/// the encounter once it is tagged.
#[derive(Component)]
struct PendingProp {
    kind: PropKind,
    scene: Handle<Scene>,
    file: &'static str,
}

pub struct RoomPlugin;

impl Plugin for RoomPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(AmbientLight { color: Color::rgb_u8(0x66, 0x33, 0x33), brightness: 150.0 })
            .add_systems(Startup, setup_room)
            .add_systems(
                Update,
                (settle_props_system, flicker_lights_system.after(EncounterSet), draw_summoning_circle_system),
            );
    }
}

fn setup_room(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<EncounterConfig>,
) {
    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: Color::rgb_u8(0xff, 0x22, 0x22),
                intensity: 2.0 * LUMENS_PER_INTENSITY,
                range: 80.0,
                shadows_enabled: true,
                ..default()
            },
            transform: Transform::from_xyz(0.0, 6.0, -10.0),
            ..default()
        },
        AltarLight,
        Flicker { base: 2.0, amplitude: 0.5, frequency: 3.0 },
        Name::new("AltarLight"),
    ));
    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: Color::rgb_u8(0xff, 0xaa, 0x33),
                intensity: 1.2 * LUMENS_PER_INTENSITY,
                range: 20.0,
                ..default()
            },
            transform: Transform::from_translation(ALTAR_CENTER + Vec3::Y),
            ..default()
        },
        Flicker { base: 1.0, amplitude: 0.3, frequency: 7.0 },
        Name::new("CandleLight"),
    ));
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight { illuminance: 2_500.0, ..default() },
            transform: Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        Name::new("MoonLight"),
    ));

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::rgb_u8(0x22, 0x00, 0x00),
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(ROOM_WIDTH, SLAB, ROOM_DEPTH + 20.0)),
            material: floor_material,
            transform: Transform::from_xyz(0.0, FLOOR_Y - SLAB / 2.0, 0.0),
            ..default()
        },
        Name::new("Floor"),
    ));
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(ROOM_WIDTH, SLAB, ROOM_DEPTH)),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb_u8(0x11, 0x11, 0x11),
                unlit: true,
                ..default()
            }),
            transform: Transform::from_xyz(0.0, CEILING_Y, -10.0),
            ..default()
        },
        Name::new("Ceiling"),
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color_texture: Some(asset_server.load("models/textures/dungeon-stone1-albedo2.png")),
        normal_map_texture: Some(asset_server.load("models/textures/dungeon-stone1-normal.png")),
        perceptual_roughness: 1.0,
        ..default()
    });
    let across = meshes.add(Cuboid::new(ROOM_WIDTH, ROOM_HEIGHT, SLAB));
    let along = meshes.add(Cuboid::new(SLAB, ROOM_HEIGHT, ROOM_DEPTH));
    let walls = [
        ("BackWall", across.clone(), Vec3::new(0.0, WALL_CENTER_Y, -ROOM_DEPTH / 2.0)),
        ("FrontWall", across, Vec3::new(0.0, WALL_CENTER_Y, ROOM_DEPTH / 2.0 - 10.0)),
        ("LeftWall", along.clone(), Vec3::new(-ROOM_WIDTH / 2.0, WALL_CENTER_Y, 0.0)),
        ("RightWall", along, Vec3::new(ROOM_WIDTH / 2.0, WALL_CENTER_Y, 0.0)),
    ];
    for (name, mesh, position) in walls {
        commands.spawn((
            PbrBundle {
                mesh,
                material: wall_material.clone(),
                transform: Transform::from_translation(position),
                ..default()
            },
            Name::new(name),
        ));
    }

    let candle_mesh = meshes.add(Cylinder::new(0.1, 0.5));
    let candle_material = materials.add(StandardMaterial {
        base_color: Color::rgb_u8(0xff, 0xff, 0xaa),
        emissive: Color::rgb(0.6, 0.4, 0.12),
        ..default()
    });
    for (i, point) in config.summoning_points.iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: candle_mesh.clone(),
                material: candle_material.clone(),
                transform: Transform::from_translation(*point + Vec3::Y * 0.25),
                ..default()
            },
            Name::new(format!("Candle_{i}")),
        ));
    }

    spawn_prop(&mut commands, &asset_server, PropKind::Throne, "models/scene.gltf", THRONE_POSITION, THRONE_SCALE);
    spawn_prop(&mut commands, &asset_server, PropKind::Door, "models/door.gltf", DOOR_POSITION, DOOR_SCALE);
}

fn spawn_prop(
    commands: &mut Commands,
    asset_server: &AssetServer,
    kind: PropKind,
    path: &'static str,
    position: Vec3,
    scale: f32,
) {
    let scene: Handle<Scene> = asset_server.load(format!("{path}#Scene0"));
    commands.spawn((
        SceneBundle {
            scene: scene.clone(),
            transform: Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            ..default()
        },
        PendingProp { kind, scene, file: path },
        Name::new(format!("{kind:?}")),
    ));
}

fn settle_props_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pending_query: Query<(Entity, &PendingProp)>,
) {
    for (entity, pending) in pending_query.iter() {
        let loaded = asset_server.is_loaded_with_dependencies(pending.scene.id());
        if !loaded {
            // A missing file fails the whole glTF, not the labeled scene.
            let failed = asset_server.load_state(pending.scene.id()) == LoadState::Failed
                || asset_server
                    .get_path_id(pending.file)
                    .is_some_and(|id| asset_server.load_state(id) == LoadState::Failed);
            if !failed {
                continue;
            }
            warn!("{:?} model failed to load, standing in a plain block", pending.kind);
            // Stand-ins are sized in prop space; the prop transform scales them up.
            let (size, color) = match pending.kind {
                PropKind::Throne => (Vec3::new(0.6, 0.8, 0.6), Color::rgb_u8(0x2a, 0x1a, 0x1a)),
                PropKind::Door => (Vec3::new(0.8, 1.2, 0.08), Color::rgb_u8(0x3b, 0x24, 0x14)),
            };
            let mesh = meshes.add(Cuboid::from_size(size));
            let material = materials.add(StandardMaterial { base_color: color, ..default() });
            commands.entity(entity).with_children(|parent| {
                parent.spawn(PbrBundle {
                    mesh,
                    material,
                    transform: Transform::from_xyz(0.0, size.y / 2.0, 0.0),
                    ..default()
                });
            });
        }

        let mut prop = commands.entity(entity);
        prop.remove::<PendingProp>();
        match pending.kind {
            PropKind::Throne => prop.insert(Landmark),
            PropKind::Door => prop.insert(Door),
        };
        debug!("{:?} is in place", pending.kind);
    }
}

fn flicker_lights_system(
    time: Res<Time>,
    session: Res<EncounterSession>,
    mut lights: Query<(&Flicker, &mut PointLight, Has<AltarLight>)>,
) {
    let t = time.elapsed_seconds();
    for (flicker, mut light, is_altar) in lights.iter_mut() {
        // The portal ramps the altar light itself.
        if is_altar && session.portal().active {
            continue;
        }
        light.intensity = (flicker.base + (t * flicker.frequency).sin() * flicker.amplitude) * LUMENS_PER_INTENSITY;
    }
}

fn draw_summoning_circle_system(mut gizmos: Gizmos, config: Res<EncounterConfig>) {
    let points = config.summoning_points;
    gizmos.linestrip(STAR_ORDER.iter().map(|&i| points[i]), Color::RED);
    for radius in [PENTAGRAM_RADIUS * 0.95, PENTAGRAM_RADIUS * 1.05] {
        let ring = (0..=RING_SEGMENTS).map(|i| {
            let angle = i as f32 / RING_SEGMENTS as f32 * TAU;
            ALTAR_CENTER + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        });
        gizmos.linestrip(ring, Color::RED);
    }
}

/// Room bounds the camera may fly within, padded away from the walls.
pub fn walkable_bounds() -> (Vec3, Vec3) {
    let pad = 1.0;
    (
        Vec3::new(-ROOM_WIDTH / 2.0 + pad, FLOOR_Y + pad, -ROOM_DEPTH / 2.0 + pad),
        Vec3::new(ROOM_WIDTH / 2.0 - pad, CEILING_Y - pad, ROOM_DEPTH / 2.0 - 10.0 - pad),
    )
}
