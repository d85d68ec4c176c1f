// src/effects.rs
use bevy::prelude::*;
use rand::Rng;

use crate::{components::Lifetime, stage::Tone};

const BANNER_LIFETIME_SECONDS: f32 = 2.2;
const BANNER_FADE_SECONDS: f32 = 0.5;
const IMPACT_HOLD_SECONDS: f32 = 0.35;
const IMPACT_FADE_SECONDS: f32 = 0.5;
const IMPACT_BLOTCHES: usize = 9;
const BLACKOUT_FADE_SECONDS: f32 = 1.2;
const BLACKOUT_TEXT_COLOR: Color = Color::rgb(1.0, 100.0 / 255.0, 100.0 / 255.0);

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (banner_lifetime_system, impact_fade_system, blackout_fade_in_system),
        );
    }
}

#[derive(Component)]
pub struct Banner;

/// Red splash over the whole screen. Holds, then fades, then goes away.
#[derive(Component)]
pub struct ImpactOverlay {
    timer: Timer,
}

#[derive(Component)]
struct Blotch {
    alpha: f32,
}

#[derive(Component)]
pub struct BlackoutOverlay {
    fade: Timer,
}

#[derive(Component)]
struct BlackoutMessage;

pub fn spawn_banner(commands: &mut Commands, text: &str, tone: Tone) {
    let (text_color, bg_color) = match tone {
        Tone::Success => (Color::rgb(0.75, 1.0, 0.75), Color::rgba(0.0, 0.25, 0.05, 0.85)),
        Tone::Dread => (Color::rgb(1.0, 0.7, 0.7), Color::rgba(0.3, 0.0, 0.0, 0.85)),
    };
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    top: Val::Px(40.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                z_index: ZIndex::Global(60),
                ..default()
            },
            Banner,
            Lifetime { timer: Timer::from_seconds(BANNER_LIFETIME_SECONDS, TimerMode::Once) },
            Name::new("Banner"),
        ))
        .with_children(|parent| {
            parent
                .spawn(NodeBundle {
                    style: Style { padding: UiRect::axes(Val::Px(24.0), Val::Px(10.0)), ..default() },
                    background_color: bg_color.into(),
                    ..default()
                })
                .with_children(|plate| {
                    plate.spawn(TextBundle::from_section(
                        text,
                        TextStyle { font_size: 26.0, color: text_color, ..default() },
                    ));
                });
        });
}

pub fn spawn_impact_splash(commands: &mut Commands) {
    let mut rng = rand::thread_rng();
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                background_color: Color::rgba(0.5, 0.0, 0.0, 0.35).into(),
                z_index: ZIndex::Global(70),
                ..default()
            },
            ImpactOverlay {
                timer: Timer::from_seconds(IMPACT_HOLD_SECONDS + IMPACT_FADE_SECONDS, TimerMode::Once),
            },
            Blotch { alpha: 0.35 },
            Name::new("ImpactOverlay"),
        ))
        .with_children(|parent| {
            for _ in 0..IMPACT_BLOTCHES {
                let size = rng.gen_range(6.0..18.0);
                let alpha = rng.gen_range(0.5..0.85);
                parent.spawn((
                    NodeBundle {
                        style: Style {
                            position_type: PositionType::Absolute,
                            left: Val::Percent(rng.gen_range(0.0..90.0)),
                            top: Val::Percent(rng.gen_range(0.0..85.0)),
                            width: Val::Vw(size),
                            height: Val::Vw(size),
                            ..default()
                        },
                        background_color: Color::rgba(0.55, 0.0, 0.02, alpha).into(),
                        ..default()
                    },
                    Blotch { alpha },
                ));
            }
        });
}

pub fn spawn_blackout(commands: &mut Commands, message: &str) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: Color::rgba(0.0, 0.0, 0.0, 0.0).into(),
                z_index: ZIndex::Global(100),
                ..default()
            },
            BlackoutOverlay { fade: Timer::from_seconds(BLACKOUT_FADE_SECONDS, TimerMode::Once) },
            Name::new("Blackout"),
        ))
        .with_children(|parent| {
            parent.spawn((
                TextBundle::from_section(
                    message,
                    TextStyle { font_size: 22.0, color: BLACKOUT_TEXT_COLOR.with_a(0.0), ..default() },
                ),
                BlackoutMessage,
            ));
        });
}

fn banner_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    mut banner_query: Query<(Entity, &mut Lifetime, &Children), With<Banner>>,
    plate_query: Query<&Children>,
    mut colors: Query<&mut BackgroundColor>,
    mut texts: Query<&mut Text>,
) {
    for (entity, mut lifetime, children) in banner_query.iter_mut() {
        lifetime.timer.tick(time.delta());
        if lifetime.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let left = lifetime.timer.remaining_secs();
        if left > BANNER_FADE_SECONDS {
            continue;
        }
        let alpha = left / BANNER_FADE_SECONDS;
        for &plate in children.iter() {
            if let Ok(mut bg) = colors.get_mut(plate) {
                bg.0.set_a(0.85 * alpha);
            }
            let Ok(plate_children) = plate_query.get(plate) else { continue };
            for &label in plate_children.iter() {
                if let Ok(mut text) = texts.get_mut(label) {
                    for section in text.sections.iter_mut() {
                        section.style.color.set_a(alpha);
                    }
                }
            }
        }
    }
}

fn impact_fade_system(
    mut commands: Commands,
    time: Res<Time>,
    mut overlay_query: Query<(Entity, &mut ImpactOverlay, Option<&Children>)>,
    mut blotches: Query<(&Blotch, &mut BackgroundColor)>,
) {
    for (entity, mut overlay, children) in overlay_query.iter_mut() {
        overlay.timer.tick(time.delta());
        if overlay.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let elapsed = overlay.timer.elapsed_secs();
        let strength = if elapsed < IMPACT_HOLD_SECONDS {
            1.0
        } else {
            1.0 - ((elapsed - IMPACT_HOLD_SECONDS) / IMPACT_FADE_SECONDS).clamp(0.0, 1.0)
        };
        let fading = std::iter::once(entity).chain(children.into_iter().flat_map(|c| c.iter().copied()));
        for target in fading {
            if let Ok((blotch, mut bg)) = blotches.get_mut(target) {
                bg.0.set_a(blotch.alpha * strength);
            }
        }
    }
}

fn blackout_fade_in_system(
    time: Res<Time>,
    mut overlay_query: Query<(&mut BlackoutOverlay, &mut BackgroundColor)>,
    mut message_query: Query<&mut Text, With<BlackoutMessage>>,
) {
    for (mut overlay, mut bg) in overlay_query.iter_mut() {
        if overlay.fade.finished() {
            continue;
        }
        overlay.fade.tick(time.delta());
        let alpha = overlay.fade.fraction();
        bg.0.set_a(alpha);
        for mut text in message_query.iter_mut() {
            for section in text.sections.iter_mut() {
                section.style.color.set_a(alpha);
            }
        }
    }
}
