use bevy::{log::LogPlugin, prelude::*};

use secret_room::{
    audio::GameAudioPlugin,
    camera_systems::CameraSystemsPlugin,
    config::{SCREEN_HEIGHT, SCREEN_WIDTH},
    effects::EffectsPlugin,
    encounter::EncounterPlugin,
    prompt::PromptPlugin,
    room::RoomPlugin,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "The Secret Room".into(),
                        resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,secret_room=debug".into(),
                    ..default()
                }),
        )
        .add_plugins((
            EncounterPlugin,
            PromptPlugin,
            EffectsPlugin,
            RoomPlugin,
            CameraSystemsPlugin,
            GameAudioPlugin,
        ))
        .run();
}
