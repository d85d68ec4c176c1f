use bevy::prelude::*;

#[derive(Event)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Debug, Clone, Copy)]
pub enum SoundEffect {
    Awakening,
    Impact,
    Correct,
    PortalRoar,
    Abyss,
}

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>()
            .add_systems(Update, play_sound_system);
    }
}

fn play_sound_system(
    mut sound_events: EventReader<PlaySoundEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    for event in sound_events.read() {
        let sound_effect = match event.0 {
            SoundEffect::Awakening => "audio/statue_awakening.ogg",
            SoundEffect::Impact => "audio/flesh_impact.ogg",
            SoundEffect::Correct => "audio/door_unlocked.ogg",
            SoundEffect::PortalRoar => "audio/portal_roar.ogg",
            SoundEffect::Abyss => "audio/abyss_swallow.ogg",
        };
        commands.spawn(AudioBundle {
            source: asset_server.load(sound_effect),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}
