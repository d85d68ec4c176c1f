// src/prompt.rs
use bevy::{prelude::*, window::ReceivedCharacter};

use crate::riddle::Riddle;

const PANEL_BG_COLOR: Color = Color::rgba(0.04, 0.0, 0.0, 0.92);
const BUTTON_BG_COLOR: Color = Color::rgb(0.25, 0.02, 0.02);
const BUTTON_HOVER_BG_COLOR: Color = Color::rgb(0.4, 0.05, 0.05);
const BUTTON_PRESSED_BG_COLOR: Color = Color::rgb(0.6, 0.1, 0.1);
const ANSWER_PLACEHOLDER: &str = "Type your answer...";

/// Tracks the single question the player may currently be answering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptGateway {
    open: Option<Riddle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptReply {
    pub riddle: Riddle,
    /// Trimmed, otherwise as typed.
    pub answer: String,
}

impl PromptGateway {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<Riddle> {
        self.open
    }

    /// Returns `false`, leaving the open prompt in place, if one is already up.
    pub fn open(&mut self, riddle: Riddle) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = Some(riddle);
        true
    }

    pub fn resolve(&mut self, raw: &str) -> Option<PromptReply> {
        let riddle = self.open.take()?;
        Some(PromptReply { riddle, answer: raw.trim().to_string() })
    }

    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }
}

/// Sent when the player hits Enter or clicks Submit.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmitted(pub String);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptSet;

#[derive(Component, Default)]
pub struct PromptModal {
    pub buffer: String,
}

#[derive(Component)]
struct PromptAnswerText;

#[derive(Component)]
struct PromptSubmitButton;

pub struct PromptPlugin;

impl Plugin for PromptPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnswerSubmitted>().add_systems(
            Update,
            (prompt_typing_system, prompt_submit_button_system, refresh_answer_text_system)
                .chain()
                .in_set(PromptSet),
        );
    }
}

pub fn spawn_prompt_modal(commands: &mut Commands, question: &str) {
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
                background_color: Color::rgba(0.0, 0.0, 0.0, 0.55).into(),
                z_index: ZIndex::Global(40),
                ..default()
            },
            PromptModal::default(),
            Name::new("PromptModal"),
        ))
        .with_children(|parent| {
            parent
                .spawn(NodeBundle {
                    style: Style {
                        width: Val::Px(560.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(14.0),
                        padding: UiRect::all(Val::Px(20.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    border_color: BorderColor(Color::rgb(0.5, 0.05, 0.05)),
                    background_color: PANEL_BG_COLOR.into(),
                    ..default()
                })
                .with_children(|panel| {
                    panel.spawn(TextBundle::from_section(
                        question,
                        TextStyle { font_size: 22.0, color: Color::rgb(0.95, 0.85, 0.85), ..default() },
                    ));
                    panel.spawn((
                        TextBundle::from_section(
                            ANSWER_PLACEHOLDER,
                            TextStyle { font_size: 20.0, color: Color::rgb(0.6, 0.55, 0.55), ..default() },
                        ),
                        PromptAnswerText,
                    ));
                    panel
                        .spawn((
                            ButtonBundle {
                                style: Style {
                                    width: Val::Px(140.0),
                                    height: Val::Px(40.0),
                                    align_self: AlignSelf::FlexEnd,
                                    justify_content: JustifyContent::Center,
                                    align_items: AlignItems::Center,
                                    ..default()
                                },
                                background_color: BUTTON_BG_COLOR.into(),
                                ..default()
                            },
                            PromptSubmitButton,
                        ))
                        .with_children(|button| {
                            button.spawn(TextBundle::from_section(
                                "Submit",
                                TextStyle { font_size: 20.0, color: Color::WHITE, ..default() },
                            ));
                        });
                });
        });
}

fn prompt_typing_system(
    mut characters: EventReader<ReceivedCharacter>,
    keys: Res<ButtonInput<KeyCode>>,
    mut modal_query: Query<&mut PromptModal>,
    mut submitted: EventWriter<AnswerSubmitted>,
) {
    let Ok(mut modal) = modal_query.get_single_mut() else {
        characters.clear();
        return;
    };
    for event in characters.read() {
        modal.buffer.extend(event.char.chars().filter(|c| !c.is_control()));
    }
    if keys.just_pressed(KeyCode::Backspace) {
        modal.buffer.pop();
    }
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::NumpadEnter) {
        submitted.send(AnswerSubmitted(modal.buffer.clone()));
    }
}

fn prompt_submit_button_system(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<PromptSubmitButton>),
    >,
    modal_query: Query<&PromptModal>,
    mut submitted: EventWriter<AnswerSubmitted>,
) {
    for (interaction, mut bg_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED_BG_COLOR.into();
                if let Ok(modal) = modal_query.get_single() {
                    submitted.send(AnswerSubmitted(modal.buffer.clone()));
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVER_BG_COLOR.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_BG_COLOR.into();
            }
        }
    }
}

fn refresh_answer_text_system(
    modal_query: Query<&PromptModal, Changed<PromptModal>>,
    mut text_query: Query<&mut Text, With<PromptAnswerText>>,
) {
    let Ok(modal) = modal_query.get_single() else { return };
    let Ok(mut text) = text_query.get_single_mut() else { return };
    if let Some(section) = text.sections.get_mut(0) {
        if modal.buffer.is_empty() {
            section.value = ANSWER_PLACEHOLDER.to_string();
            section.style.color = Color::rgb(0.6, 0.55, 0.55);
        } else {
            section.value = format!("{}_", modal.buffer);
            section.style.color = Color::WHITE;
        }
    }
}
