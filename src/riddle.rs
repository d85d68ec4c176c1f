// src/riddle.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Riddle {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiddleDefinition {
    pub prompt: &'static str,
    /// Already normalized.
    pub accepted: &'static [&'static str],
}

pub const FIRST_RIDDLE: RiddleDefinition = RiddleDefinition {
    prompt: "Riddle: I speak without a mouth and hear without ears. \
             I have nobody, but I come alive with wind. What am I?",
    accepted: &["echo", "an echo"],
};

pub const SECOND_RIDDLE: RiddleDefinition = RiddleDefinition {
    prompt: "Riddle 2: The more you take, the more you leave behind. What am I?",
    accepted: &["footsteps", "footstep", "a footprint", "footprint", "footprints"],
};

pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

impl Riddle {
    pub fn definition(self) -> &'static RiddleDefinition {
        match self {
            Riddle::First => &FIRST_RIDDLE,
            Riddle::Second => &SECOND_RIDDLE,
        }
    }
}

impl RiddleDefinition {
    /// An empty answer is simply wrong.
    pub fn accepts(&self, answer: &str) -> bool {
        let answer = normalize(answer);
        self.accepted.iter().any(|accepted| *accepted == answer)
    }
}
