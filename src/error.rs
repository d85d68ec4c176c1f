use thiserror::Error;

use crate::encounter::{Action, EncounterState};

/// Everything the encounter can refuse to do. None of these are fatal: the
/// caller logs them and the narrative stays where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("{action:?} is not legal while {from:?}")]
    InvalidTransition { from: EncounterState, action: Action },

    #[error("{0} is not in the scene yet")]
    MissingCollaborator(&'static str),
}
