//! Incident lifecycle: states, actions and the transition table

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Lifecycle state of an incident
///
/// `New` is the only legal initial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    New,
    InProgress,
    Cancelled,
}

impl State {
    /// Actions a client may invoke on an incident in this state
    ///
    /// | State      | Allowed                 |
    /// |------------|-------------------------|
    /// | New        | Cancel, StartWorking    |
    /// | InProgress | Cancel                  |
    /// | Cancelled  | (terminal)              |
    pub fn allowed_actions(self) -> BTreeSet<Action> {
        let actions: &[Action] = match self {
            State::New => &[Action::Cancel, Action::StartWorking],
            State::InProgress => &[Action::Cancel],
            State::Cancelled => &[],
        };
        actions.iter().copied().collect()
    }

    /// The state reached by applying `action`, if it is allowed here
    pub fn transition(self, action: Action) -> Option<State> {
        if !self.allowed_actions().contains(&action) {
            return None;
        }
        Some(match action {
            Action::Cancel => State::Cancelled,
            Action::StartWorking => State::InProgress,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            State::New => "new",
            State::InProgress => "in_progress",
            State::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(State::New),
            "in_progress" => Ok(State::InProgress),
            "cancelled" => Ok(State::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown incident state '{}'",
                other
            ))),
        }
    }
}

/// A named, state-gated operation on an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Cancel,
    StartWorking,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Cancel => "cancel",
            Action::StartWorking => "start_working",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(Action::Cancel),
            "start_working" => Ok(Action::StartWorking),
            other => Err(DomainError::validation(format!(
                "unknown incident action '{}'",
                other
            ))),
        }
    }
}
