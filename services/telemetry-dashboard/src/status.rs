//! Connectivity state and the status light it drives

use serde::{Deserialize, Serialize};
use std::fmt;

/// The client's own view of whether its last poll succeeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Connected,
    #[default]
    Initializing,
    Error,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityState::Connected => write!(f, "Connected"),
            ConnectivityState::Initializing => write!(f, "Initializing"),
            ConnectivityState::Error => write!(f, "Error"),
        }
    }
}

/// Visual treatment of the status light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Success,
    Failure,
    Caution,
}

impl Signal {
    pub fn color(self) -> &'static str {
        match self {
            Signal::Success => "#4CAF50",
            Signal::Failure => "#f44336",
            Signal::Caution => "#ff9800",
        }
    }
}

/// Maps a connectivity state to its signal. No history is consulted.
pub fn signal_for(state: ConnectivityState) -> Signal {
    match state {
        ConnectivityState::Connected => Signal::Success,
        ConnectivityState::Error => Signal::Failure,
        ConnectivityState::Initializing => Signal::Caution,
    }
}

/// What the status light currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusLight {
    pub state: ConnectivityState,
    pub signal: Signal,
    pub color: &'static str,
}

impl StatusLight {
    pub fn showing(state: ConnectivityState) -> Self {
        let signal = signal_for(state);
        Self {
            state,
            signal,
            color: signal.color(),
        }
    }
}

impl Default for StatusLight {
    fn default() -> Self {
        Self::showing(ConnectivityState::Initializing)
    }
}
