// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lifecycle of the background drain task
//!
//! ```text
//! NotStarted ──start──► Running ──stop──► StopRequested ──drained──► Cancelled
//! ```
//!
//! Transitions only move one step forward. `Cancelled` is terminal.

use serde::{Deserialize, Serialize};

use crate::errors::{BusError, BusResult};

/// State of the bus's background drain task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrainState {
    #[default]
    NotStarted,
    Running,
    StopRequested,
    Cancelled,
}

impl DrainState {
    pub fn can_transition_to(self, next: DrainState) -> bool {
        matches!(
            (self, next),
            (DrainState::NotStarted, DrainState::Running)
                | (DrainState::Running, DrainState::StopRequested)
                | (DrainState::StopRequested, DrainState::Cancelled)
        )
    }

    pub fn transition(self, next: DrainState) -> BusResult<DrainState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BusError::InvalidDrainTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        self == DrainState::Cancelled
    }
}
