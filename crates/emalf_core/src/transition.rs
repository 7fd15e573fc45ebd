//! Two-state "animating" machine gating when a new idea becomes visible.
//!
//! `Idle → begin → Animating → poll (deadline reached) → Idle`.
//! `cancel` drops a pending value; used on teardown so nothing fires later.

use crate::model::idea::Idea;
use std::time::{Duration, Instant};

/// Delay between requesting a new idea and showing it.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Idle,
    Animating {
        pending: Idea,
        deadline: Instant,
    },
}

impl Transition {
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }

    /// Starts animating towards `pending`.
    ///
    /// Returns `false` and leaves the state untouched when a transition is
    /// already running.
    pub fn begin(&mut self, pending: Idea, deadline: Instant) -> bool {
        if self.is_animating() {
            return false;
        }
        *self = Self::Animating { pending, deadline };
        true
    }

    /// Completes the transition when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> Option<Idea> {
        let due = matches!(self, Self::Animating { deadline, .. } if now >= *deadline);
        if due {
            self.cancel()
        } else {
            None
        }
    }

    /// Aborts a running transition, returning the discarded value.
    pub fn cancel(&mut self) -> Option<Idea> {
        match std::mem::take(self) {
            Self::Animating { pending, .. } => Some(pending),
            Self::Idle => None,
        }
    }

    /// Time left until the pending value is due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Self::Animating { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            Self::Idle => None,
        }
    }
}
