//! Shared output types for the enemy state machines.
//!
//! Evaluators are pure functions: they read a context built from cached
//! perception and timers and return the next state plus the side effects
//! the simulation should apply. No ECS dependency.

use glam::Vec3;

/// A side effect requested by a state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    StartFiring,
    StopFiring,
    /// Turn path-following on.
    EnableNavigation,
    /// Turn path-following off and drop any residual velocity.
    DisableNavigation,
    /// Keep the destination but hold position.
    HaltMovement,
    ResumeMovement,
    SetDestination(Vec3),
    /// Start the fuse charge-up.
    BeginFuse,
    /// Cancel the fuse; timers are already reset in the update.
    AbortFuse,
    /// Blow up and remove self. `damage` is `None` when the target is out of
    /// blast range.
    Detonate { damage: Option<f32> },
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    pub new_state: S,
    pub changed: bool,
    pub directives: Vec<Directive>,
}

impl<S: Copy + PartialEq> Transition<S> {
    /// Remain in `state` with no side effects.
    pub fn stay(state: S) -> Self {
        Self {
            new_state: state,
            changed: false,
            directives: Vec::new(),
        }
    }

    /// Move to `state`, requesting `directives` in order.
    pub fn to(state: S, directives: impl Into<Vec<Directive>>) -> Self {
        Self {
            new_state: state,
            changed: true,
            directives: directives.into(),
        }
    }

    pub fn has(&self, directive: &Directive) -> bool {
        self.directives.contains(directive)
    }
}
