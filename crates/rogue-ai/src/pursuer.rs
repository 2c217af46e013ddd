//! Pursue-and-fire controller.
//!
//! Chases a visible target, stops to fire once within firing range, and
//! walks to the last seen position when sight is lost.

use glam::Vec3;

use rogue_core::enums::PursuerState;

use crate::fsm::{Directive, Transition};

/// Input to the pursuer FSM for a single agent.
#[derive(Debug, Clone, Copy)]
pub struct PursuerContext {
    pub state: PursuerState,
    /// Cached perception result.
    pub visible: bool,
    /// Cached squared distance to the target.
    pub sqr_distance: f32,
    pub firing_range: f32,
    /// Current target position, used as the last known position when sight
    /// is lost this frame.
    pub target_position: Vec3,
}

impl PursuerContext {
    fn within_firing_range(&self) -> bool {
        self.sqr_distance <= self.firing_range * self.firing_range
    }
}

/// Evaluate the FSM for one pursuer.
pub fn evaluate(ctx: &PursuerContext) -> Transition<PursuerState> {
    match ctx.state {
        PursuerState::Idle => {
            if ctx.visible {
                Transition::to(PursuerState::Pursuing, [Directive::EnableNavigation])
            } else {
                Transition::stay(ctx.state)
            }
        }
        PursuerState::Pursuing => {
            if ctx.visible && ctx.within_firing_range() {
                Transition::to(
                    PursuerState::Firing,
                    [Directive::DisableNavigation, Directive::StartFiring],
                )
            } else if !ctx.visible {
                Transition::to(
                    PursuerState::MovingToLastKnown,
                    [
                        Directive::EnableNavigation,
                        Directive::SetDestination(ctx.target_position),
                    ],
                )
            } else {
                Transition::stay(ctx.state)
            }
        }
        PursuerState::Firing => {
            if ctx.visible && !ctx.within_firing_range() {
                Transition::to(
                    PursuerState::Pursuing,
                    [Directive::EnableNavigation, Directive::StopFiring],
                )
            } else if !ctx.visible {
                Transition::to(
                    PursuerState::MovingToLastKnown,
                    [
                        Directive::EnableNavigation,
                        Directive::SetDestination(ctx.target_position),
                        Directive::StopFiring,
                    ],
                )
            } else {
                Transition::stay(ctx.state)
            }
        }
        PursuerState::MovingToLastKnown => {
            if ctx.visible {
                Transition::to(PursuerState::Pursuing, [Directive::EnableNavigation])
            } else {
                Transition::stay(ctx.state)
            }
        }
    }
}

/// Whether the agent should steer toward the target in the physics step.
pub fn rotates_toward_target(state: PursuerState) -> bool {
    state == PursuerState::Firing
}
