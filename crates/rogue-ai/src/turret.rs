//! Stationary turret controller.
//!
//! General perception decides whether the turret cares about the target at
//! all; a separate barrel ray decides whether it is aimed well enough to fire.

use rogue_core::enums::TurretState;

use crate::fsm::{Directive, Transition};

#[derive(Debug, Clone, Copy)]
pub struct TurretContext {
    pub state: TurretState,
    /// Cached perception result.
    pub visible: bool,
    /// This frame's barrel ray hit the target.
    pub aimed: bool,
}

pub fn evaluate(ctx: &TurretContext) -> Transition<TurretState> {
    match ctx.state {
        TurretState::Idle => {
            if ctx.visible {
                Transition::to(TurretState::FacingTarget, Vec::new())
            } else {
                Transition::stay(ctx.state)
            }
        }
        TurretState::FacingTarget => {
            if !ctx.visible {
                Transition::to(TurretState::Idle, Vec::new())
            } else if ctx.aimed {
                Transition::to(TurretState::Firing, [Directive::StartFiring])
            } else {
                Transition::stay(ctx.state)
            }
        }
        TurretState::Firing => {
            if !ctx.visible {
                Transition::to(TurretState::Idle, [Directive::StopFiring])
            } else if !ctx.aimed {
                Transition::to(TurretState::FacingTarget, [Directive::StopFiring])
            } else {
                Transition::stay(ctx.state)
            }
        }
    }
}

/// Whether the head tracks the target (and the barrel ray runs) this frame.
pub fn tracks_target(state: TurretState) -> bool {
    matches!(state, TurretState::FacingTarget | TurretState::Firing)
}
