//! Proximity-fuse (kamikaze) controller.

use glam::Vec3;

use rogue_core::config::KamikazeTuning;
use rogue_core::enums::KamikazeState;
use rogue_core::types::lerp;

use crate::fsm::{Directive, Transition};

/// Input to the kamikaze FSM for a single agent.
#[derive(Debug, Clone, Copy)]
pub struct KamikazeContext<'a> {
    pub state: KamikazeState,
    pub visible: bool,
    pub sqr_distance: f32,
    pub fuse_remaining: f32,
    /// Scaled frame time.
    pub dt: f32,
    pub target_position: Vec3,
    pub tuning: &'a KamikazeTuning,
}

/// Output from the kamikaze FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct KamikazeUpdate {
    pub transition: Transition<KamikazeState>,
    pub fuse_remaining: f32,
}

/// Blast damage at `sqr_distance` from the centre, or `None` outside the
/// blast radius. Falls off linearly in squared distance from `max_damage`
/// at the centre to `min_damage` at the edge.
pub fn explosion_damage(sqr_distance: f32, tuning: &KamikazeTuning) -> Option<f32> {
    let sqr_range = tuning.explosion_range * tuning.explosion_range;
    if sqr_distance > sqr_range {
        return None;
    }
    Some(lerp(
        tuning.max_damage,
        tuning.min_damage,
        sqr_distance / sqr_range,
    ))
}

/// Evaluate the FSM for one kamikaze.
pub fn evaluate(ctx: &KamikazeContext<'_>) -> KamikazeUpdate {
    let tuning = ctx.tuning;
    let full_fuse = tuning.exploding_duration;
    let stay = |fuse_remaining| KamikazeUpdate {
        transition: Transition::stay(ctx.state),
        fuse_remaining,
    };

    match ctx.state {
        KamikazeState::Idle | KamikazeState::MovingToLastKnown => {
            if ctx.visible {
                KamikazeUpdate {
                    transition: Transition::to(
                        KamikazeState::Pursuing,
                        [Directive::ResumeMovement],
                    ),
                    fuse_remaining: full_fuse,
                }
            } else {
                stay(full_fuse)
            }
        }
        KamikazeState::Pursuing => {
            let sqr_explode = tuning.to_explode_range * tuning.to_explode_range;
            if ctx.visible && ctx.sqr_distance <= sqr_explode {
                KamikazeUpdate {
                    transition: Transition::to(
                        KamikazeState::AboutToExplode,
                        [Directive::HaltMovement, Directive::BeginFuse],
                    ),
                    fuse_remaining: full_fuse,
                }
            } else if !ctx.visible {
                KamikazeUpdate {
                    transition: Transition::to(
                        KamikazeState::MovingToLastKnown,
                        [Directive::SetDestination(ctx.target_position)],
                    ),
                    fuse_remaining: full_fuse,
                }
            } else {
                stay(full_fuse)
            }
        }
        KamikazeState::AboutToExplode => {
            let fuse = ctx.fuse_remaining - ctx.dt;
            let sqr_get_out = tuning.get_out_range * tuning.get_out_range;

            if fuse <= 0.0 {
                let damage = explosion_damage(ctx.sqr_distance, tuning);
                KamikazeUpdate {
                    transition: Transition {
                        new_state: ctx.state,
                        changed: false,
                        directives: vec![Directive::Detonate { damage }],
                    },
                    fuse_remaining: 0.0,
                }
            } else if ctx.visible && ctx.sqr_distance > sqr_get_out {
                KamikazeUpdate {
                    transition: Transition::to(
                        KamikazeState::Pursuing,
                        [Directive::ResumeMovement, Directive::AbortFuse],
                    ),
                    fuse_remaining: full_fuse,
                }
            } else if !ctx.visible {
                KamikazeUpdate {
                    transition: Transition::to(
                        KamikazeState::MovingToLastKnown,
                        [Directive::ResumeMovement, Directive::AbortFuse],
                    ),
                    fuse_remaining: full_fuse,
                }
            } else {
                stay(fuse)
            }
        }
    }
}
