//! Damage dispatch and death handling.
//!
//! The ECS world is the capability registry: a ray hit names an entity, and
//! that entity takes damage only if it carries a [`DamageReceiver`].
//! Anything else is a silent no-op.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rogue_core::components::{Agent, Goal, Player, Regeneration, Transform};
use rogue_core::config::TuningConfig;
use rogue_core::damage::{DamageOutcome, DamageReceiver, Damageable};
use rogue_core::enums::{EffectKind, WeaponType};
use rogue_core::events::SimEvent;

use crate::components::DeathReward;
use crate::run_stats::RunStats;
use crate::slowmo::SlowmoController;
use crate::systems::agent_id;
use crate::world_setup;

/// One damage call against the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
    pub weapon_type: WeaponType,
}

/// Everything death handling may touch besides the world.
pub struct DamageContext<'a> {
    pub stats: &'a mut RunStats,
    pub slowmo: &'a mut SlowmoController,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<SimEvent>,
    pub tuning: &'a TuningConfig,
}

/// Apply every request in order.
pub fn resolve_all(world: &mut World, requests: Vec<DamageRequest>, ctx: &mut DamageContext<'_>) {
    for request in requests {
        dispatch(world, &request, ctx);
    }
}

/// Apply one request. Returns true if it killed the target.
pub fn dispatch(world: &mut World, request: &DamageRequest, ctx: &mut DamageContext<'_>) -> bool {
    let (outcome, health) = {
        let Ok(mut receiver) = world.get::<&mut DamageReceiver>(request.target) else {
            return false;
        };
        let outcome = receiver.damage(request.amount, request.weapon_type);
        (outcome, receiver.current_health())
    };
    if outcome == DamageOutcome::Ignored {
        return false;
    }

    if let Ok(mut regen) = world.get::<&mut Regeneration>(request.target) {
        regen.remaining_delay = regen.start_delay;
    }

    let source_id = request.source.and_then(|source| agent_id(world, source));
    if let Some(agent) = agent_id(world, request.target) {
        ctx.events.push(SimEvent::Damaged {
            agent,
            amount: request.amount,
            health,
            source: source_id,
        });
    }

    if outcome.died() {
        handle_death(world, request, ctx);
        true
    } else {
        false
    }
}

fn handle_death(world: &mut World, request: &DamageRequest, ctx: &mut DamageContext<'_>) {
    let target = request.target;
    let position = world
        .get::<&Transform>(target)
        .map(|t| t.position)
        .unwrap_or_default();
    let agent = world.get::<&Agent>(target).map(|a| *a).ok();
    let by_player = request.source.is_some_and(|source| is_player(world, source));

    if is_player(world, target) {
        ctx.slowmo.force_terminate();
        ctx.events.push(SimEvent::Effect {
            effect: EffectKind::PlayerDeath,
            at: position,
            lifetime: ctx.tuning.effects.player_death_lifetime,
        });
        ctx.events.push(SimEvent::PlayerDied);
        ctx.stats.mark_game_over();
        info!("player died");
        let _ = world.despawn(target);
        return;
    }

    let reward = world.get::<&DeathReward>(target).map(|r| *r).ok();
    if let Some(agent) = agent {
        ctx.events.push(SimEvent::Killed {
            agent: agent.id,
            kind: agent.kind,
            by_player,
        });
    }

    if let Some(reward) = reward {
        if reward.credit_any_source || by_player {
            ctx.stats.add_score(reward.points);
            ctx.stats.increment_enemy_kill_count();
        }
        if reward.grants_slowmo && by_player {
            ctx.slowmo.gain();
        }
        if by_player || !reward.effect_needs_player_kill {
            ctx.events.push(SimEvent::Effect {
                effect: reward.effect,
                at: position,
                lifetime: reward.effect_lifetime,
            });
        }

        if let Some(drop) = reward.drop {
            let roll: f32 = ctx.rng.gen();
            if roll < drop.chance {
                world_setup::spawn_pickup(world, ctx.tuning, drop.kind, position);
                ctx.events.push(SimEvent::PickupDropped {
                    kind: drop.kind,
                    at: position,
                });
                debug!(kind = ?drop.kind, "pickup dropped");
            }
        }

        if let Some(goal_entity) = reward.objective {
            if let Ok(mut goal) = world.get::<&mut Goal>(goal_entity) {
                if goal.fulfill_requirement() {
                    ctx.events.push(SimEvent::GoalActivated);
                    info!("goal activated");
                }
            }
        }
    }

    info!(
        agent = agent.map(|a| a.id),
        by_player,
        score = ctx.stats.score(),
        "enemy destroyed"
    );
    let _ = world.despawn(target);
}

pub(crate) fn is_player(world: &World, entity: Entity) -> bool {
    world.get::<&Player>(entity).is_ok()
}
