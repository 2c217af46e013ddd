//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use rogue_core::components::*;
use rogue_core::damage::{DamageReceiver, Damageable};
use rogue_core::enums::{BrainState, RunPhase};
use rogue_core::events::SimEvent;
use rogue_core::state::*;
use rogue_core::types::SimClock;

use crate::run_stats::RunStats;
use crate::slowmo::SlowmoController;
use crate::weapon::Weapon;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    clock: SimClock,
    phase: RunPhase,
    slowmo: &SlowmoController,
    stats: &RunStats,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        clock,
        phase,
        time_scale: slowmo.time_scale(),
        slowmo: slowmo.view(),
        player: build_player(world),
        enemies: build_enemies(world),
        stats: stats.view(),
        events,
    }
}

fn build_player(world: &World) -> Option<PlayerView> {
    world
        .query::<(&Agent, &Player, &Transform, &DamageReceiver, &Weapon)>()
        .iter()
        .next()
        .map(|(_, (agent, _, transform, receiver, weapon))| PlayerView {
            id: agent.id,
            position: transform.position,
            forward: transform.forward,
            health: receiver.current_health(),
            max_health: receiver.max_health(),
            weapon_type: weapon.weapon_type(),
            firing: weapon.is_firing(),
        })
}

/// Build EnemyView list sorted by agent id.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(
            &Agent,
            &Transform,
            &DamageReceiver,
            Option<&Weapon>,
            Option<&PursuerBrain>,
            Option<&KamikazeBrain>,
            Option<&TurretBrain>,
        )>()
        .iter()
        .filter_map(
            |(_, (agent, transform, receiver, weapon, pursuer, kamikaze, turret))| {
                let state = match (pursuer, kamikaze, turret) {
                    (Some(brain), _, _) => BrainState::Pursuer(brain.state),
                    (_, Some(brain), _) => BrainState::Kamikaze(brain.state),
                    (_, _, Some(brain)) => BrainState::Turret(brain.state),
                    _ => return None,
                };
                Some(EnemyView {
                    id: agent.id,
                    kind: agent.kind,
                    position: transform.position,
                    forward: transform.forward,
                    health: receiver.current_health(),
                    state,
                    firing: weapon.is_some_and(|w| w.is_firing()),
                })
            },
        )
        .collect();
    enemies.sort_by_key(|enemy| enemy.id);
    enemies
}
