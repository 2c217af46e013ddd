//! Pickup collection: anything within reach of the player is applied once
//! and removed. An activated goal ends the run, but only outside of the
//! tactical pause.

use hecs::{Entity, World};
use tracing::info;

use rogue_core::components::{Goal, Pickup, Transform};
use rogue_core::config::TuningConfig;
use rogue_core::damage::DamageReceiver;
use rogue_core::enums::{PickupKind, SlowmoState, WeaponType};
use rogue_core::events::SimEvent;

use crate::run_stats::RunStats;
use crate::systems::{agent_id, position_of};
use crate::weapon::Weapon;

pub struct PickupFrame<'a> {
    pub stats: &'a mut RunStats,
    pub slowmo_state: SlowmoState,
    pub tuning: &'a TuningConfig,
    pub events: &'a mut Vec<SimEvent>,
}

pub fn run(world: &mut World, player: Entity, frame: &mut PickupFrame<'_>) {
    let Some(player_position) = position_of(world, player) else {
        return;
    };

    let mut touched: Vec<(Entity, PickupKind)> = world
        .query::<(&Transform, &Pickup)>()
        .iter()
        .filter(|(_, (transform, pickup))| {
            transform.position.distance_squared(player_position) <= pickup.radius * pickup.radius
        })
        .map(|(entity, (_, pickup))| (entity, pickup.kind))
        .collect();
    touched.sort_unstable_by_key(|(entity, _)| *entity);

    for (entity, kind) in touched {
        if !apply(world, player, entity, kind, frame) {
            continue;
        }
        let _ = world.despawn(entity);
        frame.events.push(SimEvent::PickupCollected { kind });
        info!(?kind, "pickup collected");

        if kind == PickupKind::Goal {
            frame.stats.mark_victory();
            frame.events.push(SimEvent::RunWon);
            let _ = world.despawn(player);
            info!(score = frame.stats.score(), "run won");
            return;
        }
    }
}

/// Apply a pickup's effect. Returns false if it cannot be used yet and
/// should stay in the world.
fn apply(
    world: &mut World,
    player: Entity,
    pickup: Entity,
    kind: PickupKind,
    frame: &mut PickupFrame<'_>,
) -> bool {
    match kind {
        PickupKind::Health => {
            if let Ok(mut receiver) = world.get::<&mut DamageReceiver>(player) {
                receiver.heal(frame.tuning.pickups.health_restore);
            }
        }
        PickupKind::Key => frame.stats.increment_keys(),
        PickupKind::DataCard => frame.stats.add_score(frame.tuning.pickups.data_card_score),
        PickupKind::AntiTurretLens => {
            let previous = world
                .get::<&mut Weapon>(player)
                .ok()
                .and_then(|mut weapon| weapon.set_weapon_type(WeaponType::AntiTurret));
            if let (Some(previous), Some(agent)) = (previous, agent_id(world, player)) {
                frame.events.push(SimEvent::WeaponTypeChanged {
                    agent,
                    previous,
                    current: WeaponType::AntiTurret,
                });
            }
        }
        PickupKind::Goal => {
            let activated = world.get::<&Goal>(pickup).map(|g| g.activated).unwrap_or(false);
            return activated && frame.slowmo_state == SlowmoState::Inactive;
        }
    }
    true
}
