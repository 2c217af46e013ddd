//! Weapon system: ticks every wielded weapon along its wielder's facing.
//!
//! Strikes come back as damage requests for the engine to dispatch; trails
//! and charge warnings go straight out as events.

use hecs::World;

use rogue_core::components::{Agent, Transform};
use rogue_core::events::SimEvent;
use rogue_core::types::FrameTime;

use crate::damage::DamageRequest;
use crate::spatial::SceneQuery;
use crate::systems::agents_in_order;
use crate::weapon::{Muzzle, Weapon};

pub fn run(
    world: &mut World,
    time: FrameTime,
    queries_hit_triggers: bool,
    events: &mut Vec<SimEvent>,
) -> Vec<DamageRequest> {
    let mut requests = Vec::new();

    for entity in agents_in_order::<Weapon>(world) {
        let Ok(mut weapon) = world.get::<&Weapon>(entity).map(|w| (*w).clone()) else {
            continue;
        };
        if !weapon.is_firing() {
            continue;
        }
        let Ok(muzzle) = world.get::<&Transform>(entity).map(|t| Muzzle {
            origin: t.position,
            direction: t.forward,
        }) else {
            continue;
        };

        let report = {
            let scene = SceneQuery::new(world, queries_hit_triggers);
            weapon.tick(time, muzzle, &scene)
        };
        if let Ok(mut stored) = world.get::<&mut Weapon>(entity) {
            *stored = weapon;
        }

        if report.charging {
            if let Ok(agent) = world.get::<&Agent>(entity).map(|a| a.id) {
                events.push(SimEvent::WeaponCharging { agent });
            }
        }
        events.extend(report.trails.into_iter().map(|trail| SimEvent::Trail {
            from: trail.from,
            to: trail.to,
            speed: trail.speed,
            fade_out: trail.fade_out,
        }));
        requests.extend(report.strikes.into_iter().map(|strike| DamageRequest {
            target: strike.target,
            amount: strike.amount,
            source: Some(entity),
            weapon_type: strike.weapon_type,
        }));
    }
    requests
}
