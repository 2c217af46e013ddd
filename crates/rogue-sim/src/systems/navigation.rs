//! Straight-line navigation.
//!
//! Moves enabled, unstopped agents toward their destination at their own
//! speed on scaled time, facing the direction of travel. Arrival is
//! implicit: the agent simply stops once inside its stopping distance.

use hecs::World;

use rogue_core::components::{NavAgent, Transform};
use rogue_core::types::flat_direction;

pub fn run(world: &mut World, dt: f32) {
    for (_entity, (transform, nav)) in world.query_mut::<(&mut Transform, &NavAgent)>() {
        if !nav.enabled || nav.stopped {
            continue;
        }
        let Some(destination) = nav.destination else {
            continue;
        };
        let Some(direction) = flat_direction(transform.position, destination) else {
            continue;
        };

        let to_go = transform.position.distance(destination) - nav.stopping_distance;
        if to_go <= 0.0 {
            continue;
        }
        transform.position += direction * (nav.speed * dt).min(to_go);
        transform.forward = direction;
    }
}
