//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus whatever engine-owned state they touch, passed explicitly. Agents are
//! always visited in ascending agent id order.

use hecs::{Entity, World};

use rogue_core::components::{Agent, Transform};

pub mod enemy_ai;
pub mod navigation;
pub mod pickups;
pub mod player;
pub mod snapshot;
pub mod weapons;

/// Agent id of an entity, if it is an actor.
pub(crate) fn agent_id(world: &World, entity: Entity) -> Option<u32> {
    world.get::<&Agent>(entity).map(|agent| agent.id).ok()
}

/// Current position of an entity, or `None` once it is gone.
pub(crate) fn position_of(world: &World, entity: Entity) -> Option<glam::Vec3> {
    world.get::<&Transform>(entity).map(|t| t.position).ok()
}

/// Entities carrying component `C`, sorted by agent id.
pub(crate) fn agents_in_order<C: hecs::Component>(world: &World) -> Vec<Entity> {
    let mut agents: Vec<(u32, Entity)> = world
        .query::<(&Agent, &C)>()
        .iter()
        .map(|(entity, (agent, _))| (agent.id, entity))
        .collect();
    agents.sort_unstable_by_key(|(id, _)| *id);
    agents.into_iter().map(|(_, entity)| entity).collect()
}
