//! Player controller.
//!
//! What the player may do each frame depends on the tactical pause state:
//! free movement and firing while `Inactive`, movement plus target marking
//! during `Slowdown`, and forced aim-and-fire at the current tag while
//! `Executing`. Movement and facing are only applied in [`fixed_step`].

use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use tracing::{debug, info};

use rogue_core::components::{Collider, Door, PlayerMotion, Regeneration, Transform};
use rogue_core::config::TuningConfig;
use rogue_core::damage::DamageReceiver;
use rogue_core::enums::{SlowmoState, TriggerInteraction};
use rogue_core::events::SimEvent;
use rogue_core::layers::{Layer, LayerMask};
use rogue_core::types::{flat_direction, FrameTime};

use crate::run_stats::RunStats;
use crate::slowmo::SlowmoController;
use crate::spatial::{SceneQuery, SpatialQuery};
use crate::systems::agent_id;
use crate::weapon::Weapon;

/// Input accumulated from commands since the last frame.
///
/// Axis and aim are held until changed; the button fields are edges and
/// are cleared once the frame has consumed them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub axis: Vec2,
    pub aim_point: Option<Vec3>,
    pub fire_pressed: bool,
    pub fire_released: bool,
    pub toggle_pressed: bool,
    pub unlock_pressed: bool,
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.fire_pressed = false;
        self.fire_released = false;
        self.toggle_pressed = false;
        self.unlock_pressed = false;
    }
}

/// Engine-owned state the player system mutates.
pub struct PlayerFrame<'a> {
    pub input: &'a PlayerInput,
    pub slowmo: &'a mut SlowmoController,
    pub stats: &'a mut RunStats,
    pub tuning: &'a TuningConfig,
    pub events: &'a mut Vec<SimEvent>,
}

/// Run the per-frame player update.
pub fn run(world: &mut World, player: Entity, time: FrameTime, frame: &mut PlayerFrame<'_>) {
    let Some((position, forward)) = world
        .get::<&Transform>(player)
        .map(|t| (t.position, t.forward))
        .ok()
    else {
        return;
    };
    let input = *frame.input;
    let aim = input
        .aim_point
        .and_then(|point| flat_direction(position, point))
        .unwrap_or(forward);

    match frame.slowmo.state() {
        SlowmoState::Inactive => {
            set_motion(world, player, input.axis, aim);
            if input.fire_pressed {
                start_weapon(world, player, frame.events);
            } else if input.fire_released {
                stop_weapon(world, player, frame.events);
            }
        }
        SlowmoState::Slowdown => {
            set_motion(world, player, input.axis, aim);
            if input.fire_pressed {
                mark_target(world, position, aim, frame);
            }
        }
        SlowmoState::Executing => {
            let facing = frame
                .slowmo
                .current_tag_point()
                .and_then(|point| flat_direction(position, point))
                .unwrap_or(forward);
            set_motion(world, player, Vec2::ZERO, facing);
            start_weapon(world, player, frame.events);
        }
    }

    regenerate(world, player, time.delta);

    if input.toggle_pressed {
        stop_weapon(world, player, frame.events);
        frame.slowmo.toggle();
    }

    if input.unlock_pressed && frame.slowmo.state() == SlowmoState::Inactive {
        unlock_surrounding_doors(world, position, frame);
    }
}

/// Apply movement and facing for one physics sub-step of `dt` scaled
/// seconds.
pub fn fixed_step(world: &mut World, dt: f32) {
    for (_entity, (transform, motion)) in world.query_mut::<(&mut Transform, &PlayerMotion)>() {
        transform.position += motion.movement * dt;
        if motion.desired_forward != Vec3::ZERO {
            transform.forward = motion.desired_forward;
        }
    }
}

/// Start the player's weapon if it is not already firing.
pub fn start_weapon(world: &mut World, player: Entity, events: &mut Vec<SimEvent>) {
    let started = world
        .get::<&mut Weapon>(player)
        .map(|mut weapon| weapon.start_firing())
        .unwrap_or(false);
    if let (true, Some(agent)) = (started, agent_id(world, player)) {
        events.push(SimEvent::WeaponStarted { agent });
    }
}

/// Stop the player's weapon if it is firing.
pub fn stop_weapon(world: &mut World, player: Entity, events: &mut Vec<SimEvent>) {
    let stopped = world
        .get::<&mut Weapon>(player)
        .map(|mut weapon| weapon.stop_firing())
        .unwrap_or(false);
    if let (true, Some(agent)) = (stopped, agent_id(world, player)) {
        events.push(SimEvent::WeaponStopped { agent });
    }
}

fn set_motion(world: &mut World, player: Entity, axis: Vec2, facing: Vec3) {
    if let Ok(mut motion) = world.get::<&mut PlayerMotion>(player) {
        motion.movement = Vec3::new(axis.x, 0.0, axis.y) * motion.move_speed;
        motion.desired_forward = facing;
    }
}

fn regenerate(world: &mut World, player: Entity, dt: f32) {
    let Ok(mut regen) = world.get::<&mut Regeneration>(player) else {
        return;
    };
    regen.remaining_delay -= dt;
    if regen.remaining_delay > 0.0 {
        return;
    }
    let amount = regen.rate * dt;
    drop(regen);
    if let Ok(mut receiver) = world.get::<&mut DamageReceiver>(player) {
        receiver.heal(amount);
    }
}

/// Cast the marking ray along the aim direction and tag whatever markable
/// thing it hits first.
fn mark_target(world: &World, origin: Vec3, direction: Vec3, frame: &mut PlayerFrame<'_>) {
    let scene = SceneQuery::new(world, frame.tuning.simulation.queries_hit_triggers);
    let Some(hit) = scene.raycast(
        origin,
        direction,
        frame.slowmo.marking_distance(),
        LayerMask::ALL,
        TriggerInteraction::Ignore,
    ) else {
        return;
    };
    let Some(target_id) = agent_id(world, hit.entity) else {
        return;
    };
    let Ok(target_position) = world.get::<&Transform>(hit.entity).map(|t| t.position) else {
        return;
    };
    frame.slowmo.try_mark(&hit, target_id, target_position);
}

/// Spend one key per locked door within reach. With no keys at all the
/// attempt is refused outright.
fn unlock_surrounding_doors(world: &mut World, position: Vec3, frame: &mut PlayerFrame<'_>) {
    if frame.stats.keys() == 0 {
        frame.events.push(SimEvent::KeysDenied);
        debug!("unlock refused: no keys");
        return;
    }

    let nearby = SceneQuery::new(world, frame.tuning.simulation.queries_hit_triggers)
        .overlap_sphere(
            position,
            frame.tuning.player.unlock_radius,
            LayerMask::of(Layer::DOOR),
        );

    for door in nearby {
        let locked = world.get::<&Door>(door).map(|d| d.locked).unwrap_or(false);
        if !locked {
            continue;
        }
        if !frame.stats.try_spend_key() {
            return;
        }
        let at = world
            .get::<&Transform>(door)
            .map(|t| t.position)
            .unwrap_or(position);
        if let Ok(mut d) = world.get::<&mut Door>(door) {
            d.locked = false;
        }
        let _ = world.remove_one::<Collider>(door);
        frame.events.push(SimEvent::DoorUnlocked { at });
        info!(keys = frame.stats.keys(), "door unlocked");
    }
}
