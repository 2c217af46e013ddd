//! Entity spawn factories for setting up the simulation world.
//!
//! Every actor gets an [`Agent`] id from the shared counter, so ids follow
//! spawn order and are never reused.

use glam::Vec3;
use hecs::{Entity, World};

use rogue_ai::profiles::{get_profile, EnemyKind, EnemyProfile};
use rogue_core::components::*;
use rogue_core::config::TuningConfig;
use rogue_core::constants::*;
use rogue_core::damage::DamageReceiver;
use rogue_core::enums::*;
use rogue_core::layers::{
    Layer, ACTOR_SIGHT_LAYERS, ENEMY_DAMAGE_LAYERS, PLAYER_DAMAGE_LAYERS, PLAYER_WEAPON_LAYERS,
};

use crate::components::{DeathReward, PickupDrop, Target};
use crate::perception::Perception;
use crate::weapon::Weapon;

/// Entities `setup_arena` hands back for the engine to keep track of.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub player: Entity,
    pub goal: Entity,
}

/// Build the demonstration level: a walled room with one of each enemy,
/// two turrets guarding the goal behind a locked door, and a few pickups.
pub fn setup_arena(world: &mut World, next_id: &mut u32, tuning: &TuningConfig) -> Arena {
    let player = spawn_player(world, next_id, tuning, Vec3::ZERO);

    for (center, half_extents) in [
        (Vec3::new(0.0, 0.0, 30.0), Vec3::new(30.0, 2.0, 0.5)),
        (Vec3::new(0.0, 0.0, -30.0), Vec3::new(30.0, 2.0, 0.5)),
        (Vec3::new(30.0, 0.0, 0.0), Vec3::new(0.5, 2.0, 30.0)),
        (Vec3::new(-30.0, 0.0, 0.0), Vec3::new(0.5, 2.0, 30.0)),
        // Partition in front of the goal room, broken by the door.
        (Vec3::new(-16.0, 0.0, -18.0), Vec3::new(14.0, 2.0, 0.5)),
        (Vec3::new(16.0, 0.0, -18.0), Vec3::new(14.0, 2.0, 0.5)),
    ] {
        spawn_wall(world, center, half_extents);
    }
    spawn_door(world, Vec3::new(0.0, 0.0, -18.0), Vec3::new(2.0, 2.0, 0.5));

    let goal = spawn_goal(world, tuning, Vec3::new(0.0, 0.0, -26.0));

    spawn_pursuer(world, next_id, tuning, Vec3::new(0.0, 0.0, 22.0), Some(player));
    spawn_kamikaze(world, next_id, tuning, Vec3::new(-12.0, 0.0, 10.0), Some(player));
    spawn_turret(world, next_id, tuning, Vec3::new(-10.0, 0.0, -24.0), Some(player), Some(goal));
    spawn_turret(world, next_id, tuning, Vec3::new(10.0, 0.0, -24.0), Some(player), Some(goal));

    spawn_pickup(world, tuning, PickupKind::Key, Vec3::new(8.0, 0.0, 4.0));
    spawn_pickup(world, tuning, PickupKind::AntiTurretLens, Vec3::new(-6.0, 0.0, -6.0));
    spawn_pickup(world, tuning, PickupKind::DataCard, Vec3::new(20.0, 0.0, 20.0));
    spawn_pickup(world, tuning, PickupKind::Health, Vec3::new(-20.0, 0.0, 20.0));

    Arena { player, goal }
}

fn next_agent(next_id: &mut u32, kind: AgentKind) -> Agent {
    let id = *next_id;
    *next_id += 1;
    Agent { id, kind }
}

/// Spawn the player with a full-health beam weapon.
pub fn spawn_player(
    world: &mut World,
    next_id: &mut u32,
    tuning: &TuningConfig,
    position: Vec3,
) -> Entity {
    let player = &tuning.player;
    world.spawn((
        next_agent(next_id, AgentKind::Player),
        Player,
        Transform::at(position),
        Collider::sphere(PLAYER_COLLIDER_RADIUS, Layer::PLAYER),
        DamageReceiver::standard(player.max_health),
        Regeneration {
            start_delay: player.regen_start_delay,
            remaining_delay: player.regen_start_delay,
            rate: player.regen_amount,
        },
        PlayerMotion {
            movement: Vec3::ZERO,
            desired_forward: Vec3::Z,
            move_speed: player.move_speed,
        },
        Weapon::beam(&player.weapon, PLAYER_WEAPON_LAYERS, PLAYER_DAMAGE_LAYERS),
    ))
}

/// Spawn a pursue-and-fire enemy. It starts idle with navigation off.
pub fn spawn_pursuer(
    world: &mut World,
    next_id: &mut u32,
    tuning: &TuningConfig,
    position: Vec3,
    target: Option<Entity>,
) -> Entity {
    let pursuer = &tuning.pursuer;
    let mut nav = NavAgent::new(pursuer.move_speed);
    nav.enabled = false;
    let reward = death_reward(get_profile(EnemyKind::Pursuer, tuning), tuning, None);

    world.spawn((
        next_agent(next_id, AgentKind::Pursuer),
        Transform::at(position),
        Collider::sphere(ENEMY_COLLIDER_RADIUS, Layer::ENEMY),
        DamageReceiver::standard(pursuer.max_health),
        PursuerBrain {
            state: PursuerState::Idle,
            tuning: pursuer.clone(),
        },
        Perception::new(
            tuning.perception.check_delay,
            tuning.perception.clock,
            pursuer.pursue_range,
            ACTOR_SIGHT_LAYERS,
        ),
        nav,
        Weapon::charge_burst(&pursuer.weapon, ACTOR_SIGHT_LAYERS, ENEMY_DAMAGE_LAYERS),
        Target(target),
        reward,
    ))
}

/// Spawn a proximity-fuse enemy. It holds position until it first sees
/// its target.
pub fn spawn_kamikaze(
    world: &mut World,
    next_id: &mut u32,
    tuning: &TuningConfig,
    position: Vec3,
    target: Option<Entity>,
) -> Entity {
    let kamikaze = &tuning.kamikaze;
    let mut nav = NavAgent::new(kamikaze.move_speed);
    nav.stopped = true;
    let reward = death_reward(get_profile(EnemyKind::Kamikaze, tuning), tuning, None);

    world.spawn((
        next_agent(next_id, AgentKind::Kamikaze),
        Transform::at(position),
        Collider::sphere(ENEMY_COLLIDER_RADIUS, Layer::ENEMY),
        DamageReceiver::standard(kamikaze.max_health),
        KamikazeBrain {
            state: KamikazeState::Idle,
            fuse_remaining: kamikaze.exploding_duration,
            tuning: kamikaze.clone(),
        },
        Perception::new(
            tuning.perception.check_delay,
            tuning.perception.clock,
            kamikaze.pursue_range,
            ACTOR_SIGHT_LAYERS,
        ),
        nav,
        Target(target),
        reward,
    ))
}

/// Spawn a stationary turret, optionally linked to a goal it guards.
pub fn spawn_turret(
    world: &mut World,
    next_id: &mut u32,
    tuning: &TuningConfig,
    position: Vec3,
    target: Option<Entity>,
    objective: Option<Entity>,
) -> Entity {
    let turret = &tuning.turret;
    let profile = get_profile(EnemyKind::Turret, tuning);
    let receiver = match profile.accepts_only {
        Some(accepts) => DamageReceiver::armored(profile.max_health, accepts),
        None => DamageReceiver::standard(profile.max_health),
    };
    let reward = death_reward(profile, tuning, objective);

    world.spawn((
        next_agent(next_id, AgentKind::Turret),
        Transform::at(position),
        Collider::sphere(TURRET_COLLIDER_RADIUS, Layer::TURRET),
        receiver,
        TurretBrain {
            state: TurretState::Idle,
            tuning: turret.clone(),
        },
        Perception::new(
            tuning.perception.check_delay,
            tuning.perception.clock,
            turret.detection_range,
            ACTOR_SIGHT_LAYERS,
        ),
        Weapon::rapid_fire(&turret.weapon, ACTOR_SIGHT_LAYERS, ENEMY_DAMAGE_LAYERS),
        Target(target),
        reward,
    ))
}

/// Spawn a static occluder.
pub fn spawn_wall(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        Transform::at(center),
        Collider::cuboid(half_extents, Layer::ENVIRONMENT),
    ))
}

/// Spawn a locked door. It blocks sight and shots until unlocked.
pub fn spawn_door(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        Transform::at(center),
        Collider::cuboid(half_extents, Layer::DOOR),
        Door { locked: true },
    ))
}

pub fn spawn_pickup(
    world: &mut World,
    tuning: &TuningConfig,
    kind: PickupKind,
    position: Vec3,
) -> Entity {
    world.spawn((
        Transform::at(position),
        Pickup {
            kind,
            radius: tuning.pickups.pickup_radius,
        },
    ))
}

/// Spawn the run objective, inactive until its requirements are met.
pub fn spawn_goal(world: &mut World, tuning: &TuningConfig, position: Vec3) -> Entity {
    world.spawn((
        Transform::at(position),
        Pickup {
            kind: PickupKind::Goal,
            radius: tuning.pickups.pickup_radius,
        },
        Goal::new(tuning.pickups.goal_requirements),
    ))
}

fn death_reward(
    profile: EnemyProfile,
    tuning: &TuningConfig,
    objective: Option<Entity>,
) -> DeathReward {
    let effect_lifetime = match profile.death_effect {
        EffectKind::DeathExplosion => tuning.effects.death_explosion_lifetime,
        EffectKind::KamikazeExplosion => tuning.effects.kamikaze_explosion_lifetime,
        EffectKind::PlayerDeath => tuning.effects.player_death_lifetime,
    };
    DeathReward {
        points: profile.points,
        credit_any_source: profile.credit_any_source,
        grants_slowmo: profile.grants_slowmo,
        drop: (profile.drop_chance > 0.0).then_some(PickupDrop {
            kind: PickupKind::Health,
            chance: profile.drop_chance,
        }),
        objective,
        effect: profile.death_effect,
        effect_needs_player_kill: profile.effect_needs_player_kill,
        effect_lifetime,
    }
}
