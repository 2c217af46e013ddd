//! Tests for the simulation engine, weapons, tactical pause, damage
//! dispatch and the per-frame systems.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use hecs::World;

use rogue_core::commands::PlayerCommand;
use rogue_core::components::{Collider, Door, Goal, Pickup, Transform};
use rogue_core::config::{BeamWeaponTuning, ChargeWeaponTuning, RapidFireTuning, SlowmoTuning};
use rogue_core::damage::{DamageReceiver, Damageable};
use rogue_core::enums::*;
use rogue_core::events::{SimEvent, SlowmoEvent};
use rogue_core::layers::*;
use rogue_core::state::SimSnapshot;
use rogue_core::types::FrameTime;

use crate::damage::DamageRequest;
use crate::engine::{SimConfig, SimulationEngine};
use crate::slowmo::SlowmoController;
use crate::spatial::{RayHit, SceneQuery};
use crate::weapon::{FiringMechanism, Muzzle, Weapon};

const FRAME: f32 = 1.0 / 60.0;

fn new_engine() -> SimulationEngine {
    SimulationEngine::new(SimConfig::default())
}

fn run_for(engine: &mut SimulationEngine, seconds: f32) -> SimSnapshot {
    let frames = (seconds / FRAME).round() as usize;
    let mut snapshot = engine.step(FRAME);
    for _ in 1..frames {
        snapshot = engine.step(FRAME);
    }
    snapshot
}

fn record_events(engine: &mut SimulationEngine) -> Rc<RefCell<Vec<SimEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}

fn health_of(engine: &SimulationEngine, entity: hecs::Entity) -> Option<f32> {
    engine
        .world()
        .get::<&DamageReceiver>(entity)
        .map(|r| r.current_health())
        .ok()
}

fn forward_muzzle() -> Muzzle {
    Muzzle {
        origin: Vec3::ZERO,
        direction: Vec3::Z,
    }
}

fn spawn_target(world: &mut World, z: f32, layer: Layer) -> hecs::Entity {
    world.spawn((
        Transform::at(Vec3::new(0.0, 0.0, z)),
        Collider::sphere(0.5, layer),
    ))
}

// ---- Weapons ----

#[test]
fn test_charge_burst_warns_then_fires_once() {
    let mut world = World::new();
    let target = spawn_target(&mut world, 10.0, Layer::PLAYER);
    let mut weapon = Weapon::charge_burst(
        &ChargeWeaponTuning::default(),
        ACTOR_SIGHT_LAYERS,
        ENEMY_DAMAGE_LAYERS,
    );
    assert!(weapon.start_firing());
    assert!(!weapon.start_firing(), "second start is a no-op");

    let scene = SceneQuery::new(&world, true);
    let report = weapon.tick(FrameTime::unscaled(4.0), forward_muzzle(), &scene);
    assert!(report.charging, "warning at one second left");
    assert!(report.strikes.is_empty());

    let report = weapon.tick(FrameTime::unscaled(1.0), forward_muzzle(), &scene);
    assert!(!report.charging);
    assert_eq!(report.strikes.len(), 1);
    assert_eq!(report.trails.len(), 1);
    assert_eq!(report.strikes[0].target, target);
    assert_eq!(report.strikes[0].amount, 25.0);
    assert!((report.strikes[0].point.z - 9.5).abs() < 1e-4);
}

#[test]
fn test_charge_burst_counts_scaled_time() {
    let world = World::new();
    let scene = SceneQuery::new(&world, true);
    let mut weapon = Weapon::charge_burst(
        &ChargeWeaponTuning::default(),
        ACTOR_SIGHT_LAYERS,
        ENEMY_DAMAGE_LAYERS,
    );
    weapon.start_firing();

    // Four real seconds at quarter speed is one simulated second.
    let report = weapon.tick(FrameTime::new(4.0, 0.25), forward_muzzle(), &scene);
    assert!(!report.charging);
    assert!(report.trails.is_empty());
}

#[test]
fn test_stop_firing_resets_charge() {
    let world = World::new();
    let scene = SceneQuery::new(&world, true);
    let mut weapon = Weapon::charge_burst(
        &ChargeWeaponTuning::default(),
        ACTOR_SIGHT_LAYERS,
        ENEMY_DAMAGE_LAYERS,
    );
    weapon.start_firing();
    weapon.tick(FrameTime::unscaled(3.0), forward_muzzle(), &scene);
    assert!(weapon.stop_firing());
    assert!(!weapon.stop_firing());

    weapon.start_firing();
    let report = weapon.tick(FrameTime::unscaled(3.0), forward_muzzle(), &scene);
    assert!(report.trails.is_empty(), "charge restarted from full");
}

#[test]
fn test_missed_shot_still_leaves_trail() {
    let world = World::new();
    let scene = SceneQuery::new(&world, true);
    let tuning = ChargeWeaponTuning::default();
    let mut weapon = Weapon::charge_burst(&tuning, ACTOR_SIGHT_LAYERS, ENEMY_DAMAGE_LAYERS);
    weapon.start_firing();

    let report = weapon.tick(FrameTime::unscaled(5.0), forward_muzzle(), &scene);
    assert!(report.strikes.is_empty());
    assert_eq!(report.trails.len(), 1);
    assert!((report.trails[0].to.z - tuning.range).abs() < 1e-4);
}

#[test]
fn test_non_damageable_hit_is_silent() {
    let mut world = World::new();
    spawn_target(&mut world, 5.0, Layer::ENVIRONMENT);
    let scene = SceneQuery::new(&world, true);
    let mut weapon = Weapon::charge_burst(
        &ChargeWeaponTuning::default(),
        ACTOR_SIGHT_LAYERS,
        ENEMY_DAMAGE_LAYERS,
    );
    weapon.start_firing();

    let report = weapon.tick(FrameTime::unscaled(5.0), forward_muzzle(), &scene);
    assert!(report.strikes.is_empty(), "walls block but take no damage");
    assert!((report.trails[0].to.z - 4.5).abs() < 1e-4);
}

#[test]
fn test_beam_ticks_on_unscaled_time() {
    let mut world = World::new();
    spawn_target(&mut world, 5.0, Layer::ENEMY);
    let scene = SceneQuery::new(&world, true);
    let mut weapon = Weapon::beam(
        &BeamWeaponTuning::default(),
        PLAYER_WEAPON_LAYERS,
        PLAYER_DAMAGE_LAYERS,
    );
    weapon.start_firing();

    // 0.35 real seconds at quarter speed still lands three 0.1s ticks.
    let report = weapon.tick(FrameTime::new(0.35, 0.25), forward_muzzle(), &scene);
    assert_eq!(report.strikes.len(), 3);
    assert!(report.trails.is_empty(), "beams draw no trails");
}

#[test]
fn test_beam_retarget_resets_tick() {
    let mut world = World::new();
    let first = spawn_target(&mut world, 5.0, Layer::ENEMY);
    let second = spawn_target(&mut world, 8.0, Layer::ENEMY);
    let mut weapon = Weapon::beam(
        &BeamWeaponTuning::default(),
        PLAYER_WEAPON_LAYERS,
        PLAYER_DAMAGE_LAYERS,
    );
    weapon.start_firing();

    {
        let scene = SceneQuery::new(&world, true);
        let report = weapon.tick(FrameTime::unscaled(0.05), forward_muzzle(), &scene);
        assert!(report.strikes.is_empty());
    }

    world.despawn(first).unwrap();
    let scene = SceneQuery::new(&world, true);
    let report = weapon.tick(FrameTime::unscaled(0.05), forward_muzzle(), &scene);
    assert!(report.strikes.is_empty(), "new target starts a fresh tick");

    let report = weapon.tick(FrameTime::unscaled(0.06), forward_muzzle(), &scene);
    assert_eq!(report.strikes.len(), 1);
    assert_eq!(report.strikes[0].target, second);
}

#[test]
fn test_rapid_fire_winds_up_then_fires_at_rate() {
    let mut world = World::new();
    spawn_target(&mut world, 10.0, Layer::PLAYER);
    let scene = SceneQuery::new(&world, true);
    let mut weapon = Weapon::rapid_fire(
        &RapidFireTuning::default(),
        ACTOR_SIGHT_LAYERS,
        ENEMY_DAMAGE_LAYERS,
    );
    weapon.start_firing();

    assert!(weapon
        .tick(FrameTime::unscaled(0.5), forward_muzzle(), &scene)
        .strikes
        .is_empty());
    assert!(weapon
        .tick(FrameTime::unscaled(0.5), forward_muzzle(), &scene)
        .strikes
        .is_empty());

    // Five shots per second: half a second covers two full periods.
    let report = weapon.tick(FrameTime::unscaled(0.5), forward_muzzle(), &scene);
    assert_eq!(report.strikes.len(), 2);
    assert_eq!(report.trails.len(), 2);
    assert!(report.strikes.iter().all(|s| s.amount == 2.0));
}

#[test]
fn test_beam_stop_resets_tick() {
    let mut world = World::new();
    let target = spawn_target(&mut world, 5.0, Layer::ENEMY);
    let scene = SceneQuery::new(&world, true);
    let tuning = BeamWeaponTuning::default();
    let mut weapon = Weapon::beam(&tuning, PLAYER_WEAPON_LAYERS, PLAYER_DAMAGE_LAYERS);
    weapon.start_firing();

    weapon.tick(FrameTime::unscaled(0.05), forward_muzzle(), &scene);
    match *weapon.mechanism() {
        FiringMechanism::Beam {
            tick_remaining,
            on_target,
            ..
        } => {
            assert!(tick_remaining < tuning.damage_period);
            assert_eq!(on_target, Some(target));
        }
        other => panic!("expected a beam, got {other:?}"),
    }

    assert!(weapon.stop_firing());
    match *weapon.mechanism() {
        FiringMechanism::Beam {
            tick_remaining,
            on_target,
            ..
        } => {
            assert_eq!(tick_remaining, tuning.damage_period);
            assert_eq!(on_target, None);
        }
        other => panic!("expected a beam, got {other:?}"),
    }
}

#[test]
fn test_rapid_fire_stop_resets_windup() {
    let mut world = World::new();
    spawn_target(&mut world, 10.0, Layer::PLAYER);
    let scene = SceneQuery::new(&world, true);
    let tuning = RapidFireTuning::default();
    let mut weapon = Weapon::rapid_fire(&tuning, ACTOR_SIGHT_LAYERS, ENEMY_DAMAGE_LAYERS);
    weapon.start_firing();

    weapon.tick(FrameTime::unscaled(1.0), forward_muzzle(), &scene);
    weapon.tick(FrameTime::unscaled(0.1), forward_muzzle(), &scene);
    match *weapon.mechanism() {
        FiringMechanism::RapidFire {
            wound_up,
            shot_remaining,
            shot_period,
            ..
        } => {
            assert!(wound_up);
            assert!(shot_remaining < shot_period);
        }
        other => panic!("expected rapid fire, got {other:?}"),
    }

    assert!(weapon.stop_firing());
    match *weapon.mechanism() {
        FiringMechanism::RapidFire {
            windup_remaining,
            shot_remaining,
            shot_period,
            wound_up,
            ..
        } => {
            assert_eq!(windup_remaining, tuning.windup_time);
            assert_eq!(shot_remaining, shot_period);
            assert!(!wound_up);
        }
        other => panic!("expected rapid fire, got {other:?}"),
    }

    // Restarting has to wind up again before the next shot.
    weapon.start_firing();
    let report = weapon.tick(FrameTime::unscaled(0.5), forward_muzzle(), &scene);
    assert!(report.strikes.is_empty());
}

#[test]
fn test_hit_layers_include_damage_layers() {
    let weapon = Weapon::beam(
        &BeamWeaponTuning::default(),
        LayerMask::of(Layer::ENVIRONMENT),
        PLAYER_DAMAGE_LAYERS,
    );
    assert!(weapon.layers_to_damage().is_subset_of(weapon.layers_to_hit()));
    assert!(weapon.layers_to_hit().contains(Layer::ENVIRONMENT));
}

#[test]
fn test_weapon_type_change_reports_previous() {
    let mut weapon = Weapon::beam(
        &BeamWeaponTuning::default(),
        PLAYER_WEAPON_LAYERS,
        PLAYER_DAMAGE_LAYERS,
    );
    assert_eq!(
        weapon.set_weapon_type(WeaponType::AntiTurret),
        Some(WeaponType::None)
    );
    assert_eq!(weapon.set_weapon_type(WeaponType::AntiTurret), None);
}

// ---- Tactical pause ----

fn marking_hit(entity: hecs::Entity, layer: Layer) -> RayHit {
    RayHit {
        entity,
        point: Vec3::new(0.0, 0.0, 5.0),
        distance: 5.0,
        layer,
    }
}

#[test]
fn test_slowmo_budget_scenario() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    assert!(slowmo.toggle());
    assert_eq!(slowmo.state(), SlowmoState::Slowdown);

    for _ in 0..6 {
        slowmo.tick(1.0, |_| None);
    }
    assert!((slowmo.remaining() - 4.0).abs() < 1e-4);
    assert!((slowmo.time_scale() - 0.25).abs() < 1e-6);
    let events = slowmo.drain_events();
    assert!(events.contains(&SlowmoEvent::DurationWarning));

    // No tags: the second toggle goes straight back to normal time.
    assert!(slowmo.toggle());
    assert_eq!(slowmo.state(), SlowmoState::Inactive);
    slowmo.tick(0.3, |_| None);
    assert_eq!(slowmo.time_scale(), 1.0);
    assert!(!slowmo.is_interpolating());
    assert!((slowmo.remaining() - 4.0).abs() < 1e-4, "no depletion while inactive");
}

#[test]
fn test_slowmo_requires_budget() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.set_remaining(0.0);
    assert!(!slowmo.toggle());
    assert_eq!(slowmo.state(), SlowmoState::Inactive);
    assert!(slowmo.drain_events().is_empty());
}

#[test]
fn test_slowmo_depletion_ignores_time_scale() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();
    slowmo.tick(1.0, |_| None);
    let after_first = slowmo.remaining();
    slowmo.tick(1.0, |_| None);
    assert!((after_first - slowmo.remaining() - 1.0).abs() < 1e-5);
}

#[test]
fn test_budget_exhaustion_exits_and_discards_tags() {
    let mut world = World::new();
    let enemy = world.spawn(());
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.set_remaining(1.0);
    slowmo.toggle();
    assert!(slowmo.try_mark(&marking_hit(enemy, Layer::ENEMY), 1, Vec3::ZERO));

    slowmo.tick(1.5, |_| Some(Vec3::ZERO));
    assert_eq!(slowmo.state(), SlowmoState::Inactive);
    assert_eq!(slowmo.tag_count(), 0);
    assert_eq!(slowmo.remaining(), 0.0);
}

#[test]
fn test_tag_cap_forces_executing() {
    let mut world = World::new();
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();

    for id in 0..5 {
        let enemy = world.spawn(());
        assert!(slowmo.try_mark(&marking_hit(enemy, Layer::ENEMY), id, Vec3::ZERO));
    }
    assert_eq!(slowmo.state(), SlowmoState::Executing);
    assert_eq!(slowmo.tag_count(), 5);

    let extra = world.spawn(());
    assert!(!slowmo.try_mark(&marking_hit(extra, Layer::ENEMY), 9, Vec3::ZERO));
    assert_eq!(slowmo.tag_count(), 5);
}

#[test]
fn test_marking_rejects_unmarkable_layers() {
    let mut world = World::new();
    let wall = world.spawn(());
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());

    assert!(
        !slowmo.try_mark(&marking_hit(wall, Layer::ENEMY), 0, Vec3::ZERO),
        "marking needs slowdown"
    );
    slowmo.toggle();
    assert!(!slowmo.try_mark(&marking_hit(wall, Layer::ENVIRONMENT), 0, Vec3::ZERO));
    assert!(slowmo.try_mark(&marking_hit(wall, Layer::TURRET), 0, Vec3::ZERO));
}

#[test]
fn test_executing_presents_tags_fifo() {
    let mut world = World::new();
    let first = world.spawn(());
    let second = world.spawn(());
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();
    slowmo.try_mark(&marking_hit(first, Layer::ENEMY), 1, Vec3::new(0.0, 0.0, 4.0));
    slowmo.try_mark(&marking_hit(second, Layer::ENEMY), 2, Vec3::new(0.0, 0.0, 6.0));
    assert!(slowmo.toggle());
    assert_eq!(slowmo.state(), SlowmoState::Executing);
    assert!(!slowmo.toggle(), "toggle is ignored while executing");
    slowmo.drain_events();

    let locate = |entity: hecs::Entity| {
        if entity == first {
            Some(Vec3::new(0.0, 0.0, 4.0))
        } else {
            Some(Vec3::new(0.0, 0.0, 6.0))
        }
    };
    slowmo.tick(1.0, locate);
    assert_eq!(slowmo.tag_count(), 1);
    slowmo.tick(1.0, locate);
    assert_eq!(slowmo.state(), SlowmoState::Inactive);

    let events = slowmo.drain_events();
    let expired: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SlowmoEvent::TagExpired { target } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(expired, vec![1, 2]);
    assert!(events.contains(&SlowmoEvent::Ended { with_sound: true }));
}

#[test]
fn test_tag_follows_target_and_drops_when_gone() {
    let mut world = World::new();
    let enemy = world.spawn(());
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();
    // Marked point is 1 unit in front of the target's centre.
    slowmo.try_mark(&marking_hit(enemy, Layer::ENEMY), 7, Vec3::new(0.0, 0.0, 6.0));

    slowmo.tick(0.1, |_| Some(Vec3::new(2.0, 0.0, 6.0)));
    let point = slowmo.tags().next().map(|tag| tag.point);
    assert_eq!(point, Some(Vec3::new(2.0, 0.0, 5.0)));

    slowmo.tick(0.1, |_| None);
    assert_eq!(slowmo.tag_count(), 0);
    assert!(slowmo
        .drain_events()
        .contains(&SlowmoEvent::TagDropped { target: 7 }));
}

#[test]
fn test_force_terminate_skips_interpolation() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();
    slowmo.tick(0.1, |_| None);
    assert!(slowmo.is_interpolating());

    slowmo.force_terminate();
    assert_eq!(slowmo.state(), SlowmoState::Inactive);
    assert_eq!(slowmo.time_scale(), 1.0);
    assert!(!slowmo.is_interpolating());
    assert!(slowmo
        .drain_events()
        .contains(&SlowmoEvent::Ended { with_sound: false }));
}

#[test]
fn test_exit_replaces_entry_interpolation() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.toggle();
    slowmo.tick(0.25, |_| None);
    let halfway = slowmo.time_scale();
    assert!(halfway < 1.0 && halfway > 0.25);

    slowmo.toggle();
    assert!(slowmo.is_interpolating());
    slowmo.tick(0.1, |_| None);
    assert!(slowmo.time_scale() > halfway, "heading back to normal time");
    slowmo.tick(0.2, |_| None);
    assert_eq!(slowmo.time_scale(), 1.0);
}

#[test]
fn test_gain_is_clamped() {
    let mut slowmo = SlowmoController::new(SlowmoTuning::default());
    slowmo.set_remaining(9.5);
    slowmo.gain();
    assert_eq!(slowmo.remaining(), slowmo.max_duration());
}

// ---- Damage dispatch and death handling ----

#[test]
fn test_turret_damage_scenario() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let turret = engine.spawn_turret(Vec3::new(0.0, 0.0, 10.0), None);
    let hit = |amount, weapon_type| DamageRequest {
        target: turret,
        amount,
        source: Some(player),
        weapon_type,
    };

    assert!(!engine.apply_damage(hit(30.0, WeaponType::None)));
    assert_eq!(health_of(&engine, turret), Some(80.0));

    assert!(!engine.apply_damage(hit(45.0, WeaponType::AntiTurret)));
    assert_eq!(health_of(&engine, turret), Some(35.0));

    assert!(engine.apply_damage(hit(45.0, WeaponType::AntiTurret)));
    assert!(!engine.world().contains(turret));
    assert_eq!(engine.stats().score(), 250);
    assert_eq!(engine.stats().enemies_killed(), 1);

    assert!(!engine.apply_damage(hit(45.0, WeaponType::AntiTurret)));
    assert_eq!(engine.stats().enemies_killed(), 1, "removed exactly once");
}

#[test]
fn test_turret_credit_does_not_need_player() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    let turret = engine.spawn_turret(Vec3::new(0.0, 0.0, 10.0), None);
    engine.slowmo_mut().set_remaining(5.0);

    assert!(engine.apply_damage(DamageRequest {
        target: turret,
        amount: 100.0,
        source: None,
        weapon_type: WeaponType::AntiTurret,
    }));
    assert_eq!(engine.stats().score(), 250);
    assert_eq!(engine.slowmo().remaining(), 5.0, "turrets never restore slowmo");
}

#[test]
fn test_player_kill_grants_score_and_slowmo() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let pursuer = engine.spawn_pursuer(Vec3::new(0.0, 0.0, 10.0));
    engine.slowmo_mut().set_remaining(5.0);

    assert!(engine.apply_damage(DamageRequest {
        target: pursuer,
        amount: 120.0,
        source: Some(player),
        weapon_type: WeaponType::None,
    }));
    assert_eq!(engine.stats().score(), 50);
    assert_eq!(engine.stats().enemies_killed(), 1);
    assert!((engine.slowmo().remaining() - 6.0).abs() < 1e-5);
}

#[test]
fn test_kill_by_other_source_is_not_credited() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    let kamikaze = engine.spawn_kamikaze(Vec3::new(0.0, 0.0, 10.0));
    let other = engine.spawn_pursuer(Vec3::new(5.0, 0.0, 10.0));
    engine.slowmo_mut().set_remaining(5.0);

    assert!(engine.apply_damage(DamageRequest {
        target: kamikaze,
        amount: 100.0,
        source: Some(other),
        weapon_type: WeaponType::None,
    }));
    assert!(!engine.world().contains(kamikaze));
    assert_eq!(engine.stats().score(), 0);
    assert_eq!(engine.stats().enemies_killed(), 0);
    assert_eq!(engine.slowmo().remaining(), 5.0);
}

fn death_effects(snapshot: &SimSnapshot) -> usize {
    snapshot
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SimEvent::Effect {
                    effect: EffectKind::DeathExplosion,
                    ..
                }
            )
        })
        .count()
}

#[test]
fn test_pursuer_death_effect_needs_player_kill() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let kamikaze = engine.spawn_kamikaze(Vec3::new(5.0, 0.0, 10.0));
    let by_kamikaze = engine.spawn_pursuer(Vec3::new(0.0, 0.0, 10.0));
    let by_player = engine.spawn_pursuer(Vec3::new(-5.0, 0.0, 10.0));

    assert!(engine.apply_damage(DamageRequest {
        target: by_kamikaze,
        amount: 100.0,
        source: Some(kamikaze),
        weapon_type: WeaponType::None,
    }));
    assert_eq!(death_effects(&engine.step(FRAME)), 0);

    assert!(engine.apply_damage(DamageRequest {
        target: by_player,
        amount: 100.0,
        source: Some(player),
        weapon_type: WeaponType::None,
    }));
    assert_eq!(death_effects(&engine.step(FRAME)), 1);

    // Kamikazes explode however they die.
    assert!(engine.apply_damage(DamageRequest {
        target: kamikaze,
        amount: 100.0,
        source: None,
        weapon_type: WeaponType::None,
    }));
    assert_eq!(death_effects(&engine.step(FRAME)), 1);
}

#[test]
fn test_certain_drop_spawns_pickup() {
    let mut config = SimConfig::default();
    config.tuning.pursuer.pickup_drop_chance = 1.0;
    let mut engine = SimulationEngine::new(config);
    let player = engine.spawn_player(Vec3::ZERO);
    let position = Vec3::new(3.0, 0.0, 10.0);
    let pursuer = engine.spawn_pursuer(position);

    engine.apply_damage(DamageRequest {
        target: pursuer,
        amount: 100.0,
        source: Some(player),
        weapon_type: WeaponType::None,
    });
    let drops: Vec<(Vec3, PickupKind)> = engine
        .world()
        .query::<(&Transform, &Pickup)>()
        .iter()
        .map(|(_, (t, p))| (t.position, p.kind))
        .collect();
    assert_eq!(drops, vec![(position, PickupKind::Health)]);
}

#[test]
fn test_zero_drop_chance_never_drops() {
    let mut config = SimConfig::default();
    config.tuning.kamikaze.pickup_drop_chance = 0.0;
    let mut engine = SimulationEngine::new(config);
    let player = engine.spawn_player(Vec3::ZERO);
    for i in 0..20 {
        let kamikaze = engine.spawn_kamikaze(Vec3::new(i as f32, 0.0, 10.0));
        engine.apply_damage(DamageRequest {
            target: kamikaze,
            amount: 100.0,
            source: Some(player),
            weapon_type: WeaponType::None,
        });
    }
    assert_eq!(engine.world().query::<&Pickup>().iter().count(), 0);
}

#[test]
fn test_linked_turrets_activate_goal() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let goal = engine.spawn_goal(Vec3::new(0.0, 0.0, -20.0));
    let turrets = [
        engine.spawn_turret(Vec3::new(-5.0, 0.0, -15.0), Some(goal)),
        engine.spawn_turret(Vec3::new(5.0, 0.0, -15.0), Some(goal)),
    ];
    let events = record_events(&mut engine);

    for (i, turret) in turrets.into_iter().enumerate() {
        engine.apply_damage(DamageRequest {
            target: turret,
            amount: 80.0,
            source: Some(player),
            weapon_type: WeaponType::AntiTurret,
        });
        let activated = engine.world().get::<&Goal>(goal).map(|g| g.activated).unwrap();
        assert_eq!(activated, i == 1);
    }

    engine.tick(FrameTime::unscaled(0.0));
    let goal_events = events
        .borrow()
        .iter()
        .filter(|e| **e == SimEvent::GoalActivated)
        .count();
    assert_eq!(goal_events, 1);
}

#[test]
fn test_player_death_ends_run_and_slowmo() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    engine.queue_command(PlayerCommand::StartRun);
    engine.step(FRAME);
    engine.slowmo_mut().toggle();
    engine.step(FRAME);
    assert_eq!(engine.slowmo().state(), SlowmoState::Slowdown);

    assert!(engine.apply_damage(DamageRequest {
        target: player,
        amount: 150.0,
        source: None,
        weapon_type: WeaponType::None,
    }));
    assert_eq!(engine.phase(), RunPhase::GameOver);
    assert_eq!(engine.slowmo().state(), SlowmoState::Inactive);
    assert_eq!(engine.time_scale(), 1.0);
    assert!(engine.player().is_none());

    let snapshot = engine.step(FRAME);
    assert!(snapshot.player.is_none());
    assert!(snapshot.events.contains(&SimEvent::PlayerDied));
}

// ---- Engine loop ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_commands([
            PlayerCommand::StartRun,
            PlayerCommand::Move {
                axis: Vec2::new(0.0, 1.0),
            },
            PlayerCommand::AimAt {
                point: Vec3::new(0.0, 0.0, 20.0),
            },
            PlayerCommand::FirePressed,
        ]);
    }

    for _ in 0..300 {
        let snap_a = engine_a.step(FRAME);
        let snap_b = engine_b.step(FRAME);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_start_run_builds_arena_when_empty() {
    let mut engine = new_engine();
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.phase, RunPhase::Ready);
    assert!(snapshot.player.is_none());
    assert_eq!(snapshot.clock.frame, 0, "nothing simulates before the run");

    engine.queue_command(PlayerCommand::StartRun);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.phase, RunPhase::Running);
    assert!(snapshot.player.is_some());
    assert_eq!(snapshot.enemies.len(), 4);
    let ids: Vec<u32> = snapshot.enemies.iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_start_run_keeps_custom_world() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.spawn_kamikaze(Vec3::new(0.0, 0.0, 20.0));
    engine.queue_command(PlayerCommand::StartRun);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.enemies.len(), 1);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = new_engine();
    engine.queue_command(PlayerCommand::StartRun);
    run_for(&mut engine, 0.5);
    let frame = engine.clock().frame;

    engine.queue_command(PlayerCommand::Pause);
    run_for(&mut engine, 0.5);
    assert_eq!(engine.clock().frame, frame);
    assert_eq!(engine.phase(), RunPhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    engine.step(FRAME);
    assert_eq!(engine.clock().frame, frame + 1);
}

#[test]
fn test_fixed_steps_are_capped() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    engine.queue_commands([
        PlayerCommand::StartRun,
        PlayerCommand::Move {
            axis: Vec2::new(1.0, 0.0),
        },
    ]);
    engine.step(0.0);

    // A one-second hitch runs at most eight 0.02s sub-steps.
    engine.step(1.0);
    let x = engine.world().get::<&Transform>(player).unwrap().position.x;
    assert!((x - 0.96).abs() < 1e-3, "moved {x}");
}

#[test]
fn test_observers_see_every_snapshot_event() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    let events = record_events(&mut engine);
    engine.queue_commands([PlayerCommand::StartRun, PlayerCommand::ToggleSlowmo]);
    let snapshot = engine.step(FRAME);

    assert!(!snapshot.events.is_empty());
    assert_eq!(*events.borrow(), snapshot.events);
    assert!(snapshot
        .events
        .contains(&SimEvent::Slowmo(SlowmoEvent::Started)));
}

// ---- Enemy AI through the engine ----

#[test]
fn test_pursuer_stops_and_fires_at_visible_player() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    engine.spawn_pursuer(Vec3::new(10.0, 0.0, 0.0));
    let events = record_events(&mut engine);
    engine.queue_command(PlayerCommand::StartRun);

    let snapshot = run_for(&mut engine, 0.5);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Pursuer(PursuerState::Firing)
    );
    assert!(snapshot.enemies[0].firing);
    assert!((snapshot.enemies[0].position.x - 10.0).abs() < 1e-4, "holds position");

    // One five-second charge lands one 25 damage shot.
    run_for(&mut engine, 5.5);
    assert_eq!(health_of(&engine, player), Some(75.0));
    let log = events.borrow();
    assert!(log.iter().any(|e| matches!(e, SimEvent::WeaponCharging { .. })));
    assert_eq!(
        log.iter().filter(|e| matches!(e, SimEvent::Trail { .. })).count(),
        1
    );
}

#[test]
fn test_pursuer_behind_wall_stays_idle() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.spawn_wall(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.5, 2.0, 5.0));
    engine.spawn_pursuer(Vec3::new(10.0, 0.0, 0.0));
    engine.queue_command(PlayerCommand::StartRun);

    let snapshot = run_for(&mut engine, 1.0);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Pursuer(PursuerState::Idle)
    );
}

#[test]
fn test_enemy_without_target_is_forced_idle() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let turret = engine.spawn_turret(Vec3::new(0.0, 0.0, -10.0), None);
    engine.queue_command(PlayerCommand::StartRun);
    let snapshot = run_for(&mut engine, 0.5);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Turret(TurretState::Firing)
    );

    engine.world_mut().despawn(player).unwrap();
    let snapshot = engine.step(FRAME);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Turret(TurretState::Idle)
    );
    assert!(!snapshot.enemies[0].firing);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::WeaponStopped { .. })));
    assert!(engine.world().contains(turret));
}

#[test]
fn test_turret_turns_before_firing() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.spawn_turret(Vec3::new(10.0, 0.0, 0.0), None);
    engine.queue_command(PlayerCommand::StartRun);

    let snapshot = run_for(&mut engine, 1.0);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Turret(TurretState::FacingTarget)
    );
    assert!(!snapshot.enemies[0].firing);

    let snapshot = run_for(&mut engine, 2.0);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Turret(TurretState::Firing)
    );
    assert!(snapshot.enemies[0].forward.x < -0.99);
}

#[test]
fn test_kamikaze_detonates_next_to_player() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let kamikaze = engine.spawn_kamikaze(Vec3::new(2.0, 0.0, 0.0));
    let events = record_events(&mut engine);
    engine.queue_command(PlayerCommand::StartRun);

    let snapshot = run_for(&mut engine, 1.0);
    assert_eq!(
        snapshot.enemies[0].state,
        BrainState::Kamikaze(KamikazeState::AboutToExplode)
    );

    run_for(&mut engine, 3.0);
    assert!(!engine.world().contains(kamikaze));
    let health = health_of(&engine, player).unwrap();
    assert!(health > 60.0 && health < 70.0, "health {health}");
    assert_eq!(engine.stats().score(), 0, "self-destruct is not a kill");

    let log = events.borrow();
    assert!(log.iter().any(|e| matches!(e, SimEvent::FuseLit { .. })));
    assert!(log.iter().any(|e| matches!(
        e,
        SimEvent::Effect {
            effect: EffectKind::KamikazeExplosion,
            ..
        }
    )));
}

// ---- Player controller ----

#[test]
fn test_slowmo_scales_simulation_time() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.queue_commands([PlayerCommand::StartRun, PlayerCommand::ToggleSlowmo]);
    run_for(&mut engine, 1.0);

    assert!((engine.time_scale() - 0.25).abs() < 1e-6);
    assert!((engine.slowmo().remaining() - 9.0).abs() < 0.05);
    let clock = engine.clock();
    assert!(clock.elapsed_secs < clock.unscaled_elapsed_secs * 0.75);
    // The run timer follows the slowed clock, not the wall clock.
    let time_taken = engine.stats().time_taken();
    assert!((time_taken - clock.elapsed_secs).abs() < 1e-4);
    assert!(time_taken < clock.unscaled_elapsed_secs * 0.75);
}

#[test]
fn test_mark_and_execute_fires_at_tag() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    let pursuer = engine.spawn_pursuer(Vec3::new(0.0, 0.0, 8.0));
    let events = record_events(&mut engine);
    engine.queue_commands([
        PlayerCommand::StartRun,
        PlayerCommand::AimAt {
            point: Vec3::new(0.0, 0.0, 8.0),
        },
    ]);
    run_for(&mut engine, 0.1);

    engine.queue_command(PlayerCommand::ToggleSlowmo);
    engine.step(FRAME);
    engine.queue_command(PlayerCommand::FirePressed);
    engine.step(FRAME);
    assert_eq!(engine.slowmo().tag_count(), 1);
    assert!(
        !engine.step(FRAME).player.unwrap().firing,
        "marking does not fire"
    );

    engine.queue_command(PlayerCommand::ToggleSlowmo);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.slowmo.state, SlowmoState::Executing);

    let snapshot = run_for(&mut engine, 1.5);
    assert_eq!(snapshot.slowmo.state, SlowmoState::Inactive);
    assert!(!snapshot.player.unwrap().firing, "slowmo end stops the weapon");
    let health = health_of(&engine, pursuer).unwrap();
    assert!(health < 100.0 && health > 0.0, "health {health}");

    let log = events.borrow();
    assert!(log
        .iter()
        .any(|e| matches!(e, SimEvent::Slowmo(SlowmoEvent::TargetMarked { .. }))));
    assert!(log.contains(&SimEvent::Slowmo(SlowmoEvent::Ended { with_sound: true })));
}

#[test]
fn test_fire_press_and_release() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.queue_commands([PlayerCommand::StartRun, PlayerCommand::FirePressed]);
    assert!(engine.step(FRAME).player.unwrap().firing);
    assert!(engine.step(FRAME).player.unwrap().firing, "held until released");

    engine.queue_command(PlayerCommand::FireReleased);
    assert!(!engine.step(FRAME).player.unwrap().firing);
}

#[test]
fn test_regeneration_after_delay() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    engine.queue_command(PlayerCommand::StartRun);
    engine.step(FRAME);
    engine.apply_damage(DamageRequest {
        target: player,
        amount: 50.0,
        source: None,
        weapon_type: WeaponType::None,
    });

    run_for(&mut engine, 9.0);
    assert_eq!(health_of(&engine, player), Some(50.0));

    run_for(&mut engine, 2.0);
    let health = health_of(&engine, player).unwrap();
    assert!(health > 52.0 && health < 58.0, "health {health}");
}

#[test]
fn test_unlock_doors_spends_keys() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    let door = engine.spawn_door(Vec3::new(0.0, 0.0, 1.2), Vec3::new(1.0, 1.0, 0.2));
    engine.queue_commands([PlayerCommand::StartRun, PlayerCommand::UnlockDoors]);
    let snapshot = engine.step(FRAME);
    assert!(snapshot.events.contains(&SimEvent::KeysDenied));

    engine.spawn_pickup(PickupKind::Key, Vec3::ZERO);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.stats.keys, 1);
    assert!(snapshot.events.contains(&SimEvent::PickupCollected {
        kind: PickupKind::Key
    }));

    engine.queue_command(PlayerCommand::UnlockDoors);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.stats.keys, 0);
    assert_eq!(snapshot.stats.lifetime_keys, 1);
    assert!(!engine.world().get::<&Door>(door).unwrap().locked);
    assert!(engine.world().get::<&Collider>(door).is_err(), "no longer blocks");
}

#[test]
fn test_lens_switches_weapon_to_anti_turret() {
    let mut engine = new_engine();
    engine.spawn_player(Vec3::ZERO);
    engine.spawn_pickup(PickupKind::AntiTurretLens, Vec3::new(0.5, 0.0, 0.0));
    engine.queue_command(PlayerCommand::StartRun);
    let snapshot = engine.step(FRAME);

    assert_eq!(snapshot.player.unwrap().weapon_type, WeaponType::AntiTurret);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::WeaponTypeChanged { .. })));
    assert_eq!(engine.world().query::<&Pickup>().iter().count(), 0);
}

#[test]
fn test_goal_needs_activation_and_normal_time() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    let goal = engine.spawn_goal(Vec3::new(0.5, 0.0, 0.0));
    engine.queue_command(PlayerCommand::StartRun);
    engine.step(FRAME);
    assert!(engine.world().contains(goal), "inactive goal stays put");

    {
        let mut goal = engine.world_mut().get::<&mut Goal>(goal).unwrap();
        goal.fulfill_requirement();
        goal.fulfill_requirement();
    }
    engine.queue_command(PlayerCommand::ToggleSlowmo);
    engine.step(FRAME);
    assert_eq!(engine.phase(), RunPhase::Running, "no win during slowmo");

    engine.queue_command(PlayerCommand::ToggleSlowmo);
    let snapshot = engine.step(FRAME);
    assert_eq!(snapshot.phase, RunPhase::Victory);
    assert!(snapshot.events.contains(&SimEvent::RunWon));
    assert!(!engine.world().contains(player));
}

#[test]
fn test_data_card_and_health_pickups() {
    let mut engine = new_engine();
    let player = engine.spawn_player(Vec3::ZERO);
    engine.apply_damage(DamageRequest {
        target: player,
        amount: 50.0,
        source: None,
        weapon_type: WeaponType::None,
    });
    engine.spawn_pickup(PickupKind::DataCard, Vec3::ZERO);
    engine.spawn_pickup(PickupKind::Health, Vec3::ZERO);
    engine.queue_command(PlayerCommand::StartRun);
    engine.step(FRAME);

    assert_eq!(engine.stats().score(), 150);
    assert_eq!(health_of(&engine, player), Some(60.0));
}
