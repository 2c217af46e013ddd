//! Enemy AI system.
//!
//! Per agent and in id order: resolve the target, refresh throttled
//! perception when due, evaluate the variant's FSM from rogue-ai, then
//! apply the returned directives to the navigation, weapon and fuse
//! components. An agent whose target is missing is forced idle.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::debug;

use rogue_ai::fsm::{Directive, Transition};
use rogue_ai::kamikaze::{self, KamikazeContext};
use rogue_ai::pursuer::{self, PursuerContext};
use rogue_ai::turret::{self, TurretContext};
use rogue_core::components::{
    Agent, Collider, KamikazeBrain, NavAgent, PursuerBrain, Transform, TurretBrain,
};
use rogue_core::enums::{
    AgentKind, BrainState, EffectKind, KamikazeState, PursuerState, TriggerInteraction,
    TurretState, WeaponType,
};
use rogue_core::events::SimEvent;
use rogue_core::layers::LayerMask;
use rogue_core::types::{flat_direction, rotate_towards, slerp_direction, FrameTime};

use crate::components::Target;
use crate::damage::DamageRequest;
use crate::perception::Perception;
use crate::spatial::{SceneQuery, SpatialQuery};
use crate::systems::{agents_in_order, position_of};
use crate::weapon::Weapon;

/// Frame inputs shared by every controller.
#[derive(Debug, Clone, Copy)]
pub struct AiFrame {
    pub time: FrameTime,
    pub queries_hit_triggers: bool,
    pub explosion_lifetime: f32,
}

/// What the controllers asked for that outlives the system call.
#[derive(Debug, Default)]
pub struct AiOutput {
    /// Explosion damage, to dispatch before `detonated` are removed.
    pub requests: Vec<DamageRequest>,
    pub detonated: Vec<Entity>,
}

/// Cached perception plus the target's current whereabouts.
#[derive(Debug, Clone, Copy)]
struct Sighting {
    target: Entity,
    target_position: Vec3,
    visible: bool,
    sqr_distance: f32,
    /// A line-of-sight check ran this frame.
    refreshed: bool,
}

pub fn run(world: &mut World, frame: AiFrame, events: &mut Vec<SimEvent>) -> AiOutput {
    let mut output = AiOutput::default();

    for entity in agents_in_order::<Perception>(world) {
        let Ok(kind) = world.get::<&Agent>(entity).map(|agent| agent.kind) else {
            continue;
        };
        let sighting = perceive(world, entity, frame);
        match (kind, sighting) {
            (AgentKind::Pursuer, Some(sighting)) => update_pursuer(world, entity, sighting, events),
            (AgentKind::Kamikaze, Some(sighting)) => {
                update_kamikaze(world, entity, sighting, frame, events, &mut output)
            }
            (AgentKind::Turret, Some(sighting)) => {
                update_turret(world, entity, sighting, frame, events)
            }
            (_, None) => force_idle(world, entity, events),
            (AgentKind::Player, Some(_)) => {}
        }
    }
    output
}

/// Physics sub-step: a firing pursuer turns toward its target by a fixed
/// fraction of the remaining angle.
pub fn fixed_step(world: &mut World) {
    let mut turns: Vec<(Entity, Vec3)> = Vec::new();
    {
        let mut query = world.query::<(&Transform, &PursuerBrain, &Target)>();
        for (entity, (transform, brain, target)) in query.iter() {
            if !pursuer::rotates_toward_target(brain.state) {
                continue;
            }
            let Some(target_position) = target.0.and_then(|t| position_of(world, t)) else {
                continue;
            };
            if let Some(desired) = flat_direction(transform.position, target_position) {
                let turned = slerp_direction(
                    transform.forward,
                    desired,
                    brain.tuning.rotation_interpolation,
                );
                turns.push((entity, turned));
            }
        }
    }
    for (entity, forward) in turns {
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.forward = forward;
        }
    }
}

/// Count down the perception timer and refresh the cached result when due.
/// Returns `None` when the agent has no live target.
fn perceive(world: &mut World, entity: Entity, frame: AiFrame) -> Option<Sighting> {
    let target = world.get::<&Target>(entity).ok()?.0?;
    let target_position = position_of(world, target)?;
    let observer = position_of(world, entity)?;
    let mut perception = *world.get::<&Perception>(entity).ok()?;

    let refreshed = perception.advance(frame.time);
    if refreshed {
        let scene = SceneQuery::new(world, frame.queries_hit_triggers);
        perception.refresh(&scene, observer, target, target_position);
    }
    if let Ok(mut stored) = world.get::<&mut Perception>(entity) {
        *stored = perception;
    }

    Some(Sighting {
        target,
        target_position,
        visible: perception.visible,
        sqr_distance: perception.sqr_distance,
        refreshed,
    })
}

fn update_pursuer(
    world: &mut World,
    entity: Entity,
    sighting: Sighting,
    events: &mut Vec<SimEvent>,
) {
    let Ok((state, firing_range)) = world
        .get::<&PursuerBrain>(entity)
        .map(|brain| (brain.state, brain.tuning.firing_range))
    else {
        return;
    };

    if sighting.refreshed && sighting.visible {
        if let Ok(mut nav) = world.get::<&mut NavAgent>(entity) {
            if nav.enabled {
                nav.destination = Some(sighting.target_position);
            }
        }
    }

    let transition = pursuer::evaluate(&PursuerContext {
        state,
        visible: sighting.visible,
        sqr_distance: sighting.sqr_distance,
        firing_range,
        target_position: sighting.target_position,
    });
    if transition.changed {
        if let Ok(mut brain) = world.get::<&mut PursuerBrain>(entity) {
            brain.state = transition.new_state;
        }
    }
    record_transition(world, entity, &transition, BrainState::Pursuer, events);
    apply_directives(world, entity, &transition.directives, events);
}

fn update_kamikaze(
    world: &mut World,
    entity: Entity,
    sighting: Sighting,
    frame: AiFrame,
    events: &mut Vec<SimEvent>,
    output: &mut AiOutput,
) {
    let Ok(brain) = world.get::<&KamikazeBrain>(entity).map(|brain| (*brain).clone()) else {
        return;
    };

    if sighting.refreshed && sighting.visible {
        if let Ok(mut nav) = world.get::<&mut NavAgent>(entity) {
            nav.destination = Some(sighting.target_position);
        }
    }

    let update = kamikaze::evaluate(&KamikazeContext {
        state: brain.state,
        visible: sighting.visible,
        sqr_distance: sighting.sqr_distance,
        fuse_remaining: brain.fuse_remaining,
        dt: frame.time.delta,
        target_position: sighting.target_position,
        tuning: &brain.tuning,
    });
    if let Ok(mut stored) = world.get::<&mut KamikazeBrain>(entity) {
        stored.state = update.transition.new_state;
        stored.fuse_remaining = update.fuse_remaining;
    }
    record_transition(world, entity, &update.transition, BrainState::Kamikaze, events);
    apply_directives(world, entity, &update.transition.directives, events);

    for directive in &update.transition.directives {
        if let Directive::Detonate { damage } = directive {
            let at = position_of(world, entity).unwrap_or_default();
            if let Some(amount) = damage {
                output.requests.push(DamageRequest {
                    target: sighting.target,
                    amount: *amount,
                    source: Some(entity),
                    weapon_type: WeaponType::None,
                });
            }
            events.push(SimEvent::Effect {
                effect: EffectKind::KamikazeExplosion,
                at,
                lifetime: frame.explosion_lifetime,
            });
            debug!(?at, damage = ?damage, "kamikaze detonated");
            output.detonated.push(entity);
        }
    }
}

fn update_turret(
    world: &mut World,
    entity: Entity,
    sighting: Sighting,
    frame: AiFrame,
    events: &mut Vec<SimEvent>,
) {
    let Ok((state, detection_range, turn_speed)) = world
        .get::<&TurretBrain>(entity)
        .map(|brain| (brain.state, brain.tuning.detection_range, brain.tuning.turn_speed))
    else {
        return;
    };
    let Ok(head) = world.get::<&Transform>(entity).map(|t| *t) else {
        return;
    };

    let mut aimed = false;
    if turret::tracks_target(state) {
        let mut forward = head.forward;
        if let Some(desired) = flat_direction(head.position, sighting.target_position) {
            forward = rotate_towards(forward, desired, turn_speed * frame.time.delta);
        }
        if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
            transform.forward = forward;
        }

        let target_layer = world.get::<&Collider>(sighting.target).map(|c| c.layer);
        if let Ok(target_layer) = target_layer {
            let scene = SceneQuery::new(world, frame.queries_hit_triggers);
            aimed = scene
                .raycast(
                    head.position,
                    forward,
                    detection_range,
                    LayerMask::of(target_layer),
                    TriggerInteraction::UseGlobal,
                )
                .is_some_and(|hit| hit.entity == sighting.target);
        }
    }

    let transition = turret::evaluate(&TurretContext {
        state,
        visible: sighting.visible,
        aimed,
    });
    if transition.changed {
        if let Ok(mut brain) = world.get::<&mut TurretBrain>(entity) {
            brain.state = transition.new_state;
        }
    }
    record_transition(world, entity, &transition, BrainState::Turret, events);
    apply_directives(world, entity, &transition.directives, events);
}

/// No target: forget what was seen, stop the weapon, reset the fuse and
/// drop to idle.
fn force_idle(world: &mut World, entity: Entity, events: &mut Vec<SimEvent>) {
    if let Ok(mut perception) = world.get::<&mut Perception>(entity) {
        perception.forget();
    }
    stop_weapon(world, entity, events);

    let mut became_idle: Option<BrainState> = None;
    let mut fuse_aborted = false;
    if let Ok(mut brain) = world.get::<&mut PursuerBrain>(entity) {
        if brain.state != PursuerState::Idle {
            brain.state = PursuerState::Idle;
            became_idle = Some(BrainState::Pursuer(PursuerState::Idle));
        }
    }
    if let Ok(mut brain) = world.get::<&mut KamikazeBrain>(entity) {
        fuse_aborted = brain.state == KamikazeState::AboutToExplode;
        brain.fuse_remaining = brain.tuning.exploding_duration;
        if brain.state != KamikazeState::Idle {
            brain.state = KamikazeState::Idle;
            became_idle = Some(BrainState::Kamikaze(KamikazeState::Idle));
        }
    }
    if let Ok(mut brain) = world.get::<&mut TurretBrain>(entity) {
        if brain.state != TurretState::Idle {
            brain.state = TurretState::Idle;
            became_idle = Some(BrainState::Turret(TurretState::Idle));
        }
    }

    let Ok(agent) = world.get::<&Agent>(entity).map(|a| a.id) else {
        return;
    };
    if fuse_aborted {
        events.push(SimEvent::FuseAborted { agent });
    }
    if let Some(state) = became_idle {
        debug!(agent, "target lost, forced idle");
        events.push(SimEvent::StateChanged { agent, state });
    }
}

fn record_transition<S: Copy + PartialEq>(
    world: &World,
    entity: Entity,
    transition: &Transition<S>,
    wrap: fn(S) -> BrainState,
    events: &mut Vec<SimEvent>,
) {
    if !transition.changed {
        return;
    }
    if let Ok(agent) = world.get::<&Agent>(entity).map(|a| a.id) {
        let state = wrap(transition.new_state);
        debug!(agent, ?state, "enemy state changed");
        events.push(SimEvent::StateChanged { agent, state });
    }
}

fn apply_directives(
    world: &mut World,
    entity: Entity,
    directives: &[Directive],
    events: &mut Vec<SimEvent>,
) {
    let agent = world.get::<&Agent>(entity).map(|a| a.id).ok();
    for directive in directives {
        match *directive {
            Directive::StartFiring => {
                let started = world
                    .get::<&mut Weapon>(entity)
                    .map(|mut weapon| weapon.start_firing())
                    .unwrap_or(false);
                if let (true, Some(agent)) = (started, agent) {
                    events.push(SimEvent::WeaponStarted { agent });
                }
            }
            Directive::StopFiring => stop_weapon(world, entity, events),
            Directive::EnableNavigation => with_nav(world, entity, |nav| nav.enabled = true),
            Directive::DisableNavigation => with_nav(world, entity, |nav| nav.enabled = false),
            Directive::HaltMovement => with_nav(world, entity, |nav| nav.stopped = true),
            Directive::ResumeMovement => with_nav(world, entity, |nav| nav.stopped = false),
            Directive::SetDestination(point) => {
                with_nav(world, entity, |nav| nav.destination = Some(point))
            }
            Directive::BeginFuse => {
                if let Some(agent) = agent {
                    events.push(SimEvent::FuseLit { agent });
                }
            }
            Directive::AbortFuse => {
                if let Some(agent) = agent {
                    events.push(SimEvent::FuseAborted { agent });
                }
            }
            // Needs the target; handled by the kamikaze update.
            Directive::Detonate { .. } => {}
        }
    }
}

fn stop_weapon(world: &mut World, entity: Entity, events: &mut Vec<SimEvent>) {
    let stopped = world
        .get::<&mut Weapon>(entity)
        .map(|mut weapon| weapon.stop_firing())
        .unwrap_or(false);
    if stopped {
        if let Ok(agent) = world.get::<&Agent>(entity).map(|a| a.id) {
            events.push(SimEvent::WeaponStopped { agent });
        }
    }
}

fn with_nav(world: &mut World, entity: Entity, f: impl FnOnce(&mut NavAgent)) {
    if let Ok(mut nav) = world.get::<&mut NavAgent>(entity) {
        f(&mut nav);
    }
}
