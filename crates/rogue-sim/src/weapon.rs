//! Weapon firing state machines.
//!
//! A [`Weapon`] is a component on its wielder. Each frame the weapons system
//! hands it the wielder's muzzle ray and a spatial query; the weapon returns
//! what it struck and which trails to draw. Damage dispatch happens later.

use glam::Vec3;
use hecs::Entity;

use rogue_core::config::{BeamWeaponTuning, ChargeWeaponTuning, RapidFireTuning};
use rogue_core::enums::{TimeBase, TriggerInteraction, WeaponKind, WeaponType};
use rogue_core::layers::LayerMask;
use rogue_core::types::FrameTime;

use crate::spatial::{RayHit, SpatialQuery};

/// Where shots leave from and which way they go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Damage to dispatch against a struck entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub target: Entity,
    pub amount: f32,
    pub weapon_type: WeaponType,
    pub point: Vec3,
}

/// A transient tracer toward a hit point or the end of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    pub from: Vec3,
    pub to: Vec3,
    pub speed: f32,
    pub fade_out: f32,
}

/// Everything a weapon did during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponReport {
    pub strikes: Vec<Strike>,
    pub trails: Vec<Trail>,
    /// The about-to-fire indicator switched on this frame.
    pub charging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrailStyle {
    speed: f32,
    fade_out: f32,
}

/// Timers for each firing mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiringMechanism {
    /// Count down a charge, then fire one shot.
    ChargeBurst {
        charge_time: f32,
        warning_time: f32,
        charge_remaining: f32,
        about_to_fire: bool,
    },
    /// Damage over time while the beam stays on one target.
    Beam {
        damage_period: f32,
        clock: TimeBase,
        tick_remaining: f32,
        on_target: Option<Entity>,
    },
    /// One-time windup, then a shot every `shot_period`.
    RapidFire {
        windup_time: f32,
        shot_period: f32,
        windup_remaining: f32,
        shot_remaining: f32,
        wound_up: bool,
    },
}

impl FiringMechanism {
    fn reset(&mut self) {
        match self {
            Self::ChargeBurst {
                charge_time,
                charge_remaining,
                about_to_fire,
                ..
            } => {
                *charge_remaining = *charge_time;
                *about_to_fire = false;
            }
            Self::Beam {
                damage_period,
                tick_remaining,
                on_target,
                ..
            } => {
                *tick_remaining = *damage_period;
                *on_target = None;
            }
            Self::RapidFire {
                windup_time,
                shot_period,
                windup_remaining,
                shot_remaining,
                wound_up,
            } => {
                *windup_remaining = *windup_time;
                *shot_remaining = *shot_period;
                *wound_up = false;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    weapon_type: WeaponType,
    range: f32,
    damage: f32,
    layers_to_hit: LayerMask,
    layers_to_damage: LayerMask,
    triggers: TriggerInteraction,
    trail: Option<TrailStyle>,
    firing: bool,
    mechanism: FiringMechanism,
}

impl Weapon {
    fn new(
        range: f32,
        damage: f32,
        layers_to_hit: LayerMask,
        layers_to_damage: LayerMask,
        trail: Option<TrailStyle>,
        mechanism: FiringMechanism,
    ) -> Self {
        Self {
            weapon_type: WeaponType::None,
            range,
            damage,
            // Anything damageable must also be hittable
            layers_to_hit: layers_to_hit.union(layers_to_damage),
            layers_to_damage,
            triggers: TriggerInteraction::UseGlobal,
            trail,
            firing: false,
            mechanism,
        }
    }

    pub fn charge_burst(tuning: &ChargeWeaponTuning, hit: LayerMask, damage: LayerMask) -> Self {
        Self::new(
            tuning.range,
            tuning.damage,
            hit,
            damage,
            Some(TrailStyle {
                speed: tuning.trail_speed,
                fade_out: tuning.trail_fade_out,
            }),
            FiringMechanism::ChargeBurst {
                charge_time: tuning.charge_time,
                warning_time: tuning.warning_time,
                charge_remaining: tuning.charge_time,
                about_to_fire: false,
            },
        )
    }

    pub fn beam(tuning: &BeamWeaponTuning, hit: LayerMask, damage: LayerMask) -> Self {
        Self::new(
            tuning.range,
            tuning.damage,
            hit,
            damage,
            None,
            FiringMechanism::Beam {
                damage_period: tuning.damage_period,
                clock: tuning.clock,
                tick_remaining: tuning.damage_period,
                on_target: None,
            },
        )
    }

    pub fn rapid_fire(tuning: &RapidFireTuning, hit: LayerMask, damage: LayerMask) -> Self {
        let shot_period = 1.0 / tuning.fire_rate;
        Self::new(
            tuning.range,
            tuning.damage,
            hit,
            damage,
            Some(TrailStyle {
                speed: tuning.trail_speed,
                fade_out: tuning.trail_fade_out,
            }),
            FiringMechanism::RapidFire {
                windup_time: tuning.windup_time,
                shot_period,
                windup_remaining: tuning.windup_time,
                shot_remaining: shot_period,
                wound_up: false,
            },
        )
    }

    pub fn with_weapon_type(mut self, weapon_type: WeaponType) -> Self {
        self.weapon_type = weapon_type;
        self
    }

    pub fn kind(&self) -> WeaponKind {
        match self.mechanism {
            FiringMechanism::ChargeBurst { .. } => WeaponKind::ChargeBurst,
            FiringMechanism::Beam { .. } => WeaponKind::Beam,
            FiringMechanism::RapidFire { .. } => WeaponKind::RapidFire,
        }
    }

    pub fn mechanism(&self) -> &FiringMechanism {
        &self.mechanism
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.weapon_type
    }

    pub fn layers_to_hit(&self) -> LayerMask {
        self.layers_to_hit
    }

    pub fn layers_to_damage(&self) -> LayerMask {
        self.layers_to_damage
    }

    /// Replace the damage classification. Returns the previous one if it
    /// changed.
    pub fn set_weapon_type(&mut self, weapon_type: WeaponType) -> Option<WeaponType> {
        let previous = self.weapon_type;
        self.weapon_type = weapon_type;
        (previous != weapon_type).then_some(previous)
    }

    /// Returns false if already firing.
    pub fn start_firing(&mut self) -> bool {
        if self.firing {
            return false;
        }
        self.firing = true;
        self.mechanism.reset();
        true
    }

    /// Stop and return every timer to rest. Returns false if not firing.
    pub fn stop_firing(&mut self) -> bool {
        if !self.firing {
            return false;
        }
        self.firing = false;
        self.mechanism.reset();
        true
    }

    /// Advance timers by one frame and fire if due.
    pub fn tick(
        &mut self,
        time: FrameTime,
        muzzle: Muzzle,
        scene: &dyn SpatialQuery,
    ) -> WeaponReport {
        let mut report = WeaponReport::default();
        if !self.firing {
            return report;
        }

        match self.mechanism {
            FiringMechanism::ChargeBurst {
                charge_time,
                warning_time,
                mut charge_remaining,
                mut about_to_fire,
            } => {
                charge_remaining -= time.delta;
                if !about_to_fire && charge_remaining <= warning_time {
                    about_to_fire = true;
                    report.charging = true;
                }
                if charge_remaining <= 0.0 {
                    let hit = self.cast(scene, muzzle);
                    self.fire_shot(hit, muzzle, &mut report);
                    charge_remaining = charge_time;
                    about_to_fire = false;
                }
                self.mechanism = FiringMechanism::ChargeBurst {
                    charge_time,
                    warning_time,
                    charge_remaining,
                    about_to_fire,
                };
            }
            FiringMechanism::Beam {
                damage_period,
                clock,
                mut tick_remaining,
                mut on_target,
            } => {
                let hit = self.cast(scene, muzzle);
                let struck = hit.map(|h| h.entity);
                if struck != on_target {
                    on_target = struck;
                    tick_remaining = damage_period;
                }
                if let Some(hit) = hit {
                    tick_remaining -= match clock {
                        TimeBase::Scaled => time.delta,
                        TimeBase::Unscaled => time.unscaled_delta,
                    };
                    while tick_remaining <= 0.0 {
                        self.strike(hit, &mut report);
                        tick_remaining += damage_period;
                    }
                }
                self.mechanism = FiringMechanism::Beam {
                    damage_period,
                    clock,
                    tick_remaining,
                    on_target,
                };
            }
            FiringMechanism::RapidFire {
                windup_time,
                shot_period,
                mut windup_remaining,
                mut shot_remaining,
                mut wound_up,
            } => {
                if !wound_up {
                    windup_remaining -= time.delta;
                    wound_up = windup_remaining <= 0.0;
                } else {
                    shot_remaining -= time.delta;
                    while shot_remaining <= 0.0 {
                        let hit = self.cast(scene, muzzle);
                        self.fire_shot(hit, muzzle, &mut report);
                        shot_remaining += shot_period;
                    }
                }
                self.mechanism = FiringMechanism::RapidFire {
                    windup_time,
                    shot_period,
                    windup_remaining,
                    shot_remaining,
                    wound_up,
                };
            }
        }
        report
    }

    fn cast(&self, scene: &dyn SpatialQuery, muzzle: Muzzle) -> Option<RayHit> {
        scene.raycast(
            muzzle.origin,
            muzzle.direction,
            self.range,
            self.layers_to_hit,
            self.triggers,
        )
    }

    /// One discrete shot: a trail to the hit (or full range) and a strike
    /// if the hit is damageable.
    fn fire_shot(&self, hit: Option<RayHit>, muzzle: Muzzle, report: &mut WeaponReport) {
        let end = match hit {
            Some(hit) => hit.point,
            None => muzzle.origin + muzzle.direction.normalize_or_zero() * self.range,
        };
        if let Some(style) = self.trail {
            report.trails.push(Trail {
                from: muzzle.origin,
                to: end,
                speed: style.speed,
                fade_out: style.fade_out,
            });
        }
        if let Some(hit) = hit {
            self.strike(hit, report);
        }
    }

    fn strike(&self, hit: RayHit, report: &mut WeaponReport) {
        if self.layers_to_damage.contains(hit.layer) {
            report.strikes.push(Strike {
                target: hit.entity,
                amount: self.damage,
                weapon_type: self.weapon_type,
                point: hit.point,
            });
        }
    }
}
