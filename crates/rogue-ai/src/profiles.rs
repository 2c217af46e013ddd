//! Per-variant enemy profiles.
//!
//! Consolidates the parameters the spawner and death handling need for
//! each enemy variant, resolved from the run's tuning.

use rogue_core::config::TuningConfig;
use rogue_core::enums::{AgentKind, EffectKind, WeaponType};

/// The agent kinds that have an enemy profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Pursuer,
    Kamikaze,
    Turret,
}

impl From<EnemyKind> for AgentKind {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Pursuer => AgentKind::Pursuer,
            EnemyKind::Kamikaze => AgentKind::Kamikaze,
            EnemyKind::Turret => AgentKind::Turret,
        }
    }
}

/// Behavioral profile for an enemy variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyProfile {
    pub kind: AgentKind,
    pub max_health: f32,
    /// Score awarded on a credited kill.
    pub points: u32,
    /// Range gating the perception ray.
    pub perception_range: f32,
    /// When set, only damage of this type is accepted.
    pub accepts_only: Option<WeaponType>,
    /// A player kill restores tactical pause budget.
    pub grants_slowmo: bool,
    /// Score and kill count are awarded whoever dealt the final blow.
    pub credit_any_source: bool,
    /// Chance of dropping a health pickup on death.
    pub drop_chance: f32,
    pub death_effect: EffectKind,
    /// The death effect only plays when the player dealt the final blow.
    pub effect_needs_player_kill: bool,
}

/// Get the profile for an enemy variant.
pub fn get_profile(kind: EnemyKind, tuning: &TuningConfig) -> EnemyProfile {
    match kind {
        EnemyKind::Pursuer => EnemyProfile {
            kind: kind.into(),
            max_health: tuning.pursuer.max_health,
            points: tuning.pursuer.points,
            perception_range: tuning.pursuer.pursue_range,
            accepts_only: None,
            grants_slowmo: true,
            credit_any_source: false,
            drop_chance: tuning.pursuer.pickup_drop_chance,
            death_effect: EffectKind::DeathExplosion,
            effect_needs_player_kill: true,
        },
        EnemyKind::Kamikaze => EnemyProfile {
            kind: kind.into(),
            max_health: tuning.kamikaze.max_health,
            points: tuning.kamikaze.points,
            perception_range: tuning.kamikaze.pursue_range,
            accepts_only: None,
            grants_slowmo: true,
            credit_any_source: false,
            drop_chance: tuning.kamikaze.pickup_drop_chance,
            death_effect: EffectKind::DeathExplosion,
            effect_needs_player_kill: false,
        },
        EnemyKind::Turret => EnemyProfile {
            kind: kind.into(),
            max_health: tuning.turret.max_health,
            points: tuning.turret.points,
            perception_range: tuning.turret.detection_range,
            accepts_only: Some(WeaponType::AntiTurret),
            grants_slowmo: false,
            credit_any_source: true,
            drop_chance: 0.0,
            death_effect: EffectKind::DeathExplosion,
            effect_needs_player_kill: false,
        },
    }
}
