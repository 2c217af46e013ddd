//! Tuning configuration loaded from JSON.
//!
//! Every section falls back to the values in [`crate::constants`], so a
//! config file only needs the fields it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::TimeBase;

/// Errors raised while loading or validating tuning.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionTuning {
    pub check_delay: f32,
    pub clock: TimeBase,
}

impl Default for PerceptionTuning {
    fn default() -> Self {
        Self {
            check_delay: PERCEPTION_CHECK_DELAY,
            clock: TimeBase::Scaled,
        }
    }
}

/// Charge-and-burst weapon parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeWeaponTuning {
    pub range: f32,
    pub damage: f32,
    pub charge_time: f32,
    pub warning_time: f32,
    pub trail_speed: f32,
    pub trail_fade_out: f32,
}

impl Default for ChargeWeaponTuning {
    fn default() -> Self {
        Self {
            range: CHARGE_WEAPON_RANGE,
            damage: CHARGE_WEAPON_DAMAGE,
            charge_time: CHARGE_WEAPON_CHARGE_TIME,
            warning_time: CHARGE_WEAPON_WARNING_TIME,
            trail_speed: CHARGE_WEAPON_TRAIL_SPEED,
            trail_fade_out: CHARGE_WEAPON_TRAIL_FADE,
        }
    }
}

/// Continuous beam parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamWeaponTuning {
    pub range: f32,
    pub damage: f32,
    pub damage_period: f32,
    /// Clock driving the damage tick.
    pub clock: TimeBase,
}

impl Default for BeamWeaponTuning {
    fn default() -> Self {
        Self {
            range: BEAM_WEAPON_RANGE,
            damage: BEAM_WEAPON_DAMAGE,
            damage_period: BEAM_WEAPON_DAMAGE_PERIOD,
            clock: TimeBase::Unscaled,
        }
    }
}

/// Rapid-fire-with-windup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapidFireTuning {
    pub range: f32,
    pub damage: f32,
    pub windup_time: f32,
    pub fire_rate: f32,
    pub trail_speed: f32,
    pub trail_fade_out: f32,
}

impl Default for RapidFireTuning {
    fn default() -> Self {
        Self {
            range: RAPID_WEAPON_RANGE,
            damage: RAPID_WEAPON_DAMAGE,
            windup_time: RAPID_WEAPON_WINDUP,
            fire_rate: RAPID_WEAPON_FIRE_RATE,
            trail_speed: RAPID_WEAPON_TRAIL_SPEED,
            trail_fade_out: RAPID_WEAPON_TRAIL_FADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerTuning {
    pub max_health: f32,
    pub points: u32,
    pub pursue_range: f32,
    pub firing_range: f32,
    pub rotation_interpolation: f32,
    pub move_speed: f32,
    pub pickup_drop_chance: f32,
    pub weapon: ChargeWeaponTuning,
}

impl Default for PursuerTuning {
    fn default() -> Self {
        Self {
            max_health: PURSUER_MAX_HEALTH,
            points: PURSUER_POINTS,
            pursue_range: PURSUER_PURSUE_RANGE,
            firing_range: PURSUER_FIRING_RANGE,
            rotation_interpolation: PURSUER_ROTATION_INTERPOLATION,
            move_speed: PURSUER_MOVE_SPEED,
            pickup_drop_chance: PURSUER_DROP_CHANCE,
            weapon: ChargeWeaponTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KamikazeTuning {
    pub max_health: f32,
    pub points: u32,
    pub pursue_range: f32,
    pub to_explode_range: f32,
    pub get_out_range: f32,
    pub exploding_duration: f32,
    pub explosion_range: f32,
    pub min_damage: f32,
    pub max_damage: f32,
    pub move_speed: f32,
    pub pickup_drop_chance: f32,
}

impl Default for KamikazeTuning {
    fn default() -> Self {
        Self {
            max_health: KAMIKAZE_MAX_HEALTH,
            points: KAMIKAZE_POINTS,
            pursue_range: KAMIKAZE_PURSUE_RANGE,
            to_explode_range: KAMIKAZE_TO_EXPLODE_RANGE,
            get_out_range: KAMIKAZE_GET_OUT_RANGE,
            exploding_duration: KAMIKAZE_EXPLODING_DURATION,
            explosion_range: KAMIKAZE_EXPLOSION_RANGE,
            min_damage: KAMIKAZE_MIN_DAMAGE,
            max_damage: KAMIKAZE_MAX_DAMAGE,
            move_speed: KAMIKAZE_MOVE_SPEED,
            pickup_drop_chance: KAMIKAZE_DROP_CHANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTuning {
    pub max_health: f32,
    pub points: u32,
    pub detection_range: f32,
    pub turn_speed: f32,
    pub weapon: RapidFireTuning,
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            max_health: TURRET_MAX_HEALTH,
            points: TURRET_POINTS,
            detection_range: TURRET_DETECTION_RANGE,
            turn_speed: TURRET_TURN_SPEED,
            weapon: RapidFireTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub move_speed: f32,
    pub regen_start_delay: f32,
    pub regen_amount: f32,
    pub unlock_radius: f32,
    pub weapon: BeamWeaponTuning,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            move_speed: PLAYER_MOVE_SPEED,
            regen_start_delay: PLAYER_REGEN_START_DELAY,
            regen_amount: PLAYER_REGEN_AMOUNT,
            unlock_radius: PLAYER_UNLOCK_RADIUS,
            weapon: BeamWeaponTuning::default(),
        }
    }
}

/// Tactical pause parameters. Durations are real seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowmoTuning {
    pub max_tags: usize,
    pub tag_visible_duration: f32,
    pub time_scale: f32,
    pub enter_duration: f32,
    pub exit_duration: f32,
    pub marking_distance: f32,
    pub max_duration: f32,
    pub gain_per_kill: f32,
    pub duration_warning: f32,
}

impl Default for SlowmoTuning {
    fn default() -> Self {
        Self {
            max_tags: SLOWMO_MAX_TAGS,
            tag_visible_duration: SLOWMO_TAG_VISIBLE_DURATION,
            time_scale: SLOWMO_TIME_SCALE,
            enter_duration: SLOWMO_ENTER_DURATION,
            exit_duration: SLOWMO_EXIT_DURATION,
            marking_distance: SLOWMO_MARKING_DISTANCE,
            max_duration: SLOWMO_MAX_DURATION,
            gain_per_kill: SLOWMO_GAIN_PER_KILL,
            duration_warning: SLOWMO_DURATION_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub health_restore: f32,
    pub data_card_score: u32,
    pub goal_requirements: u32,
    pub pickup_radius: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            health_restore: HEALTH_PICKUP_RESTORE,
            data_card_score: DATA_CARD_SCORE,
            goal_requirements: GOAL_REQUIREMENTS,
            pickup_radius: PICKUP_RADIUS,
        }
    }
}

/// Lifetimes handed to the presentation layer with each effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub death_explosion_lifetime: f32,
    pub kamikaze_explosion_lifetime: f32,
    pub player_death_lifetime: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            death_explosion_lifetime: DEATH_EXPLOSION_LIFETIME,
            kamikaze_explosion_lifetime: KAMIKAZE_EXPLOSION_LIFETIME,
            player_death_lifetime: PLAYER_DEATH_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    pub fixed_delta: f32,
    pub max_fixed_steps: u32,
    /// Whether `UseGlobal` queries report trigger colliders.
    pub queries_hit_triggers: bool,
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            fixed_delta: FIXED_DELTA,
            max_fixed_steps: MAX_FIXED_STEPS,
            queries_hit_triggers: true,
        }
    }
}

/// All tunable parameters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub perception: PerceptionTuning,
    pub pursuer: PursuerTuning,
    pub kamikaze: KamikazeTuning,
    pub turret: TurretTuning,
    pub player: PlayerTuning,
    pub slowmo: SlowmoTuning,
    pub pickups: PickupTuning,
    pub effects: EffectTuning,
    pub simulation: SimulationTuning,
}

impl TuningConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TuningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        positive("perception.check_delay", self.perception.check_delay)?;

        positive("pursuer.max_health", self.pursuer.max_health)?;
        positive("pursuer.pursue_range", self.pursuer.pursue_range)?;
        positive("pursuer.firing_range", self.pursuer.firing_range)?;
        unit_interval("pursuer.rotation_interpolation", self.pursuer.rotation_interpolation)?;
        unit_interval("pursuer.pickup_drop_chance", self.pursuer.pickup_drop_chance)?;
        positive("pursuer.weapon.range", self.pursuer.weapon.range)?;
        positive("pursuer.weapon.charge_time", self.pursuer.weapon.charge_time)?;

        let kamikaze = &self.kamikaze;
        positive("kamikaze.max_health", kamikaze.max_health)?;
        positive("kamikaze.pursue_range", kamikaze.pursue_range)?;
        positive("kamikaze.to_explode_range", kamikaze.to_explode_range)?;
        positive("kamikaze.explosion_range", kamikaze.explosion_range)?;
        positive("kamikaze.exploding_duration", kamikaze.exploding_duration)?;
        unit_interval("kamikaze.pickup_drop_chance", kamikaze.pickup_drop_chance)?;
        if kamikaze.get_out_range < kamikaze.to_explode_range {
            return Err(ConfigError::Invalid {
                field: "kamikaze.get_out_range",
                reason: format!(
                    "{} is smaller than to_explode_range {}",
                    kamikaze.get_out_range, kamikaze.to_explode_range
                ),
            });
        }

        positive("turret.max_health", self.turret.max_health)?;
        positive("turret.detection_range", self.turret.detection_range)?;
        positive("turret.turn_speed", self.turret.turn_speed)?;
        positive("turret.weapon.range", self.turret.weapon.range)?;
        positive("turret.weapon.fire_rate", self.turret.weapon.fire_rate)?;

        positive("player.max_health", self.player.max_health)?;
        positive("player.weapon.range", self.player.weapon.range)?;
        positive("player.weapon.damage_period", self.player.weapon.damage_period)?;

        let slowmo = &self.slowmo;
        if slowmo.max_tags == 0 {
            return Err(ConfigError::Invalid {
                field: "slowmo.max_tags",
                reason: "at least one tag is required".into(),
            });
        }
        if !(slowmo.time_scale > 0.0 && slowmo.time_scale <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "slowmo.time_scale",
                reason: format!("{} is outside (0, 1]", slowmo.time_scale),
            });
        }
        positive("slowmo.max_duration", slowmo.max_duration)?;
        positive("slowmo.tag_visible_duration", slowmo.tag_visible_duration)?;
        positive("slowmo.marking_distance", slowmo.marking_distance)?;

        positive("pickups.pickup_radius", self.pickups.pickup_radius)?;
        positive("simulation.fixed_delta", self.simulation.fixed_delta)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}
