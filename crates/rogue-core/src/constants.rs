//! Default tuning values and fixed simulation constants.
//!
//! Everything here can be overridden through [`crate::config::TuningConfig`]
//! except the collider sizes.

// --- Simulation loop ---

/// Physics sub-step length at normal time scale (seconds).
pub const FIXED_DELTA: f32 = 0.02;

/// Upper bound on physics sub-steps per frame.
pub const MAX_FIXED_STEPS: u32 = 8;

// --- Perception ---

/// Seconds between throttled line-of-sight checks.
pub const PERCEPTION_CHECK_DELAY: f32 = 0.25;

// --- Pursue-and-fire enemy ---

pub const PURSUER_MAX_HEALTH: f32 = 100.0;
pub const PURSUER_POINTS: u32 = 50;
pub const PURSUER_PURSUE_RANGE: f32 = 25.0;
pub const PURSUER_FIRING_RANGE: f32 = 15.0;
/// Fraction of the remaining turn applied per physics step while firing.
pub const PURSUER_ROTATION_INTERPOLATION: f32 = 0.8;
pub const PURSUER_MOVE_SPEED: f32 = 3.5;
pub const PURSUER_DROP_CHANCE: f32 = 0.25;

// --- Charge-and-burst weapon ---

pub const CHARGE_WEAPON_RANGE: f32 = 25.0;
pub const CHARGE_WEAPON_DAMAGE: f32 = 25.0;
pub const CHARGE_WEAPON_CHARGE_TIME: f32 = 5.0;
/// Remaining charge at which the about-to-fire indicator turns on.
pub const CHARGE_WEAPON_WARNING_TIME: f32 = 1.0;
pub const CHARGE_WEAPON_TRAIL_SPEED: f32 = 80.0;
pub const CHARGE_WEAPON_TRAIL_FADE: f32 = 2.0;

// --- Kamikaze enemy ---

pub const KAMIKAZE_MAX_HEALTH: f32 = 100.0;
pub const KAMIKAZE_POINTS: u32 = 25;
pub const KAMIKAZE_PURSUE_RANGE: f32 = 12.0;
pub const KAMIKAZE_TO_EXPLODE_RANGE: f32 = 3.0;
pub const KAMIKAZE_GET_OUT_RANGE: f32 = 5.0;
/// Fuse length once the charge-up begins (seconds).
pub const KAMIKAZE_EXPLODING_DURATION: f32 = 2.5;
pub const KAMIKAZE_EXPLOSION_RANGE: f32 = 5.0;
pub const KAMIKAZE_MIN_DAMAGE: f32 = 10.0;
pub const KAMIKAZE_MAX_DAMAGE: f32 = 40.0;
pub const KAMIKAZE_MOVE_SPEED: f32 = 3.5;
pub const KAMIKAZE_DROP_CHANCE: f32 = 0.25;

// --- Turret ---

pub const TURRET_MAX_HEALTH: f32 = 80.0;
pub const TURRET_POINTS: u32 = 250;
pub const TURRET_DETECTION_RANGE: f32 = 15.0;
/// Head turn rate (radians per second).
pub const TURRET_TURN_SPEED: f32 = 1.0;

// --- Rapid-fire weapon ---

pub const RAPID_WEAPON_RANGE: f32 = 15.0;
pub const RAPID_WEAPON_DAMAGE: f32 = 2.0;
pub const RAPID_WEAPON_WINDUP: f32 = 1.0;
/// Shots per second once wound up.
pub const RAPID_WEAPON_FIRE_RATE: f32 = 5.0;
pub const RAPID_WEAPON_TRAIL_SPEED: f32 = 80.0;
pub const RAPID_WEAPON_TRAIL_FADE: f32 = 0.8;

// --- Player ---

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_MOVE_SPEED: f32 = 6.0;
/// Seconds without damage before regeneration starts.
pub const PLAYER_REGEN_START_DELAY: f32 = 10.0;
/// Health regenerated per second.
pub const PLAYER_REGEN_AMOUNT: f32 = 5.0;
pub const PLAYER_UNLOCK_RADIUS: f32 = 1.5;

// --- Beam weapon ---

pub const BEAM_WEAPON_RANGE: f32 = 18.0;
pub const BEAM_WEAPON_DAMAGE: f32 = 5.0;
/// Seconds between damage ticks while the beam stays on target.
pub const BEAM_WEAPON_DAMAGE_PERIOD: f32 = 0.1;

// --- Tactical pause ---

pub const SLOWMO_MAX_TAGS: usize = 5;
/// Real seconds each tag is presented while executing.
pub const SLOWMO_TAG_VISIBLE_DURATION: f32 = 1.0;
pub const SLOWMO_TIME_SCALE: f32 = 0.25;
/// Real seconds to interpolate into dilated time.
pub const SLOWMO_ENTER_DURATION: f32 = 0.5;
/// Real seconds to interpolate back to normal time.
pub const SLOWMO_EXIT_DURATION: f32 = 0.25;
pub const SLOWMO_MARKING_DISTANCE: f32 = 30.0;
pub const SLOWMO_MAX_DURATION: f32 = 10.0;
/// Budget restored per confirmed kill.
pub const SLOWMO_GAIN_PER_KILL: f32 = 1.0;
/// Remaining budget at which the warning clock starts.
pub const SLOWMO_DURATION_WARNING: f32 = 5.0;

// --- Pickups ---

pub const HEALTH_PICKUP_RESTORE: f32 = 10.0;
pub const DATA_CARD_SCORE: u32 = 150;
/// Turret kills needed to activate the goal.
pub const GOAL_REQUIREMENTS: u32 = 2;
pub const PICKUP_RADIUS: f32 = 1.0;

// --- Effects ---

pub const DEATH_EXPLOSION_LIFETIME: f32 = 2.0;
pub const KAMIKAZE_EXPLOSION_LIFETIME: f32 = 2.0;
pub const PLAYER_DEATH_LIFETIME: f32 = 3.0;

// --- Colliders ---

pub const PLAYER_COLLIDER_RADIUS: f32 = 0.5;
pub const ENEMY_COLLIDER_RADIUS: f32 = 0.5;
pub const TURRET_COLLIDER_RADIUS: f32 = 0.7;
