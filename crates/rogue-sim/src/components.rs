//! Components that reference other entities.

use hecs::Entity;

use rogue_core::enums::{EffectKind, PickupKind};

/// The entity an enemy controller is hunting. `None` forces the controller
/// idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target(pub Option<Entity>);

/// Side effects of an enemy's death.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathReward {
    pub points: u32,
    /// Credit score and kill count regardless of who dealt the final blow.
    pub credit_any_source: bool,
    /// A player kill restores tactical pause budget.
    pub grants_slowmo: bool,
    pub drop: Option<PickupDrop>,
    /// Goal that gains one fulfilled requirement on death.
    pub objective: Option<Entity>,
    pub effect: EffectKind,
    /// Skip the effect unless the player dealt the final blow.
    pub effect_needs_player_kill: bool,
    pub effect_lifetime: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupDrop {
    pub kind: PickupKind,
    /// Probability in `[0, 1]`.
    pub chance: f32,
}
