//! The damage contract: anything that can be hurt and can die.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponType;

/// Result of applying damage to a [`Damageable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The damage was filtered out; health is unchanged.
    Ignored,
    /// Health dropped and the receiver is still alive.
    Wounded,
    /// This hit took health to zero or below.
    Killed,
}

impl DamageOutcome {
    pub fn died(self) -> bool {
        self == Self::Killed
    }
}

/// Capability to receive damage and report death.
pub trait Damageable {
    /// Apply `amount` damage classified as `weapon_type`.
    ///
    /// A receiver that is already dead ignores further damage, so `Killed`
    /// is reported at most once over its lifetime.
    fn damage(&mut self, amount: f32, weapon_type: WeaponType) -> DamageOutcome;

    fn current_health(&self) -> f32;

    fn max_health(&self) -> f32;

    fn is_alive(&self) -> bool {
        self.current_health() > 0.0
    }
}

/// Plain health pool. Negative overshoot is kept, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    current: f32,
    max: f32,
}

impl Vitals {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Restore health, clamped to the maximum. Dead receivers stay dead.
    pub fn heal(&mut self, amount: f32) {
        if self.current > 0.0 {
            self.current = (self.current + amount.max(0.0)).min(self.max);
        }
    }
}

impl Damageable for Vitals {
    fn damage(&mut self, amount: f32, _weapon_type: WeaponType) -> DamageOutcome {
        if self.current <= 0.0 {
            return DamageOutcome::Ignored;
        }
        self.current -= amount.max(0.0);
        if self.current <= 0.0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    fn current_health(&self) -> f32 {
        self.current
    }

    fn max_health(&self) -> f32 {
        self.max
    }
}

/// Health pool that only accepts one weapon classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmoredVitals {
    vitals: Vitals,
    accepts: WeaponType,
}

impl ArmoredVitals {
    pub fn new(max: f32, accepts: WeaponType) -> Self {
        Self {
            vitals: Vitals::new(max),
            accepts,
        }
    }

    pub fn accepts(&self) -> WeaponType {
        self.accepts
    }
}

impl Damageable for ArmoredVitals {
    fn damage(&mut self, amount: f32, weapon_type: WeaponType) -> DamageOutcome {
        if weapon_type != self.accepts {
            return DamageOutcome::Ignored;
        }
        self.vitals.damage(amount, weapon_type)
    }

    fn current_health(&self) -> f32 {
        self.vitals.current_health()
    }

    fn max_health(&self) -> f32 {
        self.vitals.max_health()
    }
}

/// ECS-facing damage component: the receiver variant chosen at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageReceiver {
    Standard(Vitals),
    Armored(ArmoredVitals),
}

impl DamageReceiver {
    pub fn standard(max: f32) -> Self {
        Self::Standard(Vitals::new(max))
    }

    pub fn armored(max: f32, accepts: WeaponType) -> Self {
        Self::Armored(ArmoredVitals::new(max, accepts))
    }

    /// Heal a standard receiver. Armored receivers cannot be healed.
    pub fn heal(&mut self, amount: f32) {
        if let Self::Standard(vitals) = self {
            vitals.heal(amount);
        }
    }

    fn inner(&self) -> &dyn Damageable {
        match self {
            Self::Standard(vitals) => vitals,
            Self::Armored(armored) => armored,
        }
    }
}

impl Damageable for DamageReceiver {
    fn damage(&mut self, amount: f32, weapon_type: WeaponType) -> DamageOutcome {
        match self {
            Self::Standard(vitals) => vitals.damage(amount, weapon_type),
            Self::Armored(armored) => armored.damage(amount, weapon_type),
        }
    }

    fn current_health(&self) -> f32 {
        self.inner().current_health()
    }

    fn max_health(&self) -> f32 {
        self.inner().max_health()
    }
}
