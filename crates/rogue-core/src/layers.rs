//! Collision layers and layer-mask sets.
//!
//! Every collider sits on exactly one [`Layer`]. Queries and weapons filter
//! with a [`LayerMask`]: "can this ray hit / damage / mark that collider"
//! is always `mask.contains(layer)`.

use serde::{Deserialize, Serialize};

/// A single collision layer, `0..32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

impl Layer {
    pub const COUNT: u8 = 32;

    pub const DEFAULT: Layer = Layer(0);
    pub const PLAYER: Layer = Layer(8);
    pub const ENEMY: Layer = Layer(9);
    pub const TURRET: Layer = Layer(10);
    pub const ENVIRONMENT: Layer = Layer(11);
    pub const DOOR: Layer = Layer(12);

    /// Layer by index, `None` when out of range.
    pub const fn new(index: u8) -> Option<Layer> {
        if index < Self::COUNT {
            Some(Layer(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Single-bit mask for this layer.
    pub const fn bit(self) -> u32 {
        1u32 << (self.0 as u32)
    }

    /// Human-readable name for the named layers.
    pub fn name(self) -> &'static str {
        match self {
            Self::DEFAULT => "default",
            Self::PLAYER => "player",
            Self::ENEMY => "enemy",
            Self::TURRET => "turret",
            Self::ENVIRONMENT => "environment",
            Self::DOOR => "door",
            _ => "unnamed",
        }
    }
}

impl TryFrom<u8> for Layer {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Layer::new(index).ok_or_else(|| format!("layer index {index} out of range"))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> u8 {
        layer.0
    }
}

/// A set of layers stored as a 32-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const EMPTY: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask containing only `layer`.
    pub const fn of(layer: Layer) -> Self {
        Self(layer.bit())
    }

    /// Mask containing all of `layers`.
    pub fn from_layers(layers: &[Layer]) -> Self {
        layers.iter().fold(Self::EMPTY, |mask, &layer| mask.with(layer))
    }

    pub const fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.bit())
    }

    pub const fn without(self, layer: Layer) -> Self {
        Self(self.0 & !layer.bit())
    }

    /// Membership test. Total over every [`Layer`].
    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub const fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: LayerMask) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn is_subset_of(self, other: LayerMask) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the member layers in ascending order.
    pub fn layers(self) -> impl Iterator<Item = Layer> {
        (0..Layer::COUNT)
            .map(Layer)
            .filter(move |&layer| self.contains(layer))
    }
}

/// What actor weapons and perception rays collide with.
pub const ACTOR_SIGHT_LAYERS: LayerMask = LayerMask::of(Layer::PLAYER)
    .with(Layer::ENVIRONMENT)
    .with(Layer::DOOR);

/// What the player's weapon collides with.
pub const PLAYER_WEAPON_LAYERS: LayerMask = LayerMask::of(Layer::ENEMY)
    .with(Layer::TURRET)
    .with(Layer::ENVIRONMENT)
    .with(Layer::DOOR);

/// Layers the player's weapon damages.
pub const PLAYER_DAMAGE_LAYERS: LayerMask = LayerMask::of(Layer::ENEMY).with(Layer::TURRET);

/// Layers enemy weapons damage.
pub const ENEMY_DAMAGE_LAYERS: LayerMask = LayerMask::of(Layer::PLAYER);

/// Layers the tactical pause may mark.
pub const MARKABLE_LAYERS: LayerMask = LayerMask::of(Layer::ENEMY).with(Layer::TURRET);
