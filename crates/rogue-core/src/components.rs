//! ECS component definitions. Plain data, no methods beyond constructors.
//!
//! Components that reference other entities live in the sim crate, which
//! owns the ECS world.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{KamikazeTuning, PursuerTuning, TurretTuning};
use crate::enums::{AgentKind, KamikazeState, PickupKind, PursuerState, TurretState};
use crate::layers::Layer;

/// Stable identity for actors. Ids are assigned in spawn order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub kind: AgentKind,
}

/// Marker: the entity is the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Position and horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Unit vector on the XZ plane.
    pub forward: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::Z,
        }
    }
}

/// Collision volume, centered on the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Axis-aligned box.
    Box { half_extents: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub layer: Layer,
    pub is_trigger: bool,
}

impl Collider {
    pub fn sphere(radius: f32, layer: Layer) -> Self {
        Self {
            shape: Shape::Sphere { radius },
            layer,
            is_trigger: false,
        }
    }

    pub fn cuboid(half_extents: Vec3, layer: Layer) -> Self {
        Self {
            shape: Shape::Box { half_extents },
            layer,
            is_trigger: false,
        }
    }
}

/// Straight-line navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Disabled agents do not move at all.
    pub enabled: bool,
    /// Stopped agents keep their destination but hold position.
    pub stopped: bool,
    pub speed: f32,
    pub stopping_distance: f32,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            enabled: true,
            stopped: false,
            speed,
            stopping_distance: 0.0,
        }
    }
}

/// Delayed health regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regeneration {
    pub start_delay: f32,
    /// Seconds until regeneration resumes.
    pub remaining_delay: f32,
    /// Health per second.
    pub rate: f32,
}

/// Per-frame movement intent, applied in the fixed sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMotion {
    /// Velocity to integrate.
    pub movement: Vec3,
    pub desired_forward: Vec3,
    pub move_speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PursuerBrain {
    pub state: PursuerState,
    pub tuning: PursuerTuning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KamikazeBrain {
    pub state: KamikazeState,
    pub fuse_remaining: f32,
    pub tuning: KamikazeTuning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurretBrain {
    pub state: TurretState,
    pub tuning: TurretTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub radius: f32,
}

/// Objective that activates after enough linked requirements are fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub requirements_left: u32,
    pub activated: bool,
}

impl Goal {
    pub fn new(requirements: u32) -> Self {
        Self {
            requirements_left: requirements,
            activated: requirements == 0,
        }
    }

    /// Fulfil one requirement. Returns true when this call activated the goal.
    pub fn fulfill_requirement(&mut self) -> bool {
        if self.activated {
            return false;
        }
        self.requirements_left = self.requirements_left.saturating_sub(1);
        self.activated = self.requirements_left == 0;
        self.activated
    }
}
