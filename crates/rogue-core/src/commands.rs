//! Player commands sent from the input layer to the simulation.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// All possible player inputs.
/// Serialized with a "type" tag for easy frontend consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Run control ---
    StartRun,
    Pause,
    Resume,

    // --- Movement and aim (held until changed) ---
    /// Movement axis on the ground plane: x = right, y = forward.
    Move { axis: Vec2 },
    /// Cursor position projected onto the ground plane.
    AimAt { point: Vec3 },

    // --- Edge-triggered buttons ---
    FirePressed,
    FireReleased,
    ToggleSlowmo,
    UnlockDoors,
}
