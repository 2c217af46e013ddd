//! Scripted input for headless runs against the demonstration arena.

use glam::{Vec2, Vec3};

use rogue_core::commands::PlayerCommand;
use rogue_sim::engine::axis_toward;

/// A command to send once `at` seconds of real time have passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedInput {
    pub at: f32,
    pub command: PlayerCommand,
}

impl ScriptedInput {
    fn new(at: f32, command: PlayerCommand) -> Self {
        Self { at, command }
    }
}

/// Engage the pursuer north of the spawn, tag it during the tactical
/// pause, then turn on the kamikaze and try the doors.
pub fn demo_script() -> Vec<ScriptedInput> {
    let pursuer = Vec3::new(0.0, 0.0, 22.0);
    let kamikaze = Vec3::new(-12.0, 0.0, 10.0);
    let door = Vec3::new(0.0, 0.0, -18.0);

    vec![
        ScriptedInput::new(0.0, PlayerCommand::StartRun),
        ScriptedInput::new(0.0, PlayerCommand::AimAt { point: pursuer }),
        ScriptedInput::new(0.2, PlayerCommand::FirePressed),
        ScriptedInput::new(
            0.5,
            PlayerCommand::Move {
                axis: axis_toward(Vec3::ZERO, pursuer),
            },
        ),
        ScriptedInput::new(2.0, PlayerCommand::Move { axis: Vec2::ZERO }),
        ScriptedInput::new(3.0, PlayerCommand::FireReleased),
        ScriptedInput::new(3.0, PlayerCommand::ToggleSlowmo),
        ScriptedInput::new(3.5, PlayerCommand::FirePressed),
        ScriptedInput::new(4.0, PlayerCommand::ToggleSlowmo),
        ScriptedInput::new(8.0, PlayerCommand::AimAt { point: kamikaze }),
        ScriptedInput::new(8.0, PlayerCommand::FirePressed),
        ScriptedInput::new(12.0, PlayerCommand::FireReleased),
        ScriptedInput::new(
            12.0,
            PlayerCommand::Move {
                axis: axis_toward(Vec3::ZERO, door),
            },
        ),
        ScriptedInput::new(14.0, PlayerCommand::Move { axis: Vec2::ZERO }),
        ScriptedInput::new(14.0, PlayerCommand::UnlockDoors),
    ]
}
