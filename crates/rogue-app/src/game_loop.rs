//! Game loop thread: steps the simulation engine in real time and publishes
//! snapshots.
//!
//! The engine is created inside this thread because it's cleaner for
//! ownership (its observer list is not `Send`). Commands arrive via an
//! `mpsc` channel; the latest snapshot is stored in shared state for
//! polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use rogue_core::events::SimEvent;
use rogue_core::state::SimSnapshot;
use rogue_sim::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Longest real frame the loop will feed the engine; anything slower is
/// treated as a hitch.
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Nominal duration of one frame at `fps`.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    fps: u32,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("rogue-game-loop".into())
        .spawn(move || {
            run_game_loop(config, fps, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    fps: u32,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) {
    let seed = config.seed;
    let mut engine = SimulationEngine::new(config);
    engine.subscribe(log_event);
    info!(seed, fps, "game loop started");

    let frame = frame_duration(fps);
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame + frame;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(frames = engine.clock().frame, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the real time since the last frame
        let now = Instant::now();
        let real_dt = (now - last_frame).min(MAX_FRAME);
        last_frame = now;
        let snapshot = engine.step(real_dt.as_secs_f32());

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next frame
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
            next_frame_time += frame;
        } else {
            // Too far behind; resync instead of catching up
            next_frame_time = now + frame;
        }
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::Killed { .. } | SimEvent::PlayerDied | SimEvent::RunWon => {
            info!(?event, "sim event");
        }
        _ => debug!(?event, "sim event"),
    }
}
