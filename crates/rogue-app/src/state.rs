//! Application state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Result};

use rogue_core::commands::PlayerCommand;
use rogue_core::state::SimSnapshot;
use rogue_sim::SimConfig;

use crate::game_loop;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles to a running game loop.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`; the
/// latest snapshot is shared with the loop thread through `Arc<Mutex<..>>`.
pub struct AppState {
    /// `None` until [`AppState::start`] has been called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each frame.
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    loop_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.loop_thread
            .lock()
            .map(|thread| thread.is_some())
            .unwrap_or(false)
    }

    /// Spawn the game loop thread. Fails if one is already running.
    pub fn start(&self, config: SimConfig, fps: u32) -> Result<()> {
        let mut thread = self.loop_thread.lock().map_err(|e| anyhow!("{e}"))?;
        if thread.is_some() {
            bail!("simulation already running");
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(config, fps, Arc::clone(&self.latest_snapshot))?;

        let mut tx_lock = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?;
        *tx_lock = Some(cmd_tx);
        *thread = Some(handle);
        Ok(())
    }

    /// Forward a player command to the simulation.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        let tx_lock = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => bail!("simulation not started"),
        }
    }

    /// The most recent snapshot, if any frame has run.
    pub fn latest(&self) -> Result<Option<SimSnapshot>> {
        let lock = self.latest_snapshot.lock().map_err(|e| anyhow!("{e}"))?;
        Ok(lock.clone())
    }

    /// Stop the loop, wait for the thread and return the final snapshot.
    pub fn shutdown(&self) -> Result<Option<SimSnapshot>> {
        if let Some(tx) = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?.take() {
            // A loop that already exited has dropped its receiver.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        let handle = self.loop_thread.lock().map_err(|e| anyhow!("{e}"))?.take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| anyhow!("game loop thread panicked"))?;
        }
        self.latest()
    }
}
