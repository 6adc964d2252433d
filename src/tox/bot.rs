//! Tox Echo Bot
//!
//! Main bot implementation that:
//! - Restores identity and contacts from the savedata file
//! - Joins the network through the configured bootstrap nodes
//! - Accepts every contact request
//! - Answers /ping and /id, echoes everything else
//! - Checkpoints savedata periodically and once more on shutdown
//!
//! Lifecycle: `Starting -> Running -> Stopping -> Stopped`.

use super::{
    bootstrap::BootstrapNode,
    handler::reply_for,
    proxy::ProxyConfig,
    shutdown::Shutdown,
    traits::*,
};
use crate::persistence::{load_savedata, save_savedata, SaveOutcome};
use futures::FutureExt;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default displayed name
pub const DEFAULT_NAME: &str = "go-tox-bot";

/// Default displayed status message
pub const DEFAULT_STATUS: &str = "echo bot";

/// Default time between periodic checkpoints
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted checkpoint interval
pub const MIN_SAVE_INTERVAL: Duration = Duration::from_secs(1);

/// Bot configuration
pub struct BotConfig {
    pub name: String,
    pub status_message: String,
    pub savedata_path: PathBuf,
    pub save_interval: Duration,
    pub bootstrap_nodes: Vec<BootstrapNode>,
    pub proxy: Option<ProxyConfig>,
}

impl BotConfig {
    /// Configuration with default name, status and save interval
    pub fn new(savedata_path: PathBuf, bootstrap_nodes: Vec<BootstrapNode>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            status_message: DEFAULT_STATUS.to_string(),
            savedata_path,
            save_interval: DEFAULT_SAVE_INTERVAL,
            bootstrap_nodes,
            proxy: None,
        }
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Starting => "starting",
            Phase::Running => "running",
            Phase::Stopping => "stopping",
            Phase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Tox echo bot
///
/// Owns the single engine instance. Every engine call happens on the thread
/// driving `run`, and checkpoints only happen between ticks.
pub struct ToxBot<E: ToxEngine> {
    engine: E,
    config: BotConfig,
    phase: Phase,
}

impl<E: ToxEngine> ToxBot<E> {
    /// Bring the bot up
    ///
    /// Loads savedata, constructs the engine through `open`, applies the
    /// profile and bootstraps against every configured node. Only engine
    /// construction can fail; profile and bootstrap problems are logged.
    pub fn start<F>(config: BotConfig, open: F) -> ToxResult<Self>
    where
        F: FnOnce(EngineOptions) -> ToxResult<E>,
    {
        debug!("phase: {}", Phase::Starting);

        let options = EngineOptions {
            savedata: load_savedata(&config.savedata_path),
            proxy: config.proxy.clone(),
        };
        if let Some(proxy) = &options.proxy {
            info!("routing all connections through {}", proxy);
        }

        let engine = open(options)?;

        let mut bot = Self {
            engine,
            config,
            phase: Phase::Starting,
        };

        bot.apply_profile();

        info!("Tox ID: {}", bot.engine.self_address());
        info!("Public Key: {}", bot.engine.self_public_key());

        bot.bootstrap_all();
        bot.set_phase(Phase::Running);

        Ok(bot)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!("phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn apply_profile(&mut self) {
        if let Err(e) = self.engine.set_name(&self.config.name) {
            warn!("failed to set name {:?}: {}", self.config.name, e);
        }
        if let Err(e) = self.engine.set_status_message(&self.config.status_message) {
            warn!(
                "failed to set status message {:?}: {}",
                self.config.status_message, e
            );
        }
    }

    /// Attempt every bootstrap node independently, returning how many succeeded
    pub fn bootstrap_all(&mut self) -> usize {
        let mut succeeded = 0;
        for node in &self.config.bootstrap_nodes {
            match self.engine.bootstrap(node) {
                Ok(()) => {
                    info!("bootstrapped {}", node);
                    succeeded += 1;
                }
                Err(e) => warn!("bootstrap failed {}: {}", node, e),
            }
        }

        if succeeded == 0 {
            warn!(
                "no bootstrap node accepted ({} tried); waiting for the network to find us",
                self.config.bootstrap_nodes.len()
            );
        } else {
            info!(
                "bootstrap requests sent to {}/{} nodes",
                succeeded,
                self.config.bootstrap_nodes.len()
            );
        }
        succeeded
    }

    /// Handle one inbound engine event
    pub fn dispatch(&mut self, event: ToxEvent) {
        match event {
            ToxEvent::FriendRequest {
                public_key,
                message,
            } => {
                info!("friend request from {} msg={:?}", public_key, message);
                match self.engine.friend_add_norequest(&public_key) {
                    Ok(friend) => info!("friend accepted: {}", friend),
                    Err(e) => warn!("accept failed: {}", e),
                }
            }
            ToxEvent::FriendMessage { friend, text } => {
                info!("msg from {}: {:?}", friend, text.trim());
                let reply = reply_for(&text, &self.engine.self_address());
                if let Err(e) = self.engine.friend_send_message(friend, &reply) {
                    warn!("reply to {} failed: {}", friend, e);
                }
            }
            ToxEvent::SelfConnection(ConnectionStatus::None) => {
                warn!("disconnected from the Tox network");
            }
            ToxEvent::SelfConnection(status) => {
                info!("connected to the Tox network via {}", status);
            }
        }
    }

    /// Write the current engine state to the savedata file
    pub fn checkpoint(&self) -> SaveOutcome {
        save_savedata(&self.config.savedata_path, &self.engine.savedata())
    }

    /// Run the cooperative loop until `shutdown` is triggered
    ///
    /// Each pass checks, in order: the shutdown flag, the checkpoint timer,
    /// and otherwise runs one engine tick followed by the engine-advised
    /// sleep. Neither check blocks.
    pub async fn run(&mut self, shutdown: &Shutdown) {
        let period = self.config.save_interval.max(MIN_SAVE_INTERVAL);
        let mut save_timer = interval_at(Instant::now() + period, period);
        save_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("bot started");

        loop {
            if shutdown.is_triggered() {
                break;
            }

            if save_timer.tick().now_or_never().is_some() {
                self.checkpoint();
                continue;
            }

            for event in self.engine.iterate() {
                self.dispatch(event);
            }
            tokio::time::sleep(self.engine.iteration_interval()).await;
        }
    }

    /// Final checkpoint, then release the engine
    pub fn stop(mut self) -> SaveOutcome {
        self.set_phase(Phase::Stopping);
        info!("shutting down");

        let outcome = self.checkpoint();

        let Self { engine, .. } = self;
        drop(engine);

        debug!("phase: {}", Phase::Stopped);
        info!("bot stopped");
        outcome
    }

    /// Run until shutdown, then stop
    pub async fn serve(mut self, shutdown: &Shutdown) -> SaveOutcome {
        self.run(shutdown).await;
        self.stop()
    }
}
