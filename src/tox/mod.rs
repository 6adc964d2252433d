//! Tox Network Integration Module
//!
//! Wraps the external protocol engine (libtoxcore) behind `ToxEngine` and
//! implements the bot on top of it:
//! - Bootstrap node list parsing with built-in fallback
//! - Auto-accept of contact requests
//! - /ping, /id and echo replies
//! - Periodic and shutdown checkpoints of the engine's savedata

pub mod bootstrap;
pub mod bot;
#[cfg(feature = "toxcore")]
pub mod ffi;
pub mod handler;
pub mod mock;
pub mod proxy;
pub mod shutdown;
mod sys;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use bootstrap::{default_bootstrap_nodes, resolve_bootstrap_nodes, BootstrapNode};
pub use bot::{BotConfig, Phase, ToxBot};
#[cfg(feature = "toxcore")]
pub use ffi::ToxCore;
pub use mock::MockToxEngine;
pub use proxy::{parse_proxy, ProxyConfig};
pub use shutdown::Shutdown;
pub use traits::{
    ConnectionStatus, EngineOptions, FriendNumber, PublicKey, ToxEngine, ToxError, ToxEvent,
    ToxResult,
};
