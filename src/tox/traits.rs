//! Tox Engine Trait Abstractions
//!
//! The protocol engine (key exchange, onion routing, NAT traversal, message
//! encryption) lives in libtoxcore. These types describe the narrow surface
//! the bot needs from it, so the lifecycle and dispatch logic can be driven
//! by `MockToxEngine` in tests.

use super::bootstrap::BootstrapNode;
use super::proxy::ProxyConfig;
use std::fmt;
use std::time::Duration;

/// Size of a Tox public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a Tox address (public key + nospam + checksum) in bytes
pub const ADDRESS_SIZE: usize = 38;

/// Long-term public key of a Tox peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Decode a public key from hex, requiring exactly 32 bytes
    pub fn from_hex(s: &str) -> ToxResult<Self> {
        let bytes = hex::decode(s).map_err(|e| ToxError::InvalidKey(format!("{s:?}: {e}")))?;
        let key: [u8; PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            ToxError::InvalidKey(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_SIZE,
                b.len()
            ))
        })?;
        Ok(Self(key))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// Engine-assigned handle for an accepted contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FriendNumber(pub u32);

impl fmt::Display for FriendNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the bot is currently attached to the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    None,
    Tcp,
    Udp,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::None => "none",
            ConnectionStatus::Tcp => "tcp",
            ConnectionStatus::Udp => "udp",
        };
        f.write_str(s)
    }
}

/// Inbound event produced by one engine tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToxEvent {
    /// Someone asked to become a contact
    FriendRequest {
        public_key: PublicKey,
        message: String,
    },
    /// A contact sent a normal text message
    FriendMessage { friend: FriendNumber, text: String },
    /// Our own network connection changed
    SelfConnection(ConnectionStatus),
}

/// Options handed to the engine factory at construction time
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Previously saved identity and contacts, if any
    pub savedata: Option<Vec<u8>>,
    /// SOCKS5 proxy applied to every engine connection
    pub proxy: Option<ProxyConfig>,
}

/// Result type for engine operations
pub type ToxResult<T> = Result<T, ToxError>;

/// Engine errors
#[derive(Debug, thiserror::Error)]
pub enum ToxError {
    #[error("Engine construction failed: {0}")]
    Construction(String),

    #[error("Bootstrap via {host}:{port} failed: {reason}")]
    Bootstrap {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    #[error("Friend add failed: {0}")]
    FriendAdd(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Profile update failed: {0}")]
    Profile(String),

    #[error("toxcore support not compiled in (rebuild with --features toxcore)")]
    Unavailable,
}

/// The protocol engine as seen by the bot
///
/// One instance is owned by `ToxBot` and touched only from the loop thread.
/// Implementations are synchronous: every call maps onto a single
/// non-blocking (or briefly blocking) call into the native library.
pub trait ToxEngine {
    /// Full Tox ID (uppercase hex), the string contacts add
    fn self_address(&self) -> String;

    /// Our long-term public key
    fn self_public_key(&self) -> PublicKey;

    /// Set the displayed name
    fn set_name(&mut self, name: &str) -> ToxResult<()>;

    /// Set the displayed status message
    fn set_status_message(&mut self, status: &str) -> ToxResult<()>;

    /// Send a bootstrap request to one introducer node
    fn bootstrap(&mut self, node: &BootstrapNode) -> ToxResult<()>;

    /// Accept a contact without sending a request back
    fn friend_add_norequest(&mut self, public_key: &PublicKey) -> ToxResult<FriendNumber>;

    /// Queue a normal text message, returning the engine's message id
    fn friend_send_message(&mut self, friend: FriendNumber, text: &str) -> ToxResult<u32>;

    /// Advance the engine by one tick, returning the events it produced
    fn iterate(&mut self) -> Vec<ToxEvent>;

    /// How long to sleep before the next tick
    fn iteration_interval(&self) -> Duration;

    /// Serialize identity and contacts
    fn savedata(&self) -> Vec<u8>;
}
