//! Mock Tox Engine for Testing
//!
//! Provides MockToxEngine so the bot lifecycle can be exercised without
//! libtoxcore or a network. Events are injected by hand and returned from
//! the next `iterate()` call.

use super::bootstrap::BootstrapNode;
use super::shutdown::Shutdown;
use super::traits::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Savedata a fresh mock identity reports
pub const FRESH_SAVEDATA: &[u8] = b"mock-fresh-identity";

/// Mock Tox engine for testing
///
/// Clones share state, so a test keeps one handle for assertions while the
/// bot owns another.
#[derive(Clone)]
pub struct MockToxEngine {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    address: String,
    public_key: PublicKey,
    name: Option<String>,
    status_message: Option<String>,
    options: Option<EngineOptions>,
    fail_construction: bool,
    bootstrapped: Vec<BootstrapNode>,
    failing_hosts: HashSet<String>,
    friends: Vec<PublicKey>,
    fail_friend_add: bool,
    sent_messages: Vec<SentMessage>,
    fail_send: bool,
    next_message_id: u32,
    incoming_events: Vec<ToxEvent>,
    iterations: u64,
    shutdown_after: Option<(u64, Shutdown)>,
    interval: Duration,
    savedata: Vec<u8>,
    savedata_calls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub friend: FriendNumber,
    pub text: String,
}

impl MockToxEngine {
    /// Create new mock engine with a fixed identity
    pub fn new(public_key: PublicKey) -> Self {
        let address = format!("{}{}", public_key, "DEADBEEF1234");
        Self {
            state: Arc::new(Mutex::new(MockState {
                address,
                public_key,
                name: None,
                status_message: None,
                options: None,
                fail_construction: false,
                bootstrapped: Vec::new(),
                failing_hosts: HashSet::new(),
                friends: Vec::new(),
                fail_friend_add: false,
                sent_messages: Vec::new(),
                fail_send: false,
                next_message_id: 1,
                incoming_events: Vec::new(),
                iterations: 0,
                shutdown_after: None,
                interval: Duration::from_millis(50),
                savedata: FRESH_SAVEDATA.to_vec(),
                savedata_calls: 0,
            })),
        }
    }

    /// Engine factory recording the options it was opened with
    ///
    /// Restored savedata replaces the fresh identity, as the real engine does.
    pub fn open(&self, options: EngineOptions) -> ToxResult<Self> {
        let mut state = self.state.lock().unwrap();
        if state.fail_construction {
            return Err(ToxError::Construction("mock construction failure".to_string()));
        }
        if let Some(data) = &options.savedata {
            state.savedata = data.clone();
        }
        state.options = Some(options);
        drop(state);
        Ok(self.clone())
    }

    /// Make `open` fail
    pub fn fail_construction(&self) {
        self.state.lock().unwrap().fail_construction = true;
    }

    /// Make bootstrap against `host` fail
    pub fn fail_bootstrap_for(&self, host: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_hosts
            .insert(host.to_string());
    }

    /// Make friend_add_norequest fail
    pub fn fail_friend_add(&self) {
        self.state.lock().unwrap().fail_friend_add = true;
    }

    /// Make friend_send_message fail
    pub fn fail_send(&self) {
        self.state.lock().unwrap().fail_send = true;
    }

    /// Queue an event for the next iterate()
    pub fn push_event(&self, event: ToxEvent) {
        self.state.lock().unwrap().incoming_events.push(event);
    }

    /// Trigger `shutdown` during the given iterate() call (1-based)
    pub fn shutdown_after(&self, iterations: u64, shutdown: Shutdown) {
        self.state.lock().unwrap().shutdown_after = Some((iterations, shutdown));
    }

    pub fn set_iteration_interval(&self, interval: Duration) {
        self.state.lock().unwrap().interval = interval;
    }

    pub fn set_savedata(&self, data: Vec<u8>) {
        self.state.lock().unwrap().savedata = data;
    }

    /// Options passed to `open`, if it was called
    pub fn options(&self) -> Option<EngineOptions> {
        self.state.lock().unwrap().options.clone()
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().unwrap().name.clone()
    }

    pub fn status_message(&self) -> Option<String> {
        self.state.lock().unwrap().status_message.clone()
    }

    /// Nodes bootstrap was attempted against, in call order
    pub fn bootstrapped(&self) -> Vec<BootstrapNode> {
        self.state.lock().unwrap().bootstrapped.clone()
    }

    pub fn friends(&self) -> Vec<PublicKey> {
        self.state.lock().unwrap().friends.clone()
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent_messages.clone()
    }

    pub fn iterations(&self) -> u64 {
        self.state.lock().unwrap().iterations
    }

    /// How many times savedata() was called (one per checkpoint)
    pub fn savedata_calls(&self) -> usize {
        self.state.lock().unwrap().savedata_calls
    }
}

impl ToxEngine for MockToxEngine {
    fn self_address(&self) -> String {
        self.state.lock().unwrap().address.clone()
    }

    fn self_public_key(&self) -> PublicKey {
        self.state.lock().unwrap().public_key
    }

    fn set_name(&mut self, name: &str) -> ToxResult<()> {
        self.state.lock().unwrap().name = Some(name.to_string());
        Ok(())
    }

    fn set_status_message(&mut self, status: &str) -> ToxResult<()> {
        self.state.lock().unwrap().status_message = Some(status.to_string());
        Ok(())
    }

    fn bootstrap(&mut self, node: &BootstrapNode) -> ToxResult<()> {
        let mut state = self.state.lock().unwrap();
        state.bootstrapped.push(node.clone());
        if state.failing_hosts.contains(&node.host) {
            return Err(ToxError::Bootstrap {
                host: node.host.clone(),
                port: node.port,
                reason: "mock bootstrap failure".to_string(),
            });
        }
        PublicKey::from_hex(&node.public_key)?;
        Ok(())
    }

    fn friend_add_norequest(&mut self, public_key: &PublicKey) -> ToxResult<FriendNumber> {
        let mut state = self.state.lock().unwrap();
        if state.fail_friend_add {
            return Err(ToxError::FriendAdd("mock friend add failure".to_string()));
        }
        if let Some(pos) = state.friends.iter().position(|k| k == public_key) {
            return Ok(FriendNumber(pos as u32));
        }
        state.friends.push(*public_key);
        Ok(FriendNumber(state.friends.len() as u32 - 1))
    }

    fn friend_send_message(&mut self, friend: FriendNumber, text: &str) -> ToxResult<u32> {
        let mut state = self.state.lock().unwrap();
        if state.fail_send {
            return Err(ToxError::Send("mock send failure".to_string()));
        }
        state.sent_messages.push(SentMessage {
            friend,
            text: text.to_string(),
        });
        let id = state.next_message_id;
        state.next_message_id += 1;
        Ok(id)
    }

    fn iterate(&mut self) -> Vec<ToxEvent> {
        let mut state = self.state.lock().unwrap();
        state.iterations += 1;
        if let Some((at, shutdown)) = &state.shutdown_after {
            if state.iterations >= *at {
                shutdown.trigger();
            }
        }
        state.incoming_events.drain(..).collect()
    }

    fn iteration_interval(&self) -> Duration {
        self.state.lock().unwrap().interval
    }

    fn savedata(&self) -> Vec<u8> {
        let mut state = self.state.lock().unwrap();
        state.savedata_calls += 1;
        state.savedata.clone()
    }
}
