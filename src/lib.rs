//! toxbot - Tox presence and echo bot
//!
//! Loads (or creates) a persistent Tox identity, joins the network through
//! known bootstrap nodes, accepts every contact request and echoes messages
//! back, answering `/ping` and `/id`.
//!
//! Key principles:
//! - The protocol itself lives in libtoxcore; this crate only orchestrates it
//! - One engine handle, owned by one single-threaded loop
//! - Savedata on disk is always a complete snapshot (write-temp, then rename)

pub mod persistence;
pub mod tox;
