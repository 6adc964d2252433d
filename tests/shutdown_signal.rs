//! Signal delivery to `Shutdown::listen`.
//!
//! Kept in its own test binary: the signals are sent to this process, so
//! no other test may share it.
#![cfg(unix)]

use std::process::Command;
use std::time::Duration;
use toxbot::tox::Shutdown;

fn send_to_self(signal: &str) {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(std::process::id().to_string())
        .status()
        .expect("Failed to execute kill");
    assert!(status.success());
}

/// Await the listener task for up to one second
async fn wait_for(shutdown: &Shutdown) -> bool {
    for _ in 0..100 {
        if shutdown.is_triggered() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    shutdown.is_triggered()
}

#[tokio::test(flavor = "current_thread")]
async fn test_sigterm_during_blocking_startup_is_recorded() {
    let shutdown = Shutdown::listen();

    send_to_self("TERM");
    // Blocking startup work: the listener task has not been polled yet
    std::thread::sleep(Duration::from_millis(300));

    assert!(wait_for(&shutdown).await);
}

#[tokio::test(flavor = "current_thread")]
async fn test_sigint_during_blocking_startup_is_recorded() {
    let shutdown = Shutdown::listen();

    send_to_self("INT");
    std::thread::sleep(Duration::from_millis(300));

    assert!(wait_for(&shutdown).await);
}
