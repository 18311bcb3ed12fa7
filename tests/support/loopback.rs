//! Local mock servers for tests that talk to the metadata API.
//!
//! Some sandboxes refuse loopback sockets. Those tests are skipped there,
//! unless `TUNEGRAB_REQUIRE_SOCKET_TESTS` asks for them to fail instead.

use std::net::{Ipv4Addr, TcpListener};

use wiremock::MockServer;

const REQUIRE_ENV: &str = "TUNEGRAB_REQUIRE_SOCKET_TESTS";

fn loopback_required() -> bool {
    std::env::var(REQUIRE_ENV).is_ok_and(|value| {
        matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
    })
}

fn loopback_available() -> bool {
    TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).is_ok()
}

/// Starts a mock metadata API, or returns `None` when the calling test
/// should be skipped.
///
/// # Panics
///
/// Panics when loopback sockets are unavailable and the environment
/// requires socket tests to run.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if loopback_available() {
        return Some(MockServer::start().await);
    }

    let test = std::thread::current()
        .name()
        .unwrap_or("<unnamed>")
        .to_string();
    assert!(
        !loopback_required(),
        "{test}: cannot bind 127.0.0.1 for the mock metadata API and {REQUIRE_ENV} is set"
    );
    eprintln!("{test}: skipped, cannot bind 127.0.0.1 (set {REQUIRE_ENV}=1 to fail instead)");
    None
}
