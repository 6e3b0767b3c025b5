//! Request logging stage
//!
//! Runs ahead of routing for every request and records who is calling.

use std::fmt;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

/// Address of the client that issued the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub Option<SocketAddr>);

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(addr) => write!(f, "{}", addr.ip()),
            None => f.write_str("unknown"),
        }
    }
}

/// Log the client address, method and URI, then hand the request on.
///
/// Handlers read the resolved address back as `Extension<ClientAddr>`.
pub async fn log_request(mut request: Request, next: Next) -> Response {
    let client = ClientAddr(
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
    );

    tracing::info!(
        client_ip = %client,
        method = %request.method(),
        uri = %request.uri(),
        "Incoming request"
    );

    request.extensions_mut().insert(client);
    next.run(request).await
}
