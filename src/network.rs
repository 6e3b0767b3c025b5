//! Host network helpers

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Best guess at the host's LAN-facing IPv4 address.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
/// Falls back to loopback when the host has no usable route.
pub fn local_ipv4() -> Ipv4Addr {
    outbound_ipv4().unwrap_or(Ipv4Addr::LOCALHOST)
}

fn outbound_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;

    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// Address operators should use to reach a listener bound at `bound`
pub fn display_addr(bound: SocketAddr) -> SocketAddr {
    if bound.ip().is_unspecified() {
        SocketAddr::new(IpAddr::V4(local_ipv4()), bound.port())
    } else {
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ipv4_is_never_unspecified() {
        assert!(!local_ipv4().is_unspecified());
    }

    #[test]
    fn test_display_addr() {
        let specific: SocketAddr = "10.0.0.5:3000".parse().unwrap();
        assert_eq!(display_addr(specific), specific);

        let wildcard: SocketAddr = "0.0.0.0:3000".parse().unwrap();
        let shown = display_addr(wildcard);
        assert_eq!(shown.port(), 3000);
        assert!(!shown.ip().is_unspecified());
    }
}
