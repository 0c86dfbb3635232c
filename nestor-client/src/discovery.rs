//! UDP discovery of Jenkins instances.
//!
//! Jenkins listens on UDP port 33848 and answers any datagram with a short XML
//! document describing the instance.

use crate::error::{ClientError, Result};
use crate::types::DiscoveryInfo;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// UDP port Jenkins listens on for discovery.
pub const DISCOVERY_PORT: u16 = 33848;

/// How long to wait for a reply.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

const DISCOVERY_MESSAGE: &[u8] = b"Long live Jenkins!";

/// Largest datagram we accept as a reply.
const MAX_REPLY_SIZE: usize = 64 * 1024;

/// A one-shot discovery request.
///
/// # Example
///
/// ```no_run
/// use nestor_client::Discovery;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let info = Discovery::new("255.255.255.255").run().await?;
/// println!("Jenkins {:?} at {:?}", info.version, info.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Discovery {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Discovery {
    /// Discover instances answering on `host` (a broadcast address or a single host).
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DISCOVERY_PORT,
            timeout: DISCOVERY_TIMEOUT,
        }
    }

    /// Send to another port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Wait for a different amount of time.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Broadcast the discovery message and wait for the first reply.
    ///
    /// No retry is made. The socket is closed whichever way this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DiscoveryTimeout`] if no reply arrives in time,
    /// or an error if the socket fails or the reply is not valid XML.
    pub async fn run(&self) -> Result<DiscoveryInfo> {
        let target = self.resolve().await?;
        let local: SocketAddr = if target.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await?;
        if target.is_ipv4() {
            socket.set_broadcast(true)?;
        }
        socket.send_to(DISCOVERY_MESSAGE, target).await?;

        tracing::debug!(host = %self.host, target = %target, "Discovery message sent");

        let mut buf = vec![0u8; MAX_REPLY_SIZE];
        let received = tokio::select! {
            received = socket.recv_from(&mut buf) => received,
            _ = tokio::time::sleep(self.timeout) => {
                tracing::debug!(host = %self.host, "Discovery timed out");
                return Err(ClientError::DiscoveryTimeout);
            }
        };

        let (len, from) = received?;
        tracing::debug!(from = %from, bytes = len, "Discovery reply received");
        parse_reply(&buf[..len])
    }

    /// First address `host` resolves to, of either family.
    async fn resolve(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} did not resolve to any address", self.host),
                )
                .into()
            })
    }
}

/// Discover a Jenkins instance on `host` with the default port and timeout.
///
/// # Errors
///
/// See [`Discovery::run`].
pub async fn discover(host: &str) -> Result<DiscoveryInfo> {
    Discovery::new(host).run().await
}

fn parse_reply(datagram: &[u8]) -> Result<DiscoveryInfo> {
    let text = String::from_utf8_lossy(datagram);
    Ok(quick_xml::de::from_str(&text)?)
}
