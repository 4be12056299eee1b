use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;

use crate::buffer::PacketBuffer;
use crate::error::DnsError;

/// Carries one query to an upstream resolver and brings back its reply.
#[async_trait]
pub trait Relay: Send + Sync {
    fn address(&self) -> &str;

    async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DnsError>;
}

/// UDP relay with a fresh socket per call: one send, one receive, then the
/// socket is dropped.
pub struct UdpRelay {
    address: String,
    timeout: Duration,
}

impl UdpRelay {
    pub fn new(address: String, timeout: Duration) -> Self {
        UdpRelay { address, timeout }
    }

    fn io_failure(&self, source: io::Error) -> DnsError {
        DnsError::RelayIoFailure {
            address: self.address.clone(),
            source,
        }
    }

    async fn resolve_target(&self) -> Result<SocketAddr, DnsError> {
        lookup_host(self.address.as_str())
            .await
            .map_err(|e| self.io_failure(e))?
            .next()
            .ok_or_else(|| {
                self.io_failure(io::Error::new(
                    io::ErrorKind::NotFound,
                    "resolver address did not resolve",
                ))
            })
    }
}

#[async_trait]
impl Relay for UdpRelay {
    fn address(&self) -> &str {
        &self.address
    }

    async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DnsError> {
        let target = self.resolve_target().await?;
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(|e| self.io_failure(e))?;
        socket.connect(target).await.map_err(|e| self.io_failure(e))?;
        socket.send(query).await.map_err(|e| self.io_failure(e))?;

        let mut buffer = PacketBuffer::new();
        let len = match timeout(self.timeout, socket.recv(buffer.as_mut_slice())).await {
            Ok(received) => received.map_err(|e| self.io_failure(e))?,
            Err(_) => {
                return Err(DnsError::RelayTimeout {
                    address: self.address.clone(),
                    timeout: self.timeout,
                })
            }
        };
        buffer.set_len(len);
        debug!("{} answered with {} bytes", self.address, len);
        Ok(buffer.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_return_reply_when_call_forward_given_answering_upstream() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let address = upstream.local_addr().unwrap().to_string();
        let server = tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, src) = upstream.recv_from(&mut buf).await.unwrap();
            let mut reply = buf[..len].to_vec();
            reply.push(0xaa);
            upstream.send_to(&reply, src).await.unwrap();
            buf[..len].to_vec()
        });
        let relay = UdpRelay::new(address, Duration::from_secs(2));

        let result = relay.forward(&[1, 2, 3]).await.unwrap();

        assert_eq!(vec![1, 2, 3, 0xaa], result);
        assert_eq!(vec![1, 2, 3], server.await.unwrap());
    }

    #[tokio::test]
    async fn should_return_timeout_when_call_forward_given_silent_upstream() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let address = upstream.local_addr().unwrap().to_string();
        let relay = UdpRelay::new(address, Duration::from_millis(50));

        let result = relay.forward(&[1, 2, 3]).await;

        assert!(matches!(result, Err(DnsError::RelayTimeout { .. })));
        drop(upstream);
    }

    #[tokio::test]
    async fn should_return_io_failure_when_call_forward_given_address_without_port() {
        let relay = UdpRelay::new("127.0.0.1".to_string(), Duration::from_millis(50));

        let result = relay.forward(&[1, 2, 3]).await;

        assert!(matches!(result, Err(DnsError::RelayIoFailure { .. })));
        assert_eq!("127.0.0.1", relay.address());
    }
}
