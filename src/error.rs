use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("malformed message: {0}")]
    MalformedMessage(&'static str),

    #[error("compression pointers followed more than {0} times")]
    CompressionLoop(usize),

    #[error("upstream {address} did not answer within {timeout:?}")]
    RelayTimeout { address: String, timeout: Duration },

    #[error("upstream {address} io failure: {source}")]
    RelayIoFailure {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl DnsError {
    /// A pointer loop is a malformed message as far as callers are concerned.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DnsError::MalformedMessage(_) | DnsError::CompressionLoop(_)
        )
    }

    pub fn is_relay_failure(&self) -> bool {
        matches!(
            self,
            DnsError::RelayTimeout { .. } | DnsError::RelayIoFailure { .. }
        )
    }
}
