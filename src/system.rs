use std::error::Error;

pub type Result<T> = core::result::Result<T, Box<dyn Error>>;

/// Largest datagram read from or written to the wire.
pub const MAX_PACKET_SIZE: usize = 512;
