use crate::system::MAX_PACKET_SIZE;

/// Fixed-size receive buffer for one datagram.
pub struct PacketBuffer {
    buf: [u8; MAX_PACKET_SIZE],
    len: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        PacketBuffer {
            buf: [0u8; MAX_PACKET_SIZE],
            len: 0,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Records how many bytes the last receive filled in.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(MAX_PACKET_SIZE);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_received_bytes_only_when_call_as_slice_given_len_set() {
        let mut buffer = PacketBuffer::new();
        buffer.as_mut_slice()[..3].copy_from_slice(&[1, 2, 3]);

        buffer.set_len(3);

        assert_eq!(&[1, 2, 3], buffer.as_slice());
    }

    #[test]
    fn should_cap_length_when_call_set_len_given_oversized_value() {
        let mut buffer = PacketBuffer::new();

        buffer.set_len(MAX_PACKET_SIZE + 10);

        assert_eq!(MAX_PACKET_SIZE, buffer.as_slice().len());
    }
}
