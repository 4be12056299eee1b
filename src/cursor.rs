use crate::error::DnsError;

/// Read position over a borrowed message.
///
/// Every read is bounds checked; running off the end of the message is a
/// malformed message, never a panic.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    current: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, current: 0 }
    }

    pub fn at(&mut self, index: usize) {
        self.current = index;
    }

    pub fn get_current_index(&self) -> usize {
        self.current
    }

    /// The whole message, independent of the current position.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.current)
    }

    pub fn peek(&self) -> Result<u8, DnsError> {
        self.buf
            .get(self.current)
            .copied()
            .ok_or(DnsError::MalformedMessage("read past end of message"))
    }

    pub fn take(&mut self) -> Result<u8, DnsError> {
        let result = self.peek()?;
        self.current += 1;
        Ok(result)
    }

    pub fn take_slice(&mut self, len: usize) -> Result<&'a [u8], DnsError> {
        if len > self.remaining() {
            return Err(DnsError::MalformedMessage("read past end of message"));
        }
        let result = &self.buf[self.current..self.current + len];
        self.current += len;
        Ok(result)
    }

    pub fn take_bytes<const N: usize>(&mut self) -> Result<[u8; N], DnsError> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take_slice(N)?);
        Ok(bytes)
    }

    pub fn take_u16(&mut self) -> Result<u16, DnsError> {
        Ok(u16::from_be_bytes(self.take_bytes()?))
    }

    pub fn take_u32(&mut self) -> Result<u32, DnsError> {
        Ok(u32::from_be_bytes(self.take_bytes()?))
    }
}
