use std::convert::TryFrom;

use crate::cursor::Cursor;
use crate::error::DnsError;

pub const HEADER_SIZE: usize = 12;

pub const OPCODE_QUERY: u8 = 0;

pub const RCODE_NO_ERROR: u8 = 0;
pub const RCODE_NOT_IMPLEMENTED: u8 = 4;

const QR_MASK: u16 = 0x8000;
const OPCODE_SHIFT: u16 = 11;
const AA_MASK: u16 = 0x0400;
const TC_MASK: u16 = 0x0200;
const RD_MASK: u16 = 0x0100;
const RA_MASK: u16 = 0x0080;
const Z_SHIFT: u16 = 4;

/// The fixed 12 byte message header with its flags unpacked.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Header {
    pub id: u16,
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: u8,
    pub rcode: u8,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    /// Single-question query header as sent upstream.
    pub fn query(id: u16) -> Self {
        Header {
            id,
            recursion_desired: true,
            question_count: 1,
            ..Header::default()
        }
    }

    /// Response header for `query`: opcode and RD are echoed, the rcode
    /// follows from the opcode.
    pub fn reply_to(query: &Header, question_count: u16, answer_count: u16) -> Self {
        Header {
            id: query.id,
            response: true,
            opcode: query.opcode,
            recursion_desired: query.recursion_desired,
            rcode: response_code(query.opcode),
            question_count,
            answer_count,
            ..Header::default()
        }
    }

    pub fn flags(&self) -> u16 {
        let mut flags = (u16::from(self.opcode & 0x0f) << OPCODE_SHIFT)
            | (u16::from(self.z & 0x07) << Z_SHIFT)
            | u16::from(self.rcode & 0x0f);
        if self.response {
            flags |= QR_MASK;
        }
        if self.authoritative {
            flags |= AA_MASK;
        }
        if self.truncated {
            flags |= TC_MASK;
        }
        if self.recursion_desired {
            flags |= RD_MASK;
        }
        if self.recursion_available {
            flags |= RA_MASK;
        }
        flags
    }

    fn set_flags(&mut self, flags: u16) {
        self.response = flags & QR_MASK != 0;
        self.opcode = ((flags >> OPCODE_SHIFT) & 0x0f) as u8;
        self.authoritative = flags & AA_MASK != 0;
        self.truncated = flags & TC_MASK != 0;
        self.recursion_desired = flags & RD_MASK != 0;
        self.recursion_available = flags & RA_MASK != 0;
        self.z = ((flags >> Z_SHIFT) & 0x07) as u8;
        self.rcode = (flags & 0x0f) as u8;
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut result = [0u8; HEADER_SIZE];
        result[0..2].copy_from_slice(&self.id.to_be_bytes());
        result[2..4].copy_from_slice(&self.flags().to_be_bytes());
        result[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        result[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        result[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        result[10..12].copy_from_slice(&self.additional_count.to_be_bytes());
        result
    }

    #[cfg(test)]
    pub fn decode(bytes: &[u8]) -> Result<Self, DnsError> {
        Header::try_from(&mut Cursor::new(bytes))
    }
}

impl TryFrom<&mut Cursor<'_>> for Header {
    type Error = DnsError;

    fn try_from(cursor: &mut Cursor<'_>) -> Result<Self, Self::Error> {
        if cursor.remaining() < HEADER_SIZE {
            return Err(DnsError::MalformedMessage("header shorter than 12 bytes"));
        }
        let mut header = Header {
            id: cursor.take_u16()?,
            ..Header::default()
        };
        header.set_flags(cursor.take_u16()?);
        header.question_count = cursor.take_u16()?;
        header.answer_count = cursor.take_u16()?;
        header.authority_count = cursor.take_u16()?;
        header.additional_count = cursor.take_u16()?;
        Ok(header)
    }
}

/// Only standard queries are implemented.
pub fn response_code(opcode: u8) -> u8 {
    if opcode == OPCODE_QUERY {
        RCODE_NO_ERROR
    } else {
        RCODE_NOT_IMPLEMENTED
    }
}
