use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;

use crate::cursor::Cursor;
use crate::error::DnsError;
use crate::protocol::name::Name;
use crate::protocol::question::{CLASS_IN, TYPE_A};

/// One resource record of the answer section.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceRecord {
    pub name: Name,
    pub _type: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: Vec<u8>,
}

impl ResourceRecord {
    pub fn address(name: Name, ip: Ipv4Addr, ttl: u32) -> Self {
        ResourceRecord {
            name,
            _type: TYPE_A,
            class: CLASS_IN,
            ttl,
            data: ip.octets().to_vec(),
        }
    }

    pub fn is_address(&self) -> bool {
        self._type == TYPE_A && self.class == CLASS_IN && self.data.len() == 4
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        if !self.is_address() {
            return None;
        }
        Some(Ipv4Addr::new(self.data[0], self.data[1], self.data[2], self.data[3]))
    }

    /// Wire form with an uncompressed owner name.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.name.to_bytes();
        result.extend_from_slice(&self._type.to_be_bytes());
        result.extend_from_slice(&self.class.to_be_bytes());
        result.extend_from_slice(&self.ttl.to_be_bytes());
        result.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
        result.extend_from_slice(&self.data);
        result
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.ip() {
            Some(ip) => write!(f, "({}, A, {}, {})", self.name, self.ttl, ip),
            None => write!(f, "({}, type {}, {})", self.name, self._type, self.ttl),
        }
    }
}

impl TryFrom<&mut Cursor<'_>> for ResourceRecord {
    type Error = DnsError;

    fn try_from(cursor: &mut Cursor<'_>) -> Result<Self, Self::Error> {
        let name = Name::try_from(&mut *cursor)?;
        let _type = cursor.take_u16()?;
        let class = cursor.take_u16()?;
        let ttl = cursor.take_u32()?;
        let data_len = cursor.take_u16()? as usize;
        let data = cursor.take_slice(data_len)?.to_vec();
        Ok(ResourceRecord {
            name,
            _type,
            class,
            ttl,
            data,
        })
    }
}
