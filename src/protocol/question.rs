use std::convert::TryFrom;

use crate::cursor::Cursor;
use crate::error::DnsError;
use crate::protocol::name::Name;

pub const TYPE_A: u16 = 1;
pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Question {
    pub name: Name,
    pub _type: u16,
    pub class: u16,
}

impl Question {
    pub fn address(name: Name) -> Self {
        Question {
            name,
            _type: TYPE_A,
            class: CLASS_IN,
        }
    }

    /// The question exactly as it appeared in the query, compression included.
    pub fn echo_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.name.wire().len() + 4);
        result.extend_from_slice(self.name.wire());
        result.extend_from_slice(&self._type.to_be_bytes());
        result.extend_from_slice(&self.class.to_be_bytes());
        result
    }

    /// The question with its name expanded, for use in a message of its own.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.name.to_bytes();
        result.extend_from_slice(&self._type.to_be_bytes());
        result.extend_from_slice(&self.class.to_be_bytes());
        result
    }
}

impl TryFrom<&mut Cursor<'_>> for Question {
    type Error = DnsError;

    fn try_from(cursor: &mut Cursor<'_>) -> Result<Self, Self::Error> {
        let name = Name::try_from(&mut *cursor)?;
        let _type = cursor.take_u16()?;
        let class = cursor.take_u16()?;
        Ok(Question { name, _type, class })
    }
}
