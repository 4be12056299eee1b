use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::cursor::Cursor;
use crate::error::DnsError;
use crate::protocol::header::HEADER_SIZE;

const C_FACTOR: u8 = 0xc0;
const DC_FACTOR: u16 = 0x3fff;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_POINTER_HOPS: usize = 128;

/// A domain name as read off the wire.
///
/// `labels` is the fully expanded name. `wire` holds the bytes consumed at
/// the name's own position: its labels followed by either the terminating
/// zero or the first compression pointer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Name {
    labels: Vec<Vec<u8>>,
    wire: Vec<u8>,
}

impl Name {
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn wire(&self) -> &[u8] {
        &self.wire
    }

    /// Uncompressed encoding of the expanded name.
    pub fn to_bytes(&self) -> Vec<u8> {
        wrap_name(&self.labels)
    }
}

#[cfg(test)]
impl Name {
    /// Builds an uncompressed name from dotted text, e.g. `abc.com`.
    pub fn parse(text: &str) -> Result<Self, DnsError> {
        let labels = text
            .trim_end_matches('.')
            .split('.')
            .filter(|label| !label.is_empty())
            .map(|label| label.as_bytes().to_vec())
            .collect::<Vec<_>>();
        Name::from_labels(labels)
    }

    pub fn from_labels(labels: Vec<Vec<u8>>) -> Result<Self, DnsError> {
        if labels.iter().any(|l| l.is_empty() || l.len() > MAX_LABEL_LEN) {
            return Err(DnsError::MalformedMessage("label length out of range"));
        }
        let wire = wrap_name(&labels);
        if wire.len() > MAX_NAME_LEN {
            return Err(DnsError::MalformedMessage("name longer than 255 bytes"));
        }
        Ok(Name { labels, wire })
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for (i, label) in self.labels().iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", String::from_utf8_lossy(label))?;
        }
        Ok(())
    }
}

impl TryFrom<&mut Cursor<'_>> for Name {
    type Error = DnsError;

    fn try_from(cursor: &mut Cursor<'_>) -> Result<Self, Self::Error> {
        unzip_name(cursor)
    }
}

/// Length-prefixed labels plus the root label. Never compresses.
pub fn wrap_name(labels: &[Vec<u8>]) -> Vec<u8> {
    let mut vec = Vec::with_capacity(labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
    for label in labels {
        vec.push(label.len() as u8);
        vec.extend(label);
    }
    vec.push(0);
    vec
}

/// Decodes the name at the cursor and leaves the cursor just past it, or
/// just past the first pointer when the name is compressed.
fn unzip_name(cursor: &mut Cursor<'_>) -> Result<Name, DnsError> {
    let message = cursor.buffer();
    let mut reader = cursor.clone();
    let mut labels = Vec::new();
    let mut wire = Vec::new();
    let mut expanded_len = 1;
    let mut hops = 0;
    let mut resume_at = None;

    loop {
        let pointer_at = reader.get_current_index();
        let len = reader.take()?;

        if len & C_FACTOR == C_FACTOR {
            let low = reader.take()?;
            let offset = (u16::from_be_bytes([len, low]) & DC_FACTOR) as usize;
            if offset >= message.len() {
                return Err(DnsError::MalformedMessage("pointer beyond end of message"));
            }
            if offset < HEADER_SIZE || offset >= pointer_at {
                return Err(DnsError::MalformedMessage("pointer must refer backwards"));
            }
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DnsError::CompressionLoop(MAX_POINTER_HOPS));
            }
            if resume_at.is_none() {
                wire.extend_from_slice(&[len, low]);
                resume_at = Some(reader.get_current_index());
            }
            reader.at(offset);
            continue;
        }

        if len as usize > MAX_LABEL_LEN {
            return Err(DnsError::MalformedMessage("label longer than 63 bytes"));
        }

        if len == 0 {
            if resume_at.is_none() {
                wire.push(0);
                resume_at = Some(reader.get_current_index());
            }
            break;
        }

        let label = reader.take_slice(len as usize)?;
        expanded_len += label.len() + 1;
        if expanded_len > MAX_NAME_LEN {
            return Err(DnsError::MalformedMessage("name longer than 255 bytes"));
        }
        if resume_at.is_none() {
            wire.push(len);
            wire.extend_from_slice(label);
        }
        labels.push(label.to_vec());
    }

    if let Some(index) = resume_at {
        cursor.at(index);
    }
    Ok(Name { labels, wire })
}
