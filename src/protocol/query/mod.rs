use std::convert::TryFrom;

use thiserror::Error;

use crate::cursor::Cursor;
use crate::error::DnsError;
use crate::protocol::header::Header;
use crate::protocol::name::Name;
use crate::protocol::question::Question;

/// Why an inbound query could not be read. A readable header is kept so a
/// best-effort reply can still be sent.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unreadable header: {0}")]
    Header(#[source] DnsError),

    #[error("unreadable question section in query {}: {source}", .header.id)]
    Body {
        header: Header,
        #[source]
        source: DnsError,
    },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DnsQuery {
    pub header: Header,
    pub questions: Vec<Question>,
}

impl DnsQuery {
    pub fn get_id(&self) -> u16 {
        self.header.id
    }
}

impl TryFrom<&[u8]> for DnsQuery {
    type Error = QueryError;

    fn try_from(packet: &[u8]) -> Result<Self, Self::Error> {
        let mut cursor = Cursor::new(packet);
        let header = Header::try_from(&mut cursor).map_err(QueryError::Header)?;
        let mut questions = Vec::with_capacity(question_capacity(header.question_count, cursor.remaining()));
        for _ in 0..header.question_count {
            match Question::try_from(&mut cursor) {
                Ok(question) => questions.push(question),
                Err(source) => return Err(QueryError::Body { header, source }),
            }
        }
        Ok(DnsQuery { header, questions })
    }
}

/// QDCOUNT bounded by what the rest of the datagram can hold; a question
/// takes at least five bytes.
fn question_capacity(question_count: u16, remaining: usize) -> usize {
    (question_count as usize).min(remaining / 5)
}

/// Query for the address of `name` alone, carrying the inbound query's id
/// and asking for recursion.
pub fn single_question_query(id: u16, name: &Name) -> Vec<u8> {
    let header = Header::query(id);
    let question = Question::address(name.clone());
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend(question.to_bytes());
    bytes
}
