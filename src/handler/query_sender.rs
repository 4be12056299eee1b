use std::convert::TryFrom;

use async_trait::async_trait;

use crate::cursor::Cursor;
use crate::error::DnsError;
use crate::handler::relay::Relay;
use crate::handler::Answerer;
use crate::protocol::query::single_question_query;
use crate::protocol::{Header, Question, ResourceRecord};

/// Answers each question by sending it upstream on its own.
pub struct QuerySender {
    relay: Box<dyn Relay>,
}

impl QuerySender {
    pub fn new(relay: Box<dyn Relay>) -> Self {
        QuerySender { relay }
    }
}

#[async_trait]
impl Answerer for QuerySender {
    async fn answer(&self, id: u16, question: &Question) -> Result<Vec<ResourceRecord>, DnsError> {
        let query = single_question_query(id, &question.name);
        let reply = self.relay.forward(&query).await?;
        let records = read_address_answers(id, &reply)?;
        debug!(
            "{} answered {} with {} address record(s)",
            self.relay.address(),
            question.name,
            records.len()
        );
        Ok(records)
    }
}

/// Address records of an upstream reply, owner names expanded.
fn read_address_answers(id: u16, reply: &[u8]) -> Result<Vec<ResourceRecord>, DnsError> {
    let mut cursor = Cursor::new(reply);
    let header = Header::try_from(&mut cursor)?;
    if header.id != id {
        return Err(DnsError::MalformedMessage("reply id does not match the query"));
    }
    if !header.response {
        return Err(DnsError::MalformedMessage("reply is not a response"));
    }
    for _ in 0..header.question_count {
        Question::try_from(&mut cursor)?;
    }
    let mut records = Vec::new();
    for _ in 0..header.answer_count {
        let record = ResourceRecord::try_from(&mut cursor)?;
        if record.is_address() {
            records.push(record);
        } else {
            debug!("skipping non-address record {}", record);
        }
    }
    Ok(records)
}
