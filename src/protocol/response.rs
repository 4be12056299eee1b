use std::marker::PhantomData;

use crate::protocol::header::{Header, HEADER_SIZE, RCODE_NOT_IMPLEMENTED};
use crate::protocol::question::Question;
use crate::protocol::record::ResourceRecord;
use crate::system::MAX_PACKET_SIZE;

pub struct HeaderWritten;
pub struct QuestionsEchoed;

/// Builds one response in wire order: header, every question, every answer.
///
/// The stage parameter makes it impossible to write an answer before all
/// questions are echoed. The answer count written up front is provisional;
/// `finalize` replaces it with the number of records actually appended.
pub struct ResponseBuilder<S> {
    buf: Vec<u8>,
    header: Header,
    answers: u16,
    stage: PhantomData<S>,
}

impl ResponseBuilder<HeaderWritten> {
    pub fn new(query: &Header, question_count: u16) -> Self {
        let header = Header::reply_to(query, question_count, question_count);
        let mut buf = Vec::with_capacity(MAX_PACKET_SIZE);
        buf.extend_from_slice(&header.to_bytes());
        ResponseBuilder {
            buf,
            header,
            answers: 0,
            stage: PhantomData,
        }
    }

    pub fn echo_questions(mut self, questions: &[Question]) -> ResponseBuilder<QuestionsEchoed> {
        for question in questions {
            self.buf.extend(question.echo_bytes());
        }
        ResponseBuilder {
            buf: self.buf,
            header: self.header,
            answers: self.answers,
            stage: PhantomData,
        }
    }
}

impl ResponseBuilder<QuestionsEchoed> {
    /// Appends the answers of one question. A record that would grow the
    /// message past the datagram limit is dropped and TC is set.
    pub fn push_answers(&mut self, records: &[ResourceRecord]) -> usize {
        let mut written = 0;
        for record in records {
            let bytes = record.to_bytes();
            if self.buf.len() + bytes.len() > MAX_PACKET_SIZE {
                self.header.truncated = true;
                continue;
            }
            self.buf.extend(bytes);
            self.answers += 1;
            written += 1;
        }
        written
    }

    pub fn answer_count(&self) -> u16 {
        self.answers
    }

    pub fn finalize(mut self) -> Vec<u8> {
        self.header.answer_count = self.answers;
        self.buf[..HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        self.buf
    }
}

/// Header-only reply for a query whose header was readable but whose
/// question section was not.
pub fn not_implemented(query: &Header) -> Vec<u8> {
    let mut header = Header::reply_to(query, 0, 0);
    header.rcode = RCODE_NOT_IMPLEMENTED;
    header.to_bytes().to_vec()
}
