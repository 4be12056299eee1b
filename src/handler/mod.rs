use std::convert::TryFrom;
use std::net::SocketAddr;

use async_trait::async_trait;
use futures_util::future::join_all;
use log::Level;
use tokio::net::UdpSocket;

use crate::buffer::PacketBuffer;
use crate::config::Config;
use crate::dump::{hex_dump, printable};
use crate::error::DnsError;
use crate::handler::local_answerer::LocalAnswerer;
use crate::handler::query_sender::QuerySender;
use crate::handler::relay::{Relay, UdpRelay};
use crate::protocol::{
    not_implemented, DnsQuery, Question, QueryError, ResourceRecord, ResponseBuilder, OPCODE_QUERY,
};
use crate::system::Result;

mod local_answerer;
mod query_sender;
mod relay;

/// Produces the answer records for one question of query `id`.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, id: u16, question: &Question) -> std::result::Result<Vec<ResourceRecord>, DnsError>;
}

/// Turns one inbound datagram into the datagram to send back, if any.
pub struct QueryHandler {
    answerer: Box<dyn Answerer>,
    parallel: bool,
}

impl QueryHandler {
    pub fn local() -> Self {
        QueryHandler {
            answerer: Box::new(LocalAnswerer::new()),
            parallel: false,
        }
    }

    pub fn forwarding(relay: Box<dyn Relay>) -> Self {
        QueryHandler {
            answerer: Box::new(QuerySender::new(relay)),
            parallel: false,
        }
    }

    pub fn from(config: &Config) -> Self {
        let handler = match &config.resolver {
            Some(address) => {
                QueryHandler::forwarding(Box::new(UdpRelay::new(address.clone(), config.relay_timeout())))
            }
            None => QueryHandler::local(),
        };
        handler.with_parallel(config.parallel_forwarding)
    }

    /// Resolve all questions of a query concurrently instead of one by one.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// `None` means the datagram is dropped without a reply.
    pub async fn resolve(&self, packet: &[u8]) -> Option<Vec<u8>> {
        let query = match DnsQuery::try_from(packet) {
            Ok(query) => query,
            Err(QueryError::Header(e)) => {
                warn!("dropping {} byte datagram: {}", packet.len(), e);
                return None;
            }
            Err(QueryError::Body { header, source }) => {
                warn!("query {} has an unreadable question section: {}", header.id, source);
                return Some(not_implemented(&header));
            }
        };

        let id = query.get_id();
        let builder = ResponseBuilder::new(&query.header, query.header.question_count);
        let mut builder = builder.echo_questions(&query.questions);
        if query.header.opcode != OPCODE_QUERY {
            info!("query {} has opcode {}, answering with not implemented", id, query.header.opcode);
        }

        for records in self.answer_all(&query).await {
            builder.push_answers(&records);
        }
        info!(
            "query {}: {} question(s), {} answer(s)",
            id,
            query.questions.len(),
            builder.answer_count()
        );
        Some(builder.finalize())
    }

    /// Answers in question order, whichever way they were gathered.
    async fn answer_all(&self, query: &DnsQuery) -> Vec<Vec<ResourceRecord>> {
        let id = query.get_id();
        if self.parallel {
            return join_all(query.questions.iter().map(|q| self.answer_one(id, q))).await;
        }
        let mut answers = Vec::with_capacity(query.questions.len());
        for question in &query.questions {
            answers.push(self.answer_one(id, question).await);
        }
        answers
    }

    async fn answer_one(&self, id: u16, question: &Question) -> Vec<ResourceRecord> {
        match self.answerer.answer(id, question).await {
            Ok(records) => records,
            Err(e) => {
                let reason = if e.is_relay_failure() {
                    "relay failed"
                } else if e.is_malformed() {
                    "unusable upstream reply"
                } else {
                    "no answer"
                };
                warn!("query {}: {} for {}: {}", id, reason, question.name, e);
                Vec::new()
            }
        }
    }
}

pub struct HandlerContext {
    main_socket: UdpSocket,
    handler: QueryHandler,
}

impl HandlerContext {
    pub async fn from(config: &Config) -> Result<Self> {
        HandlerContext::bind(&config.listen_addr(), QueryHandler::from(config)).await
    }

    pub async fn bind(address: &str, handler: QueryHandler) -> Result<Self> {
        let main_socket = UdpSocket::bind(address)
            .await
            .map_err(|e| format!("cannot bind {}: {}", address, e))?;
        Ok(HandlerContext {
            main_socket,
            handler,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.main_socket.local_addr()?)
    }

    pub async fn recv_query(&self) -> Result<(PacketBuffer, SocketAddr)> {
        let mut buffer = PacketBuffer::new();
        let (len, src) = self.main_socket.recv_from(buffer.as_mut_slice()).await?;
        buffer.set_len(len);
        Ok((buffer, src))
    }

    async fn back_to_client(&self, client: SocketAddr, response: &[u8]) -> Result<()> {
        self.main_socket.send_to(response, client).await?;
        Ok(())
    }

    pub async fn handle_task(&self, src: SocketAddr, buffer: PacketBuffer) -> Result<()> {
        let packet = buffer.as_slice();
        trace_datagram("request from", src, packet);
        if let Some(response) = self.handler.resolve(packet).await {
            trace_datagram("response to", src, &response);
            self.back_to_client(src, &response).await?;
        }
        Ok(())
    }

    /// Serves queries one at a time until the socket fails.
    pub async fn run(&self) -> Result<()> {
        loop {
            let (buffer, src) = self.recv_query().await?;
            self.handle_task(src, buffer).await?;
        }
    }
}

fn trace_datagram(direction: &str, peer: SocketAddr, bytes: &[u8]) {
    if log_enabled!(Level::Debug) {
        debug!(
            "{} {} ({} bytes)\n{}\n{}",
            direction,
            peer,
            bytes.len(),
            hex_dump(bytes),
            printable(bytes)
        );
    }
}
