use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::error::DnsError;
use crate::handler::Answerer;
use crate::protocol::{Question, ResourceRecord};

pub const LOCAL_ADDRESS: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);
pub const LOCAL_TTL: u32 = 60;

/// Answers every question with the same address record, no state kept.
#[derive(Clone)]
pub struct LocalAnswerer {
    address: Ipv4Addr,
    ttl: u32,
}

impl LocalAnswerer {
    pub fn new() -> Self {
        LocalAnswerer {
            address: LOCAL_ADDRESS,
            ttl: LOCAL_TTL,
        }
    }
}

#[async_trait]
impl Answerer for LocalAnswerer {
    async fn answer(&self, _id: u16, question: &Question) -> Result<Vec<ResourceRecord>, DnsError> {
        Ok(vec![ResourceRecord::address(
            question.name.clone(),
            self.address,
            self.ttl,
        )])
    }
}
