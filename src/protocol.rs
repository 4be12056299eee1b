//! RFC 1035 wire format: header, names with compression pointers,
//! questions and address records, plus the query splitter and the
//! response builder that sit on top of them.

pub mod header;
pub mod name;
pub mod query;
pub mod question;
pub mod record;
mod response;

pub use header::{Header, OPCODE_QUERY};
pub use query::{DnsQuery, QueryError};
pub use question::Question;
pub use record::ResourceRecord;
pub use response::{not_implemented, ResponseBuilder};
