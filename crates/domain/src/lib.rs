//! Ferrous Resolver Domain Layer
//!
//! DNS message model and its RFC 1035 wire codec, query validation, error
//! types and the configuration model shared by the other crates.
pub mod config;
pub mod dns_header;
pub mod dns_query;
pub mod dns_question;
pub mod dns_record;
pub mod dns_response;
pub mod errors;
pub mod packet_buffer;

pub use config::{CliOverrides, Config, ResolverStrategy};
pub use dns_header::{DnsHeader, ResultCode};
pub use dns_query::DnsQuery;
pub use dns_question::DnsQuestion;
pub use dns_record::{QueryType, RecordData, ResourceRecord, SoaData};
pub use dns_response::DnsResponse;
pub use errors::{BufferError, CodecError, DomainError, QueryViolation};
pub use packet_buffer::PacketBuffer;
