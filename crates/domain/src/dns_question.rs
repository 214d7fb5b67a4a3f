use std::fmt;

use crate::dns_record::{QueryType, CLASS_IN};
use crate::errors::{BufferError, CodecError};
use crate::packet_buffer::PacketBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Lowercase dotted name without a trailing dot.
    pub name: String,
    pub qtype: QueryType,
    pub class: u16,
}

impl DnsQuestion {
    pub fn new(name: impl Into<String>, qtype: QueryType) -> Self {
        Self {
            name: name.into(),
            qtype,
            class: CLASS_IN,
        }
    }

    /// A compression loop in the question marks the whole datagram as
    /// hostile; every other failure is an ordinary malformed question.
    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self, CodecError> {
        let name = buffer.read_name().map_err(|e| match e {
            BufferError::JumpLimitExceeded(_) => CodecError::SuspiciousName(e),
            other => CodecError::QuestionMalformed(other),
        })?;
        let qtype = buffer.read_u16().map_err(CodecError::QuestionMalformed)?;
        let class = buffer.read_u16().map_err(CodecError::QuestionMalformed)?;
        Ok(Self {
            name,
            qtype: QueryType::from_u16(qtype),
            class,
        })
    }

    pub fn encode(&self, buffer: &mut PacketBuffer) -> Result<(), BufferError> {
        buffer.write_name(&self.name)?;
        buffer.write_u16(self.qtype.to_u16())?;
        buffer.write_u16(self.class)
    }
}

impl fmt::Display for DnsQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.qtype)
    }
}
