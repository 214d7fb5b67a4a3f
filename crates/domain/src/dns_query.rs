use crate::dns_header::DnsHeader;
use crate::dns_question::DnsQuestion;
use crate::dns_record::QueryType;
use crate::errors::{BufferError, CodecError, QueryViolation};
use crate::packet_buffer::PacketBuffer;

/// A single-question query, as received from a client or sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub header: DnsHeader,
    pub question: DnsQuestion,
}

impl DnsQuery {
    pub fn new(id: u16, name: impl Into<String>, qtype: QueryType, recursion_desired: bool) -> Self {
        Self {
            header: DnsHeader::query(id, recursion_desired),
            question: DnsQuestion::new(name, qtype),
        }
    }

    pub fn with_random_id(name: impl Into<String>, qtype: QueryType, recursion_desired: bool) -> Self {
        Self::new(fastrand::u16(..), name, qtype, recursion_desired)
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn name(&self) -> &str {
        &self.question.name
    }

    /// Checks that an incoming header describes a plain standard query.
    pub fn validate(header: &DnsHeader) -> Result<(), QueryViolation> {
        if !header.is_query {
            return Err(QueryViolation::NotAQuery);
        }
        if header.opcode != 0 {
            return Err(QueryViolation::UnsupportedOpcode(header.opcode));
        }
        if header.authoritative_answer {
            return Err(QueryViolation::Authoritative);
        }
        if header.truncated {
            return Err(QueryViolation::Truncated);
        }
        if header.question_count != 1 {
            return Err(QueryViolation::QuestionCount(header.question_count));
        }
        if header.answer_count != 0 {
            return Err(QueryViolation::AnswerRecords(header.answer_count));
        }
        if header.authority_count != 0 {
            return Err(QueryViolation::AuthorityRecords(header.authority_count));
        }
        if header.additional_count != 0 {
            return Err(QueryViolation::AdditionalRecords(header.additional_count));
        }
        Ok(())
    }

    pub fn encode(&self, buffer: &mut PacketBuffer) -> Result<(), BufferError> {
        let header = DnsHeader {
            question_count: 1,
            answer_count: 0,
            authority_count: 0,
            additional_count: 0,
            ..self.header.clone()
        };
        header.encode(buffer)?;
        self.question.encode(buffer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = PacketBuffer::new();
        self.encode(&mut buffer).map_err(CodecError::Encode)?;
        Ok(buffer.into_vec())
    }
}
