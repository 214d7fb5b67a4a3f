use std::net::Ipv4Addr;

use crate::dns_header::{DnsHeader, ResultCode};
use crate::dns_query::DnsQuery;
use crate::dns_question::DnsQuestion;
use crate::dns_record::ResourceRecord;
use crate::errors::{BufferError, CodecError};
use crate::packet_buffer::PacketBuffer;

/// A response message. Section counts in `header` are rewritten from the
/// record lists whenever the message is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub header: DnsHeader,
    pub question: DnsQuestion,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl DnsResponse {
    /// Empty answer to `query` carrying `result_code`.
    pub fn error(query: &DnsQuery, result_code: ResultCode) -> Self {
        let mut header = DnsHeader::error_reply(query.id(), result_code);
        header.recursion_desired = query.header.recursion_desired;
        header.question_count = 1;
        Self {
            header,
            question: query.question.clone(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn result_code(&self) -> ResultCode {
        self.header.result_code
    }

    /// NOERROR with a complete, non-empty answer section.
    pub fn has_answer(&self) -> bool {
        self.header.result_code == ResultCode::NoError
            && !self.answers.is_empty()
            && !self.header.truncated
    }

    pub fn is_name_error(&self) -> bool {
        self.header.result_code == ResultCode::NameError
    }

    pub fn first_a_record(&self) -> Option<Ipv4Addr> {
        self.answers.iter().find_map(ResourceRecord::as_ipv4)
    }

    /// NS targets from the authority section whose zone encloses `qname`.
    pub fn delegations<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.authorities
            .iter()
            .filter(move |record| is_subdomain_of(qname, &record.name))
            .filter_map(ResourceRecord::ns_host)
    }

    /// Address of a delegated name server supplied as glue.
    pub fn delegation_addr(&self, qname: &str) -> Option<Ipv4Addr> {
        self.delegations(qname).find_map(|host| {
            self.additionals
                .iter()
                .filter(|record| record.name.eq_ignore_ascii_case(host))
                .find_map(ResourceRecord::as_ipv4)
        })
    }

    /// A delegated name server with no address in the additional section.
    pub fn unresolved_ns<'a>(&'a self, qname: &'a str) -> Option<&'a str> {
        self.delegations(qname).next()
    }

    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self, CodecError> {
        let header = DnsHeader::decode(buffer)?;

        let mut question = None;
        for _ in 0..header.question_count {
            let decoded = DnsQuestion::decode(buffer)?;
            question.get_or_insert(decoded);
        }
        let question = question.ok_or(CodecError::MissingQuestion)?;

        let answers = read_records(buffer, header.answer_count)?;
        let authorities = read_records(buffer, header.authority_count)?;
        let additionals = read_records(buffer, header.additional_count)?;

        Ok(Self {
            header,
            question,
            answers,
            authorities,
            additionals,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::decode(&mut PacketBuffer::from_bytes(bytes))
    }

    pub fn encode(&self, buffer: &mut PacketBuffer) -> Result<(), BufferError> {
        let header = DnsHeader {
            question_count: 1,
            answer_count: self.answers.len() as u16,
            authority_count: self.authorities.len() as u16,
            additional_count: self.additionals.len() as u16,
            ..self.header.clone()
        };
        header.encode(buffer)?;
        self.question.encode(buffer)?;
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.encode(buffer)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = PacketBuffer::new();
        self.encode(&mut buffer).map_err(CodecError::Encode)?;
        Ok(buffer.into_vec())
    }
}

fn read_records(buffer: &mut PacketBuffer, count: u16) -> Result<Vec<ResourceRecord>, CodecError> {
    (0..count).map(|_| ResourceRecord::decode(buffer)).collect()
}

/// Label-aware suffix test; the root zone encloses every name.
pub fn is_subdomain_of(name: &str, zone: &str) -> bool {
    let name = name.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');
    if zone.is_empty() || name.eq_ignore_ascii_case(zone) {
        return true;
    }
    let (name, zone) = (name.as_bytes(), zone.as_bytes());
    name.len() > zone.len()
        && name[name.len() - zone.len() - 1] == b'.'
        && name[name.len() - zone.len()..].eq_ignore_ascii_case(zone)
}
