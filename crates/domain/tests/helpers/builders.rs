#![allow(dead_code)]
use ferrous_resolver_domain::{
    DnsHeader, DnsQuery, DnsQuestion, DnsResponse, QueryType, RecordData, ResourceRecord,
    ResultCode, SoaData,
};
use std::net::{Ipv4Addr, Ipv6Addr};

pub fn a_record(name: &str, addr: &str, ttl: u32) -> ResourceRecord {
    let addr: Ipv4Addr = addr.parse().expect("Invalid IPv4 address");
    ResourceRecord::new(name, ttl, RecordData::A(addr))
}

pub fn aaaa_record(name: &str, addr: &str, ttl: u32) -> ResourceRecord {
    let addr: Ipv6Addr = addr.parse().expect("Invalid IPv6 address");
    ResourceRecord::new(name, ttl, RecordData::Aaaa(addr))
}

pub fn ns_record(zone: &str, host: &str) -> ResourceRecord {
    ResourceRecord::new(zone, 172_800, RecordData::Ns(host.to_string()))
}

pub fn soa_record(zone: &str) -> ResourceRecord {
    ResourceRecord::new(
        zone,
        900,
        RecordData::Soa(SoaData {
            mname: format!("ns1.{}", zone),
            rname: format!("hostmaster.{}", zone),
            serial: 2024_01_01,
            refresh: 7200,
            retry: 3600,
            expire: 1_209_600,
            minimum: 300,
        }),
    )
}

pub struct ResponseBuilder {
    header: DnsHeader,
    question: DnsQuestion,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    pub fn new(name: &str, qtype: QueryType) -> Self {
        Self {
            header: DnsHeader {
                id: 0x1234,
                is_query: false,
                question_count: 1,
                ..Default::default()
            },
            question: DnsQuestion::new(name, qtype),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn for_query(query: &DnsQuery) -> Self {
        let mut builder = Self::new(&query.question.name, query.question.qtype);
        builder.header.id = query.id();
        builder
    }

    pub fn id(mut self, id: u16) -> Self {
        self.header.id = id;
        self
    }

    pub fn result_code(mut self, code: ResultCode) -> Self {
        self.header.result_code = code;
        self
    }

    pub fn truncated(mut self, truncated: bool) -> Self {
        self.header.truncated = truncated;
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.additionals.push(record);
        self
    }

    pub fn build(self) -> DnsResponse {
        let mut header = self.header;
        header.answer_count = self.answers.len() as u16;
        header.authority_count = self.authorities.len() as u16;
        header.additional_count = self.additionals.len() as u16;
        DnsResponse {
            header,
            question: self.question,
            answers: self.answers,
            authorities: self.authorities,
            additionals: self.additionals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_builder_counts() {
        let response = ResponseBuilder::new("example.com", QueryType::A)
            .answer(a_record("example.com", "192.0.2.1", 300))
            .authority(ns_record("example.com", "ns1.example.com"))
            .build();

        assert_eq!(response.header.answer_count, 1);
        assert_eq!(response.header.authority_count, 1);
        assert_eq!(response.header.additional_count, 0);
    }
}
