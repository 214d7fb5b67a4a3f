#![allow(dead_code)]
use ferrous_resolver_domain::{
    DnsHeader, DnsQuery, DnsQuestion, DnsResponse, RecordData, ResourceRecord, ResultCode,
};
use std::net::Ipv4Addr;

pub fn a_record(name: &str, addr: Ipv4Addr) -> ResourceRecord {
    ResourceRecord::new(name, 300, RecordData::A(addr))
}

pub fn ns_record(zone: &str, host: &str) -> ResourceRecord {
    ResourceRecord::new(zone, 172_800, RecordData::Ns(host.to_string()))
}

/// Response a server would send back for `query`.
pub struct ResponseBuilder {
    header: DnsHeader,
    question: DnsQuestion,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    pub fn for_query(query: &DnsQuery) -> Self {
        Self {
            header: DnsHeader {
                id: query.id(),
                is_query: false,
                recursion_desired: query.header.recursion_desired,
                question_count: 1,
                ..Default::default()
            },
            question: query.question.clone(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn result_code(mut self, code: ResultCode) -> Self {
        self.header.result_code = code;
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    /// NS referral, with glue when `glue` is given.
    pub fn referral(mut self, zone: &str, host: &str, glue: Option<Ipv4Addr>) -> Self {
        self.authorities.push(ns_record(zone, host));
        if let Some(addr) = glue {
            self.additionals.push(a_record(host, addr));
        }
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
