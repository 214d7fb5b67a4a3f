#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsResolver;
use ferrous_resolver_domain::{
    DnsHeader, DnsQuery, DnsResponse, DomainError, QueryType, RecordData, ResourceRecord,
    ResultCode,
};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;

/// Resolver returning canned outcomes per query name and recording every call.
pub struct MockDnsResolver {
    outcomes: Mutex<HashMap<String, Result<DnsResponse, DomainError>>>,
    calls: Mutex<Vec<DnsQuery>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_response(&self, name: &str, response: DnsResponse) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(name.to_string(), Ok(response));
    }

    pub fn set_error(&self, name: &str, error: DomainError) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(name.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<DnsQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        self.calls.lock().unwrap().push(query.clone());
        self.outcomes
            .lock()
            .unwrap()
            .get(query.name())
            .cloned()
            .unwrap_or_else(|| Ok(DnsResponse::error(query, ResultCode::NameError)))
    }
}

/// Upstream-style answer with its own id, as a real server would send.
pub fn upstream_answer(name: &str, addrs: &[Ipv4Addr]) -> DnsResponse {
    let answers: Vec<ResourceRecord> = addrs
        .iter()
        .map(|addr| ResourceRecord::new(name, 300, RecordData::A(*addr)))
        .collect();
    DnsResponse {
        header: DnsHeader {
            id: 0x9999,
            is_query: false,
            recursion_desired: false,
            recursion_available: false,
            question_count: 1,
            answer_count: answers.len() as u16,
            ..Default::default()
        },
        question: ferrous_resolver_domain::DnsQuestion::new(name, QueryType::A),
        answers,
        authorities: Vec::new(),
        additionals: Vec::new(),
    }
}

/// Wire bytes of a client query.
pub fn query_bytes(id: u16, name: &str, qtype: QueryType, recursion_desired: bool) -> Vec<u8> {
    DnsQuery::new(id, name, qtype, recursion_desired)
        .to_bytes()
        .unwrap()
}
