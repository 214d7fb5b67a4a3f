#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_resolver_application::ports::LookupTransport;
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

type Reply = Box<dyn Fn(&DnsQuery) -> DnsResponse + Send + Sync>;

/// Name servers keyed by (address, query name). Unknown pairs time out.
pub struct MockTransport {
    servers: HashMap<(IpAddr, String), Reply>,
    calls: Mutex<Vec<(IpAddr, DnsQuery)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            servers: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on<F>(mut self, server: IpAddr, qname: &str, reply: F) -> Self
    where
        F: Fn(&DnsQuery) -> DnsResponse + Send + Sync + 'static,
    {
        self.servers
            .insert((server, qname.to_string()), Box::new(reply));
        self
    }

    pub fn calls(&self) -> Vec<(IpAddr, DnsQuery)> {
        self.calls.lock().unwrap().clone()
    }

    /// (server, query name) for every lookup, in order.
    pub fn call_log(&self) -> Vec<(IpAddr, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(server, query)| (*server, query.name().to_string()))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupTransport for MockTransport {
    async fn lookup(&self, query: &DnsQuery, server: IpAddr) -> Result<DnsResponse, DomainError> {
        self.calls.lock().unwrap().push((server, query.clone()));
        match self.servers.get(&(server, query.name().to_string())) {
            Some(reply) => Ok(reply(query)),
            None => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
        }
    }
}

/// Fails with `error` for the first `failures` attempts, then answers.
pub struct FlakyTransport {
    failures: u32,
    error: DomainError,
    reply: Reply,
    attempts: AtomicU32,
}

impl FlakyTransport {
    pub fn new<F>(failures: u32, error: DomainError, reply: F) -> Self
    where
        F: Fn(&DnsQuery) -> DnsResponse + Send + Sync + 'static,
    {
        Self {
            failures,
            error,
            reply: Box::new(reply),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupTransport for FlakyTransport {
    async fn lookup(&self, query: &DnsQuery, _server: IpAddr) -> Result<DnsResponse, DomainError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(self.error.clone());
        }
        Ok((self.reply)(query))
    }
}
