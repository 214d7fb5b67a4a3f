//! Iterative resolution from a root server.
//!
//! Each step sends the client's query to the current name server and either
//! stops (an answer, NXDOMAIN, or no usable referral) or follows the referral
//! in the authority section. Referrals without glue are resolved with a nested
//! walk for the name server's A record. Every lookup, nested or not, spends
//! one hop from a shared budget.

use async_trait::async_trait;
use ferrous_resolver_application::ports::{DnsResolver, LookupTransport};
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError, QueryType};
use futures::future::{BoxFuture, FutureExt};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// f.root-servers.net
pub const DEFAULT_ROOT_SERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 5, 5, 241));
pub const DEFAULT_MAX_HOPS: u32 = 20;

pub struct IterativeResolver {
    transport: Arc<dyn LookupTransport>,
    root_server: IpAddr,
    max_hops: u32,
}

impl IterativeResolver {
    pub fn new(transport: Arc<dyn LookupTransport>) -> Self {
        Self {
            transport,
            root_server: DEFAULT_ROOT_SERVER,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_root_server(mut self, root_server: IpAddr) -> Self {
        self.root_server = root_server;
        self
    }

    pub fn with_max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    pub fn root_server(&self) -> IpAddr {
        self.root_server
    }

    fn walk<'a>(
        &'a self,
        query: &'a DnsQuery,
        hops_left: &'a mut u32,
    ) -> BoxFuture<'a, Result<DnsResponse, DomainError>> {
        async move {
            let qname = query.name();
            let mut server = self.root_server;
            let mut last_response: Option<DnsResponse> = None;

            loop {
                if *hops_left == 0 {
                    warn!(
                        qname,
                        max_hops = self.max_hops,
                        "Delegation hop budget exhausted"
                    );
                    return last_response
                        .ok_or(DomainError::DelegationLimitExceeded(self.max_hops));
                }
                *hops_left -= 1;

                debug!(qname, server = %server, hops_left = *hops_left, "Iterative lookup");
                let response = self.transport.lookup(query, server).await?;

                if response.has_answer() || response.is_name_error() {
                    return Ok(response);
                }

                if let Some(addr) = response.delegation_addr(qname) {
                    debug!(qname, next = %addr, "Following delegation with glue");
                    server = IpAddr::V4(addr);
                    last_response = Some(response);
                    continue;
                }

                let Some(ns_host) = response.unresolved_ns(qname) else {
                    debug!(qname, rcode = %response.result_code(), "No further delegation");
                    return Ok(response);
                };

                debug!(qname, ns = ns_host, "Resolving glueless name server");
                let ns_query = DnsQuery::with_random_id(ns_host, QueryType::A, true);
                match self.walk(&ns_query, hops_left).await {
                    Ok(ns_response) if ns_response.has_answer() => {
                        match ns_response.first_a_record() {
                            Some(addr) => {
                                debug!(qname, ns = %ns_query.name(), next = %addr, "Following glueless delegation");
                                server = IpAddr::V4(addr);
                                last_response = Some(response);
                            }
                            None => return Ok(response),
                        }
                    }
                    Ok(_) => return Ok(response),
                    Err(e) => {
                        debug!(qname, ns = %ns_query.name(), error = %e, "Glueless name server lookup failed");
                        return Ok(response);
                    }
                }
            }
        }
        .boxed()
    }
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        if !query.header.recursion_desired {
            debug!(qname = query.name(), "Recursion not desired, asking root only");
            return self.transport.lookup(query, self.root_server).await;
        }

        let mut hops_left = self.max_hops;
        let response = self.walk(query, &mut hops_left).await?;

        info!(
            question = %query.question,
            rcode = %response.result_code(),
            answers = response.answers.len(),
            lookups = self.max_hops - hops_left,
            "Iterative resolution finished"
        );
        Ok(response)
    }
}
