use async_trait::async_trait;
use ferrous_resolver_application::ports::{DnsResolver, LookupTransport};
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::debug;

pub const GOOGLE_DNS: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));
pub const CLOUDFLARE_DNS: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

/// Hands every query unchanged to one recursive upstream.
pub struct ForwardingResolver {
    transport: Arc<dyn LookupTransport>,
    upstream: IpAddr,
}

impl ForwardingResolver {
    pub fn new(transport: Arc<dyn LookupTransport>, upstream: IpAddr) -> Self {
        Self {
            transport,
            upstream,
        }
    }

    pub fn google(transport: Arc<dyn LookupTransport>) -> Self {
        Self::new(transport, GOOGLE_DNS)
    }

    pub fn cloudflare(transport: Arc<dyn LookupTransport>) -> Self {
        Self::new(transport, CLOUDFLARE_DNS)
    }

    pub fn upstream(&self) -> IpAddr {
        self.upstream
    }
}

#[async_trait]
impl DnsResolver for ForwardingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        debug!(
            question = %query.question,
            upstream = %self.upstream,
            "Forwarding query"
        );
        self.transport.lookup(query, self.upstream).await
    }
}
