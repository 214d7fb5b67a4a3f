use async_trait::async_trait;
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};
use std::net::IpAddr;
use std::sync::Arc;

/// Sends a query to a single name server and returns its reply.
#[async_trait]
pub trait LookupTransport: Send + Sync {
    async fn lookup(&self, query: &DnsQuery, server: IpAddr) -> Result<DnsResponse, DomainError>;
}

#[async_trait]
impl<T: LookupTransport + ?Sized> LookupTransport for Arc<T> {
    async fn lookup(&self, query: &DnsQuery, server: IpAddr) -> Result<DnsResponse, DomainError> {
        (**self).lookup(query, server).await
    }
}
