use async_trait::async_trait;
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};

/// Answers one query. The returned response may carry any RCODE; `Err` is
/// reserved for failures to obtain a response at all.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError>;
}
