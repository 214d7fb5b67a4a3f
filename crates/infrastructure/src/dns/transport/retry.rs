use async_trait::async_trait;
use ferrous_resolver_application::ports::LookupTransport;
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};
use std::net::IpAddr;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Re-sends timed out or failed lookups immediately, up to `max_attempts`
/// attempts in total. Undecodable replies are returned as-is.
pub struct RetryingLookup<T> {
    inner: T,
    max_attempts: u32,
}

impl<T: LookupTransport> RetryingLookup<T> {
    pub fn new(inner: T) -> Self {
        Self::with_max_attempts(inner, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(inner: T, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: LookupTransport> LookupTransport for RetryingLookup<T> {
    async fn lookup(&self, query: &DnsQuery, server: IpAddr) -> Result<DnsResponse, DomainError> {
        for attempt in 1..=self.max_attempts {
            match self.inner.lookup(query, server).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(server = %server, attempt, "Lookup succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        server = %server,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Lookup attempt failed"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::ServerFailure {
            server: server.to_string(),
            attempts: self.max_attempts,
        })
    }
}
