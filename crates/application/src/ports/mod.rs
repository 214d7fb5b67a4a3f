mod dns_resolver;
mod lookup_transport;

pub use dns_resolver::DnsResolver;
pub use lookup_transport::LookupTransport;

// Re-export for convenience
pub use ferrous_resolver_domain::{DnsQuery, DnsResponse};
