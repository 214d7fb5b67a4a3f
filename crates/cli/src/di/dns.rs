use ferrous_resolver_application::ports::{DnsResolver, LookupTransport};
use ferrous_resolver_application::use_cases::HandleDnsQueryUseCase;
use ferrous_resolver_domain::{Config, ResolverStrategy};
use ferrous_resolver_infrastructure::dns::{
    DohJsonResolver, ForwardingResolver, IterativeResolver, RetryingLookup, UdpLookup,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = Self::build_resolver(config);
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(resolver));

        Ok(Self { handler_use_case })
    }

    fn build_transport(config: &Config) -> Arc<dyn LookupTransport> {
        let cfg = &config.resolver;
        let udp = UdpLookup::new(Duration::from_millis(cfg.query_timeout_ms))
            .with_port(cfg.upstream_port);
        Arc::new(RetryingLookup::with_max_attempts(udp, cfg.max_attempts))
    }

    fn build_resolver(config: &Config) -> Arc<dyn DnsResolver> {
        let cfg = &config.resolver;
        let timeout = Duration::from_millis(cfg.query_timeout_ms);

        match cfg.strategy {
            ResolverStrategy::Iterative => {
                info!(
                    root_server = %cfg.root_server,
                    max_hops = cfg.max_delegation_hops,
                    "Using iterative resolution"
                );
                Arc::new(
                    IterativeResolver::new(Self::build_transport(config))
                        .with_root_server(cfg.root_server)
                        .with_max_hops(cfg.max_delegation_hops),
                )
            }
            ResolverStrategy::Google => {
                info!("Forwarding to Google public DNS");
                Arc::new(ForwardingResolver::google(Self::build_transport(config)))
            }
            ResolverStrategy::Cloudflare => {
                info!("Forwarding to Cloudflare public DNS");
                Arc::new(ForwardingResolver::cloudflare(Self::build_transport(config)))
            }
            ResolverStrategy::Forward => {
                info!(upstream = %cfg.upstream, port = cfg.upstream_port, "Forwarding to upstream");
                Arc::new(ForwardingResolver::new(
                    Self::build_transport(config),
                    cfg.upstream,
                ))
            }
            ResolverStrategy::Doh => {
                info!(url = %cfg.doh_url, "Using DNS-over-HTTPS JSON upstream");
                Arc::new(DohJsonResolver::new(cfg.doh_url.clone(), timeout))
            }
        }
    }
}
