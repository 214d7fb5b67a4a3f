use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// How queries received by the server are answered.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverStrategy {
    /// Walk the delegation chain from the root server.
    #[default]
    Iterative,

    /// Forward to 8.8.8.8.
    Google,

    /// Forward to 1.1.1.1.
    Cloudflare,

    /// Forward to `doh_url` as a DNS-over-HTTPS JSON query.
    Doh,

    /// Forward to the configured `upstream`.
    Forward,
}

impl ResolverStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iterative => "iterative",
            Self::Google => "google",
            Self::Cloudflare => "cloudflare",
            Self::Doh => "doh",
            Self::Forward => "forward",
        }
    }
}

impl fmt::Display for ResolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolverStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iterative" => Ok(Self::Iterative),
            "google" => Ok(Self::Google),
            "cloudflare" => Ok(Self::Cloudflare),
            "doh" => Ok(Self::Doh),
            "forward" => Ok(Self::Forward),
            _ => Err(format!("Unknown resolver strategy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: ResolverStrategy,

    #[serde(default = "default_root_server")]
    pub root_server: IpAddr,

    #[serde(default = "default_upstream")]
    pub upstream: IpAddr,

    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Per-attempt wait for a UDP reply, also used as the HTTP timeout.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Lookups allowed for one iterative resolution, nested ones included.
    #[serde(default = "default_max_delegation_hops")]
    pub max_delegation_hops: u32,

    #[serde(default = "default_doh_url")]
    pub doh_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: ResolverStrategy::default(),
            root_server: default_root_server(),
            upstream: default_upstream(),
            upstream_port: default_upstream_port(),
            query_timeout_ms: default_query_timeout_ms(),
            max_attempts: default_max_attempts(),
            max_delegation_hops: default_max_delegation_hops(),
            doh_url: default_doh_url(),
        }
    }
}

// f.root-servers.net
fn default_root_server() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 5, 5, 241))
}

fn default_upstream() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))
}

fn default_upstream_port() -> u16 {
    53
}

fn default_query_timeout_ms() -> u64 {
    1200
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_delegation_hops() -> u32 {
    20
}

fn default_doh_url() -> String {
    "https://1.1.1.1/dns-query".to_string()
}
