pub mod resolver;
pub mod server;
pub mod transport;

pub use resolver::{DohJsonResolver, ForwardingResolver, IterativeResolver};
pub use server::UdpDnsServer;
pub use transport::{RetryingLookup, UdpLookup};
