pub mod retry;
pub mod udp;

pub use retry::RetryingLookup;
pub use udp::UdpLookup;
