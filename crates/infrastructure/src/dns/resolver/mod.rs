pub mod doh;
pub mod forwarding;
pub mod iterative;

pub use doh::DohJsonResolver;
pub use forwarding::ForwardingResolver;
pub use iterative::IterativeResolver;
