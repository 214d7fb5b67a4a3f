pub mod mock_resolver;

#[allow(unused_imports)]
pub use mock_resolver::*;
