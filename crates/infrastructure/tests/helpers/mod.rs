pub mod builders;
pub mod dns_server_mock;
pub mod mock_transport;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use dns_server_mock::{MockDnsServer, MOCK_ANSWER, SPOOFED_ANSWER};
#[allow(unused_imports)]
pub use mock_transport::*;
