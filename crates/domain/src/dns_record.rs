pub mod query_type;
pub mod record;

pub use query_type::QueryType;
pub use record::{RecordData, ResourceRecord, SoaData, CLASS_IN};
