pub mod record;
pub mod request;

pub use record::{parse_date, StoredRecord, WarrantyPeriod, WarrantyRecord};
pub use request::{IssueRequest, ListFilter, UpdateRequest, WarrantyStatus};
