//! Wire record model, structured names, and digests.
#![forbid(unsafe_code)]

mod digest;
mod error;
mod name;
mod record;

pub use digest::digest_component;
pub use error::MalformedRecord;
pub use name::Name;
pub use record::{PayloadItem, Record, RecordContent, RecordType};
