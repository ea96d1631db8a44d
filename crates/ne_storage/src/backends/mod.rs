pub mod memory;

#[cfg(feature = "s3")]
pub mod s3;

pub use memory::{MemoryStore, StoredObject};

#[cfg(feature = "s3")]
pub use s3::S3Store;
