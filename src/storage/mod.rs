pub mod base;
pub mod csv_sink;
pub mod factory;
pub mod memory;

pub use base::RecordSink;
pub use csv_sink::CsvSink;
pub use factory::{create_storage, StorageType};
pub use memory::MemorySink;
