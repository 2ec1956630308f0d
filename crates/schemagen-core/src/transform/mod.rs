pub mod channels;
pub mod operations;
pub mod schema_converter;

pub use channels::collect_channels;
pub use operations::collect_operations;
pub use schema_converter::{RefContext, SchemaConverter};
