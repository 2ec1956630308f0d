pub mod channels;
pub mod grouping;
pub mod operations;
pub mod schema;

pub use channels::{Channel, ChannelOperation, SocketNamespace};
pub use grouping::{TagGroup, group_by_tag_and_version};
pub use operations::{ApiOperation, ApiParameter, HttpMethod, OperationName};
pub use schema::{Entity, ObjectNode, PrimitiveKind, SchemaNode};
