use super::schema::SchemaNode;

/// One direction of a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOperation {
    /// Operation key in the AsyncAPI document.
    pub id: String,
    /// Resolved message payload, `None` when the message carries none.
    pub payload: Option<SchemaNode>,
}

/// One AsyncAPI channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub address: String,
    /// Event name on the wire, derived from the address.
    pub event: String,
    /// Client → server.
    pub receive: Option<ChannelOperation>,
    /// Server → client.
    pub send: Option<ChannelOperation>,
    /// Whether the receive side is answered through the emit acknowledgement.
    pub ack: bool,
}

/// Every channel of one AsyncAPI document.
#[derive(Debug, Clone)]
pub struct SocketNamespace {
    pub namespace: String,
    pub title: String,
    pub channels: Vec<Channel>,
}
