use indexmap::IndexSet;
use log::debug;
use serde_json::Value;

use crate::error::ResolveError;
use crate::ir::{Channel, ChannelOperation, PrimitiveKind, SchemaNode, SocketNamespace};
use crate::naming::{entity_name, event_name};
use crate::parse::asyncapi::{Action, AsyncChannel, AsyncOperation, ParsedAsyncApi};

/// Build the socket model of one AsyncAPI document.
pub fn collect_channels(
    parsed: &ParsedAsyncApi,
    namespace: &str,
    entities: &IndexSet<String>,
) -> Result<SocketNamespace, ResolveError> {
    let doc = &parsed.document;
    let mut channels = Vec::new();

    for (key, channel) in &doc.channels {
        let address = channel.address.clone().unwrap_or_else(|| key.clone());
        let channel_ref = ParsedAsyncApi::channel_ref(key);

        let receive = find_operation(parsed, &channel_ref, Action::Receive);
        let send = find_operation(parsed, &channel_ref, Action::Send);
        let ack = send.is_some_and(|(_, op)| op.is_ack());

        let receive = receive
            .map(|(id, op)| channel_operation(parsed, channel, id, op, entities))
            .transpose()?;
        let send = send
            .map(|(id, op)| channel_operation(parsed, channel, id, op, entities))
            .transpose()?;

        let event = event_name(&address);
        debug!(
            "channel `{key}` -> event `{event}` (receive: {}, send: {}, ack: {ack})",
            receive.is_some(),
            send.is_some()
        );
        channels.push(Channel {
            address,
            event,
            receive,
            send,
            ack,
        });
    }

    Ok(SocketNamespace {
        namespace: namespace.to_string(),
        title: doc.info.title.clone(),
        channels,
    })
}

fn find_operation<'a>(
    parsed: &'a ParsedAsyncApi,
    channel_ref: &str,
    action: Action,
) -> Option<(&'a String, &'a AsyncOperation)> {
    parsed
        .document
        .operations
        .iter()
        .find(|(_, op)| op.action == action && op.channel.ref_path == channel_ref)
}

fn channel_operation(
    parsed: &ParsedAsyncApi,
    channel: &AsyncChannel,
    id: &str,
    op: &AsyncOperation,
    entities: &IndexSet<String>,
) -> Result<ChannelOperation, ResolveError> {
    // The last message wins. Without messages of its own the operation takes
    // the channel's last message, whatever it is named.
    let message = op
        .messages
        .last()
        .or_else(|| channel.messages.values().last());

    let payload = match message {
        Some(m) => match parsed.resolve(m)?.get("payload") {
            Some(p) => payload_node(parsed, p, entities)?,
            None => None,
        },
        None => None,
    };

    Ok(ChannelOperation {
        id: id.to_string(),
        payload,
    })
}

/// Type a message payload. `None` means the message carries no payload.
fn payload_node(
    parsed: &ParsedAsyncApi,
    payload: &Value,
    entities: &IndexSet<String>,
) -> Result<Option<SchemaNode>, ResolveError> {
    let payload = parsed.resolve(payload)?;

    if let Some(options) = payload.get("oneOf").and_then(Value::as_array) {
        let mut members = Vec::new();
        for option in options {
            if let Some(node) = payload_node(parsed, option, entities)? {
                members.push(node);
            }
        }
        if members.is_empty() {
            return Ok(Some(SchemaNode::Primitive(PrimitiveKind::Unknown)));
        }
        return Ok(Some(SchemaNode::Union(members)));
    }

    let node = match payload.get("type").and_then(Value::as_str) {
        Some("object") => match payload.get("title").and_then(Value::as_str) {
            Some(title) => {
                let name = entity_name(title);
                if !entities.contains(&name) {
                    return Err(ResolveError::UnknownEntity(title.to_string()));
                }
                SchemaNode::Reference(name)
            }
            None => SchemaNode::free_form_object(),
        },
        Some("string") => SchemaNode::Primitive(PrimitiveKind::String),
        Some("number" | "integer") => SchemaNode::Primitive(PrimitiveKind::Number),
        Some("boolean") => SchemaNode::Primitive(PrimitiveKind::Boolean),
        Some("null") => SchemaNode::Primitive(PrimitiveKind::Null),
        _ => SchemaNode::Primitive(PrimitiveKind::Unknown),
    };
    Ok(Some(node))
}
