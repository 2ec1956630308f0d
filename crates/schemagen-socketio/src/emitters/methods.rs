use schemagen_core::ir::{Channel, SchemaNode};
use schemagen_core::naming::{quote, sanitize_identifier, to_camel, to_pascal};
use schemagen_zod::{RefStyle, to_ts_type, to_validator};

/// Entity references resolve through `import * as schemas`.
pub const SCHEMAS_NAMESPACE: &str = "schemas";

const STYLE: RefStyle<'static> = RefStyle::Namespace(SCHEMAS_NAMESPACE);

/// A rendered class member and the name it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub source: String,
}

/// Members for one channel: the client → server call (ack or plain emit)
/// followed by the server → client listener.
pub fn channel_methods(channel: &Channel) -> Vec<Method> {
    let mut methods = Vec::new();
    if let Some(receive) = &channel.receive {
        let payload = receive.payload.as_ref();
        let response = channel.send.as_ref().filter(|_| channel.ack);
        methods.push(match response {
            Some(send) => ack_method(&channel.event, payload, send.payload.as_ref()),
            None => emit_method(&channel.event, payload),
        });
    }
    if let Some(send) = &channel.send {
        methods.push(listener_method(&channel.event, send.payload.as_ref()));
    }
    methods
}

fn parameter(payload: Option<&SchemaNode>) -> (String, &'static str) {
    match payload {
        Some(node) => (format!("payload: {}", to_ts_type(node, STYLE)), ", payload"),
        None => (String::new(), ""),
    }
}

fn ack_method(event: &str, payload: Option<&SchemaNode>, response: Option<&SchemaNode>) -> Method {
    let name = sanitize_identifier(&to_camel(event));
    let (param, emit_arg) = parameter(payload);
    let event_lit = quote(event);

    let source = match response {
        Some(node) => format!(
            "  /** Emits `{event}` and resolves with the validated acknowledgement. */
  public {name}({param}): Promise<{ty}> {{
    return new Promise((resolve, reject) => {{
      this.socket.emit({event_lit}{emit_arg}, (res: unknown) => {{
        const result = {validator}.safeParse(res);
        if (!result.success) {{
          reject(result.error);
          return;
        }}
        resolve(result.data);
      }});
    }});
  }}",
            ty = to_ts_type(node, STYLE),
            validator = to_validator(node, STYLE),
        ),
        None => format!(
            "  /** Emits `{event}` and resolves once it is acknowledged. */
  public {name}({param}): Promise<void> {{
    return new Promise((resolve) => {{
      this.socket.emit({event_lit}{emit_arg}, () => resolve());
    }});
  }}"
        ),
    };
    Method { name, source }
}

fn emit_method(event: &str, payload: Option<&SchemaNode>) -> Method {
    let name = format!("emit{}", sanitize_identifier(&to_pascal(event)));
    let (param, emit_arg) = parameter(payload);
    let source = format!(
        "  /** client → server `{event}` */
  public {name}({param}): void {{
    this.socket.emit({event_lit}{emit_arg});
  }}",
        event_lit = quote(event),
    );
    Method { name, source }
}

fn listener_method(event: &str, payload: Option<&SchemaNode>) -> Method {
    let name = format!("on{}", sanitize_identifier(&to_pascal(event)));
    let event_lit = quote(event);
    let source = match payload {
        Some(node) => format!(
            "  /** server → client `{event}` */
  public {name}(handler: (payload: {ty}) => void): void {{
    this.socket.on({event_lit}, (raw: unknown) => {{
      const result = {validator}.safeParse(raw);
      if (!result.success) {{
        console.error({message}, result.error);
        return;
      }}
      handler(result.data);
    }});
  }}",
            ty = to_ts_type(node, STYLE),
            validator = to_validator(node, STYLE),
            message = quote(&format!("Invalid payload for {event}")),
        ),
        None => format!(
            "  /** server → client `{event}` */
  public {name}(handler: () => void): void {{
    this.socket.on({event_lit}, () => handler());
  }}"
        ),
    };
    Method { name, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::ir::{ChannelOperation, ObjectNode, PrimitiveKind};

    fn channel(
        event: &str,
        receive: Option<Option<SchemaNode>>,
        send: Option<Option<SchemaNode>>,
        ack: bool,
    ) -> Channel {
        let op = |id: &str, payload| ChannelOperation {
            id: format!("{event}.{id}"),
            payload,
        };
        Channel {
            address: event.to_string(),
            event: event.to_string(),
            receive: receive.map(|p| op("receive", p)),
            send: send.map(|p| op("send", p)),
            ack,
        }
    }

    #[test]
    fn test_ack_resolves_parsed_entity() {
        let ch = channel(
            "get_state",
            Some(None),
            Some(Some(SchemaNode::Reference("Status".to_string()))),
            true,
        );
        let methods = channel_methods(&ch);
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getState", "onGetState"]);

        let ack = &methods[0].source;
        assert!(ack.contains("  public getState(): Promise<schemas.Status> {"));
        assert!(ack.contains("this.socket.emit(\"get_state\", (res: unknown) => {"));
        assert!(ack.contains("const result = schemas.Status.safeParse(res);"));
        assert!(ack.contains("reject(result.error);"));
        assert!(ack.contains("resolve(result.data);"));
    }

    #[test]
    fn test_ack_without_response_payload() {
        let ch = channel(
            "reset",
            Some(Some(SchemaNode::Primitive(PrimitiveKind::String))),
            Some(None),
            true,
        );
        let ack = &channel_methods(&ch)[0].source;
        assert!(ack.contains("public reset(payload: string): Promise<void> {"));
        assert!(ack.contains("this.socket.emit(\"reset\", payload, () => resolve());"));
    }

    #[test]
    fn test_emit_without_ack() {
        let ch = channel("join", Some(Some(SchemaNode::Primitive(PrimitiveKind::String))), None, false);
        let methods = channel_methods(&ch);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "emitJoin");
        assert!(methods[0].source.contains("public emitJoin(payload: string): void {"));
        assert!(methods[0].source.contains("this.socket.emit(\"join\", payload);"));
    }

    #[test]
    fn test_send_without_ack_flag_is_not_awaited() {
        let ch = channel("start", Some(None), Some(None), false);
        let methods = channel_methods(&ch);
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["emitStart", "onStart"]);
        assert!(methods[0].source.contains("public emitStart(): void {"));
        assert!(methods[1].source.contains("public onStart(handler: () => void): void {"));
        assert!(methods[1].source.contains("this.socket.on(\"start\", () => handler());"));
    }

    #[test]
    fn test_listener_validates_payload() {
        let ch = channel("notes_add", None, Some(Some(SchemaNode::Object(ObjectNode::default()))), false);
        let listener = &channel_methods(&ch)[0].source;
        assert!(listener.contains("public onNotesAdd(handler: (payload: Record<string, unknown>) => void): void {"));
        assert!(listener.contains("const result = z.record(z.string(), z.unknown()).safeParse(raw);"));
        assert!(listener.contains("console.error(\"Invalid payload for notes_add\", result.error);"));
        assert!(listener.contains("handler(result.data);"));
    }

    #[test]
    fn test_union_payload() {
        let ch = channel(
            "tick",
            None,
            Some(Some(SchemaNode::Union(vec![
                SchemaNode::Primitive(PrimitiveKind::Number),
                SchemaNode::Primitive(PrimitiveKind::Null),
            ]))),
            false,
        );
        let listener = &channel_methods(&ch)[0].source;
        assert!(listener.contains("handler: (payload: number | null) => void"));
        assert!(listener.contains("z.union([z.number(), z.null()]).safeParse(raw)"));
    }
}
