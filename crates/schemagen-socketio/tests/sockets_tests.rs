use std::fs;
use std::path::PathBuf;

use schemagen_core::config::SchemagenConfig;
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, GeneratorError};
use schemagen_socketio::SocketIoGenerator;

fn fixtures() -> SchemaSource {
    SchemaSource::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../schemagen-core/tests/fixtures"))
}

fn generate() -> String {
    let files = SocketIoGenerator
        .generate(&fixtures(), &SchemagenConfig::default())
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, PathBuf::from("sockets-v1.ts"));
    files[0].content()
}

#[test]
fn module_shape() {
    let content = generate();
    assert!(content.starts_with(
        "/* AUTO-GENERATED - do not edit */\nimport { io, Socket } from \"socket.io-client\";\nimport { z } from \"zod\";\nimport * as schemas from \"./schemas\";\n"
    ));
    assert!(content.contains("/** Client for the `v1` socket namespace (Demo). */\nexport class SocketClientV1 {"));
    assert!(content.contains("  constructor(url: string, options: Parameters<typeof io>[1] = {}) {\n    this.socket = io(url, options);\n  }"));
    assert!(content.contains("this.socket.on(\"connect_error\", handler);"));
    assert!(content.contains(
        "export function createSocketClient(url: string, options: Parameters<typeof io>[1] = {}): SocketClientV1 {"
    ));
}

#[test]
fn members_follow_channel_order() {
    let content = generate();
    let members = [
        "  public getState(): Promise<schemas.Status> {",
        "  public onGetState(handler: (payload: schemas.Status) => void): void {",
        "  public emitJoin(payload: string): void {",
        "  public onTick(handler: (payload: number | null) => void): void {",
        "  public emitNotesAdd(payload: Record<string, unknown>): void {",
        "  public onNotesAdd(handler: (payload: Record<string, unknown>) => void): void {",
    ];
    let positions: Vec<usize> = members
        .iter()
        .map(|m| content.find(m).unwrap_or_else(|| panic!("missing `{m}`")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {positions:?}");
    assert!(!content.contains("onJoin"));
    assert!(!content.contains("emitTick"));
}

#[test]
fn ack_parses_the_acknowledgement() {
    let content = generate();
    assert!(content.contains("this.socket.emit(\"get_state\", (res: unknown) => {"));
    assert!(content.contains("const result = schemas.Status.safeParse(res);"));
    assert!(!content.contains("emitGetState"));
}

#[test]
fn listeners_use_wire_event_names() {
    let content = generate();
    assert!(content.contains("this.socket.on(\"notes_add\", (raw: unknown) => {"));
    assert!(content.contains("this.socket.emit(\"notes_add\", payload);"));
    assert!(content.contains("const result = z.record(z.string(), z.unknown()).safeParse(raw);"));
    assert!(content.contains("console.error(\"Invalid payload for tick\", result.error);"));
}

#[test]
fn output_prefix_is_configurable() {
    let mut config = SchemagenConfig::default();
    config.sockets.output_prefix = "ws".to_string();
    config.sockets.schemas_import = "@/api/schemas".to_string();
    let files = SocketIoGenerator.generate(&fixtures(), &config).unwrap();
    assert_eq!(files[0].path, PathBuf::from("ws-v1.ts"));
    assert!(files[0].content().contains("import * as schemas from \"@/api/schemas\";"));
}

#[test]
fn no_asyncapi_documents() {
    let dir = tempfile::tempdir().unwrap();
    let files = SocketIoGenerator
        .generate(&SchemaSource::new(dir.path()), &SchemagenConfig::default())
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn titled_payload_must_be_an_entity() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("asyncapi")).unwrap();
    fs::write(
        dir.path().join("asyncapi/v2.json"),
        r##"{"asyncapi":"3.0.0","info":{"title":"t","version":"1"},
            "channels":{"ping":{"address":"ping","messages":{"send":{"payload":{"type":"object","title":"Pong"}}}}},
            "operations":{"ping.send":{"action":"send","channel":{"$ref":"#/channels/ping"}}}}"##,
    )
    .unwrap();
    let err = SocketIoGenerator
        .generate(&SchemaSource::new(dir.path()), &SchemagenConfig::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Source(_)));
}
