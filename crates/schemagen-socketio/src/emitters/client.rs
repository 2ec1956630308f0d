use std::collections::HashSet;

use minijinja::context;
use schemagen_core::GeneratorError;
use schemagen_core::emit::GENERATED_MARKER;
use schemagen_core::ir::SocketNamespace;
use schemagen_core::naming::{escape_jsdoc, sanitize_identifier, to_pascal};
use schemagen_zod::template::render;

use super::methods::channel_methods;

/// Members every generated client declares.
const LIFECYCLE: &[&str] = &[
    "socket",
    "connect",
    "disconnect",
    "isConnected",
    "onConnect",
    "onDisconnect",
    "onAny",
    "onError",
];

pub fn class_name(namespace: &str) -> String {
    format!("SocketClient{}", sanitize_identifier(&to_pascal(namespace)))
}

/// Render the client module for one namespace.
pub fn emit_client(ns: &SocketNamespace, schemas_import: &str) -> Result<String, GeneratorError> {
    let mut taken: HashSet<String> = LIFECYCLE.iter().map(|s| s.to_string()).collect();
    let mut methods = Vec::new();
    for channel in &ns.channels {
        for method in channel_methods(channel) {
            if !taken.insert(method.name.clone()) {
                return Err(GeneratorError::DuplicateDeclaration(format!(
                    "{}.{} (channel `{}`)",
                    class_name(&ns.namespace),
                    method.name,
                    channel.address
                )));
            }
            methods.push(method.source);
        }
    }

    render(
        "client.ts.j2",
        include_str!("../../templates/client.ts.j2"),
        context! {
            marker => GENERATED_MARKER,
            schemas_import => schemas_import,
            namespace => escape_jsdoc(&ns.namespace),
            title => escape_jsdoc(&ns.title),
            class_name => class_name(&ns.namespace),
            methods => methods,
        },
    )
}
