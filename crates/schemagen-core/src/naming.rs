//! Case conversion and identifier safety.
//!
//! Every identifier that ends up in generated source goes through this module,
//! templates never build identifiers themselves.

use std::sync::LazyLock;

use regex::Regex;

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*_v(\d+)").expect("version suffix regex should be valid"));

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_v\d+").expect("version token regex should be valid"));

static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("non-word regex should be valid"));

/// Words that cannot be used as a binding name in TypeScript.
const RESERVED_WORDS: &[&str] = &[
    "any", "arguments", "await", "bigint", "boolean", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "eval", "export",
    "extends", "false", "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "never", "new", "null", "number", "object", "package",
    "private", "protected", "public", "return", "static", "string", "super", "switch", "symbol",
    "this", "throw", "true", "try", "typeof", "undefined", "unknown", "var", "void", "while",
    "with", "yield",
];

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Convert kebab/snake separated identifiers to camelCase.
///
/// The word character following each `-` or `_` is uppercased and the separator
/// dropped. Anything else, including already camel-cased input, is left alone:
///
/// - `arc_width` → `arcWidth`
/// - `socket-join` → `socketJoin`
/// - `arcWidth` → `arcWidth`
pub fn to_camel(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if (ch == '-' || ch == '_') && i + 1 < chars.len() && is_word_char(chars[i + 1]) {
            out.push(chars[i + 1].to_ascii_uppercase());
            i += 2;
        } else {
            out.push(ch);
            i += 1;
        }
    }
    out
}

/// [`to_camel`] followed by uppercasing the first character.
pub fn to_pascal(input: &str) -> String {
    let camel = to_camel(input);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` can be written as a bare identifier (`obj.name`, `{ name: .. }`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Replace characters that are illegal in an identifier with `_` and make sure
/// the result does not start with a digit.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        return "_".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// A name usable as a `const`/`type` binding: sanitized and never a reserved word.
pub fn binding_name(name: &str) -> String {
    let sanitized = sanitize_identifier(name);
    if is_reserved(&sanitized) {
        format!("{sanitized}_")
    } else {
        sanitized
    }
}

/// The declaration name of an entity, from its file stem or a `$ref` / `title`
/// that points at it.
pub fn entity_name(raw: &str) -> String {
    binding_name(&to_pascal(raw))
}

/// Quote `value` as a JSON / TypeScript string literal.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Render `key` as an object literal key, quoting it only when necessary.
pub fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Render a property read on `object`: `obj.key` or `obj["key"]`.
pub fn property_access(object: &str, key: &str) -> String {
    if is_identifier(key) {
        format!("{object}.{key}")
    } else {
        format!("{object}[{}]", quote(key))
    }
}

/// Make `value` safe to embed in a `/** .. */` comment.
pub fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

/// The key of a tag bucket in the exported API object.
pub fn tag_key(tag: &str) -> String {
    to_camel(&NON_WORD_RUN.replace_all(tag, "_"))
}

/// The key of a versioned bucket inside a tag bucket.
pub fn version_key(version: &str) -> String {
    format!("v{}", to_camel(version))
}

/// React hook name for an operation.
pub fn hook_name(name: &str) -> String {
    format!("use{}", to_pascal(name))
}

/// Split a trailing `_vN` version marker off an operation name.
///
/// `getExample_v1` → (`getExample`, `Some("1")`).
pub fn split_version(name: &str) -> (String, Option<String>) {
    let version = VERSION_SUFFIX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let stripped = VERSION_TOKEN.replacen(name, 1, "").into_owned();
    (stripped, version)
}

/// Synthesize an operation name for an operation without an explicit id.
///
/// The first path segment is dropped (it is usually the tag), `{param}`
/// braces become `By`, and the rest is Pascal-cased after the method:
/// `GET /items/{id}` → `getByidBy`.
pub fn synthesize_operation_name(method: &str, path: &str) -> String {
    let rest: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(1)
        .map(|s| s.replace(['{', '}'], "By"))
        .collect();
    let pascal: String = to_pascal(&rest.join(" "))
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{method}{pascal}")
}

/// Event name carried by a channel address: everything after the first `/`,
/// remaining slashes flattened to `_`.
pub fn event_name(address: &str) -> String {
    let tail = match address.find('/') {
        Some(idx) => &address[idx + 1..],
        None => address,
    };
    tail.replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel() {
        assert_eq!(to_camel("arc_width"), "arcWidth");
        assert_eq!(to_camel("socket-join-payload"), "socketJoinPayload");
        assert_eq!(to_camel("arcWidth"), "arcWidth");
        assert_eq!(to_camel("get_v1"), "getV1");
        assert_eq!(to_camel("trailing_"), "trailing_");
    }

    #[test]
    fn test_to_pascal() {
        assert_eq!(to_pascal("get_state"), "GetState");
        assert_eq!(to_pascal("APIKey"), "APIKey");
        assert_eq!(to_pascal("tick-payload"), "TickPayload");
        assert_eq!(to_pascal(""), "");
    }

    #[test]
    fn test_to_pascal_idempotent() {
        for stem in ["APIKey", "arc_width_update_payload", "status", "socket-join", "v1"] {
            let once = to_pascal(stem);
            assert_eq!(to_pascal(&once), once, "not idempotent for {stem}");
        }
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("get.state"), "get_state");
        assert_eq!(sanitize_identifier("2fa"), "_2fa");
        assert_eq!(sanitize_identifier(""), "_");
        assert_eq!(binding_name("delete"), "delete_");
        assert_eq!(binding_name("GetItems"), "GetItems");
    }

    #[test]
    fn test_entity_name() {
        assert_eq!(entity_name("room_state"), "RoomState");
        assert_eq!(entity_name("room.state"), "Room_state");
        assert_eq!(entity_name("2fa_token"), "_2faToken");
        assert_eq!(entity_name("Status"), "Status");
    }

    #[test]
    fn test_property_helpers() {
        assert_eq!(property_access("params", "id"), "params.id");
        assert_eq!(property_access("params", "item-id"), "params[\"item-id\"]");
        assert_eq!(property_key("auth"), "auth");
        assert_eq!(property_key("2fa"), "\"2fa\"");
        assert_eq!(escape_jsdoc("a */ b"), "a *\\/ b");
    }

    #[test]
    fn test_tag_key() {
        assert_eq!(tag_key("auth"), "auth");
        assert_eq!(tag_key("my-tag"), "myTag");
        assert_eq!(tag_key("Auth Service"), "AuthService");
        assert_eq!(tag_key("a.b"), "aB");
        assert_eq!(version_key("1"), "v1");
    }

    #[test]
    fn test_split_version() {
        assert_eq!(
            split_version("getExample_v1"),
            ("getExample".to_string(), Some("1".to_string()))
        );
        assert_eq!(split_version("getMetrics"), ("getMetrics".to_string(), None));
        assert_eq!(
            split_version("favorite_view"),
            ("favorite_view".to_string(), None)
        );
    }

    #[test]
    fn test_synthesize_operation_name() {
        assert_eq!(synthesize_operation_name("get", "/items/{id}"), "getByidBy");
        assert_eq!(
            synthesize_operation_name("post", "/auth/token/refresh"),
            "postTokenrefresh"
        );
        assert_eq!(synthesize_operation_name("get", "/health"), "get");
    }

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("get_state"), "get_state");
        assert_eq!(event_name("v1/get_state"), "get_state");
        assert_eq!(event_name("v1/room/join"), "room_join");
    }

    #[test]
    fn test_hook_name() {
        assert_eq!(hook_name("getExample"), "useGetExample");
        assert_eq!(hook_name("validate_token"), "useValidateToken");
    }
}
