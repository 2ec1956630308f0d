use std::fs;
use std::path::PathBuf;

use schemagen_core::config::SchemagenConfig;
use schemagen_core::source::SchemaSource;
use schemagen_core::{CodeGenerator, GeneratorError};
use schemagen_react_query::ReactQueryGenerator;

fn fixtures() -> SchemaSource {
    SchemaSource::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../schemagen-core/tests/fixtures"))
}

fn generate() -> String {
    let files = ReactQueryGenerator
        .generate(&fixtures(), &SchemagenConfig::default())
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, PathBuf::from("api.ts"));
    files[0].content()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

#[test]
fn preamble() {
    let content = generate();
    assert!(content.starts_with("/* AUTO-GENERATED - do not edit */\n"));
    assert!(content.contains("import { env } from \"@/env\";\n"));
    assert!(content.contains("import { Status, RoomState } from \"@/api/schemas\";\n"));
    assert!(content.contains("export let caller: AxiosInstance = createCaller(env.VITE_BACKEND);"));
    assert!(content.contains("export const configureCaller = (instance: AxiosInstance): void => {"));
}

#[test]
fn declarations_in_discovery_order() {
    let content = generate();
    let order = [
        "const ValidateTokenResp = z.boolean();",
        "const RedirectParams = z.object({",
        "const RedirectResp = z.void();",
        "const GetExample1Params = z.object({",
        "const UpdateExample1Params = z.object({",
        "const UpdateExample1Body = z.object({\n  \"name\": z.string()\n});",
        "const GetExamples2Resp = z.array(Status);",
        "const DeleteByitemIdByParams = z.object({\n  \"item_id\": z.number()\n});",
        "const GetMetricsResp = z.record(z.string(), z.unknown());",
        "export const api = {",
    ];
    let positions: Vec<usize> = order.iter().map(|n| position(&content, n)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {positions:?}");

    assert!(content.contains("type GetExample1Params = z.infer<typeof GetExample1Params>;"));
    assert!(content.contains(
        "const GetExample1Params = z.object({\n  \"id\": z.string(),\n  \"verbose\": z.boolean().optional()\n});"
    ));
    // Referenced bodies are not redeclared.
    assert!(!content.contains("CreateExampleBody"));
}

#[test]
fn versioned_buckets() {
    let content = generate();
    let api = &content[position(&content, "export const api = {")..];

    let auth = position(api, "\n  auth: {\n");
    let example = position(api, "\n  example: {\n");
    let create = position(api, "\n    useCreateExample: ");
    let v1 = position(api, "\n    v1: {\n");
    let get_example = position(api, "\n      useGetExample: ");
    let update = position(api, "\n      useUpdateExample: ");
    let v2 = position(api, "\n    v2: {\n");
    let get_examples = position(api, "\n      useGetExamples: ");
    let items = position(api, "\n  items: {\n");
    let metrics = position(api, "\n  MetricsService: {\n");

    let order = [auth, example, create, v1, get_example, update, v2, get_examples, items, metrics];
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order: {order:?}");
    assert!(api.trim_end().ends_with("};"));
}

#[test]
fn query_reads_placeholders_from_params() {
    let content = generate();
    assert!(content.contains(
        "useGetExample: (params: GetExample1Params, options?: Partial<UseQueryOptions<Status>>) =>"
    ));
    assert!(content.contains("queryKey: [\"useGetExample\", params],"));
    assert!(content.contains(
        ".get<Status>(`/example/${(queryKey[1] as GetExample1Params).id}?verbose=${(queryKey[1] as GetExample1Params).verbose}`, { signal })"
    ));
    assert!(content.contains(".then(({ data }) => Status.parse(data)),"));

    assert!(content.contains(
        ".get<RedirectResp>(`/auth/redirect?security_token=${(queryKey[1] as RedirectParams).security_token}&to=${(queryKey[1] as RedirectParams).to}`, { signal })"
    ));
}

#[test]
fn mutation_reads_placeholders_from_body() {
    let content = generate();
    assert!(content.contains(
        "useUpdateExample: (options?: Partial<UseMutationOptions<Status, Error, UpdateExample1Body & UpdateExample1Params>>) =>"
    ));
    assert!(content.contains("mutationKey: [\"useUpdateExample\"],"));
    assert!(content.contains(".put<Status>(`/example/${body.id}`, body)"));

    assert!(content.contains("mutationFn: (body: RoomState) =>"));
    assert!(content.contains(".post<void>(`/example`, body)"));
    assert!(content.contains(".then(({ data }) => data),"));

    assert!(content.contains(".delete<void>(`/items/${body.item_id}`)"));
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(generate(), generate());
}

#[test]
fn duplicate_declarations_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("openapi.json"),
        r#"{"openapi":"3.1.0","info":{"title":"t","version":"1"},"paths":{
            "/a": {"get": {"operationId": "fetch", "parameters": [{"name": "q", "in": "query", "schema": {"type": "string"}}], "responses": {}}},
            "/b": {"get": {"operationId": "fetch", "parameters": [{"name": "q", "in": "query", "schema": {"type": "string"}}], "responses": {}}}
        }}"#,
    )
    .unwrap();
    let err = ReactQueryGenerator
        .generate(&SchemaSource::new(dir.path()), &SchemagenConfig::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::DuplicateDeclaration(name) if name == "FetchParams"));
}

#[test]
fn duplicate_hooks_keep_the_last() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("openapi.json"),
        r#"{"openapi":"3.1.0","info":{"title":"t","version":"1"},"paths":{
            "/a": {"get": {"tags": ["x"], "operationId": "ping", "responses": {}}},
            "/b": {"get": {"tags": ["x"], "operationId": "ping", "responses": {}}}
        }}"#,
    )
    .unwrap();
    let files = ReactQueryGenerator
        .generate(&SchemaSource::new(dir.path()), &SchemagenConfig::default())
        .unwrap();
    let content = files[0].content();
    assert_eq!(content.matches("usePing: ").count(), 1);
    assert!(content.contains(".get<void>(`/b`, { signal })"));
    assert!(!content.contains("@/api/schemas"));
}
