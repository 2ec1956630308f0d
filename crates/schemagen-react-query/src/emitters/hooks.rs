use schemagen_core::ir::HttpMethod;
use schemagen_core::naming::{escape_jsdoc, property_access, quote};

use super::declarations::OperationPlan;

/// Render the hook factory for an operation: a query hook for GET, a
/// mutation hook otherwise. The result is unindented.
pub fn emit_hook(plan: &OperationPlan<'_>) -> String {
    let body = if plan.op.method.is_query() {
        emit_query(plan)
    } else {
        emit_mutation(plan)
    };
    match &plan.op.summary {
        Some(summary) => format!("/** {} */\n{body}", escape_jsdoc(summary)),
        None => body,
    }
}

fn emit_query(plan: &OperationPlan<'_>) -> String {
    let hook = &plan.hook;
    let resp = &plan.response_type;

    let mut args = Vec::new();
    if let Some(params) = &plan.params_type {
        args.push(format!("params: {params}"));
    }
    args.push(format!("options?: Partial<UseQueryOptions<{resp}>>"));

    let (query_key, fn_args, url) = match &plan.params_type {
        Some(params) => {
            let source = format!("(queryKey[1] as {params})");
            (
                format!("[{}, params]", quote(hook)),
                "{ signal, queryKey }",
                build_url(&plan.op.path, &source, query_string(plan, &source)),
            )
        }
        None => (
            format!("[{}]", quote(hook)),
            "{ signal }",
            plan.op.path.clone(),
        ),
    };

    format!(
        "{hook}: ({args}) =>
  useQuery<{resp}>({{
    ...(options ?? {{}}),
    queryKey: {query_key},
    queryFn: ({fn_args}) =>
      caller
        .get<{resp}>(`{url}`, {{ signal }})
        .then({then}),
  }}),",
        args = args.join(", "),
        then = then_clause(plan),
    )
}

fn emit_mutation(plan: &OperationPlan<'_>) -> String {
    let hook = &plan.hook;
    let resp = &plan.response_type;
    let method = plan.op.method;

    // Path parameters travel inside the mutation variables.
    let variables: Vec<&str> = [plan.body_type.as_deref(), plan.params_type.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let vars = if variables.is_empty() {
        "void".to_string()
    } else {
        variables.join(" & ")
    };
    let generics = format!("{resp}, Error, {vars}");

    let fn_arg = if variables.is_empty() {
        String::new()
    } else {
        format!("body: {vars}")
    };
    // Placeholders fill from the variables even when only a body declares them.
    let url = if !variables.is_empty() && !plan.op.path_placeholders().is_empty() {
        build_url(&plan.op.path, "body", None)
    } else {
        plan.op.path.clone()
    };
    let data = match (&plan.body_type, method) {
        (None, _) => "",
        // axios takes the request body of a DELETE through its config.
        (Some(_), HttpMethod::Delete) => ", { data: body }",
        (Some(_), _) => ", body",
    };

    format!(
        "{hook}: (options?: Partial<UseMutationOptions<{generics}>>) =>
  useMutation<{generics}>({{
    ...(options ?? {{}}),
    mutationKey: [{key}],
    mutationFn: ({fn_arg}) =>
      caller
        .{verb}<{resp}>(`{url}`{data})
        .then({then}),
  }}),",
        key = quote(hook),
        verb = method.as_str(),
        then = then_clause(plan),
    )
}

fn then_clause(plan: &OperationPlan<'_>) -> String {
    match &plan.parse_fn {
        Some(parse) => format!("({{ data }}) => {parse}(data)"),
        None => "({ data }) => data".to_string(),
    }
}

/// Substitute `{name}` placeholders with reads from `source` and append the
/// query string, if any.
fn build_url(path: &str, source: &str, query: Option<String>) -> String {
    let mut url = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        url.push_str(&rest[..start]);
        url.push_str(&format!("${{{}}}", property_access(source, name)));
        rest = &rest[start + len + 2..];
    }
    url.push_str(rest);

    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// `k=${..}` pairs for every parameter the path does not consume, in declaration order.
fn query_string(plan: &OperationPlan<'_>, source: &str) -> Option<String> {
    let placeholders = plan.op.path_placeholders();
    let pairs: Vec<String> = plan
        .op
        .parameters
        .iter()
        .filter(|p| !placeholders.contains(&p.name.as_str()))
        .map(|p| format!("{}=${{{}}}", p.name, property_access(source, &p.name)))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}
