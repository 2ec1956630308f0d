use indexmap::IndexMap;
use log::warn;
use minijinja::context;
use schemagen_core::GeneratorError;
use schemagen_core::ir::TagGroup;
use schemagen_core::naming::{property_key, tag_key, version_key};
use schemagen_zod::template::render;

use super::declarations::OperationPlan;
use super::hooks::emit_hook;

const TAG_INDENT: usize = 4;
const VERSION_INDENT: usize = 6;

/// Render `export const api = { ... }`: one bucket per tag, versioned hooks
/// nested under `v<version>`. `plans` is indexed like the operation list.
pub fn emit_api_object(groups: &[TagGroup], plans: &[OperationPlan<'_>]) -> Result<String, GeneratorError> {
    let groups: Vec<minijinja::Value> = groups
        .iter()
        .map(|group| {
            let versions: Vec<minijinja::Value> = group
                .versions
                .iter()
                .map(|(version, indices)| {
                    let bucket = format!("{}/{}", group.tag, version_key(version));
                    context! {
                        key => property_key(&version_key(version)),
                        hooks => bucket_hooks(&bucket, indices, plans, VERSION_INDENT),
                    }
                })
                .collect();
            context! {
                key => property_key(&tag_key(&group.tag)),
                hooks => bucket_hooks(&group.tag, &group.unversioned, plans, TAG_INDENT),
                versions => versions,
            }
        })
        .collect();

    render(
        "api.ts.j2",
        include_str!("../../templates/api.ts.j2"),
        context! { groups => groups },
    )
}

/// Hooks of one bucket in operation order. A later hook with the same key
/// replaces the earlier one, as it would in the object literal.
fn bucket_hooks(bucket: &str, indices: &[usize], plans: &[OperationPlan<'_>], depth: usize) -> Vec<String> {
    let mut hooks: IndexMap<&str, String> = IndexMap::new();
    for &i in indices {
        let plan = &plans[i];
        let rendered = indent(&emit_hook(plan), depth);
        if hooks.insert(plan.hook.as_str(), rendered).is_some() {
            warn!(
                "hook `{}` defined twice in `{bucket}`, {} {} wins",
                plan.hook,
                plan.op.method.as_str(),
                plan.op.path
            );
        }
    }
    hooks.into_values().collect()
}

fn indent(text: &str, depth: usize) -> String {
    let pad = " ".repeat(depth);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\n\n  b", 2), "  a\n\n    b");
    }
}
