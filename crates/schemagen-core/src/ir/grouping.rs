use indexmap::IndexMap;

use super::operations::ApiOperation;

/// Operations sharing a tag, split into the unversioned bucket and one bucket
/// per version. Indices point into the operation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub tag: String,
    pub unversioned: Vec<usize>,
    pub versions: IndexMap<String, Vec<usize>>,
}

/// Group operations by tag, then by version.
///
/// Tags keep first-seen order; inside a tag the unversioned bucket comes first
/// and versions keep first-seen order. The result only depends on operation
/// order, so rendering it is reproducible.
pub fn group_by_tag_and_version(operations: &[ApiOperation]) -> Vec<TagGroup> {
    let mut groups: IndexMap<&str, TagGroup> = IndexMap::new();

    for (i, op) in operations.iter().enumerate() {
        let group = groups.entry(op.tag.as_str()).or_insert_with(|| TagGroup {
            tag: op.tag.clone(),
            unversioned: Vec::new(),
            versions: IndexMap::new(),
        });
        match &op.name.version {
            Some(version) => group.versions.entry(version.clone()).or_default().push(i),
            None => group.unversioned.push(i),
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::operations::{HttpMethod, OperationName};

    fn op(tag: &str, id: &str) -> ApiOperation {
        ApiOperation {
            tag: tag.to_string(),
            method: HttpMethod::Get,
            path: format!("/{tag}"),
            name: OperationName::derive(Some(id), HttpMethod::Get, "/"),
            summary: None,
            parameters: Vec::new(),
            request_body: None,
            response: None,
        }
    }

    #[test]
    fn test_grouping_order() {
        let ops = vec![
            op("example", "getExample_v2"),
            op("auth", "validateToken"),
            op("example", "listExamples"),
            op("example", "getExample_v1"),
            op("example", "putExample_v2"),
        ];
        let groups = group_by_tag_and_version(&ops);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tag, "example");
        assert_eq!(groups[0].unversioned, vec![2]);
        let versions: Vec<&str> = groups[0].versions.keys().map(String::as_str).collect();
        assert_eq!(versions, vec!["2", "1"]);
        assert_eq!(groups[0].versions["2"], vec![0, 4]);
        assert_eq!(groups[1].tag, "auth");
        assert_eq!(groups[1].unversioned, vec![1]);
    }
}
