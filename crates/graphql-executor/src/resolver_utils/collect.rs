use std::collections::HashSet;

use async_graphql_parser::{
    types::{ExecutableDocument, Field, Selection, SelectionSet},
    Positioned,
};
use indexmap::IndexMap;

/// Field nodes of a selection set grouped by response key, in first
/// occurrence order.
pub(crate) type CollectedFields<'a> = IndexMap<&'a str, Vec<&'a Positioned<Field>>>;

/// Flatten a selection set into its fields.
///
/// Inline fragments and fragment spreads are merged in place, whatever their
/// type condition. A spread of a fragment the document does not define adds
/// nothing, and a fragment already spread into this selection set is not
/// expanded again.
pub(crate) fn collect_fields<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a Positioned<SelectionSet>,
) -> CollectedFields<'a> {
    let mut fields = CollectedFields::new();
    let mut visited_fragments = HashSet::new();
    collect_into(document, selection_set, &mut fields, &mut visited_fragments);
    fields
}

/// Merge the selection sets of every node of one response key, for
/// completing its object value.
pub(crate) fn collect_subfields<'a>(
    document: &'a ExecutableDocument,
    field_nodes: &[&'a Positioned<Field>],
) -> CollectedFields<'a> {
    let mut fields = CollectedFields::new();
    let mut visited_fragments = HashSet::new();
    for field in field_nodes {
        collect_into(document, &field.node.selection_set, &mut fields, &mut visited_fragments);
    }
    fields
}

fn collect_into<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a Positioned<SelectionSet>,
    fields: &mut CollectedFields<'a>,
    visited_fragments: &mut HashSet<&'a str>,
) {
    for selection in &selection_set.node.items {
        match &selection.node {
            Selection::Field(field) => {
                fields
                    .entry(field.node.response_key().node.as_str())
                    .or_default()
                    .push(field);
            }
            Selection::InlineFragment(fragment) => {
                collect_into(document, &fragment.node.selection_set, fields, visited_fragments);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if !visited_fragments.insert(name) {
                    continue;
                }
                if let Some(fragment) = document.fragments.get(name) {
                    collect_into(document, &fragment.node.selection_set, fields, visited_fragments);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::{parse_query, types::DocumentOperations};

    use super::*;

    fn keys(query: &str) -> Vec<(String, usize)> {
        let document = parse_query(query).unwrap();
        let DocumentOperations::Single(operation) = &document.operations else {
            unreachable!()
        };
        collect_fields(&document, &operation.node.selection_set)
            .into_iter()
            .map(|(key, nodes)| (key.to_string(), nodes.len()))
            .collect()
    }

    #[test]
    fn fragments_merge_in_order() {
        let collected = keys(
            r"
            { a ...F b: c ... { d a } }
            fragment F on Query { e b: x }
            ",
        );

        assert_eq!(
            collected,
            [
                ("a".to_string(), 2),
                ("e".to_string(), 1),
                ("b".to_string(), 2),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn missing_fragments_contribute_nothing() {
        assert_eq!(keys("{ a ...Missing }"), [("a".to_string(), 1)]);
    }

    #[test]
    fn fragment_cycles_terminate() {
        let collected = keys(
            r"
            { ...A }
            fragment A on Query { a ...B }
            fragment B on Query { b ...A }
            ",
        );

        assert_eq!(collected, [("a".to_string(), 1), ("b".to_string(), 1)]);
    }
}
