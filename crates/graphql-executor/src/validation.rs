use std::collections::HashSet;

use async_graphql_parser::{
    types::{DocumentOperations, ExecutableDocument, Selection, SelectionSet, TypeCondition},
    Positioned,
};

use crate::{error::GraphqlError, execute::missing_root_error, registry::Type, schema::Schema};

/// Check every selected field against the type it is selected on.
///
/// Only field existence is checked. Selections below interface and object
/// typed fields are followed, leaf and union typed ones are not. All
/// diagnostics are collected, none of them stops the walk.
pub(crate) fn validate(schema: &Schema, document: &ExecutableDocument) -> Vec<GraphqlError> {
    let mut operations = match &document.operations {
        DocumentOperations::Single(operation) => vec![operation],
        DocumentOperations::Multiple(operations) => operations.values().collect(),
    };
    operations.sort_by_key(|operation| (operation.pos.line, operation.pos.column));

    let mut validator = Validator {
        schema,
        document,
        errors: Vec::new(),
        fragment_stack: HashSet::new(),
    };

    for operation in operations {
        let root = schema
            .root_type(operation.node.ty)
            .and_then(|root| schema.get_type(root.name()));
        match root {
            Some(root) => validator.validate_selection_set(root, &operation.node.selection_set),
            None => validator.errors.push(missing_root_error(operation)),
        }
    }

    validator.errors
}

struct Validator<'a> {
    schema: &'a Schema,
    document: &'a ExecutableDocument,
    errors: Vec<GraphqlError>,
    fragment_stack: HashSet<&'a str>,
}

impl<'a> Validator<'a> {
    fn validate_selection_set(&mut self, parent: &'a Type, selection_set: &'a Positioned<SelectionSet>) {
        for selection in &selection_set.node.items {
            match &selection.node {
                Selection::Field(field) => {
                    let name = field.node.name.node.as_str();
                    if name == "__typename" {
                        continue;
                    }

                    let Some(definition) = parent.field(name) else {
                        self.errors.push(
                            GraphqlError::new(format!(
                                "Cannot query field \"{name}\" on type \"{}\".",
                                parent.name()
                            ))
                            .with_location(field.pos),
                        );
                        continue;
                    };

                    if field.node.selection_set.node.items.is_empty() {
                        continue;
                    }

                    if let Some(ty) = self
                        .schema
                        .get_type(definition.ty().type_name())
                        .filter(|ty| ty.has_fields())
                    {
                        self.validate_selection_set(ty, &field.node.selection_set);
                    }
                }
                Selection::InlineFragment(fragment) => {
                    let target = self.fragment_target(fragment.node.type_condition.as_ref(), parent);
                    self.validate_selection_set(target, &fragment.node.selection_set);
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.node.fragment_name.node.as_str();
                    let Some(fragment) = self.document.fragments.get(name) else {
                        self.errors.push(
                            GraphqlError::new(format!("Unknown fragment \"{name}\".")).with_location(spread.pos),
                        );
                        continue;
                    };

                    if !self.fragment_stack.insert(name) {
                        continue;
                    }
                    let target = self.fragment_target(Some(&fragment.node.type_condition), parent);
                    self.validate_selection_set(target, &fragment.node.selection_set);
                    self.fragment_stack.remove(name);
                }
            }
        }
    }

    /// The type a fragment's selections are checked against: its type
    /// condition when that names a type with fields, the enclosing type
    /// otherwise.
    fn fragment_target(&self, condition: Option<&'a Positioned<TypeCondition>>, parent: &'a Type) -> &'a Type {
        condition
            .and_then(|condition| self.schema.get_type(condition.node.on.node.as_str()))
            .filter(|ty| ty.has_fields())
            .unwrap_or(parent)
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::parse_query;

    use super::*;
    use crate::registry::{Field, Interface, Object, TypeRef};

    fn schema() -> Schema {
        Schema::build(
            Object::new("Query")
                .field(Field::new("user", TypeRef::named("User")))
                .field(Field::new("node", TypeRef::named("Node"))),
        )
        .register(Object::new("User").implement("Node").field(Field::new("id", TypeRef::named_nn(TypeRef::ID))))
        .register(Interface::new("Node").field(Field::new("id", TypeRef::named_nn(TypeRef::ID))))
        .finish()
        .unwrap()
    }

    fn messages(query: &str) -> Vec<String> {
        validate(&schema(), &parse_query(query).unwrap())
            .into_iter()
            .map(|error| error.message)
            .collect()
    }

    #[test]
    fn valid_documents_have_no_errors() {
        assert!(messages("{ __typename user { id __typename } node { id ... on User { id } } }").is_empty());
        assert!(messages("{ user { ...U } } fragment U on User { id }").is_empty());
    }

    #[test]
    fn unknown_fields_are_reported_and_walk_continues() {
        assert_eq!(
            messages("{ ghost user { name id } node { email } }"),
            [
                "Cannot query field \"ghost\" on type \"Query\".",
                "Cannot query field \"name\" on type \"User\".",
                "Cannot query field \"email\" on type \"Node\".",
            ]
        );
    }

    #[test]
    fn fragments_are_followed() {
        assert_eq!(
            messages("{ user { ...U ...Missing } } fragment U on User { id nope }"),
            [
                "Cannot query field \"nope\" on type \"User\".",
                "Unknown fragment \"Missing\".",
            ]
        );
    }

    #[test]
    fn missing_root_type() {
        assert_eq!(
            messages("mutation { a }"),
            ["Schema is not configured to execute mutation operation."]
        );
    }

    #[test]
    fn diagnostics_carry_locations() {
        let errors = validate(&schema(), &parse_query("{\n  ghost\n}").unwrap());
        assert_eq!(errors[0].locations, [crate::Location { line: 2, column: 3 }]);
    }
}
