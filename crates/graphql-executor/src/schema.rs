use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use async_graphql_parser::types::{ExecutableDocument, OperationType};
use futures_util::stream::BoxStream;
use indexmap::{IndexMap, IndexSet};

use crate::{
    error::{GraphqlError, SchemaError},
    registry::{export_sdl, Directive, Object, Scalar, Type},
    request::Request,
    response::Response,
};

/// Schema builder
///
/// Types are registered by value and reference each other by name. Nothing
/// is resolved until [`SchemaBuilder::finish`].
pub struct SchemaBuilder {
    query: Object,
    mutation: Option<Object>,
    subscription: Option<Object>,
    definitions: IndexMap<String, Type>,
    extra_types: Vec<String>,
    directives: Vec<Directive>,
    duplicates: Vec<String>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn mutation(mut self, mutation: Object) -> Self {
        self.mutation = Some(mutation);
        self
    }

    #[must_use]
    pub fn subscription(mut self, subscription: Object) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Make a type available to references from other types.
    ///
    /// It only ends up in the schema if it is reachable from a root type or
    /// an extra type. A scalar named like a built-in one replaces it.
    #[must_use]
    pub fn register(mut self, ty: impl Into<Type>) -> Self {
        let ty = ty.into();
        let name = ty.name().to_string();
        if self.definitions.contains_key(&name) {
            self.duplicates.push(name);
        } else {
            self.definitions.insert(name, ty);
        }
        self
    }

    /// Register a type and keep it in the schema even if nothing references
    /// it, e.g. an object type only ever returned through an interface.
    #[must_use]
    pub fn extra_type(mut self, ty: impl Into<Type>) -> Self {
        let ty = ty.into();
        self.extra_types.push(ty.name().to_string());
        self.register(ty)
    }

    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Build schema.
    ///
    /// Walks the type graph depth-first from the root types and extra types,
    /// keeping every type reachable through fields, arguments, interfaces,
    /// union members and input fields.
    pub fn finish(self) -> Result<Schema, SchemaError> {
        let SchemaBuilder {
            query,
            mutation,
            subscription,
            mut definitions,
            extra_types,
            directives,
            duplicates,
        } = self;

        if let Some(name) = duplicates.into_iter().next() {
            return Err(SchemaError::DuplicateType(name));
        }

        for scalar in Scalar::builtins() {
            definitions
                .entry(scalar.name().to_string())
                .or_insert(Type::Scalar(scalar));
        }

        for root in [Some(&query), mutation.as_ref(), subscription.as_ref()].into_iter().flatten() {
            if definitions.contains_key(root.name()) {
                return Err(SchemaError::DuplicateType(root.name().to_string()));
            }
            definitions.insert(root.name().to_string(), Type::Object(root.clone()));
        }

        let entry_points = [Some(&query), mutation.as_ref(), subscription.as_ref()]
            .into_iter()
            .flatten()
            .map(|root| root.name().to_string())
            .chain(extra_types)
            .collect::<Vec<_>>();

        let reachable = {
            let mut visited = IndexSet::new();
            for name in &entry_points {
                visit(&definitions, name, "schema", &mut visited)?;
            }
            visited.into_iter().map(str::to_string).collect::<Vec<_>>()
        };

        let mut types = IndexMap::with_capacity(reachable.len());
        for name in reachable {
            if let Some(ty) = definitions.swap_remove(&name) {
                types.insert(name, ty);
            }
        }

        for name in definitions.keys().filter(|name| !Scalar::is_builtin(name)) {
            tracing::debug!("Type `{name}` is not reachable from any root type, dropping it");
        }

        Ok(Schema(Arc::new(SchemaInner {
            query,
            mutation,
            subscription,
            types,
            directives,
        })))
    }
}

fn visit<'a>(
    definitions: &'a IndexMap<String, Type>,
    name: &str,
    referenced_by: &str,
    visited: &mut IndexSet<&'a str>,
) -> Result<(), SchemaError> {
    let Some(ty) = definitions.get(name) else {
        return Err(SchemaError::UnknownType {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        });
    };

    if !visited.insert(ty.name()) {
        return Ok(());
    }

    match ty {
        Type::Object(object) => {
            for field in object.fields() {
                visit(definitions, field.ty().type_name(), object.name(), visited)?;
                for argument in field.arguments() {
                    visit(definitions, argument.ty().type_name(), object.name(), visited)?;
                }
            }
            for interface in object.interfaces() {
                visit(definitions, interface, object.name(), visited)?;
            }
        }
        Type::Interface(interface) => {
            for field in interface.fields() {
                visit(definitions, field.ty().type_name(), interface.name(), visited)?;
                for argument in field.arguments() {
                    visit(definitions, argument.ty().type_name(), interface.name(), visited)?;
                }
            }
        }
        Type::Union(union) => {
            for member in union.possible_types() {
                visit(definitions, member, union.name(), visited)?;
            }
        }
        Type::InputObject(input_object) => {
            for field in input_object.fields() {
                visit(definitions, field.ty().type_name(), input_object.name(), visited)?;
            }
        }
        Type::Scalar(_) | Type::Enum(_) => {}
    }

    Ok(())
}

#[doc(hidden)]
pub struct SchemaInner {
    query: Object,
    mutation: Option<Object>,
    subscription: Option<Object>,
    types: IndexMap<String, Type>,
    directives: Vec<Directive>,
}

/// GraphQL schema.
///
/// Immutable once built. Cloning a schema is cheap, so it can be shared
/// between concurrent requests.
#[derive(Clone)]
pub struct Schema(Arc<SchemaInner>);

impl Schema {
    /// Create a schema builder from the query root type.
    pub fn build(query: Object) -> SchemaBuilder {
        SchemaBuilder {
            query,
            mutation: None,
            subscription: None,
            definitions: IndexMap::new(),
            extra_types: Vec::new(),
            directives: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&Type> {
        self.0.types.get(name)
    }

    /// All types of the schema, in discovery order.
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.0.types.values()
    }

    pub fn query_type(&self) -> &Object {
        &self.0.query
    }

    pub fn mutation_type(&self) -> Option<&Object> {
        self.0.mutation.as_ref()
    }

    pub fn subscription_type(&self) -> Option<&Object> {
        self.0.subscription.as_ref()
    }

    pub fn root_type(&self, operation_type: OperationType) -> Option<&Object> {
        match operation_type {
            OperationType::Query => Some(self.query_type()),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.0.directives
    }

    /// Whether `object` may stand in for the interface or union `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &Type, object: &Object) -> bool {
        match abstract_type {
            Type::Interface(interface) => object.implements(interface.name()),
            Type::Union(union) => union.possible_types().iter().any(|name| name == object.name()),
            _ => false,
        }
    }

    /// The schema in SDL, built-in scalars left out.
    pub fn sdl(&self) -> String {
        export_sdl(self)
    }

    /// Execute a GraphQL query or mutation.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        crate::execute::execute(self, request.into()).await
    }

    /// Check that every selected field exists on its parent type.
    pub fn validate(&self, document: &ExecutableDocument) -> Vec<GraphqlError> {
        crate::validation::validate(self, document)
    }

    /// Start a subscription and return its event stream.
    pub async fn subscribe(&self, request: impl Into<Request>) -> Result<BoxStream<'static, Response>, Response> {
        crate::subscription::subscribe(self, request.into()).await
    }
}

impl Debug for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("query", &self.0.query.name())
            .field("mutation", &self.0.mutation.as_ref().map(Object::name))
            .field("subscription", &self.0.subscription.as_ref().map(Object::name))
            .field("types", &self.0.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Field, InputObject, InputValue, Interface, TypeRef, Union};

    fn names(schema: &Schema) -> Vec<&str> {
        let mut names = schema.types().map(Type::name).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    #[test]
    fn registry_is_the_closure_of_the_roots() {
        let schema = Schema::build(
            Object::new("Query")
                .field(Field::new("node", TypeRef::named("Node")))
                .field(Field::new("search", TypeRef::named_list("SearchResult")).argument(InputValue::new("filter", TypeRef::named("Filter")))),
        )
        .register(Interface::new("Node").field(Field::new("id", TypeRef::named_nn(TypeRef::ID))))
        .register(Union::new("SearchResult").possible_type("User"))
        .register(Object::new("User").implement("Node").field(Field::new("id", TypeRef::named_nn(TypeRef::ID))))
        .register(InputObject::new("Filter").field(InputValue::new("limit", TypeRef::named(TypeRef::INT))))
        .register(Object::new("Orphan").field(Field::new("x", TypeRef::named(TypeRef::FLOAT))))
        .finish()
        .unwrap();

        assert_eq!(
            names(&schema),
            ["Filter", "ID", "Int", "Node", "Query", "SearchResult", "User"]
        );
        assert!(schema.get_type("Orphan").is_none());
        assert!(schema.get_type("Float").is_none());
    }

    #[test]
    fn cycles_terminate() {
        let schema = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named("A"))))
            .register(Object::new("A").field(Field::new("b", TypeRef::named_nn("B"))))
            .register(Object::new("B").field(Field::new("a", TypeRef::named_list("A"))))
            .finish()
            .unwrap();

        assert_eq!(names(&schema), ["A", "B", "Query"]);
    }

    #[test]
    fn extra_types_are_kept() {
        let schema = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named(TypeRef::STRING))))
            .extra_type(Object::new("Orphan").field(Field::new("x", TypeRef::named(TypeRef::FLOAT))))
            .finish()
            .unwrap();

        assert!(schema.get_type("Orphan").is_some());
        assert!(schema.get_type("Float").is_some());
    }

    #[test]
    fn unknown_references_are_reported() {
        let error = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named("Missing"))))
            .finish()
            .unwrap_err();

        assert_eq!(
            error,
            SchemaError::UnknownType {
                name: "Missing".to_string(),
                referenced_by: "Query".to_string()
            }
        );
    }

    #[test]
    fn duplicate_names_are_reported() {
        let error = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named("A"))))
            .register(Object::new("A"))
            .register(Object::new("A"))
            .finish()
            .unwrap_err();

        assert_eq!(error, SchemaError::DuplicateType("A".to_string()));

        let error = Schema::build(Object::new("Query"))
            .register(Object::new("Query"))
            .finish()
            .unwrap_err();

        assert_eq!(error, SchemaError::DuplicateType("Query".to_string()));
    }
}
