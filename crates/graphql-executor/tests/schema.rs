use graphql_executor::{
    Directive, DirectiveLocation, Enum, Field, InputObject, InputValue, Interface, Object, Schema, SchemaError, TypeKind,
    TypeRef, Union,
};

#[test]
fn sdl_lists_reachable_types_in_discovery_order() {
    let schema = Schema::build(
        Object::new("Query")
            .field(
                Field::new("user", TypeRef::named("User"))
                    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID))),
            )
            .field(
                Field::new("color", TypeRef::named_nn("Color"))
                    .argument(InputValue::new("filter", TypeRef::named("Filter"))),
            ),
    )
    .register(
        Object::new("User")
            .description("A person")
            .implement("Node")
            .field(Field::new("id", TypeRef::named_nn(TypeRef::ID)))
            .field(Field::new("friends", TypeRef::named_nn_list_nn("User"))),
    )
    .register(Interface::new("Node").field(Field::new("id", TypeRef::named_nn(TypeRef::ID))))
    .register(Enum::new("Color").items(["RED", "GREEN"]))
    .register(InputObject::new("Filter").field(InputValue::new("limit", TypeRef::named(TypeRef::INT)).default_value(10)))
    .register(Union::new("Unused").possible_type("User"))
    .directive(
        Directive::new("cached")
            .argument(InputValue::new("ttl", TypeRef::named(TypeRef::INT)))
            .location(DirectiveLocation::FieldDefinition),
    )
    .finish()
    .unwrap();

    let expected = "\
directive @cached(ttl: Int) on FIELD_DEFINITION

type Query {
\tuser(id: ID!): User
\tcolor(filter: Filter): Color!
}

\"\"\"
A person
\"\"\"
type User implements Node {
\tid: ID!
\tfriends: [User!]!
}

interface Node {
\tid: ID!
}

enum Color {
\tRED
\tGREEN
}

input Filter {
\tlimit: Int = 10
}

";

    assert_eq!(schema.sdl(), expected);
    assert!(schema.get_type("Unused").is_none());
    assert_eq!(schema.get_type("Filter").map(|ty| ty.kind()), Some(TypeKind::InputObject));
    assert_eq!(schema.get_type("Int").map(|ty| ty.kind()), Some(TypeKind::Scalar));
}

#[test]
fn sdl_names_non_default_root_types() {
    let schema = Schema::build(Object::new("Root").field(Field::new("ok", TypeRef::named(TypeRef::BOOLEAN))))
        .mutation(Object::new("Mutation").field(Field::new("ok", TypeRef::named(TypeRef::BOOLEAN))))
        .finish()
        .unwrap();

    assert_eq!(
        schema.sdl(),
        "type Root {\n\tok: Boolean\n}\n\ntype Mutation {\n\tok: Boolean\n}\n\nschema {\n\tquery: Root\n\tmutation: Mutation\n}\n"
    );
}

#[test]
fn mutually_recursive_types_are_registered_once() {
    let schema = Schema::build(Object::new("Query").field(Field::new("author", TypeRef::named("Author"))))
        .register(Object::new("Author").field(Field::new("books", TypeRef::named_nn_list_nn("Book"))))
        .register(Object::new("Book").field(Field::new("author", TypeRef::named_nn("Author"))))
        .finish()
        .unwrap();

    let names = schema.types().map(|ty| ty.name()).collect::<Vec<_>>();
    assert_eq!(names, ["Query", "Author", "Book"]);
}

#[test]
fn user_scalars_replace_builtins() {
    let schema = Schema::build(Object::new("Query").field(Field::new("id", TypeRef::named(TypeRef::ID))))
        .register(graphql_executor::Scalar::new("ID").description("Opaque identifier"))
        .finish()
        .unwrap();

    assert_eq!(
        schema.get_type("ID").and_then(|ty| ty.description()),
        Some("Opaque identifier")
    );
}

#[test]
fn construction_errors() {
    let error = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named_list("Missing"))))
        .finish()
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Type \"Missing\" referenced by \"Query\" is not registered."
    );

    let error = Schema::build(Object::new("Query"))
        .register(Enum::new("Color"))
        .register(Enum::new("Color"))
        .finish()
        .unwrap_err();

    assert_eq!(error, SchemaError::DuplicateType("Color".to_string()));
}
