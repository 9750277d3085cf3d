use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use futures_util::FutureExt;
use graphql_executor::{parse_query, Field, Object, Schema, TypeRef, Union, Value};

#[test]
fn unknown_field_on_query() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let schema = Schema::build(
        Object::new("Query").field(Field::new("hello", TypeRef::named(TypeRef::STRING)).resolve(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(Value::from("hi")) }.boxed()
        })),
    )
    .finish()
    .unwrap();

    let document = parse_query("{ hello ghost }").unwrap();
    let errors = schema.validate(&document);

    insta::assert_json_snapshot!(errors, @r###"
    [
      {
        "message": "Cannot query field \"ghost\" on type \"Query\".",
        "locations": [
          {
            "line": 1,
            "column": 9
          }
        ]
      }
    ]
    "###);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn selections_below_unions_are_not_checked() {
    let schema = Schema::build(Object::new("Query").field(Field::new("result", TypeRef::named("Result"))))
        .register(Union::new("Result").possible_type("Ok"))
        .register(Object::new("Ok").field(Field::new("value", TypeRef::named(TypeRef::INT))))
        .finish()
        .unwrap();

    let document = parse_query("{ result { anything ... on Ok { nothing } } }").unwrap();
    assert!(schema.validate(&document).is_empty());
}

#[test]
fn every_operation_is_validated() {
    let schema = Schema::build(Object::new("Query").field(Field::new("a", TypeRef::named(TypeRef::INT))))
        .finish()
        .unwrap();

    let document = parse_query("query One { b } query Two { c } mutation Three { a }").unwrap();
    let messages = schema
        .validate(&document)
        .into_iter()
        .map(|error| error.message)
        .collect::<Vec<_>>();

    assert_eq!(
        messages,
        [
            "Cannot query field \"b\" on type \"Query\".",
            "Cannot query field \"c\" on type \"Query\".",
            "Schema is not configured to execute mutation operation.",
        ]
    );
}
