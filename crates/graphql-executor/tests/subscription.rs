use futures_util::{stream::BoxStream, FutureExt, StreamExt};
use graphql_executor::{Error, Field, InputValue, Object, Request, Response, Schema, TypeRef, Value};
use serde_json::json;

fn schema() -> Schema {
    Schema::build(Object::new("Query").field(Field::new("noop", TypeRef::named(TypeRef::STRING))))
        .subscription(
            Object::new("Subscription")
                .field(
                    Field::new("countdown", TypeRef::named_nn(TypeRef::INT))
                        .argument(InputValue::new("from", TypeRef::named_nn(TypeRef::INT)))
                        .subscribe(|ctx| {
                            async move {
                                let from = ctx.args.try_get("from")?.as_i64().unwrap_or_default();
                                let schema = ctx.info.schema.clone();
                                let events = futures_util::stream::iter((0..=from).rev()).then(move |n| {
                                    let schema = schema.clone();
                                    async move {
                                        let request = Request::from_query("subscription { countdown }")
                                            .unwrap()
                                            .root_value(Value::object([("countdown", n)]));
                                        schema.execute(request).await
                                    }
                                });
                                Ok(events.boxed())
                            }
                            .boxed()
                        }),
                )
                .field(
                    Field::new("raw", TypeRef::named(TypeRef::STRING)).subscribe(|_| {
                        async {
                            let events = ["a", "b"].map(|event| Response::new(json!({"raw": event})));
                            Ok(futures_util::stream::iter(events).boxed())
                        }
                        .boxed()
                    }),
                )
                .field(Field::new("plain", TypeRef::named(TypeRef::STRING)))
                .field(Field::new("forbidden", TypeRef::named(TypeRef::STRING)).subscribe(|_| {
                    async { Err::<BoxStream<'static, Response>, _>(Error::new("not allowed")) }.boxed()
                })),
        )
        .finish()
        .unwrap()
}

async fn subscribe_err(schema: &Schema, query: &str) -> serde_json::Value {
    schema
        .subscribe(Request::from_query(query).unwrap())
        .await
        .err()
        .unwrap()
        .to_json()
}

#[tokio::test]
async fn events_are_executed_per_item() {
    let stream = schema()
        .subscribe(Request::from_query("subscription { countdown(from: 2) }").unwrap())
        .await
        .ok()
        .unwrap();

    let events = stream.map(|response| response.to_json()).collect::<Vec<_>>().await;

    assert_eq!(
        events,
        [
            json!({"data": {"countdown": 2}}),
            json!({"data": {"countdown": 1}}),
            json!({"data": {"countdown": 0}}),
        ]
    );
}

#[tokio::test]
async fn streams_are_handed_back_untouched() {
    let stream = schema()
        .subscribe(Request::from_query("subscription { alias: raw }").unwrap())
        .await
        .ok()
        .unwrap();

    let events = stream.collect::<Vec<_>>().await;

    assert_eq!(
        events,
        [Response::new(json!({"raw": "a"})), Response::new(json!({"raw": "b"}))]
    );
}

#[tokio::test]
async fn exactly_one_root_field() {
    let schema = schema();

    assert_eq!(
        subscribe_err(&schema, "subscription { raw countdown(from: 1) }").await,
        json!({
            "errors": [{
                "message": "Subscription must have exactly one root field.",
                "locations": [{"line": 1, "column": 1}]
            }]
        })
    );

    assert_eq!(
        subscribe_err(&schema, "subscription { ...Missing }").await,
        json!({
            "errors": [{
                "message": "Subscription must have exactly one root field.",
                "locations": [{"line": 1, "column": 1}]
            }]
        })
    );
}

#[tokio::test]
async fn root_field_needs_a_subscribe_function() {
    assert_eq!(
        subscribe_err(&schema(), "subscription { plain }").await,
        json!({
            "errors": [{
                "message": "Subscription field \"plain\" has no subscribe function.",
                "locations": [{"line": 1, "column": 16}]
            }]
        })
    );
}

#[tokio::test]
async fn subscribe_errors_are_fatal() {
    assert_eq!(
        subscribe_err(&schema(), "subscription { forbidden }").await,
        json!({
            "errors": [{
                "message": "not allowed",
                "locations": [{"line": 1, "column": 16}],
                "path": ["forbidden"]
            }]
        })
    );
}

#[tokio::test]
async fn schema_without_subscription_root() {
    let schema = Schema::build(Object::new("Query").field(Field::new("noop", TypeRef::named(TypeRef::STRING))))
        .finish()
        .unwrap();

    assert_eq!(
        subscribe_err(&schema, "subscription { noop }").await,
        json!({
            "errors": [{
                "message": "Schema is not configured to execute subscription operation.",
                "locations": [{"line": 1, "column": 1}]
            }]
        })
    );
}

#[tokio::test]
async fn only_subscription_operations_subscribe() {
    assert_eq!(
        subscribe_err(&schema(), "query Q { noop }").await,
        json!({
            "errors": [{
                "message": "Expected a subscription operation, found a query operation.",
                "locations": [{"line": 1, "column": 1}]
            }]
        })
    );
}
