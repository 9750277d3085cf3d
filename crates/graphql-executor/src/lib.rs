//! A GraphQL execution engine over programmatically built schemas.
//!
//! Types are described with the builders of [`registry`] and assembled into a
//! [`Schema`]. Documents come parsed from `async-graphql-parser`; the schema
//! executes, validates and subscribes to them.
//!
//! ```ignore
//! let schema = Schema::build(
//!     Object::new("Query").field(
//!         Field::new("hello", TypeRef::named_nn(TypeRef::STRING))
//!             .argument(InputValue::new("name", TypeRef::named_nn(TypeRef::STRING)))
//!             .resolve(|ctx| {
//!                 async move { Ok(Value::from(format!("Hello {}", ctx.args.try_get("name")?.as_str().unwrap_or_default()))) }
//!                     .boxed()
//!             }),
//!     ),
//! )
//! .finish()?;
//!
//! let response = schema.execute(Request::from_query(r#"{ hello(name: "World") }"#)?).await;
//! ```

mod context;
mod data;
mod error;
mod execute;
mod path;
pub mod registry;
mod request;
mod resolver_utils;
mod response;
mod schema;
mod subscription;
mod validation;
mod value;

pub use async_graphql_parser::{self as parser, parse_query};
pub use data::Data;
pub use error::{Error, ErrorExtensions, FieldResult, GraphqlError, GraphqlResult, Location, SchemaError};
pub use path::{PathSegment, QueryPath};
pub use registry::{
    Directive, DirectiveLocation, Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Interface, Object,
    ResolveInfo, ResolverContext, Scalar, SubscriptionFuture, Type, TypeKind, TypeRef, Union,
};
pub use request::{RawRequest, Request};
pub use response::Response;
pub use schema::{Schema, SchemaBuilder};
pub use value::{Arguments, Method, Value, Variables};
