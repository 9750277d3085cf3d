use std::{
    any::{type_name, Any},
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use async_graphql_parser::{
    types::{Field as FieldNode, OperationDefinition},
    Positioned,
};
use futures_util::{future::BoxFuture, stream::BoxStream};
use indexmap::IndexMap;

use super::TypeRef;
use crate::{
    data::Data,
    error::{Error, FieldResult},
    path::QueryPath,
    response::Response,
    schema::Schema,
    value::{Arguments, Value, Variables},
};

/// What a resolver returns.
pub type FieldFuture<'a> = BoxFuture<'a, FieldResult<Value>>;

/// What a subscription root field's `subscribe` function returns: a stream
/// of execution results, handed to the caller as is.
pub type SubscriptionFuture<'a> = BoxFuture<'a, FieldResult<BoxStream<'static, Response>>>;

pub(crate) type BoxResolverFn = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

pub(crate) type BoxSubscribeFn = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> SubscriptionFuture<'a> + Send + Sync>;

/// Everything a resolver gets to see.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    /// The value of the object the field is resolved on.
    pub parent_value: &'a Value,
    pub args: &'a Arguments,
    pub info: &'a ResolveInfo<'a>,
    pub(crate) data: &'a Data,
}

impl<'a> ResolverContext<'a> {
    /// Per-request context data of type `D`.
    pub fn data<D: Any + Send + Sync>(&self) -> FieldResult<&'a D> {
        self.data
            .get::<D>()
            .ok_or_else(|| Error::new(format!("Data `{}` does not exist.", type_name::<D>())))
    }

    pub fn data_opt<D: Any + Send + Sync>(&self) -> Option<&'a D> {
        self.data.get::<D>()
    }
}

/// Metadata about the field being resolved.
pub struct ResolveInfo<'a> {
    pub field_name: &'a str,
    /// Every field node merged under this response key. The first one
    /// provides the name and arguments.
    pub field_nodes: &'a [&'a Positioned<FieldNode>],
    pub return_type: &'a TypeRef,
    pub parent_type: &'a str,
    pub path: &'a QueryPath,
    pub schema: &'a Schema,
    pub operation: &'a OperationDefinition,
    pub root_value: &'a Value,
    pub variables: &'a Variables,
}

impl ResolveInfo<'_> {
    pub fn alias(&self) -> Option<&str> {
        self.field_nodes
            .first()
            .and_then(|field| field.node.alias.as_ref())
            .map(|alias| alias.node.as_str())
    }
}

/// An output field of an object or interface type.
#[derive(Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) ty: TypeRef,
    pub(crate) arguments: IndexMap<String, InputValue>,
    pub(crate) resolver: Option<BoxResolverFn>,
    pub(crate) subscriber: Option<BoxSubscribeFn>,
}

impl Field {
    /// A field without a resolver reads the member of the same name from its
    /// parent value.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Field {
            name: name.into(),
            description: None,
            ty,
            arguments: IndexMap::new(),
            resolver: None,
            subscriber: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: InputValue) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    #[must_use]
    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Only meaningful on fields of the subscription root type.
    #[must_use]
    pub fn subscribe<F>(mut self, subscriber: F) -> Self
    where
        F: for<'a> Fn(ResolverContext<'a>) -> SubscriptionFuture<'a> + Send + Sync + 'static,
    {
        self.subscriber = Some(Arc::new(subscriber));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn arguments(&self) -> impl Iterator<Item = &InputValue> {
        self.arguments.values()
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }
}

impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver.is_some())
            .field("subscriber", &self.subscriber.is_some())
            .finish()
    }
}

/// An argument, or a field of an input object type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) ty: TypeRef,
    pub(crate) default_value: Option<Value>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        InputValue {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }
}
