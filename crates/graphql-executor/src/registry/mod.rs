//! Type descriptors: the named types of a schema and the references between
//! them.

mod export_sdl;
mod field;
mod scalars;
mod type_ref;
mod types;

pub(crate) use export_sdl::export_sdl;
pub(crate) use field::BoxResolverFn;
pub use field::{Field, FieldFuture, InputValue, ResolveInfo, ResolverContext, SubscriptionFuture};
pub use scalars::Scalar;
pub use type_ref::TypeRef;
pub use types::{
    Directive, DirectiveLocation, Enum, EnumItem, InputObject, Interface, Object, Type, TypeKind, Union,
};
