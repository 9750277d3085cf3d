use std::fmt::{self, Display, Formatter};

/// A reference to a named type, optionally wrapped in list and non-null
/// modifiers.
///
/// Named types are referenced by name and looked up in the schema registry,
/// which lets object types refer to each other in cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub const INT: &'static str = "Int";
    pub const FLOAT: &'static str = "Float";
    pub const STRING: &'static str = "String";
    pub const BOOLEAN: &'static str = "Boolean";
    pub const ID: &'static str = "ID";

    /// `T`
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }

    /// `T!`
    pub fn named_nn(name: impl Into<String>) -> TypeRef {
        TypeRef::named(name).non_null()
    }

    /// `[T]`
    pub fn named_list(name: impl Into<String>) -> TypeRef {
        TypeRef::named(name).list()
    }

    /// `[T!]`
    pub fn named_nn_list(name: impl Into<String>) -> TypeRef {
        TypeRef::named_nn(name).list()
    }

    /// `[T]!`
    pub fn named_list_nn(name: impl Into<String>) -> TypeRef {
        TypeRef::named_list(name).non_null()
    }

    /// `[T!]!`
    pub fn named_nn_list_nn(name: impl Into<String>) -> TypeRef {
        TypeRef::named_nn_list(name).non_null()
    }

    #[must_use]
    pub fn non_null(self) -> TypeRef {
        match self {
            TypeRef::NonNull(_) => self,
            _ => TypeRef::NonNull(Box::new(self)),
        }
    }

    #[must_use]
    pub fn list(self) -> TypeRef {
        TypeRef::List(Box::new(self))
    }

    /// The innermost named type.
    pub fn type_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.type_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRef;

    #[test]
    fn display_and_unwrap() {
        let ty = TypeRef::named_nn_list_nn("Post");

        assert_eq!(ty.to_string(), "[Post!]!");
        assert_eq!(ty.type_name(), "Post");
        assert!(ty.is_non_null());
        assert!(ty.is_list());
        assert!(!TypeRef::named_nn("ID").is_list());
    }

    #[test]
    fn non_null_is_idempotent() {
        assert_eq!(TypeRef::named_nn("ID").non_null(), TypeRef::named_nn("ID"));
    }
}
