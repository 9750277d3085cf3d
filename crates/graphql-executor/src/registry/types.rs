use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use async_graphql_value::ConstValue;
use indexmap::IndexMap;

use super::{Field, InputValue, ResolveInfo, Scalar};
use crate::{
    data::Data,
    error::{Error, FieldResult},
    value::Value,
};

/// Picks the concrete object type of a value of an abstract type.
///
/// The info is the one of the field returning the abstract type.
pub(crate) type ResolveTypeFn = Arc<dyn Fn(&Value, &Data, &ResolveInfo<'_>) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// A named type of the schema.
#[derive(Debug, Clone)]
pub enum Type {
    Scalar(Scalar),
    Object(Object),
    Interface(Interface),
    Union(Union),
    Enum(Enum),
    InputObject(InputObject),
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::Scalar(ty) => &ty.name,
            Type::Object(ty) => &ty.name,
            Type::Interface(ty) => &ty.name,
            Type::Union(ty) => &ty.name,
            Type::Enum(ty) => &ty.name,
            Type::InputObject(ty) => &ty.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Scalar(_) => TypeKind::Scalar,
            Type::Object(_) => TypeKind::Object,
            Type::Interface(_) => TypeKind::Interface,
            Type::Union(_) => TypeKind::Union,
            Type::Enum(_) => TypeKind::Enum,
            Type::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Output fields, for object and interface types.
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Type::Object(object) => object.get_field(name),
            Type::Interface(interface) => interface.get_field(name),
            _ => None,
        }
    }

    pub fn has_fields(&self) -> bool {
        matches!(self, Type::Object(_) | Type::Interface(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Type::Scalar(_) | Type::Enum(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Type::Interface(_) | Type::Union(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Type::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Type::Scalar(ty) => ty.description.as_deref(),
            Type::Object(ty) => ty.description.as_deref(),
            Type::Interface(ty) => ty.description.as_deref(),
            Type::Union(ty) => ty.description.as_deref(),
            Type::Enum(ty) => ty.description.as_deref(),
            Type::InputObject(ty) => ty.description.as_deref(),
        }
    }
}

macro_rules! impl_from_for_type {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Type {
                fn from(ty: $ty) -> Self {
                    Type::$ty(ty)
                }
            }
        )*
    };
}

impl_from_for_type!(Scalar, Object, Interface, Union, Enum, InputObject);

#[derive(Debug, Clone)]
pub struct Object {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) implements: Vec<String>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            implements: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn implement(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.implements.iter().any(|name| name == interface)
    }

    pub fn interfaces(&self) -> &[String] {
        &self.implements
    }
}

#[derive(Clone)]
pub struct Interface {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            resolve_type: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Data, &ResolveInfo<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

impl Debug for Interface {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("resolve_type", &self.resolve_type.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct Union {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) possible_types: Vec<String>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

impl Union {
    pub fn new(name: impl Into<String>) -> Self {
        Union {
            name: name.into(),
            description: None,
            possible_types: Vec::new(),
            resolve_type: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn possible_type(mut self, name: impl Into<String>) -> Self {
        self.possible_types.push(name.into());
        self
    }

    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Data, &ResolveInfo<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }
}

impl Debug for Union {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Union")
            .field("name", &self.name)
            .field("possible_types", &self.possible_types)
            .field("resolve_type", &self.resolve_type.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) value: Value,
}

impl EnumItem {
    /// The internal value defaults to the item name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        EnumItem {
            value: Value::String(name.clone()),
            name,
            description: None,
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An enum type: a bijection between item names and internal values.
#[derive(Debug, Clone)]
pub struct Enum {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) items: IndexMap<String, EnumItem>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum {
            name: name.into(),
            description: None,
            items: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn item(mut self, item: impl Into<EnumItem>) -> Self {
        let item = item.into();
        self.items.insert(item.name.clone(), item);
        self
    }

    #[must_use]
    pub fn items<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EnumItem>,
    {
        items.into_iter().fold(self, |ty, item| ty.item(item))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> impl Iterator<Item = &EnumItem> {
        self.items.values()
    }

    /// Internal value to item name.
    pub fn serialize(&self, value: &Value) -> FieldResult<serde_json::Value> {
        self.items
            .values()
            .find(|item| &item.value == value)
            .map(|item| serde_json::Value::String(item.name.clone()))
            .ok_or_else(|| Error::new(format!("Enum \"{}\" cannot represent value: {value:?}", self.name)))
    }

    /// Item name to internal value. Unknown names are undefined.
    pub fn parse_value(&self, name: &str) -> Option<Value> {
        self.items.get(name).map(|item| item.value.clone())
    }

    pub fn parse_literal(&self, value: &ConstValue) -> Option<Value> {
        match value {
            ConstValue::Enum(name) => self.parse_value(name.as_str()),
            ConstValue::String(name) => self.parse_value(name),
            _ => None,
        }
    }
}

impl From<&str> for EnumItem {
    fn from(name: &str) -> Self {
        EnumItem::new(name)
    }
}

impl From<String> for EnumItem {
    fn from(name: String) -> Self {
        EnumItem::new(name)
    }
}

/// An input object type. Only ever used to describe arguments and
/// variables.
#[derive(Debug, Clone)]
pub struct InputObject {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, InputValue>,
}

impl InputObject {
    pub fn new(name: impl Into<String>) -> Self {
        InputObject {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: InputValue) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &InputValue> {
        self.fields.values()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

/// A directive definition. Carried by the schema, never interpreted by the
/// executor.
#[derive(Debug, Clone)]
pub struct Directive {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) arguments: IndexMap<String, InputValue>,
    pub(crate) locations: Vec<DirectiveLocation>,
    pub(crate) is_repeatable: bool,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Directive {
            name: name.into(),
            description: None,
            arguments: IndexMap::new(),
            locations: Vec::new(),
            is_repeatable: false,
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
    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[DirectiveLocation] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_value::Name;

    use super::*;

    fn color() -> Enum {
        Enum::new("Color")
            .item(EnumItem::new("RED").value(0))
            .item(EnumItem::new("GREEN").value(1))
            .item("BLUE")
    }

    #[test]
    fn enum_maps_names_to_internal_values() {
        let color = color();

        assert_eq!(color.serialize(&Value::from(1)).unwrap(), serde_json::json!("GREEN"));
        assert_eq!(color.serialize(&Value::from("BLUE")).unwrap(), serde_json::json!("BLUE"));
        assert_eq!(color.parse_value("RED"), Some(Value::from(0)));
        assert_eq!(color.parse_value("PURPLE"), None);
        assert_eq!(
            color.parse_literal(&ConstValue::Enum(Name::new("GREEN"))),
            Some(Value::from(1))
        );
    }

    #[test]
    fn enum_rejects_unknown_internal_values() {
        let error = color().serialize(&Value::from(7)).unwrap_err();

        assert_eq!(error.message, "Enum \"Color\" cannot represent value: 7");
    }
}
