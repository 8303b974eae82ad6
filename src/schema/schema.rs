use crate::composer::DirectiveLocation;
use crate::context::{ASTContext, DefaultIn};
use crate::value::Extensions;
use bumpalo::collections::Vec;
use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;
use std::fmt;

/// The kind of operation that a root type serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    /// The fixed registry key under which a composer stores this root type.
    #[inline]
    pub fn root_key(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }

    /// The keyword used for this operation in a `schema { }` definition.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    pub fn from_root_key(key: &str) -> Option<Self> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.root_key() == key)
    }
}

/// Schema Definition
///
/// A built schema is the flattened, arena-allocated result of
/// [`SchemaComposer::build_schema`](crate::composer::SchemaComposer::build_schema). Unlike the
/// composer's type graph it refers to types only by name and is never mutated after it's built.
/// [Reference](https://spec.graphql.org/October2021/#sec-Schema)
#[derive(Debug, Clone, PartialEq)]
pub struct Schema<'a> {
    pub(crate) query_type: Option<&'a SchemaObject<'a>>,
    pub(crate) mutation_type: Option<&'a SchemaObject<'a>>,
    pub(crate) subscription_type: Option<&'a SchemaObject<'a>>,
    pub(crate) types:
        hashbrown::HashMap<&'a str, &'a SchemaType<'a>, DefaultHashBuilder, &'a bumpalo::Bump>,
    /// Type names in the order the types were added
    pub(crate) type_names: Vec<'a, &'a str>,
    pub(crate) directives: Vec<'a, &'a SchemaDirective<'a>>,
    pub(crate) description: Option<&'a str>,
    pub(crate) extensions: Extensions,
}

impl<'a> DefaultIn<'a> for Schema<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types: HashMap::new_in(arena),
            type_names: Vec::new_in(arena),
            directives: Vec::new_in(arena),
            description: None,
            extensions: Extensions::new(),
        }
    }
}

impl<'a> Schema<'a> {
    /// Returns whether the schema is a default, empty schema
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.query_type.is_none()
            && self.mutation_type.is_none()
            && self.subscription_type.is_none()
    }

    /// Returns the root object type for query operations
    #[inline]
    pub fn query_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.query_type
    }

    /// Returns the root object type for mutation operations
    #[inline]
    pub fn mutation_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.mutation_type
    }

    /// Returns the root object type for subscription operations
    #[inline]
    pub fn subscription_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.subscription_type
    }

    /// Returns the appropriate object type depending on the passed operation kind
    #[inline]
    pub fn get_root_type(&self, operation_kind: OperationKind) -> Option<&'a SchemaObject<'a>> {
        match operation_kind {
            OperationKind::Query => self.query_type,
            OperationKind::Mutation => self.mutation_type,
            OperationKind::Subscription => self.subscription_type,
        }
    }

    /// Retrieves a kind by name from known schema types.
    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&'a SchemaType<'a>> {
        self.types.get(name).copied()
    }

    /// Iterates over all types in the order they were added to the schema.
    pub fn types(&self) -> impl Iterator<Item = &'a SchemaType<'a>> + '_ {
        self.type_names
            .iter()
            .filter_map(move |name| self.types.get(name).copied())
    }

    #[inline]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn directives(&self) -> &[&'a SchemaDirective<'a>] {
        &self.directives
    }

    pub fn get_directive(&self, name: &str) -> Option<&'a SchemaDirective<'a>> {
        self.directives
            .iter()
            .find(|directive| directive.name == name)
            .copied()
    }

    #[inline]
    pub fn description(&self) -> Option<&'a str> {
        self.description
    }

    #[inline]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub(crate) fn add_type(&mut self, schema_type: &'a SchemaType<'a>) {
        let name = schema_type.name();
        if self.types.insert(name, schema_type).is_none() {
            self.type_names.push(name);
        }
    }
}

/// Generic trait for any schema type that implements fields
pub trait SchemaFields<'a>: Sized {
    /// Add a new [SchemaField] to the list of fields
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>);

    /// Get all fields in declaration order
    fn get_fields(&self) -> &[&'a SchemaField<'a>];

    /// Get a known field by name
    fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.get_fields()
            .iter()
            .find(|field| field.name == name)
            .copied()
    }
}

/// Generic trait for any schema type that implements interfaces
pub trait SchemaInterfaces<'a>: Sized {
    /// Add a new [SchemaInterface] to the list of implemented interfaces
    fn add_interface(&mut self, ctx: &'a ASTContext, interface: &'a str);

    /// Get list of implemented [SchemaInterface]s
    fn get_interfaces(&self) -> &[&'a str];
}

/// Generic trait for any schema type that has possible types
pub trait SchemaPossibleTypes<'a>: Sized {
    /// Add a new [SchemaObject] to the list of possible types
    fn add_possible_type(&mut self, ctx: &'a ASTContext, object: &'a str);

    /// Get list of possible [SchemaObject] types
    fn get_possible_types(&self) -> &[&'a str];

    /// Get a specific possible type by name if it exists on the type
    #[inline]
    fn get_possible_type(&self, name: &str) -> Option<&'a str> {
        self.get_possible_types()
            .iter()
            .find(|possible_type| **possible_type == name)
            .copied()
    }
}

/// An Object type definition.
///
/// Most types in GraphQL are objects and define a set of fields and the interfaces they implement.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaObject<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub(crate) fields: Vec<'a, &'a SchemaField<'a>>,
    pub(crate) interfaces: Vec<'a, &'a str>,
}

impl<'a> SchemaObject<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaObject {
            name,
            description: None,
            fields: Vec::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
        }
    }
}

impl<'a> SchemaFields<'a> for SchemaObject<'a> {
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>) {
        self.fields.push(ctx.alloc(field));
    }

    #[inline]
    fn get_fields(&self) -> &[&'a SchemaField<'a>] {
        &self.fields
    }
}

impl<'a> SchemaInterfaces<'a> for SchemaObject<'a> {
    fn add_interface(&mut self, _ctx: &'a ASTContext, interface: &'a str) {
        self.interfaces.push(interface);
    }

    #[inline]
    fn get_interfaces(&self) -> &[&'a str] {
        &self.interfaces
    }
}

/// An Interface type definition.
///
/// Any object or other interfaces may implement one or more interfaces and must then adhere to the
/// definition of this interface. A field that returns an interface as its return type may return
/// any object that implements this interface.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInterface<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub(crate) fields: Vec<'a, &'a SchemaField<'a>>,
    pub(crate) interfaces: Vec<'a, &'a str>,
    pub(crate) possible_interfaces: Vec<'a, &'a str>,
    pub(crate) possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaInterface<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaInterface {
            name,
            description: None,
            fields: Vec::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
            possible_interfaces: Vec::new_in(&ctx.arena),
            possible_types: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a new [SchemaInterface] to the list that implements this [SchemaInterface]
    pub fn add_possible_interface(&mut self, _ctx: &'a ASTContext, interface: &'a str) {
        self.possible_interfaces.push(interface);
    }

    /// Get list of possible [SchemaInterface]s that implement this [SchemaInterface]
    #[inline]
    pub fn get_possible_interfaces(&self) -> &[&'a str] {
        &self.possible_interfaces
    }
}

impl<'a> SchemaFields<'a> for SchemaInterface<'a> {
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>) {
        self.fields.push(ctx.alloc(field));
    }

    #[inline]
    fn get_fields(&self) -> &[&'a SchemaField<'a>] {
        &self.fields
    }
}

impl<'a> SchemaInterfaces<'a> for SchemaInterface<'a> {
    fn add_interface(&mut self, _ctx: &'a ASTContext, interface: &'a str) {
        self.interfaces.push(interface);
    }

    #[inline]
    fn get_interfaces(&self) -> &[&'a str] {
        &self.interfaces
    }
}

impl<'a> SchemaPossibleTypes<'a> for SchemaInterface<'a> {
    fn add_possible_type(&mut self, _ctx: &'a ASTContext, object: &'a str) {
        self.possible_types.push(object);
    }

    #[inline]
    fn get_possible_types(&self) -> &[&'a str] {
        &self.possible_types
    }
}

/// An object Field type definition.
///
/// A field is like a function that given its arguments as input values produces an output value.
/// [Reference](https://spec.graphql.org/October2021/#FieldsDefinition)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub arguments: Vec<'a, SchemaInputField<'a>>,
    pub output_type: &'a TypeRef<'a>,
    pub deprecation_reason: Option<&'a str>,
}

impl<'a> SchemaField<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str, output_type: &'a TypeRef<'a>) -> Self {
        SchemaField {
            name,
            description: None,
            arguments: Vec::new_in(&ctx.arena),
            output_type,
            deprecation_reason: None,
        }
    }

    pub fn add_argument(&mut self, _ctx: &'a ASTContext, arg: SchemaInputField<'a>) {
        self.arguments.push(arg);
    }

    #[inline]
    pub fn get_argument(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// A Union type definition.
///
/// A union contains a list of possible types that can be returned in its stead when its defined as
/// an output type.
/// [Reference](https://spec.graphql.org/October2021/#sec-Unions)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaUnion<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaUnion<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaUnion {
            name,
            description: None,
            possible_types: Vec::new_in(&ctx.arena),
        }
    }

}

impl<'a> SchemaPossibleTypes<'a> for SchemaUnion<'a> {
    fn add_possible_type(&mut self, _ctx: &'a ASTContext, object: &'a str) {
        self.possible_types.push(object);
    }

    #[inline]
    fn get_possible_types(&self) -> &[&'a str] {
        &self.possible_types
    }
}

/// A Scalar type definition.
///
/// Scalars represent primitive leaf values in GraphQL that are represented with a specific
/// serializer and deserializer, which makes the values returnable to a GraphQL client or readable
/// by a GraphQL API.
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaScalar<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> SchemaScalar<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaScalar {
            name,
            description: None,
        }
    }
}

/// An Enum type definition with its values in declaration order.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enums)
#[derive(Debug, PartialEq, Clone)]
pub struct SchemaEnum<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub values: Vec<'a, SchemaEnumValue<'a>>,
}

impl<'a> SchemaEnum<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaEnum {
            name,
            description: None,
            values: Vec::new_in(&ctx.arena),
        }
    }

    pub fn add_value(&mut self, _ctx: &'a ASTContext, value: SchemaEnumValue<'a>) {
        self.values.push(value);
    }

    pub fn get_value(&self, name: &str) -> Option<&SchemaEnumValue<'a>> {
        self.values.iter().find(|value| value.name == name)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SchemaEnumValue<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub deprecation_reason: Option<&'a str>,
}

impl<'a> SchemaEnumValue<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaEnumValue {
            name,
            description: None,
            deprecation_reason: None,
        }
    }
}

/// An Input Object type definition.
///
/// Inputs, such as arguments, may sometimes be nested and accept objects that must adhere to the
/// shape of an Input Object definition. This is often used to represent more complex inputs.
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInputObject<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub fields: Vec<'a, SchemaInputField<'a>>,
}

impl<'a> SchemaInputObject<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaInputObject {
            name,
            description: None,
            fields: Vec::new_in(&ctx.arena),
        }
    }

    pub fn add_field(&mut self, _ctx: &'a ASTContext, field: SchemaInputField<'a>) {
        self.fields.push(field);
    }

    pub fn get_field(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// An argument or input field. Default values are kept as printed GraphQL literals.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SchemaInputField<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub input_type: &'a TypeRef<'a>,
    pub default_value: Option<&'a str>,
    pub deprecation_reason: Option<&'a str>,
}

impl<'a> SchemaInputField<'a> {
    #[inline]
    pub fn new(name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        SchemaInputField {
            name,
            description: None,
            input_type,
            default_value: None,
            deprecation_reason: None,
        }
    }
}

/// A directive declaration.
#[derive(Debug, PartialEq, Clone)]
pub struct SchemaDirective<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub arguments: Vec<'a, SchemaInputField<'a>>,
    pub locations: Vec<'a, DirectiveLocation>,
    pub is_repeatable: bool,
}

impl<'a> SchemaDirective<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaDirective {
            name,
            description: None,
            arguments: Vec::new_in(&ctx.arena),
            locations: Vec::new_in(&ctx.arena),
            is_repeatable: false,
        }
    }
}

/// A named type enum that represents all possible GraphQL definition types.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SchemaType<'a> {
    InputObject(&'a SchemaInputObject<'a>),
    Object(&'a SchemaObject<'a>),
    Union(&'a SchemaUnion<'a>),
    Interface(&'a SchemaInterface<'a>),
    Scalar(&'a SchemaScalar<'a>),
    Enum(&'a SchemaEnum<'a>),
}

impl<'a> SchemaType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            SchemaType::InputObject(x) => x.name,
            SchemaType::Object(x) => x.name,
            SchemaType::Union(x) => x.name,
            SchemaType::Interface(x) => x.name,
            SchemaType::Scalar(x) => x.name,
            SchemaType::Enum(x) => x.name,
        }
    }

    #[inline]
    pub fn description(&self) -> Option<&'a str> {
        match self {
            SchemaType::InputObject(x) => x.description,
            SchemaType::Object(x) => x.description,
            SchemaType::Union(x) => x.description,
            SchemaType::Interface(x) => x.description,
            SchemaType::Scalar(x) => x.description,
            SchemaType::Enum(x) => x.description,
        }
    }

    pub fn object(&self) -> Option<&'a SchemaObject<'a>> {
        match self {
            SchemaType::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn input_object(&self) -> Option<&'a SchemaInputObject<'a>> {
        match self {
            SchemaType::InputObject(x) => Some(x),
            _ => None,
        }
    }

    pub fn interface(&self) -> Option<&'a SchemaInterface<'a>> {
        match self {
            SchemaType::Interface(x) => Some(x),
            _ => None,
        }
    }

    pub fn union_type(&self) -> Option<&'a SchemaUnion<'a>> {
        match self {
            SchemaType::Union(x) => Some(x),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&'a SchemaEnum<'a>> {
        match self {
            SchemaType::Enum(x) => Some(x),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
pub enum TypeRef<'a> {
    Type(&'a str),
    ListType(&'a TypeRef<'a>),
    NonNullType(&'a TypeRef<'a>),
}

impl<'a> TypeRef<'a> {
    /// Looks up the named type at the core of this reference.
    #[inline]
    pub fn of_type(&self, schema: &Schema<'a>) -> Option<&'a SchemaType<'a>> {
        match self {
            TypeRef::Type(of_type) => schema.get_type(of_type),
            TypeRef::ListType(of_type) => of_type.of_type(schema),
            TypeRef::NonNullType(of_type) => of_type.of_type(schema),
        }
    }

    /// Returns the name of the named type at the core of this reference.
    pub fn named_type(&self) -> &'a str {
        match self {
            TypeRef::Type(name) => name,
            TypeRef::ListType(of_type) | TypeRef::NonNullType(of_type) => of_type.named_type(),
        }
    }
}

impl<'a> fmt::Display for TypeRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Type(name) => f.write_str(name),
            TypeRef::ListType(of_type) => write!(f, "[{}]", of_type),
            TypeRef::NonNullType(of_type) => write!(f, "{}!", of_type),
        }
    }
}

/// Types only ever refer to each other by name, so printing a reference never recurses into
/// the referenced type.
impl<'a> fmt::Debug for TypeRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(arg0) => f.debug_tuple("Type").field(&arg0).finish(),
            Self::ListType(arg0) => f.debug_tuple("ListType").field(arg0).finish(),
            Self::NonNullType(arg0) => f.debug_tuple("NonNullType").field(arg0).finish(),
        }
    }
}

impl<'a> PartialEq for TypeRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Type(left), Self::Type(right)) => left == right,
            (Self::ListType(left), Self::ListType(right)) => left == right,
            (Self::NonNullType(left), Self::NonNullType(right)) => left == right,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_keep_insertion_order() {
        let ctx = ASTContext::new();
        let mut node = SchemaInterface::new(&ctx, "Node");
        node.add_possible_type(&ctx, "User");
        let node = ctx.alloc(node);

        let mut user = SchemaObject::new(&ctx, "User");
        user.add_interface(&ctx, "Node");
        let user = ctx.alloc(user);

        let mut result = SchemaUnion::new(&ctx, "Result");
        result.add_possible_type(&ctx, "User");
        let result = ctx.alloc(result);

        let mut schema = Schema::default_in(&ctx.arena);
        schema.add_type(ctx.alloc(SchemaType::Interface(node)));
        schema.add_type(ctx.alloc(SchemaType::Object(user)));
        schema.add_type(ctx.alloc(SchemaType::Union(result)));

        assert_eq!(node.get_possible_type("User"), Some("User"));
        assert_eq!(user.get_interfaces(), ["Node"]);
        assert_eq!(result.get_possible_types(), ["User"]);

        let names: std::vec::Vec<&str> = schema.types().map(|t| t.name()).collect();
        assert_eq!(names, ["Node", "User", "Result"]);
    }

    #[test]
    fn type_refs_print_and_resolve() {
        let ctx = ASTContext::new();
        let mut schema = Schema::default_in(&ctx.arena);
        schema.add_type(ctx.alloc(SchemaType::Scalar(ctx.alloc(SchemaScalar::new("String")))));

        let named = ctx.alloc(TypeRef::Type("String"));
        let type_ref = TypeRef::NonNullType(ctx.alloc(TypeRef::ListType(named)));
        assert_eq!(type_ref.to_string(), "[String]!");
        assert_eq!(type_ref.named_type(), "String");
        assert_eq!(type_ref.of_type(&schema).map(|t| t.name()), Some("String"));
        assert_eq!(OperationKind::from_root_key("Mutation"), Some(OperationKind::Mutation));
    }
}
