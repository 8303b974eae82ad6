//! # Composing Schemas
//!
//! The `graphql_composer::composer` module contains the [SchemaComposer], a mutable registry of
//! named GraphQL types that may refer to each other in any shape, including cycles. Type nodes
//! live in the composer's [TypeRegistry] and are addressed by [TypeId] handles, while references
//! between them are [TypeRef] values made of list, non-null and deferred wrappers around those
//! handles.
//!
//! A composer may be cloned, with a deep copy of every node and an [IdentityMap] keeping shared
//! structure shared, and merged with other composers or with built runtime
//! [`Schema`](crate::schema::Schema) values. Once it's complete, [SchemaComposer::build_schema]
//! turns it into an immutable schema.
//!
//! ```
//! use graphql_composer::composer::*;
//!
//! let mut composer = SchemaComposer::new();
//! let user = composer.create_object_tc("User").unwrap();
//! let id = composer.type_ref("ID!").unwrap();
//! composer.object_mut(user).unwrap().set_field("id", Field::new(id)).unwrap();
//!
//! let query = composer.query_tc().unwrap();
//! let me = composer.type_ref("User").unwrap();
//! composer.object_mut(query).unwrap().set_field("me", Field::new(me)).unwrap();
//!
//! let copy = composer.clone_schema().unwrap();
//! assert_eq!(copy.object("Query").unwrap().field_names(), ["me"]);
//! ```

mod build;
mod clone;
mod directive;
mod fields;
mod merge;
mod named;
mod registry;
mod schema_composer;
mod type_ref;
mod types;

pub use build::BuildSchemaOptions;
pub use clone::{clone_type_to, IdentityMap};
pub use directive::{
    specified_directives, Directive, DirectiveArgument, DirectiveDefinition, DirectiveLocation,
    DEFAULT_DEPRECATION_REASON,
};
pub use fields::{ComposeFields, ComposeInterfaces, EnumValue, Field, InputValue};
pub use named::{
    is_builtin_scalar, validate_name, Annotated, Annotations, NamedType, TypeKind, BUILTIN_SCALARS,
};
pub use registry::{SchemaId, TypeId, TypeKey, TypeRegistry};
pub use schema_composer::{AddType, SchemaComposer};
pub use type_ref::{DeferredType, ListType, NonNullType, TypeExpr, TypeRef};
pub use types::{
    EnumType, InputObjectType, InterfaceType, ObjectType, ScalarDefinition, ScalarType, UnionType,
};

pub(crate) use directive::deprecation_reason;
