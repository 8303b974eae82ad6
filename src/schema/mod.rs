//! # Built Schemas
//!
//! The `graphql_composer::schema` module contains the immutable [Schema] that
//! [`SchemaComposer::build_schema`](crate::composer::SchemaComposer::build_schema) produces. A
//! built schema is allocated on an [`ASTContext`](crate::context::ASTContext) arena and refers to
//! its types by name, so it may be inspected cheaply:
//!
//! ```
//! use graphql_composer::{composer::*, context::ASTContext, schema::*};
//!
//! let composer = SchemaComposer::from_sdl(
//!     "type Query { node: Node } interface Node { id: ID } type User implements Node { id: ID }",
//! )
//! .unwrap();
//!
//! let ctx = ASTContext::new();
//! let options = BuildSchemaOptions {
//!     keep_unused_types: true,
//!     ..BuildSchemaOptions::default()
//! };
//! let schema = composer.build_schema(&ctx, options).unwrap();
//! let node = schema.get_type("Node").and_then(|t| t.interface()).unwrap();
//! assert_eq!(node.get_possible_types(), ["User"]);
//! let user = schema.get_type("User").and_then(|t| t.object()).unwrap();
//! assert_eq!(user.get_interfaces(), ["Node"]);
//! ```
//!
//! Built schemas may also be merged back into a composer with
//! [`SchemaComposer::merge_schema`](crate::composer::SchemaComposer::merge_schema).
//!
//! [More information on the Schema struct.](Schema)

#[allow(clippy::module_inception)]
pub mod schema;

pub use schema::*;
