//! `graphql_composer`
//! =========
//!
//! _Programmatic GraphQL schema composition._
//!
//! The **`graphql_composer`** library builds GraphQL schemas in code rather than only from
//! source text. A [`SchemaComposer`](composer::SchemaComposer) is a mutable registry of named
//! types, which may be created one by one, loaded from SDL, renamed, removed, and wired up
//! to each other in any shape, including cycles.
//!
//! Composers are meant to be combined. A whole composer can be deep-copied, a single type can be
//! cloned into another composer together with everything it depends on, and composers or built
//! schemas can be merged into each other. Shared structure stays shared across these operations,
//! since an [`IdentityMap`](composer::IdentityMap) remembers which node was already copied to
//! where.
//!
//! Once a composer is complete it's built into an immutable, arena-allocated
//! [`Schema`](schema::Schema), or printed back to SDL.
//!
//! ```
//! use graphql_composer::{composer::*, context::ASTContext, sdl::PrintOptions};
//!
//! let mut base = SchemaComposer::from_sdl("type Query { me: User } type User { id: ID! }").unwrap();
//! let extra = SchemaComposer::from_sdl("type User { name: String }").unwrap();
//! base.merge(&extra).unwrap();
//!
//! assert_eq!(base.object("User").unwrap().field_names(), ["id", "name"]);
//!
//! let ctx = ASTContext::new();
//! let schema = base.build_schema(&ctx, BuildSchemaOptions::default()).unwrap();
//! assert_eq!(schema.query_type().unwrap().name, "Query");
//! ```
//!
//! [A good place to start learning more about this crate is the `composer` module...](composer)

pub mod composer;
pub mod context;
pub mod error;
pub mod schema;
pub mod sdl;
pub mod value;

pub use bumpalo;

#[cfg(feature = "json")]
pub mod json;
