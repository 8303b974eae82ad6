//! # Reading and writing SDL
//!
//! The `graphql_composer::sdl` module is the textual boundary of a
//! [`SchemaComposer`](crate::composer::SchemaComposer). SDL is lexed with [logos], parsed by
//! recursive descent into a [Document] that's allocated on an
//! [`ASTContext`](crate::context::ASTContext) arena, and then loaded into a composer in two
//! passes, so that types may refer to each other in any order. The printer turns a composer back
//! into SDL.
//!
//! ```
//! use graphql_composer::{composer::SchemaComposer, sdl::PrintOptions};
//!
//! let mut composer = SchemaComposer::new();
//! composer
//!     .add_type_defs("type Query { me: User } type User { name: String! }")
//!     .unwrap();
//! let sdl = composer.to_sdl(&PrintOptions::default()).unwrap();
//! assert!(sdl.starts_with("type Query {\n  me: User\n}"));
//! ```

mod lexer;
mod loader;
mod parse_ast;
mod printer;

#[cfg(test)]
mod tests;

pub mod parser;

pub use loader::parse_value;
pub use parse_ast::Document;
pub use parser::ParseSdl;
pub use printer::PrintOptions;
