//! # JSON Conversion
//!
//! The `graphql_composer::json` module contains utilities to convert composer [`Value`]s from and
//! to `serde_json` values. This is mostly useful for default values and extension metadata that
//! originate from configuration files or from introspection results.
//!
//! The [ValueToJson] trait allows conversion to `serde_json` values using a `to_json` method on
//! any given value. [`Value`] also implements [`serde::Serialize`] directly.
//!
//! The module otherwise only contains a handful of utility functions:
//!
//! - [value_from_json] is used to convert a JSON value to a [`Value`] while casting it to an input
//!   type of a composer.
//! - [value_from_json_untyped] is used to convert a JSON value without casting.
//! - [extensions_from_json] is used to create an [`Extensions`](crate::value::Extensions) map
//!   from a JSON object.
//!
//! [`Value`]: crate::value::Value

#[cfg(feature = "json")]
extern crate serde_json;

#[cfg(feature = "json")]
extern crate serde;

mod conversion;
mod values;

pub use conversion::*;
pub use values::*;
