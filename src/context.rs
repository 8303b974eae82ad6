//! # Arena Context
//!
//! SDL parse trees and built runtime schemas are allocated onto a single arena owned by an
//! [ASTContext]. Once the parsed document has been loaded into a composer, or once a built schema
//! is no longer needed, the entire arena is dropped at once.

use bumpalo::Bump;

/// A context which holds an arena allocator.
///
/// For the duration of parsing SDL and for the lifetime of a schema produced by
/// [`SchemaComposer::build_schema`](crate::composer::SchemaComposer::build_schema) it's
/// convenient to allocate memory in one chunk. This context represents the lifetime of both.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for the context's lifetime
    pub arena: Bump,
}

impl ASTContext {
    /// Create a new context with a preallocated arena.
    pub fn new() -> Self {
        let arena = Bump::new();
        ASTContext { arena }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    ///
    /// Values that own heap memory are never dropped, so only arena-friendly values should be
    /// allocated this way.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for creating arena-backed values, like maps or lists, which can't implement [Default]
/// since they require an allocator.
pub trait DefaultIn<'a> {
    fn default_in(arena: &'a Bump) -> Self;
}

impl<'a, T> DefaultIn<'a> for bumpalo::collections::Vec<'a, T> {
    #[inline]
    fn default_in(arena: &'a Bump) -> Self {
        bumpalo::collections::Vec::new_in(arena)
    }
}
