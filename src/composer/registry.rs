use super::named::NamedType;
use crate::error::{Error, Result};
use hashbrown::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SCHEMA_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies one generation of a [TypeRegistry].
///
/// Every registry receives a fresh id when it's created and when it's cleared, which invalidates
/// any [TypeId] handed out before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u32);

impl SchemaId {
    pub(crate) fn next() -> Self {
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle of a named type node, assigned when the node is allocated in its registry.
///
/// Handles are only valid for the registry that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId {
    schema: SchemaId,
    index: u32,
}

impl TypeId {
    #[inline]
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type#{}.{}", self.schema.0, self.index)
    }
}

/// A registry lookup key: either a registered key string, which usually is the type name, or
/// the node's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKey<'k> {
    Name(&'k str),
    Id(TypeId),
}

impl<'k> From<&'k str> for TypeKey<'k> {
    #[inline]
    fn from(name: &'k str) -> Self {
        TypeKey::Name(name)
    }
}

impl<'k> From<&'k String> for TypeKey<'k> {
    #[inline]
    fn from(name: &'k String) -> Self {
        TypeKey::Name(name.as_str())
    }
}

impl<'k> From<TypeId> for TypeKey<'k> {
    #[inline]
    fn from(id: TypeId) -> Self {
        TypeKey::Id(id)
    }
}

impl<'k> fmt::Display for TypeKey<'k> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Name(name) => f.write_str(name),
            TypeKey::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Name-keyed store of named type nodes.
///
/// The registry owns the node arena of a single schema. Nodes are allocated first and then
/// registered under one or more keys. Registering is "last write wins": callers are responsible
/// for keeping keys consistent, which the [`SchemaComposer`](super::SchemaComposer) does.
#[derive(Debug)]
pub struct TypeRegistry {
    schema: SchemaId,
    nodes: Vec<NamedType>,
    keys: HashMap<String, TypeId>,
    /// Maps each registered node to the key it was first registered under.
    identities: HashMap<TypeId, String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            schema: SchemaId::next(),
            nodes: Vec::new(),
            keys: HashMap::new(),
            identities: HashMap::new(),
        }
    }

    #[inline]
    pub fn schema_id(&self) -> SchemaId {
        self.schema
    }

    /// Moves a node into the arena without registering it under any key.
    pub(crate) fn alloc(&mut self, node: NamedType) -> TypeId {
        let id = TypeId {
            schema: self.schema,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(node);
        id
    }

    /// Checks whether a handle points into this registry's arena.
    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        id.schema == self.schema && id.index() < self.nodes.len()
    }

    pub fn node(&self, id: TypeId) -> Result<&NamedType> {
        if id.schema != self.schema {
            return Err(Error::not_found(format!(
                "{} belongs to a different schema.",
                id
            )));
        }
        self.nodes
            .get(id.index())
            .ok_or_else(|| Error::not_found(format!("{} does not exist.", id)))
    }

    pub fn node_mut(&mut self, id: TypeId) -> Result<&mut NamedType> {
        if id.schema != self.schema {
            return Err(Error::not_found(format!(
                "{} belongs to a different schema.",
                id
            )));
        }
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| Error::not_found(format!("{} does not exist.", id)))
    }

    /// Looks up a registered node by key or handle.
    pub fn get<'k>(&self, key: impl Into<TypeKey<'k>>) -> Result<TypeId> {
        match key.into() {
            TypeKey::Name(name) => self
                .keys
                .get(name)
                .copied()
                .ok_or_else(|| Error::not_found(format!("Type `{}` does not exist.", name))),
            TypeKey::Id(id) if self.identities.contains_key(&id) => Ok(id),
            TypeKey::Id(id) => Err(Error::not_found(format!("{} is not registered.", id))),
        }
    }

    #[inline]
    pub fn has<'k>(&self, key: impl Into<TypeKey<'k>>) -> bool {
        match key.into() {
            TypeKey::Name(name) => self.keys.contains_key(name),
            TypeKey::Id(id) => self.identities.contains_key(&id),
        }
    }

    /// Registers a node under a key, silently replacing whatever the key pointed at before.
    pub fn set<S: Into<String>>(&mut self, key: S, id: TypeId) {
        let key = key.into();
        if let Some(previous) = self.keys.insert(key.clone(), id) {
            if previous != id {
                self.forget_key(previous, &key);
            }
        }
        self.identities.entry(id).or_insert(key);
    }

    /// Removes a key, returning the node it pointed at.
    pub fn delete(&mut self, key: &str) -> Option<TypeId> {
        let id = self.keys.remove(key)?;
        self.forget_key(id, key);
        Some(id)
    }

    fn forget_key(&mut self, id: TypeId, key: &str) {
        if self.identities.get(&id).map(String::as_str) != Some(key) {
            return;
        }
        let alias = self
            .keys
            .iter()
            .filter(|(_, other)| **other == id)
            .map(|(alias, _)| alias.clone())
            .min();
        match alias {
            Some(alias) => {
                self.identities.insert(id, alias);
            }
            None => {
                self.identities.remove(&id);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Returns all registered keys with their nodes, ordered by node allocation and then by key.
    pub fn entries(&self) -> Vec<(&str, TypeId)> {
        let mut entries: Vec<(&str, TypeId)> = self
            .keys
            .iter()
            .map(|(key, id)| (key.as_str(), *id))
            .collect();
        entries.sort_by(|(left_key, left), (right_key, right)| {
            left.cmp(right).then_with(|| left_key.cmp(right_key))
        });
        entries
    }

    /// Returns every registered node exactly once, in allocation order.
    pub fn ids(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.identities.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drops all entries and nodes. Handles issued before are invalidated.
    pub fn clear(&mut self) {
        self.schema = SchemaId::next();
        self.nodes.clear();
        self.keys.clear();
        self.identities.clear();
    }
}
