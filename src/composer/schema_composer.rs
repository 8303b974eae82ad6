use super::directive::{specified_directives, DirectiveDefinition};
use super::named::{is_builtin_scalar, validate_name, NamedType, TypeKind, BUILTIN_SCALARS};
use super::registry::{TypeId, TypeKey, TypeRegistry};
use super::type_ref::{DeferredType, TypeExpr, TypeRef};
use super::types::{EnumType, InputObjectType, InterfaceType, ObjectType, ScalarType, UnionType};
use crate::error::{Error, ErrorType, Result};
use crate::schema::OperationKind;
use std::rc::Rc;

thread_local! {
    /// Every composer on a thread hands out the same built-in scalar definitions.
    static BUILTIN_SCALAR_TYPES: Vec<ScalarType> = BUILTIN_SCALARS
        .iter()
        .filter_map(|name| ScalarType::new(*name).ok())
        .collect();
}

fn directive_name(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

fn builtin_scalar(name: &str) -> Option<ScalarType> {
    BUILTIN_SCALAR_TYPES.with(|scalars| scalars.iter().find(|scalar| scalar.name() == name).cloned())
}

/// Something that can be added to a composer with [SchemaComposer::add].
#[derive(Debug)]
pub enum AddType {
    /// A node that's already part of the composer's arena.
    Id(TypeId),
    /// A detached node that's moved into the composer.
    Type(NamedType),
    /// A single SDL type definition.
    Sdl(String),
}

impl From<TypeId> for AddType {
    fn from(id: TypeId) -> Self {
        AddType::Id(id)
    }
}

impl From<NamedType> for AddType {
    fn from(node: NamedType) -> Self {
        AddType::Type(node)
    }
}

impl From<&str> for AddType {
    fn from(sdl: &str) -> Self {
        AddType::Sdl(sdl.to_string())
    }
}

macro_rules! impl_add_type {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AddType {
                fn from(node: $ty) -> Self {
                    AddType::Type(NamedType::from(node))
                }
            }
        )*
    };
}

impl_add_type!(ObjectType, InputObjectType, InterfaceType, UnionType, EnumType, ScalarType);

/// Registry and builder of a GraphQL schema.
///
/// A composer owns every type node of the schema it's composing. Nodes are addressed with
/// [TypeId] handles or by the keys they're registered under, which are usually their names.
/// Types may refer to each other freely, including in cycles, and a composer can be cloned,
/// merged with other composers and finally built into a [`Schema`](crate::schema::Schema).
#[derive(Debug)]
pub struct SchemaComposer {
    pub(crate) registry: TypeRegistry,
    pub(crate) directives: Vec<Rc<DirectiveDefinition>>,
    pub(crate) description: Option<String>,
    pub(crate) must_have_types: Vec<TypeId>,
}

impl Default for SchemaComposer {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_accessors {
    ($($get:ident, $get_mut:ident, $variant:ident($ty:ty);)*) => {
        $(
            #[doc = concat!("Returns the registered ", stringify!($variant), " type for a key.")]
            pub fn $get<'k>(&self, key: impl Into<TypeKey<'k>>) -> Result<&$ty> {
                let key = key.into();
                match self.node(key)? {
                    NamedType::$variant(node) => Ok(node),
                    other => Err(Error::not_found(format!(
                        "Type `{}` is {} and not {}.",
                        key,
                        other.kind(),
                        TypeKind::$variant
                    ))),
                }
            }

            pub fn $get_mut<'k>(&mut self, key: impl Into<TypeKey<'k>>) -> Result<&mut $ty> {
                let key = key.into();
                match self.node_mut(key)? {
                    NamedType::$variant(node) => Ok(node),
                    other => Err(Error::not_found(format!(
                        "Type `{}` is {} and not {}.",
                        key,
                        other.kind(),
                        TypeKind::$variant
                    ))),
                }
            }
        )*
    };
}

impl SchemaComposer {
    /// Creates an empty composer which only knows the specified directives.
    pub fn new() -> Self {
        SchemaComposer {
            registry: TypeRegistry::new(),
            directives: specified_directives(),
            description: None,
            must_have_types: Vec::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn get<'k>(&self, key: impl Into<TypeKey<'k>>) -> Result<TypeId> {
        self.registry.get(key)
    }

    #[inline]
    pub fn has<'k>(&self, key: impl Into<TypeKey<'k>>) -> bool {
        self.registry.has(key)
    }

    /// Registers a node of this composer under an additional key, replacing what the key pointed
    /// at before.
    pub fn set<S: Into<String>>(&mut self, key: S, id: TypeId) -> Result<()> {
        self.registry.node(id)?;
        self.registry.set(key, id);
        Ok(())
    }

    /// Removes a single key. The node stays registered under any other key.
    pub fn delete(&mut self, key: &str) -> Option<TypeId> {
        self.registry.delete(key)
    }

    pub fn node<'k>(&self, key: impl Into<TypeKey<'k>>) -> Result<&NamedType> {
        let id = self.registry.get(key)?;
        self.registry.node(id)
    }

    pub fn node_mut<'k>(&mut self, key: impl Into<TypeKey<'k>>) -> Result<&mut NamedType> {
        let id = self.registry.get(key)?;
        self.registry.node_mut(id)
    }

    /// Returns the name of the node a key refers to.
    pub fn type_name<'k>(&self, key: impl Into<TypeKey<'k>>) -> Result<&str> {
        Ok(self.node(key)?.name())
    }

    /// Returns every registered node once, in creation order.
    pub fn types(&self) -> Vec<TypeId> {
        self.registry.ids()
    }

    typed_accessors! {
        object, object_mut, Object(ObjectType);
        input_object, input_object_mut, InputObject(InputObjectType);
        interface, interface_mut, Interface(InterfaceType);
        union_type, union_type_mut, Union(UnionType);
        enum_type, enum_type_mut, Enum(EnumType);
        scalar, scalar_mut, Scalar(ScalarType);
    }

    /// Adds a node and registers it under its name, returning that name.
    ///
    /// Registering a name that's already taken replaces the previous node under that key.
    pub fn add<T: Into<AddType>>(&mut self, definition: T) -> Result<String> {
        let id = match definition.into() {
            AddType::Id(id) => {
                self.registry.node(id)?;
                id
            }
            AddType::Type(node) => self.registry.alloc(node),
            AddType::Sdl(sdl) => self.create_tc(&sdl)?,
        };
        let name = self.registry.node(id)?.name().to_string();
        self.registry.set(name.as_str(), id);
        Ok(name)
    }

    fn create_named<F>(&mut self, name: &str, kind: TypeKind, make: F) -> Result<TypeId>
    where
        F: FnOnce(&str) -> Result<NamedType>,
    {
        if let Ok(existing) = self.registry.get(name) {
            let existing_kind = self.registry.node(existing)?.kind();
            return if existing_kind == kind {
                Ok(existing)
            } else {
                Err(Error::invalid(format!(
                    "Cannot create {} `{}` since it already exists as {}.",
                    kind, name, existing_kind
                )))
            };
        }
        let id = self.registry.alloc(make(name)?);
        self.registry.set(name, id);
        tracing::trace!(name, %kind, "created type");
        Ok(id)
    }

    /// Returns the object registered under `name`, creating an empty one if there is none.
    pub fn create_object_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::Object, |name| {
            ObjectType::new(name).map(NamedType::Object)
        })
    }

    pub fn create_input_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::InputObject, |name| {
            InputObjectType::new(name).map(NamedType::InputObject)
        })
    }

    pub fn create_interface_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::Interface, |name| {
            InterfaceType::new(name).map(NamedType::Interface)
        })
    }

    pub fn create_union_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::Union, |name| {
            UnionType::new(name).map(NamedType::Union)
        })
    }

    pub fn create_enum_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::Enum, |name| {
            EnumType::new(name).map(NamedType::Enum)
        })
    }

    /// Built-in scalars are shared by all composers on the current thread.
    pub fn create_scalar_tc(&mut self, name: &str) -> Result<TypeId> {
        self.create_named(name, TypeKind::Scalar, |name| {
            let scalar = match builtin_scalar(name) {
                Some(scalar) => scalar,
                None => ScalarType::new(name)?,
            };
            Ok(NamedType::Scalar(scalar))
        })
    }

    /// Looks up a named type, registering built-in scalars on first use.
    pub fn named_type(&mut self, name: &str) -> Result<TypeId> {
        match self.registry.get(name) {
            Ok(id) => Ok(id),
            Err(_) if is_builtin_scalar(name) => self.create_scalar_tc(name),
            Err(error) => Err(error),
        }
    }

    /// Parses a type expression like `[User!]!` into a reference.
    ///
    /// Named types that aren't registered yet become deferred references that are looked up by
    /// name once they're used.
    pub fn type_ref(&mut self, expr: &str) -> Result<TypeRef> {
        let expr = TypeExpr::parse(expr)?;
        self.resolve_expr(&expr)
    }

    pub(crate) fn resolve_expr(&mut self, expr: &TypeExpr) -> Result<TypeRef> {
        match expr {
            TypeExpr::Named(name) => match self.named_type(name) {
                Ok(id) => Ok(TypeRef::Named(id)),
                Err(error) if error.error_type() == ErrorType::NotFound => {
                    Ok(TypeRef::Deferred(DeferredType::by_name(name.as_str())))
                }
                Err(error) => Err(error),
            },
            TypeExpr::List(inner) => Ok(TypeRef::list(self.resolve_expr(inner)?)),
            TypeExpr::NonNull(inner) => TypeRef::non_null(self.resolve_expr(inner)?),
        }
    }

    /// Returns the root object for an operation kind, creating it if it doesn't exist yet.
    ///
    /// Roots are registered under the fixed keys `Query`, `Mutation` and `Subscription`, but the
    /// object stored under a root key may have any name.
    pub fn root_tc(&mut self, kind: OperationKind) -> Result<TypeId> {
        self.create_object_tc(kind.root_key())
    }

    #[inline]
    pub fn query_tc(&mut self) -> Result<TypeId> {
        self.root_tc(OperationKind::Query)
    }

    #[inline]
    pub fn mutation_tc(&mut self) -> Result<TypeId> {
        self.root_tc(OperationKind::Mutation)
    }

    #[inline]
    pub fn subscription_tc(&mut self) -> Result<TypeId> {
        self.root_tc(OperationKind::Subscription)
    }

    /// Returns the root type of an operation kind without creating it.
    pub fn root_type(&self, kind: OperationKind) -> Option<TypeId> {
        self.registry.get(kind.root_key()).ok()
    }

    /// Renames a node and registers it under its new name.
    ///
    /// Keys pointing at the node keep working, including the one for its old name.
    pub fn rename_type<'k>(&mut self, key: impl Into<TypeKey<'k>>, name: &str) -> Result<()> {
        let id = self.registry.get(key)?;
        validate_name(name)?;
        if let Ok(other) = self.registry.get(name) {
            if other != id {
                return Err(Error::invalid(format!(
                    "Cannot rename type to `{}` since that name is already taken.",
                    name
                )));
            }
        }
        for other in self.registry.ids() {
            if other != id && self.registry.node(other)?.name() == name {
                return Err(Error::invalid(format!(
                    "Cannot rename type to `{}` since another type already has that name.",
                    name
                )));
            }
        }

        let node = self.registry.node_mut(id)?;
        let previous = node.name().to_string();
        node.set_name(name.to_string());
        self.registry.set(name, id);
        tracing::debug!(from = %previous, to = name, "renamed type");
        Ok(())
    }

    /// Unregisters a node from every key it's registered under.
    ///
    /// References held by other types still point at the node.
    pub fn remove_type<'k>(&mut self, key: impl Into<TypeKey<'k>>) -> Result<TypeId> {
        let id = self.registry.get(key)?;
        let keys: Vec<String> = self
            .registry
            .entries()
            .into_iter()
            .filter(|(_, other)| *other == id)
            .map(|(key, _)| key.to_string())
            .collect();
        for key in keys.iter() {
            self.registry.delete(key);
        }
        self.must_have_types.retain(|other| *other != id);
        Ok(id)
    }

    #[inline]
    pub fn directives(&self) -> &[Rc<DirectiveDefinition>] {
        &self.directives
    }

    /// Adds a directive declaration unless one with the same name has already been added.
    pub fn add_directive<D: Into<Rc<DirectiveDefinition>>>(&mut self, directive: D) -> bool {
        let directive = directive.into();
        if self.has_directive(&directive.name) {
            return false;
        }
        self.directives.push(directive);
        true
    }

    /// Replaces the declaration with the same name, or adds it.
    pub(crate) fn set_directive(&mut self, directive: Rc<DirectiveDefinition>) {
        match self.directives.iter_mut().find(|d| d.name == directive.name) {
            Some(existing) => *existing = directive,
            None => self.directives.push(directive),
        }
    }

    pub fn remove_directive(&mut self, directive: &Rc<DirectiveDefinition>) -> bool {
        let before = self.directives.len();
        self.directives.retain(|d| !Rc::ptr_eq(d, directive));
        before != self.directives.len()
    }

    pub fn remove_directive_by_name(&mut self, name: &str) -> bool {
        let name = directive_name(name);
        let before = self.directives.len();
        self.directives.retain(|d| d.name != name);
        before != self.directives.len()
    }

    /// Checks for a declaration by name, which may be given with its leading `@`.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    pub fn directive(&self, name: &str) -> Option<&Rc<DirectiveDefinition>> {
        let name = directive_name(name);
        self.directives.iter().find(|d| d.name == name)
    }

    /// Marks a type to be included in built schemas even when nothing refers to it.
    pub fn add_schema_must_have_type<'k>(&mut self, key: impl Into<TypeKey<'k>>) -> Result<()> {
        let id = self.registry.get(key)?;
        if !self.must_have_types.contains(&id) {
            self.must_have_types.push(id);
        }
        Ok(())
    }

    #[inline]
    pub fn schema_must_have_types(&self) -> &[TypeId] {
        &self.must_have_types
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Drops every type and resets the directives to the specified ones.
    ///
    /// Handles issued before are invalidated.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.directives = specified_directives();
        self.description = None;
        self.must_have_types.clear();
    }
}
