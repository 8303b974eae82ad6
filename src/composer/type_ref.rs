use super::clone::{clone_type_to, IdentityMap};
use super::named::validate_name;
use super::registry::TypeId;
use super::schema_composer::SchemaComposer;
use crate::context::ASTContext;
use crate::error::{Error, Result};
use crate::schema;
use std::cell::RefCell;
use std::{fmt, mem, rc::Rc};

/// A reference to a type as used by fields, arguments and input fields.
///
/// A reference is either a registered named type, or one of three wrappers around another
/// reference. Wrappers never own named types: wrapping the same type twice references the same
/// node in the registry.
#[derive(Clone)]
pub enum TypeRef {
    Named(TypeId),
    List(ListType),
    NonNull(NonNullType),
    Deferred(DeferredType),
}

/// A sequence of the wrapped type, i.e. `[T]`.
#[derive(Clone, PartialEq)]
pub struct ListType(Box<TypeRef>);

/// The wrapped type but never null, i.e. `T!`. The wrapped type is never itself non-null.
#[derive(Clone, PartialEq)]
pub struct NonNullType(Box<TypeRef>);

impl ListType {
    #[inline]
    pub fn of_type(&self) -> &TypeRef {
        &self.0
    }
}

impl NonNullType {
    #[inline]
    pub fn of_type(&self) -> &TypeRef {
        &self.0
    }
}

impl TypeRef {
    #[inline]
    pub fn named(id: TypeId) -> Self {
        TypeRef::Named(id)
    }

    /// Wraps a type in a list. Lists may be nested freely.
    #[inline]
    pub fn list(of_type: TypeRef) -> Self {
        TypeRef::List(ListType(Box::new(of_type)))
    }

    /// Wraps a type as non-null. Wrapping a type that's already non-null is rejected.
    pub fn non_null(of_type: TypeRef) -> Result<Self> {
        if of_type.is_non_null() {
            return Err(Error::invalid(
                "A non-null type cannot wrap another non-null type.",
            ));
        }
        Ok(TypeRef::NonNull(NonNullType(Box::new(of_type))))
    }

    /// Returns a new list type wrapping a copy of this reference.
    #[inline]
    pub fn as_list(&self) -> TypeRef {
        TypeRef::list(self.clone())
    }

    /// Returns a non-null copy of this reference, or a plain copy when it's already non-null.
    pub fn as_non_null(&self) -> TypeRef {
        match self {
            TypeRef::NonNull(_) => self.clone(),
            _ => TypeRef::NonNull(NonNullType(Box::new(self.clone()))),
        }
    }

    /// Strips one non-null wrapper, if present.
    pub fn as_nullable(&self) -> TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner.of_type().clone(),
            _ => self.clone(),
        }
    }

    /// Returns the wrapped reference of a list or non-null type.
    pub fn of_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(inner) => Some(inner.of_type()),
            TypeRef::NonNull(inner) => Some(inner.of_type()),
            TypeRef::Named(_) | TypeRef::Deferred(_) => None,
        }
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, TypeRef::List(_))
    }

    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, TypeRef::Deferred(_))
    }

    /// Returns the handle of a direct named reference without resolving anything.
    pub fn named_id(&self) -> Option<TypeId> {
        match self {
            TypeRef::Named(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the named type this reference stands for when it's known without forcing any
    /// pending deferred reference. Wrapped references have none.
    pub fn resolved_named(&self) -> Option<TypeId> {
        match self {
            TypeRef::Named(id) => Some(*id),
            TypeRef::Deferred(deferred) => deferred.resolved_type()?.resolved_named(),
            TypeRef::List(_) | TypeRef::NonNull(_) => None,
        }
    }

    /// Checks whether two references point at the same named type, looking through deferred
    /// references that have already been resolved.
    pub fn is_same_named(&self, other: &TypeRef) -> bool {
        match (self.resolved_named(), other.resolved_named()) {
            (Some(left), Some(right)) => left == right,
            _ => self == other,
        }
    }

    /// Strips all wrappers, forcing deferred references, until a named type is reached.
    pub fn unwrap_named(&self, composer: &SchemaComposer) -> Result<TypeId> {
        match self {
            TypeRef::Named(id) => Ok(*id),
            TypeRef::List(inner) => inner.of_type().unwrap_named(composer),
            TypeRef::NonNull(inner) => inner.of_type().unwrap_named(composer),
            TypeRef::Deferred(deferred) => deferred.resolve(composer)?.unwrap_named(composer),
        }
    }

    /// Prints the type expression, e.g. `[User!]`.
    ///
    /// Deferred references that haven't been evaluated yet print their hint name when one was
    /// given, and are forced otherwise.
    pub fn type_name(&self, composer: &SchemaComposer) -> Result<String> {
        match self {
            TypeRef::Named(id) => Ok(composer.registry().node(*id)?.name().to_string()),
            TypeRef::List(inner) => Ok(format!("[{}]", inner.of_type().type_name(composer)?)),
            TypeRef::NonNull(inner) => Ok(format!("{}!", inner.of_type().type_name(composer)?)),
            TypeRef::Deferred(deferred) => match (deferred.resolved_type(), deferred.hint()) {
                (Some(resolved), _) => resolved.type_name(composer),
                (None, Some(hint)) => Ok(hint.to_string()),
                (None, None) => deferred.resolve(composer)?.type_name(composer),
            },
        }
    }

    /// Resolves this reference into a name-based type expression.
    pub fn to_expr(&self, composer: &SchemaComposer) -> Result<TypeExpr> {
        match self {
            TypeRef::Named(id) => Ok(TypeExpr::Named(
                composer.registry().node(*id)?.name().to_string(),
            )),
            TypeRef::List(inner) => Ok(TypeExpr::List(Box::new(
                inner.of_type().to_expr(composer)?,
            ))),
            TypeRef::NonNull(inner) => match inner.of_type().to_expr(composer)? {
                // A deferred reference may only turn out to be non-null once it's resolved
                TypeExpr::NonNull(_) => Err(Error::invalid(format!(
                    "Type `{}` resolves to a doubly wrapped non-null type.",
                    self.type_name(composer)?
                ))),
                expr => Ok(TypeExpr::NonNull(Box::new(expr))),
            },
            TypeRef::Deferred(deferred) => deferred.resolve(composer)?.to_expr(composer),
        }
    }

    /// Produces the runtime type reference that a built schema uses for this reference.
    pub fn runtime_type<'a>(
        &self,
        ctx: &'a ASTContext,
        composer: &SchemaComposer,
    ) -> Result<&'a schema::TypeRef<'a>> {
        Ok(self.to_expr(composer)?.runtime_type(ctx))
    }

    /// Clones this reference from `source` into `target`.
    ///
    /// Wrappers are recreated around the cloned child. Deferred references are forced and the
    /// clone is an already resolved deferred reference pointing at the cloned result.
    pub fn clone_to(
        &self,
        source: &SchemaComposer,
        target: &mut SchemaComposer,
        map: &mut IdentityMap,
    ) -> Result<TypeRef> {
        match self {
            TypeRef::Named(id) => Ok(TypeRef::Named(clone_type_to(source, *id, target, map)?)),
            TypeRef::List(inner) => Ok(TypeRef::list(
                inner.of_type().clone_to(source, target, map)?,
            )),
            TypeRef::NonNull(inner) => Ok(TypeRef::NonNull(NonNullType(Box::new(
                inner.of_type().clone_to(source, target, map)?,
            )))),
            TypeRef::Deferred(deferred) => {
                let resolved = deferred.resolve(source)?;
                let cloned = resolved.clone_to(source, target, map)?;
                Ok(TypeRef::Deferred(DeferredType::resolved(cloned)))
            }
        }
    }
}

impl From<TypeId> for TypeRef {
    #[inline]
    fn from(id: TypeId) -> Self {
        TypeRef::Named(id)
    }
}

impl From<DeferredType> for TypeRef {
    #[inline]
    fn from(deferred: DeferredType) -> Self {
        TypeRef::Deferred(deferred)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeRef::Named(left), TypeRef::Named(right)) => left == right,
            (TypeRef::List(left), TypeRef::List(right)) => left == right,
            (TypeRef::NonNull(left), TypeRef::NonNull(right)) => left == right,
            (TypeRef::Deferred(left), TypeRef::Deferred(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(id) => f.debug_tuple("Named").field(id).finish(),
            TypeRef::List(inner) => f.debug_tuple("List").field(inner.of_type()).finish(),
            TypeRef::NonNull(inner) => f.debug_tuple("NonNull").field(inner.of_type()).finish(),
            TypeRef::Deferred(deferred) => fmt::Debug::fmt(deferred, f),
        }
    }
}

type Producer = Box<dyn FnOnce(&SchemaComposer) -> Result<TypeRef>>;

enum DeferredState {
    Pending(Producer),
    Evaluating,
    Resolved(TypeRef),
    Failed(Error),
}

struct Deferred {
    hint: Option<String>,
    state: RefCell<DeferredState>,
}

/// A reference that's produced lazily, on first use.
///
/// Deferred references let types point at each other before all of them exist. The producer is
/// called at most once; its result, or its error, is kept and returned on every later call.
/// Copies of a deferred reference share the same state.
#[derive(Clone)]
pub struct DeferredType(Rc<Deferred>);

impl DeferredType {
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(&SchemaComposer) -> Result<TypeRef> + 'static,
    {
        DeferredType(Rc::new(Deferred {
            hint: None,
            state: RefCell::new(DeferredState::Pending(Box::new(producer))),
        }))
    }

    /// Creates a deferred reference with a name that's printed until it's resolved.
    pub fn with_hint<S, F>(hint: S, producer: F) -> Self
    where
        S: Into<String>,
        F: FnOnce(&SchemaComposer) -> Result<TypeRef> + 'static,
    {
        DeferredType(Rc::new(Deferred {
            hint: Some(hint.into()),
            state: RefCell::new(DeferredState::Pending(Box::new(producer))),
        }))
    }

    /// Creates a deferred reference that looks up a registered type by name.
    pub fn by_name<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        let key = name.clone();
        DeferredType::with_hint(name, move |composer| {
            composer.registry().get(key.as_str()).map(TypeRef::Named)
        })
    }

    /// Creates a deferred reference that's already resolved.
    pub fn resolved(of_type: TypeRef) -> Self {
        DeferredType(Rc::new(Deferred {
            hint: None,
            state: RefCell::new(DeferredState::Resolved(of_type)),
        }))
    }

    #[inline]
    pub fn hint(&self) -> Option<&str> {
        self.0.hint.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.0.state.borrow(), DeferredState::Resolved(_))
    }

    /// Returns the resolved reference without evaluating the producer.
    pub fn resolved_type(&self) -> Option<TypeRef> {
        match &*self.0.state.borrow() {
            DeferredState::Resolved(of_type) => Some(of_type.clone()),
            _ => None,
        }
    }

    /// Evaluates the producer on first call and returns the memoized result afterwards.
    pub fn resolve(&self, composer: &SchemaComposer) -> Result<TypeRef> {
        // The state is taken out so that no borrow is held while the producer runs
        let state = mem::replace(&mut *self.0.state.borrow_mut(), DeferredState::Evaluating);
        match state {
            DeferredState::Pending(producer) => {
                let result = producer(composer);
                let next = match &result {
                    Ok(of_type) => DeferredState::Resolved(of_type.clone()),
                    Err(error) => DeferredState::Failed(error.clone()),
                };
                *self.0.state.borrow_mut() = next;
                result
            }
            DeferredState::Evaluating => Err(Error::invalid(format!(
                "Deferred type `{}` refers to itself while being resolved.",
                self.hint().unwrap_or("<anonymous>")
            ))),
            DeferredState::Resolved(of_type) => {
                *self.0.state.borrow_mut() = DeferredState::Resolved(of_type.clone());
                Ok(of_type)
            }
            DeferredState::Failed(error) => {
                *self.0.state.borrow_mut() = DeferredState::Failed(error.clone());
                Err(error)
            }
        }
    }

    #[inline]
    pub fn ptr_eq(&self, other: &DeferredType) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DeferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Deferred");
        match self.0.state.try_borrow() {
            Ok(state) => match &*state {
                DeferredState::Resolved(of_type) => tuple.field(of_type),
                DeferredState::Pending(_) => tuple.field(&self.hint().unwrap_or("pending")),
                DeferredState::Evaluating => tuple.field(&"evaluating"),
                DeferredState::Failed(error) => tuple.field(&error.message()),
            },
            Err(_) => tuple.field(&"evaluating"),
        };
        tuple.finish()
    }
}

/// A type expression that refers to named types by name, e.g. `[String!]!`.
///
/// Expressions don't depend on any registry and are used where types are shared between
/// composers, such as directive definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Named(String),
    List(Box<TypeExpr>),
    NonNull(Box<TypeExpr>),
}

impl TypeExpr {
    /// Parses a type expression from text.
    pub fn parse(source: &str) -> Result<TypeExpr> {
        let source = source.trim();
        if let Some(inner) = source.strip_suffix('!') {
            return match TypeExpr::parse(inner)? {
                TypeExpr::NonNull(_) => Err(Error::invalid(format!(
                    "Type expression `{}` wraps a non-null type in another non-null type.",
                    source
                ))),
                of_type => Ok(TypeExpr::NonNull(Box::new(of_type))),
            };
        }
        if let Some(inner) = source.strip_prefix('[') {
            return match inner.strip_suffix(']') {
                Some(inner) => Ok(TypeExpr::List(Box::new(TypeExpr::parse(inner)?))),
                None => Err(Error::invalid(format!(
                    "Type expression `{}` has an unterminated list.",
                    source
                ))),
            };
        }
        validate_name(source)?;
        Ok(TypeExpr::Named(source.to_string()))
    }

    /// Returns the innermost named type's name.
    pub fn named_type(&self) -> &str {
        match self {
            TypeExpr::Named(name) => name,
            TypeExpr::List(inner) | TypeExpr::NonNull(inner) => inner.named_type(),
        }
    }

    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeExpr::NonNull(_))
    }

    pub(crate) fn runtime_type<'a>(&self, ctx: &'a ASTContext) -> &'a schema::TypeRef<'a> {
        match self {
            TypeExpr::Named(name) => ctx.alloc(schema::TypeRef::Type(ctx.alloc_str(name))),
            TypeExpr::List(inner) => ctx.alloc(schema::TypeRef::ListType(inner.runtime_type(ctx))),
            TypeExpr::NonNull(inner) => {
                ctx.alloc(schema::TypeRef::NonNullType(inner.runtime_type(ctx)))
            }
        }
    }

    pub(crate) fn from_runtime(type_ref: &schema::TypeRef<'_>) -> TypeExpr {
        match type_ref {
            schema::TypeRef::Type(name) => TypeExpr::Named(name.to_string()),
            schema::TypeRef::ListType(inner) => TypeExpr::List(Box::new(Self::from_runtime(inner))),
            schema::TypeRef::NonNullType(inner) => {
                TypeExpr::NonNull(Box::new(Self::from_runtime(inner)))
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::List(inner) => write!(f, "[{}]", inner),
            TypeExpr::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}
