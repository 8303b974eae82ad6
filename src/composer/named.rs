use super::directive::Directive;
use super::types::{EnumType, InputObjectType, InterfaceType, ObjectType, ScalarType, UnionType};
use crate::error::{Error, Result};
use crate::value::{Extensions, Value};
use std::fmt;

/// The scalars every GraphQL schema may use without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

#[inline]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Checks that a name matches `/^[_a-zA-Z][_a-zA-Z0-9]*$/`.
///
/// [Reference](https://spec.graphql.org/October2021/#Name)
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::invalid(format!("Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but `{}` does not.", name)))
    }
}

/// Metadata shared by all schema elements that can be described and annotated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub description: Option<String>,
    /// Applied directives in order. The same directive may be applied more than once.
    pub directives: Vec<Directive>,
    /// Opaque metadata which is cloned and merged with the element but never printed.
    pub extensions: Extensions,
}

impl Annotations {
    /// Folds another element's annotations into these ones.
    ///
    /// The receiving description is kept unless it has none, directives are appended unless an
    /// equal directive is already present, and extensions are overwritten key by key.
    pub(crate) fn merge(&mut self, other: Annotations) {
        if self.description.is_none() {
            self.description = other.description;
        }
        for directive in other.directives {
            if !self.directives.contains(&directive) {
                self.directives.push(directive);
            }
        }
        self.extensions.extend(other.extensions);
    }
}

/// Accessors for elements that carry [Annotations].
pub trait Annotated {
    fn annotations(&self) -> &Annotations;

    fn annotations_mut(&mut self) -> &mut Annotations;

    #[inline]
    fn description(&self) -> Option<&str> {
        self.annotations().description.as_deref()
    }

    fn set_description(&mut self, description: Option<String>) {
        self.annotations_mut().description = description;
    }

    #[inline]
    fn directives(&self) -> &[Directive] {
        &self.annotations().directives
    }

    fn add_directive(&mut self, directive: Directive) {
        self.annotations_mut().directives.push(directive);
    }

    /// Removes every applied directive with the given name and returns how many were removed.
    fn remove_directives(&mut self, name: &str) -> usize {
        let directives = &mut self.annotations_mut().directives;
        let before = directives.len();
        directives.retain(|directive| directive.name != name);
        before - directives.len()
    }

    fn has_directive(&self, name: &str) -> bool {
        self.directives().iter().any(|directive| directive.name == name)
    }

    fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives().iter().find(|directive| directive.name == name)
    }

    #[inline]
    fn extensions(&self) -> &Extensions {
        &self.annotations().extensions
    }

    fn extension(&self, key: &str) -> Option<&Value> {
        self.annotations().extensions.get(key)
    }

    fn set_extension(&mut self, key: &str, value: Value) {
        self.annotations_mut()
            .extensions
            .insert(key.to_string(), value);
    }

    fn remove_extension(&mut self, key: &str) -> Option<Value> {
        self.annotations_mut().extensions.shift_remove(key)
    }
}

macro_rules! impl_annotated {
    ($($ty:ty),*) => {
        $(
            impl $crate::composer::named::Annotated for $ty {
                #[inline]
                fn annotations(&self) -> &$crate::composer::named::Annotations {
                    &self.annotations
                }

                #[inline]
                fn annotations_mut(&mut self) -> &mut $crate::composer::named::Annotations {
                    &mut self.annotations
                }
            }
        )*
    };
}

pub(crate) use impl_annotated;

/// The kind of a [NamedType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    InputObject,
    Interface,
    Union,
    Enum,
    Scalar,
}

impl TypeKind {
    /// The keyword that introduces a definition of this kind in SDL.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Object => "type",
            TypeKind::InputObject => "input",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
            TypeKind::Scalar => "scalar",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Object => "object",
            TypeKind::InputObject => "input object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
            TypeKind::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// A named type node stored in a composer's registry.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, Clone, PartialEq)]
pub enum NamedType {
    Object(ObjectType),
    InputObject(InputObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(ScalarType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Object(x) => x.name(),
            NamedType::InputObject(x) => x.name(),
            NamedType::Interface(x) => x.name(),
            NamedType::Union(x) => x.name(),
            NamedType::Enum(x) => x.name(),
            NamedType::Scalar(x) => x.name(),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            NamedType::Object(x) => x.name = name,
            NamedType::InputObject(x) => x.name = name,
            NamedType::Interface(x) => x.name = name,
            NamedType::Union(x) => x.name = name,
            NamedType::Enum(x) => x.name = name,
            NamedType::Scalar(x) => x.set_name(name),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            NamedType::Object(_) => TypeKind::Object,
            NamedType::InputObject(_) => TypeKind::InputObject,
            NamedType::Interface(_) => TypeKind::Interface,
            NamedType::Union(_) => TypeKind::Union,
            NamedType::Enum(_) => TypeKind::Enum,
            NamedType::Scalar(_) => TypeKind::Scalar,
        }
    }

    /// Returns a copy with the same name and annotations but without any fields, values,
    /// interfaces or members. Scalars are returned as a shared copy.
    pub(crate) fn shell(&self) -> NamedType {
        match self {
            NamedType::Object(x) => NamedType::Object(x.shell()),
            NamedType::InputObject(x) => NamedType::InputObject(x.shell()),
            NamedType::Interface(x) => NamedType::Interface(x.shell()),
            NamedType::Union(x) => NamedType::Union(x.shell()),
            NamedType::Enum(x) => NamedType::Enum(x.clone()),
            NamedType::Scalar(x) => NamedType::Scalar(x.clone()),
        }
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, NamedType::Scalar(_))
    }

    /// Whether values of this type may be used as arguments and input fields.
    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            NamedType::InputObject(_) | NamedType::Enum(_) | NamedType::Scalar(_)
        )
    }

    /// Whether values of this type may be returned by fields.
    pub fn is_output_type(&self) -> bool {
        !matches!(self, NamedType::InputObject(_))
    }
}

impl Annotated for NamedType {
    fn annotations(&self) -> &Annotations {
        match self {
            NamedType::Object(x) => x.annotations(),
            NamedType::InputObject(x) => x.annotations(),
            NamedType::Interface(x) => x.annotations(),
            NamedType::Union(x) => x.annotations(),
            NamedType::Enum(x) => x.annotations(),
            NamedType::Scalar(x) => x.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            NamedType::Object(x) => x.annotations_mut(),
            NamedType::InputObject(x) => x.annotations_mut(),
            NamedType::Interface(x) => x.annotations_mut(),
            NamedType::Union(x) => x.annotations_mut(),
            NamedType::Enum(x) => x.annotations_mut(),
            NamedType::Scalar(x) => x.annotations_mut(),
        }
    }
}

macro_rules! impl_from_named {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for NamedType {
                #[inline]
                fn from(node: $ty) -> Self {
                    NamedType::$variant(node)
                }
            }
        )*
    };
}

impl_from_named!(
    Object(ObjectType),
    InputObject(InputObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(ScalarType)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names() {
        assert!(validate_name("User").is_ok());
        assert!(validate_name("_internal9").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("9lives").is_err());
        assert!(validate_name("has-dash").is_err());
    }

    #[test]
    fn annotations_merge_additively() {
        let mut receiver = Annotations {
            description: Some("Kept".into()),
            directives: vec![Directive::new("key")],
            ..Annotations::default()
        };
        receiver.extensions.insert("owner".into(), Value::from("a"));

        let mut incoming = Annotations {
            description: Some("Ignored".into()),
            directives: vec![Directive::new("key"), Directive::new("shareable")],
            ..Annotations::default()
        };
        incoming.extensions.insert("owner".into(), Value::from("b"));
        incoming.extensions.insert("team".into(), Value::from("c"));

        receiver.merge(incoming);
        assert_eq!(receiver.description.as_deref(), Some("Kept"));
        let names: Vec<&str> = receiver.directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["key", "shareable"]);
        assert_eq!(receiver.extensions["owner"], Value::from("b"));
        assert_eq!(receiver.extensions.len(), 2);
    }

    #[test]
    fn annotated_accessors() {
        let mut object = ObjectType::new("User").unwrap();
        object.set_description(Some("A user".into()));
        object.add_directive(Directive::new("tag").with_arg("name", "a"));
        object.add_directive(Directive::new("tag").with_arg("name", "b"));
        object.set_extension("complexity", Value::Int(3));

        let node = NamedType::from(object);
        assert_eq!(node.description(), Some("A user"));
        assert_eq!(node.directives().len(), 2);
        assert_eq!(node.extension("complexity"), Some(&Value::Int(3)));
        assert_eq!(node.kind(), TypeKind::Object);

        let mut node = node;
        assert_eq!(node.remove_directives("tag"), 2);
        assert!(!node.has_directive("tag"));
    }
}
