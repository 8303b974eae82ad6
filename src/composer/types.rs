use super::fields::{push_named_ref, ComposeFields, ComposeInterfaces, EnumValue, Field, InputValue};
use super::named::{impl_annotated, validate_name, Annotated, Annotations};
use super::type_ref::TypeRef;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::rc::Rc;

/// An Object type definition.
///
/// Most types in GraphQL are objects and define a set of fields and the interfaces they implement.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) interfaces: Vec<TypeRef>,
    pub(crate) annotations: Annotations,
}

/// An Interface type definition.
///
/// Any object or other interfaces may implement one or more interfaces and must then adhere to the
/// definition of this interface. A field that returns an interface as its return type may return
/// any object that implements this interface.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) interfaces: Vec<TypeRef>,
    pub(crate) annotations: Annotations,
}

macro_rules! impl_field_type {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                pub fn new<S: Into<String>>(name: S) -> Result<Self> {
                    let name = name.into();
                    validate_name(&name)?;
                    Ok($ty {
                        name,
                        fields: IndexMap::new(),
                        interfaces: Vec::new(),
                        annotations: Annotations::default(),
                    })
                }

                #[inline]
                pub fn name(&self) -> &str {
                    &self.name
                }

                pub(crate) fn shell(&self) -> Self {
                    $ty {
                        name: self.name.clone(),
                        fields: IndexMap::new(),
                        interfaces: Vec::new(),
                        annotations: self.annotations.clone(),
                    }
                }
            }

            impl ComposeFields for $ty {
                #[inline]
                fn fields(&self) -> &IndexMap<String, Field> {
                    &self.fields
                }

                #[inline]
                fn fields_mut(&mut self) -> &mut IndexMap<String, Field> {
                    &mut self.fields
                }
            }

            impl ComposeInterfaces for $ty {
                #[inline]
                fn interfaces(&self) -> &[TypeRef] {
                    &self.interfaces
                }

                #[inline]
                fn interfaces_mut(&mut self) -> &mut Vec<TypeRef> {
                    &mut self.interfaces
                }
            }
        )*
    };
}

impl_field_type!(ObjectType, InterfaceType);

impl_annotated!(
    ObjectType,
    InterfaceType,
    InputObjectType,
    UnionType,
    EnumType
);

/// An Input Object type definition.
///
/// Inputs, such as arguments, may sometimes be nested and accept objects that must adhere to the
/// shape of an Input Object definition. This is often used to represent more complex inputs.
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, InputValue>,
    pub(crate) annotations: Annotations,
}

impl InputObjectType {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(InputObjectType {
            name,
            fields: IndexMap::new(),
            annotations: Annotations::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shell(&self) -> Self {
        InputObjectType {
            name: self.name.clone(),
            fields: IndexMap::new(),
            annotations: self.annotations.clone(),
        }
    }

    #[inline]
    pub fn fields(&self) -> &IndexMap<String, InputValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Result<&InputValue> {
        self.fields
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Input field `{}` does not exist.", name)))
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut InputValue> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Input field `{}` does not exist.", name)))
    }

    #[inline]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Adds an input field or replaces a same-named one in place.
    pub fn set_field(&mut self, name: &str, field: InputValue) -> Result<()> {
        validate_name(name)?;
        self.fields.insert(name.to_string(), field);
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<InputValue> {
        self.fields.shift_remove(name)
    }
}

/// A Union type definition.
///
/// A union contains a list of possible types that can be returned in its stead when its defined as
/// an output type.
/// [Reference](https://spec.graphql.org/October2021/#sec-Unions)
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub(crate) name: String,
    pub(crate) members: Vec<TypeRef>,
    pub(crate) annotations: Annotations,
}

impl UnionType {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(UnionType {
            name,
            members: Vec::new(),
            annotations: Annotations::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shell(&self) -> Self {
        UnionType {
            name: self.name.clone(),
            members: Vec::new(),
            annotations: self.annotations.clone(),
        }
    }

    #[inline]
    pub fn members(&self) -> &[TypeRef] {
        &self.members
    }

    /// Adds a member type unless it's already present.
    pub fn add_member(&mut self, member: TypeRef) -> Result<()> {
        push_named_ref(&mut self.members, member)
    }

    pub fn remove_member(&mut self, member: &TypeRef) -> bool {
        let before = self.members.len();
        self.members.retain(|existing| !existing.is_same_named(member));
        before != self.members.len()
    }

    pub fn has_member(&self, member: &TypeRef) -> bool {
        self.members
            .iter()
            .any(|existing| existing.is_same_named(member))
    }
}

/// An Enum type definition.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enums)
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub(crate) name: String,
    pub(crate) values: IndexMap<String, EnumValue>,
    pub(crate) annotations: Annotations,
}

impl EnumType {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(EnumType {
            name,
            values: IndexMap::new(),
            annotations: Annotations::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &IndexMap<String, EnumValue> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Result<&EnumValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Enum value `{}` does not exist.", name)))
    }

    pub fn value_mut(&mut self, name: &str) -> Result<&mut EnumValue> {
        self.values
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Enum value `{}` does not exist.", name)))
    }

    #[inline]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Adds a value or replaces a same-named one in place.
    pub fn set_value(&mut self, name: &str, value: EnumValue) -> Result<()> {
        validate_name(name)?;
        if matches!(name, "true" | "false" | "null") {
            return Err(Error::invalid(format!(
                "Enum `{}` cannot define a value named `{}`.",
                self.name, name
            )));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn remove_value(&mut self, name: &str) -> Option<EnumValue> {
        self.values.shift_remove(name)
    }
}

/// The shared contents of a scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDefinition {
    pub(crate) name: String,
    pub(crate) annotations: Annotations,
}

/// A Scalar type definition.
///
/// Scalars are leaf primitives, and unlike all other named types they're never copied when a
/// schema is cloned or merged: all composers share the same definition. Mutating a shared scalar
/// through one composer copies it first, so other composers keep the unchanged definition.
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType(Rc<ScalarDefinition>);

impl ScalarType {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(ScalarType(Rc::new(ScalarDefinition {
            name,
            annotations: Annotations::default(),
        })))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        Rc::make_mut(&mut self.0).name = name;
    }

    /// Checks whether both scalars share one definition.
    #[inline]
    pub fn ptr_eq(&self, other: &ScalarType) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Annotated for ScalarType {
    #[inline]
    fn annotations(&self) -> &Annotations {
        &self.0.annotations
    }

    #[inline]
    fn annotations_mut(&mut self) -> &mut Annotations {
        &mut Rc::make_mut(&mut self.0).annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{Directive, SchemaComposer};
    use crate::error::ErrorType;

    #[test]
    fn constructors_validate_names() {
        assert!(ObjectType::new("User").is_ok());
        assert!(InterfaceType::new("1Node").is_err());
        assert!(InputObjectType::new("").is_err());
        assert!(UnionType::new("Search Result").is_err());
        assert!(EnumType::new("Role").is_ok());
        assert!(ScalarType::new("Date-Time").is_err());
    }

    #[test]
    fn shells_drop_contents() {
        let mut composer = SchemaComposer::new();
        let string = composer.named_type("String").unwrap();
        let mut object = ObjectType::new("User").unwrap();
        object.set_description(Some("A user".into()));
        object.set_field("name", Field::new(string)).unwrap();

        let shell = object.shell();
        assert_eq!(shell.name(), "User");
        assert_eq!(shell.description(), Some("A user"));
        assert!(shell.fields().is_empty());
    }

    #[test]
    fn union_members_are_deduplicated() {
        let mut composer = SchemaComposer::new();
        let user = composer.create_object_tc("User").unwrap();
        let mut union = UnionType::new("SearchResult").unwrap();
        union.add_member(TypeRef::named(user)).unwrap();
        union.add_member(TypeRef::named(user)).unwrap();
        assert_eq!(union.members().len(), 1);
        assert!(union.add_member(TypeRef::named(user).as_list()).is_err());
        assert!(union.remove_member(&TypeRef::named(user)));
        assert!(!union.has_member(&TypeRef::named(user)));
    }

    #[test]
    fn enum_values_reject_reserved_names() {
        let mut role = EnumType::new("Role").unwrap();
        role.set_value("ADMIN", EnumValue::new().with_value(1)).unwrap();
        assert!(role.set_value("null", EnumValue::new()).is_err());
        assert_eq!(
            role.value("GUEST").unwrap_err().error_type(),
            ErrorType::NotFound
        );
        assert!(role.has_value("ADMIN"));
    }

    #[test]
    fn scalars_copy_on_write() {
        let date = ScalarType::new("Date").unwrap();
        let mut copy = date.clone();
        assert!(copy.ptr_eq(&date));

        copy.add_directive(Directive::new("specifiedBy").with_arg("url", "https://example.com"));
        assert!(!copy.ptr_eq(&date));
        assert!(date.directives().is_empty());
        assert_eq!(copy.directives().len(), 1);
    }
}
