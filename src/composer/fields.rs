use super::clone::IdentityMap;
use super::directive::Directive;
use super::named::{impl_annotated, validate_name, Annotations};
use super::schema_composer::SchemaComposer;
use super::type_ref::TypeRef;
use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;

/// An output field of an object or interface type.
///
/// [Reference](https://spec.graphql.org/October2021/#FieldsDefinition)
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: TypeRef,
    pub args: IndexMap<String, InputValue>,
    pub deprecation_reason: Option<String>,
    pub(crate) annotations: Annotations,
}

impl_annotated!(Field, InputValue, EnumValue);

impl Field {
    pub fn new<T: Into<TypeRef>>(ty: T) -> Self {
        Field {
            ty: ty.into(),
            args: IndexMap::new(),
            deprecation_reason: None,
            annotations: Annotations::default(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.annotations.description = Some(description.into());
        self
    }

    /// Adds an argument, replacing a same-named one.
    pub fn with_arg<S: Into<String>>(mut self, name: S, arg: InputValue) -> Result<Self> {
        self.set_arg(name, arg)?;
        Ok(self)
    }

    pub fn with_deprecation<S: Into<String>>(mut self, reason: S) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.annotations.directives.push(directive);
        self
    }

    pub fn set_arg<S: Into<String>>(&mut self, name: S, arg: InputValue) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.args.insert(name, arg);
        Ok(())
    }

    pub fn arg(&self, name: &str) -> Result<&InputValue> {
        self.args
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Argument `{}` does not exist.", name)))
    }

    pub fn remove_arg(&mut self, name: &str) -> Option<InputValue> {
        self.args.shift_remove(name)
    }

    #[inline]
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }

    pub(crate) fn clone_to(
        &self,
        source: &SchemaComposer,
        target: &mut SchemaComposer,
        map: &mut IdentityMap,
    ) -> Result<Field> {
        let mut args = IndexMap::with_capacity(self.args.len());
        for (name, arg) in self.args.iter() {
            args.insert(name.clone(), arg.clone_to(source, target, map)?);
        }
        Ok(Field {
            ty: self.ty.clone_to(source, target, map)?,
            args,
            deprecation_reason: self.deprecation_reason.clone(),
            annotations: self.annotations.clone(),
        })
    }
}

/// An argument or an input object field.
///
/// [Reference](https://spec.graphql.org/October2021/#InputValueDefinition)
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub deprecation_reason: Option<String>,
    pub(crate) annotations: Annotations,
}

impl InputValue {
    pub fn new<T: Into<TypeRef>>(ty: T) -> Self {
        InputValue {
            ty: ty.into(),
            default_value: None,
            deprecation_reason: None,
            annotations: Annotations::default(),
        }
    }

    pub fn with_default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.annotations.description = Some(description.into());
        self
    }

    pub fn with_deprecation<S: Into<String>>(mut self, reason: S) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub(crate) fn clone_to(
        &self,
        source: &SchemaComposer,
        target: &mut SchemaComposer,
        map: &mut IdentityMap,
    ) -> Result<InputValue> {
        Ok(InputValue {
            ty: self.ty.clone_to(source, target, map)?,
            default_value: self.default_value.clone(),
            deprecation_reason: self.deprecation_reason.clone(),
            annotations: self.annotations.clone(),
        })
    }
}

/// A value of an enum type. Its `value` is an optional internal representation that's never
/// printed.
///
/// [Reference](https://spec.graphql.org/October2021/#EnumValuesDefinition)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValue {
    pub value: Option<Value>,
    pub deprecation_reason: Option<String>,
    pub(crate) annotations: Annotations,
}

impl EnumValue {
    pub fn new() -> Self {
        EnumValue::default()
    }

    pub fn with_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.annotations.description = Some(description.into());
        self
    }

    pub fn with_deprecation<S: Into<String>>(mut self, reason: S) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

/// Field accessors shared by objects and interfaces.
pub trait ComposeFields {
    fn fields(&self) -> &IndexMap<String, Field>;

    fn fields_mut(&mut self) -> &mut IndexMap<String, Field>;

    fn field(&self, name: &str) -> Result<&Field> {
        self.fields()
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Field `{}` does not exist.", name)))
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Field> {
        self.fields_mut()
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Field `{}` does not exist.", name)))
    }

    #[inline]
    fn has_field(&self, name: &str) -> bool {
        self.fields().contains_key(name)
    }

    /// Adds a field or replaces a same-named one in place.
    fn set_field(&mut self, name: &str, field: Field) -> Result<()> {
        validate_name(name)?;
        self.fields_mut().insert(name.to_string(), field);
        Ok(())
    }

    fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.fields_mut().shift_remove(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields().keys().map(String::as_str).collect()
    }
}

/// Interface accessors shared by objects and interfaces. The same bookkeeping applies to union
/// members, which are also references to named types.
pub trait ComposeInterfaces {
    fn interfaces(&self) -> &[TypeRef];

    fn interfaces_mut(&mut self) -> &mut Vec<TypeRef>;

    /// Adds an implemented interface unless it's already present.
    fn add_interface(&mut self, interface: TypeRef) -> Result<()> {
        push_named_ref(self.interfaces_mut(), interface)
    }

    fn remove_interface(&mut self, interface: &TypeRef) -> bool {
        let interfaces = self.interfaces_mut();
        let before = interfaces.len();
        interfaces.retain(|existing| !existing.is_same_named(interface));
        before != interfaces.len()
    }

    fn has_interface(&self, interface: &TypeRef) -> bool {
        self.interfaces()
            .iter()
            .any(|existing| existing.is_same_named(interface))
    }
}

/// Appends a reference to a list of interfaces or union members.
pub(crate) fn push_named_ref(refs: &mut Vec<TypeRef>, ty: TypeRef) -> Result<()> {
    if ty.is_list() || ty.is_non_null() {
        return Err(Error::invalid(
            "Interfaces and union members must refer to named types, not wrapped types.",
        ));
    }
    if !refs.iter().any(|existing| existing.is_same_named(&ty)) {
        refs.push(ty);
    }
    Ok(())
}
