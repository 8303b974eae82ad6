use super::named::validate_name;
use super::type_ref::TypeExpr;
use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// The deprecation reason that `@deprecated` applies when no `reason` argument is given.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A directive applied to a schema element, e.g. `@key(fields: "id")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    pub args: IndexMap<String, Value>,
}

impl Directive {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Directive {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    pub fn with_arg<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

/// The locations at which a directive may be applied.
///
/// [Reference](https://spec.graphql.org/October2021/#DirectiveLocations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUERY" => DirectiveLocation::Query,
            "MUTATION" => DirectiveLocation::Mutation,
            "SUBSCRIPTION" => DirectiveLocation::Subscription,
            "FIELD" => DirectiveLocation::Field,
            "FRAGMENT_DEFINITION" => DirectiveLocation::FragmentDefinition,
            "FRAGMENT_SPREAD" => DirectiveLocation::FragmentSpread,
            "INLINE_FRAGMENT" => DirectiveLocation::InlineFragment,
            "VARIABLE_DEFINITION" => DirectiveLocation::VariableDefinition,
            "SCHEMA" => DirectiveLocation::Schema,
            "SCALAR" => DirectiveLocation::Scalar,
            "OBJECT" => DirectiveLocation::Object,
            "FIELD_DEFINITION" => DirectiveLocation::FieldDefinition,
            "ARGUMENT_DEFINITION" => DirectiveLocation::ArgumentDefinition,
            "INTERFACE" => DirectiveLocation::Interface,
            "UNION" => DirectiveLocation::Union,
            "ENUM" => DirectiveLocation::Enum,
            "ENUM_VALUE" => DirectiveLocation::EnumValue,
            "INPUT_OBJECT" => DirectiveLocation::InputObject,
            "INPUT_FIELD_DEFINITION" => DirectiveLocation::InputFieldDefinition,
            _ => return None,
        })
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An argument of a [DirectiveDefinition].
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveArgument {
    pub ty: TypeExpr,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl DirectiveArgument {
    pub fn new(ty: TypeExpr) -> Self {
        DirectiveArgument {
            ty,
            default_value: None,
            description: None,
        }
    }

    pub fn with_default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A directive declaration, e.g. `directive @cache(ttl: Int) on FIELD_DEFINITION`.
///
/// Declarations are shared between composers as `Rc<DirectiveDefinition>`, which is why their
/// argument types are name-based [TypeExpr]s.
/// [Reference](https://spec.graphql.org/October2021/#sec-Type-System.Directives)
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub args: IndexMap<String, DirectiveArgument>,
    pub locations: Vec<DirectiveLocation>,
    pub is_repeatable: bool,
}

impl DirectiveDefinition {
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(DirectiveDefinition {
            name,
            description: None,
            args: IndexMap::new(),
            locations: Vec::new(),
            is_repeatable: false,
        })
    }

    pub fn with_arg<S: Into<String>>(mut self, name: S, arg: DirectiveArgument) -> Self {
        self.args.insert(name.into(), arg);
        self
    }

    pub fn with_location(mut self, location: DirectiveLocation) -> Self {
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }

    /// Whether this is one of the directives every schema declares implicitly.
    pub fn is_specified(&self) -> bool {
        matches!(self.name.as_str(), "skip" | "include" | "deprecated")
    }
}

fn conditional_directive(name: &str, description: &str) -> Result<DirectiveDefinition> {
    let condition = TypeExpr::NonNull(Box::new(TypeExpr::Named("Boolean".into())));
    let mut argument = DirectiveArgument::new(condition);
    argument.description = Some(match name {
        "skip" => "Skipped when true.".to_string(),
        _ => "Included when true.".to_string(),
    });
    let mut definition = DirectiveDefinition::new(name)?
        .with_arg("if", argument)
        .with_location(DirectiveLocation::Field)
        .with_location(DirectiveLocation::FragmentSpread)
        .with_location(DirectiveLocation::InlineFragment);
    definition.description = Some(description.to_string());
    Ok(definition)
}

/// Returns fresh instances of the built-in `@skip`, `@include` and `@deprecated` directives.
pub fn specified_directives() -> Vec<Rc<DirectiveDefinition>> {
    let deprecated = DirectiveDefinition::new("deprecated").map(|definition| {
        let mut reason = DirectiveArgument::new(TypeExpr::Named("String".into()))
            .with_default(DEFAULT_DEPRECATION_REASON);
        reason.description = Some("Explains why this element was deprecated.".to_string());
        let mut definition = definition
            .with_arg("reason", reason)
            .with_location(DirectiveLocation::FieldDefinition)
            .with_location(DirectiveLocation::ArgumentDefinition)
            .with_location(DirectiveLocation::InputFieldDefinition)
            .with_location(DirectiveLocation::EnumValue);
        definition.description =
            Some("Marks an element of a GraphQL schema as no longer supported.".to_string());
        definition
    });

    [
        conditional_directive(
            "skip",
            "Directs the executor to skip this field or fragment when the `if` argument is true.",
        ),
        conditional_directive(
            "include",
            "Directs the executor to include this field or fragment only when the `if` argument is true.",
        ),
        deprecated,
    ]
    .into_iter()
    .filter_map(|definition| definition.ok())
    .map(Rc::new)
    .collect()
}

/// Reads the reason out of an applied `@deprecated` directive.
pub(crate) fn deprecation_reason(directive: &Directive) -> Result<String> {
    match directive.arg("reason") {
        None | Some(Value::Null) => Ok(DEFAULT_DEPRECATION_REASON.to_string()),
        Some(Value::String(reason)) => Ok(reason.clone()),
        Some(value) => Err(Error::invalid(format!(
            "Expected `reason` of `@deprecated` to be a string, got `{}`.",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specified_directives_are_seeded() {
        let directives = specified_directives();
        let names: Vec<&str> = directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["skip", "include", "deprecated"]);
        assert!(directives.iter().all(|d| d.is_specified()));

        let reason = &directives[2].args["reason"];
        assert_eq!(
            reason.default_value,
            Some(Value::from(DEFAULT_DEPRECATION_REASON))
        );
    }

    #[test]
    fn reads_deprecation_reasons() {
        let bare = Directive::new("deprecated");
        assert_eq!(deprecation_reason(&bare).unwrap(), DEFAULT_DEPRECATION_REASON);
        let custom = Directive::new("deprecated").with_arg("reason", "Use `name`");
        assert_eq!(deprecation_reason(&custom).unwrap(), "Use `name`");
        let invalid = Directive::new("deprecated").with_arg("reason", 1);
        assert!(deprecation_reason(&invalid).is_err());
    }

    #[test]
    fn locations_are_not_duplicated() {
        let definition = DirectiveDefinition::new("cache")
            .unwrap()
            .with_location(DirectiveLocation::Object)
            .with_location(DirectiveLocation::Object);
        assert_eq!(definition.locations, [DirectiveLocation::Object]);
        assert_eq!(
            DirectiveLocation::from_name("INPUT_FIELD_DEFINITION"),
            Some(DirectiveLocation::InputFieldDefinition)
        );
        assert!(DirectiveDefinition::new("not valid").is_err());
    }
}
