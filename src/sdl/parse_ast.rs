use crate::composer::DirectiveLocation;
use crate::schema::OperationKind;
use bumpalo::collections::Vec;

/// A constant value as it's written in SDL, e.g. a default value or a directive argument.
#[derive(Debug, PartialEq)]
pub(crate) enum ValueNode<'a> {
    Null,
    Int(i64),
    Float(f64),
    String(&'a str),
    Boolean(bool),
    Enum(&'a str),
    List(Vec<'a, ValueNode<'a>>),
    Object(Vec<'a, (&'a str, ValueNode<'a>)>),
}

/// An applied directive, e.g. `@key(fields: "id")`.
#[derive(Debug, PartialEq)]
pub(crate) struct DirectiveNode<'a> {
    pub name: &'a str,
    pub arguments: Vec<'a, (&'a str, ValueNode<'a>)>,
}

/// A type expression, e.g. `[String!]!`.
#[derive(Debug, PartialEq)]
pub(crate) enum TypeNode<'a> {
    Named(&'a str),
    List(&'a TypeNode<'a>),
    NonNull(&'a TypeNode<'a>),
}

/// An argument or an input field definition.
#[derive(Debug, PartialEq)]
pub(crate) struct InputValueNode<'a> {
    pub description: Option<&'a str>,
    pub name: &'a str,
    pub ty: &'a TypeNode<'a>,
    pub default_value: Option<ValueNode<'a>>,
    pub directives: Vec<'a, DirectiveNode<'a>>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct FieldNode<'a> {
    pub description: Option<&'a str>,
    pub name: &'a str,
    pub arguments: Vec<'a, InputValueNode<'a>>,
    pub ty: &'a TypeNode<'a>,
    pub directives: Vec<'a, DirectiveNode<'a>>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct EnumValueNode<'a> {
    pub description: Option<&'a str>,
    pub name: &'a str,
    pub directives: Vec<'a, DirectiveNode<'a>>,
}

/// The kind-specific contents of a type definition or extension.
#[derive(Debug, PartialEq)]
pub(crate) enum TypeContents<'a> {
    Object {
        interfaces: Vec<'a, &'a str>,
        fields: Vec<'a, FieldNode<'a>>,
    },
    Interface {
        interfaces: Vec<'a, &'a str>,
        fields: Vec<'a, FieldNode<'a>>,
    },
    InputObject {
        fields: Vec<'a, InputValueNode<'a>>,
    },
    Union {
        members: Vec<'a, &'a str>,
    },
    Enum {
        values: Vec<'a, EnumValueNode<'a>>,
    },
    Scalar,
}

#[derive(Debug, PartialEq)]
pub(crate) struct TypeDefinitionNode<'a> {
    pub description: Option<&'a str>,
    pub name: &'a str,
    /// Whether this is an `extend` of a type that's defined elsewhere.
    pub is_extension: bool,
    pub directives: Vec<'a, DirectiveNode<'a>>,
    pub contents: TypeContents<'a>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct SchemaDefinitionNode<'a> {
    pub description: Option<&'a str>,
    pub is_extension: bool,
    pub directives: Vec<'a, DirectiveNode<'a>>,
    pub operations: Vec<'a, (OperationKind, &'a str)>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct DirectiveDefinitionNode<'a> {
    pub description: Option<&'a str>,
    pub name: &'a str,
    pub arguments: Vec<'a, InputValueNode<'a>>,
    pub is_repeatable: bool,
    pub locations: Vec<'a, DirectiveLocation>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Definition<'a> {
    Schema(SchemaDefinitionNode<'a>),
    Directive(DirectiveDefinitionNode<'a>),
    Type(TypeDefinitionNode<'a>),
}

/// A parsed SDL document, with its definitions in source order.
#[derive(Debug, PartialEq)]
pub struct Document<'a> {
    pub(crate) definitions: Vec<'a, Definition<'a>>,
}

impl<'a> Document<'a> {
    /// Returns the number of definitions and extensions in the document.
    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the names of all type definitions and extensions in source order.
    pub fn type_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Type(type_definition) => Some(type_definition.name),
            _ => None,
        })
    }
}
