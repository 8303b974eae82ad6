use super::parse_ast::*;
use super::parser::ParseSdl;
use crate::composer::{
    deprecation_reason, Annotated, Annotations, ComposeFields, ComposeInterfaces, Directive,
    DirectiveArgument, DirectiveDefinition, EnumValue, Field, InputValue, SchemaComposer,
    TypeExpr, TypeId, TypeRef,
};
use crate::context::ASTContext;
use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

impl<'a> ValueNode<'a> {
    pub(crate) fn to_value(&self) -> Value {
        match self {
            ValueNode::Null => Value::Null,
            ValueNode::Int(value) => Value::Int(*value),
            ValueNode::Float(value) => Value::Float(*value),
            ValueNode::String(value) => Value::String(value.to_string()),
            ValueNode::Boolean(value) => Value::Boolean(*value),
            ValueNode::Enum(value) => Value::Enum(value.to_string()),
            ValueNode::List(values) => Value::List(values.iter().map(ValueNode::to_value).collect()),
            ValueNode::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_value()))
                    .collect(),
            ),
        }
    }
}

impl<'a> TypeNode<'a> {
    pub(crate) fn to_expr(&self) -> TypeExpr {
        match self {
            TypeNode::Named(name) => TypeExpr::Named(name.to_string()),
            TypeNode::List(inner) => TypeExpr::List(Box::new(inner.to_expr())),
            TypeNode::NonNull(inner) => TypeExpr::NonNull(Box::new(inner.to_expr())),
        }
    }
}

impl<'a> DirectiveNode<'a> {
    fn to_directive(&self) -> Directive {
        Directive {
            name: self.name.to_string(),
            args: self
                .arguments
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_value()))
                .collect(),
        }
    }
}

/// Parses a single constant value, e.g. `{ first: 10 }`.
pub fn parse_value(source: &str) -> Result<Value> {
    let ctx = ASTContext::new();
    Ok(ValueNode::parse(&ctx, source)?.to_value())
}

/// Splits `@deprecated` off a list of applied directives, returning its reason and the annotations
/// made from the remaining directives.
fn annotations_with_deprecation(
    description: Option<&str>,
    directives: &[DirectiveNode<'_>],
) -> Result<(Annotations, Option<String>)> {
    let mut annotations = Annotations {
        description: description.map(str::to_string),
        ..Annotations::default()
    };
    let mut deprecation = None;
    for directive in directives.iter().map(DirectiveNode::to_directive) {
        if directive.name == "deprecated" {
            if deprecation.is_none() {
                deprecation = Some(deprecation_reason(&directive)?);
            }
        } else {
            annotations.directives.push(directive);
        }
    }
    Ok((annotations, deprecation))
}

fn load_input_value(
    composer: &mut SchemaComposer,
    node: &InputValueNode<'_>,
) -> Result<InputValue> {
    let (annotations, deprecation) =
        annotations_with_deprecation(node.description, &node.directives)?;
    let mut input = InputValue::new(composer.resolve_expr(&node.ty.to_expr())?);
    input.default_value = node.default_value.as_ref().map(ValueNode::to_value);
    input.deprecation_reason = deprecation;
    *input.annotations_mut() = annotations;
    Ok(input)
}

fn load_fields(
    composer: &mut SchemaComposer,
    nodes: &[FieldNode<'_>],
) -> Result<IndexMap<String, Field>> {
    let mut fields = IndexMap::with_capacity(nodes.len());
    for node in nodes.iter() {
        let (annotations, deprecation) =
            annotations_with_deprecation(node.description, &node.directives)?;
        let mut field = Field::new(composer.resolve_expr(&node.ty.to_expr())?);
        for argument in node.arguments.iter() {
            field.set_arg(argument.name, load_input_value(composer, argument)?)?;
        }
        field.deprecation_reason = deprecation;
        *field.annotations_mut() = annotations;
        fields.insert(node.name.to_string(), field);
    }
    Ok(fields)
}

fn load_refs(composer: &mut SchemaComposer, names: &[&str]) -> Result<Vec<TypeRef>> {
    names
        .iter()
        .map(|name| composer.resolve_expr(&TypeExpr::Named(name.to_string())))
        .collect()
}

fn load_directive_definition(node: &DirectiveDefinitionNode<'_>) -> Result<DirectiveDefinition> {
    let mut definition = DirectiveDefinition::new(node.name)?;
    definition.description = node.description.map(str::to_string);
    definition.is_repeatable = node.is_repeatable;
    for argument in node.arguments.iter() {
        let mut converted = DirectiveArgument::new(argument.ty.to_expr());
        converted.default_value = argument.default_value.as_ref().map(ValueNode::to_value);
        converted.description = argument.description.map(str::to_string);
        definition.args.insert(argument.name.to_string(), converted);
    }
    for location in node.locations.iter() {
        definition = definition.with_location(*location);
    }
    Ok(definition)
}

impl SchemaComposer {
    /// Parses SDL and loads every definition it contains into this composer.
    ///
    /// Types are created before any of their fields are loaded, so definitions may refer to each
    /// other in any order. Names that are neither defined in the document nor registered already
    /// become deferred references that are looked up when they're first used. Definitions of
    /// types that already exist, and `extend` definitions, add to the existing types.
    ///
    /// Returns the handles of all defined or extended types in source order.
    pub fn add_type_defs(&mut self, sdl: &str) -> Result<Vec<TypeId>> {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, sdl)?;
        self.load_document(document)
    }

    /// Creates a type from a single SDL type definition and returns its handle.
    pub fn create_tc(&mut self, sdl: &str) -> Result<TypeId> {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, sdl)?;
        match &document.definitions[..] {
            [Definition::Type(definition)] if !definition.is_extension => {}
            _ => {
                return Err(Error::invalid(
                    "Expected the SDL to contain exactly one type definition.",
                ))
            }
        }
        self.load_document(document)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("The SDL did not define a type."))
    }

    /// Creates a composer holding everything an SDL document defines.
    pub fn from_sdl(sdl: &str) -> Result<SchemaComposer> {
        let mut composer = SchemaComposer::new();
        composer.add_type_defs(sdl)?;
        Ok(composer)
    }

    fn load_document(&mut self, document: &Document<'_>) -> Result<Vec<TypeId>> {
        let mut loaded: Vec<(TypeId, &TypeDefinitionNode<'_>)> = Vec::new();
        for definition in document.definitions.iter() {
            if let Definition::Type(definition) = definition {
                loaded.push((self.load_shell(definition)?, definition));
            }
        }
        for (id, definition) in loaded.iter() {
            self.load_contents(*id, &definition.contents)?;
        }

        for definition in document.definitions.iter() {
            match definition {
                Definition::Directive(directive) => {
                    self.set_directive(Rc::new(load_directive_definition(directive)?));
                }
                Definition::Schema(schema) => self.load_schema_definition(schema)?,
                Definition::Type(_) => {}
            }
        }

        let mut ids: Vec<TypeId> = Vec::with_capacity(loaded.len());
        for (id, _) in loaded {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        tracing::debug!(
            definitions = document.len(),
            types = ids.len(),
            "loaded type definitions"
        );
        Ok(ids)
    }

    fn load_shell(&mut self, definition: &TypeDefinitionNode<'_>) -> Result<TypeId> {
        let name = definition.name;
        let id = match definition.contents {
            TypeContents::Object { .. } => self.create_object_tc(name)?,
            TypeContents::Interface { .. } => self.create_interface_tc(name)?,
            TypeContents::InputObject { .. } => self.create_input_tc(name)?,
            TypeContents::Union { .. } => self.create_union_tc(name)?,
            TypeContents::Enum { .. } => self.create_enum_tc(name)?,
            TypeContents::Scalar => self.create_scalar_tc(name)?,
        };
        let node = self.registry.node_mut(id)?;
        if let Some(description) = definition.description {
            node.set_description(Some(description.to_string()));
        }
        for directive in definition.directives.iter() {
            node.add_directive(directive.to_directive());
        }
        Ok(id)
    }

    fn load_contents(&mut self, id: TypeId, contents: &TypeContents<'_>) -> Result<()> {
        match contents {
            TypeContents::Object { interfaces, fields } => {
                let fields = load_fields(self, fields)?;
                let interfaces = load_refs(self, interfaces)?;
                let object = self.object_mut(id)?;
                object.fields_mut().extend(fields);
                for interface in interfaces {
                    object.add_interface(interface)?;
                }
            }
            TypeContents::Interface { interfaces, fields } => {
                let fields = load_fields(self, fields)?;
                let interfaces = load_refs(self, interfaces)?;
                let interface = self.interface_mut(id)?;
                interface.fields_mut().extend(fields);
                for implemented in interfaces {
                    interface.add_interface(implemented)?;
                }
            }
            TypeContents::InputObject { fields } => {
                let mut loaded = Vec::with_capacity(fields.len());
                for field in fields.iter() {
                    loaded.push((field.name, load_input_value(self, field)?));
                }
                let input = self.input_object_mut(id)?;
                for (name, field) in loaded {
                    input.set_field(name, field)?;
                }
            }
            TypeContents::Union { members } => {
                let members = load_refs(self, members)?;
                let union = self.union_type_mut(id)?;
                for member in members {
                    union.add_member(member)?;
                }
            }
            TypeContents::Enum { values } => {
                let target = self.enum_type_mut(id)?;
                for value in values.iter() {
                    let (annotations, deprecation) =
                        annotations_with_deprecation(value.description, &value.directives)?;
                    let mut enum_value = EnumValue::new();
                    enum_value.deprecation_reason = deprecation;
                    *enum_value.annotations_mut() = annotations;
                    target.set_value(value.name, enum_value)?;
                }
            }
            TypeContents::Scalar => {}
        }
        Ok(())
    }

    fn load_schema_definition(&mut self, schema: &SchemaDefinitionNode<'_>) -> Result<()> {
        if let Some(description) = schema.description {
            self.description = Some(description.to_string());
        }
        for (kind, name) in schema.operations.iter() {
            let id = self.create_object_tc(name)?;
            self.registry.set(kind.root_key(), id);
        }
        if !schema.directives.is_empty() {
            tracing::debug!(
                directives = schema.directives.len(),
                "ignored directives applied to the schema definition"
            );
        }
        Ok(())
    }
}
