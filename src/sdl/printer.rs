use crate::composer::{
    is_builtin_scalar, Annotated, ComposeFields, ComposeInterfaces, Directive, DirectiveDefinition,
    Field, InputValue, NamedType, SchemaComposer, TypeKey, TypeRef,
    DEFAULT_DEPRECATION_REASON,
};
use crate::error::Result;
use crate::schema::OperationKind;
use crate::value::{write_description, write_indent, write_string, Value};
use indexmap::IndexMap;
use std::fmt::Write;

/// Options for [SchemaComposer::to_sdl] and [SchemaComposer::print_type].
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// Leaves out the descriptions of the schema, types, fields, arguments and values.
    pub omit_descriptions: bool,
    /// Leaves out `directive` definitions. The specified directives are never printed.
    pub omit_directive_definitions: bool,
    /// Prints types ordered by name instead of in the order they were created.
    pub sort_types: bool,
    /// Prints `scalar` definitions for the built-in scalars too.
    pub include_builtin_scalars: bool,
    /// Names of types that are left out.
    pub exclude: Vec<String>,
}

/// An argument, input field or directive argument as it's printed.
struct InputLine<'x> {
    name: &'x str,
    description: Option<&'x str>,
    ty: String,
    default_value: Option<&'x Value>,
    deprecation_reason: Option<&'x str>,
    directives: &'x [Directive],
}

struct Printer<'c> {
    composer: &'c SchemaComposer,
    options: &'c PrintOptions,
}

impl<'c> Printer<'c> {
    fn description(&self, description: Option<&str>, level: usize, out: &mut String) -> Result<()> {
        match description {
            Some(description) if !self.options.omit_descriptions => {
                write_indent(level, out)?;
                write_description(description, level, out)?;
                out.push('\n');
            }
            _ => {}
        }
        Ok(())
    }

    fn directives(&self, directives: &[Directive], out: &mut String) -> Result<()> {
        for directive in directives.iter() {
            write!(out, " @{}", directive.name)?;
            if !directive.args.is_empty() {
                out.push('(');
                for (index, (name, value)) in directive.args.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    write!(out, "{}: ", name)?;
                    value.write_to_buffer(out)?;
                }
                out.push(')');
            }
        }
        Ok(())
    }

    fn deprecation(&self, reason: Option<&str>, out: &mut String) -> Result<()> {
        match reason {
            None => {}
            Some(DEFAULT_DEPRECATION_REASON) => out.push_str(" @deprecated"),
            Some(reason) => {
                out.push_str(" @deprecated(reason: ");
                write_string(reason, out)?;
                out.push(')');
            }
        }
        Ok(())
    }

    fn input_line(&self, line: &InputLine<'_>, out: &mut String) -> Result<()> {
        write!(out, "{}: {}", line.name, line.ty)?;
        if let Some(value) = line.default_value {
            out.push_str(" = ");
            value.write_to_buffer(out)?;
        }
        self.deprecation(line.deprecation_reason, out)?;
        self.directives(line.directives, out)
    }

    /// Prints arguments on one line, or one per line when any of them is described.
    fn arguments(&self, lines: &[InputLine<'_>], level: usize, out: &mut String) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let multiline = !self.options.omit_descriptions
            && lines.iter().any(|line| line.description.is_some());
        out.push('(');
        for (index, line) in lines.iter().enumerate() {
            if multiline {
                out.push('\n');
                self.description(line.description, level + 1, out)?;
                write_indent(level + 1, out)?;
            } else if index > 0 {
                out.push_str(", ");
            }
            self.input_line(line, out)?;
        }
        if multiline {
            out.push('\n');
            write_indent(level, out)?;
        }
        out.push(')');
        Ok(())
    }

    fn input_value<'x>(&self, name: &'x str, value: &'x InputValue) -> Result<InputLine<'x>> {
        Ok(InputLine {
            name,
            description: value.description(),
            ty: value.ty.type_name(self.composer)?,
            default_value: value.default_value.as_ref(),
            deprecation_reason: value.deprecation_reason.as_deref(),
            directives: value.directives(),
        })
    }

    fn fields(&self, fields: &IndexMap<String, Field>, out: &mut String) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        out.push_str(" {\n");
        for (name, field) in fields.iter() {
            self.description(field.description(), 1, out)?;
            write_indent(1, out)?;
            out.push_str(name);
            let arguments = field
                .args
                .iter()
                .map(|(name, arg)| self.input_value(name, arg))
                .collect::<Result<Vec<_>>>()?;
            self.arguments(&arguments, 1, out)?;
            write!(out, ": {}", field.ty.type_name(self.composer)?)?;
            self.deprecation(field.deprecation_reason.as_deref(), out)?;
            self.directives(field.directives(), out)?;
            out.push('\n');
        }
        out.push('}');
        Ok(())
    }

    fn refs(&self, refs: &[TypeRef], separator: &str, out: &mut String) -> Result<()> {
        for (index, ty) in refs.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            out.push_str(&ty.type_name(self.composer)?);
        }
        Ok(())
    }

    fn named_type(&self, node: &NamedType) -> Result<String> {
        let mut out = String::new();
        self.description(node.description(), 0, &mut out)?;
        write!(out, "{} {}", node.kind().keyword(), node.name())?;
        match node {
            NamedType::Object(object) => {
                if !object.interfaces().is_empty() {
                    out.push_str(" implements ");
                    self.refs(object.interfaces(), " & ", &mut out)?;
                }
                self.directives(object.directives(), &mut out)?;
                self.fields(object.fields(), &mut out)?;
            }
            NamedType::Interface(interface) => {
                if !interface.interfaces().is_empty() {
                    out.push_str(" implements ");
                    self.refs(interface.interfaces(), " & ", &mut out)?;
                }
                self.directives(interface.directives(), &mut out)?;
                self.fields(interface.fields(), &mut out)?;
            }
            NamedType::InputObject(input) => {
                self.directives(input.directives(), &mut out)?;
                if !input.fields().is_empty() {
                    out.push_str(" {\n");
                    for (name, field) in input.fields().iter() {
                        self.description(field.description(), 1, &mut out)?;
                        write_indent(1, &mut out)?;
                        self.input_line(&self.input_value(name, field)?, &mut out)?;
                        out.push('\n');
                    }
                    out.push('}');
                }
            }
            NamedType::Union(union) => {
                self.directives(union.directives(), &mut out)?;
                if !union.members().is_empty() {
                    out.push_str(" = ");
                    self.refs(union.members(), " | ", &mut out)?;
                }
            }
            NamedType::Enum(enum_type) => {
                self.directives(enum_type.directives(), &mut out)?;
                if !enum_type.values().is_empty() {
                    out.push_str(" {\n");
                    for (name, value) in enum_type.values().iter() {
                        self.description(value.description(), 1, &mut out)?;
                        write_indent(1, &mut out)?;
                        out.push_str(name);
                        self.deprecation(value.deprecation_reason.as_deref(), &mut out)?;
                        self.directives(value.directives(), &mut out)?;
                        out.push('\n');
                    }
                    out.push('}');
                }
            }
            NamedType::Scalar(scalar) => self.directives(scalar.directives(), &mut out)?,
        }
        Ok(out)
    }

    fn directive_definition(&self, directive: &DirectiveDefinition) -> Result<String> {
        let mut out = String::new();
        self.description(directive.description.as_deref(), 0, &mut out)?;
        write!(out, "directive @{}", directive.name)?;
        let arguments: Vec<InputLine<'_>> = directive
            .args
            .iter()
            .map(|(name, arg)| InputLine {
                name,
                description: arg.description.as_deref(),
                ty: arg.ty.to_string(),
                default_value: arg.default_value.as_ref(),
                deprecation_reason: None,
                directives: &[],
            })
            .collect();
        self.arguments(&arguments, 0, &mut out)?;
        if directive.is_repeatable {
            out.push_str(" repeatable");
        }
        out.push_str(" on ");
        for (index, location) in directive.locations.iter().enumerate() {
            if index > 0 {
                out.push_str(" | ");
            }
            out.push_str(location.as_str());
        }
        Ok(out)
    }

    /// Prints a `schema` definition when a root type isn't named after its operation, or when
    /// the schema is described.
    fn schema_definition(&self) -> Result<Option<String>> {
        let mut roots = Vec::new();
        for kind in OperationKind::ALL {
            if let Some(id) = self.composer.root_type(kind) {
                roots.push((kind, self.composer.type_name(id)?));
            }
        }
        let description = self
            .composer
            .description()
            .filter(|_| !self.options.omit_descriptions);
        let renamed = roots.iter().any(|(kind, name)| kind.root_key() != *name);
        if roots.is_empty() || (!renamed && description.is_none()) {
            return Ok(None);
        }

        let mut out = String::new();
        self.description(description, 0, &mut out)?;
        out.push_str("schema {\n");
        for (kind, name) in roots {
            write_indent(1, &mut out)?;
            writeln!(out, "{}: {}", kind.as_str(), name)?;
        }
        out.push('}');
        Ok(Some(out))
    }

    fn is_printed(&self, node: &NamedType) -> bool {
        let name = node.name();
        if self.options.exclude.iter().any(|excluded| excluded == name) {
            return false;
        }
        self.options.include_builtin_scalars || !(node.is_scalar() && is_builtin_scalar(name))
    }

    fn schema(&self) -> Result<String> {
        let mut sections = Vec::new();
        if let Some(schema) = self.schema_definition()? {
            sections.push(schema);
        }
        if !self.options.omit_directive_definitions {
            for directive in self.composer.directives() {
                if !directive.is_specified() {
                    sections.push(self.directive_definition(directive)?);
                }
            }
        }

        let mut nodes = Vec::new();
        for id in self.composer.types() {
            let node = self.composer.registry().node(id)?;
            if self.is_printed(node) {
                nodes.push(node);
            }
        }
        if self.options.sort_types {
            nodes.sort_by(|left, right| left.name().cmp(right.name()));
        }
        for node in nodes {
            sections.push(self.named_type(node)?);
        }

        let mut out = sections.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}

impl SchemaComposer {
    /// Prints the whole schema as SDL.
    ///
    /// Every registered type is printed once, even when nothing refers to it. Extensions are never
    /// printed.
    pub fn to_sdl(&self, options: &PrintOptions) -> Result<String> {
        Printer {
            composer: self,
            options,
        }
        .schema()
    }

    /// Prints the definition of a single type as SDL.
    pub fn print_type<'k>(
        &self,
        key: impl Into<TypeKey<'k>>,
        options: &PrintOptions,
    ) -> Result<String> {
        let node = self.node(key)?;
        Printer {
            composer: self,
            options,
        }
        .named_type(node)
    }
}

