use super::directive::{deprecation_reason, DirectiveDefinition};
use super::fields::{Field, InputValue};
use super::named::{is_builtin_scalar, Annotated, NamedType};
use super::registry::TypeId;
use super::schema_composer::SchemaComposer;
use super::type_ref::TypeRef;
use super::types::ScalarType;
use crate::context::{ASTContext, DefaultIn};
use crate::error::{Error, Result};
use crate::schema::{
    OperationKind, Schema, SchemaDirective, SchemaEnum, SchemaEnumValue, SchemaField,
    SchemaFields, SchemaInputField, SchemaInputObject, SchemaInterface, SchemaInterfaces,
    SchemaObject, SchemaPossibleTypes, SchemaScalar, SchemaType, SchemaUnion,
};
use crate::value::Extensions;
use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;
use std::rc::Rc;

/// Options for [SchemaComposer::build_schema].
#[derive(Debug, Clone, Default)]
pub struct BuildSchemaOptions {
    /// Overrides the composer's schema description.
    pub description: Option<String>,
    /// Additional types to include even when nothing refers to them.
    pub types: Vec<TypeId>,
    /// Additional directive declarations. Same-named declarations of the composer win.
    pub directives: Vec<Rc<DirectiveDefinition>>,
    pub extensions: Extensions,
    /// Includes every registered type, whether it's reachable or not.
    pub keep_unused_types: bool,
}

/// Finds object and interface types that have no fields left once fields returning such empty
/// types are removed.
///
/// Types are memoized by name. A type that's still being visited counts as non-empty, which
/// keeps mutually recursive types alive.
struct EmptyTypePruner<'c> {
    composer: &'c SchemaComposer,
    visited: HashMap<String, bool>,
    empty: HashSet<TypeId>,
    pruned: HashSet<(TypeId, String)>,
}

impl<'c> EmptyTypePruner<'c> {
    fn new(composer: &'c SchemaComposer) -> Self {
        EmptyTypePruner {
            composer,
            visited: HashMap::new(),
            empty: HashSet::new(),
            pruned: HashSet::new(),
        }
    }

    /// Returns whether the given type is empty.
    fn visit(&mut self, id: TypeId) -> Result<bool> {
        let composer = self.composer;
        let node = composer.registry.node(id)?;
        let fields = match node {
            NamedType::Object(object) => &object.fields,
            NamedType::Interface(interface) => &interface.fields,
            _ => return Ok(false),
        };
        if let Some(is_empty) = self.visited.get(node.name()) {
            return Ok(*is_empty);
        }
        self.visited.insert(node.name().to_string(), false);

        let mut kept = 0;
        for (name, field) in fields.iter() {
            let field_type = field.ty.unwrap_named(composer)?;
            if self.visit(field_type)? {
                tracing::debug!(
                    type_name = node.name(),
                    field = name.as_str(),
                    "removing field that returns an empty type"
                );
                self.pruned.insert((id, name.clone()));
            } else {
                kept += 1;
            }
        }

        let is_empty = kept == 0;
        self.visited.insert(node.name().to_string(), is_empty);
        if is_empty {
            self.empty.insert(id);
        }
        Ok(is_empty)
    }
}

/// Collects the types reachable from a set of starting types in breadth-first order.
struct Reachability<'c> {
    composer: &'c SchemaComposer,
    pruned: &'c HashSet<(TypeId, String)>,
    seen: HashSet<TypeId>,
    queue: VecDeque<TypeId>,
    order: Vec<TypeId>,
}

impl<'c> Reachability<'c> {
    fn new(composer: &'c SchemaComposer, pruned: &'c HashSet<(TypeId, String)>) -> Self {
        Reachability {
            composer,
            pruned,
            seen: HashSet::new(),
            queue: VecDeque::new(),
            order: Vec::new(),
        }
    }

    fn push(&mut self, id: TypeId) {
        if self.seen.insert(id) {
            self.queue.push_back(id);
        }
    }

    fn push_ref(&mut self, ty: &TypeRef) -> Result<()> {
        let id = ty.unwrap_named(self.composer)?;
        self.push(id);
        Ok(())
    }

    fn push_fields<'f>(
        &mut self,
        owner: TypeId,
        fields: impl Iterator<Item = (&'f String, &'f Field)>,
    ) -> Result<()> {
        for (name, field) in fields {
            if self.pruned.contains(&(owner, name.clone())) {
                continue;
            }
            self.push_ref(&field.ty)?;
            for arg in field.args.values() {
                self.push_ref(&arg.ty)?;
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let composer = self.composer;
        while let Some(id) = self.queue.pop_front() {
            self.order.push(id);
            match composer.registry.node(id)? {
                NamedType::Object(object) => {
                    self.push_fields(id, object.fields.iter())?;
                    for interface in object.interfaces.iter() {
                        self.push_ref(interface)?;
                    }
                }
                NamedType::Interface(interface) => {
                    self.push_fields(id, interface.fields.iter())?;
                    for parent in interface.interfaces.iter() {
                        self.push_ref(parent)?;
                    }
                }
                NamedType::InputObject(input) => {
                    for field in input.fields.values() {
                        self.push_ref(&field.ty)?;
                    }
                }
                NamedType::Union(union) => {
                    for member in union.members.iter() {
                        self.push_ref(member)?;
                    }
                }
                NamedType::Enum(_) | NamedType::Scalar(_) => {}
            }
        }
        Ok(())
    }
}

fn alloc_description<'a>(ctx: &'a ASTContext, node: &impl Annotated) -> Option<&'a str> {
    node.description().map(|description| ctx.alloc_str(description))
}

/// Returns the deprecation reason of an element, from its own field or its `@deprecated`
/// directive.
fn alloc_deprecation<'a>(
    ctx: &'a ASTContext,
    reason: &Option<String>,
    node: &impl Annotated,
) -> Result<Option<&'a str>> {
    if let Some(reason) = reason {
        return Ok(Some(ctx.alloc_str(reason)));
    }
    match node.directive("deprecated") {
        Some(directive) => Ok(Some(ctx.alloc_str(&deprecation_reason(directive)?))),
        None => Ok(None),
    }
}

struct SchemaBuilder<'a, 'c> {
    ctx: &'a ASTContext,
    composer: &'c SchemaComposer,
    pruned: &'c HashSet<(TypeId, String)>,
    /// Names of all object and interface types implementing an interface
    implementations: HashMap<String, (Vec<String>, Vec<String>)>,
}

impl<'a, 'c> SchemaBuilder<'a, 'c> {
    fn input_field(
        &self,
        name: &str,
        value: &InputValue,
    ) -> Result<SchemaInputField<'a>> {
        let ctx = self.ctx;
        let mut input = SchemaInputField::new(
            ctx.alloc_str(name),
            value.ty.runtime_type(ctx, self.composer)?,
        );
        input.description = alloc_description(ctx, value);
        input.default_value = value
            .default_value
            .as_ref()
            .map(|default_value| ctx.alloc_str(&default_value.to_string()));
        input.deprecation_reason = alloc_deprecation(ctx, &value.deprecation_reason, value)?;
        Ok(input)
    }

    fn field(&self, name: &str, field: &Field) -> Result<SchemaField<'a>> {
        let ctx = self.ctx;
        let mut output = SchemaField::new(
            ctx,
            ctx.alloc_str(name),
            field.ty.runtime_type(ctx, self.composer)?,
        );
        output.description = alloc_description(ctx, field);
        output.deprecation_reason = alloc_deprecation(ctx, &field.deprecation_reason, field)?;
        for (arg_name, arg) in field.args.iter() {
            output.add_argument(ctx, self.input_field(arg_name, arg)?);
        }
        Ok(output)
    }

    fn interface_names(&self, interfaces: &[TypeRef]) -> Result<Vec<&'a str>> {
        interfaces
            .iter()
            .map(|interface| {
                let id = interface.unwrap_named(self.composer)?;
                Ok(self.ctx.alloc_str(self.composer.registry.node(id)?.name()))
            })
            .collect()
    }

    fn convert(&self, id: TypeId) -> Result<&'a SchemaType<'a>> {
        let ctx = self.ctx;
        let node = self.composer.registry.node(id)?;
        let name = ctx.alloc_str(node.name());
        let description = alloc_description(ctx, node);

        let schema_type = match node {
            NamedType::Object(object) => {
                let mut schema_object = SchemaObject::new(ctx, name);
                schema_object.description = description;
                for (field_name, field) in object.fields.iter() {
                    if !self.pruned.contains(&(id, field_name.clone())) {
                        schema_object.add_field(ctx, self.field(field_name, field)?);
                    }
                }
                for interface in self.interface_names(&object.interfaces)? {
                    schema_object.add_interface(ctx, interface);
                }
                SchemaType::Object(ctx.alloc(schema_object))
            }
            NamedType::Interface(interface) => {
                let mut schema_interface = SchemaInterface::new(ctx, name);
                schema_interface.description = description;
                for (field_name, field) in interface.fields.iter() {
                    if !self.pruned.contains(&(id, field_name.clone())) {
                        schema_interface.add_field(ctx, self.field(field_name, field)?);
                    }
                }
                for parent in self.interface_names(&interface.interfaces)? {
                    schema_interface.add_interface(ctx, parent);
                }
                if let Some((objects, interfaces)) = self.implementations.get(node.name()) {
                    for object in objects.iter() {
                        schema_interface.add_possible_type(ctx, ctx.alloc_str(object));
                    }
                    for implementing in interfaces.iter() {
                        schema_interface.add_possible_interface(ctx, ctx.alloc_str(implementing));
                    }
                }
                SchemaType::Interface(ctx.alloc(schema_interface))
            }
            NamedType::InputObject(input) => {
                let mut schema_input = SchemaInputObject::new(ctx, name);
                schema_input.description = description;
                for (field_name, field) in input.fields.iter() {
                    schema_input.add_field(ctx, self.input_field(field_name, field)?);
                }
                SchemaType::InputObject(ctx.alloc(schema_input))
            }
            NamedType::Union(union) => {
                let mut schema_union = SchemaUnion::new(ctx, name);
                schema_union.description = description;
                for member in self.interface_names(&union.members)? {
                    schema_union.add_possible_type(ctx, member);
                }
                SchemaType::Union(ctx.alloc(schema_union))
            }
            NamedType::Enum(enum_type) => {
                let mut schema_enum = SchemaEnum::new(ctx, name);
                schema_enum.description = description;
                for (value_name, value) in enum_type.values.iter() {
                    let mut schema_value = SchemaEnumValue::new(ctx.alloc_str(value_name));
                    schema_value.description = alloc_description(ctx, value);
                    schema_value.deprecation_reason =
                        alloc_deprecation(ctx, &value.deprecation_reason, value)?;
                    schema_enum.add_value(ctx, schema_value);
                }
                SchemaType::Enum(ctx.alloc(schema_enum))
            }
            NamedType::Scalar(scalar) => {
                let mut schema_scalar = SchemaScalar::new(name);
                schema_scalar.description = alloc_description(ctx, scalar);
                SchemaType::Scalar(ctx.alloc(schema_scalar))
            }
        };
        Ok(ctx.alloc(schema_type))
    }

    fn directive(&self, definition: &DirectiveDefinition) -> Result<&'a SchemaDirective<'a>> {
        let ctx = self.ctx;
        let mut directive = SchemaDirective::new(ctx, ctx.alloc_str(&definition.name));
        directive.description = definition
            .description
            .as_deref()
            .map(|description| ctx.alloc_str(description));
        directive.is_repeatable = definition.is_repeatable;
        directive.locations.extend(definition.locations.iter().copied());
        for (name, arg) in definition.args.iter() {
            let mut input = SchemaInputField::new(ctx.alloc_str(name), arg.ty.runtime_type(ctx));
            input.description = arg
                .description
                .as_deref()
                .map(|description| ctx.alloc_str(description));
            input.default_value = arg
                .default_value
                .as_ref()
                .map(|default_value| ctx.alloc_str(&default_value.to_string()));
            directive.arguments.push(input);
        }
        Ok(ctx.alloc(directive))
    }
}

impl SchemaComposer {
    /// Builds an immutable schema from the types reachable from the root types.
    ///
    /// Object and interface types without fields can't be represented in GraphQL. Before
    /// building, fields returning such empty types are dropped, which may empty further types.
    /// An empty `Mutation` or `Subscription` root is left out of the schema, while an empty
    /// `Query` root is an error.
    pub fn build_schema<'a>(
        &self,
        ctx: &'a ASTContext,
        options: BuildSchemaOptions,
    ) -> Result<Schema<'a>> {
        let query = self.registry.get(OperationKind::Query.root_key())?;

        let mut pruner = EmptyTypePruner::new(self);
        let mut roots = Vec::with_capacity(3);
        for kind in OperationKind::ALL {
            let Some(root) = self.root_type(kind) else {
                continue;
            };
            if !matches!(self.registry.node(root)?, NamedType::Object(_)) {
                return Err(Error::invalid(format!(
                    "Root type `{}` must be an object type.",
                    kind.root_key()
                )));
            }
            if !pruner.visit(root)? {
                roots.push((kind, root));
            } else if root == query {
                return Err(Error::invalid(format!(
                    "Query root type `{}` must have at least one field.",
                    self.registry.node(root)?.name()
                )));
            } else {
                tracing::debug!(root = kind.root_key(), "leaving out empty root type");
            }
        }
        let EmptyTypePruner { empty, pruned, .. } = pruner;

        let mut reachability = Reachability::new(self, &pruned);
        for (_, root) in roots.iter() {
            reachability.push(*root);
        }
        for id in options.types.iter().chain(self.must_have_types.iter()) {
            self.registry.node(*id)?;
            reachability.push(*id);
        }
        if options.keep_unused_types {
            for id in self.registry.ids() {
                reachability.push(id);
            }
        }
        reachability.run()?;

        let mut directives: Vec<Rc<DirectiveDefinition>> = self.directives.clone();
        for directive in options.directives.iter() {
            if !directives.iter().any(|d| d.name == directive.name) {
                directives.push(directive.clone());
            }
        }

        // Directive arguments refer to types by name
        let mut synthesized: Vec<ScalarType> = Vec::new();
        for directive in directives.iter() {
            for arg in directive.args.values() {
                let type_name = arg.ty.named_type();
                let included = reachability
                    .order
                    .iter()
                    .filter_map(|id| self.registry.node(*id).ok())
                    .any(|node| node.name() == type_name);
                if included || synthesized.iter().any(|s| s.name() == type_name) {
                    continue;
                }
                match self.registry.get(type_name) {
                    Ok(id) => {
                        reachability.push(id);
                        reachability.run()?;
                    }
                    Err(_) if is_builtin_scalar(type_name) => {
                        synthesized.push(ScalarType::new(type_name)?);
                    }
                    Err(error) => return Err(error),
                }
            }
        }
        let order = reachability.order;

        let mut names: HashMap<&str, TypeId> = HashMap::new();
        for id in order.iter() {
            let name = self.registry.node(*id)?.name();
            if let Some(other) = names.insert(name, *id) {
                if other != *id {
                    return Err(Error::invalid(format!(
                        "Schema must contain uniquely named types but contains multiple types named `{}`.",
                        name
                    )));
                }
            }
        }

        let mut implementations: HashMap<String, (Vec<String>, Vec<String>)> = HashMap::new();
        for id in order.iter() {
            let (interfaces, is_object) = match self.registry.node(*id)? {
                NamedType::Object(object) => (&object.interfaces, true),
                NamedType::Interface(interface) => (&interface.interfaces, false),
                _ => continue,
            };
            let name = self.registry.node(*id)?.name();
            for interface in interfaces.iter() {
                let interface = interface.unwrap_named(self)?;
                let entry = implementations
                    .entry(self.registry.node(interface)?.name().to_string())
                    .or_default();
                if is_object {
                    entry.0.push(name.to_string());
                } else {
                    entry.1.push(name.to_string());
                }
            }
        }

        let builder = SchemaBuilder {
            ctx,
            composer: self,
            pruned: &pruned,
            implementations,
        };
        let mut schema = Schema::default_in(&ctx.arena);
        let mut built: HashMap<TypeId, &'a SchemaType<'a>> = HashMap::new();
        for id in order.iter() {
            let schema_type = builder.convert(*id)?;
            built.insert(*id, schema_type);
            schema.add_type(schema_type);
        }
        for scalar in synthesized.iter() {
            let schema_scalar = ctx.alloc(SchemaScalar::new(ctx.alloc_str(scalar.name())));
            schema.add_type(ctx.alloc(SchemaType::Scalar(schema_scalar)));
        }

        for (kind, root) in roots.iter() {
            let object = built.get(root).and_then(|schema_type| schema_type.object());
            match kind {
                OperationKind::Query => schema.query_type = object,
                OperationKind::Mutation => schema.mutation_type = object,
                OperationKind::Subscription => schema.subscription_type = object,
            }
        }
        for directive in directives.iter() {
            schema.directives.push(builder.directive(directive)?);
        }
        schema.description = options
            .description
            .as_deref()
            .or(self.description.as_deref())
            .map(|description| ctx.alloc_str(description));
        schema.extensions = options.extensions;

        tracing::debug!(
            types = schema.type_count(),
            empty_types = empty.len(),
            pruned_fields = pruned.len(),
            "built schema"
        );
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{ComposeFields, ComposeInterfaces, Directive};
    use crate::composer::{DirectiveArgument, DirectiveLocation};
    use crate::composer::{EnumValue, TypeExpr};
    use crate::error::ErrorType;
    use crate::value::Value;

    fn field(composer: &mut SchemaComposer, object: &str, name: &str, ty: &str) {
        let id = composer.create_object_tc(object).unwrap();
        let ty = composer.type_ref(ty).unwrap();
        composer
            .object_mut(id)
            .unwrap()
            .set_field(name, Field::new(ty))
            .unwrap();
    }

    fn names(schema: &Schema<'_>) -> Vec<String> {
        schema.types().map(|t| t.name().to_string()).collect()
    }

    #[test]
    fn builds_reachable_types_in_order() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "user", "User");
        field(&mut composer, "User", "name", "String");
        field(&mut composer, "User", "friends", "[User!]!");
        field(&mut composer, "Unused", "id", "ID");

        let ctx = ASTContext::new();
        let schema = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap();
        // `Boolean` is only used by the arguments of `@skip` and `@include`
        assert_eq!(names(&schema), ["Query", "User", "String", "Boolean"]);

        let query = schema.query_type().unwrap();
        assert_eq!(query.name, "Query");
        let user = schema.get_type("User").and_then(|t| t.object()).unwrap();
        let friends = user.get_field("friends").unwrap();
        assert_eq!(friends.output_type.to_string(), "[User!]!");
        assert!(schema.mutation_type().is_none());
        assert_eq!(schema.directives().len(), 3);
    }

    #[test]
    fn requires_a_query_root() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Mutation", "ping", "Boolean");
        let ctx = ASTContext::new();
        let error = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::NotFound);

        composer.query_tc().unwrap();
        let error = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidConstruction);
    }

    #[test]
    fn prunes_fields_returning_empty_types() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "hello", "String");
        field(&mut composer, "Query", "empty", "Empty");
        field(&mut composer, "Query", "wrapper", "[Wrapper]");
        field(&mut composer, "Wrapper", "inner", "Empty!");
        composer.create_object_tc("Empty").unwrap();
        composer.mutation_tc().unwrap();

        let ctx = ASTContext::new();
        let schema = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap();
        let query = schema.query_type().unwrap();
        let fields: Vec<&str> = query.get_fields().iter().map(|f| f.name).collect();
        assert_eq!(fields, ["hello"]);
        assert!(schema.get_type("Wrapper").is_none());
        assert!(schema.get_type("Empty").is_none());
        assert!(schema.mutation_type().is_none());

        // The composer itself isn't modified
        assert!(composer.object("Query").unwrap().has_field("empty"));
    }

    #[test]
    fn keeps_mutually_recursive_types() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "a", "A");
        field(&mut composer, "A", "b", "B");
        field(&mut composer, "B", "a", "A");

        let ctx = ASTContext::new();
        let schema = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap();
        assert_eq!(names(&schema), ["Query", "A", "B"]);
    }

    #[test]
    fn includes_requested_types() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "ok", "Boolean");
        field(&mut composer, "Extra", "id", "ID");
        let audit = composer.create_enum_tc("Audit").unwrap();
        composer
            .enum_type_mut(audit)
            .unwrap()
            .set_value("ON", EnumValue::new())
            .unwrap();
        composer.add_schema_must_have_type(audit).unwrap();

        let ctx = ASTContext::new();
        let options = BuildSchemaOptions {
            types: vec![composer.get("Extra").unwrap()],
            description: Some("Options win".into()),
            ..BuildSchemaOptions::default()
        };
        let schema = composer.build_schema(&ctx, options).unwrap();
        assert_eq!(
            names(&schema),
            ["Query", "Extra", "Audit", "Boolean", "ID", "String"]
        );
        assert_eq!(schema.description(), Some("Options win"));

        composer.create_union_tc("Orphan").unwrap();
        let options = BuildSchemaOptions {
            keep_unused_types: true,
            ..BuildSchemaOptions::default()
        };
        let schema = composer.build_schema(&ctx, options).unwrap();
        assert!(schema.get_type("Orphan").is_some());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "user", "User");
        field(&mut composer, "Query", "account", "Account");
        field(&mut composer, "User", "id", "ID");
        field(&mut composer, "Account", "id", "ID");
        let account = composer.get("Account").unwrap();
        composer
            .node_mut(account)
            .unwrap()
            .set_name("User".to_string());

        let ctx = ASTContext::new();
        let error = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidConstruction);
    }

    #[test]
    fn converts_metadata() {
        let mut composer = SchemaComposer::new();
        let query = composer.query_tc().unwrap();
        let node = composer.create_interface_tc("Node").unwrap();
        let id = composer.type_ref("ID!").unwrap();
        composer
            .interface_mut(node)
            .unwrap()
            .set_field("id", Field::new(id.clone()))
            .unwrap();
        let user = composer.create_object_tc("User").unwrap();
        composer
            .object_mut(user)
            .unwrap()
            .set_field("id", Field::new(id))
            .unwrap();
        composer
            .object_mut(user)
            .unwrap()
            .add_interface(TypeRef::named(node))
            .unwrap();

        let int = composer.named_type("Int").unwrap();
        let users = Field::new(TypeRef::named(user).as_list())
            .with_description("All users")
            .with_arg("first", InputValue::new(int).with_default(10))
            .unwrap()
            .with_directive(Directive::new("deprecated"));
        composer
            .object_mut(query)
            .unwrap()
            .set_field("users", users)
            .unwrap();
        let node_field = Field::new(node).with_deprecation("Use users");
        composer
            .object_mut(query)
            .unwrap()
            .set_field("node", node_field)
            .unwrap();

        let ctx = ASTContext::new();
        let schema = composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap();
        let query = schema.query_type().unwrap();
        let users = query.get_field("users").unwrap();
        assert_eq!(users.description, Some("All users"));
        assert_eq!(users.deprecation_reason, Some("No longer supported"));
        assert_eq!(users.get_argument("first").unwrap().default_value, Some("10"));
        let node_field = query.get_field("node").unwrap();
        assert_eq!(node_field.deprecation_reason, Some("Use users"));

        let node = schema.get_type("Node").and_then(|t| t.interface()).unwrap();
        assert_eq!(node.get_possible_types(), ["User"]);
    }

    #[test]
    fn synthesizes_directive_argument_scalars() {
        let mut composer = SchemaComposer::new();
        field(&mut composer, "Query", "id", "ID");
        composer.add_directive(
            DirectiveDefinition::new("cache")
                .unwrap()
                .with_arg(
                    "ttl",
                    DirectiveArgument::new(TypeExpr::Named("Int".into())).with_default(60),
                )
                .with_location(DirectiveLocation::FieldDefinition),
        );

        let ctx = ASTContext::new();
        let mut extensions = Extensions::new();
        extensions.insert("version".into(), Value::Int(2));
        let options = BuildSchemaOptions {
            extensions,
            ..BuildSchemaOptions::default()
        };
        let schema = composer.build_schema(&ctx, options).unwrap();
        assert_eq!(names(&schema), ["Query", "ID", "Boolean", "String", "Int"]);
        let cache = schema.get_directive("cache").unwrap();
        assert_eq!(cache.arguments[0].default_value, Some("60"));
        assert_eq!(schema.extensions()["version"], Value::Int(2));
    }
}
