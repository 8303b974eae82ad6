use super::clone::{clone_into_existing, clone_type_to, IdentityMap};
use super::directive::{DirectiveArgument, DirectiveDefinition};
use super::fields::{ComposeFields, ComposeInterfaces, EnumValue, Field, InputValue};
use super::named::{Annotated, Annotations, NamedType};
use super::registry::{TypeId, TypeKey};
use super::schema_composer::SchemaComposer;
use super::type_ref::{TypeExpr, TypeRef};
use super::types::{InterfaceType, ObjectType};
use crate::error::{Error, Result};
use crate::schema::{
    OperationKind, Schema, SchemaDirective, SchemaField, SchemaFields, SchemaInputField,
    SchemaInterfaces, SchemaPossibleTypes, SchemaType,
};
use crate::sdl::parse_value;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use std::rc::Rc;

fn merge_field_type<T>(
    dst: &mut T,
    fields: IndexMap<String, Field>,
    interfaces: Vec<TypeRef>,
    annotations: Annotations,
) -> Result<()>
where
    T: ComposeFields + ComposeInterfaces + Annotated,
{
    for (name, field) in fields {
        dst.fields_mut().insert(name, field);
    }
    for interface in interfaces {
        dst.add_interface(interface)?;
    }
    dst.annotations_mut().merge(annotations);
    Ok(())
}

/// Folds the contents of `incoming` into `dst`.
///
/// Fields, input fields and enum values of `incoming` replace the same-named ones of `dst` in
/// place and are appended otherwise. Interfaces and union members are unioned. Objects and
/// interfaces may be merged into each other, every other kind only into itself.
pub(crate) fn merge_node(dst: &mut NamedType, incoming: NamedType) -> Result<()> {
    match (dst, incoming) {
        (NamedType::Object(dst), NamedType::Object(src)) => {
            let ObjectType {
                fields,
                interfaces,
                annotations,
                ..
            } = src;
            merge_field_type(dst, fields, interfaces, annotations)
        }
        (NamedType::Object(dst), NamedType::Interface(src)) => {
            let InterfaceType {
                fields,
                interfaces,
                annotations,
                ..
            } = src;
            merge_field_type(dst, fields, interfaces, annotations)
        }
        (NamedType::Interface(dst), NamedType::Interface(src)) => {
            let InterfaceType {
                fields,
                interfaces,
                annotations,
                ..
            } = src;
            merge_field_type(dst, fields, interfaces, annotations)
        }
        (NamedType::Interface(dst), NamedType::Object(src)) => {
            let ObjectType {
                fields,
                interfaces,
                annotations,
                ..
            } = src;
            merge_field_type(dst, fields, interfaces, annotations)
        }
        (NamedType::InputObject(dst), NamedType::InputObject(src)) => {
            for (name, field) in src.fields {
                dst.fields.insert(name, field);
            }
            dst.annotations.merge(src.annotations);
            Ok(())
        }
        (NamedType::Union(dst), NamedType::Union(src)) => {
            for member in src.members {
                dst.add_member(member)?;
            }
            dst.annotations.merge(src.annotations);
            Ok(())
        }
        (NamedType::Enum(dst), NamedType::Enum(src)) => {
            for (name, value) in src.values {
                dst.values.insert(name, value);
            }
            dst.annotations.merge(src.annotations);
            Ok(())
        }
        (NamedType::Scalar(dst), NamedType::Scalar(src)) => {
            if !dst.ptr_eq(&src) {
                dst.annotations_mut().merge(src.annotations().clone());
            }
            Ok(())
        }
        (dst, src) => Err(Error::invalid(format!(
            "Cannot merge {} `{}` into {} `{}`.",
            src.kind(),
            src.name(),
            dst.kind(),
            dst.name()
        ))),
    }
}

impl SchemaComposer {
    /// Merges another composer into this one.
    ///
    /// Root types are merged into this composer's roots whatever their names. Every other type
    /// of `other` is merged into the type of this composer that's registered under the same key
    /// or carries the same name, and cloned into this composer if there's none. Types of `other`
    /// are never modified or shared, apart from scalars and directive declarations.
    pub fn merge(&mut self, other: &SchemaComposer) -> Result<()> {
        let existing_keys: HashSet<String> = self.registry.keys().map(str::to_string).collect();
        let mut existing_names: HashMap<String, TypeId> = HashMap::new();
        for id in self.registry.ids() {
            existing_names.insert(self.registry.node(id)?.name().to_string(), id);
        }

        let mut map = IdentityMap::for_merge();
        let mut roots = Vec::new();
        for kind in OperationKind::ALL {
            if let Some(src) = other.root_type(kind) {
                let dst = self.root_tc(kind)?;
                map.insert(src, dst);
                roots.push((src, dst));
            }
        }
        for (src, dst) in roots.iter() {
            clone_into_existing(other, *src, self, *dst, &mut map)?;
        }

        for (key, src) in other.registry.entries() {
            if key.starts_with("__")
                || OperationKind::from_root_key(key).is_some()
                || roots.iter().any(|(root, _)| *root == src)
            {
                continue;
            }
            let existing = if existing_keys.contains(key) {
                Some(self.registry.get(key)?)
            } else {
                existing_names
                    .get(other.registry.node(src)?.name())
                    .copied()
            };
            match existing {
                Some(dst) if map.get(src) == Some(dst) => {}
                Some(dst) => clone_into_existing(other, src, self, dst, &mut map)?,
                None => {
                    let dst = clone_type_to(other, src, self, &mut map)?;
                    self.registry.set(key, dst);
                }
            }
        }

        for directive in other.directives.iter() {
            if !self.has_directive(&directive.name) {
                self.directives.push(directive.clone());
            }
        }
        for id in other.must_have_types.iter() {
            if let Some(mapped) = map.get(*id) {
                if !self.must_have_types.contains(&mapped) {
                    self.must_have_types.push(mapped);
                }
            }
        }
        if self.description.is_none() {
            self.description = other.description.clone();
        }

        tracing::debug!(types = map.len(), "merged schema");
        Ok(())
    }

    /// Merges a single type of another composer into a type of this one.
    pub fn merge_type_from<'a, 'b>(
        &mut self,
        dst: impl Into<TypeKey<'a>>,
        other: &SchemaComposer,
        src: impl Into<TypeKey<'b>>,
    ) -> Result<()> {
        let dst = self.registry.get(dst)?;
        let src = other.registry.get(src)?;
        let mut map = IdentityMap::for_merge();
        clone_into_existing(other, src, self, dst, &mut map)
    }

    /// Merges the contents of one type of this composer into another.
    pub fn merge_types<'a, 'b>(
        &mut self,
        dst: impl Into<TypeKey<'a>>,
        src: impl Into<TypeKey<'b>>,
    ) -> Result<()> {
        let dst = self.registry.get(dst)?;
        let src = self.registry.get(src)?;
        if dst == src {
            return Ok(());
        }
        let incoming = self.registry.node(src)?.clone();
        merge_node(self.registry.node_mut(dst)?, incoming)
    }

    /// Merges a built schema into this composer.
    pub fn merge_schema(&mut self, schema: &Schema<'_>) -> Result<()> {
        let other = SchemaComposer::from_schema(schema)?;
        self.merge(&other)
    }

    /// Creates a composer holding the types and directives of a built schema.
    pub fn from_schema(schema: &Schema<'_>) -> Result<SchemaComposer> {
        let mut composer = SchemaComposer::new();
        composer.description = schema.description().map(str::to_string);

        for schema_type in schema.types() {
            let id = match schema_type {
                SchemaType::Object(x) => composer.create_object_tc(x.name)?,
                SchemaType::InputObject(x) => composer.create_input_tc(x.name)?,
                SchemaType::Interface(x) => composer.create_interface_tc(x.name)?,
                SchemaType::Union(x) => composer.create_union_tc(x.name)?,
                SchemaType::Enum(x) => composer.create_enum_tc(x.name)?,
                SchemaType::Scalar(x) => composer.create_scalar_tc(x.name)?,
            };
            if let Some(description) = schema_type.description() {
                composer
                    .registry
                    .node_mut(id)?
                    .set_description(Some(description.to_string()));
            }
        }

        for schema_type in schema.types() {
            match schema_type {
                SchemaType::Object(object) => {
                    let fields = fields_from_runtime(&mut composer, object.get_fields())?;
                    let interfaces = refs_from_runtime(&mut composer, object.get_interfaces())?;
                    let target = composer.object_mut(object.name)?;
                    target.fields.extend(fields);
                    for interface in interfaces {
                        target.add_interface(interface)?;
                    }
                }
                SchemaType::Interface(interface) => {
                    let fields = fields_from_runtime(&mut composer, interface.get_fields())?;
                    let interfaces =
                        refs_from_runtime(&mut composer, interface.get_interfaces())?;
                    let target = composer.interface_mut(interface.name)?;
                    target.fields.extend(fields);
                    for interface in interfaces {
                        target.add_interface(interface)?;
                    }
                }
                SchemaType::InputObject(input) => {
                    let mut fields = IndexMap::with_capacity(input.fields.len());
                    for field in input.fields.iter() {
                        fields.insert(
                            field.name.to_string(),
                            input_from_runtime(&mut composer, field)?,
                        );
                    }
                    composer.input_object_mut(input.name)?.fields.extend(fields);
                }
                SchemaType::Union(union) => {
                    let members = refs_from_runtime(&mut composer, union.get_possible_types())?;
                    let target = composer.union_type_mut(union.name)?;
                    for member in members {
                        target.add_member(member)?;
                    }
                }
                SchemaType::Enum(schema_enum) => {
                    let target = composer.enum_type_mut(schema_enum.name)?;
                    for value in schema_enum.values.iter() {
                        let mut enum_value = EnumValue::new();
                        enum_value.deprecation_reason =
                            value.deprecation_reason.map(str::to_string);
                        enum_value.set_description(value.description.map(str::to_string));
                        target.set_value(value.name, enum_value)?;
                    }
                }
                SchemaType::Scalar(_) => {}
            }
        }

        for kind in OperationKind::ALL {
            if let Some(root) = schema.get_root_type(kind) {
                let id = composer.registry.get(root.name)?;
                composer.registry.set(kind.root_key(), id);
            }
        }

        for directive in schema.directives() {
            composer.set_directive(Rc::new(directive_from_runtime(directive)?));
        }
        Ok(composer)
    }
}

fn fields_from_runtime(
    composer: &mut SchemaComposer,
    fields: &[&SchemaField<'_>],
) -> Result<IndexMap<String, Field>> {
    let mut converted = IndexMap::with_capacity(fields.len());
    for field in fields.iter() {
        let ty = composer.resolve_expr(&TypeExpr::from_runtime(field.output_type))?;
        let mut output = Field::new(ty);
        output.deprecation_reason = field.deprecation_reason.map(str::to_string);
        output.set_description(field.description.map(str::to_string));
        for arg in field.arguments.iter() {
            output
                .args
                .insert(arg.name.to_string(), input_from_runtime(composer, arg)?);
        }
        converted.insert(field.name.to_string(), output);
    }
    Ok(converted)
}

fn input_from_runtime(
    composer: &mut SchemaComposer,
    field: &SchemaInputField<'_>,
) -> Result<InputValue> {
    let ty = composer.resolve_expr(&TypeExpr::from_runtime(field.input_type))?;
    let mut input = InputValue::new(ty);
    input.default_value = field.default_value.map(parse_value).transpose()?;
    input.deprecation_reason = field.deprecation_reason.map(str::to_string);
    input.set_description(field.description.map(str::to_string));
    Ok(input)
}

fn refs_from_runtime(composer: &mut SchemaComposer, names: &[&str]) -> Result<Vec<TypeRef>> {
    names
        .iter()
        .map(|name| composer.get(*name).map(TypeRef::Named))
        .collect()
}

fn directive_from_runtime(directive: &SchemaDirective<'_>) -> Result<DirectiveDefinition> {
    let mut definition = DirectiveDefinition::new(directive.name)?;
    definition.description = directive.description.map(str::to_string);
    definition.is_repeatable = directive.is_repeatable;
    for arg in directive.arguments.iter() {
        let mut argument = DirectiveArgument::new(TypeExpr::from_runtime(arg.input_type));
        argument.default_value = arg.default_value.map(parse_value).transpose()?;
        argument.description = arg.description.map(str::to_string);
        definition.args.insert(arg.name.to_string(), argument);
    }
    for location in directive.locations.iter() {
        definition = definition.with_location(*location);
    }
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{BuildSchemaOptions, Directive};
    use crate::context::ASTContext;
    use crate::error::ErrorType;

    fn with_fields(composer: &mut SchemaComposer, object: &str, fields: &[(&str, &str)]) -> TypeId {
        let id = composer.create_object_tc(object).unwrap();
        for (name, ty) in fields {
            let ty = composer.type_ref(ty).unwrap();
            composer
                .object_mut(id)
                .unwrap()
                .set_field(name, Field::new(ty))
                .unwrap();
        }
        id
    }

    #[test]
    fn merges_fields_additively() {
        let mut a = SchemaComposer::new();
        with_fields(&mut a, "Query", &[("x", "String"), ("y", "String")]);
        let mut b = SchemaComposer::new();
        with_fields(&mut b, "Query", &[("y", "Int"), ("z", "Boolean")]);

        a.merge(&b).unwrap();
        let query = a.object("Query").unwrap();
        assert_eq!(query.field_names(), ["x", "y", "z"]);
        let y = query.field("y").unwrap().ty.type_name(&a).unwrap();
        assert_eq!(y, "Int");

        // The merged-in composer is left untouched
        assert_eq!(b.object("Query").unwrap().field_names(), ["y", "z"]);
    }

    #[test]
    fn roots_merge_regardless_of_name() {
        let mut a = SchemaComposer::new();
        with_fields(&mut a, "Query", &[("me", "String")]);
        let mut b = SchemaComposer::new();
        let root = with_fields(&mut b, "RootQuery", &[("node", "ID")]);
        b.set("Query", root).unwrap();

        a.merge(&b).unwrap();
        let query = a.object("Query").unwrap();
        assert_eq!(query.name(), "Query");
        assert_eq!(query.field_names(), ["me", "node"]);
        assert!(!a.has("RootQuery"));
    }

    #[test]
    fn merges_cycles_into_existing_types() {
        let mut a = SchemaComposer::new();
        let user = with_fields(&mut a, "User", &[("id", "ID!")]);

        let mut b = SchemaComposer::new();
        with_fields(&mut b, "User", &[("posts", "[Post]")]);
        with_fields(&mut b, "Post", &[("author", "User")]);
        with_fields(&mut b, "Query", &[("user", "User")]);

        a.merge(&b).unwrap();
        assert_eq!(a.get("User").unwrap(), user);
        assert_eq!(a.object(user).unwrap().field_names(), ["id", "posts"]);

        let post = a.get("Post").unwrap();
        let author = &a.object(post).unwrap().field("author").unwrap().ty;
        assert_eq!(author.unwrap_named(&a).unwrap(), user);
        let root_user = &a.object("Query").unwrap().field("user").unwrap().ty;
        assert_eq!(root_user.unwrap_named(&a).unwrap(), user);
    }

    #[test]
    fn repeated_merges_keep_interfaces_and_members_unique() {
        let mut b = SchemaComposer::new();
        let user = with_fields(&mut b, "User", &[("id", "ID!")]);
        let node = b.type_ref("Node").unwrap();
        assert!(node.is_deferred());
        b.object_mut(user).unwrap().add_interface(node).unwrap();
        let search = b.create_union_tc("Search").unwrap();
        let post = b.type_ref("Post").unwrap();
        b.union_type_mut(search).unwrap().add_member(post).unwrap();
        with_fields(&mut b, "Post", &[("id", "ID!")]);
        let node = b.create_interface_tc("Node").unwrap();
        let id = b.type_ref("ID!").unwrap();
        b.interface_mut(node)
            .unwrap()
            .set_field("id", Field::new(id))
            .unwrap();
        with_fields(&mut b, "Query", &[("user", "User"), ("search", "[Search]")]);

        let mut a = SchemaComposer::new();
        a.merge(&b).unwrap();
        a.merge(&b).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.object("User").unwrap().interfaces().len(), 1);
        assert_eq!(a.union_type("Search").unwrap().members().len(), 1);

        let ctx = ASTContext::new();
        let schema = a.build_schema(&ctx, BuildSchemaOptions::default()).unwrap();
        let user = schema.get_type("User").and_then(|t| t.object()).unwrap();
        assert_eq!(user.get_interfaces(), ["Node"]);
        let search = schema.get_type("Search").and_then(|t| t.union_type()).unwrap();
        assert_eq!(search.get_possible_types(), ["Post"]);
    }

    #[test]
    fn rejects_incompatible_kinds() {
        let mut a = SchemaComposer::new();
        a.create_enum_tc("User").unwrap();
        let mut b = SchemaComposer::new();
        with_fields(&mut b, "User", &[("id", "ID")]);

        let error = a.merge(&b).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::InvalidConstruction);
    }

    #[test]
    fn appends_directives_and_must_have_types() {
        let mut a = SchemaComposer::new();
        let mut b = SchemaComposer::new();
        b.add_directive(DirectiveDefinition::new("cache").unwrap());
        let audit = b.create_object_tc("Audit").unwrap();
        b.add_schema_must_have_type(audit).unwrap();
        b.set_description(Some("B".into()));

        a.merge(&b).unwrap();
        assert!(a.has_directive("cache"));
        assert_eq!(a.directives().len(), 4);
        assert_eq!(a.schema_must_have_types(), [a.get("Audit").unwrap()]);
        assert_eq!(a.description(), Some("B"));

        a.merge(&b).unwrap();
        assert_eq!(a.directives().len(), 4);
        assert_eq!(a.schema_must_have_types().len(), 1);
    }

    #[test]
    fn merges_types_within_a_composer() {
        let mut composer = SchemaComposer::new();
        let node = composer.create_interface_tc("Node").unwrap();
        let id = composer.type_ref("ID!").unwrap();
        composer
            .interface_mut(node)
            .unwrap()
            .set_field("id", Field::new(id))
            .unwrap();
        composer
            .interface_mut(node)
            .unwrap()
            .add_directive(Directive::new("key").with_arg("fields", "id"));
        let user = composer.create_object_tc("User").unwrap();

        composer.merge_types(user, node).unwrap();
        let user = composer.object(user).unwrap();
        assert!(user.has_field("id"));
        assert!(user.has_directive("key"));

        let role = composer.create_enum_tc("Role").unwrap();
        assert!(composer.merge_types(role, node).is_err());
    }

    #[test]
    fn merges_a_single_type_from_another_composer() {
        let mut a = SchemaComposer::new();
        let account = with_fields(&mut a, "Account", &[("id", "ID")]);
        let mut b = SchemaComposer::new();
        with_fields(&mut b, "User", &[("name", "String"), ("friend", "User")]);

        a.merge_type_from(account, &b, "User").unwrap();
        let account_type = a.object(account).unwrap();
        assert_eq!(account_type.field_names(), ["id", "name", "friend"]);
        let friend = &account_type.field("friend").unwrap().ty;
        assert_eq!(friend.unwrap_named(&a).unwrap(), account);
    }

    #[test]
    fn merges_built_schemas() {
        let mut source = SchemaComposer::new();
        with_fields(&mut source, "Query", &[("users", "[User!]!")]);
        with_fields(&mut source, "User", &[("name", "String")]);
        let ctx = ASTContext::new();
        let schema = source
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap();

        let mut target = SchemaComposer::new();
        with_fields(&mut target, "Query", &[("version", "Int")]);
        target.merge_schema(&schema).unwrap();

        let query = target.object("Query").unwrap();
        assert_eq!(query.field_names(), ["version", "users"]);
        let users = query.field("users").unwrap().ty.type_name(&target).unwrap();
        assert_eq!(users, "[User!]!");
        assert!(target.object("User").unwrap().has_field("name"));
    }
}
