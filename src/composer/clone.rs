use super::fields::{Field, InputValue};
use super::merge::merge_node;
use super::named::NamedType;
use super::registry::{TypeId, TypeKey};
use super::schema_composer::SchemaComposer;
use super::type_ref::TypeRef;
use super::types::{InputObjectType, InterfaceType, ObjectType, ScalarType, UnionType};
use crate::error::{Error, ErrorType, Result};
use hashbrown::HashMap;
use indexmap::IndexMap;

/// Maps source nodes to the nodes they were cloned into.
///
/// A single map is threaded through one whole clone or merge, so that every source node is copied
/// at most once, and so that reference cycles terminate: a node is entered into the map before
/// any of its fields are cloned.
#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: HashMap<TypeId, TypeId>,
    reuse_by_name: bool,
}

impl IdentityMap {
    /// Creates a map for cloning, which always allocates new nodes in the target.
    pub fn new() -> Self {
        IdentityMap::default()
    }

    /// Creates a map for merging, which reuses same-named nodes of the target instead of
    /// allocating duplicates of them.
    pub fn for_merge() -> Self {
        IdentityMap {
            entries: HashMap::new(),
            reuse_by_name: true,
        }
    }

    #[inline]
    pub fn get(&self, source: TypeId) -> Option<TypeId> {
        self.entries.get(&source).copied()
    }

    pub fn insert(&mut self, source: TypeId, target: TypeId) -> Option<TypeId> {
        self.entries.insert(source, target)
    }

    #[inline]
    pub fn contains(&self, source: TypeId) -> bool {
        self.entries.contains_key(&source)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn reuses_by_name(&self) -> bool {
        self.reuse_by_name
    }
}

/// Clones the node `id` of `source` into `target` and returns the handle of the copy.
///
/// All types reachable from the node are cloned along with it. Scalars are the exception: they're
/// shared, and a same-named scalar that's already registered in the target is reused as is.
pub fn clone_type_to(
    source: &SchemaComposer,
    id: TypeId,
    target: &mut SchemaComposer,
    map: &mut IdentityMap,
) -> Result<TypeId> {
    if let Some(mapped) = map.get(id) {
        if !target.registry.contains(mapped) {
            return Err(Error::new(
                format!("Identity map points {} at {} which isn't part of the target.", id, mapped),
                ErrorType::CloneTargetMissing,
            ));
        }
        return Ok(mapped);
    }

    let node = source.registry.node(id)?;
    if let NamedType::Scalar(scalar) = node {
        return clone_scalar(scalar, id, target, map);
    }

    if map.reuses_by_name() {
        if let Ok(existing) = target.registry.get(node.name()) {
            let kind = target.registry.node(existing)?.kind();
            if kind != node.kind() {
                return Err(Error::invalid(format!(
                    "Cannot merge {} `{}` into {} of the same name.",
                    node.kind(),
                    node.name(),
                    kind
                )));
            }
            clone_into_existing(source, id, target, existing, map)?;
            return Ok(existing);
        }
    }

    let dest = target.registry.alloc(node.shell());
    map.insert(id, dest);
    let cloned = clone_content(node, source, target, map)?;
    *target.registry.node_mut(dest)? = cloned;
    target.registry.set(node.name(), dest);
    tracing::trace!(source = %id, target = %dest, name = node.name(), "cloned type");
    Ok(dest)
}

/// Clones the contents of `src` and merges them into the existing target node `dest`.
pub(crate) fn clone_into_existing(
    source: &SchemaComposer,
    src: TypeId,
    target: &mut SchemaComposer,
    dest: TypeId,
    map: &mut IdentityMap,
) -> Result<()> {
    map.insert(src, dest);
    let incoming = clone_content(source.registry.node(src)?, source, target, map)?;
    merge_node(target.registry.node_mut(dest)?, incoming)?;
    tracing::trace!(source = %src, target = %dest, "merged type");
    Ok(())
}

fn clone_scalar(
    scalar: &ScalarType,
    id: TypeId,
    target: &mut SchemaComposer,
    map: &mut IdentityMap,
) -> Result<TypeId> {
    let dest = match target.registry.get(scalar.name()) {
        Ok(existing) => match target.registry.node(existing)? {
            NamedType::Scalar(_) => existing,
            other => {
                return Err(Error::invalid(format!(
                    "Cannot clone scalar `{}` into a schema that defines it as {}.",
                    scalar.name(),
                    other.kind()
                )))
            }
        },
        Err(_) => {
            let dest = target.registry.alloc(NamedType::Scalar(scalar.clone()));
            target.registry.set(scalar.name(), dest);
            dest
        }
    };
    map.insert(id, dest);
    Ok(dest)
}

fn clone_fields(
    fields: &IndexMap<String, Field>,
    source: &SchemaComposer,
    target: &mut SchemaComposer,
    map: &mut IdentityMap,
) -> Result<IndexMap<String, Field>> {
    let mut cloned = IndexMap::with_capacity(fields.len());
    for (name, field) in fields.iter() {
        cloned.insert(name.clone(), field.clone_to(source, target, map)?);
    }
    Ok(cloned)
}

fn clone_refs(
    refs: &[TypeRef],
    source: &SchemaComposer,
    target: &mut SchemaComposer,
    map: &mut IdentityMap,
) -> Result<Vec<TypeRef>> {
    refs.iter()
        .map(|ty| ty.clone_to(source, target, map))
        .collect()
}

fn clone_content(
    node: &NamedType,
    source: &SchemaComposer,
    target: &mut SchemaComposer,
    map: &mut IdentityMap,
) -> Result<NamedType> {
    Ok(match node {
        NamedType::Object(object) => NamedType::Object(ObjectType {
            fields: clone_fields(&object.fields, source, target, map)?,
            interfaces: clone_refs(&object.interfaces, source, target, map)?,
            ..object.shell()
        }),
        NamedType::Interface(interface) => NamedType::Interface(InterfaceType {
            fields: clone_fields(&interface.fields, source, target, map)?,
            interfaces: clone_refs(&interface.interfaces, source, target, map)?,
            ..interface.shell()
        }),
        NamedType::InputObject(input) => {
            let mut fields: IndexMap<String, InputValue> =
                IndexMap::with_capacity(input.fields.len());
            for (name, field) in input.fields.iter() {
                fields.insert(name.clone(), field.clone_to(source, target, map)?);
            }
            NamedType::InputObject(InputObjectType {
                fields,
                ..input.shell()
            })
        }
        NamedType::Union(union) => NamedType::Union(UnionType {
            members: clone_refs(&union.members, source, target, map)?,
            ..union.shell()
        }),
        NamedType::Enum(_) | NamedType::Scalar(_) => node.clone(),
    })
}

impl SchemaComposer {
    /// Clones a registered type of this composer into `target`.
    ///
    /// Passing the same [IdentityMap] to several calls clones shared dependencies only once.
    pub fn clone_type_to<'k>(
        &self,
        key: impl Into<TypeKey<'k>>,
        target: &mut SchemaComposer,
        map: &mut IdentityMap,
    ) -> Result<TypeId> {
        let id = self.registry.get(key)?;
        clone_type_to(self, id, target, map)
    }

    /// Creates an independent copy of this composer.
    ///
    /// Every registry key of the copy refers to the copy of the node it referred to here, so
    /// aliases survive. Directive declarations and scalars are shared with the original.
    pub fn clone_schema(&self) -> Result<SchemaComposer> {
        let mut target = SchemaComposer::new();
        target.directives = self.directives.clone();
        target.description = self.description.clone();

        let mut map = IdentityMap::new();
        for (key, id) in self.registry.entries() {
            let dest = clone_type_to(self, id, &mut target, &mut map)?;
            target.registry.set(key, dest);
        }
        target.must_have_types = self
            .must_have_types
            .iter()
            .filter_map(|id| map.get(*id))
            .collect();

        tracing::debug!(types = map.len(), "cloned schema");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{Annotated, ComposeFields, ComposeInterfaces, EnumValue};

    fn cyclic_composer() -> SchemaComposer {
        let mut composer = SchemaComposer::new();
        let user = composer.create_object_tc("User").unwrap();
        let post = composer.create_object_tc("Post").unwrap();
        let string = composer.named_type("String").unwrap();
        composer
            .object_mut(user)
            .unwrap()
            .set_field("posts", Field::new(TypeRef::named(post).as_list()))
            .unwrap();
        composer
            .object_mut(user)
            .unwrap()
            .set_field("name", Field::new(string))
            .unwrap();
        composer
            .object_mut(post)
            .unwrap()
            .set_field("author", Field::new(user))
            .unwrap();
        composer
    }

    #[test]
    fn clones_cycles_once() {
        let source = cyclic_composer();
        let mut target = SchemaComposer::new();
        let mut map = IdentityMap::new();

        let user = source.clone_type_to("User", &mut target, &mut map).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(target.get("User").unwrap(), user);

        let post = target.get("Post").unwrap();
        let author = &target.object(post).unwrap().field("author").unwrap().ty;
        assert_eq!(author.unwrap_named(&target).unwrap(), user);

        // Cloning again through the same map reuses the earlier copies
        let again = source.clone_type_to("Post", &mut target, &mut map).unwrap();
        assert_eq!(again, post);
        assert_eq!(target.registry().ids().len(), 3);
    }

    #[test]
    fn clones_are_independent() {
        let source = cyclic_composer();
        let mut copy = source.clone_schema().unwrap();
        let user = copy.get("User").unwrap();
        copy.object_mut(user).unwrap().remove_field("name");
        copy.object_mut(user)
            .unwrap()
            .set_description(Some("Changed".into()));

        let original = source.object("User").unwrap();
        assert!(original.has_field("name"));
        assert_eq!(original.description(), None);
        assert_ne!(source.get("User").unwrap(), user);
    }

    #[test]
    fn scalars_are_shared() {
        let mut source = SchemaComposer::new();
        let date = source.create_scalar_tc("Date").unwrap();
        let event = source.create_object_tc("Event").unwrap();
        source
            .object_mut(event)
            .unwrap()
            .set_field("at", Field::new(date))
            .unwrap();

        let copy = source.clone_schema().unwrap();
        assert!(copy
            .scalar("Date")
            .unwrap()
            .ptr_eq(source.scalar("Date").unwrap()));
        assert!(copy.scalar("String").is_err());
    }

    #[test]
    fn aliases_and_enums_survive() {
        let mut source = SchemaComposer::new();
        let role = source.create_enum_tc("Role").unwrap();
        source
            .enum_type_mut(role)
            .unwrap()
            .set_value("ADMIN", EnumValue::new())
            .unwrap();
        source.set("UserRole", role).unwrap();

        let copy = source.clone_schema().unwrap();
        assert_eq!(copy.get("UserRole").unwrap(), copy.get("Role").unwrap());
        assert!(copy.enum_type("Role").unwrap().has_value("ADMIN"));
    }

    #[test]
    fn interfaces_follow_clones() {
        let mut source = SchemaComposer::new();
        let node = source.create_interface_tc("Node").unwrap();
        let user = source.create_object_tc("User").unwrap();
        source
            .object_mut(user)
            .unwrap()
            .add_interface(TypeRef::named(node))
            .unwrap();

        let copy = source.clone_schema().unwrap();
        let interfaces = copy.object("User").unwrap().interfaces();
        assert_eq!(interfaces, [TypeRef::named(copy.get("Node").unwrap())]);
    }

    #[test]
    fn stale_map_entries_are_reported() {
        let source = cyclic_composer();
        let mut target = SchemaComposer::new();
        let mut map = IdentityMap::new();
        source.clone_type_to("User", &mut target, &mut map).unwrap();

        let mut other = SchemaComposer::new();
        let error = source
            .clone_type_to("Post", &mut other, &mut map)
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::CloneTargetMissing);
    }
}
