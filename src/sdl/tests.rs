use super::{
    parse_ast::{DirectiveNode, FieldNode, InputValueNode, TypeNode, ValueNode},
    parse_value,
    parser::ParseSdl,
    PrintOptions,
};
use crate::composer::{
    Annotated, BuildSchemaOptions, ComposeFields, ComposeInterfaces, SchemaComposer, TypeExpr,
};
use crate::context::ASTContext;
use crate::error::ErrorType;
use crate::schema::OperationKind;
use crate::value::Value;
use bumpalo::collections::Vec;
use indoc::indoc;

fn assert_parse<'a, T: 'a>(ctx: &'a ASTContext, source: &'a str, expected: T)
where
    T: ParseSdl<'a> + std::fmt::Debug + PartialEq,
{
    assert_eq!(*T::parse(ctx, source).unwrap(), expected);
}

fn print(composer: &SchemaComposer) -> String {
    composer.to_sdl(&PrintOptions::default()).unwrap()
}

const SCHEMA: &str = indoc! {r#"
    directive @key(fields: String!) repeatable on OBJECT | INTERFACE

    """
    The root of all queries.
    Second line.
    """
    type Query {
      "Looks up a user"
      user(id: ID!, role: Role = ADMIN): User
      search(
        "Text to search for"
        term: String!
        limit: Int = 10
      ): [SearchResult!]!
    }

    interface Node {
      id: ID!
    }

    type User implements Node @key(fields: "id") {
      id: ID!
      name: String @deprecated(reason: "Use `fullName`")
      fullName: String
      role: Role
    }

    type Post implements Node {
      id: ID!
      author: User!
    }

    union SearchResult = User | Post

    enum Role {
      ADMIN
      "Regular user"
      MEMBER
      GUEST @deprecated
    }

    input UserFilter {
      role: Role = MEMBER
      tags: [String!] = ["a", "b"]
      range: Range = {from: 1, to: 2.5}
    }

    scalar Range @specifiedBy(url: "https://example.com/range")
"#};

#[test]
fn field_definition() {
    let ctx = ASTContext::new();
    assert_parse(
        &ctx,
        "name: String!",
        FieldNode {
            description: None,
            name: "name",
            arguments: Vec::new_in(&ctx.arena),
            ty: &TypeNode::NonNull(&TypeNode::Named("String")),
            directives: Vec::new_in(&ctx.arena),
        },
    );

    let mut arguments = Vec::new_in(&ctx.arena);
    arguments.push(InputValueNode {
        description: Some("How many"),
        name: "first",
        ty: &TypeNode::Named("Int"),
        default_value: Some(ValueNode::Int(10)),
        directives: Vec::new_in(&ctx.arena),
    });
    let mut directives = Vec::new_in(&ctx.arena);
    let mut directive_arguments = Vec::new_in(&ctx.arena);
    directive_arguments.push(("ttl", ValueNode::Int(60)));
    directives.push(DirectiveNode {
        name: "cache",
        arguments: directive_arguments,
    });
    assert_parse(
        &ctx,
        "\"Lists friends\" friends(\"How many\" first: Int = 10): [User] @cache(ttl: 60)",
        FieldNode {
            description: Some("Lists friends"),
            name: "friends",
            arguments,
            ty: &TypeNode::List(&TypeNode::Named("User")),
            directives,
        },
    );
}

#[test]
fn loads_every_kind() {
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();

    let query = composer.object("Query").unwrap();
    assert_eq!(query.field_names(), ["user", "search"]);
    assert_eq!(
        query.description(),
        Some("The root of all queries.\nSecond line.")
    );
    let search = query.field("search").unwrap();
    assert_eq!(search.ty.type_name(&composer).unwrap(), "[SearchResult!]!");
    assert_eq!(
        search.arg("limit").unwrap().default_value,
        Some(Value::Int(10))
    );
    assert_eq!(
        search.arg("term").unwrap().description(),
        Some("Text to search for")
    );

    let user = composer.object("User").unwrap();
    assert_eq!(user.interfaces().len(), 1);
    assert_eq!(
        user.interfaces()[0].unwrap_named(&composer).unwrap(),
        composer.get("Node").unwrap()
    );
    assert!(user.has_directive("key"));

    let members: std::vec::Vec<String> = composer
        .union_type("SearchResult")
        .unwrap()
        .members()
        .iter()
        .map(|member| member.type_name(&composer).unwrap())
        .collect();
    assert_eq!(members, ["User", "Post"]);

    let role = composer.enum_type("Role").unwrap();
    assert_eq!(role.values().len(), 3);
    assert_eq!(
        role.value("MEMBER").unwrap().description(),
        Some("Regular user")
    );

    let filter = composer.input_object("UserFilter").unwrap();
    assert_eq!(
        filter.field("role").unwrap().default_value,
        Some(Value::Enum("MEMBER".to_string()))
    );
    assert_eq!(
        filter.field("tags").unwrap().default_value,
        Some(Value::List(vec![
            Value::String("a".to_string()),
            Value::String("b".to_string())
        ]))
    );

    assert!(composer.scalar("Range").unwrap().has_directive("specifiedBy"));
    assert!(composer.interface("Node").is_ok());

    let key = composer.directive("key").unwrap();
    assert!(key.is_repeatable);
    assert_eq!(key.args["fields"].ty, TypeExpr::parse("String!").unwrap());
}

#[test]
fn deprecation_becomes_a_reason() {
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();

    let name = composer.object("User").unwrap().field("name").unwrap();
    assert_eq!(name.deprecation_reason.as_deref(), Some("Use `fullName`"));
    assert!(name.directives().is_empty());

    let guest = composer.enum_type("Role").unwrap().value("GUEST").unwrap();
    assert_eq!(
        guest.deprecation_reason.as_deref(),
        Some("No longer supported")
    );
    assert!(!guest.has_directive("deprecated"));
}

#[test]
fn prints_what_it_parsed() {
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    let printed = print(&composer);
    assert_eq!(printed, SCHEMA);

    let reparsed = SchemaComposer::from_sdl(&printed).unwrap();
    assert_eq!(print(&reparsed), printed);
}

#[test]
fn string_values_survive_printing() {
    let source = indoc! {r#"
        type Query {
          a(s: String = "😀 smile", t: String = "  x\n  y", u: String = "q\"\n"): String @tag(name: "\tnote\n")
          b(s: String = "\uD83D\uDE00"): String
        }
    "#};
    let composer = SchemaComposer::from_sdl(source).unwrap();
    let reparsed = SchemaComposer::from_sdl(&print(&composer)).unwrap();

    for composer in [&composer, &reparsed] {
        let query = composer.object("Query").unwrap();
        let a = query.field("a").unwrap();
        let defaults: std::vec::Vec<Option<Value>> = ["s", "t", "u"]
            .iter()
            .map(|name| a.arg(name).unwrap().default_value.clone())
            .collect();
        assert_eq!(
            defaults,
            [
                Some(Value::from("😀 smile")),
                Some(Value::from("  x\n  y")),
                Some(Value::from("q\"\n")),
            ]
        );
        assert_eq!(a.directives()[0].args["name"], Value::from("\tnote\n"));
        assert_eq!(
            query.field("b").unwrap().arg("s").unwrap().default_value,
            Some(Value::from("😀"))
        );
    }
}

#[test]
fn descriptions_survive_printing() {
    let mut composer = SchemaComposer::from_sdl("type Query { a: String }").unwrap();
    let descriptions = [
        "  indented\n  lines",
        "trailing newline\n",
        "\nleading newline",
        "blank\n  \nline",
        "quotes \"\"\"\nand more",
        "first\n\n  nested",
    ];
    for description in descriptions {
        composer
            .object_mut("Query")
            .unwrap()
            .set_description(Some(description.to_string()));
        let reparsed = SchemaComposer::from_sdl(&print(&composer)).unwrap();
        assert_eq!(
            reparsed.object("Query").unwrap().description(),
            Some(description)
        );
    }
}

#[test]
fn repeated_merges_print_interfaces_once() {
    let other = SchemaComposer::from_sdl(indoc! {"
        type Query { user: User, search: [Search] }
        type User implements Node { id: ID! }
        interface Node { id: ID! }
        union Search = User | Post
        type Post { id: ID! }
    "})
    .unwrap();

    let mut composer = SchemaComposer::new();
    composer.merge(&other).unwrap();
    composer.merge(&other).unwrap();
    let printed = print(&composer);
    assert!(printed.contains("type User implements Node {\n"));
    assert!(printed.contains("union Search = User | Post\n"));

    composer.merge(&SchemaComposer::from_sdl(&printed).unwrap()).unwrap();
    assert_eq!(print(&composer), printed);

    let ctx = ASTContext::new();
    let schema = composer
        .build_schema(&ctx, BuildSchemaOptions::default())
        .unwrap();
    assert!(schema.get_type("User").is_some());
}

#[test]
fn printed_sdl_is_understood_elsewhere() {
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    let printed = composer
        .to_sdl(&PrintOptions {
            omit_directive_definitions: true,
            ..PrintOptions::default()
        })
        .unwrap();
    let document = graphql_parser::parse_schema::<String>(&printed).unwrap();
    assert_eq!(document.definitions.len(), 8);
}

#[test]
fn forward_references_are_deferred() {
    let mut composer = SchemaComposer::new();
    composer
        .add_type_defs("type Query { viewer: Viewer! }")
        .unwrap();

    let viewer = composer
        .object("Query")
        .unwrap()
        .field("viewer")
        .unwrap()
        .ty
        .clone();
    assert!(viewer.of_type().unwrap().is_deferred());
    assert_eq!(viewer.type_name(&composer).unwrap(), "Viewer!");

    composer.add_type_defs("type Viewer { id: ID }").unwrap();
    assert_eq!(
        viewer.unwrap_named(&composer).unwrap(),
        composer.get("Viewer").unwrap()
    );
}

#[test]
fn extensions_add_to_existing_types() {
    let mut composer = SchemaComposer::new();
    let ids = composer
        .add_type_defs("type User { id: ID! }")
        .unwrap();

    let extended = composer
        .add_type_defs(indoc! {r#"
            extend type User @tag(name: "internal") {
              name: String
            }

            extend enum Role {
              ADMIN
            }
        "#})
        .unwrap();
    assert_eq!(extended[0], ids[0]);

    let user = composer.object("User").unwrap();
    assert_eq!(user.field_names(), ["id", "name"]);
    assert!(user.has_directive("tag"));
    assert!(composer.enum_type("Role").unwrap().has_value("ADMIN"));
}

#[test]
fn redefinitions_merge_fields() {
    let mut composer = SchemaComposer::new();
    let ids = composer
        .add_type_defs("type User { id: ID name: String } type User { id: ID! }")
        .unwrap();
    assert_eq!(ids.len(), 1);

    let user = composer.object("User").unwrap();
    assert_eq!(user.field_names(), ["id", "name"]);
    assert_eq!(
        user.field("id").unwrap().ty.type_name(&composer).unwrap(),
        "ID!"
    );
}

#[test]
fn conflicting_kinds_are_rejected() {
    let mut composer = SchemaComposer::new();
    composer.add_type_defs("type Thing { a: Int }").unwrap();
    let error = composer.add_type_defs("enum Thing { A }").unwrap_err();
    assert_eq!(error.error_type(), ErrorType::InvalidConstruction);
}

#[test]
fn schema_definition_sets_roots() {
    let sdl = indoc! {"
        schema {
          query: Root
          mutation: Mutations
        }

        type Root {
          ok: Boolean
        }

        type Mutations {
          ok: Boolean
        }
    "};
    let composer = SchemaComposer::from_sdl(sdl).unwrap();
    assert_eq!(
        composer.root_type(OperationKind::Query),
        Some(composer.get("Root").unwrap())
    );
    assert_eq!(
        composer.root_type(OperationKind::Mutation),
        Some(composer.get("Mutations").unwrap())
    );
    assert_eq!(composer.root_type(OperationKind::Subscription), None);
    assert_eq!(print(&composer), sdl);

    let ctx = ASTContext::new();
    let schema = composer
        .build_schema(&ctx, BuildSchemaOptions::default())
        .unwrap();
    assert_eq!(schema.query_type().unwrap().name, "Root");
    assert_eq!(schema.mutation_type().unwrap().name, "Mutations");
}

#[test]
fn loaded_schemas_build() {
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    let ctx = ASTContext::new();
    let schema = composer
        .build_schema(&ctx, BuildSchemaOptions::default())
        .unwrap();
    assert!(schema.get_type("User").is_some());
    assert!(schema.get_type("SearchResult").is_some());
    assert!(schema.get_directive("key").is_some());
}

#[test]
fn create_tc_takes_one_definition() {
    let mut composer = SchemaComposer::new();
    let id = composer.create_tc("input Point { x: Float! y: Float! }").unwrap();
    assert_eq!(composer.type_name(id).unwrap(), "Point");
    assert_eq!(composer.input_object(id).unwrap().fields().len(), 2);

    let error = composer
        .create_tc("type A { a: Int } type B { b: Int }")
        .unwrap_err();
    assert_eq!(error.error_type(), ErrorType::InvalidConstruction);
    assert!(composer.create_tc("extend type A { a: Int }").is_err());
    assert!(!composer.has("B"));

    assert_eq!(composer.add("scalar Date").unwrap(), "Date");
    assert!(composer.scalar("Date").is_ok());
}

#[test]
fn syntax_errors_have_locations() {
    let mut composer = SchemaComposer::new();
    let error = composer
        .add_type_defs("type Query {\n  field: }")
        .unwrap_err();
    assert_eq!(error.error_type(), ErrorType::Syntax);
    assert_eq!(error.location().as_ref().unwrap().line, 2);

    assert_eq!(
        composer
            .add_type_defs("type Query { a: Int } schema { query: Query query: Query }")
            .unwrap_err()
            .error_type(),
        ErrorType::Syntax
    );
}

#[test]
fn parses_constant_values() {
    assert_eq!(
        parse_value("[1, 2.5, \"x\", RED, null, {on: true}]").unwrap(),
        Value::List(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::String("x".to_string()),
            Value::Enum("RED".to_string()),
            Value::Null,
            Value::Object([("on".to_string(), Value::Boolean(true))].into_iter().collect()),
        ])
    );
    assert!(parse_value("$variable").is_err());
    assert!(parse_value("1 2").is_err());
}

#[test]
fn print_options() {
    let composer = SchemaComposer::from_sdl(indoc! {r#"
        type Beta {
          alpha: Alpha
        }

        "Alpha type"
        type Alpha {
          id: ID
        }
    "#})
    .unwrap();

    let sorted = composer
        .to_sdl(&PrintOptions {
            sort_types: true,
            ..PrintOptions::default()
        })
        .unwrap();
    assert_eq!(
        sorted,
        "\"Alpha type\"\ntype Alpha {\n  id: ID\n}\n\ntype Beta {\n  alpha: Alpha\n}\n"
    );

    let trimmed = composer
        .to_sdl(&PrintOptions {
            omit_descriptions: true,
            exclude: vec!["Beta".to_string()],
            ..PrintOptions::default()
        })
        .unwrap();
    assert_eq!(trimmed, "type Alpha {\n  id: ID\n}\n");

    let with_scalars = composer
        .to_sdl(&PrintOptions {
            include_builtin_scalars: true,
            ..PrintOptions::default()
        })
        .unwrap();
    assert!(with_scalars.ends_with("\n\nscalar ID\n"));

    assert_eq!(
        composer
            .print_type("Alpha", &PrintOptions::default())
            .unwrap(),
        "\"Alpha type\"\ntype Alpha {\n  id: ID\n}"
    );
}

#[test]
fn fixture_schema() {
    let sdl = include_str!("../../fixture/schema.graphql");
    let composer = SchemaComposer::from_sdl(sdl).unwrap();
    assert_eq!(composer.description(), Some("A small storefront schema."));
    assert!(composer.has_directive("cacheControl"));

    let printed = print(&composer);
    assert!(printed.starts_with("\"A small storefront schema.\"\nschema {\n  query: Query\n"));
    assert_eq!(print(&SchemaComposer::from_sdl(&printed).unwrap()), printed);

    let ctx = ASTContext::new();
    let schema = composer
        .build_schema(&ctx, BuildSchemaOptions::default())
        .unwrap();
    assert!(schema.get_type("ProductVariant").is_some());
    assert!(schema.get_type("AddressInput").is_some());
    assert_eq!(schema.mutation_type().unwrap().name, "Mutation");
}
