#[macro_use]
extern crate bencher;

use bencher::Bencher;

fn sdl_parse_graphql_composer(bench: &mut Bencher) {
    use graphql_composer::composer::SchemaComposer;
    bench.iter(|| {
        SchemaComposer::from_sdl(SCHEMA).ok();
    });
}

fn sdl_parse_async_graphql_parser(bench: &mut Bencher) {
    use async_graphql_parser::parse_schema;
    bench.iter(|| {
        parse_schema(SCHEMA).ok();
    });
}

fn sdl_parse_graphql_parser(bench: &mut Bencher) {
    use graphql_parser::schema::parse_schema;
    bench.iter(|| {
        parse_schema::<&str>(SCHEMA).ok();
    });
}

fn sdl_parse_apollo_parser(bench: &mut Bencher) {
    use apollo_parser::Parser;
    bench.iter(|| {
        let parser = Parser::new(SCHEMA);
        let cst = parser.parse();
        cst.document();
    });
}

fn sdl_print_graphql_composer(bench: &mut Bencher) {
    use graphql_composer::{composer::SchemaComposer, sdl::PrintOptions};
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    let options = PrintOptions::default();
    bench.iter(|| composer.to_sdl(&options).unwrap());
}

fn sdl_print_graphql_parser(bench: &mut Bencher) {
    use graphql_parser::schema::parse_schema;
    let document = parse_schema::<&str>(SCHEMA).unwrap();
    bench.iter(|| document.to_string());
}

fn composer_clone(bench: &mut Bencher) {
    use graphql_composer::composer::SchemaComposer;
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    bench.iter(|| composer.clone_schema().unwrap());
}

fn composer_merge(bench: &mut Bencher) {
    use graphql_composer::composer::SchemaComposer;
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    let other = SchemaComposer::from_sdl(SCHEMA).unwrap();
    bench.iter(|| {
        let mut target = composer.clone_schema().unwrap();
        target.merge(&other).unwrap();
        target
    });
}

fn composer_build_schema(bench: &mut Bencher) {
    use graphql_composer::{composer::*, context::ASTContext};
    let composer = SchemaComposer::from_sdl(SCHEMA).unwrap();
    bench.iter(|| {
        let ctx = ASTContext::new();
        composer
            .build_schema(&ctx, BuildSchemaOptions::default())
            .unwrap()
            .type_count()
    });
}

benchmark_group!(
    sdl,
    sdl_parse_graphql_composer,
    sdl_parse_async_graphql_parser,
    sdl_parse_graphql_parser,
    sdl_parse_apollo_parser,
    sdl_print_graphql_composer,
    sdl_print_graphql_parser
);

benchmark_group!(
    composer,
    composer_clone,
    composer_merge,
    composer_build_schema
);

benchmark_main!(sdl, composer);

static SCHEMA: &str = include_str!("../fixture/schema.graphql");
