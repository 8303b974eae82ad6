use super::{
    lexer::{Extras, Token},
    parse_ast::*,
};
use crate::{
    composer::DirectiveLocation,
    context::ASTContext,
    error::{Error, ErrorType, Result},
    schema::OperationKind,
};
use bumpalo::collections::Vec;
use logos::{Lexer, Logos, Span};

/// Results of the recursive descent, whose errors are located in the source text once parsing
/// stops.
pub type ParseResult<T> = Result<T>;

macro_rules! syntax {
    ($($arg:tt)*) => {
        Error::new(format!($($arg)*), ErrorType::Syntax)
    };
}

macro_rules! syntax_err {
    ($($arg:tt)*) => {
        Err(syntax!($($arg)*))
    };
}

// Well-formed source text that defines something impossible, e.g. an enum value named `null`
macro_rules! validation {
    ($msg:literal $(, $arg:expr)* $(,)?) => {
        Error::new(
            format!(concat!("Invalid definition: ", $msg) $(, $arg)*),
            ErrorType::Syntax,
        )
    };
}

pub(crate) mod private {
    use super::*;

    /// Private Parser context state that's kept to keep track of the current parser's progress and
    /// state. This contains the AST context and a [Lexer].
    pub struct ParserContext<'a> {
        pub(crate) ast_ctx: &'a ASTContext,
        pub(crate) peek: Option<Token<'a>>,
        pub(crate) iter: Lexer<'a, Token<'a>>,
    }

    impl<'a> ParserContext<'a> {
        /// Create a new Parser context for a given AST context and initialize it with an input source
        /// string to parse from.
        pub(crate) fn new(ctx: &'a ASTContext, source: &'a str) -> Self {
            let extras = Extras { arena: &ctx.arena };
            ParserContext {
                ast_ctx: ctx,
                peek: None,
                iter: Token::lexer_with_extras(source, extras),
            }
        }

        #[inline]
        pub(crate) fn next(&mut self) -> Token<'a> {
            match self.peek.take() {
                Some(token) => token,
                None => self.iter.next().unwrap_or(Token::End),
            }
        }

        #[inline]
        pub(crate) fn peek(&mut self) -> &Token<'a> {
            let iter = &mut self.iter;
            self.peek
                .get_or_insert_with(|| iter.next().unwrap_or(Token::End))
        }

        #[inline]
        pub(crate) fn source(&self) -> &str {
            self.iter.source()
        }

        #[inline]
        pub(crate) fn span(&self) -> Span {
            self.iter.span()
        }

        #[inline]
        pub(crate) fn vec<T>(&self) -> Vec<'a, T> {
            Vec::new_in(&self.ast_ctx.arena)
        }

        /// Skips the next token if it equals `token` and reports whether it did.
        pub(crate) fn skip(&mut self, token: &Token<'a>) -> bool {
            if self.peek() == token {
                self.next();
                true
            } else {
                false
            }
        }

        pub(crate) fn expect(&mut self, token: Token<'a>) -> ParseResult<()> {
            match self.next() {
                t if t == token => Ok(()),
                t => syntax_err!("Expected {:?}, got {:?}", token, t),
            }
        }

        pub(crate) fn name(&mut self, what: &str) -> ParseResult<&'a str> {
            match self.next() {
                Token::Name(name) => Ok(name),
                t => syntax_err!("Expected {} name, got {:?}", what, t),
            }
        }

        /// Takes the string preceding a definition, if there is one.
        pub(crate) fn description(&mut self) -> Option<&'a str> {
            match self.peek() {
                Token::String(description) => {
                    let description = *description;
                    self.next();
                    Some(description)
                }
                _ => None,
            }
        }

        pub(crate) fn get_implements_interfaces(&mut self) -> ParseResult<Vec<'a, &'a str>> {
            let mut interfaces = self.vec();
            if self.skip(&Token::Name("implements")) {
                // Skip optional leading `&`
                self.skip(&Token::Ampersand);
                interfaces.push(self.name("interface")?);
                while self.skip(&Token::Ampersand) {
                    interfaces.push(self.name("interface")?);
                }
            }
            Ok(interfaces)
        }

        pub(crate) fn directives(&mut self) -> ParseResult<Vec<'a, DirectiveNode<'a>>> {
            let mut directives = self.vec();
            while let Token::DirectiveName(_) = self.peek() {
                directives.push(DirectiveNode::parse_from_ctx(self)?);
            }
            Ok(directives)
        }

        /// Parses a list of items enclosed by `open` and `close`. When the next token isn't
        /// `open` the list is absent and empty.
        pub(crate) fn delimited<T, F>(
            &mut self,
            open: Token<'a>,
            close: Token<'a>,
            mut item: F,
        ) -> ParseResult<Vec<'a, T>>
        where
            F: FnMut(&mut Self) -> ParseResult<T>,
        {
            let mut items = self.vec();
            if !self.skip(&open) {
                return Ok(items);
            }
            loop {
                match self.peek() {
                    t if *t == close => {
                        self.next();
                        return Ok(items);
                    }
                    Token::End => return syntax_err!("Expected {:?}, got end of input", close),
                    _ => items.push(item(self)?),
                }
            }
        }
    }

    /// (Private) Trait for parsing AST Nodes from a Parser Context.
    /// The [`super::ParseSdl`] trait implements the public `parse` method instead.
    pub trait ParseFromCtx<'a>: Sized {
        fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self>;
    }
}

use private::{ParseFromCtx, ParserContext};

impl<'a, T: private::ParseFromCtx<'a>> ParseSdl<'a> for T {}

/// Trait for parsing SDL nodes from source text using recursive descent and a lexer.
///
/// Mostly this is used via [`Document::parse`], whose result is then loaded into a
/// [`SchemaComposer`](crate::composer::SchemaComposer).
pub trait ParseSdl<'a>: private::ParseFromCtx<'a> {
    /// Parse an input source text into the implementor's node structure and allocate the
    /// resulting tree into the context arena. The entire input must be consumed.
    fn parse<T: ToString>(ctx: &'a ASTContext, source: T) -> Result<&'a Self> {
        let source = ctx.alloc_str(&source.to_string());
        let mut parser_ctx = ParserContext::new(ctx, source);
        let result = Self::parse_from_ctx(&mut parser_ctx).and_then(|value| {
            match parser_ctx.next() {
                Token::End => Ok(value),
                t => syntax_err!("Expected end of input, got {:?}", t),
            }
        });
        match result {
            Ok(value) => Ok(ctx.alloc(value)),
            Err(error) => Err(error.at_span(parser_ctx.source(), parser_ctx.span())),
        }
    }
}

impl<'a> ParseFromCtx<'a> for Document<'a> {
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let mut definitions = ctx.vec();
        let mut has_schema = false;
        loop {
            let description = ctx.description();
            let is_extension = ctx.skip(&Token::Name("extend"));
            if is_extension && description.is_some() {
                return syntax_err!("Extensions must not have a description.");
            }

            let definition = match ctx.peek() {
                Token::End if description.is_none() && !is_extension => break,
                Token::Name("schema") => {
                    let schema = parse_schema_definition(ctx, description, is_extension)?;
                    if !is_extension {
                        if has_schema {
                            return Err(validation!(
                                "Must not specify more than one schema definition."
                            ));
                        }
                        has_schema = true;
                    }
                    Definition::Schema(schema)
                }
                Token::Name("directive") if !is_extension => {
                    Definition::Directive(parse_directive_definition(ctx, description)?)
                }
                _ => Definition::Type(parse_type_definition(ctx, description, is_extension)?),
            };
            definitions.push(definition);
        }
        Ok(Document { definitions })
    }
}

fn parse_schema_definition<'a>(
    ctx: &mut ParserContext<'a>,
    description: Option<&'a str>,
    is_extension: bool,
) -> ParseResult<SchemaDefinitionNode<'a>> {
    ctx.expect(Token::Name("schema"))?;
    let directives = ctx.directives()?;
    if !is_extension && ctx.peek() != &Token::BraceOpen {
        return syntax_err!("Expected `{{` to start the schema definition");
    }

    let operations = ctx.delimited(Token::BraceOpen, Token::BraceClose, |ctx| {
        let kind = match ctx.next() {
            Token::Name("query") => OperationKind::Query,
            Token::Name("mutation") => OperationKind::Mutation,
            Token::Name("subscription") => OperationKind::Subscription,
            t => return syntax_err!("Expected operation type, got {:?}", t),
        };
        ctx.expect(Token::Colon)?;
        Ok((kind, ctx.name("root type")?))
    })?;

    for (index, (kind, _)) in operations.iter().enumerate() {
        if operations[..index].iter().any(|(other, _)| other == kind) {
            return Err(validation!(
                "Must not specify more than one {} root type.",
                kind.as_str()
            ));
        }
    }

    Ok(SchemaDefinitionNode {
        description,
        is_extension,
        directives,
        operations,
    })
}

fn parse_directive_definition<'a>(
    ctx: &mut ParserContext<'a>,
    description: Option<&'a str>,
) -> ParseResult<DirectiveDefinitionNode<'a>> {
    ctx.expect(Token::Name("directive"))?;
    let name = match ctx.next() {
        Token::DirectiveName(name) => name,
        t => return syntax_err!("Expected directive name, got {:?}", t),
    };

    let arguments = ctx.delimited(
        Token::ParenOpen,
        Token::ParenClose,
        InputValueNode::parse_from_ctx,
    )?;
    let is_repeatable = ctx.skip(&Token::Name("repeatable"));

    if !ctx.skip(&Token::Name("on")) {
        return syntax_err!("Expected `on` followed by the locations of directive `@{}`", name);
    }
    // Skip optional leading `|`
    ctx.skip(&Token::Pipe);
    let mut locations = ctx.vec();
    loop {
        let location = match ctx.next() {
            Token::Name(location) => DirectiveLocation::from_name(location)
                .ok_or_else(|| syntax!("Unknown directive location `{}`", location))?,
            t => return syntax_err!("Expected directive location, got {:?}", t),
        };
        if !locations.contains(&location) {
            locations.push(location);
        }
        if !ctx.skip(&Token::Pipe) {
            break;
        }
    }

    Ok(DirectiveDefinitionNode {
        description,
        name,
        arguments,
        is_repeatable,
        locations,
    })
}

fn parse_type_definition<'a>(
    ctx: &mut ParserContext<'a>,
    description: Option<&'a str>,
    is_extension: bool,
) -> ParseResult<TypeDefinitionNode<'a>> {
    let keyword = match ctx.next() {
        Token::Name(
            keyword @ ("type" | "interface" | "input" | "union" | "enum" | "scalar"),
        ) => keyword,
        t => return syntax_err!("Expected valid type definition, got {:?}.", t),
    };
    let name = ctx.name("type")?;

    let (directives, contents) = match keyword {
        "type" | "interface" => {
            let interfaces = ctx.get_implements_interfaces()?;
            let directives = ctx.directives()?;
            let fields =
                ctx.delimited(Token::BraceOpen, Token::BraceClose, FieldNode::parse_from_ctx)?;
            let contents = if keyword == "type" {
                TypeContents::Object { interfaces, fields }
            } else {
                TypeContents::Interface { interfaces, fields }
            };
            (directives, contents)
        }
        "input" => {
            let directives = ctx.directives()?;
            let fields = ctx.delimited(
                Token::BraceOpen,
                Token::BraceClose,
                InputValueNode::parse_from_ctx,
            )?;
            (directives, TypeContents::InputObject { fields })
        }
        "union" => {
            let directives = ctx.directives()?;
            let mut members = ctx.vec();
            if ctx.skip(&Token::Equal) {
                // Skip optional leading `|`
                ctx.skip(&Token::Pipe);
                members.push(ctx.name("member type")?);
                while ctx.skip(&Token::Pipe) {
                    members.push(ctx.name("member type")?);
                }
            }
            (directives, TypeContents::Union { members })
        }
        "enum" => {
            let directives = ctx.directives()?;
            let values = ctx.delimited(
                Token::BraceOpen,
                Token::BraceClose,
                EnumValueNode::parse_from_ctx,
            )?;
            (directives, TypeContents::Enum { values })
        }
        _ => (ctx.directives()?, TypeContents::Scalar),
    };

    Ok(TypeDefinitionNode {
        description,
        name,
        is_extension,
        directives,
        contents,
    })
}

impl<'a> ParseFromCtx<'a> for FieldNode<'a> {
    #[inline]
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let description = ctx.description();
        let name = ctx.name("field")?;
        let arguments = ctx.delimited(
            Token::ParenOpen,
            Token::ParenClose,
            InputValueNode::parse_from_ctx,
        )?;
        ctx.expect(Token::Colon)?;
        let ty = ctx.ast_ctx.alloc(TypeNode::parse_from_ctx(ctx)?);
        let directives = ctx.directives()?;
        Ok(FieldNode {
            description,
            name,
            arguments,
            ty,
            directives,
        })
    }
}

impl<'a> ParseFromCtx<'a> for InputValueNode<'a> {
    #[inline]
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let description = ctx.description();
        let name = ctx.name("input value")?;
        ctx.expect(Token::Colon)?;
        let ty = ctx.ast_ctx.alloc(TypeNode::parse_from_ctx(ctx)?);
        let default_value = if ctx.skip(&Token::Equal) {
            Some(ValueNode::parse_from_ctx(ctx)?)
        } else {
            None
        };
        let directives = ctx.directives()?;
        Ok(InputValueNode {
            description,
            name,
            ty,
            default_value,
            directives,
        })
    }
}

impl<'a> ParseFromCtx<'a> for EnumValueNode<'a> {
    #[inline]
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let description = ctx.description();
        let name = ctx.name("enum value")?;
        if matches!(name, "true" | "false" | "null") {
            return Err(validation!("Enum values must not be named `{}`.", name));
        }
        let directives = ctx.directives()?;
        Ok(EnumValueNode {
            description,
            name,
            directives,
        })
    }
}

impl<'a> ParseFromCtx<'a> for DirectiveNode<'a> {
    #[inline]
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let name = match ctx.next() {
            Token::DirectiveName(name) => name,
            t => return syntax_err!("Expected directive, got {:?}", t),
        };
        let arguments = ctx.delimited(Token::ParenOpen, Token::ParenClose, |ctx| {
            let name = ctx.name("argument")?;
            ctx.expect(Token::Colon)?;
            Ok((name, ValueNode::parse_from_ctx(ctx)?))
        })?;
        Ok(DirectiveNode { name, arguments })
    }
}

impl<'a> ParseFromCtx<'a> for TypeNode<'a> {
    #[inline]
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        let of_type = match ctx.next() {
            Token::Name(name) => TypeNode::Named(name),
            Token::BracketOpen => {
                let inner = ctx.ast_ctx.alloc(TypeNode::parse_from_ctx(ctx)?);
                if ctx.next() != Token::BracketClose {
                    return syntax_err!("Unterminated list type");
                }
                TypeNode::List(inner)
            }
            t => return syntax_err!("Expected type name or list type start `[`, got {:?}", t),
        };

        if ctx.skip(&Token::Exclam) {
            Ok(TypeNode::NonNull(ctx.ast_ctx.alloc(of_type)))
        } else {
            Ok(of_type)
        }
    }
}

impl<'a> ParseFromCtx<'a> for ValueNode<'a> {
    fn parse_from_ctx(ctx: &mut ParserContext<'a>) -> ParseResult<Self> {
        match ctx.next() {
            Token::Name("null") => Ok(ValueNode::Null),
            Token::Name("true") => Ok(ValueNode::Boolean(true)),
            Token::Name("false") => Ok(ValueNode::Boolean(false)),
            Token::Name(name) => Ok(ValueNode::Enum(name)),
            Token::Integer(raw) => lexical_core::parse::<i64>(raw.as_bytes())
                .map(ValueNode::Int)
                .map_err(|_| syntax!("Integer `{}` is out of range", raw)),
            Token::Float(raw) => lexical_core::parse::<f64>(raw.as_bytes())
                .map(ValueNode::Float)
                .map_err(|_| syntax!("Invalid float `{}`", raw)),
            Token::String(value) => Ok(ValueNode::String(value)),
            Token::BracketOpen => {
                let mut values = ctx.vec();
                while !ctx.skip(&Token::BracketClose) {
                    if ctx.peek() == &Token::End {
                        return syntax_err!("Unterminated list value");
                    }
                    values.push(ValueNode::parse_from_ctx(ctx)?);
                }
                Ok(ValueNode::List(values))
            }
            Token::BraceOpen => {
                let mut fields: Vec<'a, (&'a str, ValueNode<'a>)> = ctx.vec();
                while !ctx.skip(&Token::BraceClose) {
                    let name = ctx.name("object field")?;
                    if fields.iter().any(|(other, _)| *other == name) {
                        return Err(validation!("Object field `{}` is specified twice.", name));
                    }
                    ctx.expect(Token::Colon)?;
                    fields.push((name, ValueNode::parse_from_ctx(ctx)?));
                }
                Ok(ValueNode::Object(fields))
            }
            t => syntax_err!("Expected a constant value, got {:?}", t),
        }
    }
}
