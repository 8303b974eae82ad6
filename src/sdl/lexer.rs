use logos::{internal::LexerInternal, Lexer, Logos};

#[derive(Clone)]
pub struct Extras<'a> {
    pub arena: &'a bumpalo::Bump,
}

/// Tokens of the GraphQL type system language.
///
/// Strings are unescaped while lexing, and block strings have their common indentation removed,
/// so the parser only ever sees final string values.
#[derive(Logos, Debug, PartialEq)]
#[logos(extras = Extras<'s>)]
pub enum Token<'a> {
    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(":")]
    Colon,

    #[token("=")]
    Equal,

    #[token("!")]
    Exclam,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[regex(r"@[_a-zA-Z][_0-9a-zA-Z]*", |lex| &lex.slice()[1..])]
    DirectiveName(&'a str),

    #[regex(r"[_a-zA-Z][_0-9a-zA-Z]*", |lex| lex.slice())]
    Name(&'a str),

    #[regex(r"-?([1-9][0-9]*|0)[.][0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex("-?([1-9][0-9]*|0)[eE][+-]?[0-9]+", |lex| lex.slice())]
    Float(&'a str),

    #[regex(r"-?([1-9][0-9]*|0)", |lex| lex.slice())]
    Integer(&'a str),

    #[regex(r#"""?"?"#, parse_string)]
    String(&'a str),

    // Commas are insignificant in SDL and are skipped along with whitespace and comments
    #[error]
    #[regex(r"([ ,\t\n\r\f]+|#[^\n\r]*)+", logos::skip)]
    Error,

    /// Token indicates the end of the input
    End,
}

#[derive(Logos, Debug, PartialEq)]
enum BlockPart {
    #[regex(r#"[^"\\\r\n]+"#)]
    #[regex(r#""+"#)]
    #[token("\\")]
    Text,

    #[regex(r"\r\n|\r|\n")]
    Newline,

    #[token(r#"\""""#)]
    EscapedEndBlock,

    #[token(r#"""""#)]
    EndBlock,

    #[error]
    Error,
}

#[derive(Logos, Debug, PartialEq)]
enum StringPart {
    #[regex(r#"[^\n\r\\"]+"#)]
    Text,

    #[regex(r"\\u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]")]
    EscapedCodepoint,

    #[token(r#"\""#)]
    EscapedQuote,
    #[token(r#"\\"#)]
    EscapedBackslash,
    #[token(r#"\/"#)]
    EscapedSlash,
    #[token(r#"\b"#)]
    EscapedBackspace,
    #[token(r#"\f"#)]
    EscapedFormFeed,
    #[token(r#"\n"#)]
    EscapedNewline,
    #[token(r#"\r"#)]
    EscapedReturn,
    #[token(r#"\t"#)]
    EscapedTab,

    #[token("\"")]
    EndString,

    #[error]
    Error,
}

fn parse_codepoint(escape: &str) -> Option<u32> {
    use lexical_core::*;
    const FORMAT: u128 = NumberFormatBuilder::hexadecimal();
    const OPTIONS: ParseIntegerOptions = ParseIntegerOptions::new();
    parse_with_options::<u32, FORMAT>(escape[2..].as_bytes(), &OPTIONS).ok()
}

/// Decodes a `\uXXXX` escape, combining a leading surrogate with the escape that must follow it.
fn lex_codepoint(sublex: &mut Lexer<'_, StringPart>) -> Option<char> {
    let code = parse_codepoint(sublex.slice())?;
    if !(0xD800..=0xDBFF).contains(&code) {
        return std::char::from_u32(code);
    }
    match sublex.next() {
        Some(StringPart::EscapedCodepoint) => {
            let low = parse_codepoint(sublex.slice())?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            std::char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
        }
        _ => None,
    }
}

fn lex_escaped_string<'a>(lex: &mut Lexer<'a, Token<'a>>, mut output: String) -> Option<&'a str> {
    let mut sublex = StringPart::lexer(lex.remainder());
    while let Some(token) = sublex.next() {
        match token {
            StringPart::Error => break,
            StringPart::Text => output.push_str(sublex.slice()),
            StringPart::EscapedQuote => output.push('"'),
            StringPart::EscapedBackslash => output.push('\\'),
            StringPart::EscapedSlash => output.push('/'),
            StringPart::EscapedBackspace => output.push('\u{0008}'),
            StringPart::EscapedFormFeed => output.push('\u{000C}'),
            StringPart::EscapedNewline => output.push('\n'),
            StringPart::EscapedReturn => output.push('\r'),
            StringPart::EscapedTab => output.push('\t'),
            StringPart::EscapedCodepoint => output.push(lex_codepoint(&mut sublex)?),
            StringPart::EndString => {
                lex.bump_unchecked(sublex.span().end);
                return Some(lex.extras.arena.alloc_str(&output));
            }
        }
    }
    None
}

fn lex_block_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<&'a str> {
    let mut raw = String::new();
    let mut sublex = BlockPart::lexer(lex.remainder());
    while let Some(token) = sublex.next() {
        match token {
            BlockPart::Text => raw.push_str(sublex.slice()),
            BlockPart::Newline => raw.push('\n'),
            BlockPart::EscapedEndBlock => raw.push_str("\"\"\""),
            BlockPart::EndBlock => {
                lex.bump_unchecked(sublex.span().end);
                return Some(lex.extras.arena.alloc_str(&block_string_value(&raw)));
            }
            BlockPart::Error => break,
        }
    }
    None
}

/// Removes the common indentation of all lines but the first, and any leading and trailing blank
/// lines, from the raw contents of a block string.
///
/// [Reference](https://spec.graphql.org/October2021/#BlockStringValue())
pub(crate) fn block_string_value(raw: &str) -> String {
    let is_indent = |c: char| c == ' ' || c == '\t';
    let common_indent = raw
        .split('\n')
        .skip(1)
        .filter_map(|line| {
            let indent = line.len() - line.trim_start_matches(is_indent).len();
            (indent < line.len()).then_some(indent)
        })
        .min()
        .unwrap_or(0);

    let mut lines: std::vec::Vec<&str> = raw
        .split('\n')
        .enumerate()
        .map(|(index, line)| match index {
            0 => line,
            _ if line.len() >= common_indent => &line[common_indent..],
            _ => "",
        })
        .collect();

    while lines.first().map_or(false, |line| line.trim_matches(is_indent).is_empty()) {
        lines.remove(0);
    }
    while lines.last().map_or(false, |line| line.trim_matches(is_indent).is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn parse_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<&'a str> {
    match lex.slice() {
        r#""""# => Some(""),
        r#"""""# => lex_block_string(lex),
        "\"" => {
            // Strings without escape sequences are sliced from the source directly
            let remainder = lex.remainder();
            for (i, c) in remainder.char_indices() {
                match c {
                    '\n' | '\r' => return None,
                    '\\' => {
                        lex.bump_unchecked(i);
                        return lex_escaped_string(lex, remainder[0..i].to_string());
                    }
                    '"' => {
                        lex.bump_unchecked(i + 1);
                        return Some(&remainder[0..i]);
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{block_string_value, Extras, Token};
    use bumpalo::Bump;
    use logos::Logos;

    fn tokens<'a>(arena: &'a Bump, source: &'a str) -> Vec<Token<'a>> {
        Token::lexer_with_extras(source, Extras { arena }).collect()
    }

    #[test]
    fn skips_insignificant_input() {
        let arena = Bump::new();
        assert!(tokens(&arena, "").is_empty());
        assert!(tokens(&arena, ",,   # comment\n\t").is_empty());
    }

    #[test]
    fn punctuation() {
        let arena = Bump::new();
        assert_eq!(
            tokens(&arena, "[]{}()=:!&|"),
            [
                Token::BracketOpen,
                Token::BracketClose,
                Token::BraceOpen,
                Token::BraceClose,
                Token::ParenOpen,
                Token::ParenClose,
                Token::Equal,
                Token::Colon,
                Token::Exclam,
                Token::Ampersand,
                Token::Pipe,
            ]
        );
    }

    #[test]
    fn names_and_directives() {
        let arena = Bump::new();
        assert_eq!(
            tokens(&arena, "type User @key # trailing\n _id"),
            [
                Token::Name("type"),
                Token::Name("User"),
                Token::DirectiveName("key"),
                Token::Name("_id"),
            ]
        );
    }

    #[test]
    fn numbers() {
        let arena = Bump::new();
        assert_eq!(
            tokens(&arena, "0 -12 1.5 -0.25e3 1e10"),
            [
                Token::Integer("0"),
                Token::Integer("-12"),
                Token::Float("1.5"),
                Token::Float("-0.25e3"),
                Token::Float("1e10"),
            ]
        );
    }

    #[test]
    fn strings() {
        let arena = Bump::new();
        assert_eq!(tokens(&arena, r#""plain""#), [Token::String("plain")]);
        assert_eq!(tokens(&arena, r#""""#), [Token::String("")]);
        assert_eq!(
            tokens(&arena, r#""say \"hi\"\n\u00e9""#),
            [Token::String("say \"hi\"\né")]
        );
        assert_eq!(tokens(&arena, "\"\"\"inline\"\"\""), [Token::String("inline")]);
        assert_eq!(
            tokens(&arena, "\"\"\"\n    A user.\n\n      Indented \\\"\"\"\n    \"\"\""),
            [Token::String("A user.\n\n  Indented \"\"\"")]
        );
    }

    #[test]
    fn surrogate_pairs() {
        let arena = Bump::new();
        assert_eq!(
            tokens(&arena, r#""\uD83D\uDE00 smile""#),
            [Token::String("😀 smile")]
        );
        assert_eq!(tokens(&arena, r#""😀""#), [Token::String("😀")]);
        assert_eq!(tokens(&arena, r#""\uD83D""#).first(), Some(&Token::Error));
        assert_eq!(tokens(&arena, r#""\uD83Dx""#).first(), Some(&Token::Error));
        assert_eq!(tokens(&arena, r#""\uDE00""#).first(), Some(&Token::Error));
    }

    #[test]
    fn unterminated_strings() {
        let arena = Bump::new();
        assert_eq!(
            tokens(&arena, "\"broken\n\""),
            [Token::Error, Token::Name("broken"), Token::Error]
        );
        assert_eq!(tokens(&arena, "\"\\q\"").first(), Some(&Token::Error));
    }

    #[test]
    fn block_string_values() {
        assert_eq!(block_string_value("\n  a\n    b\n  "), "a\n  b");
        assert_eq!(block_string_value("first\n   second"), "first\nsecond");
        assert_eq!(block_string_value("  \n\n"), "");
    }
}
