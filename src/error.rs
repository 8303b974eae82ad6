//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's returned by the registry, the clone and
//! merge engines, schema building, and the SDL reader. Every error carries an [ErrorType] that
//! classifies which contract was violated.

use logos::Span;
use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message and a context string. For SDL parsing, for instance,
/// the context string is populated with a snippet of the source text and a location is attached.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also implements
/// [`error::Error`] so that it can be used with existing patterns for error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
}

/// Classification of an [Error].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ErrorType {
    /// A key, handle, field or value is absent, or a node was requested as the wrong kind.
    NotFound,
    /// A structural invariant was violated, e.g. a doubly wrapped non-null type, a malformed
    /// name, or a merge between incompatible kinds.
    InvalidConstruction,
    /// An identity map pointed at a node that isn't part of the schema being cloned into.
    CloneTargetMissing,
    /// The SDL source text could not be parsed.
    Syntax,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: ErrorType) -> Self {
        Self {
            message: message.into(),
            location: None,
            context: None,
            error_type,
        }
    }

    /// Create a new Error with a main message and a context string from two input strings.
    pub fn new_with_context<S: Into<String>>(
        message: S,
        location: Option<Location>,
        context: S,
        error_type: ErrorType,
    ) -> Self {
        Self {
            message: message.into(),
            location,
            context: Some(context.into()),
            error_type,
        }
    }

    #[inline]
    pub(crate) fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(message, ErrorType::NotFound)
    }

    #[inline]
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Self::new(message, ErrorType::InvalidConstruction)
    }

    /// Points the error at a span of SDL source text, attaching its location and a snippet of the
    /// surrounding lines as context. Errors that are already located are left as they are.
    pub(crate) fn at_span(self, source: &str, span: Span) -> Self {
        if self.location.is_some() {
            return self;
        }
        Self {
            location: Some(get_location(source, span.clone())),
            context: Some(print_span(source, span)),
            ..self
        }
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Returns the kind of contract violation this error represents.
    #[inline]
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Formats this error, with the option to include the context information as well,
    /// which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let prefix = match self.error_type {
            ErrorType::NotFound => "Not Found",
            ErrorType::InvalidConstruction => "Invalid Construction",
            ErrorType::CloneTargetMissing => "Clone Error",
            ErrorType::Syntax => "Syntax Error",
        };
        let formatted = format!("{}: {}", prefix, self.message);

        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }
}

pub(crate) fn print_span(source: &str, span: Span) -> String {
    let mut out = String::new();
    let start_line = source[..span.start].lines().count();

    let start = source[..span.start]
        .rfind('\n')
        .and_then(|start| source[..start].rfind('\n'))
        .map_or(0, |idx| idx + 1);

    let end = source[span.end..]
        .find('\n')
        .map_or(source.len(), |idx| idx + span.end);

    let snippet = &source[start..end];
    let line_num_pad = (start_line + snippet.lines().count())
        .saturating_sub(1)
        .to_string()
        .len();
    for (index, line) in snippet.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let line_num = (start_line + index).to_string();
        out.push_str(&" ".repeat(line_num_pad.saturating_sub(line_num.len()) + 1));
        out.push_str(&line_num);
        out.push_str(" | ");
        out.push_str(line);
    }
    if !source[span.start..span.end].contains('\n') {
        let start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
        out.push('\n');
        out.push_str(&" ".repeat(line_num_pad + 1));
        out.push_str(" | ");
        out.push_str(&" ".repeat(span.start - start));
        out.push_str(&"^".repeat(span.end - span.start));
    };

    out
}

/// A line and column position in SDL source text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub(crate) fn get_location(source: &str, span: Span) -> Location {
    let line = source[..span.start].lines().count();
    let col = source[..span.start]
        .lines()
        .last()
        .map_or(span.start, |x| x.len());

    Location { line, column: col }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::invalid("Failed to write SDL output")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_error_type_prefix() {
        let error = Error::not_found("Type `User` does not exist.");
        assert_eq!(error.print(false), "Not Found: Type `User` does not exist.");
        assert_eq!(error.error_type(), ErrorType::NotFound);

        let error = Error::invalid("Nope");
        assert_eq!(error.to_string(), "Invalid Construction: Nope");
    }

    #[test]
    fn prints_context_on_display() {
        let source = "type Query {\n  field: \n}";
        let span = 21..22;
        let error = Error::new_with_context(
            "Expected a type".to_string(),
            Some(get_location(source, span.clone())),
            print_span(source, span),
            ErrorType::Syntax,
        );
        let printed = error.to_string();
        assert!(printed.starts_with("Syntax Error: Expected a type\n"));
        assert!(printed.contains("field:"));
        assert!(printed.ends_with('^'));
        assert_eq!(error.location().as_ref().map(|l| l.line), Some(2));
    }

    #[test]
    fn located_errors_keep_their_location() {
        let source = "scalar A\nscalar B";
        let error = Error::new("Unexpected `B`", ErrorType::Syntax).at_span(source, 16..17);
        let location = error.location().clone().unwrap();
        assert_eq!((location.line, location.column), (2, 7));
        assert!(error.print(true).ends_with("^"));

        let moved = error.clone().at_span(source, 0..6);
        assert_eq!(moved, error);
    }
}
