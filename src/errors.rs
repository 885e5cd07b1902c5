//! Error types produced by [`compile`](crate::compile) and [`process`](crate::process).
//!
//! Two channels, matching the two places a template can fail:
//!
//! - [`ParseError`]: one or more are collected while scanning and compiling
//!   a template. Compilation fails iff at least one was produced.
//! - [`ProcessError`]: wraps whatever error a [`Renderer`](crate::renderer::Renderer)
//!   or [`DataProvider`](crate::provider::DataProvider) callback returned when it
//!   aborted a [`process`](crate::process) call.

use std::error::Error as StdError;
use std::fmt;

/// The kind of syntactic problem a [`ParseError`] reports.
///
/// Variant names match the diagnostic codes of the reference Mustache
/// implementation this crate is modeled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A tag opener (`{{`) was never followed by a matching closer.
    DanglingOpener,
    /// A tag closer (`}}`) appeared without any open tag.
    DanglingCloser,
    /// A `{{{ }}}` or `{{= =}}` tag's closer did not have the expected shape.
    IncompatibleCloser,
    /// A tag's trimmed name was empty.
    NoTagName,
    /// A tag's name contained whitespace, or malformed dotted segments.
    InvalidTagName,
    /// A section-opening tag (`{{#x}}` / `{{^x}}`) was never closed.
    DanglingSectionOpener,
    /// A section-closing tag (`{{/x}}`) had no matching opener.
    DanglingSectionCloser,
    /// A section-closing tag's name did not match its opener's name.
    SectionNameMismatch,
    /// Secondary diagnostic pointing at the opener of a mismatched section.
    SectionOpenerHere,
    /// A `{{=...=}}` delimiter-reset directive's body could not be parsed.
    InvalidDelimiters,
}

impl ParseErrorKind {
    /// A human-readable, locale-invariant description of this error kind.
    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::DanglingOpener => "tag opener has no closer",
            ParseErrorKind::DanglingCloser => "tag closer has no opener",
            ParseErrorKind::IncompatibleCloser => "tag closer is incompatible with its opener",
            ParseErrorKind::NoTagName => "tag has no name",
            ParseErrorKind::InvalidTagName => "tag name is invalid",
            ParseErrorKind::DanglingSectionOpener => "section-opening tag has no closer",
            ParseErrorKind::DanglingSectionCloser => "section-closing tag has no opener",
            ParseErrorKind::SectionNameMismatch => {
                "name of section-closing tag does not match corresponding section-opening tag"
            }
            ParseErrorKind::SectionOpenerHere => "the section-opening tag is located here",
            ParseErrorKind::InvalidDelimiters => "invalid specification of delimiters",
        }
    }
}

/// A single diagnostic produced while scanning or compiling a template.
///
/// `line` and `column` are 1-based, as in most editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: u32, column: u32) -> Self {
        ParseError { kind, line, column }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.kind.message(),
            self.line,
            self.column
        )
    }
}

impl StdError for ParseError {}

/// The error a [`Renderer`](crate::renderer::Renderer) or
/// [`Sink`](crate::renderer::Sink) implementation returns to abort
/// processing.
///
/// Opaque on purpose: the interpreter never inspects it, only propagates it
/// up through [`ProcessError`].
#[derive(Debug)]
pub struct SinkError(Box<dyn StdError + Send + Sync + 'static>);

impl SinkError {
    pub fn new<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        SinkError(Box::new(source))
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for SinkError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

/// The error surfaced by [`process`](crate::process) when a [`Renderer`](crate::renderer::Renderer)
/// or [`DataProvider`](crate::provider::DataProvider) callback aborts rendering.
///
/// `process` has no other failure mode: a compiled [`Template`](crate::template::Template) is
/// always structurally valid, so the only way it can fail at run time is a callback saying no.
#[derive(Debug)]
pub struct ProcessError(Box<dyn StdError + Send + Sync + 'static>);

impl ProcessError {
    /// Wraps the error a callback produced when it aborted processing.
    pub fn new<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ProcessError(Box::new(source))
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template processing aborted: {}", self.0)
    }
}

impl StdError for ProcessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

impl From<SinkError> for ProcessError {
    fn from(err: SinkError) -> Self {
        ProcessError::new(err)
    }
}
