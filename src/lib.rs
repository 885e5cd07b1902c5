//! Compiles and executes Mustache templates through a compact private bytecode.
//!
//! The public surface is deliberately small: [`compile`] turns template text
//! into an opaque [`Template`], and [`process`] executes one against a
//! caller-supplied [`DataProvider`] and [`Renderer`]. Neither the data tree
//! nor the output sink is this crate's concern: both are capability traits
//! the caller implements over its own types.
//!
//! ```text
//! let template = mustache_core::compile(text, CompileOptions::default())?;
//! mustache_core::process(&template, &mut my_provider, &mut my_renderer)?;
//! ```

mod compiler;
mod errors;
mod interpreter;
mod program;
mod provider;
mod renderer;
mod scanner;
mod tag;
mod template;
mod varint;

pub use errors::{ParseError, ParseErrorKind, ProcessError, SinkError};
pub use provider::DataProvider;
pub use renderer::{Renderer, Sink};
pub use template::Template;

pub use interpreter::process;

/// Knobs reserved for future compile-time behaviour.
///
/// Empty today; every template compiles the same way regardless of this
/// value. Kept as a typed struct rather than a bitmask of flags so adding an
/// option later doesn't break every call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CompileOptions {}

/// Scans and compiles `template` into a reusable [`Template`].
///
/// Fails with every diagnostic collected while scanning or compiling, not
/// just the first, so a caller can report them all at once.
pub fn compile(template: &str, _options: CompileOptions) -> Result<Template, Vec<ParseError>> {
    log::trace!("compiling template of {} bytes", template.len());

    let tags = scanner::scan(template).map_err(|errors| {
        log::debug!("template failed to compile with {} diagnostics", errors.len());
        errors
    })?;

    let bytecode = compiler::compile(template, &tags);
    Ok(Template::from_bytecode(bytecode))
}
