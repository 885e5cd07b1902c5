//! Output-side capability traits.
//!
//! A trait is the idiomatic substitute for a struct of two function
//! pointers (`out_verbatim`, `out_escaped`) plus a userdata pointer
//! (see `DESIGN.md`).

use crate::errors::SinkError;

/// Receives the two kinds of text a template instruction ever emits.
///
/// HTML-escaping (or any other escaping) is entirely the implementor's
/// concern: `out_escaped` is called for `{{var}}`, `out_verbatim` for
/// `{{{var}}}` / `{{&var}}` and for literal template text. This crate
/// performs no escaping of its own.
pub trait Renderer {
    fn out_verbatim(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
    fn out_escaped(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
}

/// The single-method view of a `Renderer` the interpreter hands to
/// [`DataProvider::dump`](crate::provider::DataProvider::dump).
///
/// The interpreter already knows, from the opcode that triggered the dump,
/// whether the value should be escaped or not; `Sink` lets it commit to one
/// of the two `Renderer` methods before calling into provider code, instead
/// of making every provider re-derive that choice.
pub trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
}

pub(crate) struct VerbatimSink<'r, R: ?Sized>(pub(crate) &'r mut R);

impl<'r, R: Renderer + ?Sized> Sink for VerbatimSink<'r, R> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.0.out_verbatim(bytes)
    }
}

pub(crate) struct EscapedSink<'r, R: ?Sized>(pub(crate) &'r mut R);

impl<'r, R: Renderer + ?Sized> Sink for EscapedSink<'r, R> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.0.out_escaped(bytes)
    }
}
