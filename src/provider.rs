//! Data-side capability trait.
//!
//! A trait is the idiomatic substitute for a struct of four function
//! pointers (`get_root`, `get_child_by_name`, `get_child_by_index`, `dump`)
//! plus a separate `get_partial` hook (see `DESIGN.md`). The data tree
//! itself is out of this crate's scope: `Node` is whatever handle the
//! implementor's own tree uses.

use crate::errors::SinkError;
use crate::renderer::Sink;
use crate::template::Template;

/// Supplies the values a compiled template resolves and renders.
///
/// `Node` is a cheap, `Copy` handle into the implementor's own data
/// structure (an index, a small enum, a `&'static str`, ...), never a
/// borrow with a lifetime tied to the provider, since the interpreter holds
/// onto nodes across calls back into `DataProvider` methods.
pub trait DataProvider {
    type Node: Copy;

    /// The node every name lookup starts from.
    fn root(&mut self) -> Self::Node;

    /// Looks up a single (non-dotted) name segment against `node`.
    ///
    /// Returning `None` means "not found here"; the interpreter is
    /// responsible for the scope-chaining fallback to enclosing sections
    /// for a name's first segment.
    fn child_by_name(&mut self, node: Self::Node, name: &str) -> Option<Self::Node>;

    /// Looks up the `index`-th element of `node` when iterated as a list.
    ///
    /// A non-list/scalar node should behave as a single-element list at
    /// index 0 (so a truthy scalar renders its section exactly once) and
    /// return `None` for any other index.
    fn child_by_index(&mut self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Writes `node`'s textual representation to `sink`.
    ///
    /// Called for both `{{var}}` and `{{{var}}}`; `sink` already routes to
    /// the correctly-escaped (or unescaped) `Renderer` method, so this
    /// method never needs to know which tag form triggered it.
    fn dump(&mut self, node: Self::Node, sink: &mut dyn Sink) -> Result<(), SinkError>;

    /// Resolves a `{{>name}}` reference to its compiled template, if any.
    ///
    /// Returning `None` makes the partial a silent no-op (a missing
    /// partial renders nothing, not an error).
    fn partial(&mut self, name: &str) -> Option<Template>;
}
