//! The intermediate tag record the [`Scanner`](crate::scanner::Scanner) produces
//! and the [`Compiler`](crate::compiler::Compiler) consumes.

/// Which kind of directive a [`Tag`] represents.
///
/// [`TagKind::DelimReset`] never survives scanning: once its body has been
/// parsed into a new opener/closer pair it is rewritten to [`TagKind::Comment`]
/// so the usual standalone-line handling applies to it (see
/// [`Scanner::scan`](crate::scanner::Scanner::scan)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Used only for the terminal sentinel tag and as the scanner's "no tag
    /// currently open" state; never reaches the compiler as a real tag.
    None,
    /// `{{=<a> <b>=}}` (rewritten to `Comment` once parsed).
    DelimReset,
    /// `{{! ... }}`
    Comment,
    /// `{{ name }}`: escaped interpolation.
    Var,
    /// `{{{ name }}}` or `{{& name }}`: verbatim interpolation.
    VerbatimVar,
    /// `{{# name }}`
    SectionOpen,
    /// `{{^ name }}`
    SectionOpenInv,
    /// `{{/ name }}` paired with a normal section opener.
    SectionClose,
    /// `{{/ name }}` paired with an inverted section opener; the scanner's
    /// section-balancing pass rewrites the kind to this once the opener is known.
    SectionCloseInv,
    /// `{{> name }}`
    Partial,
    /// Zero-width marker emitted at offset 0 and after every un-absorbed
    /// newline, so partials can inherit indentation.
    IndentMarker,
}

/// One scanned tag, or the zero-width [`TagKind::IndentMarker`], or the
/// terminal [`TagKind::None`] sentinel that always closes the sequence.
///
/// `tag_begin <= name_begin <= name_end <= tag_end` holds for every tag.
/// `line`/`column` are 1-based and point at the tag's opener (prior to any
/// standalone-whitespace expansion of `tag_begin`).
#[derive(Debug, Clone, Copy)]
pub struct Tag {
    pub kind: TagKind,
    pub line: u32,
    pub column: u32,
    pub tag_begin: usize,
    pub tag_end: usize,
    pub name_begin: usize,
    pub name_end: usize,
}

impl Tag {
    /// The trimmed tag body, e.g. the `x.y` in `{{# x.y }}`.
    pub fn name<'t>(&self, template: &'t str) -> &'t str {
        &template[self.name_begin..self.name_end]
    }
}
