//! Tokenises a template into an ordered sequence of [`Tag`] records.
//!
//! This is a single forward pass over the template bytes, tracking a
//! reconfigurable opener/closer pair, standalone-tag whitespace absorption,
//! and indent-marker placement, followed by a post-pass
//! ([`sections::validate_sections`]) that balances section open/close pairs.

mod delimiters;
mod sections;

use crate::errors::{ParseError, ParseErrorKind};
use crate::tag::{Tag, TagKind};

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0b | 0x0c)
}

fn is_newline(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

const DEFAULT_OPENER: &[u8] = b"{{";
const DEFAULT_CLOSER: &[u8] = b"}}";

/// Tag kinds as tracked mid-scan, before `{{{` / `{{&` are folded into the
/// single public [`TagKind::VerbatimVar`] and a delimiter directive is
/// reclassified to [`TagKind::Comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    None,
    DelimReset,
    Comment,
    Var,
    VerbatimTriple,
    VerbatimAmp,
    SectionOpen,
    SectionOpenInv,
    SectionClose,
    Partial,
}

/// A tag record under construction; mirrors [`Tag`] plus the scan-only kind.
struct PendingTag {
    kind: ScanKind,
    line: u32,
    column: u32,
    tag_begin: usize,
    tag_end: usize,
    name_begin: usize,
    name_end: usize,
}

impl PendingTag {
    fn none() -> Self {
        PendingTag {
            kind: ScanKind::None,
            line: 0,
            column: 0,
            tag_begin: 0,
            tag_end: 0,
            name_begin: 0,
            name_end: 0,
        }
    }
}

struct Scanner<'t> {
    template: &'t str,
    data: &'t [u8],
    opener: Vec<u8>,
    closer: Vec<u8>,
    tags: Vec<Tag>,
    errors: Vec<ParseError>,
}

impl<'t> Scanner<'t> {
    fn new(template: &'t str) -> Self {
        Scanner {
            template,
            data: template.as_bytes(),
            opener: DEFAULT_OPENER.to_vec(),
            closer: DEFAULT_CLOSER.to_vec(),
            tags: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn report(&mut self, kind: ParseErrorKind, line: u32, column: u32) {
        self.errors.push(ParseError::new(kind, line, column));
    }

    fn push_indent_marker(&mut self, at: usize) {
        self.tags.push(Tag {
            kind: TagKind::IndentMarker,
            line: 0,
            column: 0,
            tag_begin: at,
            tag_end: at,
            name_begin: at,
            name_end: at,
        });
    }

    fn push_tag(&mut self, tag: &PendingTag) {
        let kind = match tag.kind {
            ScanKind::DelimReset | ScanKind::Comment => TagKind::Comment,
            ScanKind::Var => TagKind::Var,
            ScanKind::VerbatimTriple | ScanKind::VerbatimAmp => TagKind::VerbatimVar,
            ScanKind::SectionOpen => TagKind::SectionOpen,
            ScanKind::SectionOpenInv => TagKind::SectionOpenInv,
            // The sections post-pass rewrites this to SectionCloseInv where needed.
            ScanKind::SectionClose => TagKind::SectionClose,
            ScanKind::Partial => TagKind::Partial,
            ScanKind::None => unreachable!("a None-kind tag is never pushed mid-scan"),
        };
        self.tags.push(Tag {
            kind,
            line: tag.line,
            column: tag.column,
            tag_begin: tag.tag_begin,
            tag_end: tag.tag_end,
            name_begin: tag.name_begin,
            name_end: tag.name_end,
        });
    }

    fn run(mut self) -> Result<Vec<Tag>, Vec<ParseError>> {
        let size = self.data.len();

        if size > 0 {
            self.push_indent_marker(0);
        }

        let mut current = PendingTag::none();
        let mut off = 0usize;
        let mut line = 1u32;
        let mut col = 1u32;

        while off < size {
            let mut is_opener =
                off + self.opener.len() <= size && &self.data[off..off + self.opener.len()] == &self.opener[..];
            let mut is_closer =
                off + self.closer.len() <= size && &self.data[off..off + self.closer.len()] == &self.closer[..];

            if is_opener && is_closer {
                if current.kind == ScanKind::None {
                    is_closer = false;
                } else {
                    is_opener = false;
                }
            }

            if is_opener {
                if current.kind != ScanKind::None && current.kind != ScanKind::Comment {
                    self.report(ParseErrorKind::DanglingOpener, current.line, current.column);
                }

                current = PendingTag::none();
                current.line = line;
                current.column = col;
                current.tag_begin = off;
                off += self.opener.len();

                if off < size {
                    current.kind = match self.data[off] {
                        b'=' => {
                            off += 1;
                            ScanKind::DelimReset
                        }
                        b'!' => {
                            off += 1;
                            ScanKind::Comment
                        }
                        b'{' => {
                            off += 1;
                            ScanKind::VerbatimTriple
                        }
                        b'&' => {
                            off += 1;
                            ScanKind::VerbatimAmp
                        }
                        b'#' => {
                            off += 1;
                            ScanKind::SectionOpen
                        }
                        b'^' => {
                            off += 1;
                            ScanKind::SectionOpenInv
                        }
                        b'/' => {
                            off += 1;
                            ScanKind::SectionClose
                        }
                        b'>' => {
                            off += 1;
                            ScanKind::Partial
                        }
                        _ => ScanKind::Var,
                    };
                } else {
                    current.kind = ScanKind::Var;
                }

                while off < size && is_whitespace(self.data[off]) {
                    off += 1;
                }
                current.name_begin = off;
                col += (current.name_begin - current.tag_begin) as u32;
            } else if is_closer && current.kind == ScanKind::None {
                self.report(ParseErrorKind::DanglingCloser, line, col);
                off += 1;
                col += 1;
            } else if is_closer {
                current.name_end = off;
                off += self.closer.len();
                col += self.closer.len() as u32;

                match current.kind {
                    ScanKind::VerbatimTriple => {
                        if current.name_end > current.name_begin && self.data[current.name_end - 1] == b'}' {
                            current.name_end -= 1;
                        } else if delimiters::is_std_closer(&self.closer) && off < size && self.data[off] == b'}' {
                            off += 1;
                            col += 1;
                        } else {
                            self.report(ParseErrorKind::IncompatibleCloser, line, col);
                        }
                    }
                    ScanKind::DelimReset => {
                        let closer_len = self.closer.len();
                        if self.data[current.name_end - 1] != b'='
                            && off + closer_len < size
                            && self.data[off] == b'='
                            && &self.data[off + 1..off + 1 + closer_len] == &self.closer[..]
                        {
                            current.name_end += closer_len + 1;
                            off += closer_len + 1;
                            col += (closer_len + 1) as u32;
                        }

                        if self.data[current.name_end - 1] != b'=' {
                            self.report(ParseErrorKind::IncompatibleCloser, line, col);
                        } else if current.name_end > current.name_begin {
                            current.name_end -= 1;
                        }
                    }
                    _ => {}
                }

                current.tag_end = off;

                // Standalone-tag whitespace rule.
                if current.kind != ScanKind::Var
                    && current.kind != ScanKind::VerbatimTriple
                    && current.kind != ScanKind::VerbatimAmp
                    && (current.tag_end >= size || is_newline(self.data[current.tag_end]))
                {
                    let mut tmp = current.tag_begin;
                    while tmp > 0 && is_whitespace(self.data[tmp - 1]) {
                        tmp -= 1;
                    }
                    if tmp == 0 || is_newline(self.data[tmp - 1]) {
                        current.tag_begin = tmp;

                        if current.tag_end < size && self.data[current.tag_end] == b'\r' {
                            current.tag_end += 1;
                        }
                        if current.tag_end < size && self.data[current.tag_end] == b'\n' {
                            current.tag_end += 1;
                        }
                    }
                }

                while current.name_end > current.name_begin && is_whitespace(self.data[current.name_end - 1]) {
                    current.name_end -= 1;
                }

                if current.kind != ScanKind::Comment && current.name_end <= current.name_begin {
                    self.report(ParseErrorKind::NoTagName, current.line, current.column);
                }

                if current.kind == ScanKind::DelimReset {
                    match delimiters::parse_delimiters(&self.data[current.name_begin..current.name_end]) {
                        Some((new_opener, new_closer)) => {
                            self.opener = new_opener;
                            self.closer = new_closer;
                        }
                        None => {
                            self.report(ParseErrorKind::InvalidDelimiters, current.line, current.column);
                        }
                    }
                    current.kind = ScanKind::Comment;
                }

                if current.kind != ScanKind::Comment {
                    if let Err(()) = validate_tagname(&self.data[current.name_begin..current.name_end]) {
                        self.report(ParseErrorKind::InvalidTagName, current.line, current.column);
                    }
                }

                self.push_tag(&current);
                current = PendingTag::none();
            } else if is_newline(self.data[off]) {
                if current.kind != ScanKind::None && current.kind != ScanKind::Comment {
                    self.report(ParseErrorKind::DanglingOpener, current.line, current.column);
                    current = PendingTag::none();
                }

                if self.data[off] == b'\r' {
                    off += 1;
                }
                if off < size && self.data[off] == b'\n' {
                    off += 1;
                }

                if current.kind == ScanKind::None && off < size {
                    self.push_indent_marker(off);
                }

                line += 1;
                col = 1;
            } else {
                off += 1;
                col += 1;
            }
        }

        // A tag left open when the template simply ends (no trailing newline
        // ever arrives to trigger the DanglingOpener check in the newline
        // branch above) is not diagnosed: it is silently absorbed as literal
        // text by the compiler, since it was never pushed to `self.tags`.

        let section_errors = sections::validate_sections(self.template, &mut self.tags);
        self.errors.extend(section_errors);

        self.tags.push(Tag {
            kind: TagKind::None,
            line,
            column: col,
            tag_begin: size,
            tag_end: size,
            name_begin: size,
            name_end: size,
        });

        if self.errors.is_empty() {
            Ok(self.tags)
        } else {
            Err(self.errors)
        }
    }
}

/// A tag name may contain no whitespace, no leading/trailing `.`, and no
/// consecutive `.`s (the single-byte implicit iterator `.` is always valid).
fn validate_tagname(name: &[u8]) -> Result<(), ()> {
    if name.len() == 1 && name[0] == b'.' {
        return Ok(());
    }

    if name.is_empty() || name[0] == b'.' || name[name.len() - 1] == b'.' {
        return Err(());
    }

    for i in 0..name.len() {
        if is_whitespace(name[i]) {
            return Err(());
        }
        if name[i] == b'.' && i + 1 < name.len() && name[i + 1] == b'.' {
            return Err(());
        }
    }

    Ok(())
}

/// Scans `template`, producing its tag sequence or the diagnostics that
/// prevented that.
pub(crate) fn scan(template: &str) -> Result<Vec<Tag>, Vec<ParseError>> {
    Scanner::new(template).run()
}
