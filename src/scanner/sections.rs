//! Post-pass section balancing: runs once the whole tag sequence is known.

use crate::errors::{ParseError, ParseErrorKind};
use crate::tag::{Tag, TagKind};

/// Walks `tags`, matching every section opener with its closer.
///
/// On a matched pair whose opener was inverted, the closer's kind is
/// rewritten to [`TagKind::SectionCloseInv`] so the compiler doesn't need to
/// re-derive that fact. Returns every diagnostic produced; an empty result
/// means the sequence is balanced and name-correct.
pub(crate) fn validate_sections(template: &str, tags: &mut [Tag]) -> Vec<ParseError> {
    let mut errors = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for i in 0..tags.len() {
        match tags[i].kind {
            TagKind::SectionOpen | TagKind::SectionOpenInv => stack.push(i),
            TagKind::SectionClose | TagKind::SectionCloseInv => match stack.pop() {
                None => {
                    errors.push(ParseError::new(
                        ParseErrorKind::DanglingSectionCloser,
                        tags[i].line,
                        tags[i].column,
                    ));
                }
                Some(opener_idx) => {
                    if tags[opener_idx].name(template) != tags[i].name(template) {
                        errors.push(ParseError::new(
                            ParseErrorKind::SectionNameMismatch,
                            tags[i].line,
                            tags[i].column,
                        ));
                        errors.push(ParseError::new(
                            ParseErrorKind::SectionOpenerHere,
                            tags[opener_idx].line,
                            tags[opener_idx].column,
                        ));
                    }
                    if tags[opener_idx].kind == TagKind::SectionOpenInv {
                        tags[i].kind = TagKind::SectionCloseInv;
                    }
                }
            },
            _ => {}
        }
    }

    while let Some(opener_idx) = stack.pop() {
        errors.push(ParseError::new(
            ParseErrorKind::DanglingSectionOpener,
            tags[opener_idx].line,
            tags[opener_idx].column,
        ));
    }

    errors
}
