//! Lowers a scanned tag sequence into the linear bytecode
//! [`crate::interpreter::process`] executes.
//!
//! The bytecode format is private and not a stable ABI: consumers only ever
//! get a [`crate::template::Template`] out of [`crate::compile`].

use crate::program::Program;
use crate::tag::{Tag, TagKind};

/// Opcodes for the private bytecode format this crate compiles to and
/// interprets. The numbering has no external significance; it only needs to
/// agree between [`compile`] and [`crate::interpreter::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub(crate) enum Op {
    Exit = 0,
    Literal = 1,
    ResolveSetjmp = 2,
    Resolve = 3,
    OutVerbatim = 4,
    OutEscaped = 5,
    Enter = 6,
    Leave = 7,
    EnterInv = 8,
    Partial = 9,
    Indent = 10,
}

impl Op {
    pub(crate) fn from_u64(value: u64) -> Op {
        match value {
            0 => Op::Exit,
            1 => Op::Literal,
            2 => Op::ResolveSetjmp,
            3 => Op::Resolve,
            4 => Op::OutVerbatim,
            5 => Op::OutEscaped,
            6 => Op::Enter,
            7 => Op::Leave,
            8 => Op::EnterInv,
            9 => Op::Partial,
            10 => Op::Indent,
            other => unreachable!("bytecode held an unknown opcode {other}; the compiler never emits one"),
        }
    }
}

fn compile_tagname(prog: &mut Program, name: &str) {
    if name == "." {
        // Implicit iterator: zero tokens.
        prog.append_num(0);
        return;
    }

    let tokens: Vec<&str> = name.split('.').collect();
    prog.append_num(tokens.len() as u64);
    for token in tokens {
        prog.append_num(token.len() as u64);
        prog.append_bytes(token.as_bytes());
    }
}

fn whitespace_prefix_len(data: &[u8], from: usize) -> usize {
    let mut n = 0;
    while from + n < data.len() && matches!(data[from + n], b' ' | b'\t' | 0x0b | 0x0c) {
        n += 1;
    }
    n
}

/// Compiles an already-scanned, already-balanced tag sequence into bytecode.
///
/// `tags` must end with the terminal [`TagKind::None`] sentinel that
/// [`crate::scanner::scan`] always appends.
pub(crate) fn compile(template: &str, tags: &[Tag]) -> Vec<u8> {
    let data = template.as_bytes();
    let mut prog = Program::new();
    let mut jmp_stack: Vec<usize> = Vec::new();
    let mut off = 0usize;

    for tag in tags {
        if off < tag.tag_begin {
            prog.append_num(Op::Literal as u64);
            prog.append_num((tag.tag_begin - off) as u64);
            prog.append_bytes(&data[off..tag.tag_begin]);
            off = tag.tag_begin;
        }

        match tag.kind {
            TagKind::Var | TagKind::VerbatimVar => {
                prog.append_num(Op::Resolve as u64);
                compile_tagname(&mut prog, tag.name(template));
                let out_op = if tag.kind == TagKind::Var {
                    Op::OutEscaped
                } else {
                    Op::OutVerbatim
                };
                prog.append_num(out_op as u64);
            }

            TagKind::SectionOpen => {
                prog.append_num(Op::ResolveSetjmp as u64);
                jmp_stack.push(prog.len());
                compile_tagname(&mut prog, tag.name(template));
                prog.append_num(Op::Enter as u64);
                jmp_stack.push(prog.len());
            }

            TagKind::SectionClose => {
                prog.append_num(Op::Leave as u64);
                let loop_back = jmp_stack.pop().expect("balanced by the scanner's section pass");
                let len_before_operand = prog.len();
                prog.append_num((len_before_operand - loop_back) as u64);

                let jmp_pos = jmp_stack.pop().expect("balanced by the scanner's section pass");
                let skip = prog.len() - jmp_pos;
                prog.insert_num(jmp_pos, skip as u64);
            }

            TagKind::SectionOpenInv => {
                prog.append_num(Op::ResolveSetjmp as u64);
                jmp_stack.push(prog.len());
                compile_tagname(&mut prog, tag.name(template));
                prog.append_num(Op::EnterInv as u64);
            }

            TagKind::SectionCloseInv => {
                let jmp_pos = jmp_stack.pop().expect("balanced by the scanner's section pass");
                let skip = prog.len() - jmp_pos;
                prog.insert_num(jmp_pos, skip as u64);
            }

            TagKind::Partial => {
                prog.append_num(Op::Partial as u64);
                let name = tag.name(template);
                prog.append_num(name.len() as u64);
                prog.append_bytes(name.as_bytes());

                let indent_len = whitespace_prefix_len(data, tag.tag_begin);
                prog.append_num(indent_len as u64);
                prog.append_bytes(&data[tag.tag_begin..tag.tag_begin + indent_len]);
            }

            TagKind::IndentMarker => {
                prog.append_num(Op::Indent as u64);
            }

            TagKind::Comment | TagKind::DelimReset => {
                // Stripped entirely; DelimReset never reaches here (the
                // scanner always reclassifies it to Comment).
            }

            TagKind::None => {
                prog.append_num(Op::Exit as u64);
                break;
            }
        }

        off = tag.tag_end;
    }

    debug_assert!(jmp_stack.is_empty(), "every section jump must be patched by its closer");

    prog.into_bytes()
}
