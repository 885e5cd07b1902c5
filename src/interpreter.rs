//! The bytecode interpreter: a small register machine executing the
//! instruction stream [`crate::compiler::compile`] produces.
//!
//! A program counter, a working-node register, a jump-target register, a
//! node stack (one entry per entered section plus the root), an iteration
//! index stack, a partial call stack, and an indent buffer.

use log::{debug, trace};

use crate::compiler::Op;
use crate::errors::ProcessError;
use crate::provider::DataProvider;
use crate::renderer::{EscapedSink, Renderer, Sink, VerbatimSink};
use crate::template::Template;
use crate::varint;

/// Executes `template` against `provider`, writing output through `renderer`.
///
/// Fails only if a [`DataProvider`] or [`Renderer`] method returns an error;
/// a successfully compiled `Template` is otherwise always structurally
/// valid and cannot itself cause `process` to fail.
pub fn process<P, R>(template: &Template, provider: &mut P, renderer: &mut R) -> Result<(), ProcessError>
where
    P: DataProvider,
    R: Renderer,
{
    let mut current = template.clone();
    let mut pc = 0usize;
    let mut jmp_addr = 0usize;

    let mut node_stack: Vec<P::Node> = Vec::new();
    let mut index_stack: Vec<usize> = Vec::new();
    let mut partial_stack: Vec<(Template, usize, usize)> = Vec::new();
    let mut indent_buffer: Vec<u8> = Vec::new();

    let root = provider.root();
    node_stack.push(root);
    let mut reg_node = Some(root);

    loop {
        let insns = current.bytecode();
        let opcode = Op::from_u64(varint::decode(insns, &mut pc));
        trace!("pc={pc} opcode={opcode:?}");

        match opcode {
            Op::Literal => {
                let n = varint::decode(insns, &mut pc) as usize;
                renderer.out_verbatim(&insns[pc..pc + n])?;
                pc += n;
            }

            Op::ResolveSetjmp => {
                let jmp_len = varint::decode(insns, &mut pc) as usize;
                jmp_addr = pc + jmp_len;
                reg_node = resolve_name(insns, &mut pc, provider, &node_stack, reg_node);
            }

            Op::Resolve => {
                reg_node = resolve_name(insns, &mut pc, provider, &node_stack, reg_node);
            }

            Op::OutVerbatim => {
                if let Some(node) = reg_node {
                    provider.dump(node, &mut VerbatimSink(renderer))?;
                }
            }

            Op::OutEscaped => {
                if let Some(node) = reg_node {
                    provider.dump(node, &mut EscapedSink(renderer))?;
                }
            }

            Op::Enter => {
                if let Some(node) = reg_node {
                    node_stack.push(node);
                    match provider.child_by_index(node, 0) {
                        Some(child) => {
                            node_stack.push(child);
                            index_stack.push(0);
                            reg_node = Some(child);
                        }
                        None => {
                            node_stack.pop();
                            reg_node = None;
                        }
                    }
                }
                if reg_node.is_none() {
                    pc = jmp_addr;
                }
            }

            Op::Leave => {
                let jmp_base = pc;
                let jmp_len = varint::decode(insns, &mut pc) as usize;
                let mut index = index_stack.pop().expect("balanced by the compiler");
                node_stack.pop();
                let section_node = *node_stack.last().expect("section node stays on the stack while iterating");
                index += 1;
                match provider.child_by_index(section_node, index) {
                    Some(child) => {
                        node_stack.push(child);
                        index_stack.push(index);
                        pc = jmp_base - jmp_len;
                    }
                    None => {
                        node_stack.pop();
                    }
                }
            }

            Op::EnterInv => {
                let has_first_child = matches!(reg_node, Some(node) if provider.child_by_index(node, 0).is_some());
                if has_first_child {
                    pc = jmp_addr;
                }
            }

            Op::Partial => {
                let name_len = varint::decode(insns, &mut pc) as usize;
                let name = String::from_utf8_lossy(&insns[pc..pc + name_len]).into_owned();
                pc += name_len;

                let indent_len = varint::decode(insns, &mut pc) as usize;
                let indent = insns[pc..pc + indent_len].to_vec();
                pc += indent_len;

                if let Some(partial) = provider.partial(&name) {
                    debug!("entering partial {name:?}");
                    partial_stack.push((current.clone(), pc, indent_len));
                    indent_buffer.extend_from_slice(&indent);
                    current = partial;
                    pc = 0;
                }
            }

            Op::Indent => {
                renderer.out_verbatim(&indent_buffer)?;
            }

            Op::Exit => match partial_stack.pop() {
                Some((ret_template, ret_pc, indent_len)) => {
                    current = ret_template;
                    pc = ret_pc;
                    let new_len = indent_buffer.len() - indent_len;
                    indent_buffer.truncate(new_len);
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// Shared body of `RESOLVE` and `RESOLVE_setjmp` (the latter only differs in
/// also computing a jump target before falling through to this).
///
/// The implicit iterator (`.`, zero name segments) resolves to whatever node
/// is on top of the node stack. Otherwise the first dotted segment is looked
/// up against every stack entry from innermost to outermost (scope
/// chaining); subsequent segments walk strictly down from there.
fn resolve_name<P: DataProvider>(
    insns: &[u8],
    pc: &mut usize,
    provider: &mut P,
    node_stack: &[P::Node],
    current: Option<P::Node>,
) -> Option<P::Node> {
    let n_names = varint::decode(insns, pc) as usize;
    if n_names == 0 {
        return node_stack.last().copied();
    }

    let mut node = current;
    for i in 0..n_names {
        let name_len = varint::decode(insns, pc) as usize;
        let name = std::str::from_utf8(&insns[*pc..*pc + name_len]).unwrap_or("");
        *pc += name_len;

        if i == 0 {
            node = None;
            for &candidate in node_stack.iter().rev() {
                node = provider.child_by_name(candidate, name);
                if node.is_some() {
                    break;
                }
            }
        } else if let Some(n) = node {
            node = provider.child_by_name(n, name);
        }
    }
    node
}
