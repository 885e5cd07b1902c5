//! A tiny JSON-ish data tree used only by this crate's own tests.
//!
//! Six-variant shape (`null`, `false`, `true`, string, array, object), a
//! deliberately loose "good enough for testing" parser, and `dump`/
//! `child_by_name`/`child_by_index` truthiness rules matching Mustache's
//! usual null/false/empty-list falsiness. None of this ships in the
//! published crate.

use std::collections::HashMap;

use mustache_core::{DataProvider, Sink, SinkError, Template};

/// A node in the test data tree, built by hand or produced by [`parse`].
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Str(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Null,
    Bool(bool),
    Str(String),
    Array(Vec<usize>),
    Object(Vec<(String, usize)>),
}

/// A flattened [`Value`] tree plus a table of named partial templates.
///
/// `NodeId` (the [`DataProvider::Node`] handle) is a plain arena index:
/// `Copy`, and stable for the tree's whole lifetime, with no unsafe code
/// needed to hand out borrowed node references.
pub struct JsonProvider {
    arena: Vec<Node>,
    partials: HashMap<String, Template>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

impl JsonProvider {
    pub fn new(root: Value) -> Self {
        let mut arena = Vec::new();
        flatten(root, &mut arena);
        JsonProvider {
            arena,
            partials: HashMap::new(),
        }
    }

    /// Parses `input` with the same loose grammar as the reference
    /// implementation's `json_parse`: `null`/`false`/`true`, quoted strings
    /// with `\n`/`\r`/`\t`/`\\` escapes, bare unquoted strings, `[...]`
    /// arrays, and `{"key": value, ...}` objects.
    pub fn parse(input: &str) -> Self {
        JsonProvider::new(parse(input))
    }

    pub fn with_partial(mut self, name: impl Into<String>, template: Template) -> Self {
        self.partials.insert(name.into(), template);
        self
    }
}

/// Pushes `value`'s subtree into `arena`, returning the root's index.
fn flatten(value: Value, arena: &mut Vec<Node>) -> usize {
    match value {
        Value::Null => push(arena, Node::Null),
        Value::Bool(b) => push(arena, Node::Bool(b)),
        Value::Str(s) => push(arena, Node::Str(s)),
        Value::Array(items) => {
            let children: Vec<usize> = items.into_iter().map(|v| flatten(v, arena)).collect();
            push(arena, Node::Array(children))
        }
        Value::Object(fields) => {
            let children: Vec<(String, usize)> = fields
                .into_iter()
                .map(|(k, v)| (k, flatten(v, arena)))
                .collect();
            push(arena, Node::Object(children))
        }
    }
}

fn push(arena: &mut Vec<Node>, node: Node) -> usize {
    arena.push(node);
    arena.len() - 1
}

impl DataProvider for JsonProvider {
    type Node = NodeId;

    fn root(&mut self) -> Self::Node {
        NodeId(self.arena.len() - 1)
    }

    fn child_by_name(&mut self, node: Self::Node, name: &str) -> Option<Self::Node> {
        match &self.arena[node.0] {
            Node::Object(fields) => fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|&(_, idx)| idx)
                .filter(|&idx| !matches!(self.arena[idx], Node::Null | Node::Bool(false)))
                .map(NodeId),
            _ => None,
        }
    }

    fn child_by_index(&mut self, node: Self::Node, index: usize) -> Option<Self::Node> {
        match &self.arena[node.0] {
            Node::Null | Node::Bool(false) => None,
            Node::Array(items) => items.get(index).copied().map(NodeId),
            _ => {
                if index == 0 {
                    Some(node)
                } else {
                    None
                }
            }
        }
    }

    fn dump(&mut self, node: Self::Node, sink: &mut dyn Sink) -> Result<(), SinkError> {
        match &self.arena[node.0] {
            Node::Null | Node::Bool(false) => Ok(()),
            Node::Bool(true) => sink.write(b"true"),
            Node::Str(s) => sink.write(s.as_bytes()),
            Node::Array(_) => sink.write(b"<<ARRAY>>"),
            Node::Object(_) => sink.write(b"<<OBJECT>>"),
        }
    }

    fn partial(&mut self, name: &str) -> Option<Template> {
        self.partials.get(name).cloned()
    }
}

fn is_json_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

struct Parser<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while self.off < self.data.len() && is_json_ws(self.data[self.off]) {
            self.off += 1;
        }
    }

    fn parse_value(&mut self) -> Value {
        self.skip_ws();
        match self.data.get(self.off) {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Value::Str(self.parse_quoted_string()),
            Some(b'n') if self.data[self.off..].starts_with(b"null") => {
                self.off += 4;
                Value::Null
            }
            Some(b't') if self.data[self.off..].starts_with(b"true") => {
                self.off += 4;
                Value::Bool(true)
            }
            Some(b'f') if self.data[self.off..].starts_with(b"false") => {
                self.off += 5;
                Value::Bool(false)
            }
            _ => Value::Str(self.parse_bare_string()),
        }
    }

    fn parse_quoted_string(&mut self) -> String {
        self.off += 1; // opening quote
        let mut s = String::new();
        while self.data[self.off] != b'"' {
            if self.data[self.off] == b'\\' {
                self.off += 1;
                match self.data[self.off] {
                    b'n' => s.push('\n'),
                    b'r' => s.push('\r'),
                    b't' => s.push('\t'),
                    b'\\' => s.push('\\'),
                    other => s.push(other as char),
                }
                self.off += 1;
            } else {
                s.push(self.data[self.off] as char);
                self.off += 1;
            }
        }
        self.off += 1; // closing quote
        s
    }

    fn parse_bare_string(&mut self) -> String {
        let start = self.off;
        while self.off < self.data.len() && !matches!(self.data[self.off], b' ' | b'\t' | b'\r' | b'\n' | b']' | b'}' | b',') {
            self.off += 1;
        }
        String::from_utf8_lossy(&self.data[start..self.off]).into_owned()
    }

    fn parse_array(&mut self) -> Value {
        self.off += 1; // '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.data[self.off] == b']' {
                self.off += 1;
                break;
            }
            if self.data[self.off] == b',' {
                self.off += 1;
                continue;
            }
            items.push(self.parse_value());
        }
        Value::Array(items)
    }

    fn parse_object(&mut self) -> Value {
        self.off += 1; // '{'
        let mut fields = Vec::new();
        loop {
            self.skip_ws();
            if self.data[self.off] == b'}' {
                self.off += 1;
                break;
            }
            if self.data[self.off] == b',' {
                self.off += 1;
                continue;
            }
            let key = self.parse_quoted_string();
            self.skip_ws();
            assert_eq!(self.data[self.off], b':', "object key must be followed by ':'");
            self.off += 1;
            let value = self.parse_value();
            fields.push((key, value));
        }
        Value::Object(fields)
    }
}

/// Parses `input` into a [`Value`] tree (see [`JsonProvider::parse`]).
pub fn parse(input: &str) -> Value {
    let mut parser = Parser {
        data: input.as_bytes(),
        off: 0,
    };
    parser.skip_ws();
    parser.parse_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_with_string_and_array_fields() {
        let value = parse(r#"{"name": "Chris", "list": [1, 2, 3]}"#);
        match value {
            Value::Object(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "name");
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn parses_escapes_in_quoted_strings() {
        match parse(r#""a\nb""#) {
            Value::Str(s) => assert_eq!(s, "a\nb"),
            _ => panic!("expected string"),
        }
    }
}
