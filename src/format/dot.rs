// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reader for the GraphViz-style description subset the viewer consumes.
//!
//! Supported statements inside a `digraph`: graph attributes (`key = value`),
//! `node`/`edge`/`graph` default-attribute statements, node statements with an
//! optional attribute list, and edge chains (`a -> b -> c [..]`). Subgraphs and
//! undirected graphs are rejected.

use std::collections::BTreeMap;
use std::fmt;

use memchr::{memchr, memchr_iter};
use smol_str::SmolStr;

use crate::model::graph_ast::GraphAst;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotParseError {
    MissingHeader,
    UndirectedGraph {
        line_no: usize,
    },
    UnterminatedString {
        line_no: usize,
    },
    UnexpectedEnd {
        line_no: usize,
    },
    UnexpectedCharacter {
        line_no: usize,
        found: char,
    },
    MissingAttributeValue {
        line_no: usize,
        key: String,
    },
    UnsupportedSyntax {
        line_no: usize,
        token: String,
    },
}

impl fmt::Display for DotParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => {
                f.write_str("expected 'digraph' at the start of the description")
            }
            Self::UndirectedGraph { line_no } => write!(
                f,
                "undirected graph on line {line_no} (only digraphs are supported)"
            ),
            Self::UnterminatedString { line_no } => {
                write!(f, "unterminated string starting on line {line_no}")
            }
            Self::UnexpectedEnd { line_no } => {
                write!(f, "unexpected end of description on line {line_no}")
            }
            Self::UnexpectedCharacter { line_no, found } => {
                write!(f, "unexpected character '{found}' on line {line_no}")
            }
            Self::MissingAttributeValue { line_no, key } => {
                write!(f, "missing value for attribute '{key}' on line {line_no}")
            }
            Self::UnsupportedSyntax { line_no, token } => {
                write!(f, "unsupported syntax on line {line_no}: {token}")
            }
        }
    }
}

impl std::error::Error for DotParseError {}

/// Parses a description into a [`GraphAst`].
pub fn parse(text: &str) -> Result<GraphAst, DotParseError> {
    Parser::new(text).parse()
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    node_defaults: BTreeMap<SmolStr, String>,
    edge_defaults: BTreeMap<SmolStr, String>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            node_defaults: BTreeMap::new(),
            edge_defaults: BTreeMap::new(),
        }
    }

    fn parse(mut self) -> Result<GraphAst, DotParseError> {
        let mut header = self
            .read_identifier()
            .ok_or(DotParseError::MissingHeader)?;
        if header == "strict" {
            header = self
                .read_identifier()
                .ok_or(DotParseError::MissingHeader)?;
        }
        match header.as_str() {
            "digraph" => {}
            "graph" => return Err(DotParseError::UndirectedGraph { line_no: self.line }),
            _ => return Err(DotParseError::MissingHeader),
        }

        let name = match self.peek() {
            Some(b'{') => None,
            _ => self.read_name()?,
        };
        self.expect(b'{')?;

        let mut ast = GraphAst::new(name.map(SmolStr::from));
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(DotParseError::UnexpectedEnd { line_no: self.line }),
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b';') => {
                    self.pos += 1;
                }
                Some(b'{') => {
                    return Err(DotParseError::UnsupportedSyntax {
                        line_no: self.line,
                        token: "{ (subgraph)".to_owned(),
                    })
                }
                Some(_) => self.parse_statement(&mut ast)?,
            }
        }

        self.skip_trivia();
        match self.peek() {
            None => Ok(ast),
            Some(found) => Err(DotParseError::UnexpectedCharacter {
                line_no: self.line,
                found: found as char,
            }),
        }
    }

    fn parse_statement(&mut self, ast: &mut GraphAst) -> Result<(), DotParseError> {
        let statement_line = self.line;
        let name = match self.read_name()? {
            Some(name) => name,
            None => {
                let found = self.peek().map(|b| b as char).unwrap_or('\0');
                return Err(DotParseError::UnexpectedCharacter {
                    line_no: self.line,
                    found,
                });
            }
        };

        self.skip_trivia();
        match self.peek() {
            Some(b'=') => {
                self.pos += 1;
                let value = self.read_name()?.ok_or(DotParseError::MissingAttributeValue {
                    line_no: statement_line,
                    key: name.clone(),
                })?;
                ast.set_graph_attr(SmolStr::from(name), value);
                Ok(())
            }
            Some(b'[') if name == "node" => {
                let attrs = self.parse_attr_list()?;
                self.node_defaults.extend(attrs);
                Ok(())
            }
            Some(b'[') if name == "edge" => {
                let attrs = self.parse_attr_list()?;
                self.edge_defaults.extend(attrs);
                Ok(())
            }
            Some(b'[') if name == "graph" => {
                for (key, value) in self.parse_attr_list()? {
                    ast.set_graph_attr(key, value);
                }
                Ok(())
            }
            _ if self.starts_with("->") => self.parse_edge_chain(ast, name),
            _ if self.starts_with("--") => {
                Err(DotParseError::UndirectedGraph { line_no: self.line })
            }
            Some(b'[') => {
                let mut attrs = self.node_defaults.clone();
                attrs.extend(self.parse_attr_list()?);
                ast.add_node(SmolStr::from(name), attrs);
                Ok(())
            }
            _ => {
                ast.add_node(SmolStr::from(name), self.node_defaults.clone());
                Ok(())
            }
        }
    }

    fn parse_edge_chain(&mut self, ast: &mut GraphAst, first: String) -> Result<(), DotParseError> {
        let mut endpoints = vec![SmolStr::from(first)];
        while self.starts_with("->") {
            self.pos += 2;
            let next = self.read_name()?.ok_or(DotParseError::UnexpectedEnd {
                line_no: self.line,
            })?;
            endpoints.push(SmolStr::from(next));
            self.skip_trivia();
        }

        let mut attrs = self.edge_defaults.clone();
        if self.peek() == Some(b'[') {
            attrs.extend(self.parse_attr_list()?);
        }

        for pair in endpoints.windows(2) {
            ast.add_edge(pair[0].clone(), pair[1].clone(), attrs.clone());
        }
        Ok(())
    }

    fn parse_attr_list(&mut self) -> Result<BTreeMap<SmolStr, String>, DotParseError> {
        self.expect(b'[')?;
        let mut attrs = BTreeMap::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(DotParseError::UnexpectedEnd { line_no: self.line }),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(attrs);
                }
                Some(b',') | Some(b';') => {
                    self.pos += 1;
                }
                Some(_) => {
                    let key_line = self.line;
                    let key = match self.read_name()? {
                        Some(key) => key,
                        None => {
                            let found = self.peek().map(|b| b as char).unwrap_or('\0');
                            return Err(DotParseError::UnexpectedCharacter {
                                line_no: self.line,
                                found,
                            });
                        }
                    };
                    self.skip_trivia();
                    if self.peek() != Some(b'=') {
                        return Err(DotParseError::MissingAttributeValue {
                            line_no: key_line,
                            key,
                        });
                    }
                    self.pos += 1;
                    let value = self.read_name()?.ok_or(DotParseError::MissingAttributeValue {
                        line_no: key_line,
                        key: key.clone(),
                    })?;
                    attrs.insert(SmolStr::from(key), value);
                }
            }
        }
    }

    /// Reads an identifier, number, or quoted string; `Ok(None)` when the next byte
    /// starts none of these.
    fn read_name(&mut self) -> Result<Option<String>, DotParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'"') => self.read_quoted().map(Some),
            Some(b) if is_ident_byte(b) => Ok(self.read_identifier()),
            _ => Ok(None),
        }
    }

    fn read_identifier(&mut self) -> Option<String> {
        self.skip_trivia();
        let start = self.pos;
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && is_ident_byte(bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.text[start..self.pos].to_owned())
        }
    }

    /// Reads a double-quoted string. Backslash escapes for `"` and `\` are resolved;
    /// every other escape (notably `\n` in labels) is kept literal for the model layer.
    fn read_quoted(&mut self) -> Result<String, DotParseError> {
        let open_line = self.line;
        debug_assert_eq!(self.peek(), Some(b'"'));
        self.pos += 1;

        let bytes = self.text.as_bytes();
        let mut out = String::new();
        let mut cursor = self.pos;
        loop {
            let Some(offset) = memchr(b'"', &bytes[cursor..]) else {
                return Err(DotParseError::UnterminatedString { line_no: open_line });
            };
            let quote = cursor + offset;

            let mut backslashes = 0;
            while quote > cursor + backslashes && bytes[quote - 1 - backslashes] == b'\\' {
                backslashes += 1;
            }
            if backslashes % 2 == 1 {
                // Escaped quote, keep scanning.
                out.push_str(&self.text[cursor..quote - 1]);
                out.push('"');
                cursor = quote + 1;
                continue;
            }

            out.push_str(&self.text[cursor..quote]);
            self.line += memchr_iter(b'\n', &bytes[self.pos..quote]).count();
            self.pos = quote + 1;
            return Ok(out.replace("\\\\", "\\"));
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), DotParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(found) if found == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(DotParseError::UnexpectedCharacter {
                line_no: self.line,
                found: found as char,
            }),
            None => Err(DotParseError::UnexpectedEnd { line_no: self.line }),
        }
    }

    fn starts_with(&mut self, token: &str) -> bool {
        self.skip_trivia();
        self.text[self.pos..].starts_with(token)
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        let bytes = self.text.as_bytes();
        loop {
            match bytes.get(self.pos) {
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'#') => self.skip_to_line_end(),
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'/') => self.skip_to_line_end(),
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos += 2;
                    while self.pos < bytes.len() {
                        if bytes[self.pos] == b'\n' {
                            self.line += 1;
                        }
                        if bytes[self.pos] == b'*' && bytes.get(self.pos + 1) == Some(&b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        let bytes = self.text.as_bytes();
        match memchr(b'\n', &bytes[self.pos..]) {
            Some(offset) => self.pos += offset,
            None => self.pos = bytes.len(),
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-'
}
