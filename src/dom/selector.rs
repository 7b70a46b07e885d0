// Selector parsing and matching.
// Covers the subset the augmenters use: tag, #id, .class, [attr],
// [attr="value"], compounds of those, descendant and child combinators,
// and comma-separated groups.

use crate::error::{Result, UpliftError};

use super::tree::{Document, NodeId};

/// A parsed selector group (comma-separated alternatives).
#[derive(Debug, Clone)]
pub struct Selector {
    alternatives: Vec<Complex>,
    source: String,
}

#[derive(Debug, Clone)]
struct Complex {
    compounds: Vec<Compound>,
    // combinators[i] sits between compounds[i] and compounds[i + 1]
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    /// The selector text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.matches_from(doc, node, self.compounds.len() - 1)
    }

    // Match right-to-left: `node` must satisfy compounds[index], and its
    // ancestry must satisfy everything to the left.
    fn matches_from(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| self.matches_from(doc, p, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = doc.parent(node);
                while let Some(a) = ancestor {
                    if self.matches_from(doc, a, index - 1) {
                        return true;
                    }
                    ancestor = doc.parent(a);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.tag(node) != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|a| match &a.value {
            Some(v) => doc.attr(node, &a.name) == Some(v.as_str()),
            None => doc.attr(node, &a.name).is_some(),
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Selector> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            if !self.eat(b',') {
                break;
            }
        }
        if self.pos != self.bytes.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(Selector {
            alternatives,
            source: self.input.to_string(),
        })
    }

    fn parse_complex(&mut self) -> Result<Complex> {
        self.skip_ws();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            if self.peek() == Some(b'>') {
                self.pos += 1;
                self.skip_ws();
                combinators.push(Combinator::Child);
                compounds.push(self.parse_compound()?);
            } else if had_ws && self.starts_compound() {
                combinators.push(Combinator::Descendant);
                compounds.push(self.parse_compound()?);
            } else {
                break;
            }
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let start = self.pos;
        if let Some(tag) = self.eat_ident() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some(b'#') => {
                    self.pos += 1;
                    compound.id = Some(self.expect_ident("an id")?);
                }
                Some(b'.') => {
                    self.pos += 1;
                    let class = self.expect_ident("a class name")?;
                    compound.classes.push(class);
                }
                Some(b'[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.error("expected a simple selector"));
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<AttrTest> {
        let name = self.expect_ident("an attribute name")?;
        let value = if self.eat(b'=') {
            Some(self.parse_attr_value()?)
        } else {
            None
        };
        if !self.eat(b']') {
            return Err(self.error("expected `]`"));
        }
        Ok(AttrTest { name, value })
    }

    fn parse_attr_value(&mut self) -> Result<String> {
        if self.eat(b'"') {
            let start = self.pos;
            while let Some(c) = self.peek() {
                if c == b'"' {
                    break;
                }
                self.pos += 1;
            }
            if !self.eat(b'"') {
                return Err(self.error("unterminated attribute value"));
            }
            Ok(self.input[start..self.pos - 1].to_string())
        } else {
            self.expect_ident("an attribute value")
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_compound(&self) -> bool {
        matches!(self.peek(), Some(c) if is_ident(c) || c == b'#' || c == b'.' || c == b'[')
    }

    fn eat_ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.input[start..self.pos].to_string())
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        self.eat_ident()
            .ok_or_else(|| self.error(&format!("expected {}", what)))
    }

    fn error(&self, reason: &str) -> UpliftError {
        UpliftError::Selector {
            selector: self.input.to_string(),
            reason: format!("{} at offset {}", reason, self.pos),
        }
    }
}

fn is_ident(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_'
}
