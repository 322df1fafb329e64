//! Type expressions as they appear in schema documents.
//!
//! The string syntax:
//!
//! ```text
//! type    := name
//!          | "array" "<" type ">"
//!          | "hashmap" "<" type "," type ">"
//!          | "{" (field ("," field)* ","?)? "}"
//! field   := name ":" type
//! name    := [A-Za-z0-9_]+
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

/// An unresolved type expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    /// A string in the type syntax. Bare identifiers name builtin or
    /// declared types.
    Syntax(String),
    /// A table form such as `{ array = "number" }`.
    Composite(CompositeExpr),
}

/// Table form of a composite type expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeExpr {
    Array(Box<TypeExpr>),
    Hashmap {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Fields are kept sorted by name.
    Record(BTreeMap<String, TypeExpr>),
}

impl TypeExpr {
    /// If this expression is a single identifier, return it.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Syntax(text) if is_identifier(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for TypeExpr {
    fn from(text: &str) -> Self {
        Self::Syntax(text.to_string())
    }
}

impl From<CompositeExpr> for TypeExpr {
    fn from(expr: CompositeExpr) -> Self {
        Self::Composite(expr)
    }
}

pub(crate) fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_ident_char)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a type-syntax string into an expression tree.
///
/// Every [`TypeExpr::Syntax`] in the result holds a bare identifier.
pub fn parse_type_expr(text: &str) -> SchemaResult<TypeExpr> {
    let mut parser = Parser { text, pos: 0 };
    let expr = parser.ty()?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> SchemaResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {c:?}")))
        }
    }

    fn ident(&mut self) -> SchemaResult<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn ty(&mut self) -> SchemaResult<TypeExpr> {
        if self.eat('{') {
            return self.record();
        }
        let name = self.ident()?;
        let composite = match name {
            "array" => {
                self.expect('<')?;
                let elem = self.ty()?;
                self.expect('>')?;
                CompositeExpr::Array(Box::new(elem))
            }
            "hashmap" => {
                self.expect('<')?;
                let key = self.ty()?;
                self.expect(',')?;
                let value = self.ty()?;
                self.expect('>')?;
                CompositeExpr::Hashmap {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            _ => return Ok(TypeExpr::Syntax(name.to_string())),
        };
        Ok(composite.into())
    }

    fn record(&mut self) -> SchemaResult<TypeExpr> {
        let mut fields = BTreeMap::new();
        loop {
            if self.eat('}') {
                break;
            }
            let start = self.pos;
            let name = self.ident()?;
            self.expect(':')?;
            let ty = self.ty()?;
            if fields.insert(name.to_string(), ty).is_some() {
                self.pos = start;
                return Err(self.error(&format!("duplicate field {name:?}")));
            }
            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }
        Ok(CompositeExpr::Record(fields).into())
    }

    fn error(&self, reason: &str) -> SchemaError {
        SchemaError::Syntax {
            text: self.text.to_string(),
            offset: self.pos,
            reason: reason.to_string(),
        }
    }
}
