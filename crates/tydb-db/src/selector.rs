//! Selector syntax.
//!
//! ```text
//! selector := "" | segment ("." segment)*
//! segment  := field bracket* | bracket+
//! bracket  := "[" literal "]"                 key
//!           | "[" (field)? op literal "]"     filter
//! field    := [A-Za-z0-9_-]+
//! op       := "==" | "!=" | "<" | "<=" | ">" | ">="
//! literal  := '"' chars '"' | number | "true" | "false"
//! ```
//!
//! Whitespace is allowed around selector parts and inside brackets.
//! Inside a quoted string a backslash escapes the next character.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tydb_item::Item;
use tydb_types::Comparison;

/// A malformed selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector {selector:?} at offset {offset}: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub offset: usize,
    pub reason: String,
}

/// A constant operand written in a selector.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Literal {
    pub fn to_item(&self) -> Item {
        match self {
            Self::String(s) => Item::from(s.as_str()),
            Self::Number(n) => Item::from(*n),
            Self::Boolean(b) => Item::from(*b),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            // Same rendering as the item, so integral numbers print without `.0`.
            Self::Number(n) => write!(f, "{}", Item::from(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Predicate of a filter step.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    /// Field of each value to compare; empty compares the value itself.
    pub field: String,
    pub op: Comparison,
    pub value: Literal,
}

/// One step of a selector path.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Field(String),
    Key(Literal),
    Filter(Filter),
}

/// A parsed selector: the path from the root to a sub-item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    steps: Vec<Step>,
}

impl Selector {
    /// The selector addressing the root item.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser { text: s, pos: 0 }.selector()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Step::Key(literal) => write!(f, "[{literal}]")?,
                Step::Filter(filter) if filter.field.is_empty() => {
                    write!(f, "[{} {}]", filter.op, filter.value)?
                }
                Step::Filter(filter) => {
                    write!(f, "[{} {} {}]", filter.field, filter.op, filter.value)?
                }
            }
        }
        Ok(())
    }
}

fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Characters of an unquoted literal or filter field.
fn is_word_char(c: char) -> bool {
    is_field_char(c) || c == '.' || c == '+'
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn error(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError {
            selector: self.text.to_string(),
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn selector(mut self) -> Result<Selector, SelectorError> {
        let mut steps = Vec::new();
        self.skip_ws();
        if self.at_end() {
            return Ok(Selector::root());
        }
        loop {
            self.segment(&mut steps)?;
            if self.eat('.') {
                continue;
            }
            self.skip_ws();
            if self.at_end() {
                return Ok(Selector { steps });
            }
            return Err(self.error("expected '.' or '['"));
        }
    }

    fn segment(&mut self, steps: &mut Vec<Step>) -> Result<(), SelectorError> {
        self.skip_ws();
        if self.peek() != Some('[') {
            let name = self.take_while(is_field_char);
            if name.is_empty() {
                return Err(self.error("expected a field name or '['"));
            }
            steps.push(Step::Field(name.to_string()));
        }
        while self.eat('[') {
            steps.push(self.bracket()?);
        }
        Ok(())
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed.
    fn bracket(&mut self) -> Result<Step, SelectorError> {
        self.skip_ws();
        if let Some(op) = self.comparison() {
            return self.filter(String::new(), op);
        }

        let start = self.pos;
        let literal = if self.peek() == Some('"') {
            Some(self.quoted()?)
        } else {
            None
        };
        let word = match literal {
            Some(_) => "",
            None => self.take_while(is_word_char),
        };
        self.skip_ws();

        if self.eat(']') {
            return match literal {
                Some(literal) => Ok(Step::Key(literal)),
                None => {
                    let end = self.pos;
                    self.pos = start;
                    let literal = self.word_literal(word)?;
                    self.pos = end;
                    Ok(Step::Key(literal))
                }
            };
        }
        match (literal, self.comparison()) {
            (None, Some(op)) if !word.is_empty() => {
                if !word.chars().all(is_field_char) {
                    self.pos = start;
                    return Err(self.error(format!("invalid filter field {word:?}")));
                }
                self.filter(word.to_string(), op)
            }
            _ => Err(self.error("expected ']' or a comparison operator")),
        }
    }

    fn comparison(&mut self) -> Option<Comparison> {
        let (op, rest) = Comparison::strip_prefix(self.rest())?;
        self.pos = self.text.len() - rest.len();
        Some(op)
    }

    fn filter(&mut self, field: String, op: Comparison) -> Result<Step, SelectorError> {
        self.skip_ws();
        let value = self.literal()?;
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(Step::Filter(Filter { field, op, value }))
    }

    fn literal(&mut self) -> Result<Literal, SelectorError> {
        if self.peek() == Some('"') {
            return self.quoted();
        }
        let start = self.pos;
        let word = self.take_while(is_word_char);
        let end = self.pos;
        self.pos = start;
        let literal = self.word_literal(word)?;
        self.pos = end;
        Ok(literal)
    }

    /// Interpret an unquoted word as a boolean or number literal.
    fn word_literal(&self, word: &str) -> Result<Literal, SelectorError> {
        match word {
            "true" => return Ok(Literal::Boolean(true)),
            "false" => return Ok(Literal::Boolean(false)),
            _ => {}
        }
        let numeric_start = word
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        match word.parse::<f64>() {
            Ok(n) if numeric_start && n.is_finite() => Ok(Literal::Number(n)),
            _ => Err(self.error(format!(
                "expected a quoted string, number, true or false, found {word:?}"
            ))),
        }
    }

    /// Parse a double-quoted string starting at the current position.
    fn quoted(&mut self) -> Result<Literal, SelectorError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(Literal::String(value));
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                c => value.push(c),
            }
        }
        self.pos = start;
        Err(self.error("unterminated string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Selector {
        s.parse().unwrap_or_else(|e| panic!("{e}"))
    }

    fn field(name: &str) -> Step {
        Step::Field(name.into())
    }

    #[test]
    fn empty_selector_is_root() {
        assert!(parse("").is_root());
        assert!(parse("   ").is_root());
        assert_eq!(Selector::root().to_string(), "");
    }

    #[test]
    fn dotted_fields() {
        assert_eq!(
            parse("users.alice.name").steps(),
            &[field("users"), field("alice"), field("name")]
        );
        assert_eq!(parse("user-ids.42").steps(), &[field("user-ids"), field("42")]);
    }

    #[test]
    fn key_steps() {
        assert_eq!(
            parse(r#"scores["a \"b\""]"#).steps(),
            &[field("scores"), Step::Key(Literal::String("a \"b\"".into()))]
        );
        assert_eq!(
            parse("byid[-4.5][true]").steps(),
            &[
                field("byid"),
                Step::Key(Literal::Number(-4.5)),
                Step::Key(Literal::Boolean(true)),
            ]
        );
    }

    #[test]
    fn filter_steps() {
        assert_eq!(
            parse("users[age >= 18].alice").steps(),
            &[
                field("users"),
                Step::Filter(Filter {
                    field: "age".into(),
                    op: Comparison::GreaterOrEqual,
                    value: Literal::Number(18.0),
                }),
                field("alice"),
            ]
        );
        assert_eq!(
            parse("[>1]").steps(),
            &[Step::Filter(Filter {
                field: String::new(),
                op: Comparison::Greater,
                value: Literal::Number(1.0),
            })]
        );
        assert_eq!(
            parse(r#"users[ name != "Bob" ]"#).steps()[1],
            Step::Filter(Filter {
                field: "name".into(),
                op: Comparison::NotEqual,
                value: Literal::String("Bob".into()),
            })
        );
    }

    #[test]
    fn display_is_canonical() {
        let text = r#"users[age >= 18].alice["nick \"name\""][< -2.5]"#;
        assert_eq!(parse(text).to_string(), text);
        assert_eq!(parse("a . b[ 1 ]").to_string(), "a.b[1]");
        assert_eq!(parse(&parse(text).to_string()), parse(text));
    }

    #[test]
    fn malformed_selectors() {
        for bad in [
            "users.",
            ".users",
            "users..alice",
            "users alice",
            "users[",
            "users[]",
            "users[alice]",
            "users[age >]",
            "users[age > 1",
            "users[\"open",
            "users[a.b > 1]",
            "users[== nan]",
            "users[== inf]",
            "users]",
        ] {
            assert!(bad.parse::<Selector>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn error_offsets_point_at_the_problem() {
        let err = "users[\"open".parse::<Selector>().unwrap_err();
        assert_eq!(err.offset, 6);
        assert_eq!(err.reason, "unterminated string");

        let err = "users alice".parse::<Selector>().unwrap_err();
        assert_eq!(err.offset, 6);

        let err = "users[alice]".parse::<Selector>().unwrap_err();
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn unquoted_key_then_more_steps() {
        assert_eq!(
            parse("[1].name").steps(),
            &[Step::Key(Literal::Number(1.0)), field("name")]
        );
        assert_eq!(parse("[0][false]").steps().len(), 2);
    }

    #[test]
    fn literal_to_item() {
        assert_eq!(Literal::Number(3.0).to_item(), Item::from(3.0));
        assert_eq!(Literal::String("x".into()).to_item(), Item::from("x"));
        assert_eq!(Literal::Boolean(false).to_item(), Item::from(false));
    }
}
