use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Equality and ordering operators accepted by `compare` and `filter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    /// All operators, longest symbols first so that prefix scanning is greedy.
    pub const ALL: [Self; 6] = [
        Self::Equal,
        Self::NotEqual,
        Self::LessOrEqual,
        Self::GreaterOrEqual,
        Self::Less,
        Self::Greater,
    ];

    /// The operator's symbol, e.g. `">="`.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Whether the operator needs an ordering rather than just equality.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Evaluate the operator against an already computed ordering.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
            Self::Less => ordering == Ordering::Less,
            Self::LessOrEqual => ordering != Ordering::Greater,
            Self::Greater => ordering == Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
        }
    }

    /// Match the longest operator symbol at the start of `input`.
    pub fn strip_prefix(input: &str) -> Option<(Self, &str)> {
        Self::ALL
            .iter()
            .find_map(|op| input.strip_prefix(op.symbol()).map(|rest| (*op, rest)))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparison {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::strip_prefix(s) {
            Some((op, "")) => Ok(op),
            _ => Err(TypeError::UnknownComparison(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_symbol() {
        for op in Comparison::ALL {
            assert_eq!(op.symbol().parse::<Comparison>().unwrap(), op);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("=".parse::<Comparison>().is_err());
        assert!("<>".parse::<Comparison>().is_err());
        assert!("".parse::<Comparison>().is_err());
    }

    #[test]
    fn strip_prefix_is_greedy() {
        assert_eq!(
            Comparison::strip_prefix("<= 3"),
            Some((Comparison::LessOrEqual, " 3"))
        );
        assert_eq!(Comparison::strip_prefix("<3"), Some((Comparison::Less, "3")));
        assert_eq!(Comparison::strip_prefix("abc"), None);
    }

    #[test]
    fn holds_matches_ordering() {
        use Ordering::*;
        assert!(Comparison::Greater.holds(Greater));
        assert!(!Comparison::Greater.holds(Equal));
        assert!(Comparison::GreaterOrEqual.holds(Equal));
        assert!(Comparison::LessOrEqual.holds(Less));
        assert!(!Comparison::LessOrEqual.holds(Greater));
        assert!(Comparison::NotEqual.holds(Less));
        assert!(!Comparison::Equal.holds(Less));
    }

    #[test]
    fn ordering_flag() {
        assert!(!Comparison::Equal.is_ordering());
        assert!(!Comparison::NotEqual.is_ordering());
        assert!(Comparison::Less.is_ordering());
    }
}
