//! OData predicate nodes
//!
//! Filter clauses are built as typed nodes and rendered to `$filter` syntax
//! only at the boundary. String literals are escaped in exactly one place
//! ([`quote`]); numeric literals are validated when constructed.

use std::fmt;

use super::error::FilterError;

/// A field reference inside a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Field(&'static str),
    /// `cast(Field, 'Edm.String')` for numeric columns matched as text
    StringCast(&'static str),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::StringCast(name) => write!(f, "cast({}, 'Edm.String')", name),
        }
    }
}

/// Validated numeric token, rendered bare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number(String);

impl Number {
    /// Accepts an optional sign, digits, and an optional fractional part.
    pub fn parse(param: &'static str, raw: &str) -> Result<Self, FilterError> {
        let token = raw.trim();
        if is_decimal(token) {
            Ok(Self(token.to_string()))
        } else {
            Err(FilterError::InvalidNumber {
                param,
                value: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}

/// Literal value on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Text(String),
    Number(Number),
}

impl Literal {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{}", quote(value)),
            Self::Number(n) => write!(f, "{}", n.as_str()),
        }
    }
}

/// One filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Operand, Literal),
    StartsWith(Operand, String),
    Ge(Operand, Number),
    Le(Operand, Number),
    /// `field ge min and field le max`, kept as a single clause
    Range {
        operand: Operand,
        min: Number,
        max: Number,
    },
    /// Parenthesized OR-group
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn eq_text(field: &'static str, value: impl Into<String>) -> Self {
        Self::Eq(Operand::Field(field), Literal::text(value))
    }

    pub fn starts_with(field: &'static str, prefix: impl Into<String>) -> Self {
        Self::StartsWith(Operand::Field(field), prefix.into())
    }

    /// Render to OData `$filter` syntax
    pub fn render(&self) -> String {
        match self {
            Self::Eq(operand, value) => format!("{} eq {}", operand, value),
            Self::StartsWith(operand, prefix) => {
                format!("startswith({}, {})", operand, quote(prefix))
            }
            Self::Ge(operand, n) => format!("{} ge {}", operand, n.as_str()),
            Self::Le(operand, n) => format!("{} le {}", operand, n.as_str()),
            Self::Range { operand, min, max } => format!(
                "{} ge {} and {} le {}",
                operand,
                min.as_str(),
                operand,
                max.as_str()
            ),
            Self::AnyOf(items) => {
                let parts: Vec<String> = items.iter().map(Predicate::render).collect();
                format!("({})", parts.join(" or "))
            }
        }
    }
}

/// Join clauses with a top-level `and`. Returns `None` when there are none.
pub fn render_all(clauses: &[Predicate]) -> Option<String> {
    if clauses.is_empty() {
        return None;
    }
    let parts: Vec<String> = clauses.iter().map(Predicate::render).collect();
    Some(parts.join(" and "))
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
