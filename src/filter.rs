//! Row filters built from `--when` expressions
//!
//! Each `--when` value is one [`Disjunction`]: clauses separated by `|`, any
//! of which may hold. Repeating `--when` adds another disjunction, and a row
//! must satisfy all of them.
//!
//! ```text
//! --when 'status=open|status=pending' --when 'owner not empty'
//!   => (status = "open" OR status = "pending") AND owner <> ""
//! ```
//!
//! A clause has one of four shapes, recognised in this order so that
//! operator text inside column names stays unambiguous:
//!
//! 1. `<col> is empty`
//! 2. `<col> not empty`
//! 3. `<col>!=<value>`
//! 4. `<col>=<value>`

use crate::error::{DkitError, Result};
use crate::reader::Fields;
use crate::resolver::ColumnResolver;
use std::fmt;
use std::str::FromStr;

const IS_EMPTY_SUFFIX: &str = " is empty";
const NOT_EMPTY_SUFFIX: &str = " not empty";

/// Comparison applied by a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    IsEmpty,
    IsNotEmpty,
}

/// A single condition: column, operator and (for comparisons) a literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub column: String,
    pub operator: Operator,
    pub value: Option<String>,
}

impl FromStr for Clause {
    type Err = DkitError;

    fn from_str(s: &str) -> Result<Self> {
        // ASCII lowering keeps byte offsets aligned with `s`.
        let lower = s.to_ascii_lowercase();

        for (suffix, operator) in [
            (IS_EMPTY_SUFFIX, Operator::IsEmpty),
            (NOT_EMPTY_SUFFIX, Operator::IsNotEmpty),
        ] {
            if lower.ends_with(suffix) {
                let column = s[..s.len() - suffix.len()].trim();
                if column.is_empty() {
                    return Err(DkitError::invalid_condition(s));
                }
                return Ok(Self {
                    column: column.to_string(),
                    operator,
                    value: None,
                });
            }
        }

        for (token, operator) in [("!=", Operator::NotEquals), ("=", Operator::Equals)] {
            if let Some(idx) = s.find(token) {
                let column = s[..idx].trim();
                if column.is_empty() {
                    return Err(DkitError::invalid_condition(s));
                }
                return Ok(Self {
                    column: column.to_string(),
                    operator,
                    value: Some(s[idx + token.len()..].trim().to_string()),
                });
            }
        }

        Err(DkitError::invalid_condition(s))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.as_deref().unwrap_or("");
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.column, value),
            Operator::NotEquals => write!(f, "{}!={}", self.column, value),
            Operator::IsEmpty => write!(f, "{}{}", self.column, IS_EMPTY_SUFFIX),
            Operator::IsNotEmpty => write!(f, "{}{}", self.column, NOT_EMPTY_SUFFIX),
        }
    }
}

/// Clauses joined by OR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disjunction {
    pub clauses: Vec<Clause>,
}

impl FromStr for Disjunction {
    type Err = DkitError;

    fn from_str(s: &str) -> Result<Self> {
        let clauses = s
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Clause::from_str)
            .collect::<Result<Vec<_>>>()?;

        if clauses.is_empty() {
            return Err(DkitError::empty_condition(s));
        }
        Ok(Self { clauses })
    }
}

/// Disjunctions joined by AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub groups: Vec<Disjunction>,
}

impl Filter {
    /// Build a filter from repeated `--when` values
    pub fn parse_all<S: AsRef<str>>(expressions: &[S]) -> Result<Self> {
        let mut filter = Self::default();
        for expression in expressions {
            filter.push(expression.as_ref())?;
        }
        Ok(filter)
    }

    /// Parse one more `--when` value and AND it onto the filter
    pub fn push(&mut self, expression: &str) -> Result<()> {
        self.groups.push(expression.parse()?);
        Ok(())
    }

    /// True when the filter has no conditions and accepts every row
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Translate column references into positions for one file.
    ///
    /// Stops at the first clause whose column cannot be resolved.
    pub fn resolve(&self, resolver: &ColumnResolver<'_>) -> Result<ResolvedFilter> {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                let clauses = group
                    .clauses
                    .iter()
                    .map(|clause| {
                        Ok(ResolvedClause {
                            index: resolver.resolve(&clause.column)?,
                            operator: clause.operator,
                            value: clause.value.clone().unwrap_or_default(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ResolvedDisjunction { clauses })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedFilter { groups })
    }
}

/// A clause bound to a field position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClause {
    pub index: usize,
    pub operator: Operator,
    pub value: String,
}

impl ResolvedClause {
    fn matches<R: Fields + ?Sized>(&self, row: &R) -> bool {
        let field = row.value(self.index);
        match self.operator {
            Operator::Equals => field == self.value.as_str(),
            Operator::NotEquals => field != self.value.as_str(),
            Operator::IsEmpty => field.is_empty(),
            Operator::IsNotEmpty => !field.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDisjunction {
    pub clauses: Vec<ResolvedClause>,
}

impl ResolvedDisjunction {
    fn matches<R: Fields + ?Sized>(&self, row: &R) -> bool {
        self.clauses.iter().any(|clause| clause.matches(row))
    }
}

/// A filter ready to evaluate rows of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub groups: Vec<ResolvedDisjunction>,
}

impl ResolvedFilter {
    /// True when every disjunction has at least one matching clause
    pub fn matches<R: Fields + ?Sized>(&self, row: &R) -> bool {
        self.groups.iter().all(|group| group.matches(row))
    }
}
