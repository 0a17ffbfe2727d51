//! Numeric conversion inference
//!
//! Decides whether a text column can be cast to a numeric kind, and to which.
//! Works by elimination over the scanned tokens:
//!
//! - an integer-shaped token keeps `Integer` possible
//! - a double-shaped token resolves to `Double` immediately (promotion only
//!   goes integer -> double, never back)
//! - a sentinel-shaped token is skipped
//! - anything else eliminates both numeric kinds
//!
//! Only a prefix of the column is scanned: all of it when shorter than
//! [`FULL_SCAN_LIMIT`] cells, otherwise the first third of its non-sentinel
//! cells. A double-shaped token beyond the scanned prefix is not seen, so a
//! later integer cast can still fail; bulk ingestion logs that case instead of
//! raising it.

use std::sync::OnceLock;

use regex::Regex;

use crate::cell::{Cell, Kind};
use crate::sentinel::Sentinel;

/// Columns shorter than this are scanned in full.
pub const FULL_SCAN_LIMIT: usize = 20;

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").expect("valid integer pattern"))
}

fn double_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?$").expect("valid double pattern")
    })
}

/// Lexical shape of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Integer,
    Double,
    Sentinel,
    Other,
}

/// Classify a raw token.
pub fn token_shape(token: &str) -> TokenShape {
    if Sentinel::classify(token).is_some() {
        TokenShape::Sentinel
    } else if integer_pattern().is_match(token) {
        TokenShape::Integer
    } else if double_pattern().is_match(token) {
        TokenShape::Double
    } else {
        TokenShape::Other
    }
}

pub fn is_integer_shaped(token: &str) -> bool {
    integer_pattern().is_match(token)
}

pub fn is_double_shaped(token: &str) -> bool {
    double_pattern().is_match(token)
}

/// Elimination-based numeric conversion solver for one column.
#[derive(Debug)]
pub struct NumericConversionSolver {
    /// Non-sentinel cells still to look at before giving an answer
    budget: usize,
    /// Best numeric kind proven so far
    candidate: Option<Kind>,
    /// Set once a double-shaped token is seen
    resolved: bool,
    /// Token that ruled out numeric conversion, if any
    rejected_by: Option<String>,
}

impl NumericConversionSolver {
    /// Create a solver for a column of `len` cells.
    pub fn new(len: usize) -> Self {
        let budget = if len < FULL_SCAN_LIMIT { len } else { len / 3 };
        Self {
            budget,
            candidate: None,
            resolved: false,
            rejected_by: None,
        }
    }

    /// True once no further token can change the answer.
    pub fn is_finished(&self) -> bool {
        self.resolved || self.rejected_by.is_some() || self.budget == 0
    }

    /// Feed one token.
    pub fn add_value(&mut self, token: &str) {
        if self.is_finished() {
            return;
        }
        match token_shape(token) {
            TokenShape::Sentinel => return,
            TokenShape::Integer => {
                self.candidate.get_or_insert(Kind::Integer);
            }
            TokenShape::Double => {
                self.candidate = Some(Kind::Double);
                self.resolved = true;
            }
            TokenShape::Other => {
                self.candidate = None;
                self.rejected_by = Some(token.to_string());
            }
        }
        self.budget -= 1;
    }

    /// The token that eliminated numeric conversion.
    pub fn rejected_by(&self) -> Option<&str> {
        self.rejected_by.as_deref()
    }

    /// `Some(Integer)`, `Some(Double)`, or `None` when not convertible (or
    /// nothing but sentinels was seen).
    pub fn resolve(&self) -> Option<Kind> {
        if self.rejected_by.is_some() {
            None
        } else {
            self.candidate
        }
    }
}

/// Run the solver over a column's cells.
pub fn numeric_conversion_kind(cells: &[Cell]) -> Option<Kind> {
    let mut solver = NumericConversionSolver::new(cells.len());
    for cell in cells {
        if solver.is_finished() {
            break;
        }
        match cell {
            Cell::Text(token) => solver.add_value(token),
            other if other.is_sentinel() => {}
            other => solver.add_value(&other.to_string()),
        }
    }
    if let Some(token) = solver.rejected_by() {
        tracing::trace!(token, "numeric conversion eliminated");
    }
    solver.resolve()
}

/// Least-lossy common kind for a set of per-column conversion kinds.
///
/// `None` in the input stands for a column that cannot become numeric and
/// forces `Text`.
pub fn common_kind<I>(kinds: I) -> Kind
where
    I: IntoIterator<Item = Option<Kind>>,
{
    let mut joined = Kind::Integer;
    for kind in kinds {
        match kind {
            Some(Kind::Double) => joined = Kind::Double,
            Some(Kind::Integer) => {}
            _ => return Kind::Text,
        }
    }
    joined
}
