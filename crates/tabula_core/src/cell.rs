//! Cell values and their kinds.
//!
//! A [`Cell`] is one of the ordinary kinds or one of the two sentinels. Text
//! that spells a sentinel token (`"NA"`, `"Inf"`, ...) is treated as that
//! sentinel everywhere cells are classified, so raw ingested text behaves
//! the same as a typed sentinel.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inference::{is_double_shaped, is_integer_shaped};
use crate::sentinel::{MissingOrder, Sentinel, Sign};

/// Kind of a cell, one per schema position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Integer,
    Double,
    Boolean,
    Text,
    Factor,
    Missing,
    Infinite,
}

impl Kind {
    pub fn is_sentinel(self) -> bool {
        matches!(self, Kind::Missing | Kind::Infinite)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Integer | Kind::Double)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Double => "double",
            Kind::Boolean => "boolean",
            Kind::Text => "text",
            Kind::Factor => "factor",
            Kind::Missing => "missing",
            Kind::Infinite => "infinite",
        }
    }

    /// Cross-kind ordering rank for ordinary values.
    fn rank(self) -> u8 {
        match self {
            Kind::Boolean => 0,
            Kind::Integer | Kind::Double => 1,
            Kind::Factor => 2,
            Kind::Text => 3,
            Kind::Missing | Kind::Infinite => 4,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Sentinel> for Kind {
    fn from(sentinel: Sentinel) -> Self {
        match sentinel {
            Sentinel::Missing => Kind::Missing,
            Sentinel::Infinite(_) => Kind::Infinite,
        }
    }
}

/// Categorical value with an integer level assigned in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factor {
    pub label: String,
    pub level: usize,
}

impl Factor {
    pub fn new(label: impl Into<String>, level: usize) -> Self {
        Self {
            label: label.into(),
            level,
        }
    }
}

impl PartialOrd for Factor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Factor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label.cmp(&other.label)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Result of a numeric computation, typed by the column it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Double(f64),
}

impl Number {
    /// Wrap `value` in `kind`, truncating toward zero for integers.
    pub fn from_f64(kind: Kind, value: f64) -> Self {
        if kind == Kind::Double {
            Number::Double(value)
        } else {
            Number::Integer(value as i64)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(v) => v as f64,
            Number::Double(v) => v,
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Number::Integer(_) => Kind::Integer,
            Number::Double(_) => Kind::Double,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{}", v),
            Number::Double(v) => f.write_str(&format_double(*v)),
        }
    }
}

/// A single value in a row or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Text(String),
    Factor(Factor),
    Missing,
    Infinite(Sign),
}

impl Cell {
    /// Parse a raw token into the narrowest cell it spells.
    pub fn from_token(token: &str) -> Cell {
        if let Some(sentinel) = Sentinel::classify(token) {
            return sentinel.into();
        }
        if is_integer_shaped(token) {
            if let Ok(v) = token.parse::<i64>() {
                return Cell::Integer(v);
            }
        }
        if is_double_shaped(token) {
            if let Ok(v) = token.parse::<f64>() {
                return Cell::from_computed(v);
            }
        }
        Cell::Text(token.to_string())
    }

    /// Sentinel carried by this cell, if it is theoretical.
    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Cell::Missing => Some(Sentinel::Missing),
            Cell::Infinite(sign) => Some(Sentinel::Infinite(*sign)),
            Cell::Double(v) if v.is_infinite() => Some(Sentinel::Infinite(if *v > 0.0 {
                Sign::Positive
            } else {
                Sign::Negative
            })),
            Cell::Text(token) => Sentinel::classify(token),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel().is_some()
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.sentinel(), Some(Sentinel::Missing))
    }

    /// Kind of this cell, sentinel kinds included.
    pub fn kind(&self) -> Kind {
        if let Some(sentinel) = self.sentinel() {
            return sentinel.into();
        }
        match self {
            Cell::Integer(_) => Kind::Integer,
            Cell::Double(_) => Kind::Double,
            Cell::Boolean(_) => Kind::Boolean,
            Cell::Text(_) => Kind::Text,
            Cell::Factor(_) => Kind::Factor,
            Cell::Missing => Kind::Missing,
            Cell::Infinite(_) => Kind::Infinite,
        }
    }

    /// Numeric reading of an ordinary cell. Numeric-shaped text parses;
    /// sentinels, overflowing text and everything else yield `None`.
    pub fn numeric_value(&self) -> Option<f64> {
        self.parsed_f64().filter(|v| v.is_finite())
    }

    /// Like [`Cell::numeric_value`] but keeps text that overflows to an
    /// infinity, so conversions can turn it into a sentinel.
    pub(crate) fn parsed_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Double(v) if !v.is_nan() => Some(*v),
            Cell::Text(token) if is_double_shaped(token) => token.parse().ok(),
            _ => None,
        }
    }

    /// Numeric reading that maps sentinels to their fixed stand-ins.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self.sentinel() {
            Some(sentinel) => Some(sentinel.as_f64()),
            None => self.numeric_value(),
        }
    }

    /// Double cell for a computed value; NaN becomes missing and infinities
    /// become infinite sentinels.
    pub fn from_computed(value: f64) -> Cell {
        if value.is_nan() {
            Cell::Missing
        } else if value.is_infinite() {
            Cell::Infinite(if value > 0.0 { Sign::Positive } else { Sign::Negative })
        } else {
            Cell::Double(value)
        }
    }

    /// Replace a non-finite double with the sentinel it stands for. Every
    /// other cell is returned unchanged.
    pub fn normalize(self) -> Cell {
        match self {
            Cell::Double(v) if !v.is_finite() => Cell::from_computed(v),
            other => other,
        }
    }

    /// Hashable identity used for frequency counts and uniqueness. Text that
    /// spells a sentinel shares the sentinel's identity.
    pub(crate) fn identity(&self) -> (Kind, String) {
        match self.sentinel() {
            Some(sentinel) => (sentinel.into(), sentinel.token().to_string()),
            None => (self.kind(), self.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Double(v) => f.write_str(&format_double(*v)),
            Cell::Boolean(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
            Cell::Factor(v) => write!(f, "{}", v),
            Cell::Missing => f.write_str(Sentinel::Missing.token()),
            Cell::Infinite(sign) => f.write_str(Sentinel::Infinite(*sign).token()),
        }
    }
}

/// Render a double so that integral values keep a fractional part and still
/// read back as doubles.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { Sign::Positive } else { Sign::Negative };
        Sentinel::Infinite(sign).token().to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else if value.fract() == 0.0 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Compare two cells: sentinels per their ordering rules, ordinary values by
/// the natural order of their kind. Integers and doubles compare numerically
/// across kinds; other mixed pairs order by kind.
pub fn compare_cells(a: &Cell, b: &Cell, order: MissingOrder) -> Ordering {
    match (a.sentinel(), b.sentinel()) {
        (Some(x), Some(y)) => x.compare(y, order),
        (Some(x), None) => x.compare_to_ordinary(order),
        (None, Some(y)) => y.compare_to_ordinary(order).reverse(),
        (None, None) => compare_ordinary(a, b),
    }
}

fn compare_ordinary(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Integer(x), Cell::Integer(y)) => x.cmp(y),
        (Cell::Double(x), Cell::Double(y)) => x.total_cmp(y),
        (Cell::Integer(x), Cell::Double(y)) => (*x as f64).total_cmp(y),
        (Cell::Double(x), Cell::Integer(y)) => x.total_cmp(&(*y as f64)),
        (Cell::Boolean(x), Cell::Boolean(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        (Cell::Factor(x), Cell::Factor(y)) => x.cmp(y),
        _ => a.kind().rank().cmp(&b.kind().rank()),
    }
}

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Cell {
            fn from(value: $ty) -> Self {
                Cell::$variant(value.into())
            }
        }
    };
}

impl_from!(Integer, i64);
impl_from!(Integer, i32);
impl_from!(Boolean, bool);
impl_from!(Text, String);
impl_from!(Factor, Factor);

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_computed(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Sentinel> for Cell {
    fn from(sentinel: Sentinel) -> Self {
        match sentinel {
            Sentinel::Missing => Cell::Missing,
            Sentinel::Infinite(sign) => Cell::Infinite(sign),
        }
    }
}

impl From<Number> for Cell {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(v) => Cell::Integer(v),
            Number::Double(v) => Cell::from_computed(v),
        }
    }
}
