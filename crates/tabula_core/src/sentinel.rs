//! Sentinel values: concrete stand-ins for absent and unbounded cells.
//!
//! A sentinel occupies a cell like any other value. It is never a language
//! level absence; code that walks cells asks "is this theoretical?" through
//! [`Sentinel::classify`] or [`crate::Cell::sentinel`] instead of checking for
//! `None`.
//!
//! # Ordering
//!
//! - `Missing` sorts below every ordinary value and below every infinity,
//!   unless the caller passes [`MissingOrder::High`].
//! - `Infinite(+)` sorts above every ordinary value, `Infinite(-)` below.
//! - Infinities of the same sign compare equal.
//!
//! The missing-value placement is an explicit policy argument. There is no
//! process-wide toggle.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Tokens that read as a missing value.
const MISSING_TOKENS: [&str; 3] = ["NA", "", "<NA>"];

/// Tokens (case-insensitive, sign stripped) that read as an infinity.
const INFINITE_TOKENS: [&str; 3] = ["inf", "infinite", "infinity"];

/// Sign of an infinite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// `1` for positive, `-1` for negative.
    pub fn signum(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    /// Where an infinity of this sign sits relative to any ordinary value.
    pub fn ordering(self) -> Ordering {
        match self {
            Sign::Positive => Ordering::Greater,
            Sign::Negative => Ordering::Less,
        }
    }
}

/// Placement of missing values when comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingOrder {
    /// Missing sorts below everything, infinities included (default)
    #[default]
    Low,
    /// Missing sorts above everything
    High,
}

impl MissingOrder {
    fn missing_vs_other(self) -> Ordering {
        match self {
            MissingOrder::Low => Ordering::Less,
            MissingOrder::High => Ordering::Greater,
        }
    }
}

/// The two sentinel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    Missing,
    Infinite(Sign),
}

impl Sentinel {
    /// Positive infinity.
    pub const POSITIVE_INFINITY: Sentinel = Sentinel::Infinite(Sign::Positive);

    /// Negative infinity.
    pub const NEGATIVE_INFINITY: Sentinel = Sentinel::Infinite(Sign::Negative);

    /// Classify a raw token. Returns `None` for an ordinary token.
    pub fn classify(token: &str) -> Option<Sentinel> {
        if is_missing_token(token) {
            return Some(Sentinel::Missing);
        }
        infinite_sign(token).map(Sentinel::Infinite)
    }

    /// Build an infinity from its textual form.
    ///
    /// A missing-value token is rejected with a missing-value error, any
    /// other non-infinite token with an infinity error.
    pub fn parse_infinite(token: &str) -> Result<Sentinel> {
        if is_missing_token(token) {
            return Err(TableError::missing_value(format!(
                "'{}' is not infinite, it is NA",
                token
            )));
        }
        infinite_sign(token)
            .map(Sentinel::Infinite)
            .ok_or_else(|| TableError::Infinity(format!("'{}' is not infinite", token)))
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Sentinel::Missing)
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Sentinel::Infinite(_))
    }

    /// Floating-point stand-in so arithmetic paths never branch on absence.
    pub fn as_f64(self) -> f64 {
        match self {
            Sentinel::Missing => i32::MIN as f64,
            Sentinel::Infinite(Sign::Positive) => f64::INFINITY,
            Sentinel::Infinite(Sign::Negative) => f64::NEG_INFINITY,
        }
    }

    /// Integer stand-in.
    pub fn as_i64(self) -> i64 {
        match self {
            Sentinel::Missing => i32::MIN as i64,
            Sentinel::Infinite(Sign::Positive) => i64::MAX,
            Sentinel::Infinite(Sign::Negative) => i64::MIN,
        }
    }

    /// Total order between two sentinels.
    pub fn compare(self, other: Sentinel, order: MissingOrder) -> Ordering {
        match (self, other) {
            (Sentinel::Missing, Sentinel::Missing) => Ordering::Equal,
            (Sentinel::Missing, Sentinel::Infinite(_)) => order.missing_vs_other(),
            (Sentinel::Infinite(_), Sentinel::Missing) => order.missing_vs_other().reverse(),
            (Sentinel::Infinite(a), Sentinel::Infinite(b)) => a.signum().cmp(&b.signum()),
        }
    }

    /// Order of this sentinel against any ordinary (non-sentinel) value.
    pub fn compare_to_ordinary(self, order: MissingOrder) -> Ordering {
        match self {
            Sentinel::Missing => order.missing_vs_other(),
            Sentinel::Infinite(sign) => sign.ordering(),
        }
    }

    /// Literal token used when the sentinel is emitted as text.
    pub fn token(self) -> &'static str {
        match self {
            Sentinel::Missing => "NA",
            Sentinel::Infinite(Sign::Positive) => "Infinity",
            Sentinel::Infinite(Sign::Negative) => "-Infinity",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// True for `"NA"`, `""` and `"<NA>"`.
pub fn is_missing_token(token: &str) -> bool {
    MISSING_TOKENS.contains(&token)
}

fn infinite_sign(token: &str) -> Option<Sign> {
    let trimmed = token.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (Sign::Negative, rest),
        None => (Sign::Positive, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    INFINITE_TOKENS
        .iter()
        .any(|t| body.eq_ignore_ascii_case(t))
        .then_some(sign)
}
