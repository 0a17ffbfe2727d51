//! Row-keeping conditions for subsetting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cell::{compare_cells, Cell};
use crate::error::{Result, TableError};
use crate::sentinel::{MissingOrder, Sentinel};

/// Comparison applied between a cell and the condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    LessThan,
    GreaterThan,
}

impl Operator {
    fn target(self) -> Ordering {
        match self {
            Operator::Equals => Ordering::Equal,
            Operator::LessThan => Ordering::Less,
            Operator::GreaterThan => Ordering::Greater,
        }
    }
}

/// Keep/drop predicate over the cells of one column.
///
/// - A missing cell is kept unless the condition is negated or drops
///   sentinels.
/// - With `drop_sentinels`, every sentinel cell is dropped.
/// - Anything else is kept when its comparison with `value` matches the
///   operator, inverted by `negate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    operator: Operator,
    value: Cell,
    negate: bool,
    drop_sentinels: bool,
}

impl Condition {
    /// Only `Equals` may reference a sentinel value.
    pub fn new(operator: Operator, value: impl Into<Cell>) -> Result<Self> {
        let value = value.into();
        if let Some(sentinel) = value.sentinel() {
            if operator != Operator::Equals {
                return Err(TableError::InvalidCondition(format!(
                    "{:?} against {} is not defined, only equality may reference a sentinel",
                    operator, sentinel
                )));
            }
        }
        Ok(Self {
            operator,
            value,
            negate: false,
            drop_sentinels: false,
        })
    }

    pub fn equals(value: impl Into<Cell>) -> Result<Self> {
        Self::new(Operator::Equals, value)
    }

    pub fn less_than(value: impl Into<Cell>) -> Result<Self> {
        Self::new(Operator::LessThan, value)
    }

    pub fn greater_than(value: impl Into<Cell>) -> Result<Self> {
        Self::new(Operator::GreaterThan, value)
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn dropping_sentinels(mut self) -> Self {
        self.drop_sentinels = true;
        self
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &Cell {
        &self.value
    }

    /// Whether `cell` survives the subset.
    pub fn keeps(&self, cell: &Cell) -> bool {
        match cell.sentinel() {
            Some(_) if self.drop_sentinels => false,
            Some(Sentinel::Missing) => !self.negate,
            _ => {
                let hit = compare_cells(cell, &self.value, MissingOrder::Low)
                    == self.operator.target();
                hit != self.negate
            }
        }
    }

    /// Keep-vector over a slice of cells.
    pub fn evaluate(&self, cells: &[Cell]) -> Vec<bool> {
        cells.iter().map(|c| self.keeps(c)).collect()
    }
}
