//! Ordered per-position kinds for a table or a row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Kind};
use crate::error::{Result, TableError};

/// One kind per column (table schema) or per cell (row schema).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema(Vec<Kind>);

impl Schema {
    pub fn new(kinds: Vec<Kind>) -> Self {
        Self(kinds)
    }

    /// Schema of a sequence of cells.
    pub fn of_cells(cells: &[Cell]) -> Self {
        Self(cells.iter().map(Cell::kind).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kinds(&self) -> &[Kind] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Kind> {
        self.0.get(index).copied()
    }

    pub fn push(&mut self, kind: Kind) {
        self.0.push(kind);
    }

    pub fn insert(&mut self, index: usize, kind: Kind) {
        self.0.insert(index, kind);
    }

    pub fn remove(&mut self, index: usize) -> Kind {
        self.0.remove(index)
    }

    pub(crate) fn set(&mut self, index: usize, kind: Kind) {
        self.0[index] = kind;
    }

    /// Pure check of the safe-merge rule: equal lengths and, per position,
    /// equal kinds or a sentinel kind on either side.
    pub fn is_compatible(&self, other: &Schema) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(&a, &b)| kinds_compatible(a, b))
    }

    /// Merge `other` into this schema or reject it.
    ///
    /// Sentinel positions here are upgraded to the concrete kind `other`
    /// supplies. On rejection `self` is left untouched.
    pub fn reconcile(&mut self, other: &Schema) -> Result<()> {
        if self.len() != other.len() {
            return Err(TableError::dimension_mismatch(self.len(), other.len()));
        }
        if let Some(position) = self
            .0
            .iter()
            .zip(&other.0)
            .position(|(&a, &b)| !kinds_compatible(a, b))
        {
            return Err(TableError::schema_mismatch(format!(
                "position {} holds {} but {} was supplied",
                position, self.0[position], other.0[position]
            )));
        }
        for (mine, &theirs) in self.0.iter_mut().zip(&other.0) {
            if mine.is_sentinel() && !theirs.is_sentinel() {
                *mine = theirs;
            }
        }
        Ok(())
    }

    /// Merge a single kind at `index`.
    pub fn reconcile_at(&mut self, index: usize, kind: Kind) -> Result<()> {
        let current = self
            .get(index)
            .ok_or_else(|| TableError::out_of_bounds(index, self.len()))?;
        if !kinds_compatible(current, kind) {
            return Err(TableError::schema_mismatch(format!(
                "position {} holds {} but {} was supplied",
                index, current, kind
            )));
        }
        if current.is_sentinel() && !kind.is_sentinel() {
            self.0[index] = kind;
        }
        Ok(())
    }

    /// Every concrete position is numeric, and there is at least one.
    ///
    /// An all-sentinel schema is undetermined and counts as non-numeric.
    pub fn is_numeric(&self) -> bool {
        let mut concrete = self.0.iter().filter(|k| !k.is_sentinel()).peekable();
        concrete.peek().is_some() && concrete.all(|k| k.is_numeric())
    }

    /// All non-sentinel positions share one kind. A schema with no concrete
    /// position is singular, whichever sentinel kinds it holds.
    pub fn is_singular(&self) -> bool {
        let mut concrete = self.0.iter().filter(|k| !k.is_sentinel());
        match concrete.next() {
            Some(first) => concrete.all(|k| k == first),
            None => true,
        }
    }

    /// The shared content kind of a singular schema. `None` when mixed or
    /// when only sentinels are present.
    pub fn content_kind(&self) -> Option<Kind> {
        if !self.is_singular() {
            return None;
        }
        self.0.iter().copied().find(|k| !k.is_sentinel())
    }

    pub fn contains_sentinels(&self) -> bool {
        self.0.iter().any(|k| k.is_sentinel())
    }
}

fn kinds_compatible(a: Kind, b: Kind) -> bool {
    a == b || a.is_sentinel() || b.is_sentinel()
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<Kind>> for Schema {
    fn from(kinds: Vec<Kind>) -> Self {
        Self(kinds)
    }
}

impl FromIterator<Kind> for Schema {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_upgrades_sentinels() {
        let mut table = Schema::new(vec![Kind::Missing, Kind::Integer]);
        let row = Schema::new(vec![Kind::Double, Kind::Integer]);
        table.reconcile(&row).unwrap();
        assert_eq!(table.kinds(), &[Kind::Double, Kind::Integer]);
    }

    #[test]
    fn test_reconcile_keeps_concrete_over_incoming_sentinel() {
        let mut table = Schema::new(vec![Kind::Integer, Kind::Text]);
        table
            .reconcile(&Schema::new(vec![Kind::Infinite, Kind::Missing]))
            .unwrap();
        assert_eq!(table.kinds(), &[Kind::Integer, Kind::Text]);
    }

    #[test]
    fn test_reconcile_rejects_without_mutation() {
        let mut table = Schema::new(vec![Kind::Missing, Kind::Integer]);
        let row = Schema::new(vec![Kind::Double, Kind::Text]);
        assert!(!table.is_compatible(&row));
        assert!(matches!(
            table.reconcile(&row),
            Err(TableError::SchemaMismatch(_))
        ));
        assert_eq!(table.kinds(), &[Kind::Missing, Kind::Integer]);
    }

    #[test]
    fn test_reconcile_length_mismatch() {
        let mut table = Schema::new(vec![Kind::Integer]);
        assert_eq!(
            table.reconcile(&Schema::new(vec![Kind::Integer, Kind::Integer])),
            Err(TableError::dimension_mismatch(1, 2))
        );
    }

    #[test]
    fn test_numeric_and_singular() {
        let all_sentinel = Schema::new(vec![Kind::Missing, Kind::Infinite]);
        assert!(!all_sentinel.is_numeric());
        assert!(all_sentinel.is_singular());
        assert!(Schema::new(vec![Kind::Missing]).is_singular());
        assert_eq!(all_sentinel.content_kind(), None);

        let mixed_numeric = Schema::new(vec![Kind::Integer, Kind::Missing, Kind::Double]);
        assert!(mixed_numeric.is_numeric());
        assert!(!mixed_numeric.is_singular());

        let singular = Schema::new(vec![Kind::Text, Kind::Missing, Kind::Text]);
        assert!(singular.is_singular());
        assert_eq!(singular.content_kind(), Some(Kind::Text));
        assert!(singular.contains_sentinels());
    }

    #[test]
    fn test_display() {
        let schema = Schema::new(vec![Kind::Integer, Kind::Text]);
        assert_eq!(schema.to_string(), "[integer, text]");
    }
}
