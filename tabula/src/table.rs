//! The labeled table, the central entity of this crate.
//!
//! A [Table] is a rectangular block of `f64` values with named rows and
//! columns. A column is either numeric or a *factor*: a categorical column
//! whose cells hold 1-based integer codes into an ordered list of string
//! labels (the column's *levels*). Code 0 marks a missing categorical
//! value; it is never exposed directly, [Table::level_label] returns
//! `None` for it.

use std::fmt;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::Error;
use crate::util::format_number;

/// Selects one or more columns of a [Table] by position or by name.
///
/// Built via `From` conversions: a `usize` selects by position, a string
/// selects by exact name, and the literal string `":"` selects every
/// column. Positional input resolves to itself, so resolution is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// A single 0-based column position.
    Index(usize),
    /// Several 0-based column positions.
    Indices(Vec<usize>),
    /// A single column name, matched exactly.
    Name(String),
    /// Several column names, each matched exactly.
    Names(Vec<String>),
    /// Every column, in order.
    All,
}

impl From<usize> for ColumnSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Vec<usize>> for ColumnSelector {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        if name == ":" {
            Self::All
        } else {
            Self::Name(name.to_string())
        }
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Vec<&str>> for ColumnSelector {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for ColumnSelector {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

/// A labeled numeric/categorical matrix.
///
/// All construction paths validate that the row-name, column-name and
/// level bookkeeping agrees with the data shape. Every operation that
/// derives a new table copies the data; tables never share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Row-major cell values; factor cells hold integer-valued level codes.
    data: Vec<Vec<f64>>,
    row_names: Vec<String>,
    col_names: Vec<String>,
    /// One label list per column; an empty list marks a numeric column.
    levels: Vec<Vec<String>>,
    name: Option<String>,
    file_name: Option<PathBuf>,
}

/// Produces the default labels `"1"`, `"2"`, ... used when no names are given.
pub(crate) fn numbered_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| i.to_string()).collect()
}

impl Table {
    /// Creates a table from raw data and optional axis names.
    ///
    /// Missing column names default to `"1".."cols"`, missing row names to
    /// `"1".."rows"`. Fails with [Error::DimensionMismatch] when the data
    /// block is ragged or a provided name list disagrees with the shape.
    pub fn new(
        data: Vec<Vec<f64>>,
        col_names: Option<Vec<String>>,
        row_names: Option<Vec<String>>,
    ) -> Result<Self, Error> {
        let rows = data.len();
        let cols = data.first().map(Vec::len).unwrap_or(0);
        for row in &data {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    what: "data rows",
                    expected: cols,
                    found: row.len(),
                });
            }
        }

        let col_names = col_names.unwrap_or_else(|| numbered_names(cols));
        if col_names.len() != cols {
            return Err(Error::DimensionMismatch {
                what: "column names",
                expected: cols,
                found: col_names.len(),
            });
        }
        let row_names = row_names.unwrap_or_else(|| numbered_names(rows));
        if row_names.len() != rows {
            return Err(Error::DimensionMismatch {
                what: "row names",
                expected: rows,
                found: row_names.len(),
            });
        }

        Ok(Self {
            data,
            row_names,
            col_names,
            levels: vec![Vec::new(); cols],
            name: None,
            file_name: None,
        })
    }

    /// Assembles a table from fully prepared parts. Internal construction
    /// path for the reader and the derived-table operations, which uphold
    /// the shape invariants themselves.
    pub(crate) fn from_parts(
        data: Vec<Vec<f64>>,
        row_names: Vec<String>,
        col_names: Vec<String>,
        levels: Vec<Vec<String>>,
        name: Option<String>,
        file_name: Option<PathBuf>,
    ) -> Self {
        debug_assert_eq!(data.len(), row_names.len());
        debug_assert!(data.iter().all(|row| row.len() == col_names.len()));
        debug_assert_eq!(levels.len(), col_names.len());
        Self {
            data,
            row_names,
            col_names,
            levels,
            name,
            file_name,
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.col_names.len()
    }

    /// The cell values, row by row.
    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    /// The value at `row`, `col`. Panics when out of range.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// The values of one column, top to bottom. Panics when out of range.
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[col]).collect()
    }

    /// The ordered row labels.
    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    /// The ordered column labels.
    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }

    /// The table's provenance name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The file this table was read from, if any.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Returns `self` carrying the given provenance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True iff the column is categorical, i.e. has a non-empty level list.
    pub fn is_factor(&self, col: usize) -> bool {
        self.levels.get(col).is_some_and(|levels| !levels.is_empty())
    }

    /// The level labels of a column; empty for numeric columns.
    pub fn levels(&self, col: usize) -> &[String] {
        &self.levels[col]
    }

    /// The level label behind the cell at `row`, `col`.
    ///
    /// `None` for numeric columns and for missing categorical values
    /// (code 0, non-integral or non-finite codes).
    pub fn level_label(&self, row: usize, col: usize) -> Option<&str> {
        let levels = self.levels.get(col)?;
        if levels.is_empty() {
            return None;
        }
        let value = self.data[row][col];
        if !value.is_finite() || value.trunc() != value {
            return None;
        }
        let code = value as i64;
        if code < 1 || code as usize > levels.len() {
            return None;
        }
        Some(&levels[code as usize - 1])
    }

    /// Replaces the level list of a column.
    ///
    /// Fails with [Error::DimensionMismatch] when an existing finite code
    /// in the column falls outside `1..=levels.len()`.
    pub fn set_levels(&mut self, col: usize, levels: Vec<String>) -> Result<(), Error> {
        self.check_column(col)?;
        for row in &self.data {
            let value = row[col];
            if !value.is_finite() {
                continue;
            }
            let code = value as i64;
            if value.trunc() != value || code < 0 || code as usize > levels.len() {
                return Err(Error::DimensionMismatch {
                    what: "level codes",
                    expected: levels.len(),
                    found: code.max(0) as usize,
                });
            }
        }
        self.levels[col] = levels;
        Ok(())
    }

    fn check_column(&self, col: usize) -> Result<(), Error> {
        if col < self.num_columns() {
            Ok(())
        } else {
            Err(Error::UnknownColumn(col.to_string()))
        }
    }

    /// Resolves a column name to its position.
    ///
    /// Fails with [Error::UnknownColumn] when no column carries the name
    /// and with [Error::AmbiguousColumnName] when more than one does.
    pub fn find_column(&self, name: &str) -> Result<usize, Error> {
        let mut matches = self.col_names.iter().positions(|c| c == name);
        match (matches.next(), matches.next()) {
            (Some(index), None) => Ok(index),
            (Some(_), Some(_)) => Err(Error::AmbiguousColumnName(name.to_string())),
            (None, _) => Err(Error::UnknownColumn(name.to_string())),
        }
    }

    /// Resolves a [ColumnSelector] to 0-based column positions.
    ///
    /// Positional input passes through unchanged apart from a bounds
    /// check, so repeated resolution is idempotent; [ColumnSelector::All]
    /// (the literal `":"`) yields every position in order.
    pub fn column_index(&self, selector: impl Into<ColumnSelector>) -> Result<Vec<usize>, Error> {
        match selector.into() {
            ColumnSelector::Index(index) => {
                self.check_column(index)?;
                Ok(vec![index])
            }
            ColumnSelector::Indices(indices) => {
                for &index in &indices {
                    self.check_column(index)?;
                }
                Ok(indices)
            }
            ColumnSelector::Name(name) => Ok(vec![self.find_column(&name)?]),
            ColumnSelector::Names(names) => names
                .iter()
                .map(|name| self.find_column(name))
                .collect(),
            ColumnSelector::All => Ok((0..self.num_columns()).collect()),
        }
    }

    /// Extracts the selected columns into a new table, preserving row
    /// names, levels and provenance.
    pub fn select_columns(&self, selector: impl Into<ColumnSelector>) -> Result<Table, Error> {
        let indices = self.column_index(selector)?;
        let data = self
            .data
            .iter()
            .map(|row| indices.iter().map(|&c| row[c]).collect())
            .collect();
        Ok(Table::from_parts(
            data,
            self.row_names.clone(),
            indices.iter().map(|&c| self.col_names[c].clone()).collect(),
            indices.iter().map(|&c| self.levels[c].clone()).collect(),
            self.name.clone(),
            self.file_name.clone(),
        ))
    }

    /// Extracts the named rows, in the given order, into a new table.
    ///
    /// Fails with [Error::UnknownRow] for a label no row carries; the
    /// first matching row wins when labels repeat.
    pub fn select_rows(&self, names: &[&str]) -> Result<Table, Error> {
        let indices = names
            .iter()
            .map(|name| {
                self.row_names
                    .iter()
                    .position(|r| r == name)
                    .ok_or_else(|| Error::UnknownRow(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let data = indices.iter().map(|&r| self.data[r].clone()).collect();
        Ok(Table::from_parts(
            data,
            indices.iter().map(|&r| self.row_names[r].clone()).collect(),
            self.col_names.clone(),
            self.levels.clone(),
            self.name.clone(),
            self.file_name.clone(),
        ))
    }

    /// The text a cell displays as: the level label for factor cells,
    /// the formatted number otherwise, `NA` for missing values.
    pub(crate) fn cell_text(&self, row: usize, col: usize) -> String {
        if self.is_factor(col) {
            self.level_label(row, col)
                .map(String::from)
                .unwrap_or_else(|| "NA".to_string())
        } else {
            format_number(self.data[row][col])
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "{name}")?;
        }
        // column widths over header and cells
        let corner_width = self.row_names.iter().map(String::len).max().unwrap_or(0);
        let mut widths: Vec<usize> = self.col_names.iter().map(String::len).collect();
        let cells: Vec<Vec<String>> = (0..self.num_rows())
            .map(|r| (0..self.num_columns()).map(|c| self.cell_text(r, c)).collect())
            .collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        write!(f, "{:corner_width$}", "")?;
        for (&width, name) in widths.iter().zip(&self.col_names) {
            write!(f, " {name:>width$}")?;
        }
        writeln!(f)?;
        for (row_name, row) in self.row_names.iter().zip(&cells) {
            write!(f, "{row_name:corner_width$}")?;
            for (&width, cell) in widths.iter().zip(row) {
                write!(f, " {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use super::{ColumnSelector, Table};
    use crate::error::Error;

    fn sample() -> Table {
        Table::new(
            vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
            Some(vec!["x".to_string(), "y".to_string()]),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
        )
        .unwrap()
    }

    #[test]
    fn create_round_trips() {
        let data = vec![vec![1.5, -2.0], vec![0.0, 4.25]];
        let table = Table::new(
            data.clone(),
            Some(vec!["u".to_string(), "v".to_string()]),
            Some(vec!["r1".to_string(), "r2".to_string()]),
        )
        .unwrap();
        assert_eq!(table.data(), data.as_slice());
        assert_eq!(table.col_names(), ["u", "v"]);
        assert_eq!(table.row_names(), ["r1", "r2"]);
        assert!(!table.is_factor(0));
    }

    #[test]
    fn default_names_are_numbered() {
        let table = Table::new(vec![vec![0.0; 3]; 2], None, None).unwrap();
        assert_eq!(table.col_names(), ["1", "2", "3"]);
        assert_eq!(table.row_names(), ["1", "2"]);
    }

    #[test]
    fn mismatched_names_are_rejected() {
        let result = Table::new(
            vec![vec![1.0, 2.0]],
            Some(vec!["only-one".to_string()]),
            None,
        );
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));

        let ragged = Table::new(vec![vec![1.0, 2.0], vec![3.0]], None, None);
        assert!(matches!(ragged, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn column_index_resolves_names_and_all() {
        let table = sample();
        assert_eq!(table.column_index("y").unwrap(), vec![1]);
        assert_eq!(table.column_index(":").unwrap(), vec![0, 1]);
        assert_eq!(
            table.column_index(vec!["y", "x"]).unwrap(),
            vec![1, 0]
        );
        assert!(matches!(
            table.column_index("z"),
            Err(Error::UnknownColumn(name)) if name == "z"
        ));
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let table = Table::new(
            vec![vec![1.0, 2.0]],
            Some(vec!["x".to_string(), "x".to_string()]),
            None,
        )
        .unwrap();
        assert!(matches!(
            table.column_index("x"),
            Err(Error::AmbiguousColumnName(_))
        ));
    }

    #[quickcheck]
    fn column_index_is_idempotent(index: usize) -> bool {
        let table = sample();
        let index = index % table.num_columns();
        let resolved = table.column_index(index).unwrap();
        table.column_index(resolved.clone()).unwrap() == resolved
    }

    #[test]
    fn level_labels_hide_the_missing_sentinel() {
        let mut table = Table::new(
            vec![vec![1.0], vec![0.0], vec![2.0]],
            Some(vec!["grade".to_string()]),
            None,
        )
        .unwrap();
        table
            .set_levels(0, vec!["bad".to_string(), "good".to_string()])
            .unwrap();
        assert!(table.is_factor(0));
        assert_eq!(table.level_label(0, 0), Some("bad"));
        assert_eq!(table.level_label(1, 0), None);
        assert_eq!(table.level_label(2, 0), Some("good"));
    }

    #[test]
    fn set_levels_rejects_out_of_range_codes() {
        let mut table = Table::new(vec![vec![5.0]], None, None).unwrap();
        let result = table.set_levels(0, vec!["only".to_string()]);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn select_columns_preserves_labels() {
        let table = sample();
        let selected = table.select_columns("y").unwrap();
        assert_eq!(selected.num_columns(), 1);
        assert_eq!(selected.col_names(), ["y"]);
        assert_eq!(selected.row_names(), table.row_names());
        assert_eq!(selected.column_values(0), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn select_rows_by_name() {
        let table = sample();
        let selected = table.select_rows(&["c", "a"]).unwrap();
        assert_eq!(selected.row_names(), ["c", "a"]);
        assert_eq!(selected.column_values(0), vec![3.0, 1.0]);
        assert!(matches!(
            table.select_rows(&["nope"]),
            Err(Error::UnknownRow(_))
        ));
    }

    #[test]
    fn display_shows_factor_labels() {
        let mut table = Table::new(
            vec![vec![12.0, 1.0], vec![13.5, 2.0]],
            Some(vec!["alcohol".to_string(), "color".to_string()]),
            Some(vec!["w1".to_string(), "w2".to_string()]),
        )
        .unwrap();
        table
            .set_levels(1, vec!["red".to_string(), "white".to_string()])
            .unwrap();
        let rendered = table.to_string();
        assert!(rendered.contains("alcohol"));
        assert!(rendered.contains("red"));
        assert!(rendered.contains("13.5"));
    }

    #[test]
    fn selector_conversions() {
        assert_eq!(ColumnSelector::from(":"), ColumnSelector::All);
        assert_eq!(ColumnSelector::from(2usize), ColumnSelector::Index(2));
        assert_eq!(
            ColumnSelector::from("pH"),
            ColumnSelector::Name("pH".to_string())
        );
    }
}
