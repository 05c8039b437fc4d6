//! Elementwise mathematics on tables.
//!
//! Unary and binary operations apply cell by cell, preserve row names and
//! counts, and record what happened in the derived table's column names
//! and provenance name. They are defined on numeric tables only:
//! categorical codes have no arithmetic meaning, so any factor column
//! rejects the whole call.

use crate::error::Error;
use crate::table::Table;
use crate::util::format_number;

/// The right-hand side of a binary table operation, resolved once at call
/// entry.
///
/// Only the operand's *label* differs between variants once validation has
/// passed; the labels feed result naming, never numeric behavior.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Another table; must match the left side's shape.
    Table(&'a Table),
    /// A scalar applied to every cell.
    Value(f64),
    /// A raw matrix without names; must match the left side's shape.
    Unnamed(Vec<Vec<f64>>),
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl<'a> From<&'a Table> for Operand<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

impl From<Vec<Vec<f64>>> for Operand<'_> {
    fn from(matrix: Vec<Vec<f64>>) -> Self {
        Self::Unnamed(matrix)
    }
}

impl Operand<'_> {
    /// The label this operand contributes to the result's column `col`.
    fn column_label(&self, col: usize) -> String {
        match self {
            Self::Table(table) => table.col_names()[col].clone(),
            Self::Value(value) => format_number(*value),
            Self::Unnamed(_) => "...".to_string(),
        }
    }

    /// The label this operand contributes to the result's table name.
    fn display_name(&self) -> String {
        match self {
            Self::Table(table) => display_name(table),
            Self::Value(value) => format_number(*value),
            Self::Unnamed(_) => "...".to_string(),
        }
    }

    fn cell(&self, row: usize, col: usize) -> f64 {
        match self {
            Self::Table(table) => table.value(row, col),
            Self::Value(value) => *value,
            Self::Unnamed(matrix) => matrix[row][col],
        }
    }
}

fn display_name(table: &Table) -> String {
    table.name().unwrap_or("table").to_string()
}

fn ensure_no_factor(table: &Table, operation: &str) -> Result<(), Error> {
    for col in 0..table.num_columns() {
        if table.is_factor(col) {
            return Err(Error::FactorOperation {
                operation: operation.to_string(),
                column: table.col_names()[col].clone(),
            });
        }
    }
    Ok(())
}

impl Table {
    fn unary(&self, tag: &str, op: impl Fn(f64) -> f64) -> Result<Table, Error> {
        ensure_no_factor(self, tag)?;
        let data = self
            .data()
            .iter()
            .map(|row| row.iter().map(|&v| op(v)).collect())
            .collect();
        let col_names = self
            .col_names()
            .iter()
            .map(|name| format!("{tag}{name}"))
            .collect();
        Ok(Table::from_parts(
            data,
            self.row_names().to_vec(),
            col_names,
            vec![Vec::new(); self.num_columns()],
            Some(format!("{tag} of {}", display_name(self))),
            None,
        ))
    }

    /// Elementwise negation.
    pub fn neg(&self) -> Result<Table, Error> {
        self.unary("-", |v| -v)
    }

    /// Elementwise absolute value.
    pub fn abs(&self) -> Result<Table, Error> {
        self.unary("abs", f64::abs)
    }

    /// Elementwise exponential.
    pub fn exp(&self) -> Result<Table, Error> {
        self.unary("exp", f64::exp)
    }

    /// Elementwise natural logarithm.
    pub fn ln(&self) -> Result<Table, Error> {
        self.unary("log", f64::ln)
    }

    /// Elementwise square root.
    pub fn sqrt(&self) -> Result<Table, Error> {
        self.unary("sqrt", f64::sqrt)
    }

    /// Elementwise `degree`-th root.
    pub fn nth_root(&self, degree: f64) -> Result<Table, Error> {
        self.unary("root", move |v| v.powf(1.0 / degree))
    }

    fn binary(
        &self,
        symbol: &str,
        rhs: Operand<'_>,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Table, Error> {
        ensure_no_factor(self, symbol)?;
        match &rhs {
            Operand::Table(other) => {
                ensure_no_factor(other, symbol)?;
                self.check_same_shape(other.num_rows(), other.num_columns())?;
            }
            Operand::Unnamed(matrix) => {
                let cols = matrix.first().map(Vec::len).unwrap_or(0);
                if matrix.iter().any(|row| row.len() != cols) {
                    return Err(Error::DimensionMismatch {
                        what: "operand rows",
                        expected: cols,
                        found: matrix.iter().map(Vec::len).find(|&l| l != cols).unwrap_or(0),
                    });
                }
                self.check_same_shape(matrix.len(), cols)?;
            }
            Operand::Value(_) => {}
        }

        let data = (0..self.num_rows())
            .map(|r| {
                (0..self.num_columns())
                    .map(|c| op(self.value(r, c), rhs.cell(r, c)))
                    .collect()
            })
            .collect();
        let col_names = (0..self.num_columns())
            .map(|c| format!("{}{symbol}{}", self.col_names()[c], rhs.column_label(c)))
            .collect();
        let name = format!(
            "{} {symbol} {}",
            display_name(self),
            rhs.display_name()
        );
        Ok(Table::from_parts(
            data,
            self.row_names().to_vec(),
            col_names,
            vec![Vec::new(); self.num_columns()],
            Some(name),
            None,
        ))
    }

    fn check_same_shape(&self, rows: usize, cols: usize) -> Result<(), Error> {
        if rows != self.num_rows() {
            return Err(Error::DimensionMismatch {
                what: "operand rows",
                expected: self.num_rows(),
                found: rows,
            });
        }
        if cols != self.num_columns() {
            return Err(Error::DimensionMismatch {
                what: "operand columns",
                expected: self.num_columns(),
                found: cols,
            });
        }
        Ok(())
    }

    /// Elementwise addition with a table, scalar or raw matrix.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Table, Error> {
        self.binary("+", rhs.into(), |a, b| a + b)
    }

    /// Elementwise subtraction.
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Table, Error> {
        self.binary("-", rhs.into(), |a, b| a - b)
    }

    /// Elementwise multiplication.
    pub fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Table, Error> {
        self.binary("*", rhs.into(), |a, b| a * b)
    }

    /// Elementwise division.
    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Table, Error> {
        self.binary("/", rhs.into(), |a, b| a / b)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::error::Error;
    use crate::table::Table;

    fn plain() -> Table {
        Table::new(
            vec![vec![1.0, 4.0], vec![9.0, 16.0]],
            Some(vec!["x".to_string(), "y".to_string()]),
            Some(vec!["r1".to_string(), "r2".to_string()]),
        )
        .unwrap()
        .with_name("plain")
    }

    #[test]
    fn unary_preserves_shape_and_tags_names() {
        let result = plain().sqrt().unwrap();
        assert_eq!(result.num_rows(), 2);
        assert_eq!(result.num_columns(), 2);
        assert_eq!(result.row_names(), ["r1", "r2"]);
        assert_eq!(result.col_names(), ["sqrtx", "sqrty"]);
        assert_eq!(result.name(), Some("sqrt of plain"));
        assert_eq!(result.data()[1], vec![3.0, 4.0]);
    }

    #[test]
    fn unary_rejects_factors() {
        let mut table = plain();
        table
            .set_levels(0, vec!["a".to_string(); 16])
            .unwrap();
        let result = table.exp();
        assert!(matches!(
            result,
            Err(Error::FactorOperation { column, .. }) if column == "x"
        ));
    }

    #[test]
    fn scalar_operand_feeds_naming_only() {
        let result = plain().mul(2.0).unwrap();
        assert_eq!(result.col_names(), ["x*2", "y*2"]);
        assert_eq!(result.name(), Some("plain * 2"));
        assert_eq!(result.data()[0], vec![2.0, 8.0]);
    }

    #[test]
    fn table_operand_must_match_shape() {
        let left = plain();
        let right = Table::new(vec![vec![1.0, 1.0]], None, None).unwrap();
        assert!(matches!(
            left.add(&right),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn table_operand_combines_column_names() {
        let left = plain();
        let right = Table::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            Some(vec!["u".to_string(), "v".to_string()]),
            None,
        )
        .unwrap();
        let result = left.sub(&right).unwrap();
        assert_eq!(result.col_names(), ["x-u", "y-v"]);
        assert_eq!(result.name(), Some("plain - table"));
        assert_eq!(result.data()[1], vec![6.0, 12.0]);
    }

    #[test]
    fn unnamed_operand_shows_ellipsis() {
        let result = plain()
            .add(vec![vec![1.0, 1.0], vec![1.0, 1.0]])
            .unwrap();
        assert_eq!(result.col_names(), ["x+...", "y+..."]);
        assert_eq!(result.data()[0], vec![2.0, 5.0]);
    }
}
