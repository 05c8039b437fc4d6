//! Cross-tabulation: counting co-occurring group memberships of two
//! single-column tables.

use crate::error::Error;
use crate::ops::grouping::{resolve, Grouping};
use crate::table::Table;

impl Table {
    /// Builds the contingency table between `self` and `other`.
    ///
    /// Both operands must be single-column tables with equal row counts.
    /// Each operand's rows are mapped to groups the same way aggregation
    /// maps them (factor levels when present, sorted distinct values
    /// otherwise); cell `(i, j)` counts the rows falling into group `i`
    /// of `self` and group `j` of `other`. Rows with a missing key on
    /// either side are not counted. Result rows are labeled with `self`'s
    /// group labels, result columns with `other`'s.
    pub fn cross_tabulate(&self, other: &Table) -> Result<Table, Error> {
        for operand in [self, other] {
            if operand.num_columns() != 1 {
                return Err(Error::DimensionMismatch {
                    what: "cross-tabulation operand columns",
                    expected: 1,
                    found: operand.num_columns(),
                });
            }
        }
        if other.num_rows() != self.num_rows() {
            return Err(Error::DimensionMismatch {
                what: "cross-tabulation rows",
                expected: self.num_rows(),
                found: other.num_rows(),
            });
        }

        let left = resolve(self, Grouping::Table(self))?;
        let right = resolve(other, Grouping::Table(other))?;

        let mut counts = vec![vec![0.0; right.labels.len()]; left.labels.len()];
        for (i, j) in left.assignment.iter().zip(&right.assignment) {
            if let (Some(i), Some(j)) = (i, j) {
                counts[*i][*j] += 1.0;
            }
        }

        let name = match (self.name(), other.name()) {
            (Some(a), Some(b)) => Some(format!("{a} x {b}")),
            _ => None,
        };
        Ok(Table::from_parts(
            counts,
            left.labels,
            right.labels.clone(),
            vec![Vec::new(); right.labels.len()],
            name,
            None,
        ))
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use crate::error::Error;
    use crate::table::Table;

    fn single(values: &[f64]) -> Table {
        Table::new(values.iter().map(|&v| vec![v]).collect(), None, None).unwrap()
    }

    #[test]
    fn documented_example() {
        let left = single(&[1.0, 1.0, 2.0, 3.0, 1.0]);
        let right = single(&[1.0, 2.0, 5.0, 3.0, 1.0]);
        let result = left.cross_tabulate(&right).unwrap();
        assert_eq!(result.num_rows(), 3);
        assert_eq!(result.num_columns(), 4);
        assert_eq!(result.row_names(), ["1", "2", "3"]);
        assert_eq!(result.col_names(), ["1", "2", "3", "5"]);
        // rows where both operands hold 1: the first and the last
        assert_eq!(result.value(0, 0), 2.0);
        assert_eq!(result.value(0, 1), 1.0);
        assert_eq!(result.value(1, 2), 0.0);
        assert_eq!(result.value(1, 3), 1.0);
        assert_eq!(result.value(2, 2), 1.0);
    }

    #[test]
    fn factor_levels_label_the_axes() {
        let mut left = single(&[1.0, 2.0, 1.0]);
        left.set_levels(0, vec!["no".to_string(), "yes".to_string()])
            .unwrap();
        let right = single(&[7.0, 7.0, 9.0]);
        let result = left.cross_tabulate(&right).unwrap();
        assert_eq!(result.row_names(), ["no", "yes"]);
        assert_eq!(result.col_names(), ["7", "9"]);
        assert_eq!(result.value(0, 0), 1.0);
        assert_eq!(result.value(0, 1), 1.0);
        assert_eq!(result.value(1, 0), 1.0);
    }

    #[test]
    fn shape_checks() {
        let wide = Table::new(vec![vec![1.0, 2.0]], None, None).unwrap();
        let narrow = single(&[1.0]);
        assert!(matches!(
            wide.cross_tabulate(&narrow),
            Err(Error::DimensionMismatch { .. })
        ));
        let short = single(&[1.0, 2.0]);
        let long = single(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            short.cross_tabulate(&long),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[quickcheck]
    fn counts_cover_every_row(keys: Vec<(u8, u8)>) -> bool {
        if keys.is_empty() {
            return true;
        }
        let left = single(&keys.iter().map(|&(a, _)| a as f64).collect::<Vec<_>>());
        let right = single(&keys.iter().map(|&(_, b)| b as f64).collect::<Vec<_>>());
        let result = left.cross_tabulate(&right).unwrap();
        let total: f64 = result.data().iter().flatten().sum();
        total == keys.len() as f64
    }
}
