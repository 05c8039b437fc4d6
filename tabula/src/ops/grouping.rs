//! Group-key resolution shared by aggregation and cross-tabulation.
//!
//! A [Grouping] names where the per-row key comes from; resolution turns
//! it into a per-row group index plus the ordered group labels. Distinct
//! keys are sorted (numerically for numeric keys, lexicographically for
//! labels) and rows with a missing key (factor code 0, `NaN`) belong to
//! no group.

use itertools::Itertools;

use crate::error::Error;
use crate::table::{ColumnSelector, Table};
use crate::util::format_number;

/// How the rows of a table are partitioned into groups.
#[derive(Debug, Clone)]
pub enum Grouping<'a> {
    /// An external numeric key per row.
    Values(Vec<f64>),
    /// An external string key per row.
    Labels(Vec<String>),
    /// A single-column table supplying the key per row; its factor levels
    /// become the group labels.
    Table(&'a Table),
    /// A column of the grouped table itself; the column is excluded from
    /// the reduced output.
    Column(ColumnSelector),
}

impl From<Vec<f64>> for Grouping<'_> {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values)
    }
}

impl From<Vec<String>> for Grouping<'_> {
    fn from(labels: Vec<String>) -> Self {
        Self::Labels(labels)
    }
}

impl From<Vec<&str>> for Grouping<'_> {
    fn from(labels: Vec<&str>) -> Self {
        Self::Labels(labels.into_iter().map(String::from).collect())
    }
}

impl<'a> From<&'a Table> for Grouping<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

impl From<&str> for Grouping<'_> {
    fn from(column: &str) -> Self {
        Self::Column(ColumnSelector::from(column))
    }
}

impl From<usize> for Grouping<'_> {
    fn from(column: usize) -> Self {
        Self::Column(ColumnSelector::Index(column))
    }
}

/// The outcome of resolving a [Grouping] against a table.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedGroups {
    /// Group index per source row; `None` for rows with a missing key.
    pub(crate) assignment: Vec<Option<usize>>,
    /// Ordered group labels.
    pub(crate) labels: Vec<String>,
    /// Source column to exclude from the output, when grouping by column.
    pub(crate) source_column: Option<usize>,
    /// Name of the grouping column, for labeling the reduced rows.
    pub(crate) column_name: Option<String>,
}

pub(crate) fn resolve(table: &Table, grouping: Grouping<'_>) -> Result<ResolvedGroups, Error> {
    match grouping {
        Grouping::Values(values) => {
            check_row_count(table.num_rows(), values.len())?;
            let (assignment, labels) = numeric_groups(&values);
            Ok(ResolvedGroups {
                assignment,
                labels,
                source_column: None,
                column_name: None,
            })
        }
        Grouping::Labels(keys) => {
            check_row_count(table.num_rows(), keys.len())?;
            let (assignment, labels) = label_groups(&keys);
            Ok(ResolvedGroups {
                assignment,
                labels,
                source_column: None,
                column_name: None,
            })
        }
        Grouping::Table(other) => {
            if other.num_columns() != 1 {
                return Err(Error::DimensionMismatch {
                    what: "grouping table columns",
                    expected: 1,
                    found: other.num_columns(),
                });
            }
            check_row_count(table.num_rows(), other.num_rows())?;
            let (assignment, labels) = column_groups(other, 0);
            Ok(ResolvedGroups {
                assignment,
                labels,
                source_column: None,
                column_name: None,
            })
        }
        Grouping::Column(selector) => {
            let indices = table.column_index(selector)?;
            if indices.len() != 1 {
                return Err(Error::DimensionMismatch {
                    what: "grouping column selection",
                    expected: 1,
                    found: indices.len(),
                });
            }
            let index = indices[0];
            let (assignment, labels) = column_groups(table, index);
            Ok(ResolvedGroups {
                assignment,
                labels,
                source_column: Some(index),
                column_name: Some(table.col_names()[index].clone()),
            })
        }
    }
}

fn check_row_count(expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::RowCountMismatch { expected, found })
    }
}

/// Group keys taken from one column of a table: factor levels become the
/// labels directly, numeric values go through distinct-and-sort.
fn column_groups(table: &Table, col: usize) -> (Vec<Option<usize>>, Vec<String>) {
    if table.is_factor(col) {
        let levels = table.levels(col);
        let assignment = (0..table.num_rows())
            .map(|row| {
                let value = table.value(row, col);
                if !value.is_finite() || value.trunc() != value {
                    return None;
                }
                let code = value as i64;
                if code >= 1 && code as usize <= levels.len() {
                    Some(code as usize - 1)
                } else {
                    None
                }
            })
            .collect();
        (assignment, levels.to_vec())
    } else {
        numeric_groups(&table.column_values(col))
    }
}

fn numeric_groups(values: &[f64]) -> (Vec<Option<usize>>, Vec<String>) {
    // collapse -0.0 into 0.0 so the sign bit cannot split a group
    let keys: Vec<f64> = values
        .iter()
        .map(|&v| if v == 0.0 { 0.0 } else { v })
        .collect();
    let mut distinct: Vec<f64> = keys.iter().copied().filter(|v| !v.is_nan()).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    let assignment = keys
        .iter()
        .map(|v| {
            if v.is_nan() {
                None
            } else {
                distinct.binary_search_by(|probe| probe.total_cmp(v)).ok()
            }
        })
        .collect();
    let labels = distinct.iter().map(|&v| format_number(v)).collect();
    (assignment, labels)
}

fn label_groups(keys: &[String]) -> (Vec<Option<usize>>, Vec<String>) {
    let labels: Vec<String> = keys.iter().sorted().dedup().cloned().collect();
    let assignment = keys
        .iter()
        .map(|key| labels.binary_search(key).ok())
        .collect();
    (assignment, labels)
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::{resolve, Grouping};
    use crate::error::Error;
    use crate::table::Table;

    fn four_rows() -> Table {
        Table::new(vec![vec![0.0]; 4], None, None).unwrap()
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let table = four_rows();
        let groups = resolve(&table, Grouping::Values(vec![10.0, 2.0, 10.0, -1.0])).unwrap();
        assert_eq!(groups.labels, ["-1", "2", "10"]);
        assert_eq!(
            groups.assignment,
            [Some(2), Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn label_keys_sort_lexicographically() {
        let table = four_rows();
        let groups = resolve(&table, Grouping::from(vec!["b", "a", "b", "c"])).unwrap();
        assert_eq!(groups.labels, ["a", "b", "c"]);
        assert_eq!(
            groups.assignment,
            [Some(1), Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn missing_keys_join_no_group() {
        let table = four_rows();
        let groups =
            resolve(&table, Grouping::Values(vec![1.0, f64::NAN, 2.0, 1.0])).unwrap();
        assert_eq!(groups.labels, ["1", "2"]);
        assert_eq!(groups.assignment[1], None);
    }

    #[test]
    fn factor_levels_become_labels() {
        let mut keys = Table::new(
            vec![vec![2.0], vec![0.0], vec![1.0], vec![2.0]],
            Some(vec!["variety".to_string()]),
            None,
        )
        .unwrap();
        keys.set_levels(0, vec!["merlot".to_string(), "syrah".to_string()])
            .unwrap();
        let table = four_rows();
        let groups = resolve(&table, Grouping::Table(&keys)).unwrap();
        assert_eq!(groups.labels, ["merlot", "syrah"]);
        assert_eq!(
            groups.assignment,
            [Some(1), None, Some(0), Some(1)]
        );
    }

    #[test]
    fn length_disagreement_is_fatal() {
        let table = four_rows();
        let result = resolve(&table, Grouping::Values(vec![1.0, 2.0]));
        assert!(matches!(
            result,
            Err(Error::RowCountMismatch {
                expected: 4,
                found: 2
            })
        ));
    }
}
