//! Group-and-reduce: fold row groups into one output row per group.

use crate::error::Error;
use crate::ops::grouping::{resolve, Grouping};
use crate::table::Table;

/// Arithmetic mean, the default reduction; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sum of the values.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Smallest value; `NaN` for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

/// Largest value; `NaN` for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

impl Table {
    /// Groups rows by the given key and reduces every retained column per
    /// group with `reduce`, producing one row per distinct group value in
    /// sorted group order.
    ///
    /// When grouping by a column of this table, that column is excluded
    /// from the output and the result rows are labeled
    /// `"<column>=<value>"`; an external key labels rows with the
    /// stringified value alone. Explicit `row_names` override both.
    pub fn aggregate<'a, F>(
        &self,
        grouping: impl Into<Grouping<'a>>,
        reduce: F,
        row_names: Option<Vec<String>>,
    ) -> Result<Table, Error>
    where
        F: Fn(&[f64]) -> f64,
    {
        let groups = resolve(self, grouping.into())?;
        let retained: Vec<usize> = (0..self.num_columns())
            .filter(|&col| Some(col) != groups.source_column)
            .collect();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); groups.labels.len()];
        for (row, assigned) in groups.assignment.iter().enumerate() {
            if let Some(group) = assigned {
                members[*group].push(row);
            }
        }

        let data: Vec<Vec<f64>> = members
            .iter()
            .map(|rows| {
                retained
                    .iter()
                    .map(|&col| {
                        let values: Vec<f64> =
                            rows.iter().map(|&row| self.value(row, col)).collect();
                        reduce(&values)
                    })
                    .collect()
            })
            .collect();

        let out_row_names = match row_names {
            Some(names) => {
                if names.len() != groups.labels.len() {
                    return Err(Error::DimensionMismatch {
                        what: "aggregate row names",
                        expected: groups.labels.len(),
                        found: names.len(),
                    });
                }
                names
            }
            None => match &groups.column_name {
                Some(column) => groups
                    .labels
                    .iter()
                    .map(|label| format!("{column}={label}"))
                    .collect(),
                None => groups.labels.clone(),
            },
        };

        let col_names = retained
            .iter()
            .map(|&col| self.col_names()[col].clone())
            .collect();
        Ok(Table::from_parts(
            data,
            out_row_names,
            col_names,
            vec![Vec::new(); retained.len()],
            self.name().map(String::from),
            None,
        ))
    }

    /// [Table::aggregate] with the default reduction, the arithmetic mean.
    pub fn aggregate_mean<'a>(
        &self,
        grouping: impl Into<Grouping<'a>>,
    ) -> Result<Table, Error> {
        self.aggregate(grouping, mean, None)
    }
}
