//! Operations deriving new tables from existing ones: elementwise math,
//! group-and-reduce aggregation, and cross-tabulation.

pub mod aggregate;
pub mod crosstab;
pub mod elementwise;
pub mod grouping;
