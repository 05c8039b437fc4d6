//! Tabula is an in-memory library for labeled numeric/categorical tables.
//! It covers the everyday life cycle of such data: ingesting delimited
//! text files with heuristic per-column type inference, encoding
//! categorical columns as factors over ordered level labels, elementwise
//! mathematics, group-and-reduce aggregation, and cross-tabulation.
//!
//! The entry points are [read]/[read_with] (or a configured
//! [TableReader]) for files and [Table::new] for raw data; every further
//! operation lives on [Table] and derives new, independently owned
//! tables.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod error;
pub mod io;
pub mod ops;
pub mod table;

pub(crate) mod util;

pub use error::Error;
pub use io::options::{ReadOptions, RowNameSpec};
pub use io::reader::{read, read_with, TableReader};
pub use io::writer::TableWriter;
pub use ops::aggregate::{max, mean, min, sum};
pub use ops::elementwise::Operand;
pub use ops::grouping::Grouping;
pub use table::{ColumnSelector, Table};
