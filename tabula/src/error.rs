//! Error-handling module for the crate

use thiserror::Error;

/// Error-collection for all the possible errors occurring in this crate
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum Error {
    /// Shape or label-count disagreement between related table parts
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being matched up
        what: &'static str,
        /// The count required by the other side
        expected: usize,
        /// The count actually provided
        found: usize,
    },
    /// An external grouping vector does not cover every row
    #[error("grouping vector has {found} entries but the table has {expected} rows")]
    RowCountMismatch {
        /// Number of rows in the grouped table
        expected: usize,
        /// Length of the supplied grouping vector
        found: usize,
    },
    /// A column label could not be resolved
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),
    /// A column label matched more than one column
    #[error("column name \"{0}\" is ambiguous")]
    AmbiguousColumnName(String),
    /// A row label could not be resolved
    #[error("unknown row \"{0}\"")]
    UnknownRow(String),
    /// A mathematical operation was attempted on a categorical column
    #[error("cannot apply \"{operation}\" to factor column \"{column}\"")]
    FactorOperation {
        /// The rejected operation
        operation: String,
        /// Name of the offending column
        column: String,
    },
    /// Input could not be parsed, even after the forced token-wise retry
    #[error("malformed input \"{resource}\": line {line} does not match the table layout")]
    MalformedFile {
        /// The resource that was being read
        resource: String,
        /// 1-based number of the offending line
        line: usize,
    },
    /// Input contains no data lines
    #[error("input \"{resource}\" contains no data")]
    EmptyInput {
        /// The resource that was being read
        resource: String,
    },
    /// No resource provider was able to open the input
    #[error("resource at \"{resource}\" was not provided by any resource provider")]
    ResourceNotProvided {
        /// Resource which was not provided
        resource: String,
    },
    /// Errors on reading a resource
    #[error("failed to read \"{resource}\": {error}")]
    IoReading {
        /// Contains the wrapped error
        error: std::io::Error,
        /// Resource which caused the error
        resource: String,
    },
    /// Errors on writing a file
    #[error("failed to write \"{resource}\": {error}")]
    IoWriting {
        /// Contains the wrapped error
        error: std::io::Error,
        /// Resource which caused the error
        resource: String,
    },
    /// CSV serialization error
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
