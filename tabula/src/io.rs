//! Reading and writing of delimited text files.
//!
//! The resource-provider layer isolates all file handling; parsing itself
//! is pure and operates on fully loaded text.

pub mod options;
pub mod reader;
pub mod resource_providers;
pub mod writer;

pub use options::{ReadOptions, RowNameSpec};
pub use reader::{read, read_with, TableReader};
pub use writer::TableWriter;
