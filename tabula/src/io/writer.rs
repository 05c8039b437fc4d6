//! Writing of tables as delimited text, the inverse of the reader.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Error;
use crate::table::Table;

/// Writes a table as delimited text.
///
/// Factor cells are written as their level labels, missing values as
/// `NA`; a numeric table written with a header and without row names
/// reads back unchanged.
#[derive(Debug, Clone, Copy)]
pub struct TableWriter {
    delimiter: u8,
    header: bool,
    row_names: bool,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            header: true,
            row_names: false,
        }
    }
}

impl TableWriter {
    /// A writer with tab delimiter, header line and no row-name column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Whether a header line of column names is written.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Whether a leading row-name column (headed `name`) is written.
    pub fn row_names(mut self, row_names: bool) -> Self {
        self.row_names = row_names;
        self
    }

    /// Writes the table to the given writer.
    pub fn write<W: Write>(&self, table: &Table, writer: W) -> Result<(), Error> {
        let mut out = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);
        let width = table.num_columns() + usize::from(self.row_names);
        if self.header {
            let mut record = Vec::with_capacity(width);
            if self.row_names {
                record.push("name".to_string());
            }
            record.extend(table.col_names().iter().cloned());
            out.write_record(&record)?;
        }
        for row in 0..table.num_rows() {
            let mut record = Vec::with_capacity(width);
            if self.row_names {
                record.push(table.row_names()[row].clone());
            }
            for col in 0..table.num_columns() {
                record.push(table.cell_text(row, col));
            }
            out.write_record(&record)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the table to a file.
    pub fn write_file(&self, table: &Table, path: impl AsRef<Path>) -> Result<(), Error> {
        let file = File::create(path.as_ref()).map_err(|error| Error::IoWriting {
            error,
            resource: path.as_ref().display().to_string(),
        })?;
        self.write(table, file)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::TableWriter;
    use crate::io::options::ReadOptions;
    use crate::io::reader::parse_table;
    use crate::table::Table;

    fn render(writer: &TableWriter, table: &Table) -> String {
        let mut buffer = Vec::new();
        writer.write(table, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn plain_numeric_output() {
        let table = Table::new(
            vec![vec![1.0, 2.5], vec![3.0, f64::NAN]],
            Some(vec!["x".to_string(), "y".to_string()]),
            None,
        )
        .unwrap();
        let rendered = render(&TableWriter::new(), &table);
        assert_eq!(rendered, "x\ty\n1\t2.5\n3\tNA\n");
    }

    #[test]
    fn factor_cells_are_written_as_labels() {
        let mut table = Table::new(
            vec![vec![1.0], vec![0.0], vec![2.0]],
            Some(vec!["color".to_string()]),
            None,
        )
        .unwrap();
        table
            .set_levels(0, vec!["red".to_string(), "white".to_string()])
            .unwrap();
        let rendered = render(&TableWriter::new().row_names(true), &table);
        assert_eq!(rendered, "name\tcolor\n1\tred\n2\tNA\n3\twhite\n");
    }

    #[test]
    fn written_tables_read_back() {
        let table = Table::new(
            vec![vec![1.0, 2.5], vec![3.25, -4.0]],
            Some(vec!["x".to_string(), "y".to_string()]),
            None,
        )
        .unwrap();
        let rendered = render(&TableWriter::new(), &table);
        let back = parse_table(&rendered, &ReadOptions::default(), "roundtrip.txt").unwrap();
        assert_eq!(back.col_names(), table.col_names());
        assert_eq!(back.data(), table.data());
    }
}
