//! Configuration of a single read call.

/// Where the row names of a parsed table come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowNameSpec {
    /// Detect a row-name column from the header (a first token literally
    /// `"name"` or `"nom"`) or from a header shorter than the data lines.
    #[default]
    Auto,
    /// The table has no row-name column; rows are numbered.
    None,
    /// The 1-based position of the row-name column among the raw fields.
    Column(usize),
    /// The header label of the row-name column.
    ColumnName(String),
    /// Explicit labels, one per data line.
    Labels(Vec<String>),
}

/// Options for one read call; builder-style, consumed by
/// [TableReader](crate::io::reader::TableReader).
///
/// The defaults parse whitespace-delimited text with a header line,
/// `.` as decimal point, automatic row-name detection and quote removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    pub(crate) delimiters: String,
    pub(crate) decimal_point: char,
    pub(crate) header: bool,
    pub(crate) row_names: RowNameSpec,
    pub(crate) skip_lines: usize,
    pub(crate) remove_quotes: bool,
    pub(crate) need_parse: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiters: " \t".to_string(),
            decimal_point: '.',
            header: true,
            row_names: RowNameSpec::Auto,
            skip_lines: 0,
            remove_quotes: true,
            need_parse: false,
        }
    }
}

impl ReadOptions {
    /// Options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the delimiter set with a single character.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiters = delimiter.to_string();
        self
    }

    /// Replaces the delimiter set. A set consisting entirely of blanks
    /// (space, tab) is collapsible: repeated delimiters yield no empty
    /// fields. Any other set separates empty fields between repeats.
    pub fn delimiters(mut self, delimiters: impl Into<String>) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    /// Sets the decimal-point character. Anything other than `'.'` forces
    /// token-wise parsing of every column.
    pub fn decimal_point(mut self, decimal_point: char) -> Self {
        self.decimal_point = decimal_point;
        self
    }

    /// Declares whether the input starts with a header line.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Sets the row-name handling.
    pub fn row_names(mut self, row_names: RowNameSpec) -> Self {
        self.row_names = row_names;
        self
    }

    /// Declares the 1-based raw-field position of the row-name column.
    pub fn row_name_column(self, column: usize) -> Self {
        self.row_names(RowNameSpec::Column(column))
    }

    /// Supplies explicit row labels, one per data line.
    pub fn row_name_labels(self, labels: Vec<String>) -> Self {
        self.row_names(RowNameSpec::Labels(labels))
    }

    /// Declares that the input has no row-name column.
    pub fn no_row_names(self) -> Self {
        self.row_names(RowNameSpec::None)
    }

    /// Number of lines to skip between the header and the first data line.
    pub fn skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Whether wrapping double quotes are stripped from level labels.
    pub fn remove_quotes(mut self, remove_quotes: bool) -> Self {
        self.remove_quotes = remove_quotes;
        self
    }

    /// Forces token-wise parsing of every column, skipping the typed fast
    /// scan.
    pub fn force_parse(mut self, force: bool) -> Self {
        self.need_parse = force;
        self
    }

    /// True when the typed fast scan must be skipped.
    pub(crate) fn needs_token_parse(&self) -> bool {
        self.need_parse || self.decimal_point != '.'
    }

    /// True when repeated delimiters collapse into one separator.
    pub(crate) fn collapse_delimiters(&self) -> bool {
        self.delimiters.chars().all(|c| c == ' ' || c == '\t')
    }
}
