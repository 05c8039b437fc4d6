//! Reading of delimited text files into [Table]s.
//!
//! Reading happens in two strictly separated stages. The I/O stage
//! resolves the resource through the configured providers and consumes it
//! into memory; the handle is opened and closed exactly once on every
//! path. The parsing stage is pure: it infers per-column types from the
//! first data line, fast-scans the file with the inferred layout, and on
//! any inconsistency retries once in all-token mode before giving up.

use std::path::Path;

use crate::error::Error;
use crate::io::options::{ReadOptions, RowNameSpec};
use crate::io::resource_providers::ResourceProviders;
use crate::table::{numbered_names, Table};

/// A reader turning delimited text resources into [Table]s.
///
/// By default the reader resolves plain file paths and falls back to the
/// bundled sample directory for bare names (with `.txt` appended when
/// needed).
#[derive(Debug)]
pub struct TableReader {
    resource_providers: ResourceProviders,
    options: ReadOptions,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader {
    /// A reader with default options and providers.
    pub fn new() -> Self {
        Self::with_options(ReadOptions::default())
    }

    /// A reader with the given options and default providers.
    pub fn with_options(options: ReadOptions) -> Self {
        Self {
            resource_providers: ResourceProviders::default(),
            options,
        }
    }

    /// Replaces the resource providers.
    pub fn resource_providers(mut self, providers: ResourceProviders) -> Self {
        self.resource_providers = providers;
        self
    }

    /// Reads the resource into a table.
    pub fn read(&self, resource: &str) -> Result<Table, Error> {
        let mut reader = self.resource_providers.open_resource(resource)?;
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|error| Error::IoReading {
                error,
                resource: resource.to_string(),
            })?;
        // the handle is released here; parsing never touches the resource
        drop(reader);
        parse_table(&content, &self.options, resource)
    }
}

/// Reads a delimited text file with default options.
pub fn read(resource: &str) -> Result<Table, Error> {
    TableReader::new().read(resource)
}

/// Reads a delimited text file with the given options.
pub fn read_with(resource: &str, options: ReadOptions) -> Result<Table, Error> {
    TableReader::with_options(options).read(resource)
}

/// One raw column as produced by a scan: already numeric, or still tokens
/// awaiting finalization.
enum RawColumn {
    Numbers(Vec<f64>),
    Tokens(Vec<String>),
}

/// Parses loaded text into a table. Pure with respect to I/O.
pub(crate) fn parse_table(
    content: &str,
    options: &ReadOptions,
    resource: &str,
) -> Result<Table, Error> {
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let empty = || Error::EmptyInput {
        resource: resource.to_string(),
    };

    let mut cursor = 0;
    let header_fields: Option<Vec<String>> = if options.header {
        let line = lines.get(cursor).ok_or_else(empty)?;
        cursor += 1;
        Some(
            split_line(line, options)
                .into_iter()
                .map(String::from)
                .collect(),
        )
    } else {
        None
    };
    cursor += options.skip_lines;

    let first_line = lines.get(cursor).ok_or_else(empty)?;
    let first_fields = split_line(first_line, options);
    let n = first_fields.len();

    let row_col = resolve_row_name_column(options, header_fields.as_deref(), n)?;
    let nc = n - usize::from(row_col.is_some());
    if nc == 0 {
        return Err(empty());
    }

    let mut col_names: Vec<String> = header_fields.clone().unwrap_or_default();
    if let Some(rc) = row_col {
        if col_names.len() == n {
            col_names.remove(rc);
        }
    }
    while col_names.len() < nc {
        col_names.push((col_names.len() + 1).to_string());
    }
    col_names.truncate(nc);

    // type inference from the first data line; the row-name column is
    // always treated as text
    let numeric: Vec<bool> = first_fields
        .iter()
        .enumerate()
        .map(|(col, token)| Some(col) != row_col && parses_numeric(token))
        .collect();

    let data_lines = &lines[cursor..];
    let nr = data_lines.len();
    let first_line_number = cursor + 1;

    let scanned = if options.needs_token_parse() {
        scan_tokens(data_lines, n, options, first_line_number, resource)?
    } else {
        match scan_typed(data_lines, &numeric, options, first_line_number) {
            Ok(columns) => columns,
            Err(line) => {
                log::warn!(
                    "input \"{resource}\": line {line} does not match the inferred layout, retrying with full token parsing"
                );
                scan_tokens(data_lines, n, options, first_line_number, resource)?
            }
        }
    };

    let row_names: Vec<String> = match row_col {
        Some(rc) => match &scanned[rc] {
            RawColumn::Tokens(tokens) => tokens.clone(),
            RawColumn::Numbers(_) => unreachable!("the row-name column is never scanned as numeric"),
        },
        None => match &options.row_names {
            RowNameSpec::Labels(labels) => {
                if labels.len() != nr {
                    return Err(Error::DimensionMismatch {
                        what: "row names",
                        expected: nr,
                        found: labels.len(),
                    });
                }
                labels.clone()
            }
            _ => numbered_names(nr),
        },
    };

    // finalize the remaining columns and assemble row-major storage
    let mut data = vec![vec![0.0; nc]; nr];
    let mut levels: Vec<Vec<String>> = Vec::with_capacity(nc);
    let mut out = 0;
    for (col, raw) in scanned.into_iter().enumerate() {
        if Some(col) == row_col {
            continue;
        }
        let (values, level_list) = match raw {
            RawColumn::Numbers(values) => (values, Vec::new()),
            RawColumn::Tokens(tokens) => finalize_tokens(&tokens, options),
        };
        for (row, value) in values.into_iter().enumerate() {
            data[row][out] = value;
        }
        levels.push(level_list);
        out += 1;
    }

    let factor_count = levels.iter().filter(|l| !l.is_empty()).count();
    log::info!("loaded \"{resource}\": {nr} rows, {nc} columns ({factor_count} factor columns)");

    let name = Path::new(resource)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    Ok(Table::from_parts(
        data,
        row_names,
        col_names,
        levels,
        name,
        Some(resource.into()),
    ))
}

/// Determines the raw-field position of the row-name column, if any.
fn resolve_row_name_column(
    options: &ReadOptions,
    header: Option<&[String]>,
    n: usize,
) -> Result<Option<usize>, Error> {
    match &options.row_names {
        RowNameSpec::None | RowNameSpec::Labels(_) => Ok(None),
        RowNameSpec::Column(position) => {
            if *position >= 1 && *position <= n {
                Ok(Some(position - 1))
            } else {
                Err(Error::UnknownColumn(position.to_string()))
            }
        }
        RowNameSpec::ColumnName(name) => {
            let header = header.ok_or_else(|| Error::UnknownColumn(name.clone()))?;
            let matches: Vec<usize> = header
                .iter()
                .enumerate()
                .filter(|(_, token)| *token == name)
                .map(|(index, _)| index)
                .collect();
            match matches.as_slice() {
                [] => Err(Error::UnknownColumn(name.clone())),
                [index] => {
                    // a short header labels the data columns only; the
                    // unlabeled leading field holds the row names
                    if header.len() < n {
                        Ok(Some(index + 1))
                    } else {
                        Ok(Some(*index))
                    }
                }
                _ => Err(Error::AmbiguousColumnName(name.clone())),
            }
        }
        RowNameSpec::Auto => match header {
            Some(header) => {
                let first = header.first().map(|token| token.to_ascii_lowercase());
                if first.as_deref() == Some("name") || first.as_deref() == Some("nom") {
                    Ok(Some(0))
                } else if header.len() < n {
                    Ok(Some(0))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        },
    }
}

/// Splits one line on the configured delimiter set.
fn split_line<'a>(line: &'a str, options: &ReadOptions) -> Vec<&'a str> {
    let is_delimiter = |c: char| options.delimiters.contains(c);
    if options.collapse_delimiters() {
        line.split(is_delimiter)
            .filter(|field| !field.is_empty())
            .collect()
    } else {
        line.split(is_delimiter).collect()
    }
}

/// True when the token reads fully as a finite number.
fn parses_numeric(token: &str) -> bool {
    token
        .trim()
        .parse::<f64>()
        .map(|value| value.is_finite())
        .unwrap_or(false)
}

/// Fast scan with the inferred per-column layout. Fails with the 1-based
/// number of the first line deviating from the layout.
fn scan_typed(
    data_lines: &[&str],
    numeric: &[bool],
    options: &ReadOptions,
    first_line_number: usize,
) -> Result<Vec<RawColumn>, usize> {
    let n = numeric.len();
    let mut columns: Vec<RawColumn> = numeric
        .iter()
        .map(|&is_numeric| {
            if is_numeric {
                RawColumn::Numbers(Vec::with_capacity(data_lines.len()))
            } else {
                RawColumn::Tokens(Vec::with_capacity(data_lines.len()))
            }
        })
        .collect();
    for (offset, line) in data_lines.iter().enumerate() {
        let fields = split_line(line, options);
        if fields.len() != n {
            return Err(first_line_number + offset);
        }
        for (field, column) in fields.iter().zip(&mut columns) {
            match column {
                RawColumn::Numbers(values) => match field.trim().parse::<f64>() {
                    Ok(value) => values.push(value),
                    Err(_) => return Err(first_line_number + offset),
                },
                RawColumn::Tokens(tokens) => tokens.push((*field).to_string()),
            }
        }
    }
    Ok(columns)
}

/// Uniform all-token scan, the forced-reparse slow path. Fails with
/// [Error::MalformedFile] when a line deviates from the field count.
fn scan_tokens(
    data_lines: &[&str],
    n: usize,
    options: &ReadOptions,
    first_line_number: usize,
    resource: &str,
) -> Result<Vec<RawColumn>, Error> {
    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(data_lines.len()); n];
    for (offset, line) in data_lines.iter().enumerate() {
        let fields = split_line(line, options);
        if fields.len() != n {
            return Err(Error::MalformedFile {
                resource: resource.to_string(),
                line: first_line_number + offset,
            });
        }
        for (field, column) in fields.iter().zip(&mut columns) {
            column.push((*field).to_string());
        }
    }
    Ok(columns.into_iter().map(RawColumn::Tokens).collect())
}

/// Turns a token column into its final numeric or categorical form.
///
/// The configured decimal-point character is normalized to `.` before the
/// numeric attempt; case-insensitive `na`/`nan` tokens count as missing
/// and do not block a numeric outcome. A column that is not fully numeric
/// becomes a factor: levels are the sorted distinct raw values, cells the
/// 1-based level codes. A literal level `"NA"` (after optional quote
/// stripping) is removed from the level list, its rows are coded 0 and
/// higher codes shift down by one.
fn finalize_tokens(tokens: &[String], options: &ReadOptions) -> (Vec<f64>, Vec<String>) {
    let mut values = Vec::with_capacity(tokens.len());
    let mut all_numeric = true;
    for token in tokens {
        let normalized = if options.decimal_point != '.' {
            token.replace(options.decimal_point, ".")
        } else {
            token.clone()
        };
        let trimmed = normalized.trim();
        if trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan") {
            values.push(f64::NAN);
        } else if let Ok(value) = trimmed.parse::<f64>() {
            values.push(value);
        } else {
            all_numeric = false;
            break;
        }
    }
    if all_numeric {
        return (values, Vec::new());
    }

    // categorical: sorted distinct raw values, 1-based codes
    let mut level_list: Vec<String> = tokens.to_vec();
    level_list.sort();
    level_list.dedup();
    let mut codes: Vec<f64> = tokens
        .iter()
        .map(|token| {
            (level_list
                .binary_search(token)
                .expect("every token is one of the distinct values")
                + 1) as f64
        })
        .collect();

    if options.remove_quotes {
        for label in &mut level_list {
            *label = strip_quotes(label).to_string();
        }
    }

    if let Some(position) = level_list.iter().position(|label| label == "NA") {
        level_list.remove(position);
        let removed_code = (position + 1) as f64;
        for code in &mut codes {
            if *code == removed_code {
                *code = 0.0;
            } else if *code > removed_code {
                *code -= 1.0;
            }
        }
    }
    (codes, level_list)
}

/// Strips one pair of wrapping double quotes, if present.
fn strip_quotes(label: &str) -> &str {
    label
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(label)
}
