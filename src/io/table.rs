//! Delimited table reader/writer for batch classification
//!
//! Reads a header-first delimited file, locates the required measurement
//! columns, and writes the augmented table with a trailing classification
//! column. Fields may be double-quoted to embed the delimiter; quotes are
//! escaped by doubling, as produced by common spreadsheet exports.

use anyhow::{bail, Context};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

/// Header columns every input table must carry, in measurement order
pub const REQUIRED_COLUMNS: [&str; 4] = ["width", "height", "length", "mass"];

/// Name of the appended result column
pub const CLASSIFICATION_COLUMN: &str = "classification";

/// Split one line into fields, honoring double quotes
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote inside a quoted field
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}

/// Quote a field for output when it would otherwise break the row format
fn quote_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One data row: the split fields plus the raw line for diagnostics
#[derive(Debug, Clone)]
pub struct TableRow {
    /// 1-based line number in the input file (header is line 1)
    pub line_no: u64,
    pub fields: Vec<String>,
    pub raw: String,
}

/// Streaming reader over a delimited table with a header row
#[derive(Debug)]
pub struct TableReader {
    lines: Lines<BufReader<File>>,
    delimiter: char,
    header: Vec<String>,
    measure_indices: [usize; 4],
    line_no: u64,
}

impl TableReader {
    /// Open a table and validate its header.
    ///
    /// The header must contain the four required measurement columns
    /// (exact names); a missing column is the importer's own validation
    /// failure and aborts before any row is read. Extra columns are kept
    /// and passed through untouched.
    pub fn open<P: AsRef<Path>>(path: P, delimiter: char) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open input table {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let header_line = match lines.next() {
            Some(line) => line.with_context(|| format!("Failed to read {}", path.display()))?,
            None => bail!("Input table {} is empty", path.display()),
        };
        let header = split_fields(header_line.trim_end_matches('\r'), delimiter);

        let index: FxHashMap<&str, usize> =
            header.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| !index.contains_key(name))
            .collect();
        if !missing.is_empty() {
            bail!("Input table {} is missing columns: {}", path.display(), missing.join(", "));
        }

        let measure_indices = REQUIRED_COLUMNS.map(|name| index[name]);

        Ok(Self { lines, delimiter, header, measure_indices, line_no: 1 })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Column indices of width, height, length, mass in the header
    pub fn measure_indices(&self) -> [usize; 4] {
        self.measure_indices
    }

    /// Read the next data row; blank lines are skipped
    pub fn next_row(&mut self) -> Option<std::io::Result<TableRow>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.line_no += 1;

            let raw = line.trim_end_matches('\r').to_string();
            if raw.is_empty() {
                continue;
            }

            let fields = split_fields(&raw, self.delimiter);
            return Some(Ok(TableRow { line_no: self.line_no, fields, raw }));
        }
    }
}

/// Buffered writer producing the augmented table
pub struct TableWriter {
    writer: BufWriter<File>,
    delimiter: char,
}

impl TableWriter {
    pub fn create<P: AsRef<Path>>(path: P, delimiter: char) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output table {}", path.display()))?;
        Ok(Self { writer: BufWriter::new(file), delimiter })
    }

    /// Write the input header with the classification column appended
    pub fn write_header(&mut self, header: &[String]) -> std::io::Result<()> {
        self.write_line(header, CLASSIFICATION_COLUMN)
    }

    /// Write one row with its classification label appended
    pub fn write_row(&mut self, fields: &[String], classification: &str) -> std::io::Result<()> {
        self.write_line(fields, classification)
    }

    fn write_line(&mut self, fields: &[String], last: &str) -> std::io::Result<()> {
        let mut line = String::new();
        for field in fields {
            line.push_str(&quote_field(field, self.delimiter));
            line.push(self.delimiter);
        }
        line.push_str(last);
        writeln!(self.writer, "{}", line)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
