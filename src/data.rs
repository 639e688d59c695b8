//! Reading training rows from delimited text.
//!
//! Each non-blank line is one observation; fields are separated by a single delimiter character
//! and parsed into the value type of the network.

use crate::util::{BayesError, Result};

use log::debug;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;


/// Options for reading delimited text
#[derive(Clone, Copy, Debug)]
pub struct Format {

    /// The character separating fields
    pub delimiter: char,

    /// `true` if the first line holds column names rather than data
    pub header: bool

}

impl Default for Format {
    fn default() -> Self {
        Format { delimiter: ',', header: false }
    }
}


/// Read rows of values from `reader`.
///
/// Fields are trimmed before parsing. Blank lines are skipped. Every row must have as many
/// fields as the first.
///
/// # Errors
/// * `BayesError::Io` if reading fails
/// * `BayesError::Parse` if a field cannot be parsed as a `V`
/// * `BayesError::RowLength` if the rows are ragged
pub fn read_rows<V: FromStr, R: Read>(reader: R, format: Format) -> Result<Vec<Vec<V>>> {
    let mut rows: Vec<Vec<V>> = Vec::new();

    for (n, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if (format.header && n == 0) || line.trim().is_empty() {
            continue;
        }

        let row = line.split(format.delimiter)
                      .map(|field| {
                          let field = field.trim();
                          field.parse().map_err(|_| BayesError::Parse { line: n + 1, field: String::from(field) })
                      })
                      .collect::<Result<Vec<V>>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(BayesError::RowLength { expected: first.len(), got: row.len() });
            }
        }

        rows.push(row);
    }

    debug!("read {} rows", rows.len());
    Ok(rows)
}


/// Read rows of values from the file at `path`. See `read_rows`.
pub fn load_rows<V: FromStr, P: AsRef<Path>>(path: P, format: Format) -> Result<Vec<Vec<V>>> {
    let file = File::open(path.as_ref())?;
    debug!("loading training data from {}", path.as_ref().display());
    read_rows(file, format)
}
