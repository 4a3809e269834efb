//! Text format for covering problems.
//!
//! One record per line; `#` starts a comment and blank lines are ignored.
//!
//! ```text
//! v NAME        # vertex
//! e A B W       # compatibility edge of weight W
//! s ID NAME     # NAME belongs to exclusivity group ID
//! ```

use crate::covering::{Algorithm, CliqueCovering, CoveringConfig};
use crate::error::CoverError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors encountered while reading a problem file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
    /// The record does not start with `v`, `e` or `s`.
    #[error("line {line}: unknown record `{directive}` (expected v, e or s)")]
    UnknownDirective {
        /// 1-based line number.
        line: usize,
        /// The offending keyword.
        directive: String,
    },
    /// A record is missing a field.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A numeric field does not parse.
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },
    /// A record has more fields than expected.
    #[error("line {line}: unexpected trailing field")]
    TrailingField {
        /// 1-based line number.
        line: usize,
    },
    /// The record was rejected by the graph builder.
    #[error("line {line}: {source}")]
    Cover {
        /// 1-based line number.
        line: usize,
        /// Underlying construction error.
        #[source]
        source: CoverError,
    },
}

/// Builds a solver from problem text. Vertex elements are their names.
///
/// # Errors
/// Returns the first malformed or rejected record.
pub fn parse_problem(
    text: &str,
    algorithm: Algorithm,
    config: CoveringConfig,
) -> Result<CliqueCovering<String>, ParseError> {
    let mut cc = CliqueCovering::with_config(algorithm, 0, config);

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("");
        let mut fields = content.split_whitespace();
        let Some(directive) = fields.next() else {
            continue;
        };
        let mut next = |field: &'static str| {
            fields
                .next()
                .ok_or(ParseError::MissingField { line, field })
        };
        let cover = |source: CoverError| ParseError::Cover { line, source };

        match directive {
            "v" => {
                let name = next("vertex name")?;
                cc.add_vertex(name.to_string(), name).map_err(cover)?;
            }
            "e" => {
                let a = next("edge source")?.to_string();
                let b = next("edge destination")?.to_string();
                let w = parse_number(line, next("edge weight")?)?;
                cc.add_edge(&a, &b, w).map_err(cover)?;
            }
            "s" => {
                let id = parse_number(line, next("subpartition id")?)?;
                let name = next("vertex name")?.to_string();
                cc.add_subpartition(id, &name).map_err(cover)?;
            }
            other => {
                return Err(ParseError::UnknownDirective {
                    line,
                    directive: other.to_string(),
                });
            }
        }
        if fields.next().is_some() {
            return Err(ParseError::TrailingField { line });
        }
    }
    Ok(cc)
}

/// Reads a problem from `path`. See [`parse_problem`].
///
/// # Errors
/// Returns [`ParseError::Io`] if the file cannot be read, or any parse error.
pub fn load_problem(
    path: impl AsRef<Path>,
    algorithm: Algorithm,
    config: CoveringConfig,
) -> Result<CliqueCovering<String>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::Io(e.to_string()))?;
    let reader = BufReader::new(file);
    let mut text = String::new();
    for line in reader.lines() {
        let line = line.map_err(|e| ParseError::Io(e.to_string()))?;
        text.push_str(&line);
        text.push('\n');
    }
    parse_problem(&text, algorithm, config)
}

fn parse_number<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
