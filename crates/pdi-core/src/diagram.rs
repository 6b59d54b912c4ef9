//! Persistence diagram input.
//!
//! A diagram file holds one `creation destruction` pair per line, separated
//! by whitespace. Blank lines and lines starting with `#` are skipped.
//! Pairs with an infinite coordinate (essential classes) are dropped and
//! counted.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One (creation, destruction) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistencePair {
    pub creation: f64,
    pub destruction: f64,
}

impl PersistencePair {
    pub fn new(creation: f64, destruction: f64) -> Self {
        PersistencePair {
            creation,
            destruction,
        }
    }
}

/// The finite pairs of a persistence diagram, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    pairs: Vec<PersistencePair>,
    /// Pairs skipped because a coordinate was infinite.
    pub dropped_infinite: usize,
}

impl Diagram {
    pub fn from_pairs(pairs: Vec<PersistencePair>) -> Self {
        Diagram {
            pairs,
            dropped_infinite: 0,
        }
    }

    pub fn pairs(&self) -> &[PersistencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn creation_values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.creation).collect()
    }

    pub fn destruction_values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.destruction).collect()
    }
}

/// Parse diagram text.
pub fn parse_diagram(text: &str) -> Result<Diagram, DiagramError> {
    let mut diagram = Diagram::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(DiagramError::Parse {
                line,
                message: format!("expected 2 columns, found {}", fields.len()),
            });
        }
        let creation = parse_value(fields[0], line)?;
        let destruction = parse_value(fields[1], line)?;

        if creation.is_infinite() || destruction.is_infinite() {
            diagram.dropped_infinite += 1;
            continue;
        }
        diagram.pairs.push(PersistencePair::new(creation, destruction));
    }

    Ok(diagram)
}

fn parse_value(field: &str, line: usize) -> Result<f64, DiagramError> {
    let value: f64 = field.parse().map_err(|_| DiagramError::Parse {
        line,
        message: format!("not a number: {field:?}"),
    })?;
    if value.is_nan() {
        return Err(DiagramError::Parse {
            line,
            message: "NaN coordinate".to_string(),
        });
    }
    Ok(value)
}

/// Read and parse a diagram file.
pub fn load_diagram(path: &Path) -> Result<Diagram, DiagramError> {
    let text = std::fs::read_to_string(path).map_err(|e| DiagramError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let diagram = parse_diagram(&text)?;
    tracing::debug!(
        path = %path.display(),
        pairs = diagram.len(),
        dropped_infinite = diagram.dropped_infinite,
        "diagram parsed"
    );
    Ok(diagram)
}
