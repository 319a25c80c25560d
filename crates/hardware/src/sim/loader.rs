//! Access-trace loading for the CLI driver.
//!
//! A trace is a plain text file with one access per line: `R <addr>` or
//! `W <addr>`, where the address is hexadecimal with an optional `0x`
//! prefix. Blank lines and lines starting with `#` are skipped.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::mem::request::AccessKind;

/// One access parsed from a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceAccess {
    pub kind: AccessKind,
    pub addr: u64,
}

/// Errors produced while loading a trace file.
#[derive(Debug)]
pub enum TraceError {
    /// The trace file could not be read.
    Io { path: String, source: io::Error },
    /// A line does not match `R <addr>` / `W <addr>`.
    Malformed {
        path: String,
        line: usize,
        content: String,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io { path, source } => {
                write!(f, "cannot read trace file {path}: {source}")
            }
            TraceError::Malformed {
                path,
                line,
                content,
            } => write!(f, "{path}:{line}: malformed trace line {content:?}"),
        }
    }
}

impl Error for TraceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TraceError::Io { source, .. } => Some(source),
            TraceError::Malformed { .. } => None,
        }
    }
}

/// Parses a trace file into its accesses, in file order.
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceAccess>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut accesses = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = || TraceError::Malformed {
            path: path.display().to_string(),
            line: index + 1,
            content: raw.to_string(),
        };

        let mut parts = line.split_whitespace();
        let kind = match parts.next() {
            Some("R") | Some("r") => AccessKind::Read,
            Some("W") | Some("w") => AccessKind::Write,
            _ => return Err(malformed()),
        };
        let addr_text = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }
        let digits = addr_text
            .strip_prefix("0x")
            .or_else(|| addr_text.strip_prefix("0X"))
            .unwrap_or(addr_text);
        let addr = u64::from_str_radix(digits, 16).map_err(|_| malformed())?;
        accesses.push(TraceAccess { kind, addr });
    }
    Ok(accesses)
}
