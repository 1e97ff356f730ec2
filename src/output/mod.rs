// src/output/mod.rs

//! Record export formats.
//!
//! - CSV: `;`-separated with a fixed header row
//! - JSONL: one JSON object per line

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Registration;

/// Header row for CSV output.
pub const CSV_HEADER: &str = "RegNo;Date;Name;Address;City;PostalCode";

const CSV_SEPARATOR: &str = ";";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(AppError::validation(format!(
                "output format '{other}' not supported (use csv or jsonl)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Render one registration as a CSV row (without line terminator).
pub fn csv_row(reg: &Registration) -> String {
    let date = reg.display_date();
    [
        reg.reg_no.as_str(),
        date.as_str(),
        reg.name.as_str(),
        reg.address.as_str(),
        reg.city.as_str(),
        reg.postal_code.as_str(),
    ]
    .join(CSV_SEPARATOR)
}

/// Write all registrations to `w` in the given format.
pub fn write_registrations<W: Write>(
    mut w: W,
    format: OutputFormat,
    registrations: &[Registration],
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            writeln!(w, "{CSV_HEADER}")?;
            for reg in registrations {
                writeln!(w, "{}", csv_row(reg))?;
            }
        }
        OutputFormat::Jsonl => {
            for reg in registrations {
                serde_json::to_writer(&mut w, reg)?;
                writeln!(w)?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Render all registrations into an in-memory buffer.
pub fn render(format: OutputFormat, registrations: &[Registration]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_registrations(&mut buf, format, registrations)?;
    Ok(buf)
}
