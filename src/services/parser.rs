// src/services/parser.rs

//! Assembles a `Registration` from the text rows of one announcement.

use crate::error::{AppError, Result};
use crate::models::Registration;
use crate::services::extractors::{
    extract_address, extract_city, extract_name, extract_postal_code, extract_reg_no,
    extract_registration_date,
};

/// Row carrying the file number and announcement date.
pub const HEADER_LINE: usize = 0;

/// Row carrying name, city, address and postal code.
pub const BODY_LINE: usize = 5;

/// Parse the ordered announcement rows of one detail page.
///
/// Never fails: a field whose extractor fails (or whose source row is
/// missing) keeps its zero value and the failure is logged.
pub fn parse_registration(lines: &[String]) -> Registration {
    let header = Row::at(lines, HEADER_LINE);
    let body = Row::at(lines, BODY_LINE);

    Registration {
        reg_no: header.field(extract_reg_no).unwrap_or_default(),
        date: header.field(extract_registration_date),
        name: body.field(extract_name).unwrap_or_default(),
        address: body.field(extract_address).unwrap_or_default(),
        city: body.field(extract_city).unwrap_or_default(),
        postal_code: body.field(extract_postal_code).unwrap_or_default(),
    }
}

/// One positional row, which may be missing on malformed pages.
struct Row<'a> {
    index: usize,
    available: usize,
    text: Option<&'a str>,
}

impl<'a> Row<'a> {
    fn at(lines: &'a [String], index: usize) -> Self {
        Self {
            index,
            available: lines.len(),
            text: lines.get(index).map(String::as_str),
        }
    }

    fn field<T>(&self, extract: impl Fn(&str) -> Result<T>) -> Option<T> {
        let result = match self.text {
            Some(text) => extract(text),
            None => Err(AppError::extraction(
                "announcement row",
                format!("row {} missing, page has {} row(s)", self.index, self.available),
            )),
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }
}
