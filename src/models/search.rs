//! Search request models.

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};

/// Input layout for date range bounds.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Inclusive announcement date range for a search.
///
/// `start <= end` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a range from optional `YYYY-MM-DD` strings, defaulting each
    /// missing bound to `today`.
    pub fn parse(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let start = match start {
            Some(s) => parse_date("start date", s)?,
            None => today,
        };
        let end = match end {
            Some(s) => parse_date("end date", s)?,
            None => today,
        };
        Ok(Self { start, end })
    }

    /// Whether the start lies after the end.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT).map_err(|e| {
        AppError::validation(format!(
            "unable to parse {label} '{value}' (expected YYYY-MM-DD): {e}"
        ))
    })
}

/// Form body submitted to the registry search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    params: Vec<(&'static str, String)>,
}

impl SearchForm {
    /// Build the full parameter set for an unrestricted search over `range`.
    pub fn new(range: &DateRange) -> Self {
        let mut params: Vec<(&'static str, String)> = vec![
            ("suchart", "uneingeschr".into()),
            ("button", "Suche+starten".into()),
            ("vt", range.start.day().to_string()),
            ("vm", range.start.month().to_string()),
            ("vj", range.start.year().to_string()),
            ("bt", range.end.day().to_string()),
            ("bm", range.end.month().to_string()),
            ("bj", range.end.year().to_string()),
        ];

        // Unused filters must be present and empty.
        for key in ["land", "gericht", "gericht_name", "seite", "l", "r"] {
            params.push((key, String::new()));
        }
        params.push(("all", "false".into()));
        params.push(("rubrik", String::new()));
        params.push(("az", String::new()));
        params.push(("gegenstand", "0".into()));
        params.push(("order", "4".into()));

        // Keys are submitted in sorted order.
        params.sort_by_key(|(key, _)| *key);

        Self { params }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}
