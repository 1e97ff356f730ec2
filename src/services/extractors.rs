// src/services/extractors.rs

//! Field extractors for announcement text.
//!
//! Announcements have no machine-readable schema. Each extractor pulls one
//! field out of a single line, either by pattern or by comma position, and
//! reports a missing field as an `AppError::Extraction` instead of panicking.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::{AppError, Result};

/// Address sections longer than this are reported as anomalies.
pub const MAX_ADDRESS_LEN: usize = 35;

/// Layout of the announcement timestamp, e.g. `01.02.2024 14:30`.
const ANNOUNCED_AT_FORMAT: &str = "%d.%m.%Y %H:%M";

static REG_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^:\n]*:[ \t]([^\n]*)\n").expect("reg no pattern is valid"));

static ANNOUNCED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Bekannt gemacht am|announced on):(.*?)(?:Uhr|o'clock)")
        .expect("announcement date pattern is valid")
});

static ANNOUNCED_PAYLOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}$").expect("date payload pattern is valid")
});

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})\b").expect("postal code pattern is valid"));

static LAST_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s).*(\d{5})").expect("digit run pattern is valid"));

/// Extract the court file number from the announcement header line.
///
/// Takes everything between the first colon-space and the next line break.
pub fn extract_reg_no(text: &str) -> Result<String> {
    REG_NO_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| AppError::extraction("registration number", format!("{text:?}")))
}

/// Extract the announcement date-time from the header line.
pub fn extract_registration_date(text: &str) -> Result<DateTime<Utc>> {
    let payload = ANNOUNCED_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| AppError::extraction("registration date", "announcement marker not found"))?;

    if !ANNOUNCED_PAYLOAD_RE.is_match(payload) {
        return Err(AppError::extraction(
            "registration date",
            format!("{payload:?} does not match DD.MM.YYYY HH:MM"),
        ));
    }

    NaiveDateTime::parse_from_str(payload, ANNOUNCED_AT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::extraction("registration date", format!("{payload:?}: {e}")))
}

/// Extract the company name: the value after `": "` in the first section.
pub fn extract_name(text: &str) -> Result<String> {
    let first = text.split(',').next().unwrap_or_default();
    first
        .split(": ")
        .nth(1)
        .map(|name| name.trim().to_string())
        .ok_or_else(|| AppError::extraction("company name", format!("{text:?}")))
}

/// Extract the street address: the third comma-separated section.
pub fn extract_address(text: &str) -> Result<String> {
    let address = section(text, 2, "company address")?;
    if address.chars().count() > MAX_ADDRESS_LEN {
        log::warn!("Unusually long address section ({address:?}) in {text:?}");
    }
    Ok(address)
}

/// Extract the city: the second comma-separated section.
pub fn extract_city(text: &str) -> Result<String> {
    section(text, 1, "city")
}

/// Extract a five-digit postal code from the line.
///
/// The line opens with the file number, which may itself have five digits,
/// so the last standalone group wins. Without one, the last five digits of
/// any longer run are used.
pub fn extract_postal_code(text: &str) -> Result<String> {
    POSTAL_CODE_RE
        .find_iter(text)
        .last()
        .or_else(|| {
            LAST_DIGITS_RE
                .captures(text)
                .and_then(|caps| caps.get(1))
        })
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AppError::extraction("postal code", format!("{text:?}")))
}

fn section(text: &str, index: usize, field: &'static str) -> Result<String> {
    text.split(',')
        .nth(index)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            AppError::extraction(field, format!("no comma section {index} in {text:?}"))
        })
}
