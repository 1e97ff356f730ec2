//! Registration data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout used when rendering a registration date as text.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z UTC";

/// A company registration extracted from one announcement detail page.
///
/// Fields that could not be extracted keep their zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Court file / registration number (e.g. "HRB 781234")
    pub reg_no: String,

    /// Announcement date-time
    pub date: Option<DateTime<Utc>>,

    /// Legal entity name
    pub name: String,

    /// Street address line
    pub address: String,

    /// City name
    pub city: String,

    /// Five-digit postal code
    pub postal_code: String,
}

impl Registration {
    /// Render the announcement date, or an empty string when it is unknown.
    pub fn display_date(&self) -> String {
        self.date
            .map(|date| date.format(DATE_DISPLAY_FORMAT).to_string())
            .unwrap_or_default()
    }
}
