//! Plain-text, CSV and JSON exports of results and search history.

mod history;
mod result;

pub use history::export_history;
pub use result::export_result;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::{ExportFields, ExportFormat, ProjectType, Settings};
use crate::models::AhjResult;

pub const TOOL_NAME: &str = "QuickAHJ";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("filename pattern is valid"));

/// Settings that shape an export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub fields: ExportFields,
    pub company_name: String,
    pub company_address: String,
    pub company_contact: String,
    pub project_type: ProjectType,
    pub custom_notes: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            format: settings.export_format,
            fields: settings.export_fields.clone(),
            company_name: settings.company_name.clone(),
            company_address: settings.company_address.clone(),
            company_contact: settings.company_contact.clone(),
            project_type: settings.default_project_type,
            custom_notes: settings.custom_notes.clone(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Rendered export ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

pub fn history_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_SearchHistory_{}.{}",
        TOOL_NAME,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn result_filename(result: &AhjResult, format: ExportFormat, date: NaiveDate) -> String {
    let city = UNSAFE_FILENAME_CHARS.replace_all(result.address.city.trim(), "_");
    let city = city.trim_matches('_');
    let city = if city.is_empty() { "Unknown" } else { city };
    format!(
        "{}_{}_{}.{}",
        TOOL_NAME,
        city,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn yes_no(required: bool) -> &'static str {
    if required {
        "Required"
    } else {
        "Not Required"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            history_filename(ExportFormat::Csv, date),
            "QuickAHJ_SearchHistory_2024-03-09.csv"
        );
    }
}
