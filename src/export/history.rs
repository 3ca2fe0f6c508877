use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fmt::Write;

use super::{format_timestamp, history_filename, ExportFile, ExportOptions, TOOL_NAME};
use crate::config::ExportFormat;
use crate::history::RecentSearch;

const UNKNOWN: &str = "Unknown";

/// Render the recent-searches list in the configured format.
pub fn export_history(searches: &[RecentSearch], options: &ExportOptions) -> Result<ExportFile> {
    let content = match options.format {
        ExportFormat::Txt => to_text(searches, options),
        ExportFormat::Csv => to_csv(searches, options)?,
        ExportFormat::Json => to_json(searches, options)?,
    };

    Ok(ExportFile {
        filename: history_filename(options.format, options.generated_at.date_naive()),
        mime_type: options.format.mime_type(),
        content,
    })
}

fn to_text(searches: &[RecentSearch], options: &ExportOptions) -> String {
    let mut out = String::new();
    let title = format!("{} Search History", TOOL_NAME);
    let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.len()));
    let _ = writeln!(out, "Downloaded: {}", format_timestamp(options.generated_at));
    let _ = writeln!(out, "Total Searches: {}\n", searches.len());

    for (i, search) in searches.iter().enumerate() {
        let city = search.address.city.as_deref().unwrap_or("Unknown City");
        let state = search.address.state.as_deref().unwrap_or("Unknown State");

        let _ = writeln!(out, "{}. {}", i + 1, search.display_name);
        let _ = writeln!(out, "   Location: {}, {}", city, state);
        let _ = writeln!(out, "   Searched: {}", format_timestamp(search.timestamp));
        let _ = writeln!(out, "   Coordinates: {}, {}\n", search.lat, search.lon);
    }

    let _ = writeln!(out, "\n--- End of History ---");
    let _ = writeln!(out, "This report was generated by {}", TOOL_NAME);
    let _ = writeln!(
        out,
        "To get detailed AHJ information, search for these addresses again."
    );
    out
}

fn to_csv(searches: &[RecentSearch], options: &ExportOptions) -> Result<String> {
    let f = &options.fields;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers = vec!["Display Name", "Latitude", "Longitude"];
    if f.address {
        headers.extend(["City", "State"]);
    }
    if f.timestamp {
        headers.push("Search Date");
    }
    writer.write_record(&headers)?;

    for search in searches {
        let mut row = vec![
            search.display_name.clone(),
            search.lat.to_string(),
            search.lon.to_string(),
        ];
        if f.address {
            row.push(search.address.city.clone().unwrap_or_else(|| UNKNOWN.to_string()));
            row.push(search.address.state.clone().unwrap_or_else(|| UNKNOWN.to_string()));
        }
        if f.timestamp {
            row.push(format_timestamp(search.timestamp));
        }
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json(searches: &[RecentSearch], options: &ExportOptions) -> Result<String> {
    let f = &options.fields;
    let entries: Vec<Value> = searches
        .iter()
        .map(|search| {
            let mut entry = Map::new();
            if f.timestamp {
                entry.insert("timestamp".into(), json!(search.timestamp.to_rfc3339()));
            }
            if f.address {
                entry.insert("address".into(), json!(search.address));
            }
            entry.insert("display_name".into(), json!(search.display_name));
            entry.insert(
                "coordinates".into(),
                json!({ "lat": search.lat, "lon": search.lon }),
            );
            Value::Object(entry)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json!({
        "export_info": {
            "tool": TOOL_NAME,
            "exported_at": options.generated_at.to_rfc3339(),
            "total_searches": searches.len(),
        },
        "searches": entries,
    }))?)
}
