use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fmt::Write;

use super::{format_timestamp, result_filename, yes_no, ExportFile, ExportOptions, TOOL_NAME};
use crate::config::ExportFormat;
use crate::models::AhjResult;

/// Render one result in the configured format.
pub fn export_result(result: &AhjResult, options: &ExportOptions) -> Result<ExportFile> {
    let content = match options.format {
        ExportFormat::Txt => to_text(result, options),
        ExportFormat::Csv => to_csv(result, options)?,
        ExportFormat::Json => to_json(result, options)?,
    };

    Ok(ExportFile {
        filename: result_filename(result, options.format, options.generated_at.date_naive()),
        mime_type: options.format.mime_type(),
        content,
    })
}

/// (section, label, value) rows in report order, honouring the field toggles.
fn rows(result: &AhjResult, options: &ExportOptions) -> Vec<(&'static str, &'static str, String)> {
    let f = &options.fields;
    let ahj = &result.ahj_info;
    let mut rows = Vec::new();

    if f.address {
        let a = &result.address;
        rows.extend([
            ("Address Information", "Address", a.full_address.clone()),
            ("Address Information", "City", a.city.clone()),
            ("Address Information", "County", a.county.clone()),
            ("Address Information", "State", a.state.clone()),
            ("Address Information", "ZIP Code", a.zipcode.clone()),
            (
                "Address Information",
                "Coordinates",
                format!("{}, {}", a.latitude, a.longitude),
            ),
        ]);
    }

    if f.ahj {
        let c = &ahj.contact_info;
        rows.extend([
            ("Authority Having Jurisdiction", "Jurisdiction", ahj.jurisdiction_name.clone()),
            ("Authority Having Jurisdiction", "Type", ahj.jurisdiction_type.clone()),
            ("Authority Having Jurisdiction", "Authority", ahj.authority_type.clone()),
            ("Authority Having Jurisdiction", "Phone", c.phone.clone()),
            ("Authority Having Jurisdiction", "Email", c.email.clone()),
            ("Authority Having Jurisdiction", "Website", c.website.clone()),
            ("Authority Having Jurisdiction", "Office", c.address.clone()),
        ]);
    }

    if f.permits {
        let p = &ahj.permit_requirements;
        rows.extend([
            ("Permit Requirements", "Electrical Permit", yes_no(p.electrical_permit_required).to_string()),
            ("Permit Requirements", "Building Permit", yes_no(p.building_permit_required).to_string()),
            ("Permit Requirements", "Fire Permit", yes_no(p.fire_permit_required).to_string()),
            ("Permit Requirements", "Review Time", p.estimated_review_time.clone()),
            ("Permit Requirements", "Permit Fees", p.permit_fees.clone()),
        ]);
    }

    if f.inspections {
        let i = &ahj.inspection_requirements;
        rows.extend([
            ("Inspection Requirements", "Rough Inspection", yes_no(i.rough_inspection).to_string()),
            ("Inspection Requirements", "Final Inspection", yes_no(i.final_inspection).to_string()),
            (
                "Inspection Requirements",
                "Utility Interconnection",
                yes_no(i.utility_interconnection).to_string(),
            ),
            ("Inspection Requirements", "Special Requirements", i.special_requirements.clone()),
        ]);
    }

    if f.codes {
        let c = &ahj.codes_and_standards;
        rows.push(("Building Codes & Standards", "Building Code", c.building_code.clone()));
        rows.push(("Building Codes & Standards", "Electrical Code", c.electrical_code.clone()));
        if let Some(fire) = &c.fire_code {
            rows.push(("Building Codes & Standards", "Fire Code", fire.clone()));
        }
        rows.push(("Building Codes & Standards", "IFC Version", c.ifc_version.clone()));
        rows.push(("Building Codes & Standards", "Zoning Restrictions", c.zoning_restrictions.clone()));
    }

    if f.utilities {
        let u = &result.utility_info;
        rows.extend([
            ("Utility Information", "Utility Company", u.utility_name.clone()),
            ("Utility Information", "Interconnection", u.interconnection_process.clone()),
            ("Utility Information", "Timeline", u.estimated_timeline.clone()),
            ("Utility Information", "Phone", u.contact.phone.clone()),
            ("Utility Information", "Email", u.contact.email.clone()),
            ("Utility Information", "Website", u.contact.website.clone()),
        ]);
    }

    for note in &result.additional_notes {
        rows.push(("Additional Notes", "Note", note.clone()));
    }
    if !options.custom_notes.is_empty() {
        rows.push(("Additional Notes", "Custom Notes", options.custom_notes.clone()));
    }
    if f.timestamp {
        rows.push(("Additional Notes", "Last Updated", result.last_updated.clone()));
    }
    rows.push(("Additional Notes", "Data Source", result.data_source.clone()));

    rows
}

fn to_text(result: &AhjResult, options: &ExportOptions) -> String {
    let mut out = String::new();
    let title = format!("{} Report", TOOL_NAME);
    let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.len()));

    if !options.company_name.is_empty() {
        let _ = writeln!(out, "Prepared by: {}", options.company_name);
        if !options.company_address.is_empty() {
            let _ = writeln!(out, "Company Address: {}", options.company_address);
        }
        if !options.company_contact.is_empty() {
            let _ = writeln!(out, "Contact: {}", options.company_contact);
        }
    }
    let _ = writeln!(out, "Project Type: {:?}", options.project_type);
    if options.fields.timestamp {
        let _ = writeln!(out, "Generated: {}", format_timestamp(options.generated_at));
    }

    let mut current = "";
    for (section, label, value) in rows(result, options) {
        if section != current {
            let _ = writeln!(out, "\n{}\n{}", section.to_uppercase(), "-".repeat(section.len()));
            current = section;
        }
        if label == "Note" {
            let _ = writeln!(out, "• {}", value);
        } else {
            let _ = writeln!(out, "{}: {}", label, value);
        }
    }

    out
}

fn to_csv(result: &AhjResult, options: &ExportOptions) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Section", "Field", "Value"])?;
    for (section, label, value) in rows(result, options) {
        writer.write_record([section, label, value.as_str()])?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json(result: &AhjResult, options: &ExportOptions) -> Result<String> {
    let f = &options.fields;
    let mut value = serde_json::to_value(result)?;

    if let Value::Object(map) = &mut value {
        if !f.address {
            map.remove("address");
        }
        if !f.utilities {
            map.remove("utility_info");
        }
        if !f.timestamp {
            map.remove("last_updated");
        }
        if let Some(Value::Object(ahj)) = map.get_mut("ahj_info") {
            if !f.ahj {
                for key in ["jurisdiction_name", "jurisdiction_type", "authority_type", "contact_info"] {
                    ahj.remove(key);
                }
            }
            if !f.permits {
                ahj.remove("permit_requirements");
            }
            if !f.inspections {
                ahj.remove("inspection_requirements");
            }
            if !f.codes {
                ahj.remove("codes_and_standards");
            }
        }
    }

    let mut export_info = json!({
        "tool": TOOL_NAME,
        "project_type": options.project_type,
    });
    if f.timestamp {
        export_info["exported_at"] = json!(options.generated_at.to_rfc3339());
    }
    if !options.company_name.is_empty() {
        export_info["company"] = json!({
            "name": options.company_name,
            "address": options.company_address,
            "contact": options.company_contact,
        });
    }
    if !options.custom_notes.is_empty() {
        export_info["custom_notes"] = json!(options.custom_notes);
    }

    Ok(serde_json::to_string_pretty(&json!({
        "export_info": export_info,
        "result": value,
    }))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFields;
    use crate::jurisdiction::{GeoLookup, JurisdictionCatalog, RecordMerger, SupportedState};
    use crate::models::{AddressParts, GeocodedAddress};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn tempe() -> AhjResult {
        let address = GeocodedAddress::new(
            "700 W University Dr, Tempe, AZ 85281",
            33.42,
            -111.94,
            AddressParts {
                city: Some("Tempe".into()),
                county: Some("Maricopa County".into()),
                state: Some("Arizona".into()),
                postcode: Some("85281".into()),
                ..Default::default()
            },
        );
        let region = GeoLookup::builtin().resolve_region(SupportedState::Arizona, 33.42, -111.94);
        let record = JurisdictionCatalog::builtin().lookup_city(SupportedState::Arizona, "tempe", &region);
        RecordMerger.merge_on(
            &record,
            &region,
            &address,
            "Arizona",
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        )
    }

    fn options(format: ExportFormat) -> ExportOptions {
        ExportOptions {
            generated_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            ..ExportOptions::default()
        }
        .with_format(format)
    }

    #[test]
    fn test_text_report_sections() {
        let file = export_result(&tempe(), &options(ExportFormat::Txt)).unwrap();
        assert_eq!(file.filename, "QuickAHJ_Tempe_2024-03-09.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert!(file.content.starts_with("QuickAHJ Report\n"));
        assert!(file.content.contains("ADDRESS INFORMATION"));
        assert!(file.content.contains("ZIP Code: 85281"));
        assert!(file.content.contains("Fire Permit: Not Required"));
        assert!(file.content.contains("• Check local historic district restrictions"));
        assert!(file.content.contains("Generated: 2024-03-09 12:00:00 UTC"));
        assert!(!file.content.contains("Prepared by"));
    }

    #[test]
    fn test_text_report_company_header_and_notes() {
        let mut opts = options(ExportFormat::Txt);
        opts.company_name = "Sunny Installs".into();
        opts.company_contact = "ops@sunny.example".into();
        opts.custom_notes = "Bring ladder".into();

        let file = export_result(&tempe(), &opts).unwrap();
        assert!(file.content.contains("Prepared by: Sunny Installs"));
        assert!(file.content.contains("Contact: ops@sunny.example"));
        assert!(file.content.contains("Custom Notes: Bring ladder"));
    }

    #[test]
    fn test_field_toggles() {
        let mut opts = options(ExportFormat::Txt);
        opts.fields = ExportFields {
            utilities: false,
            timestamp: false,
            ..ExportFields::default()
        };

        let file = export_result(&tempe(), &opts).unwrap();
        assert!(!file.content.contains("UTILITY INFORMATION"));
        assert!(!file.content.contains("Generated:"));
        assert!(!file.content.contains("Last Updated"));
        assert!(file.content.contains("PERMIT REQUIREMENTS"));
    }

    #[test]
    fn test_csv_quotes_commas() {
        let file = export_result(&tempe(), &options(ExportFormat::Csv)).unwrap();
        let mut lines = file.content.lines();
        assert_eq!(lines.next(), Some("Section,Field,Value"));
        assert!(file
            .content
            .contains("Address Information,Address,\"700 W University Dr, Tempe, AZ 85281\""));
        assert_eq!(file.mime_type, "text/csv");
    }

    #[test]
    fn test_json_filtering() {
        let mut opts = options(ExportFormat::Json);
        opts.fields.codes = false;
        opts.fields.address = false;

        let file = export_result(&tempe(), &opts).unwrap();
        let v: Value = serde_json::from_str(&file.content).unwrap();
        assert_eq!(v["export_info"]["tool"], "QuickAHJ");
        assert!(v["result"].get("address").is_none());
        assert!(v["result"]["ahj_info"].get("codes_and_standards").is_none());
        assert_eq!(
            v["result"]["ahj_info"]["jurisdiction_name"],
            "City of Tempe Development Services Department"
        );
        assert_eq!(v["result"]["last_updated"], "2024-03-09");
    }
}
