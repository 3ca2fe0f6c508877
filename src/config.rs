//! User settings, loaded from TOML.
//!
//! Every key is optional in the file; missing keys take the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Detailed,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

/// Where AHJ data may come from, in the order the user ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[serde(rename = "solarapp")]
    SolarApp,
    Municipal,
    Upcodes,
    Shovels,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::SolarApp => write!(f, "solarapp"),
            DataSource::Municipal => write!(f, "municipal"),
            DataSource::Upcodes => write!(f, "upcodes"),
            DataSource::Shovels => write!(f, "shovels"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledSources {
    pub solarapp: bool,
    pub municipal: bool,
    pub upcodes: bool,
    pub shovels: bool,
}

impl Default for EnabledSources {
    fn default() -> Self {
        Self {
            solarapp: true,
            municipal: true,
            upcodes: true,
            shovels: true,
        }
    }
}

impl EnabledSources {
    pub fn is_enabled(&self, source: DataSource) -> bool {
        match source {
            DataSource::SolarApp => self.solarapp,
            DataSource::Municipal => self.municipal,
            DataSource::Upcodes => self.upcodes,
            DataSource::Shovels => self.shovels,
        }
    }
}

/// Per-section toggles for the result sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sections {
    pub address: bool,
    pub ahj: bool,
    pub permits: bool,
    pub inspections: bool,
    pub utilities: bool,
    pub codes: bool,
}

impl Sections {
    pub const fn all(value: bool) -> Self {
        Self {
            address: value,
            ahj: value,
            permits: value,
            inspections: value,
            utilities: value,
            codes: value,
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::all(true)
    }
}

fn default_auto_expand() -> Sections {
    Sections {
        ahj: true,
        permits: true,
        ..Sections::all(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => anyhow::bail!("Unknown export format: {}", other),
        }
    }
}

/// Which parts of a result or history entry go into an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFields {
    pub address: bool,
    pub ahj: bool,
    pub permits: bool,
    pub inspections: bool,
    pub utilities: bool,
    pub codes: bool,
    pub timestamp: bool,
}

impl Default for ExportFields {
    fn default() -> Self {
        Self {
            address: true,
            ahj: true,
            permits: true,
            inspections: true,
            utilities: true,
            codes: true,
            timestamp: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Solar,
    Battery,
    Electrical,
    Roofing,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrmSystem {
    #[default]
    None,
    Salesforce,
    Hubspot,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Display
    pub theme_override: Theme,
    pub view_mode: ViewMode,
    pub default_units: Units,

    // Data sources
    pub data_sources_priority: Vec<DataSource>,
    pub enabled_data_sources: EnabledSources,
    pub offline_mode: bool,
    /// Answer with generic records for states without tables
    pub nationwide_fallback: bool,

    // Result display
    pub visible_sections: Sections,
    pub auto_expand_sections: Sections,

    // Search
    /// Miles
    pub search_radius: u32,
    pub recent_searches_limit: usize,
    pub history_path: PathBuf,

    // Export
    pub export_format: ExportFormat,
    pub export_fields: ExportFields,

    // Professional
    pub company_name: String,
    pub company_address: String,
    pub company_contact: String,
    pub default_project_type: ProjectType,
    pub custom_notes: String,

    // Technical
    pub nominatim_url: String,
    /// Seconds
    pub request_timeout: u64,
    pub retry_attempts: u32,
    pub debug_mode: bool,

    // Integrations
    pub calendar_integration: bool,
    pub crm_system: CrmSystem,
    pub crm_webhook_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_override: Theme::System,
            view_mode: ViewMode::Detailed,
            default_units: Units::Imperial,
            data_sources_priority: vec![
                DataSource::SolarApp,
                DataSource::Municipal,
                DataSource::Upcodes,
                DataSource::Shovels,
            ],
            enabled_data_sources: EnabledSources::default(),
            offline_mode: false,
            nationwide_fallback: false,
            visible_sections: Sections::default(),
            auto_expand_sections: default_auto_expand(),
            search_radius: 10,
            recent_searches_limit: 10,
            history_path: PathBuf::from("quickahj_history.json"),
            export_format: ExportFormat::Txt,
            export_fields: ExportFields::default(),
            company_name: String::new(),
            company_address: String::new(),
            company_contact: String::new(),
            default_project_type: ProjectType::Solar,
            custom_notes: String::new(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            request_timeout: 10,
            retry_attempts: 3,
            debug_mode: false,
            calendar_integration: false,
            crm_system: CrmSystem::None,
            crm_webhook_url: String::new(),
        }
    }
}

impl Settings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read settings file")?;
        let settings: Settings =
            toml::from_str(&content).context("Failed to parse settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load the file if it exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        info!("Loading settings from {}", path.display());
        Self::load_from_file(path)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.nominatim_url)
            .with_context(|| format!("Invalid nominatim_url: {}", self.nominatim_url))?;

        if self.crm_system == CrmSystem::Custom && !self.crm_webhook_url.is_empty() {
            Url::parse(&self.crm_webhook_url)
                .with_context(|| format!("Invalid crm_webhook_url: {}", self.crm_webhook_url))?;
        }

        if self.recent_searches_limit == 0 {
            anyhow::bail!("recent_searches_limit must be at least 1");
        }

        Ok(())
    }

    /// Enabled data sources in priority order. Offline mode drops the remote
    /// ones. The bundled municipal tables answer whatever this returns.
    pub fn active_data_sources(&self) -> Vec<DataSource> {
        self.data_sources_priority
            .iter()
            .copied()
            .filter(|s| self.enabled_data_sources.is_enabled(*s))
            .filter(|s| !self.offline_mode || *s == DataSource::Municipal)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.recent_searches_limit, 10);
        assert_eq!(s.request_timeout, 10);
        assert_eq!(s.retry_attempts, 3);
        assert_eq!(s.export_format, ExportFormat::Txt);
        assert!(s.auto_expand_sections.ahj);
        assert!(s.auto_expand_sections.permits);
        assert!(!s.auto_expand_sections.codes);
        assert!(!s.nationwide_fallback);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            export_format = "csv"
            data_sources_priority = ["municipal", "solarapp"]
            company_name = "Sunny Installs"

            [export_fields]
            timestamp = false
        "#;
        let s: Settings = toml::from_str(toml).unwrap();
        assert_eq!(s.export_format, ExportFormat::Csv);
        assert_eq!(
            s.data_sources_priority,
            vec![DataSource::Municipal, DataSource::SolarApp]
        );
        assert_eq!(s.company_name, "Sunny Installs");
        assert!(!s.export_fields.timestamp);
        assert!(s.export_fields.address);
        assert_eq!(s.recent_searches_limit, 10);
    }

    #[test]
    fn test_active_sources() {
        let mut s = Settings::default();
        s.enabled_data_sources.solarapp = false;
        assert_eq!(
            s.active_data_sources(),
            vec![DataSource::Municipal, DataSource::Upcodes, DataSource::Shovels]
        );

        s.offline_mode = true;
        assert_eq!(s.active_data_sources(), vec![DataSource::Municipal]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut s = Settings::default();
        s.custom_notes = "Call ahead".into();
        s.crm_system = CrmSystem::Custom;
        s.crm_webhook_url = "https://hooks.example.com/ahj".into();
        s.save_to_file(&path).unwrap();

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let s = Settings {
            nominatim_url: "not a url".into(),
            ..Default::default()
        };
        assert!(s.validate().is_err());

        let s = Settings {
            recent_searches_limit: 0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
