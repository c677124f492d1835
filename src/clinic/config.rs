use crate::error::{ClinicError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for a clinic data directory, stored in `<data dir>/config.json`.
///
/// Every field has a default, so a partial (or missing) file is fine.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClinicConfig {
    #[serde(default = "default_patients_file")]
    pub patients_file: String,

    #[serde(default = "default_appointments_file")]
    pub appointments_file: String,

    #[serde(default = "default_prescriptions_file")]
    pub prescriptions_file: String,

    /// Where printable prescriptions are written, relative to the data directory
    /// unless absolute.
    #[serde(default = "default_document_dir")]
    pub document_dir: String,
}

fn default_patients_file() -> String {
    "patients.txt".to_string()
}

fn default_appointments_file() -> String {
    "appointments.txt".to_string()
}

fn default_prescriptions_file() -> String {
    "prescriptions.txt".to_string()
}

fn default_document_dir() -> String {
    "prescriptions".to_string()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            patients_file: default_patients_file(),
            appointments_file: default_appointments_file(),
            prescriptions_file: default_prescriptions_file(),
            document_dir: default_document_dir(),
        }
    }
}

impl ClinicConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ClinicError::Io)?;
        let config: ClinicConfig =
            serde_json::from_str(&content).map_err(ClinicError::Serialization)?;
        Ok(config)
    }

}
