//! Configuration, built from environment variables.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Person-finder directory connection settings.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the directory API, without a trailing slash.
    pub base_url: String,
    /// API key sent as `X-Api-Key` on every request.
    pub api_key: SecretString,
}

/// CRM connection settings.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// Base URL of the CRM REST API, without a trailing slash.
    pub base_url: String,
    /// Bearer token for the CRM REST API.
    pub access_token: SecretString,
    /// Base URL used to build human-clickable record links.
    pub console_url: String,
}

/// Top-level runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub crm: CrmConfig,
    /// Directory that receives the workbook and CSV backups.
    pub output_dir: PathBuf,
    /// Directory that receives the progress snapshot file.
    pub progress_dir: PathBuf,
    /// When set, tracing output is also written to daily-rolling files here.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Connection settings are required; local paths fall back to defaults
    /// (`./output` for results, with progress written alongside them).
    pub fn from_env() -> Result<Self, ConfigError> {
        let directory = DirectoryConfig {
            base_url: trim_trailing_slash(require(
                "TRIAGE_DIRECTORY_URL",
                "export TRIAGE_DIRECTORY_URL=https://api.example-directory.com",
            )?),
            api_key: SecretString::from(require(
                "TRIAGE_DIRECTORY_API_KEY",
                "export TRIAGE_DIRECTORY_API_KEY=...",
            )?),
        };

        let crm_base_url = trim_trailing_slash(require(
            "TRIAGE_CRM_URL",
            "export TRIAGE_CRM_URL=https://yourorg.my.salesforce.com",
        )?);
        let console_url = std::env::var("TRIAGE_CRM_CONSOLE_URL")
            .map(trim_trailing_slash)
            .unwrap_or_else(|_| crm_base_url.clone());
        let crm = CrmConfig {
            base_url: crm_base_url,
            access_token: SecretString::from(require(
                "TRIAGE_CRM_TOKEN",
                "export TRIAGE_CRM_TOKEN=...",
            )?),
            console_url,
        };

        let output_dir = std::env::var("TRIAGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./output"));

        let progress_dir = std::env::var("TRIAGE_PROGRESS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| output_dir.clone());

        let log_dir = std::env::var("TRIAGE_LOG_DIR").ok().map(PathBuf::from);

        Ok(Self {
            directory,
            crm,
            output_dir,
            progress_dir,
            log_dir,
        })
    }
}

fn require(key: &str, hint: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar {
            key: key.to_string(),
            hint: hint.to_string(),
        }),
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
