use crate::application::session_store::{
    SessionSettings, DEFAULT_REPORT_PREFIX, DEFAULT_SAMPLE_RATE_HZ,
};
use crate::domain::chart::DEFAULT_FREQUENCY_POINT_CAP;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

const CONFIG_FILE: &str = "config/dashboard";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub analysis: AnalysisSettings,
    pub report: ReportSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    pub frequency_point_cap: usize,
    pub sample_rate_hz: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DashboardConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            frequency_point_cap: self.analysis.frequency_point_cap,
            sample_rate_hz: self.analysis.sample_rate_hz,
            report_prefix: self.report.file_prefix.clone(),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.analysis.frequency_point_cap == 0 {
            anyhow::bail!("analysis.frequency_point_cap must be greater than zero");
        }
        if !self.analysis.sample_rate_hz.is_finite() || self.analysis.sample_rate_hz <= 0.0 {
            anyhow::bail!(
                "analysis.sample_rate_hz must be a positive number, got {}",
                self.analysis.sample_rate_hz
            );
        }
        if self.backend.timeout_secs == 0 {
            anyhow::bail!("backend.timeout_secs must be greater than zero");
        }
        if self.report.file_prefix.trim().is_empty() {
            anyhow::bail!("report.file_prefix must not be empty");
        }
        Ok(())
    }
}

fn with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
        .set_default("backend.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("analysis.frequency_point_cap", DEFAULT_FREQUENCY_POINT_CAP as u64)?
        .set_default("analysis.sample_rate_hz", DEFAULT_SAMPLE_RATE_HZ)?
        .set_default("report.output_dir", DEFAULT_REPORT_DIR)?
        .set_default("report.file_prefix", DEFAULT_REPORT_PREFIX)?
        .set_default("server.listen_addr", DEFAULT_LISTEN_ADDR)?)
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> anyhow::Result<DashboardConfig> {
    let settings: DashboardConfig = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Load `config/dashboard.*` if present; every key falls back to its default.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    build(with_defaults()?.add_source(config::File::with_name(CONFIG_FILE).required(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> anyhow::Result<DashboardConfig> {
        build(with_defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("").unwrap();

        assert_eq!(settings.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.backend.timeout(), Duration::from_secs(30));
        assert_eq!(settings.analysis.frequency_point_cap, 1000);
        assert_eq!(settings.analysis.sample_rate_hz, 12_000.0);
        assert_eq!(settings.report.output_dir, PathBuf::from("reports"));
        assert_eq!(settings.server.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let settings = from_toml(
            r#"
            [backend]
            base_url = "http://diagnostics.local:9000"

            [analysis]
            frequency_point_cap = 250
            sample_rate_hz = 48000.0

            [report]
            file_prefix = "pump_3"
            "#,
        )
        .unwrap();

        assert_eq!(settings.backend.base_url, "http://diagnostics.local:9000");
        assert_eq!(settings.backend.timeout_secs, 30);

        let session = settings.session_settings();
        assert_eq!(session.frequency_point_cap, 250);
        assert_eq!(session.sample_rate_hz, 48_000.0);
        assert_eq!(session.report_prefix, "pump_3");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(from_toml("[analysis]\nfrequency_point_cap = 0").is_err());
        assert!(from_toml("[analysis]\nsample_rate_hz = -1.0").is_err());
        assert!(from_toml("[backend]\ntimeout_secs = 0").is_err());
    }
}
