use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::choropleth::MapOptions;
use crate::country::{CountryResolver, Locale};
use crate::error::{AtlasError, Result};
use crate::scale::DEFAULT_UPPER_SHARE;
use crate::svg::PAGE_WIDTH;

pub const DEFAULT_CONFIG_FILE: &str = "trade_atlas.toml";

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub map: MapConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// World countries as GeoJSON, feature ids being ISO numeric codes.
    pub world_geometry: PathBuf,
    /// Language the report names its countries in.
    pub report_locale: Locale,
    pub fallback_locale: Locale,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            world_geometry: PathBuf::from("data/countries-110m.geojson"),
            report_locale: Locale::Ru,
            fallback_locale: Locale::En,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub top_n: usize,
    pub default_upper_share: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { top_n: 6, default_upper_share: DEFAULT_UPPER_SHARE }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub output: PathBuf,
    pub width: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output: PathBuf::from("report.svg"), width: PAGE_WIDTH }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    /// Log file for the terminal view.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), file: PathBuf::from("trade_atlas.log") }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| AtlasError::io(path, e))?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn resolver(&self) -> CountryResolver {
        CountryResolver::new(self.data.report_locale, self.data.fallback_locale)
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions { top_n: self.map.top_n, default_upper_share: self.map.default_upper_share }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.map.top_n, 6);
        assert_eq!(cfg.export.width, 794.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [data]
            report_locale = "en"

            [map]
            top_n = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data.report_locale, Locale::En);
        assert_eq!(cfg.data.fallback_locale, Locale::En);
        assert_eq!(cfg.map.top_n, 3);
        assert_eq!(cfg.map_options().default_upper_share, 1.0);
        assert_eq!(cfg.resolver(), CountryResolver::new(Locale::En, Locale::En));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = AppConfig::from_toml("[map]\ntop_n = \"six\"").unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }

    #[test]
    fn loads_from_disk_or_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(AppConfig::load_from_file(&missing).unwrap(), AppConfig::default());

        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[export]\nwidth = 600.0\noutput = \"out.svg\"\n").unwrap();
        let cfg = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg.export.width, 600.0);
        assert_eq!(cfg.export.output, PathBuf::from("out.svg"));
    }
}
