use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration, world geometry or a report.
///
/// Core logic (resolving, scaling, projecting) never fails; these only come
/// from reading files at the edges of the program.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid report JSON: {0}")]
    Report(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("world geometry must be a FeatureCollection")]
    NotFeatureCollection,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl AtlasError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
