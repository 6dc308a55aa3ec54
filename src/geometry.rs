use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use geo::{Geometry, MultiPolygon};
use geojson::{GeoJson, feature::Id};
use serde_json::Value;
use tracing::{debug, info};

use crate::country::{CountryKey, Locale};
use crate::error::{AtlasError, Result};
use crate::iso;

/// One country outline from the world geometry file.
#[derive(Clone, Debug)]
pub struct MapFeature {
    /// ISO 3166-1 numeric code, when the file carries one.
    pub numeric_id: Option<u16>,
    /// English name from the feature properties.
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl MapFeature {
    /// Key derived from the English name, for features without a usable id.
    pub fn name_key(&self) -> Option<CountryKey> {
        let name = self.name.as_deref()?;
        iso::alpha2_by_name(name, Locale::En).map(|code| CountryKey::Iso(code.to_string()))
    }
}

/// All world features in file order, plus a numeric-id lookup.
#[derive(Debug, Default)]
pub struct GeometryIndex {
    features: Vec<MapFeature>,
    by_id: HashMap<u16, usize>,
}

impl GeometryIndex {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|e| AtlasError::io(path, e))?;
        let index = Self::from_geojson(GeoJson::from_str(&txt)?)?;
        info!(path = %path.display(), features = index.len(), "world geometry loaded");
        Ok(index)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self> {
        let GeoJson::FeatureCollection(fc) = raw else {
            return Err(AtlasError::NotFeatureCollection);
        };

        let mut features = Vec::with_capacity(fc.features.len());
        for feature in fc.features {
            let props = feature.properties.as_ref();
            let numeric_id = feature
                .id
                .as_ref()
                .and_then(id_to_numeric)
                .or_else(|| {
                    props
                        .and_then(|p| p.get("ISO_N3").or_else(|| p.get("iso_n3")))
                        .and_then(value_to_numeric)
                });
            let name = props
                .and_then(|p| ["name", "ADMIN", "NAME"].iter().find_map(|k| p.get(*k)))
                .and_then(Value::as_str)
                .map(str::to_string);

            let Some(gj) = feature.geometry else {
                debug!(?numeric_id, ?name, "feature without geometry skipped");
                continue;
            };
            let geom: Geometry<f64> = match gj.value.try_into() {
                Ok(g) => g,
                Err(e) => {
                    debug!(?numeric_id, ?name, error = %e, "unconvertible geometry skipped");
                    continue;
                }
            };
            let geometry = match geom {
                Geometry::Polygon(p) => p.into(),
                Geometry::MultiPolygon(m) => m,
                _ => {
                    debug!(?numeric_id, ?name, "non-areal geometry skipped");
                    continue;
                }
            };

            features.push(MapFeature { numeric_id, name, geometry });
        }

        let mut by_id = HashMap::new();
        for (idx, f) in features.iter().enumerate() {
            if let Some(id) = f.numeric_id {
                by_id.entry(id).or_insert(idx);
            }
        }

        Ok(Self { features, by_id })
    }

    pub fn by_numeric_id(&self, id: u16) -> Option<&MapFeature> {
        self.by_id.get(&id).map(|&i| &self.features[i])
    }

    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// world-atlas ids are zero-padded strings ("004"), other exports use numbers
fn id_to_numeric(id: &Id) -> Option<u16> {
    match id {
        Id::String(s) => s.trim().parse().ok(),
        Id::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
    }
}

fn value_to_numeric(v: &Value) -> Option<u16> {
    match v {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        _ => None,
    }
}

/// Process-wide world geometry, loaded by the first caller and shared
/// read-only afterwards.
///
/// Callers arriving while a load is in flight wait for it and receive the
/// same index. A failed load leaves the cell empty so a later call retries.
pub struct WorldGeometry {
    cell: OnceLock<GeometryIndex>,
    loading: Mutex<()>,
}

impl WorldGeometry {
    pub const fn new() -> Self {
        Self { cell: OnceLock::new(), loading: Mutex::new(()) }
    }

    pub fn get_or_load<P: AsRef<Path>>(&self, path: P) -> Result<&GeometryIndex> {
        if let Some(index) = self.cell.get() {
            return Ok(index);
        }
        // a poisoned lock only means another loader panicked; the cell is still consistent
        let _guard = self.loading.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(index) = self.cell.get() {
            return Ok(index);
        }
        let index = GeometryIndex::from_path(path)?;
        Ok(self.cell.get_or_init(|| index))
    }
}

impl Default for WorldGeometry {
    fn default() -> Self {
        Self::new()
    }
}

pub static WORLD: WorldGeometry = WorldGeometry::new();


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_polygons_and_skips_points() {
        let world = fixtures::world();
        assert_eq!(world.len(), 4);
        assert_eq!(world.features()[3].numeric_id, None);
        assert_eq!(world.features()[3].name.as_deref(), Some("Somaliland"));
    }

    #[test]
    fn numeric_ids_from_strings_and_numbers() {
        let world = fixtures::world();
        assert_eq!(world.by_numeric_id(156).and_then(|f| f.name.as_deref()), Some("China"));
        assert_eq!(world.by_numeric_id(112).and_then(|f| f.name.as_deref()), Some("Belarus"));
        assert!(world.by_numeric_id(4).is_none());
    }

    #[test]
    fn feature_keys() {
        let world = fixtures::world();
        let china = world.by_numeric_id(156).unwrap();
        assert_eq!(china.name_key(), Some(CountryKey::Iso("CN".into())));
        assert_eq!(world.features()[3].name_key(), None);
    }

    #[test]
    fn iso_n3_property_is_a_fallback_id() {
        let raw = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ADMIN":"France","ISO_N3":"250"},
             "geometry":{"type":"Polygon","coordinates":[[[0,43],[7,43],[7,50],[0,50],[0,43]]]}}]}"#;
        let world = GeometryIndex::from_geojson(GeoJson::from_str(raw).unwrap()).unwrap();
        assert_eq!(world.by_numeric_id(250).and_then(|f| f.name.as_deref()), Some("France"));
    }

    #[test]
    fn rejects_non_collections() {
        let raw = r#"{"type":"Point","coordinates":[0,0]}"#;
        let err = GeometryIndex::from_geojson(GeoJson::from_str(raw).unwrap()).unwrap_err();
        assert!(matches!(err, AtlasError::NotFeatureCollection));
    }

    #[test]
    fn world_geometry_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixtures::WORLD_GEOJSON.as_bytes()).unwrap();

        let shared = WorldGeometry::new();
        // a failed load is not cached
        assert!(shared.get_or_load("/definitely/missing.geojson").is_err());
        assert!(shared.get_or_load("/definitely/missing.geojson").is_err());

        let first = shared.get_or_load(file.path()).unwrap() as *const GeometryIndex;
        // cached: the path is not consulted again
        let second = shared.get_or_load("/definitely/missing.geojson").unwrap() as *const GeometryIndex;
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_callers_share_one_index() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixtures::WORLD_GEOJSON.as_bytes()).unwrap();
        let shared = WorldGeometry::new();

        let ptrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| shared.get_or_load(file.path()).unwrap() as *const GeometryIndex as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }
}
