//! The import-share map: joins the report's geography and price lists on
//! canonical country keys, matches them to world features, and turns the
//! result into styled paths, a ranked list and a tooltip.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use geo::{Contains, Point};
use tracing::{debug, info, warn};

use crate::country::{CountryKey, CountryResolver, Resolution, fold_name};
use crate::data::{ContractPriceRecord, GeographyRecord};
use crate::geometry::{GeometryIndex, MapFeature};
use crate::interaction::{Emphasis, InteractionState, Source};
use crate::projection::{Layout, LayoutKind, ProjectedPath};
use crate::scale::{ColorScale, DEFAULT_UPPER_SHARE, Legend, Palette, Rgb};

const TOOLTIP_OFFSET: f64 = 12.0;
const LEGEND_STEPS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapOptions {
    /// Rows in the ranked country list.
    pub top_n: usize,
    /// Scale upper bound used when no share is positive.
    pub default_upper_share: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self { top_n: 6, default_upper_share: DEFAULT_UPPER_SHARE }
    }
}

/// One geography row after identity resolution and the price join.
#[derive(Clone, Debug)]
pub struct CountryEntry {
    pub record: GeographyRecord,
    pub resolution: Resolution,
    pub price: Option<f64>,
    /// Whether some world feature was matched to this row.
    pub on_map: bool,
}

impl CountryEntry {
    pub fn key(&self) -> &CountryKey {
        &self.resolution.key
    }
}

/// A world feature that has a geography row.
#[derive(Clone, Debug)]
pub struct HighlightedFeature<'g> {
    pub feature: &'g MapFeature,
    pub key: CountryKey,
    pub share: f64,
    /// Label shown for the country in the list and the tooltip.
    pub resolved_name: String,
}

/// Everything derived from one report's geography and prices. Rebuilt from
/// scratch whenever a new report is loaded.
#[derive(Debug)]
pub struct Dataset<'g> {
    geometry: &'g GeometryIndex,
    /// One row per key, in order of first appearance.
    entries: Vec<CountryEntry>,
    by_key: HashMap<CountryKey, usize>,
    highlighted: Vec<HighlightedFeature<'g>>,
}

impl<'g> Dataset<'g> {
    pub fn new(
        geometry: &'g GeometryIndex,
        geography: &[GeographyRecord],
        prices: &[ContractPriceRecord],
        resolver: &CountryResolver,
    ) -> Self {
        let mut entries: Vec<CountryEntry> = Vec::with_capacity(geography.len());
        let mut by_key: HashMap<CountryKey, usize> = HashMap::new();
        for record in geography {
            let entry = CountryEntry {
                resolution: resolver.resolve_detailed(&record.country, record.country_code.as_deref()),
                record: record.clone(),
                price: None,
                on_map: false,
            };
            match by_key.entry(entry.key().clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(entry);
                }
                Entry::Occupied(slot) => {
                    let kept = &mut entries[*slot.get()];
                    warn!(
                        key = %entry.key(),
                        first = %kept.record.country,
                        second = %entry.record.country,
                        "two geography rows resolve to one country"
                    );
                    if entry.resolution.is_code_based() && !kept.resolution.is_code_based() {
                        *kept = entry;
                    }
                }
            }
        }

        let price_index = index_prices(prices, resolver);
        for entry in &mut entries {
            entry.price = price_index.get(entry.key()).copied();
        }

        // id matches are claimed first so a name can never take a feature
        // that a code already points at
        let mut highlighted: Vec<HighlightedFeature<'g>> = Vec::new();
        for entry in &mut entries {
            if let Some(feature) = entry.key().numeric_id().and_then(|id| geometry.by_numeric_id(id)) {
                highlighted.push(highlight(entry, feature));
            }
        }
        let by_name = features_by_name(geometry);
        for entry in entries.iter_mut().filter(|e| !e.on_map) {
            let Some(&feature) = by_name.get(entry.key()) else { continue };
            if highlighted.iter().any(|h| std::ptr::eq(h.feature, feature)) {
                debug!(country = %entry.record.country, "feature already taken by another row");
                continue;
            }
            highlighted.push(highlight(entry, feature));
        }

        for entry in entries.iter().filter(|e| !e.on_map) {
            debug!(country = %entry.record.country, key = %entry.key(), "geography row has no map feature");
        }
        info!(
            rows = geography.len(),
            countries = entries.len(),
            on_map = highlighted.len(),
            prices = price_index.len(),
            "dataset built"
        );

        Self { geometry, entries, by_key, highlighted }
    }

    pub fn geometry(&self) -> &'g GeometryIndex {
        self.geometry
    }

    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &CountryKey) -> Option<&CountryEntry> {
        self.by_key.get(key).map(|&i| &self.entries[i])
    }

    pub fn highlighted(&self) -> &[HighlightedFeature<'g>] {
        &self.highlighted
    }

    /// Name to show for a row: the highlighted feature's label when the row
    /// is on the map, the report's spelling otherwise.
    pub fn label<'a>(&'a self, entry: &'a CountryEntry) -> &'a str {
        self.highlighted
            .iter()
            .find(|h| &h.key == entry.key())
            .map_or(entry.record.country.as_str(), |h| h.resolved_name.as_str())
    }

    pub fn color_scale(&self, palette: Palette, default_upper: f64) -> ColorScale {
        ColorScale::from_shares(self.entries.iter().map(|e| e.record.share_percent), palette, default_upper)
    }

    /// Rows ordered by share, largest first, cut to `n`.
    pub fn ranked(&self, n: usize) -> Vec<&CountryEntry> {
        let mut rows: Vec<&CountryEntry> = self.entries.iter().collect();
        rows.sort_by(|a, b| b.record.share_percent.total_cmp(&a.record.share_percent));
        rows.truncate(n);
        rows
    }
}

fn highlight<'g>(entry: &mut CountryEntry, feature: &'g MapFeature) -> HighlightedFeature<'g> {
    entry.on_map = true;
    HighlightedFeature {
        feature,
        key: entry.key().clone(),
        share: entry.record.share_percent,
        resolved_name: entry.record.country.clone(),
    }
}

// English-name key first, then the raw folded name; earlier features win
fn features_by_name(geometry: &GeometryIndex) -> HashMap<CountryKey, &MapFeature> {
    let mut index = HashMap::new();
    for feature in geometry.features() {
        let folded = feature.name.as_deref().map(|n| CountryKey::Name(fold_name(n)));
        for key in feature.name_key().into_iter().chain(folded) {
            index.entry(key).or_insert(feature);
        }
    }
    index
}

fn index_prices(prices: &[ContractPriceRecord], resolver: &CountryResolver) -> HashMap<CountryKey, f64> {
    let mut index: HashMap<CountryKey, (f64, bool)> = HashMap::new();
    for record in prices {
        let res = resolver.resolve_detailed(&record.country, record.country_code.as_deref());
        let by_code = res.is_code_based();
        match index.entry(res.key) {
            Entry::Vacant(slot) => {
                slot.insert((record.price_usd, by_code));
            }
            Entry::Occupied(mut slot) => {
                warn!(key = %slot.key(), country = %record.country, "duplicate price row");
                if by_code && !slot.get().1 {
                    slot.insert((record.price_usd, by_code));
                }
            }
        }
    }
    index.into_iter().map(|(k, (price, _))| (k, price)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapLayer {
    /// World outline, every feature.
    Base,
    /// Features with data, drawn on top.
    Highlight,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub opacity: f64,
}

/// One `<path>` worth of output.
#[derive(Clone, Debug)]
pub struct PathDescriptor {
    pub layer: MapLayer,
    pub feature_id: Option<u16>,
    pub key: Option<CountryKey>,
    pub d: String,
    pub style: PathStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedCountry {
    pub key: CountryKey,
    pub country: String,
    pub share: f64,
    pub price: Option<f64>,
    pub active: bool,
    pub on_map: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub country: String,
    pub share: f64,
    pub price: Option<f64>,
    /// Canvas position for the box, set only while the pointer is on the map.
    pub anchor: Option<(f64, f64)>,
}

/// Output of one render pass.
#[derive(Clone, Debug)]
pub struct MapRender {
    pub width: f64,
    pub height: f64,
    pub paths: Vec<PathDescriptor>,
    pub ranking: Vec<RankedCountry>,
    pub tooltip: Option<Tooltip>,
    pub legend: Legend,
}

impl MapRender {
    pub fn layer(&self, layer: MapLayer) -> impl Iterator<Item = &PathDescriptor> {
        self.paths.iter().filter(move |p| p.layer == layer)
    }
}

#[derive(Clone, Debug)]
struct ScenePath {
    feature_id: Option<u16>,
    key: Option<CountryKey>,
    share: f64,
    path: ProjectedPath,
}

/// A dataset projected for one layout. Projection happens once here;
/// rendering only restyles according to the interaction state.
#[derive(Clone, Debug)]
pub struct MapScene {
    layout: Layout,
    scale: ColorScale,
    top_n: usize,
    base: Vec<ScenePath>,
    overlay: Vec<ScenePath>,
}

impl MapScene {
    pub fn build(dataset: &Dataset<'_>, layout: Layout, options: &MapOptions) -> Self {
        let builder = layout.path_builder();
        let base = dataset
            .geometry()
            .features()
            .iter()
            .filter_map(|f| {
                let Some(path) = builder.build(&f.geometry) else {
                    debug!(id = ?f.numeric_id, name = ?f.name, "degenerate geometry skipped");
                    return None;
                };
                Some(ScenePath { feature_id: f.numeric_id, key: None, share: 0.0, path })
            })
            .collect();

        let overlay = dataset
            .highlighted()
            .iter()
            .filter_map(|h| {
                Some(ScenePath {
                    feature_id: h.feature.numeric_id,
                    key: Some(h.key.clone()),
                    share: h.share,
                    path: builder.build(&h.feature.geometry)?,
                })
            })
            .collect();

        let palette = match layout.kind {
            LayoutKind::Interactive => Palette::Greys,
            LayoutKind::Print => Palette::Blues,
        };

        Self {
            layout,
            scale: dataset.color_scale(palette, options.default_upper_share),
            top_n: options.top_n,
            base,
            overlay,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Key of the highlighted feature under a canvas point; later (upper)
    /// paths win.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&CountryKey> {
        let point = Point::new(x, y);
        self.overlay
            .iter()
            .rev()
            .find(|p| p.path.shape.contains(&point))
            .and_then(|p| p.key.as_ref())
    }

    /// Projected outlines of every feature, for drawing.
    pub fn base_shapes(&self) -> impl Iterator<Item = &ProjectedPath> {
        self.base.iter().map(|p| &p.path)
    }

    /// Projected highlighted features with their keys and shares.
    pub fn highlighted_shapes(&self) -> impl Iterator<Item = (&CountryKey, f64, &ProjectedPath)> {
        self.overlay.iter().filter_map(|p| Some((p.key.as_ref()?, p.share, &p.path)))
    }

    pub fn render(&self, dataset: &Dataset<'_>, state: &InteractionState) -> MapRender {
        let kind = self.layout.kind;
        let mut paths = Vec::with_capacity(self.base.len() + self.overlay.len());

        let base_style = base_style(kind);
        paths.extend(self.base.iter().map(|p| PathDescriptor {
            layer: MapLayer::Base,
            feature_id: p.feature_id,
            key: None,
            d: p.path.d.clone(),
            style: base_style,
        }));

        paths.extend(self.overlay.iter().map(|p| {
            let emphasis = match kind {
                LayoutKind::Interactive => state.emphasis(p.key.as_ref()),
                LayoutKind::Print => Emphasis::Default,
            };
            PathDescriptor {
                layer: MapLayer::Highlight,
                feature_id: p.feature_id,
                key: p.key.clone(),
                d: p.path.d.clone(),
                style: highlight_style(kind, emphasis, &self.scale, p.share),
            }
        }));

        let ranking = dataset
            .ranked(self.top_n)
            .into_iter()
            .map(|e| RankedCountry {
                key: e.key().clone(),
                country: dataset.label(e).to_string(),
                share: e.record.share_percent,
                price: e.price,
                active: state.active() == Some(e.key()),
                on_map: e.on_map,
            })
            .collect();

        let tooltip = state.active().and_then(|key| dataset.entry(key)).map(|e| Tooltip {
            country: dataset.label(e).to_string(),
            share: e.record.share_percent,
            price: e.price,
            anchor: match (state.source(), state.pointer()) {
                (Some(Source::Map), Some((x, y))) => Some((x + TOOLTIP_OFFSET, y + TOOLTIP_OFFSET)),
                _ => None,
            },
        });

        MapRender {
            width: self.layout.width(),
            height: self.layout.height(),
            paths,
            ranking,
            tooltip,
            legend: self.scale.legend(LEGEND_STEPS),
        }
    }
}

fn base_style(kind: LayoutKind) -> PathStyle {
    match kind {
        LayoutKind::Interactive => PathStyle {
            fill: Rgb::hex(0xf1f5f9),
            stroke: Rgb::hex(0xcbd5e1),
            stroke_width: 0.3,
            opacity: 0.75,
        },
        LayoutKind::Print => PathStyle {
            fill: Rgb::hex(0xe2e8f0),
            stroke: Rgb::hex(0xcbd5f5),
            stroke_width: 0.4,
            opacity: 1.0,
        },
    }
}

fn highlight_style(kind: LayoutKind, emphasis: Emphasis, scale: &ColorScale, share: f64) -> PathStyle {
    match (kind, emphasis) {
        (LayoutKind::Print, _) => PathStyle {
            fill: scale.color(share),
            stroke: Rgb::hex(0x1d4ed8),
            stroke_width: 0.8,
            opacity: 0.95,
        },
        (LayoutKind::Interactive, Emphasis::Active) => PathStyle {
            fill: Rgb::BLACK,
            stroke: Rgb::BLACK,
            stroke_width: 1.6,
            opacity: 1.0,
        },
        (LayoutKind::Interactive, Emphasis::Dimmed) => PathStyle {
            fill: Rgb::WHITE,
            stroke: Rgb::hex(0xd4d4d8),
            stroke_width: 0.6,
            opacity: 0.35,
        },
        (LayoutKind::Interactive, Emphasis::Default) => {
            let has_share = share > 0.0;
            PathStyle {
                fill: if has_share { scale.color(share) } else { Rgb::hex(0xf5f5f5) },
                stroke: Rgb::hex(0x525252),
                stroke_width: 0.6,
                opacity: if has_share { 0.9 } else { 0.55 },
            }
        }
    }
}

/// One-shot rendering of a geography/price pair for a layout.
pub fn render(
    geometry: &GeometryIndex,
    geography: &[GeographyRecord],
    prices: &[ContractPriceRecord],
    resolver: &CountryResolver,
    layout: Layout,
    state: &InteractionState,
    options: &MapOptions,
) -> MapRender {
    let dataset = Dataset::new(geometry, geography, prices, resolver);
    MapScene::build(&dataset, layout, options).render(&dataset, state)
}
