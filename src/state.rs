use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::{
    choropleth::{Dataset, MapRender, MapScene},
    config::AppConfig,
    country::CountryKey,
    data::DashboardReport,
    error::Result,
    geometry::{GeometryIndex, WORLD},
    interaction::{Interaction, InteractionState, Source},
    map_draw::cell_to_canvas,
    projection::Layout,
    svg,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel { Left, Center, Right }

pub struct AppState {
    pub config: AppConfig,
    report_path: PathBuf,
    pub report: DashboardReport,
    pub dataset: Dataset<'static>,
    pub scene: MapScene,
    pub interaction: InteractionState,
    /// Row of the ranked list under keyboard focus.
    pub selected: Option<usize>,
    /// Where the map was last drawn, for mouse hit-testing.
    pub map_area: Rect,
    pub active_panel: Panel,
    pub status: String,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
↑/↓: выбор страны
Esc: снять выделение
Tab: смена панели
мышь: наведение на карту
e: экспорт в SVG
r: перечитать отчёт
q: выход";

    pub fn new(config: AppConfig, report_path: &Path) -> Result<Self> {
        let geometry = WORLD.get_or_load(&config.data.world_geometry)?;
        let report = DashboardReport::load(report_path)?;
        Ok(Self::from_parts(config, report_path.to_path_buf(), report, geometry))
    }

    pub fn from_parts(
        config: AppConfig,
        report_path: PathBuf,
        report: DashboardReport,
        geometry: &'static GeometryIndex,
    ) -> Self {
        let (dataset, scene) = build(&config, &report, geometry);
        let status = format!("{} – {} стран", report.product.name, dataset.entries().len());
        Self {
            config,
            report_path,
            report,
            dataset,
            scene,
            interaction: InteractionState::default(),
            selected: None,
            map_area: Rect::default(),
            active_panel: Panel::Left,
            status,
        }
    }

    pub fn render(&self) -> MapRender {
        self.scene.render(&self.dataset, &self.interaction)
    }

    fn ranked_keys(&self) -> Vec<CountryKey> {
        self.dataset.ranked(self.config.map.top_n).into_iter().map(|e| e.key().clone()).collect()
    }

    fn focus_row(&mut self, idx: usize) {
        let keys = self.ranked_keys();
        if let Some(key) = keys.get(idx) {
            self.selected = Some(idx);
            self.interaction.apply(Interaction::RowFocus(key.clone()));
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        use KeyCode::*;
        match key {
            Char('q') => return true,
            Tab => {
                self.active_panel = match self.active_panel {
                    Panel::Left   => Panel::Center,
                    Panel::Center => Panel::Right,
                    Panel::Right  => Panel::Left,
                };
            }
            Up => {
                let idx = self.selected.map_or(0, |i| i.saturating_sub(1));
                self.focus_row(idx);
            }
            Down => {
                let rows = self.ranked_keys().len();
                let idx = self.selected.map_or(0, |i| (i + 1).min(rows.saturating_sub(1)));
                self.focus_row(idx);
            }
            Esc => {
                self.selected = None;
                self.interaction.apply(Interaction::RowBlur);
            }
            Char('e') => self.export(),
            Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if !matches!(event.kind, MouseEventKind::Moved) {
            return;
        }
        let layout = self.scene.layout();
        let hit = cell_to_canvas(self.map_area, event.column, event.row, layout.width(), layout.height())
            .map(|(x, y)| (x, y, self.scene.hit_test(x, y).cloned()));
        let on_map = self.interaction.source() == Some(Source::Map);

        match hit {
            Some((x, y, Some(key))) => {
                if on_map && self.interaction.active() == Some(&key) {
                    self.interaction.apply(Interaction::PointerMove { x, y });
                } else {
                    self.selected = None;
                    self.interaction.apply(Interaction::PointerEnter { key, x, y });
                }
            }
            _ if on_map => self.interaction.apply(Interaction::PointerLeave),
            _ => {}
        }
    }

    pub fn export(&mut self) {
        let svg = svg::render_report(
            &self.report,
            self.dataset.geometry(),
            &self.config.resolver(),
            &self.config.map_options(),
            self.config.export.width,
        );
        let out = &self.config.export.output;
        self.status = match svg::write_report(out, &svg) {
            Ok(()) => format!("Сохранено: {}", out.display()),
            Err(e) => {
                warn!(error = %e, "export failed");
                format!("Ошибка экспорта: {e}")
            }
        };
    }

    /// Reads the report again and rebuilds everything derived from it.
    pub fn reload(&mut self) {
        match DashboardReport::load(&self.report_path) {
            Ok(report) => {
                let (dataset, scene) = build(&self.config, &report, self.dataset.geometry());
                self.report = report;
                self.dataset = dataset;
                self.scene = scene;
                self.interaction.reset();
                self.selected = None;
                self.status = format!("{} – {} стран", self.report.product.name, self.dataset.entries().len());
                info!(path = %self.report_path.display(), "report reloaded");
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping previous report");
                self.status = format!("Ошибка чтения: {e}");
            }
        }
    }
}

fn build(
    config: &AppConfig,
    report: &DashboardReport,
    geometry: &'static GeometryIndex,
) -> (Dataset<'static>, MapScene) {
    let dataset = Dataset::new(geometry, &report.geography, &report.prices, &config.resolver());
    let scene = MapScene::build(&dataset, Layout::interactive(), &config.map_options());
    debug!(highlighted = dataset.highlighted().len(), "scene built");
    (dataset, scene)
}
