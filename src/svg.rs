//! Static print export: the whole dashboard as one SVG page.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::choropleth::{self, MapLayer, MapOptions, MapRender, PathDescriptor};
use crate::country::CountryResolver;
use crate::data::{DashboardReport, MetricPoint};
use crate::error::{AtlasError, Result};
use crate::format::{format_number, format_optional_usd, format_percent};
use crate::geometry::GeometryIndex;
use crate::interaction::InteractionState;
use crate::projection::Layout;
use crate::scale::Legend;

/// A4 width at 96 dpi.
pub const PAGE_WIDTH: f64 = 794.0;
const MARGIN: f64 = 48.0;
const GAP: f64 = 28.0;
const LINE: f64 = 18.0;
const BAR_HEIGHT: f64 = 6.0;
const LEGEND_WIDTH: f64 = 180.0;

const INK: &str = "#0f172a";
const MUTED: &str = "#64748b";
const RULE: &str = "#e2e8f0";
const BAR_BG: &str = "#f1f5f9";
const BAR_FG: &str = "#38bdf8";

/// Escapes text for element content and attribute values.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Page {
    body: String,
    width: f64,
    y: f64,
}

impl Page {
    fn new(width: f64) -> Self {
        Self { body: String::new(), width, y: MARGIN }
    }

    fn content_width(&self) -> f64 {
        self.width - 2.0 * MARGIN
    }

    fn text(&mut self, size: f64, weight: u16, fill: &str, content: &str) {
        self.y += size;
        let _ = writeln!(
            self.body,
            r#"<text x="{MARGIN}" y="{:.1}" font-size="{size}" font-weight="{weight}" fill="{fill}">{}</text>"#,
            self.y,
            esc(content)
        );
        self.y += LINE - size * 0.5;
    }

    fn heading(&mut self, content: &str) {
        self.text(16.0, 600, INK, content);
        self.y += 4.0;
    }

    fn rule(&mut self) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{MARGIN}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{RULE}"/>"#,
            y = self.y,
            x2 = self.width - MARGIN
        );
    }

    fn gap(&mut self) {
        self.y += GAP;
    }

    fn finish(self) -> String {
        let height = (self.y + MARGIN).ceil();
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
                "\n",
                r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##,
                "\n{body}</svg>\n"
            ),
            w = self.width,
            h = height,
            body = self.body
        )
    }
}

fn header(page: &mut Page, report: &DashboardReport) {
    page.text(10.0, 600, "#0284c7", "ОТЧЁТ ОБ ИМПОРТЕ");
    page.text(22.0, 600, INK, &format!("{} · {}", report.product.name, report.product.code));
    page.text(12.0, 400, MUTED, &format!("Организация: {}", report.organization.name));
    if let Some(inn) = report.organization.inn.as_deref() {
        page.text(11.0, 400, MUTED, &format!("ИНН: {inn}"));
    }
    if let Some(url) = report.share_url.as_deref() {
        page.text(11.0, 400, MUTED, &format!("Просмотрите отчёт онлайн по ссылке: {url}"));
    }
    page.y += 8.0;
    page.rule();
}

fn tariffs(page: &mut Page, report: &DashboardReport) {
    let t = &report.tariffs;
    page.heading("Тарифное регулирование");
    page.text(12.0, 400, INK, &format!("Текущая ставка: {}", format_percent(t.current)));
    page.text(12.0, 400, INK, &format!("Обязательство ВТО: {}", format_percent(t.wto_obligation)));
    page.text(
        12.0,
        600,
        if t.is_above_wto() { "#059669" } else { "#d97706" },
        &format!("{}, отклонение {}", t.wto_label(), format_percent(t.delta().abs())),
    );
}

fn metric_cell(p: &MetricPoint) -> String {
    format!("{}: {} (Δ {})", p.year, format_number(p.value, 2), format_percent(p.change_percent))
}

fn metrics(page: &mut Page, report: &DashboardReport) {
    let m = &report.metrics;
    let rows = [("Импорт", &m.import_data), ("Производство", &m.production), ("Потребление", &m.consumption)];
    if rows.iter().all(|(_, points)| points.is_empty()) {
        return;
    }
    page.heading("Динамика показателей");
    for (label, points) in rows {
        let cells: Vec<String> = points.iter().map(metric_cell).collect();
        let line = if cells.is_empty() { "—".to_string() } else { cells.join("; ") };
        page.text(11.0, 400, INK, &format!("{label}: {line}"));
    }
}

fn path_element(out: &mut String, p: &PathDescriptor) {
    out.push_str("<path");
    if let Some(id) = p.feature_id {
        let _ = write!(out, r#" data-id="{id:03}""#);
    }
    if let Some(key) = &p.key {
        let _ = write!(out, r#" data-country="{}""#, esc(&key.to_string()));
    }
    let _ = writeln!(
        out,
        r#" d="{}" fill="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
        p.d, p.style.fill, p.style.stroke, p.style.stroke_width, p.style.opacity
    );
}

// horizontal ramp with the domain ends underneath
fn legend(page: &mut Page, legend: &Legend) {
    let last = legend.ramp.len().saturating_sub(1).max(1) as f64;
    page.body.push_str(r#"<defs><linearGradient id="legend-ramp">"#);
    for (i, color) in legend.ramp.iter().enumerate() {
        let _ = write!(page.body, r#"<stop offset="{:.2}" stop-color="{color}"/>"#, i as f64 / last);
    }
    page.body.push_str("</linearGradient></defs>\n");
    let _ = writeln!(
        page.body,
        r#"<rect x="{MARGIN}" y="{:.1}" width="{LEGEND_WIDTH}" height="{}" rx="3" fill="url(#legend-ramp)"/>"#,
        page.y,
        BAR_HEIGHT + 4.0
    );
    page.y += BAR_HEIGHT + 4.0 + 12.0;
    let _ = writeln!(
        page.body,
        r#"<text x="{MARGIN}" y="{y:.1}" font-size="10" fill="{MUTED}">{}</text><text x="{:.1}" y="{y:.1}" font-size="10" fill="{MUTED}" text-anchor="end">{}</text>"#,
        esc(&legend.low),
        MARGIN + LEGEND_WIDTH,
        esc(&legend.high),
        y = page.y
    );
    page.y += LINE - 6.0;
}

fn map(page: &mut Page, render: &MapRender) {
    page.heading("Карта импорта");
    page.text(10.0, 400, MUTED, "Чем интенсивнее оттенок, тем выше доля страны в поставках.");
    page.y += 6.0;
    let _ = writeln!(page.body, r#"<g transform="translate({MARGIN},{:.1})">"#, page.y);
    let _ = writeln!(
        page.body,
        r##"<rect width="{:.1}" height="{:.1}" rx="12" fill="#eff6ff"/>"##,
        render.width, render.height
    );
    for layer in [MapLayer::Base, MapLayer::Highlight] {
        page.body.push_str("<g>\n");
        for p in render.layer(layer) {
            path_element(&mut page.body, p);
        }
        page.body.push_str("</g>\n");
    }
    page.body.push_str("</g>\n");
    page.y += render.height + 10.0;
    legend(page, &render.legend);
}

fn leaders(page: &mut Page, render: &MapRender) {
    page.heading("Лидирующие страны");
    if render.ranking.is_empty() {
        page.text(11.0, 400, MUTED, "Нет данных о поставках");
        return;
    }
    let full = page.content_width();
    for row in &render.ranking {
        page.text(12.0, 600, INK, &row.country);
        page.text(
            10.0,
            400,
            MUTED,
            &format!("Доля: {}   СКЦ: {}", format_percent(row.share), format_optional_usd(row.price)),
        );
        let filled = full * row.share.clamp(0.0, 1.0);
        let _ = writeln!(
            page.body,
            r#"<rect x="{MARGIN}" y="{y:.1}" width="{full:.1}" height="{BAR_HEIGHT}" rx="3" fill="{BAR_BG}"/><rect x="{MARGIN}" y="{y:.1}" width="{filled:.1}" height="{BAR_HEIGHT}" rx="3" fill="{BAR_FG}"/>"#,
            y = page.y
        );
        page.y += BAR_HEIGHT + 10.0;
    }
}

fn recommendations(page: &mut Page, report: &DashboardReport) {
    if report.recommendations.is_empty() {
        return;
    }
    page.heading("Рекомендации по мерам поддержки");
    for rec in &report.recommendations {
        page.text(12.0, 600, INK, &rec.name);
        for reason in &rec.reasons {
            page.text(10.0, 400, MUTED, &format!("• {reason}"));
        }
        for case in &rec.similar_cases {
            page.text(10.0, 400, MUTED, &format!("Пример: {}", case.description));
        }
    }
}

/// Renders the print page `page_width` units wide. The map uses the print
/// layout fitted to the content column and ignores any interaction.
pub fn render_report(
    report: &DashboardReport,
    geometry: &GeometryIndex,
    resolver: &CountryResolver,
    options: &MapOptions,
    page_width: f64,
) -> String {
    let width = if page_width.is_finite() && page_width > 2.0 * MARGIN { page_width } else { PAGE_WIDTH };
    let mut page = Page::new(width);
    let render = choropleth::render(
        geometry,
        &report.geography,
        &report.prices,
        resolver,
        Layout::print(page.content_width()),
        &InteractionState::default(),
        options,
    );

    header(&mut page, report);
    page.gap();
    tariffs(&mut page, report);
    page.gap();
    metrics(&mut page, report);
    page.gap();
    map(&mut page, &render);
    page.gap();
    leaders(&mut page, &render);
    page.gap();
    recommendations(&mut page, report);
    page.finish()
}

pub fn write_report<P: AsRef<Path>>(path: P, svg: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, svg).map_err(|e| AtlasError::io(path, e))?;
    info!(path = %path.display(), bytes = svg.len(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::geometry::fixtures::world;

    fn export(report: &DashboardReport) -> String {
        render_report(report, &world(), &CountryResolver::default(), &MapOptions::default(), PAGE_WIDTH)
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(esc(r#"A & B <"c">"#), "A &amp; B &lt;&quot;c&quot;&gt;");
    }

    #[test]
    fn page_has_fixed_width_and_all_sections() {
        let svg = export(&fixtures::report());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="794""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Насосы центробежные · 8413702100"));
        assert!(svg.contains("Ниже уровня ВТО"));
        assert!(svg.contains("https://example.org/d/42"));
        assert!(svg.contains("Субсидия на НИОКР"));
        assert!(svg.contains("1\u{a0}200\u{a0}$"));
        // four base outlines plus China and Belarus
        assert_eq!(svg.matches("<path ").count(), 6);
        assert!(svg.contains(r##"stroke="#1d4ed8""##));
    }

    #[test]
    fn map_has_a_legend_up_to_the_largest_share() {
        let svg = export(&fixtures::report());
        assert!(svg.contains(r#"fill="url(#legend-ramp)""#));
        assert_eq!(svg.matches("<stop ").count(), 5);
        assert!(svg.contains(">0\u{a0}%</text>"));
        assert!(svg.contains(">62\u{a0}%</text>"));
        assert!(svg.contains(r#"<path data-id="156" data-country="CN" "#));

        let mut empty = fixtures::report();
        empty.geography.clear();
        assert!(export(&empty).contains(">100\u{a0}%</text>"));
    }

    #[test]
    fn missing_price_shows_a_dash_and_unmatched_rows_are_listed() {
        let svg = export(&fixtures::report());
        assert!(svg.contains("СКЦ: —"));
        assert!(svg.contains("Атлантида"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut report = fixtures::report();
        report.organization.name = "ООО <Рога & Копыта>".into();
        let svg = export(&report);
        assert!(svg.contains("ООО &lt;Рога &amp; Копыта&gt;"));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.svg");
        write_report(&path, "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<svg/>");
    }
}
