use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::choropleth::{MapRender, Tooltip};
use crate::data::{DashboardReport, MetricPoint};
use crate::format::{format_number, format_optional_usd, format_percent, sparkline};
use crate::map_draw::{MapCanvas, canvas_to_cell};
use crate::scale::Legend;
use crate::state::{AppState, Panel};

fn block<'a>(title: impl Into<Line<'a>>, active: bool) -> Block<'a> {
    let style = if active { Style::default().fg(Color::Yellow) } else { Style::default() };
    Block::default().borders(Borders::ALL).title(title).border_style(style)
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ].as_ref())
        .split(f.area());

    let render = state.render();

    // left: country ranking
    draw_ranking(f, chunks[0], &render, state.active_panel == Panel::Left);

    // centre: map, legend in the title
    state.map_area = chunks[1];
    let title = map_title(
        format!("Импорт: {} · {}", state.report.product.name, state.report.product.code),
        &render.legend,
    );
    MapCanvas::new(&state.scene, &render, state.interaction.active())
        .draw(f, chunks[1], block(title, state.active_panel == Panel::Center));
    if let Some(tip) = &render.tooltip {
        draw_tooltip(f, chunks[1], &render, tip);
    }

    // right: info, tariff, trends, recommendations
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ].as_ref())
        .split(chunks[2]);
    let right_active = state.active_panel == Panel::Right;

    let info_text = match &render.tooltip {
        Some(tip) => tooltip_text(tip),
        None => format!("{}\n\n{}", state.status, AppState::HELP_TEXT),
    };
    let info = Paragraph::new(info_text)
        .block(block("Информация", right_active))
        .wrap(Wrap { trim: true });
    f.render_widget(info, right[0]);

    let tariff = Paragraph::new(tariff_text(&state.report))
        .block(block("Тарифное регулирование", right_active))
        .wrap(Wrap { trim: true });
    f.render_widget(tariff, right[1]);

    let trends = Paragraph::new(trends_text(&state.report))
        .block(block("Динамика показателей", right_active))
        .wrap(Wrap { trim: true });
    f.render_widget(trends, right[2]);

    let recs = Paragraph::new(recommendations_text(&state.report))
        .block(block("Рекомендации", right_active))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    f.render_widget(recs, right[3]);
}

fn map_title<'a>(title: String, legend: &Legend) -> Line<'a> {
    let mut spans = vec![Span::raw(title), Span::raw("  "), Span::raw(legend.low.clone()), Span::raw(" ")];
    spans.extend(legend.ramp.iter().map(|&c| Span::styled("█", Style::default().fg(c.into()))));
    spans.push(Span::raw(" "));
    spans.push(Span::raw(legend.high.clone()));
    Line::from(spans)
}

fn draw_ranking(f: &mut Frame, area: Rect, render: &MapRender, active: bool) {
    let items: Vec<ListItem> = render
        .ranking
        .iter()
        .map(|row| {
            let mut line = format!("{}  {}  {}", row.country, format_percent(row.share), format_optional_usd(row.price));
            if !row.on_map {
                line.push_str("  (нет на карте)");
            }
            ListItem::new(line)
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(render.ranking.iter().position(|r| r.active));
    let list = List::new(items)
        .block(block("Лидирующие страны", active))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn tooltip_text(tip: &Tooltip) -> String {
    format!(
        "{}\nДоля: {}\nСКЦ: {}",
        tip.country,
        format_percent(tip.share),
        format_optional_usd(tip.price)
    )
}

fn draw_tooltip(f: &mut Frame, map_area: Rect, render: &MapRender, tip: &Tooltip) {
    let Some((x, y)) = tip.anchor else { return };
    let (col, row) = canvas_to_cell(map_area, x, y, render.width, render.height);
    let text = tooltip_text(tip);
    let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
    let height = text.lines().count() as u16 + 2;
    // keep the box inside the map
    let x = col.min((map_area.x + map_area.width).saturating_sub(width)).max(map_area.x);
    let y = row.min((map_area.y + map_area.height).saturating_sub(height)).max(map_area.y);
    let area = Rect::new(x, y, width.min(map_area.width), height.min(map_area.height));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL)), area);
}

fn tariff_text(report: &DashboardReport) -> String {
    let t = &report.tariffs;
    format!(
        "Текущая ставка: {}\nОбязательство ВТО: {}\n{} (отклонение {})",
        format_percent(t.current),
        format_percent(t.wto_obligation),
        t.wto_label(),
        format_percent(t.delta().abs())
    )
}

fn trend_line(label: &str, points: &[MetricPoint]) -> String {
    let Some(last) = points.last() else {
        return format!("{label}: нет данных");
    };
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    format!(
        "{label}: {} {} ({}, Δ {})",
        sparkline(&values),
        format_number(last.value, 2),
        last.year,
        format_percent(last.change_percent)
    )
}

fn trends_text(report: &DashboardReport) -> String {
    let m = &report.metrics;
    [
        trend_line("Импорт", &m.import_data),
        trend_line("Производство", &m.production),
        trend_line("Потребление", &m.consumption),
    ]
    .join("\n")
}

fn recommendations_text(report: &DashboardReport) -> String {
    let mut out: Vec<String> = report.recommendations.iter().map(|r| format!("• {}", r.name)).collect();
    if out.is_empty() {
        out.push("Нет рекомендаций".to_string());
    }
    if let Some(url) = report.share_url.as_deref() {
        out.push(String::new());
        out.push(format!("Ссылка: {url}"));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::fixtures::report;
    use crate::geometry::{GeometryIndex, fixtures::world};
    use crossterm::event::KeyCode;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::path::PathBuf;

    fn screen(state: &mut AppState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| draw(f, state)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn trend_shows_latest_point() {
        let r = report();
        assert_eq!(
            trend_line("Импорт", &r.metrics.import_data),
            "Импорт: ▁█ 1\u{a0}500 (2023, Δ 25\u{a0}%)"
        );
        assert_eq!(trend_line("Потребление", &r.metrics.consumption), "Потребление: нет данных");
    }

    #[test]
    fn side_panels_carry_tariff_and_link() {
        let r = report();
        assert!(tariff_text(&r).contains("Ниже уровня ВТО (отклонение 2,5\u{a0}%)"));
        let recs = recommendations_text(&r);
        assert!(recs.starts_with("• Субсидия на НИОКР"));
        assert!(recs.ends_with("Ссылка: https://example.org/d/42"));
    }

    #[test]
    fn map_title_carries_the_legend() {
        let geometry: &'static GeometryIndex = Box::leak(Box::new(world()));
        let mut state = AppState::from_parts(AppConfig::default(), PathBuf::from("unused.json"), report(), geometry);
        let buf = screen(&mut state);
        let top = row_text(&buf, 0);
        assert!(top.contains("Импорт: Насосы центробежные"));
        assert!(top.contains("0\u{a0}% █████ 62\u{a0}%"), "{top}");
    }

    #[test]
    fn focused_map_panel_gets_the_highlight_border() {
        let geometry: &'static GeometryIndex = Box::leak(Box::new(world()));
        let mut state = AppState::from_parts(AppConfig::default(), PathBuf::from("unused.json"), report(), geometry);
        let map_corner: (u16, u16) = (40, 0);

        let buf = screen(&mut state);
        assert_eq!(buf[(0u16, 0u16)].fg, Color::Yellow);
        assert_ne!(buf[map_corner].fg, Color::Yellow);

        state.handle_input(KeyCode::Tab);
        assert_eq!(state.active_panel, Panel::Center);
        let buf = screen(&mut state);
        assert_eq!(buf[map_corner].fg, Color::Yellow);
        assert_ne!(buf[(0u16, 0u16)].fg, Color::Yellow);
        assert!(AppState::HELP_TEXT.contains("Tab"));
    }
}
