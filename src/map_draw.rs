use geo::MultiPolygon;
use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Context, Line},
    },
};

use crate::choropleth::{MapLayer, MapRender, MapScene};
use crate::country::CountryKey;

/// Draws a map scene in the terminal. Shapes come from the scene and styles
/// from the latest render; both lists are in the same order.
pub struct MapCanvas<'a> {
    scene: &'a MapScene,
    render: &'a MapRender,
    active: Option<&'a CountryKey>,
}

impl<'a> MapCanvas<'a> {
    pub fn new(scene: &'a MapScene, render: &'a MapRender, active: Option<&'a CountryKey>) -> Self {
        Self { scene, render, active }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, block: Block<'_>) {
        let (w, h) = (self.render.width, self.render.height);
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .background_color(Color::White)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(|ctx| {
                // world outline
                for (shape, p) in self.scene.base_shapes().zip(self.render.layer(MapLayer::Base)) {
                    draw_outline(ctx, &shape.shape, h, p.style.stroke.into());
                }
                ctx.layer();
                // countries with data in their scale colour, the active one last
                let highlighted: Vec<_> = self
                    .scene
                    .highlighted_shapes()
                    .zip(self.render.layer(MapLayer::Highlight))
                    .collect();
                let (active, rest): (Vec<_>, Vec<_>) =
                    highlighted.into_iter().partition(|(_, p)| p.key.as_ref() == self.active);
                for ((_, _, shape), p) in rest.into_iter().chain(active) {
                    draw_outline(ctx, &shape.shape, h, p.style.fill.into());
                }
            });
        f.render_widget(canvas, area);
    }
}

// the canvas y axis points up, projected y points down
fn draw_outline(ctx: &mut Context<'_>, shape: &MultiPolygon<f64>, height: f64, color: Color) {
    for poly in &shape.0 {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            for window in ring.0.windows(2) {
                let (a, b) = (window[0], window[1]);
                ctx.draw(&Line { x1: a.x, y1: height - a.y, x2: b.x, y2: height - b.y, color });
            }
            if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
                if first != last {
                    ctx.draw(&Line { x1: last.x, y1: height - last.y, x2: first.x, y2: height - first.y, color });
                }
            }
        }
    }
}

fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Terminal cell inside the bordered map area to canvas coordinates (cell
/// centre), `None` outside the drawing surface.
pub fn cell_to_canvas(area: Rect, column: u16, row: u16, width: f64, height: f64) -> Option<(f64, f64)> {
    let inner = inner(area);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    if column < inner.x || column >= inner.x + inner.width || row < inner.y || row >= inner.y + inner.height {
        return None;
    }
    let x = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width) * width;
    let y = (f64::from(row - inner.y) + 0.5) / f64::from(inner.height) * height;
    Some((x, y))
}

/// Inverse of [`cell_to_canvas`], clamped to the drawing surface.
pub fn canvas_to_cell(area: Rect, x: f64, y: f64, width: f64, height: f64) -> (u16, u16) {
    let inner = inner(area);
    let cell = |v: f64, extent: f64, cells: u16| -> u16 {
        if cells == 0 || extent <= 0.0 || !v.is_finite() {
            return 0;
        }
        ((v / extent * f64::from(cells)).floor().max(0.0) as u16).min(cells - 1)
    };
    (inner.x + cell(x, width, inner.width), inner.y + cell(y, height, inner.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_cells_are_outside_the_canvas() {
        let area = Rect::new(0, 0, 50, 30);
        assert_eq!(cell_to_canvas(area, 0, 5, 480.0, 280.0), None);
        assert_eq!(cell_to_canvas(area, 49, 5, 480.0, 280.0), None);
        assert_eq!(cell_to_canvas(area, 10, 29, 480.0, 280.0), None);
    }

    #[test]
    fn cells_map_to_their_centres() {
        let area = Rect::new(0, 0, 50, 30);
        let (x, y) = cell_to_canvas(area, 1, 1, 480.0, 280.0).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn canvas_points_come_back_to_the_same_cell() {
        let area = Rect::new(10, 4, 50, 30);
        for (col, row) in [(11, 5), (30, 17), (58, 32)] {
            let (x, y) = cell_to_canvas(area, col, row, 480.0, 280.0).unwrap();
            assert_eq!(canvas_to_cell(area, x, y, 480.0, 280.0), (col, row));
        }
        assert_eq!(canvas_to_cell(area, 1e6, -5.0, 480.0, 280.0), (58, 5));
    }
}
