//! Fixed Mercator projection onto the logical map canvas and SVG path
//! generation. Both the terminal view and the print export go through here,
//! so they draw the same map.

use std::fmt::Write as _;

use geo::{Coord, LineString, MultiPolygon, Polygon};

/// Logical canvas every map layout is derived from.
pub const CANVAS_WIDTH: f64 = 480.0;
pub const CANVAS_HEIGHT: f64 = 280.0;

const MERCATOR_SCALE: f64 = 120.0;
const MERCATOR_TRANSLATE: (f64, f64) = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 1.75);

// Web Mercator cut-off; the poles would project to infinity.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
    scale: f64,
    translate: (f64, f64),
}

impl Mercator {
    pub const fn standard() -> Self {
        Self { scale: MERCATOR_SCALE, translate: MERCATOR_TRANSLATE }
    }

    /// Same projection, uniformly enlarged or shrunk by `k`.
    pub fn zoomed(self, k: f64) -> Self {
        Self { scale: self.scale * k, translate: (self.translate.0 * k, self.translate.1 * k) }
    }

    /// Lon/lat in degrees to canvas x/y (y grows downwards, as in SVG).
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let lambda = lon.to_radians();
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let y = (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln();
        Some((self.scale * lambda + self.translate.0, self.translate.1 - self.scale * y))
    }
}

/// Which of the two dashboard renderings a map is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Interactive,
    Print,
}

/// A canvas size plus the projection fitted to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub kind: LayoutKind,
    zoom: f64,
}

impl Layout {
    pub fn interactive() -> Self {
        Self { kind: LayoutKind::Interactive, zoom: 1.0 }
    }

    /// Print layout `width` units wide; the height follows the canvas ratio.
    pub fn print(width: f64) -> Self {
        let zoom = if width.is_finite() && width > 0.0 { width / CANVAS_WIDTH } else { 1.0 };
        Self { kind: LayoutKind::Print, zoom }
    }

    pub fn width(&self) -> f64 {
        CANVAS_WIDTH * self.zoom
    }

    pub fn height(&self) -> f64 {
        CANVAS_HEIGHT * self.zoom
    }

    pub fn projection(&self) -> Mercator {
        Mercator::standard().zoomed(self.zoom)
    }

    pub fn path_builder(&self) -> PathBuilder {
        PathBuilder::new(self.projection())
    }
}

/// Geometry projected to canvas coordinates, plus its SVG path data.
#[derive(Clone, Debug)]
pub struct ProjectedPath {
    pub d: String,
    pub shape: MultiPolygon<f64>,
}

#[derive(Clone, Copy, Debug)]
pub struct PathBuilder {
    projection: Mercator,
}

impl PathBuilder {
    pub fn new(projection: Mercator) -> Self {
        Self { projection }
    }

    /// `None` when nothing drawable is left after projection.
    pub fn build(&self, geometry: &MultiPolygon<f64>) -> Option<ProjectedPath> {
        let shape = self.project(geometry)?;
        Some(ProjectedPath { d: svg_path(&shape), shape })
    }

    pub fn project(&self, geometry: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
        let polygons: Vec<Polygon<f64>> = geometry
            .0
            .iter()
            .filter_map(|poly| {
                let exterior = self.project_ring(poly.exterior())?;
                let interiors = poly.interiors().iter().filter_map(|r| self.project_ring(r)).collect();
                Some(Polygon::new(exterior, interiors))
            })
            .collect();
        if polygons.is_empty() { None } else { Some(MultiPolygon(polygons)) }
    }

    fn project_ring(&self, ring: &LineString<f64>) -> Option<LineString<f64>> {
        let mut out: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
        for c in &ring.0 {
            let (x, y) = self.projection.project(c.x, c.y)?;
            if out.last().is_some_and(|p: &Coord<f64>| p.x == x && p.y == y) {
                continue;
            }
            out.push(Coord { x, y });
        }
        if out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        if out.len() < 3 {
            return None;
        }
        Some(LineString::new(out))
    }
}

/// SVG path data: one `M…L…Z` subpath per ring, two decimals.
pub fn svg_path(shape: &MultiPolygon<f64>) -> String {
    let mut d = String::new();
    for poly in &shape.0 {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            for (i, c) in ring.0.iter().enumerate() {
                // polygon rings are closed; the repeated first point becomes Z
                if i > 0 && i + 1 == ring.0.len() && ring.0.first() == Some(c) {
                    continue;
                }
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{:.2},{:.2}", c.x, c.y);
            }
            d.push('Z');
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(lon: f64, lat: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: lon, y: lat),
            (x: lon + size, y: lat),
            (x: lon + size, y: lat + size),
            (x: lon, y: lat + size),
        ]])
    }

    #[test]
    fn origin_lands_on_translate() {
        let (x, y) = Mercator::standard().project(0.0, 0.0).unwrap();
        assert!((x - 240.0).abs() < 1e-9);
        assert!((y - 160.0).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let m = Mercator::standard();
        let (x0, y0) = m.project(0.0, 0.0).unwrap();
        let (x1, y1) = m.project(30.0, 50.0).unwrap();
        assert!(x1 > x0);
        assert!(y1 < y0);
    }

    #[test]
    fn poles_are_clamped() {
        let (_, y) = Mercator::standard().project(0.0, -90.0).unwrap();
        assert!(y.is_finite());
        assert!(Mercator::standard().project(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn path_data_is_closed_svg() {
        let path = Layout::interactive().path_builder().build(&square(0.0, 0.0, 10.0)).unwrap();
        assert!(path.d.starts_with("M240.00,160.00L"));
        assert_eq!(path.d.matches('L').count(), 3);
        assert!(path.d.ends_with('Z'));
    }

    #[test]
    fn degenerate_geometry_yields_no_path() {
        let builder = Layout::interactive().path_builder();
        let flat = MultiPolygon(vec![polygon![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 1.0)]]);
        assert!(builder.build(&flat).is_none());
        let broken = square(f64::NAN, 0.0, 1.0);
        assert!(builder.build(&broken).is_none());
        assert!(builder.build(&MultiPolygon(vec![])).is_none());
    }

    #[test]
    fn print_layout_is_a_uniform_scaling() {
        let geom = square(20.0, 40.0, 15.0);
        let screen = Layout::interactive().path_builder().project(&geom).unwrap();
        let print_layout = Layout::print(360.0);
        let print = print_layout.path_builder().project(&geom).unwrap();
        let k = print_layout.width() / CANVAS_WIDTH;
        assert_eq!(k, 0.75);
        for (a, b) in screen.0[0].exterior().0.iter().zip(print.0[0].exterior().0.iter()) {
            assert!((a.x * k - b.x).abs() < 1e-9);
            assert!((a.y * k - b.y).abs() < 1e-9);
        }
    }
}
