use std::fmt;

use serde::Deserialize;

use crate::format::format_percent;

/// Upper bound of the share domain when the data gives none (no records,
/// or every share is zero).
pub const DEFAULT_UPPER_SHARE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    pub const fn hex(v: u32) -> Rgb {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.0, c.1, c.2)
    }
}

const BLUES: [Rgb; 9] = [
    Rgb::hex(0xf7fbff),
    Rgb::hex(0xdeebf7),
    Rgb::hex(0xc6dbef),
    Rgb::hex(0x9ecae1),
    Rgb::hex(0x6baed6),
    Rgb::hex(0x4292c6),
    Rgb::hex(0x2171b5),
    Rgb::hex(0x08519c),
    Rgb::hex(0x08306b),
];

const GREYS: [Rgb; 2] = [Rgb::WHITE, Rgb::BLACK];

/// Colour ramps, light to dark. Every channel is non-increasing along a ramp,
/// so a larger share can never come out lighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Greys,
    Blues,
}

impl Palette {
    fn stops(self) -> &'static [Rgb] {
        match self {
            Palette::Greys => &GREYS,
            Palette::Blues => &BLUES,
        }
    }

    /// Colour at position `t` in [0, 1].
    pub fn at(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (stops.len() - 1) as f64;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        stops[i].lerp(stops[i + 1], pos - i as f64)
    }
}

/// Choropleth scale over `[0, upper]`, clamped at both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    upper: f64,
    palette: Palette,
}

impl ColorScale {
    /// Domain upper bound is the largest observed share, or `fallback_upper`
    /// when there is nothing positive to observe.
    pub fn from_shares<I>(shares: I, palette: Palette, fallback_upper: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let max = shares
            .into_iter()
            .filter(|s| s.is_finite())
            .fold(0.0_f64, f64::max);
        let fallback = if fallback_upper.is_finite() && fallback_upper > 0.0 {
            fallback_upper
        } else {
            DEFAULT_UPPER_SHARE
        };
        let upper = if max > 0.0 { max } else { fallback };
        Self { upper, palette }
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Position of a share within the domain, in [0, 1].
    pub fn intensity(&self, share: f64) -> f64 {
        if share.is_nan() {
            return 0.0;
        }
        (share / self.upper).clamp(0.0, 1.0)
    }

    pub fn color(&self, share: f64) -> Rgb {
        self.palette.at(self.intensity(share))
    }

    /// `steps` evenly spaced ramp colours (at least two) with the domain
    /// ends as labels.
    pub fn legend(&self, steps: usize) -> Legend {
        let last = steps.max(2) - 1;
        Legend {
            low: format_percent(0.0),
            high: format_percent(self.upper()),
            ramp: (0..=last).map(|i| self.palette.at(i as f64 / last as f64)).collect(),
        }
    }
}

/// Colour key shown next to a map.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub low: String,
    pub high: String,
    /// Light to dark.
    pub ramp: Vec<Rgb>,
}
