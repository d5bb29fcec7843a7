use crate::color::Color;
use crate::options::{MarkerGlyph, PointEstimate};

use serde::Serialize;

/// Outline or filled bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistStyle {
    Step { width: f64 },
    Filled { alpha: f64 },
}

/// Where a bar sits relative to its bin edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinAlign {
    /// bar `[e - 0.5, e + 0.5)` for left edge `e`
    Left,
    /// bar between its edges
    Mid,
}

/// Something drawn in data coordinates of a panel
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line {
        xs: Vec<f64>,
        ys: Vec<f64>,
        color: Color,
        width: f64,
    },
    /// region between `ys` and zero where `mask` holds
    FillBetween {
        xs: Vec<f64>,
        ys: Vec<f64>,
        mask: Vec<bool>,
        color: Color,
        alpha: f64,
    },
    Histogram {
        edges: Vec<f64>,
        counts: Vec<f64>,
        color: Color,
        style: HistStyle,
        align: BinAlign,
    },
    Marker {
        x: f64,
        y: f64,
        glyph: MarkerGlyph,
        face: Color,
        edge: Color,
        size: f64,
    },
}

impl Artist {
    /// `(xmin, xmax, ymin, ymax)` covered by the artist
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Artist::Line { xs, ys, .. } => bounds(xs.iter().copied().zip(ys.iter().copied())),
            Artist::FillBetween { xs, ys, mask, .. } => bounds(
                xs.iter()
                    .zip(ys.iter())
                    .zip(mask.iter())
                    .filter(|(_, &m)| m)
                    .flat_map(|((&x, &y), _)| [(x, y), (x, 0.0)]),
            ),
            Artist::Histogram {
                edges,
                counts,
                align,
                ..
            } => {
                let shift = bar_shift(*align);
                let top = counts.iter().copied().fold(0.0, f64::max);
                let (lo, hi) = (edges.first()?, edges.last()?);
                Some((lo + shift, hi + shift, 0.0, top))
            }
            Artist::Marker { x, y, .. } => Some((*x, *x, *y, *y)),
        }
    }
}

/// Horizontal offset of histogram bars
pub fn bar_shift(align: BinAlign) -> f64 {
    match align {
        BinAlign::Left => -0.5,
        BinAlign::Mid => 0.0,
    }
}

fn bounds<I: Iterator<Item = (f64, f64)>>(points: I) -> Option<(f64, f64, f64, f64)> {
    points
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(None, |acc, (x, y)| match acc {
            None => Some((x, x, y, y)),
            Some((x0, x1, y0, y1)) => Some((x0.min(x), x1.max(x), y0.min(y), y1.max(y))),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: Box<str>,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub font_size: f64,
}

/// Which panel borders are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spines {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Default for Spines {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }
}

/// What got drawn for one dataset in one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub data_label: Box<str>,
    pub color: Color,
    pub kind: TraceKind,
    /// range of the density grid or of the histogram edges
    pub support: (f64, f64),
    pub interval: (f64, f64),
    pub point_estimate: Option<(PointEstimate, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Continuous,
    Discrete,
}

/// One subplot
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Box<str>,
    pub artists: Vec<Artist>,
    pub legend: Option<Legend>,
    pub spines: Spines,
    pub show_y_ticks: bool,
    pub tick_label_size: f64,
    pub summaries: Vec<VariableSummary>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            title: "".into(),
            artists: vec![],
            legend: None,
            spines: Spines::default(),
            show_y_ticks: true,
            tick_label_size: 10.0,
            summaries: vec![],
        }
    }
}

impl Panel {
    /// Union of all artist extents
    pub fn data_limits(&self) -> Option<(f64, f64, f64, f64)> {
        self.artists
            .iter()
            .filter_map(|a| a.extent())
            .reduce(|(a0, a1, a2, a3), (b0, b1, b2, b3)| {
                (a0.min(b0), a1.max(b1), a2.min(b2), a3.max(b3))
            })
    }

    pub fn lines(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Line { .. }))
    }

    pub fn histograms(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Histogram { .. }))
    }
}

/// Panels stacked in one column
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// inches
    pub width: f64,
    /// inches
    pub height: f64,
    pub panels: Vec<Panel>,
    pub tight_layout: bool,
}

impl Figure {
    pub fn new(figsize: (f64, f64), n_panels: usize) -> Self {
        Self {
            width: figsize.0,
            height: figsize.1,
            panels: vec![Panel::default(); n_panels],
            tight_layout: false,
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel_mut(&mut self, i: usize) -> Option<&mut Panel> {
        self.panels.get_mut(i)
    }

    pub fn num_panels(&self) -> usize {
        self.panels.len()
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let px = |inches: f64| ((inches * dpi as f64).round() as u32).max(1);
        (px(self.width), px(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TAB10;

    #[test]
    fn panel_limits_cover_artists() {
        let mut panel = Panel::default();
        panel.artists.push(Artist::Line {
            xs: vec![0.0, 1.0, 2.0],
            ys: vec![0.1, 0.5, 0.2],
            color: TAB10[0],
            width: 1.0,
        });
        panel.artists.push(Artist::Histogram {
            edges: vec![2.0, 3.0, 4.0],
            counts: vec![3.0, 7.0],
            color: TAB10[1],
            style: HistStyle::Step { width: 1.0 },
            align: BinAlign::Left,
        });
        panel.artists.push(Artist::Marker {
            x: 1.0,
            y: -0.001,
            glyph: MarkerGlyph::Circle,
            face: TAB10[0],
            edge: TAB10[0],
            size: 6.0,
        });

        assert_eq!(panel.data_limits(), Some((0.0, 3.5, -0.001, 7.0)));
        assert_eq!(panel.lines().count(), 1);
        assert_eq!(panel.histograms().count(), 1);
    }

    #[test]
    fn pixel_size_rounds() {
        let fig = Figure::new((6.0, 2.5), 1);
        assert_eq!(fig.pixel_size(100), (600, 250));
        assert_eq!(fig.pixel_size(72), (432, 180));
    }
}
