use crate::color;
use crate::figure::{bar_shift, Artist, Figure, HistStyle, Panel};
use crate::options::MarkerGlyph;
use crate::style::PlotStyle;

use log::info;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

type DensityChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

///
/// Render a figure to `.svg` or `.png`
///
/// * `fig` - panels to draw
/// * `style` - background, font family and dpi
/// * `output_file` - the extension picks the backend
///
pub fn save_figure(fig: &Figure, style: &PlotStyle, output_file: &str) -> anyhow::Result<()> {
    if fig.num_panels() == 0 {
        return Err(anyhow::anyhow!("nothing to draw"));
    }

    let size = fig.pixel_size(style.dpi);
    let ext = Path::new(output_file)
        .extension()
        .and_then(|x| x.to_str())
        .map(|x| x.to_ascii_lowercase());

    match ext.as_deref() {
        Some("svg") => {
            let root = SVGBackend::new(output_file, size).into_drawing_area();
            draw_figure(&root, fig, style)?;
        }
        Some("png") => {
            let root = BitMapBackend::new(output_file, size).into_drawing_area();
            draw_figure(&root, fig, style)?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unsupported figure format: {} (use .svg or .png)",
                output_file
            ));
        }
    }

    info!(
        "wrote {} panels ({} x {} px) to {}",
        fig.num_panels(),
        size.0,
        size.1,
        output_file
    );
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
    style: &PlotStyle,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&rgb(style.background))?;

    let areas = root.split_evenly((fig.num_panels(), 1));
    let margin = if fig.tight_layout { 5 } else { 20 };

    for (panel, area) in fig.panels().iter().zip(areas.iter()) {
        draw_panel(area, panel, style, margin)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &PlotStyle,
    margin: u32,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let px = style.dpi as f64 / 72.0;
    let family = style.font_family.as_str();
    let tick_px = (panel.tick_label_size * px).max(1.0);

    let (x0, x1, y0, y1) = panel.data_limits().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let (x0, x1) = pad_range(x0, x1, 0.05);
    let (y0, y1) = pad_range(y0, y1, 0.05);

    let title = panel.title.replace('\n', " ");
    let y_area = if panel.show_y_ticks {
        (tick_px * 4.0) as u32
    } else {
        0
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, (family, tick_px).into_font())
        .margin(margin)
        .x_label_area_size((tick_px * 2.0) as u32)
        .y_label_area_size(y_area)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .label_style((family, tick_px).into_font())
        .axis_style(BLACK.stroke_width(1));
    if !panel.spines.bottom {
        mesh.disable_x_axis();
    }
    if !panel.spines.left || !panel.show_y_ticks {
        mesh.disable_y_axis();
    }
    mesh.draw()?;

    if panel.spines.top {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, y1), (x1, y1)],
            BLACK.stroke_width(1),
        )))?;
    }
    if panel.spines.right {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x1, y0), (x1, y1)],
            BLACK.stroke_width(1),
        )))?;
    }

    for artist in panel.artists.iter() {
        draw_artist(&mut chart, artist, px)?;
    }

    if let Some(legend) = panel.legend.as_ref() {
        for entry in legend.entries.iter() {
            let c = rgb(entry.color);
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                .label(entry.label.to_string())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], c.filled()));
        }
        chart
            .configure_series_labels()
            .label_font((family, (legend.font_size * px).max(1.0)).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    Ok(())
}

fn draw_artist<DB: DrawingBackend>(
    chart: &mut DensityChart<'_, DB>,
    artist: &Artist,
    px: f64,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    match artist {
        Artist::Line {
            xs,
            ys,
            color,
            width,
        } => {
            let points = xs.iter().copied().zip(ys.iter().copied());
            chart.draw_series(LineSeries::new(
                points,
                rgb(*color).stroke_width(stroke_px(*width, px)),
            ))?;
        }
        Artist::FillBetween {
            xs,
            ys,
            mask,
            color,
            alpha,
        } => {
            let fill = rgb(*color).mix(*alpha).filled();
            for (start, end) in contiguous_runs(mask) {
                let mut points: Vec<(f64, f64)> = (start..end).map(|i| (xs[i], ys[i])).collect();
                points.extend((start..end).rev().map(|i| (xs[i], 0.0)));
                chart.draw_series(std::iter::once(Polygon::new(points, fill)))?;
            }
        }
        Artist::Histogram {
            edges,
            counts,
            color,
            style,
            align,
        } => {
            let shift = bar_shift(*align);
            match style {
                HistStyle::Step { width } => {
                    chart.draw_series(std::iter::once(PathElement::new(
                        step_outline(edges, counts, shift),
                        rgb(*color).stroke_width(stroke_px(*width, px)),
                    )))?;
                }
                HistStyle::Filled { alpha } => {
                    let fill = rgb(*color).mix(*alpha).filled();
                    chart.draw_series(edges.windows(2).zip(counts.iter()).map(|(e, &c)| {
                        Rectangle::new([(e[0] + shift, 0.0), (e[1] + shift, c)], fill)
                    }))?;
                }
            }
        }
        Artist::Marker {
            x,
            y,
            glyph,
            face,
            edge,
            size,
        } => {
            let r = ((size * px) / 2.0).round().max(1.0) as i32;
            let at = (*x, *y);
            let (face, edge) = (rgb(*face), rgb(*edge));
            match glyph_outline(*glyph, r) {
                Glyph::Round => {
                    chart.draw_series(std::iter::once(
                        EmptyElement::at(at)
                            + Circle::new((0, 0), r, face.filled())
                            + Circle::new((0, 0), r, edge.stroke_width(1)),
                    ))?;
                }
                Glyph::Closed(points) => {
                    let mut ring = points.clone();
                    ring.extend(points.first().copied());
                    chart.draw_series(std::iter::once(
                        EmptyElement::at(at)
                            + Polygon::new(points, face.filled())
                            + PathElement::new(ring, edge.stroke_width(1)),
                    ))?;
                }
                Glyph::Strokes(segments) => {
                    let stroke = face.stroke_width(2);
                    chart.draw_series(
                        segments
                            .into_iter()
                            .map(|seg| EmptyElement::at(at) + PathElement::new(seg, stroke)),
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn rgb(c: color::Color) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Line width in points to whole pixels
fn stroke_px(width: f64, px: f64) -> u32 {
    (width * px).round().max(1.0) as u32
}

/// Widen `[lo, hi]` by `frac` of its width on both sides; a single
/// point gets a unit window
fn pad_range(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    let w = hi - lo;
    if w > 0.0 && w.is_finite() {
        (lo - frac * w, hi + frac * w)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Half-open index ranges where `mask` is true
fn contiguous_runs(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = vec![];
    let mut start = None;
    for (i, &m) in mask.iter().enumerate() {
        match (m, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, mask.len()));
    }
    runs
}

/// Outline of a step histogram, from the baseline back to the baseline
fn step_outline(edges: &[f64], counts: &[f64], shift: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(2 * counts.len() + 2);
    if let Some(&e0) = edges.first() {
        points.push((e0 + shift, 0.0));
    }
    for (e, &c) in edges.windows(2).zip(counts.iter()) {
        points.push((e[0] + shift, c));
        points.push((e[1] + shift, c));
    }
    if let Some(&(x, _)) = points.last() {
        points.push((x, 0.0));
    }
    points
}

/// Marker shapes in pixel offsets; screen y grows downwards
enum Glyph {
    Round,
    Closed(Vec<(i32, i32)>),
    Strokes(Vec<Vec<(i32, i32)>>),
}

fn glyph_outline(glyph: MarkerGlyph, r: i32) -> Glyph {
    let h = (r / 2).max(1);
    match glyph {
        MarkerGlyph::Circle => Glyph::Round,
        MarkerGlyph::Square => Glyph::Closed(vec![(-r, -r), (r, -r), (r, r), (-r, r)]),
        MarkerGlyph::Diamond => Glyph::Closed(vec![(0, -r), (r, 0), (0, r), (-r, 0)]),
        MarkerGlyph::ThinDiamond => Glyph::Closed(vec![(0, -r), (h, 0), (0, r), (-h, 0)]),
        MarkerGlyph::TriangleUp => Glyph::Closed(vec![(0, -r), (r, r), (-r, r)]),
        MarkerGlyph::TriangleDown => Glyph::Closed(vec![(0, r), (r, -r), (-r, -r)]),
        MarkerGlyph::TriangleLeft => Glyph::Closed(vec![(-r, 0), (r, -r), (r, r)]),
        MarkerGlyph::TriangleRight => Glyph::Closed(vec![(r, 0), (-r, -r), (-r, r)]),
        MarkerGlyph::Plus => Glyph::Strokes(vec![vec![(-r, 0), (r, 0)], vec![(0, -r), (0, r)]]),
        MarkerGlyph::Cross => {
            Glyph::Strokes(vec![vec![(-r, -r), (r, r)], vec![(-r, r), (r, -r)]])
        }
        MarkerGlyph::VLine => Glyph::Strokes(vec![vec![(0, -r), (0, r)]]),
        MarkerGlyph::HLine => Glyph::Strokes(vec![vec![(-r, 0), (r, 0)]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_of_mask() {
        let mask = [false, true, true, false, true, true, true];
        assert_eq!(contiguous_runs(&mask), vec![(1, 3), (4, 7)]);
        assert!(contiguous_runs(&[false, false]).is_empty());
        assert_eq!(contiguous_runs(&[true]), vec![(0, 1)]);
    }

    #[test]
    fn step_histogram_outline() {
        let outline = step_outline(&[2.0, 3.0, 4.0], &[5.0, 1.0], -0.5);
        assert_eq!(
            outline,
            vec![
                (1.5, 0.0),
                (1.5, 5.0),
                (2.5, 5.0),
                (2.5, 1.0),
                (3.5, 1.0),
                (3.5, 0.0)
            ]
        );
    }

    #[test]
    fn padding() {
        assert_eq!(pad_range(0.0, 10.0, 0.1), (-1.0, 11.0));
        assert_eq!(pad_range(3.0, 3.0, 0.1), (2.5, 3.5));
    }

    #[test]
    fn glyph_shapes() {
        assert!(matches!(glyph_outline(MarkerGlyph::Circle, 4), Glyph::Round));
        match glyph_outline(MarkerGlyph::Diamond, 4) {
            Glyph::Closed(points) => assert_eq!(points.len(), 4),
            _ => panic!("diamond should be a closed shape"),
        }
        match glyph_outline(MarkerGlyph::Plus, 4) {
            Glyph::Strokes(segments) => assert_eq!(segments.len(), 2),
            _ => panic!("plus should be strokes"),
        }
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let fig = Figure::new((6.0, 2.0), 1);
        let err = save_figure(&fig, &PlotStyle::default(), "figure.pdf");
        assert!(err.is_err());
        let empty = Figure::new((6.0, 2.0), 0);
        assert!(save_figure(&empty, &PlotStyle::default(), "figure.svg").is_err());
    }
}
