use crate::color::Color;
use crate::figure::{Artist, BinAlign, HistStyle, Panel, TraceKind, VariableSummary};
use crate::options::{MarkerGlyph, PointEstimate};
use crate::style::TextScale;

use log::{debug, warn};
use mcmc_util::{DensityEstimator, IntervalEstimator, TraceValues};

/// Per-dataset drawing parameters
pub struct RenderParams<'a> {
    pub data_label: &'a str,
    pub color: Color,
    /// marker edge color
    pub edge_color: Color,
    pub bw: f64,
    pub scale: TextScale,
    pub alpha: f64,
    pub point_estimate: Option<PointEstimate>,
    pub hpd_markers: Option<MarkerGlyph>,
    pub outline: bool,
    pub shade: f64,
    pub kde: &'a dyn DensityEstimator,
    pub hpd: &'a dyn IntervalEstimator,
}

///
/// Draw the posterior of one scalar into `panel`: a KDE over the
/// credible interval for continuous draws, a histogram of the interval
/// for discrete draws, then markers and panel decorations.
///
/// * `values` - flattened draws
/// * `label` - panel title
/// * `params` - dataset color, interval and style parameters
/// * `panel` - target subplot
///
pub fn render_variable(
    values: &TraceValues,
    label: &str,
    params: &RenderParams,
    panel: &mut Panel,
) -> anyhow::Result<()> {
    let (kind, support, (xmin, xmax)) = match values {
        TraceValues::Continuous(x) => {
            let (support, bounds) = draw_continuous(x, label, params, panel)?;
            (TraceKind::Continuous, support, bounds)
        }
        TraceValues::Discrete(x) => {
            let (support, bounds) = draw_discrete(x, label, params, panel)?;
            (TraceKind::Discrete, support, bounds)
        }
    };

    if !params.outline && params.shade <= 0.0 {
        warn!("{}: neither outline nor shade, only markers drawn", label);
    }

    if let Some(glyph) = params.hpd_markers {
        for x in [xmin, xmax] {
            panel.artists.push(Artist::Marker {
                x,
                y: 0.0,
                glyph,
                face: params.color,
                edge: params.edge_color,
                size: params.scale.markersize,
            });
        }
    }

    let point_estimate = match params.point_estimate {
        Some(pe) => {
            let est = pe.compute(values)?;
            panel.artists.push(Artist::Marker {
                x: est,
                y: -0.001,
                glyph: MarkerGlyph::Circle,
                face: params.color,
                edge: params.edge_color,
                size: params.scale.markersize,
            });
            Some((pe, est))
        }
        None => None,
    };

    panel.show_y_ticks = false;
    panel.title = label.into();
    panel.spines.left = false;
    panel.spines.right = false;
    panel.spines.top = false;
    panel.tick_label_size = params.scale.textsize;

    panel.summaries.push(VariableSummary {
        data_label: params.data_label.into(),
        color: params.color,
        kind,
        support,
        interval: (xmin, xmax),
        point_estimate,
    });

    Ok(())
}

/// Returns the density support and the ends of the drawn interval
fn draw_continuous(
    x: &[f64],
    label: &str,
    params: &RenderParams,
    panel: &mut Panel,
) -> anyhow::Result<((f64, f64), (f64, f64))> {
    let kde = params.kde.estimate(x, params.bw)?;
    let grid = kde.grid();
    let (lo, hi) = params.hpd.interval(x, params.alpha)?;

    let cut: Vec<bool> = grid.iter().map(|&g| g >= lo && g <= hi).collect();
    let first = cut.iter().position(|&c| c);
    let last = cut.iter().rposition(|&c| c);
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(anyhow::anyhow!(
                "{}: no grid point of the density falls in the interval [{}, {}]",
                label,
                lo,
                hi
            ))
        }
    };

    let (xmin, xmax) = (grid[first], grid[last]);
    let (ymin, ymax) = (kde.density[first], kde.density[last]);

    if params.outline {
        let (xs, ys): (Vec<f64>, Vec<f64>) = grid
            .iter()
            .zip(kde.density.iter())
            .zip(cut.iter())
            .filter(|(_, &c)| c)
            .map(|((&g, &d), _)| (g, d))
            .unzip();
        panel.artists.push(Artist::Line {
            xs,
            ys,
            color: params.color,
            width: params.scale.linewidth,
        });
        for (xe, ye) in [(xmin, ymin), (xmax, ymax)] {
            panel.artists.push(Artist::Line {
                xs: vec![xe, xe],
                ys: vec![-ye / 100.0, ye],
                color: params.color,
                width: params.scale.linewidth,
            });
        }
    }

    if params.shade > 0.0 {
        panel.artists.push(Artist::FillBetween {
            xs: grid,
            ys: kde.density,
            mask: cut,
            color: params.color,
            alpha: params.shade,
        });
    }

    Ok(((kde.lower, kde.upper), (xmin, xmax)))
}

fn draw_discrete(
    x: &[i64],
    label: &str,
    params: &RenderParams,
    panel: &mut Panel,
) -> anyhow::Result<((f64, f64), (f64, f64))> {
    let (xmin, xmax) = params.hpd.interval_discrete(x, params.alpha)?;
    let upper = xmax.checked_add(1).ok_or(anyhow::anyhow!(
        "{}: no bin edge above the interval end {}",
        label,
        xmax
    ))?;
    let edges: Vec<i64> = (xmin..=upper).collect();
    let counts = count_bins(x, &edges)?;
    debug!(
        "{}: {} of {} draws in [{}, {}]",
        label,
        counts.iter().sum::<f64>(),
        x.len(),
        xmin,
        xmax
    );

    let edges: Vec<f64> = edges.into_iter().map(|e| e as f64).collect();

    if params.outline {
        panel.artists.push(Artist::Histogram {
            edges: edges.clone(),
            counts: counts.clone(),
            color: params.color,
            style: HistStyle::Step {
                width: params.scale.linewidth,
            },
            align: BinAlign::Left,
        });
    }

    if params.shade > 0.0 {
        panel.artists.push(Artist::Histogram {
            edges: edges.clone(),
            counts,
            color: params.color,
            style: HistStyle::Filled {
                alpha: params.shade,
            },
            align: BinAlign::Mid,
        });
    }

    let support = (edges[0], edges[edges.len() - 1]);
    Ok((support, (xmin as f64, xmax as f64)))
}

/// Counts of unit bins `[e_i, e_{i+1})`, the last bin closed on the
/// right; values outside the edges are ignored
fn count_bins(x: &[i64], edges: &[i64]) -> anyhow::Result<Vec<f64>> {
    let nbins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; nbins];
    if nbins == 0 {
        return Ok(counts);
    }
    let (lo, hi) = (edges[0], edges[nbins]);
    for &v in x {
        if v < lo || v > hi {
            continue;
        }
        let offset = v
            .checked_sub(lo)
            .ok_or(anyhow::anyhow!("bin offset of {} from {} overflows", v, lo))?;
        let b = (offset as usize).min(nbins - 1);
        counts[b] += 1.0;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, TAB10};
    use crate::style::PlotStyle;
    use mcmc_util::hpd::ShortestInterval;
    use mcmc_util::kde::FastKde;

    fn params<'a>(kde: &'a FastKde, hpd: &'a ShortestInterval) -> RenderParams<'a> {
        RenderParams {
            data_label: "",
            color: TAB10[0],
            edge_color: BLACK,
            bw: 4.5,
            scale: PlotStyle::default().scale_text((6.0, 2.0), None),
            alpha: 0.05,
            point_estimate: Some(PointEstimate::Median),
            hpd_markers: Some(MarkerGlyph::Diamond),
            outline: true,
            shade: 0.3,
            kde,
            hpd,
        }
    }

    #[test]
    fn closed_last_bin() -> anyhow::Result<()> {
        let edges = vec![2, 3, 4];
        let counts = count_bins(&[1, 2, 2, 3, 4, 5], &edges)?;
        assert_eq!(counts, vec![2.0, 2.0]);
        Ok(())
    }

    #[test]
    fn interval_at_integer_limits() -> anyhow::Result<()> {
        let (kde, hpd) = (FastKde::default(), ShortestInterval);

        let mut panel = Panel::default();
        let top = TraceValues::Discrete(vec![i64::MAX; 20]);
        assert!(render_variable(&top, "k", &params(&kde, &hpd), &mut panel).is_err());

        let counts = count_bins(&[i64::MIN, 0, i64::MAX], &[i64::MIN, 0, i64::MAX]);
        assert!(counts.is_err());

        let bottom = TraceValues::Discrete(vec![i64::MIN; 20]);
        render_variable(&bottom, "k", &params(&kde, &hpd), &mut panel)?;
        assert_eq!(panel.summaries[0].interval, (i64::MIN as f64, i64::MIN as f64));
        Ok(())
    }

    #[test]
    fn discrete_artists() -> anyhow::Result<()> {
        let (kde, hpd) = (FastKde::default(), ShortestInterval);
        let x: Vec<i64> = (0..300).map(|i| (i % 3) as i64).collect();
        let mut panel = Panel::default();
        render_variable(
            &TraceValues::Discrete(x),
            "k",
            &params(&kde, &hpd),
            &mut panel,
        )?;

        let hists: Vec<&Artist> = panel.histograms().collect();
        assert_eq!(hists.len(), 2);
        match hists[0] {
            Artist::Histogram {
                edges,
                counts,
                align,
                ..
            } => {
                assert_eq!(edges, &vec![0.0, 1.0, 2.0, 3.0]);
                assert_eq!(counts, &vec![100.0, 100.0, 100.0]);
                assert_eq!(*align, BinAlign::Left);
            }
            _ => unreachable!(),
        }
        // two interval markers and the point estimate
        let markers = panel
            .artists
            .iter()
            .filter(|a| matches!(a, Artist::Marker { .. }))
            .count();
        assert_eq!(markers, 3);
        assert_eq!(panel.title.as_ref(), "k");
        assert!(!panel.show_y_ticks);
        assert!(!panel.spines.left && !panel.spines.top && panel.spines.bottom);
        Ok(())
    }
}
