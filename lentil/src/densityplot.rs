use crate::density::{render_variable, RenderParams};
use crate::figure::{Figure, Legend, LegendEntry};
use crate::options::DensityPlotOptions;
use crate::style::PlotStyle;

use log::info;
use mcmc_util::hpd::ShortestInterval;
use mcmc_util::kde::FastKde;
use mcmc_util::{DensityEstimator, IntervalEstimator, PosteriorSamples, VarTrace};
use std::collections::HashMap;

/// One or several sample collections to compare
#[derive(Debug, Clone, Copy)]
pub enum PosteriorInput<'a> {
    Single(&'a PosteriorSamples),
    Multiple(&'a [PosteriorSamples]),
}

impl<'a> PosteriorInput<'a> {
    fn datasets(&self) -> Vec<&'a PosteriorSamples> {
        match *self {
            PosteriorInput::Single(s) => vec![s],
            PosteriorInput::Multiple(v) => v.iter().collect(),
        }
    }
}

impl<'a> From<&'a PosteriorSamples> for PosteriorInput<'a> {
    fn from(s: &'a PosteriorSamples) -> Self {
        PosteriorInput::Single(s)
    }
}

impl<'a> From<&'a [PosteriorSamples]> for PosteriorInput<'a> {
    fn from(v: &'a [PosteriorSamples]) -> Self {
        PosteriorInput::Multiple(v)
    }
}

impl<'a> From<&'a Vec<PosteriorSamples>> for PosteriorInput<'a> {
    fn from(v: &'a Vec<PosteriorSamples>) -> Self {
        PosteriorInput::Multiple(v.as_slice())
    }
}

///
/// Legend labels, one per dataset: the given ones (count must match), or
/// `""` for a single dataset and `"0", "1", ...` otherwise
///
pub fn resolve_data_labels(
    data_labels: Option<&[Box<str>]>,
    n_data: usize,
) -> anyhow::Result<Vec<Box<str>>> {
    match data_labels {
        Some(labels) => {
            if labels.len() != n_data {
                return Err(anyhow::anyhow!(
                    "The number of names for the models ({}) does not match the number of models ({})",
                    labels.len(),
                    n_data
                ));
            }
            Ok(labels.to_vec())
        }
        None if n_data == 1 => Ok(vec!["".into()]),
        None => Ok((0..n_data).map(|i| i.to_string().into_boxed_str()).collect()),
    }
}

///
/// Density plot with the default estimators: binned Gaussian KDE and
/// shortest HPD intervals
///
/// * `input` - one or several posterior sample collections
/// * `options` - what to draw
/// * `style` - palette, edge color, text scaling
///
pub fn density_plot<'a, I>(
    input: I,
    options: &DensityPlotOptions,
    style: &PlotStyle,
) -> anyhow::Result<Figure>
where
    I: Into<PosteriorInput<'a>>,
{
    density_plot_with(
        input,
        options,
        style,
        &FastKde::default(),
        &ShortestInterval,
    )
}

///
/// Density plot of every scalar of every variable, one panel per
/// distinct display label, datasets overlaid in their own colors.
///
/// Options are checked before anything is drawn; an estimator error
/// aborts the whole figure.
///
pub fn density_plot_with<'a, I>(
    input: I,
    options: &DensityPlotOptions,
    style: &PlotStyle,
    kde: &dyn DensityEstimator,
    hpd: &dyn IntervalEstimator,
) -> anyhow::Result<Figure>
where
    I: Into<PosteriorInput<'a>>,
{
    options.validate()?;

    let datasets = input.into().datasets();
    let n_data = datasets.len();
    if n_data == 0 {
        return Err(anyhow::anyhow!("no posterior samples to plot"));
    }

    let data_labels = resolve_data_labels(options.data_labels.as_deref(), n_data)?;
    let colors = options.colors.resolve(n_data, &style.palette)?;

    let datasets: Vec<PosteriorSamples> = datasets
        .into_iter()
        .map(|s| s.skip_first(options.skip_first))
        .collect();

    let traces: Vec<Vec<VarTrace>> = datasets
        .iter()
        .map(|s| s.var_iter(options.var_names.as_deref()))
        .collect::<anyhow::Result<_>>()?;

    // panels in order of first appearance across datasets
    let mut panel_of: HashMap<Box<str>, usize> = HashMap::new();
    let mut titles: Vec<Box<str>> = vec![];
    for trace in traces.iter().flatten() {
        let label = trace.label();
        if !panel_of.contains_key(&label) {
            panel_of.insert(label.clone(), titles.len());
            titles.push(label);
        }
    }

    let n_panels = titles.len();
    if n_panels == 0 {
        return Err(anyhow::anyhow!("no variables to plot"));
    }

    let figsize = options.figsize.unwrap_or((6.0, 2.0 * n_panels as f64));
    let scale = style.scale_text(figsize, options.textsize);

    let mut fig = Figure::new(figsize, n_panels);

    for (d, data_traces) in traces.iter().enumerate() {
        let params = RenderParams {
            data_label: &data_labels[d],
            color: colors[d],
            edge_color: style.marker_edge,
            bw: options.bw,
            scale,
            alpha: options.alpha,
            point_estimate: options.point_estimate,
            hpd_markers: options.hpd_markers,
            outline: options.outline,
            shade: options.shade,
            kde,
            hpd,
        };

        for trace in data_traces.iter() {
            let label = trace.label();
            let panel = panel_of
                .get(&label)
                .and_then(|&i| fig.panel_mut(i))
                .ok_or(anyhow::anyhow!("no panel for {}", label))?;
            render_variable(&trace.values, &label, &params, panel)?;
        }
    }

    if n_data > 1 {
        if let Some(first) = fig.panel_mut(0) {
            first.legend = Some(Legend {
                entries: data_labels
                    .iter()
                    .zip(colors.iter())
                    .map(|(label, &color)| LegendEntry {
                        label: label.clone(),
                        color,
                    })
                    .collect(),
                font_size: scale.textsize,
            });
        }
    }

    fig.tight_layout = true;

    info!(
        "density plot: {} datasets, {} panels, {:.1} x {:.1} in",
        n_data, n_panels, figsize.0, figsize.1
    );

    Ok(fig)
}
