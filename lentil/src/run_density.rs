use lentil::backend::save_figure;
use lentil::options::parse_point_estimate;
use lentil::report::write_panel_summary;
use lentil::{density_plot, ColorSpec, DensityPlotOptions, MarkerGlyph, PlotStyle};

use clap::Parser;
use log::info;
use mcmc_util::kde::DEFAULT_BANDWIDTH;
use mcmc_util::trace_io::read_trace_file;
use mcmc_util::PosteriorSamples;
use std::path::Path;

#[derive(Parser, Debug, Clone)]
pub struct DensityArgs {
    /// trace files, one per model: a `chain` column, a `draw` column
    /// and one column per scalar, e.g. `theta[0]` (`.tsv`, `.csv`,
    /// optionally `.gz`)
    #[arg(required = true)]
    trace_files: Vec<Box<str>>,

    /// output figure (`.svg` or `.png`)
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// model names shown in the legend (comma-separated, one per file)
    #[arg(long, short = 'l', value_delimiter(','))]
    labels: Option<Vec<Box<str>>>,

    /// plot only these variables (comma-separated)
    #[arg(long, short = 'n', value_delimiter(','))]
    var_names: Option<Vec<Box<str>>>,

    /// tail probability of the credible interval
    #[arg(long, short, default_value_t = 0.05)]
    alpha: f64,

    /// `mean`, `median` or `none`
    #[arg(long, short = 'p', default_value = "mean")]
    point_estimate: Box<str>,

    /// `cycle`, one color, or one color per model (comma-separated);
    /// hex codes, `C0`..`C9` or names
    #[arg(long, short, default_value = "cycle")]
    colors: Box<str>,

    /// don't draw the density outline
    #[arg(long, default_value_t = false)]
    no_outline: bool,

    /// marker at both ends of the interval: o s D d ^ v < > + x | _
    #[arg(long)]
    hpd_markers: Option<Box<str>>,

    /// opacity of the interval fill (0 = no fill)
    #[arg(long, short, default_value_t = 0.0)]
    shade: f64,

    /// KDE bandwidth factor; larger is smoother
    #[arg(long, default_value_t = DEFAULT_BANDWIDTH)]
    bw: f64,

    /// figure width and height in inches, e.g. `6,8`
    #[arg(long, value_delimiter(','), num_args = 2)]
    figsize: Option<Vec<f64>>,

    /// text size; scales with the figure width if not given
    #[arg(long)]
    textsize: Option<f64>,

    /// drop draws whose index is below this (burn-in)
    #[arg(long, default_value_t = 0)]
    skip_first: usize,

    /// plot style (JSON): palette, background, marker_edge,
    /// font_family, dpi, text_scale_ratio
    #[arg(long)]
    style: Option<Box<str>>,

    /// also write `{out}.panels.json` with intervals and point estimates
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

impl DensityArgs {
    fn plot_options(&self) -> anyhow::Result<DensityPlotOptions> {
        let figsize = match self.figsize.as_deref() {
            Some(&[w, h]) => Some((w, h)),
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "figsize needs width and height, got {:?}",
                    other
                ))
            }
            None => None,
        };

        let hpd_markers = match self.hpd_markers.as_deref() {
            Some(m) => Some(m.parse::<MarkerGlyph>()?),
            None => None,
        };

        Ok(DensityPlotOptions {
            data_labels: self.labels.clone(),
            var_names: self.var_names.clone(),
            alpha: self.alpha,
            point_estimate: parse_point_estimate(&self.point_estimate)?,
            colors: self.colors.parse::<ColorSpec>()?,
            outline: !self.no_outline,
            hpd_markers,
            shade: self.shade,
            bw: self.bw,
            figsize,
            textsize: self.textsize,
            skip_first: self.skip_first,
        })
    }
}

/// Draw posterior densities of every trace file into one figure
pub fn run_density_plot(args: DensityArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let options = args.plot_options()?;
    options.validate()?;

    let style = match args.style.as_deref() {
        Some(json_file) => PlotStyle::from_json_file(json_file)?,
        None => PlotStyle::default(),
    };

    let traces = args
        .trace_files
        .iter()
        .map(|f| read_trace_file(f))
        .collect::<anyhow::Result<Vec<PosteriorSamples>>>()?;

    info!("plotting {} trace files", traces.len());

    let fig = density_plot(&traces, &options, &style)?;
    save_figure(&fig, &style, &args.out)?;

    if args.summary {
        let json_file = Path::new(args.out.as_ref()).with_extension("panels.json");
        let json_file = json_file
            .to_str()
            .ok_or(anyhow::anyhow!("invalid output path: {}", args.out))?;
        write_panel_summary(&fig, json_file)?;
    }

    info!("done");
    Ok(())
}
