use lentil::color::TAB10;
use lentil::figure::{Artist, TraceKind};
use lentil::options::parse_point_estimate;
use lentil::report::panel_summary_json;
use lentil::{density_plot, ColorSpec, DensityPlotOptions, MarkerGlyph, PlotStyle, PointEstimate};

use mcmc_util::{PosteriorSamples, PosteriorVar};
use ndarray::{Array2, Array3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// 2 chains x 400 draws: continuous `mu`, vector `theta[3]`, discrete
/// `k` cycling through 2..=7
fn toy_posterior(seed: u64, shift: f64) -> anyhow::Result<PosteriorSamples> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let normal = Normal::new(shift, 1.0)?;

    let mu = Array2::from_shape_fn((2, 400), |_| normal.sample(&mut rng));
    let theta = Array3::from_shape_fn((2, 400, 3), |(_, _, j)| {
        j as f64 + normal.sample(&mut rng)
    });
    let k = Array2::from_shape_fn((2, 400), |(c, d)| 2 + ((c + d) % 6) as i64);

    PosteriorSamples::new()
        .with_var("mu", PosteriorVar::real(mu.into_dyn())?)?
        .with_var("theta", PosteriorVar::real(theta.into_dyn())?)?
        .with_var("k", PosteriorVar::int(k.into_dyn())?)
}

fn names(xs: &[&str]) -> Option<Vec<Box<str>>> {
    Some(xs.iter().map(|&x| x.into()).collect())
}

#[test]
fn one_panel_per_scalar() -> anyhow::Result<()> {
    let samples = toy_posterior(1, 0.0)?;
    let fig = density_plot(&samples, &DensityPlotOptions::default(), &PlotStyle::default())?;

    let titles: Vec<&str> = fig.panels().iter().map(|p| p.title.as_ref()).collect();
    assert_eq!(titles, vec!["mu", "theta\n0", "theta\n1", "theta\n2", "k"]);
    assert_eq!((fig.width, fig.height), (6.0, 10.0));
    assert!(fig.tight_layout);

    // a single dataset has no legend and an empty label
    assert!(fig.panels().iter().all(|p| p.legend.is_none()));
    assert_eq!(fig.panels()[0].summaries[0].data_label.as_ref(), "");

    for panel in fig.panels() {
        assert!(!panel.show_y_ticks);
        assert!(!panel.spines.left && !panel.spines.right && !panel.spines.top);
        assert_eq!(panel.tick_label_size, 12.0);
    }
    Ok(())
}

#[test]
fn continuous_interval_lies_in_support() -> anyhow::Result<()> {
    let samples = toy_posterior(2, 3.0)?;
    let opts = DensityPlotOptions {
        var_names: names(&["mu"]),
        shade: 0.4,
        ..Default::default()
    };
    let fig = density_plot(&samples, &opts, &PlotStyle::default())?;
    assert_eq!(fig.num_panels(), 1);

    let panel = &fig.panels()[0];
    let summary = &panel.summaries[0];
    assert_eq!(summary.kind, TraceKind::Continuous);
    let (lo, hi) = summary.support;
    let (xmin, xmax) = summary.interval;
    assert!(lo <= xmin && xmin < xmax && xmax <= hi);
    // roughly 3 +/- 1.96
    assert!(xmin > 0.5 && xmin < 1.5, "xmin {}", xmin);
    assert!(xmax > 4.5 && xmax < 5.5, "xmax {}", xmax);

    let mut saw_fill = false;
    for artist in panel.artists.iter() {
        match artist {
            Artist::Line { xs, .. } => {
                assert!(xs.iter().all(|&x| x >= xmin && x <= xmax));
            }
            Artist::FillBetween { xs, mask, .. } => {
                saw_fill = true;
                assert_eq!(xs.first().copied(), Some(lo));
                assert_eq!(xs.last().copied(), Some(hi));
                let cut: Vec<f64> = xs
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, &m)| m)
                    .map(|(&x, _)| x)
                    .collect();
                assert!(!cut.is_empty() && cut.len() < xs.len());
                assert_eq!(cut.first().copied(), Some(xmin));
                assert_eq!(cut.last().copied(), Some(xmax));
            }
            _ => {}
        }
    }
    assert!(saw_fill);
    Ok(())
}

#[test]
fn discrete_bins_cover_interval() -> anyhow::Result<()> {
    let samples = toy_posterior(3, 0.0)?;
    let opts = DensityPlotOptions {
        var_names: names(&["k"]),
        shade: 0.5,
        hpd_markers: Some(MarkerGlyph::Diamond),
        ..Default::default()
    };
    let fig = density_plot(&samples, &opts, &PlotStyle::default())?;
    let panel = &fig.panels()[0];

    assert_eq!(panel.summaries[0].kind, TraceKind::Discrete);
    assert_eq!(panel.summaries[0].interval, (2.0, 7.0));

    let hists: Vec<&Artist> = panel.histograms().collect();
    assert_eq!(hists.len(), 2);
    for h in hists {
        match h {
            Artist::Histogram { edges, counts, .. } => {
                assert_eq!(edges.first().copied(), Some(2.0));
                assert_eq!(edges.last().copied(), Some(8.0));
                assert_eq!(counts.len(), 6);
                assert_eq!(counts.iter().sum::<f64>(), 800.0);
            }
            _ => unreachable!(),
        }
    }

    let marker_xs: Vec<f64> = panel
        .artists
        .iter()
        .filter_map(|a| match a {
            Artist::Marker { x, y, glyph, .. } if *glyph == MarkerGlyph::Diamond => {
                assert_eq!(*y, 0.0);
                Some(*x)
            }
            _ => None,
        })
        .collect();
    assert_eq!(marker_xs, vec![2.0, 7.0]);
    Ok(())
}

#[test]
fn no_outline_no_shade_still_plots() -> anyhow::Result<()> {
    let samples = toy_posterior(4, 0.0)?;
    let opts = DensityPlotOptions {
        outline: false,
        shade: 0.0,
        ..Default::default()
    };
    let fig = density_plot(&samples, &opts, &PlotStyle::default())?;
    assert_eq!(fig.num_panels(), 5);

    for panel in fig.panels() {
        assert!(panel.artists.iter().all(|a| matches!(a, Artist::Marker { .. })));
        // only the point estimate
        assert_eq!(panel.artists.len(), 1);
    }
    Ok(())
}

#[test]
fn datasets_share_panels_and_legend() -> anyhow::Result<()> {
    let models = vec![toy_posterior(5, 0.0)?, toy_posterior(6, 1.0)?];
    let opts = DensityPlotOptions {
        var_names: names(&["mu"]),
        ..Default::default()
    };
    let fig = density_plot(&models, &opts, &PlotStyle::default())?;
    assert_eq!(fig.num_panels(), 1);

    let panel = &fig.panels()[0];
    assert_eq!(panel.summaries.len(), 2);
    assert_eq!(panel.summaries[0].color, TAB10[0]);
    assert_eq!(panel.summaries[1].color, TAB10[1]);

    let legend = panel.legend.as_ref().unwrap();
    let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_ref()).collect();
    assert_eq!(labels, vec!["0", "1"]);
    assert_eq!(legend.font_size, 12.0);
    Ok(())
}

#[test]
fn configuration_errors() -> anyhow::Result<()> {
    let models = vec![toy_posterior(7, 0.0)?, toy_posterior(8, 0.0)?];
    let style = PlotStyle::default();

    assert!(parse_point_estimate("mode").is_err());
    assert_eq!(parse_point_estimate("median")?, Some(PointEstimate::Median));

    let one_label = DensityPlotOptions {
        data_labels: names(&["only one"]),
        ..Default::default()
    };
    assert!(density_plot(&models, &one_label, &style).is_err());

    let three_colors = DensityPlotOptions {
        colors: "red,green,blue".parse::<ColorSpec>()?,
        ..Default::default()
    };
    assert!(density_plot(&models, &three_colors, &style).is_err());

    let unknown = DensityPlotOptions {
        var_names: names(&["sigma"]),
        ..Default::default()
    };
    assert!(density_plot(&models, &unknown, &style).is_err());

    let bad_alpha = DensityPlotOptions {
        alpha: 0.0,
        ..Default::default()
    };
    assert!(density_plot(&models, &bad_alpha, &style).is_err());
    Ok(())
}

#[test]
fn burn_in_drops_early_draws() -> anyhow::Result<()> {
    // the first 100 draws of each chain sit far away
    let mut rng = SmallRng::seed_from_u64(9);
    let normal = Normal::new(0.0, 1.0)?;
    let x = Array2::from_shape_fn((2, 300), |(_, d)| {
        let z = normal.sample(&mut rng);
        if d < 100 {
            1000.0 + z
        } else {
            z
        }
    });
    let samples = PosteriorSamples::new().with_var("x", PosteriorVar::real(x.into_dyn())?)?;

    let style = PlotStyle::default();
    let raw = density_plot(&samples, &DensityPlotOptions::default(), &style)?;
    assert!(raw.panels()[0].summaries[0].support.1 > 900.0);

    let opts = DensityPlotOptions {
        skip_first: 100,
        point_estimate: Some(PointEstimate::Median),
        ..Default::default()
    };
    let fig = density_plot(&samples, &opts, &style)?;
    let summary = &fig.panels()[0].summaries[0];
    assert!(summary.support.1 < 10.0);
    let (_, est) = summary.point_estimate.unwrap();
    assert!(est.abs() < 0.3);

    // input is untouched
    assert_eq!(samples.num_draws(), 300);
    Ok(())
}

#[test]
fn panel_summary_lists_every_panel() -> anyhow::Result<()> {
    let models = vec![toy_posterior(10, 0.0)?, toy_posterior(11, 0.5)?];
    let opts = DensityPlotOptions {
        data_labels: names(&["centered", "shifted"]),
        var_names: names(&["k", "mu"]),
        ..Default::default()
    };
    let fig = density_plot(&models, &opts, &PlotStyle::default())?;
    assert_eq!(fig.panels()[0].title.as_ref(), "k");

    let json: serde_json::Value = serde_json::from_str(&panel_summary_json(&fig)?)?;
    let panels = json.as_array().unwrap();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0]["variables"][1]["data_label"], "shifted");
    assert_eq!(panels[0]["variables"][0]["kind"], "discrete");
    assert_eq!(panels[1]["variables"][0]["point_estimate"][0], "mean");
    assert_eq!(panels[0]["legend"][0]["color"], "#1f77b4");
    assert!(panels[1].get("legend").is_none());
    Ok(())
}
