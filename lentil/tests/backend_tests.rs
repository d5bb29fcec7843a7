use lentil::backend::save_figure;
use lentil::{density_plot, DensityPlotOptions, MarkerGlyph, PlotStyle, PointEstimate};

use mcmc_util::{PosteriorSamples, PosteriorVar};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// 2 chains x 200 draws of a continuous `mu` and a discrete `k`
fn toy_posterior(seed: u64, shift: f64) -> anyhow::Result<PosteriorSamples> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let normal = Normal::new(shift, 1.0)?;
    let mu = Array2::from_shape_fn((2, 200), |_| normal.sample(&mut rng));
    let k = Array2::from_shape_fn((2, 200), |(c, d)| ((c + 3 * d) % 5) as i64);

    PosteriorSamples::new()
        .with_var("mu", PosteriorVar::real(mu.into_dyn())?)?
        .with_var("k", PosteriorVar::int(k.into_dyn())?)
}

#[test]
fn two_datasets_render_to_svg_and_png() -> anyhow::Result<()> {
    let models = vec![toy_posterior(1, 0.0)?, toy_posterior(2, 1.5)?];
    let opts = DensityPlotOptions {
        data_labels: Some(vec!["prior".into(), "posterior".into()]),
        point_estimate: Some(PointEstimate::Median),
        hpd_markers: Some(MarkerGlyph::Diamond),
        shade: 0.3,
        ..Default::default()
    };
    let style = PlotStyle::default();
    let fig = density_plot(&models, &opts, &style)?;
    assert_eq!(fig.num_panels(), 2);
    assert!(fig.panels()[0].legend.is_some());

    let dir = tempfile::tempdir()?;

    let svg = dir.path().join("density.svg");
    save_figure(&fig, &style, svg.to_str().unwrap())?;
    let text = std::fs::read_to_string(&svg)?;
    assert!(!text.is_empty());
    assert!(text.contains("<svg"));
    // legend labels and panel titles are drawn as text
    assert!(text.contains("posterior"));
    assert!(text.contains("mu"));

    let png = dir.path().join("density.png");
    save_figure(&fig, &style, png.to_str().unwrap())?;
    let bytes = std::fs::read(&png)?;
    assert!(!bytes.is_empty());
    assert_eq!(&bytes[1..4], b"PNG");
    Ok(())
}
