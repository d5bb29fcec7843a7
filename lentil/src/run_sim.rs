use clap::Parser;
use log::info;
use mcmc_util::trace_io::write_trace_file;
use mcmc_util::{PosteriorSamples, PosteriorVar};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};

#[derive(Parser, Debug, Clone)]
pub struct SimArgs {
    /// number of chains
    #[arg(long, short = 'c', default_value_t = 4)]
    n_chains: usize,

    /// number of draws per chain
    #[arg(long, short = 'd', default_value_t = 500)]
    n_draws: usize,

    /// number of groups (length of `theta`)
    #[arg(long, short = 'g', default_value_t = 8)]
    n_groups: usize,

    /// rate of the discrete variable `k`
    #[arg(long, default_value_t = 3.0)]
    rate: f64,

    /// random seed
    #[arg(long, default_value_t = 42)]
    rseed: u64,

    /// output trace file, e.g. `trace.tsv.gz`
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Draws of a toy hierarchical model: `mu ~ N(0, 5)`, `tau ~ |N(0, 5)|`,
/// `theta[g] ~ N(mu, tau)` and a discrete `k ~ Poisson(rate)`
pub fn simulate_posterior(args: &SimArgs) -> anyhow::Result<PosteriorSamples> {
    if args.n_chains == 0 || args.n_draws == 0 {
        return Err(anyhow::anyhow!("need at least one chain and one draw"));
    }

    let mut rng = StdRng::seed_from_u64(args.rseed);
    let prior = Normal::<f64>::new(0.0, 5.0)?;
    let poisson = Poisson::new(args.rate)?;
    let std_normal = Normal::<f64>::new(0.0, 1.0)?;

    let shape = (args.n_chains, args.n_draws);
    let mu = Array2::from_shape_fn(shape, |_| prior.sample(&mut rng));
    let tau = Array2::from_shape_fn(shape, |_| prior.sample(&mut rng).abs());
    let theta = Array3::from_shape_fn((args.n_chains, args.n_draws, args.n_groups), |(c, d, _)| {
        mu[[c, d]] + tau[[c, d]] * std_normal.sample(&mut rng)
    });
    let k = Array2::from_shape_fn(shape, |_| poisson.sample(&mut rng) as i64);

    PosteriorSamples::new()
        .with_var("mu", PosteriorVar::real(mu.into_dyn())?)?
        .with_var("tau", PosteriorVar::real(tau.into_dyn())?)?
        .with_var("theta", PosteriorVar::real(theta.into_dyn())?)?
        .with_var("k", PosteriorVar::int(k.into_dyn())?)
}

pub fn run_sim_trace(args: SimArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    info!("Simulating {} chains x {} draws...", args.n_chains, args.n_draws);
    let samples = simulate_posterior(&args)?;
    write_trace_file(&samples, &args.out)?;
    info!("Wrote {}", args.out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcmc_util::VarArray;

    fn args(n_chains: usize) -> SimArgs {
        SimArgs {
            n_chains,
            n_draws: 10,
            n_groups: 3,
            rate: 3.0,
            rseed: 1,
            out: "unused.tsv".into(),
            verbose: false,
        }
    }

    #[test]
    fn toy_model_shapes_and_kinds() -> anyhow::Result<()> {
        let samples = simulate_posterior(&args(2))?;
        assert_eq!(samples.num_chains(), 2);
        assert_eq!(samples.num_draws(), 10);

        let shape = |name: &str| samples.get(name).unwrap().values.shape().to_vec();
        assert_eq!(shape("mu"), vec![2, 10]);
        assert_eq!(shape("tau"), vec![2, 10]);
        assert_eq!(shape("theta"), vec![2, 10, 3]);
        assert_eq!(shape("k"), vec![2, 10]);

        for name in ["mu", "tau", "theta"] {
            assert!(matches!(samples.get(name).unwrap().values, VarArray::Real(_)));
        }
        match &samples.get("tau").unwrap().values {
            VarArray::Real(x) => assert!(x.iter().all(|&t| t >= 0.0)),
            _ => unreachable!(),
        }
        match &samples.get("k").unwrap().values {
            VarArray::Int(x) => assert!(x.iter().all(|&k| k >= 0)),
            _ => unreachable!(),
        }
        Ok(())
    }

    #[test]
    fn zero_chains_is_an_error() {
        assert!(simulate_posterior(&args(0)).is_err());
    }
}
