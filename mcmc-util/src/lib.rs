//! Utilities for working with posterior draws from MCMC samplers.
//!
//! Samples are kept as labeled `ndarray` arrays with axes
//! `(chain, draw, dims...)`. The plotting crates consume them through
//! flattened scalar traces ([`posterior::VarTrace`]) and the density and
//! interval estimators in [`kde`] and [`hpd`].

/// Labeled posterior sample collections and scalar traces
pub mod posterior;

/// Estimator traits consumed by plotting code
pub mod traits;

/// Binned Gaussian kernel density estimate
pub mod kde;

/// Highest posterior density (shortest) intervals
pub mod hpd;

/// Posterior means and medians
pub mod summary;

/// Reading and writing wide delimited trace files
pub mod trace_io;

pub use posterior::{make_label, PosteriorSamples, PosteriorVar, TraceValues, VarArray, VarTrace};
pub use traits::{DensityEstimate, DensityEstimator, IntervalEstimator};
