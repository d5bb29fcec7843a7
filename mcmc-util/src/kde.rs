use crate::traits::{DensityEstimate, DensityEstimator};
use log::warn;
use std::f64::consts::PI;

/// Roughly Scott's rule of thumb
pub const DEFAULT_BANDWIDTH: f64 = 4.5;

/// Binned Gaussian kernel density estimate.
///
/// Draws are histogrammed on at most `max_bins` bins and the counts are
/// convolved with a Gaussian window; the histogram is reflected at both
/// ends so the estimate does not sag at the boundaries of the support.
#[derive(Debug, Clone)]
pub struct FastKde {
    pub max_bins: usize,
}

impl Default for FastKde {
    fn default() -> Self {
        FastKde { max_bins: 200 }
    }
}

impl DensityEstimator for FastKde {
    fn estimate(&self, values: &[f64], bw: f64) -> anyhow::Result<DensityEstimate> {
        if !(bw > 0.0 && bw.is_finite()) {
            return Err(anyhow::anyhow!(
                "bandwidth should be a positive number, not {}",
                bw
            ));
        }

        let x: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if x.len() < values.len() {
            warn!(
                "kde: dropped {} non-finite values out of {}",
                values.len() - x.len(),
                values.len()
            );
        }
        if x.is_empty() {
            return Err(anyhow::anyhow!("kde needs at least one finite value"));
        }

        let len_x = x.len();
        let xmin = x.iter().copied().fold(f64::INFINITY, f64::min);
        let xmax = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if xmax <= xmin {
            return Err(anyhow::anyhow!(
                "kde support has zero width (all values are {})",
                xmin
            ));
        }

        let log_len_x = (len_x as f64).ln() * bw;
        // never more bins than draws
        let n_bins = (((len_x as f64).cbrt() * log_len_x * 2.0) as usize)
            .min(self.max_bins)
            .min(len_x);
        if n_bins < 2 {
            return Err(anyhow::anyhow!(
                "too few values ({}) for a density estimate",
                len_x
            ));
        }

        let d_x = (xmax - xmin) / (n_bins - 1) as f64;
        let grid = histogram(&x, n_bins, xmin, xmax);

        let scotts_factor = (len_x as f64).powf(-0.2);
        let kern_sd = scotts_factor * log_len_x;
        let kern_nx = ((scotts_factor * 2.0 * PI * log_len_x) as usize).max(1);
        let kernel = gaussian_window(kern_nx, kern_sd);

        let npad = n_bins.min(2 * kern_nx);
        let padded = reflect_pad(&grid, npad);
        let left = npad.min(n_bins - 1);

        let smoothed = convolve_same(&padded, &kernel);

        let norm_factor = len_x as f64 * d_x * (2.0 * PI * kern_sd * kern_sd).sqrt();
        let density = smoothed[left..(left + n_bins)]
            .iter()
            .map(|&v| v / norm_factor)
            .collect();

        Ok(DensityEstimate {
            density,
            lower: xmin,
            upper: xmax,
        })
    }
}

/// Counts over `nbins` equal-width bins of `[lo, hi]`, last bin closed
fn histogram(x: &[f64], nbins: usize, lo: f64, hi: f64) -> Vec<f64> {
    let width = (hi - lo) / nbins as f64;
    let mut counts = vec![0.0; nbins];
    for &v in x {
        let b = (((v - lo) / width) as usize).min(nbins - 1);
        counts[b] += 1.0;
    }
    counts
}

/// Gaussian window of `m` points with standard deviation `sd` (in points)
fn gaussian_window(m: usize, sd: f64) -> Vec<f64> {
    let centre = (m as f64 - 1.0) / 2.0;
    (0..m)
        .map(|i| {
            let z = (i as f64 - centre) / sd;
            (-0.5 * z * z).exp()
        })
        .collect()
}

/// Mirror up to `npad` bins on the left without the first bin, and
/// `npad - 1` bins on the right starting from the last bin
fn reflect_pad(grid: &[f64], npad: usize) -> Vec<f64> {
    let n = grid.len();
    let left = npad.min(n - 1);
    let right = npad.saturating_sub(1).min(n);

    let mut out = Vec::with_capacity(n + left + right);
    out.extend((1..=left).rev().map(|i| grid[i]));
    out.extend_from_slice(grid);
    out.extend(((n - right)..n).rev().map(|i| grid[i]));
    out
}

/// Direct convolution, output centred and as long as `signal`
fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len() as isize;
    let m = kernel.len() as isize;
    let shift = (m - 1) / 2;
    (0..n)
        .map(|j| {
            let t = j + shift;
            (0..m)
                .filter_map(|k| {
                    let s = t - k;
                    (s >= 0 && s < n).then(|| signal[s as usize] * kernel[k as usize])
                })
                .sum::<f64>()
        })
        .collect()
}
