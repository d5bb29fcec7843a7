/// Density evaluated on an evenly spaced grid over `[lower, upper]`
#[derive(Debug, Clone, PartialEq)]
pub struct DensityEstimate {
    pub density: Vec<f64>,
    pub lower: f64,
    pub upper: f64,
}

impl DensityEstimate {
    /// `linspace(lower, upper, density.len())`
    pub fn grid(&self) -> Vec<f64> {
        let n = self.density.len();
        match n {
            0 => vec![],
            1 => vec![self.lower],
            _ => {
                let step = (self.upper - self.lower) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.upper
                        } else {
                            self.lower + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Smooth density estimate of continuous draws
pub trait DensityEstimator {
    /// * `values` - flattened draws
    /// * `bw` - bandwidth scaling factor (larger is smoother)
    fn estimate(&self, values: &[f64], bw: f64) -> anyhow::Result<DensityEstimate>;
}

/// Credible interval of draws at tail probability `alpha`
pub trait IntervalEstimator {
    /// `(1 - alpha)` interval of continuous draws
    fn interval(&self, values: &[f64], alpha: f64) -> anyhow::Result<(f64, f64)>;

    /// `(1 - alpha)` interval of integer draws; bounds are observed values
    fn interval_discrete(&self, values: &[i64], alpha: f64) -> anyhow::Result<(i64, i64)>;
}
