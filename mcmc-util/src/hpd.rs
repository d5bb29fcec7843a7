use crate::traits::IntervalEstimator;

/// Highest posterior density interval of a unimodal sample: the
/// narrowest window of sorted draws holding `(1 - alpha)` of the mass
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestInterval;

impl IntervalEstimator for ShortestInterval {
    fn interval(&self, values: &[f64], alpha: f64) -> anyhow::Result<(f64, f64)> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(anyhow::anyhow!(
                "credible interval needs finite values, found {}",
                bad
            ));
        }
        let mut x = values.to_vec();
        x.sort_by(|a, b| a.total_cmp(b));
        shortest_window(&x, alpha, |lo, hi| hi - lo)
    }

    fn interval_discrete(&self, values: &[i64], alpha: f64) -> anyhow::Result<(i64, i64)> {
        let mut x = values.to_vec();
        x.sort_unstable();
        shortest_window(&x, alpha, |lo, hi| hi as f64 - lo as f64)
    }
}

///
/// Scan every window of `floor((1 - alpha) n)` consecutive sorted draws
/// and return the narrowest one; the first wins on ties.
///
/// * `sorted` - draws in ascending order
/// * `alpha` - tail probability in (0, 1)
/// * `width` - width of a window given its end points
///
fn shortest_window<T, W>(sorted: &[T], alpha: f64, width: W) -> anyhow::Result<(T, T)>
where
    T: Copy,
    W: Fn(T, T) -> f64,
{
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow::anyhow!("alpha should be in (0, 1), not {}", alpha));
    }

    let len_x = sorted.len();
    let interval_idx_inc = ((1.0 - alpha) * len_x as f64).floor() as usize;
    let n_intervals = len_x - interval_idx_inc;
    if n_intervals == 0 || len_x == 0 {
        return Err(anyhow::anyhow!(
            "too few elements ({}) for interval calculation",
            len_x
        ));
    }

    let mut best = 0;
    let mut best_width = f64::INFINITY;
    for i in 0..n_intervals {
        let w = width(sorted[i], sorted[i + interval_idx_inc]);
        if w < best_width {
            best_width = w;
            best = i;
        }
    }

    Ok((sorted[best], sorted[best + interval_idx_inc]))
}
