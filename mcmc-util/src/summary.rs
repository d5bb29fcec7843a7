use crate::posterior::TraceValues;
use num_traits::ToPrimitive;

/// Arithmetic mean of the draws
pub fn mean<T>(values: &[T]) -> anyhow::Result<f64>
where
    T: ToPrimitive + Copy,
{
    if values.is_empty() {
        return Err(anyhow::anyhow!("mean of an empty trace"));
    }
    let mut tot = 0.0;
    for v in values {
        tot += as_f64(*v)?;
    }
    Ok(tot / values.len() as f64)
}

/// Median of the draws; an even count averages the middle two
pub fn median<T>(values: &[T]) -> anyhow::Result<f64>
where
    T: ToPrimitive + Copy,
{
    if values.is_empty() {
        return Err(anyhow::anyhow!("median of an empty trace"));
    }
    let mut x = values
        .iter()
        .map(|&v| as_f64(v))
        .collect::<anyhow::Result<Vec<f64>>>()?;
    x.sort_by(|a, b| a.total_cmp(b));

    let n = x.len();
    if n % 2 == 1 {
        Ok(x[n / 2])
    } else {
        Ok(0.5 * (x[n / 2 - 1] + x[n / 2]))
    }
}

fn as_f64<T: ToPrimitive>(v: T) -> anyhow::Result<f64> {
    v.to_f64()
        .ok_or(anyhow::anyhow!("value cannot be represented as f64"))
}

impl TraceValues {
    pub fn mean(&self) -> anyhow::Result<f64> {
        match self {
            TraceValues::Continuous(v) => mean(v),
            TraceValues::Discrete(v) => mean(v),
        }
    }

    pub fn median(&self) -> anyhow::Result<f64> {
        match self {
            TraceValues::Continuous(v) => median(v),
            TraceValues::Discrete(v) => median(v),
        }
    }
}
