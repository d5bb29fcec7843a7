use crate::color::ColorSpec;

use mcmc_util::kde::DEFAULT_BANDWIDTH;
use mcmc_util::TraceValues;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointEstimate {
    Mean,
    Median,
}

impl PointEstimate {
    pub fn compute(&self, values: &TraceValues) -> anyhow::Result<f64> {
        match self {
            PointEstimate::Mean => values.mean(),
            PointEstimate::Median => values.median(),
        }
    }
}

impl FromStr for PointEstimate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(PointEstimate::Mean),
            "median" => Ok(PointEstimate::Median),
            _ => Err(anyhow::anyhow!(
                "Point estimate should be 'mean', 'median' or None, not {}",
                s
            )),
        }
    }
}

/// `none` turns the point estimate off
pub fn parse_point_estimate(s: &str) -> anyhow::Result<Option<PointEstimate>> {
    if s.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        Ok(Some(s.parse()?))
    }
}

/// Marker shapes for interval end points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerGlyph {
    Circle,
    Square,
    Diamond,
    ThinDiamond,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Plus,
    Cross,
    VLine,
    HLine,
}

impl FromStr for MarkerGlyph {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let glyph = match s.trim() {
            "o" => MarkerGlyph::Circle,
            "s" => MarkerGlyph::Square,
            "D" => MarkerGlyph::Diamond,
            "d" => MarkerGlyph::ThinDiamond,
            "^" => MarkerGlyph::TriangleUp,
            "v" => MarkerGlyph::TriangleDown,
            "<" => MarkerGlyph::TriangleLeft,
            ">" => MarkerGlyph::TriangleRight,
            "+" => MarkerGlyph::Plus,
            "x" => MarkerGlyph::Cross,
            "|" => MarkerGlyph::VLine,
            "_" => MarkerGlyph::HLine,
            _ => return Err(anyhow::anyhow!("unknown marker: {}", s)),
        };
        Ok(glyph)
    }
}

/// Knobs of [`crate::densityplot::density_plot`]
#[derive(Debug, Clone)]
pub struct DensityPlotOptions {
    /// one legend label per dataset
    pub data_labels: Option<Vec<Box<str>>>,
    /// plot only these variables
    pub var_names: Option<Vec<Box<str>>>,
    /// tail probability of the credible interval
    pub alpha: f64,
    pub point_estimate: Option<PointEstimate>,
    pub colors: ColorSpec,
    /// draw the density over the credible interval
    pub outline: bool,
    pub hpd_markers: Option<MarkerGlyph>,
    /// opacity of the interval fill; 0 draws nothing
    pub shade: f64,
    /// KDE bandwidth factor
    pub bw: f64,
    /// (width, height) in inches
    pub figsize: Option<(f64, f64)>,
    pub textsize: Option<f64>,
    /// drop draws whose coordinate is below this
    pub skip_first: usize,
}

impl Default for DensityPlotOptions {
    fn default() -> Self {
        Self {
            data_labels: None,
            var_names: None,
            alpha: 0.05,
            point_estimate: Some(PointEstimate::Mean),
            colors: ColorSpec::Cycle,
            outline: true,
            hpd_markers: None,
            shade: 0.0,
            bw: DEFAULT_BANDWIDTH,
            figsize: None,
            textsize: None,
            skip_first: 0,
        }
    }
}

impl DensityPlotOptions {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(anyhow::anyhow!(
                "alpha should be in (0, 1), not {}",
                self.alpha
            ));
        }
        if !(0.0..=1.0).contains(&self.shade) {
            return Err(anyhow::anyhow!(
                "shade should be in [0, 1], not {}",
                self.shade
            ));
        }
        if !(self.bw > 0.0 && self.bw.is_finite()) {
            return Err(anyhow::anyhow!(
                "bandwidth should be a positive number, not {}",
                self.bw
            ));
        }
        if let Some((w, h)) = self.figsize {
            if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
                return Err(anyhow::anyhow!("invalid figure size ({}, {})", w, h));
            }
        }
        if let Some(t) = self.textsize {
            if !(t > 0.0 && t.is_finite()) {
                return Err(anyhow::anyhow!("text size should be positive, not {}", t));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_estimate_names() -> anyhow::Result<()> {
        assert_eq!(parse_point_estimate("Median")?, Some(PointEstimate::Median));
        assert_eq!(parse_point_estimate("none")?, None);
        let err = parse_point_estimate("mode").unwrap_err();
        assert!(err.to_string().contains("not mode"));
        Ok(())
    }

    #[test]
    fn marker_glyphs() {
        assert_eq!("D".parse::<MarkerGlyph>().ok(), Some(MarkerGlyph::Diamond));
        assert_eq!("^".parse::<MarkerGlyph>().ok(), Some(MarkerGlyph::TriangleUp));
        assert!("star".parse::<MarkerGlyph>().is_err());
    }

    #[test]
    fn validate_ranges() {
        assert!(DensityPlotOptions::default().validate().is_ok());

        let bad = [
            DensityPlotOptions {
                alpha: 1.0,
                ..Default::default()
            },
            DensityPlotOptions {
                shade: 1.5,
                ..Default::default()
            },
            DensityPlotOptions {
                bw: 0.0,
                ..Default::default()
            },
            DensityPlotOptions {
                figsize: Some((6.0, -1.0)),
                ..Default::default()
            },
        ];
        for opts in bad.iter() {
            assert!(opts.validate().is_err());
        }
    }
}
