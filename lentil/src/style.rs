use crate::color::{Color, BLACK, TAB10, WHITE};

use serde::{Deserialize, Serialize};

/// Figure-wide look, passed explicitly to every plotting call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// color cycle for datasets
    pub palette: Vec<Color>,
    pub background: Color,
    /// edge color of interval markers
    pub marker_edge: Color,
    pub font_family: String,
    /// pixels per inch of figure size
    pub dpi: u32,
    /// default text size per inch of figure width
    pub text_scale_ratio: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            palette: TAB10.to_vec(),
            background: WHITE,
            marker_edge: BLACK,
            font_family: "sans-serif".into(),
            dpi: 100,
            text_scale_ratio: 2.0,
        }
    }
}

impl PlotStyle {
    /// Read a style from JSON; missing fields take default values
    pub fn from_json_file(json_file: &str) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(json_file)
            .map_err(|e| anyhow::anyhow!("failed to read style {}: {}", json_file, e))?;
        let style: Self = serde_json::from_str(&text)?;
        if style.palette.is_empty() {
            return Err(anyhow::anyhow!("{}: palette is empty", json_file));
        }
        if style.dpi == 0 {
            return Err(anyhow::anyhow!("{}: dpi should be positive", json_file));
        }
        Ok(style)
    }

    ///
    /// Text size, line width and marker size for a figure
    ///
    /// * `figsize` - (width, height) in inches
    /// * `textsize` - explicit text size, or `figsize.0 * text_scale_ratio`
    ///
    pub fn scale_text(&self, figsize: (f64, f64), textsize: Option<f64>) -> TextScale {
        let textsize = textsize.unwrap_or(figsize.0 * self.text_scale_ratio);
        TextScale {
            textsize,
            linewidth: textsize / 8.0,
            markersize: textsize / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextScale {
    pub textsize: f64,
    pub linewidth: f64,
    pub markersize: f64,
}
