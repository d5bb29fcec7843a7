use crate::figure::{Figure, LegendEntry, VariableSummary};

use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PanelReport<'a> {
    title: &'a str,
    variables: &'a [VariableSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    legend: Option<&'a [LegendEntry]>,
}

/// Per-panel intervals, supports and point estimates as pretty JSON
pub fn panel_summary_json(fig: &Figure) -> anyhow::Result<String> {
    let panels: Vec<PanelReport> = fig
        .panels()
        .iter()
        .map(|p| PanelReport {
            title: &p.title,
            variables: &p.summaries,
            legend: p.legend.as_ref().map(|l| l.entries.as_slice()),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&panels)?)
}

pub fn write_panel_summary(fig: &Figure, json_file: &str) -> anyhow::Result<()> {
    std::fs::write(json_file, panel_summary_json(fig)?)?;
    info!("Wrote panel summary: {}", json_file);
    Ok(())
}
