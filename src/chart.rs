//! SVG bar chart of one statistic across stations.

use anyhow::{Context, Result};
use std::fmt::{self, Write};
use tracing::{info, warn};

use crate::stats::StationSummary;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 700.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 190.0;
const Y_TICKS: usize = 5;
const BAR_COLOR: &str = "#008000";

/// Which summary statistic the bars show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Mean,
    Median,
    StdDev,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Mean => "Mean Wait Time",
            Metric::Median => "Median Wait Time",
            Metric::StdDev => "Standard Deviation",
        }
    }

    pub fn value(self, summary: &StationSummary) -> f64 {
        match self {
            Metric::Mean => summary.mean_wait,
            Metric::Median => summary.median_wait,
            Metric::StdDev => summary.std_dev,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rounds the axis top up to 1, 2 or 5 times a power of ten.
fn axis_max(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|step| step * magnitude)
        .find(|top| *top >= max)
        .unwrap_or(10.0 * magnitude)
}

/// Renders the chart, or `None` when no station has data.
///
/// Stations without data are left out rather than drawn as zero-height bars.
pub fn render_bar_chart(summaries: &[StationSummary], metric: Metric, title: &str) -> Option<String> {
    let bars: Vec<(&str, f64)> = summaries
        .iter()
        .filter(|s| s.data_available)
        .map(|s| (s.station.as_str(), metric.value(s)))
        .collect();

    if bars.is_empty() {
        return None;
    }

    let mut svg = String::new();
    write_svg(&mut svg, &bars, metric, title).ok()?;
    Some(svg)
}

fn write_svg(svg: &mut String, bars: &[(&str, f64)], metric: Metric, title: &str) -> fmt::Result {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;
    let top = axis_max(bars.iter().map(|(_, v)| *v).fold(0.0, f64::max));
    let slot = plot_w / bars.len() as f64;
    let bar_w = slot * 0.8;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0,
        escape(title)
    )?;

    for i in 0..=Y_TICKS {
        let value = top * i as f64 / Y_TICKS as f64;
        let y = baseline - plot_h * i as f64 / Y_TICKS as f64;
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="gray" stroke-dasharray="4 4" stroke-opacity="0.6"/>"#,
            WIDTH - MARGIN_RIGHT
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{value:.1}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0
        )?;
    }

    for (i, (station, value)) in bars.iter().enumerate() {
        let h = plot_h * value / top;
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        let cx = x + bar_w / 2.0;
        writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{BAR_COLOR}" fill-opacity="0.8"><title>{}: {value:.2}</title></rect>"#,
            baseline - h,
            escape(station)
        )?;
        writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {cx:.1} {:.1})">{}</text>"#,
            baseline + 14.0,
            baseline + 14.0,
            escape(station)
        )?;
    }

    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{}" y2="{baseline}" stroke="black"/>"#,
        WIDTH - MARGIN_RIGHT
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">Station</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 12.0
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 20 {:.1})">{} (minutes)</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        metric.label()
    )?;
    writeln!(svg, "</svg>")
}

/// Writes the chart to `path`. Returns `false`, writing nothing, when no
/// station had data to plot.
pub fn write_bar_chart(
    path: &str,
    summaries: &[StationSummary],
    metric: Metric,
    title: &str,
) -> Result<bool> {
    let Some(svg) = render_bar_chart(summaries, metric, title) else {
        warn!("Cannot plot: no stations had valid wait time data");
        return Ok(false);
    };

    std::fs::write(path, svg).with_context(|| format!("writing chart to '{path}'"))?;
    info!(path, metric = metric.label(), "Chart written");
    Ok(true)
}
