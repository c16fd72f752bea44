//! Year-over-year chart series.

use hobart_earnings::{ChartPoint, EarningsSeries};
use serde::{Deserialize, Serialize};

/// Quarters shown on the chart.
pub const DEFAULT_CHART_QUARTERS: usize = 12;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Unicode sparkline; absent values print as a space.
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten().copied();
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;

    values
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(_) if range <= 0.0 => BARS[BARS.len() / 2],
            Some(v) => {
                let idx = ((v - min) / range * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Year-over-year change over the most recent quarters, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyChart {
    /// Chart title
    pub title: String,
    /// Points, oldest first
    pub points: Vec<ChartPoint>,
}

impl YoyChart {
    /// Chart of the `quarters` most recent quarters.
    ///
    /// Returns `None` when no quarter of the series has a year-over-year value.
    pub fn from_series(series: &EarningsSeries, quarters: usize) -> Option<Self> {
        if !series.has_yoy() {
            return None;
        }

        Some(Self {
            title: format!("{} YoY change %", series.ticker),
            points: series.chart_points(quarters),
        })
    }

    /// Year-over-year values, oldest first.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.yoy_change_percent).collect()
    }

    /// Sparkline of the year-over-year values.
    pub fn sparkline(&self) -> String {
        sparkline(&self.values())
    }

    /// Smallest and largest year-over-year value.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().filter_map(|p| p.yoy_change_percent);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Render the sparkline with its range and axis labels.
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.title));
        output.push_str(&format!("  {}", self.sparkline()));
        if let Some((lo, hi)) = self.range() {
            output.push_str(&format!("   [{:+.2}% .. {:+.2}%]", lo, hi));
        }
        output.push('\n');

        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            output.push_str(&format!("  {} .. {}\n", first.label, last.label));
        }

        output
    }
}
