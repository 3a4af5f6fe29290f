use crate::measure::TextMetrics;
use crate::stats::{CURVE_BUCKETS, DeckStats};
use std::fmt;

/// Bar chart of the mana curve.
pub struct CurveChart {
    metrics: TextMetrics,
    bar_width: f64,
    bar_gap: f64,
    plot_height: f64,
}

impl Default for CurveChart {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            bar_width: 24.0,
            bar_gap: 8.0,
            plot_height: 160.0,
        }
    }
}

impl CurveChart {
    pub fn render(&self, stats: &DeckStats) -> String {
        CurveSvg { chart: self, stats }.to_string()
    }

    fn width(&self) -> f64 {
        self.metrics.padding_x * 2.0
            + CURVE_BUCKETS as f64 * (self.bar_width + self.bar_gap)
            - self.bar_gap
    }

    fn height(&self) -> f64 {
        // Value labels above the plot, bucket labels below.
        self.plot_height + self.metrics.line_height * 2.0 + self.metrics.padding_y * 2.0
    }
}

struct CurveSvg<'a> {
    chart: &'a CurveChart,
    stats: &'a DeckStats,
}

impl fmt::Display for CurveSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.chart;
        let m = &chart.metrics;
        let (width, height) = (chart.width(), chart.height());

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )?;
        writeln!(
            f,
            r#"<style>
  .bar {{ fill: #4a7ab5; }}
  .axis {{ stroke: #333; stroke-width: 1; }}
  .label {{ font-family: monospace; font-size: 12px; fill: #333; }}
  .value {{ font-family: monospace; font-size: 11px; fill: #666; }}
</style>"#
        )?;

        let max = self.stats.curve_max();
        let baseline = m.padding_y + m.line_height + chart.plot_height;

        writeln!(
            f,
            r#"<line class="axis" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            m.padding_x,
            baseline,
            width - m.padding_x,
            baseline
        )?;

        for (mana, &count) in self.stats.curve.iter().enumerate() {
            let x = m.padding_x + mana as f64 * (chart.bar_width + chart.bar_gap);
            let center = x + chart.bar_width / 2.0;

            if count > 0 {
                let bar_height = count as f64 / max as f64 * chart.plot_height;
                writeln!(
                    f,
                    r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" />"#,
                    x,
                    baseline - bar_height,
                    chart.bar_width,
                    bar_height
                )?;
                writeln!(
                    f,
                    r#"<text class="value" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                    center,
                    baseline - bar_height - 4.0,
                    count
                )?;
            }

            writeln!(
                f,
                r#"<text class="label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                center,
                baseline + m.line_height * 0.8,
                bucket_label(mana)
            )?;
        }

        writeln!(f, "</svg>")
    }
}

fn bucket_label(mana: usize) -> String {
    if mana == CURVE_BUCKETS - 1 {
        format!("{}+", mana)
    } else {
        mana.to_string()
    }
}
