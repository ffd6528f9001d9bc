// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SVG chart rendering.
//!
//! Rendering is a pure function of its input. Every number is written with a
//! fixed precision, so the same series always produces the same bytes.

use crate::markup::escape_markup;
use crate::models::{MetricPoint, ResourceKind};
use crate::time_utils::short_date_label;
use std::fmt::Write as _;

const FONT_LINE: &str = "'SF Mono', 'Monaco', monospace";
const FONT_COMPACT: &str = "'SF Mono', 'Courier New', monospace";

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartStyle {
    /// Full-width trend line over every point.
    Line,
    /// Narrow horizontal bars for the most recent days.
    Compact { unit: &'static str, max_scale: f64 },
}

/// One output chart: where its data comes from and how it looks.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub source: ResourceKind,
    pub field_path: &'static [&'static str],
    /// Multiplier applied to the raw field
    pub scale: f64,
    pub title: &'static str,
    pub color: &'static str,
    pub style: ChartStyle,
}

const MILLIS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

const SLEEP_IN_BED: &[&str] = &["score", "stage_summary", "total_in_bed_time_milli"];
const SLEEP_PERFORMANCE: &[&str] = &["score", "sleep_performance_percentage"];
const RECOVERY_SCORE: &[&str] = &["score", "recovery_score"];
const STRAIN: &[&str] = &["score", "strain"];

/// Every chart the visualizer writes.
pub const CHARTS: &[ChartSpec] = &[
    ChartSpec {
        file_name: "sleep_duration.svg",
        source: ResourceKind::Sleep,
        field_path: SLEEP_IN_BED,
        scale: 1.0 / MILLIS_PER_HOUR,
        title: "Sleep Duration (hours)",
        color: "#9D4EDD",
        style: ChartStyle::Line,
    },
    ChartSpec {
        file_name: "recovery_score.svg",
        source: ResourceKind::Recovery,
        field_path: RECOVERY_SCORE,
        scale: 1.0,
        title: "Recovery Score",
        color: "#06D6A0",
        style: ChartStyle::Line,
    },
    ChartSpec {
        file_name: "strain_score.svg",
        source: ResourceKind::Cycles,
        field_path: STRAIN,
        scale: 1.0,
        title: "Strain Score",
        color: "#FF6B6B",
        style: ChartStyle::Line,
    },
    ChartSpec {
        file_name: "sleep_performance.svg",
        source: ResourceKind::Sleep,
        field_path: SLEEP_PERFORMANCE,
        scale: 1.0,
        title: "Sleep Performance (%)",
        color: "#4CC9F0",
        style: ChartStyle::Line,
    },
    ChartSpec {
        file_name: "recovery_compact.svg",
        source: ResourceKind::Recovery,
        field_path: RECOVERY_SCORE,
        scale: 1.0,
        title: "Recovery",
        color: "#06d6a0",
        style: ChartStyle::Compact {
            unit: "",
            max_scale: 100.0,
        },
    },
    ChartSpec {
        file_name: "strain_compact.svg",
        source: ResourceKind::Cycles,
        field_path: STRAIN,
        scale: 1.0,
        title: "Strain",
        color: "#ff6b6b",
        style: ChartStyle::Compact {
            unit: "",
            max_scale: 21.0,
        },
    },
    ChartSpec {
        file_name: "sleep_performance_compact.svg",
        source: ResourceKind::Sleep,
        field_path: SLEEP_PERFORMANCE,
        scale: 1.0,
        title: "Sleep Quality",
        color: "#4cc9f0",
        style: ChartStyle::Compact {
            unit: "%",
            max_scale: 100.0,
        },
    },
];

impl ChartSpec {
    /// Render this chart for `points`. An empty series gives an empty chart.
    pub fn render(&self, points: &[MetricPoint]) -> String {
        match self.style {
            ChartStyle::Line => {
                let values: Vec<f64> = points.iter().map(|p| p.value).collect();
                LineChart::default().render(self.title, &values, self.color)
            }
            ChartStyle::Compact { unit, max_scale } => {
                let rows: Vec<(String, f64)> = points
                    .iter()
                    .map(|p| (short_date_label(&p.created_at), p.value))
                    .collect();
                CompactBarChart::default().render(self.title, &rows, unit, self.color, max_scale)
            }
        }
    }
}

/// Trend line with a dashed grid and a shaded area.
#[derive(Debug, Clone, Copy)]
pub struct LineChart {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for LineChart {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            padding: 40.0,
        }
    }
}

impl LineChart {
    fn graph_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    fn graph_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    pub fn render(&self, title: &str, values: &[f64], color: &str) -> String {
        let mut svg = self.header(title);

        if !values.is_empty() {
            let y_max = values.iter().copied().fold(f64::MIN, f64::max);
            self.write_grid(&mut svg, y_max);

            let points = self.normalize(values);
            self.write_line(&mut svg, &points, color);
            for (x, y) in &points {
                let _ = write!(
                    svg,
                    "\n    <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{color}\" opacity=\"0.8\"/>"
                );
            }
        }

        svg.push_str("\n</svg>\n");
        svg
    }

    fn header(&self, title: &str) -> String {
        format!(
            r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
    <defs>
        <linearGradient id="gradient" x1="0%" y1="0%" x2="0%" y2="100%">
            <stop offset="0%" style="stop-color:#00D9FF;stop-opacity:0.3" />
            <stop offset="100%" style="stop-color:#00D9FF;stop-opacity:0.05" />
        </linearGradient>
    </defs>

    <!-- Background -->
    <rect width="{w}" height="{h}" fill="#0D1117" rx="6"/>

    <!-- Title -->
    <text x="{pad}" y="{title_y}" font-family="{FONT_LINE}" font-size="16" font-weight="bold" fill="#C9D1D9">
        {title}
    </text>
"##,
            w = self.width,
            h = self.height,
            pad = self.padding,
            title_y = self.padding - 15.0,
            title = escape_markup(title),
        )
    }

    fn write_grid(&self, svg: &mut String, y_max: f64) {
        const GRID_LINES: u32 = 4;

        for i in 0..=GRID_LINES {
            let fraction = f64::from(i) / f64::from(GRID_LINES);
            let y = self.padding + self.graph_height() * fraction;
            let value = y_max * (1.0 - fraction);

            let _ = write!(
                svg,
                r##"
    <line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}"
          stroke="#30363D" stroke-width="1" stroke-dasharray="4,4"/>
    <text x="{label_x}" y="{label_y:.1}" font-family="{FONT_LINE}"
          font-size="10" fill="#8B949E" text-anchor="end">{value:.0}</text>
"##,
                x1 = self.padding,
                x2 = self.width - self.padding,
                label_x = self.padding - 5.0,
                label_y = y + 4.0,
            );
        }
    }

    /// Map values to graph coordinates. A flat series sits at mid-height.
    fn normalize(&self, values: &[f64]) -> Vec<(f64, f64)> {
        let max_val = values.iter().copied().fold(f64::MIN, f64::max);
        let min_val = values.iter().copied().fold(f64::MAX, f64::min);
        let max_val = if max_val > 0.0 { max_val } else { 1.0 };
        let steps = values.len().saturating_sub(1).max(1) as f64;

        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let x = self.padding + (i as f64) * self.graph_width() / steps;
                let normalized = if max_val != min_val {
                    (value - min_val) / (max_val - min_val)
                } else {
                    0.5
                };
                let y = self.height - self.padding - normalized * self.graph_height();
                (x, y)
            })
            .collect()
    }

    fn write_line(&self, svg: &mut String, points: &[(f64, f64)], color: &str) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };

        let mut path = format!("M {:.1},{:.1}", first.0, first.1);
        for (x, y) in &points[1..] {
            let _ = write!(path, " L {x:.1},{y:.1}");
        }
        let baseline = self.height - self.padding;

        let _ = write!(
            svg,
            r##"
    <!-- Line -->
    <path d="{path}" stroke="{color}" stroke-width="2" fill="none" stroke-linecap="round" stroke-linejoin="round"/>

    <!-- Area under line -->
    <path d="{path} L {lx:.1},{baseline:.1} L {fx:.1},{baseline:.1} Z"
          fill="url(#gradient)" opacity="0.3"/>
"##,
            lx = last.0,
            fx = first.0,
        );
    }
}

/// Horizontal bar chart of the last few days, sized for a profile README.
#[derive(Debug, Clone, Copy)]
pub struct CompactBarChart {
    pub width: f64,
    pub padding: f64,
    pub line_height: f64,
    pub bar_width: f64,
}

impl Default for CompactBarChart {
    fn default() -> Self {
        Self {
            width: 260.0,
            padding: 20.0,
            line_height: 35.0,
            bar_width: 130.0,
        }
    }
}

impl CompactBarChart {
    /// Most recent rows shown.
    pub const MAX_ROWS: usize = 5;

    pub fn render(
        &self,
        title: &str,
        rows: &[(String, f64)],
        unit: &str,
        color: &str,
        max_scale: f64,
    ) -> String {
        let shown = &rows[rows.len().saturating_sub(Self::MAX_ROWS)..];
        let height = self.padding * 2.0 + 30.0 + shown.len() as f64 * self.line_height + 40.0;

        let mut svg = format!(
            r##"<svg width="{w}" height="{height}" xmlns="http://www.w3.org/2000/svg">
    <!-- Background -->
    <rect width="{w}" height="{height}" fill="#0d1117" rx="6"/>

    <!-- Title -->
    <text x="{pad}" y="{title_y}" font-family="{FONT_COMPACT}"
          font-size="18" font-weight="bold" fill="#c9d1d9">
        {title}
    </text>

"##,
            w = self.width,
            pad = self.padding,
            title_y = self.padding + 20.0,
            title = escape_markup(title),
        );

        if shown.is_empty() {
            svg.push_str("</svg>\n");
            return svg;
        }

        let mut y = self.padding + 50.0;
        for (label, value) in shown {
            let fill = if max_scale > 0.0 {
                (value / max_scale).clamp(0.0, 1.0) * self.bar_width
            } else {
                0.0
            };

            let _ = write!(
                svg,
                r##"    <!-- Data row -->
    <text x="{label_x}" y="{y}" font-family="{FONT_COMPACT}"
          font-size="14" fill="#8b949e">
        {label}
    </text>
    <text x="{value_x}" y="{y}" font-family="{FONT_COMPACT}"
          font-size="14" fill="{color}" font-weight="bold" text-anchor="end">
        {value_str}
    </text>

    <!-- Bar background -->
    <rect x="{bar_x}" y="{bar_y}" width="{bar_width}" height="16"
          fill="#1a1a1a" rx="2"/>

    <!-- Bar filled portion -->
    <rect x="{bar_x}" y="{bar_y}" width="{fill:.1}" height="16"
          fill="{color}" rx="2"/>

"##,
                label_x = self.padding + 10.0,
                value_x = self.padding + 100.0,
                bar_x = self.padding + 110.0,
                bar_y = y - 12.0,
                bar_width = self.bar_width,
                label = escape_markup(label),
                value_str = format_value(*value, unit),
            );
            y += self.line_height;
        }

        let avg = shown.iter().map(|(_, v)| v).sum::<f64>() / shown.len() as f64;
        let _ = write!(
            svg,
            r##"    <!-- Stats -->
    <text x="{x}" y="{y}"
          font-family="{FONT_COMPACT}" font-size="12" fill="#58a6ff" text-anchor="end">
        Avg: {avg_str} • Last {n} days
    </text>

</svg>
"##,
            x = self.width - self.padding - 10.0,
            y = height - self.padding - 10.0,
            avg_str = format_value(avg, unit),
            n = shown.len(),
        );

        svg
    }
}

/// `hrs` keeps one decimal, `%` none, anything else one decimal and no unit.
fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "hrs" => format!("{value:.1}{unit}"),
        "%" => format!("{value:.0}{unit}"),
        _ => format!("{value:.1}"),
    }
}
