//! SVG rendering of the production chart.
//!
//! The chart draws one semi-transparent area per region over a temporal year axis. Areas
//! are not stacked: every region is filled down to the zero baseline so overlapping regions
//! show through each other. The same markup is embedded by the web client and rasterized to
//! PNG by the server for downloads.

use std::fmt::Write as _;

use crate::model::production::ProductionPoint;

/// Chart width in pixels
pub const CHART_WIDTH: u32 = 960;
/// Chart height in pixels
pub const CHART_HEIGHT: u32 = 480;
/// Opacity applied to every area fill
pub const AREA_OPACITY: f64 = 0.3;
/// Label of the value axis
pub const VALUE_LABEL: &str = "Gross Agricultural Product ($B)";

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 190.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 48.0;
const FONT: &str = "Inter, Segoe UI, Helvetica, Arial, sans-serif";

/// Categorical palette for the region color channel
const PALETTE: [&str; 10] = [
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];

/// A region's points ready for plotting, sorted by year.
struct Series<'a> {
    region: &'a str,
    color: &'static str,
    points: Vec<(i32, f64)>,
}

/// Linear mapping from data space to pixel space.
struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Renders long-form production points as an overlapping area chart.
///
/// Points without a numeric year or without a value are skipped. Regions keep the order
/// in which they first appear in `points`, which also decides their color.
pub fn render_svg(points: &[ProductionPoint]) -> String {
    let width = f64::from(CHART_WIDTH);
    let height = f64::from(CHART_HEIGHT);
    let series = collect_series(points);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{CHART_WIDTH}' height='{CHART_HEIGHT}' viewBox='0 0 {CHART_WIDTH} {CHART_HEIGHT}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <rect width='{CHART_WIDTH}' height='{CHART_HEIGHT}' fill='#ffffff'/>"
    );

    let Some(((year_min, year_max), (value_min, value_max))) = bounds(&series) else {
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{:.0}' text-anchor='middle' fill='#666666' font-family='{FONT}' font-size='16'>No data</text>",
            width / 2.0,
            height / 2.0
        );
        svg.push_str("</svg>\n");
        return svg;
    };

    let plot_right = width - MARGIN_RIGHT;
    let plot_bottom = height - MARGIN_BOTTOM;

    let (year_lo, year_hi) = if year_min == year_max {
        (f64::from(year_min) - 1.0, f64::from(year_max) + 1.0)
    } else {
        (f64::from(year_min), f64::from(year_max))
    };
    let x = Scale {
        domain: (year_lo, year_hi),
        range: (MARGIN_LEFT, plot_right),
    };

    let value_step = nice_step(value_max - value_min, 5.0);
    let value_lo = (value_min / value_step).floor() * value_step;
    let mut value_hi = (value_max / value_step).ceil() * value_step;
    if value_hi <= value_lo {
        value_hi = value_lo + value_step;
    }
    let y = Scale {
        domain: (value_lo, value_hi),
        range: (plot_bottom, MARGIN_TOP),
    };

    write_value_axis(&mut svg, &y, value_lo, value_hi, value_step, plot_right);
    write_year_axis(&mut svg, &x, year_lo, year_hi, plot_bottom);

    let baseline = y.apply(0.0_f64.clamp(value_lo, value_hi));
    for series in &series {
        write_area(&mut svg, series, &x, &y, baseline);
    }

    write_legend(&mut svg, &series, plot_right);

    svg.push_str("</svg>\n");
    svg
}

fn collect_series(points: &[ProductionPoint]) -> Vec<Series<'_>> {
    let mut series: Vec<Series<'_>> = Vec::new();

    for point in points {
        let index = match series.iter().position(|s| s.region == point.region) {
            Some(index) => index,
            None => {
                let color = PALETTE[series.len() % PALETTE.len()];
                series.push(Series {
                    region: &point.region,
                    color,
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };

        let plotted = point
            .year_number()
            .zip(point.value.filter(|v| v.is_finite()));

        if let (Some((year, value)), Some(entry)) = (plotted, series.get_mut(index)) {
            entry.points.push((year, value));
        }
    }

    for entry in series.iter_mut() {
        entry.points.sort_by_key(|(year, _)| *year);
    }

    series
}

/// Year and value extents across all series, with zero always inside the value range.
fn bounds(series: &[Series<'_>]) -> Option<((i32, i32), (f64, f64))> {
    let all = series.iter().flat_map(|s| s.points.iter());

    let mut extents: Option<((i32, i32), (f64, f64))> = None;
    for &(year, value) in all {
        extents = Some(match extents {
            None => ((year, year), (value.min(0.0), value.max(0.0))),
            Some(((y0, y1), (v0, v1))) => ((y0.min(year), y1.max(year)), (v0.min(value), v1.max(value))),
        });
    }

    extents
}

/// Rounds `span / target_ticks` up to 1, 2 or 5 times a power of ten.
fn nice_step(span: f64, target_ticks: f64) -> f64 {
    if !(span.is_finite() && span > 0.0) {
        return 1.0;
    }

    let raw = span / target_ticks;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    factor * magnitude
}

fn write_value_axis(svg: &mut String, y: &Scale, lo: f64, hi: f64, step: f64, plot_right: f64) {
    let mut tick = lo;
    while tick <= hi + step / 2.0 {
        let py = y.apply(tick);
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN_LEFT:.1}' y1='{py:.1}' x2='{plot_right:.1}' y2='{py:.1}' stroke='#dddddd' stroke-width='1'/>"
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' text-anchor='end' fill='#333333' font-family='{FONT}' font-size='11'>{}</text>",
            MARGIN_LEFT - 6.0,
            py + 4.0,
            format_tick(tick)
        );
        tick += step;
    }

    let mid = (MARGIN_TOP + y.range.0) / 2.0;
    let _ = writeln!(
        svg,
        "  <text transform='translate(18 {mid:.1}) rotate(-90)' text-anchor='middle' fill='#333333' font-family='{FONT}' font-size='12' font-weight='600'>{}</text>",
        escape_text(VALUE_LABEL)
    );
}

fn write_year_axis(svg: &mut String, x: &Scale, lo: f64, hi: f64, plot_bottom: f64) {
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.1}' y1='{plot_bottom:.1}' x2='{:.1}' y2='{plot_bottom:.1}' stroke='#888888' stroke-width='1'/>",
        x.range.1
    );

    let step = nice_step(hi - lo, 10.0).max(1.0);
    let mut tick = (lo / step).ceil() * step;
    while tick <= hi {
        let px = x.apply(tick);
        let _ = writeln!(
            svg,
            "  <line x1='{px:.1}' y1='{plot_bottom:.1}' x2='{px:.1}' y2='{:.1}' stroke='#888888' stroke-width='1'/>",
            plot_bottom + 5.0
        );
        let _ = writeln!(
            svg,
            "  <text x='{px:.1}' y='{:.1}' text-anchor='middle' fill='#333333' font-family='{FONT}' font-size='11'>{tick:.0}</text>",
            plot_bottom + 18.0
        );
        tick += step;
    }

    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{:.1}' text-anchor='middle' fill='#333333' font-family='{FONT}' font-size='12' font-weight='600'>year</text>",
        (x.range.0 + x.range.1) / 2.0,
        plot_bottom + 38.0
    );
}

fn write_area(svg: &mut String, series: &Series<'_>, x: &Scale, y: &Scale, baseline: f64) {
    match series.points.as_slice() {
        [] => {}
        [(year, value)] => {
            let _ = writeln!(
                svg,
                "  <circle cx='{:.1}' cy='{:.1}' r='3' fill='{}'/>",
                x.apply(f64::from(*year)),
                y.apply(*value),
                series.color
            );
        }
        [(first_year, _), .., (last_year, _)] => {
            let line = series
                .points
                .iter()
                .map(|(year, value)| format!("{:.1},{:.1}", x.apply(f64::from(*year)), y.apply(*value)))
                .collect::<Vec<_>>()
                .join(" L");

            let _ = writeln!(
                svg,
                "  <path d='M{:.1},{baseline:.1} L{line} L{:.1},{baseline:.1} Z' fill='{}' fill-opacity='{AREA_OPACITY}' stroke='none'/>",
                x.apply(f64::from(*first_year)),
                x.apply(f64::from(*last_year)),
                series.color
            );
            let _ = writeln!(
                svg,
                "  <path d='M{line}' fill='none' stroke='{}' stroke-width='1.5'/>",
                series.color
            );
        }
    }
}

fn write_legend(svg: &mut String, series: &[Series<'_>], plot_right: f64) {
    let left = plot_right + 20.0;
    let _ = writeln!(
        svg,
        "  <text x='{left:.1}' y='{:.1}' fill='#333333' font-family='{FONT}' font-size='12' font-weight='600'>Region</text>",
        MARGIN_TOP + 12.0
    );

    for (index, entry) in series.iter().enumerate() {
        let top = MARGIN_TOP + 24.0 + 18.0 * index as f64;
        let _ = writeln!(
            svg,
            "  <rect x='{left:.1}' y='{top:.1}' width='12' height='12' fill='{}' fill-opacity='{AREA_OPACITY}' stroke='{}'/>",
            entry.color, entry.color
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' fill='#333333' font-family='{FONT}' font-size='11'>{}</text>",
            left + 18.0,
            top + 10.0,
            escape_text(entry.region)
        );
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.3}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
